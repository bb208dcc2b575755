mod support;

use record_store::{Comparison, Filter, MemoryStore, Query, Sort, Store};
use serde_json::json;
use support::{articles, frozen_store, ids, record};

fn seeded() -> MemoryStore {
    let (_clock, store) = frozen_store();
    let articles = articles();
    for (title, x, unread) in [
        ("A", 1, true),
        ("B", 2, false),
        ("C", 3, true),
        ("D", 4, true),
        ("E", 5, true),
    ] {
        store
            .create(
                &articles,
                "u1",
                record(json!({"title": title, "x": x, "unread": unread})),
            )
            .unwrap();
    }
    store
}

fn titles(records: &[record_store::Record]) -> Vec<&str> {
    records.iter().filter_map(|r| r.get_str("title")).collect()
}

#[test]
fn walking_pages_with_a_cursor_rule() {
    let store = seeded();
    let articles = articles();
    let base = Query::new()
        .filter(Filter::eq("unread", true))
        .sort(Sort::asc("x"))
        .limit(2);

    let (first, total) = store.get_all(&articles, "u1", &base).unwrap();
    assert_eq!(titles(&first), vec!["A", "C"]);
    assert_eq!(total, 4);

    let cursor = first.last().and_then(|r| r.get("x")).cloned().unwrap();
    let next = base
        .clone()
        .pagination_rule(vec![Filter::new("x", Comparison::Gt, cursor)]);
    let (second, total) = store.get_all(&articles, "u1", &next).unwrap();
    assert_eq!(titles(&second), vec!["D", "E"]);
    assert_eq!(total, 4);
}

#[test]
fn multi_key_cursor_uses_disjoined_rules() {
    let (_clock, store) = frozen_store();
    let articles = articles();
    for (title, group, n) in [("a", 1, 1), ("b", 1, 2), ("c", 2, 1), ("d", 2, 2)] {
        store
            .create(
                &articles,
                "u1",
                record(json!({"title": title, "group": group, "n": n})),
            )
            .unwrap();
    }
    // Resume after (group=1, n=2): group > 1 OR (group == 1 AND n > 2).
    let query = Query::new()
        .sort(Sort::asc("group"))
        .sort(Sort::asc("n"))
        .pagination_rule(vec![Filter::gt("group", 1)])
        .pagination_rule(vec![Filter::eq("group", 1), Filter::gt("n", 2)]);
    let (records, total) = store.get_all(&articles, "u1", &query).unwrap();
    assert_eq!(titles(&records), vec!["c", "d"]);
    assert_eq!(total, 4);
}

#[test]
fn overlapping_rules_do_not_duplicate_records() {
    let store = seeded();
    let query = Query::new()
        .pagination_rule(vec![Filter::gt("x", 2)])
        .pagination_rule(vec![Filter::gt("x", 3)]);
    let (records, _) = store.get_all(&articles(), "u1", &query).unwrap();
    let seen = ids(&records);
    let distinct: std::collections::HashSet<_> = seen.iter().collect();
    assert_eq!(seen.len(), 3);
    assert_eq!(distinct.len(), 3);
}

#[test]
fn rules_matching_nothing_fall_back_to_the_filtered_set() {
    let (_clock, store) = frozen_store();
    let articles = articles();
    for title in ["A", "B", "C"] {
        store
            .create(&articles, "u1", record(json!({"title": title, "x": 1})))
            .unwrap();
    }
    let query = Query::new().pagination_rule(vec![Filter::gt("x", 999)]);
    let (records, total) = store.get_all(&articles, "u1", &query).unwrap();
    assert_eq!(total, 3);
    let mut got = titles(&records);
    got.sort();
    assert_eq!(got, vec!["A", "B", "C"]);
}

#[test]
fn fallback_respects_filters() {
    let store = seeded();
    let query = Query::new()
        .filter(Filter::eq("unread", false))
        .pagination_rule(vec![Filter::gt("x", 999)]);
    let (records, total) = store.get_all(&articles(), "u1", &query).unwrap();
    assert_eq!(total, 1);
    assert_eq!(titles(&records), vec!["B"]);
}

#[test]
fn sort_by_timestamp_follows_write_order() {
    let (clock, store) = frozen_store();
    let articles = articles();
    for title in ["first", "second", "third"] {
        clock.advance(1);
        store
            .create(&articles, "u1", record(json!({"title": title})))
            .unwrap();
    }
    let query = Query::new().sort(Sort::desc("last_modified"));
    let (records, _) = store.get_all(&articles, "u1", &query).unwrap();
    assert_eq!(titles(&records), vec!["third", "second", "first"]);
}
