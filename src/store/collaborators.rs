use uuid::Uuid;

use crate::error::StoreError;
use crate::record::Record;
use crate::resource::Resource;

/// Produces identity values for newly created records.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

/// Random UUID v4 identities.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

impl<F> IdGenerator for F
where
    F: Fn() -> String + Send + Sync,
{
    fn next_id(&self) -> String {
        self()
    }
}

/// Decides whether a record may be written next to the existing ones.
///
/// Called under the store's write lock, before anything is mutated. `existing`
/// is every record currently stored in the (resource, tenant) partition.
pub trait UnicityCheck: Send + Sync {
    fn check_unicity(
        &self,
        resource: &Resource,
        user_id: &str,
        record: &Record,
        existing: &[&Record],
    ) -> Result<(), StoreError>;
}

/// Enforces [`Resource::unique_fields`]: a non-null value of a unique field may
/// only be held by one record per partition. The record being updated (same
/// identity value) does not conflict with itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniqueFields;

impl UnicityCheck for UniqueFields {
    fn check_unicity(
        &self,
        resource: &Resource,
        _user_id: &str,
        record: &Record,
        existing: &[&Record],
    ) -> Result<(), StoreError> {
        let id_field = resource.id_field();
        let own_id = record.get(id_field);

        for field in resource.unique_fields() {
            let value = match record.get(field) {
                Some(value) if !value.is_null() => value,
                _ => continue,
            };
            let conflict = existing.iter().find(|other| {
                let same_record = own_id.is_some() && other.get(id_field) == own_id;
                !same_record && other.get(field).is_some_and(|v| v.loose_eq(value))
            });
            if let Some(other) = conflict {
                return Err(StoreError::UnicityConflict {
                    resource: resource.name().to_string(),
                    field: field.clone(),
                    existing: other.identity(id_field).unwrap_or_default(),
                });
            }
        }
        Ok(())
    }
}
