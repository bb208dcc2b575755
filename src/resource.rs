/// Default name of the identity field.
pub const DEFAULT_ID_FIELD: &str = "_id";

/// Default name of the modification-timestamp field.
pub const DEFAULT_MODIFIED_FIELD: &str = "last_modified";

/// Describes a logical record type (e.g. "articles").
///
/// A resource is only a partition key plus the field names the store needs to
/// interpret; it is never stored itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    name: String,
    id_field: String,
    modified_field: String,
    unique_fields: Vec<String>,
}

impl Resource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id_field: DEFAULT_ID_FIELD.to_string(),
            modified_field: DEFAULT_MODIFIED_FIELD.to_string(),
            unique_fields: Vec::new(),
        }
    }

    pub fn with_id_field(mut self, field: impl Into<String>) -> Self {
        self.id_field = field.into();
        self
    }

    pub fn with_modified_field(mut self, field: impl Into<String>) -> Self {
        self.modified_field = field.into();
        self
    }

    /// Fields whose values must not repeat within a (resource, tenant) partition.
    pub fn with_unique_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.unique_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id_field(&self) -> &str {
        &self.id_field
    }

    pub fn modified_field(&self) -> &str {
        &self.modified_field
    }

    pub fn unique_fields(&self) -> &[String] {
        &self.unique_fields
    }
}
