use super::field::Field;
use super::schema::create_table_sql;
use crate::error::OrmError;
use crate::types::DatabaseType;

/// Per-type mapping metadata: the table name and the declared fields.
///
/// Built once per model type, normally by [`model!`](crate::model!), or by hand:
///
/// ```rust
/// use lazy_orm::model::{Field, ModelMeta};
///
/// let meta = ModelMeta::builder("Blog")
///     .table("blogs")
///     .field("title", Field::char())
///     .field("content", Field::text())
///     .build();
/// assert_eq!(meta.table_name(), "blogs");
/// assert_eq!(meta.field_names().collect::<Vec<_>>(), ["title", "content"]);
/// ```
#[derive(Debug, Clone)]
pub struct ModelMeta {
    table_name: String,
    fields: Vec<(String, Field)>,
}

impl ModelMeta {
    /// Start metadata for a type; the table name defaults to the lowercased type name.
    #[must_use]
    pub fn builder(type_name: &str) -> ModelMetaBuilder {
        ModelMetaBuilder {
            table_name: type_name.to_lowercase(),
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields.iter().map(|(name, field)| (name.as_str(), field))
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields
            .iter()
            .find(|(field_name, _)| field_name == name)
            .map(|(_, field)| field)
    }

    #[must_use]
    pub fn contains_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// CREATE TABLE statement for this model in `dialect`.
    ///
    /// # Errors
    /// See [`create_table_sql`].
    pub fn create_table_sql(
        &self,
        dialect: DatabaseType,
        charset: &str,
    ) -> Result<String, OrmError> {
        create_table_sql(&self.table_name, self.fields(), dialect, charset)
    }
}

#[derive(Debug)]
pub struct ModelMetaBuilder {
    table_name: String,
    fields: Vec<(String, Field)>,
}

impl ModelMetaBuilder {
    #[must_use]
    pub fn table(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = table_name.into();
        self
    }

    /// Declare a field; declaring the same name again replaces the earlier descriptor.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, field: Field) -> Self {
        let name = name.into();
        self.fields.retain(|(existing, _)| *existing != name);
        self.fields.push((name, field));
        self
    }

    #[must_use]
    pub fn build(mut self) -> ModelMeta {
        self.fields.sort_by_key(|(_, field)| field.order());
        ModelMeta {
            table_name: self.table_name,
            fields: self.fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_defaults_to_lowercase_type_name() {
        let meta = ModelMeta::builder("Student").build();
        assert_eq!(meta.table_name(), "student");
        assert_eq!(meta.fields().count(), 0);
    }

    #[test]
    fn fields_are_ordered_by_declaration_not_registration() {
        let first = Field::char();
        let second = Field::integer();
        let meta = ModelMeta::builder("T")
            .field("second", second)
            .field("first", first)
            .build();
        assert_eq!(meta.field_names().collect::<Vec<_>>(), ["first", "second"]);
    }

    #[test]
    fn redeclared_field_replaces_the_earlier_one() {
        let meta = ModelMeta::builder("T")
            .field("name", Field::char())
            .field("name", Field::text())
            .build();
        assert_eq!(meta.fields().count(), 1);
        assert_eq!(meta.field("name").map(Field::ddl_type), Some("text"));
        assert!(!meta.contains_field("missing"));
    }
}
