//! Class schemas and the field lists they provide.
//!
//! Schemas use the shape returned by a Parse-style `/schemas` endpoint:
//!
//! ```json
//! { "className": "GameScore",
//!   "fields": { "objectId": { "type": "String" },
//!               "player":   { "type": "Pointer", "targetClass": "_User" } } }
//! ```
//!
//! A schema file holds either one such object or `{ "results": [ ... ] }`.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Supplies the field names of a class.
pub trait SchemaProvider {
    /// Field names of `class_name`, in display order.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownClass` if the class is not known.
    fn fields(&self, class_name: &str) -> Result<Vec<String>>;
}

/// Type information for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    /// Backend type name (`String`, `Number`, `Pointer`, ...)
    #[serde(rename = "type")]
    pub field_type: String,

    /// Target class of `Pointer` and `Relation` fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_class: Option<String>,
}

/// Schema of a single class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassSchema {
    /// Class name
    pub class_name: String,

    /// Fields keyed by name
    #[serde(default)]
    pub fields: BTreeMap<String, FieldSpec>,
}

impl ClassSchema {
    /// Field names sorted by name.
    #[must_use]
    pub fn field_names(&self) -> Vec<String> {
        self.fields.keys().cloned().collect()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SchemaDocument {
    Many { results: Vec<ClassSchema> },
    One(ClassSchema),
}

/// Schema provider over a fixed set of class schemas.
#[derive(Debug, Clone, Default)]
pub struct StaticSchemaProvider {
    classes: Vec<ClassSchema>,
}

impl StaticSchemaProvider {
    /// Create a provider over `classes`.
    #[must_use]
    pub fn new(classes: Vec<ClassSchema>) -> Self {
        Self { classes }
    }

    /// Parse a schema document.
    ///
    /// # Errors
    ///
    /// Returns `Error::Json` if the text is neither a schema nor a
    /// `results` list of schemas.
    pub fn from_json(text: &str) -> Result<Self> {
        let classes = match serde_json::from_str::<SchemaDocument>(text)? {
            SchemaDocument::Many { results } => results,
            SchemaDocument::One(schema) => vec![schema],
        };
        Ok(Self::new(classes))
    }

    /// Load a schema document from a file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file cannot be read, or `Error::Json` if it
    /// is not a schema document.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let provider = Self::from_json(&text)?;
        tracing::debug!(path = %path.display(), classes = provider.classes.len(), "Loaded schema");
        Ok(provider)
    }

    /// Names of the known classes.
    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(|c| c.class_name.as_str())
    }

    /// The schema of `class_name`, if known.
    #[must_use]
    pub fn class(&self, class_name: &str) -> Option<&ClassSchema> {
        self.classes.iter().find(|c| c.class_name == class_name)
    }
}

impl SchemaProvider for StaticSchemaProvider {
    fn fields(&self, class_name: &str) -> Result<Vec<String>> {
        self.class(class_name)
            .map(ClassSchema::field_names)
            .ok_or_else(|| Error::UnknownClass(class_name.to_string()))
    }
}
