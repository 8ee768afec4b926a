//! Schema provider interface and the in-memory type registry.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::DataType;

/// Read-only schema view consumed during binding.
///
/// The binder holds a borrowed reference to a provider for the duration of
/// one bind call and never mutates or stores it. Providers must stay
/// immutable while a request is being compiled.
pub trait SchemaProvider {
    /// Resolves a declared property on the named type.
    ///
    /// `None` means the property is not declared; whether that is an error
    /// depends on the type's openness.
    fn resolve_property(&self, type_name: &str, property: &str) -> Option<PropertyType>;

    /// Returns whether the named type accepts undeclared (dynamic) properties.
    fn is_open_type(&self, type_name: &str) -> bool;
}

/// Declared type of a property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyType {
    /// Primitive-typed property.
    Primitive { data_type: DataType, nullable: bool },
    /// Structural property navigating to another declared type.
    Complex(String),
}

/// A named property declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDef {
    /// Property name (case-sensitive).
    pub name: String,
    /// Declared type.
    pub property_type: PropertyType,
}

impl PropertyDef {
    /// Declares a nullable primitive property.
    #[must_use]
    pub fn primitive(name: impl Into<String>, data_type: DataType) -> Self {
        PropertyDef {
            name: name.into(),
            property_type: PropertyType::Primitive {
                data_type,
                nullable: true,
            },
        }
    }

    /// Declares a non-nullable primitive property.
    #[must_use]
    pub fn required(name: impl Into<String>, data_type: DataType) -> Self {
        PropertyDef {
            name: name.into(),
            property_type: PropertyType::Primitive {
                data_type,
                nullable: false,
            },
        }
    }

    /// Declares a structural property of the named complex type.
    #[must_use]
    pub fn complex(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        PropertyDef {
            name: name.into(),
            property_type: PropertyType::Complex(type_name.into()),
        }
    }
}

/// A declared type: named properties plus an openness flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSchema {
    /// Type name.
    pub name: String,
    /// Declared properties.
    pub properties: Vec<PropertyDef>,
    /// Whether undeclared properties resolve dynamically at evaluation time.
    pub open: bool,
}

impl TypeSchema {
    /// Creates a closed type with the given properties.
    #[must_use]
    pub fn new(name: impl Into<String>, properties: Vec<PropertyDef>) -> Self {
        TypeSchema {
            name: name.into(),
            properties,
            open: false,
        }
    }

    /// Marks the type as open.
    #[must_use]
    pub fn open(mut self) -> Self {
        self.open = true;
        self
    }

    /// Looks up a declared property by name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&PropertyDef> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// Central registry of declared types.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaRegistry {
    types: HashMap<String, TypeSchema>,
}

impl SchemaRegistry {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        SchemaRegistry {
            types: HashMap::new(),
        }
    }

    /// Registers a type schema.
    ///
    /// # Errors
    ///
    /// Returns an error if a type with the same name already exists.
    pub fn define_type(&mut self, schema: TypeSchema) -> Result<()> {
        if self.types.contains_key(&schema.name) {
            return Err(Error::Schema(format!(
                "type '{}' already exists",
                schema.name
            )));
        }
        self.types.insert(schema.name.clone(), schema);
        Ok(())
    }

    /// Retrieves a type schema by name.
    #[must_use]
    pub fn get_type(&self, name: &str) -> Option<&TypeSchema> {
        self.types.get(name)
    }

    /// Checks whether a type is registered.
    #[must_use]
    pub fn type_exists(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Returns all registered type names.
    #[must_use]
    pub fn type_names(&self) -> Vec<&str> {
        self.types.keys().map(String::as_str).collect()
    }
}

impl SchemaProvider for SchemaRegistry {
    fn resolve_property(&self, type_name: &str, property: &str) -> Option<PropertyType> {
        self.types
            .get(type_name)
            .and_then(|t| t.property(property))
            .map(|p| p.property_type.clone())
    }

    fn is_open_type(&self, type_name: &str) -> bool {
        self.types.get(type_name).is_some_and(|t| t.open)
    }
}
