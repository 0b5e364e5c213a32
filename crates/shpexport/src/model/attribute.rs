//! Attribute columns and values supplied by the host's attribute model.
//!
//! Provides typed column metadata plus a per-entity row of values.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Declared type of an attribute column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeType {
    /// Free text
    String,
    /// 8-bit integer
    Byte,
    /// 16-bit integer
    Short,
    /// 32-bit integer
    Int,
    /// 64-bit integer
    Long,
    /// Single precision float
    Float,
    /// Double precision float
    Double,
    /// Boolean flag
    Boolean,
    /// Single character
    Char,
    /// List of strings
    ListString,
    /// List of integers
    ListInt,
    /// List of 64-bit integers
    ListLong,
    /// List of single precision floats
    ListFloat,
    /// List of double precision floats
    ListDouble,
    /// List of booleans
    ListBoolean,
}

impl AttributeType {
    /// Whether values of this type are lists.
    ///
    /// List columns are never exported.
    pub fn is_list_type(self) -> bool {
        matches!(
            self,
            AttributeType::ListString
                | AttributeType::ListInt
                | AttributeType::ListLong
                | AttributeType::ListFloat
                | AttributeType::ListDouble
                | AttributeType::ListBoolean
        )
    }

    /// Whether values of this type are whole numbers.
    pub fn is_integral(self) -> bool {
        matches!(
            self,
            AttributeType::Byte | AttributeType::Short | AttributeType::Int | AttributeType::Long
        )
    }

    /// Whether values of this type are floating point numbers.
    pub fn is_floating(self) -> bool {
        matches!(self, AttributeType::Float | AttributeType::Double)
    }

    /// Whether values of this type are text.
    pub fn is_textual(self) -> bool {
        matches!(self, AttributeType::String | AttributeType::Char)
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AttributeType::String => "String",
            AttributeType::Byte => "Byte",
            AttributeType::Short => "Short",
            AttributeType::Int => "Int",
            AttributeType::Long => "Long",
            AttributeType::Float => "Float",
            AttributeType::Double => "Double",
            AttributeType::Boolean => "Boolean",
            AttributeType::Char => "Char",
            AttributeType::ListString => "ListString",
            AttributeType::ListInt => "ListInt",
            AttributeType::ListLong => "ListLong",
            AttributeType::ListFloat => "ListFloat",
            AttributeType::ListDouble => "ListDouble",
            AttributeType::ListBoolean => "ListBoolean",
        };
        f.write_str(name)
    }
}

/// A column of the host's node or edge attribute table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeColumn {
    /// Column title, also the key used to look values up in a row
    pub title: String,
    /// Declared value type
    pub attribute_type: AttributeType,
}

impl AttributeColumn {
    /// Create a new column.
    pub fn new(title: impl Into<String>, attribute_type: AttributeType) -> Self {
        Self {
            title: title.into(),
            attribute_type,
        }
    }

    /// Whether this column holds list values.
    pub fn is_list(&self) -> bool {
        self.attribute_type.is_list_type()
    }
}

/// Strongly-typed attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    /// Text value
    String(String),
    /// Any integral value (byte through long)
    Int(i64),
    /// Any floating point value
    Float(f64),
    /// Boolean flag
    Bool(bool),
    /// Single character
    Char(char),
    /// List of strings
    StringList(Vec<String>),
    /// List of integers
    IntList(Vec<i64>),
    /// List of floats
    FloatList(Vec<f64>),
    /// List of booleans
    BoolList(Vec<bool>),
    /// Explicit null/absence of value
    Null,
}

impl AttributeValue {
    /// Whether this value can be stored in a column of the given type
    /// without conversion. `Null` fits every type.
    pub fn fits(&self, attribute_type: AttributeType) -> bool {
        match self {
            AttributeValue::Null => true,
            AttributeValue::String(_) => attribute_type == AttributeType::String,
            AttributeValue::Char(_) => attribute_type == AttributeType::Char,
            AttributeValue::Int(_) => attribute_type.is_integral(),
            AttributeValue::Float(_) => attribute_type.is_floating(),
            AttributeValue::Bool(_) => attribute_type == AttributeType::Boolean,
            AttributeValue::StringList(_) => attribute_type == AttributeType::ListString,
            AttributeValue::IntList(_) => {
                matches!(attribute_type, AttributeType::ListInt | AttributeType::ListLong)
            }
            AttributeValue::FloatList(_) => {
                matches!(attribute_type, AttributeType::ListFloat | AttributeType::ListDouble)
            }
            AttributeValue::BoolList(_) => attribute_type == AttributeType::ListBoolean,
        }
    }

    /// Short name of the runtime variant, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            AttributeValue::String(_) => "string",
            AttributeValue::Int(_) => "int",
            AttributeValue::Float(_) => "float",
            AttributeValue::Bool(_) => "bool",
            AttributeValue::Char(_) => "char",
            AttributeValue::StringList(_) => "string list",
            AttributeValue::IntList(_) => "int list",
            AttributeValue::FloatList(_) => "float list",
            AttributeValue::BoolList(_) => "bool list",
            AttributeValue::Null => "null",
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::String(s) => f.write_str(s),
            AttributeValue::Int(i) => write!(f, "{i}"),
            AttributeValue::Float(v) => write!(f, "{v}"),
            AttributeValue::Bool(b) => write!(f, "{b}"),
            AttributeValue::Char(c) => write!(f, "{c}"),
            AttributeValue::StringList(v) => write!(f, "{}", v.join(";")),
            AttributeValue::IntList(v) => write!(f, "{}", join_display(v)),
            AttributeValue::FloatList(v) => write!(f, "{}", join_display(v)),
            AttributeValue::BoolList(v) => write!(f, "{}", join_display(v)),
            AttributeValue::Null => f.write_str("null"),
        }
    }
}

fn join_display<T: fmt::Display>(values: &[T]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(";")
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::String(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::String(value.to_string())
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Int(value)
    }
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self {
        AttributeValue::Int(value as i64)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Float(value)
    }
}

impl From<f32> for AttributeValue {
    fn from(value: f32) -> Self {
        AttributeValue::Float(value as f64)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

impl From<char> for AttributeValue {
    fn from(value: char) -> Self {
        AttributeValue::Char(value)
    }
}

impl From<Vec<String>> for AttributeValue {
    fn from(value: Vec<String>) -> Self {
        AttributeValue::StringList(value)
    }
}

impl From<Vec<i64>> for AttributeValue {
    fn from(value: Vec<i64>) -> Self {
        AttributeValue::IntList(value)
    }
}

impl From<Vec<f64>> for AttributeValue {
    fn from(value: Vec<f64>) -> Self {
        AttributeValue::FloatList(value)
    }
}

/// Attribute values of a single node or edge, keyed by column title.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeRow {
    data: HashMap<String, AttributeValue>,
}

impl AttributeRow {
    /// Create a new empty row.
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
        }
    }

    /// Builder pattern: add a value and return self.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Insert a value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<AttributeValue>) {
        self.data.insert(key.into(), value.into());
    }

    /// Get a value by column title.
    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.data.get(key)
    }

    /// Get a value by column title, treating absence as [`AttributeValue::Null`].
    pub fn value_or_null(&self, key: &str) -> AttributeValue {
        self.data.get(key).cloned().unwrap_or(AttributeValue::Null)
    }

    /// Check if a value exists.
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Get the number of values.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the row is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Iterate over all values.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &AttributeValue)> {
        self.data.iter()
    }

    /// Type-safe getter for string values.
    pub fn get_string(&self, key: &str) -> Option<&str> {
        match self.data.get(key) {
            Some(AttributeValue::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Type-safe getter for integer values.
    pub fn get_int(&self, key: &str) -> Option<i64> {
        match self.data.get(key) {
            Some(AttributeValue::Int(i)) => Some(*i),
            _ => None,
        }
    }

    /// Type-safe getter for float values.
    pub fn get_float(&self, key: &str) -> Option<f64> {
        match self.data.get(key) {
            Some(AttributeValue::Float(f)) => Some(*f),
            _ => None,
        }
    }

    /// Type-safe getter for boolean values.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.data.get(key) {
            Some(AttributeValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }
}

impl FromIterator<(String, AttributeValue)> for AttributeRow {
    fn from_iter<T: IntoIterator<Item = (String, AttributeValue)>>(iter: T) -> Self {
        Self {
            data: HashMap::from_iter(iter),
        }
    }
}
