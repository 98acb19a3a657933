//! Values that variables can be bound to.
//!
//! A value is a scalar, a keyed structure, an enumerable sequence (a list or an
//! inclusive integer range), or an opaque object that exposes named operations
//! through [`Capabilities`]. Enumerable values are what make a filename fan out.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::RangeInclusive;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

/// Named operations exposed by an opaque bound value.
///
/// Placeholders such as `%person.name%` and template expressions such as
/// `{{ person.name }}` resolve through [`Capabilities::invoke`] when the bound
/// value is an [`Value::Object`].
pub trait Capabilities: fmt::Debug + Send + Sync {
    /// Invokes the named operation, or returns `None` if the object has no such operation.
    fn invoke(&self, operation: &str) -> Option<Value>;

    /// Text used when the object itself is substituted into a path.
    fn to_path_text(&self) -> Option<String> {
        None
    }
}

#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Map(IndexMap<String, Value>),
    Seq(Vec<Value>),
    /// Inclusive integer range; enumerable like [`Value::Seq`].
    Range(RangeInclusive<i64>),
    Object(Arc<dyn Capabilities>),
}

impl Value {
    /// Wraps an opaque object.
    pub fn object<T: Capabilities + 'static>(object: T) -> Self {
        Value::Object(Arc::new(object))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Whether binding a filename variable to this value causes fan-out.
    pub fn is_enumerable(&self) -> bool {
        matches!(self, Value::Seq(_) | Value::Range(_))
    }

    /// The elements of an enumerable value in order, or `None` for scalars.
    pub fn elements(&self) -> Option<Vec<Value>> {
        match self {
            Value::Seq(items) => Some(items.clone()),
            Value::Range(range) => Some(range.clone().map(Value::Int).collect()),
            _ => None,
        }
    }

    /// The value as a base-10 integer, if it is representable as one.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Float(f)
                if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 =>
            {
                Some(*f as i64)
            }
            Value::Str(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Text written into a path for this value. Structures and sequences have none.
    pub fn path_text(&self) -> Option<String> {
        match self {
            Value::Bool(b) => Some(b.to_string()),
            Value::Int(i) => Some(i.to_string()),
            Value::Float(f) => Some(f.to_string()),
            Value::Str(s) => Some(s.clone()),
            Value::Object(object) => object.to_path_text(),
            Value::Null | Value::Map(_) | Value::Seq(_) | Value::Range(_) => None,
        }
    }

    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Map(_) => "map",
            Value::Seq(_) => "sequence",
            Value::Range(_) => "range",
            Value::Object(_) => "object",
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Seq(a), Value::Seq(b)) => a == b,
            (Value::Range(a), Value::Range(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<RangeInclusive<i64>> for Value {
    fn from(value: RangeInclusive<i64>) -> Self {
        Value::Range(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Value::Seq(value.into_iter().map(Into::into).collect())
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(value: IndexMap<String, Value>) -> Self {
        Value::Map(value)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Str(s) => serializer.serialize_str(s),
            Value::Map(map) => map.serialize(serializer),
            Value::Seq(items) => items.serialize(serializer),
            Value::Range(range) => {
                serializer.collect_str(&format_args!("{}..{}", range.start(), range.end()))
            }
            Value::Object(object) => match object.to_path_text() {
                Some(text) => serializer.serialize_str(&text),
                None => serializer.collect_str(&format_args!("{:?}", object)),
            },
        }
    }
}

/// Exposes an opaque object to templates: attribute lookups invoke its operations.
#[derive(Debug)]
struct TemplateObject(Arc<dyn Capabilities>);

impl minijinja::value::Object for TemplateObject {
    fn get_value(self: &Arc<Self>, key: &minijinja::Value) -> Option<minijinja::Value> {
        let operation = key.as_str()?;
        self.0
            .invoke(operation)
            .map(|value| minijinja::Value::from(&value))
    }

    fn render(self: &Arc<Self>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.to_path_text() {
            Some(text) => f.write_str(&text),
            None => write!(f, "{:?}", self.0),
        }
    }
}

impl From<&Value> for minijinja::Value {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => minijinja::Value::from(()),
            Value::Bool(b) => minijinja::Value::from(*b),
            Value::Int(i) => minijinja::Value::from(*i),
            Value::Float(f) => minijinja::Value::from(*f),
            Value::Str(s) => minijinja::Value::from(s.as_str()),
            Value::Map(map) => minijinja::Value::from(
                map.iter()
                    .map(|(key, item)| (key.clone(), minijinja::Value::from(item)))
                    .collect::<BTreeMap<String, minijinja::Value>>(),
            ),
            Value::Seq(items) => minijinja::Value::from(
                items.iter().map(minijinja::Value::from).collect::<Vec<_>>(),
            ),
            Value::Range(range) => minijinja::Value::from(
                range.clone().map(minijinja::Value::from).collect::<Vec<_>>(),
            ),
            Value::Object(object) => {
                minijinja::Value::from_object(TemplateObject(Arc::clone(object)))
            }
        }
    }
}
