//! Filename placeholders.
//!
//! A placeholder is written `%name%`, optionally with a run of leading zeros that
//! sets a zero-pad width (`%0000chap_count%` pads to four digits) and an accessor
//! resolved against the bound value (`%person.name%`).

use std::sync::LazyLock;

use log::debug;
use regex::Regex;

use crate::bindings::Bindings;
use crate::constants::PLACEHOLDER_DELIMITER;
use crate::error::{Error, Result};
use crate::value::Value;

static PLACEHOLDER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"%(0+)?([A-Za-z][A-Za-z0-9_]*)(?:\.([A-Za-z][A-Za-z0-9_]*))?%")
        .expect("placeholder pattern is a valid regex")
});

/// How an accessor is resolved against a bound value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    /// Entry of a keyed structure.
    MapKey(String),
    /// Named operation of an opaque object.
    Operation(String),
}

impl Access {
    /// Chooses key lookup when `value` is a map holding `accessor`, and an
    /// operation call when `value` is an object. Anything else cannot be accessed.
    pub fn for_value(value: &Value, accessor: &str) -> Option<Self> {
        match value {
            Value::Map(map) if map.contains_key(accessor) => {
                Some(Access::MapKey(accessor.to_string()))
            }
            Value::Object(_) => Some(Access::Operation(accessor.to_string())),
            _ => None,
        }
    }

    pub fn apply(&self, value: &Value) -> Option<Value> {
        match (self, value) {
            (Access::MapKey(key), Value::Map(map)) => map.get(key).cloned(),
            (Access::Operation(operation), Value::Object(object)) => object.invoke(operation),
            _ => None,
        }
    }
}

/// One placeholder occurrence parsed from a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub name: String,
    pub pad_width: Option<usize>,
    pub accessor: Option<String>,
    literal: String,
}

impl Placeholder {
    pub fn new(name: impl Into<String>) -> Self {
        let mut placeholder = Self {
            name: name.into(),
            pad_width: None,
            accessor: None,
            literal: String::new(),
        };
        placeholder.literal = placeholder.compose_literal();
        placeholder
    }

    pub fn with_accessor(mut self, accessor: impl Into<String>) -> Self {
        self.accessor = Some(accessor.into());
        self.literal = self.compose_literal();
        self
    }

    pub fn with_pad_width(mut self, width: usize) -> Self {
        self.pad_width = Some(width).filter(|w| *w > 0);
        self.literal = self.compose_literal();
        self
    }

    /// The exact text of the placeholder as it appears in a path.
    pub fn literal(&self) -> &str {
        &self.literal
    }

    fn compose_literal(&self) -> String {
        let zeros = "0".repeat(self.pad_width.unwrap_or(0));
        let accessor = self
            .accessor
            .as_ref()
            .map(|a| format!(".{}", a))
            .unwrap_or_default();
        format!(
            "{d}{zeros}{name}{accessor}{d}",
            d = PLACEHOLDER_DELIMITER,
            name = self.name
        )
    }

    /// Resolves the accessor, if any. `Ok(None)` means the result is null.
    fn resolve(&self, value: &Value) -> Result<Option<Value>> {
        let Some(accessor) = &self.accessor else {
            return Ok(Some(value.clone()));
        };
        let access =
            Access::for_value(value, accessor).ok_or_else(|| Error::UnknownAccessor {
                name: self.name.clone(),
                accessor: accessor.clone(),
            })?;
        match access.apply(value) {
            Some(Value::Null) => Ok(None),
            Some(resolved) => Ok(Some(resolved)),
            None => Err(Error::UnknownAccessor {
                name: self.name.clone(),
                accessor: accessor.clone(),
            }),
        }
    }

    /// Text that replaces this placeholder for `value`.
    ///
    /// Returns `Ok(None)` when the value (or the accessor's result) is null.
    pub fn render_value(&self, value: Option<&Value>) -> Result<Option<String>> {
        let Some(value) = value.filter(|v| !v.is_null()) else {
            return Ok(None);
        };
        let Some(resolved) = self.resolve(value)? else {
            return Ok(None);
        };

        if let Some(width) = self.pad_width {
            let number = resolved.as_integer().ok_or_else(|| Error::FormatError {
                placeholder: self.literal.clone(),
                reason: format!("zero padding requires an integer, got a {}", resolved.kind()),
            })?;
            return Ok(Some(format!("{:0width$}", number, width = width)));
        }

        resolved.path_text().map(Some).ok_or_else(|| Error::FormatError {
            placeholder: self.literal.clone(),
            reason: format!("a {} cannot be written into a path", resolved.kind()),
        })
    }

    /// Replaces every occurrence of this placeholder in `path`.
    ///
    /// Returns `Ok(None)` when substitution is refused because the value is null;
    /// the caller must not produce output for `path`.
    pub fn substitute(&self, path: &str, value: Option<&Value>) -> Result<Option<String>> {
        Ok(self
            .render_value(value)?
            .map(|text| path.replace(&self.literal, &text)))
    }
}

/// Every syntactically valid placeholder in `path`, left to right.
pub fn parse_all(path: &str) -> Vec<Placeholder> {
    PLACEHOLDER_PATTERN
        .captures_iter(path)
        .map(|caps| Placeholder {
            name: caps[2].to_string(),
            pad_width: caps.get(1).map(|zeros| zeros.as_str().len()),
            accessor: caps.get(3).map(|a| a.as_str().to_string()),
            literal: caps[0].to_string(),
        })
        .collect()
}

/// Placeholders in `path` whose name is bound in `bindings`.
///
/// Unbound placeholders are dropped and their text survives substitution verbatim.
pub fn parse(path: &str, bindings: &Bindings) -> Vec<Placeholder> {
    parse_all(path)
        .into_iter()
        .filter(|placeholder| {
            let bound = bindings.contains_key(&placeholder.name);
            if !bound {
                debug!("Placeholder {} in {} is not bound", placeholder.literal, path);
            }
            bound
        })
        .collect()
}

/// Placeholders in `path` whose name is not bound in `bindings`.
pub fn unbound(path: &str, bindings: &Bindings) -> Vec<Placeholder> {
    parse_all(path)
        .into_iter()
        .filter(|placeholder| !bindings.contains_key(&placeholder.name))
        .collect()
}

/// Substitutes each placeholder in order with its value from `bindings`.
///
/// Returns `Ok(None)` ("no destination") if any placeholder's value is null.
pub fn fill_all(
    path: &str,
    placeholders: &[Placeholder],
    bindings: &Bindings,
) -> Result<Option<String>> {
    let mut filled = path.to_string();
    for placeholder in placeholders {
        match placeholder.substitute(&filled, bindings.get(&placeholder.name))? {
            Some(next) => filled = next,
            None => return Ok(None),
        }
    }
    Ok(Some(filled))
}
