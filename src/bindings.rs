//! Variable bindings and the files they are loaded from.
//! Bindings files may be written as JSON or YAML; both are read into the same
//! [`Value`] model, with an explicit `$range` form for integer ranges.

use std::ops::RangeInclusive;
use std::path::Path;

use indexmap::IndexMap;
use log::debug;

use crate::constants::RANGE_KEY;
use crate::error::{Error, Result};
use crate::value::Value;

/// Mapping from variable name to bound value.
pub type Bindings = IndexMap<String, Value>;

/// Parses `A..B` or `A..=B` as an inclusive integer range.
pub fn parse_range(text: &str) -> Option<RangeInclusive<i64>> {
    let (start, end) = text.trim().split_once("..")?;
    let end = end.strip_prefix('=').unwrap_or(end);
    Some(start.trim().parse().ok()?..=end.trim().parse().ok()?)
}

fn range_from_json(bounds: &serde_json::Value) -> Result<RangeInclusive<i64>> {
    let range = match bounds {
        serde_json::Value::String(text) => parse_range(text),
        serde_json::Value::Array(bounds) => match bounds.as_slice() {
            [start, end] => start.as_i64().zip(end.as_i64()).map(|(s, e)| s..=e),
            _ => None,
        },
        _ => None,
    };
    range.ok_or_else(|| {
        Error::ConfigError(format!(
            "'{}' expects \"START..END\" or [START, END], got {}",
            RANGE_KEY, bounds
        ))
    })
}

/// Converts parsed JSON/YAML data into a [`Value`].
///
/// A mapping whose only key is `$range` becomes an integer range.
pub fn value_from_json(value: serde_json::Value) -> Result<Value> {
    Ok(match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => match (n.as_i64(), n.as_u64()) {
            (Some(i), _) => Value::Int(i),
            (None, Some(u)) => {
                return Err(Error::ConfigError(format!(
                    "integer {} is out of range (largest is {})",
                    u,
                    i64::MAX
                )))
            }
            (None, None) => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        serde_json::Value::String(s) => Value::Str(s),
        serde_json::Value::Array(items) => Value::Seq(
            items
                .into_iter()
                .map(value_from_json)
                .collect::<Result<Vec<_>>>()?,
        ),
        serde_json::Value::Object(map) => {
            if map.len() == 1 {
                if let Some(bounds) = map.get(RANGE_KEY) {
                    return Ok(Value::Range(range_from_json(bounds)?));
                }
            }
            let mut entries = IndexMap::with_capacity(map.len());
            for (key, item) in map {
                entries.insert(key, value_from_json(item)?);
            }
            Value::Map(entries)
        }
    })
}

/// Parses bindings file content. JSON is tried first, then YAML.
pub fn parse_bindings(content: &str) -> Result<Bindings> {
    let raw: IndexMap<String, serde_json::Value> = match serde_json::from_str(content) {
        Ok(v) => v,
        Err(_) => serde_yaml::from_str(content)
            .map_err(|e| Error::ConfigError(format!("Invalid bindings format: {}", e)))?,
    };

    let mut bindings = Bindings::with_capacity(raw.len());
    for (key, value) in raw {
        bindings.insert(key, value_from_json(value)?);
    }
    Ok(bindings)
}

/// Loads bindings from a JSON or YAML file.
pub fn load_bindings_file<P: AsRef<Path>>(path: P) -> Result<Bindings> {
    let path = path.as_ref();
    debug!("Loading bindings from {}", path.display());
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::ConfigError(format!("cannot read bindings file '{}': {}", path.display(), e))
    })?;
    parse_bindings(&content)
}

/// Parses a `KEY=VALUE` override.
///
/// The value is read as JSON when possible (`n=3`, `tags=["a","b"]`), as a range
/// when it looks like `1..20`, and as a plain string otherwise.
pub fn parse_assignment(assignment: &str) -> Result<(String, Value)> {
    let (key, raw) = assignment.split_once('=').ok_or_else(|| {
        Error::ConfigError(format!("expected KEY=VALUE, got '{}'", assignment))
    })?;
    let key = key.trim();
    if key.is_empty() {
        return Err(Error::ConfigError(format!(
            "missing variable name in '{}'",
            assignment
        )));
    }

    let value = if let Some(range) = parse_range(raw) {
        Value::Range(range)
    } else if let Ok(json) = serde_json::from_str::<serde_json::Value>(raw) {
        value_from_json(json)?
    } else {
        Value::Str(raw.to_string())
    };
    Ok((key.to_string(), value))
}

/// Returns `base` with every entry of `overlay` inserted over it.
pub fn merge(base: &Bindings, overlay: &Bindings) -> Bindings {
    let mut merged = base.clone();
    for (key, value) in overlay {
        merged.insert(key.clone(), value.clone());
    }
    merged
}
