#![allow(dead_code)]

use std::fs;
use std::path::Path;

use fanout::bindings::Bindings;
use fanout::value::{Capabilities, Value};

/// Writes `content` to `root/relative`, creating parent directories.
pub fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

pub fn bindings(entries: Vec<(&str, Value)>) -> Bindings {
    entries
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

/// Object exposing a `name` operation.
#[derive(Debug)]
pub struct Person {
    pub name: String,
}

impl Capabilities for Person {
    fn invoke(&self, operation: &str) -> Option<Value> {
        match operation {
            "name" => Some(Value::from(self.name.as_str())),
            _ => None,
        }
    }
}
