//! Cartesian expansion of the enumerable variables referenced by one path.

use indexmap::IndexMap;

use crate::bindings::Bindings;
use crate::placeholder::Placeholder;
use crate::value::Value;

/// One concrete scalar per variable referenced by a path, merged into a
/// parent's bindings to narrow them for a child node.
pub type Overlay = IndexMap<String, Value>;

/// What a path's placeholders mean for the node that carries it.
#[derive(Debug, Clone, PartialEq)]
pub enum Expansion {
    /// No referenced variable is enumerable: keep the node as it is.
    Leaf,
    /// One child per overlay, in emission order.
    FanOut(Vec<Overlay>),
    /// An enumerable variable has no elements: the node produces nothing.
    Empty,
}

/// Distinct placeholder names in order of first appearance.
pub fn distinct_names(placeholders: &[Placeholder]) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::with_capacity(placeholders.len());
    for placeholder in placeholders {
        if !names.contains(&placeholder.name.as_str()) {
            names.push(&placeholder.name);
        }
    }
    names
}

/// Classifies the placeholders of a path and computes its overlays.
///
/// Overlays follow nested-loop order with the last distinct name varying
/// fastest. Every distinct name appears in every overlay, scalar ones included.
/// Placeholders whose name is absent from `bindings` are ignored.
pub fn expansion(placeholders: &[Placeholder], bindings: &Bindings) -> Expansion {
    let axes: Vec<(&str, &Value)> = distinct_names(placeholders)
        .into_iter()
        .filter_map(|name| bindings.get(name).map(|value| (name, value)))
        .collect();

    if !axes.iter().any(|(_, value)| value.is_enumerable()) {
        return Expansion::Leaf;
    }

    let mut overlays = vec![Overlay::new()];
    for (name, value) in axes {
        let choices = value.elements().unwrap_or_else(|| vec![value.clone()]);
        let mut next = Vec::with_capacity(overlays.len() * choices.len());
        for overlay in &overlays {
            for choice in &choices {
                let mut narrowed = overlay.clone();
                narrowed.insert(name.to_string(), choice.clone());
                next.push(narrowed);
            }
        }
        overlays = next;
    }

    if overlays.is_empty() {
        Expansion::Empty
    } else {
        Expansion::FanOut(overlays)
    }
}

/// Overlays for a path, or an empty list when no fan-out is needed.
///
/// An empty list is returned both when nothing is enumerable and when an
/// enumerable variable has zero elements; use [`expansion`] to tell them apart.
pub fn combinations(placeholders: &[Placeholder], bindings: &Bindings) -> Vec<Overlay> {
    match expansion(placeholders, bindings) {
        Expansion::FanOut(overlays) => overlays,
        Expansion::Leaf | Expansion::Empty => Vec::new(),
    }
}
