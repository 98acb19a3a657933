//! Template body rendering.
//! Bindings are handed to the engine explicitly for every call; rendering one
//! node never mutates state seen by another.
use std::collections::BTreeMap;

use crate::bindings::Bindings;
use crate::constants::RENDER_ERROR_HEADER;
use crate::error::{Error, Result};
use minijinja::{Environment, UndefinedBehavior};

/// Trait for template rendering engines.
pub trait TemplateRenderer {
    /// Renders `template` with every binding exposed as a named variable.
    ///
    /// # Arguments
    /// * `path` - Where the template came from, used in error messages
    /// * `template` - Template text to render
    /// * `bindings` - Variables visible inside the template
    fn render(&self, path: &str, template: &str, bindings: &Bindings) -> Result<String>;
}

/// What to do when a template fails to render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum RenderErrorPolicy {
    /// Stop the whole operation with [`Error::RenderError`].
    Abort,
    /// Write a diagnostic describing the failure in place of the file's content.
    #[default]
    Embed,
}

/// MiniJinja-based template rendering engine.
#[derive(Debug, Clone)]
pub struct MiniJinjaRenderer {
    env: Environment<'static>,
}

impl MiniJinjaRenderer {
    /// Creates a renderer where undefined variables render as empty text.
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);
        Self { env }
    }

    /// Creates a renderer that fails on any undefined variable.
    pub fn strict() -> Self {
        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        Self { env }
    }
}

impl Default for MiniJinjaRenderer {
    fn default() -> Self {
        MiniJinjaRenderer::new()
    }
}

/// Builds the template context from bindings.
pub fn template_context(bindings: &Bindings) -> minijinja::Value {
    minijinja::Value::from(
        bindings
            .iter()
            .map(|(name, value)| (name.clone(), minijinja::Value::from(value)))
            .collect::<BTreeMap<String, minijinja::Value>>(),
    )
}

impl TemplateRenderer for MiniJinjaRenderer {
    fn render(&self, path: &str, template: &str, bindings: &Bindings) -> Result<String> {
        self.env
            .render_str(template, template_context(bindings))
            .map_err(|e| Error::RenderError {
                path: path.to_string(),
                message: e.to_string(),
            })
    }
}

/// Text written in place of a template that failed to render.
pub fn render_error_payload(path: &str, bindings: &Bindings, error: &Error) -> String {
    let bindings_text = serde_json::to_string_pretty(bindings)
        .unwrap_or_else(|e| format!("<bindings could not be displayed: {}>", e));
    let message = match error {
        Error::RenderError { message, .. } => message.clone(),
        other => other.to_string(),
    };
    [
        RENDER_ERROR_HEADER.to_string(),
        String::new(),
        format!("path: {}", path),
        String::new(),
        format!("bindings: {}", bindings_text),
        String::new(),
        format!("error: {}", message),
        String::new(),
    ]
    .join("\n")
}
