//! fanout clones a template directory into a destination tree.
//! Files marked as templates are rendered against named bindings, and a
//! filename holding placeholders bound to enumerable values is written once
//! per combination of those values.
//!
//! ```no_run
//! use std::path::Path;
//! use fanout::{bindings::Bindings, value::Value, write_template_tree, GenerateOptions};
//!
//! let mut bindings = Bindings::new();
//! bindings.insert("chap_count".into(), Value::from(1..=20));
//! // book/chapter-%0000chap_count%.markdown.template -> chapter-0001.markdown ...
//! let report = write_template_tree("book", Some(Path::new("out")), bindings, &GenerateOptions::default())?;
//! println!("{} files written", report.files_written());
//! # Ok::<(), fanout::error::Error>(())
//! ```

use std::path::Path;

use log::debug;

/// Bindings model and bindings file loading (JSON or YAML)
pub mod bindings;

/// Command-line interface module for the fanout binary
pub mod cli;

/// Cartesian expansion of enumerable filename variables
pub mod combination;

/// Common constants
pub mod constants;

/// Error types and handling
pub mod error;

/// Logger setup for the binary
pub mod logger;

/// Filename placeholder parsing and substitution
pub mod placeholder;

/// Write pass over a built tree
pub mod processor;

/// Template body rendering
pub mod renderer;

/// Template tree construction and destination resolution
pub mod tree;

/// Values variables are bound to
pub mod value;

use crate::bindings::Bindings;
use crate::error::Result;
use crate::renderer::MiniJinjaRenderer;
use crate::tree::TemplateTree;

pub use crate::processor::{GenerateOptions, GenerationReport};

/// Clones `source_root` into `dest_root`, rendering templates and fanning out
/// enumerable filename variables.
///
/// When `dest_root` is `None` the tree is written into a new temporary
/// directory, which is kept and reported as `output_dir`.
pub fn write_template_tree<P: AsRef<Path>>(
    source_root: P,
    dest_root: Option<&Path>,
    bindings: Bindings,
    options: &GenerateOptions,
) -> Result<GenerationReport> {
    let tree = TemplateTree::build(source_root, bindings, options.tree.clone())?;
    debug!("Built template tree with {} nodes", tree.len());

    let dest_root = match dest_root {
        Some(dest_root) => dest_root.to_path_buf(),
        None => tempfile::Builder::new()
            .prefix("fanout-")
            .tempdir()?
            .keep(),
    };

    processor::write_tree(
        &tree,
        &dest_root,
        &MiniJinjaRenderer::new(),
        options.on_render_error,
    )
}

/// Renders (or copies) one source file.
///
/// If `dest` is an existing directory, output lands inside it under the
/// file's own name with the template marker stripped and placeholders filled,
/// and enumerable filename variables fan out as usual. Otherwise `dest` is the
/// exact output path.
pub fn render_file<P: AsRef<Path>, Q: AsRef<Path>>(
    source_file: P,
    dest: Q,
    bindings: Bindings,
    options: &GenerateOptions,
) -> Result<GenerationReport> {
    let dest = dest.as_ref();
    let tree = TemplateTree::build(source_file, bindings, options.tree.clone())?;
    let renderer = MiniJinjaRenderer::new();

    if dest.is_dir() {
        processor::write_tree(&tree, dest, &renderer, options.on_render_error)
    } else {
        processor::write_single_file(&tree, dest, &renderer, options.on_render_error)
    }
}

/// Evaluates `text` as a template against `bindings`.
pub fn render_str(text: &str, bindings: Bindings, options: &GenerateOptions) -> Result<String> {
    let tree = TemplateTree::from_text(text, bindings);
    let output = tree.render(tree.root(), &MiniJinjaRenderer::new(), options.on_render_error)?;
    Ok(String::from_utf8_lossy(&output.into_bytes()).into_owned())
}
