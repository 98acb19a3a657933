//! Writing a built template tree to disk.
//! Nodes are visited depth first, parents before children; each directory is
//! created if absent and each leaf is rendered and written to its destination.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::renderer::{RenderErrorPolicy, TemplateRenderer};
use crate::tree::{NodeId, NodeKind, Output, TemplateTree, TreeOptions};

/// Options shared by every generation entry point.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub tree: TreeOptions,
    pub on_render_error: RenderErrorPolicy,
}

/// What a write pass produced.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationReport {
    pub output_dir: PathBuf,
    pub files_rendered: Vec<PathBuf>,
    pub files_copied: Vec<PathBuf>,
    pub directories_created: Vec<PathBuf>,
    /// Source paths of nodes that had no destination because of a null binding.
    pub skipped: Vec<PathBuf>,
    /// Destinations that received a render diagnostic instead of content.
    pub render_failures: Vec<PathBuf>,
    /// Destinations written by more than one node; the later node's content is kept.
    pub overwritten: Vec<PathBuf>,
}

impl GenerationReport {
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    /// Number of files written, diagnostics included.
    pub fn files_written(&self) -> usize {
        self.files_rendered.len() + self.files_copied.len() + self.render_failures.len()
    }
}

/// Ensures the output directory is safe to write to.
///
/// # Errors
/// * `Error::OutputDirectoryExistsError` if the directory exists and `force` is false
pub fn ensure_output_dir<P: AsRef<Path>>(output_dir: P, force: bool) -> Result<PathBuf> {
    let output_dir = output_dir.as_ref();
    if output_dir.exists() && !force {
        return Err(Error::OutputDirectoryExistsError {
            output_dir: output_dir.display().to_string(),
        });
    }
    Ok(output_dir.to_path_buf())
}

fn create_dir_all(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|source| Error::WriteError {
        path: path.to_path_buf(),
        source,
    })
}

fn write_file(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }
    fs::write(path, content).map_err(|source| Error::WriteError {
        path: path.to_path_buf(),
        source,
    })
}

fn source_label(tree: &TemplateTree, id: NodeId) -> PathBuf {
    tree.node(id)
        .source()
        .path()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("<text>"))
}

/// Writes a leaf node's content to `target` and records it in `report`.
fn write_leaf(
    tree: &TemplateTree,
    id: NodeId,
    target: PathBuf,
    renderer: &dyn TemplateRenderer,
    policy: RenderErrorPolicy,
    report: &mut GenerationReport,
) -> Result<()> {
    let output = tree.render(id, renderer, policy)?;
    let list = match &output {
        Output::Rendered(_) => &mut report.files_rendered,
        Output::Copied(_) => &mut report.files_copied,
        Output::Failed(_) => &mut report.render_failures,
    };
    debug!("Writing file: {}", target.display());
    write_file(&target, &output.into_bytes())?;
    list.push(target);
    Ok(())
}

/// Writes every node of `tree` under `dest_root`.
///
/// # Errors
/// * `Error::WriteError` if a directory or file cannot be written; the pass stops there
/// * `Error::RenderError` under [`RenderErrorPolicy::Abort`]
pub fn write_tree(
    tree: &TemplateTree,
    dest_root: &Path,
    renderer: &dyn TemplateRenderer,
    policy: RenderErrorPolicy,
) -> Result<GenerationReport> {
    let mut report = GenerationReport::new(dest_root);
    let mut claimed: HashSet<PathBuf> = HashSet::new();

    for id in tree.preorder() {
        let kind = tree.node(id).kind();
        if kind == NodeKind::Expanded {
            continue;
        }

        let Some(target) = tree.destination(id, Some(dest_root))? else {
            let source = source_label(tree, id);
            warn!(
                "node not written: missing destination for {} (a filename variable is null)",
                source.display()
            );
            report.skipped.push(source);
            continue;
        };

        match kind {
            NodeKind::Directory => {
                debug!("Creating directory: {}", target.display());
                create_dir_all(&target)?;
                report.directories_created.push(target);
            }
            NodeKind::File => {
                if !claimed.insert(target.clone()) {
                    warn!(
                        "{} is written by more than one node; the later one wins",
                        target.display()
                    );
                    report.overwritten.push(target.clone());
                }
                write_leaf(tree, id, target, renderer, policy, &mut report)?;
            }
            NodeKind::Expanded => {}
        }
    }

    Ok(report)
}

/// Writes a tree whose root is a single file to exactly `target`.
///
/// Fails with `Error::ConfigError` if the file fans out into several outputs.
pub fn write_single_file(
    tree: &TemplateTree,
    target: &Path,
    renderer: &dyn TemplateRenderer,
    policy: RenderErrorPolicy,
) -> Result<GenerationReport> {
    let root = tree.root();
    let mut report = GenerationReport::new(target.parent().unwrap_or(Path::new("")));

    match tree.node(root).kind() {
        NodeKind::File => {}
        NodeKind::Expanded => {
            return Err(Error::ConfigError(format!(
                "'{}' expands into {} files; the destination must be a directory",
                source_label(tree, root).display(),
                tree.node(root).children().len()
            )))
        }
        NodeKind::Directory => {
            return Err(Error::ConfigError(format!(
                "'{}' is a directory",
                source_label(tree, root).display()
            )))
        }
    }

    if tree.destination(root, None)?.is_none() {
        let source = source_label(tree, root);
        warn!(
            "node not written: missing destination for {}",
            source.display()
        );
        report.skipped.push(source);
        return Ok(report);
    }

    write_leaf(tree, root, target.to_path_buf(), renderer, policy, &mut report)?;
    Ok(report)
}
