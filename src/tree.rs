//! The template tree.
//!
//! A [`TemplateTree`] mirrors the source filesystem. Every entry whose name holds
//! placeholders bound to enumerable values is fanned out into one node per value
//! combination, each carrying bindings narrowed to that combination. Nodes live
//! in an arena; parent links are indices, so ownership stays acyclic.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use walkdir::WalkDir;

use crate::bindings::{merge, Bindings};
use crate::combination::{expansion, Expansion};
use crate::constants::TEMPLATE_SUFFIXES;
use crate::error::{Error, Result};
use crate::placeholder::{self, fill_all};
use crate::renderer::{render_error_payload, RenderErrorPolicy, TemplateRenderer};

/// Handle of a node inside its [`TemplateTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Where a node's content comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeSource {
    Path(PathBuf),
    /// In-memory template text.
    Text(String),
}

impl NodeSource {
    pub fn path(&self) -> Option<&Path> {
        match self {
            NodeSource::Path(path) => Some(path),
            NodeSource::Text(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Directory,
    File,
    /// A file replaced by one child per combination; produces no output itself.
    Expanded,
}

/// How filename placeholders naming unbound variables are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum UnboundPlaceholderPolicy {
    /// Leave the placeholder text in the destination path and log a warning.
    #[default]
    Literal,
    /// Fail with [`Error::UnresolvedPlaceholder`].
    Strict,
}

#[derive(Debug, Clone)]
pub struct TreeOptions {
    /// Filename suffixes marking files to render. Stripped from destinations.
    pub template_suffixes: Vec<String>,
    pub unbound_placeholders: UnboundPlaceholderPolicy,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            template_suffixes: TEMPLATE_SUFFIXES.iter().map(|s| s.to_string()).collect(),
            unbound_placeholders: UnboundPlaceholderPolicy::default(),
        }
    }
}

#[derive(Debug)]
pub struct TemplateNode {
    source: NodeSource,
    kind: NodeKind,
    bindings: Bindings,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl TemplateNode {
    pub fn source(&self) -> &NodeSource {
        &self.source
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Content produced for a leaf node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    /// A template rendered successfully.
    Rendered(String),
    /// A plain file, byte for byte.
    Copied(Vec<u8>),
    /// A template that failed to render, replaced by a diagnostic.
    Failed(String),
}

impl Output {
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Output::Rendered(text) | Output::Failed(text) => text.into_bytes(),
            Output::Copied(bytes) => bytes,
        }
    }
}

#[derive(Debug)]
pub struct TemplateTree {
    nodes: Vec<TemplateNode>,
    options: TreeOptions,
}

impl TemplateTree {
    /// Builds the tree for `source_root`, which may be a directory or a single file.
    pub fn build<P: AsRef<Path>>(
        source_root: P,
        bindings: Bindings,
        options: TreeOptions,
    ) -> Result<Self> {
        let source_root = source_root.as_ref();
        let metadata = fs::metadata(source_root).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Error::SourceNotFound {
                path: source_root.to_path_buf(),
            },
            _ => Error::IoError(e),
        })?;

        let mut tree = Self {
            nodes: Vec::new(),
            options,
        };
        let kind = if metadata.is_dir() {
            NodeKind::Directory
        } else {
            tree.check_unbound(&file_name_text(source_root), &bindings)?;
            NodeKind::File
        };
        let root = tree.push(
            NodeSource::Path(source_root.to_path_buf()),
            kind,
            bindings,
            None,
        );
        tree.build_node(root)?;
        Ok(tree)
    }

    /// A single-node tree whose content is `text`, rendered as a template.
    pub fn from_text(text: impl Into<String>, bindings: Bindings) -> Self {
        let mut tree = Self {
            nodes: Vec::with_capacity(1),
            options: TreeOptions::default(),
        };
        tree.push(NodeSource::Text(text.into()), NodeKind::File, bindings, None);
        tree
    }

    fn push(
        &mut self,
        source: NodeSource,
        kind: NodeKind,
        bindings: Bindings,
        parent: Option<NodeId>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(TemplateNode {
            source,
            kind,
            bindings,
            parent,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }
        id
    }

    fn check_unbound(&self, name: &str, bindings: &Bindings) -> Result<()> {
        let Some(first) = placeholder::unbound(name, bindings).into_iter().next() else {
            return Ok(());
        };
        match self.options.unbound_placeholders {
            UnboundPlaceholderPolicy::Strict => Err(Error::UnresolvedPlaceholder {
                path: name.to_string(),
                placeholder: first.literal().to_string(),
            }),
            UnboundPlaceholderPolicy::Literal => {
                warn!(
                    "Placeholder {} in '{}' is not bound; it is kept as written",
                    first.literal(),
                    name
                );
                Ok(())
            }
        }
    }

    /// Bindings for each node an entry named `name` expands into.
    fn expand(name: &str, bindings: &Bindings) -> Vec<Bindings> {
        let placeholders = placeholder::parse(name, bindings);
        match expansion(&placeholders, bindings) {
            Expansion::Leaf => vec![bindings.clone()],
            Expansion::FanOut(overlays) => overlays
                .iter()
                .map(|overlay| merge(bindings, overlay))
                .collect(),
            Expansion::Empty => {
                debug!("'{}' expands to no combinations", name);
                Vec::new()
            }
        }
    }

    fn build_node(&mut self, id: NodeId) -> Result<()> {
        let node = &self.nodes[id.0];
        let Some(path) = node.source.path().map(Path::to_path_buf) else {
            return Ok(());
        };
        let bindings = node.bindings.clone();
        let kind = node.kind;

        match kind {
            NodeKind::Directory => {
                for entry in WalkDir::new(&path)
                    .min_depth(1)
                    .max_depth(1)
                    .sort_by_file_name()
                {
                    let entry = entry.map_err(|e| Error::IoError(e.into()))?;
                    let name = entry.file_name().to_string_lossy().into_owned();
                    let kind = if entry.path().is_dir() {
                        NodeKind::Directory
                    } else {
                        NodeKind::File
                    };
                    self.check_unbound(&name, &bindings)?;

                    for child_bindings in Self::expand(&name, &bindings) {
                        let child = self.push(
                            NodeSource::Path(entry.path().to_path_buf()),
                            kind,
                            child_bindings,
                            Some(id),
                        );
                        self.build_node(child)?;
                    }
                }
            }
            NodeKind::File => {
                let placeholders = placeholder::parse(&file_name_text(&path), &bindings);
                let variants = match expansion(&placeholders, &bindings) {
                    Expansion::Leaf => return Ok(()),
                    Expansion::FanOut(overlays) => overlays,
                    Expansion::Empty => Vec::new(),
                };
                self.nodes[id.0].kind = NodeKind::Expanded;
                for overlay in variants {
                    let child = self.push(
                        NodeSource::Path(path.clone()),
                        NodeKind::File,
                        merge(&bindings, &overlay),
                        Some(id),
                    );
                    self.build_node(child)?;
                }
            }
            NodeKind::Expanded => {}
        }
        Ok(())
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &TemplateNode {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn options(&self) -> &TreeOptions {
        &self.options
    }

    /// Every node, depth first, parents before children.
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.nodes[id.0].children.iter().rev().copied());
        }
        order
    }

    /// Follows parent links up to the node that has none.
    pub fn root_of(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(parent) = self.nodes[current.0].parent {
            current = parent;
        }
        current
    }

    /// Source path relative to the root source. A file root resolves to its own name.
    pub fn relative_path(&self, id: NodeId) -> Option<PathBuf> {
        let path = self.nodes[id.0].source.path()?;
        let root = &self.nodes[self.root_of(id).0];
        let root_path = root.source.path()?;
        if root.kind == NodeKind::Directory {
            path.strip_prefix(root_path).ok().map(Path::to_path_buf)
        } else {
            path.file_name().map(PathBuf::from)
        }
    }

    fn template_suffix(&self, name: &str) -> Option<&str> {
        self.options
            .template_suffixes
            .iter()
            .map(String::as_str)
            .filter(|suffix| !suffix.is_empty() && name.len() > suffix.len())
            .find(|suffix| name.ends_with(suffix))
    }

    /// Whether the node's content is evaluated as a template.
    pub fn is_template(&self, id: NodeId) -> bool {
        match &self.nodes[id.0].source {
            NodeSource::Text(_) => true,
            NodeSource::Path(path) => self.template_suffix(&file_name_text(path)).is_some(),
        }
    }

    /// Output path of a node.
    ///
    /// The template marker is stripped from the last segment and placeholders are
    /// filled from the node's bindings. Returns `Ok(None)` when a placeholder is
    /// bound to null (the node must not be written) and for text nodes. A file
    /// whose name fills to nothing is a `FormatError`.
    pub fn destination(&self, id: NodeId, dest_root: Option<&Path>) -> Result<Option<PathBuf>> {
        let Some(mut relative) = self.relative_path(id) else {
            return Ok(None);
        };

        if let Some(name) = relative.file_name().map(|n| n.to_string_lossy().into_owned()) {
            if let Some(suffix) = self.template_suffix(&name) {
                relative.set_file_name(&name[..name.len() - suffix.len()]);
            }
        }

        let relative = relative.to_string_lossy().into_owned();
        let bindings = &self.nodes[id.0].bindings;
        let placeholders = placeholder::parse(&relative, bindings);
        let Some(filled) = fill_all(&relative, &placeholders, bindings)? else {
            return Ok(None);
        };

        if self.nodes[id.0].kind != NodeKind::Directory
            && (filled.is_empty() || filled.ends_with(std::path::is_separator))
        {
            let name = relative
                .rsplit(std::path::is_separator)
                .next()
                .unwrap_or_default();
            return Err(Error::FormatError {
                placeholder: name.to_string(),
                reason: "the file name is empty once placeholders are filled".to_string(),
            });
        }

        Ok(Some(match dest_root {
            Some(root) if filled.is_empty() => root.to_path_buf(),
            Some(root) => root.join(filled),
            None => PathBuf::from(filled),
        }))
    }

    /// Produces the content of a leaf node.
    ///
    /// Text nodes and marker-suffixed files are rendered; other files are read
    /// unchanged. Render failures follow `policy`.
    pub fn render(
        &self,
        id: NodeId,
        renderer: &dyn TemplateRenderer,
        policy: RenderErrorPolicy,
    ) -> Result<Output> {
        let node = &self.nodes[id.0];
        let (label, template) = match &node.source {
            NodeSource::Text(text) => ("<text>".to_string(), text.clone()),
            NodeSource::Path(path) => {
                if node.kind != NodeKind::File {
                    return Err(Error::RenderError {
                        path: path.display().to_string(),
                        message: "only files have content".to_string(),
                    });
                }
                if !self.is_template(id) {
                    return Ok(Output::Copied(fs::read(path)?));
                }
                (path.display().to_string(), fs::read_to_string(path)?)
            }
        };

        match renderer.render(&label, &template, &node.bindings) {
            Ok(text) => Ok(Output::Rendered(text)),
            Err(e) => match policy {
                RenderErrorPolicy::Abort => Err(e),
                RenderErrorPolicy::Embed => {
                    warn!("Template {} could not be rendered: {}", label, e);
                    Ok(Output::Failed(render_error_payload(
                        &label,
                        &node.bindings,
                        &e,
                    )))
                }
            },
        }
    }
}

fn file_name_text(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
