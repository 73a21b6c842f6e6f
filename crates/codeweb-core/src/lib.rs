//! Core domain types shared across the Codeweb workspace.
//!
//! The model is deliberately small: a [`CodeGraph`] is a flat list of
//! [`Node`]s (unique by string id) plus an ordered list of [`Edge`]s whose
//! endpoints are always node id strings. Edges are resolved to node objects
//! only at the rendering boundary (see [`CodeGraph::to_petgraph`]), never
//! inside the core pipeline.

use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Mapping from filename to full text content, the single source of truth
/// the graph is derived from. Owned by the host; the pipeline treats it as
/// read-only input per build cycle. `BTreeMap` keeps iteration deterministic.
pub type FileMap = BTreeMap<String, String>;

/// Dense floating-point vector representing a node's code in embedding space.
pub type Embedding = Vec<f32>;

/// The one language the structural parser can extract functions from.
pub const SUPPORTED_LANGUAGE: &str = "python";

/// Enumerates the kinds of vertices that can populate a [`CodeGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum NodeKind {
    /// A whole source file.
    #[default]
    Module,
    /// A single function extracted from a file.
    Function,
    /// Free-floating annotation attached by the user.
    Note,
}

/// Kinds of relationships between two nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    /// Function belongs to a file.
    Imports,
    /// Function invokes another function.
    Calls,
    /// Embedding-similarity relationship, carries a weight.
    Semantic,
}

impl EdgeKind {
    /// Structural edges are derived purely from text and are fully
    /// recomputed on every rebuild; semantic edges are merged instead.
    pub fn is_structural(&self) -> bool {
        matches!(self, EdgeKind::Imports | EdgeKind::Calls)
    }
}

impl std::fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EdgeKind::Imports => write!(f, "imports"),
            EdgeKind::Calls => write!(f, "calls"),
            EdgeKind::Semantic => write!(f, "semantic"),
        }
    }
}

/// Transient 2D layout coordinate. Not an invariant of the pipeline, but it
/// is carried across merges so the rendering layer sees no visual jumps.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Stable id for a module node: identity is the filename.
pub fn module_id(filename: &str) -> String {
    format!("file-{filename}")
}

/// Stable id for a function node: identity is the function name alone, not
/// its position or file. Two files defining a function with the same name
/// therefore collapse into one node, a documented property of the identity
/// scheme, not something the builder papers over.
pub fn function_id(name: &str) -> String {
    format!("fn-{name}")
}

/// A structural or semantic graph vertex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Stable string identity (`file-<filename>` or `fn-<name>`).
    pub id: String,
    pub kind: NodeKind,
    /// Display name: filename for modules, function name for functions.
    pub label: String,
    /// Content-type tag, e.g. "python"; drives parsing and rendering only.
    pub language: String,
    /// Full source text for this node's span (whole file for modules, the
    /// extracted block including the signature line for functions).
    pub code: String,
    /// Heuristic size/branchiness estimate in 0–100, used for UI gating.
    pub complexity: u8,
    /// `None` until an embedder has been run over this node.
    #[serde(default)]
    pub embedding: Option<Embedding>,
    /// True when the stored embedding (if any) no longer corresponds to
    /// `code`, and for nodes that have never been embedded.
    pub is_stale: bool,
    #[serde(default)]
    pub position: Option<Position>,
}

impl Node {
    /// Construct a module node for a whole file.
    pub fn module(filename: &str, code: impl Into<String>, language: &str, complexity: u8) -> Self {
        Self {
            id: module_id(filename),
            kind: NodeKind::Module,
            label: filename.to_string(),
            language: language.to_string(),
            code: code.into(),
            complexity,
            embedding: None,
            is_stale: true,
            position: None,
        }
    }

    /// Construct a function node for an extracted block.
    pub fn function(name: &str, code: impl Into<String>, complexity: u8) -> Self {
        Self {
            id: function_id(name),
            kind: NodeKind::Function,
            label: name.to_string(),
            language: SUPPORTED_LANGUAGE.to_string(),
            code: code.into(),
            complexity,
            embedding: None,
            is_stale: true,
            position: None,
        }
    }

    /// Whether this node is the kind of thing an embedder can be run over:
    /// a function in the supported language. Staleness is checked separately.
    pub fn is_embeddable(&self) -> bool {
        self.kind == NodeKind::Function && self.language == SUPPORTED_LANGUAGE
    }
}

/// A directed relationship between two node ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Originating node id.
    pub source: String,
    /// Destination node id.
    pub target: String,
    pub kind: EdgeKind,
    /// Similarity score in [0,1]; present only on semantic edges.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f32>,
}

impl Edge {
    /// Function-belongs-to-file edge.
    pub fn imports(function: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            source: function.into(),
            target: file.into(),
            kind: EdgeKind::Imports,
            weight: None,
        }
    }

    /// Caller-to-callee edge.
    pub fn calls(caller: impl Into<String>, callee: impl Into<String>) -> Self {
        Self {
            source: caller.into(),
            target: callee.into(),
            kind: EdgeKind::Calls,
            weight: None,
        }
    }

    /// Similarity edge with its raw cosine score as weight.
    pub fn semantic(a: impl Into<String>, b: impl Into<String>, weight: f32) -> Self {
        Self {
            source: a.into(),
            target: b.into(),
            kind: EdgeKind::Semantic,
            weight: Some(weight),
        }
    }
}

/// Aggregate graph describing the ingested file set.
///
/// Node ids are unique; edge order is irrelevant to correctness but is
/// preserved for rendering stability. The graph is always replaced wholesale
/// by the pipeline, never mutated in place across reactive cycles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodeGraph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl CodeGraph {
    /// Creates an empty graph with no nodes or edges.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Look up a node by id.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Look up a node by id for mutation.
    pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    /// Edges of one kind, in stored order.
    pub fn edges_of_kind(&self, kind: EdgeKind) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(move |e| e.kind == kind)
    }

    /// Whether a specific edge exists.
    pub fn has_edge(&self, source: &str, target: &str, kind: EdgeKind) -> bool {
        self.edges
            .iter()
            .any(|e| e.kind == kind && e.source == source && e.target == target)
    }

    /// Convert to a petgraph `StableDiGraph` for visualization/analysis.
    /// Returns the graph and a mapping from node id to `NodeIndex`. Edges
    /// whose endpoints are missing are skipped rather than reported; the
    /// merge engine upholds the no-dangling-edge invariant upstream.
    pub fn to_petgraph(&self) -> (StableDiGraph<Node, Edge>, HashMap<String, NodeIndex>) {
        let mut graph = StableDiGraph::new();
        let mut id_to_index = HashMap::new();

        for node in &self.nodes {
            let idx = graph.add_node(node.clone());
            id_to_index.insert(node.id.clone(), idx);
        }

        for edge in &self.edges {
            if let (Some(&from), Some(&to)) = (
                id_to_index.get(&edge.source),
                id_to_index.get(&edge.target),
            ) {
                graph.add_edge(from, to, edge.clone());
            }
        }

        (graph, id_to_index)
    }
}

/// Map file extension to language name.
pub fn extension_to_language(filename: &str) -> &'static str {
    let ext = filename.rsplit('.').next().unwrap_or("");
    match ext {
        "py" => "python",
        "rs" => "rust",
        "js" | "jsx" => "javascript",
        "ts" | "tsx" => "typescript",
        "go" => "go",
        "java" => "java",
        "c" | "h" => "c",
        "cpp" | "hpp" | "cc" | "cxx" => "cpp",
        "md" => "markdown",
        "json" => "json",
        "yaml" | "yml" => "yaml",
        "toml" => "toml",
        _ => "unknown",
    }
}
