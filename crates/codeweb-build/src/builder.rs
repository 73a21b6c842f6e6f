//! Whole-set graph assembly.
//!
//! Runs the parser over every file in the map and assembles a fresh
//! structural graph from scratch: module and function nodes with layout seed
//! positions, Imports edges, then a second pass for Calls edges. The output
//! never carries embeddings or semantic edges; those belong to the merge and
//! similarity layers.

use std::collections::HashMap;

use codeweb_core::{CodeGraph, Edge, FileMap, Node, NodeKind, Position};
use tracing::debug;

use crate::parser::parse_file;

/// Radius of the circle non-entry files are seeded on.
const LAYOUT_RADIUS: f32 = 260.0;
/// Maximum per-axis offset for function nodes around their parent's seed.
const FUNCTION_JITTER: f32 = 48.0;

/// Build a complete structural graph from the file map. Pure function of
/// the map's content; deterministic because `FileMap` iterates in key order.
pub fn build_graph(files: &FileMap) -> CodeGraph {
    let parsed: Vec<_> = files
        .iter()
        .map(|(filename, text)| parse_file(filename, text))
        .collect();

    // Entry-point heuristic: the first file whose name suggests it is the
    // program root sits at the center; everything else goes on the circle.
    let entry = parsed
        .iter()
        .position(|p| is_entry_point(&p.module.label));
    let satellites = parsed.len().saturating_sub(if entry.is_some() { 1 } else { 0 });

    let mut nodes: Vec<Node> = Vec::new();
    let mut index_of: HashMap<String, usize> = HashMap::new();
    let mut edges: Vec<Edge> = Vec::new();

    let mut slot = 0usize;
    for (file_idx, mut file) in parsed.into_iter().enumerate() {
        let seed = if Some(file_idx) == entry {
            Position::new(0.0, 0.0)
        } else {
            let angle = std::f32::consts::TAU * slot as f32 / satellites.max(1) as f32;
            slot += 1;
            Position::new(LAYOUT_RADIUS * angle.cos(), LAYOUT_RADIUS * angle.sin())
        };

        file.module.position = Some(seed);
        insert_node(&mut nodes, &mut index_of, file.module);

        for mut function in file.functions {
            function.position = Some(jitter_near(seed, &function.id));
            insert_node(&mut nodes, &mut index_of, function);
        }
        edges.extend(file.imports);
    }

    // Second pass: call-style references between known function names. The
    // body with the header line excluded is used for self-reference so the
    // header's own name does not falsely match.
    let functions: Vec<(String, String, String)> = nodes
        .iter()
        .filter(|n| n.kind == NodeKind::Function)
        .map(|n| (n.id.clone(), n.label.clone(), n.code.clone()))
        .collect();

    for (caller_id, _, body) in &functions {
        let body_sans_header = body.split_once('\n').map(|(_, rest)| rest).unwrap_or("");
        for (callee_id, callee_name, _) in &functions {
            let haystack = if callee_id == caller_id {
                body_sans_header
            } else {
                body.as_str()
            };
            if contains_call(haystack, callee_name) {
                edges.push(Edge::calls(caller_id.clone(), callee_id.clone()));
            }
        }
    }

    debug!(
        files = files.len(),
        nodes = nodes.len(),
        edges = edges.len(),
        "structural graph built"
    );

    CodeGraph { nodes, edges }
}

/// Insert keeping ids unique. Same-named functions across files share one id;
/// the later parse wins, mirroring map-overwrite semantics.
fn insert_node(nodes: &mut Vec<Node>, index_of: &mut HashMap<String, usize>, node: Node) {
    if let Some(&i) = index_of.get(&node.id) {
        nodes[i] = node;
    } else {
        index_of.insert(node.id.clone(), nodes.len());
        nodes.push(node);
    }
}

fn is_entry_point(filename: &str) -> bool {
    let lower = filename.to_lowercase();
    lower.contains("main") || lower.contains("index")
}

/// Word-boundary test for a call-style reference `<name>(`.
fn contains_call(text: &str, name: &str) -> bool {
    let pattern = format!("{name}(");
    let mut from = 0;
    while let Some(found) = text[from..].find(&pattern) {
        let at = from + found;
        let boundary = text[..at]
            .chars()
            .next_back()
            .map(|c| !c.is_alphanumeric() && c != '_')
            .unwrap_or(true);
        if boundary {
            return true;
        }
        // Names may start with a multi-byte identifier character; advance by
        // its full width so the next slice stays on a char boundary.
        from = at + text[at..].chars().next().map_or(1, |c| c.len_utf8());
    }
    false
}

/// Deterministic pseudo-random offset derived from the node id, so layout
/// seeds are stable across rebuilds without a real RNG.
fn jitter_near(seed: Position, id: &str) -> Position {
    let h = fnv1a(id.as_bytes());
    let unit_x = ((h & 0xffff) as f32 / 0xffff as f32) * 2.0 - 1.0;
    let unit_y = (((h >> 16) & 0xffff) as f32 / 0xffff as f32) * 2.0 - 1.0;
    Position::new(
        seed.x + unit_x * FUNCTION_JITTER,
        seed.y + unit_y * FUNCTION_JITTER,
    )
}

fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf29ce484222325;
    for b in bytes {
        hash ^= *b as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;
    use codeweb_core::EdgeKind;

    fn files(entries: &[(&str, &str)]) -> FileMap {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_scenario_single_function() {
        let graph = build_graph(&files(&[("a.py", "def f():\n    return 1\n")]));

        assert!(graph.contains_node("file-a.py"));
        assert!(graph.contains_node("fn-f"));
        assert!(graph.has_edge("fn-f", "file-a.py", EdgeKind::Imports));
        assert_eq!(graph.edges_of_kind(EdgeKind::Calls).count(), 0);
        assert_eq!(graph.edges_of_kind(EdgeKind::Semantic).count(), 0);
    }

    #[test]
    fn test_scenario_call_direction() {
        let graph = build_graph(&files(&[(
            "a.py",
            "def f():\n    return g()\n\ndef g():\n    return 1\n",
        )]));

        assert!(graph.has_edge("fn-f", "fn-g", EdgeKind::Calls));
        assert!(!graph.has_edge("fn-g", "fn-f", EdgeKind::Calls));
    }

    #[test]
    fn test_scenario_recursion_self_loop() {
        let graph = build_graph(&files(&[("a.py", "def f():\n    return f(0)\n")]));
        assert!(graph.has_edge("fn-f", "fn-f", EdgeKind::Calls));
    }

    #[test]
    fn test_header_alone_is_not_recursion() {
        let graph = build_graph(&files(&[("a.py", "def f():\n    return 1\n")]));
        assert!(!graph.has_edge("fn-f", "fn-f", EdgeKind::Calls));
    }

    #[test]
    fn test_word_boundary_excludes_suffix_names() {
        // `notify(` must not count as a call to `fy`.
        let graph = build_graph(&files(&[(
            "a.py",
            "def fy():\n    return 1\n\ndef h():\n    return notify()\n",
        )]));
        assert!(!graph.has_edge("fn-h", "fn-fy", EdgeKind::Calls));
    }

    #[test]
    fn test_unicode_function_names_scan_safely() {
        // A rejected match on `xélan(` must step over the two-byte `é`
        // cleanly before finding the real call.
        let graph = build_graph(&files(&[(
            "a.py",
            "def élan():\n    return 1\n\ndef f():\n    return xélan(2) and élan()\n",
        )]));
        assert!(graph.has_edge("fn-f", "fn-élan", EdgeKind::Calls));
        assert!(!graph.has_edge("fn-élan", "fn-élan", EdgeKind::Calls));
    }

    #[test]
    fn test_cross_file_calls() {
        let graph = build_graph(&files(&[
            ("a.py", "def f():\n    return helper(1)\n"),
            ("b.py", "def helper(x):\n    return x\n"),
        ]));
        assert!(graph.has_edge("fn-f", "fn-helper", EdgeKind::Calls));
    }

    #[test]
    fn test_entry_point_seeded_at_center() {
        let graph = build_graph(&files(&[
            ("main.py", "print(1)\n"),
            ("util.py", "def u():\n    pass\n"),
        ]));
        let center = graph.node("file-main.py").unwrap().position.unwrap();
        assert_eq!((center.x, center.y), (0.0, 0.0));

        let satellite = graph.node("file-util.py").unwrap().position.unwrap();
        let r = (satellite.x.powi(2) + satellite.y.powi(2)).sqrt();
        assert!((r - LAYOUT_RADIUS).abs() < 1e-3);
    }

    #[test]
    fn test_function_seeded_near_parent() {
        let graph = build_graph(&files(&[
            ("main.py", "print(1)\n"),
            ("util.py", "def u():\n    pass\n"),
        ]));
        let parent = graph.node("file-util.py").unwrap().position.unwrap();
        let child = graph.node("fn-u").unwrap().position.unwrap();
        assert!((child.x - parent.x).abs() <= FUNCTION_JITTER);
        assert!((child.y - parent.y).abs() <= FUNCTION_JITTER);
    }

    #[test]
    fn test_deterministic_rebuild() {
        let map = files(&[
            ("main.py", "def run():\n    return util()\n"),
            ("util.py", "def util():\n    return 1\n"),
        ]);
        assert_eq!(build_graph(&map), build_graph(&map));
    }

    #[test]
    fn test_same_named_functions_collide_into_one_node() {
        let graph = build_graph(&files(&[
            ("a.py", "def dup():\n    return 1\n"),
            ("b.py", "def dup():\n    return 2\n"),
        ]));
        assert_eq!(
            graph.nodes.iter().filter(|n| n.id == "fn-dup").count(),
            1
        );
        // Both files still claim the shared node.
        assert!(graph.has_edge("fn-dup", "file-a.py", EdgeKind::Imports));
        assert!(graph.has_edge("fn-dup", "file-b.py", EdgeKind::Imports));
    }

    #[test]
    fn test_unsupported_file_never_errors() {
        let graph = build_graph(&files(&[("notes.md", "# readme\n")]));
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 0);
    }
}
