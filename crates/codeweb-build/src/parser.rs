//! Heuristic structural parser: one file's text in, nodes and edges out.
//!
//! Function extraction is a block scanner, not a real parser: it recognizes
//! `def <name>(<params>):` headers anchored at column 0 and swallows every
//! following line that is blank, indented, or a `#`/`@` continuation marker.
//! It does not track paren nesting, multi-line strings that begin indented,
//! or inner `def`s beyond the outer one. That is a known limitation of the
//! approach; a real parser could replace this module behind the same
//! contract without touching the rest of the pipeline.

use codeweb_core::{extension_to_language, Edge, Node, SUPPORTED_LANGUAGE};

/// Everything the parser derives from a single file.
#[derive(Debug, Clone)]
pub struct ParsedFile {
    /// The module node for the file itself.
    pub module: Node,
    /// One node per extracted top-level function.
    pub functions: Vec<Node>,
    /// Imports edges, one per function, pointing function → file.
    pub imports: Vec<Edge>,
}

/// Parse one file. Deterministic pure function; malformed input degrades to
/// "no functions extracted", never an error.
pub fn parse_file(filename: &str, text: &str) -> ParsedFile {
    let language = extension_to_language(filename);
    let module = Node::module(filename, text, language, complexity_of(text));

    let mut parsed = ParsedFile {
        module,
        functions: Vec::new(),
        imports: Vec::new(),
    };

    if language != SUPPORTED_LANGUAGE {
        return parsed;
    }

    let lines: Vec<&str> = text.lines().collect();
    let mut i = 0;
    while i < lines.len() {
        let Some(name) = def_header_name(lines[i]) else {
            i += 1;
            continue;
        };

        let start = i;
        i += 1;
        while i < lines.len() && continues_block(lines[i]) {
            i += 1;
        }

        let code = lines[start..i].join("\n");
        let node = Node::function(&name, &code, complexity_of(&code));
        parsed
            .imports
            .push(Edge::imports(node.id.clone(), parsed.module.id.clone()));
        parsed.functions.push(node);
        // `i` already points at the terminating line; re-examine it, since it
        // may itself be the next function header.
    }

    parsed
}

/// Locate the line span `[start, end)` of a top-level function in a file's
/// text, using the same header and block rules as [`parse_file`]. Used when
/// splicing edited function code back into its owning file.
pub fn function_span(text: &str, name: &str) -> Option<(usize, usize)> {
    let lines: Vec<&str> = text.lines().collect();
    for (start, line) in lines.iter().enumerate() {
        if def_header_name(line).as_deref() != Some(name) {
            continue;
        }
        let mut end = start + 1;
        while end < lines.len() && continues_block(lines[end]) {
            end += 1;
        }
        return Some((start, end));
    }
    None
}

/// Extract the function name from a `def <name>(<params>):` header anchored
/// at column 0. Returns `None` for anything else.
fn def_header_name(line: &str) -> Option<String> {
    let rest = line.strip_prefix("def ")?;
    let rest = rest.trim_start();

    let name: String = rest
        .chars()
        .take_while(|c| c.is_alphanumeric() || *c == '_')
        .collect();
    if name.is_empty() || name.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        return None;
    }

    let after = rest[name.len()..].trim_start();
    if !after.starts_with('(') || !line.trim_end().ends_with(':') {
        return None;
    }

    Some(name)
}

/// Whether a line belongs to the block opened by the preceding header: blank
/// lines, indented lines, and column-0 comments/decorators all continue it.
fn continues_block(line: &str) -> bool {
    line.trim().is_empty()
        || line.starts_with(' ')
        || line.starts_with('\t')
        || line.starts_with('#')
        || line.starts_with('@')
}

/// Rough 0–100 complexity estimate from size and branch keyword density.
/// Only used for UI gating; exact derivation is not load-bearing.
fn complexity_of(code: &str) -> u8 {
    const BRANCHES: &[&str] = &[
        "if ", "elif ", "else:", "for ", "while ", "try:", "except", "with ", "match ", "case ",
    ];

    let mut score = 0usize;
    for line in code.lines() {
        let t = line.trim_start();
        if t.is_empty() || t.starts_with('#') {
            continue;
        }
        score += 1;
        if BRANCHES.iter().any(|kw| t.starts_with(kw)) {
            score += 4;
        }
    }
    score.min(100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use codeweb_core::{EdgeKind, NodeKind};

    #[test]
    fn test_single_function() {
        let parsed = parse_file("a.py", "def f():\n    return 1\n");

        let module = &parsed.module;
        assert_eq!(module.id, "file-a.py");
        assert_eq!(module.kind, NodeKind::Module);
        assert_eq!(module.language, "python");

        assert_eq!(parsed.functions.len(), 1);
        let f = &parsed.functions[0];
        assert_eq!(f.id, "fn-f");
        assert_eq!(f.code, "def f():\n    return 1");
        assert!(f.is_stale);
        assert!(f.embedding.is_none());

        assert_eq!(parsed.imports.len(), 1);
        assert_eq!(parsed.imports[0].source, "fn-f");
        assert_eq!(parsed.imports[0].target, "file-a.py");
        assert_eq!(parsed.imports[0].kind, EdgeKind::Imports);
    }

    #[test]
    fn test_deterministic() {
        let text = "def f(x):\n    return x\n\ndef g():\n    return f(2)\n";
        let a = parse_file("m.py", text);
        let b = parse_file("m.py", text);
        assert_eq!(a.functions, b.functions);
        assert_eq!(a.imports, b.imports);
    }

    #[test]
    fn test_block_swallows_blank_comment_decorator_lines() {
        let text = "def f():\n    a = 1\n\n# trailing comment\n@dec\n    return a\nx = f()\n";
        let parsed = parse_file("a.py", text);
        assert_eq!(parsed.functions.len(), 1);
        let code = &parsed.functions[0].code;
        assert!(code.contains("# trailing comment"));
        assert!(code.contains("@dec"));
        assert!(!code.contains("x = f()"));
    }

    #[test]
    fn test_adjacent_headers_terminate_each_other() {
        let text = "def f():\n    return g()\ndef g():\n    return 1\n";
        let parsed = parse_file("a.py", text);
        assert_eq!(parsed.functions.len(), 2);
        assert_eq!(parsed.functions[0].code, "def f():\n    return g()");
        assert_eq!(parsed.functions[1].code, "def g():\n    return 1");
    }

    #[test]
    fn test_indented_def_is_not_a_header() {
        let text = "class C:\n    def method(self):\n        pass\n";
        let parsed = parse_file("a.py", text);
        assert!(parsed.functions.is_empty());
    }

    #[test]
    fn test_malformed_header_degrades_to_module_only() {
        for text in ["def :\n    pass\n", "def 1bad():\n    pass\n", "def f()\n    pass\n"] {
            let parsed = parse_file("a.py", text);
            assert!(parsed.functions.is_empty(), "extracted from {text:?}");
            assert_eq!(parsed.module.kind, NodeKind::Module);
        }
    }

    #[test]
    fn test_unsupported_language_yields_module_only() {
        let parsed = parse_file("lib.rs", "fn main() {}\n");
        let module = &parsed.module;
        assert_eq!(module.language, "rust");
        assert!(parsed.functions.is_empty());
        assert!(parsed.imports.is_empty());
    }

    #[test]
    fn test_function_span_round_trip() {
        let text = "import os\n\ndef f():\n    return 1\n\ndef g():\n    return 2\n";
        let (start, end) = function_span(text, "g").unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[start], "def g():");
        assert_eq!(end, lines.len());
        assert!(function_span(text, "missing").is_none());
    }

    #[test]
    fn test_complexity_clamped() {
        let mut big = String::new();
        for i in 0..200 {
            big.push_str(&format!("    if x > {i}:\n        x -= 1\n"));
        }
        let code = format!("def f(x):\n{big}");
        let parsed = parse_file("a.py", &code);
        assert_eq!(parsed.functions[0].complexity, 100);
    }
}
