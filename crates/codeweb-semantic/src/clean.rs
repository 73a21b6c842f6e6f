//! Embedding-input preparation.
//!
//! Similarity should measure what a function *does*, not what it is called
//! or how it is documented. Cleaning therefore strips the signature line,
//! docstrings, line comments, and blank lines before the text reaches the
//! embedder.

use codeweb_core::Node;

/// Strip the signature line, docstring literals, `#` comments, and blank
/// lines from a function block.
pub fn clean_for_embedding(code: &str) -> String {
    let mut kept: Vec<&str> = Vec::new();
    let mut open_quote: Option<&str> = None;

    for line in code.lines().skip(1) {
        let trimmed = line.trim();

        if let Some(quote) = open_quote {
            if trimmed.contains(quote) {
                open_quote = None;
            }
            continue;
        }

        if let Some(quote) = ["\"\"\"", "'''"].into_iter().find(|q| trimmed.starts_with(q)) {
            // A docstring opened and closed on the same line is done already.
            if !trimmed[quote.len()..].contains(quote) {
                open_quote = Some(quote);
            }
            continue;
        }

        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        kept.push(line);
    }

    kept.join("\n")
}

/// Three-tier fallback for the embedding input: cleaned code, then the raw
/// code, then the label. Never empty for a node with any content at all.
pub fn embedding_input(node: &Node) -> String {
    let cleaned = clean_for_embedding(&node.code);
    if !cleaned.trim().is_empty() {
        return cleaned;
    }
    if !node.code.trim().is_empty() {
        return node.code.clone();
    }
    node.label.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_signature_docstring_and_comments() {
        let code = "def f(x):\n    \"\"\"Adds one.\n\n    Long docs.\n    \"\"\"\n    # increment\n    y = x + 1\n\n    return y";
        let cleaned = clean_for_embedding(code);
        assert_eq!(cleaned, "    y = x + 1\n    return y");
    }

    #[test]
    fn test_one_line_docstring() {
        let code = "def f():\n    '''short.'''\n    return 1";
        assert_eq!(clean_for_embedding(code), "    return 1");
    }

    #[test]
    fn test_fallback_to_raw_code() {
        // Everything but the signature is documentation: cleaned is empty.
        let mut node = codeweb_core::Node::function("f", "def f():\n    \"\"\"only docs\"\"\"", 1);
        assert_eq!(embedding_input(&node), node.code);

        node.code = String::new();
        assert_eq!(embedding_input(&node), "f");
    }

    #[test]
    fn test_cleaning_is_deterministic() {
        let code = "def f():\n    return 1";
        assert_eq!(clean_for_embedding(code), clean_for_embedding(code));
    }
}
