//! Built-in CSS checker
//!
//! Reports a small csslint-style rule set over a tree-sitter CSS syntax tree:
//!
//! - syntax errors (`ERROR` and missing nodes)
//! - `empty-rules`: rule sets without declarations
//! - `important`: uses of `!important`
//! - `zero-units`: `0` values carrying a unit
//! - `duplicate-properties`: a property repeated in one block, unless it is an
//!   adjacent fallback with a different value

use std::collections::HashMap;

use tracing::warn;
use tree_sitter::Node;

use crate::checker::traits::{CheckError, Checker};
use crate::checker::types::RawIssue;

/// Units for which a zero value is not equivalent to a unitless zero
const TIME_UNITS: [&str; 2] = ["s", "ms"];

/// Longest snippet quoted in a syntax error message
const MAX_SNIPPET_CHARS: usize = 20;

/// Checker for CSS documents
pub struct CssChecker;

impl CssChecker {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CssChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl Checker for CssChecker {
    fn check(&self, text: &str) -> Result<Vec<RawIssue>, CheckError> {
        let mut parser = tree_sitter::Parser::new();
        let language = tree_sitter_css::LANGUAGE;
        parser.set_language(&language.into()).map_err(|e| {
            warn!("Failed to set CSS language for tree-sitter: {}", e);
            CheckError::TreeSitter(e.to_string())
        })?;

        let tree = parser.parse(text, None).ok_or_else(|| {
            warn!("Failed to parse CSS content");
            CheckError::Failed("Failed to parse CSS".to_string())
        })?;

        let mut issues = Vec::new();
        self.visit(tree.root_node(), text, &mut issues);

        issues.sort_by_key(|issue| (issue.line, issue.col));
        Ok(issues)
    }
}

impl CssChecker {
    fn visit(&self, node: Node, content: &str, issues: &mut Vec<RawIssue>) {
        if node.is_error() {
            issues.push(error_at(
                node,
                content,
                format!("Unexpected token '{}'.", snippet(node, content)),
            ));
            return;
        }

        if node.is_missing() {
            issues.push(error_at(
                node,
                content,
                format!("Expected '{}'.", node.kind()),
            ));
            return;
        }

        match node.kind() {
            "rule_set" => self.check_empty_rule(node, content, issues),
            "block" => self.check_duplicate_properties(node, content, issues),
            "important" => issues.push(warning_at(node, content, "Use of !important")),
            "integer_value" | "float_value" => self.check_zero_units(node, content, issues),
            _ => {}
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.visit(child, content, issues);
        }
    }

    fn check_empty_rule(&self, rule_set: Node, content: &str, issues: &mut Vec<RawIssue>) {
        let mut cursor = rule_set.walk();
        let Some(block) = rule_set
            .named_children(&mut cursor)
            .find(|child| child.kind() == "block")
        else {
            return;
        };

        // A block that failed to parse is reported as a syntax error instead
        if block.has_error() {
            return;
        }

        let mut cursor = block.walk();
        let is_empty = block
            .named_children(&mut cursor)
            .all(|child| child.kind() == "comment");

        if is_empty {
            issues.push(warning_at(rule_set, content, "Rule is empty."));
        }
    }

    fn check_zero_units(&self, value: Node, content: &str, issues: &mut Vec<RawIssue>) {
        let mut cursor = value.walk();
        let Some(unit) = value
            .named_children(&mut cursor)
            .find(|child| child.kind() == "unit")
        else {
            return;
        };

        let unit_text = &content[unit.byte_range()];
        if TIME_UNITS.contains(&unit_text.to_ascii_lowercase().as_str()) {
            return;
        }

        let number_text = &content[value.start_byte()..unit.start_byte()];
        let is_zero = number_text
            .parse::<f64>()
            .map(|number| number == 0.0)
            .unwrap_or(false);

        if is_zero {
            issues.push(warning_at(
                value,
                content,
                "Values of 0 shouldn't have units specified.",
            ));
        }
    }

    fn check_duplicate_properties(&self, block: Node, content: &str, issues: &mut Vec<RawIssue>) {
        // property name -> (index of its last declaration, value text)
        let mut seen: HashMap<String, (usize, String)> = HashMap::new();

        let mut cursor = block.walk();
        let declarations = block
            .named_children(&mut cursor)
            .filter(|child| child.kind() == "declaration");

        for (index, declaration) in declarations.enumerate() {
            let Some((name, value)) = split_declaration(declaration, content) else {
                continue;
            };

            if let Some((last_index, last_value)) = seen.get(&name) {
                let is_fallback = *last_index + 1 == index && *last_value != value;
                if !is_fallback {
                    issues.push(warning_at(
                        declaration,
                        content,
                        format!("Duplicate property '{name}' found."),
                    ));
                }
            }

            seen.insert(name, (index, value));
        }
    }
}

/// Split a declaration node into its lowercased property name and value text
fn split_declaration(declaration: Node, content: &str) -> Option<(String, String)> {
    let mut cursor = declaration.walk();
    let mut name: Option<String> = None;
    let mut value_parts: Vec<&str> = Vec::new();

    for child in declaration.named_children(&mut cursor) {
        match child.kind() {
            "property_name" => name = Some(content[child.byte_range()].to_ascii_lowercase()),
            "important" | "comment" => {}
            _ => value_parts.push(&content[child.byte_range()]),
        }
    }

    name.map(|name| (name, value_parts.join(" ")))
}

fn warning_at(node: Node, content: &str, message: impl Into<String>) -> RawIssue {
    let (line, col) = one_based_position(node, content);
    RawIssue::warning(line, col, message)
}

fn error_at(node: Node, content: &str, message: impl Into<String>) -> RawIssue {
    let (line, col) = one_based_position(node, content);
    RawIssue::error(line, col, message)
}

/// 1-based line and UTF-16 column of the node start
fn one_based_position(node: Node, content: &str) -> (u32, u32) {
    let point = node.start_position();
    let start = node.start_byte().min(content.len());
    let line_start = start.saturating_sub(point.column);
    let column = content
        .get(line_start..start)
        .map(|prefix| prefix.encode_utf16().count())
        .unwrap_or(point.column);

    (to_u32(point.row) + 1, to_u32(column) + 1)
}

fn to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX - 1)
}

fn snippet(node: Node, content: &str) -> String {
    let text = content
        .get(node.byte_range())
        .unwrap_or_default()
        .lines()
        .next()
        .unwrap_or_default()
        .trim();

    if text.chars().count() > MAX_SNIPPET_CHARS {
        let truncated: String = text.chars().take(MAX_SNIPPET_CHARS).collect();
        format!("{truncated}...")
    } else {
        text.to_string()
    }
}
