//! Named-function extraction from JavaScript/TypeScript source.
//!
//! Files are parsed with the tree-sitter TSX grammar, which accepts type
//! annotations, decorators and embedded JSX markup. Three syntactic forms are
//! recognized:
//!
//! 1. `function foo() {}` (including `async` and generator declarations)
//! 2. `const foo = () => {}` (arrow functions only; `function` expressions
//!    assigned to variables are not recorded)
//! 3. `app.get("/users/:id", (req, res) => {})` route registrations with an
//!    inline handler, named from the verb and path (`GET_users_:id`)
//!
//! Every syntax node yields an outcome: a function, nothing, or a skip with a
//! reason. Skips are reported as [`Diagnostic`]s. Only the skipped node itself
//! is lost: error recovery often wraps intact declarations inside an ERROR
//! node, so its children are still visited.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tree_sitter::{LanguageError, Node, Parser};

use crate::config::ScanConfig;
use crate::model::NamedFunction;
use crate::scan::tags::parse_comment_tags;
use crate::scan::{Diagnostic, ScanError};

const ROUTE_VERBS: [&str; 5] = ["get", "post", "put", "delete", "patch"];

/// Options controlling which forms are recognized and how syntax errors are treated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    pub route_handlers: bool,
    pub router_objects: Vec<String>,
    pub strict_syntax: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self::from(&ScanConfig::default())
    }
}

impl From<&ScanConfig> for ExtractOptions {
    fn from(config: &ScanConfig) -> Self {
        Self {
            route_handlers: config.route_handlers,
            router_objects: config.router_objects.clone(),
            strict_syntax: config.strict_syntax,
        }
    }
}

/// Functions found in one file, plus the nodes that had to be skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Extraction {
    pub functions: Vec<NamedFunction>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Extraction {
    pub fn names(&self) -> Vec<&str> {
        self.functions.iter().map(|f| f.name.as_str()).collect()
    }
}

/// Result of visiting a single syntax node.
#[derive(Debug)]
enum NodeOutcome {
    Found(NamedFunction),
    Skipped(String),
    Ignored,
}

/// Parses source files and collects their named functions.
pub struct FunctionExtractor {
    parser: Parser,
    options: ExtractOptions,
}

impl FunctionExtractor {
    pub fn new(options: ExtractOptions) -> Result<Self, LanguageError> {
        let mut parser = Parser::new();
        parser.set_language(&tree_sitter_typescript::LANGUAGE_TSX.into())?;
        Ok(Self { parser, options })
    }

    /// Read `path` from disk and extract its functions.
    ///
    /// Files that are not valid UTF-8 fail with [`ScanError::Parse`].
    pub fn extract_file(&mut self, path: &Path) -> Result<Extraction, ScanError> {
        let bytes = std::fs::read(path)
            .map_err(|source| ScanError::Io { path: path.to_path_buf(), source })?;
        let source = String::from_utf8(bytes).map_err(|e| ScanError::Parse {
            path: path.to_path_buf(),
            reason: format!("file is not valid UTF-8: {e}"),
        })?;
        self.extract(path, &source)
    }

    /// Extract named functions from `source`; `path` is used for error reporting.
    pub fn extract(&mut self, path: &Path, source: &str) -> Result<Extraction, ScanError> {
        let tree = self.parser.parse(source, None).ok_or_else(|| ScanError::Parse {
            path: path.to_path_buf(),
            reason: "parser produced no syntax tree".to_string(),
        })?;
        let root = tree.root_node();

        if self.options.strict_syntax && root.has_error() {
            let (line, column) = first_syntax_error(root).map(position).unwrap_or((1, 1));
            return Err(ScanError::Parse {
                path: path.to_path_buf(),
                reason: format!("syntax error at {line}:{column}"),
            });
        }

        let visitor = Visitor { source: source.as_bytes(), options: &self.options };
        let mut extraction = Extraction::default();
        let mut stack = vec![root];

        while let Some(node) = stack.pop() {
            match visitor.visit(node) {
                NodeOutcome::Found(function) => extraction.functions.push(function),
                NodeOutcome::Skipped(reason) => {
                    let diagnostic = diagnostic_for(path, node, reason);
                    tracing::debug!(%diagnostic, "skipped node");
                    extraction.diagnostics.push(diagnostic);
                }
                NodeOutcome::Ignored => {}
            }

            let mut cursor = node.walk();
            let children: Vec<Node> = node.children(&mut cursor).collect();
            stack.extend(children.into_iter().rev());
        }

        Ok(extraction)
    }
}

/// Name synthesized for an inline route handler: the upper-cased verb followed
/// by the route path with `/` replaced by `_`.
pub fn route_function_name(verb: &str, route_path: &str) -> String {
    format!("{}{}", verb.to_uppercase(), route_path.replace('/', "_"))
}

struct Visitor<'a> {
    source: &'a [u8],
    options: &'a ExtractOptions,
}

impl<'a> Visitor<'a> {
    fn visit(&self, node: Node<'_>) -> NodeOutcome {
        if node.is_error() {
            return NodeOutcome::Skipped("unparsable syntax".to_string());
        }
        if node.is_missing() {
            return NodeOutcome::Skipped(format!("missing `{}`", node.kind()));
        }

        match node.kind() {
            "function_declaration" | "generator_function_declaration" => {
                self.visit_function_declaration(node)
            }
            "variable_declarator" => self.visit_variable_declarator(node),
            "call_expression" if self.options.route_handlers => self.visit_route_call(node),
            _ => NodeOutcome::Ignored,
        }
    }

    fn visit_function_declaration(&self, node: Node<'_>) -> NodeOutcome {
        let Some(name) = self.identifier_text(node.child_by_field_name("name")) else {
            return NodeOutcome::Skipped("function declaration without a usable name".to_string());
        };
        NodeOutcome::Found(self.annotate(name, statement_anchor(node)))
    }

    fn visit_variable_declarator(&self, node: Node<'_>) -> NodeOutcome {
        let Some(value) = node.child_by_field_name("value").map(unwrap_parens) else {
            return NodeOutcome::Ignored;
        };
        if value.kind() != "arrow_function" {
            return NodeOutcome::Ignored;
        }

        let Some(name_node) = node.child_by_field_name("name") else {
            return NodeOutcome::Skipped("arrow function declarator without a name".to_string());
        };
        // Destructuring patterns have no single name to record.
        if name_node.kind() != "identifier" {
            return NodeOutcome::Ignored;
        }
        let Some(name) = self.identifier_text(Some(name_node)) else {
            return NodeOutcome::Skipped("arrow function declarator without a name".to_string());
        };

        NodeOutcome::Found(self.annotate(name, statement_anchor(node)))
    }

    fn visit_route_call(&self, node: Node<'_>) -> NodeOutcome {
        let Some(callee) = node.child_by_field_name("function") else {
            return NodeOutcome::Ignored;
        };
        if callee.kind() != "member_expression" {
            return NodeOutcome::Ignored;
        }
        let (Some(object), Some(property)) =
            (callee.child_by_field_name("object"), callee.child_by_field_name("property"))
        else {
            return NodeOutcome::Ignored;
        };
        if object.kind() != "identifier" {
            return NodeOutcome::Ignored;
        }
        let is_router = self
            .text(object)
            .is_some_and(|name| self.options.router_objects.iter().any(|r| r == name));
        if !is_router {
            return NodeOutcome::Ignored;
        }
        let Some(verb) = self.text(property).filter(|v| ROUTE_VERBS.contains(v)) else {
            return NodeOutcome::Ignored;
        };

        let Some(arguments) = node.child_by_field_name("arguments") else {
            return NodeOutcome::Ignored;
        };
        let mut cursor = arguments.walk();
        let args: Vec<Node> =
            arguments.named_children(&mut cursor).filter(|a| a.kind() != "comment").collect();
        if args.len() < 2 {
            return NodeOutcome::Ignored;
        }

        // A handler passed by name is recorded where it is declared.
        if !matches!(
            unwrap_parens(args[1]).kind(),
            "arrow_function" | "function_expression" | "function"
        ) {
            return NodeOutcome::Ignored;
        }

        let Some(route_path) = self.string_literal(args[0]) else {
            return NodeOutcome::Skipped(format!(
                "`{verb}` route handler has no literal path to derive a name from"
            ));
        };

        let name = route_function_name(verb, &route_path);
        NodeOutcome::Found(self.annotate(name, statement_anchor(node)))
    }

    /// Build a function entry, mining tags from comments directly above `anchor`.
    fn annotate(&self, name: String, anchor: Node<'_>) -> NamedFunction {
        let tags = parse_comment_tags(&self.leading_comments(anchor));
        NamedFunction::new(name)
            .with_functionality_id(tags.functionality_id)
            .with_test_file(tags.test_file)
    }

    /// Concatenate the contiguous run of comments immediately preceding `node`.
    fn leading_comments(&self, node: Node<'_>) -> String {
        let mut comments = Vec::new();
        let mut current = node.prev_sibling();
        while let Some(sibling) = current {
            if sibling.kind() != "comment" {
                break;
            }
            if let Some(text) = self.text(sibling) {
                comments.push(text);
            }
            current = sibling.prev_sibling();
        }
        comments.reverse();
        comments.join("\n")
    }

    fn identifier_text(&self, node: Option<Node<'_>>) -> Option<String> {
        let node = node?;
        if node.is_missing() || node.is_error() {
            return None;
        }
        self.text(node).filter(|t| !t.is_empty()).map(str::to_string)
    }

    /// Contents of a quoted string or a template string without substitutions.
    fn string_literal(&self, node: Node<'_>) -> Option<String> {
        match node.kind() {
            "string" => {}
            "template_string" => {
                let mut cursor = node.walk();
                let interpolated = node
                    .named_children(&mut cursor)
                    .any(|child| child.kind() == "template_substitution");
                if interpolated {
                    return None;
                }
            }
            _ => return None,
        }
        let text = self.text(node)?;
        let inner = text.get(1..text.len().checked_sub(1)?)?;
        Some(inner.to_string())
    }

    fn text(&self, node: Node<'_>) -> Option<&'a str> {
        node.utf8_text(self.source).ok()
    }
}

/// The statement whose leading comments describe `node`: the node itself, or
/// its enclosing declaration/expression statement and `export` wrapper.
fn statement_anchor(node: Node<'_>) -> Node<'_> {
    let mut anchor = node;
    while let Some(parent) = anchor.parent() {
        match parent.kind() {
            "export_statement" | "expression_statement" => anchor = parent,
            "lexical_declaration" | "variable_declaration"
                if anchor.kind() == "variable_declarator" =>
            {
                anchor = parent
            }
            _ => break,
        }
    }
    anchor
}

fn unwrap_parens(mut node: Node<'_>) -> Node<'_> {
    while node.kind() == "parenthesized_expression" {
        match node.named_child(0) {
            Some(inner) => node = inner,
            None => break,
        }
    }
    node
}

fn first_syntax_error(root: Node<'_>) -> Option<Node<'_>> {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        if node.has_error() {
            let mut cursor = node.walk();
            let children: Vec<Node> = node.children(&mut cursor).collect();
            stack.extend(children.into_iter().rev());
        }
    }
    None
}

fn position(node: Node<'_>) -> (usize, usize) {
    let point = node.start_position();
    (point.row + 1, point.column + 1)
}

fn diagnostic_for(path: &Path, node: Node<'_>, reason: String) -> Diagnostic {
    let (line, column) = position(node);
    Diagnostic { path: PathBuf::from(path), line, column, reason }
}
