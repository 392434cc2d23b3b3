use crate::ast::*;

const INDENT: &str = "  ";

/// Output format for a rendered parse tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum TreeFormat {
    /// Indented rule names, one node per line.
    #[default]
    Tree,
    Sexp,
    Json,
}

pub fn render(node: &SyntaxNode, format: TreeFormat) -> String {
    match format {
        TreeFormat::Tree => to_tree(node),
        TreeFormat::Sexp => {
            let mut buf = to_sexp(node);
            buf.push('\n');
            buf
        }
        TreeFormat::Json => to_json(node),
    }
}

pub fn to_sexp(node: &SyntaxNode) -> String {
    let mut buf = String::new();
    sexp_node(&mut buf, node);
    buf
}

pub fn to_json(node: &SyntaxNode) -> String {
    serde_json::to_string_pretty(node).expect("syntax tree should be serializable")
}

/// Rule-name rendering: a node whose only child is a token is printed on one
/// line as `rule\ttoken`; otherwise the rule name is followed by its children
/// one indentation level deeper.
pub fn to_tree(node: &SyntaxNode) -> String {
    let mut buf = String::new();
    tree_node(&mut buf, node, 0);
    buf
}

fn sexp_node(buf: &mut String, node: &SyntaxNode) {
    match node {
        SyntaxNode::Number(n) => buf.push_str(&n.literal),
        SyntaxNode::StringLit(s) => buf.push_str(&s.literal),
        SyntaxNode::Negate(n) => {
            buf.push_str("(- ");
            sexp_node(buf, &n.operand);
            buf.push(')');
        }
        SyntaxNode::Binary(b) => {
            buf.push('(');
            buf.push_str(&b.operator.to_string());
            buf.push(' ');
            sexp_node(buf, &b.left);
            buf.push(' ');
            sexp_node(buf, &b.right);
            buf.push(')');
        }
        SyntaxNode::Assign(a) => {
            buf.push_str("(= ");
            buf.push_str(&a.name.name);
            buf.push(' ');
            sexp_node(buf, &a.value);
            buf.push(')');
        }
        SyntaxNode::Declare(d) => {
            buf.push_str("(int ");
            buf.push_str(&d.name.name);
            buf.push(' ');
            sexp_node(buf, &d.value);
            buf.push(')');
        }
    }
}

fn tree_leaf(buf: &mut String, level: usize, rule: &str, token: &str) {
    buf.push_str(&INDENT.repeat(level));
    buf.push_str(rule);
    buf.push('\t');
    buf.push_str(token);
    buf.push('\n');
}

fn tree_rule(buf: &mut String, level: usize, rule: &str) {
    buf.push_str(&INDENT.repeat(level));
    buf.push_str(rule);
    buf.push('\n');
}

fn tree_token(buf: &mut String, level: usize, token: &str) {
    buf.push_str(&INDENT.repeat(level));
    buf.push_str(token);
    buf.push('\n');
}

fn tree_node(buf: &mut String, node: &SyntaxNode, level: usize) {
    match node {
        SyntaxNode::Number(n) => tree_leaf(buf, level, "number", &n.literal),
        SyntaxNode::StringLit(s) => tree_leaf(buf, level, "string", &s.literal),
        SyntaxNode::Negate(n) => {
            tree_rule(buf, level, "neg");
            tree_node(buf, &n.operand, level + 1);
        }
        SyntaxNode::Binary(b) => {
            tree_rule(buf, level, b.operator.rule_name());
            tree_node(buf, &b.left, level + 1);
            tree_node(buf, &b.right, level + 1);
        }
        SyntaxNode::Assign(a) => {
            tree_rule(buf, level, "assign_var");
            tree_token(buf, level + 1, &a.name.name);
            tree_node(buf, &a.value, level + 1);
        }
        SyntaxNode::Declare(d) => {
            tree_rule(buf, level, "declare_var");
            tree_token(buf, level + 1, &d.name.name);
            tree_node(buf, &d.value, level + 1);
        }
    }
}
