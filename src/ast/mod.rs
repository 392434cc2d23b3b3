pub mod printer;

use serde::Serialize;

use crate::scanner::token::Span;

/// A parsed line. Every node owns its children; the tree is never shared.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum SyntaxNode {
    Number(NumberLit),
    StringLit(StringLit),
    Negate(NegateExpr),
    Binary(BinaryExpr),
    Assign(AssignStmt),
    Declare(DeclareStmt),
}

impl SyntaxNode {
    pub fn span(&self) -> Span {
        match self {
            Self::Number(n) => n.span,
            Self::StringLit(s) => s.span,
            Self::Negate(n) => n.span,
            Self::Binary(b) => b.span,
            Self::Assign(a) => a.span,
            Self::Declare(d) => d.span,
        }
    }
}

/// Decimal literal exactly as written, with its value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumberLit {
    pub literal: String,
    pub value: f64,
    pub span: Span,
}

/// String literal including its surrounding quotes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StringLit {
    pub literal: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NegateExpr {
    pub operand: Box<SyntaxNode>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinaryExpr {
    pub left: Box<SyntaxNode>,
    pub operator: BinaryOp,
    pub right: Box<SyntaxNode>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
pub enum BinaryOp {
    #[strum(serialize = "+")]
    Add,
    #[strum(serialize = "-")]
    Sub,
    #[strum(serialize = "*")]
    Mul,
    #[strum(serialize = "/")]
    Div,
}

impl BinaryOp {
    /// Grammar rule name used by the indented tree rendering.
    pub fn rule_name(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Mul => "mul",
            Self::Div => "div",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Identifier {
    pub name: String,
    pub span: Span,
}

/// `NAME = expr`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignStmt {
    pub name: Identifier,
    pub value: Box<SyntaxNode>,
    pub span: Span,
}

/// `int NAME = expr`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeclareStmt {
    pub name: Identifier,
    pub value: Box<SyntaxNode>,
    pub span: Span,
}
