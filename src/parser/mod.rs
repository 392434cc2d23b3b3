use crate::ast::*;
use crate::error::SyntaxError;
use crate::scanner;
use crate::scanner::token::{Span, Token, TokenKind};

/// Scan and parse one line.
pub fn parse(source: &str) -> Result<SyntaxNode, SyntaxError> {
    let tokens = scanner::scan(source)?;
    Parser::new(tokens).parse()
}

/// Recursive-descent parser for a single statement:
///
/// ```text
/// start        := declaration | assignment | expr
/// declaration  := "int" NAME "=" expr
/// assignment   := NAME "=" expr
/// expr         := term (("+" | "-") term)*
/// term         := factor (("*" | "/") factor)*
/// factor       := NUMBER | STRING | "-" factor | "(" expr ")"
/// ```
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
}

impl Parser {
    /// `tokens` must end with an `Eof` token, as produced by [`scanner::scan`].
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, current: 0 }
    }

    pub fn parse(mut self) -> Result<SyntaxNode, SyntaxError> {
        let node = self.start()?;
        if !self.is_at_end() {
            let token = self.peek();
            return Err(SyntaxError::at(
                format!("unexpected '{}' after end of statement", token.lexeme),
                token.span,
            ));
        }
        Ok(node)
    }

    fn start(&mut self) -> Result<SyntaxNode, SyntaxError> {
        if self.check(TokenKind::Int) {
            self.declaration()
        } else if self.check(TokenKind::Name) && self.check_next(TokenKind::Equal) {
            self.assignment()
        } else {
            self.expression()
        }
    }

    fn declaration(&mut self) -> Result<SyntaxNode, SyntaxError> {
        let start = self.current_span();
        self.advance(); // consume 'int'
        let name = self.expect_name("variable name after 'int'")?;
        self.consume(TokenKind::Equal, "'=' after variable name")?;
        let value = self.expression()?;
        let span = start.to(value.span());
        Ok(SyntaxNode::Declare(DeclareStmt {
            name,
            value: Box::new(value),
            span,
        }))
    }

    fn assignment(&mut self) -> Result<SyntaxNode, SyntaxError> {
        let name = self.expect_name("variable name")?;
        self.consume(TokenKind::Equal, "'=' after variable name")?;
        let value = self.expression()?;
        let span = name.span.to(value.span());
        Ok(SyntaxNode::Assign(AssignStmt {
            name,
            value: Box::new(value),
            span,
        }))
    }

    fn expression(&mut self) -> Result<SyntaxNode, SyntaxError> {
        let mut node = self.term()?;
        while let Some(op) = self.match_binary_op(&[TokenKind::Plus, TokenKind::Minus]) {
            let right = self.term()?;
            node = binary(node, op, right);
        }
        Ok(node)
    }

    fn term(&mut self) -> Result<SyntaxNode, SyntaxError> {
        let mut node = self.factor()?;
        while let Some(op) = self.match_binary_op(&[TokenKind::Star, TokenKind::Slash]) {
            let right = self.factor()?;
            node = binary(node, op, right);
        }
        Ok(node)
    }

    fn factor(&mut self) -> Result<SyntaxNode, SyntaxError> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::Number => {
                self.advance();
                let value = token.lexeme.parse::<f64>().map_err(|_| {
                    SyntaxError::at(
                        format!("invalid number literal '{}'", token.lexeme),
                        token.span,
                    )
                })?;
                Ok(SyntaxNode::Number(NumberLit {
                    literal: token.lexeme,
                    value,
                    span: token.span,
                }))
            }
            TokenKind::String => {
                self.advance();
                Ok(SyntaxNode::StringLit(StringLit {
                    literal: token.lexeme,
                    span: token.span,
                }))
            }
            TokenKind::Minus => {
                self.advance();
                let operand = self.factor()?;
                let span = token.span.to(operand.span());
                Ok(SyntaxNode::Negate(NegateExpr {
                    operand: Box::new(operand),
                    span,
                }))
            }
            TokenKind::LeftParen => {
                self.advance();
                let node = self.expression()?;
                self.consume(TokenKind::RightParen, "')' after expression")?;
                Ok(node)
            }
            TokenKind::Name => Err(SyntaxError::at(
                format!(
                    "'{}' cannot be used as a value; a name may only appear before '='",
                    token.lexeme
                ),
                token.span,
            )),
            _ => Err(SyntaxError::at(
                format!("expected expression, found {}", describe(&token)),
                token.span,
            )),
        }
    }

    // --- Helper methods ---

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        &self.tokens[self.current - 1]
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn check_next(&self, kind: TokenKind) -> bool {
        self.tokens
            .get(self.current + 1)
            .is_some_and(|t| t.kind == kind)
    }

    fn match_binary_op(&mut self, kinds: &[TokenKind]) -> Option<BinaryOp> {
        for &kind in kinds {
            if self.check(kind) {
                self.advance();
                return Some(token_to_binary_op(kind));
            }
        }
        None
    }

    fn consume(&mut self, kind: TokenKind, message: &str) -> Result<&Token, SyntaxError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            let token = self.peek();
            Err(SyntaxError::at(
                format!("expected {message}, found {}", describe(token)),
                token.span,
            ))
        }
    }

    fn expect_name(&mut self, context: &str) -> Result<Identifier, SyntaxError> {
        if self.check(TokenKind::Name) {
            let token = self.advance();
            Ok(Identifier {
                name: token.lexeme.clone(),
                span: token.span,
            })
        } else {
            let token = self.peek();
            Err(SyntaxError::at(
                format!("expected {context}, found {}", describe(token)),
                token.span,
            ))
        }
    }

    fn current_span(&self) -> Span {
        self.peek().span
    }
}

fn binary(left: SyntaxNode, operator: BinaryOp, right: SyntaxNode) -> SyntaxNode {
    let span = left.span().to(right.span());
    SyntaxNode::Binary(BinaryExpr {
        left: Box::new(left),
        operator,
        right: Box::new(right),
        span,
    })
}

fn describe(token: &Token) -> String {
    match token.kind {
        TokenKind::Eof => "end of input".to_string(),
        _ => format!("'{}'", token.lexeme),
    }
}

fn token_to_binary_op(kind: TokenKind) -> BinaryOp {
    match kind {
        TokenKind::Plus => BinaryOp::Add,
        TokenKind::Minus => BinaryOp::Sub,
        TokenKind::Star => BinaryOp::Mul,
        TokenKind::Slash => BinaryOp::Div,
        _ => unreachable!("only called with matched operator tokens"),
    }
}
