pub mod value;

use std::fmt;

use tracing::info;

use crate::ast::*;
use crate::error::SemanticError;
use crate::evaluator::value::Value;

/// Observable side effect of a verified assignment or declaration. Nothing is
/// stored; the notice only reports what was checked.
#[derive(Clone, Debug, PartialEq)]
pub enum Notice {
    Assigned { name: String, value: Value },
    Declared { name: String, value: Value },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Assigned { name, value } => write!(f, "assignment: {name} = {value}"),
            Self::Declared { name, value } => write!(f, "declaration: int {name} = {value}"),
        }
    }
}

/// Syntax-directed translator: computes a [`Value`] for a tree bottom-up.
///
/// Holds no bindings. The only state is the list of notices emitted while
/// evaluating, so a fresh evaluator per line is the expected usage.
#[derive(Debug, Default)]
pub struct Evaluator {
    notices: Vec<Notice>,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notices emitted so far, in evaluation order.
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn evaluate(&mut self, node: &SyntaxNode) -> Result<Value, SemanticError> {
        match node {
            SyntaxNode::Number(n) => Ok(Value::Number(n.value)),
            SyntaxNode::StringLit(s) => Ok(Value::Text(strip_quotes(&s.literal).to_string())),
            SyntaxNode::Negate(n) => match self.evaluate(&n.operand)? {
                Value::Number(x) => Ok(Value::Number(-x)),
                other => Err(SemanticError::type_mismatch(
                    format!("operator '-' requires a number, found {}", other.describe()),
                    n.span,
                )),
            },
            SyntaxNode::Binary(b) => self.evaluate_binary(b),
            SyntaxNode::Assign(a) => {
                let value = self.evaluate(&a.value)?;
                info!(name = %a.name.name, value = %value, "assignment verified");
                self.notices.push(Notice::Assigned {
                    name: a.name.name.clone(),
                    value: value.clone(),
                });
                Ok(value)
            }
            SyntaxNode::Declare(d) => {
                let value = self.evaluate(&d.value)?;
                if let Value::Text(ref text) = value {
                    return Err(SemanticError::type_mismatch(
                        format!(
                            "cannot assign a string ('{text}') to 'int {}'",
                            d.name.name
                        ),
                        d.value.span(),
                    ));
                }
                info!(name = %d.name.name, value = %value, "declaration verified");
                self.notices.push(Notice::Declared {
                    name: d.name.name.clone(),
                    value: value.clone(),
                });
                Ok(value)
            }
        }
    }

    fn evaluate_binary(&mut self, b: &BinaryExpr) -> Result<Value, SemanticError> {
        let left = self.evaluate(&b.left)?;
        let right = self.evaluate(&b.right)?;

        let (l, r) = match (&left, &right) {
            (Value::Number(l), Value::Number(r)) => (*l, *r),
            _ => {
                return Err(SemanticError::type_mismatch(
                    format!(
                        "operator '{}' requires numbers, found {} and {}",
                        b.operator,
                        left.describe(),
                        right.describe()
                    ),
                    b.span,
                ));
            }
        };

        let result = match b.operator {
            BinaryOp::Add => l + r,
            BinaryOp::Sub => l - r,
            BinaryOp::Mul => l * r,
            BinaryOp::Div => {
                if r == 0.0 {
                    return Err(SemanticError::division_by_zero(
                        format!("cannot divide {left} by zero"),
                        b.right.span(),
                    ));
                }
                l / r
            }
        };
        Ok(Value::Number(result))
    }
}

/// Drop exactly one leading and one trailing character (the quotes).
fn strip_quotes(literal: &str) -> &str {
    let mut chars = literal.chars();
    chars.next();
    chars.next_back();
    chars.as_str()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::parser;
    use rstest::rstest;

    fn eval(source: &str) -> Result<Value, SemanticError> {
        let tree = parser::parse(source).expect("parse should succeed");
        Evaluator::new().evaluate(&tree)
    }

    fn eval_number(source: &str) -> f64 {
        match eval(source).expect("evaluation should succeed") {
            Value::Number(n) => n,
            other => panic!("expected number, got {other:?}"),
        }
    }

    #[rstest]
    #[case("1 + 2 * 3", 7.0)]
    #[case("(1 + 2) * 3", 9.0)]
    #[case("8 - 4 - 2", 2.0)]
    #[case("8 / 4 / 2", 1.0)]
    #[case("-3 + 5", 2.0)]
    #[case("--4", 4.0)]
    #[case("-(2 * 3)", -6.0)]
    #[case("2.5 * 2", 5.0)]
    #[case(".5 + 5.", 5.5)]
    #[case("1e3 / 8", 125.0)]
    #[case("7 / 2", 3.5)]
    fn arithmetic(#[case] source: &str, #[case] expected: f64) {
        assert_eq!(eval_number(source), expected);
    }

    #[test]
    fn declaration_returns_number() {
        assert_eq!(eval("int x = 5").unwrap(), Value::Number(5.0));
        assert_eq!(
            eval("int operac = 2 + (3 - 1) * 5 / 2").unwrap(),
            Value::Number(7.0)
        );
    }

    #[test]
    fn assignment_accepts_strings() {
        assert_eq!(
            eval("x = 'Hola mundo'").unwrap(),
            Value::Text("Hola mundo".to_string())
        );
        assert_eq!(
            eval("x = \"double\"").unwrap(),
            Value::Text("double".to_string())
        );
    }

    #[test]
    fn empty_string_literal() {
        assert_eq!(eval("''").unwrap(), Value::Text(String::new()));
    }

    #[test]
    fn declaration_rejects_strings() {
        let err = eval("int z = 'falla'").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert_eq!(err.message(), "cannot assign a string ('falla') to 'int z'");
    }

    #[test]
    fn division_by_zero_is_a_runtime_error() {
        let err = eval("x = 9/0").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DivisionByZero);
        assert_eq!(err.message(), "cannot divide 9 by zero");
    }

    #[rstest]
    #[case("1 / (2 - 2)")]
    #[case("1 / -0")]
    #[case("int y = 4 / (0 * 3)")]
    fn computed_zero_divisors(#[case] source: &str) {
        assert_eq!(eval(source).unwrap_err().kind(), ErrorKind::DivisionByZero);
    }

    #[rstest]
    #[case("'a' + 1")]
    #[case("2 * 'b'")]
    #[case("x = 'a' - 'b'")]
    #[case("-'a'")]
    #[case("int z = -('a')")]
    fn arithmetic_on_strings_is_a_type_mismatch(#[case] source: &str) {
        assert_eq!(eval(source).unwrap_err().kind(), ErrorKind::TypeMismatch);
    }

    #[test]
    fn operand_values_in_mismatch_message() {
        let err = eval("'a' + 1").unwrap_err();
        assert_eq!(
            err.message(),
            "operator '+' requires numbers, found string ('a') and number (1)"
        );
    }

    #[test]
    fn type_mismatch_takes_precedence_over_zero_divisor() {
        let err = eval("'a' / 0").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    }

    #[test]
    fn notices_report_assignment_and_declaration() {
        let mut evaluator = Evaluator::new();
        let tree = parser::parse("int x = 2 * 3").unwrap();
        evaluator.evaluate(&tree).unwrap();
        let tree = parser::parse("y = 'hola'").unwrap();
        evaluator.evaluate(&tree).unwrap();

        assert_eq!(
            evaluator.notices(),
            &[
                Notice::Declared {
                    name: "x".to_string(),
                    value: Value::Number(6.0),
                },
                Notice::Assigned {
                    name: "y".to_string(),
                    value: Value::Text("hola".to_string()),
                },
            ]
        );
        assert_eq!(evaluator.notices()[0].to_string(), "declaration: int x = 6");
        assert_eq!(evaluator.notices()[1].to_string(), "assignment: y = hola");
    }

    #[test]
    fn failed_declaration_emits_no_notice() {
        let mut evaluator = Evaluator::new();
        let tree = parser::parse("int z = 'falla'").unwrap();
        assert!(evaluator.evaluate(&tree).is_err());
        assert!(evaluator.notices().is_empty());
    }

    #[test]
    fn bare_expression_emits_no_notice() {
        let mut evaluator = Evaluator::new();
        let tree = parser::parse("1 + 1").unwrap();
        evaluator.evaluate(&tree).unwrap();
        assert!(evaluator.notices().is_empty());
    }

    #[test]
    fn strip_quotes_removes_one_pair() {
        assert_eq!(strip_quotes("'abc'"), "abc");
        assert_eq!(strip_quotes("\"\""), "");
        assert_eq!(strip_quotes("'\"x\"'"), "\"x\"");
    }
}
