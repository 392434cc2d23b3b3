use std::fmt;

/// Result of evaluating a syntax tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Number(f64),
    /// String contents without the surrounding quotes.
    Text(String),
}

impl Value {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Number(_) => None,
            Self::Text(s) => Some(s),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::Text(_) => "string",
        }
    }

    /// Type and value together, for diagnostics: `number (3)`, `string ('a')`.
    pub fn describe(&self) -> String {
        match self {
            Self::Number(_) => format!("number ({self})"),
            Self::Text(s) => format!("string ('{s}')"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{n}")
                }
            }
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}
