use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::scanner::token::Span;

// ============= Syntax errors (scanner and parser) =============

#[derive(Error, Debug, Diagnostic)]
#[error("syntax error: {message}")]
#[diagnostic(code(sdt::syntax))]
pub struct SyntaxError {
    pub message: String,
    #[label("here")]
    pub span: SourceSpan,
    #[source_code]
    pub src: NamedSource<String>,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, offset: usize, len: usize) -> Self {
        Self {
            message: message.into(),
            span: SourceSpan::new(offset.into(), len),
            src: NamedSource::new("input", String::new()),
        }
    }

    pub fn at(message: impl Into<String>, span: Span) -> Self {
        Self::new(message, span.offset, span.len)
    }

    /// Byte offset of the offending input.
    pub fn offset(&self) -> usize {
        self.span.offset()
    }

    /// Attach source code for fancy miette diagnostics
    pub fn with_source_code(self, name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            src: NamedSource::new(name.into(), source.into()),
            ..self
        }
    }
}

// ============= Semantic errors (evaluator) =============

#[derive(Error, Debug, Diagnostic)]
pub enum SemanticError {
    #[error("type mismatch: {message}")]
    #[diagnostic(code(sdt::type_mismatch))]
    TypeMismatch {
        message: String,
        #[label("here")]
        span: SourceSpan,
        #[source_code]
        src: NamedSource<String>,
    },

    #[error("division by zero: {message}")]
    #[diagnostic(code(sdt::division_by_zero))]
    DivisionByZero {
        message: String,
        #[label("divisor is zero")]
        span: SourceSpan,
        #[source_code]
        src: NamedSource<String>,
    },
}

impl SemanticError {
    pub fn type_mismatch(message: impl Into<String>, span: Span) -> Self {
        Self::TypeMismatch {
            message: message.into(),
            span: span.into(),
            src: NamedSource::new("input", String::new()),
        }
    }

    pub fn division_by_zero(message: impl Into<String>, span: Span) -> Self {
        Self::DivisionByZero {
            message: message.into(),
            span: span.into(),
            src: NamedSource::new("input", String::new()),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::TypeMismatch { message, .. } | Self::DivisionByZero { message, .. } => message,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            Self::DivisionByZero { .. } => ErrorKind::DivisionByZero,
        }
    }

    /// Attach source code for fancy miette diagnostics
    pub fn with_source_code(self, name: impl Into<String>, source: impl Into<String>) -> Self {
        let src = NamedSource::new(name.into(), source.into());
        match self {
            Self::TypeMismatch { message, span, .. } => Self::TypeMismatch { message, span, src },
            Self::DivisionByZero { message, span, .. } => {
                Self::DivisionByZero { message, span, src }
            }
        }
    }
}

// ============= Pipeline errors =============

/// Classification of a failed evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    Syntax,
    TypeMismatch,
    DivisionByZero,
}

/// Any failure of the text → tree → value pipeline, keeping its origin.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Semantic(#[from] SemanticError),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Syntax(_) => ErrorKind::Syntax,
            Self::Semantic(e) => e.kind(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Syntax(e) => &e.message,
            Self::Semantic(e) => e.message(),
        }
    }

    pub fn is_syntax(&self) -> bool {
        matches!(self, Self::Syntax(_))
    }

    pub fn is_semantic(&self) -> bool {
        matches!(self, Self::Semantic(_))
    }

    pub fn with_source_code(self, name: impl Into<String>, source: impl Into<String>) -> Self {
        match self {
            Self::Syntax(e) => Self::Syntax(e.with_source_code(name, source)),
            Self::Semantic(e) => Self::Semantic(e.with_source_code(name, source)),
        }
    }
}

// ============= Tests =============
