use std::fmt::Debug;

use serde::Serialize;

/// A sqlshim error. Used internally, exposed as sqlshim::ErrorMessage.
#[derive(Debug, Clone)]
pub struct Error {
    pub kind: MessageKind,
    pub reason: Reason,
    pub hints: Vec<String>,
    /// Machine readable identifier error code eg, "E0101"
    pub code: Option<&'static str>,
}

/// Compile message kind. Compilation either succeeds or fails, so there is
/// only one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum MessageKind {
    Error,
}

#[derive(Debug, Clone)]
pub enum Reason {
    Simple(String),
    Expected {
        who: Option<String>,
        expected: String,
        found: String,
    },
    Unexpected {
        found: String,
    },
    NotFound {
        name: String,
        namespace: String,
    },
    /// The emitter has no rendering rule for a node in this dialect.
    UnsupportedNode {
        node: String,
        dialect: String,
    },
    /// Ordering on a statement that cannot carry it.
    InvalidOrderingContext {
        statement: String,
    },
    InvalidArgument {
        details: String,
    },
    Bug {
        details: Option<String>,
    },
}

impl Error {
    pub fn new(reason: Reason) -> Self {
        let code = match &reason {
            Reason::UnsupportedNode { .. } => Some("E0101"),
            Reason::InvalidOrderingContext { .. } => Some("E0102"),
            Reason::InvalidArgument { .. } => Some("E0103"),
            _ => None,
        };
        Error {
            kind: MessageKind::Error,
            reason,
            hints: Vec::new(),
            code,
        }
    }

    pub fn new_simple<S: ToString>(reason: S) -> Self {
        Error::new(Reason::Simple(reason.to_string()))
    }

    pub fn new_unsupported<N: ToString, D: ToString>(node: N, dialect: D) -> Self {
        Error::new(Reason::UnsupportedNode {
            node: node.to_string(),
            dialect: dialect.to_string(),
        })
    }

    pub fn new_invalid_argument<S: ToString>(details: S) -> Self {
        Error::new(Reason::InvalidArgument {
            details: details.to_string(),
        })
    }

    /// Used for things that you *think* should never happen, but are not sure.
    pub fn new_assert<S: ToString>(details: S) -> Self {
        Error::new(Reason::Bug {
            details: Some(details.to_string()),
        })
    }
}

impl std::fmt::Display for Reason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Reason::Simple(text) => f.write_str(text),
            Reason::Expected {
                who,
                expected,
                found,
            } => {
                if let Some(who) = who {
                    write!(f, "{who} ")?;
                }
                write!(f, "expected {expected}, but found {found}")
            }
            Reason::Unexpected { found } => write!(f, "unexpected {found}"),
            Reason::NotFound { name, namespace } => write!(f, "{namespace} `{name}` not found"),
            Reason::UnsupportedNode { node, dialect } => {
                write!(f, "{node} is not supported by dialect `{dialect}`")
            }
            Reason::InvalidOrderingContext { statement } => {
                write!(f, "{statement} cannot be ordered in this context")
            }
            Reason::InvalidArgument { details } => write!(f, "invalid argument: {details}"),
            Reason::Bug { details } => {
                write!(f, "internal compiler error")?;
                if let Some(details) = details {
                    write!(f, "; {details}")?;
                }
                Ok(())
            }
        }
    }
}

// Needed for anyhow
impl std::error::Error for Error {}

// Needed for StdError
impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(&self, f)
    }
}

pub trait WithErrorInfo: Sized {
    fn push_hint<S: Into<String>>(self, hint: S) -> Self;
}

impl WithErrorInfo for Error {
    fn push_hint<S: Into<String>>(mut self, hint: S) -> Self {
        self.hints.push(hint.into());
        self
    }
}

impl<T, E: WithErrorInfo> WithErrorInfo for Result<T, E> {
    fn push_hint<S: Into<String>>(self, hint: S) -> Self {
        self.map_err(|e| e.push_hint(hint))
    }
}
