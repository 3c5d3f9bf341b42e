use std::fmt;
use crate::{Located, Symbol, SExpr, Term, AttributeValue, PList};

pub mod legacy;
mod decode;

pub use decode::Decoder;

/// Outcome of a `check-sat`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Verdict {
    Sat,
    Unsat,
    Unknown,
    Timeout
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Sat => write!(f, "sat"),
            Verdict::Unsat => write!(f, "unsat"),
            Verdict::Unknown => write!(f, "unknown"),
            Verdict::Timeout => write!(f, "timeout")
        }
    }
}

/// Shape of the reply a command expects.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Expect {
    /// `success` acknowledgement.
    Success,

    /// `sat`, `unsat`, `unknown` or `timeout`.
    CheckSat,

    /// List of symbols (`get-unsat-core`).
    Symbols,

    /// List of `(term value)` pairs (`get-value`).
    Values,

    /// List of terms (`get-assertions`).
    Assertions,

    /// Any S-expression (`get-model`, `get-proof`, `get-info`, `get-assignment`).
    SExpr,

    /// Echoed text.
    Text
}

impl Expect {
    pub fn name(&self) -> &'static str {
        match self {
            Expect::Success => "success",
            Expect::CheckSat => "check-sat verdict",
            Expect::Symbols => "list of symbols",
            Expect::Values => "list of values",
            Expect::Assertions => "list of assertions",
            Expect::SExpr => "s-expression",
            Expect::Text => "text"
        }
    }
}

/// Typed solver response.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Response {
    Success,
    Sat,
    Unsat,
    Unknown,
    Timeout,
    Unsupported,
    Values(Vec<(Term, Term)>),
    Symbols(Vec<Symbol>),
    Assertions(Vec<Term>),

    /// Option value, answered locally.
    Value(AttributeValue),

    SExpr(Located<SExpr>),
    Text(String)
}

impl Response {
    pub fn verdict(&self) -> Option<Verdict> {
        match self {
            Response::Sat => Some(Verdict::Sat),
            Response::Unsat => Some(Verdict::Unsat),
            Response::Unknown => Some(Verdict::Unknown),
            Response::Timeout => Some(Verdict::Timeout),
            _ => None
        }
    }

    pub fn is_success(&self) -> bool {
        match self {
            Response::Success => true,
            _ => false
        }
    }
}

impl From<Verdict> for Response {
    fn from(v: Verdict) -> Response {
        match v {
            Verdict::Sat => Response::Sat,
            Verdict::Unsat => Response::Unsat,
            Verdict::Unknown => Response::Unknown,
            Verdict::Timeout => Response::Timeout
        }
    }
}

struct ValuePair<'a>(&'a (Term, Term));

impl<'a> fmt::Display for ValuePair<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {})", (self.0).0, (self.0).1)
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Response::*;
        match self {
            Success => write!(f, "success"),
            Sat => write!(f, "sat"),
            Unsat => write!(f, "unsat"),
            Unknown => write!(f, "unknown"),
            Timeout => write!(f, "timeout"),
            Unsupported => write!(f, "unsupported"),
            Values(values) => {
                let pairs: Vec<ValuePair> = values.iter().map(ValuePair).collect();
                write!(f, "({})", PList(&pairs))
            },
            Symbols(symbols) => write!(f, "({})", PList(symbols)),
            Assertions(terms) => write!(f, "({})", PList(terms)),
            Value(value) => value.fmt(f),
            SExpr(expr) => expr.fmt(f),
            Text(text) => crate::syntax::ast::write_string_litteral(f, text)
        }
    }
}
