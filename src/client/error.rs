use std::io;
use thiserror::Error;
use crate::{syntax, Located};
use super::state::Violation;

#[derive(Debug, Error)]
pub enum Error {
    /// A precondition failed; nothing was sent to the solver.
    #[error("{0}")]
    Protocol(#[from] Violation),

    #[error("unable to translate the command: {0}")]
    Translate(#[from] syntax::display::Error),

    /// Communication with the solver failed. The session is terminated.
    #[error("io: {0}")]
    Io(#[from] io::Error),

    /// The solver reported an error. The session is still usable.
    #[error("solver responded with an error: {0}")]
    Solver(String),

    #[error("unexpected solver response, expected {expected}: `{raw}'")]
    UnexpectedResponse {
        expected: &'static str,
        raw: String
    },

    #[error("syntax error in the solver response: {0}")]
    Syntax(#[from] Located<syntax::Error>),

    #[error("unable to compile the solver response: {0}")]
    Compile(#[from] Located<crate::error::Error>),

    #[error("the solver has terminated")]
    Terminated,

    #[error("unable to open the output channel `{0}': {1}")]
    Output(String, #[source] io::Error)
}

pub type Result<T> = std::result::Result<T, Error>;
