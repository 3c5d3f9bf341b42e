use std::result;
use source_span::Span;
use thiserror::Error;
use crate::{Located, Keyword};

/**
 * Error raised when rebuilding a term from a solver reply.
 */
#[derive(Debug, Error)]
pub enum Error {
	#[error("the empty list is not a term")]
	EmptyList,

	#[error("unexpected keyword `{0}' in term")]
	UnexpectedKeyword(Keyword),

	#[error("invalid function head: expected a symbol or an indexed identifier, got a {0}")]
	InvalidHead(&'static str),

	#[error("invalid index `{0}'")]
	InvalidIndex(String),

	#[error("malformed {0}")]
	Malformed(&'static str),

	#[error("expected a {0}, got a {1}")]
	Expected(&'static str, &'static str)
}

impl Error {
	pub fn at(self, span: Span) -> Located<Error> {
		Located::new(self, span)
	}
}

pub type Result<T> = result::Result<T, Located<Error>>;
