use std::result;
use source_span::Span;
use thiserror::Error;
use crate::Located;
use super::Token;

#[derive(Debug, Error)]
pub enum Error {
	#[error("io: {0}")]
	IO(#[from] std::io::Error),

	#[error("missing parenthesis `)'")]
	MissingClosingParenthesis,

	#[error("unterminated {0}")]
	Unterminated(&'static str),

	#[error("unexpected token `{0}'")]
	UnexpectedToken(Token),

	#[error("unexpected token: expected `{1}', got `{0}'")]
	ExpectedToken(Token, Token),

	#[error("unexpected end of input")]
	UnexpectedEnd,

	#[error("invalid litteral `{0}'")]
	InvalidLitteral(String),

	#[error("unexpected trailing input `{0}'")]
	TrailingInput(Token)
}

impl Error {
	pub fn at(self, span: Span) -> Located<Error> {
		Located::new(self, span)
	}
}

pub type Result<T> = result::Result<T, Located<Error>>;
