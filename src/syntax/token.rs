use std::fmt;
use num_bigint::BigUint;
use source_span::Span;
use crate::Located;

/**
 * Litteral constants.
 */
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Litteral {
	/**
	 * Non-negative integer.
	 */
	Numeral(BigUint),

	/**
	 * Decimal, kept in its textual form.
	 */
	Decimal(String),

	/**
	 * Binary digits of a `#b` litteral.
	 */
	Binary(String),

	/**
	 * Hexadecimal digits of a `#x` litteral.
	 */
	Hexadecimal(String),

	/**
	 * String litteral, unescaped.
	 */
	String(String)
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Token {
	/**
	 * Opening parenthesis.
	 */
	Begin,

	/**
	 * Closing parenthesis.
	 */
	End,

	/**
	 * Symbol, with the enclosing `|` removed if it was quoted.
	 */
	Ident(String),

	/**
	 * Keyword, including the leading `:`.
	 */
	Keyword(String),

	/**
	 * Litteral constant.
	 */
	Litteral(Litteral)
}

impl Token {
	pub fn at(self, span: Span) -> Located<Token> {
		Located::new(self, span)
	}
}

impl fmt::Display for Token {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		use self::Token::*;
		match self {
			Begin => write!(f, "("),
			End => write!(f, ")"),
			Ident(id) => write!(f, "{}", id),
			Keyword(id) => write!(f, "{}", id),
			Litteral(lit) => write!(f, "{}", lit)
		}
	}
}

impl fmt::Display for Litteral {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		use self::Litteral::*;
		match self {
			Numeral(i) => write!(f, "{}", i),
			Decimal(d) => write!(f, "{}", d),
			Binary(b) => write!(f, "#b{}", b),
			Hexadecimal(h) => write!(f, "#x{}", h),
			String(s) => write!(f, "\"{}\"", s)
		}
	}
}
