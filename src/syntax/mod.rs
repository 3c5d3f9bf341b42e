/**
 * SMT2-lib syntax.
 */

use std::iter::Peekable;
use source_span::Span;

pub use crate::location::*;

pub mod error;
pub mod ast;
pub mod token;
pub mod lexer;
pub mod response;
pub mod display;

pub use error::*;
pub use ast::*;
pub use token::Token;
pub use lexer::Lexer;
pub use display::{Display, Formatter, Dialect, Grouping, Z3, translate};

pub trait Parsable : Sized {
	/**
	 * Parse from a lexer.
	 */
	fn parse<L>(lexer: &mut Peekable<L>) -> Result<Self> where L: Iterator<Item=Result<Located<Token>>>;
}

/**
 * Peek the next token from a lexer.
 *
 * Returns `None` at the end of the input.
 * A lexing error is consumed and returned.
 */
pub(crate) fn peek<L>(lexer: &mut Peekable<L>) -> Result<Option<Located<Token>>> where L: Iterator<Item=Result<Located<Token>>> {
	match lexer.peek() {
		Some(Ok(token)) => Ok(Some(token.clone())),
		Some(Err(_)) => match lexer.next() {
			Some(Err(e)) => Err(e),
			_ => Ok(None)
		},
		None => Ok(None)
	}
}

/**
 * Consume the next token from a lexer.
 */
pub(crate) fn consume<L>(lexer: &mut Peekable<L>) -> Result<Located<Token>> where L: Iterator<Item=Result<Located<Token>>> {
	match lexer.next() {
		Some(Ok(token)) => Ok(token),
		Some(Err(error)) => Err(error),
		None => Err(Error::UnexpectedEnd.at(nowhere()))
	}
}

/**
 * Consume the next token and ensure it is the given one.
 */
pub(crate) fn consume_token<L>(lexer: &mut Peekable<L>, expected: Token) -> Result<Span> where L: Iterator<Item=Result<Located<Token>>> {
	let token = consume(lexer)?;
	if *token == expected {
		Ok(token.span())
	} else {
		let span = token.span();
		Err(Error::ExpectedToken(token.into_inner(), expected).at(span))
	}
}

/**
 * Parse items until the closing parenthesis, which is consumed.
 *
 * The span is extended up to the closing parenthesis.
 */
pub(crate) fn parse_list<L, T: Parsable>(lexer: &mut Peekable<L>, span: &mut Span) -> Result<Vec<T>> where L: Iterator<Item=Result<Located<Token>>> {
	let mut list = Vec::new();

	loop {
		match peek(lexer)? {
			Some(token) => match token.as_ref() {
				Token::End => {
					consume(lexer)?;
					*span = span.union(token.span());
					break
				},
				_ => list.push(T::parse(lexer)?)
			},
			None => return Err(Error::MissingClosingParenthesis.at(*span))
		}
	}

	Ok(list)
}

impl From<token::Litteral> for Constant {
	fn from(lit: token::Litteral) -> Constant {
		use token::Litteral;
		match lit {
			Litteral::Numeral(n) => Constant::Numeral(n),
			Litteral::Decimal(d) => Constant::Decimal(d),
			Litteral::Binary(b) => Constant::Binary(b),
			Litteral::Hexadecimal(h) => Constant::Hexadecimal(h),
			Litteral::String(s) => Constant::String(s)
		}
	}
}

impl Parsable for Located<SExpr> {
	fn parse<L>(lexer: &mut Peekable<L>) -> Result<Located<SExpr>> where L: Iterator<Item=Result<Located<Token>>> {
		let token = consume(lexer)?;
		let mut span = token.span();

		let expr = match token.into_inner() {
			Token::Begin => {
				let items = parse_list(lexer, &mut span)?;
				SExpr::List(items)
			},
			Token::Ident(id) => SExpr::Sym(Symbol::new(id)),
			Token::Keyword(id) => SExpr::Keyword(Keyword::new(id)),
			Token::Litteral(lit) => SExpr::Constant(lit.into()),
			unexpected => return Err(Error::UnexpectedToken(unexpected).at(span))
		};

		Ok(Located::new(expr, span))
	}
}

/**
 * Parse exactly one S-expression from the given text.
 *
 * Anything but whitespaces and comments after the expression is an error.
 */
pub fn parse_str(text: &str) -> Result<Located<SExpr>> {
	let mut lexer = Lexer::from_text(text).peekable();
	let expr = Located::<SExpr>::parse(&mut lexer)?;
	match peek(&mut lexer)? {
		Some(token) => {
			let span = token.span();
			Err(Error::TrailingInput(token.into_inner()).at(span))
		},
		None => Ok(expr)
	}
}
