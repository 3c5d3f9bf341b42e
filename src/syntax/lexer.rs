use std::io;
use std::iter::Peekable;
use num_bigint::BigUint;
use source_span::{Position, Span};
use crate::Located;
use super::{token, Token, Result, Error};

pub struct Lexer<R: Iterator<Item=io::Result<char>>> {
	decoder: Peekable<R>,
	position: Position,
	start: Position,
	last: Position
}

/// Lexer over an in-memory string.
pub type StrLexer<'a> = Lexer<std::iter::Map<std::str::Chars<'a>, fn(char) -> io::Result<char>>>;

pub(crate) fn is_separator(c: char) -> bool {
	c == '(' || c == ')' || c == '"' || c == '|' || c == ';'
}

fn infallible(c: char) -> io::Result<char> {
	Ok(c)
}

impl<'a> Lexer<std::iter::Map<std::str::Chars<'a>, fn(char) -> io::Result<char>>> {
	pub fn from_text(text: &'a str) -> StrLexer<'a> {
		Lexer::new(text.chars().map(infallible as fn(char) -> io::Result<char>), Position::new(0, 0))
	}
}

impl<R: Iterator<Item = io::Result<char>>> Lexer<R> {
	pub fn new(source: R, cursor: Position) -> Lexer<R> {
		Lexer {
			decoder: source.peekable(),
			position: cursor,
			start: cursor,
			last: cursor
		}
	}

	/**
	 * Span of the characters consumed since the beginning of the current token.
	 */
	pub fn span(&self) -> Span {
		Span::new(self.start, self.last, self.position)
	}

	fn peek_char(&mut self) -> Result<Option<char>> {
		match self.decoder.peek() {
			Some(Ok(c)) => Ok(Some(*c)),
			Some(Err(_)) => {
				Ok(Some(self.consume()?)) // this will always fail.
			},
			None => Ok(None)
		}
	}

	fn consume(&mut self) -> Result<char> {
		match self.decoder.next() {
			Some(Ok(c)) => {
				self.last = self.position;
				if c == '\n' {
					self.position = Position::new(self.position.line+1, 0);
				} else {
					self.position = Position::new(self.position.line, self.position.column+1);
				}
				Ok(c)
			},
			Some(Err(e)) => Err(Error::IO(e).at(self.span())),
			None => Err(Error::UnexpectedEnd.at(self.span()))
		}
	}

	fn skip_whitespaces(&mut self) -> Result<()> {
		loop {
			match self.peek_char()? {
				Some(';') => self.skip_line()?,
				Some(c) if c.is_whitespace() => {
					self.consume()?;
				},
				_ => break
			}
		}

		Ok(())
	}

	/**
	 * Skip all chars until the next line break.
	 */
	fn skip_line(&mut self) -> Result<()> {
		loop {
			match self.peek_char()? {
				Some('\n') => {
					self.consume()?;
					break
				},
				Some(_) => {
					self.consume()?;
				},
				None => break
			}
		}

		Ok(())
	}

	fn read_word(&mut self) -> Result<String> {
		let mut word = String::new();

		loop {
			match self.peek_char()? {
				Some(c) if !c.is_whitespace() && !is_separator(c) => {
					word.push(self.consume()?);
				},
				_ => break
			}
		}

		Ok(word)
	}

	fn read_ident(&mut self) -> Result<Located<Token>> {
		let name = self.read_word()?;
		Ok(Token::Ident(name).at(self.span()))
	}

	fn read_keyword(&mut self) -> Result<Located<Token>> {
		let name = self.read_word()?;
		Ok(Token::Keyword(name).at(self.span()))
	}

	/**
	 * Read a `|quoted symbol|`, the opening bar being already consumed.
	 */
	fn read_quoted_ident(&mut self) -> Result<Located<Token>> {
		let mut name = String::new();

		loop {
			match self.peek_char()? {
				Some('|') => {
					self.consume()?;
					break
				},
				Some(_) => name.push(self.consume()?),
				None => return Err(Error::Unterminated("quoted symbol").at(self.span()))
			}
		}

		Ok(Token::Ident(name).at(self.span()))
	}

	/**
	 * Read a string litteral, the opening quote being already consumed.
	 *
	 * Both the backslash escapes of SMT-LIB 2.0 and the doubled quotes of 2.5 are understood.
	 */
	fn read_string(&mut self) -> Result<Located<Token>> {
		let mut string = String::new();

		let mut escape = false;
		loop {
			let c = match self.peek_char()? {
				Some(_) => self.consume()?,
				None => return Err(Error::Unterminated("string litteral").at(self.span()))
			};

			if escape {
				match c {
					'n' => string.push('\n'),
					c => string.push(c)
				}
				escape = false;
			} else {
				match c {
					'\\' => {
						escape = true;
					},
					'"' => {
						if let Some('"') = self.peek_char()? {
							self.consume()?;
							string.push('"')
						} else {
							break
						}
					},
					c => {
						string.push(c)
					}
				}
			}
		}

		Ok(Token::Litteral(token::Litteral::String(string)).at(self.span()))
	}

	/**
	 * Read a `#b` or `#x` litteral, the `#` being already consumed.
	 */
	fn read_radix_litteral(&mut self) -> Result<Located<Token>> {
		let word = self.read_word()?;
		let span = self.span();

		let (radix, digits) = match word.chars().next() {
			Some('b') => (2, &word[1..]),
			Some('x') => (16, &word[1..]),
			_ => return Err(Error::InvalidLitteral(format!("#{}", word)).at(span))
		};

		if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
			return Err(Error::InvalidLitteral(format!("#{}", word)).at(span))
		}

		let lit = if radix == 2 {
			token::Litteral::Binary(digits.to_string())
		} else {
			token::Litteral::Hexadecimal(digits.to_string())
		};

		Ok(Token::Litteral(lit).at(span))
	}

	fn read_numeric(&mut self) -> Result<Located<Token>> {
		let word = self.read_word()?;
		let span = self.span();

		let mut parts = word.splitn(2, '.');
		let integer = parts.next().unwrap_or("");
		let fractional = parts.next();

		let well_formed = |digits: &str| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit());

		match fractional {
			None if well_formed(integer) => {
				match integer.parse::<BigUint>() {
					Ok(n) => Ok(Token::Litteral(token::Litteral::Numeral(n)).at(span)),
					Err(_) => Err(Error::InvalidLitteral(word.clone()).at(span))
				}
			},
			Some(fractional) if well_formed(integer) && well_formed(fractional) => {
				Ok(Token::Litteral(token::Litteral::Decimal(word.clone())).at(span))
			},
			_ => Err(Error::InvalidLitteral(word.clone()).at(span))
		}
	}

	fn read_token(&mut self) -> Result<Option<Located<Token>>> {
		self.skip_whitespaces()?;
		self.start = self.position;
		self.last = self.position;
		match self.peek_char()? {
			Some(c) => {
				match c {
					'(' => {
						self.consume()?;
						Ok(Some(Token::Begin.at(self.span())))
					},

					')' => {
						self.consume()?;
						Ok(Some(Token::End.at(self.span())))
					},

					'"' => {
						self.consume()?;
						Ok(Some(self.read_string()?))
					},

					'|' => {
						self.consume()?;
						Ok(Some(self.read_quoted_ident()?))
					},

					'#' => {
						self.consume()?;
						Ok(Some(self.read_radix_litteral()?))
					},

					':' => {
						Ok(Some(self.read_keyword()?))
					},

					c if c.is_ascii_digit() => {
						Ok(Some(self.read_numeric()?))
					},

					_ => {
						Ok(Some(self.read_ident()?))
					}
				}
			},
			None => Ok(None)
		}
	}
}

impl<R: Iterator<Item = io::Result<char>>> Iterator for Lexer<R> {
	type Item = Result<Located<Token>>;

	fn next(&mut self) -> Option<Result<Located<Token>>> {
		self.read_token().transpose()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use token::Litteral;

	fn tokens(text: &str) -> Vec<Token> {
		Lexer::from_text(text).map(|t| t.map(Located::into_inner)).collect::<Result<Vec<_>>>().unwrap_or_else(|e| panic!("lexing failed: {}", e))
	}

	#[test]
	fn lex_atoms() {
		assert_eq!(tokens("(f |a b| :named 12 1.5 #b01 #xAf)"), vec![
			Token::Begin,
			Token::Ident("f".to_string()),
			Token::Ident("a b".to_string()),
			Token::Keyword(":named".to_string()),
			Token::Litteral(Litteral::Numeral(BigUint::from(12u32))),
			Token::Litteral(Litteral::Decimal("1.5".to_string())),
			Token::Litteral(Litteral::Binary("01".to_string())),
			Token::Litteral(Litteral::Hexadecimal("Af".to_string())),
			Token::End
		]);
	}

	#[test]
	fn lex_strings() {
		assert_eq!(tokens(r#""a \"b\"" "c""d""#), vec![
			Token::Litteral(Litteral::String("a \"b\"".to_string())),
			Token::Litteral(Litteral::String("c\"d".to_string()))
		]);
	}

	#[test]
	fn skip_comments() {
		assert_eq!(tokens("; nothing here\nsat ; trailing"), vec![Token::Ident("sat".to_string())]);
	}

	#[test]
	fn unterminated_string() {
		let result: Result<Vec<_>> = Lexer::from_text("\"abc").collect();
		assert!(result.is_err());
	}
}
