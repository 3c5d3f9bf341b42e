use std::fmt;
use num_bigint::BigUint;
use crate::PList;
use super::Located;

/**
 * Symbol.
 *
 * The identifier is stored without the `|` quotes, which are added back when printing
 * a symbol that is not a simple symbol.
 */
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Symbol {
    pub id: String
}

impl Symbol {
    pub fn new<S: Into<String>>(id: S) -> Symbol {
        Symbol {
            id: id.into()
        }
    }

    pub fn format<T: fmt::Display>(t: T) -> Symbol {
        Symbol {
            id: format!("{}", t)
        }
    }

    /// Checks that the symbol can be printed without `|` quotes.
    pub fn is_simple(&self) -> bool {
        let mut chars = self.id.chars();
        match chars.next() {
            Some(c) if c.is_ascii_digit() => false,
            Some(c) if is_symbol_char(c) => chars.all(is_symbol_char),
            _ => false
        }
    }
}

fn is_symbol_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "~!@$%^&*_-+=<>.?/".contains(c)
}

impl PartialEq<str> for Symbol {
    fn eq(&self, other: &str) -> bool {
        self.id == other
    }
}

impl PartialEq<String> for Symbol {
    fn eq(&self, other: &String) -> bool {
        self.id == *other
    }
}

impl<'a> From<&'a str> for Symbol {
    fn from(id: &'a str) -> Symbol {
        Symbol::new(id)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_simple() {
            write!(f, "{}", self.id)
        } else {
            write!(f, "|{}|", self.id)
        }
    }
}

/**
 * Keyword, including the leading `:`.
 */
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Keyword {
    pub id: String
}

impl Keyword {
    /// Create a keyword, adding the leading `:` if it is missing.
    pub fn new<S: Into<String>>(id: S) -> Keyword {
        let id = id.into();
        if id.starts_with(':') {
            Keyword { id: id }
        } else {
            Keyword { id: format!(":{}", id) }
        }
    }

    pub fn as_str(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.id.fmt(f)
    }
}

/**
 * <spec_constant> ::= <numeral> | <decimal> | <hexadecimal> | <binary> | <string>
 */
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Constant {
    Numeral(BigUint),
    Decimal(String),
    Hexadecimal(String),
    Binary(String),
    String(String)
}

/// Write a string litteral, escaping quotes and backslashes.
pub(crate) fn write_string_litteral<W: fmt::Write>(w: &mut W, s: &str) -> fmt::Result {
    w.write_char('"')?;
    for c in s.chars() {
        match c {
            '"' => w.write_str("\\\"")?,
            '\\' => w.write_str("\\\\")?,
            c => w.write_char(c)?
        }
    }
    w.write_char('"')
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Constant::*;
        match self {
            Numeral(n) => write!(f, "{}", n),
            Decimal(d) => write!(f, "{}", d),
            Hexadecimal(h) => write!(f, "#x{}", h),
            Binary(b) => write!(f, "#b{}", b),
            String(s) => write_string_litteral(f, s)
        }
    }
}

/**
 * <s_expr> ::= <spec_constant> | <symbol> | <keyword> | ( <s_expr>* )
 */
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum SExpr {
    Constant(Constant),
    Sym(Symbol),
    Keyword(Keyword),
    List(Vec<Located<SExpr>>)
}

impl SExpr {
    /// Name of the shape, used in error messages.
    pub fn kind(&self) -> &'static str {
        use SExpr::*;
        match self {
            Constant(_) => "constant",
            Sym(_) => "symbol",
            Keyword(_) => "keyword",
            List(_) => "list"
        }
    }

    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self {
            SExpr::Sym(sym) => Some(sym),
            _ => None
        }
    }

    pub fn as_list(&self) -> Option<&[Located<SExpr>]> {
        match self {
            SExpr::List(list) => Some(list),
            _ => None
        }
    }
}

impl fmt::Display for SExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use SExpr::*;
        match self {
            Constant(c) => c.fmt(f),
            Sym(s) => s.fmt(f),
            Keyword(k) => k.fmt(f),
            List(l) => write!(f, "({})", PList(l))
        }
    }
}
