use std::fmt::{self, Write};
use thiserror::Error;
use super::{Symbol, Keyword, Constant, SExpr, Located};
use super::ast::write_string_litteral;
use crate::{
	Ident,
	Index,
	Sort,
	SortedVar,
	Binding,
	Term,
	AttributeValue,
	Command,
	SortDeclaration,
	DataTypeDeclaration,
	ConstructorDeclaration,
	SelectorDeclaration
};

#[derive(Debug, Error)]
pub enum Error {
	#[error("string litteral {0:?} is not accepted inside a term")]
	StringLitteral(String),

	#[error("formatting error")]
	Fmt(#[from] fmt::Error)
}

pub type Result = std::result::Result<(), Error>;

/**
 * How an application with more than two arguments is written.
 */
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Grouping {
	/**
	 * `(op a1 ... an)`.
	 */
	Prefix,

	/**
	 * `(op (op (op a1 a2) a3) ... an)`.
	 */
	Left,

	/**
	 * `(op a1 (op a2 ... an))`.
	 */
	Right,

	/**
	 * `(and (op a1 a2) (op a2 a3) ... (op an-1 an))`.
	 */
	Chainable
}

/**
 * Solver dialect.
 *
 * Decides the few points where solvers disagree on the standard syntax.
 */
pub trait Dialect {
	fn grouping(&self, _fun: &Ident, _arity: usize) -> Grouping {
		Grouping::Prefix
	}

	/// Whether string litterals may appear inside terms.
	fn string_litterals(&self) -> bool {
		true
	}
}

/// Plain SMT-LIB 2 syntax.
pub struct Standard;

impl Dialect for Standard {}

/// Z3 4.3.
pub struct Z3;

impl Dialect for Z3 {
	fn grouping(&self, fun: &Ident, arity: usize) -> Grouping {
		if fun.is("-") && arity > 2 {
			Grouping::Left
		} else {
			Grouping::Prefix
		}
	}

	fn string_litterals(&self) -> bool {
		false
	}
}

pub trait Display {
	fn fmt(&self, f: &mut Formatter) -> Result;
}

impl<T: Display> Display for Located<T> {
	fn fmt(&self, f: &mut Formatter) -> Result {
		self.as_ref().fmt(f)
	}
}

impl<T: Display> Display for Box<T> {
	fn fmt(&self, f: &mut Formatter) -> Result {
		self.as_ref().fmt(f)
	}
}

pub struct Formatter<'d> {
	out: String,
	dialect: &'d dyn Dialect,
	empty: bool
}

/**
 * Render the given node in the given dialect.
 */
pub fn translate<T: Display + ?Sized>(dialect: &dyn Dialect, t: &T) -> std::result::Result<String, Error> {
	let mut f = Formatter::new(dialect);
	t.fmt(&mut f)?;
	Ok(f.into_string())
}

impl<'d> Formatter<'d> {
	pub fn new(dialect: &'d dyn Dialect) -> Formatter<'d> {
		Formatter {
			out: String::new(),
			dialect: dialect,
			empty: true
		}
	}

	pub fn dialect(&self) -> &'d dyn Dialect {
		self.dialect
	}

	pub fn into_string(self) -> String {
		self.out
	}

	pub fn next(&mut self) -> Result {
		if self.empty {
			self.empty = false;
			Ok(())
		} else {
			self.out.write_char(' ')?;
			Ok(())
		}
	}

	pub fn begin(&mut self) -> Result {
		self.next()?;
		self.empty = true;
		self.out.write_char('(')?;
		Ok(())
	}

	pub fn end(&mut self) -> Result {
		self.empty = false;
		self.out.write_char(')')?;
		Ok(())
	}

	pub fn keyword(&mut self, name: &str) -> Result {
		self.next()?;
		self.out.write_str(name)?;
		Ok(())
	}

	pub fn symbol(&mut self, sym: &Symbol) -> Result {
		self.next()?;
		write!(self.out, "{}", sym)?;
		Ok(())
	}

	/// Write any atom using its standard textual form.
	pub fn atom<T: fmt::Display + ?Sized>(&mut self, t: &T) -> Result {
		self.next()?;
		write!(self.out, "{}", t)?;
		Ok(())
	}

	pub fn string(&mut self, s: &str) -> Result {
		self.next()?;
		write_string_litteral(&mut self.out, s)?;
		Ok(())
	}

	pub fn pseudo_list<T: Display>(&mut self, list: &[T]) -> Result {
		for e in list {
			e.fmt(self)?;
		}
		Ok(())
	}

	pub fn list<T: Display>(&mut self, list: &[T]) -> Result {
		self.begin()?;
		for e in list {
			e.fmt(self)?;
		}
		self.end()
	}

	fn prefix(&mut self, fun: &Ident, args: &[Term]) -> Result {
		self.begin()?;
		fun.fmt(self)?;
		self.pseudo_list(args)?;
		self.end()
	}

	fn left(&mut self, fun: &Ident, args: &[Term]) -> Result {
		match args.split_last() {
			Some((last, init)) if init.len() >= 2 => {
				self.begin()?;
				fun.fmt(self)?;
				self.left(fun, init)?;
				last.fmt(self)?;
				self.end()
			},
			_ => self.prefix(fun, args)
		}
	}

	fn right(&mut self, fun: &Ident, args: &[Term]) -> Result {
		match args.split_first() {
			Some((first, rest)) if rest.len() >= 2 => {
				self.begin()?;
				fun.fmt(self)?;
				first.fmt(self)?;
				self.right(fun, rest)?;
				self.end()
			},
			_ => self.prefix(fun, args)
		}
	}

	fn chain(&mut self, fun: &Ident, args: &[Term]) -> Result {
		self.begin()?;
		self.keyword("and")?;
		for pair in args.windows(2) {
			self.prefix(fun, pair)?;
		}
		self.end()
	}

	pub fn apply(&mut self, fun: &Ident, args: &[Term]) -> Result {
		if args.len() <= 2 {
			return self.prefix(fun, args)
		}

		match self.dialect.grouping(fun, args.len()) {
			Grouping::Prefix => self.prefix(fun, args),
			Grouping::Left => self.left(fun, args),
			Grouping::Right => self.right(fun, args),
			Grouping::Chainable => self.chain(fun, args)
		}
	}
}

impl Display for Symbol {
	fn fmt(&self, f: &mut Formatter) -> Result {
		f.symbol(self)
	}
}

impl Display for Keyword {
	fn fmt(&self, f: &mut Formatter) -> Result {
		f.keyword(self.as_str())
	}
}

impl Display for Constant {
	fn fmt(&self, f: &mut Formatter) -> Result {
		f.atom(self)
	}
}

impl Display for SExpr {
	fn fmt(&self, f: &mut Formatter) -> Result {
		match self {
			SExpr::Constant(c) => c.fmt(f),
			SExpr::Sym(s) => s.fmt(f),
			SExpr::Keyword(k) => k.fmt(f),
			SExpr::List(items) => f.list(items)
		}
	}
}

impl Display for Index {
	fn fmt(&self, f: &mut Formatter) -> Result {
		match self {
			Index::Numeral(n) => f.atom(n),
			Index::Symbol(s) => s.fmt(f)
		}
	}
}

impl Display for Ident {
	fn fmt(&self, f: &mut Formatter) -> Result {
		if self.indexes.is_empty() {
			f.symbol(&self.id)
		} else {
			f.begin()?;
			f.keyword("_")?;
			f.symbol(&self.id)?;
			f.pseudo_list(&self.indexes)?;
			f.end()
		}
	}
}

impl Display for Sort {
	fn fmt(&self, f: &mut Formatter) -> Result {
		if self.parameters.is_empty() {
			self.id.fmt(f)
		} else {
			f.begin()?;
			self.id.fmt(f)?;
			f.pseudo_list(&self.parameters)?;
			f.end()
		}
	}
}

impl Display for SortedVar {
	fn fmt(&self, f: &mut Formatter) -> Result {
		f.begin()?;
		f.symbol(&self.id)?;
		self.sort.fmt(f)?;
		f.end()
	}
}

impl Display for Binding {
	fn fmt(&self, f: &mut Formatter) -> Result {
		f.begin()?;
		f.symbol(&self.id)?;
		self.value.fmt(f)?;
		f.end()
	}
}

impl Display for Term {
	fn fmt(&self, f: &mut Formatter) -> Result {
		use Term::*;
		match self {
			Ident(id) => id.fmt(f),
			Constant(super::Constant::String(s)) if !f.dialect().string_litterals() => {
				Err(Error::StringLitteral(s.clone()))
			},
			Constant(c) => c.fmt(f),
			Apply { fun, args } => f.apply(fun, args),
			Let { bindings, body } => {
				f.begin()?;
				f.keyword("let")?;
				f.list(bindings)?;
				body.fmt(f)?;
				f.end()
			},
			Forall { vars, body } => {
				f.begin()?;
				f.keyword("forall")?;
				f.list(vars)?;
				body.fmt(f)?;
				f.end()
			},
			Exists { vars, body } => {
				f.begin()?;
				f.keyword("exists")?;
				f.list(vars)?;
				body.fmt(f)?;
				f.end()
			}
		}
	}
}

impl Display for AttributeValue {
	fn fmt(&self, f: &mut Formatter) -> Result {
		match self {
			AttributeValue::Constant(c) => c.fmt(f),
			AttributeValue::Symbol(s) => s.fmt(f),
			AttributeValue::List(items) => f.list(items)
		}
	}
}

impl Display for SortDeclaration {
	fn fmt(&self, f: &mut Formatter) -> Result {
		f.begin()?;
		f.symbol(&self.id)?;
		f.atom(&self.arity)?;
		f.end()
	}
}

impl Display for SelectorDeclaration {
	fn fmt(&self, f: &mut Formatter) -> Result {
		f.begin()?;
		f.symbol(&self.id)?;
		self.sort.fmt(f)?;
		f.end()
	}
}

impl Display for ConstructorDeclaration {
	fn fmt(&self, f: &mut Formatter) -> Result {
		f.begin()?;
		f.symbol(&self.id)?;
		f.pseudo_list(&self.selectors)?;
		f.end()
	}
}

impl Display for DataTypeDeclaration {
	fn fmt(&self, f: &mut Formatter) -> Result {
		if self.parameters.is_empty() {
			f.list(&self.constructors)
		} else {
			f.begin()?;
			f.keyword("par")?;
			f.list(&self.parameters)?;
			f.list(&self.constructors)?;
			f.end()
		}
	}
}

impl Display for Command {
	fn fmt(&self, f: &mut Formatter) -> Result {
		use Command::*;
		f.begin()?;
		f.keyword(self.name())?;
		match self {
			Assert(term) => term.fmt(f)?,
			DeclareConst(id, sort) => {
				f.symbol(id)?;
				sort.fmt(f)?;
			},
			DeclareDatatypes(sorts, decls) => {
				f.list(sorts)?;
				f.list(decls)?;
			},
			DeclareFun(id, args, return_sort) => {
				f.symbol(id)?;
				f.list(args)?;
				return_sort.fmt(f)?;
			},
			DeclareSort(id, arity) => {
				f.symbol(id)?;
				f.atom(arity)?;
			},
			DefineFun(id, args, return_sort, body) => {
				f.symbol(id)?;
				f.list(args)?;
				return_sort.fmt(f)?;
				body.fmt(f)?;
			},
			DefineSort(id, parameters, sort) => {
				f.symbol(id)?;
				f.list(parameters)?;
				sort.fmt(f)?;
			},
			Echo(text) => f.string(text)?,
			GetInfo(key) | GetOption(key) => key.fmt(f)?,
			GetValue(terms) => f.list(terms)?,
			Pop(n) | Push(n) => f.atom(n)?,
			SetInfo(key, value) => {
				key.fmt(f)?;
				if let Some(value) = value {
					value.fmt(f)?;
				}
			},
			SetLogic(logic) => f.symbol(logic)?,
			SetOption(key, value) => {
				key.fmt(f)?;
				value.fmt(f)?;
			},
			CheckSat | Exit | GetAssertions | GetAssignment | GetModel | GetProof | GetUnsatCore | Reset | ResetAssertions => ()
		}
		f.end()
	}
}

impl fmt::Display for Term {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match translate(&Standard, self) {
			Ok(text) => f.write_str(&text),
			Err(_) => Err(fmt::Error)
		}
	}
}

impl fmt::Display for Command {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match translate(&Standard, self) {
			Ok(text) => f.write_str(&text),
			Err(_) => Err(fmt::Error)
		}
	}
}
