use std::fmt;
use num_bigint::BigUint;

pub mod location;
pub use location::*;

pub mod error;
pub use error::{Error, Result};

pub mod syntax;
pub use syntax::{Symbol, Keyword, Constant, SExpr, Lexer};

pub mod response;
pub use response::{Response, Verdict, Expect};

pub mod client;
pub use client::{Client, Config, Version};

/**
 * Printable list.
 */
pub(crate) struct PList<'a, T: 'a>(pub &'a [T]);

impl<'a, T: 'a + fmt::Display> fmt::Display for PList<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.split_first() {
            Some((e, list)) => {
                e.fmt(f)?;
                for e in list.iter() {
                    write!(f, " ")?;
                    e.fmt(f)?
                }
            },
            None => ()
        }

        Ok(())
    }
}

/**
 * <index> ::= <numeral> | <symbol>
 */
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Index {
    Numeral(BigUint),
    Symbol(Symbol)
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Index::Numeral(n) => n.fmt(f),
            Index::Symbol(s) => s.fmt(f)
        }
    }
}

/**
 * <identifier> ::= <symbol> | ( _ <symbol> <index>+ )
 */
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Ident {
    pub id: Symbol,
    pub indexes: Vec<Index>
}

impl Ident {
    pub fn new<S: Into<Symbol>>(id: S) -> Ident {
        Ident {
            id: id.into(),
            indexes: Vec::new()
        }
    }

    pub fn indexed<S: Into<Symbol>>(id: S, indexes: Vec<Index>) -> Ident {
        Ident {
            id: id.into(),
            indexes: indexes
        }
    }

    /// Checks if this is the plain (non indexed) symbol `name`.
    pub fn is(&self, name: &str) -> bool {
        self.indexes.is_empty() && self.id.id == name
    }
}

impl<'a> From<&'a str> for Ident {
    fn from(id: &'a str) -> Ident {
        Ident::new(id)
    }
}

impl From<Symbol> for Ident {
    fn from(id: Symbol) -> Ident {
        Ident::new(id)
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.indexes.is_empty() {
            self.id.fmt(f)
        } else {
            write!(f, "(_ {} {})", self.id, PList(&self.indexes))
        }
    }
}

/**
 * <sort> ::= <identifier> | ( <identifier> <sort>+ )
 */
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Sort {
    pub id: Ident,
    pub parameters: Vec<Sort>
}

impl Sort {
    pub fn new<I: Into<Ident>>(id: I) -> Sort {
        Sort {
            id: id.into(),
            parameters: Vec::new()
        }
    }

    pub fn parametric<I: Into<Ident>>(id: I, parameters: Vec<Sort>) -> Sort {
        Sort {
            id: id.into(),
            parameters: parameters
        }
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.parameters.is_empty() {
            self.id.fmt(f)
        } else {
            write!(f, "({} {})", self.id, PList(&self.parameters))
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SortedVar {
    pub id: Symbol,
    pub sort: Sort
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Binding {
    pub id: Symbol,
    pub value: Term
}

/// Expression tree sent to, and read back from, the solver.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Term {
    /// Symbol or indexed identifier, such as `x` or `(_ bv5 4)`.
    Ident(Ident),

    Constant(Constant),

    /// Function application. The arguments may be empty.
    Apply {
        fun: Ident,
        args: Vec<Term>
    },

    /// Parallel let-binding.
    Let {
        bindings: Vec<Binding>,
        body: Box<Term>
    },

    Forall {
        vars: Vec<SortedVar>,
        body: Box<Term>
    },

    Exists {
        vars: Vec<SortedVar>,
        body: Box<Term>
    }
}

impl Term {
    pub fn symbol<S: Into<Symbol>>(id: S) -> Term {
        Term::Ident(Ident::new(id))
    }

    pub fn numeral<N: Into<BigUint>>(n: N) -> Term {
        Term::Constant(Constant::Numeral(n.into()))
    }

    pub fn apply<I: Into<Ident>>(fun: I, args: Vec<Term>) -> Term {
        Term::Apply {
            fun: fun.into(),
            args: args
        }
    }

    pub fn bool(b: bool) -> Term {
        Term::symbol(if b { "true" } else { "false" })
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SortDeclaration {
    pub id: Symbol,
    pub arity: usize
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SelectorDeclaration {
    pub id: Symbol,
    pub sort: Sort
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ConstructorDeclaration {
    pub id: Symbol,
    pub selectors: Vec<SelectorDeclaration>
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct DataTypeDeclaration {
    pub parameters: Vec<Symbol>,
    pub constructors: Vec<ConstructorDeclaration>
}

/**
 * Value of an option or info attribute.
 *
 * `true` and `false` are symbols.
 */
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum AttributeValue {
    Constant(Constant),
    Symbol(Symbol),
    List(Vec<Located<SExpr>>)
}

impl AttributeValue {
    pub fn bool(b: bool) -> AttributeValue {
        AttributeValue::Symbol(Symbol::new(if b { "true" } else { "false" }))
    }

    pub fn string<S: Into<String>>(s: S) -> AttributeValue {
        AttributeValue::Constant(Constant::String(s.into()))
    }

    pub fn numeral<N: Into<BigUint>>(n: N) -> AttributeValue {
        AttributeValue::Constant(Constant::Numeral(n.into()))
    }

    /// Boolean value, if the attribute is `true` or `false`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Symbol(s) if s.id == "true" => Some(true),
            AttributeValue::Symbol(s) if s.id == "false" => Some(false),
            _ => None
        }
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            AttributeValue::Constant(Constant::String(s)) => Some(s),
            _ => None
        }
    }

    pub fn as_numeral(&self) -> Option<&BigUint> {
        match self {
            AttributeValue::Constant(Constant::Numeral(n)) => Some(n),
            _ => None
        }
    }
}

impl From<SExpr> for AttributeValue {
    fn from(expr: SExpr) -> AttributeValue {
        match expr {
            SExpr::Constant(c) => AttributeValue::Constant(c),
            SExpr::Sym(s) => AttributeValue::Symbol(s),
            SExpr::List(items) => AttributeValue::List(items),
            SExpr::Keyword(k) => AttributeValue::Symbol(Symbol::new(k.id))
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Constant(c) => c.fmt(f),
            AttributeValue::Symbol(s) => s.fmt(f),
            AttributeValue::List(items) => write!(f, "({})", PList(items))
        }
    }
}

/// Solver command.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Command {
    Assert(Term),
    CheckSat,
    DeclareConst(Symbol, Sort),
    DeclareDatatypes(Vec<SortDeclaration>, Vec<DataTypeDeclaration>),
    DeclareFun(Symbol, Vec<Sort>, Sort),
    DeclareSort(Symbol, usize),
    DefineFun(Symbol, Vec<SortedVar>, Sort, Term),
    DefineSort(Symbol, Vec<Symbol>, Sort),
    Echo(String),
    Exit,
    GetAssertions,
    GetAssignment,
    GetInfo(Keyword),
    GetModel,
    GetOption(Keyword),
    GetProof,
    GetUnsatCore,
    GetValue(Vec<Term>),
    Pop(usize),
    Push(usize),
    Reset,
    ResetAssertions,
    SetInfo(Keyword, Option<AttributeValue>),
    SetLogic(Symbol),
    SetOption(Keyword, AttributeValue)
}

impl Command {
    /// Command name, as written in SMT-LIB.
    pub fn name(&self) -> &'static str {
        use Command::*;
        match self {
            Assert(_) => "assert",
            CheckSat => "check-sat",
            DeclareConst(..) => "declare-const",
            DeclareDatatypes(..) => "declare-datatypes",
            DeclareFun(..) => "declare-fun",
            DeclareSort(..) => "declare-sort",
            DefineFun(..) => "define-fun",
            DefineSort(..) => "define-sort",
            Echo(_) => "echo",
            Exit => "exit",
            GetAssertions => "get-assertions",
            GetAssignment => "get-assignment",
            GetInfo(_) => "get-info",
            GetModel => "get-model",
            GetOption(_) => "get-option",
            GetProof => "get-proof",
            GetUnsatCore => "get-unsat-core",
            GetValue(_) => "get-value",
            Pop(_) => "pop",
            Push(_) => "push",
            Reset => "reset",
            ResetAssertions => "reset-assertions",
            SetInfo(..) => "set-info",
            SetLogic(_) => "set-logic",
            SetOption(..) => "set-option"
        }
    }
}

fn expect_symbol(expr: &Located<SExpr>) -> Result<Symbol> {
    match expr.as_ref() {
        SExpr::Sym(sym) => Ok(sym.clone()),
        other => Err(error::Error::Expected("symbol", other.kind()).at(expr.span()))
    }
}

fn expect_list(expr: &Located<SExpr>) -> Result<&[Located<SExpr>]> {
    match expr.as_ref() {
        SExpr::List(items) => Ok(items),
        other => Err(error::Error::Expected("list", other.kind()).at(expr.span()))
    }
}

/**
 * Rebuild a term from a solver reply.
 */
pub fn compile_term(expr: &Located<SExpr>) -> Result<Term> {
    let span = expr.span();
    match expr.as_ref() {
        SExpr::Sym(sym) => Ok(Term::Ident(Ident::new(sym.clone()))),
        SExpr::Constant(c) => Ok(Term::Constant(c.clone())),
        SExpr::Keyword(k) => Err(error::Error::UnexpectedKeyword(k.clone()).at(span)),
        SExpr::List(items) => {
            let (head, args) = match items.split_first() {
                Some(split) => split,
                None => return Err(error::Error::EmptyList.at(span))
            };

            match head.as_symbol() {
                Some(sym) if sym.id == "let" => {
                    match args {
                        [bindings, body] => {
                            let bindings = expect_list(bindings)?;
                            let mut compiled_bindings = Vec::with_capacity(bindings.len());
                            for binding in bindings {
                                compiled_bindings.push(compile_binding(binding)?)
                            }

                            Ok(Term::Let {
                                bindings: compiled_bindings,
                                body: Box::new(compile_term(body)?)
                            })
                        },
                        _ => Err(error::Error::Malformed("let").at(span))
                    }
                },
                Some(sym) if sym.id == "forall" || sym.id == "exists" => {
                    match args {
                        [vars, body] => {
                            let vars = expect_list(vars)?;
                            let mut compiled_vars = Vec::with_capacity(vars.len());
                            for var in vars {
                                compiled_vars.push(compile_sorted_var(var)?)
                            }

                            let body = Box::new(compile_term(body)?);
                            if sym.id == "forall" {
                                Ok(Term::Forall { vars: compiled_vars, body: body })
                            } else {
                                Ok(Term::Exists { vars: compiled_vars, body: body })
                            }
                        },
                        _ => Err(error::Error::Malformed(if sym.id == "forall" { "forall" } else { "exists" }).at(span))
                    }
                },
                Some(sym) if sym.id == "_" => {
                    Ok(Term::Ident(compile_ident(expr)?))
                },
                _ => {
                    let fun = compile_ident(head)?;
                    let mut compiled_args = Vec::with_capacity(args.len());
                    for arg in args {
                        compiled_args.push(compile_term(arg)?)
                    }

                    Ok(Term::Apply {
                        fun: fun,
                        args: compiled_args
                    })
                }
            }
        }
    }
}

pub fn compile_binding(expr: &Located<SExpr>) -> Result<Binding> {
    match expect_list(expr)? {
        [id, value] => {
            Ok(Binding {
                id: expect_symbol(id)?,
                value: compile_term(value)?
            })
        },
        _ => Err(error::Error::Malformed("binding").at(expr.span()))
    }
}

pub fn compile_sorted_var(expr: &Located<SExpr>) -> Result<SortedVar> {
    match expect_list(expr)? {
        [id, sort] => {
            Ok(SortedVar {
                id: expect_symbol(id)?,
                sort: compile_sort(sort)?
            })
        },
        _ => Err(error::Error::Malformed("sorted variable").at(expr.span()))
    }
}

/**
 * Compile a function head: a symbol or an indexed identifier `(_ f i+)`.
 */
pub fn compile_ident(expr: &Located<SExpr>) -> Result<Ident> {
    match expr.as_ref() {
        SExpr::Sym(sym) => Ok(Ident::new(sym.clone())),
        SExpr::List(items) => {
            match items.split_first() {
                Some((underscore, rest)) if underscore.as_symbol().map(|s| s.id == "_").unwrap_or(false) => {
                    match rest.split_first() {
                        Some((id, indexes)) if !indexes.is_empty() => {
                            let id = expect_symbol(id)?;
                            let mut compiled_indexes = Vec::with_capacity(indexes.len());
                            for index in indexes {
                                compiled_indexes.push(compile_index(index)?)
                            }

                            Ok(Ident::indexed(id, compiled_indexes))
                        },
                        _ => Err(error::Error::Malformed("indexed identifier").at(expr.span()))
                    }
                },
                _ => Err(error::Error::InvalidHead(expr.kind()).at(expr.span()))
            }
        },
        other => Err(error::Error::InvalidHead(other.kind()).at(expr.span()))
    }
}

pub fn compile_index(expr: &Located<SExpr>) -> Result<Index> {
    match expr.as_ref() {
        SExpr::Constant(Constant::Numeral(n)) => Ok(Index::Numeral(n.clone())),
        SExpr::Sym(sym) => Ok(Index::Symbol(sym.clone())),
        other => Err(error::Error::InvalidIndex(other.to_string()).at(expr.span()))
    }
}

pub fn compile_sort(expr: &Located<SExpr>) -> Result<Sort> {
    match expr.as_ref() {
        SExpr::Sym(sym) => Ok(Sort::new(sym.clone())),
        SExpr::List(items) => {
            match items.split_first() {
                Some((head, _)) if head.as_symbol().map(|s| s.id == "_").unwrap_or(false) => {
                    Ok(Sort::new(compile_ident(expr)?))
                },
                Some((head, parameters)) if !parameters.is_empty() => {
                    let id = compile_ident(head)?;
                    let mut compiled_parameters = Vec::with_capacity(parameters.len());
                    for p in parameters {
                        compiled_parameters.push(compile_sort(p)?)
                    }

                    Ok(Sort::parametric(id, compiled_parameters))
                },
                _ => Err(error::Error::Malformed("sort").at(expr.span()))
            }
        },
        other => Err(error::Error::Expected("sort", other.kind()).at(expr.span()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syntax::parse_str;

    fn compile(text: &str) -> Result<Term> {
        compile_term(&parse_str(text).unwrap())
    }

    #[test]
    fn compile_leaves() {
        assert_eq!(compile("x").unwrap(), Term::symbol("x"));
        assert_eq!(compile("42").unwrap(), Term::numeral(42u32));
        assert_eq!(compile("#b0101").unwrap(), Term::Constant(Constant::Binary("0101".to_string())));
        assert_eq!(compile("\"s\"").unwrap(), Term::Constant(Constant::String("s".to_string())));
    }

    #[test]
    fn compile_applications() {
        assert_eq!(compile("(f)").unwrap(), Term::apply("f", Vec::new()));
        assert_eq!(
            compile("(+ x (- y 1))").unwrap(),
            Term::apply("+", vec![
                Term::symbol("x"),
                Term::apply("-", vec![Term::symbol("y"), Term::numeral(1u32)])
            ])
        );
    }

    #[test]
    fn compile_indexed_identifiers() {
        let extract = Ident::indexed("extract", vec![Index::Numeral(3u32.into()), Index::Numeral(0u32.into())]);
        assert_eq!(compile("((_ extract 3 0) x)").unwrap(), Term::apply(extract, vec![Term::symbol("x")]));
        assert_eq!(
            compile("(_ bv5 4)").unwrap(),
            Term::Ident(Ident::indexed("bv5", vec![Index::Numeral(4u32.into())]))
        );
    }

    #[test]
    fn compile_let() {
        let term = compile("(let ((a 1) (b x)) (+ a b))").unwrap();
        match term {
            Term::Let { bindings, body } => {
                assert_eq!(bindings.len(), 2);
                assert_eq!(bindings[0].id, Symbol::new("a"));
                assert_eq!(bindings[1].value, Term::symbol("x"));
                assert_eq!(*body, Term::apply("+", vec![Term::symbol("a"), Term::symbol("b")]));
            },
            other => panic!("unexpected term {:?}", other)
        }
    }

    #[test]
    fn compile_quantifiers() {
        let term = compile("(forall ((x Int) (v (_ BitVec 8))) (p x))").unwrap();
        match term {
            Term::Forall { vars, .. } => {
                assert_eq!(vars[0].sort, Sort::new("Int"));
                assert_eq!(vars[1].sort.to_string(), "(_ BitVec 8)");
            },
            other => panic!("unexpected term {:?}", other)
        }
    }

    #[test]
    fn reject_malformed_terms() {
        assert!(compile("()").is_err());
        assert!(compile(":named").is_err());
        assert!(compile("(let ((a 1)))").is_err());
        assert!(compile("(let ((a)) a)").is_err());
        assert!(compile("(let ((1 a)) a)").is_err());
        assert!(compile("((f x) y)").is_err());
    }

    #[test]
    fn printed_terms_compile_back() {
        let extract = Ident::indexed("extract", vec![Index::Numeral(BigUint::from(3u32)), Index::Numeral(BigUint::from(0u32))]);
        let terms = vec![
            Term::apply("f", Vec::new()),
            Term::apply("and", vec![Term::bool(true), Term::apply("not", vec![Term::symbol("p")])]),
            Term::Let {
                bindings: vec![Binding {
                    id: Symbol::new("a"),
                    value: Term::numeral(3u32)
                }],
                body: Box::new(Term::apply("+", vec![Term::symbol("a"), Term::apply(extract, vec![Term::symbol("x")])]))
            }
        ];

        for t in terms {
            assert_eq!(compile(&t.to_string()).unwrap(), t);
        }
    }
}
