use tracing::{trace, warn};
use crate::{Located, SExpr, Constant, Symbol, compile_term};
use crate::syntax::{self, response::{is_error, error_message}};
use crate::client::{Error, Result};
use super::{legacy, Response, Expect};

/**
 * Turns raw solver replies into typed responses.
 */
#[derive(Clone, Debug)]
pub struct Decoder {
    /// Number of lines sent to the solver that the user did not write.
    pub line_offset: usize,

    /// Accept any reply starting with `success` as an acknowledgement.
    pub lenient_success: bool
}

fn unexpected(expect: Expect, raw: &str) -> Error {
    Error::UnexpectedResponse {
        expected: expect.name(),
        raw: raw.trim().to_string()
    }
}

fn list<'a>(expr: &'a Located<SExpr>, expect: Expect, raw: &str) -> Result<&'a [Located<SExpr>]> {
    match expr.as_list() {
        Some(items) => Ok(items),
        None => Err(unexpected(expect, raw))
    }
}

impl Decoder {
    pub fn new(lenient_success: bool) -> Decoder {
        Decoder {
            line_offset: 0,
            lenient_success: lenient_success
        }
    }

    /**
     * Decode a raw reply, given the shape the command expects.
     *
     * Error reports are returned as `Error::Solver`.
     */
    pub fn decode(&self, raw: &str, expect: Expect) -> Result<Response> {
        trace!("decoding {:?} as {}", raw, expect.name());
        let text = legacy::normalize_bitvectors(raw);

        if self.lenient_success && text.starts_with("success") {
            if expect != Expect::Success {
                warn!("reading `{}' as a plain acknowledgement", text.trim());
            }
            return Ok(Response::Success)
        }

        if is_error(&text) {
            return Err(Error::Solver(error_message(&text, self.line_offset)))
        }

        if expect == Expect::Text {
            return Ok(match syntax::parse_str(&text) {
                Ok(expr) => match expr.into_inner() {
                    SExpr::Constant(Constant::String(s)) => Response::Text(s),
                    _ => Response::Text(text.trim().to_string())
                },
                Err(_) => Response::Text(text.trim().to_string())
            })
        }

        let expr = syntax::parse_str(&text)?;
        if let Some(sym) = expr.as_symbol() {
            if sym.id == "unsupported" {
                return Ok(Response::Unsupported)
            }
        }

        match expect {
            Expect::Success => match expr.as_symbol() {
                Some(sym) if sym.id == "success" => Ok(Response::Success),
                _ => Err(unexpected(expect, &text))
            },
            Expect::CheckSat => match expr.as_symbol().map(|s| s.id.as_str()) {
                Some("sat") => Ok(Response::Sat),
                Some("unsat") => Ok(Response::Unsat),
                Some("unknown") => Ok(Response::Unknown),
                Some("timeout") => Ok(Response::Timeout),
                _ => Err(unexpected(expect, &text))
            },
            Expect::Symbols => {
                let mut symbols: Vec<Symbol> = Vec::new();
                for item in list(&expr, expect, &text)? {
                    match item.as_symbol() {
                        Some(sym) => symbols.push(sym.clone()),
                        None => return Err(unexpected(expect, &text))
                    }
                }
                Ok(Response::Symbols(symbols))
            },
            Expect::Values => {
                let mut values = Vec::new();
                for item in list(&expr, expect, &text)? {
                    match item.as_list() {
                        Some([term, value]) => values.push((compile_term(term)?, compile_term(value)?)),
                        _ => return Err(unexpected(expect, &text))
                    }
                }
                Ok(Response::Values(values))
            },
            Expect::Assertions => {
                let mut terms = Vec::new();
                for item in list(&expr, expect, &text)? {
                    terms.push(compile_term(item)?)
                }
                Ok(Response::Assertions(terms))
            },
            Expect::SExpr => Ok(Response::SExpr(expr)),
            Expect::Text => Ok(Response::Text(text.trim().to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Term;

    fn decoder() -> Decoder {
        Decoder {
            line_offset: 1,
            lenient_success: false
        }
    }

    #[test]
    fn acknowledgements() {
        assert_eq!(decoder().decode("success\n", Expect::Success).unwrap(), Response::Success);
        assert_eq!(decoder().decode("unsupported\n", Expect::Success).unwrap(), Response::Unsupported);
        assert!(decoder().decode("sat\n", Expect::Success).is_err());
    }

    #[test]
    fn lenient_acknowledgements() {
        let d = Decoder::new(true);
        assert_eq!(d.decode("success\nsat\n", Expect::CheckSat).unwrap(), Response::Success);
        assert_eq!(decoder().decode("sat\n", Expect::CheckSat).unwrap(), Response::Sat);
    }

    #[test]
    fn verdicts() {
        assert_eq!(decoder().decode("unsat", Expect::CheckSat).unwrap(), Response::Unsat);
        assert_eq!(decoder().decode("unknown", Expect::CheckSat).unwrap(), Response::Unknown);
        assert_eq!(decoder().decode("timeout", Expect::CheckSat).unwrap(), Response::Timeout);
    }

    #[test]
    fn solver_errors() {
        match decoder().decode("(error \"line 5: bad\")\n", Expect::Success) {
            Err(Error::Solver(message)) => assert_eq!(message, "line 4: bad"),
            other => panic!("unexpected {:?}", other)
        }
    }

    #[test]
    fn values_with_legacy_bitvectors() {
        let response = decoder().decode("((x bv5[4]) ((f y) 3))", Expect::Values).unwrap();
        assert_eq!(response, Response::Values(vec![
            (Term::symbol("x"), Term::Constant(Constant::Binary("0101".to_string()))),
            (Term::apply("f", vec![Term::symbol("y")]), Term::numeral(3u32))
        ]));
    }

    #[test]
    fn malformed_values() {
        assert!(decoder().decode("(x 1)", Expect::Values).is_err());
        assert!(decoder().decode("((x))", Expect::Values).is_err());
        match decoder().decode("((x (let ((a)) a)))", Expect::Values) {
            Err(Error::Compile(_)) => (),
            other => panic!("unexpected {:?}", other)
        }
    }

    #[test]
    fn unsat_cores() {
        assert_eq!(
            decoder().decode("(a1 a2)", Expect::Symbols).unwrap(),
            Response::Symbols(vec![Symbol::new("a1"), Symbol::new("a2")])
        );
        match decoder().decode("sat", Expect::Symbols) {
            Err(Error::UnexpectedResponse { .. }) => (),
            other => panic!("unexpected {:?}", other)
        }
    }

    #[test]
    fn echoed_text() {
        assert_eq!(decoder().decode("\"hello world\"\n", Expect::Text).unwrap(), Response::Text("hello world".to_string()));
        assert_eq!(decoder().decode("hello world\n", Expect::Text).unwrap(), Response::Text("hello world".to_string()));
    }

    #[test]
    fn syntax_errors() {
        match decoder().decode("((a b)", Expect::SExpr) {
            Err(Error::Syntax(_)) => (),
            other => panic!("unexpected {:?}", other)
        }
    }
}
