use std::collections::VecDeque;
use std::io;
use std::thread;
use smt2_z3::{Client, Config, Response, Verdict, Term, Sort, Symbol, AttributeValue, Constant};
use smt2_z3::client::{Error, Transport, Violation};

/// Transport answering from a script. Unscripted commands are acknowledged.
struct Scripted {
    replies: VecDeque<Option<String>>,
    sent: Vec<String>,
    alive: bool,
    terminated: bool
}

impl Scripted {
    fn new() -> Scripted {
        Scripted {
            replies: VecDeque::new(),
            sent: Vec::new(),
            alive: true,
            terminated: false
        }
    }

    fn reply(&mut self, text: &str) {
        self.replies.push_back(Some(format!("{}\n", text)))
    }

    /// Next reply is the end of the solver output.
    fn close(&mut self) {
        self.replies.push_back(None)
    }
}

impl Transport for Scripted {
    fn send(&mut self, text: &str) -> io::Result<String> {
        self.sent.push(text.to_string());
        match self.replies.pop_front() {
            Some(Some(reply)) => Ok(reply),
            Some(None) => Err(io::Error::new(io::ErrorKind::UnexpectedEof, "closed")),
            None => Ok("success\n".to_string())
        }
    }

    fn send_no_wait(&mut self, text: &str) -> io::Result<()> {
        self.sent.push(text.to_string());
        Ok(())
    }

    fn is_alive(&mut self, _wait: bool) -> bool {
        self.alive && !self.terminated
    }

    fn terminate(&mut self) -> io::Result<()> {
        self.terminated = true;
        Ok(())
    }
}

fn client_with(conf: Config, script: impl FnOnce(&mut Scripted)) -> Client<Scripted> {
    let mut transport = Scripted::new();
    transport.reply("success");
    script(&mut transport);
    Client::with_transport(transport, conf.lenient_success(false)).unwrap()
}

fn client(script: impl FnOnce(&mut Scripted)) -> Client<Scripted> {
    client_with(Config::new(), script)
}

fn sent(client: &Client<Scripted>) -> Vec<&str> {
    client.transport().sent.iter().map(String::as_str).collect()
}

fn x_positive() -> Term {
    Term::apply(">", vec![Term::symbol("x"), Term::numeral(0u32)])
}

#[test]
fn preamble() {
    let client = client(|_| ());
    assert_eq!(sent(&client), vec!["(set-option :print-success true)"]);
    assert_eq!(client.name(), "z3-4.3");
    assert_eq!(client.version(), "4.3");
}

#[test]
fn satisfiable_session() {
    let mut client = client(|t| {
        t.reply("success");
        t.reply("success");
        t.reply("success");
        t.reply("sat");
    });

    client.set_logic("QF_LIA").unwrap();
    client.declare_const("x", Sort::new("Int")).unwrap();
    client.assert(x_positive()).unwrap();
    assert_eq!(client.check_sat().unwrap(), Verdict::Sat);

    assert_eq!(&sent(&client)[1..], &[
        "(set-logic QF_LIA)",
        "(declare-const x Int)",
        "(assert (> x 0))",
        "(check-sat)"
    ]);
    assert_eq!(client.state().last_check_sat, Some(Verdict::Sat));
    assert_eq!(client.state().depth, 1);
}

#[test]
fn commands_need_a_logic() {
    let mut client = client(|_| ());

    match client.assert(x_positive()) {
        Err(Error::Protocol(Violation::LogicNotSet("assert"))) => (),
        other => panic!("unexpected result {:?}", other)
    }

    match client.check_sat() {
        Err(Error::Protocol(Violation::LogicNotSet("check-sat"))) => (),
        other => panic!("unexpected result {:?}", other)
    }

    assert_eq!(sent(&client).len(), 1);
}

#[test]
fn logic_is_set_once() {
    let mut client = client(|_| ());
    client.set_logic("QF_LIA").unwrap();

    match client.set_logic("QF_BV") {
        Err(Error::Protocol(Violation::LogicAlreadySet)) => (),
        other => panic!("unexpected result {:?}", other)
    }

    assert_eq!(sent(&client).len(), 2);
}

#[test]
fn relaxed_logic_reset() {
    let mut client = client_with(Config::new().relax(true), |_| ());
    client.set_logic("QF_LIA").unwrap();
    client.push(1).unwrap();
    client.set_logic("QF_BV").unwrap();

    assert_eq!(&sent(&client)[1..], &[
        "(set-logic QF_LIA)",
        "(push 1)",
        "(pop 2)",
        "(set-logic QF_BV)"
    ]);
    assert_eq!(client.state().depth, 1);
}

#[test]
fn rejected_relaxed_logic_keeps_the_pop() {
    let mut client = client_with(Config::new().relax(true), |t| {
        t.reply("success");
        t.reply("success");
        t.reply("success");
        t.reply("(error \"line 5 column 11: invalid logic BOGUS\")");
    });

    client.set_logic("QF_LIA").unwrap();
    client.push(2).unwrap();
    match client.set_logic("BOGUS") {
        Err(Error::Solver(message)) => assert_eq!(message, "line 4 column 11: invalid logic BOGUS"),
        other => panic!("unexpected result {:?}", other)
    }

    assert_eq!(&sent(&client)[1..], &[
        "(set-logic QF_LIA)",
        "(push 2)",
        "(pop 3)",
        "(set-logic BOGUS)"
    ]);
    assert_eq!(client.state().depth, 0);

    match client.pop(3) {
        Err(Error::Protocol(Violation::PopTooDeep { requested: 3, depth: 0 })) => (),
        other => panic!("unexpected result {:?}", other)
    }
    assert_eq!(sent(&client).len(), 5);
}

#[test]
fn options_are_answered_locally() {
    let mut client = client(|_| ());

    assert_eq!(client.get_option(":produce-models").unwrap(), Response::Value(AttributeValue::bool(false)));
    assert_eq!(client.get_option(":unknown-option").unwrap(), Response::Unsupported);

    client.set_option(":produce-models", AttributeValue::bool(true)).unwrap();
    assert_eq!(client.get_option(":produce-models").unwrap(), Response::Value(AttributeValue::bool(true)));

    assert_eq!(&sent(&client)[1..], &["(set-option :produce-models true)"]);
}

#[test]
fn print_success_option() {
    let mut client = client(|_| ());

    assert_eq!(client.set_option(":print-success", AttributeValue::bool(true)).unwrap(), Response::Success);
    match client.set_option(":print-success", AttributeValue::numeral(1u32)) {
        Err(Error::Protocol(Violation::NotBoolean(_))) => (),
        other => panic!("unexpected result {:?}", other)
    }

    assert_eq!(sent(&client).len(), 1);
}

#[test]
fn options_before_logic() {
    let mut client = client(|_| ());
    client.set_logic("QF_LIA").unwrap();

    match client.set_option(":produce-models", AttributeValue::bool(true)) {
        Err(Error::Protocol(Violation::AfterLogic(_))) => (),
        other => panic!("unexpected result {:?}", other)
    }
}

#[test]
fn model_needs_sat() {
    let mut client = client(|t| {
        t.reply("success");
        t.reply("success");
        t.reply("unsat");
    });

    match client.get_model() {
        Err(Error::Protocol(Violation::OptionDisabled { command: "get-model", .. })) => (),
        other => panic!("unexpected result {:?}", other)
    }

    client.set_option(":produce-models", AttributeValue::bool(true)).unwrap();
    client.set_logic("QF_LIA").unwrap();
    assert_eq!(client.check_sat().unwrap(), Verdict::Unsat);

    match client.get_model() {
        Err(Error::Protocol(Violation::WrongVerdict { command: "get-model", .. })) => (),
        other => panic!("unexpected result {:?}", other)
    }
}

#[test]
fn model_after_sat() {
    let mut client = client(|t| {
        t.reply("success");
        t.reply("success");
        t.reply("success");
        t.reply("success");
        t.reply("sat");
        t.reply("(model\n  (define-fun x () Int 1)\n)");
    });

    client.set_option(":produce-models", AttributeValue::bool(true)).unwrap();
    client.set_logic("QF_LIA").unwrap();
    client.declare_const("x", Sort::new("Int")).unwrap();
    client.assert(x_positive()).unwrap();
    assert_eq!(client.check_sat().unwrap(), Verdict::Sat);

    let model = client.get_model().unwrap();
    assert_eq!(model.to_string(), "(model (define-fun x () Int 1))");
    assert_eq!(sent(&client).last(), Some(&"(get-model)"));
    assert_eq!(client.state().last_check_sat, Some(Verdict::Sat));
}

#[test]
fn assertions_need_produce_assertions() {
    let mut client = client(|_| ());
    client.set_logic("QF_LIA").unwrap();

    match client.get_assertions() {
        Err(Error::Protocol(Violation::OptionDisabled { command: "get-assertions", option: ":produce-assertions" })) => (),
        other => panic!("unexpected result {:?}", other)
    }
    assert_eq!(sent(&client).len(), 2);
}

#[test]
fn assertions() {
    let mut client = client(|t| {
        t.reply("success");
        t.reply("success");
        t.reply("success");
        t.reply("success");
        t.reply("((> x 0)\n (= y 1))");
    });

    client.set_option(":interactive-mode", AttributeValue::bool(true)).unwrap();
    client.set_logic("QF_LIA").unwrap();
    client.assert(x_positive()).unwrap();
    client.assert(Term::apply("=", vec![Term::symbol("y"), Term::numeral(1u32)])).unwrap();

    assert_eq!(client.get_assertions().unwrap(), vec![
        x_positive(),
        Term::apply("=", vec![Term::symbol("y"), Term::numeral(1u32)])
    ]);
    assert_eq!(sent(&client).last(), Some(&"(get-assertions)"));
}

#[test]
fn relaxed_assertions() {
    let mut client = client_with(Config::new().relax(true), |t| {
        t.reply("success");
        t.reply("()");
    });

    client.set_logic("QF_LIA").unwrap();
    assert_eq!(client.get_assertions().unwrap(), Vec::new());
}

#[test]
fn values() {
    let mut client = client(|t| {
        t.reply("success");
        t.reply("success");
        t.reply("success");
        t.reply("sat");
        t.reply("((x 5)\n (y bv5[4]))");
    });

    client.set_option(":produce-models", AttributeValue::bool(true)).unwrap();
    client.set_logic("QF_LIA").unwrap();
    client.declare_const("x", Sort::new("Int")).unwrap();
    client.check_sat().unwrap();

    let values = client.get_value(vec![Term::symbol("x"), Term::symbol("y")]).unwrap();
    assert_eq!(values, vec![
        (Term::symbol("x"), Term::numeral(5u32)),
        (Term::symbol("y"), Term::Constant(Constant::Binary("0101".to_string())))
    ]);
    assert_eq!(sent(&client).last(), Some(&"(get-value (x y))"));
}

#[test]
fn pop_bounds() {
    let mut client = client(|_| ());
    client.set_logic("QF_LIA").unwrap();
    client.push(2).unwrap();
    assert_eq!(client.state().depth, 3);

    match client.pop(4) {
        Err(Error::Protocol(Violation::PopTooDeep { requested: 4, depth: 3 })) => (),
        other => panic!("unexpected result {:?}", other)
    }

    client.pop(3).unwrap();
    assert_eq!(client.state().depth, 0);

    match client.assert(x_positive()) {
        Err(Error::Protocol(Violation::EmptyStack)) => (),
        other => panic!("unexpected result {:?}", other)
    }
}

#[test]
fn zero_levels_are_not_sent() {
    let mut client = client(|_| ());
    client.set_logic("QF_LIA").unwrap();
    client.push(0).unwrap();
    client.pop(0).unwrap();
    assert_eq!(sent(&client).len(), 2);
}

#[cfg(not(windows))]
#[test]
fn push_errors_are_ignored() {
    let mut client = client(|t| {
        t.reply("success");
        t.reply("(error \"push failed\")");
    });

    client.set_logic("QF_LIA").unwrap();
    client.push(1).unwrap();
    assert_eq!(client.state().depth, 2);
}

#[test]
fn solver_errors_keep_the_state() {
    let mut client = client(|t| {
        t.reply("success");
        t.reply("sat");
        t.reply("(error \"line 4 column 10: unknown constant y\")");
    });

    client.set_logic("QF_LIA").unwrap();
    client.check_sat().unwrap();

    match client.assert(Term::symbol("y")) {
        Err(Error::Solver(message)) => assert_eq!(message, "line 3 column 10: unknown constant y"),
        other => panic!("unexpected result {:?}", other)
    }

    assert_eq!(client.state().last_check_sat, Some(Verdict::Sat));
    assert!(!client.state().terminated);
}

#[test]
fn unsat_core() {
    let mut client = client(|t| {
        t.reply("success");
        t.reply("success");
        t.reply("unsat");
        t.reply("(a1 a2)");
    });

    client.set_option(":produce-unsat-cores", AttributeValue::bool(true)).unwrap();
    client.set_logic("QF_LIA").unwrap();
    client.check_sat().unwrap();

    assert_eq!(client.get_unsat_core().unwrap(), vec![Symbol::from("a1"), Symbol::from("a2")]);
}

#[test]
fn proofs_are_unsupported() {
    let mut client = client(|_| ());

    assert_eq!(client.set_option(":produce-proofs", AttributeValue::bool(true)).unwrap(), Response::Unsupported);
    match client.get_proof() {
        Err(Error::Protocol(Violation::OptionDisabled { command: "get-proof", .. })) => (),
        other => panic!("unexpected result {:?}", other)
    }

    assert_eq!(sent(&client).len(), 1);
}

#[test]
fn predefined_infos() {
    let mut client = client(|_| ());

    match client.set_info(":name", Some(AttributeValue::string("mine"))) {
        Err(Error::Protocol(Violation::PredefinedInfo(_))) => (),
        other => panic!("unexpected result {:?}", other)
    }

    client.set_info(":source", Some(AttributeValue::string("test"))).unwrap();
    assert_eq!(sent(&client).last(), Some(&"(set-info :source \"test\")"));
}

#[test]
fn echo() {
    let mut client = client(|t| t.reply("\"hello world\""));
    assert_eq!(client.echo("hello world").unwrap(), "hello world");
}

#[test]
fn comments_are_not_answered() {
    let mut client = client(|_| ());
    client.comment("first\nsecond");
    assert_eq!(sent(&client).last(), Some(&"; first\n; second"));
}

#[test]
fn lost_solver() {
    let mut client = client(|t| {
        t.reply("success");
        t.close();
    });

    client.set_logic("QF_LIA").unwrap();
    match client.assert(x_positive()) {
        Err(Error::Io(_)) => (),
        other => panic!("unexpected result {:?}", other)
    }

    assert!(client.state().terminated);
    match client.check_sat() {
        Err(Error::Terminated) => (),
        other => panic!("unexpected result {:?}", other)
    }
}

#[test]
fn solver_dies_during_check_sat() {
    let mut client = client(|t| {
        t.reply("success");
        t.reply("sat");
    });

    client.set_logic("QF_LIA").unwrap();
    client.transport_mut().alive = false;

    match client.check_sat() {
        Err(Error::Terminated) => (),
        other => panic!("unexpected result {:?}", other)
    }
}

#[test]
fn exit() {
    let mut client = client(|t| t.close());

    client.exit().unwrap();
    assert!(client.transport().terminated);
    assert!(client.state().terminated);

    match client.set_logic("QF_LIA") {
        Err(Error::Terminated) => (),
        other => panic!("unexpected result {:?}", other)
    }
}

#[test]
fn reset() {
    let mut client = client(|_| ());
    client.set_option(":produce-models", AttributeValue::bool(true)).unwrap();
    client.set_logic("QF_LIA").unwrap();
    client.push(1).unwrap();
    client.reset().unwrap();

    assert!(!client.state().logic_set);
    assert_eq!(client.state().depth, 0);
    assert_eq!(client.get_option(":produce-models").unwrap(), Response::Value(AttributeValue::bool(false)));
}

#[test]
fn shared_client() {
    let shared = client(|_| ()).shared();

    let workers: Vec<_> = (0..4).map(|_| {
        let shared = shared.clone();
        thread::spawn(move || {
            let mut client = shared.lock().unwrap();
            client.get_option(":verbosity").unwrap()
        })
    }).collect();

    for worker in workers {
        assert_eq!(worker.join().unwrap(), Response::Value(AttributeValue::numeral(0u32)));
    }
}

#[test]
#[ignore]
fn z3() {
    let mut client = Client::start(Config::new()).unwrap();
    client.set_logic("QF_LIA").unwrap();
    client.declare_const("x", Sort::new("Int")).unwrap();
    client.assert(x_positive()).unwrap();
    assert_eq!(client.check_sat().unwrap(), Verdict::Sat);
    client.exit().unwrap();
}
