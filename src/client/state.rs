use thiserror::Error;
use crate::{Command, Keyword};
use crate::response::{Response, Verdict, Expect};
use super::{Config, options::{self, Options}};

/// Ordering rule broken by a command.
#[derive(Debug, Error)]
pub enum Violation {
    #[error("the logic must be set before a {0} command is issued")]
    LogicNotSet(&'static str),

    #[error("the logic is already set")]
    LogicAlreadySet,

    #[error("all assertion sets have been popped from the stack")]
    EmptyStack,

    #[error("the argument to a pop command is too large: {requested} vs. a maximum of {depth}")]
    PopTooDeep {
        requested: usize,
        depth: usize
    },

    #[error("the {command} command is only valid if {option} has been enabled")]
    OptionDisabled {
        command: &'static str,
        option: &'static str
    },

    #[error("the {command} command is only valid immediately after check-sat returned {expected}")]
    WrongVerdict {
        command: &'static str,
        expected: &'static str
    },

    #[error("the value of the {0} option must be 'true' or 'false'")]
    NotBoolean(Keyword),

    #[error("the value of the {0} option must be set before the set-logic command")]
    AfterLogic(Keyword),

    #[error("setting the value of the predefined info keyword {0} is not permitted")]
    PredefinedInfo(Keyword)
}

/// What to do with an accepted command.
#[derive(Clone, PartialEq, Debug)]
pub enum Plan {
    /// Send the command and decode a reply of the given shape.
    Send(Expect),

    /// Answer without contacting the solver.
    Answer(Response),

    /// Pop the given number of assertion levels, then send the command.
    Reopen(usize)
}

/**
 * Solver-visible state of a session.
 *
 * `check` and `commit` are pure: the client decides what to send with the first and
 * records the outcome with the second.
 */
#[derive(Clone, Debug)]
pub struct SessionState {
    pub logic_set: bool,

    /// Number of assertion levels, including the one opened by `set-logic`.
    pub depth: usize,

    /// Verdict of the last `check-sat`, if nothing happened since.
    pub last_check_sat: Option<Verdict>,

    pub options: Options,

    pub terminated: bool
}

/// Options that can only be set before `set-logic`.
const BEFORE_LOGIC: &[&str] = &[
    options::INTERACTIVE_MODE,
    options::PRODUCE_ASSERTIONS,
    options::PRODUCE_PROOFS,
    options::PRODUCE_ASSIGNMENTS,
    options::PRODUCE_MODELS,
    options::PRODUCE_UNSAT_CORES
];

impl SessionState {
    pub fn new(conf: &Config) -> SessionState {
        SessionState {
            logic_set: false,
            depth: 0,
            last_check_sat: None,
            options: Options::configured(conf),
            terminated: false
        }
    }

    fn require_logic(&self, cmd: &Command) -> Result<(), Violation> {
        if self.logic_set {
            Ok(())
        } else {
            Err(Violation::LogicNotSet(cmd.name()))
        }
    }

    fn require_option(&self, cmd: &Command, option: &'static str) -> Result<(), Violation> {
        if self.options.enabled(option) {
            Ok(())
        } else {
            Err(Violation::OptionDisabled {
                command: cmd.name(),
                option: option
            })
        }
    }

    fn require_verdict(&self, cmd: &Command, accepted: &[Verdict], expected: &'static str) -> Result<(), Violation> {
        match self.last_check_sat {
            Some(v) if accepted.contains(&v) => Ok(()),
            _ => Err(Violation::WrongVerdict {
                command: cmd.name(),
                expected: expected
            })
        }
    }

    /**
     * Check the preconditions of a command.
     */
    pub fn check(&self, cmd: &Command, conf: &Config) -> Result<Plan, Violation> {
        use Command::*;
        match cmd {
            SetLogic(_) => {
                if self.logic_set {
                    if !conf.relax {
                        Err(Violation::LogicAlreadySet)
                    } else if self.depth > 0 {
                        Ok(Plan::Reopen(self.depth))
                    } else {
                        Ok(Plan::Send(Expect::Success))
                    }
                } else {
                    Ok(Plan::Send(Expect::Success))
                }
            },
            Assert(_) => {
                self.require_logic(cmd)?;
                if self.depth == 0 {
                    return Err(Violation::EmptyStack)
                }
                Ok(Plan::Send(Expect::Success))
            },
            Push(n) => {
                self.require_logic(cmd)?;
                if *n == 0 {
                    Ok(Plan::Answer(Response::Success))
                } else {
                    Ok(Plan::Send(Expect::Success))
                }
            },
            Pop(n) => {
                self.require_logic(cmd)?;
                if *n > self.depth {
                    Err(Violation::PopTooDeep {
                        requested: *n,
                        depth: self.depth
                    })
                } else if *n == 0 {
                    Ok(Plan::Answer(Response::Success))
                } else {
                    Ok(Plan::Send(Expect::Success))
                }
            },
            CheckSat => {
                self.require_logic(cmd)?;
                Ok(Plan::Send(Expect::CheckSat))
            },
            DeclareConst(..) | DeclareDatatypes(..) | DeclareFun(..) | DeclareSort(..) | DefineFun(..) | DefineSort(..) => {
                self.require_logic(cmd)?;
                Ok(Plan::Send(Expect::Success))
            },
            GetModel => {
                self.require_option(cmd, options::PRODUCE_MODELS)?;
                self.require_verdict(cmd, &[Verdict::Sat], "sat")?;
                Ok(Plan::Send(Expect::SExpr))
            },
            GetValue(_) => {
                self.require_option(cmd, options::PRODUCE_MODELS)?;
                self.require_verdict(cmd, &[Verdict::Sat, Verdict::Unknown], "sat or unknown")?;
                Ok(Plan::Send(Expect::Values))
            },
            GetProof => {
                self.require_option(cmd, options::PRODUCE_PROOFS)?;
                self.require_verdict(cmd, &[Verdict::Unsat], "unsat")?;
                Ok(Plan::Send(Expect::SExpr))
            },
            GetUnsatCore => {
                self.require_option(cmd, options::PRODUCE_UNSAT_CORES)?;
                self.require_verdict(cmd, &[Verdict::Unsat], "unsat")?;
                Ok(Plan::Send(Expect::Symbols))
            },
            GetAssignment => {
                self.require_option(cmd, options::PRODUCE_ASSIGNMENTS)?;
                self.require_verdict(cmd, &[Verdict::Sat, Verdict::Unknown], "sat or unknown")?;
                Ok(Plan::Send(Expect::SExpr))
            },
            GetAssertions => {
                self.require_logic(cmd)?;
                if !conf.relax {
                    self.require_option(cmd, options::PRODUCE_ASSERTIONS)?;
                }
                Ok(Plan::Send(Expect::Assertions))
            },
            SetOption(key, value) => {
                let name = key.as_str();
                if name == options::PRINT_SUCCESS && value.as_bool().is_none() {
                    return Err(Violation::NotBoolean(key.clone()))
                }

                if self.logic_set && BEFORE_LOGIC.contains(&name) {
                    return Err(Violation::AfterLogic(key.clone()))
                }

                if name == options::PRODUCE_PROOFS || name == options::PRODUCE_ASSIGNMENTS {
                    Ok(Plan::Answer(Response::Unsupported))
                } else if name == options::PRINT_SUCCESS {
                    Ok(Plan::Answer(Response::Success))
                } else {
                    Ok(Plan::Send(Expect::Success))
                }
            },
            GetOption(key) => {
                match self.options.get(key) {
                    Some(value) => Ok(Plan::Answer(Response::Value(value.clone()))),
                    None => Ok(Plan::Answer(Response::Unsupported))
                }
            },
            SetInfo(key, _) => {
                if options::PREDEFINED_INFOS.contains(&key.as_str()) {
                    Err(Violation::PredefinedInfo(key.clone()))
                } else {
                    Ok(Plan::Send(Expect::Success))
                }
            },
            GetInfo(_) => Ok(Plan::Send(Expect::SExpr)),
            Echo(_) => Ok(Plan::Send(Expect::Text)),
            Reset | ResetAssertions | Exit => Ok(Plan::Send(Expect::Success))
        }
    }

    /**
     * State after the given command succeeded with the given response.
     */
    pub fn commit(&self, cmd: &Command, response: &Response) -> SessionState {
        use Command::*;
        let mut next = self.clone();
        match cmd {
            SetLogic(_) => {
                if self.logic_set {
                    next.depth = 0;
                }
                next.logic_set = true;
                next.depth += 1;
                next.last_check_sat = None;
            },
            Assert(_) | DeclareConst(..) | DeclareDatatypes(..) | DeclareFun(..) | DeclareSort(..) | DefineFun(..) | DefineSort(..) => {
                next.last_check_sat = None;
            },
            Push(n) => {
                next.depth += *n;
                next.last_check_sat = None;
            },
            Pop(n) => {
                if *n > 0 {
                    next.depth -= *n;
                    next.last_check_sat = None;
                }
            },
            CheckSat => {
                next.last_check_sat = response.verdict();
            },
            SetOption(key, value) => {
                let name = key.as_str();
                if name != options::PRODUCE_PROOFS && name != options::PRODUCE_ASSIGNMENTS {
                    next.options.set(key, value.clone());
                }
            },
            Reset => {
                next.logic_set = false;
                next.depth = 0;
                next.last_check_sat = None;
                next.options = Options::new(self.options.version());
            },
            ResetAssertions => {
                next.depth = if self.logic_set { 1 } else { 0 };
                next.last_check_sat = None;
            },
            Exit => {
                next.terminated = true;
            },
            Echo(_) | GetAssertions | GetAssignment | GetInfo(_) | GetModel | GetOption(_) | GetProof | GetUnsatCore | GetValue(_) | SetInfo(..) => ()
        }

        next
    }
}
