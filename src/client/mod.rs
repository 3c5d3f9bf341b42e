use std::io;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};
use crate::{
    Command,
    Symbol,
    Keyword,
    Sort,
    SortedVar,
    SortDeclaration,
    DataTypeDeclaration,
    Term,
    AttributeValue,
    Located,
    SExpr
};
use crate::syntax::{translate, Z3};
use crate::response::{Response, Verdict, Expect, Decoder};

pub mod error;
pub mod conf;
pub mod options;
pub mod state;
pub mod transport;
pub mod output;

pub use error::{Error, Result};
pub use conf::{Config, Version};
pub use state::{SessionState, Plan, Violation};
pub use transport::{Transport, Process};
pub use output::Output;

pub const NAME: &str = "z3-4.3";
pub const AUTHORS: &str = "Leonardo de Moura and Nikolaj Bjorner";
pub const VERSION: &str = "4.3";

/// First line sent to the solver, before any user command.
const PREAMBLE: &str = "(set-option :print-success true)";

/**
 * Z3 session.
 *
 * Every command is checked against the session state before being sent, so an
 * ill-ordered command never reaches the solver.
 */
pub struct Client<T: Transport = Process> {
    transport: T,
    conf: Config,
    state: SessionState,
    decoder: Decoder,
    output: Output
}

/// Client shared between threads. Commands are serialized by the lock.
pub type Shared<T = Process> = Arc<Mutex<Client<T>>>;

impl Client<Process> {
    /**
     * Spawn the solver and open a session.
     */
    pub fn start(conf: Config) -> Result<Client<Process>> {
        let process = Process::spawn(&conf)?;
        Client::with_transport(process, conf)
    }
}

impl<T: Transport> Client<T> {
    /**
     * Open a session over the given transport.
     */
    pub fn with_transport(mut transport: T, conf: Config) -> Result<Client<T>> {
        let reply = transport.send(PREAMBLE)?;
        debug!("preamble acknowledged with `{}'", reply.trim());

        let mut decoder = Decoder::new(conf.lenient_success);
        decoder.line_offset += 1;

        let mut client = Client {
            state: SessionState::new(&conf),
            transport: transport,
            conf: conf,
            decoder: decoder,
            output: Output::new()
        };

        info!("started {}", NAME);
        client.diagnostic(&format!("Started {} ", NAME));
        Ok(client)
    }

    pub fn name(&self) -> &'static str {
        NAME
    }

    pub fn authors(&self) -> &'static str {
        AUTHORS
    }

    pub fn version(&self) -> &'static str {
        VERSION
    }

    pub fn config(&self) -> &Config {
        &self.conf
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn shared(self) -> Shared<T> {
        Arc::new(Mutex::new(self))
    }

    fn diagnostic(&mut self, line: &str) {
        if self.state.options.verbosity() > 0 {
            self.output.diagnostic(line)
        }
    }

    /// Write a response to the regular output channel.
    pub fn print(&mut self, response: &Response) -> Result<()> {
        self.output.print(&response.to_string())
    }

    /**
     * Execute a command.
     *
     * The session state is only updated when the command succeeds.
     */
    pub fn execute(&mut self, cmd: &Command) -> Result<Response> {
        if self.state.terminated {
            return Err(Error::Terminated)
        }

        let plan = self.state.check(cmd, &self.conf)?;
        debug!("{}: {:?}", cmd.name(), plan);

        match cmd {
            Command::SetLogic(logic) => self.diagnostic(&format!("#set-logic {}", logic)),
            Command::SetOption(key, value) => self.open_channel(key, value)?,
            _ => ()
        }

        let response = match plan {
            Plan::Answer(response) => response,
            Plan::Send(expect) => self.send(cmd, expect)?,
            Plan::Reopen(levels) => {
                info!("popping {} assertion levels before setting the logic again", levels);
                let pop = Command::Pop(levels);
                let popped = self.send(&pop, Expect::Success)?;
                self.state = self.state.commit(&pop, &popped);
                self.send(cmd, Expect::Success)?
            }
        };

        self.state = self.state.commit(cmd, &response);
        Ok(response)
    }

    /// Redirect an output channel before the option reaches the solver.
    fn open_channel(&mut self, key: &Keyword, value: &AttributeValue) -> Result<()> {
        match key.as_str() {
            options::REGULAR_OUTPUT_CHANNEL => {
                self.output.set_regular(value.as_string().unwrap_or("stdout"))
            },
            options::DIAGNOSTIC_OUTPUT_CHANNEL => {
                self.output.set_diagnostic(value.as_string().unwrap_or("stderr"))
            },
            _ => Ok(())
        }
    }

    fn transmit(&mut self, text: &str) -> Result<String> {
        match self.transport.send(text) {
            Ok(reply) => Ok(reply),
            Err(e) => {
                warn!("lost the solver: {}", e);
                self.state.terminated = true;
                Err(e.into())
            }
        }
    }

    fn send(&mut self, cmd: &Command, expect: Expect) -> Result<Response> {
        let text = translate(&Z3, cmd)?;
        debug!("sending {}", text);

        if let Command::Exit = cmd {
            return self.exit_solver(&text)
        }

        let reply = self.transmit(&text)?;
        debug!("received {}", reply.trim_end());

        if let Command::CheckSat = cmd {
            if !self.transport.is_alive(false) {
                warn!("the solver terminated during check-sat");
                self.state.terminated = true;
                return Err(Error::Terminated)
            }
        }

        let push = match cmd {
            Command::Push(_) => true,
            _ => false
        };

        match self.decoder.decode(&reply, expect) {
            Err(Error::Solver(message)) if push && !cfg!(windows) => {
                warn!("ignoring push error: {}", message);
                Ok(Response::Success)
            },
            result => result
        }
    }

    fn exit_solver(&mut self, text: &str) -> Result<Response> {
        let result = match self.transport.send(text) {
            Ok(reply) => self.decoder.decode(&reply, Expect::Success),
            Err(ref e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(Response::Success),
            Err(e) => Err(e.into())
        };

        if let Err(e) = self.transport.terminate() {
            warn!("unable to stop the solver: {}", e)
        }

        self.state.terminated = true;
        info!("ended {}", NAME);
        self.diagnostic("Ended Z3 ");
        result
    }

    /**
     * Send a comment to the solver, without waiting for a reply.
     *
     * Errors are ignored.
     */
    pub fn comment(&mut self, text: &str) {
        if self.state.terminated {
            return
        }

        let lines: Vec<String> = text.lines().map(|line| format!("; {}", line)).collect();
        if let Err(e) = self.transport.send_no_wait(&lines.join("\n")) {
            debug!("unable to send comment: {}", e)
        }
    }

    pub fn set_logic<S: Into<Symbol>>(&mut self, logic: S) -> Result<()> {
        self.execute(&Command::SetLogic(logic.into()))?;
        Ok(())
    }

    pub fn set_option(&mut self, key: &str, value: AttributeValue) -> Result<Response> {
        self.execute(&Command::SetOption(Keyword::new(key), value))
    }

    pub fn get_option(&mut self, key: &str) -> Result<Response> {
        self.execute(&Command::GetOption(Keyword::new(key)))
    }

    pub fn set_info(&mut self, key: &str, value: Option<AttributeValue>) -> Result<Response> {
        self.execute(&Command::SetInfo(Keyword::new(key), value))
    }

    pub fn get_info(&mut self, key: &str) -> Result<Response> {
        self.execute(&Command::GetInfo(Keyword::new(key)))
    }

    pub fn declare_sort<S: Into<Symbol>>(&mut self, id: S, arity: usize) -> Result<()> {
        self.execute(&Command::DeclareSort(id.into(), arity))?;
        Ok(())
    }

    pub fn define_sort<S: Into<Symbol>>(&mut self, id: S, parameters: Vec<Symbol>, sort: Sort) -> Result<()> {
        self.execute(&Command::DefineSort(id.into(), parameters, sort))?;
        Ok(())
    }

    pub fn declare_const<S: Into<Symbol>>(&mut self, id: S, sort: Sort) -> Result<()> {
        self.execute(&Command::DeclareConst(id.into(), sort))?;
        Ok(())
    }

    pub fn declare_fun<S: Into<Symbol>>(&mut self, id: S, args: Vec<Sort>, sort: Sort) -> Result<()> {
        self.execute(&Command::DeclareFun(id.into(), args, sort))?;
        Ok(())
    }

    pub fn define_fun<S: Into<Symbol>>(&mut self, id: S, args: Vec<SortedVar>, sort: Sort, body: Term) -> Result<()> {
        self.execute(&Command::DefineFun(id.into(), args, sort, body))?;
        Ok(())
    }

    pub fn declare_datatypes(&mut self, sorts: Vec<SortDeclaration>, datatypes: Vec<DataTypeDeclaration>) -> Result<()> {
        self.execute(&Command::DeclareDatatypes(sorts, datatypes))?;
        Ok(())
    }

    pub fn assert(&mut self, term: Term) -> Result<()> {
        self.execute(&Command::Assert(term))?;
        Ok(())
    }

    pub fn push(&mut self, levels: usize) -> Result<()> {
        self.execute(&Command::Push(levels))?;
        Ok(())
    }

    pub fn pop(&mut self, levels: usize) -> Result<()> {
        self.execute(&Command::Pop(levels))?;
        Ok(())
    }

    pub fn check_sat(&mut self) -> Result<Verdict> {
        let response = self.execute(&Command::CheckSat)?;
        response.verdict().ok_or_else(|| unexpected(Expect::CheckSat, &response))
    }

    pub fn get_model(&mut self) -> Result<Located<SExpr>> {
        match self.execute(&Command::GetModel)? {
            Response::SExpr(model) => Ok(model),
            other => Err(unexpected(Expect::SExpr, &other))
        }
    }

    pub fn get_value(&mut self, terms: Vec<Term>) -> Result<Vec<(Term, Term)>> {
        match self.execute(&Command::GetValue(terms))? {
            Response::Values(values) => Ok(values),
            other => Err(unexpected(Expect::Values, &other))
        }
    }

    pub fn get_unsat_core(&mut self) -> Result<Vec<Symbol>> {
        match self.execute(&Command::GetUnsatCore)? {
            Response::Symbols(symbols) => Ok(symbols),
            other => Err(unexpected(Expect::Symbols, &other))
        }
    }

    pub fn get_assertions(&mut self) -> Result<Vec<Term>> {
        match self.execute(&Command::GetAssertions)? {
            Response::Assertions(terms) => Ok(terms),
            other => Err(unexpected(Expect::Assertions, &other))
        }
    }

    pub fn get_proof(&mut self) -> Result<Response> {
        self.execute(&Command::GetProof)
    }

    pub fn get_assignment(&mut self) -> Result<Response> {
        self.execute(&Command::GetAssignment)
    }

    pub fn echo<S: Into<String>>(&mut self, text: S) -> Result<String> {
        match self.execute(&Command::Echo(text.into()))? {
            Response::Text(text) => Ok(text),
            other => Err(unexpected(Expect::Text, &other))
        }
    }

    pub fn reset(&mut self) -> Result<()> {
        self.execute(&Command::Reset)?;
        Ok(())
    }

    pub fn reset_assertions(&mut self) -> Result<()> {
        self.execute(&Command::ResetAssertions)?;
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        self.execute(&Command::Exit)?;
        Ok(())
    }
}

fn unexpected(expect: Expect, response: &Response) -> Error {
    Error::UnexpectedResponse {
        expected: expect.name(),
        raw: response.to_string()
    }
}
