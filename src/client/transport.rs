use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write, BufReader};
use std::process::{self, Child, ChildStdin, ChildStdout, Stdio};
use tracing::{debug, info, trace};
use utf8_decode::UnsafeDecoder;
use super::Config;

/**
 * Line-oriented channel to a solver.
 */
pub trait Transport {
    /// Send some text and wait for one complete reply.
    fn send(&mut self, text: &str) -> io::Result<String>;

    /// Send some text without waiting for any reply.
    fn send_no_wait(&mut self, text: &str) -> io::Result<()>;

    /// Checks if the solver is still running.
    ///
    /// If `wait` is true, wait for the solver to exit first.
    fn is_alive(&mut self, wait: bool) -> bool;

    /// Stop the solver.
    fn terminate(&mut self) -> io::Result<()>;
}

/**
 * Tracks the nesting of a reply being read.
 *
 * Parentheses inside string litterals and `|quoted|` symbols are ignored.
 */
#[derive(Default)]
struct Balance {
    depth: i64,
    string: bool,
    escape: bool,
    quoted: bool,
    content: bool
}

impl Balance {
    /// Feed one character, returning true if it ends the reply.
    fn feed(&mut self, c: char) -> bool {
        if self.string {
            if self.escape {
                self.escape = false
            } else if c == '\\' {
                self.escape = true
            } else if c == '"' {
                self.string = false
            }
            false
        } else if self.quoted {
            if c == '|' {
                self.quoted = false
            }
            false
        } else {
            match c {
                '(' => self.depth += 1,
                ')' => self.depth -= 1,
                '"' => self.string = true,
                '|' => self.quoted = true,
                '\n' => return self.content && self.depth <= 0,
                c if c.is_whitespace() => return false,
                _ => ()
            }
            self.content = true;
            false
        }
    }
}

/// Reads one complete reply, up to the end of the line where its parentheses balance.
pub(crate) fn read_reply<I: Iterator<Item = io::Result<char>>>(chars: &mut I) -> io::Result<String> {
    let mut reply = String::new();
    let mut balance = Balance::default();

    loop {
        match chars.next() {
            Some(c) => {
                let c = c?;
                reply.push(c);
                if balance.feed(c) {
                    break
                }
            },
            None => {
                if reply.trim().is_empty() {
                    return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "the solver closed its output"))
                }
                break
            }
        }
    }

    trace!("raw reply {:?}", reply);
    Ok(reply)
}

/**
 * Solver running as a child process, talking through its standard input and output.
 */
pub struct Process {
    child: Child,
    input: ChildStdin,
    output: UnsafeDecoder<io::Bytes<BufReader<ChildStdout>>>,
    transcript: Option<File>
}

fn missing_pipe(name: &str) -> io::Error {
    io::Error::new(io::ErrorKind::Other, format!("unable to access the solver {}", name))
}

impl Process {
    /**
     * Spawn the solver described by the configuration.
     */
    pub fn spawn(conf: &Config) -> io::Result<Process> {
        let args = conf.arguments();
        info!("starting {} {}", conf.executable.display(), args.join(" "));

        let mut child = process::Command::new(&conf.executable)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()?;

        let input = child.stdin.take().ok_or_else(|| missing_pipe("input"))?;
        let output = child.stdout.take().ok_or_else(|| missing_pipe("output"))?;

        let transcript = match &conf.transcript {
            Some(path) => Some(OpenOptions::new().create(true).append(true).open(path)?),
            None => None
        };

        Ok(Process {
            child: child,
            input: input,
            output: UnsafeDecoder::new(BufReader::new(output).bytes()),
            transcript: transcript
        })
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        self.input.write_all(text.as_bytes())?;
        if !text.ends_with('\n') {
            self.input.write_all(b"\n")?;
        }
        self.input.flush()?;

        if let Some(transcript) = self.transcript.as_mut() {
            writeln!(transcript, "{}", text.trim_end())?;
        }

        Ok(())
    }
}

impl Transport for Process {
    fn send(&mut self, text: &str) -> io::Result<String> {
        self.write(text)?;
        read_reply(&mut self.output)
    }

    fn send_no_wait(&mut self, text: &str) -> io::Result<()> {
        self.write(text)
    }

    fn is_alive(&mut self, wait: bool) -> bool {
        if wait {
            if let Err(e) = self.child.wait() {
                debug!("unable to wait for the solver: {}", e)
            }
            false
        } else {
            match self.child.try_wait() {
                Ok(None) => true,
                _ => false
            }
        }
    }

    fn terminate(&mut self) -> io::Result<()> {
        if let Ok(None) = self.child.try_wait() {
            self.child.kill()?;
        }
        self.child.wait()?;
        Ok(())
    }
}

impl Drop for Process {
    fn drop(&mut self) {
        if let Ok(None) = self.child.try_wait() {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn replies(text: &str) -> Vec<String> {
        let mut chars = text.chars().map(Ok);
        let mut replies = Vec::new();
        loop {
            match read_reply(&mut chars) {
                Ok(reply) => replies.push(reply.trim().to_string()),
                Err(_) => break
            }
        }
        replies
    }

    #[test]
    fn one_line_replies() {
        assert_eq!(replies("success\nsat\n"), vec!["success", "sat"]);
    }

    #[test]
    fn multi_line_replies() {
        assert_eq!(
            replies("(model\n  (define-fun x () Int 1)\n)\nsuccess\n"),
            vec!["(model\n  (define-fun x () Int 1)\n)", "success"]
        );
    }

    #[test]
    fn parentheses_in_strings_and_symbols() {
        assert_eq!(
            replies("(error \"line 1: missing )\")\n(|a (b| c)\n"),
            vec!["(error \"line 1: missing )\")", "(|a (b| c)"]
        );
    }

    #[test]
    fn skip_blank_lines() {
        assert_eq!(replies("\n\nunsat\n"), vec!["unsat"]);
    }

    #[test]
    fn closed_output() {
        let mut chars = "".chars().map(Ok);
        match read_reply(&mut chars) {
            Err(e) => assert_eq!(e.kind(), io::ErrorKind::UnexpectedEof),
            Ok(reply) => panic!("unexpected reply {:?}", reply)
        }
    }

    #[cfg(unix)]
    #[test]
    fn exited_process_is_not_alive() {
        let mut process = Process::spawn(&Config::new().executable("true")).unwrap();
        assert!(!process.is_alive(true));
        assert!(!process.is_alive(false));
    }

    #[cfg(unix)]
    #[test]
    #[ignore]
    fn z3_process() {
        let mut process = Process::spawn(&Config::new()).unwrap();
        assert_eq!(process.send("(set-option :print-success true)").unwrap().trim(), "success");
        assert_eq!(process.send("(check-sat)").unwrap().trim(), "sat");
        process.terminate().unwrap();
        assert!(!process.is_alive(false));
    }
}
