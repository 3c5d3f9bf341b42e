use std::fs::OpenOptions;
use std::io::{self, Write};
use tracing::warn;
use super::{Error, Result};

type Channel = Box<dyn Write + Send>;

/// Opens `stdout`, `stderr`, or a file in append mode.
fn open(name: &str) -> Result<Channel> {
    match name {
        "stdout" => Ok(Box::new(io::stdout())),
        "stderr" => Ok(Box::new(io::stderr())),
        path => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| Error::Output(path.to_string(), e))?;
            Ok(Box::new(file))
        }
    }
}

/**
 * Regular and diagnostic output channels of a session.
 */
pub struct Output {
    regular: Channel,
    diagnostic: Channel
}

impl Output {
    pub fn new() -> Output {
        Output {
            regular: Box::new(io::stdout()),
            diagnostic: Box::new(io::stderr())
        }
    }

    pub fn set_regular(&mut self, name: &str) -> Result<()> {
        self.regular = open(name)?;
        Ok(())
    }

    pub fn set_diagnostic(&mut self, name: &str) -> Result<()> {
        self.diagnostic = open(name)?;
        Ok(())
    }

    pub fn print(&mut self, text: &str) -> Result<()> {
        writeln!(self.regular, "{}", text)?;
        self.regular.flush()?;
        Ok(())
    }

    /// Write a diagnostic line. Failures are only logged.
    pub fn diagnostic(&mut self, line: &str) {
        if let Err(e) = writeln!(self.diagnostic, "{}", line).and_then(|_| self.diagnostic.flush()) {
            warn!("unable to write diagnostic output: {}", e)
        }
    }
}

impl Default for Output {
    fn default() -> Output {
        Output::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn append_to_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("regular.txt");
        fs::write(&path, "first\n").unwrap();

        let mut output = Output::new();
        output.set_regular(path.to_str().unwrap()).unwrap();
        output.print("second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn unopenable_channel() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("diag.txt");

        let mut output = Output::new();
        match output.set_diagnostic(path.to_str().unwrap()) {
            Err(Error::Output(name, _)) => assert_eq!(name, path.to_str().unwrap()),
            _ => panic!("the channel should not open")
        }
    }
}
