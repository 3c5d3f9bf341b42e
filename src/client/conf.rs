use std::path::PathBuf;
use serde::{Serialize, Deserialize};

/// SMT-LIB standard version the session follows.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Version {
    V20,
    V25,
    V26
}

impl Default for Version {
    fn default() -> Version {
        Version::V25
    }
}

fn default_executable() -> PathBuf {
    PathBuf::from("z3")
}

fn default_lenient_success() -> bool {
    cfg!(target_os = "macos")
}

/// Z3 session configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Path of the solver executable.
    #[serde(default = "default_executable")]
    pub executable: PathBuf,

    /// Solver timeout, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,

    /// Relaxed mode: accept a second `set-logic` and `get-assertions` without `:produce-assertions`.
    #[serde(default)]
    pub relax: bool,

    #[serde(default)]
    pub version: Version,

    /// File receiving a copy of everything sent to the solver.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<PathBuf>,

    /// Accept any reply starting with `success` as an acknowledgement.
    #[serde(default = "default_lenient_success")]
    pub lenient_success: bool,

    /// Initial `:verbosity` level.
    #[serde(default)]
    pub verbosity: u32
}

impl Default for Config {
    fn default() -> Config {
        Config {
            executable: default_executable(),
            timeout: None,
            relax: false,
            version: Version::default(),
            transcript: None,
            lenient_success: default_lenient_success(),
            verbosity: 0
        }
    }
}

impl Config {
    pub fn new() -> Config {
        Self::default()
    }

    pub fn executable<P: Into<PathBuf>>(mut self, path: P) -> Config {
        self.executable = path.into();
        self
    }

    pub fn timeout(mut self, seconds: u32) -> Config {
        self.timeout = Some(seconds);
        self
    }

    pub fn relax(mut self, relax: bool) -> Config {
        self.relax = relax;
        self
    }

    pub fn version(mut self, version: Version) -> Config {
        self.version = version;
        self
    }

    pub fn transcript<P: Into<PathBuf>>(mut self, path: P) -> Config {
        self.transcript = Some(path.into());
        self
    }

    pub fn lenient_success(mut self, lenient: bool) -> Config {
        self.lenient_success = lenient;
        self
    }

    pub fn verbosity(mut self, level: u32) -> Config {
        self.verbosity = level;
        self
    }

    /**
     * Arguments given to the solver executable.
     */
    pub fn arguments(&self) -> Vec<String> {
        let windows = cfg!(windows);
        let prefix = if windows { "/" } else { "-" };

        let mut args = vec![format!("{}smt2", prefix), format!("{}in", prefix)];
        if let Some(timeout) = self.timeout {
            args.push(format!("{}T:{}", prefix, timeout))
        }

        args
    }
}
