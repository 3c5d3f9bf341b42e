use std::collections::HashMap;
use crate::{AttributeValue, Keyword};
use super::{Config, Version};

pub const PRINT_SUCCESS: &str = ":print-success";
pub const VERBOSITY: &str = ":verbosity";
pub const REGULAR_OUTPUT_CHANNEL: &str = ":regular-output-channel";
pub const DIAGNOSTIC_OUTPUT_CHANNEL: &str = ":diagnostic-output-channel";
pub const INTERACTIVE_MODE: &str = ":interactive-mode";
pub const PRODUCE_ASSERTIONS: &str = ":produce-assertions";
pub const PRODUCE_MODELS: &str = ":produce-models";
pub const PRODUCE_PROOFS: &str = ":produce-proofs";
pub const PRODUCE_UNSAT_CORES: &str = ":produce-unsat-cores";
pub const PRODUCE_ASSIGNMENTS: &str = ":produce-assignments";

/// Info keywords whose value is defined by the solver.
pub const PREDEFINED_INFOS: &[&str] = &[
    ":name",
    ":authors",
    ":version",
    ":error-behavior",
    ":reason-unknown",
    ":all-statistics",
    ":assertion-stack-levels"
];

/**
 * Local mirror of the solver options.
 */
#[derive(Clone, Debug)]
pub struct Options {
    version: Version,
    values: HashMap<String, AttributeValue>
}

impl Options {
    pub fn new(version: Version) -> Options {
        let mut values = HashMap::new();
        let mut set = |key: &str, value: AttributeValue| {
            values.insert(key.to_string(), value);
        };

        set(PRINT_SUCCESS, AttributeValue::bool(true));
        set(":expand-definitions", AttributeValue::bool(false));
        set(INTERACTIVE_MODE, AttributeValue::bool(false));
        set(PRODUCE_ASSERTIONS, AttributeValue::bool(false));
        set(PRODUCE_PROOFS, AttributeValue::bool(false));
        set(PRODUCE_UNSAT_CORES, AttributeValue::bool(false));
        set(PRODUCE_MODELS, AttributeValue::bool(false));
        set(PRODUCE_ASSIGNMENTS, AttributeValue::bool(false));
        set(":produce-unsat-assumptions", AttributeValue::bool(false));
        set(":global-declarations", AttributeValue::bool(false));
        set(REGULAR_OUTPUT_CHANNEL, AttributeValue::string("stdout"));
        set(DIAGNOSTIC_OUTPUT_CHANNEL, AttributeValue::string("stderr"));
        set(":random-seed", AttributeValue::numeral(0u32));
        set(VERBOSITY, AttributeValue::numeral(0u32));
        set(":reproducible-resource-limit", AttributeValue::numeral(0u32));

        Options {
            version: version,
            values: values
        }
    }

    /// Default options, with the configured verbosity.
    pub fn configured(conf: &Config) -> Options {
        let mut options = Options::new(conf.version);
        options.set(&Keyword::new(VERBOSITY), AttributeValue::numeral(conf.verbosity));
        options
    }

    pub fn version(&self) -> Version {
        self.version
    }

    /// Name under which the option is stored.
    ///
    /// After SMT-LIB 2.0, `:interactive-mode` is an alias of `:produce-assertions`.
    fn canonical<'a>(&self, key: &'a str) -> &'a str {
        if key == INTERACTIVE_MODE && self.version != Version::V20 {
            PRODUCE_ASSERTIONS
        } else {
            key
        }
    }

    pub fn get(&self, key: &Keyword) -> Option<&AttributeValue> {
        self.values.get(self.canonical(key.as_str()))
    }

    pub fn set(&mut self, key: &Keyword, value: AttributeValue) {
        let key = self.canonical(key.as_str()).to_string();
        self.values.insert(key, value);
    }

    /// Checks if the given boolean option is `true`.
    pub fn enabled(&self, key: &str) -> bool {
        self.get(&Keyword::new(key)).and_then(AttributeValue::as_bool).unwrap_or(false)
    }

    /// Current `:verbosity` level.
    pub fn verbosity(&self) -> u64 {
        match self.get(&Keyword::new(VERBOSITY)).and_then(AttributeValue::as_numeral) {
            Some(n) => n.iter_u64_digits().next().unwrap_or(0),
            None => 0
        }
    }
}
