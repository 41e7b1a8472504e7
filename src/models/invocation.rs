//! Invocation models
//!
//! The fixed command line applied to every run, plus the per-run
//! environment derived from a snapshot taken once per harness run.

use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::sync::Arc;

/// A single environment variable override
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnvOverride {
    pub name: String,
    pub value: String,
}

impl EnvOverride {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for EnvOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

/// Read-once snapshot of the harness environment.
///
/// Cloning is cheap; derived environments are fresh maps so an override
/// never leaks into a later invocation.
#[derive(Clone, Debug, Default)]
pub struct BaseEnvironment {
    vars: Arc<BTreeMap<OsString, OsString>>,
}

impl BaseEnvironment {
    /// Capture the current process environment, dropping `excluded`
    pub fn capture_without(excluded: &str) -> Self {
        Self::from_vars_without(std::env::vars_os(), excluded)
    }

    /// Snapshot `vars`, dropping `excluded`
    pub fn from_vars_without<I, K, V>(vars: I, excluded: &str) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<OsString>,
        V: Into<OsString>,
    {
        let excluded = OsStr::new(excluded);
        Self::from_vars(
            vars.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .filter(|(key, _): &(OsString, OsString)| key.as_os_str() != excluded),
        )
    }

    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<OsString>,
        V: Into<OsString>,
    {
        Self {
            vars: Arc::new(
                vars.into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Number of captured variables
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Build the environment for one child process
    pub fn derive(&self, env_override: Option<&EnvOverride>) -> BTreeMap<OsString, OsString> {
        let mut vars = (*self.vars).clone();
        if let Some(ov) = env_override {
            vars.insert(OsString::from(&ov.name), OsString::from(&ov.value));
        }
        vars
    }
}

/// Everything needed to launch one trial
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvocationSpec {
    /// Fixed argument vector, shared by every invocation of a run
    pub args: Arc<[String]>,
    pub env_override: Option<EnvOverride>,
    /// Parallelism level this invocation belongs to, if swept
    pub level: Option<u32>,
}

impl InvocationSpec {
    /// Invocation without any environment override
    pub fn serial(args: Arc<[String]>) -> Self {
        Self {
            args,
            env_override: None,
            level: None,
        }
    }

    /// Invocation that sets `var` to the decimal form of `level`
    pub fn with_level(args: Arc<[String]>, var: &str, level: u32) -> Self {
        Self {
            args,
            env_override: Some(EnvOverride::new(var, level.to_string())),
            level: Some(level),
        }
    }

    /// Human-readable label used in progress lines and reports
    pub fn label(&self) -> Option<String> {
        self.env_override.as_ref().map(|ov| ov.to_string())
    }
}
