//! Subprocess execution for git and the github-release tool.
use log::*;
use std::fmt;
use std::process::Command;

use crate::{error::ReleaseToolError, result::Result};

/// Exit status of a finished subprocess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandStatus {
    code: Option<i32>,
}

impl CommandStatus {
    pub fn new(code: Option<i32>) -> Self {
        Self { code }
    }

    /// Whether the process exited with code 0. A process terminated by a
    /// signal has no code and never counts as success.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    pub fn code(&self) -> Option<i32> {
        self.code
    }
}

impl fmt::Display for CommandStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit code {code}"),
            None => write!(f, "signal"),
        }
    }
}

/// Abstraction over subprocess invocation so command flows can be tested
/// without spawning real processes.
#[cfg_attr(test, mockall::automock)]
pub trait CommandRunner: Send + Sync {
    /// Run a program to completion, inheriting stdio, and report its exit
    /// status.
    fn run(&self, program: &str, args: &[String]) -> Result<CommandStatus>;
}

/// Runner backed by `std::process::Command`. Child stdout and stderr pass
/// straight through to the terminal so the invoked tool's own output stays
/// visible.
#[derive(Debug, Default)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<CommandStatus> {
        debug!("running: {} {}", program, args.join(" "));

        let status = Command::new(program).args(args).status().map_err(
            |source| ReleaseToolError::CommandSpawn {
                program: program.to_string(),
                source,
            },
        )?;

        Ok(CommandStatus::new(status.code()))
    }
}
