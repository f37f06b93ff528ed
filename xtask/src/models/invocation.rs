use std::fmt;
use std::process::Command;

/// A step of a CI job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Build,
    Test,
}

impl Step {
    pub const fn subcommand(self) -> &'static str {
        match self {
            Self::Build => "build",
            Self::Test => "test",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.subcommand())
    }
}

/// A single `cargo` invocation together with its environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CargoInvocation {
    pub step: Step,
    pub args: Vec<String>,
    pub env: Vec<(&'static str, String)>,
}

impl CargoInvocation {
    pub fn to_command(&self) -> Command {
        let mut command = Command::new("cargo");
        command.args(&self.args).envs(self.env.iter().map(|(key, value)| (*key, value.as_str())));
        command
    }
}

impl fmt::Display for CargoInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.env {
            write!(f, "{key}={value:?} ")?;
        }
        f.write_str("cargo")?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " {arg:?}")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}
