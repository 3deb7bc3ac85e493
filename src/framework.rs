//! Invocation contract of the external test framework.
//!
//! The framework is driven through two command lines only:
//! - discovery: `<program> <args>... --collect-only -q`
//! - execution: `<program> <args>... <target> -vv`

use std::process::{Command, Stdio};

/// Default framework program.
pub const DEFAULT_PROGRAM: &str = "pytest";

const COLLECT_ARGS: [&str; 2] = ["--collect-only", "-q"];
const VERBOSE_FLAG: &str = "-vv";

/// Program plus leading arguments used for every framework invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameworkCommand {
    program: String,
    args: Vec<String>,
}

impl Default for FrameworkCommand {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl FrameworkCommand {
    /// Command running `program` with no leading arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Arguments placed before the mode-specific ones.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Program name or path.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Leading arguments.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Collect-only command; stdout is captured by `Command::output`.
    pub fn discovery_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).args(COLLECT_ARGS).stdin(Stdio::null());
        cmd
    }

    /// Verbose run of exactly `target`, with both output streams piped.
    pub fn run_command(&self, target: &str) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .arg(target)
            .arg(VERBOSE_FLAG)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_of(cmd: &Command) -> Vec<String> {
        cmd.get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn default_program_is_pytest() {
        assert_eq!(FrameworkCommand::default().program(), "pytest");
    }

    #[test]
    fn discovery_uses_collect_only_quiet() {
        let cmd = FrameworkCommand::default().discovery_command();
        assert_eq!(cmd.get_program().to_string_lossy(), "pytest");
        assert_eq!(args_of(&cmd), vec!["--collect-only", "-q"]);
    }

    #[test]
    fn run_targets_exactly_one_path_verbosely() {
        let cmd = FrameworkCommand::default().run_command("tests/test_x.py::TestA::test_one");
        assert_eq!(
            args_of(&cmd),
            vec!["tests/test_x.py::TestA::test_one", "-vv"]
        );
    }

    #[test]
    fn leading_args_come_first() {
        let framework = FrameworkCommand::new("python").with_args(["-m", "pytest"]);
        assert_eq!(
            args_of(&framework.run_command("a.py")),
            vec!["-m", "pytest", "a.py", "-vv"]
        );
        assert_eq!(
            args_of(&framework.discovery_command()),
            vec!["-m", "pytest", "--collect-only", "-q"]
        );
    }
}
