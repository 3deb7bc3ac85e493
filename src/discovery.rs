//! Test discovery through the framework's collect-only mode.
//!
//! Runs once at startup, before the terminal is taken over. Any failure here
//! is fatal to the application.

use crate::framework::FrameworkCommand;
use crate::model::{identifier, DiscoveryError, TestIdentifier, TestTree};
use tracing::{debug, info};

/// Run discovery and parse its stdout into identifiers, in output order.
///
/// # Errors
///
/// Returns `DiscoveryError::Spawn` if the program cannot be started and
/// `DiscoveryError::Exited` if it exits unsuccessfully.
pub fn discover_tests(framework: &FrameworkCommand) -> Result<Vec<TestIdentifier>, DiscoveryError> {
    let program = framework.program().to_string();
    debug!(program = %program, args = ?framework.args(), "Running test discovery");

    let output = framework
        .discovery_command()
        .output()
        .map_err(|source| DiscoveryError::Spawn {
            program: program.clone(),
            source,
        })?;

    if !output.status.success() {
        return Err(DiscoveryError::Exited {
            program,
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let identifiers = identifier::parse_lines(&stdout);
    info!(count = identifiers.len(), "Discovered test identifiers");
    Ok(identifiers)
}

/// Run discovery and fold the result into the test hierarchy.
pub fn discover_tree(framework: &FrameworkCommand) -> Result<TestTree, DiscoveryError> {
    let identifiers = discover_tests(framework)?;
    let tree = TestTree::build(&identifiers);
    info!(
        modules = tree.modules.len(),
        leaves = tree.leaf_count(),
        "Built test hierarchy"
    );
    Ok(tree)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    /// A shell script standing in for the framework. Mode arguments land in
    /// `$1`, `$2`, ... and are ignored unless the script reads them.
    fn fake_framework(script: &str) -> FrameworkCommand {
        FrameworkCommand::new("sh").with_args(["-c", script, "sh"])
    }

    #[test]
    fn parses_collect_only_output() {
        let framework = fake_framework(
            "printf 'tests/test_x.py::TestA::test_one\\ntests/test_x.py::test_f\\n\\n2 tests collected in 0.01s\\n'",
        );
        let ids = discover_tests(&framework).unwrap();
        assert_eq!(
            ids,
            vec![
                TestIdentifier::method("tests/test_x.py", "TestA", "test_one"),
                TestIdentifier::function("tests/test_x.py", "test_f"),
            ]
        );
    }

    #[test]
    fn passes_collect_only_quiet_flags() {
        let framework = fake_framework("printf '%s\\n' \"$1\" \"$2\"");
        let ids = discover_tests(&framework).unwrap();
        assert_eq!(
            ids,
            vec![
                TestIdentifier::module("--collect-only"),
                TestIdentifier::module("-q"),
            ]
        );
    }

    #[test]
    fn nonzero_exit_is_discovery_failure() {
        let framework = fake_framework("echo 'ERROR: file not found' >&2; exit 4");
        let err = discover_tests(&framework).unwrap_err();
        match err {
            DiscoveryError::Exited { status, stderr, .. } => {
                assert_eq!(status.code(), Some(4));
                assert_eq!(stderr, "ERROR: file not found");
            }
            other => panic!("expected Exited, got {other:?}"),
        }
    }

    #[test]
    fn missing_program_is_spawn_failure() {
        let framework = FrameworkCommand::new("testdeck-no-such-framework-binary");
        let err = discover_tests(&framework).unwrap_err();
        assert!(matches!(err, DiscoveryError::Spawn { .. }), "got {err:?}");
    }

    #[test]
    fn discover_tree_builds_hierarchy() {
        let framework = fake_framework(
            "printf 'a.py::C::t1\\na.py::C::t2\\nb.py::f\\n'",
        );
        let tree = discover_tree(&framework).unwrap();
        assert_eq!(tree.modules.len(), 2);
        assert_eq!(tree.leaf_count(), 3);
    }
}
