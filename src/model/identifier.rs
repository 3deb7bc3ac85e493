//! Test identifiers parsed from discovery output.
//!
//! A discovery line like `tests/test_x.py::TestA::test_one` names a module,
//! an optional class and an optional test. Parsing is lenient: the framework's
//! own output is trusted, so only banner and summary lines are rejected.

use std::fmt;

/// Separator between identifier parts.
pub const SEPARATOR: &str = "::";

/// Structured path to a test, test class, or test module.
///
/// Immutable value type; equality is structural.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TestIdentifier {
    module: String,
    class: Option<String>,
    test: Option<String>,
}

impl TestIdentifier {
    /// Identifier naming a whole module.
    pub fn module(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            class: None,
            test: None,
        }
    }

    /// Identifier naming a module-level test function.
    pub fn function(module: impl Into<String>, test: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            class: None,
            test: Some(test.into()),
        }
    }

    /// Identifier naming a test method inside a class.
    pub fn method(
        module: impl Into<String>,
        class: impl Into<String>,
        test: impl Into<String>,
    ) -> Self {
        Self {
            module: module.into(),
            class: Some(class.into()),
            test: Some(test.into()),
        }
    }

    /// Parse one line of discovery output.
    ///
    /// Returns `None` for noise: blank lines, `=` banner lines and the
    /// `tests collected` summary. Everything else is accepted.
    ///
    /// - `M` yields a module-only identifier
    /// - `M::T` yields a module-level test
    /// - `M::C::T[::rest]` yields a class test whose name is `T[::rest]`
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if is_noise(line) {
            return None;
        }

        let mut parts = line.splitn(3, SEPARATOR);
        // splitn always yields at least one item, even for an empty string
        let module = parts.next().unwrap_or_default();

        let identifier = match (parts.next(), parts.next()) {
            (None, _) => Self::module(module),
            (Some(test), None) => Self::function(module, test),
            (Some(class), Some(test)) => Self::method(module, class, test),
        };
        Some(identifier)
    }

    /// Module part, e.g. `tests/test_x.py`.
    pub fn module_name(&self) -> &str {
        &self.module
    }

    /// Class part, present only for methods.
    pub fn class_name(&self) -> Option<&str> {
        self.class.as_deref()
    }

    /// Test part, absent for module-only identifiers. Anything after the
    /// class separator belongs to it, `::` included.
    pub fn test_name(&self) -> Option<&str> {
        self.test.as_deref()
    }

    /// Qualified path of the enclosing class (`module::Class`), if any.
    pub fn class_path(&self) -> Option<String> {
        self.class
            .as_ref()
            .map(|class| format!("{}{SEPARATOR}{}", self.module, class))
    }
}

impl fmt::Display for TestIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.module)?;
        if let Some(class) = &self.class {
            write!(f, "{SEPARATOR}{class}")?;
        }
        if let Some(test) = &self.test {
            write!(f, "{SEPARATOR}{test}")?;
        }
        Ok(())
    }
}

fn is_noise(trimmed: &str) -> bool {
    trimmed.is_empty() || trimmed.starts_with('=') || trimmed.contains("tests collected")
}

/// Parse every identifier out of a block of discovery output, dropping noise.
pub fn parse_lines(output: &str) -> Vec<TestIdentifier> {
    output.lines().filter_map(TestIdentifier::parse).collect()
}
