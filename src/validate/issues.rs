use std::fmt;

/// Header line of a rendered [`ValidationError`].
const HEADER: &str = "An Atom validation error occurred:";

/// Every conformance problem found in one validation pass.
///
/// Rendering produces the header line followed by one `- <issue>` line per
/// issue, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    issues: Vec<String>,
}

impl ValidationError {
    /// Issues in discovery order. Never empty.
    pub fn issues(&self) -> &[String] {
        &self.issues
    }

    /// Takes the issues out, in discovery order.
    pub fn into_issues(self) -> Vec<String> {
        self.issues
    }

    /// Combines two validation outcomes, keeping the issues of `first` first.
    pub fn merge(
        first: Result<(), ValidationError>,
        second: Result<(), ValidationError>,
    ) -> Result<(), ValidationError> {
        let mut issues = Issues::new();
        issues.merge(first);
        issues.merge(second);
        issues.finish()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{HEADER}")?;
        for issue in &self.issues {
            writeln!(f, "- {issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Collects issues during one validation pass without stopping at the first.
///
/// Each validator builds its own `Issues`, merges the outcomes of the
/// validators it delegates to, and returns [`Issues::finish`].
#[derive(Debug, Default)]
pub(crate) struct Issues {
    issues: Vec<String>,
}

impl Issues {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add(&mut self, issue: impl Into<String>) {
        self.issues.push(issue.into());
    }

    /// Records an external checker's failure using its message verbatim.
    pub(crate) fn add_err(&mut self, err: &impl fmt::Display) {
        self.issues.push(err.to_string());
    }

    /// Appends the issues of a nested outcome. `Ok(())` is a no-op.
    pub(crate) fn merge(&mut self, outcome: Result<(), ValidationError>) {
        if let Err(err) = outcome {
            self.issues.extend(err.issues);
        }
    }

    pub(crate) fn finish(self) -> Result<(), ValidationError> {
        if self.issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                issues: self.issues,
            })
        }
    }
}
