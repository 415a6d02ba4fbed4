use std::fmt;

/// Accumulated rule violations, in the order the rules ran.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    errors: Vec<String>,
    success_message: &'static str,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::with_success_message("Validation successful")
    }

    pub fn with_success_message(success_message: &'static str) -> Self {
        Self {
            errors: Vec::new(),
            success_message,
        }
    }

    pub fn push(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    /// Records `msg` when `violated` holds.
    pub fn check(&mut self, violated: bool, msg: impl Into<String>) {
        if violated {
            self.push(msg);
        }
    }

    /// Appends another report's errors, each prefixed with `context`.
    pub fn merge(&mut self, context: &str, other: ValidationReport) {
        for e in other.errors {
            if context.is_empty() {
                self.errors.push(e);
            } else {
                self.errors.push(format!("{context}: {e}"));
            }
        }
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// `"; "`-joined violations, or the success message when there are none.
    pub fn message(&self) -> String {
        if self.errors.is_empty() {
            self.success_message.to_string()
        } else {
            self.errors.join("; ")
        }
    }

    pub fn into_result(self) -> Result<(), ValidationReport> {
        if self.is_ok() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_join_in_order() {
        let mut r = ValidationReport::new();
        assert!(r.is_ok());
        assert_eq!(r.message(), "Validation successful");
        r.push("a");
        r.check(false, "skipped");
        r.check(true, "b");
        assert!(!r.is_ok());
        assert_eq!(r.message(), "a; b");
    }

    #[test]
    fn merge_prefixes_context() {
        let mut outer = ValidationReport::new();
        let mut inner = ValidationReport::new();
        inner.push("Field name is required");
        outer.merge("Kava Field 1", inner);
        assert_eq!(outer.errors(), ["Kava Field 1: Field name is required"]);
    }
}
