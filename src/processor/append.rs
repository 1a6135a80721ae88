//! Trailing-semicolon processor for scripts (`semicolons`).
//!
//! Ensures a script ends with a statement terminator so concatenating it
//! with the next resource cannot change parse semantics.

use super::{ProcessError, ResourceProcessor};
use crate::model::Resource;

pub struct Semicolons;

impl ResourceProcessor for Semicolons {
    fn name(&self) -> &str {
        "semicolons"
    }

    fn process(&self, _resource: Option<&Resource>, input: &str) -> Result<String, ProcessError> {
        let trimmed = input.trim_end();
        if trimmed.is_empty() || trimmed.ends_with(';') || trimmed.ends_with('}') {
            return Ok(input.to_string());
        }
        let mut out = input.to_string();
        out.push(';');
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_missing_semicolon() {
        assert_eq!(Semicolons.process(None, "var x = 1").unwrap(), "var x = 1;");
    }

    #[test]
    fn leaves_terminated_input_alone() {
        assert_eq!(Semicolons.process(None, "var x = 1;").unwrap(), "var x = 1;");
        assert_eq!(
            Semicolons.process(None, "function f() {}").unwrap(),
            "function f() {}"
        );
        assert_eq!(Semicolons.process(None, "").unwrap(), "");
    }
}
