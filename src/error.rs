use thiserror::Error;

/// Error returned by a [`Connection`](crate::Connection).
pub type FetchError = Box<dyn std::error::Error + Send + Sync>;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("fetching '{command}' failed")]
    Fetch {
        command: String,
        #[source]
        source: FetchError,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("line {line}: '{text}' has no preceding 'if' in its scope")]
    BranchOrder { line: usize, text: String },
}

/// A policy document does not fit the declared schema. `path` names the
/// offending field, e.g. `config[0].if.conditions[1].med.match`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("unsupported field '{path}'")]
    UnsupportedField { path: String },

    #[error("'{path}' must be {expected}, found {found}")]
    InvalidType { path: String, expected: &'static str, found: String },

    #[error("'{path}' must be one of {}, found '{value}'", choices.join(", "))]
    InvalidChoice { path: String, value: String, choices: &'static [&'static str] },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn branch_order_message() {
        let err = Error::BranchOrder { line: 4, text: "elseif med eq 1 then".into() };
        assert_eq!(err.to_string(), "line 4: 'elseif med eq 1 then' has no preceding 'if' in its scope");
    }

    #[test]
    fn invalid_choice_message() {
        let err = ValidationError::InvalidChoice {
            path: "config[0].if.conditions[0].med.combine_condition".into(),
            value: "xor".into(),
            choices: &["and", "or"],
        };
        assert_eq!(
            err.to_string(),
            "'config[0].if.conditions[0].med.combine_condition' must be one of and, or, found 'xor'"
        );
    }

    #[test]
    fn fetch_keeps_its_source() {
        let err = Error::Fetch { command: "show running-config".into(), source: "timed out".into() };
        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("timed out"));
    }

    #[test]
    fn validation_converts_with_question_mark() {
        fn check() -> Result<()> {
            Err(ValidationError::UnsupportedField { path: "config[0].bogus".into() })?;
            Ok(())
        }
        assert!(matches!(check(), Err(Error::Validation(ValidationError::UnsupportedField { .. }))));
    }
}
