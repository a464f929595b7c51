use jules_api::JulesApiError;
use thiserror::Error;

/// Failure of one user-triggered action.
#[derive(Debug, Error)]
pub enum ActionError {
    /// Blank input caught before anything was dispatched.
    #[error("{field} must not be empty")]
    EmptyInput { field: &'static str },
    #[error(transparent)]
    Api(#[from] JulesApiError),
}

impl ActionError {
    /// Text for the transient notice shown after a failed action.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::EmptyInput { .. } => self.to_string(),
            Self::Api(error) if error.is_request_failure() => {
                format!("Request failed: {}", error.user_message())
            }
            Self::Api(error) => error.user_message(),
        }
    }
}

pub(crate) fn require_text<'a>(
    value: &'a str,
    field: &'static str,
) -> Result<&'a str, ActionError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ActionError::EmptyInput { field });
    }
    Ok(trimmed)
}
