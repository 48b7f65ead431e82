//! Client-facing Errors
//!
//! Every variant renders as the message shown to the user; `Display` is
//! what ends up in the `error` slot of client and session state.

const REQUIRED_FIELDS: &str = "All fields are required.";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    #[error("No signed-in user.")]
    MissingIdentity,

    #[error("Failed to load products. Please try again.")]
    FetchFailed,

    #[error("{0}")]
    ValidationFailed(String),

    #[error("{}", create_failed_text(.message))]
    CreateFailed { message: Option<String> },

    #[error("Failed to delete the product from the server.")]
    DeleteFailed,

    #[error("Failed to log out")]
    LogoutFailed,

    #[error("Failed to log in")]
    LoginFailed,

    #[error("Failed to create an account")]
    SignupFailed,

    #[error("Passwords do not match")]
    PasswordMismatch,
}

impl ClientError {
    pub(crate) fn required_fields() -> Self {
        ClientError::ValidationFailed(REQUIRED_FIELDS.to_string())
    }
}

fn create_failed_text(message: &Option<String>) -> String {
    match message.as_deref().map(str::trim) {
        Some(message) if !message.is_empty() => format!("Failed to add product: {}", message),
        _ => "Failed to add product. Please try again.".to_string(),
    }
}
