/// Client-side precondition failures. No request is sent when one of these
/// is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("no service selected")]
    NoServiceSelected,

    #[error("invalid date")]
    InvalidDate,

    #[error("past date")]
    PastDate,

    #[error("invalid contact number")]
    InvalidContactNumber,

    #[error("no time slot selected")]
    NoTimeSlotSelected,

    #[error("time slot unavailable: {0}")]
    SlotUnavailable(String),

    #[error("passwords do not match")]
    PasswordMismatch,

    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("invalid field: {0}")]
    InvalidField(&'static str),

    #[error("step out of order")]
    OutOfOrder,
}

impl ValidationError {
    /// Sentence shown to the person filling in the form.
    pub fn user_message(&self) -> String {
        match self {
            ValidationError::NoServiceSelected => "Please select a service.".to_string(),
            ValidationError::InvalidDate => "Please choose a valid date.".to_string(),
            ValidationError::PastDate => {
                "You cannot book a service for a past date.".to_string()
            }
            ValidationError::InvalidContactNumber => {
                "Please enter a valid 10-digit contact number.".to_string()
            }
            ValidationError::NoTimeSlotSelected => "Please select a time slot.".to_string(),
            ValidationError::SlotUnavailable(time) => {
                format!("The {time} slot is no longer available. Please pick another time.")
            }
            ValidationError::PasswordMismatch => "Passwords do not match.".to_string(),
            ValidationError::MissingField(field) => format!("Please fill in the {field}."),
            ValidationError::InvalidField(field) => format!("Please enter a valid {field}."),
            ValidationError::OutOfOrder => "Please start again from the first step.".to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("authentication error: {0}")]
    Auth(String),

    #[error("backend error ({status}): {}", message.as_deref().unwrap_or("no message"))]
    Backend { status: u16, message: Option<String> },

    #[error("network error: {0}")]
    Network(String),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Network(err.to_string())
    }
}

impl ClientError {
    /// Displayable string for the initiating view. Backend messages are
    /// surfaced verbatim; everything else collapses to `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ClientError::Validation(e) => e.user_message(),
            ClientError::Backend {
                message: Some(message),
                ..
            } if !message.is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ClientError::Validation(_))
    }
}
