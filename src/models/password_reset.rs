use crate::errors::ValidationError;

/// Where the forgot-password flow currently stands.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PasswordResetStep {
    #[default]
    AwaitingEmail,
    AwaitingOtp { email: String },
    AwaitingNewPassword { email: String },
}

impl PasswordResetStep {
    /// A reset code went out to `email`.
    pub fn code_sent(self, email: String) -> Result<Self, ValidationError> {
        match self {
            PasswordResetStep::AwaitingEmail => Ok(PasswordResetStep::AwaitingOtp { email }),
            _ => Err(ValidationError::OutOfOrder),
        }
    }

    /// The backend accepted the code.
    pub fn code_verified(self) -> Result<Self, ValidationError> {
        match self {
            PasswordResetStep::AwaitingOtp { email } => {
                Ok(PasswordResetStep::AwaitingNewPassword { email })
            }
            _ => Err(ValidationError::OutOfOrder),
        }
    }

    /// The new password is stored; the flow starts over.
    pub fn password_updated(self) -> Result<Self, ValidationError> {
        match self {
            PasswordResetStep::AwaitingNewPassword { .. } => Ok(PasswordResetStep::AwaitingEmail),
            _ => Err(ValidationError::OutOfOrder),
        }
    }

    /// "Resend code / change e-mail".
    pub fn restart(self) -> Self {
        PasswordResetStep::AwaitingEmail
    }

    pub fn email(&self) -> Option<&str> {
        match self {
            PasswordResetStep::AwaitingEmail => None,
            PasswordResetStep::AwaitingOtp { email }
            | PasswordResetStep::AwaitingNewPassword { email } => Some(email),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            PasswordResetStep::AwaitingEmail => "Forgot Password",
            PasswordResetStep::AwaitingOtp { .. } => "Verify Code",
            PasswordResetStep::AwaitingNewPassword { .. } => "Set New Password",
        }
    }
}
