use std::sync::Arc;

use crate::errors::{ClientError, ValidationError};
use crate::services::api::BackendApi;

pub const SIGNUP_FAILED_MESSAGE: &str = "Authentication failed.";
pub const OTP_FAILED_MESSAGE: &str = "An error occurred.";
pub const RESET_LINK_FAILED_MESSAGE: &str =
    "Failed to reset password. Token may be invalid or expired.";

/// Account creation and the e-mailed-link password reset. Neither touches
/// the session; signup is followed by OTP verification, then a login.
pub struct AuthFlows {
    api: Arc<dyn BackendApi>,
}

fn require(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(())
    }
}

impl AuthFlows {
    pub fn new(api: Arc<dyn BackendApi>) -> Self {
        Self { api }
    }

    pub async fn signup(&self, name: &str, email: &str, password: &str) -> Result<String, ClientError> {
        require(name, "name")?;
        require(email, "email")?;
        require(password, "password")?;

        let resp = self.api.signup(name, email, password).await?;
        tracing::info!(email, "signup submitted, awaiting OTP");
        Ok(resp.text_or("Signup successful. Check your email for the verification code."))
    }

    pub async fn verify_otp(&self, email: &str, otp: &str) -> Result<String, ClientError> {
        require(email, "email")?;
        require(otp, "verification code")?;

        let resp = self.api.verify_otp(email, otp.trim()).await?;
        tracing::info!(email, "email verified");
        Ok(resp.text_or("Email verified. You can now log in."))
    }

    /// Reset via the token embedded in an e-mailed link.
    pub async fn reset_password(
        &self,
        reset_token: &str,
        password: &str,
        confirm: &str,
    ) -> Result<String, ClientError> {
        require(reset_token, "reset token")?;
        require(password, "password")?;
        if password != confirm {
            return Err(ValidationError::PasswordMismatch.into());
        }

        let resp = self.api.reset_password(reset_token, password).await?;
        Ok(resp.text_or("Password reset successful."))
    }
}
