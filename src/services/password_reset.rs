use std::sync::Arc;

use crate::errors::{ClientError, ValidationError};
use crate::models::{Notice, PasswordResetStep};
use crate::services::api::BackendApi;

pub const SEND_CODE_FAILED_MESSAGE: &str = "Failed to send OTP.";
pub const VERIFY_CODE_FAILED_MESSAGE: &str = "OTP verification failed.";
pub const UPDATE_PASSWORD_FAILED_MESSAGE: &str = "Failed to update password.";

/// Forgot-password: e-mail, then code, then new password.
pub struct PasswordResetFlow {
    api: Arc<dyn BackendApi>,
    step: PasswordResetStep,
    notice: Option<Notice>,
}

impl PasswordResetFlow {
    pub fn new(api: Arc<dyn BackendApi>) -> Self {
        Self {
            api,
            step: PasswordResetStep::default(),
            notice: None,
        }
    }

    pub fn step(&self) -> &PasswordResetStep {
        &self.step
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn restart(&mut self) {
        self.step = self.step.clone().restart();
        self.notice = None;
    }

    fn record(&mut self, result: Result<String, ClientError>, fallback: &str) -> Result<String, ClientError> {
        self.notice = Some(match &result {
            Ok(text) => Notice::Success(text.clone()),
            Err(e) => Notice::Error(e.user_message(fallback)),
        });
        result
    }

    pub async fn send_code(&mut self, email: &str) -> Result<String, ClientError> {
        let result = self.try_send_code(email).await;
        self.record(result, SEND_CODE_FAILED_MESSAGE)
    }

    async fn try_send_code(&mut self, email: &str) -> Result<String, ClientError> {
        if self.step != PasswordResetStep::AwaitingEmail {
            return Err(ValidationError::OutOfOrder.into());
        }
        let email = email.trim();
        if email.is_empty() {
            return Err(ValidationError::MissingField("email").into());
        }

        let resp = self.api.send_reset_otp(email).await?;
        self.step = self.step.clone().code_sent(email.to_string())?;
        tracing::info!(email, "password reset code sent");
        Ok(resp.text_or("A reset code has been sent to your email."))
    }

    pub async fn verify_code(&mut self, otp: &str) -> Result<String, ClientError> {
        let result = self.try_verify_code(otp).await;
        self.record(result, VERIFY_CODE_FAILED_MESSAGE)
    }

    async fn try_verify_code(&mut self, otp: &str) -> Result<String, ClientError> {
        let email = match &self.step {
            PasswordResetStep::AwaitingOtp { email } => email.clone(),
            _ => return Err(ValidationError::OutOfOrder.into()),
        };
        let otp = otp.trim();
        if otp.is_empty() {
            return Err(ValidationError::MissingField("verification code").into());
        }

        let resp = self.api.verify_reset_otp(&email, otp).await?;
        self.step = self.step.clone().code_verified()?;
        Ok(resp.text_or("Code verified. Choose a new password."))
    }

    pub async fn set_password(&mut self, password: &str, confirm: &str) -> Result<String, ClientError> {
        let result = self.try_set_password(password, confirm).await;
        self.record(result, UPDATE_PASSWORD_FAILED_MESSAGE)
    }

    async fn try_set_password(&mut self, password: &str, confirm: &str) -> Result<String, ClientError> {
        let email = match &self.step {
            PasswordResetStep::AwaitingNewPassword { email } => email.clone(),
            _ => return Err(ValidationError::OutOfOrder.into()),
        };
        if password.is_empty() {
            return Err(ValidationError::MissingField("password").into());
        }
        if password != confirm {
            return Err(ValidationError::PasswordMismatch.into());
        }

        let resp = self.api.update_password(&email, password).await?;
        self.step = self.step.clone().password_updated()?;
        tracing::info!(email = %email, "password updated");
        Ok(resp.text_or("Password updated. You can now log in."))
    }
}
