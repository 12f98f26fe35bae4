pub mod http;

#[cfg(test)]
pub(crate) mod mock;

use async_trait::async_trait;

use crate::errors::ClientError;
use crate::models::{AuthResponse, Booking, BookingStatus, MessageResponse, NewBooking, NewService, Service, User};

/// Every backend endpoint the client consumes. Authenticated calls take the
/// credential explicitly; the implementation sends it as `x-auth-token`.
#[async_trait]
pub trait BackendApi: Send + Sync {
    // ── Catalog and bookings ──

    async fn list_services(&self) -> Result<Vec<Service>, ClientError>;

    /// Times already taken for `service_id` on `date` (`YYYY-MM-DD`).
    async fn booked_times(&self, service_id: &str, date: &str) -> Result<Vec<String>, ClientError>;

    async fn create_booking(
        &self,
        token: Option<&str>,
        booking: &NewBooking,
    ) -> Result<MessageResponse, ClientError>;

    async fn my_bookings(&self, token: &str) -> Result<Vec<Booking>, ClientError>;

    // ── Admin ──

    async fn admin_bookings(&self, token: &str) -> Result<Vec<Booking>, ClientError>;

    async fn admin_services(&self, token: &str) -> Result<Vec<Service>, ClientError>;

    async fn add_service(&self, token: &str, service: &NewService) -> Result<MessageResponse, ClientError>;

    async fn delete_service(&self, token: &str, service_id: &str) -> Result<MessageResponse, ClientError>;

    async fn update_booking_status(
        &self,
        token: &str,
        booking_id: &str,
        status: BookingStatus,
    ) -> Result<MessageResponse, ClientError>;

    async fn delete_booking(&self, token: &str, booking_id: &str) -> Result<MessageResponse, ClientError>;

    // ── Identity ──

    async fn signup(&self, name: &str, email: &str, password: &str) -> Result<MessageResponse, ClientError>;

    async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ClientError>;

    async fn admin_pass_login(&self, password: &str) -> Result<AuthResponse, ClientError>;

    async fn verify_otp(&self, email: &str, otp: &str) -> Result<MessageResponse, ClientError>;

    async fn send_reset_otp(&self, email: &str) -> Result<MessageResponse, ClientError>;

    async fn verify_reset_otp(&self, email: &str, otp: &str) -> Result<MessageResponse, ClientError>;

    async fn update_password(&self, email: &str, password: &str) -> Result<MessageResponse, ClientError>;

    async fn reset_password(&self, reset_token: &str, password: &str) -> Result<MessageResponse, ClientError>;

    /// Resolve a stored credential. Rejection surfaces as [`ClientError::Auth`].
    async fn me(&self, token: &str) -> Result<User, ClientError>;
}
