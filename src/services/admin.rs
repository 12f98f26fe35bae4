use std::sync::Arc;

use crate::errors::ClientError;
use crate::models::{Access, Booking, BookingStatus, NewService, Service};
use crate::services::api::BackendApi;
use crate::services::session::SessionProvider;

pub const BOOKINGS_FAILED_MESSAGE: &str = "Failed to fetch bookings.";
pub const ADMIN_SERVICES_FAILED_MESSAGE: &str = "Failed to fetch services.";
pub const ADD_SERVICE_FAILED_MESSAGE: &str = "Failed to add service.";
pub const DELETE_SERVICE_FAILED_MESSAGE: &str = "Failed to delete service.";
pub const UPDATE_STATUS_FAILED_MESSAGE: &str = "Failed to update booking status.";
pub const DELETE_BOOKING_FAILED_MESSAGE: &str = "Failed to delete booking.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(BookingStatus),
}

impl StatusFilter {
    pub fn parse(s: &str) -> Option<Self> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Some(StatusFilter::All);
        }
        BookingStatus::parse(s).map(StatusFilter::Only)
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusFilter::All => "All",
            StatusFilter::Only(status) => status.as_str(),
        }
    }

    pub fn matches(&self, booking: &Booking) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(status) => booking.status == *status,
        }
    }

    pub fn apply<'a>(&self, bookings: &'a [Booking]) -> Vec<&'a Booking> {
        bookings.iter().filter(|b| self.matches(b)).collect()
    }
}

/// Catalog and booking lifecycle management. Every call needs an admin
/// session; the token is read from the session at call time.
pub struct AdminConsole {
    api: Arc<dyn BackendApi>,
    session: Arc<SessionProvider>,
}

impl AdminConsole {
    pub fn new(api: Arc<dyn BackendApi>, session: Arc<SessionProvider>) -> Self {
        Self { api, session }
    }

    fn token(&self) -> Result<String, ClientError> {
        self.session.authorize(Access::Admin)?;
        self.session
            .token()
            .ok_or_else(|| ClientError::Auth("not logged in".to_string()))
    }

    pub async fn bookings(&self, filter: StatusFilter) -> Result<Vec<Booking>, ClientError> {
        let token = self.token()?;
        let all = self.api.admin_bookings(&token).await?;
        Ok(all.into_iter().filter(|b| filter.matches(b)).collect())
    }

    pub async fn services(&self) -> Result<Vec<Service>, ClientError> {
        let token = self.token()?;
        self.api.admin_services(&token).await
    }

    pub async fn add_service(&self, service: &NewService) -> Result<String, ClientError> {
        let token = self.token()?;
        service.validate()?;
        let resp = self.api.add_service(&token, service).await?;
        tracing::info!(name = %service.name, "service added");
        Ok(resp.text_or("Service added successfully!"))
    }

    pub async fn delete_service(&self, service_id: &str) -> Result<String, ClientError> {
        let token = self.token()?;
        let resp = self.api.delete_service(&token, service_id).await?;
        tracing::info!(service_id, "service deleted");
        Ok(resp.text_or("Service deleted successfully!"))
    }

    pub async fn update_status(&self, booking_id: &str, status: BookingStatus) -> Result<String, ClientError> {
        let token = self.token()?;
        let resp = self
            .api
            .update_booking_status(&token, booking_id, status)
            .await?;
        tracing::info!(booking_id, status = status.as_str(), "booking status updated");
        Ok(resp.text_or("Booking status updated successfully!"))
    }

    pub async fn delete_booking(&self, booking_id: &str) -> Result<String, ClientError> {
        let token = self.token()?;
        let resp = self.api.delete_booking(&token, booking_id).await?;
        tracing::info!(booking_id, "booking deleted");
        Ok(resp.text_or("Booking deleted successfully!"))
    }
}
