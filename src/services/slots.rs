use std::sync::Arc;

use chrono::NaiveDate;

use crate::errors::{ClientError, ValidationError};
use crate::models::{canonical_time, WorkingHours};
use crate::services::api::BackendApi;

pub const NO_SLOTS_MESSAGE: &str = "No slots available for this date. Please choose another date.";
pub const SLOTS_FAILED_MESSAGE: &str = "Failed to fetch available slots.";

/// Bookable times for one (service, date) pair, in working-hours order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailableSlots {
    pub service_id: String,
    pub date: String,
    pub slots: Vec<String>,
}

impl AvailableSlots {
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn contains(&self, time: &str) -> bool {
        canonical_time(time)
            .map(|t| self.slots.contains(&t))
            .unwrap_or(false)
    }

    pub fn matches(&self, service_id: &str, date: &str) -> bool {
        self.service_id == service_id && self.date == date
    }

    /// "No slots" is an outcome, not an error; callers show this instead.
    pub fn notice(&self) -> Option<&'static str> {
        self.is_empty().then_some(NO_SLOTS_MESSAGE)
    }
}

pub struct SlotResolver {
    api: Arc<dyn BackendApi>,
    hours: WorkingHours,
}

impl SlotResolver {
    pub fn new(api: Arc<dyn BackendApi>, hours: WorkingHours) -> Self {
        Self { api, hours }
    }

    /// Working hours minus what the backend reports as booked. One read,
    /// no retry; safe to call again whenever the service or date changes.
    pub async fn resolve(&self, service_id: &str, date: &str) -> Result<AvailableSlots, ClientError> {
        if service_id.is_empty() {
            return Err(ValidationError::NoServiceSelected.into());
        }
        let day = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
            .map_err(|_| ValidationError::InvalidDate)?;
        let date = day.format("%Y-%m-%d").to_string();

        let booked = self.api.booked_times(service_id, &date).await?;
        let slots = self.hours.available(&booked);

        tracing::debug!(
            service_id,
            date = %date,
            booked = booked.len(),
            available = slots.len(),
            "resolved slots"
        );

        Ok(AvailableSlots {
            service_id: service_id.to_string(),
            date,
            slots,
        })
    }
}
