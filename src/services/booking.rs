use std::sync::Arc;

use chrono::{Local, NaiveDate};

use crate::errors::{ClientError, ValidationError};
use crate::models::{canonical_time, BookingForm, NewBooking, Notice, Service, WorkingHours};
use crate::services::api::BackendApi;
use crate::services::slots::{AvailableSlots, SlotResolver, SLOTS_FAILED_MESSAGE};

pub const BOOKING_CONFIRMED_MESSAGE: &str =
    "Booking confirmed! You will get a call from our technician soon to confirm service details.";
pub const BOOKING_FAILED_MESSAGE: &str = "Failed to book service. Please try again.";
pub const SERVICES_FAILED_MESSAGE: &str = "Failed to fetch services.";

/// Exactly ten ASCII digits: no separators, no country code.
pub fn is_valid_contact_number(s: &str) -> bool {
    s.len() == 10 && s.bytes().all(|b| b.is_ascii_digit())
}

/// Client-side pre-checks, in order: service, date, contact number, time.
/// `slots` is the latest resolver output; when it belongs to the same
/// (service, date) the chosen time must be one of its entries.
pub fn validate_submission(
    service: Option<&Service>,
    form: &BookingForm,
    slots: Option<&AvailableSlots>,
    today: NaiveDate,
) -> Result<NewBooking, ValidationError> {
    let service = service.ok_or(ValidationError::NoServiceSelected)?;

    let date = NaiveDate::parse_from_str(form.date.trim(), "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate)?;
    if date < today {
        return Err(ValidationError::PastDate);
    }
    let date = date.format("%Y-%m-%d").to_string();

    if !is_valid_contact_number(&form.contact_number) {
        return Err(ValidationError::InvalidContactNumber);
    }

    if form.time.trim().is_empty() {
        return Err(ValidationError::NoTimeSlotSelected);
    }
    let time = canonical_time(&form.time)
        .ok_or_else(|| ValidationError::SlotUnavailable(form.time.clone()))?;
    if let Some(slots) = slots.filter(|s| s.matches(&service.id, &date)) {
        if !slots.contains(&time) {
            return Err(ValidationError::SlotUnavailable(time));
        }
    }

    Ok(NewBooking {
        name: form.name.clone(),
        date,
        time,
        address: form.address.clone(),
        contact_number: form.contact_number.clone(),
        service_id: service.id.clone(),
    })
}

/// State behind the "book a service" screen: catalog, selection, form,
/// current slots and the last outcome banner.
pub struct BookingWorkflow {
    api: Arc<dyn BackendApi>,
    resolver: SlotResolver,
    services: Vec<Service>,
    selected: Option<Service>,
    form: BookingForm,
    slots: Option<AvailableSlots>,
    notice: Option<Notice>,
}

impl BookingWorkflow {
    pub fn new(api: Arc<dyn BackendApi>, hours: WorkingHours) -> Self {
        Self {
            resolver: SlotResolver::new(api.clone(), hours),
            api,
            services: Vec::new(),
            selected: None,
            form: BookingForm::default(),
            slots: None,
            notice: None,
        }
    }

    pub fn services(&self) -> &[Service] {
        &self.services
    }

    pub fn selected(&self) -> Option<&Service> {
        self.selected.as_ref()
    }

    pub fn form(&self) -> &BookingForm {
        &self.form
    }

    pub fn available_slots(&self) -> &[String] {
        self.slots.as_ref().map(|s| s.slots.as_slice()).unwrap_or(&[])
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub async fn load_services(&mut self) -> Result<&[Service], ClientError> {
        match self.api.list_services().await {
            Ok(services) => {
                tracing::debug!(count = services.len(), "loaded services");
                self.services = services;
                Ok(&self.services)
            }
            Err(e) => {
                self.notice = Some(Notice::Error(e.user_message(SERVICES_FAILED_MESSAGE)));
                Err(e)
            }
        }
    }

    /// Choose a service from the loaded catalog. Slots are refreshed when a
    /// date is already filled in.
    pub async fn select_service(&mut self, service_id: &str) -> Result<(), ClientError> {
        let service = self
            .services
            .iter()
            .find(|s| s.id == service_id)
            .cloned()
            .ok_or(ValidationError::NoServiceSelected)?;
        self.selected = Some(service);
        self.slots = None;

        if !self.form.date.is_empty() {
            self.refresh_slots().await?;
        }
        Ok(())
    }

    pub async fn set_date(&mut self, date: &str) -> Result<(), ClientError> {
        self.form.date = date.to_string();
        self.slots = None;

        if self.selected.is_some() {
            self.refresh_slots().await?;
        }
        Ok(())
    }

    pub fn set_name(&mut self, name: &str) {
        self.form.name = name.to_string();
    }

    pub fn set_time(&mut self, time: &str) {
        self.form.time = time.to_string();
    }

    pub fn set_address(&mut self, address: &str) {
        self.form.address = address.to_string();
    }

    pub fn set_contact_number(&mut self, contact_number: &str) {
        self.form.contact_number = contact_number.to_string();
    }

    /// Re-run the resolver for the current (service, date). On failure the
    /// slot list is left empty and an error banner is set.
    pub async fn refresh_slots(&mut self) -> Result<&AvailableSlots, ClientError> {
        let service_id = self
            .selected
            .as_ref()
            .map(|s| s.id.clone())
            .ok_or(ValidationError::NoServiceSelected)?;

        match self.resolver.resolve(&service_id, &self.form.date).await {
            Ok(slots) => {
                self.notice = slots.notice().map(|m| Notice::Error(m.to_string()));
                Ok(self.slots.insert(slots))
            }
            Err(e) => {
                self.slots = None;
                let text = match &e {
                    ClientError::Validation(v) => v.user_message(),
                    _ => SLOTS_FAILED_MESSAGE.to_string(),
                };
                self.notice = Some(Notice::Error(text));
                Err(e)
            }
        }
    }

    pub async fn submit(&mut self, token: Option<&str>) -> Result<String, ClientError> {
        self.submit_on(Local::now().date_naive(), token).await
    }

    /// Validate, re-check the slot, then hand the booking to the backend.
    /// Success clears the selection and form; failure keeps them for retry.
    pub async fn submit_on(&mut self, today: NaiveDate, token: Option<&str>) -> Result<String, ClientError> {
        self.notice = None;

        let payload = match validate_submission(
            self.selected.as_ref(),
            &self.form,
            self.slots.as_ref(),
            today,
        ) {
            Ok(p) => p,
            Err(e) => {
                tracing::debug!(reason = %e, "booking rejected locally");
                self.notice = Some(Notice::Error(e.user_message()));
                return Err(e.into());
            }
        };

        // The slot may have gone since it was offered.
        match self.resolver.resolve(&payload.service_id, &payload.date).await {
            Ok(fresh) => {
                let taken = !fresh.contains(&payload.time);
                self.slots = Some(fresh);
                if taken {
                    let e = ValidationError::SlotUnavailable(payload.time.clone());
                    self.notice = Some(Notice::Error(e.user_message()));
                    return Err(e.into());
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not re-check slot, submitting anyway");
            }
        }

        match self.api.create_booking(token, &payload).await {
            Ok(_) => {
                tracing::info!(
                    service_id = %payload.service_id,
                    date = %payload.date,
                    time = %payload.time,
                    "booking submitted"
                );
                self.selected = None;
                self.form.clear();
                self.slots = None;
                self.notice = Some(Notice::Success(BOOKING_CONFIRMED_MESSAGE.to_string()));
                Ok(BOOKING_CONFIRMED_MESSAGE.to_string())
            }
            Err(e) => {
                self.notice = Some(Notice::Error(e.user_message(BOOKING_FAILED_MESSAGE)));
                Err(e)
            }
        }
    }
}
