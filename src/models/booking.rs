use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "serviceId", default)]
    pub service: Option<ServiceRef>,
    #[serde(rename = "customerName", default)]
    pub customer_name: Option<String>,
    #[serde(rename = "contactNumber", default)]
    pub contact_number: String,
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub status: BookingStatus,
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl Booking {
    /// Calendar day of the booking. The backend may send a bare
    /// `YYYY-MM-DD` or a full ISO timestamp.
    pub fn date_naive(&self) -> Option<NaiveDate> {
        let day = self.date.get(..10)?;
        NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
    }

    pub fn service_name(&self) -> &str {
        self.service
            .as_ref()
            .and_then(ServiceRef::name)
            .unwrap_or("N/A")
    }
}

/// `serviceId` on a booking is either a bare id or the populated service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ServiceRef {
    Id(String),
    Populated {
        #[serde(rename = "_id", default)]
        id: String,
        #[serde(default)]
        name: Option<String>,
    },
}

impl ServiceRef {
    pub fn id(&self) -> &str {
        match self {
            ServiceRef::Id(id) => id,
            ServiceRef::Populated { id, .. } => id,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            ServiceRef::Id(_) => None,
            ServiceRef::Populated { name, .. } => name.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum BookingStatus {
    #[default]
    Pending,
    Assigned,
    Completed,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 3] = [
        BookingStatus::Pending,
        BookingStatus::Assigned,
        BookingStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "Pending",
            BookingStatus::Assigned => "Assigned",
            BookingStatus::Completed => "Completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Some(BookingStatus::Pending),
            "assigned" => Some(BookingStatus::Assigned),
            "completed" => Some(BookingStatus::Completed),
            _ => None,
        }
    }
}

/// Body of `POST /bookings`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    pub name: String,
    pub date: String,
    pub time: String,
    pub address: String,
    pub contact_number: String,
    pub service_id: String,
}

/// Editable booking fields, kept as entered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingForm {
    pub name: String,
    pub date: String,
    pub time: String,
    pub address: String,
    pub contact_number: String,
}

impl BookingForm {
    pub fn is_empty(&self) -> bool {
        *self == BookingForm::default()
    }

    pub fn clear(&mut self) {
        *self = BookingForm::default();
    }
}
