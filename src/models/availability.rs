use std::collections::HashSet;

use chrono::NaiveTime;

use crate::errors::ClientError;

const DEFAULT_SLOTS: [&str; 10] = [
    "10:00", "11:00", "12:00", "13:00", "14:00", "15:00", "16:00", "17:00", "18:00", "19:00",
];

/// Ordered list of bookable times of day, each in canonical `HH:MM` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingHours {
    slots: Vec<String>,
}

impl Default for WorkingHours {
    fn default() -> Self {
        Self {
            slots: DEFAULT_SLOTS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl WorkingHours {
    pub fn new<I, S>(slots: I) -> Result<Self, ClientError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut canonical = Vec::new();
        for slot in slots {
            let raw = slot.as_ref();
            let time = canonical_time(raw)
                .ok_or_else(|| ClientError::Config(format!("invalid working hour: {raw}")))?;
            if seen.insert(time.clone()) {
                canonical.push(time);
            }
        }
        if canonical.is_empty() {
            return Err(ClientError::Config("working hours must not be empty".to_string()));
        }
        Ok(Self { slots: canonical })
    }

    /// Comma-separated list, e.g. `09:00,10:00,11:00`.
    pub fn parse_list(s: &str) -> Result<Self, ClientError> {
        Self::new(s.split(',').map(str::trim).filter(|s| !s.is_empty()))
    }

    pub fn slots(&self) -> &[String] {
        &self.slots
    }

    pub fn contains(&self, time: &str) -> bool {
        canonical_time(time)
            .map(|t| self.slots.contains(&t))
            .unwrap_or(false)
    }

    /// The template minus `booked`, in template order. Booked values are
    /// compared after canonicalisation so `9:00` and `09:00:00` both
    /// remove `09:00`.
    pub fn available<S: AsRef<str>>(&self, booked: &[S]) -> Vec<String> {
        let booked: HashSet<String> = booked
            .iter()
            .filter_map(|b| {
                let raw = b.as_ref();
                let time = canonical_time(raw);
                if time.is_none() {
                    tracing::warn!(value = raw, "ignoring unparsable booked time");
                }
                time
            })
            .collect();

        self.slots
            .iter()
            .filter(|slot| !booked.contains(*slot))
            .cloned()
            .collect()
    }
}

/// Normalise a time of day to zero-padded 24-hour `HH:MM`.
pub fn canonical_time(s: &str) -> Option<String> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .ok()
        .map(|t| t.format("%H:%M").to_string())
}
