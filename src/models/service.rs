use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Service {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    /// Minutes.
    pub duration: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewService {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub duration: u32,
}

impl NewService {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("service name"));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(ValidationError::InvalidField("price"));
        }
        if self.duration == 0 {
            return Err(ValidationError::InvalidField("duration"));
        }
        Ok(())
    }
}
