use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A message submitted through the contact form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl NewContactMessage {
    pub fn validate(&self) -> Result<(), DomainError> {
        let required = [&self.name, &self.email, &self.subject, &self.message];
        if required.iter().any(|field| field.trim().is_empty()) {
            return Err(DomainError::Validation(
                "name, email, subject and message are required".to_string(),
            ));
        }
        Ok(())
    }
}
