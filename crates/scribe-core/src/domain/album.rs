use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Album entity - a catalog item with no owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
    pub id: i64,
    pub title: String,
    pub artist: String,
    pub price: f64,
}

/// Album fields as submitted on create and update.
#[derive(Debug, Clone, PartialEq)]
pub struct AlbumDraft {
    pub title: String,
    pub artist: String,
    pub price: f64,
}

impl AlbumDraft {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.title.trim().is_empty() || self.artist.trim().is_empty() {
            return Err(DomainError::Validation(
                "title and artist are required".to_string(),
            ));
        }
        if !self.price.is_finite() || self.price <= 0.0 {
            return Err(DomainError::Validation(
                "price must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_price() {
        let mut draft = AlbumDraft {
            title: "Blue Train".to_string(),
            artist: "John Coltrane".to_string(),
            price: 56.99,
        };
        assert!(draft.validate().is_ok());

        draft.price = 0.0;
        assert!(draft.validate().is_err());

        draft.price = f64::NAN;
        assert!(draft.validate().is_err());
    }
}
