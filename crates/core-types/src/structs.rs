use serde::{Deserialize, Serialize};

use crate::enums::PropertyStatus;
use crate::error::CoreError;

/// A property listing as stored and as served to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub id: i64,
    pub title: String,
    pub address: String,
    pub status: PropertyStatus,
}

/// Validated input for creating or replacing a property.
///
/// Construction is the only way to obtain a draft, so the storage layer
/// never sees an empty title or address, or a status outside the known
/// set. Invalid field values are rejected here, before any connection is
/// acquired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDraft {
    title: String,
    address: String,
    status: PropertyStatus,
}

impl PropertyDraft {
    /// Validates raw field values into a draft. The status arrives as
    /// text so that every invalid value takes this path and produces the
    /// same error shape.
    pub fn new(
        title: impl Into<String>,
        address: impl Into<String>,
        status: &str,
    ) -> Result<Self, CoreError> {
        let title = title.into();
        if title.is_empty() {
            return Err(CoreError::EmptyField("title"));
        }

        let address = address.into();
        if address.is_empty() {
            return Err(CoreError::EmptyField("address"));
        }

        let status = status.parse::<PropertyStatus>()?;

        Ok(Self {
            title,
            address,
            status,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn status(&self) -> PropertyStatus {
        self.status
    }
}

/// Checks that a client-supplied id is in the valid range. Ids are
/// assigned by the storage layer starting at 1, so zero and negative
/// values can never name an existing row.
pub fn validate_id(id: i64) -> Result<i64, CoreError> {
    if id < 1 {
        return Err(CoreError::InvalidId(id));
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_accepts_valid_fields() {
        let draft = PropertyDraft::new("Loft", "12 Canal St", "active").unwrap();
        assert_eq!(draft.title(), "Loft");
        assert_eq!(draft.address(), "12 Canal St");
        assert_eq!(draft.status(), PropertyStatus::Active);
    }

    #[test]
    fn draft_rejects_empty_title() {
        let err = PropertyDraft::new("", "12 Canal St", "active").unwrap_err();
        assert_eq!(err, CoreError::EmptyField("title"));
    }

    #[test]
    fn draft_rejects_empty_address() {
        let err = PropertyDraft::new("Loft", "", "inactive").unwrap_err();
        assert_eq!(err, CoreError::EmptyField("address"));
    }

    #[test]
    fn draft_rejects_unknown_status() {
        let err = PropertyDraft::new("Loft", "12 Canal St", "sold").unwrap_err();
        assert_eq!(err, CoreError::InvalidStatus("sold".to_string()));
    }

    #[test]
    fn id_must_be_positive() {
        assert_eq!(validate_id(1).unwrap(), 1);
        assert_eq!(validate_id(42).unwrap(), 42);
        assert!(validate_id(0).is_err());
        assert!(validate_id(-7).is_err());
    }

    #[test]
    fn property_serializes_with_lowercase_status() {
        let property = Property {
            id: 3,
            title: "Loft".to_string(),
            address: "12 Canal St".to_string(),
            status: PropertyStatus::Inactive,
        };
        let value = serde_json::to_value(&property).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": 3,
                "title": "Loft",
                "address": "12 Canal St",
                "status": "inactive"
            })
        );
    }
}
