// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Pin model for storage and API.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// A rated point of interest, stored in Firestore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Pin {
    /// Generated id (also used as document ID)
    pub id: String,
    /// Username of the creator
    pub username: String,
    pub title: String,
    pub desc: String,
    /// Star rating, 1 to 5
    pub rating: i32,
    pub lat: f64,
    pub long: f64,
    /// When the pin was created (RFC 3339)
    pub created_at: String,
    /// Last modification (RFC 3339)
    pub updated_at: String,
}

impl Pin {
    /// Build a new pin owned by `username` with a fresh id and timestamps.
    pub fn new(username: &str, new_pin: NewPin) -> Self {
        let now = crate::time_utils::now_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            username: username.to_string(),
            title: new_pin.title,
            desc: new_pin.desc,
            rating: new_pin.rating,
            lat: new_pin.lat,
            long: new_pin.long,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Apply a partial update, bumping `updated_at`.
    pub fn apply(&mut self, update: PinUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(desc) = update.desc {
            self.desc = desc;
        }
        if let Some(rating) = update.rating {
            self.rating = rating;
        }
        if let Some(lat) = update.lat {
            self.lat = lat;
        }
        if let Some(long) = update.long {
            self.long = long;
        }
        self.updated_at = crate::time_utils::now_rfc3339();
    }

    /// Pin location as a point (x = longitude, y = latitude).
    pub fn location(&self) -> geo::Point<f64> {
        geo::Point::new(self.long, self.lat)
    }
}

/// Request body for creating a pin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct NewPin {
    /// Must match the session user when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[validate(length(min = 3, max = 60))]
    pub title: String,
    #[validate(length(min = 3, max = 1000))]
    pub desc: String,
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub long: f64,
}

impl NewPin {
    /// Trim surrounding whitespace from the text fields.
    pub fn normalized(mut self) -> Self {
        self.title = self.title.trim().to_string();
        self.desc = self.desc.trim().to_string();
        self.username = self.username.map(|u| u.trim().to_string());
        self
    }
}

/// Request body for updating a pin. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PinUpdate {
    #[validate(length(min = 3, max = 60))]
    pub title: Option<String>,
    #[validate(length(min = 3, max = 1000))]
    pub desc: Option<String>,
    #[validate(range(min = 1, max = 5))]
    pub rating: Option<i32>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub long: Option<f64>,
}

impl PinUpdate {
    pub fn normalized(mut self) -> Self {
        self.title = self.title.map(|t| t.trim().to_string());
        self.desc = self.desc.map(|d| d.trim().to_string());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.desc.is_none()
            && self.rating.is_none()
            && self.lat.is_none()
            && self.long.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cafe() -> NewPin {
        NewPin {
            username: Some("alice".to_string()),
            title: "Cafe".to_string(),
            desc: "Great coffee".to_string(),
            rating: 4,
            lat: 47.5,
            long: 19.0,
        }
    }

    #[test]
    fn test_valid_pin_passes_validation() {
        assert!(cafe().validate().is_ok());
    }

    #[test]
    fn test_rating_outside_range_is_rejected() {
        for rating in [0, 6, -1] {
            let pin = NewPin { rating, ..cafe() };
            let errors = pin.validate().unwrap_err();
            assert!(errors.field_errors().contains_key("rating"), "rating {rating}");
        }
    }

    #[test]
    fn test_coordinates_outside_range_are_rejected() {
        let pin = NewPin {
            lat: 91.0,
            long: -181.0,
            ..cafe()
        };
        let errors = pin.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("lat"));
        assert!(fields.contains_key("long"));
    }

    #[test]
    fn test_whitespace_title_fails_after_normalizing() {
        let pin = NewPin {
            title: "   a  ".to_string(),
            ..cafe()
        }
        .normalized();
        assert_eq!(pin.title, "a");
        assert!(pin.validate().is_err());
    }

    #[test]
    fn test_new_pin_assigns_id_and_timestamps() {
        let pin = Pin::new("alice", cafe());
        assert!(!pin.id.is_empty());
        assert_eq!(pin.username, "alice");
        assert_eq!(pin.created_at, pin.updated_at);
        assert!(pin.created_at.ends_with('Z'));

        let other = Pin::new("alice", cafe());
        assert_ne!(pin.id, other.id);
    }

    #[test]
    fn test_apply_update_changes_only_given_fields() {
        let mut pin = Pin::new("alice", cafe());
        pin.apply(PinUpdate {
            rating: Some(5),
            ..Default::default()
        });
        assert_eq!(pin.rating, 5);
        assert_eq!(pin.title, "Cafe");
        assert_eq!(pin.lat, 47.5);
    }

    #[test]
    fn test_update_validation_skips_absent_fields() {
        assert!(PinUpdate::default().validate().is_ok());
        assert!(PinUpdate::default().is_empty());

        let bad = PinUpdate {
            rating: Some(9),
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_serialized_field_names() {
        let pin = Pin::new("alice", cafe());
        let json = serde_json::to_value(&pin).unwrap();
        assert_eq!(json["desc"], "Great coffee");
        assert_eq!(json["long"], 19.0);
        assert_eq!(json["rating"], 4);
    }
}
