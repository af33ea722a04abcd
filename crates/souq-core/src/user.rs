//! User profile models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The authenticated user's profile as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Server-assigned identifier.
    pub id: String,
    /// Account email address.
    pub email: String,
    /// Public display name, if set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Free-form bio, if set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// Seller location, if set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Whether the account's email address has been verified.
    #[serde(default)]
    pub verified: bool,
    /// Account creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Partial profile update; unset fields are left unchanged server-side.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    /// New display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// New bio.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// New location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl ProfileUpdate {
    /// Returns true if no field is set.
    pub fn is_empty(&self) -> bool {
        self.display_name.is_none() && self.bio.is_none() && self.location.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_camel_case_payload() {
        let user: UserProfile = serde_json::from_str(
            r#"{
                "id": "u_193",
                "email": "seller@example.com",
                "displayName": "The Rug Stall",
                "verified": true,
                "createdAt": "2024-11-02T09:15:00Z"
            }"#,
        )
        .unwrap();

        assert_eq!(user.id, "u_193");
        assert_eq!(user.display_name.as_deref(), Some("The Rug Stall"));
        assert!(user.verified);
        assert!(user.bio.is_none());
    }

    #[test]
    fn update_serializes_only_set_fields() {
        let update = ProfileUpdate {
            bio: Some("Handwoven rugs since 2019".to_string()),
            ..Default::default()
        };

        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json.as_object().unwrap().len(), 1);
        assert_eq!(json["bio"], "Handwoven rugs since 2019");
    }

    #[test]
    fn empty_update_detected() {
        assert!(ProfileUpdate::default().is_empty());
        assert!(
            !ProfileUpdate {
                location: Some("Fes".to_string()),
                ..Default::default()
            }
            .is_empty()
        );
    }
}
