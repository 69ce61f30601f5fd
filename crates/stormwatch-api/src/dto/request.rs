//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use stormwatch_core::types::Coordinates;

/// `POST /api/register`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Phone number is required"))]
    pub phone: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    /// Browser geolocation, reverse-geocoded to a place name.
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
}

/// `POST /api/resend-otp`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResendOtpRequest {
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
}

/// `POST /api/verify`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[serde(alias = "emailCode")]
    #[validate(length(min = 1, message = "Verification code is required"))]
    pub code: String,
}

/// `POST /api/login`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Email or phone number.
    #[validate(length(min = 1, message = "Email or phone is required"))]
    pub identifier: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
}

/// `POST /api/add_task`
///
/// Missing fields deserialize as empty and are rejected by the service, so
/// the client sees a 400 with a domain message rather than a parse error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct AddTaskRequest {
    pub task: String,
    /// `HH:MM`.
    pub time: String,
    pub user_email: Option<String>,
}

/// `POST /api/notifications`
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateNotificationRequest {
    pub user_email: String,
    /// Alert category: weather, flood, earthquake, cyclone or other.
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub description: String,
    pub severity: Option<String>,
    pub location: Option<String>,
    pub source: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_rules() {
        let mut req = RegisterRequest {
            name: "Asha".into(),
            email: "asha@example.com".into(),
            phone: "9000000001".into(),
            password: "secret1".into(),
            coordinates: None,
        };
        assert!(req.validate().is_ok());

        req.password = "short".into();
        assert!(req.validate().is_err());

        req.password = "secret1".into();
        req.email = "not-an-email".into();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_verify_accepts_email_code_alias() {
        let req: VerifyRequest =
            serde_json::from_str(r#"{"email":"a@example.com","emailCode":"123456"}"#).unwrap();
        assert_eq!(req.code, "123456");
    }

    #[test]
    fn test_notification_type_field() {
        let req: CreateNotificationRequest = serde_json::from_str(
            r#"{"userEmail":"a@example.com","type":"flood","title":"t","description":"d"}"#,
        )
        .unwrap();
        assert_eq!(req.kind, "flood");
        assert_eq!(req.user_email, "a@example.com");
        assert!(req.severity.is_none());
    }
}
