use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub surname: String,
}

/// Full replace of the mutable fields; absent fields are stored as empty.
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub surname: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedUser {
    pub id: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_defaults_missing_names_to_empty() {
        let req: CreateUserRequest = serde_json::from_str(r#"{"email":"a@b.com"}"#).unwrap();
        assert_eq!(req.email, "a@b.com");
        assert_eq!(req.name, "");
        assert_eq!(req.surname, "");
    }

    #[test]
    fn missing_email_is_left_for_validation() {
        let req: UpdateUserRequest = serde_json::from_str(r#"{"name":"C"}"#).unwrap();
        assert!(req.email.is_empty());
        assert_eq!(req.name, "C");
    }

    #[test]
    fn wrong_field_types_are_rejected() {
        assert!(serde_json::from_str::<CreateUserRequest>(r#"{"email":42}"#).is_err());
    }
}
