use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::users::repo::{Role, User};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Request body for admin user creation. Enum-valued fields arrive as
/// strings so that bad values surface as per-field validation errors
/// rather than a body-level deserialization failure.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

/// A CreateUserRequest that passed field validation.
#[derive(Debug)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl CreateUserRequest {
    pub fn validate(self) -> Result<NewUser, ApiError> {
        let mut errors = BTreeMap::new();

        let name = self.name.trim().to_string();
        if name.is_empty() {
            errors.insert("name".to_string(), "must not be empty".to_string());
        }

        let email = self.email.trim().to_lowercase();
        if !is_valid_email(&email) {
            errors.insert("email".to_string(), "must be a valid email address".to_string());
        }

        if self.password.is_empty() {
            errors.insert("password".to_string(), "must not be empty".to_string());
        }

        let role = Role::parse(&self.role);
        if role.is_none() {
            errors.insert(
                "role".to_string(),
                "must be one of ADMIN, FINANCE_MANAGER, VIEWER".to_string(),
            );
        }

        if !errors.is_empty() {
            return Err(ApiError::Validation(errors));
        }
        Ok(NewUser {
            name,
            email,
            password: self.password,
            role: role.unwrap(),
        })
    }
}

/// Public part of a user returned to clients. Excludes password material.
#[derive(Debug, Serialize)]
pub struct UserView {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> CreateUserRequest {
        CreateUserRequest {
            name: "Alice".into(),
            email: "a@x.com".into(),
            password: "p1".into(),
            role: "FINANCE_MANAGER".into(),
        }
    }

    #[test]
    fn valid_request_passes() {
        let new = valid_request().validate().expect("should validate");
        assert_eq!(new.name, "Alice");
        assert_eq!(new.email, "a@x.com");
        assert_eq!(new.role, Role::FinanceManager);
    }

    #[test]
    fn email_is_trimmed_and_lowercased() {
        let mut req = valid_request();
        req.email = "  Alice@X.COM ".into();
        let new = req.validate().expect("should validate");
        assert_eq!(new.email, "alice@x.com");
    }

    #[test]
    fn invalid_fields_are_reported_per_field() {
        let req = CreateUserRequest {
            name: "  ".into(),
            email: "not-an-email".into(),
            password: "".into(),
            role: "SUPERUSER".into(),
        };
        let err = req.validate().unwrap_err();
        match err {
            ApiError::Validation(fields) => {
                assert_eq!(fields.len(), 4);
                assert!(fields.contains_key("name"));
                assert!(fields.contains_key("email"));
                assert!(fields.contains_key("password"));
                assert_eq!(
                    fields["role"],
                    "must be one of ADMIN, FINANCE_MANAGER, VIEWER"
                );
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn email_regex_accepts_and_rejects() {
        assert!(is_valid_email("a@x.com"));
        assert!(is_valid_email("first.last@sub.example.org"));
        assert!(!is_valid_email("a@x"));
        assert!(!is_valid_email("@x.com"));
        assert!(!is_valid_email("a b@x.com"));
    }
}
