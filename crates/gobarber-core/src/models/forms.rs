//! Sign-in and sign-up payloads with their form validation rules.
//!
//! Validation collects every failing field rather than stopping at the first,
//! so a form can flag all of its inputs at once.

use std::fmt;

use serde::Serialize;

/// Minimum password length accepted at sign-up.
const MIN_PASSWORD_LEN: usize = 6;

/// A single failed form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// All validation failures for one form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    fn push(&mut self, field: &'static str, message: &'static str) {
        self.errors.push(FieldError { field, message });
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// First message recorded for a field, if any
    pub fn get(&self, field: &str) -> Option<&'static str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Loose structural email check: one `@`, a non-empty local part, and a
/// dotted domain with no empty labels.
fn is_valid_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || value.chars().any(char::is_whitespace) {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|l| !l.is_empty())
}

/// Sign-in credentials. The backend expects them as `email`/`password`.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    #[serde(rename = "email")]
    pub identifier: String,
    #[serde(rename = "password")]
    pub secret: String,
}

impl Credentials {
    pub fn new(identifier: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            secret: secret.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let email = self.identifier.trim();
        if email.is_empty() {
            errors.push("email", "Email is required");
        } else if !is_valid_email(email) {
            errors.push("email", "Enter a valid email address");
        }
        if self.secret.is_empty() {
            errors.push("password", "Password is required");
        }
        errors.into_result()
    }
}

/// Sign-up form payload, posted to `/users`.
#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl NewUser {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        if self.name.trim().is_empty() {
            errors.push("name", "Name is required");
        }
        let email = self.email.trim();
        if email.is_empty() {
            errors.push("email", "Email is required");
        } else if !is_valid_email(email) {
            errors.push("email", "Enter a valid email address");
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.push("password", "Password must be at least 6 characters");
        }
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_check() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("first.last@mail.example.org"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("@b.com"));
        assert!(!is_valid_email("a@@b.com"));
        assert!(!is_valid_email("a@b..com"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email("plain"));
    }

    #[test]
    fn test_credentials_serialize_as_email_password() {
        let creds = Credentials::new("a@b.com", "123456");
        let json = serde_json::to_value(&creds).unwrap();
        assert_eq!(json["email"], "a@b.com");
        assert_eq!(json["password"], "123456");
    }

    #[test]
    fn test_credentials_validation() {
        assert!(Credentials::new("a@b.com", "123456").validate().is_ok());

        let errors = Credentials::new("", "").validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("email"), Some("Email is required"));
        assert_eq!(errors.get("password"), Some("Password is required"));

        let errors = Credentials::new("not-an-email", "x").validate().unwrap_err();
        assert_eq!(errors.get("email"), Some("Enter a valid email address"));
        assert!(errors.get("password").is_none());
    }

    #[test]
    fn test_new_user_collects_all_errors() {
        let form = NewUser {
            name: "  ".to_string(),
            email: "bad".to_string(),
            password: "12345".to_string(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.get("name").is_some());
        assert!(errors.get("email").is_some());
        assert_eq!(
            errors.get("password"),
            Some("Password must be at least 6 characters")
        );
        assert!(errors.to_string().contains("name: Name is required"));
    }

    #[test]
    fn test_new_user_valid() {
        let form = NewUser {
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            password: "123456".to_string(),
        };
        assert!(form.validate().is_ok());
    }
}
