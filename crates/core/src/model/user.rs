use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum UserError {
    #[error("user email cannot be empty")]
    EmptyEmail,
}

/// The signed-in learner. Identity is the email address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    email: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    department: Option<String>,
}

impl User {
    /// # Errors
    ///
    /// Returns `UserError::EmptyEmail` if the email is blank.
    pub fn new(
        email: impl Into<String>,
        name: Option<String>,
        department: Option<String>,
    ) -> Result<Self, UserError> {
        let email = email.into().trim().to_owned();
        if email.is_empty() {
            return Err(UserError::EmptyEmail);
        }
        Ok(Self {
            email,
            name: normalize_optional(name),
            department: normalize_optional(department),
        })
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub fn department(&self) -> Option<&str> {
        self.department.as_deref()
    }

    /// Name when known, otherwise the email.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.email)
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_email() {
        assert_eq!(User::new("   ", None, None), Err(UserError::EmptyEmail));
    }

    #[test]
    fn display_name_falls_back_to_email() {
        let anon = User::new("ana@uni.edu", Some("  ".into()), None).unwrap();
        assert_eq!(anon.display_name(), "ana@uni.edu");
        assert_eq!(anon.name(), None);

        let named = User::new("ana@uni.edu", Some("Ana".into()), Some("CS".into())).unwrap();
        assert_eq!(named.display_name(), "Ana");
        assert_eq!(named.department(), Some("CS"));
    }
}
