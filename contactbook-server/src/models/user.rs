//! Account request shapes

use serde::Deserialize;

use super::validation::check_length;
use super::{Email, ValidationError};

const MAX_USER_EMAIL_LEN: usize = 150;

/// Body of `POST /auth/signup`
#[derive(Debug, Clone, Deserialize)]
pub struct UserSignup {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl UserSignup {
    /// Validate and return the parsed email.
    pub fn validate(&self) -> Result<Email, ValidationError> {
        check_length("username", &self.username, 3, 50)?;
        let email = Email::new(&self.email, MAX_USER_EMAIL_LEN)?;
        check_length("password", &self.password, 6, 128)?;
        Ok(email)
    }
}

/// OAuth2-style password form of `POST /auth/login`; `username` carries the email
#[derive(Debug, Clone, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Body of `POST /auth/request_email`
#[derive(Debug, Clone, Deserialize)]
pub struct RequestEmail {
    pub email: String,
}

impl RequestEmail {
    pub fn validate(&self) -> Result<Email, ValidationError> {
        Email::new(&self.email, MAX_USER_EMAIL_LEN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signup_rules() {
        let mut body = UserSignup {
            username: "alice".into(),
            email: "alice@example.com".into(),
            password: "secret1".into(),
        };
        assert_eq!(body.validate().unwrap().as_str(), "alice@example.com");

        body.password = "123".into();
        assert_eq!(
            body.validate(),
            Err(ValidationError::TooShort {
                field: "password",
                min: 6
            })
        );

        body.password = "secret1".into();
        body.username = "al".into();
        assert!(matches!(
            body.validate(),
            Err(ValidationError::TooShort {
                field: "username",
                ..
            })
        ));
    }
}
