use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$")
        .expect("email pattern is a valid regex")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid email address: {0}")]
    InvalidEmail(String),
}

/// Accepts `local@domain.tld` addresses and hands the input back untouched.
pub fn validate_email(email: &str) -> Result<&str, ValidationError> {
    if EMAIL_RE.is_match(email) {
        Ok(email)
    } else {
        Err(ValidationError::InvalidEmail(email.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_addresses_unchanged() {
        for email in [
            "a@b.com",
            "first.last@example.org",
            "user_name+tag%x-y@sub.domain-name.co",
            "UPPER@EXAMPLE.COM",
            "x@y.Io",
        ] {
            assert_eq!(validate_email(email), Ok(email));
        }
    }

    #[test]
    fn rejects_malformed_addresses() {
        for email in [
            "bad-email",
            "a@b",
            "",
            "@example.com",
            "user@.c",
            "user@example.c",
            "user@example.c0m",
            "us er@example.com",
            "user@exa mple.com",
            "user@example.com ",
            "user@@example.com",
        ] {
            assert_eq!(
                validate_email(email),
                Err(ValidationError::InvalidEmail(email.to_string())),
                "{email:?} should be rejected"
            );
        }
    }
}
