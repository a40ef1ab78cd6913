use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9\s+()-]+$").expect("valid phone regex"));
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Payload posted to the form webhook.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactField {
    Name,
    Phone,
    Email,
    Message,
}

impl ContactField {
    pub const ALL: [ContactField; 4] = [
        ContactField::Name,
        ContactField::Phone,
        ContactField::Email,
        ContactField::Message,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContactField::Name => "name",
            ContactField::Phone => "phone",
            ContactField::Email => "email",
            ContactField::Message => "message",
        }
    }
}

impl ContactForm {
    pub fn get(&self, field: ContactField) -> &str {
        match field {
            ContactField::Name => &self.name,
            ContactField::Phone => &self.phone,
            ContactField::Email => &self.email,
            ContactField::Message => &self.message,
        }
    }

    pub fn set(&mut self, field: ContactField, value: String) {
        match field {
            ContactField::Name => self.name = value,
            ContactField::Phone => self.phone = value,
            ContactField::Email => self.email = value,
            ContactField::Message => self.message = value,
        }
    }

    pub fn all_filled(&self) -> bool {
        ContactField::ALL.iter().all(|f| !self.get(*f).trim().is_empty())
    }
}

/// Checks one field; `None` means valid.
pub fn validate_field(field: ContactField, value: &str) -> Option<&'static str> {
    let trimmed = value.trim();
    match field {
        ContactField::Name => {
            if trimmed.is_empty() {
                return Some("Full name is required");
            }
            if trimmed.chars().count() < 2 {
                return Some("Name must be at least 2 characters");
            }
        }
        ContactField::Phone => {
            if trimmed.is_empty() {
                return Some("Phone number is required");
            }
            if !PHONE_RE.is_match(value) {
                return Some("Please enter a valid phone number");
            }
            if value.chars().filter(|c| c.is_ascii_digit()).count() < 10 {
                return Some("Phone number must be at least 10 digits");
            }
        }
        ContactField::Email => {
            if trimmed.is_empty() {
                return Some("Email address is required");
            }
            if !EMAIL_RE.is_match(value) {
                return Some("Please enter a valid email address");
            }
        }
        ContactField::Message => {
            if trimmed.is_empty() {
                return Some("Message is required");
            }
            if trimmed.chars().count() < 10 {
                return Some("Message must be at least 10 characters");
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_rules() {
        assert_eq!(validate_field(ContactField::Name, "   "), Some("Full name is required"));
        assert_eq!(validate_field(ContactField::Name, " A "), Some("Name must be at least 2 characters"));
        assert_eq!(validate_field(ContactField::Name, "Ada"), None);
    }

    #[test]
    fn phone_rules() {
        assert_eq!(validate_field(ContactField::Phone, "12345"), Some("Phone number must be at least 10 digits"));
        assert_eq!(validate_field(ContactField::Phone, "555-CALL-NOW"), Some("Please enter a valid phone number"));
        assert_eq!(validate_field(ContactField::Phone, "+1 (555) 123-4567"), None);
    }

    #[test]
    fn email_rules() {
        assert_eq!(validate_field(ContactField::Email, "ada@"), Some("Please enter a valid email address"));
        assert_eq!(validate_field(ContactField::Email, "ada lovelace@example.com"), Some("Please enter a valid email address"));
        assert_eq!(validate_field(ContactField::Email, "ada@example.com"), None);
    }

    #[test]
    fn message_rules() {
        assert_eq!(validate_field(ContactField::Message, ""), Some("Message is required"));
        assert_eq!(validate_field(ContactField::Message, "  hi there  "), Some("Message must be at least 10 characters"));
        assert_eq!(validate_field(ContactField::Message, "Let's collaborate on a talk"), None);
    }
}
