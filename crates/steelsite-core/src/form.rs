#![forbid(unsafe_code)]

//! Contact form validation.
//!
//! Field values are read fresh from the DOM on every submit attempt and
//! never cached. Validation runs in two stages: required-field presence,
//! then a permissive email shape check. The message shown to the visitor is
//! chosen from the document's `lang` attribute at submit time.
//!
//! No network request happens here; a passing form is acknowledged as if
//! delivery succeeded.

use std::sync::LazyLock;

use regex::Regex;

use crate::locale::Locale;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid literal")
});

/// Raw values of the contact form controls.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    /// Optional.
    pub phone: String,
    pub date: String,
    pub location: String,
    pub message: String,
}

impl ContactForm {
    /// Element ids of the required controls.
    pub const REQUIRED_IDS: [&'static str; 5] = ["name", "email", "date", "location", "message"];

    /// Required fields as `(id, value)` pairs.
    #[must_use]
    pub fn required(&self) -> [(&'static str, &str); 5] {
        [
            ("name", self.name.as_str()),
            ("email", self.email.as_str()),
            ("date", self.date.as_str()),
            ("location", self.location.as_str()),
            ("message", self.message.as_str()),
        ]
    }

    /// Ids of required fields that are empty.
    #[must_use]
    pub fn missing(&self) -> Vec<&'static str> {
        self.required()
            .into_iter()
            .filter(|(_, value)| value.is_empty())
            .map(|(id, _)| id)
            .collect()
    }
}

/// Why a submission was blocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormError {
    MissingFields,
    InvalidEmail,
}

/// Result of validating one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormOutcome {
    Rejected(FormError),
    Accepted,
}

impl FormOutcome {
    /// Visitor-facing message in `locale`.
    #[must_use]
    pub const fn message(self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Self::Rejected(FormError::MissingFields), Locale::German) => {
                "Bitte fülle alle Pflichtfelder aus."
            }
            (Self::Rejected(FormError::MissingFields), Locale::English) => {
                "Please fill in all required fields."
            }
            (Self::Rejected(FormError::InvalidEmail), Locale::German) => {
                "Bitte gib eine gültige E-Mail-Adresse ein."
            }
            (Self::Rejected(FormError::InvalidEmail), Locale::English) => {
                "Please enter a valid email address."
            }
            (Self::Accepted, Locale::German) => {
                "Vielen Dank für deine Anfrage! Wir melden uns in Kürze bei dir."
            }
            (Self::Accepted, Locale::English) => {
                "Thank you for your inquiry! We will get back to you soon."
            }
        }
    }

    /// Class list for the status region.
    #[must_use]
    pub const fn status_class(self) -> &'static str {
        match self {
            Self::Rejected(_) => "form-status error",
            Self::Accepted => "form-status success",
        }
    }

    #[must_use]
    pub const fn is_accepted(self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// Whether `email` has the `local@domain.tld` shape.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Validate one submission.
#[must_use]
pub fn validate(form: &ContactForm) -> FormOutcome {
    let missing = form.missing();
    if !missing.is_empty() {
        tracing::debug!(?missing, "contact form incomplete");
        return FormOutcome::Rejected(FormError::MissingFields);
    }
    if !is_valid_email(&form.email) {
        tracing::debug!("contact form email rejected");
        return FormOutcome::Rejected(FormError::InvalidEmail);
    }
    FormOutcome::Accepted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> ContactForm {
        ContactForm {
            name: "A".into(),
            email: "a@b.com".into(),
            phone: String::new(),
            date: "2026-06-20".into(),
            location: "Essen".into(),
            message: "Hi".into(),
        }
    }

    #[test]
    fn complete_form_is_accepted_without_phone() {
        assert_eq!(validate(&filled()), FormOutcome::Accepted);
    }

    #[test]
    fn any_empty_required_field_blocks() {
        for id in ContactForm::REQUIRED_IDS {
            let mut form = filled();
            match id {
                "name" => form.name.clear(),
                "email" => form.email.clear(),
                "date" => form.date.clear(),
                "location" => form.location.clear(),
                _ => form.message.clear(),
            }
            assert_eq!(form.missing(), vec![id]);
            assert_eq!(
                validate(&form),
                FormOutcome::Rejected(FormError::MissingFields)
            );
        }
    }

    #[test]
    fn missing_fields_checked_before_email() {
        let mut form = filled();
        form.email = "nope".into();
        form.message.clear();
        assert_eq!(
            validate(&form),
            FormOutcome::Rejected(FormError::MissingFields)
        );
    }

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("first.last@sub.example.de"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.de"));
        assert!(!is_valid_email("a@@b.de"));
        assert!(!is_valid_email("@b.de"));
    }

    #[test]
    fn messages_follow_locale() {
        let invalid = FormOutcome::Rejected(FormError::InvalidEmail);
        assert_eq!(invalid.message(Locale::German), "Bitte gib eine gültige E-Mail-Adresse ein.");
        assert_eq!(invalid.message(Locale::English), "Please enter a valid email address.");
        assert_eq!(invalid.status_class(), "form-status error");
        assert_eq!(FormOutcome::Accepted.status_class(), "form-status success");
    }
}
