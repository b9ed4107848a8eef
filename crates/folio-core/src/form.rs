#![forbid(unsafe_code)]

//! Contact form validation.
//!
//! Validation is a pure function of the four field values read at submit
//! time. An invalid form is a normal outcome, not an error: callers get a
//! [`ValidationResult`] describing each field.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

/// `local@domain.tld`, no whitespace or `@` inside any part.
pub const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern compiles"))
}

/// Whether `value` looks like an email address.
#[must_use]
pub fn is_email(value: &str) -> bool {
    email_regex().is_match(value)
}

/// The four required contact fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldId {
    Name,
    Email,
    Subject,
    Message,
}

impl FieldId {
    /// All fields in form order.
    pub const ALL: [FieldId; 4] = [
        FieldId::Name,
        FieldId::Email,
        FieldId::Subject,
        FieldId::Message,
    ];

    /// The `id` attribute of the input element.
    #[must_use]
    pub const fn dom_id(self) -> &'static str {
        match self {
            FieldId::Name => "name",
            FieldId::Email => "email",
            FieldId::Subject => "subject",
            FieldId::Message => "message",
        }
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Field values captured when the user submits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormSnapshot {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    /// Current submit button label, restored after a send.
    pub submit_label: String,
}

impl FormSnapshot {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            subject: subject.into(),
            message: message.into(),
            submit_label: String::new(),
        }
    }

    #[must_use]
    pub fn with_submit_label(mut self, label: impl Into<String>) -> Self {
        self.submit_label = label.into();
        self
    }

    #[must_use]
    pub fn value(&self, field: FieldId) -> &str {
        match field {
            FieldId::Name => &self.name,
            FieldId::Email => &self.email,
            FieldId::Subject => &self.subject,
            FieldId::Message => &self.message,
        }
    }
}

/// Per-field verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldOutcome {
    Valid,
    /// Blank after trimming.
    Empty,
    /// Non-empty email that fails [`EMAIL_PATTERN`].
    Malformed,
}

impl FieldOutcome {
    #[must_use]
    pub const fn is_valid(self) -> bool {
        matches!(self, FieldOutcome::Valid)
    }
}

/// Outcome of one submit attempt. Never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationResult {
    outcomes: [FieldOutcome; 4],
}

impl ValidationResult {
    #[must_use]
    pub fn outcome(&self, field: FieldId) -> FieldOutcome {
        self.outcomes[field.index()]
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.outcomes.iter().all(|o| o.is_valid())
    }

    /// Failing fields in form order.
    pub fn failed_fields(&self) -> impl Iterator<Item = FieldId> + '_ {
        FieldId::ALL
            .into_iter()
            .filter(|f| !self.outcome(*f).is_valid())
    }
}

/// Validate a submission.
///
/// A whitespace-only email is blank after trimming but still non-empty, so
/// it ends up [`FieldOutcome::Malformed`].
#[must_use]
pub fn validate(form: &FormSnapshot) -> ValidationResult {
    let mut outcomes = [FieldOutcome::Valid; 4];
    for field in FieldId::ALL {
        if form.value(field).trim().is_empty() {
            outcomes[field.index()] = FieldOutcome::Empty;
        }
    }
    if !form.email.is_empty() && !is_email(&form.email) {
        outcomes[FieldId::Email.index()] = FieldOutcome::Malformed;
    }
    ValidationResult { outcomes }
}
