#![forbid(unsafe_code)]

//! `mailto:` URI construction.

use crate::form::FormSnapshot;

/// Percent-encode with the `encodeURIComponent` unreserved set.
#[must_use]
pub fn encode_uri_component(value: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    let mut out = String::with_capacity(value.len());
    for &byte in value.as_bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(byte as char),
            _ => {
                out.push('%');
                out.push(HEX[(byte >> 4) as usize] as char);
                out.push(HEX[(byte & 0x0f) as usize] as char);
            }
        }
    }
    out
}

/// Plain-text body handed to the mail client.
#[must_use]
pub fn message_body(form: &FormSnapshot) -> String {
    format!(
        "Name: {}\nEmail: {}\n\nMessage:\n{}",
        form.name, form.email, form.message
    )
}

/// A composed `mailto:` link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailtoLink {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

impl MailtoLink {
    /// Compose the contact message for `recipient`.
    pub fn compose(recipient: impl Into<String>, form: &FormSnapshot) -> Self {
        Self {
            recipient: recipient.into(),
            subject: form.subject.clone(),
            body: message_body(form),
        }
    }

    /// Render as `mailto:{recipient}?subject=..&body=..`.
    #[must_use]
    pub fn to_uri(&self) -> String {
        format!(
            "mailto:{}?subject={}&body={}",
            self.recipient,
            encode_uri_component(&self.subject),
            encode_uri_component(&self.body)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreserved_passes_through() {
        assert_eq!(
            encode_uri_component("AZaz09-_.!~*'()"),
            "AZaz09-_.!~*'()"
        );
    }

    #[test]
    fn reserved_and_space_are_escaped() {
        assert_eq!(encode_uri_component("a b&c=d"), "a%20b%26c%3Dd");
        assert_eq!(encode_uri_component("50%"), "50%25");
        assert_eq!(encode_uri_component("x@y/z?#"), "x%40y%2Fz%3F%23");
        assert_eq!(encode_uri_component("\n"), "%0A");
    }

    #[test]
    fn multibyte_is_utf8_escaped() {
        assert_eq!(encode_uri_component("é"), "%C3%A9");
        assert_eq!(encode_uri_component("🚀"), "%F0%9F%9A%80");
    }

    #[test]
    fn jane_uri() {
        let form = FormSnapshot::new("Jane Doe", "jane@example.com", "Hi", "Hello there");
        let link = MailtoLink::compose("aesam9997@gmail.com", &form);
        assert_eq!(
            link.to_uri(),
            "mailto:aesam9997@gmail.com?subject=Hi&body=Name%3A%20Jane%20Doe%0AEmail%3A%20jane%40example.com%0A%0AMessage%3A%0AHello%20there"
        );
    }

    #[test]
    fn body_keeps_raw_values() {
        let form = FormSnapshot::new(" Ann ", "a@b.c", "s", "line1\nline2");
        assert_eq!(
            message_body(&form),
            "Name:  Ann \nEmail: a@b.c\n\nMessage:\nline1\nline2"
        );
    }
}
