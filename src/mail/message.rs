/// A [`MailAdapter`] over a raw RFC 5322 message.
use mail_parser::MessageParser;
use std::collections::HashMap;
use std::path::Path;

use crate::mail::{MailAdapter, MailError};

#[derive(Debug, Clone, Default)]
pub struct MessageMail {
    /// (name, unfolded value) in message order
    headers: Vec<(String, String)>,
    bodies: Vec<String>,
    size: u64,
    /// Lowercased envelope part → values
    envelope: HashMap<String, Vec<String>>,
}

impl MessageMail {
    pub fn parse(raw: &[u8]) -> Result<Self, MailError> {
        let message = MessageParser::default()
            .parse(raw)
            .ok_or_else(|| MailError::Malformed("no message headers found".to_string()))?;
        let source = message.raw_message();

        let headers = message
            .headers()
            .iter()
            .map(|h| {
                let value = source
                    .get(h.offset_start as usize..h.offset_end as usize)
                    .map(String::from_utf8_lossy)
                    .unwrap_or_default();
                (h.name().to_string(), unfold(&value))
            })
            .collect();

        let mut bodies = Vec::new();
        while let Some(text) = message.body_text(bodies.len()) {
            bodies.push(text.into_owned());
        }

        Ok(Self {
            headers,
            bodies,
            size: raw.len() as u64,
            envelope: HashMap::new(),
        })
    }

    pub fn from_path(path: &Path) -> Result<Self, MailError> {
        let raw = std::fs::read(path)?;
        Self::parse(&raw)
    }

    pub fn with_envelope_from(self, from: impl Into<String>) -> Self {
        self.with_envelope("from", from)
    }

    pub fn with_envelope_to(self, to: impl Into<String>) -> Self {
        self.with_envelope("to", to)
    }

    fn with_envelope(mut self, part: &str, value: impl Into<String>) -> Self {
        self.envelope
            .entry(part.to_string())
            .or_default()
            .push(value.into());
        self
    }
}

impl MailAdapter for MessageMail {
    fn header(&self, name: &str) -> Result<Vec<String>, MailError> {
        Ok(self
            .headers
            .iter()
            .filter(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.clone())
            .collect())
    }

    fn header_names(&self) -> Result<Vec<String>, MailError> {
        let mut names: Vec<String> = Vec::new();
        for (name, _) in &self.headers {
            if !names.iter().any(|n| n.eq_ignore_ascii_case(name)) {
                names.push(name.clone());
            }
        }
        Ok(names)
    }

    fn size(&self) -> Result<u64, MailError> {
        Ok(self.size)
    }

    fn envelope(&self, name: &str) -> Result<Vec<String>, MailError> {
        Ok(self
            .envelope
            .get(&name.to_ascii_lowercase())
            .cloned()
            .unwrap_or_default())
    }

    /// Case-insensitive (ASCII) substring search over every text part.
    fn is_in_body_text(&self, phrase: &str) -> Result<bool, MailError> {
        let phrase = phrase.to_ascii_lowercase();
        Ok(self
            .bodies
            .iter()
            .any(|body| body.to_ascii_lowercase().contains(&phrase)))
    }
}

/// Undo header folding (RFC 5322 §2.2.3) and trim surrounding whitespace.
fn unfold(value: &str) -> String {
    value
        .replace("\r\n", "\n")
        .split('\n')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const MESSAGE: &str = "From: Joe Bloggs <joe@example.com>\r\n\
To: ann@example.org\r\n\
Subject: Quarterly\r\n report\r\n\
X-Tag: one\r\n\
x-tag: two\r\n\
\r\n\
Please find the REPORT attached.\r\n";

    #[test]
    fn test_headers_are_unfolded_and_case_insensitive() {
        let mail = MessageMail::parse(MESSAGE.as_bytes()).unwrap();
        assert_eq!(mail.header("subject").unwrap(), vec!["Quarterly report"]);
        assert_eq!(mail.header("X-TAG").unwrap(), vec!["one", "two"]);
        assert!(mail.header("Cc").unwrap().is_empty());
    }

    #[test]
    fn test_header_names_are_distinct() {
        let mail = MessageMail::parse(MESSAGE.as_bytes()).unwrap();
        let names = mail.header_names().unwrap();
        assert_eq!(names.len(), 4);
    }

    #[test]
    fn test_size_and_body() {
        let mail = MessageMail::parse(MESSAGE.as_bytes()).unwrap();
        assert_eq!(mail.size().unwrap(), MESSAGE.len() as u64);
        assert!(mail.is_in_body_text("the report").unwrap());
        assert!(!mail.is_in_body_text("invoice").unwrap());
    }

    #[test]
    fn test_envelope() {
        let mail = MessageMail::parse(MESSAGE.as_bytes())
            .unwrap()
            .with_envelope_from("bounce@example.com")
            .with_envelope_to("ann@example.org");
        assert_eq!(mail.envelope("From").unwrap(), vec!["bounce@example.com"]);
        assert_eq!(mail.envelope("to").unwrap(), vec!["ann@example.org"]);
        assert!(mail.envelope("auth").unwrap().is_empty());
    }
}
