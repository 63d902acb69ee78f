/// The mail capability a script runs against.
pub mod message;

pub use message::MessageMail;

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed message: {0}")]
    Malformed(String),
    #[error("{0} not supported by this mail adapter")]
    Unsupported(&'static str),
}

/// Read access to the message being filtered.
///
/// Implementations must be free of side effects: the interpreter may read the
/// same header any number of times. Header names are matched
/// case-insensitively (RFC 3028 §2.7.3).
pub trait MailAdapter {
    /// All values of the named header, in message order; empty when absent.
    fn header(&self, name: &str) -> Result<Vec<String>, MailError>;

    fn header_names(&self) -> Result<Vec<String>, MailError>;

    /// Message size in octets.
    fn size(&self) -> Result<u64, MailError>;

    /// Values of an envelope part (`from`, `to`); optional capability.
    fn envelope(&self, name: &str) -> Result<Vec<String>, MailError> {
        let _ = name;
        Err(MailError::Unsupported("envelope"))
    }

    /// Whether the phrase occurs in a text part of the body.
    fn is_in_body_text(&self, phrase: &str) -> Result<bool, MailError>;
}

/// Split an address-list header value into bare `local@domain` addresses.
///
/// Display names, comments and group syntax are dropped. Entries that hold no
/// address at all are skipped.
pub fn addresses(value: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut angle = 0usize;
    let mut comment = 0usize;
    let mut chars = value.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' if in_quotes || comment > 0 => {
                chars.next();
            }
            '"' if comment == 0 => in_quotes = !in_quotes,
            '(' if !in_quotes => comment += 1,
            ')' if !in_quotes && comment > 0 => comment -= 1,
            _ if in_quotes || comment > 0 => {}
            '<' => {
                angle += 1;
                current.clear();
            }
            '>' if angle > 0 => angle -= 1,
            // Group "name:" prefix
            ':' if angle == 0 => current.clear(),
            ',' | ';' if angle == 0 => push_address(&mut out, &mut current),
            _ => current.push(c),
        }
    }
    push_address(&mut out, &mut current);
    out
}

fn push_address(out: &mut Vec<String>, current: &mut String) {
    let address = current.trim();
    if !address.is_empty() {
        out.push(address.to_string());
    }
    current.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_and_angle_addresses() {
        assert_eq!(addresses("joe@example.com"), vec!["joe@example.com"]);
        assert_eq!(
            addresses("Joe Bloggs <joe@example.com>, ann@example.org"),
            vec!["joe@example.com", "ann@example.org"]
        );
    }

    #[test]
    fn test_quoted_display_name_with_comma() {
        assert_eq!(
            addresses(r#""Bloggs, Joe" <joe@example.com>"#),
            vec!["joe@example.com"]
        );
    }

    #[test]
    fn test_comments_and_groups() {
        assert_eq!(
            addresses("joe@example.com (Joe, at work)"),
            vec!["joe@example.com"]
        );
        assert_eq!(
            addresses("Team: a@example.com, b@example.com;"),
            vec!["a@example.com", "b@example.com"]
        );
        assert!(addresses("undisclosed-recipients:;").is_empty());
    }
}
