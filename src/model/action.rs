use serde::{Deserialize, Serialize};
use std::fmt;

/// A filing/delivery decision produced by running a script.
///
/// Actions are only collected during execution; applying them is the job of an
/// [`ActionDispatcher`](crate::dispatch::ActionDispatcher).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Action {
    Keep,
    Discard,
    FileInto { destination: String },
    Redirect { address: String },
    Reject { message: String },
}

impl Action {
    pub fn is_reject(&self) -> bool {
        matches!(self, Self::Reject { .. })
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keep => f.write_str("keep;"),
            Self::Discard => f.write_str("discard;"),
            Self::FileInto { destination } => write!(f, "fileinto \"{}\";", escape(destination)),
            Self::Redirect { address } => write!(f, "redirect \"{}\";", escape(address)),
            Self::Reject { message } => write!(f, "reject \"{}\";", escape(message)),
        }
    }
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_in_sieve_syntax() {
        let action = Action::FileInto {
            destination: "INBOX/\"Quoted\"".to_string(),
        };
        assert_eq!(action.to_string(), r#"fileinto "INBOX/\"Quoted\"";"#);
        assert_eq!(Action::Keep.to_string(), "keep;");
    }

    #[test]
    fn test_json_shape() {
        let action = Action::Redirect {
            address: "boss@example.com".to_string(),
        };
        let json = serde_json::to_string(&action).unwrap();
        assert_eq!(json, r#"{"action":"redirect","address":"boss@example.com"}"#);

        let json = serde_json::to_string(&Action::FileInto {
            destination: "Junk".to_string(),
        })
        .unwrap();
        assert_eq!(json, r#"{"action":"fileinto","destination":"Junk"}"#);
    }
}
