/// Applying the final action list.
use tracing::info;

use crate::mail::{MailAdapter, MailError};
use crate::model::action::Action;

/// Carries out actions. Called once per action, in list order.
pub trait ActionDispatcher {
    fn dispatch(&mut self, action: &Action, mail: &dyn MailAdapter) -> Result<(), MailError>;
}

/// Apply every action. An empty list is an implicit keep (RFC 3028 §2.10.2).
pub fn apply_all(
    dispatcher: &mut dyn ActionDispatcher,
    actions: &[Action],
    mail: &dyn MailAdapter,
) -> Result<(), MailError> {
    if actions.is_empty() {
        return dispatcher.dispatch(&Action::Keep, mail);
    }
    for action in actions {
        dispatcher.dispatch(action, mail)?;
    }
    Ok(())
}

/// Records each action through `tracing` and remembers it.
#[derive(Debug, Default)]
pub struct LoggingDispatcher {
    applied: Vec<Action>,
}

impl LoggingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn applied(&self) -> &[Action] {
        &self.applied
    }
}

impl ActionDispatcher for LoggingDispatcher {
    fn dispatch(&mut self, action: &Action, mail: &dyn MailAdapter) -> Result<(), MailError> {
        let message_id = mail.header("Message-ID")?.into_iter().next().unwrap_or_default();
        info!(%action, %message_id, "apply");
        self.applied.push(action.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mail::MessageMail;

    fn mail() -> MessageMail {
        MessageMail::parse(b"Message-ID: <1@example.com>\r\nSubject: hi\r\n\r\nbody\r\n").unwrap()
    }

    #[test]
    fn test_empty_list_is_implicit_keep() {
        let mut dispatcher = LoggingDispatcher::new();
        apply_all(&mut dispatcher, &[], &mail()).unwrap();
        assert_eq!(dispatcher.applied(), &[Action::Keep]);
    }

    #[test]
    fn test_actions_applied_in_order() {
        let actions = vec![
            Action::FileInto {
                destination: "A".into(),
            },
            Action::Redirect {
                address: "b@example.com".into(),
            },
        ];
        let mut dispatcher = LoggingDispatcher::new();
        apply_all(&mut dispatcher, &actions, &mail()).unwrap();
        assert_eq!(dispatcher.applied(), actions.as_slice());
    }
}
