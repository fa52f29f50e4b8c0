use serde::{Deserialize, Serialize};

/// The parts of a Telegram user the poll publisher needs.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChatMember {
    pub first_name: String,
    #[serde(default)]
    pub is_bot: bool,
}

impl ChatMember {
    pub fn human(first_name: &str) -> Self {
        ChatMember {
            first_name: first_name.to_string(),
            is_bot: false,
        }
    }

    pub fn bot(first_name: &str) -> Self {
        ChatMember {
            first_name: first_name.to_string(),
            is_bot: true,
        }
    }
}
