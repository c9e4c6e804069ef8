use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Chat models a client may ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ChatModel {
    #[serde(rename = "gpt-4o")]
    Gpt4o,
    #[serde(rename = "gpt-4o-mini")]
    Gpt4oMini,
    #[default]
    #[serde(rename = "gpt-3.5-turbo")]
    Gpt35Turbo,
}

impl ChatModel {
    pub const ALL: [ChatModel; 3] = [ChatModel::Gpt4o, ChatModel::Gpt4oMini, ChatModel::Gpt35Turbo];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChatModel::Gpt4o => "gpt-4o",
            ChatModel::Gpt4oMini => "gpt-4o-mini",
            ChatModel::Gpt35Turbo => "gpt-3.5-turbo",
        }
    }
}

impl std::fmt::Display for ChatModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChatModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChatModel::ALL
            .into_iter()
            .find(|model| model.as_str() == s)
            .ok_or_else(|| format!("Unknown chat model: {}", s))
    }
}
