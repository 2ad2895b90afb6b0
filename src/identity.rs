use std::fmt;

use serde::{Deserialize, Serialize};

use crate::forms::FormError;

/// Locally chosen user id, `<first>_<last>` in lowercase. There is no server
/// side account behind it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    pub fn from_name(first: &str, last: &str) -> Result<Self, FormError> {
        let first = first.trim().to_lowercase();
        let last = last.trim().to_lowercase();
        if first.is_empty() || last.is_empty() {
            return Err(FormError::MissingName);
        }
        Ok(Self(format!("{first}_{last}")))
    }

    /// Rehydrates a previously persisted id.
    pub fn from_stored(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_owned()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn display_name(&self) -> String {
        self.0
            .split('_')
            .map(capitalize)
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn initials(&self) -> String {
        self.0
            .split('_')
            .filter_map(|part| part.chars().next())
            .flat_map(char::to_uppercase)
            .collect()
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn capitalize(part: &str) -> String {
    let mut chars = part.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Author line for a comment.
pub fn author_label(user_id: Option<&str>) -> String {
    match user_id.map(str::trim).filter(|id| !id.is_empty()) {
        Some(id) => id.replacen('_', " ", 1),
        None => "Anonymous".to_owned(),
    }
}
