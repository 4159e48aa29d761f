//! Convention-based contact-field extraction
//!
//! The site's forms are not uniform: some post `fullName`, some `name`,
//! some split `firstName`/`lastName`. The store indexes submissions by a
//! handful of convenience columns pulled out of `formData` with a fixed
//! precedence, and the dispatcher derives display and first names the same
//! way.

use serde_json::{Map, Value};

/// Contact fields lifted out of an opaque `formData` map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFields {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub source: Option<String>,
    pub partner: Option<String>,
    pub advisor: Option<String>,
}

impl ContactFields {
    /// Extract with fixed precedence:
    /// `fullName` ?? `name` ?? trimmed `firstName lastName`; the remaining
    /// fields are plain key reads.
    pub fn from_form_data(data: &Map<String, Value>) -> Self {
        let name = str_field(data, "fullName")
            .or_else(|| str_field(data, "name"))
            .or_else(|| {
                let first = str_field(data, "firstName").unwrap_or_default();
                let last = str_field(data, "lastName").unwrap_or_default();
                let joined = format!("{first} {last}").trim().to_string();
                if joined.is_empty() {
                    None
                } else {
                    Some(joined)
                }
            });

        Self {
            name,
            email: str_field(data, "email"),
            phone: str_field(data, "phone"),
            source: str_field(data, "source"),
            partner: str_field(data, "partner"),
            advisor: str_field(data, "advisor"),
        }
    }

    /// Name for subject lines; `"Unknown"` when no name fields were posted.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unknown")
    }
}

/// First name for the prospect confirmation greeting: `firstName` if posted,
/// else the first whitespace token of `fullName` / `contactName` / `name`.
pub fn first_name(data: &Map<String, Value>) -> Option<String> {
    if let Some(first) = str_field(data, "firstName") {
        return Some(first);
    }
    for key in ["fullName", "contactName", "name"] {
        if let Some(full) = str_field(data, key) {
            if let Some(token) = full.split_whitespace().next() {
                return Some(token.to_string());
            }
        }
    }
    None
}

fn str_field(data: &Map<String, Value>, key: &str) -> Option<String> {
    match data.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}
