//! Client types: whoever commissions a letter.

use serde::{Deserialize, Serialize};

use crate::error::{Result, require_non_empty};

/// Unique identifier for a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct ClientId(pub i64);

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ClientId {
    fn from(id: i64) -> Self {
        ClientId(id)
    }
}

impl std::ops::Deref for ClientId {
    type Target = i64;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub city: String,
    /// Why the client wants a letter written
    pub reason: String,
    pub contact: String,
}

/// Fields accepted when creating or editing a client. All are required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientInput {
    pub name: String,
    pub city: String,
    pub reason: String,
    pub contact: String,
}

impl ClientInput {
    pub fn validate(&self) -> Result<()> {
        require_non_empty("name", &self.name)?;
        require_non_empty("city", &self.city)?;
        require_non_empty("reason", &self.reason)?;
        require_non_empty("contact", &self.contact)
    }
}

/// Listing filter for clients.
///
/// Both fields are case-insensitive substring matches; `None` or an empty
/// string disables the filter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientFilter {
    pub name: Option<String>,
    pub city: Option<String>,
}

impl ClientFilter {
    /// Lowercased name needle, if the filter is set.
    pub fn name_needle(&self) -> Option<String> {
        needle(&self.name)
    }

    pub fn city_needle(&self) -> Option<String> {
        needle(&self.city)
    }

    /// In-memory equivalent of the SQL `LOWER(col) LIKE '%needle%'` filter.
    pub fn matches(&self, client: &Client) -> bool {
        let name_ok = self
            .name_needle()
            .is_none_or(|n| client.name.to_lowercase().contains(&n));
        let city_ok = self
            .city_needle()
            .is_none_or(|c| client.city.to_lowercase().contains(&c));
        name_ok && city_ok
    }
}

fn needle(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(str::to_lowercase)
}
