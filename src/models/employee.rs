//! Employee DTOs.

use serde::{Deserialize, Serialize};

/// Employee as listed by `GET /employees`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
}

impl Employee {
    /// Label for pickers: "CODE - Name" when a code exists.
    pub fn display_name(&self) -> String {
        match &self.code {
            Some(code) if !code.is_empty() => format!("{code} - {}", self.name),
            _ => self.name.clone(),
        }
    }
}
