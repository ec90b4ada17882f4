use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::entities::definition::ViewDefinition;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewId(pub i64);

impl From<i64> for ViewId {
    fn from(value: i64) -> Self {
        ViewId(value)
    }
}

impl From<ViewId> for i64 {
    fn from(value: ViewId) -> Self {
        value.0
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ViewId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(ViewId)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewVisibility {
    #[default]
    Private,
    Shared,
}

impl ViewVisibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewVisibility::Private => "private",
            ViewVisibility::Shared => "shared",
        }
    }

    /// Unknown stored values read back as private.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "shared" | "public" => ViewVisibility::Shared,
            _ => ViewVisibility::Private,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedView {
    pub id: ViewId,
    pub entity_name: String,
    pub name: String,
    pub visibility: ViewVisibility,
    pub definition: ViewDefinition,
    pub is_default: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewSavedView {
    pub entity_name: String,
    pub name: String,
    pub visibility: ViewVisibility,
    pub definition: ViewDefinition,
}

/// Partial update; `None` leaves the stored field untouched.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewPatch {
    pub name: Option<String>,
    pub definition: Option<ViewDefinition>,
}
