use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::AppError;

// ---------------------------------------------------------------------------
// Property type
// ---------------------------------------------------------------------------

/// The two dwelling kinds every table is keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum PropertyType {
    House,
    Unit,
}

impl PropertyType {
    pub fn as_str(self) -> &'static str {
        match self {
            PropertyType::House => "house",
            PropertyType::Unit => "unit",
        }
    }

    /// Parses an optional query parameter. Absent and empty both mean "no filter".
    pub fn from_param(value: Option<&str>) -> Result<Option<Self>, AppError> {
        match value {
            None | Some("") => Ok(None),
            Some(s) => s.parse().map(Some),
        }
    }
}

impl FromStr for PropertyType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "house" => Ok(PropertyType::House),
            "unit" => Ok(PropertyType::Unit),
            _ => Err(AppError::Validation(
                "property_type must be 'house' or 'unit'".to_string(),
            )),
        }
    }
}

impl std::fmt::Display for PropertyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Sort direction
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    pub fn from_param(value: Option<&str>) -> Result<Self, AppError> {
        match value {
            None | Some("") => Ok(SortDirection::default()),
            Some("asc") => Ok(SortDirection::Asc),
            Some("desc") => Ok(SortDirection::Desc),
            Some(_) => Err(AppError::Validation(
                "order must be 'asc' or 'desc'".to_string(),
            )),
        }
    }
}

/// Treats `?suburb=` the same as an absent parameter.
pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}
