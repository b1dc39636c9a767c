use std::str::FromStr;

use sea_orm::sea_query::Order;
use strum_macros::{Display, EnumString};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SortError {
    #[error("Unknown sort field: {0}")]
    UnknownField(String),
}

/// Columns a listing may be ordered by. Parsing is case-insensitive and accepts
/// both the JSON spelling and the column spelling of `createdAt`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, EnumString, Display)]
#[strum(ascii_case_insensitive)]
pub enum SortField {
    #[strum(to_string = "id")]
    Id,
    #[strum(to_string = "title")]
    Title,
    #[strum(to_string = "description")]
    Description,
    #[strum(to_string = "completed")]
    Completed,
    #[default]
    #[strum(to_string = "createdAt", serialize = "created_at")]
    CreatedAt,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Display)]
pub enum SortDirection {
    #[strum(to_string = "asc")]
    Asc,
    #[default]
    #[strum(to_string = "desc")]
    Desc,
}

impl SortDirection {
    /// Only `ASC` (any case) sorts ascending; every other token, or none, is descending.
    pub fn from_token(token: Option<&str>) -> Self {
        match token {
            Some(token) if token.trim().eq_ignore_ascii_case("ASC") => SortDirection::Asc,
            _ => SortDirection::Desc,
        }
    }
}

impl From<SortDirection> for Order {
    fn from(direction: SortDirection) -> Self {
        match direction {
            SortDirection::Asc => Order::Asc,
            SortDirection::Desc => Order::Desc,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Sort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Sort {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    pub fn parse(sort_by: Option<&str>, direction: Option<&str>) -> Result<Self, SortError> {
        let field = match sort_by.map(str::trim).filter(|name| !name.is_empty()) {
            Some(name) => SortField::from_str(name)
                .map_err(|_| SortError::UnknownField(name.to_string()))?,
            None => SortField::default(),
        };

        Ok(Self::new(field, SortDirection::from_token(direction)))
    }

    /// Oldest first; the order tasks take inside a todo.
    pub fn creation_order() -> Self {
        Self::new(SortField::CreatedAt, SortDirection::Asc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_newest_first() {
        let sort = Sort::parse(None, None).unwrap();
        assert_eq!(sort.field, SortField::CreatedAt);
        assert_eq!(sort.direction, SortDirection::Desc);

        let blank = Sort::parse(Some("  "), Some("")).unwrap();
        assert_eq!(blank, Sort::default());
    }

    #[test]
    fn direction_is_ascending_only_for_asc_token() {
        assert_eq!(SortDirection::from_token(Some("ASC")), SortDirection::Asc);
        assert_eq!(SortDirection::from_token(Some("asc")), SortDirection::Asc);
        assert_eq!(SortDirection::from_token(Some("desc")), SortDirection::Desc);
        assert_eq!(SortDirection::from_token(Some("upward")), SortDirection::Desc);
        assert_eq!(SortDirection::from_token(None), SortDirection::Desc);
    }

    #[test]
    fn field_names_parse_case_insensitively() {
        assert_eq!(
            Sort::parse(Some("TITLE"), None).unwrap().field,
            SortField::Title
        );
        assert_eq!(
            Sort::parse(Some("createdAt"), None).unwrap().field,
            SortField::CreatedAt
        );
        assert_eq!(
            Sort::parse(Some("created_at"), None).unwrap().field,
            SortField::CreatedAt
        );
        assert_eq!(
            Sort::parse(Some("completed"), Some("asc")).unwrap(),
            Sort::new(SortField::Completed, SortDirection::Asc)
        );
    }

    #[test]
    fn unknown_field_is_rejected() {
        assert_eq!(
            Sort::parse(Some("priority"), Some("asc")),
            Err(SortError::UnknownField("priority".to_string()))
        );
    }

    #[test]
    fn fields_display_in_json_spelling() {
        assert_eq!(SortField::CreatedAt.to_string(), "createdAt");
        assert_eq!(SortDirection::Asc.to_string(), "asc");
    }
}
