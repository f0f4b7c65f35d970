//! Locker numbering, occupancy and search rules.
//!
//! The registry holds a fixed pool of lockers numbered
//! `FIRST_LOCKER_NO..=LAST_LOCKER_NO`. Rows are seeded once and afterwards only
//! their assignment fields change.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::LockerNo;

// ---------------------------------------------------------------------------
// Numbering
// ---------------------------------------------------------------------------

/// Lowest locker number.
pub const FIRST_LOCKER_NO: LockerNo = 1;

/// Highest locker number.
pub const LAST_LOCKER_NO: LockerNo = 300;

/// Number of lockers in the pool.
pub const LOCKER_COUNT: i64 = LAST_LOCKER_NO - FIRST_LOCKER_NO + 1;

/// Check whether a locker number belongs to the pool.
pub fn is_valid_locker_no(locker_no: LockerNo) -> bool {
    (FIRST_LOCKER_NO..=LAST_LOCKER_NO).contains(&locker_no)
}

// ---------------------------------------------------------------------------
// Assignment
// ---------------------------------------------------------------------------

/// The eight free-text fields that describe who holds a locker.
///
/// Used as the request body for updates, as the row payload for spreadsheet
/// import, and as the source of spreadsheet export cells.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockerAssignment {
    #[serde(default)]
    pub gc_no: Option<String>,
    #[serde(default)]
    pub emp_no: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub designation: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub from_date: Option<String>,
    #[serde(default)]
    pub to_date: Option<String>,
}

impl LockerAssignment {
    /// Whether this assignment leaves the locker empty.
    pub fn is_empty(&self) -> bool {
        !has_name(self.name.as_deref())
    }

    /// Field values in spreadsheet column order (see
    /// [`ASSIGNMENT_COLUMNS`](crate::spreadsheet::ASSIGNMENT_COLUMNS)).
    pub fn values(&self) -> [Option<&str>; 8] {
        [
            self.gc_no.as_deref(),
            self.emp_no.as_deref(),
            self.name.as_deref(),
            self.designation.as_deref(),
            self.department.as_deref(),
            self.gender.as_deref(),
            self.from_date.as_deref(),
            self.to_date.as_deref(),
        ]
    }

    /// Replace every absent field with an empty string.
    ///
    /// Updates overwrite all fields, so a field missing from the request is
    /// stored as `""` rather than left untouched.
    pub fn filled(self) -> Self {
        Self {
            gc_no: Some(self.gc_no.unwrap_or_default()),
            emp_no: Some(self.emp_no.unwrap_or_default()),
            name: Some(self.name.unwrap_or_default()),
            designation: Some(self.designation.unwrap_or_default()),
            department: Some(self.department.unwrap_or_default()),
            gender: Some(self.gender.unwrap_or_default()),
            from_date: Some(self.from_date.unwrap_or_default()),
            to_date: Some(self.to_date.unwrap_or_default()),
        }
    }
}

/// A locker counts as occupied when its name is present and non-empty.
pub fn has_name(name: Option<&str>) -> bool {
    name.is_some_and(|n| !n.is_empty())
}

// ---------------------------------------------------------------------------
// Listing filters
// ---------------------------------------------------------------------------

/// Occupancy filter for the locker listing (`?status=`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Occupied,
    Empty,
}

impl FromStr for StatusFilter {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(Self::All),
            "occupied" => Ok(Self::Occupied),
            "empty" => Ok(Self::Empty),
            other => Err(CoreError::Validation(format!(
                "Unknown status '{other}'. Expected one of: all, occupied, empty"
            ))),
        }
    }
}

/// Escape character used in `LIKE ... ESCAPE` clauses built from
/// [`search_pattern`].
pub const LIKE_ESCAPE: char = '\\';

/// Turn a free-text search term into a `LIKE` substring pattern.
///
/// Returns `None` for an empty term. The term is used verbatim, spaces
/// included; `%`, `_` and the escape character are escaped so they match
/// literally.
pub fn search_pattern(term: &str) -> Option<String> {
    if term.is_empty() {
        return None;
    }

    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if c == '%' || c == '_' || c == LIKE_ESCAPE {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    Some(pattern)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn pool_bounds() {
        assert_eq!(LOCKER_COUNT, 300);
        assert!(is_valid_locker_no(1));
        assert!(is_valid_locker_no(300));
        assert!(!is_valid_locker_no(0));
        assert!(!is_valid_locker_no(301));
        assert!(!is_valid_locker_no(-5));
    }

    #[test]
    fn only_missing_or_empty_names_leave_locker_empty() {
        assert!(!has_name(None));
        assert!(!has_name(Some("")));
        assert!(has_name(Some("   ")));
        assert!(has_name(Some("Asha")));
    }

    #[test]
    fn assignment_emptiness_follows_name_only() {
        let mut assignment = LockerAssignment {
            emp_no: Some("E-17".into()),
            department: Some("Stores".into()),
            ..Default::default()
        };
        assert!(assignment.is_empty());

        assignment.name = Some("Ravi".into());
        assert!(!assignment.is_empty());
    }

    #[test]
    fn filled_replaces_missing_fields_with_empty_strings() {
        let filled = LockerAssignment {
            name: Some("Ravi".into()),
            ..Default::default()
        }
        .filled();

        assert_eq!(filled.name.as_deref(), Some("Ravi"));
        assert!(filled.values().iter().all(Option::is_some));
        assert_eq!(filled.to_date.as_deref(), Some(""));
    }

    #[test]
    fn assignment_deserializes_with_missing_and_null_fields() {
        let parsed: LockerAssignment =
            serde_json::from_str(r#"{"name": "Meena", "gender": null}"#).unwrap();
        assert_eq!(parsed.name.as_deref(), Some("Meena"));
        assert_eq!(parsed.gender, None);
        assert_eq!(parsed.gc_no, None);
    }

    #[test]
    fn status_filter_parsing() {
        assert_eq!("all".parse::<StatusFilter>().unwrap(), StatusFilter::All);
        assert_eq!("".parse::<StatusFilter>().unwrap(), StatusFilter::All);
        assert_eq!(
            "Occupied".parse::<StatusFilter>().unwrap(),
            StatusFilter::Occupied
        );
        assert_eq!("empty".parse::<StatusFilter>().unwrap(), StatusFilter::Empty);
        assert_matches!(
            "vacant".parse::<StatusFilter>(),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn search_pattern_wraps_and_escapes() {
        assert_eq!(search_pattern(""), None);
        assert_eq!(search_pattern(" ").as_deref(), Some("% %"));
        assert_eq!(search_pattern(" ravi ").as_deref(), Some("% ravi %"));
        assert_eq!(search_pattern("50%").as_deref(), Some("%50\\%%"));
        assert_eq!(search_pattern("a_b").as_deref(), Some("%a\\_b%"));
    }
}
