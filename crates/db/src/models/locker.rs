//! Locker model and DTOs.

use locker_core::lockers::{LockerAssignment, StatusFilter};
use locker_core::spreadsheet::SheetRow;
use locker_core::types::LockerNo;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `lockers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Locker {
    pub locker_no: LockerNo,
    pub gc_no: Option<String>,
    pub emp_no: Option<String>,
    pub name: Option<String>,
    pub designation: Option<String>,
    pub department: Option<String>,
    pub gender: Option<String>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    pub is_empty: bool,
}

impl Locker {
    /// The assignment fields of this row.
    pub fn assignment(&self) -> LockerAssignment {
        LockerAssignment {
            gc_no: self.gc_no.clone(),
            emp_no: self.emp_no.clone(),
            name: self.name.clone(),
            designation: self.designation.clone(),
            department: self.department.clone(),
            gender: self.gender.clone(),
            from_date: self.from_date.clone(),
            to_date: self.to_date.clone(),
        }
    }

    /// This row as a spreadsheet export row.
    pub fn to_sheet_row(&self) -> SheetRow {
        SheetRow {
            locker_no: self.locker_no,
            assignment: self.assignment(),
        }
    }
}

/// DTO for `PUT /lockers/{no}`: every assignment field is overwritten.
pub type UpdateLocker = LockerAssignment;

/// Filters for the locker listing.
#[derive(Debug, Clone, Default)]
pub struct LockerListParams {
    /// Free-text term matched against the searchable columns.
    pub search: Option<String>,
    pub status: StatusFilter,
}

/// Occupancy counters returned by `/stats`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow, Serialize)]
pub struct LockerStats {
    pub total: i64,
    pub occupied: i64,
    pub empty: i64,
}
