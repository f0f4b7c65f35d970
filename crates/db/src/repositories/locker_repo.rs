//! Repository for the `lockers` table.
//!
//! The table holds exactly one row per locker number. Rows are created by
//! [`LockerRepo::ensure_seeded`] and afterwards only updated or cleared.

use locker_core::lockers::{
    search_pattern, LockerAssignment, StatusFilter, FIRST_LOCKER_NO, LAST_LOCKER_NO, LIKE_ESCAPE,
};
use locker_core::spreadsheet::SheetRow;
use locker_core::types::LockerNo;
use sqlx::{Sqlite, SqlitePool};

use crate::models::locker::{Locker, LockerListParams, LockerStats, UpdateLocker};

/// Column list for `lockers` queries.
const COLUMNS: &str = "\
    locker_no, gc_no, emp_no, name, designation, department, \
    gender, from_date, to_date, is_empty";

/// Columns matched by the free-text search.
const SEARCH_COLUMNS: [&str; 6] = [
    "CAST(locker_no AS TEXT)",
    "gc_no",
    "emp_no",
    "name",
    "designation",
    "department",
];

/// Provides queries over the fixed locker pool.
pub struct LockerRepo;

impl LockerRepo {
    /// Insert any missing locker numbers in the pool. Existing rows are untouched.
    ///
    /// Returns the number of rows inserted (the full pool on a fresh database,
    /// zero afterwards).
    pub async fn ensure_seeded(pool: &SqlitePool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "WITH RECURSIVE seq(n) AS ( \
                 SELECT ? UNION ALL SELECT n + 1 FROM seq WHERE n < ? \
             ) \
             INSERT OR IGNORE INTO lockers (locker_no) SELECT n FROM seq",
        )
        .bind(FIRST_LOCKER_NO)
        .bind(LAST_LOCKER_NO)
        .execute(pool)
        .await?;

        let inserted = result.rows_affected();
        if inserted > 0 {
            tracing::info!(inserted, "Seeded locker pool");
        }
        Ok(inserted)
    }

    /// Count all locker rows.
    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM lockers")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// List lockers ordered by number, filtered by search term and occupancy.
    pub async fn list(
        pool: &SqlitePool,
        params: &LockerListParams,
    ) -> Result<Vec<Locker>, sqlx::Error> {
        let pattern = params.search.as_deref().and_then(search_pattern);

        let mut conditions: Vec<String> = Vec::new();
        if pattern.is_some() {
            let any_column = SEARCH_COLUMNS
                .iter()
                .map(|col| format!("{col} LIKE ? ESCAPE '{LIKE_ESCAPE}'"))
                .collect::<Vec<_>>()
                .join(" OR ");
            conditions.push(format!("({any_column})"));
        }
        match params.status {
            StatusFilter::All => {}
            StatusFilter::Occupied => conditions.push("is_empty = 0".to_string()),
            StatusFilter::Empty => conditions.push("is_empty = 1".to_string()),
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let query = format!("SELECT {COLUMNS} FROM lockers {where_clause} ORDER BY locker_no");

        let mut q = sqlx::query_as::<_, Locker>(&query);
        if let Some(pattern) = &pattern {
            for _ in SEARCH_COLUMNS {
                q = q.bind(pattern.as_str());
            }
        }
        q.fetch_all(pool).await
    }

    /// List every locker ordered by number.
    pub async fn list_all(pool: &SqlitePool) -> Result<Vec<Locker>, sqlx::Error> {
        Self::list(pool, &LockerListParams::default()).await
    }

    /// Find a locker by its number.
    pub async fn find_by_no(
        pool: &SqlitePool,
        locker_no: LockerNo,
    ) -> Result<Option<Locker>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM lockers WHERE locker_no = ?");
        sqlx::query_as::<_, Locker>(&query)
            .bind(locker_no)
            .fetch_optional(pool)
            .await
    }

    /// Overwrite every assignment field of a locker.
    ///
    /// Absent fields are stored as empty strings and `is_empty` is recomputed
    /// from the name. Returns `None` if the locker does not exist.
    pub async fn update(
        pool: &SqlitePool,
        locker_no: LockerNo,
        input: &UpdateLocker,
    ) -> Result<Option<Locker>, sqlx::Error> {
        assign(pool, locker_no, input).await
    }

    /// Null every assignment field and mark the locker empty.
    ///
    /// Returns `None` if the locker does not exist.
    pub async fn clear(
        pool: &SqlitePool,
        locker_no: LockerNo,
    ) -> Result<Option<Locker>, sqlx::Error> {
        let query = format!(
            "UPDATE lockers SET \
                 gc_no = NULL, emp_no = NULL, name = NULL, designation = NULL, \
                 department = NULL, gender = NULL, from_date = NULL, to_date = NULL, \
                 is_empty = 1 \
             WHERE locker_no = ? \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Locker>(&query)
            .bind(locker_no)
            .fetch_optional(pool)
            .await
    }

    /// Apply imported rows in a single transaction.
    ///
    /// Rows are applied in order, so a later row for the same locker wins.
    /// Returns the number of rows that matched a locker.
    pub async fn import_rows(pool: &SqlitePool, rows: &[SheetRow]) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut imported = 0;
        for row in rows {
            if assign(&mut *tx, row.locker_no, &row.assignment)
                .await?
                .is_some()
            {
                imported += 1;
            }
        }
        tx.commit().await?;
        Ok(imported)
    }

    /// Occupancy counters over the whole pool.
    pub async fn stats(pool: &SqlitePool) -> Result<LockerStats, sqlx::Error> {
        sqlx::query_as::<_, LockerStats>(
            "SELECT \
                 COUNT(*) AS total, \
                 COALESCE(SUM(CASE WHEN is_empty = 0 THEN 1 ELSE 0 END), 0) AS occupied, \
                 COALESCE(SUM(CASE WHEN is_empty = 1 THEN 1 ELSE 0 END), 0) AS empty \
             FROM lockers",
        )
        .fetch_one(pool)
        .await
    }
}

/// Shared write path for updates and imports.
async fn assign<'e, E>(
    executor: E,
    locker_no: LockerNo,
    input: &LockerAssignment,
) -> Result<Option<Locker>, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let query = format!(
        "UPDATE lockers SET \
             gc_no = ?, emp_no = ?, name = ?, designation = ?, department = ?, \
             gender = ?, from_date = ?, to_date = ?, is_empty = ? \
         WHERE locker_no = ? \
         RETURNING {COLUMNS}"
    );
    let mut q = sqlx::query_as::<_, Locker>(&query);
    for value in input.values() {
        q = q.bind(value.unwrap_or_default());
    }
    q.bind(input.is_empty())
        .bind(locker_no)
        .fetch_optional(executor)
        .await
}
