//! SQLite persistence layer.
//!
//! RULE: only the store talks to the database.
//! The service calls store methods; it never executes SQL directly.
//! The store never scores: assessments arrive already computed.

use crate::{
    error::{HealthError, HealthResult},
    snapshot::{parse_timestamp, TIMESTAMP_FORMAT},
};
use chrono::NaiveDateTime;
use rusqlite::{types::Type, Connection};

mod activity;
mod customer;
mod metrics;

pub use customer::CustomerQuery;
pub use metrics::{RevenueTotals, RiskCounts};

pub struct HealthStore {
    conn: Connection,
}

impl HealthStore {
    pub fn open(path: &str) -> HealthResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL only matters for real files; memory databases ignore it.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> HealthResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> HealthResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_customer_health.sql"))?;
        Ok(())
    }

    /// Drop every customer and activity row.
    pub fn clear_all(&self) -> HealthResult<()> {
        self.conn.execute_batch(
            "DELETE FROM feedback;
             DELETE FROM support_ticket;
             DELETE FROM orders;
             DELETE FROM customer;",
        )?;
        Ok(())
    }
}

// ── Column helpers ─────────────────────────────────────────────────

pub(crate) fn format_ts(at: &NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

pub(crate) fn ts_column(idx: usize, raw: String) -> rusqlite::Result<NaiveDateTime> {
    parse_timestamp(&raw).map_err(|e| conversion_failure(idx, e.to_string()))
}

pub(crate) fn enum_column<T>(
    idx: usize,
    raw: String,
    parse: fn(&str) -> Option<T>,
) -> rusqlite::Result<T> {
    parse(&raw).ok_or_else(|| conversion_failure(idx, format!("unknown value '{raw}'")))
}

/// Narrow an INTEGER column, rejecting values the target type cannot hold.
pub(crate) fn int_column<T: TryFrom<i64>>(idx: usize, raw: i64) -> rusqlite::Result<T> {
    T::try_from(raw).map_err(|_| conversion_failure(idx, format!("integer {raw} out of range")))
}

pub(crate) fn conversion_failure(idx: usize, msg: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, msg.into())
}

pub(crate) fn not_found(customer_id: &str) -> HealthError {
    HealthError::CustomerNotFound {
        customer_id: customer_id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> HealthStore {
        let store = HealthStore::in_memory().unwrap();
        store.migrate().unwrap();
        store
    }

    #[test]
    fn int_column_rejects_out_of_range() {
        assert_eq!(int_column::<u32>(0, 7).unwrap(), 7);
        assert!(int_column::<u32>(0, -1).is_err());
        assert!(int_column::<u8>(0, 256).is_err());
        assert!(int_column::<u32>(0, i64::from(u32::MAX) + 1).is_err());
    }

    #[test]
    fn negative_counts_fail_the_read() {
        let store = store();
        store
            .conn
            .execute_batch(
                "INSERT INTO customer (customer_id, name, email, phone, registration_date,
                                       customer_tier, region, total_orders)
                 VALUES ('c-1', 'A', 'a@x', '1', '2024-01-01T00:00:00', 'Gold', 'North', -1);
                 INSERT INTO orders (order_id, customer_id, order_date, total_amount, items_count, status)
                 VALUES ('o-1', 'c-1', '2024-02-01T00:00:00', 10.0, 5000000000, 'Completed');",
            )
            .unwrap();

        assert!(store.get_customer("c-1").is_err());
        assert!(store.orders_for("c-1").is_err());
    }
}
