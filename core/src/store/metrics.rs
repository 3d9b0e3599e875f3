use super::{int_column, HealthStore};
use crate::{
    activity::OrderStatus, error::HealthResult, health_scorer::ChurnRisk, metrics::RevenueTrend,
};
use rusqlite::params;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RiskCounts {
    pub total:  i64,
    pub low:    i64,
    pub medium: i64,
    pub high:   i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RevenueTotals {
    pub total_revenue:      f64,
    /// `None` when there are no customers.
    pub avg_lifetime_value: Option<f64>,
}

impl HealthStore {
    pub fn risk_counts(&self) -> HealthResult<RiskCounts> {
        let mut stmt = self
            .conn
            .prepare("SELECT churn_risk, COUNT(*) FROM customer GROUP BY churn_risk")?;
        let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?;

        let mut counts = RiskCounts::default();
        for row in rows {
            let (risk, n) = row?;
            counts.total += n;
            match ChurnRisk::parse(&risk) {
                Some(ChurnRisk::Low) => counts.low += n,
                Some(ChurnRisk::Medium) => counts.medium += n,
                Some(ChurnRisk::High) => counts.high += n,
                None => log::warn!("store: {n} customers with unknown churn_risk '{risk}'"),
            }
        }
        Ok(counts)
    }

    pub fn revenue_totals(&self) -> HealthResult<RevenueTotals> {
        let totals = self.conn.query_row(
            "SELECT COALESCE(SUM(total_spent), 0.0), AVG(lifetime_value) FROM customer",
            [],
            |row| {
                Ok(RevenueTotals {
                    total_revenue:      row.get(0)?,
                    avg_lifetime_value: row.get(1)?,
                })
            },
        )?;
        Ok(totals)
    }

    /// Completed-order revenue per calendar month, oldest first.
    pub fn revenue_trends(&self) -> HealthResult<Vec<RevenueTrend>> {
        let mut stmt = self.conn.prepare(
            "SELECT CAST(strftime('%Y', order_date) AS INTEGER) AS year,
                    CAST(strftime('%m', order_date) AS INTEGER) AS month,
                    SUM(total_amount),
                    COUNT(*)
             FROM orders
             WHERE status = ?1
             GROUP BY year, month
             ORDER BY year ASC, month ASC",
        )?;
        let rows = stmt.query_map(params![OrderStatus::Completed.as_str()], |row| {
            Ok(RevenueTrend {
                year:    int_column(0, row.get(0)?)?,
                month:   int_column(1, row.get(1)?)?,
                revenue: row.get(2)?,
                orders:  row.get(3)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
