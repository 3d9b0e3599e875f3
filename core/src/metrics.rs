//! Dashboard aggregates over the persisted assessments.

use crate::{
    store::{RevenueTotals, RiskCounts},
    types::round2,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardMetrics {
    pub total_customers:       i64,
    pub high_risk_customers:   i64,
    pub medium_risk_customers: i64,
    pub low_risk_customers:    i64,
    pub total_revenue:         f64,
    pub avg_lifetime_value:    f64,
    /// Share of High-risk customers, in percent.
    pub churn_rate:            f64,
}

impl DashboardMetrics {
    pub fn from_aggregates(counts: RiskCounts, totals: RevenueTotals) -> Self {
        let churn_rate = if counts.total > 0 {
            counts.high as f64 / counts.total as f64 * 100.0
        } else {
            0.0
        };
        Self {
            total_customers:       counts.total,
            high_risk_customers:   counts.high,
            medium_risk_customers: counts.medium,
            low_risk_customers:    counts.low,
            total_revenue:         round2(totals.total_revenue),
            avg_lifetime_value:    round2(totals.avg_lifetime_value.unwrap_or(0.0)),
            churn_rate:            round2(churn_rate),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RevenueTrend {
    pub year:    i32,
    pub month:   u32,
    pub revenue: f64,
    pub orders:  i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_population_has_zero_rates() {
        let m = DashboardMetrics::from_aggregates(RiskCounts::default(), RevenueTotals::default());
        assert_eq!(m.total_customers, 0);
        assert_eq!(m.churn_rate, 0.0);
        assert_eq!(m.avg_lifetime_value, 0.0);
    }

    #[test]
    fn churn_rate_is_high_share_in_percent() {
        let counts = RiskCounts { total: 3, low: 1, medium: 1, high: 1 };
        let totals = RevenueTotals { total_revenue: 1234.567, avg_lifetime_value: Some(99.999) };
        let m = DashboardMetrics::from_aggregates(counts, totals);
        assert_eq!(m.churn_rate, 33.33);
        assert_eq!(m.total_revenue, 1234.57);
        assert_eq!(m.avg_lifetime_value, 100.0);
    }
}
