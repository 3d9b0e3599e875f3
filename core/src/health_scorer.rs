//! Health scoring: a fixed point rubric over the activity snapshot.
//!
//! Five independently bounded sub-scores are summed into a 0–100 composite:
//!
//! | factor    | formula                              | range   |
//! |-----------|--------------------------------------|---------|
//! | recency   | max(0, 30 - days/30 * 30)            | [0, 30] |
//! | frequency | min(25, orders * 2)                  | [0, 25] |
//! | monetary  | min(25, spent / 100)                 | [0, 25] |
//! | support   | max(0, 10 - tickets)                 | [0, 10] |
//! | rating    | rating * 2                           | [0, 10] |
//!
//! The sum itself is not clamped. A future-dated last order yields a recency
//! above 30 and the composite can exceed 100; callers see that as-is.
//!
//! RULE: a scoring failure is never reported as healthy. Any error inside a
//! pass collapses to `HealthAssessment::degraded()` (score 0, High risk).

use crate::{
    clock::EvalClock,
    error::ScoreError,
    snapshot::{CustomerActivitySnapshot, OrderTimestamp},
    types::round2,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const RECENCY_MAX: f64 = 30.0;
pub const RECENCY_WINDOW_DAYS: f64 = 30.0;
pub const FREQUENCY_MAX: f64 = 25.0;
pub const FREQUENCY_POINTS_PER_ORDER: f64 = 2.0;
pub const MONETARY_MAX: f64 = 25.0;
pub const MONETARY_SPEND_PER_POINT: f64 = 100.0;
pub const SUPPORT_MAX: f64 = 10.0;
pub const RATING_POINTS_PER_STAR: f64 = 2.0;

/// Dormancy assumed for a customer who never ordered.
pub const NEVER_ORDERED_DAYS: i64 = 365;

pub const LOW_RISK_THRESHOLD: f64 = 70.0;
pub const MEDIUM_RISK_THRESHOLD: f64 = 40.0;

// ── Public types ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChurnRisk {
    Low,
    Medium,
    High,
}

impl ChurnRisk {
    pub const ALL: [ChurnRisk; 3] = [Self::Low, Self::Medium, Self::High];

    /// Step function of the health score: [70, ∞) Low, [40, 70) Medium,
    /// everything below 40 High.
    pub fn from_score(health_score: f64) -> Self {
        if health_score >= LOW_RISK_THRESHOLD {
            Self::Low
        } else if health_score >= MEDIUM_RISK_THRESHOLD {
            Self::Medium
        } else {
            Self::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == s)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFactor {
    Recency,
    Frequency,
    Monetary,
    Support,
    Rating,
}

impl ScoreFactor {
    pub const ALL: [ScoreFactor; 5] = [
        Self::Recency,
        Self::Frequency,
        Self::Monetary,
        Self::Support,
        Self::Rating,
    ];
}

/// Per-factor points, each rounded to 2 decimals. Empty on a degraded pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(transparent)]
pub struct ScoreBreakdown(BTreeMap<ScoreFactor, f64>);

impl ScoreBreakdown {
    pub fn get(&self, factor: ScoreFactor) -> Option<f64> {
        self.0.get(&factor).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ScoreFactor, f64)> + '_ {
        self.0.iter().map(|(f, p)| (*f, *p))
    }
}

impl FromIterator<(ScoreFactor, f64)> for ScoreBreakdown {
    fn from_iter<I: IntoIterator<Item = (ScoreFactor, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthAssessment {
    pub health_score:    f64,
    pub churn_risk:      ChurnRisk,
    pub lifetime_value:  f64,
    pub score_breakdown: ScoreBreakdown,
}

impl HealthAssessment {
    /// Worst-case result substituted for any failed scoring pass.
    pub fn degraded() -> Self {
        Self {
            health_score:    0.0,
            churn_risk:      ChurnRisk::High,
            lifetime_value:  0.0,
            score_breakdown: ScoreBreakdown::default(),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.score_breakdown.is_empty()
    }
}

// ── Scorer ───────────────────────────────────────────────────────────────────

/// Stateless apart from its clock; cheap to copy into worker threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct HealthScorer {
    clock: EvalClock,
}

impl HealthScorer {
    pub fn new(clock: EvalClock) -> Self {
        Self { clock }
    }

    pub fn clock(&self) -> EvalClock {
        self.clock
    }

    /// Total over every snapshot: failures degrade, they never propagate.
    pub fn score(&self, snapshot: &CustomerActivitySnapshot) -> HealthAssessment {
        match self.try_score(snapshot) {
            Ok(assessment) => assessment,
            Err(e) => {
                log::error!("health score: falling back to degraded assessment: {e}");
                HealthAssessment::degraded()
            }
        }
    }

    pub fn try_score(
        &self,
        snapshot: &CustomerActivitySnapshot,
    ) -> Result<HealthAssessment, ScoreError> {
        snapshot.check_finite()?;

        let days = self.days_since_last_order(snapshot.last_order_date.as_ref())?;

        let recency = recency_points(days);
        let frequency = (snapshot.total_orders as f64 * FREQUENCY_POINTS_PER_ORDER).min(FREQUENCY_MAX);
        let monetary = (snapshot.total_spent / MONETARY_SPEND_PER_POINT).min(MONETARY_MAX);
        let support = (SUPPORT_MAX - snapshot.support_tickets as f64).max(0.0);
        // Ratings are capped at 5 upstream, so this tops out at 10 unclamped.
        let rating = snapshot.avg_rating * RATING_POINTS_PER_STAR;

        let health_score = round2(recency + frequency + monetary + support + rating);
        let lifetime_value = snapshot.total_spent * (1.0 + health_score / 100.0);

        let score_breakdown = [
            (ScoreFactor::Recency, recency),
            (ScoreFactor::Frequency, frequency),
            (ScoreFactor::Monetary, monetary),
            (ScoreFactor::Support, support),
            (ScoreFactor::Rating, rating),
        ]
        .into_iter()
        .map(|(factor, points)| (factor, round2(points)))
        .collect();

        Ok(HealthAssessment {
            health_score,
            churn_risk: ChurnRisk::from_score(health_score),
            lifetime_value: round2(lifetime_value),
            score_breakdown,
        })
    }

    /// `NEVER_ORDERED_DAYS` when absent, otherwise whole days to now.
    pub fn days_since_last_order(
        &self,
        last_order_date: Option<&OrderTimestamp>,
    ) -> Result<i64, ScoreError> {
        match last_order_date {
            None => Ok(NEVER_ORDERED_DAYS),
            Some(ts) => Ok(self.clock.days_since(ts.resolve()?)),
        }
    }
}

fn recency_points(days_since_last_order: i64) -> f64 {
    (RECENCY_MAX - (days_since_last_order as f64 / RECENCY_WINDOW_DAYS) * RECENCY_MAX).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recency_decays_linearly_and_floors() {
        assert_eq!(recency_points(0), 30.0);
        assert_eq!(recency_points(15), 15.0);
        assert_eq!(recency_points(30), 0.0);
        assert_eq!(recency_points(400), 0.0);
        assert_eq!(recency_points(-3), 33.0);
    }

    #[test]
    fn tier_boundaries_are_inclusive_below() {
        assert_eq!(ChurnRisk::from_score(70.0), ChurnRisk::Low);
        assert_eq!(ChurnRisk::from_score(69.999), ChurnRisk::Medium);
        assert_eq!(ChurnRisk::from_score(40.0), ChurnRisk::Medium);
        assert_eq!(ChurnRisk::from_score(39.999), ChurnRisk::High);
        assert_eq!(ChurnRisk::from_score(-5.0), ChurnRisk::High);
    }

    #[test]
    fn churn_risk_text_round_trips() {
        for risk in ChurnRisk::ALL {
            assert_eq!(ChurnRisk::parse(risk.as_str()), Some(risk));
        }
        assert_eq!(ChurnRisk::parse("high"), None);
    }
}
