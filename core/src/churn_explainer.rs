//! Churn-factor explainer: turns a snapshot into human-readable risk factors
//! and the matching retention actions.
//!
//! RULES are evaluated top to bottom and the output keeps that order no matter
//! which subset fires. One recommendation per fired factor, same order.

use crate::{
    clock::EvalClock,
    health_scorer::HealthAssessment,
    snapshot::CustomerActivitySnapshot,
    types::round2,
};
use serde::{Deserialize, Serialize};

/// Fewer completed orders than this counts as low frequency.
pub const LOW_FREQUENCY_THRESHOLD: u32 = 2;
/// More tickets than this counts as high volume.
pub const HIGH_TICKET_VOLUME_THRESHOLD: u32 = 3;
pub const LOW_SATISFACTION_RATING: f64 = 3.0;
pub const DORMANT_AFTER_DAYS: i64 = 90;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ChurnFactor {
    LowPurchaseFrequency,
    HighSupportTicketVolume,
    LowProductSatisfaction,
    NoRecentPurchases,
}

impl ChurnFactor {
    pub fn label(&self) -> &'static str {
        match self {
            Self::LowPurchaseFrequency => "Low purchase frequency",
            Self::HighSupportTicketVolume => "High support ticket volume",
            Self::LowProductSatisfaction => "Low product satisfaction",
            Self::NoRecentPurchases => "No recent purchases",
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self {
            Self::LowPurchaseFrequency => "Send personalized product recommendations",
            Self::HighSupportTicketVolume => "Assign dedicated account manager",
            Self::LowProductSatisfaction => "Offer product training or alternatives",
            Self::NoRecentPurchases => "Send re-engagement campaign with discount",
        }
    }
}

/// What a rule sees: the snapshot plus the already-resolved order age.
struct RuleInput<'a> {
    snapshot: &'a CustomerActivitySnapshot,
    /// `None` when the customer never ordered or the date does not resolve.
    days_since_last_order: Option<i64>,
}

struct ChurnRule {
    factor:  ChurnFactor,
    applies: fn(&RuleInput<'_>) -> bool,
}

const RULES: [ChurnRule; 4] = [
    ChurnRule { factor: ChurnFactor::LowPurchaseFrequency,    applies: few_orders },
    ChurnRule { factor: ChurnFactor::HighSupportTicketVolume, applies: many_tickets },
    ChurnRule { factor: ChurnFactor::LowProductSatisfaction,  applies: low_rating },
    ChurnRule { factor: ChurnFactor::NoRecentPurchases,       applies: dormant },
];

fn few_orders(i: &RuleInput<'_>) -> bool {
    i.snapshot.total_orders < LOW_FREQUENCY_THRESHOLD
}

fn many_tickets(i: &RuleInput<'_>) -> bool {
    i.snapshot.support_tickets > HIGH_TICKET_VOLUME_THRESHOLD
}

fn low_rating(i: &RuleInput<'_>) -> bool {
    i.snapshot.avg_rating < LOW_SATISFACTION_RATING
}

// Never-ordered customers are covered by the frequency rule, not this one.
fn dormant(i: &RuleInput<'_>) -> bool {
    matches!(i.days_since_last_order, Some(days) if days > DORMANT_AFTER_DAYS)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChurnFactorReport {
    pub factors:           Vec<ChurnFactor>,
    /// (100 - health score) / 100, rounded to 2 decimals. A linear inverse of
    /// the score, not a calibrated probability.
    pub churn_probability: f64,
}

impl ChurnFactorReport {
    pub fn key_factors(&self) -> Vec<String> {
        self.factors.iter().map(|f| f.label().to_string()).collect()
    }

    pub fn recommended_actions(&self) -> Vec<String> {
        self.factors.iter().map(|f| f.recommendation().to_string()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }
}

pub fn churn_probability(health_score: f64) -> f64 {
    round2((100.0 - health_score) / 100.0)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ChurnExplainer {
    clock: EvalClock,
}

impl ChurnExplainer {
    pub fn new(clock: EvalClock) -> Self {
        Self { clock }
    }

    /// Total: an empty factor list is a valid answer.
    pub fn explain(
        &self,
        snapshot: &CustomerActivitySnapshot,
        assessment: &HealthAssessment,
    ) -> ChurnFactorReport {
        let days_since_last_order = snapshot.last_order_date.as_ref().and_then(|ts| {
            match ts.resolve() {
                Ok(at) => Some(self.clock.days_since(at)),
                Err(e) => {
                    log::warn!("churn explainer: ignoring last order date: {e}");
                    None
                }
            }
        });

        let input = RuleInput { snapshot, days_since_last_order };
        let factors = RULES
            .iter()
            .filter(|rule| (rule.applies)(&input))
            .map(|rule| rule.factor)
            .collect();

        ChurnFactorReport {
            factors,
            churn_probability: churn_probability(assessment.health_score),
        }
    }
}
