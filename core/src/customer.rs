//! Customer profile: the persisted record the assessment is written into.

use crate::{
    health_scorer::{ChurnRisk, HealthAssessment, ScoreBreakdown},
    snapshot::{CustomerActivitySnapshot, OrderTimestamp},
    types::CustomerId,
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CustomerTier {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl CustomerTier {
    pub const ALL: [CustomerTier; 4] = [Self::Bronze, Self::Silver, Self::Gold, Self::Platinum];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bronze => "Bronze",
            Self::Silver => "Silver",
            Self::Gold => "Gold",
            Self::Platinum => "Platinum",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Region {
    North,
    South,
    East,
    West,
}

impl Region {
    pub const ALL: [Region; 4] = [Self::North, Self::South, Self::East, Self::West];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::North => "North",
            Self::South => "South",
            Self::East => "East",
            Self::West => "West",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomerProfile {
    pub customer_id:       CustomerId,
    pub name:              String,
    pub email:             String,
    pub phone:             String,
    pub registration_date: NaiveDateTime,
    pub customer_tier:     CustomerTier,
    pub region:            Region,
    // Activity snapshot
    pub total_orders:      u32,
    pub total_spent:       f64,
    pub last_order_date:   Option<OrderTimestamp>,
    pub support_tickets:   u32,
    pub avg_rating:        f64,
    // Derived assessment
    pub health_score:      f64,
    pub churn_risk:        ChurnRisk,
    pub lifetime_value:    f64,
    pub score_breakdown:   ScoreBreakdown,
}

impl CustomerProfile {
    pub fn snapshot(&self) -> CustomerActivitySnapshot {
        CustomerActivitySnapshot {
            last_order_date: self.last_order_date.clone(),
            total_orders:    self.total_orders,
            total_spent:     self.total_spent,
            support_tickets: self.support_tickets,
            avg_rating:      self.avg_rating,
        }
    }

    /// The assessment as last persisted, without recomputing it.
    pub fn assessment(&self) -> HealthAssessment {
        HealthAssessment {
            health_score:    self.health_score,
            churn_risk:      self.churn_risk,
            lifetime_value:  self.lifetime_value,
            score_breakdown: self.score_breakdown.clone(),
        }
    }

    /// Overwrite snapshot and assessment together; they are never updated apart.
    pub fn apply(&mut self, snapshot: CustomerActivitySnapshot, assessment: HealthAssessment) {
        self.last_order_date = snapshot.last_order_date;
        self.total_orders    = snapshot.total_orders;
        self.total_spent     = snapshot.total_spent;
        self.support_tickets = snapshot.support_tickets;
        self.avg_rating      = snapshot.avg_rating;
        self.health_score    = assessment.health_score;
        self.churn_risk      = assessment.churn_risk;
        self.lifetime_value  = assessment.lifetime_value;
        self.score_breakdown = assessment.score_breakdown;
    }

    pub fn last_activity(&self) -> Option<NaiveDateTime> {
        self.last_order_date.as_ref().and_then(|ts| ts.resolve().ok())
    }
}

/// Read-model row returned by customer listings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomerHealthView {
    pub customer_id:    CustomerId,
    pub name:           String,
    pub email:          String,
    pub health_score:   f64,
    pub churn_risk:     ChurnRisk,
    pub lifetime_value: f64,
    pub total_orders:   u32,
    pub total_spent:    f64,
    pub last_activity:  Option<NaiveDateTime>,
    pub customer_tier:  CustomerTier,
    pub region:         Region,
}

impl From<&CustomerProfile> for CustomerHealthView {
    fn from(c: &CustomerProfile) -> Self {
        Self {
            customer_id:    c.customer_id.clone(),
            name:           c.name.clone(),
            email:          c.email.clone(),
            health_score:   c.health_score,
            churn_risk:     c.churn_risk,
            lifetime_value: c.lifetime_value,
            total_orders:   c.total_orders,
            total_spent:    c.total_spent,
            last_activity:  c.last_activity(),
            customer_tier:  c.customer_tier,
            region:         c.region,
        }
    }
}
