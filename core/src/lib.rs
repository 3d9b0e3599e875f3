//! Customer health scoring.
//!
//! The core is two pure functions over a `CustomerActivitySnapshot`:
//!   - `HealthScorer::score`     → health score, churn-risk tier, lifetime value
//!   - `ChurnExplainer::explain` → ordered churn factors and retention actions
//!
//! Around them sit the calling layer: a SQLite store, a deterministic demo-data
//! generator, dashboard metrics and `HealthService`, which ties them together.

pub mod activity;
pub mod churn_explainer;
pub mod clock;
pub mod config;
pub mod customer;
pub mod error;
pub mod generator;
pub mod health_scorer;
pub mod metrics;
pub mod name_generator;
pub mod rng;
pub mod service;
pub mod snapshot;
pub mod store;
pub mod types;

pub use churn_explainer::{ChurnExplainer, ChurnFactor, ChurnFactorReport};
pub use clock::EvalClock;
pub use error::{HealthError, HealthResult, ScoreError};
pub use health_scorer::{ChurnRisk, HealthAssessment, HealthScorer, ScoreBreakdown, ScoreFactor};
pub use snapshot::{CustomerActivitySnapshot, OrderTimestamp};
