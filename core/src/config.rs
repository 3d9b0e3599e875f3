//! Runtime configuration for demo-data generation and query defaults.
//!
//! The scoring rubric is deliberately absent: its weights and thresholds are
//! constants in `health_scorer` and `churn_explainer`.

use anyhow::Context;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Registration dates fall uniformly in the last N days.
    pub registration_window_days: u32,
    /// Bronze, Silver, Gold, Platinum.
    pub tier_weights:             [f64; 4],
    pub mean_orders:              f64,
    pub mean_tickets:             f64,
    pub mean_feedback:            f64,
    /// Parameters of the log-normal order amount.
    pub order_amount_mu:          f64,
    pub order_amount_sigma:       f64,
    pub max_items_per_order:      u32,
    /// Completed, Cancelled, Refunded.
    pub order_status_weights:     [f64; 3],
    /// Low, Medium, High.
    pub ticket_priority_weights:  [f64; 3],
    /// Open, In Progress, Resolved.
    pub ticket_status_weights:    [f64; 3],
    pub resolution_time_probability: f64,
    pub max_resolution_hours:     u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            registration_window_days: 730,
            tier_weights:             [0.4, 0.3, 0.2, 0.1],
            mean_orders:              5.0,
            mean_tickets:             1.0,
            mean_feedback:            2.0,
            order_amount_mu:          4.0,
            order_amount_sigma:       1.0,
            max_items_per_order:      9,
            order_status_weights:     [0.85, 0.10, 0.05],
            ticket_priority_weights:  [0.5, 0.3, 0.2],
            ticket_status_weights:    [0.1, 0.2, 0.7],
            resolution_time_probability: 0.7,
            max_resolution_hours:     71,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct QueryConfig {
    pub default_page_size:        u32,
    pub default_prediction_limit: u32,
    pub default_population:       usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_page_size:        100,
            default_prediction_limit: 10,
            default_population:       100,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct HealthConfig {
    pub generator: GeneratorConfig,
    pub query:     QueryConfig,
}

impl HealthConfig {
    /// Load from a JSON file. Missing sections and fields take defaults.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read {path}"))?;
        Self::from_json(&content).with_context(|| format!("Invalid config in {path}"))
    }

    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        let config: HealthConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        let g = &self.generator;
        let weight_sets: [(&str, &[f64]); 4] = [
            ("tier_weights", &g.tier_weights),
            ("order_status_weights", &g.order_status_weights),
            ("ticket_priority_weights", &g.ticket_priority_weights),
            ("ticket_status_weights", &g.ticket_status_weights),
        ];
        for (name, weights) in weight_sets {
            if weights.iter().any(|w| *w < 0.0 || !w.is_finite()) {
                anyhow::bail!("generator.{name} must be finite and non-negative");
            }
            if weights.iter().sum::<f64>() <= 0.0 {
                anyhow::bail!("generator.{name} must not sum to zero");
            }
        }
        for (name, mean) in [
            ("mean_orders", g.mean_orders),
            ("mean_tickets", g.mean_tickets),
            ("mean_feedback", g.mean_feedback),
        ] {
            if mean < 0.0 || !mean.is_finite() {
                anyhow::bail!("generator.{name} must be finite and non-negative");
            }
        }
        if g.max_items_per_order == 0 || g.max_resolution_hours == 0 {
            anyhow::bail!("generator item and resolution-hour maxima must be positive");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_all_defaults() {
        let config = HealthConfig::from_json("{}").unwrap();
        assert_eq!(config, HealthConfig::default());
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config = HealthConfig::from_json(r#"{"generator": {"mean_orders": 8.0}}"#).unwrap();
        assert_eq!(config.generator.mean_orders, 8.0);
        assert_eq!(config.generator.mean_tickets, 1.0);
        assert_eq!(config.query.default_page_size, 100);
    }

    #[test]
    fn negative_weights_rejected() {
        let err = HealthConfig::from_json(r#"{"generator": {"tier_weights": [1, -1, 0, 0]}}"#);
        assert!(err.is_err());
    }
}
