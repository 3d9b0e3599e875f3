//! The calling layer around the scoring core.
//!
//! Collects activity into snapshots, scores them, persists the assessment and
//! answers the dashboard queries. Every activity change triggers a full
//! recompute of the owning customer; nothing is updated incrementally.

use crate::{
    activity::{FeedbackRating, OrderRecord, SupportTicket},
    churn_explainer::ChurnExplainer,
    clock::EvalClock,
    config::HealthConfig,
    customer::{CustomerHealthView, CustomerProfile, CustomerTier, Region},
    error::{HealthError, HealthResult},
    generator::DataGenerator,
    health_scorer::{ChurnRisk, HealthAssessment, HealthScorer},
    metrics::{DashboardMetrics, RevenueTrend},
    store::{CustomerQuery, HealthStore},
    types::CustomerId,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChurnPrediction {
    pub customer_id:         CustomerId,
    pub name:                String,
    pub churn_probability:   f64,
    pub key_factors:         Vec<String>,
    pub recommended_actions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomerDetails {
    pub customer:        CustomerProfile,
    pub orders:          Vec<OrderRecord>,
    pub support_tickets: Vec<SupportTicket>,
    pub feedback:        Vec<FeedbackRating>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationSummary {
    pub customers: usize,
    pub orders:    usize,
    pub tickets:   usize,
    pub feedback:  usize,
}

/// Raw, unvalidated listing parameters as they arrive from a caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CustomerListRequest {
    pub skip:          Option<u32>,
    pub limit:         Option<u32>,
    pub churn_risk:    Option<String>,
    pub customer_tier: Option<String>,
    pub region:        Option<String>,
}

pub struct HealthService {
    store:     HealthStore,
    config:    HealthConfig,
    scorer:    HealthScorer,
    explainer: ChurnExplainer,
}

impl HealthService {
    pub fn new(store: HealthStore, config: HealthConfig, clock: EvalClock) -> Self {
        Self {
            store,
            config,
            scorer: HealthScorer::new(clock),
            explainer: ChurnExplainer::new(clock),
        }
    }

    /// In-memory store, default config, pinned clock.
    pub fn build_test(clock: EvalClock) -> HealthResult<Self> {
        let store = HealthStore::in_memory()?;
        store.migrate()?;
        Ok(Self::new(store, HealthConfig::default(), clock))
    }

    pub fn store(&self) -> &HealthStore {
        &self.store
    }

    pub fn config(&self) -> &HealthConfig {
        &self.config
    }

    pub fn scorer(&self) -> &HealthScorer {
        &self.scorer
    }

    // ── Demo data ──────────────────────────────────────────────

    /// Replace everything on file with a fresh synthetic population.
    pub fn generate_sample_data(
        &self,
        num_customers: usize,
        seed: u64,
    ) -> HealthResult<GenerationSummary> {
        let generator = DataGenerator::new(self.config.generator.clone(), self.scorer);
        let dataset = generator.generate(num_customers, seed);

        self.store.clear_all()?;
        self.store.insert_dataset(&dataset)?;

        log::info!("service: generated {} customers with related data", dataset.customers.len());
        Ok(GenerationSummary {
            customers: dataset.customers.len(),
            orders:    dataset.orders.len(),
            tickets:   dataset.tickets.len(),
            feedback:  dataset.feedback.len(),
        })
    }

    // ── Activity changes ───────────────────────────────────────

    pub fn register_customer(&self, mut customer: CustomerProfile) -> HealthResult<HealthAssessment> {
        let snapshot = customer.snapshot();
        let assessment = self.scorer.score(&snapshot);
        customer.apply(snapshot, assessment.clone());
        self.store.insert_customer(&customer)?;
        Ok(assessment)
    }

    pub fn record_order(&self, order: &OrderRecord) -> HealthResult<HealthAssessment> {
        self.require_customer(&order.customer_id)?;
        self.store.insert_order(order)?;
        self.rescore_customer(&order.customer_id)
    }

    pub fn record_ticket(&self, ticket: &SupportTicket) -> HealthResult<HealthAssessment> {
        self.require_customer(&ticket.customer_id)?;
        self.store.insert_ticket(ticket)?;
        self.rescore_customer(&ticket.customer_id)
    }

    pub fn record_feedback(&self, feedback: &FeedbackRating) -> HealthResult<HealthAssessment> {
        self.require_customer(&feedback.customer_id)?;
        self.store.insert_feedback(feedback)?;
        self.rescore_customer(&feedback.customer_id)
    }

    /// Rebuild the snapshot from stored activity and persist a fresh assessment.
    pub fn rescore_customer(&self, customer_id: &str) -> HealthResult<HealthAssessment> {
        let snapshot = self.store.activity_snapshot(customer_id)?;
        let assessment = self.scorer.score(&snapshot);
        self.store.update_assessment(customer_id, &snapshot, &assessment)?;
        log::debug!(
            "service: rescored {customer_id} score={} risk={}",
            assessment.health_score,
            assessment.churn_risk.as_str()
        );
        Ok(assessment)
    }

    /// Reassess every customer. Returns how many were rescored.
    pub fn rescore_all(&self) -> HealthResult<usize> {
        let ids = self.store.customer_ids()?;
        for id in &ids {
            self.rescore_customer(id)?;
        }
        log::info!("service: rescored {} customers", ids.len());
        Ok(ids.len())
    }

    // ── Queries ────────────────────────────────────────────────

    pub fn list_customers(&self, req: &CustomerListRequest) -> HealthResult<Vec<CustomerHealthView>> {
        let query = self.customer_query(req)?;
        let customers = self.store.query_customers(&query)?;
        Ok(customers.iter().map(CustomerHealthView::from).collect())
    }

    pub fn customer_details(&self, customer_id: &str) -> HealthResult<CustomerDetails> {
        let customer = self.require_customer(customer_id)?;
        Ok(CustomerDetails {
            orders:          self.store.orders_for(customer_id)?,
            support_tickets: self.store.tickets_for(customer_id)?,
            feedback:        self.store.feedback_for(customer_id)?,
            customer,
        })
    }

    pub fn dashboard_metrics(&self) -> HealthResult<DashboardMetrics> {
        let counts = self.store.risk_counts()?;
        let totals = self.store.revenue_totals()?;
        Ok(DashboardMetrics::from_aggregates(counts, totals))
    }

    /// The `limit` weakest High-risk customers with their explanation.
    pub fn churn_predictions(&self, limit: Option<u32>) -> HealthResult<Vec<ChurnPrediction>> {
        let limit = limit.unwrap_or(self.config.query.default_prediction_limit);
        let customers = self.store.high_risk_customers(limit)?;
        Ok(customers
            .iter()
            .map(|c| {
                let report = self.explainer.explain(&c.snapshot(), &c.assessment());
                ChurnPrediction {
                    customer_id:         c.customer_id.clone(),
                    name:                c.name.clone(),
                    churn_probability:   report.churn_probability,
                    key_factors:         report.key_factors(),
                    recommended_actions: report.recommended_actions(),
                }
            })
            .collect())
    }

    pub fn revenue_trends(&self) -> HealthResult<Vec<RevenueTrend>> {
        self.store.revenue_trends()
    }

    // ── Helpers ────────────────────────────────────────────────

    fn require_customer(&self, customer_id: &str) -> HealthResult<CustomerProfile> {
        self.store
            .get_customer(customer_id)?
            .ok_or_else(|| HealthError::CustomerNotFound {
                customer_id: customer_id.to_string(),
            })
    }

    fn customer_query(&self, req: &CustomerListRequest) -> HealthResult<CustomerQuery> {
        Ok(CustomerQuery {
            skip:          req.skip.unwrap_or(0),
            limit:         req.limit.unwrap_or(self.config.query.default_page_size),
            churn_risk:    parse_filter("churn_risk", req.churn_risk.as_deref(), ChurnRisk::parse)?,
            customer_tier: parse_filter("customer_tier", req.customer_tier.as_deref(), CustomerTier::parse)?,
            region:        parse_filter("region", req.region.as_deref(), Region::parse)?,
        })
    }
}

fn parse_filter<T>(
    field: &'static str,
    raw: Option<&str>,
    parse: fn(&str) -> Option<T>,
) -> HealthResult<Option<T>> {
    match raw {
        None => Ok(None),
        Some(value) => parse(value).map(Some).ok_or_else(|| HealthError::InvalidFilter {
            field,
            value: value.to_string(),
        }),
    }
}
