//! Synthetic demo population: customers with orders, tickets and feedback.
//!
//! Every draw comes from seeded `DemoRng` streams and every date is relative
//! to the injected clock, so (seed, clock) fully determines the dataset.
//! Each customer is scored before it is handed back.

use crate::{
    activity::{
        FeedbackRating, IssueType, OrderRecord, OrderStatus, SupportTicket, TicketPriority,
        TicketStatus,
    },
    config::GeneratorConfig,
    customer::{CustomerProfile, CustomerTier, Region},
    health_scorer::HealthScorer,
    name_generator::NameGenerator,
    rng::{DemoRng, RngBank, StreamSlot},
    snapshot::CustomerActivitySnapshot,
    types::round2,
};
use chrono::{Days, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

const ORDER_STATUSES: [OrderStatus; 3] =
    [OrderStatus::Completed, OrderStatus::Cancelled, OrderStatus::Refunded];
const ISSUE_TYPES: [IssueType; 3] = [IssueType::Technical, IssueType::Billing, IssueType::General];
const PRIORITIES: [TicketPriority; 3] =
    [TicketPriority::Low, TicketPriority::Medium, TicketPriority::High];
const TICKET_STATUSES: [TicketStatus; 3] =
    [TicketStatus::Open, TicketStatus::InProgress, TicketStatus::Resolved];
const MAX_COMMENT_CHARS: usize = 200;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SampleDataset {
    pub customers: Vec<CustomerProfile>,
    pub orders:    Vec<OrderRecord>,
    pub tickets:   Vec<SupportTicket>,
    pub feedback:  Vec<FeedbackRating>,
}

pub struct DataGenerator {
    config: GeneratorConfig,
    scorer: HealthScorer,
}

struct Streams {
    profile:  DemoRng,
    orders:   DemoRng,
    tickets:  DemoRng,
    feedback: DemoRng,
}

impl DataGenerator {
    pub fn new(config: GeneratorConfig, scorer: HealthScorer) -> Self {
        Self { config, scorer }
    }

    pub fn generate(&self, num_customers: usize, seed: u64) -> SampleDataset {
        let bank = RngBank::new(seed);
        let mut streams = Streams {
            profile:  bank.for_stream(StreamSlot::Profile),
            orders:   bank.for_stream(StreamSlot::Orders),
            tickets:  bank.for_stream(StreamSlot::Tickets),
            feedback: bank.for_stream(StreamSlot::Feedback),
        };
        let today = self.scorer.clock().today();
        let mut dataset = SampleDataset::default();

        for _ in 0..num_customers {
            self.generate_customer(&mut streams, today, &mut dataset);
        }

        log::info!(
            "generator: seed={seed} customers={} orders={} tickets={} feedback={}",
            dataset.customers.len(),
            dataset.orders.len(),
            dataset.tickets.len(),
            dataset.feedback.len(),
        );
        dataset
    }

    fn generate_customer(&self, s: &mut Streams, today: NaiveDate, out: &mut SampleDataset) {
        let cfg = &self.config;
        let customer_id = new_id(&mut s.profile);
        let contact = NameGenerator::generate_contact(&mut s.profile);
        let back = s.profile.between(0, cfg.registration_window_days) as u64;
        let registered = today.checked_sub_days(Days::new(back)).unwrap_or(today);
        let customer_tier = CustomerTier::ALL[s.profile.weighted_index(&cfg.tier_weights)];
        let region = *s.profile.pick(&Region::ALL);

        let orders: Vec<OrderRecord> = (0..s.orders.poisson(cfg.mean_orders))
            .map(|_| OrderRecord {
                order_id:     new_id(&mut s.orders),
                customer_id:  customer_id.clone(),
                order_date:   date_between(&mut s.orders, registered, today),
                total_amount: round2(s.orders.lognormal(cfg.order_amount_mu, cfg.order_amount_sigma)),
                items_count:  s.orders.between(1, cfg.max_items_per_order),
                status:       ORDER_STATUSES[s.orders.weighted_index(&cfg.order_status_weights)],
            })
            .collect();

        let tickets: Vec<SupportTicket> = (0..s.tickets.poisson(cfg.mean_tickets))
            .map(|_| {
                let created_date = date_between(&mut s.tickets, registered, today);
                let issue_type = *s.tickets.pick(&ISSUE_TYPES);
                let priority = PRIORITIES[s.tickets.weighted_index(&cfg.ticket_priority_weights)];
                let status = TICKET_STATUSES[s.tickets.weighted_index(&cfg.ticket_status_weights)];
                let resolution_time = s
                    .tickets
                    .chance(cfg.resolution_time_probability)
                    .then(|| s.tickets.between(1, cfg.max_resolution_hours));
                SupportTicket {
                    ticket_id: new_id(&mut s.tickets),
                    customer_id: customer_id.clone(),
                    created_date,
                    issue_type,
                    priority,
                    status,
                    resolution_time,
                }
            })
            .collect();

        let feedback: Vec<FeedbackRating> = (0..s.feedback.poisson(cfg.mean_feedback))
            .map(|_| {
                let rating = s.feedback.between(1, 5) as u8;
                FeedbackRating {
                    feedback_id: new_id(&mut s.feedback),
                    customer_id: customer_id.clone(),
                    rating,
                    comment: NameGenerator::generate_comment(&mut s.feedback, rating, MAX_COMMENT_CHARS),
                    date: date_between(&mut s.feedback, registered, today),
                    product_id: new_id(&mut s.feedback),
                }
            })
            .collect();

        let snapshot = CustomerActivitySnapshot::from_activity(&orders, &tickets, &feedback);
        let assessment = self.scorer.score(&snapshot);
        log::debug!(
            "generator: {customer_id} score={} risk={}",
            assessment.health_score,
            assessment.churn_risk.as_str()
        );

        let mut profile = CustomerProfile {
            customer_id,
            name: contact.name,
            email: contact.email,
            phone: contact.phone,
            registration_date: midnight(registered),
            customer_tier,
            region,
            total_orders: 0,
            total_spent: 0.0,
            last_order_date: None,
            support_tickets: 0,
            avg_rating: 0.0,
            health_score: 0.0,
            churn_risk: assessment.churn_risk,
            lifetime_value: 0.0,
            score_breakdown: Default::default(),
        };
        profile.apply(snapshot, assessment);

        out.customers.push(profile);
        out.orders.extend(orders);
        out.tickets.extend(tickets);
        out.feedback.extend(feedback);
    }
}

/// Reproducible UUID v4 built from stream bytes.
fn new_id(rng: &mut DemoRng) -> String {
    uuid::Builder::from_random_bytes(rng.bytes16())
        .into_uuid()
        .to_string()
}

/// Midnight of a day drawn uniformly from [from, to].
fn date_between(rng: &mut DemoRng, from: NaiveDate, to: NaiveDate) -> NaiveDateTime {
    let span = (to - from).num_days().max(0) as u32;
    let offset = rng.between(0, span) as u64;
    midnight(from.checked_add_days(Days::new(offset)).unwrap_or(to))
}

fn midnight(day: NaiveDate) -> NaiveDateTime {
    day.and_time(chrono::NaiveTime::MIN)
}
