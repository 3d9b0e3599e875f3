//! Synthetic population: determinism, plausible shape, and scoring consistency.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use health_core::{
    activity::OrderStatus,
    config::GeneratorConfig,
    generator::{DataGenerator, SampleDataset},
    CustomerActivitySnapshot, EvalClock, HealthScorer,
};
use std::collections::HashSet;

// ── Helpers ──────────────────────────────────────────────────────────────────

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, 1)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .unwrap()
}

fn generate(n: usize, seed: u64) -> SampleDataset {
    let scorer = HealthScorer::new(EvalClock::fixed(now()));
    DataGenerator::new(GeneratorConfig::default(), scorer).generate(n, seed)
}

// ── Tests ────────────────────────────────────────────────────────────────────

/// Same seed and clock → identical dataset, down to ids and comments.
#[test]
fn same_seed_same_population() {
    assert_eq!(generate(40, 0xC0FFEE), generate(40, 0xC0FFEE));
}

#[test]
fn different_seeds_diverge() {
    let a = generate(20, 1);
    let b = generate(20, 2);
    assert_ne!(a.customers[0].customer_id, b.customers[0].customer_id);
}

#[test]
fn requested_population_size_is_honoured() {
    assert_eq!(generate(0, 9).customers.len(), 0);
    assert_eq!(generate(57, 9).customers.len(), 57);
}

#[test]
fn ids_are_unique_uuids() {
    let data = generate(100, 77);
    let mut seen = HashSet::new();
    let ids = data
        .customers
        .iter()
        .map(|c| &c.customer_id)
        .chain(data.orders.iter().map(|o| &o.order_id))
        .chain(data.tickets.iter().map(|t| &t.ticket_id))
        .chain(data.feedback.iter().map(|f| &f.feedback_id));
    for id in ids {
        assert!(uuid::Uuid::parse_str(id).is_ok(), "not a uuid: {id}");
        assert!(seen.insert(id.clone()), "duplicate id {id}");
    }
}

/// Activity dates fall between registration and today.
#[test]
fn activity_dates_within_customer_lifetime() {
    let data = generate(60, 5);
    let today = now().date();
    let earliest = today - Duration::days(730);

    for c in &data.customers {
        let reg = c.registration_date.date();
        assert!(reg >= earliest && reg <= today, "registration {reg}");

        for o in data.orders.iter().filter(|o| o.customer_id == c.customer_id) {
            let d = o.order_date.date();
            assert!(d >= reg && d <= today, "order {d} outside {reg}..={today}");
            assert!((1..=9).contains(&o.items_count));
            assert!(o.total_amount > 0.0);
        }
        for f in data.feedback.iter().filter(|f| f.customer_id == c.customer_id) {
            assert!((1..=5).contains(&f.rating));
            assert!(f.comment.len() <= 200);
        }
    }
}

/// The stored snapshot and assessment agree with the raw rows.
#[test]
fn customers_carry_their_own_assessment() {
    let data = generate(80, 31);
    let scorer = HealthScorer::new(EvalClock::fixed(now()));

    for c in &data.customers {
        let orders: Vec<_> = data.orders.iter().filter(|o| o.customer_id == c.customer_id).cloned().collect();
        let tickets: Vec<_> = data.tickets.iter().filter(|t| t.customer_id == c.customer_id).cloned().collect();
        let feedback: Vec<_> = data.feedback.iter().filter(|f| f.customer_id == c.customer_id).cloned().collect();

        let snapshot = CustomerActivitySnapshot::from_activity(&orders, &tickets, &feedback);
        assert_eq!(c.snapshot(), snapshot);
        assert_eq!(c.assessment(), scorer.score(&snapshot));

        let completed = orders.iter().filter(|o| o.status == OrderStatus::Completed).count();
        assert_eq!(c.total_orders as usize, completed);
        assert_eq!(c.support_tickets as usize, tickets.len());
    }
}

/// Means of ~5 orders, ~1 ticket and ~2 ratings per customer.
#[test]
fn population_shape_is_plausible() {
    let n = 500;
    let data = generate(n, 2024);
    let per = |count: usize| count as f64 / n as f64;

    assert!((per(data.orders.len()) - 5.0).abs() < 0.6, "orders/customer {}", per(data.orders.len()));
    assert!((per(data.tickets.len()) - 1.0).abs() < 0.25, "tickets/customer {}", per(data.tickets.len()));
    assert!((per(data.feedback.len()) - 2.0).abs() < 0.35, "feedback/customer {}", per(data.feedback.len()));

    let completed = data.orders.iter().filter(|o| o.status == OrderStatus::Completed).count();
    let share = completed as f64 / data.orders.len() as f64;
    assert!((share - 0.85).abs() < 0.05, "completed share {share}");
}
