//! Churn-factor explanation: fixed rule order, 1:1 recommendations, and the
//! edge cases around the last-order date.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use health_core::{
    activity::FeedbackRating, churn_explainer::churn_probability, ChurnExplainer, ChurnFactor,
    CustomerActivitySnapshot, EvalClock, HealthScorer, OrderTimestamp, ScoreFactor,
};

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 15)
        .and_then(|d| d.and_hms_opt(18, 0, 0))
        .unwrap()
}

fn clock() -> EvalClock {
    EvalClock::fixed(now())
}

fn snapshot(days_ago: Option<i64>, orders: u32, tickets: u32, rating: f64) -> CustomerActivitySnapshot {
    CustomerActivitySnapshot {
        last_order_date: days_ago.map(|d| OrderTimestamp::At(now() - Duration::days(d))),
        total_orders:    orders,
        total_spent:     orders as f64 * 40.0,
        support_tickets: tickets,
        avg_rating:      rating,
    }
}

fn explain(snap: &CustomerActivitySnapshot) -> health_core::ChurnFactorReport {
    let assessment = HealthScorer::new(clock()).score(snap);
    ChurnExplainer::new(clock()).explain(snap, &assessment)
}

/// One order, five tickets, 2★, last order 120 days ago: every rule fires.
#[test]
fn all_four_factors_fire_in_fixed_order() {
    let report = explain(&snapshot(Some(120), 1, 5, 2.0));

    assert_eq!(
        report.key_factors(),
        vec![
            "Low purchase frequency",
            "High support ticket volume",
            "Low product satisfaction",
            "No recent purchases",
        ]
    );
    assert_eq!(
        report.recommended_actions(),
        vec![
            "Send personalized product recommendations",
            "Assign dedicated account manager",
            "Offer product training or alternatives",
            "Send re-engagement campaign with discount",
        ]
    );
}

#[test]
fn healthy_customer_has_no_factors() {
    let report = explain(&snapshot(Some(3), 8, 1, 4.5));
    assert!(report.is_empty());
    assert!(report.key_factors().is_empty());
    assert!(report.recommended_actions().is_empty());
}

#[test]
fn every_subset_keeps_rule_order() {
    let order = [
        ChurnFactor::LowPurchaseFrequency,
        ChurnFactor::HighSupportTicketVolume,
        ChurnFactor::LowProductSatisfaction,
        ChurnFactor::NoRecentPurchases,
    ];

    for mask in 0u8..16 {
        let snap = snapshot(
            Some(if mask & 8 != 0 { 91 } else { 90 }),
            if mask & 1 != 0 { 1 } else { 2 },
            if mask & 2 != 0 { 4 } else { 3 },
            if mask & 4 != 0 { 2.99 } else { 3.0 },
        );
        let report = explain(&snap);

        let expected: Vec<_> = order
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, f)| *f)
            .collect();
        assert_eq!(report.factors, expected, "mask {mask:04b}");
        assert!(report.factors.len() <= 4);

        let actions: Vec<_> = expected.iter().map(|f| f.recommendation().to_string()).collect();
        assert_eq!(report.recommended_actions(), actions);
    }
}

/// A customer who never ordered trips the frequency rule only, never the
/// recency rule.
#[test]
fn never_ordered_is_not_a_recency_factor() {
    let report = explain(&snapshot(None, 0, 0, 4.0));
    assert_eq!(report.factors, vec![ChurnFactor::LowPurchaseFrequency]);
}

#[test]
fn unparseable_date_skips_recency_rule() {
    let mut snap = snapshot(None, 5, 0, 4.0);
    snap.last_order_date = Some(OrderTimestamp::Text("31/02/2023".into()));
    let report = explain(&snap);

    assert!(report.factors.is_empty());
    // The scorer degraded on the same input, so the probability is maximal.
    assert_eq!(report.churn_probability, 1.0);
}

#[test]
fn future_dated_order_is_recent() {
    let report = explain(&snapshot(Some(-200), 5, 0, 4.0));
    assert!(!report.factors.contains(&ChurnFactor::NoRecentPurchases));
}

#[test]
fn probability_tracks_health_score() {
    let snap = CustomerActivitySnapshot::default();
    let report = explain(&snap);
    assert_eq!(report.churn_probability, 0.9);
    assert_eq!(churn_probability(100.0), 0.0);
    assert_eq!(churn_probability(62.5), 0.38);
}

/// Published figures round exact halves to the even digit.
#[test]
fn exact_halves_round_to_even() {
    assert_eq!(churn_probability(87.5), 0.12);

    // 17 / 8 = 2.125
    let feedback: Vec<FeedbackRating> = [3u8, 2, 2, 2, 2, 2, 2, 2]
        .iter()
        .enumerate()
        .map(|(i, &rating)| FeedbackRating {
            feedback_id: format!("f-{i}"),
            customer_id: "c-1".into(),
            rating,
            comment:     String::new(),
            date:        now() - Duration::days(i as i64),
            product_id:  "p-1".into(),
        })
        .collect();
    let snap = CustomerActivitySnapshot::from_activity(&[], &[], &feedback);
    assert_eq!(snap.avg_rating, 2.12);

    let assessment = HealthScorer::new(clock()).score(&snap);
    assert_eq!(assessment.score_breakdown.get(ScoreFactor::Rating), Some(4.24));
    assert_eq!(assessment.health_score, 14.24);
}
