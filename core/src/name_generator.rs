//! Deterministic contact details and feedback text for demo customers.
//!
//! Same RNG stream in, same names, emails, phones and comments out.

use crate::rng::DemoRng;

pub struct ContactDetails {
    pub name:  String,
    pub email: String,
    pub phone: String,
}

pub struct NameGenerator;

impl NameGenerator {
    pub fn generate_contact(rng: &mut DemoRng) -> ContactDetails {
        let first = *rng.pick(FIRST_NAMES);
        let last = *rng.pick(LAST_NAMES);
        let domain = *rng.pick(EMAIL_DOMAINS);
        let suffix = rng.next_u64_below(100);
        ContactDetails {
            name:  format!("{first} {last}"),
            email: format!(
                "{}.{}{suffix:02}@{domain}",
                first.to_ascii_lowercase(),
                last.to_ascii_lowercase()
            ),
            phone: Self::generate_phone(rng),
        }
    }

    /// North American format in the reserved 555-01xx exchange.
    pub fn generate_phone(rng: &mut DemoRng) -> String {
        let area = rng.between(201, 989);
        let line = rng.next_u64_below(100);
        format!("({area}) 555-01{line:02}")
    }

    /// A short review comment, at most `max_chars` characters.
    pub fn generate_comment(rng: &mut DemoRng, rating: u8, max_chars: usize) -> String {
        let opener = match rating {
            0..=2 => *rng.pick(NEGATIVE_OPENERS),
            3 => *rng.pick(NEUTRAL_OPENERS),
            _ => *rng.pick(POSITIVE_OPENERS),
        };
        let detail = *rng.pick(DETAILS);
        let mut comment = format!("{opener} {detail}");
        if comment.len() > max_chars {
            comment.truncate(max_chars);
        }
        comment
    }
}

const FIRST_NAMES: &[&str] = &[
    "James", "Mary", "Robert", "Patricia", "John", "Jennifer", "Michael", "Linda",
    "David", "Elizabeth", "William", "Barbara", "Richard", "Susan", "Joseph", "Jessica",
    "Thomas", "Sarah", "Charles", "Karen", "Daniel", "Nancy", "Matthew", "Lisa",
    "Anthony", "Betty", "Mark", "Sandra", "Steven", "Ashley", "Andrew", "Emily",
    "Joshua", "Michelle", "Kevin", "Amanda", "Brian", "Melissa", "George", "Laura",
    "Priya", "Wei", "Fatima", "Mateo", "Aiko", "Olusegun", "Ingrid", "Rafael",
];

const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis",
    "Rodriguez", "Martinez", "Hernandez", "Lopez", "Gonzalez", "Wilson", "Anderson", "Thomas",
    "Taylor", "Moore", "Jackson", "Martin", "Lee", "Perez", "Thompson", "White",
    "Harris", "Clark", "Lewis", "Robinson", "Walker", "Young", "Patel", "Nguyen",
    "Kim", "Chen", "Okafor", "Silva", "Novak", "Schmidt", "Tanaka", "Kowalski",
];

const EMAIL_DOMAINS: &[&str] = &["example.com", "example.net", "example.org", "mail.test"];

const POSITIVE_OPENERS: &[&str] = &[
    "Really happy with this purchase.",
    "Exceeded my expectations.",
    "Would buy again without hesitation.",
    "Great value for the price.",
];

const NEUTRAL_OPENERS: &[&str] = &[
    "It does the job.",
    "Decent, nothing special.",
    "Mixed feelings overall.",
];

const NEGATIVE_OPENERS: &[&str] = &[
    "Disappointed with the quality.",
    "Not what I expected.",
    "Had problems from day one.",
    "Would not recommend.",
];

const DETAILS: &[&str] = &[
    "Delivery took longer than promised.",
    "Setup was straightforward.",
    "Support answered my question quickly.",
    "The packaging was damaged on arrival.",
    "Battery life could be better.",
    "Instructions were hard to follow.",
    "Colour matches the photos.",
    "Feels sturdy and well made.",
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{RngBank, StreamSlot};

    #[test]
    fn contact_generation_is_deterministic() {
        let mut a = RngBank::new(12345).for_stream(StreamSlot::Profile);
        let mut b = RngBank::new(12345).for_stream(StreamSlot::Profile);
        let ca = NameGenerator::generate_contact(&mut a);
        let cb = NameGenerator::generate_contact(&mut b);
        assert_eq!(ca.name, cb.name);
        assert_eq!(ca.email, cb.email);
        assert_eq!(ca.phone, cb.phone);
    }

    #[test]
    fn contacts_are_well_formed() {
        let mut rng = RngBank::new(99).for_stream(StreamSlot::Profile);
        for _ in 0..100 {
            let c = NameGenerator::generate_contact(&mut rng);
            assert_eq!(c.name.split_whitespace().count(), 2, "name: {}", c.name);
            assert_eq!(c.email.matches('@').count(), 1, "email: {}", c.email);
            assert!(c.phone.starts_with('(') && c.phone.len() == 14, "phone: {}", c.phone);
        }
    }

    #[test]
    fn comments_respect_length_cap() {
        let mut rng = RngBank::new(1).for_stream(StreamSlot::Feedback);
        for rating in 1..=5u8 {
            let comment = NameGenerator::generate_comment(&mut rng, rating, 20);
            assert!(comment.len() <= 20);
            assert!(!comment.is_empty());
        }
    }
}
