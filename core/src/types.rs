//! Shared primitive types used across the health engine.

/// Stable identifier of a customer (UUID text).
pub type CustomerId = String;

/// Stable identifier of an order, ticket, feedback row or product.
pub type EntityId = String;

/// Round to two decimal places, the precision every published figure uses.
/// Exact halves go to the even digit.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

#[cfg(test)]
mod tests {
    use super::round2;

    #[test]
    fn round2_keeps_two_decimals() {
        assert_eq!(round2(10.0), 10.0);
        assert_eq!(round2(1.234), 1.23);
        assert_eq!(round2(1.236), 1.24);
        assert_eq!(round2(-3.333), -3.33);
    }

    #[test]
    fn round2_sends_halves_to_even() {
        assert_eq!(round2(0.125), 0.12);
        assert_eq!(round2(2.125), 2.12);
        assert_eq!(round2(0.375), 0.38);
        assert_eq!(round2(12.5), 12.5);
    }
}
