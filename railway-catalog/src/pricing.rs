use serde::{Deserialize, Serialize};

/// Surcharges applied at checkout, in whole percent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckoutRates {
    pub convenience_fee_percent: u32,
    pub gst_percent: u32,
}

impl Default for CheckoutRates {
    fn default() -> Self {
        Self {
            convenience_fee_percent: 2,
            gst_percent: 5,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutBreakdown {
    pub base_amount: i64,
    pub convenience_fee: i64,
    pub gst: i64,
    pub final_amount: i64,
}

/// Derives fee, tax and total from a base fare.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckoutCalculator {
    rates: CheckoutRates,
}

impl CheckoutCalculator {
    pub fn new(rates: CheckoutRates) -> Self {
        Self { rates }
    }

    pub fn rates(&self) -> CheckoutRates {
        self.rates
    }

    /// GST is charged on the base plus the convenience fee. Assumes `base >= 0`.
    pub fn breakdown(&self, base: i64) -> CheckoutBreakdown {
        let convenience_fee = percent_of(base, self.rates.convenience_fee_percent);
        let gst = percent_of(base + convenience_fee, self.rates.gst_percent);

        CheckoutBreakdown {
            base_amount: base,
            convenience_fee,
            gst,
            final_amount: base + convenience_fee + gst,
        }
    }
}

/// Fare for `seat_count` seats at `price_per_seat`.
pub fn seat_total(seat_count: usize, price_per_seat: i64) -> i64 {
    seat_count as i64 * price_per_seat
}

/// `round(amount * percent / 100)`, halves rounded up, in integer arithmetic.
fn percent_of(amount: i64, percent: u32) -> i64 {
    (amount * percent as i64 + 50).div_euclid(100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakdown_for_nine_hundred() {
        let b = CheckoutCalculator::default().breakdown(900);
        assert_eq!(b.convenience_fee, 18);
        assert_eq!(b.gst, 46);
        assert_eq!(b.final_amount, 964);
    }

    #[test]
    fn test_zero_base() {
        let b = CheckoutCalculator::default().breakdown(0);
        assert_eq!(b, CheckoutBreakdown { base_amount: 0, convenience_fee: 0, gst: 0, final_amount: 0 });
    }

    #[test]
    fn test_half_rounds_up() {
        // 25 * 2% = 0.5 -> 1; (25 + 1) * 5% = 1.3 -> 1
        let b = CheckoutCalculator::default().breakdown(25);
        assert_eq!(b.convenience_fee, 1);
        assert_eq!(b.gst, 1);
        assert_eq!(b.final_amount, 27);

        // 10 * 5% = 0.5 -> 1
        assert_eq!(percent_of(10, 5), 1);
        assert_eq!(percent_of(9, 5), 0);
    }

    #[test]
    fn test_matches_float_formula() {
        let calc = CheckoutCalculator::default();
        for base in (0..5000).step_by(7) {
            let b = calc.breakdown(base);
            let fee = (base as f64 * 0.02 + 0.5).floor() as i64;
            let gst = ((base + fee) as f64 * 0.05 + 0.5).floor() as i64;
            assert_eq!(b.convenience_fee, fee, "base {}", base);
            assert_eq!(b.gst, gst, "base {}", base);
            assert_eq!(b.final_amount, base + fee + gst);
        }
    }

    #[test]
    fn test_custom_rates() {
        let calc = CheckoutCalculator::new(CheckoutRates { convenience_fee_percent: 0, gst_percent: 10 });
        assert_eq!(calc.breakdown(840).final_amount, 924);
    }

    #[test]
    fn test_seat_total() {
        assert_eq!(seat_total(2, 420), 840);
        assert_eq!(seat_total(0, 420), 0);
    }
}
