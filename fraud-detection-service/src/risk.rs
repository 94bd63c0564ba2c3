// ============================================================================
// Fraud analysis (mock)
// ============================================================================
//
// Layered risk signals: amount risk is deterministic (scaled against a $5000
// reference), geographic risk flags billing/shipping mismatches, temporal and
// user risk add bounded jitter standing in for real velocity and history
// checks. The weighted sum maps to a risk level and a recommendation.
//
// ============================================================================

use chrono::{Timelike, Utc};
use rand::Rng;
use serde_json::{json, Value};

pub const LOW_THRESHOLD: f64 = 0.3;
pub const MEDIUM_THRESHOLD: f64 = 0.6;
pub const HIGH_THRESHOLD: f64 = 0.8;

const AMOUNT_WEIGHT: f64 = 0.25;
const GEOGRAPHIC_WEIGHT: f64 = 0.20;
const TEMPORAL_WEIGHT: f64 = 0.15;
const USER_WEIGHT: f64 = 0.40;

fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

#[derive(Debug, Clone)]
pub struct Transaction {
    pub amount: f64,
    pub billing_country: String,
    pub shipping_country: String,
}

#[derive(Debug, Clone)]
pub struct RiskAnalysis {
    pub amount_risk: f64,
    pub geographic_risk: f64,
    pub temporal_risk: f64,
    pub user_risk: f64,
    pub detail: Value,
}

impl RiskAnalysis {
    pub fn overall(&self) -> f64 {
        round3(
            self.amount_risk * AMOUNT_WEIGHT
                + self.geographic_risk * GEOGRAPHIC_WEIGHT
                + self.temporal_risk * TEMPORAL_WEIGHT
                + self.user_risk * USER_WEIGHT,
        )
    }
}

pub fn analyze(tx: &Transaction) -> RiskAnalysis {
    let mut rng = rand::thread_rng();
    let now = Utc::now();
    let hour = now.hour();

    let amount_risk = (tx.amount / 5000.0).min(1.0);
    let is_high_value = tx.amount > 1000.0;
    let is_round_number = tx.amount % 100.0 == 0.0;

    let address_mismatch = tx.billing_country != tx.shipping_country;
    let geographic_risk = if address_mismatch { 0.6 } else { 0.1 };

    let is_unusual_hour = !(6..=23).contains(&hour);
    let velocity_jitter: f64 = rng.gen_range(0.0..0.3);
    let temporal_risk = (if is_unusual_hour { 0.4 } else { 0.1 } + velocity_jitter).min(1.0);

    // Stand-in for account age and prior incident checks
    let user_risk: f64 = rng.gen_range(0.0..0.4);

    let detail = json!({
        "amount_analysis": {
            "amount": tx.amount,
            "is_high_value": is_high_value,
            "is_round_number": is_round_number,
            "risk_score": round3(amount_risk),
        },
        "geographic_analysis": {
            "billing_country": tx.billing_country,
            "shipping_country": tx.shipping_country,
            "address_mismatch": address_mismatch,
            "risk_score": round3(geographic_risk),
        },
        "temporal_analysis": {
            "hour": hour,
            "is_unusual_hour": is_unusual_hour,
            "risk_score": round3(temporal_risk),
        },
        "user_analysis": {
            "risk_score": round3(user_risk),
        },
    });

    RiskAnalysis {
        amount_risk,
        geographic_risk,
        temporal_risk,
        user_risk,
        detail,
    }
}

/// Maps an overall score to (risk_level, recommendation).
pub fn assess(score: f64) -> (&'static str, &'static str) {
    if score < LOW_THRESHOLD {
        ("low", "approve")
    } else if score < MEDIUM_THRESHOLD {
        ("medium", "review")
    } else if score < HIGH_THRESHOLD {
        ("high", "manual_review")
    } else {
        ("critical", "decline")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assessment_thresholds() {
        assert_eq!(assess(0.0), ("low", "approve"));
        assert_eq!(assess(0.29), ("low", "approve"));
        assert_eq!(assess(0.3), ("medium", "review"));
        assert_eq!(assess(0.59), ("medium", "review"));
        assert_eq!(assess(0.6), ("high", "manual_review"));
        assert_eq!(assess(0.8), ("critical", "decline"));
        assert_eq!(assess(1.0), ("critical", "decline"));
    }

    fn tx(amount: f64, billing: &str, shipping: &str) -> Transaction {
        Transaction {
            amount,
            billing_country: billing.to_string(),
            shipping_country: shipping.to_string(),
        }
    }

    #[test]
    fn amount_risk_scales_and_caps() {
        assert_eq!(analyze(&tx(0.0, "US", "US")).amount_risk, 0.0);
        assert_eq!(analyze(&tx(2500.0, "US", "US")).amount_risk, 0.5);
        assert_eq!(analyze(&tx(50_000.0, "US", "US")).amount_risk, 1.0);
    }

    #[test]
    fn address_mismatch_raises_geographic_risk() {
        let matched = analyze(&tx(100.0, "US", "US"));
        let mismatched = analyze(&tx(100.0, "US", "FR"));
        assert!(mismatched.geographic_risk > matched.geographic_risk);
        assert_eq!(
            mismatched.detail["geographic_analysis"]["address_mismatch"],
            true
        );
    }

    #[test]
    fn overall_score_stays_in_unit_interval() {
        for _ in 0..50 {
            let score = analyze(&tx(100_000.0, "US", "ZZ")).overall();
            assert!((0.0..=1.0).contains(&score));
        }
    }

    #[test]
    fn small_domestic_charges_never_hit_critical() {
        // Worst case: 0.25*0.01 + 0.20*0.1 + 0.15*0.8 + 0.40*0.4 = 0.3025
        for _ in 0..50 {
            let score = analyze(&tx(50.0, "US", "US")).overall();
            assert!(score < HIGH_THRESHOLD);
        }
    }
}
