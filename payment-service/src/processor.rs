// ============================================================================
// Payment processor simulation
// ============================================================================
//
// No real money moves here. The processor sleeps to mimic gateway latency and
// rolls an outcome whose success rate drops as the amount grows.
//
// ============================================================================

use rand::Rng;
use std::time::Duration;

const FAILURE_REASONS: &[&str] = &[
    "Insufficient funds",
    "Card declined",
    "Invalid card details",
    "Payment processor error",
    "Network timeout",
];

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Completed { transaction_id: String },
    Failed { reason: String },
}

#[derive(Clone)]
pub struct PaymentProcessor {
    delay: Duration,
    forced_outcome: Option<bool>,
}

impl PaymentProcessor {
    pub fn new() -> Self {
        Self {
            delay: Duration::from_secs(1),
            forced_outcome: None,
        }
    }

    /// Test hook: no latency, fixed outcome.
    #[cfg(test)]
    pub fn forced(success: bool) -> Self {
        Self {
            delay: Duration::ZERO,
            forced_outcome: Some(success),
        }
    }

    /// Larger charges fail more often.
    pub fn success_rate(amount: f64) -> f64 {
        if amount > 10_000.0 {
            0.7
        } else if amount > 1_000.0 {
            0.9
        } else {
            0.95
        }
    }

    pub async fn process(&self, amount: f64) -> Outcome {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let mut rng = rand::thread_rng();
        let success = self
            .forced_outcome
            .unwrap_or_else(|| rng.gen::<f64>() < Self::success_rate(amount));

        if success {
            Outcome::Completed {
                transaction_id: format!("TXN_{}", rng.gen_range(100_000..=999_999)),
            }
        } else {
            let reason = FAILURE_REASONS[rng.gen_range(0..FAILURE_REASONS.len())];
            Outcome::Failed {
                reason: reason.to_string(),
            }
        }
    }
}

impl Default for PaymentProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_rate_tiers() {
        assert_eq!(PaymentProcessor::success_rate(50.0), 0.95);
        assert_eq!(PaymentProcessor::success_rate(1_000.0), 0.95);
        assert_eq!(PaymentProcessor::success_rate(1_000.01), 0.9);
        assert_eq!(PaymentProcessor::success_rate(10_000.01), 0.7);
    }

    #[tokio::test]
    async fn forced_success_yields_a_transaction_id() {
        match PaymentProcessor::forced(true).process(100.0).await {
            Outcome::Completed { transaction_id } => {
                assert!(transaction_id.starts_with("TXN_"));
                assert_eq!(transaction_id.len(), "TXN_".len() + 6);
            }
            Outcome::Failed { .. } => panic!("forced success must not fail"),
        }
    }

    #[tokio::test]
    async fn forced_failure_names_a_reason() {
        match PaymentProcessor::forced(false).process(100.0).await {
            Outcome::Failed { reason } => assert!(FAILURE_REASONS.contains(&reason.as_str())),
            Outcome::Completed { .. } => panic!("forced failure must not succeed"),
        }
    }
}
