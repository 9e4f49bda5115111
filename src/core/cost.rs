// src/core/cost.rs — Token cost estimation for quota accounting

/// Converts a successful provider exchange into the token count charged
/// against the session's quota. This is a quota unit, not provider billing.
pub trait TokenEstimator: Send + Sync {
    fn estimate(&self, scenario: &str, response: &str) -> u64;
}

/// `ceil(response_chars / chars_per_token)`. The scenario is not charged.
#[derive(Debug, Clone, Copy)]
pub struct CharRatioEstimator {
    chars_per_token: u32,
}

impl CharRatioEstimator {
    pub fn new(chars_per_token: u32) -> Self {
        Self {
            chars_per_token: chars_per_token.max(1),
        }
    }
}

impl Default for CharRatioEstimator {
    fn default() -> Self {
        Self::new(4)
    }
}

impl TokenEstimator for CharRatioEstimator {
    fn estimate(&self, _scenario: &str, response: &str) -> u64 {
        let chars = response.chars().count() as u64;
        chars.div_ceil(u64::from(self.chars_per_token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounds_up() {
        let est = CharRatioEstimator::default();
        assert_eq!(est.estimate("", ""), 0);
        assert_eq!(est.estimate("", "abc"), 1);
        assert_eq!(est.estimate("", "abcd"), 1);
        assert_eq!(est.estimate("", "abcde"), 2);
    }

    #[test]
    fn test_ignores_scenario() {
        let est = CharRatioEstimator::default();
        assert_eq!(est.estimate(&"x".repeat(1000), "abcd"), 1);
    }

    #[test]
    fn test_counts_chars_not_bytes() {
        let est = CharRatioEstimator::new(1);
        assert_eq!(est.estimate("", "héllo"), 5);
    }

    #[test]
    fn test_zero_ratio_clamped() {
        let est = CharRatioEstimator::new(0);
        assert_eq!(est.estimate("", "ab"), 2);
    }
}
