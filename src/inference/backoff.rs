use std::time::Duration;

/// Wait before retrying after a `429`: grows linearly with the attempt number.
///
/// `attempt` is 1-based; attempt 0 is treated as attempt 1.
pub fn rate_limit_delay(attempt: u32, base_delay: Duration) -> Duration {
    base_delay.saturating_mul(attempt.max(1))
}
