//! Deadline-guarded user operation submission.

use std::future::Future;
use std::time::Duration;

use tokio::time::timeout;

use crate::bundler::types::{BundlerError, BundlerResult, UserOperationHash};

/// Result of one submission attempt. Created once, never mutated; the
/// caller consumes it to pick the next action.
#[derive(Debug)]
pub enum SubmissionOutcome {
    /// The bundler accepted the operation before the deadline.
    Success(UserOperationHash),
    /// The deadline elapsed first. The in-flight submission was dropped,
    /// not cancelled; see [`OperationRunner::run`].
    TimedOut,
    /// The submission itself failed before the deadline.
    Failed(BundlerError),
}

impl SubmissionOutcome {
    /// True when the attempt produced a handle to wait on.
    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionOutcome::Success(_))
    }
}

/// Runs a single submission attempt under a wall-clock deadline.
///
/// Stateless; one instance can drive any number of sequential attempts.
#[derive(Debug, Clone, Copy)]
pub struct OperationRunner {
    deadline: Duration,
}

impl OperationRunner {
    /// Create a runner with the given deadline.
    pub fn new(deadline: Duration) -> Self {
        Self { deadline }
    }

    /// The configured deadline.
    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    /// Race one submission against the deadline; first completion wins.
    ///
    /// `submit` is invoked exactly once. No retries happen here. When
    /// the timer wins, the submission future is dropped at its next
    /// suspension point; the HTTP request already on the wire is NOT
    /// aborted and the operation may still reach the bundler and land
    /// on-chain after this returns `TimedOut`. Known limitation, kept
    /// deliberate: the transport offers no true cancellation primitive.
    pub async fn run<F, Fut>(&self, submit: F) -> SubmissionOutcome
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = BundlerResult<UserOperationHash>>,
    {
        match timeout(self.deadline, submit()).await {
            Ok(Ok(hash)) => SubmissionOutcome::Success(hash),
            Ok(Err(cause)) => SubmissionOutcome::Failed(cause),
            Err(_) => SubmissionOutcome::TimedOut,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::B256;

    fn handle() -> UserOperationHash {
        UserOperationHash(B256::repeat_byte(0xab))
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_before_deadline() {
        let runner = OperationRunner::new(Duration::from_secs(60));
        let outcome = runner
            .run(|| async {
                tokio::time::sleep(Duration::from_millis(10)).await;
                Ok(handle())
            })
            .await;
        assert!(matches!(outcome, SubmissionOutcome::Success(h) if h == handle()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_elapses_first() {
        let runner = OperationRunner::new(Duration::from_millis(50));
        // A submission that never resolves; the timer must decide.
        let outcome = runner
            .run(|| async {
                std::future::pending::<()>().await;
                Ok(handle())
            })
            .await;
        assert!(matches!(outcome, SubmissionOutcome::TimedOut));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_success_still_times_out() {
        // Submission would succeed, but only after the deadline; the
        // outcome must be TimedOut regardless of what it would return.
        let runner = OperationRunner::new(Duration::from_secs(1));
        let outcome = runner
            .run(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(handle())
            })
            .await;
        assert!(matches!(outcome, SubmissionOutcome::TimedOut));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_passes_through() {
        let runner = OperationRunner::new(Duration::from_secs(60));
        let outcome = runner
            .run(|| async { Err(BundlerError::Rpc("insufficient funds for gas".into())) })
            .await;
        match outcome {
            SubmissionOutcome::Failed(cause) => {
                assert!(cause.to_string().contains("insufficient funds"));
            }
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_runner_is_reusable() {
        // Stateless: the same runner drives independent attempts.
        let runner = OperationRunner::new(Duration::from_millis(50));
        let first = runner
            .run(|| async {
                std::future::pending::<()>().await;
                Ok(handle())
            })
            .await;
        let second = runner.run(|| async { Ok(handle()) }).await;
        assert!(matches!(first, SubmissionOutcome::TimedOut));
        assert!(second.is_success());
    }
}
