//! Failure classification and remediation guidance.
//!
//! The bundler stack reports failures as strings, so classification is
//! string matching over the cause text. The patterns live in one
//! ordered table, most specific first; the first containment match
//! wins. Total and deterministic: every cause maps to exactly one kind.

use alloy::primitives::Address;

/// What went wrong, as far as the cause text reveals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Deadline exceeded. Retryable; may also indicate service trouble.
    Timeout,
    /// Account balance can't cover gas. Needs funding, not a retry.
    InsufficientFunds,
    /// The sponsorship policy id is unknown to the paymaster.
    PolicyNotFound,
    /// Anything else.
    Generic,
}

/// Ordered classification table; first containment match wins.
const CLASSIFICATION_TABLE: &[(&str, FailureKind)] = &[
    ("timed out", FailureKind::Timeout),
    ("insufficient funds", FailureKind::InsufficientFunds),
    ("Policy ID(s) not found", FailureKind::PolicyNotFound),
];

/// Classify a failure by its cause text.
pub fn classify_failure(cause: &str) -> FailureKind {
    CLASSIFICATION_TABLE
        .iter()
        .find(|(pattern, _)| cause.contains(pattern))
        .map(|(_, kind)| *kind)
        .unwrap_or(FailureKind::Generic)
}

/// Remediation checklist for a failure class.
///
/// Presentation only; `account` is interpolated where the original
/// guidance names the user's address.
pub fn remediation(kind: FailureKind, account: Address) -> Vec<String> {
    match kind {
        FailureKind::Timeout => vec![
            "Check that your Alchemy API key is valid and has access to the Sepolia network"
                .to_string(),
            "Ensure your account has sufficient Sepolia ETH (at least 0.01 ETH recommended)"
                .to_string(),
            "Try again with a longer timeout or restart the process".to_string(),
            "Check Alchemy's status page for ongoing issues: https://status.alchemy.com/"
                .to_string(),
            "Note: a timed-out operation was abandoned, not cancelled; it may still land \
             on-chain later"
                .to_string(),
        ],
        FailureKind::InsufficientFunds => vec![
            "Your account doesn't have enough Sepolia ETH to pay for gas".to_string(),
            "Get some test ETH from: https://sepoliafaucet.com/".to_string(),
            format!("Your account address: {}", account),
        ],
        FailureKind::PolicyNotFound => vec![
            "The gas sponsorship policy id was not recognized".to_string(),
            "Check ALCHEMY_GAS_POLICY_ID against your dashboard and make sure the policy \
             is active and attached to this API key"
                .to_string(),
        ],
        FailureKind::Generic => vec![
            "Check that your network connection is stable".to_string(),
            "Check that your Alchemy API key has access to Sepolia testnet".to_string(),
            "Check that you have enough Sepolia ETH in your account".to_string(),
            format!("Your account address: {}", account),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACCOUNT: Address = Address::ZERO;

    #[test]
    fn test_timed_out_classifies_as_timeout() {
        assert_eq!(
            classify_failure("Operation timed out after 60 seconds"),
            FailureKind::Timeout
        );
    }

    #[test]
    fn test_insufficient_funds() {
        assert_eq!(
            classify_failure("err: insufficient funds for gas * price + value"),
            FailureKind::InsufficientFunds
        );
    }

    #[test]
    fn test_policy_not_found() {
        assert_eq!(
            classify_failure("Policy ID(s) not found: pol-abc"),
            FailureKind::PolicyNotFound
        );
    }

    #[test]
    fn test_unmatched_is_generic() {
        assert_eq!(classify_failure("connection reset by peer"), FailureKind::Generic);
        assert_eq!(classify_failure(""), FailureKind::Generic);
    }

    #[test]
    fn test_patterns_are_case_sensitive_as_written() {
        // The table matches exact substrings; a differently-cased
        // variant falls through to Generic rather than guessing.
        assert_eq!(classify_failure("TIMED OUT"), FailureKind::Generic);
        assert_eq!(classify_failure("policy id(s) not found"), FailureKind::Generic);
    }

    #[test]
    fn test_table_precedence_is_first_match() {
        // A message containing two patterns resolves to the earlier
        // table entry.
        assert_eq!(
            classify_failure("request timed out: insufficient funds"),
            FailureKind::Timeout
        );
    }

    #[test]
    fn test_classification_is_total() {
        for cause in ["timed out", "insufficient funds", "Policy ID(s) not found", "x", ""] {
            // Just must not panic; every input maps to some kind.
            let _ = classify_failure(cause);
        }
    }

    #[test]
    fn test_remediation_mentions_account_when_funding_needed() {
        let lines = remediation(FailureKind::InsufficientFunds, ACCOUNT);
        assert!(lines.iter().any(|l| l.contains(&ACCOUNT.to_string())));
        let lines = remediation(FailureKind::Generic, ACCOUNT);
        assert!(lines.iter().any(|l| l.contains(&ACCOUNT.to_string())));
    }

    #[test]
    fn test_every_kind_has_guidance() {
        for kind in [
            FailureKind::Timeout,
            FailureKind::InsufficientFunds,
            FailureKind::PolicyNotFound,
            FailureKind::Generic,
        ] {
            assert!(!remediation(kind, ACCOUNT).is_empty());
        }
    }
}
