//! # Deadline Wrapper
//!
//! Proof verification is the one pluggable call in the core that may
//! legitimately block — a production verifier might reach a remote proving
//! service. [`DeadlineVerifier`] bounds any inner verifier with a
//! wall-clock budget: the inner call runs on a worker thread, and if the
//! verdict does not arrive in time the result is `false`.
//!
//! Timeout is treated as verification *failure*, never silent success —
//! the ledger stays closed when the verifier is unreachable.

use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::verifier::{ProofBundle, ProofVerifier};

/// Bounds an inner verifier with a wall-clock budget.
///
/// If the budget elapses, the worker thread is left to finish in the
/// background and its late verdict is discarded.
#[derive(Debug, Clone)]
pub struct DeadlineVerifier<V> {
    inner: Arc<V>,
    budget: Duration,
}

impl<V> DeadlineVerifier<V> {
    /// Wrap `inner` with the given verification budget.
    pub fn new(inner: V, budget: Duration) -> Self {
        Self {
            inner: Arc::new(inner),
            budget,
        }
    }

    /// The configured budget.
    pub fn budget(&self) -> Duration {
        self.budget
    }
}

impl<V> ProofVerifier for DeadlineVerifier<V>
where
    V: ProofVerifier + 'static,
{
    fn verify(&self, content_hash: &[u8], cultural_context: &str, proof: &ProofBundle) -> bool {
        let (tx, rx) = mpsc::channel();
        let inner = Arc::clone(&self.inner);
        let hash = content_hash.to_vec();
        let context = cultural_context.to_string();
        let proof = proof.clone();

        thread::spawn(move || {
            let verdict = inner.verify(&hash, &context, &proof);
            // Receiver may have timed out and dropped; a failed send is fine.
            let _ = tx.send(verdict);
        });

        rx.recv_timeout(self.budget).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structural::StructuralVerifier;

    /// Test double that sleeps before answering `true`.
    struct SlowVerifier {
        delay: Duration,
    }

    impl ProofVerifier for SlowVerifier {
        fn verify(&self, _hash: &[u8], _ctx: &str, _proof: &ProofBundle) -> bool {
            thread::sleep(self.delay);
            true
        }
    }

    fn bundle() -> ProofBundle {
        ProofBundle {
            proof_a: vec![1],
            proof_b: vec![2],
            proof_c: vec![3],
            public_signals: vec![4],
        }
    }

    #[test]
    fn fast_inner_verdict_passes_through() {
        let verifier = DeadlineVerifier::new(StructuralVerifier::new(), Duration::from_secs(5));
        assert!(verifier.verify(&[0u8; 32], "ctx", &bundle()));
        assert!(!verifier.verify(&[0u8; 7], "ctx", &bundle()));
    }

    #[test]
    fn timeout_is_verification_failure() {
        let slow = SlowVerifier {
            delay: Duration::from_secs(2),
        };
        let verifier = DeadlineVerifier::new(slow, Duration::from_millis(20));
        assert!(
            !verifier.verify(&[0u8; 32], "ctx", &bundle()),
            "a timed-out verifier must read as rejection"
        );
    }

    #[test]
    fn budget_is_observable() {
        let verifier = DeadlineVerifier::new(StructuralVerifier::new(), Duration::from_millis(750));
        assert_eq!(verifier.budget(), Duration::from_millis(750));
    }
}
