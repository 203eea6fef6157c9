//! Call budget enforcement for verifier oracles.

use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::verifier::{MembershipVerifier, VerificationRequest, VerifierError};

/// Wraps a verifier with a wall-clock budget per call. A call past the
/// budget surfaces as [`VerifierError::Unavailable`], never as a proof
/// failure; the abandoned call finishes on its own thread.
pub struct TimedVerifier<V>
{
    inner: Arc<V>,
    budget: Duration,
}

impl<V> TimedVerifier<V>
{
    pub fn new(inner: V, budget_ms: u64) -> TimedVerifier<V>
    {
        TimedVerifier {
            inner: Arc::new(inner),
            budget: Duration::from_millis(budget_ms),
        }
    }
}

impl<V: MembershipVerifier + 'static> MembershipVerifier for TimedVerifier<V>
{
    fn verify(&self, request: &VerificationRequest) -> Result<bool, VerifierError>
    {
        let (sender, receiver) = mpsc::channel();
        let inner = self.inner.clone();
        let request = request.clone();

        thread::spawn(move || {
            let _ = sender.send(inner.verify(&request));
        });

        match receiver.recv_timeout(self.budget)
        {
            Ok(verdict) => verdict,
            Err(_) => Err(VerifierError::Unavailable("verification exceeded its call budget".into())),
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    struct SlowVerifier
    {
        delay: Duration,
    }

    impl MembershipVerifier for SlowVerifier
    {
        fn verify(&self, _request: &VerificationRequest) -> Result<bool, VerifierError>
        {
            thread::sleep(self.delay);
            Ok(true)
        }
    }

    fn request() -> VerificationRequest
    {
        VerificationRequest {
            root: [1; 32],
            signal_hash: [2; 32],
            nullifier_hash: [3; 32],
            external_nullifier: [4; 32],
            proof: crate::verifier::ProofData { pi_a: vec![], pi_b: vec![], pi_c: vec![] },
        }
    }

    #[test]
    fn verdicts_within_budget_pass_through()
    {
        let verifier = TimedVerifier::new(SlowVerifier { delay: Duration::from_millis(0) }, 1_000);
        assert_eq!(verifier.verify(&request()).unwrap(), true);
    }

    #[test]
    fn overruns_surface_as_unavailable()
    {
        let verifier = TimedVerifier::new(SlowVerifier { delay: Duration::from_millis(500) }, 20);
        assert!(matches!(verifier.verify(&request()), Err(VerifierError::Unavailable(_))));
    }
}
