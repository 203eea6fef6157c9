//! Groth16 membership verification over BN254.

use ark_bn254::{Bn254, Fr, G1Affine, G2Affine};
use ark_crypto_primitives::snark::SNARK;
use ark_ff::PrimeField;
use ark_groth16::{Groth16, Proof, VerifyingKey};
use ark_serialize::CanonicalDeserialize;

use crate::verifier::{MembershipVerifier, VerificationRequest, VerifierError};

/// A zk verification key in serialized form, one compressed point per
/// field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifyKey
{
    pub alpha_g1: Vec<u8>,
    pub beta_g2: Vec<u8>,
    pub gamma_g2: Vec<u8>,
    pub delta_g2: Vec<u8>,
    pub gamma_abc_g1: Vec<Vec<u8>>,
}

/// Checks membership proofs against a fixed circuit verifying key.
///
/// The public input layout is fixed by the membership circuit:
/// `[root, nullifier_hash, signal_hash, external_nullifier]`.
pub struct Groth16Verifier
{
    vk: VerifyingKey<Bn254>,
}

impl Groth16Verifier
{
    /// Deserialize the verifying key up front, so later faults are
    /// confined to the proof bytes of individual requests.
    pub fn new(key: &VerifyKey) -> Result<Groth16Verifier, VerifierError>
    {
        let gamma_abc_g1 = key.gamma_abc_g1
            .iter()
            .map(|bytes| g1(bytes, VerifierError::MalformedVerifyKey))
            .collect::<Result<Vec<G1Affine>, VerifierError>>()?;

        let vk = VerifyingKey {
            alpha_g1: g1(&key.alpha_g1, VerifierError::MalformedVerifyKey)?,
            beta_g2: g2(&key.beta_g2, VerifierError::MalformedVerifyKey)?,
            gamma_g2: g2(&key.gamma_g2, VerifierError::MalformedVerifyKey)?,
            delta_g2: g2(&key.delta_g2, VerifierError::MalformedVerifyKey)?,
            gamma_abc_g1,
        };

        Ok(Groth16Verifier { vk })
    }
}

impl MembershipVerifier for Groth16Verifier
{
    fn verify(&self, request: &VerificationRequest) -> Result<bool, VerifierError>
    {
        let proof = Proof {
            a: g1(&request.proof.pi_a, VerifierError::MalformedProof)?,
            b: g2(&request.proof.pi_b, VerifierError::MalformedProof)?,
            c: g1(&request.proof.pi_c, VerifierError::MalformedProof)?,
        };

        let inputs = [
            Fr::from_be_bytes_mod_order(&request.root),
            Fr::from_be_bytes_mod_order(&request.nullifier_hash),
            Fr::from_be_bytes_mod_order(&request.signal_hash),
            Fr::from_be_bytes_mod_order(&request.external_nullifier),
        ];

        Groth16::<Bn254>::verify(&self.vk, &inputs, &proof)
            .map_err(|e| VerifierError::Unavailable(e.to_string()))
    }
}

fn g1(bytes: &[u8], malformed: VerifierError) -> Result<G1Affine, VerifierError>
{
    G1Affine::deserialize_compressed(bytes).map_err(|_| malformed)
}

fn g2(bytes: &[u8], malformed: VerifierError) -> Result<G2Affine, VerifierError>
{
    G2Affine::deserialize_compressed(bytes).map_err(|_| malformed)
}

#[cfg(test)]
mod tests
{
    use super::*;
    use ark_ec::AffineRepr;
    use ark_serialize::CanonicalSerialize;
    use crate::verifier::ProofData;

    fn point_g1() -> Vec<u8>
    {
        let mut bytes = Vec::new();
        G1Affine::generator().serialize_compressed(&mut bytes).unwrap();
        bytes
    }

    fn point_g2() -> Vec<u8>
    {
        let mut bytes = Vec::new();
        G2Affine::generator().serialize_compressed(&mut bytes).unwrap();
        bytes
    }

    fn structural_key() -> VerifyKey
    {
        VerifyKey {
            alpha_g1: point_g1(),
            beta_g2: point_g2(),
            gamma_g2: point_g2(),
            delta_g2: point_g2(),
            gamma_abc_g1: vec![point_g1(); 5],
        }
    }

    fn request(proof: ProofData) -> VerificationRequest
    {
        VerificationRequest {
            root: [1; 32],
            signal_hash: [2; 32],
            nullifier_hash: [3; 32],
            external_nullifier: [4; 32],
            proof,
        }
    }

    #[test]
    fn malformed_keys_are_rejected_up_front()
    {
        let mut key = structural_key();
        key.alpha_g1 = vec![0xff; 7];
        assert!(matches!(Groth16Verifier::new(&key), Err(VerifierError::MalformedVerifyKey)));
    }

    #[test]
    fn malformed_proof_bytes_fault_per_request()
    {
        let verifier = Groth16Verifier::new(&structural_key()).unwrap();
        let result = verifier.verify(&request(ProofData {
            pi_a: vec![0xff; 7],
            pi_b: point_g2(),
            pi_c: point_g1(),
        }));
        assert!(matches!(result, Err(VerifierError::MalformedProof)));
    }

    #[test]
    fn well_formed_but_unsound_proofs_verify_false()
    {
        let verifier = Groth16Verifier::new(&structural_key()).unwrap();
        let result = verifier.verify(&request(ProofData {
            pi_a: point_g1(),
            pi_b: point_g2(),
            pi_c: point_g1(),
        }));
        assert_eq!(result.unwrap(), false);
    }
}
