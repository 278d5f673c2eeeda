//! Commitment key derivations.
//!
//! Commitment outputs do not pay to a party's base key directly. The spend
//! key is the base key offset by a per-commitment tweak, and revoked outputs
//! are claimed with a key combining both parties' halves. Signers apply the
//! matching private derivation before producing a signature.

use bitcoin::hashes::{sha256, Hash, HashEngine};
use secp256k1::{PublicKey, Scalar, Secp256k1, SecretKey, Signing, Verification};

/// `sha256(tweak || base_key)` reduced to a curve scalar.
fn single_tweak_scalar(tweak: &[u8], base: &PublicKey) -> Result<Scalar, secp256k1::Error> {
    let mut engine = sha256::Hash::engine();
    engine.input(tweak);
    engine.input(&base.serialize());
    let digest = sha256::Hash::from_engine(engine);
    Scalar::from_be_bytes(digest.to_byte_array()).map_err(|_| secp256k1::Error::InvalidTweak)
}

/// `sha256(a || b)` over the two serialized keys, reduced to a scalar.
fn key_pair_scalar(a: &PublicKey, b: &PublicKey) -> Result<Scalar, secp256k1::Error> {
    let mut engine = sha256::Hash::engine();
    engine.input(&a.serialize());
    engine.input(&b.serialize());
    let digest = sha256::Hash::from_engine(engine);
    Scalar::from_be_bytes(digest.to_byte_array()).map_err(|_| secp256k1::Error::InvalidTweak)
}

/// Offsets `base` by the commitment tweak:
/// `base + sha256(tweak || base) * G`.
pub fn tweak_pubkey<C: Verification>(
    secp: &Secp256k1<C>,
    base: &PublicKey,
    tweak: &[u8],
) -> Result<PublicKey, secp256k1::Error> {
    let scalar = single_tweak_scalar(tweak, base)?;
    base.add_exp_tweak(secp, &scalar)
}

/// Private counterpart of [`tweak_pubkey`]:
/// `base + sha256(tweak || base * G)`.
pub fn tweak_privkey<C: Signing>(
    secp: &Secp256k1<C>,
    base: &SecretKey,
    tweak: &[u8],
) -> Result<SecretKey, secp256k1::Error> {
    let base_pub = PublicKey::from_secret_key(secp, base);
    let scalar = single_tweak_scalar(tweak, &base_pub)?;
    base.add_tweak(&scalar)
}

/// Combines the revocation base secret with a leaked per-commitment secret:
/// `base * sha256(base_pk || commit_pk) + commit * sha256(commit_pk || base_pk)`.
pub fn derive_revocation_privkey<C: Signing>(
    secp: &Secp256k1<C>,
    revoke_base: &SecretKey,
    commit_secret: &SecretKey,
) -> Result<SecretKey, secp256k1::Error> {
    let revoke_pub = PublicKey::from_secret_key(secp, revoke_base);
    let commit_pub = PublicKey::from_secret_key(secp, commit_secret);

    let revoke_half = revoke_base.mul_tweak(&key_pair_scalar(&revoke_pub, &commit_pub)?)?;
    let commit_half = commit_secret.mul_tweak(&key_pair_scalar(&commit_pub, &revoke_pub)?)?;
    revoke_half.add_tweak(&Scalar::from(commit_half))
}

#[cfg(test)]
mod tests {
    use secp256k1::SECP256K1;

    use super::*;

    fn seckey(fill: u8) -> SecretKey {
        SecretKey::from_slice(&[fill; 32]).unwrap()
    }

    #[test]
    fn test_single_tweak_keys_stay_paired() {
        let base = seckey(0x11);
        let base_pub = PublicKey::from_secret_key(SECP256K1, &base);
        let tweak = [0x02u8; 32];

        let tweaked_priv = tweak_privkey(SECP256K1, &base, &tweak).unwrap();
        let tweaked_pub = tweak_pubkey(SECP256K1, &base_pub, &tweak).unwrap();

        assert_eq!(
            PublicKey::from_secret_key(SECP256K1, &tweaked_priv),
            tweaked_pub
        );
        assert_ne!(tweaked_pub, base_pub);
    }

    #[test]
    fn test_tweak_depends_on_base_key() {
        let tweak = [0x02u8; 32];
        let pub_a =
            tweak_pubkey(SECP256K1, &PublicKey::from_secret_key(SECP256K1, &seckey(0x11)), &tweak)
                .unwrap();
        let pub_b =
            tweak_pubkey(SECP256K1, &PublicKey::from_secret_key(SECP256K1, &seckey(0x12)), &tweak)
                .unwrap();
        assert_ne!(pub_a, pub_b);
    }

    #[test]
    fn test_revocation_key_combines_both_halves() {
        let revoke_base = seckey(0x21);
        let commit_secret = seckey(0x31);
        let revoke_pub = PublicKey::from_secret_key(SECP256K1, &revoke_base);
        let commit_pub = PublicKey::from_secret_key(SECP256K1, &commit_secret);

        let derived = derive_revocation_privkey(SECP256K1, &revoke_base, &commit_secret).unwrap();

        // Public-side derivation must agree with the private one.
        let revoke_half = revoke_pub
            .mul_tweak(SECP256K1, &key_pair_scalar(&revoke_pub, &commit_pub).unwrap())
            .unwrap();
        let commit_half = commit_pub
            .mul_tweak(SECP256K1, &key_pair_scalar(&commit_pub, &revoke_pub).unwrap())
            .unwrap();
        let expected = revoke_half.combine(&commit_half).unwrap();

        assert_eq!(PublicKey::from_secret_key(SECP256K1, &derived), expected);
    }
}
