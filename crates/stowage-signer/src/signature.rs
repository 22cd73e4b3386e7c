//! Upload request signatures
//!
//! A signature authorizes one upload. The signed payload is
//! `"{nonce}:{timestamp_millis}"` and the signature is the lowercase hex
//! HMAC-SHA256 of that payload under the secret key:
//!
//! ```text
//! payload   = V1StGXR8_Z5jdHi6B-myT:1717171717171
//! signature = hex(HMAC-SHA256(sk_..., payload))
//! ```
//!
//! Expiry is not enforced when signing; the receiving service decides how old a
//! payload may be (see [`verify_signature`]).

use crate::{
    keys::SecretKey, ExecutionContext, IdPolicy, Result, SignerError, PAYLOAD_SEPARATOR,
};
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::time::Duration;

type HmacSha256 = Hmac<Sha256>;

/// Length of a hex-encoded HMAC-SHA256 signature
pub const SIGNATURE_HEX_LEN: usize = 64;

/// How far ahead of the verifier's clock a payload may be stamped
pub const MAX_CLOCK_SKEW: Duration = Duration::from_secs(30);

/// A signed payload as exchanged between the signing server and the uploader
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignaturePayload {
    /// `"{nonce}:{timestamp_millis}"`
    pub payload: String,
    /// Lowercase hex HMAC-SHA256 of `payload`
    pub signature: String,
}

impl SignaturePayload {
    /// Split the payload into its nonce and timestamp parts
    pub fn parts(&self) -> Result<(&str, i64)> {
        let (nonce, timestamp) = self
            .payload
            .split_once(PAYLOAD_SEPARATOR)
            .ok_or_else(|| SignerError::InvalidPayload("missing separator".into()))?;

        if nonce.is_empty() {
            return Err(SignerError::InvalidPayload("empty nonce".into()));
        }
        if timestamp.contains(PAYLOAD_SEPARATOR) {
            return Err(SignerError::InvalidPayload("more than one separator".into()));
        }

        let timestamp = timestamp
            .parse::<i64>()
            .map_err(|e| SignerError::InvalidPayload(format!("bad timestamp: {}", e)))?;

        Ok((nonce, timestamp))
    }
}

/// Reusable signer bound to one secret key
#[derive(Clone, Debug)]
pub struct Signer {
    key: SecretKey,
    ids: IdPolicy,
}

impl Signer {
    /// Create a signer for `secret_key` running in `context`
    pub fn new(secret_key: impl Into<String>, context: ExecutionContext) -> Result<Self> {
        let key = SecretKey::new(secret_key)?;
        if !context.is_trusted() {
            return Err(SignerError::BrowserContext);
        }
        Ok(Self {
            key,
            ids: IdPolicy::default(),
        })
    }

    /// Use a custom nonce policy
    pub fn with_id_policy(mut self, ids: IdPolicy) -> Self {
        self.ids = ids;
        self
    }

    /// Sign a fresh payload stamped with the current time
    pub fn sign(&self) -> SignaturePayload {
        self.sign_at(Utc::now().timestamp_millis())
    }

    /// Sign a fresh payload stamped with `timestamp_millis`
    pub fn sign_at(&self, timestamp_millis: i64) -> SignaturePayload {
        let payload = format!("{}{}{}", self.ids.generate(), PAYLOAD_SEPARATOR, timestamp_millis);
        let signature = hex::encode(self.mac(&payload).finalize().into_bytes());
        SignaturePayload { payload, signature }
    }

    /// Verify a payload signed with this signer's key.
    ///
    /// With `max_age`, payloads stamped further in the past are rejected, and
    /// so are payloads stamped more than [`MAX_CLOCK_SKEW`] in the future.
    pub fn verify(&self, signed: &SignaturePayload, max_age: Option<Duration>) -> Result<()> {
        self.verify_at(signed, max_age, Utc::now().timestamp_millis())
    }

    /// Verify against a clock reading of `now_millis`
    pub fn verify_at(
        &self,
        signed: &SignaturePayload,
        max_age: Option<Duration>,
        now_millis: i64,
    ) -> Result<()> {
        let (_, timestamp) = signed.parts()?;

        let expected = hex::decode(&signed.signature)?;
        self.mac(&signed.payload)
            .verify_slice(&expected)
            .map_err(|_| SignerError::SignatureMismatch)?;

        if let Some(max_age) = max_age {
            let age_ms = now_millis.saturating_sub(timestamp);
            let max_age_ms = duration_millis(max_age);
            if age_ms > max_age_ms {
                return Err(SignerError::Expired { age_ms, max_age_ms });
            }

            let ahead_ms = age_ms.saturating_neg();
            if ahead_ms > duration_millis(MAX_CLOCK_SKEW) {
                return Err(SignerError::IssuedInFuture { ahead_ms });
            }
        }

        Ok(())
    }

    fn mac(&self, payload: &str) -> HmacSha256 {
        let mut mac =
            HmacSha256::new_from_slice(self.key.as_bytes()).expect("HMAC can take key of any size");
        mac.update(payload.as_bytes());
        mac
    }
}

fn duration_millis(d: Duration) -> i64 {
    i64::try_from(d.as_millis()).unwrap_or(i64::MAX)
}

/// Generate a signed payload for one upload.
///
/// Fails if the key is missing, is actually a public key, or `context` is a
/// browser. All checks run before any MAC is computed.
pub fn generate_signature(secret_key: &str, context: ExecutionContext) -> Result<SignaturePayload> {
    Ok(Signer::new(secret_key, context)?.sign())
}

/// Verify a signed payload against `secret_key`
pub fn verify_signature(
    secret_key: &str,
    signed: &SignaturePayload,
    max_age: Option<Duration>,
) -> Result<()> {
    Signer::new(secret_key, ExecutionContext::Server)?.verify(signed, max_age)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SECRET: &str = "sk_test_4eC39HqLyjWDarjtT1zdp7dc";

    fn is_lower_hex(s: &str) -> bool {
        s.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
    }

    #[test]
    fn test_payload_shape() {
        let signed = generate_signature(SECRET, ExecutionContext::Server).unwrap();

        let parts: Vec<&str> = signed.payload.split(PAYLOAD_SEPARATOR).collect();
        assert_eq!(parts.len(), 2);
        assert!(IdPolicy::default().matches(parts[0]));
        assert!(parts[1].parse::<i64>().unwrap() > 0);

        assert_eq!(signed.signature.len(), SIGNATURE_HEX_LEN);
        assert!(is_lower_hex(&signed.signature));
    }

    #[test]
    fn test_consecutive_signatures_differ() {
        let a = generate_signature(SECRET, ExecutionContext::Server).unwrap();
        let b = generate_signature(SECRET, ExecutionContext::Server).unwrap();
        assert_ne!(a.payload, b.payload);
        assert_ne!(a.signature, b.signature);
    }

    #[test]
    fn test_known_vector() {
        // HMAC-SHA256("key", "The quick brown fox jumps over the lazy dog")
        let signer = Signer::new("key", ExecutionContext::Server).unwrap();
        let mac = signer.mac("The quick brown fox jumps over the lazy dog");
        assert_eq!(
            hex::encode(mac.finalize().into_bytes()),
            "f7bc83f430538424b13298e6aa6fb143ef4d59a14946175997479dbc2d1a3cd8"
        );
    }

    #[test]
    fn test_validation_order() {
        assert_eq!(
            generate_signature("", ExecutionContext::Browser),
            Err(SignerError::MissingSecretKey)
        );
        assert_eq!(
            generate_signature("pk_live_abc", ExecutionContext::Browser),
            Err(SignerError::SecretKeyIsPublic)
        );
        assert_eq!(
            generate_signature(SECRET, ExecutionContext::Browser),
            Err(SignerError::BrowserContext)
        );
    }

    #[test]
    fn test_verify_roundtrip() {
        let signed = generate_signature(SECRET, ExecutionContext::Server).unwrap();
        assert!(verify_signature(SECRET, &signed, Some(Duration::from_secs(60))).is_ok());
    }

    #[test]
    fn test_verify_rejects_tampering() {
        let mut signed = generate_signature(SECRET, ExecutionContext::Server).unwrap();
        signed.payload.insert(0, 'x');
        assert_eq!(
            verify_signature(SECRET, &signed, None),
            Err(SignerError::SignatureMismatch)
        );

        let signed = generate_signature(SECRET, ExecutionContext::Server).unwrap();
        assert_eq!(
            verify_signature("sk_other", &signed, None),
            Err(SignerError::SignatureMismatch)
        );
    }

    #[test]
    fn test_verify_rejects_stale_payload() {
        let signer = Signer::new(SECRET, ExecutionContext::Server).unwrap();
        let stale = signer.sign_at(Utc::now().timestamp_millis() - 10 * 60 * 1000);

        assert!(signer.verify(&stale, None).is_ok());
        assert!(matches!(
            signer.verify(&stale, Some(Duration::from_secs(300))),
            Err(SignerError::Expired { .. })
        ));
    }

    #[test]
    fn test_verify_rejects_future_payload() {
        let signer = Signer::new(SECRET, ExecutionContext::Server).unwrap();
        let now = Utc::now().timestamp_millis();
        let ten_years_ms = 10 * 365 * 24 * 60 * 60 * 1000;
        let future = signer.sign_at(now + ten_years_ms);

        assert!(signer.verify(&future, None).is_ok());
        assert!(matches!(
            signer.verify_at(&future, Some(Duration::from_secs(60)), now),
            Err(SignerError::IssuedInFuture { ahead_ms }) if ahead_ms == ten_years_ms
        ));
    }

    #[test]
    fn test_verify_tolerates_small_clock_skew() {
        let signer = Signer::new(SECRET, ExecutionContext::Server).unwrap();
        let now = Utc::now().timestamp_millis();
        let skew_ms = duration_millis(MAX_CLOCK_SKEW);

        let slightly_ahead = signer.sign_at(now + skew_ms);
        assert!(signer
            .verify_at(&slightly_ahead, Some(Duration::from_secs(60)), now)
            .is_ok());

        let too_far_ahead = signer.sign_at(now + skew_ms + 1);
        assert!(signer
            .verify_at(&too_far_ahead, Some(Duration::from_secs(60)), now)
            .is_err());
    }

    #[test]
    fn test_verify_extreme_timestamps_do_not_overflow() {
        let signer = Signer::new(SECRET, ExecutionContext::Server).unwrap();
        let max_age = Some(Duration::from_secs(60));

        assert!(matches!(
            signer.verify(&signer.sign_at(i64::MIN), max_age),
            Err(SignerError::Expired { age_ms: i64::MAX, .. })
        ));
        assert!(matches!(
            signer.verify(&signer.sign_at(i64::MAX), max_age),
            Err(SignerError::IssuedInFuture { .. })
        ));
        assert!(matches!(
            signer.verify_at(&signer.sign_at(i64::MAX), max_age, i64::MIN),
            Err(SignerError::IssuedInFuture { ahead_ms: i64::MAX })
        ));
    }

    #[test]
    fn test_verify_rejects_malformed_payload() {
        let signer = Signer::new(SECRET, ExecutionContext::Server).unwrap();
        for payload in ["no-separator", ":123", "abc:1:2", "abc:notanumber"] {
            let signed = SignaturePayload {
                payload: payload.to_string(),
                signature: "00".repeat(32),
            };
            assert!(matches!(
                signer.verify(&signed, None),
                Err(SignerError::InvalidPayload(_))
            ));
        }
    }

    #[test]
    fn test_custom_id_policy() {
        let signer = Signer::new(SECRET, ExecutionContext::Server)
            .unwrap()
            .with_id_policy(IdPolicy::new(32, "0123456789abcdef").unwrap());
        let signed = signer.sign();
        let (nonce, _) = signed.parts().unwrap();
        assert_eq!(nonce.len(), 32);
    }

    proptest! {
        #[test]
        fn prop_browser_context_always_refused(key in "sk_[a-zA-Z0-9]{0,40}") {
            prop_assert_eq!(
                generate_signature(&key, ExecutionContext::Browser),
                Err(SignerError::BrowserContext)
            );
        }

        #[test]
        fn prop_public_prefix_always_refused(suffix in "[a-zA-Z0-9_]{0,40}") {
            let key = format!("pk_{}", suffix);
            prop_assert_eq!(
                generate_signature(&key, ExecutionContext::Server),
                Err(SignerError::SecretKeyIsPublic)
            );
        }

        #[test]
        fn prop_signature_is_fixed_length_hex(key in "sk_[a-zA-Z0-9]{1,64}") {
            let signed = generate_signature(&key, ExecutionContext::Server).unwrap();
            prop_assert_eq!(signed.signature.len(), SIGNATURE_HEX_LEN);
            prop_assert!(is_lower_hex(&signed.signature));
            prop_assert_eq!(signed.payload.matches(PAYLOAD_SEPARATOR).count(), 1);
        }
    }
}
