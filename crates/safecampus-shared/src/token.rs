//! Signed session tokens.
//!
//! A token is `base64url(claims-json) "." base64url(ed25519-signature)`, the
//! signature covering the encoded claims. Claims bind the token to one
//! account of one kind and carry an expiry.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::TokenError;
use crate::types::{Principal, PrincipalKind};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TokenClaims {
    pub sub: Uuid,
    pub kind: PrincipalKind,
    pub issued_at: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
}

impl TokenClaims {
    pub fn principal(&self) -> Principal {
        Principal {
            kind: self.kind,
            id: self.sub,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.valid_until
    }
}

/// Issues and verifies tokens with a single server key.
#[derive(Clone)]
pub struct TokenSigner {
    signing_key: SigningKey,
    ttl: Duration,
}

impl TokenSigner {
    pub fn new(secret: &[u8; 32], ttl: Duration) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(secret),
            ttl,
        }
    }

    /// Signer with a fresh random key. Tokens do not survive a restart.
    pub fn generate(ttl: Duration) -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
            ttl,
        }
    }

    pub fn verifying_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }

    /// Fails only when `now + ttl` leaves the representable date range.
    pub fn issue(&self, principal: Principal, now: DateTime<Utc>) -> Result<String, TokenError> {
        let valid_until = now
            .checked_add_signed(self.ttl)
            .ok_or(TokenError::Lifetime)?;
        let claims = TokenClaims {
            sub: principal.id,
            kind: principal.kind,
            issued_at: now,
            valid_until,
        };
        let json = serde_json::to_vec(&claims).map_err(|_| TokenError::Malformed)?;
        let payload = URL_SAFE_NO_PAD.encode(json);
        let signature = self.signing_key.sign(payload.as_bytes());

        Ok(format!("{payload}.{}", URL_SAFE_NO_PAD.encode(signature.to_bytes())))
    }

    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<TokenClaims, TokenError> {
        verify_token(token, &self.verifying_key(), now)
    }
}

pub fn verify_token(
    token: &str,
    verifying_key: &VerifyingKey,
    now: DateTime<Utc>,
) -> Result<TokenClaims, TokenError> {
    let (payload, sig_b64) = token.split_once('.').ok_or(TokenError::Malformed)?;

    let sig_bytes = URL_SAFE_NO_PAD
        .decode(sig_b64)
        .map_err(|_| TokenError::Malformed)?;
    let signature = Signature::from_slice(&sig_bytes).map_err(|_| TokenError::Malformed)?;

    verifying_key
        .verify(payload.as_bytes(), &signature)
        .map_err(|_| TokenError::BadSignature)?;

    let claims = decode_payload(payload)?;
    if claims.is_expired(now) {
        return Err(TokenError::Expired);
    }
    Ok(claims)
}

/// Read the claims without checking the signature.
///
/// Clients use this to notice an expired session before making a request;
/// the server never trusts it.
pub fn decode_claims_unverified(token: &str) -> Result<TokenClaims, TokenError> {
    let (payload, _) = token.split_once('.').ok_or(TokenError::Malformed)?;
    decode_payload(payload)
}

fn decode_payload(payload: &str) -> Result<TokenClaims, TokenError> {
    let json = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|_| TokenError::Malformed)?;
    serde_json::from_slice(&json).map_err(|_| TokenError::Malformed)
}
