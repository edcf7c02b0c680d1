//! Credential token decoding.
//!
//! Tokens are opaque three-segment signed strings (`header.payload.signature`).
//! The only thing read from them is the `exp` claim in the payload segment,
//! in seconds since the epoch. Signatures are never verified client-side.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

/// URL-safe alphabet that accepts payloads with or without `=` padding.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("token must have 3 segments, found {0}")]
    Segments(usize),

    #[error("failed to decode token payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("failed to parse token claims: {0}")]
    Claims(#[from] serde_json::Error),

    #[error("expiry claim out of range: {0}")]
    ExpiryRange(f64),
}

#[derive(Debug, Deserialize)]
struct Claims {
    exp: f64,
}

/// Decode the expiry instant embedded in a token.
pub fn decode_expiry(token: &str) -> Result<DateTime<Utc>, TokenError> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(TokenError::Segments(parts.len()));
    }

    let payload = PAYLOAD_ENGINE.decode(parts[1])?;
    let claims: Claims = serde_json::from_slice(&payload)?;

    let millis = claims.exp * 1000.0;
    if !millis.is_finite() || millis.abs() > i64::MAX as f64 {
        return Err(TokenError::ExpiryRange(claims.exp));
    }
    DateTime::from_timestamp_millis(millis as i64).ok_or(TokenError::ExpiryRange(claims.exp))
}

/// Valid iff the token decodes and its expiry is strictly after `now`.
pub fn is_unexpired(token: &str, now: DateTime<Utc>) -> bool {
    match decode_expiry(token) {
        Ok(exp) => exp > now,
        Err(e) => {
            tracing::debug!(error = %e, "Stored token could not be decoded; treating session as invalid");
            false
        }
    }
}
