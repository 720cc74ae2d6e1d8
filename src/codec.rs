//! Binary wire codec for [`Ancestors`] (component C).
//!
//! Wire shape: `version:1 ‖ payload`, where `version` is the single byte
//! `0x01` and `payload` is a structural encoding of the `Ancestors`
//! sequence. The original implementation this crate's behaviour is
//! grounded on uses a custom tag-and-length framework (BSOR) for
//! `payload`; that framework is an external collaborator this crate does
//! not depend on (§1), so `payload` here is `bincode`-encoded instead —
//! `bincode` is already part of this codebase's dependency lineage. Field
//! order in [`Ancestor`] (`tx`, `proof`, `mapi_responses`) mirrors the tag
//! order named in §6 (1, 2, 3), and `Option` fields cost nothing on the
//! wire when absent.

use crate::error::SpvError;
use crate::model::Ancestors;

/// The only version byte this codec currently accepts.
pub const VERSION: u8 = 0x01;

/// Encodes an [`Ancestors`] sequence to its versioned binary wire form.
pub fn encode(ancestors: &Ancestors) -> Result<Vec<u8>, SpvError> {
    let mut out = Vec::with_capacity(1 + 256 * ancestors.len());
    out.push(VERSION);
    bincode::serialize_into(&mut out, &ancestors.0)
        .map_err(|e| SpvError::Codec(e.to_string()))?;
    Ok(out)
}

/// Decodes a versioned binary payload into an [`Ancestors`] sequence.
///
/// Rejects any buffer whose first byte is not `0x01` with
/// [`SpvError::UnsupportedVersion`] (§4.3, P2).
pub fn decode(bytes: &[u8]) -> Result<Ancestors, SpvError> {
    let (&version, payload) = bytes
        .split_first()
        .ok_or_else(|| SpvError::Codec("empty buffer".to_string()))?;
    if version != VERSION {
        return Err(SpvError::UnsupportedVersion(version));
    }
    let records =
        bincode::deserialize(payload).map_err(|e| SpvError::Codec(e.to_string()))?;
    Ok(Ancestors(records))
}
