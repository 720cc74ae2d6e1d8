//! Miner callback envelopes ("mapi responses").
//!
//! An opaque signed JSON envelope carrying a miner's attestation that a tx
//! has been included in a block. This crate carries it losslessly through
//! JSON and binary encodings but never parses or verifies its signature —
//! that belongs to the miner-callback subsystem, out of scope here (§3).

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A single miner callback ("mapi") response, kept as an opaque JSON value.
///
/// On self-describing formats (JSON) this round-trips as the nested object
/// itself. `bincode`'s deserializer rejects `serde_json::Value`'s
/// `deserialize_any` outright, so on non-self-describing formats the value
/// is carried as its raw JSON text and re-parsed on the way back in.
#[derive(Debug, Clone, PartialEq)]
pub struct MapiResponse(pub serde_json::Value);

impl Serialize for MapiResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            self.0.serialize(serializer)
        } else {
            serde_json::to_string(&self.0)
                .map_err(serde::ser::Error::custom)?
                .serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for MapiResponse {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            serde_json::Value::deserialize(deserializer).map(MapiResponse)
        } else {
            let raw = String::deserialize(deserializer)?;
            let value = serde_json::from_str(&raw).map_err(D::Error::custom)?;
            Ok(MapiResponse(value))
        }
    }
}
