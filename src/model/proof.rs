//! TSC Merkle-proof JSON shape (§3/§6).
//!
//! The proof math itself — recomputing upward from `nodes` to a block's
//! Merkle root — belongs to the header-chain subsystem this crate consults
//! through [`crate::collaborators::HeaderStore`]; this module only carries
//! the wire shape.

use serde::{Deserialize, Serialize};

/// Identifies which field of a block `target` refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TargetType {
    Header,
    Hash,
    MerkleRoot,
}

/// A TSC-style Merkle proof: a sibling chain from a tx leaf to a block's
/// transaction Merkle root, plus enough block identity to resolve that
/// root via a trusted header store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleProof {
    /// Leaf position in the block's transaction tree.
    pub index: u64,

    /// Either the 32-byte txid (64 hex chars) or the full raw tx hex.
    #[serde(rename = "txOrId")]
    pub tx_or_id: String,

    #[serde(rename = "targetType")]
    pub target_type: TargetType,

    /// Header hex, block-hash hex, or Merkle-root hex, per `target_type`.
    pub target: String,

    /// Sibling chain from leaf to root, hex-encoded.
    pub nodes: Vec<String>,
}

impl MerkleProof {
    /// The effective txid this proof attests to: `tx_or_id` verbatim when
    /// it's already a 64-character hex txid, otherwise the txid of the raw
    /// transaction it encodes.
    pub fn effective_txid(&self) -> Result<bitcoin::Txid, crate::error::SpvError> {
        use std::str::FromStr;

        if self.tx_or_id.len() == 64 {
            bitcoin::Txid::from_str(&self.tx_or_id)
                .map_err(|e| crate::error::SpvError::InvalidTransaction(e.to_string()))
        } else {
            let bytes = hex::decode(&self.tx_or_id)
                .map_err(|e| crate::error::SpvError::InvalidTransaction(e.to_string()))?;
            let tx: bitcoin::Transaction = bitcoin::consensus::deserialize(&bytes)
                .map_err(|e| crate::error::SpvError::InvalidTransaction(e.to_string()))?;
            Ok(tx.compute_txid())
        }
    }
}
