//! The nested envelope form (component A).
//!
//! `Envelope` mirrors a Bitcoin transaction together with its recursive
//! parents. It forms a tree structurally but a DAG semantically — the same
//! ancestor may be reachable through two different parent paths (§9) — so
//! it intentionally stores parents in a map rather than assuming a strict
//! tree shape.

use std::collections::HashMap;

use bitcoin::{Transaction, Txid};
use serde::{Deserialize, Serialize};

use crate::error::SpvError;
use crate::model::mapi::MapiResponse;
use crate::model::proof::MerkleProof;

/// A transaction and its ancestry, nested recursively through `parents`.
///
/// Field names match the wire JSON exactly (§3/§6): `txid`, `rawTx`,
/// `proof`, `mapiResponses`, `parents`. `txid` may be absent on inner
/// nodes; callers recover it from the enclosing `parents` map key (§4.1,
/// §4.4) via [`Envelope::txid`] or during traversal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub txid: Option<Txid>,

    #[serde(rename = "rawTx")]
    pub raw_tx: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof: Option<MerkleProof>,

    #[serde(
        rename = "mapiResponses",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub mapi_responses: Option<Vec<MapiResponse>>,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub parents: HashMap<Txid, Envelope>,
}

impl Envelope {
    /// True iff this node carries a Merkle proof (§4.1).
    pub fn is_anchored(&self) -> bool {
        self.proof.is_some()
    }

    /// Parses `raw_tx` into a [`bitcoin::Transaction`].
    pub fn transaction(&self) -> Result<Transaction, SpvError> {
        decode_raw_tx(&self.raw_tx)
    }

    /// The declared `txid`, falling back to the txid recomputed from
    /// `raw_tx`. If both are present they must agree (§4.1).
    pub fn txid(&self) -> Result<Txid, SpvError> {
        let computed = self.transaction()?.compute_txid();
        match self.txid {
            Some(declared) if declared != computed => Err(SpvError::TxIdDeclarationMismatch {
                declared,
                computed,
            }),
            _ => Ok(computed),
        }
    }

    /// Fills in `txid` for every direct child whose own `txid` is absent,
    /// using the child's key in this node's `parents` map (§3 I4, §4.4).
    /// Recurses so the whole subtree is filled before traversal.
    pub fn fill_child_txids(&mut self) {
        let keys: Vec<Txid> = self.parents.keys().copied().collect();
        for key in keys {
            if let Some(child) = self.parents.get_mut(&key) {
                if child.txid.is_none() {
                    child.txid = Some(key);
                }
                child.fill_child_txids();
            }
        }
    }
}

/// Parses a hex-encoded raw transaction.
pub(crate) fn decode_raw_tx(raw_tx_hex: &str) -> Result<Transaction, SpvError> {
    let bytes =
        hex::decode(raw_tx_hex).map_err(|e| SpvError::InvalidTransaction(e.to_string()))?;
    bitcoin::consensus::deserialize(&bytes).map_err(|e| SpvError::InvalidTransaction(e.to_string()))
}
