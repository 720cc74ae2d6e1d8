//! The flat ancestry form (component B).
//!
//! `Ancestors` is the wire-compact, order-preserving sibling of
//! [`crate::model::envelope::Envelope`] (§9): the two are kept as distinct
//! types with an explicit conversion (never a view onto one another).

use std::collections::HashSet;

use bitcoin::{OutPoint, Transaction, Txid};
use serde::{Deserialize, Serialize};

use crate::error::SpvError;
use crate::model::envelope::Envelope;
use crate::model::mapi::MapiResponse;
use crate::model::proof::MerkleProof;

/// One record of a flattened ancestry: a transaction, optionally anchored
/// by a Merkle proof, optionally carrying miner callbacks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ancestor {
    pub tx: Transaction,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof: Option<MerkleProof>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mapi_responses: Option<Vec<MapiResponse>>,
}

impl Ancestor {
    /// True iff this record carries a Merkle proof (§4.2).
    pub fn is_anchored(&self) -> bool {
        self.proof.is_some()
    }
}

/// An ordered sequence of [`Ancestor`] records, anchors-first. Insertion
/// order is preserved; txids across the sequence are unique (§3 F1).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ancestors(pub Vec<Ancestor>);

impl Ancestors {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Linear scan by txid; the expected ancestry size is small (§4.2).
    pub fn lookup(&self, txid: &Txid) -> Option<&Ancestor> {
        self.0
            .iter()
            .find(|a| a.tx.compute_txid() == *txid)
    }

    /// Appends a record, preserving insertion order (used by the builder).
    pub fn append(&mut self, record: Ancestor) {
        self.0.push(record);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Ancestor> {
        self.0.iter()
    }

    /// Flattens a nested [`Envelope`] into its ancestors-first, tip-last
    /// closure (§9). Walks the tip transaction's own input order (not the
    /// `parents` map's iteration order, which is unspecified) so the
    /// output is deterministic; recursion into an anchored node does not
    /// descend into that node's own `parents`, per invariant I3, which is
    /// what prunes redundant ancestor branches beyond the first anchor
    /// (scenario S3). Nodes are deduped by txid (§9's DAG-sharing note).
    pub fn flatten(envelope: &Envelope) -> Result<Ancestors, SpvError> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        flatten_into(envelope, &mut seen, &mut out)?;
        Ok(Ancestors(out))
    }
}

fn flatten_into(
    envelope: &Envelope,
    seen: &mut HashSet<Txid>,
    out: &mut Vec<Ancestor>,
) -> Result<(), SpvError> {
    let txid = envelope.txid()?;
    if seen.contains(&txid) {
        return Ok(());
    }

    let tx = envelope.transaction()?;

    if envelope.is_anchored() {
        seen.insert(txid);
        out.push(Ancestor {
            tx,
            proof: envelope.proof.clone(),
            mapi_responses: envelope.mapi_responses.clone(),
        });
        return Ok(());
    }

    for (input_index, input) in tx.input.iter().enumerate() {
        if input.previous_output == OutPoint::null() {
            continue; // coinbase: no parent to recurse into
        }
        let prev_txid = input.previous_output.txid;
        if seen.contains(&prev_txid) {
            continue;
        }
        let parent = envelope
            .parents
            .get(&prev_txid)
            .ok_or(SpvError::UnresolvedInput { txid, input_index })?;
        flatten_into(parent, seen, out)?;
    }

    seen.insert(txid);
    out.push(Ancestor {
        tx,
        proof: None,
        mapi_responses: envelope.mapi_responses.clone(),
    });
    Ok(())
}
