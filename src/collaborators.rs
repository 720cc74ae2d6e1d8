//! Capability traits for the external collaborators named in §6.
//!
//! This crate depends on these collaborators only through the signatures
//! given here, never on a concrete implementation, so test doubles can
//! stand in for a real transaction store, proof store, header chain, or
//! script interpreter (§9's "collaborator seams").

use async_trait::async_trait;
use bitcoin::Transaction;
use bitcoin::Txid;
use bitflags::bitflags;

use crate::error::{ScriptError, SpvError};
use crate::model::MerkleProof;

/// Looks up a raw transaction by txid. A `None` result means "not found";
/// distinguishing "not found" from "store failure" is this trait's job,
/// never inferred from an error string (§9's Open Question).
#[async_trait]
pub trait TxStore: Send + Sync {
    async fn tx(&self, txid: &Txid) -> Result<Option<Transaction>, SpvError>;
}

/// Looks up a Merkle proof for a txid, if one is known locally.
#[async_trait]
pub trait MerkleProofStore: Send + Sync {
    async fn merkle_proof(&self, txid: &Txid) -> Result<Option<MerkleProof>, SpvError>;
}

/// The block-header chain subsystem: resolves a Merkle proof's declared
/// block identity and checks that the proof's sibling chain recomputes to
/// that block's transaction Merkle root. The proof arithmetic itself lives
/// entirely in this collaborator (§1, §6); this crate only calls it.
#[async_trait]
pub trait HeaderStore: Send + Sync {
    async fn verify_merkle_proof(&self, proof: &MerkleProof) -> Result<bool, SpvError>;
}

bitflags! {
    /// Consensus rule flags this core passes to the script interpreter.
    /// Only the flags named in §6 are in scope; consensus rule evolution
    /// beyond this set is explicitly a non-goal (§1).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ScriptFlags: u32 {
        const SIGHASH_FORKID = 0b01;
        const UTXO_AFTER_GENESIS = 0b10;
    }
}

impl Default for ScriptFlags {
    fn default() -> Self {
        Self::SIGHASH_FORKID | Self::UTXO_AFTER_GENESIS
    }
}

/// The inputs the script interpreter needs to validate a single input.
pub struct ScriptExecutionParams<'a> {
    pub previous_output: &'a bitcoin::TxOut,
    pub input_index: usize,
    pub tx: &'a Transaction,
    pub flags: ScriptFlags,
}

/// The consensus script interpreter. Out of scope for this crate (§1) —
/// script execution itself belongs to the Bitcoin script engine this
/// core only invokes.
#[async_trait]
pub trait ScriptEngine: Send + Sync {
    async fn execute(&self, params: ScriptExecutionParams<'_>) -> Result<(), ScriptError>;
}
