//! Shared test helpers for `spv-verify` unit tests.
//!
//! Consolidates dummy transaction builders and collaborator test doubles so
//! that tests across `model`, `codec`, `builder`, and `verifier` share a
//! single source of truth for canned data.

use std::collections::HashMap;

use async_trait::async_trait;
use bitcoin::hashes::Hash;
use bitcoin::{
    absolute::LockTime, transaction::Version, Amount, OutPoint, ScriptBuf, Sequence, Transaction,
    TxIn, TxOut, Txid, Witness,
};

use crate::collaborators::{HeaderStore, MerkleProofStore, ScriptEngine, ScriptExecutionParams, TxStore};
use crate::error::{ScriptError, SpvError};
use crate::model::{MerkleProof, TargetType};

// ==============================================================================
// Txid Helpers
// ==============================================================================

/// Creates a deterministic `Txid` from a single distinguishing byte. Useful
/// for building small test graphs where txids only need to be unique.
pub fn txid_from_byte(b: u8) -> Txid {
    let mut bytes = [0u8; 32];
    bytes[0] = b;
    Txid::from_byte_array(bytes)
}

// ==============================================================================
// Raw Transaction Builders
// ==============================================================================

/// Builds a minimal version-2 transaction from the given inputs and outputs.
pub fn make_tx(inputs: Vec<TxIn>, outputs: Vec<TxOut>) -> Transaction {
    Transaction {
        version: Version::TWO,
        lock_time: LockTime::ZERO,
        input: inputs,
        output: outputs,
    }
}

/// A coinbase input (null previous output).
pub fn coinbase_in() -> TxIn {
    TxIn {
        previous_output: OutPoint::null(),
        script_sig: ScriptBuf::new(),
        sequence: Sequence::MAX,
        witness: Witness::new(),
    }
}

/// A spending input referencing `funding_txid:vout`.
pub fn spending_in(funding_txid: Txid, vout: u32) -> TxIn {
    TxIn {
        previous_output: OutPoint::new(funding_txid, vout),
        script_sig: ScriptBuf::new(),
        sequence: Sequence::MAX,
        witness: Witness::new(),
    }
}

/// A minimal P2WPKH-shaped output carrying the given satoshi value.
pub fn out(sats: u64) -> TxOut {
    let script_bytes = [
        0x00, 0x14, // OP_0, PUSH20
        0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e, 0x0f,
        0x10, 0x11, 0x12, 0x13, 0x14,
    ];
    TxOut {
        value: Amount::from_sat(sats),
        script_pubkey: ScriptBuf::from_bytes(script_bytes.to_vec()),
    }
}

/// Hex-encodes a transaction the way `rawTx` fields carry it on the wire.
pub fn encode_tx(tx: &Transaction) -> String {
    hex::encode(bitcoin::consensus::serialize(tx))
}

/// A Merkle proof anchoring `txid`, with placeholder target material. Only
/// `tx_or_id` is ever inspected by this crate's own logic; the rest is
/// carried through to the header store collaborator untouched.
pub fn sample_proof(txid: Txid) -> MerkleProof {
    MerkleProof {
        index: 0,
        tx_or_id: txid.to_string(),
        target_type: TargetType::MerkleRoot,
        target: "0".repeat(64),
        nodes: vec![],
    }
}

// ==============================================================================
// Collaborator Test Doubles
// ==============================================================================

/// A mock [`TxStore`], populated via the builder pattern.
#[derive(Default)]
pub struct MockTxStore {
    transactions: HashMap<Txid, Transaction>,
}

impl MockTxStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `tx`, keyed by its own computed txid.
    pub fn with_tx(mut self, tx: Transaction) -> Self {
        self.transactions.insert(tx.compute_txid(), tx);
        self
    }
}

#[async_trait]
impl TxStore for MockTxStore {
    async fn tx(&self, txid: &Txid) -> Result<Option<Transaction>, SpvError> {
        Ok(self.transactions.get(txid).cloned())
    }
}

/// A mock [`MerkleProofStore`], populated via the builder pattern.
#[derive(Default)]
pub struct MockProofStore {
    proofs: HashMap<Txid, MerkleProof>,
}

impl MockProofStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_proof(mut self, txid: Txid, proof: MerkleProof) -> Self {
        self.proofs.insert(txid, proof);
        self
    }
}

#[async_trait]
impl MerkleProofStore for MockProofStore {
    async fn merkle_proof(&self, txid: &Txid) -> Result<Option<MerkleProof>, SpvError> {
        Ok(self.proofs.get(txid).cloned())
    }
}

/// A [`HeaderStore`] that accepts every proof it is handed. Suitable for
/// tests that exercise the recursion/fan-out logic of the verifier rather
/// than actual Merkle arithmetic, which belongs to a real header store.
pub struct AlwaysValidHeaders;

#[async_trait]
impl HeaderStore for AlwaysValidHeaders {
    async fn verify_merkle_proof(&self, _proof: &MerkleProof) -> Result<bool, SpvError> {
        Ok(true)
    }
}

/// A [`ScriptEngine`] that accepts every input it is handed.
pub struct AlwaysValidScripts;

#[async_trait]
impl ScriptEngine for AlwaysValidScripts {
    async fn execute(&self, _params: ScriptExecutionParams<'_>) -> Result<(), ScriptError> {
        Ok(())
    }
}
