//! Error types for spv-verify.

use bitcoin::Txid;

// ==============================================================================
// Script Errors
// ==============================================================================

/// Diagnostic carried by [`SpvError::ScriptValidationFailed`].
///
/// Wraps whatever the injected [`crate::collaborators::ScriptEngine`]
/// reported, kept as a `String` since the interpreter itself is an
/// external collaborator this crate does not implement.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct ScriptError(pub String);

impl ScriptError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

// ==============================================================================
// Core Errors
// ==============================================================================

/// Top-level error type for spv-verify.
///
/// Each variant corresponds to a named failure kind from the verification
/// and ancestry-construction algorithms; callers are expected to match on
/// these rather than parse error strings.
#[derive(Debug, thiserror::Error)]
pub enum SpvError {
    /// `verify_payment` was called without a payment.
    #[error("no initial payment supplied")]
    NilInitialPayment,

    /// The root envelope carried a Merkle proof; the tip must be unconfirmed.
    #[error("tip transaction is already confirmed")]
    TipTxConfirmed,

    /// A non-anchored node has neither a proof nor any parents.
    #[error("tx {0} has no confirmed ancestor and no parents")]
    NoConfirmedTransaction(Txid),

    /// An input's previous transaction could not be found among the
    /// supplied ancestry (nested `parents` map or flat `Ancestors` list).
    #[error("tx {txid} is missing parent for input {input_index}")]
    UnresolvedInput { txid: Txid, input_index: usize },

    /// The Merkle proof's declared txid disagrees with the envelope's txid.
    #[error("proof txid {proof_txid} does not match declared txid {declared_txid}")]
    TxIdMismatch {
        declared_txid: Txid,
        proof_txid: Txid,
    },

    /// An input indexes an output past the end of the parent's output list.
    #[error("tx {txid} input {input_index} references out-of-bounds output {output_index}")]
    InputRefsOutOfBoundsOutput {
        txid: Txid,
        input_index: usize,
        output_index: u32,
    },

    /// A non-anchored transaction has zero inputs to verify.
    #[error("tx {0} has no inputs to verify")]
    NoTxInputsToVerify(Txid),

    /// The script interpreter rejected an input.
    #[error("script validation failed for tx {txid} input {input_index}: {source}")]
    ScriptValidationFailed {
        txid: Txid,
        input_index: usize,
        #[source]
        source: ScriptError,
    },

    /// The binary payload's leading version byte was not `0x01`.
    #[error("unsupported binary envelope version byte {0:#04x}")]
    UnsupportedVersion(u8),

    /// The builder could not locate a required ancestor transaction.
    #[error("missing ancestor transaction {0}")]
    MissingAncestorTx(Txid),

    /// Builder recursion exceeded the configured depth bound.
    #[error("ancestry recursion exceeded depth limit of {0}")]
    AncestryTooDeep(usize),

    /// A declared `txId` does not match the txid recomputed from `rawTx`.
    #[error("declared txid {declared} does not match computed txid {computed}")]
    TxIdDeclarationMismatch { declared: Txid, computed: Txid },

    /// `rawTx` (or a Merkle proof's raw tx/id field) could not be parsed.
    #[error("invalid transaction encoding: {0}")]
    InvalidTransaction(String),

    /// The nested JSON envelope or flat binary ancestry was malformed.
    #[error("codec error: {0}")]
    Codec(String),

    /// The verification work was cancelled after a sibling input failed.
    #[error("verification cancelled")]
    Cancelled,
}
