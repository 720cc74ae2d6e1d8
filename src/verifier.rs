//! Recursive payment verifier (component F).
//!
//! Verifies a payment envelope by checking Merkle proofs at the anchored
//! frontier and script executions at every interior node, with bounded
//! parallelism over the inputs of each non-anchored transaction (§4.6,
//! §5). Each node moves through `Unchecked -> (Anchored | ScriptChecked)
//! -> Verified`; any failure anywhere is terminal and propagates straight
//! up through the recursion (§4.6.2).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bitcoin::{Transaction, TxIn, Txid};
use futures::future::{BoxFuture, FutureExt};
use futures::stream::{FuturesUnordered, StreamExt};

use crate::collaborators::{HeaderStore, ScriptEngine, ScriptExecutionParams, ScriptFlags};
use crate::error::SpvError;
use crate::model::Envelope;

/// Verifies payment envelopes against a header store (for Merkle proofs)
/// and a script engine (for input scripts).
pub struct Verifier<'a> {
    header_store: &'a dyn HeaderStore,
    script_engine: &'a dyn ScriptEngine,
    flags: ScriptFlags,
}

impl<'a> Verifier<'a> {
    pub fn new(header_store: &'a dyn HeaderStore, script_engine: &'a dyn ScriptEngine) -> Self {
        Self {
            header_store,
            script_engine,
            flags: ScriptFlags::default(),
        }
    }

    /// Overrides the default consensus flag set (§6).
    pub fn with_flags(mut self, flags: ScriptFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Verifies whether the txs supplied via `payment` are valid.
    ///
    /// `payment` is `Option` to mirror the possibility of a caller handing
    /// in no payment at all, which is `NilInitialPayment` rather than a
    /// panic (§4.6).
    pub async fn verify_payment(&self, payment: Option<&Envelope>) -> Result<bool, SpvError> {
        let root = payment.ok_or(SpvError::NilInitialPayment)?;

        // The tip tx is the one under verification; it must not already
        // carry a Merkle proof.
        if root.is_anchored() {
            return Err(SpvError::TipTxConfirmed);
        }

        // Normalise child txids from their `parents` map keys once, up
        // front, rather than threading the key through every recursive
        // call (§4.4's autofill, exercised here as well as by the codec).
        let mut normalised = root.clone();
        normalised.fill_child_txids();

        self.verify_node(&normalised).await
    }

    fn verify_node<'b>(&'b self, e: &'b Envelope) -> BoxFuture<'b, Result<bool, SpvError>> {
        async move {
            let txid = e.txid()?;

            if !e.is_anchored() && e.parents.is_empty() {
                return Err(SpvError::NoConfirmedTransaction(txid));
            }

            // Children (parents in the spending sense) must verify before
            // this node does: recurse back to the anchors first.
            for child in e.parents.values() {
                if !self.verify_node(child).await? {
                    return Ok(false);
                }
            }

            if e.is_anchored() {
                return self.verify_anchor(e, txid).await;
            }

            self.verify_scripts(e, txid).await
        }
        .boxed()
    }

    async fn verify_anchor(&self, e: &Envelope, txid: Txid) -> Result<bool, SpvError> {
        let proof = e
            .proof
            .as_ref()
            .expect("verify_anchor only called when e.is_anchored()");

        let proof_txid = proof.effective_txid()?;
        if proof_txid != txid {
            return Err(SpvError::TxIdMismatch {
                declared_txid: txid,
                proof_txid,
            });
        }

        self.header_store.verify_merkle_proof(proof).await
    }

    /// Validates every input's unlocking script in parallel (§4.6.1).
    /// Cancellation is cooperative: once any input fails, already-running
    /// validations are left to finish but their results are discarded,
    /// and no new input validation starts (§5).
    async fn verify_scripts(&self, e: &Envelope, txid: Txid) -> Result<bool, SpvError> {
        let tx = e.transaction()?;
        if tx.input.is_empty() {
            return Err(SpvError::NoTxInputsToVerify(txid));
        }

        let cancelled = Arc::new(AtomicBool::new(false));
        let mut pending = FuturesUnordered::new();
        for (input_index, input) in tx.input.iter().enumerate() {
            pending.push(self.verify_input(e, &tx, input_index, input, txid, &cancelled));
        }

        let mut first_error = None;
        while let Some(result) = pending.next().await {
            if let Err(err) = result {
                cancelled.store(true, Ordering::SeqCst);
                first_error.get_or_insert(err);
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(true),
        }
    }

    async fn verify_input(
        &self,
        e: &Envelope,
        tx: &Transaction,
        input_index: usize,
        input: &TxIn,
        txid: Txid,
        cancelled: &AtomicBool,
    ) -> Result<(), SpvError> {
        if cancelled.load(Ordering::SeqCst) {
            return Err(SpvError::Cancelled);
        }

        let prev_txid = input.previous_output.txid;
        let parent = e
            .parents
            .get(&prev_txid)
            .ok_or(SpvError::UnresolvedInput { txid, input_index })?;

        let parent_tx = parent.transaction()?;
        let output = parent_tx
            .output
            .get(input.previous_output.vout as usize)
            .ok_or(SpvError::InputRefsOutOfBoundsOutput {
                txid,
                input_index,
                output_index: input.previous_output.vout,
            })?;

        self.script_engine
            .execute(ScriptExecutionParams {
                previous_output: output,
                input_index,
                tx,
                flags: self.flags,
            })
            .await
            .map_err(|source| SpvError::ScriptValidationFailed {
                txid,
                input_index,
                source,
            })
    }
}
