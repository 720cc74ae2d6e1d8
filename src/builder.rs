//! Ancestry builder (component E).
//!
//! Depth-first, parent-side construction of an [`Ancestors`] sequence
//! sufficient to cover every input of a root transaction, pruning at the
//! first anchored ancestor on each branch (§4.5).

use bitcoin::{OutPoint, Transaction};
use futures::future::{BoxFuture, FutureExt};

use crate::collaborators::{MerkleProofStore, TxStore};
use crate::error::SpvError;
use crate::model::{Ancestor, Ancestors};

/// Tunable parameters for ancestry construction, mirroring the small
/// `Default`-deriving limit structs this codebase's lineage favours over
/// bare constants (e.g. the teacher's `GraphLimits`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuilderConfig {
    /// Maximum recursion depth before [`SpvError::AncestryTooDeep`] (§4.5).
    pub max_depth: usize,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self { max_depth: 1024 }
    }
}

/// Populates ancestry for every input of `root_tx`, using `tx_store` and
/// `proof_store` to resolve parent transactions and their anchoring
/// proofs. On any failure the returned error is propagated and the
/// partially-built ancestry must be discarded by the caller — it must
/// never be handed to the verifier (§4.5).
pub async fn build_ancestry(
    tx_store: &dyn TxStore,
    proof_store: &dyn MerkleProofStore,
    root_tx: &Transaction,
    config: &BuilderConfig,
) -> Result<Ancestors, SpvError> {
    let mut ancestors = Ancestors::new();
    populate(tx_store, proof_store, root_tx, &mut ancestors, 0, config).await?;
    Ok(ancestors)
}

fn populate<'a>(
    tx_store: &'a dyn TxStore,
    proof_store: &'a dyn MerkleProofStore,
    tx: &'a Transaction,
    ancestors: &'a mut Ancestors,
    depth: usize,
    config: &'a BuilderConfig,
) -> BoxFuture<'a, Result<(), SpvError>> {
    async move {
        if depth > config.max_depth {
            return Err(SpvError::AncestryTooDeep(config.max_depth));
        }

        for input in &tx.input {
            if input.previous_output == OutPoint::null() {
                continue; // coinbase input: nothing to cover
            }

            let prev_txid = input.previous_output.txid;
            if ancestors.lookup(&prev_txid).is_some() {
                continue; // already covered
            }

            let parent_tx = match tx_store.tx(&prev_txid).await? {
                Some(tx) => tx,
                None => {
                    tracing::warn!(txid = %prev_txid, "missing ancestor transaction");
                    return Err(SpvError::MissingAncestorTx(prev_txid));
                }
            };

            match proof_store.merkle_proof(&prev_txid).await? {
                Some(proof) => {
                    tracing::debug!(txid = %prev_txid, "ancestor anchored by merkle proof");
                    ancestors.append(Ancestor {
                        tx: parent_tx,
                        proof: Some(proof),
                        mapi_responses: None,
                    });
                }
                None => {
                    populate(tx_store, proof_store, &parent_tx, ancestors, depth + 1, config)
                        .await?;
                    ancestors.append(Ancestor {
                        tx: parent_tx,
                        proof: None,
                        mapi_responses: None,
                    });
                }
            }
        }

        Ok(())
    }
    .boxed()
}
