//! **spv-verify** — Simplified Payment Verification for Bitcoin payment
//! envelopes.
//!
//! A payment envelope nests a transaction with its ancestry back to a
//! block-anchored transaction on every branch (component A, [`model`]).
//! This crate can flatten that nesting into a wire-compact, order-preserving
//! form (component B), build ancestry for a fresh transaction against
//! injected data sources (component E, [`builder`]), and recursively verify
//! a payment's Merkle proofs and scripts (component F, [`verifier`]).
//!
//! Everything this crate does not itself implement — storage, the header
//! chain, and script execution — is reached only through the traits in
//! [`collaborators`], so a caller can back verification with a full node,
//! an SPV wallet's local cache, or a test double.

pub mod builder;
pub mod codec;
pub mod collaborators;
pub mod error;
pub mod model;
pub mod verifier;

#[cfg(test)]
pub(crate) mod test_support;

pub use builder::{build_ancestry, BuilderConfig};
pub use collaborators::{
    HeaderStore, MerkleProofStore, ScriptEngine, ScriptExecutionParams, ScriptFlags, TxStore,
};
pub use error::{ScriptError, SpvError};
pub use model::{Ancestor, Ancestors, Envelope, MapiResponse, MerkleProof, TargetType};
pub use verifier::Verifier;
