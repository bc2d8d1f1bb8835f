//! Top-level module for the learned model.
//!
//! This module groups the pieces a chain is made of:
//! - The chain aggregate (`Chain`)
//! - Per-context next-token counts (`FrequencyDistribution`)
//! - The sliding window of recent tokens (`ContextWindow`)
//! - The string encoding of a window used as a map key

/// The trained chain: order plus context-keyed frequency tables.
///
/// Handles construction, additive training from a reader,
/// count recording and merging of chains of the same order.
pub mod chain;

/// Observed distribution of the tokens following one context.
///
/// Counts only ever grow, one observation at a time or by merging.
pub mod frequency;

/// Collision-free encoding of a token window into a single string key.
pub mod key;

/// Fixed-length window over the most recent tokens.
pub mod window;
