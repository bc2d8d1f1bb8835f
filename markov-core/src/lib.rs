//! Word-level Markov chain training library.
//!
//! This crate learns, for every window of the last `order` tokens seen in a
//! text stream, how often each token followed that window. It provides:
//! - A lazy whitespace tokenizer that splits trailing sentence terminators
//! - A sliding context window and the key encoding used to index it
//! - The chain itself, with additive training and merging
//! - Snapshot persistence helpers (JSON and postcard)
//!
//! ```no_run
//! use markov_core::Chain;
//!
//! # fn main() -> markov_core::Result<()> {
//! let mut chain = Chain::new(2)?;
//! chain.train("The tree has two posts.".as_bytes())?;
//! assert!(chain.knowledge().contains_key("has$two"));
//! # Ok(())
//! # }
//! ```

/// Chain, context window, key encoding and frequency tables.
pub mod model;

/// Lazy tokenizer over readable streams.
pub mod tokenizer;

/// Error type shared by every operation.
pub mod error;

/// Snapshot persistence (save/load, format selection, path helpers).
pub mod io;

pub use error::{MarkovError, Result};
pub use model::chain::{Chain, ChainStats, TrainStats};
pub use model::frequency::FrequencyDistribution;
pub use model::key::{decode_key, encode_key};
pub use model::window::ContextWindow;
pub use tokenizer::{Tokens, is_sentence_terminator, tokenize};
