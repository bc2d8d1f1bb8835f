use std::collections::HashMap;
use std::io::Read;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::frequency::FrequencyDistribution;
use super::key::decode_key;
use super::window::ContextWindow;
use crate::error::{MarkovError, Result};
use crate::tokenizer::tokenize;

/// Word-level Markov chain of a fixed order.
///
/// For every window of `order` consecutive tokens seen during training, the
/// chain stores how many times each token followed that window.
///
/// # Responsibilities
/// - Train from any reader, additively across calls
/// - Record single observations under an encoded context key
/// - Merge with another chain of the same order
///
/// # Invariants
/// - `order` is always >= 1 and never changes
/// - Every key in `knowledge` encodes exactly `order` tokens
/// - All counts are >= 1
///
/// The chain has no internal locking: concurrent trainers must serialize
/// access themselves (e.g. behind a `Mutex<Chain>`).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(try_from = "ChainSnapshot")]
pub struct Chain {
	/// Number of preceding tokens used as context.
	#[serde(rename = "Order")]
	order: usize,

	/// Mapping from an encoded context window to what followed it.
	#[serde(rename = "Knowledge")]
	knowledge: HashMap<String, FrequencyDistribution>,
}

/// Outcome of a successful [`Chain::train`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TrainStats {
	/// Tokens read from the input, terminators included.
	pub tokens: u64,
	/// Contexts seen for the first time during this call.
	pub new_contexts: usize,
}

/// Size summary of a chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChainStats {
	pub order: usize,
	/// Distinct context windows.
	pub contexts: usize,
	/// Distinct (context, next token) pairs.
	pub transitions: usize,
	/// Sum of every count.
	pub observations: u64,
}

impl Chain {
	/// Creates an empty chain of the given order.
	///
	/// # Errors
	/// Returns [`MarkovError::InvalidArgument`] if `order` is 0.
	pub fn new(order: usize) -> Result<Self> {
		if order == 0 {
			return Err(MarkovError::invalid(format!(
				"order must be positive (got {order})"
			)));
		}
		Ok(Self { order, knowledge: HashMap::new() })
	}

	pub fn order(&self) -> usize {
		self.order
	}

	/// Read-only view of the learned frequency tables.
	pub fn knowledge(&self) -> &HashMap<String, FrequencyDistribution> {
		&self.knowledge
	}

	/// Number of distinct contexts learned.
	pub fn len(&self) -> usize {
		self.knowledge.len()
	}

	pub fn is_empty(&self) -> bool {
		self.knowledge.is_empty()
	}

	/// Distribution recorded for an encoded context key.
	pub fn get(&self, key: &str) -> Option<&FrequencyDistribution> {
		self.knowledge.get(key)
	}

	/// Distribution recorded for the current contents of `window`.
	pub fn distribution(&self, window: &ContextWindow) -> Option<&FrequencyDistribution> {
		self.knowledge.get(&window.key())
	}

	/// Records one occurrence of `token` following the context `key`.
	///
	/// Inserts an empty distribution first if the context is new.
	pub fn record(&mut self, key: &str, token: &str) {
		match self.knowledge.get_mut(key) {
			Some(distribution) => distribution.record(token),
			None => {
				let mut distribution = FrequencyDistribution::new();
				distribution.record(token);
				self.knowledge.insert(key.to_owned(), distribution);
			}
		}
	}

	/// Trains the chain on every token of `reader`.
	///
	/// The context window starts from `order` empty placeholders on every
	/// call, so training twice on the same text doubles each count without
	/// adding contexts. Counts accumulate on top of earlier calls.
	///
	/// # Errors
	/// Returns [`MarkovError::ScanFailure`] if reading fails. Everything
	/// recorded before the failing read is kept.
	pub fn train<R: Read>(&mut self, reader: R) -> Result<TrainStats> {
		let contexts_before = self.knowledge.len();
		let mut window = ContextWindow::new(self.order);
		let mut stats = TrainStats::default();

		debug!("training order-{} chain with {} known contexts", self.order, contexts_before);

		for token in tokenize(reader) {
			let token = match token {
				Ok(token) => token,
				Err(err) => {
					warn!(
						"scan failed after {} tokens; keeping {} contexts learned so far",
						stats.tokens,
						self.knowledge.len()
					);
					return Err(err);
				}
			};

			self.record(&window.key(), &token);
			window.advance(&token);
			stats.tokens += 1;
		}

		stats.new_contexts = self.knowledge.len() - contexts_before;
		debug!(
			"trained on {} tokens; {} new contexts, {} total",
			stats.tokens,
			stats.new_contexts,
			self.knowledge.len()
		);
		Ok(stats)
	}

	/// Trains on `input` if one is available.
	///
	/// # Errors
	/// Returns [`MarkovError::InvalidArgument`] without touching the chain if
	/// `input` is `None`, otherwise behaves like [`Chain::train`].
	pub fn try_train<R: Read>(&mut self, input: Option<R>) -> Result<TrainStats> {
		match input {
			Some(reader) => self.train(reader),
			None => Err(MarkovError::invalid("got no input reader, want one")),
		}
	}

	/// Adds every count of `other` into this chain.
	///
	/// # Errors
	/// Returns [`MarkovError::InvalidArgument`] if the orders differ; the
	/// chain is left unchanged.
	pub fn merge(&mut self, other: &Self) -> Result<()> {
		if self.order != other.order {
			return Err(MarkovError::invalid(format!(
				"order mismatch: {} vs {}",
				self.order, other.order
			)));
		}

		for (key, distribution) in &other.knowledge {
			if let Some(existing) = self.knowledge.get_mut(key) {
				existing.merge(distribution);
			} else {
				self.knowledge.insert(key.clone(), distribution.clone());
			}
		}

		debug!("merged {} contexts into order-{} chain", other.knowledge.len(), self.order);
		Ok(())
	}

	pub fn stats(&self) -> ChainStats {
		ChainStats {
			order: self.order,
			contexts: self.knowledge.len(),
			transitions: self.knowledge.values().map(FrequencyDistribution::len).sum(),
			observations: self.knowledge.values().map(FrequencyDistribution::total).sum(),
		}
	}
}

/// Unvalidated wire form of a [`Chain`].
#[derive(Deserialize)]
struct ChainSnapshot {
	#[serde(rename = "Order")]
	order: usize,
	#[serde(rename = "Knowledge", default)]
	knowledge: HashMap<String, FrequencyDistribution>,
}

impl TryFrom<ChainSnapshot> for Chain {
	type Error = MarkovError;

	fn try_from(snapshot: ChainSnapshot) -> Result<Self> {
		let mut chain = Chain::new(snapshot.order)?;
		for (key, distribution) in &snapshot.knowledge {
			let width = decode_key(key)?.len();
			if width != chain.order {
				return Err(MarkovError::invalid(format!(
					"context {key:?} holds {width} tokens, want {}",
					chain.order
				)));
			}
			if distribution.has_zero_count() {
				return Err(MarkovError::invalid(format!(
					"context {key:?} has a zero count"
				)));
			}
		}
		chain.knowledge = snapshot.knowledge;
		Ok(chain)
	}
}
