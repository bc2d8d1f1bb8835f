use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Observed counts of the tokens that followed one context.
///
/// Conceptually, this is a node in a Markov chain where outgoing edges
/// are weighted by their number of observations.
///
/// ## Responsibilities:
/// - Accumulate occurrences during training
/// - Answer count and frequency queries
/// - Merge with the distribution of the same context from another chain
///
/// ## Invariants
/// - Every stored count is strictly positive
/// - Counts never decrease
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct FrequencyDistribution {
	/// Example: { "posts" => 2, "supporting" => 1 }
	counts: HashMap<String, u64>,
}

impl FrequencyDistribution {
	/// Creates an empty distribution.
	pub fn new() -> Self {
		Self::default()
	}

	/// Records one occurrence of `token`.
	///
	/// - If the token was already seen, its count is increased by one.
	/// - Otherwise, it is inserted with a count of 1.
	pub fn record(&mut self, token: &str) {
		match self.counts.get_mut(token) {
			Some(count) => *count += 1,
			None => {
				self.counts.insert(token.to_owned(), 1);
			}
		}
	}

	/// Times `token` was observed; 0 if never.
	pub fn count(&self, token: &str) -> u64 {
		self.counts.get(token).copied().unwrap_or(0)
	}

	/// Sum of all counts.
	pub fn total(&self) -> u64 {
		self.counts.values().sum()
	}

	/// Number of distinct tokens observed.
	pub fn len(&self) -> usize {
		self.counts.len()
	}

	pub fn is_empty(&self) -> bool {
		self.counts.is_empty()
	}

	/// Iterates over `(token, count)` pairs in no particular order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
		self.counts.iter().map(|(token, count)| (token.as_str(), *count))
	}

	/// The token with the highest count.
	///
	/// Ties go to the lexicographically smallest token so the answer does not
	/// depend on hash order. Returns `None` for an empty distribution.
	pub fn most_frequent(&self) -> Option<(&str, u64)> {
		self.iter()
			.min_by(|(a_token, a_count), (b_token, b_count)| {
				b_count.cmp(a_count).then_with(|| a_token.cmp(b_token))
			})
	}

	/// Adds every count of `other` into this distribution.
	///
	/// This is intended for combining chains trained separately,
	/// where each holds a partial view of the same context.
	pub fn merge(&mut self, other: &Self) {
		for (token, count) in &other.counts {
			*self.counts.entry(token.clone()).or_insert(0) += *count;
		}
	}

	/// Returns `true` if any stored count is zero.
	pub(crate) fn has_zero_count(&self) -> bool {
		self.counts.values().any(|count| *count == 0)
	}
}

/// Builds a distribution from `(token, count)` pairs.
///
/// Repeated tokens are summed; zero counts are skipped.
impl<S: Into<String>> FromIterator<(S, u64)> for FrequencyDistribution {
	fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
		let mut distribution = Self::new();
		for (token, count) in iter.into_iter().filter(|(_, count)| *count > 0) {
			*distribution.counts.entry(token.into()).or_insert(0) += count;
		}
		distribution
	}
}
