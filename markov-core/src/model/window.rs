use std::collections::VecDeque;

use super::key::encode_key;

/// The most recent `order` tokens, oldest first.
///
/// A fresh window holds `order` empty strings, standing for "nothing seen
/// yet". Its length never changes: every [`advance`](Self::advance) drops the
/// oldest token as it appends the newest.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContextWindow {
	tokens: VecDeque<String>,
}

impl ContextWindow {
	/// Creates a window of `order` empty placeholders.
	pub fn new(order: usize) -> Self {
		Self {
			tokens: std::iter::repeat_with(String::new).take(order).collect(),
		}
	}

	/// Number of tokens the window holds.
	pub fn order(&self) -> usize {
		self.tokens.len()
	}

	/// Drops the oldest token and appends `token`.
	pub fn advance(&mut self, token: &str) {
		if self.tokens.pop_front().is_some() {
			self.tokens.push_back(token.to_owned());
		}
	}

	/// Refills the window with empty placeholders.
	pub fn reset(&mut self) {
		self.tokens.iter_mut().for_each(String::clear);
	}

	/// Encoded map key for the current contents.
	pub fn key(&self) -> String {
		encode_key(&self.tokens)
	}

	/// Iterates over the tokens, oldest first.
	pub fn tokens(&self) -> impl Iterator<Item = &str> {
		self.tokens.iter().map(String::as_str)
	}
}
