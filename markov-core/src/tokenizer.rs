use std::collections::VecDeque;
use std::io::{self, BufRead, BufReader, Read};
use std::iter::FusedIterator;

use crate::error::{MarkovError, Result};

/// Characters split off the end of a word into their own token.
pub const SENTENCE_TERMINATORS: [char; 3] = ['.', '!', '?'];

/// Returns `true` if `c` ends a sentence.
///
/// Only the three ASCII terminators count; other scripts' full stops are
/// treated as ordinary word characters.
pub fn is_sentence_terminator(c: char) -> bool {
	SENTENCE_TERMINATORS.contains(&c)
}

/// Wraps any reader into a lazy token stream.
pub fn tokenize<R: Read>(reader: R) -> Tokens<BufReader<R>> {
	Tokens::new(BufReader::new(reader))
}

/// Lazy, single-pass token stream over a buffered reader.
///
/// Input is split on whitespace; a word longer than one character that ends
/// with a sentence terminator yields the word and then the terminator.
///
/// The reader is consumed one buffer at a time, so the whole input is never
/// held in memory. Bytes that are not valid UTF-8 become U+FFFD.
///
/// The first read error is yielded as [`MarkovError::ScanFailure`]; the word
/// being accumulated at that point is dropped. After an error or the end of
/// the stream the iterator only returns `None`.
#[derive(Debug)]
pub struct Tokens<R> {
	reader: R,
	/// Undecoded bytes: at most an incomplete UTF-8 sequence between reads.
	carry: Vec<u8>,
	scanner: Scanner,
	finished: bool,
}

impl<R: BufRead> Tokens<R> {
	pub fn new(reader: R) -> Self {
		Self {
			reader,
			carry: Vec::new(),
			scanner: Scanner::default(),
			finished: false,
		}
	}

	/// Decodes as much of `carry` as possible, keeping an incomplete tail.
	fn decode_carry(&mut self) {
		let mut start = 0;
		while start < self.carry.len() {
			let bytes = &self.carry[start..];
			match std::str::from_utf8(bytes) {
				Ok(text) => {
					self.scanner.push_str(text);
					start = self.carry.len();
				}
				Err(err) => {
					let valid = err.valid_up_to();
					if let Ok(text) = std::str::from_utf8(&bytes[..valid]) {
						self.scanner.push_str(text);
					}
					match err.error_len() {
						Some(invalid) => {
							self.scanner.push_char(char::REPLACEMENT_CHARACTER);
							start += valid + invalid;
						}
						None => {
							start += valid;
							break;
						}
					}
				}
			}
		}
		self.carry.drain(..start);
	}
}

impl<R: BufRead> Iterator for Tokens<R> {
	type Item = Result<String>;

	fn next(&mut self) -> Option<Self::Item> {
		loop {
			if let Some(token) = self.scanner.ready.pop_front() {
				return Some(Ok(token));
			}
			if self.finished {
				return None;
			}

			let read = match self.reader.fill_buf() {
				Ok(chunk) => {
					self.carry.extend_from_slice(chunk);
					chunk.len()
				}
				Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
				Err(err) => {
					self.finished = true;
					self.scanner.current.clear();
					return Some(Err(MarkovError::ScanFailure(err)));
				}
			};

			if read == 0 {
				self.finished = true;
				if !self.carry.is_empty() {
					// Stream ended inside a multi-byte sequence
					self.carry.clear();
					self.scanner.push_char(char::REPLACEMENT_CHARACTER);
				}
				self.scanner.finish_word();
				continue;
			}

			self.reader.consume(read);
			self.decode_carry();
		}
	}
}

impl<R: BufRead> FusedIterator for Tokens<R> {}

/// Character-level word splitter feeding the token queue.
#[derive(Debug, Default)]
struct Scanner {
	current: String,
	ready: VecDeque<String>,
}

impl Scanner {
	fn push_str(&mut self, text: &str) {
		text.chars().for_each(|c| self.push_char(c));
	}

	fn push_char(&mut self, c: char) {
		if c.is_whitespace() {
			self.finish_word();
		} else {
			self.current.push(c);
		}
	}

	/// Queues the accumulated word, splitting off a trailing terminator.
	fn finish_word(&mut self) {
		if self.current.is_empty() {
			return;
		}
		let mut word = std::mem::take(&mut self.current);

		let mut chars = word.chars();
		if let Some(last) = chars.next_back() {
			if is_sentence_terminator(last) && !chars.as_str().is_empty() {
				word.pop();
				self.ready.push_back(word);
				self.ready.push_back(last.to_string());
				return;
			}
		}
		self.ready.push_back(word);
	}
}
