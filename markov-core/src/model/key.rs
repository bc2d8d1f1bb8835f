use crate::error::{MarkovError, Result};

/// Separates the escaped tokens of a key.
pub const DELIMITER: char = '$';

/// Escapes a literal delimiter or a literal escape inside a token.
pub const ESCAPE: char = '\\';

/// Encodes an ordered sequence of tokens into a single map key.
///
/// Every escape character is doubled first, then every delimiter is prefixed
/// with an escape, and the escaped tokens are joined with the bare delimiter.
/// The substitution order matters: escaping delimiters first would have their
/// freshly inserted escapes doubled by the second pass.
///
/// An empty sequence encodes to the empty string.
///
/// Example:
/// `["sea$hells", "$eem"]` → `sea\$hells$\$eem`
pub fn encode_key<I, S>(parts: I) -> String
where
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
{
	let mut key = String::new();
	for (i, part) in parts.into_iter().enumerate() {
		if i > 0 {
			key.push(DELIMITER);
		}
		let escaped = part
			.as_ref()
			.replace(ESCAPE, "\\\\")
			.replace(DELIMITER, "\\$");
		key.push_str(&escaped);
	}
	key
}

/// Splits a key produced by [`encode_key`] back into its tokens.
///
/// A key always decodes to at least one token: `""` is a single empty token,
/// which is what a window of order 1 holds before any input.
///
/// # Errors
/// Returns [`MarkovError::InvalidArgument`] if the key ends with a dangling
/// escape or escapes anything other than the delimiter or the escape itself.
pub fn decode_key(key: &str) -> Result<Vec<String>> {
	let mut parts = Vec::new();
	let mut current = String::new();
	let mut chars = key.chars();

	while let Some(c) = chars.next() {
		match c {
			ESCAPE => match chars.next() {
				Some(escaped @ (ESCAPE | DELIMITER)) => current.push(escaped),
				Some(other) => {
					return Err(MarkovError::invalid(format!(
						"unexpected escape sequence {ESCAPE}{other} in key {key:?}"
					)));
				}
				None => {
					return Err(MarkovError::invalid(format!(
						"dangling escape at end of key {key:?}"
					)));
				}
			},
			DELIMITER => parts.push(std::mem::take(&mut current)),
			_ => current.push(c),
		}
	}
	parts.push(current);

	Ok(parts)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn encodes_plain_tokens() {
		assert_eq!(encode_key(Vec::<String>::new()), "");
		assert_eq!(encode_key(["antiquing"]), "antiquing");
		assert_eq!(encode_key(["backyard", "maple", "tree"]), "backyard$maple$tree");
	}

	#[test]
	fn escapes_delimiters_and_escapes() {
		assert_eq!(encode_key(["ca$h"]), r"ca\$h");
		assert_eq!(encode_key(["sea$hells", "$eem", "super"]), r"sea\$hells$\$eem$super");
		assert_eq!(encode_key([r"back\slash"]), r"back\\slash");
		assert_eq!(encode_key([r"\\\"]), r"\\\\\\");
		assert_eq!(
			encode_key([r"$$\$\\", r"fan\ta$tic", "stuff"]),
			r"\$\$\\\$\\\\$fan\\ta\$tic$stuff"
		);
	}

	#[test]
	fn distinct_windows_never_collide() {
		assert_ne!(encode_key(["a$b"]), encode_key(["a", "b"]));
		assert_ne!(encode_key([r"\"]), encode_key([r"\\"]));
		assert_ne!(encode_key([r"a\", "b"]), encode_key([r"a\$b"]));
		assert_ne!(encode_key(["", ""]), encode_key(["$"]));
	}

	#[test]
	fn decode_inverts_encode() {
		let windows: Vec<Vec<&str>> = vec![
			vec![""],
			vec!["", ""],
			vec!["$", ""],
			vec![r"a\", "b"],
			vec![r"$$\$\\", r"fan\ta$tic", "stuff"],
		];
		for window in windows {
			let key = encode_key(&window);
			assert_eq!(decode_key(&key).expect("decode"), window, "key {key:?}");
		}
	}

	#[test]
	fn decode_rejects_malformed_escapes() {
		assert!(matches!(decode_key(r"abc\"), Err(MarkovError::InvalidArgument(_))));
		assert!(matches!(decode_key(r"a\bc"), Err(MarkovError::InvalidArgument(_))));
	}
}
