use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::str::FromStr;

use log::info;

use crate::error::{MarkovError, Result};
use crate::model::chain::Chain;

/// On-disk encoding of a chain snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ModelFormat {
	/// `{"Order": n, "Knowledge": {...}}` via serde_json.
	#[default]
	Json,
	/// Compact binary snapshot via postcard.
	Postcard,
}

impl ModelFormat {
	/// File extension conventionally used for the format.
	pub fn extension(self) -> &'static str {
		match self {
			Self::Json => "json",
			Self::Postcard => "bin",
		}
	}

	/// Picks the format from a path's extension.
	///
	/// `.bin` selects postcard; anything else, including no extension, is JSON.
	pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
		match path.as_ref().extension().and_then(|ext| ext.to_str()) {
			Some(ext) if ext.eq_ignore_ascii_case("bin") => Self::Postcard,
			_ => Self::Json,
		}
	}
}

impl FromStr for ModelFormat {
	type Err = MarkovError;

	fn from_str(s: &str) -> Result<Self> {
		match s.to_ascii_lowercase().as_str() {
			"json" => Ok(Self::Json),
			"bin" | "postcard" => Ok(Self::Postcard),
			other => Err(MarkovError::invalid(format!(
				"unknown model format {other:?} (expected json or bin)"
			))),
		}
	}
}

impl fmt::Display for ModelFormat {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.extension())
	}
}

/// Writes `chain` to `path`, replacing any existing file.
///
/// - `pretty` only affects JSON output
/// - On unix the file is created with mode `0600`
pub fn save_chain<P: AsRef<Path>>(path: P, chain: &Chain, format: ModelFormat, pretty: bool) -> Result<()> {
	let path = path.as_ref();
	let bytes = match format {
		ModelFormat::Json if pretty => serde_json::to_vec_pretty(chain)?,
		ModelFormat::Json => serde_json::to_vec(chain)?,
		ModelFormat::Postcard => postcard::to_stdvec(chain)?,
	};

	let file = create_private(path).map_err(|err| MarkovError::io(err, Some(path.to_path_buf())))?;
	let mut writer = BufWriter::new(file);
	writer
		.write_all(&bytes)
		.and_then(|()| writer.flush())
		.map_err(|err| MarkovError::io(err, Some(path.to_path_buf())))?;

	info!("saved order-{} chain ({} contexts) to {}", chain.order(), chain.len(), path.display());
	Ok(())
}

/// Reads a chain snapshot written in `format`.
///
/// Use [`ModelFormat::from_path`] when the extension is the only hint.
///
/// # Errors
/// Returns [`MarkovError::Io`] if the file cannot be read and
/// [`MarkovError::Serialization`] if it is not a valid `format` snapshot.
pub fn load_chain<P: AsRef<Path>>(path: P, format: ModelFormat) -> Result<Chain> {
	let path = path.as_ref();
	let mut bytes = Vec::new();
	File::open(path)
		.map(BufReader::new)
		.and_then(|mut reader| reader.read_to_end(&mut bytes))
		.map_err(|err| MarkovError::io(err, Some(path.to_path_buf())))?;

	let chain: Chain = match format {
		ModelFormat::Json => serde_json::from_slice(&bytes)?,
		ModelFormat::Postcard => postcard::from_bytes(&bytes)?,
	};
	info!("loaded order-{} chain ({} contexts) from {}", chain.order(), chain.len(), path.display());
	Ok(chain)
}

#[cfg(unix)]
fn create_private(path: &Path) -> io::Result<File> {
	use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

	let file = OpenOptions::new().write(true).create(true).truncate(true).mode(0o600).open(path)?;
	// mode() only applies to newly created files
	fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
	Ok(file)
}

#[cfg(not(unix))]
fn create_private(path: &Path) -> io::Result<File> {
	OpenOptions::new().write(true).create(true).truncate(true).open(path)
}
