use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use markov_core::io::ModelFormat;
use markov_core::{MarkovError, Result};

/// Output path used when `--out` is not given.
pub const DEFAULT_OUTPUT: &str = "markov.json";

/// Order used when `--order` is not given.
pub const DEFAULT_ORDER: usize = 2;

/// Where training text comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DataSource {
	/// Read from standard input (`--data stdin`).
	Stdin,
	/// Read from a file.
	File(PathBuf),
	/// No `--data` was supplied.
	Missing,
}

impl DataSource {
	/// Interprets the raw `--data` argument.
	pub fn from_arg(arg: Option<&str>) -> Self {
		match arg {
			None | Some("") => Self::Missing,
			Some("stdin") => Self::Stdin,
			Some(path) => Self::File(PathBuf::from(path)),
		}
	}

	/// Opens the source; `None` when no source was configured.
	pub fn open(&self) -> io::Result<Option<Box<dyn Read>>> {
		Ok(match self {
			Self::Stdin => Some(Box::new(io::stdin().lock())),
			Self::File(path) => Some(Box::new(File::open(path)?)),
			Self::Missing => None,
		})
	}
}

impl fmt::Display for DataSource {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Stdin => f.write_str("standard input"),
			Self::File(path) => write!(f, "{}", path.display()),
			Self::Missing => f.write_str("no input"),
		}
	}
}

/// Everything the `train` command needs, resolved from the command line.
///
/// # Invariants
/// - `order` is >= 1
/// - An explicit output path is used verbatim; only the default one
///   follows the chosen format's extension
#[derive(Clone, Debug)]
pub struct TrainConfig {
	/// Training text source.
	pub data: DataSource,

	/// Emit indented JSON.
	pub pretty: bool,

	/// Existing model to keep training instead of starting empty.
	pub resume: Option<PathBuf>,

	/// Order of the chain; must be positive.
	order: usize,

	/// Destination given with `--out`.
	out: Option<PathBuf>,

	/// Format given with `--format`.
	format: Option<ModelFormat>,
}

impl TrainConfig {
	/// Creates a configuration with the default order and output path.
	pub fn new(data: DataSource) -> Self {
		Self {
			data,
			pretty: false,
			resume: None,
			order: DEFAULT_ORDER,
			out: None,
			format: None,
		}
	}

	pub fn order(&self) -> usize {
		self.order
	}

	/// Destination of the trained model.
	///
	/// Without `--out`, this is `markov.json`, or `markov.bin` when the
	/// postcard format was requested.
	pub fn out(&self) -> PathBuf {
		match (&self.out, self.format) {
			(Some(out), _) => out.clone(),
			(None, Some(format)) => Path::new(DEFAULT_OUTPUT).with_extension(format.extension()),
			(None, None) => PathBuf::from(DEFAULT_OUTPUT),
		}
	}

	/// Format used to write [`TrainConfig::out`].
	pub fn format(&self) -> ModelFormat {
		self.format_for(&self.out())
	}

	/// Format used to read `path`: the explicit one, else the extension's.
	pub fn format_for(&self, path: &Path) -> ModelFormat {
		self.format.unwrap_or_else(|| ModelFormat::from_path(path))
	}

	/// Sets the chain order.
	///
	/// # Errors
	/// Returns an error if `order` is not positive.
	pub fn set_order(&mut self, order: i64) -> Result<()> {
		if order <= 0 {
			return Err(MarkovError::InvalidArgument(format!(
				"order must be positive (got {order})"
			)));
		}
		self.order = usize::try_from(order)
			.map_err(|_| MarkovError::InvalidArgument(format!("order {order} is too large")))?;
		Ok(())
	}

	pub fn set_out(&mut self, out: PathBuf) {
		self.out = Some(out);
	}

	/// Forces a format regardless of file extensions.
	pub fn set_format(&mut self, format: ModelFormat) {
		self.format = Some(format);
	}
}
