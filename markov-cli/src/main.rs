use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Args, Parser, Subcommand};
use env_logger::Env;
use log::info;
use markov_core::io::{ModelFormat, load_chain, save_chain};
use markov_core::{Chain, decode_key};

mod config;

use config::{DataSource, TrainConfig};

#[derive(Parser, Debug)]
#[command(name = "markovian", author, version, about = "Word-level Markov chain trainer", long_about = None)]
struct Cli {
	/// Increase verbosity (-v, -vv)
	#[arg(short = 'v', long, global = true, action = ArgAction::Count)]
	verbose: u8,

	/// Decrease verbosity (-q, -qq)
	#[arg(short = 'q', long, global = true, action = ArgAction::Count)]
	quiet: u8,

	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
	/// Train a Markov chain
	Train(TrainArgs),
	/// Summarize a trained Markov chain
	Info(InfoArgs),
}

#[derive(Args, Debug)]
struct TrainArgs {
	/// A file of data to train on, or "stdin" to use standard input
	#[arg(long, value_name = "PATH")]
	data: Option<String>,

	/// File to store the chain in; overwritten if it exists
	#[arg(short, long, value_name = "PATH")]
	out: Option<PathBuf>,

	/// Order of the chain [default: 2, or the order of --resume]
	#[arg(long, value_name = "N", allow_negative_numbers = true)]
	order: Option<i64>,

	/// Snapshot format (json or bin) for --out and --resume; defaults to their extensions
	#[arg(long, value_name = "FORMAT")]
	format: Option<ModelFormat>,

	/// Emit pretty JSON
	#[arg(long)]
	pretty: bool,

	/// Continue training an existing chain
	#[arg(long, value_name = "MODEL")]
	resume: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct InfoArgs {
	/// Trained chain to inspect
	model: PathBuf,

	/// Snapshot format (json or bin); defaults to the model extension
	#[arg(long, value_name = "FORMAT")]
	format: Option<ModelFormat>,

	/// Number of most observed contexts to list
	#[arg(long, value_name = "N", default_value_t = 5)]
	top: usize,
}

fn main() -> Result<()> {
	let cli = Cli::parse();
	init_logging(cli.verbose, cli.quiet);

	match cli.command {
		Commands::Train(args) => run_train(args),
		Commands::Info(args) => run_info(args),
	}
}

fn init_logging(verbose: u8, quiet: u8) {
	use log::LevelFilter;

	// Without -v/-q, RUST_LOG decides
	let level = match (quiet, verbose) {
		(0, 0) => None,
		(1, _) => Some(LevelFilter::Warn),
		(q, _) if q > 1 => Some(LevelFilter::Error),
		(_, 1) => Some(LevelFilter::Debug),
		_ => Some(LevelFilter::Trace),
	};

	let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
	builder.format_timestamp_millis();
	if let Some(level) = level {
		builder.filter_level(level);
	}
	let _ = builder.try_init();
}

fn train_config(args: TrainArgs) -> Result<TrainConfig> {
	let mut cfg = TrainConfig::new(DataSource::from_arg(args.data.as_deref()));
	if let Some(order) = args.order {
		cfg.set_order(order)?;
	}
	if let Some(out) = args.out {
		cfg.set_out(out);
	}
	if let Some(format) = args.format {
		cfg.set_format(format);
	}
	cfg.pretty = args.pretty;
	cfg.resume = args.resume;
	Ok(cfg)
}

fn run_train(args: TrainArgs) -> Result<()> {
	let order_given = args.order.is_some();
	let cfg = train_config(args)?;

	let mut chain = match &cfg.resume {
		Some(path) => {
			let chain = load_chain(path, cfg.format_for(path))
				.with_context(|| format!("couldn't load chain from {}", path.display()))?;
			if order_given && chain.order() != cfg.order() {
				bail!(
					"--order {} does not match the order {} of {}",
					cfg.order(),
					chain.order(),
					path.display()
				);
			}
			chain
		}
		None => Chain::new(cfg.order()).context("couldn't create Markov chain")?,
	};

	let input = cfg.data.open().with_context(|| format!("couldn't open {}", cfg.data))?;
	let stats = chain.try_train(input).with_context(|| match &cfg.data {
		DataSource::Missing => "must provide input file path (--data <PATH|stdin>)".to_owned(),
		source => format!("couldn't train on {source}"),
	})?;
	info!(
		"read {} tokens; {} new contexts, {} total",
		stats.tokens,
		stats.new_contexts,
		chain.len()
	);

	let out = cfg.out();
	save_chain(&out, &chain, cfg.format(), cfg.pretty)
		.with_context(|| format!("couldn't save chain to {}", out.display()))?;
	Ok(())
}

fn run_info(args: InfoArgs) -> Result<()> {
	let format = args.format.unwrap_or_else(|| ModelFormat::from_path(&args.model));
	let chain = load_chain(&args.model, format)
		.with_context(|| format!("couldn't load chain from {}", args.model.display()))?;
	let stats = chain.stats();

	println!("Order:        {}", stats.order);
	println!("Contexts:     {}", stats.contexts);
	println!("Transitions:  {}", stats.transitions);
	println!("Observations: {}", stats.observations);

	let mut contexts: Vec<_> = chain
		.knowledge()
		.iter()
		.map(|(key, distribution)| (key.as_str(), distribution))
		.collect();
	contexts.sort_by(|(a_key, a), (b_key, b)| b.total().cmp(&a.total()).then_with(|| a_key.cmp(b_key)));

	for (key, distribution) in contexts.into_iter().take(args.top) {
		let window = decode_key(key)?.join(" ");
		let (next, count) = distribution.most_frequent().unwrap_or(("", 0));
		println!("  [{window}] x{} -> {next:?} ({count})", distribution.total());
	}
	Ok(())
}
