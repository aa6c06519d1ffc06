//! CLI schema for the implreg binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "implreg")]
#[command(about = "Build and query contract implementation registries")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Verbose logging
	#[arg(short, long, global = true)]
	pub verbose: bool,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
	/// Resolve the declarations in a manifest and merge them into registry files
	Aggregate {
		/// Declaration manifest (TOML)
		#[arg(short, long, value_name = "FILE")]
		manifest: PathBuf,

		/// Directory the registry files are written under
		#[arg(short, long, value_name = "DIR")]
		out: PathBuf,

		/// Registry options (TOML)
		#[arg(long, value_name = "FILE")]
		options: Option<PathBuf>,
	},
	/// List the implementations registered for a contract
	Query {
		/// Contract identifier
		contract: String,

		/// Directory to search, in precedence order (repeatable)
		#[arg(short, long = "root", value_name = "DIR", required = true)]
		roots: Vec<PathBuf>,

		/// Keep implementations with one of these kinds (repeatable)
		#[arg(short, long = "kind", value_name = "KIND")]
		kinds: Vec<String>,

		/// Keep implementors whose identifier fully matches this pattern
		#[arg(short, long, value_name = "REGEX")]
		pattern: Option<String>,

		/// Manifest describing the implementor types, for --assignable
		#[arg(short, long, value_name = "FILE")]
		manifest: Option<PathBuf>,

		/// Keep implementors assignable to this type (repeatable, any may match)
		#[arg(short, long, value_name = "TYPE")]
		assignable: Vec<String>,

		/// Registry options (TOML)
		#[arg(long, value_name = "FILE")]
		options: Option<PathBuf>,
	},
}
