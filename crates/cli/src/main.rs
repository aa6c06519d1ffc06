//! implreg binary.
//!
//! `aggregate` plays the build tool: it resolves the declarations listed in a
//! manifest and merges them into registry files. `query` reads those files
//! back, orders and filters them, and prints one implementation per line.

mod cli;
mod run;

use clap::Parser;

use crate::cli::{Cli, Command};

fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();
	setup_tracing(cli.verbose);

	match cli.command {
		Command::Aggregate { manifest, out, options } => {
			let report = run::aggregate(&manifest, &out, options.as_deref())?;
			for location in &report.written {
				println!("{}", out.join(location).display());
			}
			if !report.is_clean() {
				anyhow::bail!("{} declaration(s) or contract(s) failed", report.errors.len());
			}
		}
		Command::Query {
			contract,
			roots,
			kinds,
			pattern,
			manifest,
			assignable,
			options,
		} => {
			let query = run::QueryArgs {
				contract,
				roots,
				kinds,
				pattern,
				manifest,
				assignable,
				options,
			};
			for info in run::query(&query)? {
				println!("{}", run::describe(&info));
			}
		}
	}
	Ok(())
}

fn setup_tracing(verbose: bool) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
		if verbose {
			EnvFilter::new("implreg=debug,info")
		} else {
			EnvFilter::new("info")
		}
	});

	tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).with_target(verbose).init();
}
