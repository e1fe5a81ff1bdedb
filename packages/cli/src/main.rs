//! `opengraph` — command-line interface for OpenGraph documents.
//!
//! Provides two subcommands:
//!
//! - **`check`** — replay a document through the builder and validate it.
//! - **`normalize`** — replay, validate, and re-emit the canonical document.
//!
//! Both read JSON from a file path or from stdin (`-`). Diagnostics go to
//! stderr; set `RUST_LOG` to adjust verbosity. See [`config::CliConfig`] for
//! the environment variables that set defaults.

mod config;
mod replay;

use std::io;
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use opengraph::{GraphBuilder, MergePolicy};

use config::CliConfig;

/// opengraph — OpenGraph document CLI
///
/// Check and normalize graph documents before handing them to an ingestor.
#[derive(Parser)]
#[command(name = "opengraph", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct InputArgs {
    /// Path to a JSON document, or `-` for stdin.
    file: PathBuf,

    /// Merge nodes that repeat an id instead of rejecting the document.
    #[arg(long, overrides_with = "no_merge")]
    merge: bool,

    /// Reject documents that repeat a node id, even if `OPENGRAPH_MERGE` is set.
    #[arg(long, overrides_with = "merge")]
    no_merge: bool,
}

impl InputArgs {
    /// The flags win over the environment; the last of `--merge`/`--no-merge` wins.
    fn merge_policy(&self, config: &CliConfig) -> MergePolicy {
        let merge = if self.merge {
            true
        } else if self.no_merge {
            false
        } else {
            config.merge
        };
        MergePolicy::from_flag(merge)
    }
}

#[derive(Subcommand)]
enum Command {
    /// Validate a document: schema, unique ids, and resolvable edge endpoints.
    ///
    /// Exits 0 if the document is valid, 1 if it breaks a graph rule, and 2 if
    /// it cannot be read or parsed.
    Check {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Validate a document and print its canonical form.
    ///
    /// Null properties are dropped, empty property maps are omitted, and
    /// repeated ids are merged when `--merge` is given.
    ///
    /// Examples:
    ///   opengraph normalize graph.json -o clean.json
    ///   cat graph.json | opengraph normalize - --compact
    Normalize {
        #[command(flatten)]
        input: InputArgs,

        /// Spaces per indentation level.
        #[arg(long, value_name = "N", conflicts_with = "compact")]
        indent: Option<usize>,

        /// Emit compact JSON on a single line.
        #[arg(long)]
        compact: bool,

        /// Write to this file instead of stdout.
        #[arg(short = 'o', long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "opengraph=warn".into()),
        )
        .init();

    let config = CliConfig::from_env();
    let cli = Cli::parse();

    match cli.command {
        Command::Check { input } => {
            let graph = load(&input, &config);
            println!(
                "valid ({} nodes, {} edges)",
                graph.node_count(),
                graph.edge_count()
            );
        }

        Command::Normalize {
            input,
            indent,
            compact,
            output,
        } => {
            let graph = load(&input, &config);
            let indent = if compact {
                None
            } else {
                Some(indent.unwrap_or(config.indent))
            };
            match output {
                Some(path) => {
                    graph
                        .save_to_file(&path, indent)
                        .unwrap_or_else(|e| fatal(&e.to_string()));
                }
                None => {
                    let json = graph
                        .to_json(indent)
                        .unwrap_or_else(|e| fatal(&e.to_string()));
                    println!("{json}");
                }
            }
        }
    }
}

/// Read, parse, replay, and validate the input document.
///
/// Exits 1 on a graph rule violation and 2 on unreadable or unparsable input.
fn load(input: &InputArgs, config: &CliConfig) -> GraphBuilder {
    let policy = input.merge_policy(config);
    let result =
        replay::read_input(&input.file).and_then(|json| replay::load_str(&json, policy));
    match result {
        Ok(graph) => {
            tracing::info!(
                nodes = graph.node_count(),
                edges = graph.edge_count(),
                "document valid"
            );
            graph
        }
        Err(e) => {
            eprintln!("{}", e.report());
            process::exit(e.exit_code());
        }
    }
}

/// Print an error message to stderr and exit with code 2.
fn fatal(msg: &str) -> ! {
    eprintln!("opengraph: {msg}");
    process::exit(2);
}

// --- tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn input(args: &[&str]) -> InputArgs {
        let argv = ["opengraph", "check", "graph.json"]
            .into_iter()
            .chain(args.iter().copied());
        match Cli::parse_from(argv).command {
            Command::Check { input } => input,
            Command::Normalize { .. } => unreachable!(),
        }
    }

    #[test]
    fn merge_flags_override_environment() {
        let env_merge = CliConfig { merge: true, ..CliConfig::default() };
        let env_reject = CliConfig::default();

        assert_eq!(input(&[]).merge_policy(&env_merge), MergePolicy::Merge);
        assert_eq!(input(&[]).merge_policy(&env_reject), MergePolicy::Reject);
        assert_eq!(input(&["--no-merge"]).merge_policy(&env_merge), MergePolicy::Reject);
        assert_eq!(input(&["--merge"]).merge_policy(&env_reject), MergePolicy::Merge);
        assert_eq!(
            input(&["--merge", "--no-merge"]).merge_policy(&env_merge),
            MergePolicy::Reject
        );
    }
}
