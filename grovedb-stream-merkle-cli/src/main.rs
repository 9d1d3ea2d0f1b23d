mod cli;
mod commands;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "grovedb_stream_merkle_tree={},grovedb_stream_merkle_cli={}",
            log_level, log_level
        ))
    });
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Root { file, segments } => {
            match commands::root(&file, segments)? {
                Some(root) => println!("{}", hex::encode(root)),
                None => println!("(empty)"),
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Prove {
            file,
            index,
            out,
            segments,
        } => {
            let proof = commands::prove(&file, index, out.as_deref(), segments)?;
            if out.is_none() {
                print!("{}", commands::describe(&proof));
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Verify { proof, leaf, hash } => {
            if commands::verify(&proof, leaf.as_deref(), hash)? {
                println!("valid");
                Ok(ExitCode::SUCCESS)
            } else {
                println!("invalid");
                Ok(ExitCode::FAILURE)
            }
        }
    }
}
