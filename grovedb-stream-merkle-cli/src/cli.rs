use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Segment size used when none is given.
pub const DEFAULT_SEGMENT_SIZE: usize = 64;

#[derive(Parser, Debug)]
#[command(name = "stream-merkle", version, about = "Merkle roots and inclusion proofs over files")]
pub struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the Merkle root of a file
    Root {
        /// File to hash
        file: PathBuf,
        #[command(flatten)]
        segments: SegmentArgs,
    },
    /// Build an inclusion proof for one segment of a file
    Prove {
        /// File to hash
        file: PathBuf,
        /// Index of the segment to prove
        #[arg(short, long)]
        index: u64,
        /// Write the framed proof here instead of printing it
        #[arg(short, long)]
        out: Option<PathBuf>,
        #[command(flatten)]
        segments: SegmentArgs,
    },
    /// Verify a framed proof file
    Verify {
        /// Proof written by `prove --out`
        proof: PathBuf,
        /// Also require the proved segment to equal this file's contents
        #[arg(short, long)]
        leaf: Option<PathBuf>,
        /// Hash function the proof was built with
        #[arg(long, value_enum, default_value_t = HashAlgorithm::Blake3)]
        hash: HashAlgorithm,
    },
}

#[derive(clap::Args, Debug, Clone, Copy)]
pub struct SegmentArgs {
    /// Bytes per leaf segment
    #[arg(short, long, default_value_t = DEFAULT_SEGMENT_SIZE)]
    pub segment_size: usize,
    /// Hash function
    #[arg(long, value_enum, default_value_t = HashAlgorithm::Blake3)]
    pub hash: HashAlgorithm,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    Blake3,
    Sha256,
}
