//! Command-line interface for read-prep.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **resolve**: Expand list files into the inputs an analysis will read,
//!   optionally filtered
//! - **normalize**: Canonicalize CIGARs and fill base qualities of a SAM/BAM
//!
//! ## Usage
//!
//! ```text
//! # Expand list files
//! read-prep resolve inputs.list extra.bam
//!
//! # Keep tumor samples, drop a known-bad lane
//! read-prep resolve inputs.list --include tumor --exclude 'L00[3-4]'
//!
//! # Normalize a BAM, writing SAM to stdout
//! read-prep normalize sample.bam
//!
//! # Fill missing qualities with Q20 and write BAM
//! read-prep normalize sample.sam -o out.bam --fill-missing-qualities --default-base-quality 20
//! ```

use clap::{Parser, Subcommand};

pub mod normalize;
pub mod resolve;

#[derive(Parser)]
#[command(name = "read-prep")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Normalize alignment records and resolve analysis inputs")]
#[command(
    long_about = "read-prep prepares inputs for read-level analyses.\n\nIt expands list files into the set of alignment files to analyze, filters that set by literal or pattern rules, and normalizes alignment records:\n- Zero-length and adjacent duplicate CIGAR operations are collapsed\n- Missing base qualities can be filled with a default value\n- Original qualities (OQ tag) can be restored"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve inputs and list files into a flat set of resources
    Resolve(resolve::ResolveArgs),

    /// Normalize the records of a SAM/BAM file
    Normalize(normalize::NormalizeArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}
