use std::path::PathBuf;

use clap::Args;
use tracing::info;

use crate::cli::OutputFormat;
use crate::normalize::{NormalizeOptions, NormalizeStats, ReadNormalizer};
use crate::parsing::sam::{create_writer, open_reader};
use crate::utils::validation::{DEFAULT_BASE_QUALITY, MAX_PHRED};

#[derive(Args)]
pub struct NormalizeArgs {
    /// Input SAM or BAM file, '-' for SAM on stdin
    #[arg(required = true)]
    pub input: PathBuf,

    /// Output file (.sam or .bam); SAM on stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Fill missing or truncated base qualities with --default-base-quality
    #[arg(long)]
    pub fill_missing_qualities: bool,

    /// Phred score used when filling base qualities
    #[arg(
        long,
        default_value_t = DEFAULT_BASE_QUALITY,
        value_parser = clap::value_parser!(u8).range(0..=i64::from(MAX_PHRED))
    )]
    pub default_base_quality: u8,

    /// Replace base qualities with the original qualities from the OQ tag
    #[arg(long)]
    pub use_original_qualities: bool,
}

impl NormalizeArgs {
    fn options(&self) -> NormalizeOptions {
        NormalizeOptions {
            fill_missing_qualities: self.fill_missing_qualities,
            default_base_quality: self.default_base_quality,
            use_original_qualities: self.use_original_qualities,
        }
    }
}

/// Execute normalize subcommand
///
/// # Errors
///
/// Returns an error if the input cannot be read, a record is malformed, or
/// the output cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: NormalizeArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let (header, records) = open_reader(&args.input)?;
    let mut writer = create_writer(args.output.as_deref())?;
    writer.write_alignment_header(&header)?;

    let mut normalizer = ReadNormalizer::new(records, args.options())?;
    for record in normalizer.by_ref() {
        let record = record?;
        writer.write_alignment_record(&header, &record)?;
    }
    writer.finish(&header)?;

    let stats = normalizer.stats();
    info!(
        records = stats.records,
        cigars_consolidated = stats.cigars_consolidated,
        qualities_filled = stats.qualities_filled,
        original_qualities_restored = stats.original_qualities_restored,
        "Normalization complete"
    );

    if verbose {
        print_stats(&stats, format)?;
    }

    Ok(())
}

fn print_stats(stats: &NormalizeStats, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            eprintln!("Records: {}", stats.records);
            eprintln!("CIGARs consolidated: {}", stats.cigars_consolidated);
            eprintln!("Qualities filled: {}", stats.qualities_filled);
            eprintln!(
                "Original qualities restored: {}",
                stats.original_qualities_restored
            );
        }
        OutputFormat::Json => eprintln!("{}", serde_json::to_string_pretty(stats)?),
        OutputFormat::Tsv => {
            eprintln!("records\tcigars_consolidated\tqualities_filled\toriginal_qualities_restored");
            eprintln!(
                "{}\t{}\t{}\t{}",
                stats.records,
                stats.cigars_consolidated,
                stats.qualities_filled,
                stats.original_qualities_restored
            );
        }
    }
    Ok(())
}
