use clap::Args;

use crate::cli::OutputFormat;
use crate::core::resource::{ResourceReference, Tags};
use crate::matching::MatchMode;
use crate::resources::{unpack_tagged_bam_file_list, LocalFileSystem, MatchOn, ResourceFilter};

#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum MatchOnArg {
    /// Compare filters against the full path
    #[default]
    Path,
    /// Compare filters against the file name only
    FileName,
}

impl From<MatchOnArg> for MatchOn {
    fn from(arg: MatchOnArg) -> Self {
        match arg {
            MatchOnArg::Path => MatchOn::Path,
            MatchOnArg::FileName => MatchOn::FileName,
        }
    }
}

#[derive(Args)]
pub struct ResolveArgs {
    /// Input files or list files (*.list)
    #[arg(required = true)]
    pub inputs: Vec<String>,

    /// Tags attached to every input, e.g. "tumor,sample=NA12878"
    #[arg(long)]
    pub tags: Option<String>,

    /// Keep only resources matching one of these filters (repeatable)
    #[arg(long)]
    pub include: Vec<String>,

    /// Drop resources matching any of these filters (repeatable)
    #[arg(long)]
    pub exclude: Vec<String>,

    /// Treat filters as literal strings instead of regular expressions
    #[arg(long)]
    pub exact: bool,

    /// What filters are compared against
    #[arg(long, value_enum, default_value = "path")]
    pub match_on: MatchOnArg,
}

/// Execute resolve subcommand
///
/// # Errors
///
/// Returns an error if a list file cannot be read or a filter is invalid.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: ResolveArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let tags = args.tags.as_deref().map(Tags::parse).unwrap_or_default();

    let resolved = unpack_tagged_bam_file_list(
        args.inputs.iter().map(|input| (input.clone(), tags.clone())),
        &LocalFileSystem,
    )?;

    let filter = ResourceFilter {
        include: args.include.clone(),
        exclude: args.exclude.clone(),
        mode: MatchMode::from_exact(args.exact),
        match_on: args.match_on.into(),
    };
    let resolved_count = resolved.len();
    let kept = filter.apply(resolved)?;

    if verbose {
        eprintln!(
            "Resolved {resolved_count} resources from {} inputs, {} kept after filtering",
            args.inputs.len(),
            kept.len()
        );
    }

    match format {
        OutputFormat::Text => print_text(&kept),
        OutputFormat::Json => print_json(&kept)?,
        OutputFormat::Tsv => print_tsv(&kept),
    }

    Ok(())
}

fn print_text(references: &[ResourceReference]) {
    for reference in references {
        println!("{reference}");
    }
}

fn print_json(references: &[ResourceReference]) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(references)?);
    Ok(())
}

fn print_tsv(references: &[ResourceReference]) {
    println!("resource\tfile_name\ttags");
    for reference in references {
        println!(
            "{}\t{}\t{}",
            reference.id(),
            reference.file_name(),
            reference.tags()
        );
    }
}
