//! `skinpack-merge merge`: load folders, merge them, write the result.

use std::fmt;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;
use serde::Serialize;
use tracing::info_span;

use skinpack::config::SkinpackConfig;
use skinpack::merge::{
    MergeSession, MergeStats, MergeWarning, MergedResult, OutputNaming, PackageFailure,
    PackageSummary, ProgressObserver,
};
use skinpack::output::{ArchiveReport, archive_file_name, write_archive_file, write_json_dir};
use skinpack::package::{LoadError, load_packages};

use crate::format::OutputFormat;

#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Skin pack folders, merged in the order given.
    ///
    /// Earlier folders win: their skin names and geometry identifiers are
    /// kept as-is, and their textures are kept when a later folder has a
    /// file with the same name.
    #[arg(required = true, value_name = "FOLDER")]
    pub folders: Vec<PathBuf>,

    /// Merged package identifier (`serialize_name`).
    ///
    /// Defaults to `[output] package_name` from the config, then to the
    /// inputs' names joined with `_`.
    #[arg(long, value_name = "NAME")]
    pub package_name: Option<String>,

    /// Merged display name (`localization_name`).
    ///
    /// Defaults to `[output] display_name` from the config, then to the
    /// inputs' names joined with ` + `.
    #[arg(long, value_name = "NAME")]
    pub display_name: Option<String>,

    /// Archive path (default: `<package name>_merged.zip` in the current
    /// directory)
    #[arg(short, long, value_name = "FILE", conflicts_with = "json_dir")]
    pub output: Option<PathBuf>,

    /// Write `merged_skins.json` and `merged_geometry.json` into DIR
    /// instead of an archive. Textures are not copied.
    #[arg(long, value_name = "DIR")]
    pub json_dir: Option<PathBuf>,

    /// Output format: text or json
    #[arg(long)]
    pub format: Option<OutputFormat>,

    /// Shorthand for --format json
    #[arg(long, hide = true, conflicts_with = "format")]
    pub json: bool,
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// A folder that could not be loaded and was left out.
#[derive(Debug, Serialize)]
pub struct LoadFailure {
    pub folder: PathBuf,
    pub error: String,
}

impl LoadFailure {
    pub fn from_pairs(failed: Vec<(PathBuf, LoadError)>) -> Vec<Self> {
        failed
            .into_iter()
            .map(|(folder, e)| Self {
                folder,
                error: e.to_string(),
            })
            .collect()
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Written {
    Archive {
        path: PathBuf,
        #[serde(flatten)]
        report: ArchiveReport,
    },
    JsonDir {
        files: Vec<PathBuf>,
    },
}

#[derive(Debug, Serialize)]
struct MergeReport {
    serialize_name: String,
    localization_name: String,
    stats: MergeStats,
    packages: Vec<PackageSummary>,
    load_failures: Vec<LoadFailure>,
    package_failures: Vec<PackageFailure>,
    warnings: Vec<MergeWarning>,
    output: Written,
}

impl fmt::Display for MergeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Merged {} ({})", self.serialize_name, self.localization_name)?;
        for p in &self.packages {
            if p.merged {
                writeln!(
                    f,
                    "  {}: {} skins, {} geometries, {} renamed",
                    p.folder_name, p.skins, p.geometries, p.renamed
                )?;
            } else {
                writeln!(f, "  {}: skipped", p.folder_name)?;
            }
        }
        writeln!(f)?;
        writeln!(f, "{}", self.stats)?;

        if !self.load_failures.is_empty() || !self.package_failures.is_empty() {
            writeln!(f)?;
            writeln!(f, "Failed packages:")?;
            for failure in &self.load_failures {
                writeln!(f, "  {}: {}", failure.folder.display(), failure.error)?;
            }
            for failure in &self.package_failures {
                writeln!(f, "  {failure}")?;
            }
        }

        if !self.warnings.is_empty() {
            writeln!(f)?;
            writeln!(f, "Warnings:")?;
            for w in &self.warnings {
                writeln!(f, "  {w}")?;
            }
        }

        writeln!(f)?;
        match &self.output {
            Written::Archive { path, report } => {
                write!(f, "Wrote {}: {report}", path.display())
            }
            Written::JsonDir { files } => {
                write!(f, "Wrote")?;
                for file in files {
                    write!(f, " {}", file.display())?;
                }
                Ok(())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

pub fn run(args: &MergeArgs, config: &SkinpackConfig, quiet: bool) -> Result<()> {
    let format = OutputFormat::with_json_flag(args.format, args.json);

    let (packages, failed) = load_packages(&args.folders, &config.load);
    let load_failures = LoadFailure::from_pairs(failed);
    if !quiet {
        for failure in &load_failures {
            eprintln!(
                "warning: skipping {}: {}",
                failure.folder.display(),
                failure.error
            );
        }
    }
    if packages.is_empty() {
        bail!("none of the {} folder(s) could be loaded", args.folders.len());
    }

    let naming = OutputNaming::new(
        args.package_name
            .clone()
            .unwrap_or_else(|| config.output.package_name.clone()),
        args.display_name
            .clone()
            .unwrap_or_else(|| config.output.display_name.clone()),
    );

    let mut merge_progress = |percent: f64, message: &str| {
        if !quiet {
            eprintln!("[{percent:>3.0}%] {message}");
        }
    };

    let (summaries, result) = {
        let span = info_span!("merge", packages = packages.len());
        let _enter = span.enter();

        let mut session = MergeSession::new(&packages, naming)?;
        let mut summaries = Vec::with_capacity(packages.len());
        while let Some(summary) = session.step(&mut merge_progress)? {
            summaries.push(summary);
        }
        (summaries, session.finish(&mut merge_progress)?)
    };

    let mut write_progress = |percent: f64, message: &str| {
        if !quiet {
            eprintln!("[write {percent:>3.0}%] {message}");
        }
    };
    let output = write_output(args, config, &result, &mut write_progress)?;

    let report = MergeReport {
        serialize_name: result.skin_document.serialize_name.clone(),
        localization_name: result.skin_document.localization_name.clone(),
        stats: result.stats,
        packages: summaries,
        load_failures,
        package_failures: result.package_failures,
        warnings: result.warnings,
        output,
    };
    println!("{}", format.render(&report)?);
    Ok(())
}

fn write_output(
    args: &MergeArgs,
    config: &SkinpackConfig,
    result: &MergedResult,
    observer: &mut dyn ProgressObserver,
) -> Result<Written> {
    if let Some(dir) = &args.json_dir {
        let files = write_json_dir(result, dir)
            .with_context(|| format!("failed to write JSON output to {}", dir.display()))?;
        return Ok(Written::JsonDir { files });
    }

    let path = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(archive_file_name(result, &config.output.archive_suffix)));
    let report = write_archive_file(result, &path, config.load.read_timeout(), observer)
        .with_context(|| format!("failed to write archive {}", path.display()))?;
    Ok(Written::Archive { path, report })
}
