//! `skinpack-merge inspect`: summarize packs without merging them.

use std::fmt;
use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Args;
use serde::Serialize;

use skinpack::config::SkinpackConfig;
use skinpack::model::{AssetPackage, PackageInfo};
use skinpack::package::load_packages;

use crate::format::OutputFormat;
use crate::merge_cmd::LoadFailure;

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Skin pack folders to summarize
    #[arg(required = true, value_name = "FOLDER")]
    pub folders: Vec<PathBuf>,

    /// Output format: text or json
    #[arg(long)]
    pub format: Option<OutputFormat>,

    /// Shorthand for --format json
    #[arg(long, hide = true, conflicts_with = "format")]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct InspectReport {
    packages: Vec<PackageInfo>,
    load_failures: Vec<LoadFailure>,
}

impl fmt::Display for InspectReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, info) in self.packages.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
                writeln!(f)?;
            }
            write!(f, "{info}")?;
        }
        for failure in &self.load_failures {
            write!(f, "\n\n{}: {}", failure.folder.display(), failure.error)?;
        }
        Ok(())
    }
}

pub fn run(args: &InspectArgs, config: &SkinpackConfig) -> Result<()> {
    let (packages, failed) = load_packages(&args.folders, &config.load);
    if packages.is_empty() {
        let reasons: Vec<String> = failed
            .iter()
            .map(|(folder, e)| format!("{}: {e}", folder.display()))
            .collect();
        bail!("no skin packs could be loaded\n{}", reasons.join("\n"));
    }

    let report = InspectReport {
        packages: packages.iter().map(AssetPackage::info).collect(),
        load_failures: LoadFailure::from_pairs(failed),
    };
    let format = OutputFormat::with_json_flag(args.format, args.json);
    println!("{}", format.render(&report)?);
    Ok(())
}
