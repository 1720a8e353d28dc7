use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use promo_diff::PathStyle;

use crate::config::TransformKind;

#[derive(Parser)]
#[command(
    name = "promo",
    about = "Promote configuration values between environments",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Name of the lower environment (overrides the config file)
    #[arg(long, global = true)]
    pub lower_env: Option<String>,

    /// Name of the higher environment (overrides the config file)
    #[arg(long, global = true)]
    pub higher_env: Option<String>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Diff three snapshots and write a review file
    Diff(DiffArgs),
    /// Apply a reviewed change set to a snapshot
    Apply(ApplyArgs),
    /// Show what a promotion does to each service
    Summary(SummaryArgs),
}

#[derive(Args, Clone, Debug)]
pub struct SnapshotDirs {
    /// Lower environment values at the last promotion
    #[arg(long)]
    pub lower_prev: PathBuf,
    /// Lower environment values now
    #[arg(long)]
    pub lower_cur: PathBuf,
    /// Higher environment values before this promotion
    #[arg(long)]
    pub higher_prev: PathBuf,
    /// Copy services the higher environment lacks before diffing
    #[arg(long)]
    pub seed_missing: bool,
}

#[derive(Args)]
pub struct DiffArgs {
    #[command(flatten)]
    pub dirs: SnapshotDirs,
    /// Review file to write (default: release-note-<timestamp>.json)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    #[arg(long)]
    pub path_style: Option<PathStyle>,
    #[arg(long)]
    pub transform: Option<TransformKind>,
    /// Print line diffs of modified values
    #[arg(long)]
    pub show_values: bool,
}

#[derive(Args)]
pub struct ApplyArgs {
    /// Snapshot directory the changes are applied to
    #[arg(long)]
    pub base: PathBuf,
    /// Reviewed change set (JSON review file)
    #[arg(long)]
    pub review: PathBuf,
    /// Directory the updated snapshot is written to
    #[arg(long)]
    pub out: PathBuf,
}

#[derive(Args)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub dirs: SnapshotDirs,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dirs() -> [&'static str; 6] {
        ["--lower-prev", "lp", "--lower-cur", "lc", "--higher-prev", "hp"]
    }

    #[test]
    fn parse_diff() {
        let cli = Cli::try_parse_from(["promo", "diff"].into_iter().chain(dirs())).unwrap();
        if let Command::Diff(args) = cli.command {
            assert_eq!(args.dirs.lower_prev, PathBuf::from("lp"));
            assert_eq!(args.dirs.higher_prev, PathBuf::from("hp"));
            assert!(args.output.is_none());
            assert!(!args.dirs.seed_missing);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_diff_options() {
        let args = ["promo", "diff", "-o", "note.json", "--path-style", "legacy", "--transform", "image-tag", "--show-values"];
        let cli = Cli::try_parse_from(args.into_iter().chain(dirs())).unwrap();
        if let Command::Diff(args) = cli.command {
            assert_eq!(args.output, Some(PathBuf::from("note.json")));
            assert_eq!(args.path_style, Some(PathStyle::LegacyGrouped));
            assert!(matches!(args.transform, Some(TransformKind::ImageTag)));
            assert!(args.show_values);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_diff_requires_all_dirs() {
        assert!(Cli::try_parse_from(["promo", "diff", "--lower-prev", "lp"]).is_err());
    }

    #[test]
    fn parse_apply() {
        let cli = Cli::try_parse_from(["promo", "apply", "--base", "b", "--review", "r.json", "--out", "o"]).unwrap();
        if let Command::Apply(args) = cli.command {
            assert_eq!(args.base, PathBuf::from("b"));
            assert_eq!(args.review, PathBuf::from("r.json"));
            assert_eq!(args.out, PathBuf::from("o"));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_summary_with_seed() {
        let cli = Cli::try_parse_from(["promo", "summary", "--seed-missing"].into_iter().chain(dirs())).unwrap();
        if let Command::Summary(args) = cli.command {
            assert!(args.dirs.seed_missing);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_global_options() {
        let cli = Cli::try_parse_from([
            "promo", "--verbose", "--format", "json", "--lower-env", "sit1", "--higher-env", "uat1",
            "apply", "--base", "b", "--review", "r", "--out", "o",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.format, OutputFormat::Json));
        assert_eq!(cli.lower_env.as_deref(), Some("sit1"));
        assert_eq!(cli.higher_env.as_deref(), Some("uat1"));
    }
}
