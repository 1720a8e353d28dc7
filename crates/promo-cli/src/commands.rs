use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use colored::Colorize;
use promo_diff::{diff_values, summarize, ChangeSet, DiffLine, ServiceStatus};
use promo_types::{ChangeKind, ChangeRecord, ReviewSheet, Snapshot};

use crate::cli::*;
use crate::config::PromoteConfig;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let mut config = match &cli.config {
        Some(path) => PromoteConfig::load(path)?,
        None => PromoteConfig::default(),
    };
    if let Some(lower) = cli.lower_env {
        config.lower_env = lower;
    }
    if let Some(higher) = cli.higher_env {
        config.higher_env = higher;
    }
    tracing::debug!(envs = %config.envs(), transform = ?config.transform, "resolved configuration");

    match cli.command {
        Command::Diff(args) => cmd_diff(args, config, &cli.format),
        Command::Apply(args) => cmd_apply(args, config, &cli.format),
        Command::Summary(args) => cmd_summary(args, config, &cli.format),
    }
}

/// The three snapshots of a promotion, loaded from their directories.
struct Snapshots {
    lower_prev: Snapshot,
    lower_cur: Snapshot,
    higher_prev: Snapshot,
}

fn load(dir: &Path, what: &str) -> anyhow::Result<Snapshot> {
    promo_snapshot::load_dir(dir).with_context(|| format!("loading {what} snapshot from {}", dir.display()))
}

fn load_snapshots(dirs: &SnapshotDirs) -> anyhow::Result<Snapshots> {
    let lower_prev = load(&dirs.lower_prev, "lower previous")?;
    let lower_cur = load(&dirs.lower_cur, "lower current")?;
    let mut higher_prev = load(&dirs.higher_prev, "higher previous")?;
    if dirs.seed_missing {
        promo_snapshot::seed_missing_roots(&mut higher_prev, &lower_cur);
    }
    Ok(Snapshots {
        lower_prev,
        lower_cur,
        higher_prev,
    })
}

fn release_note_name() -> PathBuf {
    PathBuf::from(
        chrono::Local::now()
            .format("release-note-%d-%b-%Y-%H-%M-%S.json")
            .to_string(),
    )
}

/// Diff the snapshots and write the review file. Returns the change set and
/// where the review file went.
fn write_review(args: &DiffArgs, config: &PromoteConfig) -> anyhow::Result<(ChangeSet, PathBuf)> {
    let snapshots = load_snapshots(&args.dirs)?;
    let set = config
        .engine()
        .diff(&snapshots.lower_prev, &snapshots.lower_cur, &snapshots.higher_prev);

    let sheet = ReviewSheet::from_records(&config.envs(), &set);
    let output = args.output.clone().unwrap_or_else(release_note_name);
    let json = serde_json::to_string_pretty(&sheet)?;
    fs::write(&output, json).with_context(|| format!("writing review file {}", output.display()))?;
    Ok((set, output))
}

fn cmd_diff(args: DiffArgs, mut config: PromoteConfig, format: &OutputFormat) -> anyhow::Result<()> {
    if let Some(style) = args.path_style {
        config.diff.path_style = style;
    }
    if let Some(transform) = args.transform {
        config.transform = transform;
    }

    let (set, output) = write_review(&args, &config)?;

    match format {
        OutputFormat::Json => {
            let report = serde_json::json!({
                "review_file": output,
                "total": set.len(),
                "additions": set.additions(),
                "modifications": set.modifications(),
                "deletions": set.deletions(),
                "pending": set.pending(),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            if set.is_empty() {
                println!("No changes between {}.", config.envs().to_string().bold());
            }
            for record in &set {
                print_record(record);
                if args.show_values && record.kind == ChangeKind::Modify {
                    print_value_diff(record);
                }
            }
            println!(
                "\n{} {} changes ({} added, {} modified, {} deleted, {} pending)",
                "✓".green().bold(),
                set.len().to_string().bold(),
                set.additions(),
                set.modifications(),
                set.deletions(),
                set.pending(),
            );
            println!("  Review file: {}", output.display().to_string().cyan());
        }
    }
    Ok(())
}

fn kind_label(kind: ChangeKind) -> colored::ColoredString {
    let label = format!("{:<14}", kind.as_str());
    match kind {
        ChangeKind::Add => label.green(),
        ChangeKind::Modify => label.yellow(),
        ChangeKind::Delete => label.red(),
        ChangeKind::PendingAdd | ChangeKind::PendingDelete => label.cyan(),
    }
}

fn print_record(record: &ChangeRecord) {
    let location = if record.path.is_empty() {
        record.root.bold().to_string()
    } else {
        format!("{} {}", record.root.bold(), record.path.dimmed())
    };
    println!("  {} {}  {}", kind_label(record.kind), location, record.comment.dimmed());
}

fn print_value_diff(record: &ChangeRecord) {
    let diff = diff_values(record.prev_value_lower.as_ref(), record.cur_value_lower.as_ref());
    for line in &diff.lines {
        match line {
            DiffLine::Hunk(header) => println!("      {}", header.cyan()),
            DiffLine::Context(text) => println!("       {text}"),
            DiffLine::Added(text) => println!("      {}", format!("+{text}").green()),
            DiffLine::Removed(text) => println!("      {}", format!("-{text}").red()),
        }
    }
    if !diff.is_empty() {
        println!(
            "      {} {}",
            format!("+{}", diff.additions()).green(),
            format!("-{}", diff.deletions()).red()
        );
    }
}

fn read_review(path: &Path) -> anyhow::Result<ReviewSheet> {
    let text = fs::read_to_string(path).with_context(|| format!("reading review file {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing review file {}", path.display()))
}

fn cmd_apply(args: ApplyArgs, config: PromoteConfig, format: &OutputFormat) -> anyhow::Result<()> {
    let base = load(&args.base, "base")?;
    let sheet = read_review(&args.review)?;
    let records = sheet
        .to_records()
        .with_context(|| format!("interpreting review file {}", args.review.display()))?;

    let outcome = config
        .applier()
        .apply(&base, &records)
        .with_context(|| format!("applying {}", args.review.display()))?;
    let report = promo_snapshot::write_dir(&outcome.snapshot, &args.out)
        .with_context(|| format!("writing snapshot to {}", args.out.display()))?;

    match format {
        OutputFormat::Json => {
            let summary = serde_json::json!({
                "applied": records.len(),
                "written": report.written,
                "removed": report.removed,
                "deleted_roots": outcome.deleted_roots,
                "added_roots": outcome.added_roots,
                "upgraded_roots": outcome.upgraded_roots,
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        OutputFormat::Text => {
            println!(
                "{} Applied {} changes for {}",
                "✓".green().bold(),
                records.len().to_string().bold(),
                sheet.envs().to_string().bold()
            );
            for root in &outcome.added_roots {
                println!("  {} {}", "added:".green(), root);
            }
            for root in &outcome.deleted_roots {
                println!("  {} {}", "deleted:".red(), root);
            }
            for root in &outcome.upgraded_roots {
                println!("  {} {}", "upgrade:".yellow(), root);
            }
            println!("  Wrote {} files to {}", report.written.len(), args.out.display().to_string().cyan());
        }
    }
    Ok(())
}

fn status_label(status: ServiceStatus) -> colored::ColoredString {
    match status {
        ServiceStatus::NewService => status.label().green(),
        ServiceStatus::DeletedService => status.label().red(),
        ServiceStatus::Updated => status.label().yellow(),
        ServiceStatus::NoModifications => status.label().dimmed(),
    }
}

fn cmd_summary(args: SummaryArgs, config: PromoteConfig, format: &OutputFormat) -> anyhow::Result<()> {
    let snapshots = load_snapshots(&args.dirs)?;
    let set = config
        .engine()
        .diff(&snapshots.lower_prev, &snapshots.lower_cur, &snapshots.higher_prev);
    let summary = summarize(&snapshots.lower_prev, &snapshots.lower_cur, &set);

    match format {
        OutputFormat::Json => {
            let rows: serde_json::Map<String, serde_json::Value> = summary
                .iter()
                .map(|(root, status)| (root.clone(), serde_json::Value::from(status.label())))
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        OutputFormat::Text => {
            let width = summary.keys().map(String::len).max().unwrap_or(0);
            for (root, status) in &summary {
                println!("  {:<width$}  {}", root, status_label(*status));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use promo_types::Document;
    use serde_json::json;

    fn write(dir: &Path, name: &str, content: &str) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join(name), content).unwrap();
    }

    fn dirs(root: &Path) -> SnapshotDirs {
        SnapshotDirs {
            lower_prev: root.join("lower-prev"),
            lower_cur: root.join("lower-cur"),
            higher_prev: root.join("higher-prev"),
            seed_missing: false,
        }
    }

    #[test]
    fn diff_then_apply_promotes_values() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = dirs(tmp.path());
        write(&dirs.lower_prev, "api.yaml", "replicas: 2\nenv:\n  - name: A\n    value: \"1\"\n");
        write(&dirs.lower_cur, "api.yaml", "replicas: 4\nenv:\n  - name: A\n    value: \"1\"\n  - name: B\n    value: \"2\"\n");
        write(&dirs.lower_cur, "web.yaml", "replicas: 1\n");
        write(&dirs.higher_prev, "api.yaml", "replicas: 2\nenv:\n  - name: A\n    value: \"1\"\n");

        let review = tmp.path().join("review.json");
        let args = DiffArgs {
            dirs: dirs.clone(),
            output: Some(review.clone()),
            path_style: None,
            transform: None,
            show_values: false,
        };
        let (set, output) = write_review(&args, &PromoteConfig::default()).unwrap();
        assert_eq!(output, review);
        assert_eq!(set.len(), 3);

        let sheet = read_review(&review).unwrap();
        assert_eq!(sheet.rows.len(), 3);
        assert_eq!(sheet.lower_env, "dev1");

        let base = promo_snapshot::load_dir(&dirs.higher_prev).unwrap();
        let outcome = PromoteConfig::default()
            .applier()
            .apply(&base, &sheet.to_records().unwrap())
            .unwrap();

        assert_eq!(
            outcome.snapshot.get("api"),
            Some(&Document::from(json!({
                "replicas": 4,
                "env": [{"name": "A", "value": "1"}, {"name": "B", "value": "2"}]
            })))
        );
        assert_eq!(outcome.snapshot.get("web"), Some(&Document::from(json!({"replicas": 1}))));
        assert_eq!(outcome.upgraded_roots, vec!["api", "web"]);
    }

    #[test]
    fn seeding_hides_services_the_higher_env_lacks() {
        let tmp = tempfile::tempdir().unwrap();
        let mut dirs = dirs(tmp.path());
        write(&dirs.lower_prev, "api.yaml", "cpu: \"1\"\n");
        write(&dirs.lower_cur, "api.yaml", "cpu: \"1\"\n");
        write(&dirs.higher_prev, "other.yaml", "a: 1\n");

        let plain = load_snapshots(&dirs).unwrap();
        assert!(!plain.higher_prev.contains("api"));

        dirs.seed_missing = true;
        let seeded = load_snapshots(&dirs).unwrap();
        assert!(seeded.higher_prev.contains("api"));
        let set = PromoteConfig::default()
            .engine()
            .diff(&seeded.lower_prev, &seeded.lower_cur, &seeded.higher_prev);
        assert!(set.is_empty());
    }

    #[test]
    fn missing_snapshot_dir_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let err = load_snapshots(&dirs(tmp.path())).err().unwrap();
        assert!(format!("{err:#}").contains("lower previous"));
    }

    #[test]
    fn release_note_name_format() {
        let name = release_note_name();
        let name = name.to_string_lossy();
        assert!(name.starts_with("release-note-"));
        assert!(name.ends_with(".json"));
    }
}
