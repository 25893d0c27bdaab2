use anyhow::{Context, Result};
use log::{info, warn};

use matchlog::config::{AppConfig, OutputMode};
use matchlog::match_store;
use matchlog::report_export::{export_workbook, render_text, reports_to_json};
use matchlog::reports::{ReportKind, build_all_reports, build_report};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let cfg = AppConfig::load()?;
    let conn = match_store::open_read_only(&cfg.db_path)?;
    let log = match_store::load_log(&conn).context("load match log")?;
    let stored = match_store::count_matches(&conn)?;
    if stored > log.len() {
        warn!(
            "{} of {} stored matches could not be read and are left out of every report",
            stored - log.len(),
            stored
        );
    }
    if log.is_empty() {
        warn!("match log at {} is empty", cfg.db_path.display());
    }

    let selected = cfg.selected_reports();
    let reports = if selected.len() == ReportKind::ALL.len() {
        build_all_reports(&log)
    } else {
        selected.iter().map(|kind| build_report(&log, *kind)).collect()
    };

    match &cfg.output {
        OutputMode::Console => {
            for report in &reports {
                println!("{}", render_text(report));
            }
        }
        OutputMode::Json => println!("{}", reports_to_json(&reports)?),
        OutputMode::Workbook(path) => {
            let summary = export_workbook(path, &reports)?;
            info!(
                "exported {} reports ({} rows) to {}",
                summary.sheets,
                summary.rows,
                path.display()
            );
        }
    }
    Ok(())
}
