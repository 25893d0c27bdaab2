use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use crate::reports::ReportKind;

const DATA_DIR: &str = "matchlog";
const DB_FILE: &str = "matches.sqlite";
const DB_ENV: &str = "MATCHLOG_DB";

#[derive(Debug, Clone, PartialEq)]
pub enum OutputMode {
    Console,
    Json,
    Workbook(PathBuf),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    /// Empty means every report.
    pub reports: Vec<ReportKind>,
    pub output: OutputMode,
}

impl AppConfig {
    /// Loads `.env.local` / `.env`, then layers CLI arguments over environment defaults.
    pub fn load() -> Result<Self> {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
        let args = std::env::args().skip(1).collect::<Vec<_>>();
        Self::from_args(&args)
    }

    pub fn from_args(args: &[String]) -> Result<Self> {
        let db_path = flag_value(args, "--db")
            .map(PathBuf::from)
            .or_else(db_path_from_env)
            .or_else(default_db_path)
            .context("unable to resolve sqlite path; pass --db or set MATCHLOG_DB")?;

        let mut reports = Vec::new();
        if let Some(raw) = flag_value(args, "--report") {
            for part in raw.split([',', ' ']).map(str::trim).filter(|p| !p.is_empty()) {
                let kind = ReportKind::from_slug(part)
                    .ok_or_else(|| anyhow!("unknown report '{part}'"))?;
                if !reports.contains(&kind) {
                    reports.push(kind);
                }
            }
        }

        let output = if let Some(path) = flag_value(args, "--export") {
            OutputMode::Workbook(PathBuf::from(path))
        } else if args.iter().any(|a| a == "--json") {
            OutputMode::Json
        } else {
            OutputMode::Console
        };

        Ok(Self {
            db_path,
            reports,
            output,
        })
    }

    pub fn selected_reports(&self) -> Vec<ReportKind> {
        if self.reports.is_empty() {
            ReportKind::ALL.to_vec()
        } else {
            self.reports.clone()
        }
    }
}

/// Accepts `--flag=value` and `--flag value`; blank values are ignored.
fn flag_value(args: &[String], flag: &str) -> Option<String> {
    let prefix = format!("{flag}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix(&prefix) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == flag
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
            && !next.starts_with("--")
        {
            return Some(next.trim().to_string());
        }
    }
    None
}

fn db_path_from_env() -> Option<PathBuf> {
    let raw = std::env::var(DB_ENV).ok()?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(PathBuf::from(trimmed))
}

pub fn default_db_path() -> Option<PathBuf> {
    if let Ok(base) = std::env::var("XDG_DATA_HOME")
        && !base.trim().is_empty()
    {
        return Some(PathBuf::from(base).join(DATA_DIR).join(DB_FILE));
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(
        PathBuf::from(home)
            .join(".local")
            .join("share")
            .join(DATA_DIR)
            .join(DB_FILE),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn flag_value_supports_both_forms() {
        let a = args(&["--db=/tmp/a.sqlite", "--report", "weather"]);
        assert_eq!(flag_value(&a, "--db").as_deref(), Some("/tmp/a.sqlite"));
        assert_eq!(flag_value(&a, "--report").as_deref(), Some("weather"));
        assert_eq!(flag_value(&a, "--export"), None);
        assert_eq!(flag_value(&args(&["--db", "--json"]), "--db"), None);
    }

    #[test]
    fn from_args_parses_reports_and_output() {
        let cfg = AppConfig::from_args(&args(&[
            "--db",
            "/tmp/x.sqlite",
            "--report=streaks,outliers,streaks",
            "--export",
            "out.xlsx",
        ]))
        .expect("config should parse");
        assert_eq!(cfg.db_path, PathBuf::from("/tmp/x.sqlite"));
        assert_eq!(cfg.reports, vec![ReportKind::Streaks, ReportKind::Outliers]);
        assert_eq!(cfg.output, OutputMode::Workbook(PathBuf::from("out.xlsx")));
    }

    #[test]
    fn from_args_rejects_unknown_report() {
        let err = AppConfig::from_args(&args(&["--db=/tmp/x.sqlite", "--report=nope"]))
            .expect_err("unknown report should fail");
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn empty_selection_means_all_reports() {
        let cfg = AppConfig::from_args(&args(&["--db=/tmp/x.sqlite", "--json"]))
            .expect("config should parse");
        assert_eq!(cfg.output, OutputMode::Json);
        assert_eq!(cfg.selected_reports().len(), ReportKind::ALL.len());
    }
}
