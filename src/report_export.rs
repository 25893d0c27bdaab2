use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::reports::{NO_DATA, Report};

/// Excel limits sheet names to 31 characters.
const SHEET_NAME_MAX: usize = 31;

pub struct ExportSummary {
    pub sheets: usize,
    pub rows: usize,
}

/// One worksheet per report: header row, then the same cell text the console prints.
pub fn export_workbook(path: &Path, reports: &[Report]) -> Result<ExportSummary> {
    let mut workbook = Workbook::new();
    let mut rows = 0usize;
    for report in reports {
        let sheet = workbook.add_worksheet();
        sheet
            .set_name(sheet_name(report))
            .with_context(|| format!("name sheet for {}", report.kind.slug()))?;
        rows += report.rows.len();
        write_rows(sheet, &report_table(report))?;
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;
    info!("wrote {} sheets to {}", reports.len(), path.display());

    Ok(ExportSummary {
        sheets: reports.len(),
        rows,
    })
}

pub fn reports_to_json(reports: &[Report]) -> Result<String> {
    serde_json::to_string_pretty(reports).context("serialize reports")
}

/// Header plus text rows; an empty report becomes a single "no data" row.
pub fn report_table(report: &Report) -> Vec<Vec<String>> {
    let mut table = vec![report.columns.clone()];
    if report.is_empty() {
        table.push(vec![NO_DATA.to_string()]);
    } else {
        table.extend(report.text_rows());
    }
    for note in &report.notes {
        table.push(vec![note.clone()]);
    }
    table
}

/// Plain-text table with left-aligned, space-padded columns.
pub fn render_text(report: &Report) -> String {
    let table = report_table(report);
    let cols = report.columns.len();
    let mut widths = vec![0usize; cols];
    for row in table.iter().take(1 + report.rows.len()) {
        for (idx, cell) in row.iter().enumerate().take(cols) {
            widths[idx] = widths[idx].max(cell.chars().count());
        }
    }

    let mut out = String::new();
    out.push_str(&report.title);
    out.push('\n');
    for (row_idx, row) in table.iter().enumerate() {
        let line = row
            .iter()
            .enumerate()
            .map(|(idx, cell)| match widths.get(idx) {
                Some(&w) if row.len() > 1 => format!("{cell:<w$}"),
                _ => cell.clone(),
            })
            .collect::<Vec<_>>()
            .join("  ");
        out.push_str(line.trim_end());
        out.push('\n');
        if row_idx == 0 {
            let rule: usize = widths.iter().sum::<usize>() + 2 * cols.saturating_sub(1);
            out.push_str(&"-".repeat(rule));
            out.push('\n');
        }
    }
    out
}

fn sheet_name(report: &Report) -> String {
    let mut name: String = report
        .title
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        .collect();
    if name.chars().count() > SHEET_NAME_MAX {
        name = name.chars().take(SHEET_NAME_MAX).collect();
    }
    name
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
