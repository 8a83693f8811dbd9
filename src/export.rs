use crate::models::Lead;
use crate::table::{cell_text, LeadTable, MAX_EXACT_INTEGER};
use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use serde_json::{Number, Value};
use std::path::{Path, PathBuf};
use tracing::info;

/// What gets written after a successful capture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportLayout {
    Skip,
    /// The displayed columns
    Table,
    /// Every field the scraper returned
    AllFields,
}

/// Rows ready to be written as a single worksheet
#[derive(Debug, Clone, PartialEq)]
pub struct Spreadsheet {
    headers: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Spreadsheet {
    /// Same columns and headers as the rendered table
    pub fn from_table(table: &LeadTable) -> Self {
        Self {
            headers: table.headers().into_iter().map(String::from).collect(),
            rows: table.rows().to_vec(),
        }
    }

    /// Every field the scraper returned, columns ordered by first appearance
    pub fn from_leads(leads: &[Lead]) -> Self {
        let mut headers: Vec<String> = Vec::new();
        for lead in leads {
            for key in lead.keys() {
                if !headers.iter().any(|h| h == key) {
                    headers.push(key.to_string());
                }
            }
        }

        let rows = leads
            .iter()
            .map(|lead| {
                headers
                    .iter()
                    .map(|h| lead.get(h).cloned().unwrap_or(Value::Null))
                    .collect()
            })
            .collect();

        Self { headers, rows }
    }

    /// Encode as an `.xlsx` workbook
    pub fn to_xlsx(&self) -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let bold = Format::new().set_bold();
        let worksheet = workbook.add_worksheet();

        for (col, header) in self.headers.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, header.as_str(), &bold)?;
        }

        for (i, row) in self.rows.iter().enumerate() {
            let r = (i + 1) as u32;
            for (col, value) in row.iter().enumerate() {
                let c = col as u16;
                match value {
                    Value::Null => {}
                    Value::Bool(b) => {
                        worksheet.write_boolean(r, c, *b)?;
                    }
                    Value::Number(n) => match exact_f64(n) {
                        Some(f) => {
                            worksheet.write_number(r, c, f)?;
                        }
                        None => {
                            worksheet.write_string(r, c, n.to_string())?;
                        }
                    },
                    other => {
                        worksheet.write_string(r, c, cell_text(other))?;
                    }
                }
            }
        }

        worksheet.autofit();
        workbook.save_to_buffer()
    }

    /// Write the workbook into `dir` under `file_name`
    pub async fn save(&self, dir: &Path, file_name: &str) -> Result<PathBuf> {
        let bytes = self.to_xlsx().context("Failed to encode spreadsheet")?;

        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Failed to create {}", dir.display()))?;

        let path = dir.join(file_name);
        tokio::fs::write(&path, &bytes)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;

        info!("💾 Saved {} leads to {}", self.rows.len(), path.display());
        Ok(path)
    }
}

/// The number as an `f64`, unless the conversion would change an integer's value
fn exact_f64(n: &Number) -> Option<f64> {
    if let Some(i) = n.as_i64() {
        return (i.unsigned_abs() <= MAX_EXACT_INTEGER).then_some(i as f64);
    }
    if let Some(u) = n.as_u64() {
        return (u <= MAX_EXACT_INTEGER).then_some(u as f64);
    }
    n.as_f64()
}
