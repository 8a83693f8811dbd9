use crate::error::CaptureError;
use crate::models::Lead;
use serde_json::{Number, Value};
use std::fmt;

/// Columns shown to the agent, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Title,
    Price,
    Rooms,
    Area,
    Contact,
    Url,
}

impl Column {
    pub const ALL: [Column; 6] = [
        Column::Title,
        Column::Price,
        Column::Rooms,
        Column::Area,
        Column::Contact,
        Column::Url,
    ];

    /// Field name in the scraper's records
    pub fn key(&self) -> &'static str {
        match self {
            Column::Title => "title",
            Column::Price => "price",
            Column::Rooms => "rooms",
            Column::Area => "area",
            Column::Contact => "contact",
            Column::Url => "url",
        }
    }

    /// Header shown in the table and the spreadsheet
    pub fn label(&self) -> &'static str {
        match self {
            Column::Title => "Título",
            Column::Price => "Preço",
            Column::Rooms => "Quartos",
            Column::Area => "Área",
            Column::Contact => "Contato",
            // kept raw
            Column::Url => "url",
        }
    }
}

/// Leads projected onto the display columns
#[derive(Debug, Clone, PartialEq)]
pub struct LeadTable {
    rows: Vec<Vec<Value>>,
}

impl LeadTable {
    /// Project leads onto [`Column::ALL`].
    ///
    /// Every column must appear in at least one lead; a lead lacking a column
    /// that others carry gets a null cell.
    pub fn project(leads: &[Lead]) -> Result<Self, CaptureError> {
        let missing: Vec<&str> = Column::ALL
            .iter()
            .map(Column::key)
            .filter(|key| !leads.iter().any(|lead| lead.has(key)))
            .collect();

        if !missing.is_empty() {
            return Err(CaptureError::MalformedRecord(format!(
                "colunas ausentes nos resultados: {}",
                missing.join(", ")
            )));
        }

        let rows = leads
            .iter()
            .map(|lead| {
                Column::ALL
                    .iter()
                    .map(|column| lead.get(column.key()).cloned().unwrap_or(Value::Null))
                    .collect()
            })
            .collect();

        Ok(Self { rows })
    }

    pub fn headers(&self) -> Vec<&'static str> {
        Column::ALL.iter().map(Column::label).collect()
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[cfg(test)]
    pub fn cell_text(&self, row: usize, column: usize) -> String {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .map(cell_text)
            .unwrap_or_default()
    }
}

/// Largest integer magnitude an `f64` holds exactly
pub const MAX_EXACT_INTEGER: u64 = 1 << 53;

/// Text form of a JSON cell: strings verbatim, null as blank, anything nested as compact JSON
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_text(n),
        other => other.to_string(),
    }
}

/// Whole floats print like integers, the way a spreadsheet shows them
fn number_text(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < MAX_EXACT_INTEGER as f64 => {
            format!("{}", f as i64)
        }
        _ => n.to_string(),
    }
}

impl fmt::Display for LeadTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers = self.headers();
        let texts: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|value| cell_text(value).replace(['\r', '\n'], " "))
                    .collect()
            })
            .collect();

        let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
        for row in &texts {
            for (width, text) in widths.iter_mut().zip(row) {
                *width = (*width).max(text.chars().count());
            }
        }

        let line = |f: &mut fmt::Formatter<'_>, cells: &[&str]| -> fmt::Result {
            let padded: Vec<String> = cells
                .iter()
                .zip(&widths)
                .map(|(cell, width)| {
                    let pad = width - cell.chars().count();
                    format!("{}{}", cell, " ".repeat(pad))
                })
                .collect();
            writeln!(f, "{}", padded.join(" | ").trim_end())
        };

        line(f, &headers)?;
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        writeln!(f, "{}", rule.join("-+-"))?;
        for row in &texts {
            let cells: Vec<&str> = row.iter().map(String::as_str).collect();
            line(f, &cells)?;
        }

        Ok(())
    }
}
