use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;

/// Neighborhoods of Salvador offered by the capture form
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Neighborhood {
    StellaMaris,
    PraiaDoFlamengo,
    Itapua,
    Pituacu,
    Imbui,
}

impl Neighborhood {
    /// Name as shown to the agent
    pub fn display_name(&self) -> &'static str {
        match self {
            Neighborhood::StellaMaris => "Stella Maris",
            Neighborhood::PraiaDoFlamengo => "Praia do Flamengo",
            Neighborhood::Itapua => "Itapuã",
            Neighborhood::Pituacu => "Pituaçu",
            Neighborhood::Imbui => "Imbuí",
        }
    }

    /// Lowercased, hyphenated name used in search URLs and file names.
    ///
    /// Accented letters are kept as-is: `Itapuã` becomes `itapuã`.
    pub fn slug(&self) -> String {
        self.display_name().to_lowercase().replace(' ', "-")
    }
}

impl fmt::Display for Neighborhood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Sale or rental listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Transaction {
    Venda,
    Aluguel,
}

impl Transaction {
    pub fn display_name(&self) -> &'static str {
        match self {
            Transaction::Venda => "Venda",
            Transaction::Aluguel => "Aluguel",
        }
    }

    /// Path segment on the marketplace
    pub fn path_segment(&self) -> String {
        self.display_name().to_lowercase()
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Filters chosen for one capture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSelection {
    pub neighborhood: Neighborhood,
    pub transaction: Transaction,
    pub min_price: u64,
    pub min_rooms: u8,
    pub owner_only: bool,
}

impl FilterSelection {
    /// Marketplace listing page the actor starts crawling from
    pub fn search_url(&self) -> String {
        format!(
            "https://olx.com.br/imoveis/{}/bahia/salvador/{}",
            self.transaction.path_segment(),
            self.neighborhood.slug()
        )
    }

    /// Name of the spreadsheet produced for this selection
    pub fn export_file_name(&self) -> String {
        format!("leads_{}.xlsx", self.neighborhood.slug())
    }
}

impl Default for FilterSelection {
    fn default() -> Self {
        Self {
            neighborhood: Neighborhood::StellaMaris,
            transaction: Transaction::Venda,
            min_price: 350_000,
            min_rooms: 2,
            owner_only: true,
        }
    }
}

/// One listing returned by the scraper.
///
/// The schema belongs to the remote actor, so the record is kept as the raw
/// JSON object with its field order intact.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Lead {
    pub fields: Map<String, Value>,
}

impl Lead {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn has(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

/// Result of a successful capture
#[derive(Debug, Clone)]
pub struct Capture {
    pub filters: FilterSelection,
    pub run_id: String,
    pub dataset_id: String,
    pub leads: Vec<Lead>,
    pub captured_at: DateTime<Utc>,
}
