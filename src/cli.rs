use crate::actors::types::DEFAULT_MAX_ITEMS;
use crate::export::ExportLayout;
use crate::models::{FilterSelection, Neighborhood, Transaction};
use clap::Parser;
use std::path::PathBuf;

/// Painel de Captação - Salvador
///
/// Runs the OLX real-estate scraper for one neighborhood and prints the leads.
#[derive(Debug, Parser)]
#[command(name = "lead-capture")]
#[command(version)]
pub struct Cli {
    /// 📍 Bairro
    #[arg(short, long, value_enum, default_value_t = Neighborhood::StellaMaris)]
    pub neighborhood: Neighborhood,

    /// 💰 Transação
    #[arg(short, long, value_enum, default_value_t = Transaction::Venda)]
    pub transaction: Transaction,

    /// Preço mínimo
    #[arg(long, default_value_t = 350_000)]
    pub min_price: u64,

    /// Quartos mínimos
    #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(1..=5))]
    pub min_rooms: u8,

    /// Include agency and broker listings, not only owners
    #[arg(long)]
    pub include_professionals: bool,

    /// Listings requested from the scraper
    #[arg(long, default_value_t = DEFAULT_MAX_ITEMS)]
    pub max_items: u32,

    /// Directory the spreadsheet is written to
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Skip the spreadsheet
    #[arg(long, conflicts_with = "full_export")]
    pub no_export: bool,

    /// Export every field returned by the scraper instead of the table columns
    #[arg(long)]
    pub full_export: bool,
}

impl Cli {
    pub fn filters(&self) -> FilterSelection {
        FilterSelection {
            neighborhood: self.neighborhood,
            transaction: self.transaction,
            min_price: self.min_price,
            min_rooms: self.min_rooms,
            owner_only: !self.include_professionals,
        }
    }

    pub fn export_layout(&self) -> ExportLayout {
        if self.no_export {
            ExportLayout::Skip
        } else if self.full_export {
            ExportLayout::AllFields
        } else {
            ExportLayout::Table
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_form() {
        let cli = Cli::try_parse_from(["lead-capture"]).unwrap();
        assert_eq!(cli.filters(), FilterSelection::default());
        assert_eq!(cli.max_items, 50);
        assert_eq!(cli.export_layout(), ExportLayout::Table);
    }

    #[test]
    fn parses_every_filter() {
        let cli = Cli::try_parse_from([
            "lead-capture",
            "--neighborhood",
            "itapua",
            "--transaction",
            "aluguel",
            "--min-price",
            "1800",
            "--min-rooms",
            "4",
            "--include-professionals",
        ])
        .unwrap();

        assert_eq!(
            cli.filters(),
            FilterSelection {
                neighborhood: Neighborhood::Itapua,
                transaction: Transaction::Aluguel,
                min_price: 1800,
                min_rooms: 4,
                owner_only: false,
            }
        );
    }

    #[test]
    fn neighborhood_names_are_kebab_case() {
        for name in ["stella-maris", "praia-do-flamengo", "itapua", "pituacu", "imbui"] {
            assert!(Cli::try_parse_from(["lead-capture", "-n", name]).is_ok(), "{name}");
        }
        assert!(Cli::try_parse_from(["lead-capture", "-n", "barra"]).is_err());
    }

    #[test]
    fn rooms_outside_slider_range_are_rejected() {
        assert!(Cli::try_parse_from(["lead-capture", "--min-rooms", "0"]).is_err());
        assert!(Cli::try_parse_from(["lead-capture", "--min-rooms", "6"]).is_err());
        assert!(Cli::try_parse_from(["lead-capture", "--min-rooms", "5"]).is_ok());
    }

    #[test]
    fn negative_price_is_rejected() {
        assert!(Cli::try_parse_from(["lead-capture", "--min-price", "-1"]).is_err());
    }

    #[test]
    fn export_flags_pick_layout() {
        let cli = Cli::try_parse_from(["lead-capture", "--no-export"]).unwrap();
        assert_eq!(cli.export_layout(), ExportLayout::Skip);
        let cli = Cli::try_parse_from(["lead-capture", "--full-export"]).unwrap();
        assert_eq!(cli.export_layout(), ExportLayout::AllFields);
    }

    #[test]
    fn no_export_conflicts_with_full_export() {
        assert!(Cli::try_parse_from(["lead-capture", "--no-export", "--full-export"]).is_err());
    }
}
