mod actors;
mod capture;
mod cli;
mod config;
mod error;
mod export;
mod models;
mod table;

use actors::{ActorPlatform, ApifyClient};
use anyhow::Result;
use capture::LeadCapture;
use clap::Parser;
use cli::Cli;
use config::Config;
use error::CaptureError;
use export::{ExportLayout, Spreadsheet};
use models::FilterSelection;
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;
use table::LeadTable;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Logs go to stderr, the table to stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    info!("🏠 Painel de Captação - Salvador");

    let mut out = std::io::stdout();
    let mut err = std::io::stderr();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            let code = report(e, &mut out, &mut err)?;
            writeln!(
                err,
                "Por favor, adicione '{}' ao ambiente antes de iniciar a captação.",
                config::TOKEN_VAR
            )?;
            return Ok(ExitCode::from(code));
        }
    };

    let filters = cli.filters();
    info!(
        "Filtros: {} / {} / preço mínimo {} / {}+ quartos / apenas proprietários: {}",
        filters.neighborhood,
        filters.transaction,
        filters.min_price,
        filters.min_rooms,
        filters.owner_only
    );

    let client = match ApifyClient::with_base_url(&config.api_token, &config.base_url) {
        Ok(client) => client,
        Err(e) => return Ok(ExitCode::from(report(e, &mut out, &mut err)?)),
    };
    let session = LeadCapture::new(client, config.actor_id.clone(), cli.max_items);

    let code = run(
        &session,
        &filters,
        cli.export_layout(),
        &cli.output_dir,
        &mut out,
        &mut err,
    )
    .await?;

    Ok(ExitCode::from(code))
}

/// Capture leads for `filters`, show them and save the spreadsheet.
///
/// Returns the process exit code. Only I/O failures while writing output or
/// the spreadsheet are returned as errors.
async fn run<P: ActorPlatform>(
    session: &LeadCapture<P>,
    filters: &FilterSelection,
    layout: ExportLayout,
    output_dir: &Path,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<u8> {
    let captured = session.capture(filters).await.and_then(|capture| {
        let table = LeadTable::project(&capture.leads)?;
        Ok((capture, table))
    });
    let (capture, table) = match captured {
        Ok(captured) => captured,
        Err(e) => return report(e, out, err),
    };

    writeln!(out, "✅ {} leads encontrados!", table.len())?;
    writeln!(out)?;
    write!(out, "{}", table)?;

    let sheet = match layout {
        ExportLayout::Skip => return Ok(0),
        ExportLayout::Table => Spreadsheet::from_table(&table),
        ExportLayout::AllFields => Spreadsheet::from_leads(&capture.leads),
    };
    let path = sheet
        .save(output_dir, &capture.filters.export_file_name())
        .await?;

    writeln!(out)?;
    writeln!(out, "📊 Planilha: {}", path.display())?;
    info!(
        "Run {} / dataset {} captured at {}",
        capture.run_id,
        capture.dataset_id,
        capture.captured_at.to_rfc3339()
    );

    Ok(0)
}

/// Show a failed capture to the agent. "Nothing found" is an answer, not an error.
fn report(e: CaptureError, out: &mut impl Write, err: &mut impl Write) -> Result<u8> {
    match &e {
        CaptureError::JobEmpty => {
            warn!("Capture returned no listings");
            writeln!(out, "{}", e)?;
        }
        _ => {
            error!("Capture failed: {:?}", e);
            writeln!(err, "{}", e)?;
        }
    }

    Ok(e.exit_code())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actors::fake::{listing, FakePlatform};
    use crate::actors::types::RunStatus;
    use crate::models::{Neighborhood, Transaction};
    use serde_json::{json, Value};
    use std::path::PathBuf;

    struct Outcome {
        code: u8,
        stdout: String,
        stderr: String,
        dir: PathBuf,
    }

    impl Outcome {
        fn exported(&self) -> PathBuf {
            self.dir.join("leads_imbuí.xlsx")
        }
    }

    impl Drop for Outcome {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.dir);
        }
    }

    async fn run_with(name: &str, platform: FakePlatform, layout: ExportLayout) -> Outcome {
        let dir = std::env::temp_dir().join(format!(
            "lead-capture-run-{}-{}",
            name,
            std::process::id()
        ));
        let filters = FilterSelection {
            neighborhood: Neighborhood::Imbui,
            transaction: Transaction::Venda,
            ..FilterSelection::default()
        };
        let session = LeadCapture::new(platform, "owner/actor", 50);
        let mut out = Vec::new();
        let mut err = Vec::new();

        let code = run(&session, &filters, layout, &dir, &mut out, &mut err)
            .await
            .unwrap();

        Outcome {
            code,
            stdout: String::from_utf8(out).unwrap(),
            stderr: String::from_utf8(err).unwrap(),
            dir,
        }
    }

    #[tokio::test]
    async fn success_prints_table_and_saves_sheet() {
        let platform = FakePlatform::new(RunStatus::Succeeded, vec![listing(1), listing(2)]);
        let outcome = run_with("success", platform, ExportLayout::Table).await;

        assert_eq!(outcome.code, 0);
        assert!(outcome.stdout.starts_with("✅ 2 leads encontrados!"));
        assert!(outcome.stdout.contains("Título"));
        assert!(outcome.stdout.contains("https://ba.olx.com.br/2"));
        assert!(outcome.stdout.contains("leads_imbuí.xlsx"));
        assert!(outcome.stderr.is_empty());
        assert!(outcome.exported().exists());
    }

    #[tokio::test]
    async fn skipped_export_writes_no_file() {
        let platform = FakePlatform::new(RunStatus::Succeeded, vec![listing(1)]);
        let outcome = run_with("skip", platform, ExportLayout::Skip).await;

        assert_eq!(outcome.code, 0);
        assert!(outcome.stdout.contains("Casa 1"));
        assert!(!outcome.stdout.contains("Planilha"));
        assert!(!outcome.exported().exists());
    }

    #[tokio::test]
    async fn nothing_found_shows_message_only() {
        let platform = FakePlatform::new(RunStatus::Succeeded, Vec::new());
        let outcome = run_with("empty", platform, ExportLayout::Table).await;

        assert_eq!(outcome.code, 0);
        assert_eq!(outcome.stdout, "Nenhum imóvel encontrado.\n");
        assert!(outcome.stderr.is_empty());
        assert!(!outcome.exported().exists());
    }

    #[tokio::test]
    async fn failed_run_goes_to_stderr() {
        let platform = FakePlatform::new(RunStatus::Failed, vec![listing(1)]);
        let outcome = run_with("failed", platform, ExportLayout::Table).await;

        assert_eq!(outcome.code, 3);
        assert!(outcome.stdout.is_empty());
        assert!(outcome.stderr.contains("Falha na execução do scraper"));
        assert!(outcome.stderr.contains("FAILED"));
        assert!(!outcome.exported().exists());
    }

    #[tokio::test]
    async fn missing_column_is_reported_before_any_output() {
        let items: Vec<Value> = vec![json!({"title": "Casa", "url": "https://ba.olx.com.br/9"})];
        let platform = FakePlatform::new(RunStatus::Succeeded, items);
        let outcome = run_with("malformed", platform, ExportLayout::AllFields).await;

        assert_eq!(outcome.code, 5);
        assert!(outcome.stdout.is_empty());
        assert!(outcome.stderr.starts_with("Registro malformado"));
        assert!(!outcome.exported().exists());
    }

    #[test]
    fn exit_codes_differ_per_failure() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let codes: Vec<u8> = [
            CaptureError::ConfigurationMissing("x".into()),
            CaptureError::JobFailed {
                status: RunStatus::Aborted,
            },
            CaptureError::Network("x".into()),
            CaptureError::MalformedRecord("x".into()),
        ]
        .into_iter()
        .map(|e| report(e, &mut out, &mut err).unwrap())
        .collect();

        assert_eq!(codes, vec![2, 3, 4, 5]);
        assert!(out.is_empty());
        assert_eq!(String::from_utf8(err).unwrap().lines().count(), 4);
    }
}
