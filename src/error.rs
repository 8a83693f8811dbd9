use crate::actors::types::RunStatus;
use thiserror::Error;

/// Everything that can stop a capture, each with its own message
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("❌ Erro de Configuração: {0}")]
    ConfigurationMissing(String),

    #[error("Falha na execução do scraper (status {status}).")]
    JobFailed { status: RunStatus },

    #[error("Nenhum imóvel encontrado.")]
    JobEmpty,

    #[error("Erro de rede: {0}")]
    Network(String),

    #[error("Registro malformado: {0}")]
    MalformedRecord(String),
}

impl From<reqwest::Error> for CaptureError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

impl CaptureError {
    /// Process exit code reported for this failure
    pub fn exit_code(&self) -> u8 {
        match self {
            CaptureError::JobEmpty => 0,
            CaptureError::ConfigurationMissing(_) => 2,
            CaptureError::JobFailed { .. } => 3,
            CaptureError::Network(_) => 4,
            CaptureError::MalformedRecord(_) => 5,
        }
    }
}
