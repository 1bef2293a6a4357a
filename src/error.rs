use thiserror::Error;

/// Failure taxonomy for the agent. Every orchestrator stage collapses to one
/// of these; the user sees a single status line, the log keeps the detail.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Falha ao capturar screenshot")]
    Capture,

    #[error("Gemini não conseguiu analisar")]
    Analysis,

    #[error("Erro ao executar ações: {0}")]
    Action(String),

    #[error("Falha ao procurar arquivo")]
    FindTxt,

    #[error("Configure sua Gemini API Key!")]
    MissingApiKey,

    #[error("Aguarde o processamento atual terminar")]
    Busy,

    #[error("{0}")]
    Transport(String),

    #[error("erro de configuração: {0}")]
    Config(String),
}

impl AgentError {
    pub fn config(msg: impl Into<String>) -> Self {
        AgentError::Config(msg.into())
    }
}
