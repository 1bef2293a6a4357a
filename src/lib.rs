pub mod backend;
pub mod clipboard;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod logging;
pub mod orchestrator;
pub mod ports;
pub mod session;
pub mod viewer;

use std::sync::Arc;

use crate::backend::{AutomationBackend, HttpBackend};
use crate::clipboard::{ArboardClipboard, ClipboardPort};
use crate::config::{AgentConfig, CredentialStore};
use crate::dispatcher::Dispatcher;
use crate::error::AgentError;
use crate::logging::{ConsoleLog, ConsoleStatus, LogSink, Severity, StatusSink};
use crate::orchestrator::Orchestrator;
use crate::ports::{PanelPort, TerminalPanel};
use crate::session::SessionState;
use crate::viewer::TxtViewer;

/// Wires the session, the backend port and the UI ports into the handlers
/// the shell exposes. One instance per process.
pub struct App {
    pub session: Arc<SessionState>,
    pub dispatcher: Arc<Dispatcher>,
    pub orchestrator: Orchestrator,
    pub viewer: Arc<TxtViewer>,
    pub log: Arc<dyn LogSink>,
    pub status: Arc<dyn StatusSink>,
    credentials: CredentialStore,
}

impl App {
    pub fn new(
        config: AgentConfig,
        backend: Arc<dyn AutomationBackend>,
        clipboard: Arc<dyn ClipboardPort>,
        status: Arc<dyn StatusSink>,
        log: Arc<dyn LogSink>,
        panel: Arc<dyn PanelPort>,
        credentials: CredentialStore,
    ) -> Self {
        let session = Arc::new(SessionState::default());
        let dispatcher = Arc::new(Dispatcher::new(
            session.clone(),
            clipboard.clone(),
            status.clone(),
            log.clone(),
            panel.clone(),
            config.group_url.clone(),
        ));
        let viewer = Arc::new(TxtViewer::new(
            session.clone(),
            dispatcher.clone(),
            clipboard,
            status.clone(),
            log.clone(),
            panel.clone(),
            config.output_dir.clone(),
        ));
        let orchestrator = Orchestrator::new(
            session.clone(),
            backend,
            status.clone(),
            log.clone(),
            panel,
            viewer.clone(),
            config.timings.clone(),
        );
        Self {
            session,
            dispatcher,
            orchestrator,
            viewer,
            log,
            status,
            credentials,
        }
    }

    /// Default wiring: HTTP backend, system clipboard, terminal panel.
    pub fn with_defaults(config: AgentConfig) -> Result<Self, AgentError> {
        let log: Arc<dyn LogSink> = Arc::new(ConsoleLog::new());
        let status: Arc<dyn StatusSink> = Arc::new(ConsoleStatus::new());
        let panel: Arc<dyn PanelPort> = Arc::new(TerminalPanel::new());
        let clipboard: Arc<dyn ClipboardPort> = Arc::new(ArboardClipboard::new(log.clone()));
        let backend: Arc<dyn AutomationBackend> = Arc::new(HttpBackend::new(config.api_base.clone()));
        let credentials = CredentialStore::new()?;
        Ok(Self::new(
            config,
            backend,
            clipboard,
            status,
            log,
            panel,
            credentials,
        ))
    }

    /// Applies the persisted credential; without one, seeds from the
    /// `GEMINI_API_KEY` environment variable. The key never lives in code.
    pub fn bootstrap(&self) {
        match self.credentials.load() {
            Ok(Some(key)) => self.session.set_api_key(&key),
            Ok(None) => {
                if let Ok(key) = std::env::var("GEMINI_API_KEY") {
                    let key = key.trim().to_string();
                    if !key.is_empty() {
                        self.session.set_api_key(&key);
                    }
                }
            }
            Err(err) => self.log.add(
                &format!("Falha ao carregar API Key: {}", err),
                Severity::Error,
            ),
        }
        self.log.add("Sistema iniciado", Severity::Info);
    }

    /// Updates the credential in the session and on disk.
    pub fn set_api_key(&self, raw: &str) {
        let key = raw.trim();
        self.session.set_api_key(key);
        match self.credentials.save(key) {
            Ok(()) => self.log.add("API Key atualizada", Severity::Success),
            Err(err) => self.log.add(
                &format!("Falha ao salvar API Key: {}", err),
                Severity::Error,
            ),
        }
    }
}
