use std::sync::Arc;

use crate::clipboard::ClipboardPort;
use crate::logging::{LogSink, Severity, StatusSink};
use crate::ports::PanelPort;
use crate::session::SessionState;

pub const COMMAND_PREFIX: &str = "/nome";

/// Builds the bot command from the operator name, copies it to the clipboard
/// and opens the embedded messaging view.
pub struct Dispatcher {
    session: Arc<SessionState>,
    clipboard: Arc<dyn ClipboardPort>,
    status: Arc<dyn StatusSink>,
    log: Arc<dyn LogSink>,
    panel: Arc<dyn PanelPort>,
    group_url: String,
}

impl Dispatcher {
    pub fn new(
        session: Arc<SessionState>,
        clipboard: Arc<dyn ClipboardPort>,
        status: Arc<dyn StatusSink>,
        log: Arc<dyn LogSink>,
        panel: Arc<dyn PanelPort>,
        group_url: String,
    ) -> Self {
        Self {
            session,
            clipboard,
            status,
            log,
            panel,
            group_url,
        }
    }

    pub fn search_person(&self, raw_name: &str) {
        let name = raw_name.trim();

        if name.is_empty() {
            self.status
                .show("❌ Digite um nome para buscar!", Severity::Error);
            return;
        }
        if !self.session.has_api_key() {
            self.status
                .show("❌ Configure sua Gemini API Key primeiro!", Severity::Error);
            return;
        }

        let command = format!("{} {}", COMMAND_PREFIX, name);
        self.session.set_search(name, &command);

        self.log
            .add(&format!("Iniciando busca: {}", name), Severity::Info);

        self.clipboard.copy(&command);
        self.status.show(
            &format!("✅ Comando copiado: {}", command),
            Severity::Success,
        );
        self.log
            .add(&format!("Comando copiado: {}", command), Severity::Success);

        self.open_telegram();

        self.panel.set_trigger_active(true);
        self.log.add(
            "Telegram aberto. Acione o GEMINI quando estiver pronto!",
            Severity::Info,
        );
    }

    pub fn open_telegram(&self) {
        // View and result viewer are never shown together.
        self.panel.hide_viewer();
        self.panel.open_view(&self.group_url);

        self.status
            .show("📱 Telegram Web aberto. Aguarde carregar...", Severity::Loading);
        self.log.add("Telegram Web carregando...", Severity::Info);
    }

    pub fn close_telegram(&self) {
        self.panel.close_view();
        self.panel.set_trigger_active(false);
        self.log.add("Telegram fechado", Severity::Info);
    }

    pub fn refresh_telegram(&self) {
        self.panel.refresh_view();
        self.log.add("Telegram atualizado", Severity::Info);
    }
}
