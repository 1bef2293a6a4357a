use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::clipboard::ClipboardPort;
use crate::dispatcher::Dispatcher;
use crate::error::AgentError;
use crate::logging::{LogSink, Severity, StatusSink};
use crate::ports::PanelPort;
use crate::session::SessionState;

const FALLBACK_BASENAME: &str = "saida";

/// Shows the text retrieved by the automation flow; supports copying the
/// content and saving it to disk.
pub struct TxtViewer {
    content: Mutex<String>,
    session: Arc<SessionState>,
    dispatcher: Arc<Dispatcher>,
    clipboard: Arc<dyn ClipboardPort>,
    status: Arc<dyn StatusSink>,
    log: Arc<dyn LogSink>,
    panel: Arc<dyn PanelPort>,
    output_dir: PathBuf,
}

impl TxtViewer {
    pub fn new(
        session: Arc<SessionState>,
        dispatcher: Arc<Dispatcher>,
        clipboard: Arc<dyn ClipboardPort>,
        status: Arc<dyn StatusSink>,
        log: Arc<dyn LogSink>,
        panel: Arc<dyn PanelPort>,
        output_dir: PathBuf,
    ) -> Self {
        Self {
            content: Mutex::new(String::new()),
            session,
            dispatcher,
            clipboard,
            status,
            log,
            panel,
            output_dir,
        }
    }

    pub fn content(&self) -> String {
        self.content.lock().unwrap().clone()
    }

    /// Displays the content. The embedded messaging view closes: the two
    /// surfaces are never visible at the same time.
    pub fn open(&self, content: &str) {
        *self.content.lock().unwrap() = content.to_string();
        self.panel.show_viewer();
        self.log.add("📄 Arquivo TXT exibido", Severity::Success);
        self.dispatcher.close_telegram();
    }

    pub fn close(&self) {
        self.panel.hide_viewer();
        self.log.add("Visualizador TXT fechado", Severity::Info);
    }

    pub fn copy_content(&self) {
        let content = self.content();
        self.clipboard.copy(&content);
        self.status.show("✅ Conteúdo copiado!", Severity::Success);
        self.log.add("Conteúdo do TXT copiado", Severity::Success);
    }

    /// Saves the displayed content as `resultado_<name>.txt` in the output
    /// directory and returns the written path.
    pub fn download(&self) -> Result<PathBuf, AgentError> {
        let path = self.output_dir.join(download_file_name(&self.session.name()));
        std::fs::write(&path, self.content())
            .map_err(|e| AgentError::config(e.to_string()))?;
        self.log.add("Arquivo TXT baixado", Severity::Success);
        Ok(path)
    }
}

/// Spaces in the session name become underscores; an empty name falls back
/// to `saida`.
pub fn download_file_name(name: &str) -> String {
    let base = if name.is_empty() { FALLBACK_BASENAME } else { name };
    format!("resultado_{}.txt", base.replace(' ', "_"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::ConsoleLog;
    use crate::ports::recorders::{MemoryClipboard, RecordingStatus};
    use crate::ports::TerminalPanel;

    fn viewer(output_dir: PathBuf) -> (Arc<SessionState>, Arc<TerminalPanel>, Arc<MemoryClipboard>, TxtViewer) {
        let session = Arc::new(SessionState::default());
        let clipboard = Arc::new(MemoryClipboard::default());
        let status = Arc::new(RecordingStatus::default());
        let log: Arc<ConsoleLog> = Arc::new(ConsoleLog::new());
        let panel = Arc::new(TerminalPanel::new());
        let dispatcher = Arc::new(Dispatcher::new(
            session.clone(),
            clipboard.clone(),
            status.clone(),
            log.clone(),
            panel.clone(),
            "https://example.invalid".to_string(),
        ));
        let viewer = TxtViewer::new(
            session.clone(),
            dispatcher,
            clipboard.clone(),
            status,
            log,
            panel.clone(),
            output_dir,
        );
        (session, panel, clipboard, viewer)
    }

    #[test]
    fn file_name_replaces_spaces() {
        assert_eq!(download_file_name("João Silva"), "resultado_João_Silva.txt");
        assert_eq!(download_file_name(""), "resultado_saida.txt");
        assert_eq!(download_file_name("Maria"), "resultado_Maria.txt");
    }

    #[test]
    fn open_closes_the_messaging_view() {
        let (_, panel, _, viewer) = viewer(std::env::temp_dir());
        panel.open_view("https://example.invalid");
        assert!(panel.view_visible());

        viewer.open("conteúdo");

        assert!(panel.viewer_visible());
        assert!(!panel.view_visible());
        assert_eq!(viewer.content(), "conteúdo");
    }

    #[test]
    fn copy_content_goes_through_the_clipboard_port() {
        let (_, _, clipboard, viewer) = viewer(std::env::temp_dir());
        viewer.open("linha 1\nlinha 2");
        viewer.copy_content();
        assert_eq!(clipboard.texts().last().unwrap(), "linha 1\nlinha 2");
    }

    #[test]
    fn download_writes_the_named_file() {
        let dir = std::env::temp_dir().join(format!("txt-viewer-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let (session, _, _, viewer) = viewer(dir.clone());
        session.set_search("João Silva", "/nome João Silva");
        viewer.open("dados");

        let path = viewer.download().unwrap();

        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "resultado_João_Silva.txt"
        );
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "dados");
        let _ = std::fs::remove_dir_all(&dir);
    }
}
