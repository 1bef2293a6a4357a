use std::sync::Arc;

use tokio::time::sleep;

use crate::backend::{Analysis, AutomationBackend, Point};
use crate::config::Timings;
use crate::error::AgentError;
use crate::logging::{LogSink, Severity, StatusSink};
use crate::ports::PanelPort;
use crate::session::SessionState;
use crate::viewer::TxtViewer;

pub const DEFAULT_FIELD_TARGET: Point = Point::new(540.0, 2000.0);
pub const DEFAULT_SEND_TARGET: Point = Point::new(1000.0, 2000.0);

const PLACEHOLDER_CONTENT: &str = "Conteúdo do arquivo será exibido aqui...";

/// Stages of the capture-analyze-act-verify flow. Strictly sequential; no
/// stage starts before the previous one resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Capturing,
    Analyzing,
    Acting,
    Waiting,
    Searching,
    Done,
    Failed,
}

#[derive(Default)]
struct FlowData {
    screenshot: String,
    analysis: Option<Analysis>,
}

/// Drives the one multi-step flow of the agent. At most one run at a time;
/// the session's processing flag is the guard and concurrent triggers are
/// rejected, never queued.
pub struct Orchestrator {
    session: Arc<SessionState>,
    backend: Arc<dyn AutomationBackend>,
    status: Arc<dyn StatusSink>,
    log: Arc<dyn LogSink>,
    panel: Arc<dyn PanelPort>,
    viewer: Arc<TxtViewer>,
    timings: Timings,
}

/// Restores the idle invariants no matter where the flow stopped.
struct FlowGuard {
    session: Arc<SessionState>,
    panel: Arc<dyn PanelPort>,
}

impl Drop for FlowGuard {
    fn drop(&mut self) {
        *self.session.processing.lock().unwrap() = false;
        self.panel.set_trigger_enabled(true);
    }
}

impl Orchestrator {
    pub fn new(
        session: Arc<SessionState>,
        backend: Arc<dyn AutomationBackend>,
        status: Arc<dyn StatusSink>,
        log: Arc<dyn LogSink>,
        panel: Arc<dyn PanelPort>,
        viewer: Arc<TxtViewer>,
        timings: Timings,
    ) -> Self {
        Self {
            session,
            backend,
            status,
            log,
            panel,
            viewer,
            timings,
        }
    }

    /// Entry point of the flow. Returns the terminal stage reached; rejected
    /// triggers return `Idle` without touching the running flow.
    pub async fn activate(&self) -> Stage {
        {
            let mut busy = self.session.processing.lock().unwrap();
            if *busy {
                self.status
                    .show(&format!("⏳ {}", AgentError::Busy), Severity::Loading);
                return Stage::Idle;
            }
            if self.session.api_key.lock().unwrap().is_empty() {
                self.status
                    .show(&format!("❌ {}", AgentError::MissingApiKey), Severity::Error);
                return Stage::Idle;
            }
            *busy = true;
        }

        self.panel.set_trigger_enabled(false);
        let _guard = FlowGuard {
            session: self.session.clone(),
            panel: self.panel.clone(),
        };

        self.log.add("🤖 Ativando Gemini Vision...", Severity::Info);
        self.status
            .show("🤖 Gemini Vision ativado! Processando...", Severity::Loading);

        let mut stage = Stage::Capturing;
        let mut flow = FlowData::default();
        loop {
            stage = match self.step(stage, &mut flow).await {
                Ok(next) => next,
                Err(err) => {
                    self.status
                        .show(&format!("❌ Erro: {}", err), Severity::Error);
                    self.log.add(&format!("❌ ERRO: {}", err), Severity::Error);
                    Stage::Failed
                }
            };
            if matches!(stage, Stage::Done | Stage::Failed) {
                return stage;
            }
        }
    }

    async fn step(&self, stage: Stage, flow: &mut FlowData) -> Result<Stage, AgentError> {
        match stage {
            Stage::Capturing => {
                self.log
                    .add("📸 Capturando screenshot da tela...", Severity::Info);
                flow.screenshot = self.backend.capture_screen().await?;
                self.log.add("✅ Screenshot capturado", Severity::Success);
                Ok(Stage::Analyzing)
            }
            Stage::Analyzing => {
                self.log
                    .add("🧠 Analisando tela com Gemini Vision...", Severity::Info);
                let analysis = self
                    .backend
                    .analyze(
                        &self.session.api_key(),
                        &flow.screenshot,
                        &self.session.command(),
                    )
                    .await?;
                self.log.add("✅ Análise concluída", Severity::Success);
                let pretty = serde_json::to_string_pretty(&analysis).unwrap_or_default();
                self.log
                    .add(&format!("Resultado: {}", pretty), Severity::Data);
                flow.analysis = Some(analysis);
                Ok(Stage::Acting)
            }
            Stage::Acting => {
                self.execute_actions(flow.analysis.take().unwrap_or_default())
                    .await?;
                Ok(Stage::Waiting)
            }
            Stage::Waiting => {
                self.log
                    .add("⏳ Aguardando resposta do bot (5s)...", Severity::Info);
                self.status
                    .show("⏳ Aguardando resposta do QueryBuscasBot...", Severity::Loading);
                sleep(self.timings.bot_response).await;
                Ok(Stage::Searching)
            }
            Stage::Searching => {
                self.log.add("🔍 Procurando arquivo .txt...", Severity::Info);
                // Failures in this stage stay in this stage: logged, surfaced
                // as their own status, never re-raised to the outer handler.
                match self.find_and_open_txt().await {
                    Ok(()) => Ok(Stage::Done),
                    Err(err) => {
                        self.log.add(
                            &format!("Erro ao procurar arquivo: {}", err),
                            Severity::Error,
                        );
                        self.status
                            .show("⚠️ Erro ao procurar arquivo", Severity::Error);
                        Ok(Stage::Failed)
                    }
                }
            }
            Stage::Idle | Stage::Done | Stage::Failed => Ok(stage),
        }
    }

    /// click(field) → paste → click(send), with the fixed gaps in between.
    /// Responses are never inspected; only a transport failure aborts.
    async fn execute_actions(&self, analysis: Analysis) -> Result<(), AgentError> {
        let field = analysis.campo_texto.unwrap_or(DEFAULT_FIELD_TARGET);
        let send = analysis.botao_enviar.unwrap_or(DEFAULT_SEND_TARGET);

        self.log.add(
            &format!("1️⃣ Clicando no campo ({}, {})", field.x, field.y),
            Severity::Info,
        );
        self.status
            .show("1/3: Clicando no campo de texto...", Severity::Loading);
        self.backend
            .click(field)
            .await
            .map_err(|e| AgentError::Action(e.to_string()))?;
        sleep(self.timings.click_to_paste).await;

        self.log.add(
            &format!("2️⃣ Colando comando: {}", self.session.command()),
            Severity::Info,
        );
        self.status.show("2/3: Colando comando...", Severity::Loading);
        self.backend
            .paste()
            .await
            .map_err(|e| AgentError::Action(e.to_string()))?;
        sleep(self.timings.paste_to_send).await;

        self.log.add(
            &format!("3️⃣ Clicando em ENVIAR ({}, {})", send.x, send.y),
            Severity::Info,
        );
        self.status.show("3/3: Enviando comando...", Severity::Loading);
        self.backend
            .click(send)
            .await
            .map_err(|e| AgentError::Action(e.to_string()))?;

        self.log
            .add("✅ Comando enviado com sucesso!", Severity::Success);
        Ok(())
    }

    async fn find_and_open_txt(&self) -> Result<(), AgentError> {
        let screenshot = self.backend.capture_screen().await?;

        self.log
            .add("🔍 Procurando arquivo .txt com Gemini...", Severity::Info);
        let result = self
            .backend
            .find_txt(&self.session.api_key(), &screenshot)
            .await?;

        if result.found {
            self.log.add(
                &format!(
                    "✅ Arquivo encontrado: {}",
                    result.filename.as_deref().unwrap_or("?")
                ),
                Severity::Success,
            );
            if let Some(at) = result.coordinates {
                self.backend.click(at).await?;
            }
            sleep(self.timings.file_open).await;
            self.viewer
                .open(result.content.as_deref().unwrap_or(PLACEHOLDER_CONTENT));
            self.status
                .show("✅ Arquivo aberto com sucesso!", Severity::Success);
        } else {
            self.status
                .show("⚠️ Nenhum arquivo .txt encontrado", Severity::Error);
            self.log
                .add("⚠️ Arquivo .txt não encontrado na resposta", Severity::Warning);
        }
        Ok(())
    }
}
