use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use tracing::info;

/// Surface of the operator panel the agent drives: the embedded messaging
/// view, the vision trigger button and the text viewer pane. Implementations
/// never fail; a missing surface is the adapter's problem, not the caller's.
pub trait PanelPort: Send + Sync {
    fn open_view(&self, url: &str);
    fn close_view(&self);
    fn refresh_view(&self);
    fn view_visible(&self) -> bool;

    fn set_trigger_active(&self, active: bool);
    fn set_trigger_enabled(&self, enabled: bool);
    fn trigger_active(&self) -> bool;
    fn trigger_enabled(&self) -> bool;

    fn show_viewer(&self);
    fn hide_viewer(&self);
    fn viewer_visible(&self) -> bool;
}

/// Terminal stand-in for the panel: tracks visibility flags and announces the
/// messaging URL so the operator can open it themselves.
pub struct TerminalPanel {
    view_url: Mutex<Option<String>>,
    view_visible: AtomicBool,
    trigger_active: AtomicBool,
    trigger_enabled: AtomicBool,
    viewer_visible: AtomicBool,
}

impl Default for TerminalPanel {
    fn default() -> Self {
        Self {
            view_url: Mutex::new(None),
            view_visible: AtomicBool::new(false),
            trigger_active: AtomicBool::new(false),
            trigger_enabled: AtomicBool::new(true),
            viewer_visible: AtomicBool::new(false),
        }
    }
}

impl TerminalPanel {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PanelPort for TerminalPanel {
    fn open_view(&self, url: &str) {
        *self.view_url.lock().unwrap() = Some(url.to_string());
        self.view_visible.store(true, Ordering::SeqCst);
        info!("abra no navegador: {}", url);
    }

    fn close_view(&self) {
        self.view_visible.store(false, Ordering::SeqCst);
    }

    fn refresh_view(&self) {
        if let Some(url) = self.view_url.lock().unwrap().clone() {
            info!("recarregue no navegador: {}", url);
        }
    }

    fn view_visible(&self) -> bool {
        self.view_visible.load(Ordering::SeqCst)
    }

    fn set_trigger_active(&self, active: bool) {
        self.trigger_active.store(active, Ordering::SeqCst);
    }

    fn set_trigger_enabled(&self, enabled: bool) {
        self.trigger_enabled.store(enabled, Ordering::SeqCst);
    }

    fn trigger_active(&self) -> bool {
        self.trigger_active.load(Ordering::SeqCst)
    }

    fn trigger_enabled(&self) -> bool {
        self.trigger_enabled.load(Ordering::SeqCst)
    }

    fn show_viewer(&self) {
        self.viewer_visible.store(true, Ordering::SeqCst);
    }

    fn hide_viewer(&self) {
        self.viewer_visible.store(false, Ordering::SeqCst);
    }

    fn viewer_visible(&self) -> bool {
        self.viewer_visible.load(Ordering::SeqCst)
    }
}
