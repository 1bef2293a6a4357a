use std::sync::Mutex;

/// Shared session record: one instance per process, mutated in place by the
/// shell handlers. The `processing` flag is the sole concurrency guard for
/// the orchestrator.
#[derive(Debug, Default)]
pub struct SessionState {
    pub name: Mutex<String>,
    pub command: Mutex<String>,
    pub api_key: Mutex<String>,
    pub processing: Mutex<bool>,
}

impl SessionState {
    pub fn api_key(&self) -> String {
        self.api_key.lock().unwrap().clone()
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.lock().unwrap().is_empty()
    }

    pub fn set_api_key(&self, key: &str) {
        *self.api_key.lock().unwrap() = key.to_string();
    }

    pub fn name(&self) -> String {
        self.name.lock().unwrap().clone()
    }

    pub fn command(&self) -> String {
        self.command.lock().unwrap().clone()
    }

    /// Records the active search: the operator name and the derived command.
    pub fn set_search(&self, name: &str, command: &str) {
        *self.name.lock().unwrap() = name.to_string();
        *self.command.lock().unwrap() = command.to_string();
    }

    pub fn is_processing(&self) -> bool {
        *self.processing.lock().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_search_updates_both_fields() {
        let s = SessionState::default();
        s.set_search("Maria", "/nome Maria");
        assert_eq!(s.name(), "Maria");
        assert_eq!(s.command(), "/nome Maria");
    }

    #[test]
    fn api_key_empty_by_default() {
        let s = SessionState::default();
        assert!(!s.has_api_key());
        s.set_api_key("abc");
        assert!(s.has_api_key());
    }
}
