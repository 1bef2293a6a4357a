use std::io::Write;
use std::process::{Command, Stdio};
use std::sync::Arc;

use crate::logging::{LogSink, Severity};

/// Clipboard writes never abort a flow; failures are logged and swallowed.
pub trait ClipboardPort: Send + Sync {
    fn copy(&self, text: &str);
}

/// Primary path goes through arboard; when the desktop clipboard is not
/// reachable (headless session, missing display) it falls back to the
/// platform copy command fed over stdin.
pub struct ArboardClipboard {
    log: Arc<dyn LogSink>,
}

impl ArboardClipboard {
    pub fn new(log: Arc<dyn LogSink>) -> Self {
        Self { log }
    }

    fn copy_fallback(&self, text: &str) {
        for (cmd, args) in fallback_commands() {
            match pipe_to_command(cmd, args, text) {
                Ok(()) => {
                    self.log.add("Copiado via fallback", Severity::Success);
                    return;
                }
                Err(_) => continue,
            }
        }
        self.log.add("Falha ao copiar via fallback", Severity::Error);
    }
}

impl ClipboardPort for ArboardClipboard {
    fn copy(&self, text: &str) {
        let direct = arboard::Clipboard::new().and_then(|mut cb| cb.set_text(text.to_string()));
        match direct {
            Ok(()) => self.log.add("Copiado via clipboard do sistema", Severity::Success),
            Err(_) => self.copy_fallback(text),
        }
    }
}

#[cfg(target_os = "macos")]
fn fallback_commands() -> &'static [(&'static str, &'static [&'static str])] {
    &[("pbcopy", &[])]
}

#[cfg(target_os = "windows")]
fn fallback_commands() -> &'static [(&'static str, &'static [&'static str])] {
    &[("clip", &[])]
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn fallback_commands() -> &'static [(&'static str, &'static [&'static str])] {
    &[
        ("wl-copy", &[]),
        ("xclip", &["-selection", "clipboard"]),
        ("xsel", &["--clipboard", "--input"]),
    ]
}

/// Spawns the command, writes the text and always reaps the child, whatever
/// the outcome of the write.
fn pipe_to_command(cmd: &str, args: &[&str], text: &str) -> std::io::Result<()> {
    let mut child = Command::new(cmd)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    let write_result = match child.stdin.take() {
        Some(mut stdin) => stdin.write_all(text.as_bytes()),
        None => Err(std::io::Error::other("sem stdin")),
    };
    let status = child.wait()?;
    write_result?;

    if status.success() {
        Ok(())
    } else {
        Err(std::io::Error::other("comando de cópia falhou"))
    }
}
