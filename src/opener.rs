//! Opening external links.

use std::process::{Command, Stdio};
use std::thread::JoinHandle;

use parking_lot::Mutex;
use tracing::{debug, warn};

/// Errors from opening an external link.
#[derive(Debug, thiserror::Error)]
pub enum OpenError {
    #[error("No URL opener available. On Linux, install xdg-utils.")]
    NoOpenerAvailable,

    #[error("Opener '{tool}' failed: {message}")]
    OpenerFailed { tool: &'static str, message: String },
}

/// Opens external URLs outside the terminal site, like a new browser tab.
pub trait LinkOpener: Send + Sync {
    fn open(&self, url: &str) -> Result<(), OpenError>;
}

/// Opens URLs with the platform's desktop opener.
///
/// Tries each command in order until one can be spawned.
pub struct SystemOpener {
    commands: Vec<&'static str>,
}

impl SystemOpener {
    /// Create with the platform-appropriate commands.
    pub fn new() -> Self {
        Self {
            commands: platform_commands(),
        }
    }

    /// Create with specific commands (for testing).
    pub fn with_commands(commands: Vec<&'static str>) -> Self {
        Self { commands }
    }

    pub fn commands(&self) -> &[&'static str] {
        &self.commands
    }
}

impl Default for SystemOpener {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkOpener for SystemOpener {
    fn open(&self, url: &str) -> Result<(), OpenError> {
        let mut last_error = None;
        for &tool in &self.commands {
            match spawn_reaped(tool, url) {
                Ok(_) => return Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => {
                    last_error = Some(OpenError::OpenerFailed {
                        tool,
                        message: e.to_string(),
                    })
                }
            }
        }
        Err(last_error.unwrap_or(OpenError::NoOpenerAvailable))
    }
}

/// Spawn `tool url` and reap it on a detached thread.
///
/// Desktop openers may block until the browser exits, so the caller never
/// waits on the child.
fn spawn_reaped(tool: &str, url: &str) -> std::io::Result<JoinHandle<()>> {
    let mut child = Command::new(tool)
        .arg(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    let tool = tool.to_string();
    Ok(std::thread::spawn(move || match child.wait() {
        Ok(status) => debug!(tool = %tool, %status, "opener exited"),
        Err(e) => warn!(tool = %tool, error = %e, "failed to wait for opener"),
    }))
}

/// Get the platform-appropriate opener commands in priority order.
fn platform_commands() -> Vec<&'static str> {
    #[cfg(target_os = "macos")]
    {
        vec!["open"]
    }

    #[cfg(target_os = "linux")]
    {
        vec!["xdg-open", "gio", "wslview"]
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux")))]
    {
        vec![]
    }
}

/// Remembers URLs instead of opening them.
///
/// Used by the headless renderer and in tests.
#[derive(Debug, Default)]
pub struct RecordingOpener {
    opened: Mutex<Vec<String>>,
}

impl RecordingOpener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().clone()
    }
}

impl LinkOpener for RecordingOpener {
    fn open(&self, url: &str) -> Result<(), OpenError> {
        self.opened.lock().push(url.to_string());
        Ok(())
    }
}
