//! Change broadcast after the durable store has been updated.
//!
//! On Windows, top-level windows (Explorer in particular) re-read the
//! environment when they receive `WM_SETTINGCHANGE` with the `Environment`
//! category. Other platforms have no such signal; new login sessions pick
//! up the stored value on their own.

#[cfg(any(test, feature = "test-support"))]
use std::sync::Mutex;
#[cfg(windows)]
use std::time::Duration;

use anyhow::Result;
use tracing::debug;

use crate::io::config::ModpathConfig;

/// Settings category announced after the environment changed.
pub const ENVIRONMENT_CATEGORY: &str = "Environment";

/// Tells running processes that a settings category changed.
pub trait ChangeNotifier {
    fn notify(&self, category: &str) -> Result<()>;
}

/// `WM_SETTINGCHANGE` broadcast to every top-level window.
///
/// Sent twice, once with an ANSI and once with a UTF-16 category string, so
/// that both kinds of window procedure see it. Each send gives up after
/// `timeout` and skips hung windows.
#[cfg(windows)]
#[derive(Debug, Clone, Copy)]
pub struct BroadcastNotifier {
    timeout: Duration,
}

#[cfg(windows)]
impl BroadcastNotifier {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[cfg(windows)]
impl ChangeNotifier for BroadcastNotifier {
    fn notify(&self, category: &str) -> Result<()> {
        use anyhow::anyhow;

        let timeout_ms = u32::try_from(self.timeout.as_millis()).unwrap_or(u32::MAX);
        let ansi = win32::broadcast_ansi(category, timeout_ms);
        let wide = win32::broadcast_wide(category, timeout_ms);
        debug!(
            category,
            ansi = ansi.is_ok(),
            wide = wide.is_ok(),
            "broadcast settings change"
        );
        match (ansi, wide) {
            (Ok(()), Ok(())) => Ok(()),
            (Err(err), _) => Err(anyhow!("ansi broadcast failed: {err}")),
            (_, Err(err)) => Err(anyhow!("unicode broadcast failed: {err}")),
        }
    }
}

#[cfg(windows)]
#[allow(unsafe_code)]
mod win32 {
    use std::io;
    use std::iter;

    use windows_sys::Win32::UI::WindowsAndMessaging::{
        HWND_BROADCAST, SMTO_ABORTIFHUNG, SendMessageTimeoutA, SendMessageTimeoutW,
        WM_SETTINGCHANGE,
    };

    pub(super) fn broadcast_ansi(category: &str, timeout_ms: u32) -> io::Result<()> {
        let mut bytes: Vec<u8> = category.bytes().collect();
        bytes.push(0);
        let mut result = 0usize;
        // SAFETY: `bytes` is NUL-terminated and outlives the call; `result`
        // is a valid out pointer.
        let sent = unsafe {
            SendMessageTimeoutA(
                HWND_BROADCAST,
                WM_SETTINGCHANGE,
                0,
                bytes.as_ptr() as isize,
                SMTO_ABORTIFHUNG,
                timeout_ms,
                &mut result,
            )
        };
        if sent == 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    pub(super) fn broadcast_wide(category: &str, timeout_ms: u32) -> io::Result<()> {
        let wide: Vec<u16> = category.encode_utf16().chain(iter::once(0)).collect();
        let mut result = 0usize;
        // SAFETY: `wide` is NUL-terminated and outlives the call; `result`
        // is a valid out pointer.
        let sent = unsafe {
            SendMessageTimeoutW(
                HWND_BROADCAST,
                WM_SETTINGCHANGE,
                0,
                wide.as_ptr() as isize,
                SMTO_ABORTIFHUNG,
                timeout_ms,
                &mut result,
            )
        };
        if sent == 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
}

/// Platforms without a broadcast mechanism: record the event in the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl ChangeNotifier for LogNotifier {
    fn notify(&self, category: &str) -> Result<()> {
        debug!(category, "no change broadcast on this platform");
        Ok(())
    }
}

/// Remembers every category it was asked to announce.
///
/// Optionally fails each call, to exercise the non-fatal broadcast path.
#[cfg(any(test, feature = "test-support"))]
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    fail_with: Option<String>,
    sent: Mutex<Vec<String>>,
}

#[cfg(any(test, feature = "test-support"))]
impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            sent: Mutex::default(),
        }
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[cfg(any(test, feature = "test-support"))]
impl ChangeNotifier for RecordingNotifier {
    fn notify(&self, category: &str) -> Result<()> {
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(category.to_string());
        match &self.fail_with {
            Some(message) => Err(anyhow::anyhow!("{message}")),
            None => Ok(()),
        }
    }
}

/// The notifier matching [`crate::io::store::platform_store`].
pub fn platform_notifier(config: &ModpathConfig) -> Box<dyn ChangeNotifier> {
    #[cfg(windows)]
    {
        Box::new(BroadcastNotifier::new(Duration::from_millis(
            config.broadcast_timeout_ms,
        )))
    }
    #[cfg(not(windows))]
    {
        let _ = config;
        Box::new(LogNotifier)
    }
}
