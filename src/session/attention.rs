use std::io::Write;

use notify_rust::Notification;
use tracing::{debug, warn};

const BELL: &[u8] = b"\x07";
const NOTIFICATION_SUMMARY: &str = "pomotrack";

/// Best-effort ways of getting the user's attention when a phase ends. Failures are never
/// reported back.
#[cfg_attr(test, mockall::automock)]
pub trait Attention {
    fn ring_alarm(&self);

    fn request_focus(&self, message: &str);
}

/// Rings the terminal bell and optionally pops up a desktop notification.
pub struct TerminalAttention {
    desktop_notifications: bool,
}

impl TerminalAttention {
    pub fn new(desktop_notifications: bool) -> Self {
        Self {
            desktop_notifications,
        }
    }
}

impl Attention for TerminalAttention {
    fn ring_alarm(&self) {
        let mut stdout = std::io::stdout();
        if let Err(e) = stdout.write_all(BELL).and_then(|_| stdout.flush()) {
            debug!("Couldn't ring the bell {e:?}");
        }
    }

    fn request_focus(&self, message: &str) {
        if !self.desktop_notifications {
            return;
        }
        if let Err(e) = Notification::new()
            .summary(NOTIFICATION_SUMMARY)
            .body(message)
            .timeout(0)
            .show()
        {
            warn!("Failed to show desktop notification {e:?}");
        }
    }
}
