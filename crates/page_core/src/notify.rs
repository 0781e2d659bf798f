//! Floating notices shown in the page corner.

use std::time::Duration;

/// Every notice is removed this long after it appears; there is no manual
/// dismissal.
pub const NOTICE_DISMISS_DELAY: Duration = Duration::from_secs(5);

pub const NOTIFICATION_STYLE_ID: &str = "notificationStyles";

pub(crate) const NOTIFICATION_KEYFRAMES: &str = "@keyframes slideIn { \
     from { transform: translateX(100%); opacity: 0; } \
     to { transform: translateX(0); opacity: 1; } }";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Error,
    Success,
}

impl NoticeKind {
    pub fn class(self) -> &'static str {
        match self {
            Self::Error => "notification-error",
            Self::Success => "notification-success",
        }
    }

    fn background(self) -> &'static str {
        match self {
            Self::Error => "#ff6b6b",
            Self::Success => "#51cf66",
        }
    }
}

pub(crate) fn inline_style(kind: NoticeKind) -> String {
    format!(
        "position: fixed; top: 20px; right: 20px; background: {}; color: white; \
         padding: 1rem 2rem; border-radius: 5px; box-shadow: 0 2px 10px rgba(0,0,0,0.1); \
         z-index: 1000; animation: slideIn 0.3s ease;",
        kind.background()
    )
}
