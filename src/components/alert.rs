//! User-visible notifications. Alerts accumulate until cleared by the user or a
//! view transition. Messages must be safe to display and never include secrets
//! or tokens; `trusted` marks messages composed locally rather than from
//! server text, which may therefore carry markup.

use std::fmt;

/// Supported alert styles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlertKind {
    Success,
    Danger,
}

impl fmt::Display for AlertKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertKind::Success => formatter.write_str("success"),
            AlertKind::Danger => formatter.write_str("danger"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alert {
    pub kind: AlertKind,
    pub message: String,
    pub trusted: bool,
}

impl fmt::Display for Alert {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "[{}] {}", self.kind, self.message)
    }
}

#[derive(Clone, Debug, Default)]
pub struct Alerts {
    alerts: Vec<Alert>,
}

impl Alerts {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: AlertKind, message: impl Into<String>) {
        self.alerts.push(Alert {
            kind,
            message: message.into(),
            trusted: false,
        });
    }

    pub fn push_trusted(&mut self, kind: AlertKind, message: impl Into<String>) {
        self.alerts.push(Alert {
            kind,
            message: message.into(),
            trusted: true,
        });
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(AlertKind::Success, message);
    }

    pub fn danger(&mut self, message: impl Into<String>) {
        self.push(AlertKind::Danger, message);
    }

    #[must_use]
    pub fn all(&self) -> &[Alert] {
        &self.alerts
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    /// Returns the accumulated alerts and leaves the list empty.
    pub fn drain(&mut self) -> Vec<Alert> {
        std::mem::take(&mut self.alerts)
    }

    pub fn clear(&mut self) {
        self.alerts.clear();
    }
}
