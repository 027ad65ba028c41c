use std::sync::Arc;

use parking_lot::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub title: String,
    pub message: String,
}

/// Queue of transient notifications. Screens push, frontends drain and render.
#[derive(Debug, Clone, Default)]
pub struct ToastTray {
    queue: Arc<Mutex<Vec<Toast>>>,
}

impl ToastTray {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success<T: Into<String>, M: Into<String>>(&self, title: T, message: M) {
        self.push(ToastKind::Success, title.into(), message.into());
    }

    pub fn error<T: Into<String>, M: Into<String>>(&self, title: T, message: M) {
        self.push(ToastKind::Error, title.into(), message.into());
    }

    fn push(&self, kind: ToastKind, title: String, message: String) {
        tracing::debug!(?kind, %title, %message, "toast");
        self.queue.lock().push(Toast {
            kind,
            title,
            message,
        });
    }

    /// Remove and return everything queued so far, oldest first.
    pub fn drain(&self) -> Vec<Toast> {
        std::mem::take(&mut *self.queue.lock())
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }
}
