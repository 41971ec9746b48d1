use std::{cell::Cell, rc::Rc, time::Duration};

use crate::{release::Release, status::LoadingStatus};

/// What `<ImageFallback/>` shows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FallbackView {
    Hidden,
    /// Empty shell for a spinner or other placeholder content.
    Placeholder,
    /// Shell holding the failure text.
    Failed(String),
}

impl FallbackView {
    /// Precedence: the delay gate first, then an error, then anything short of loaded.
    pub fn resolve(can_render: bool, status: LoadingStatus, on_fail: &str) -> Self {
        match status {
            _ if !can_render => FallbackView::Hidden,
            LoadingStatus::Error => FallbackView::Failed(on_fail.to_string()),
            LoadingStatus::Loaded => FallbackView::Hidden,
            LoadingStatus::Idle | LoadingStatus::Loading => FallbackView::Placeholder,
        }
    }

    pub fn is_visible(&self) -> bool {
        !matches!(self, FallbackView::Hidden)
    }
}

/// Runs a task once after a delay. The returned [`Release`] cancels it if still pending.
pub trait Timer {
    fn schedule(&self, after: Duration, task: Box<dyn FnOnce()>) -> Release;
}

/// Holds the fallback back until its delay has elapsed.
///
/// Dropping the gate before the delay elapses cancels the timer, so `on_open` never runs
/// for an unmounted fallback.
#[derive(Debug)]
pub struct DelayGate {
    open: Rc<Cell<bool>>,
    _pending: Option<Release>,
}

impl DelayGate {
    /// With no delay the gate starts open and `on_open` is not called.
    pub fn start<T>(delay: Option<Duration>, timer: &T, on_open: impl FnOnce() + 'static) -> Self
    where
        T: Timer + ?Sized,
    {
        let Some(delay) = delay else {
            return Self {
                open: Rc::new(Cell::new(true)),
                _pending: None,
            };
        };

        let open = Rc::new(Cell::new(false));
        let pending = timer.schedule(delay, {
            let open = open.clone();
            Box::new(move || {
                open.set(true);
                on_open();
            })
        });

        Self {
            open,
            _pending: Some(pending),
        }
    }

    pub fn is_open(&self) -> bool {
        self.open.get()
    }
}
