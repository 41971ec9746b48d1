use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use crate::{error::LoadFailure, release::Release, status::LoadingStatus, store::StatusStore};

/// Starts an out-of-band load of an image source.
///
/// The loader reports back through `completion` at most once per call and returns a
/// [`Release`] for whatever it had to acquire to perform the load.
pub trait ImageLoader {
    fn load(&self, src: &str, completion: ProbeCompletion) -> Release;
}

/// Per-probe state shared between the [`Prober`] and its [`ProbeCompletion`]s.
#[derive(Default)]
struct ProbeState {
    // Cleared when the probe is superseded or torn down.
    live: Cell<bool>,
    settled: Cell<bool>,
    resource: RefCell<Option<Release>>,
}

impl ProbeState {
    fn release(&self) {
        let resource = self.resource.borrow_mut().take();
        drop(resource);
    }
}

/// Callback handle passed to an [`ImageLoader`]. The first call to
/// [`ProbeCompletion::resolve`] wins; later calls are ignored.
#[derive(Clone)]
pub struct ProbeCompletion {
    src: Rc<str>,
    state: Rc<ProbeState>,
    store: StatusStore,
}

impl ProbeCompletion {
    pub fn src(&self) -> &str {
        &self.src
    }

    pub fn resolve(&self, outcome: Result<(), LoadFailure>) {
        if self.state.settled.replace(true) {
            log::trace!("ignoring repeated outcome for `{}`", self.src);
            return;
        }
        self.state.release();

        if !self.state.live.get() {
            log::debug!("discarding stale outcome for `{}`", self.src);
            return;
        }

        let status = match outcome {
            Ok(()) => LoadingStatus::Loaded,
            Err(failure) => {
                log::warn!("{failure}");
                LoadingStatus::Error
            }
        };
        self.store.set(status);
    }
}

struct ActiveProbe {
    src: String,
    state: Rc<ProbeState>,
}

/**
 * Drives the loading status of one image slot.
 *
 * Every new source retires the previous probe before starting its own, so only the most
 * recent source can ever write to the store.
 */
pub struct Prober<L: ImageLoader> {
    store: StatusStore,
    loader: L,
    current: Option<ActiveProbe>,
}

impl<L: ImageLoader> Prober<L> {
    pub fn new(store: StatusStore, loader: L) -> Self {
        Self {
            store,
            loader,
            current: None,
        }
    }

    /// Source of the current probe, if one was started.
    pub fn src(&self) -> Option<&str> {
        self.current.as_ref().map(|probe| probe.src.as_str())
    }

    /// True while the current probe has not produced an outcome.
    pub fn is_pending(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|probe| !probe.state.settled.get())
    }

    pub fn probe(&mut self, src: Option<&str>) {
        let Some(src) = src.filter(|src| !src.is_empty()) else {
            self.retire();
            log::warn!("{}", LoadFailure::MissingSource);
            self.store.set(LoadingStatus::Error);
            return;
        };

        if self.src() == Some(src) {
            return;
        }
        self.retire();

        log::debug!("probing image `{src}`");
        let state = Rc::new(ProbeState {
            live: Cell::new(true),
            ..ProbeState::default()
        });
        self.store.set(LoadingStatus::Loading);

        let completion = ProbeCompletion {
            src: Rc::from(src),
            state: state.clone(),
            store: self.store.clone(),
        };
        let resource = self.loader.load(src, completion);

        if state.settled.get() {
            // Resolved inside `load`.
            drop(resource);
        } else {
            *state.resource.borrow_mut() = Some(resource);
        }

        self.current = Some(ActiveProbe {
            src: src.to_owned(),
            state,
        });
    }

    /// Stops the current probe for good. Called when the owning slot unmounts.
    pub fn teardown(&mut self) {
        if let Some(src) = self.src() {
            log::debug!("tearing down probe for `{src}`");
        }
        self.retire();
    }

    fn retire(&mut self) {
        let Some(probe) = self.current.take() else {
            return;
        };

        probe.state.live.set(false);
        if !probe.state.settled.replace(true) {
            log::debug!("superseding in-flight probe for `{}`", probe.src);
        }
        probe.state.release();
    }
}

impl<L: ImageLoader> Drop for Prober<L> {
    fn drop(&mut self) {
        self.retire();
    }
}
