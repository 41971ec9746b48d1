//! Browser-backed [`ImageLoader`] and [`Timer`].
//!
//! Off the browser (`ssr`, native tests) the defaults never resolve. Effects do not run
//! during server rendering, so nothing is lost there.

use std::time::Duration;

use crate::{
    fallback::Timer,
    probe::{ImageLoader, ProbeCompletion},
    release::Release,
};

#[cfg(any(feature = "hydrate", feature = "csr"))]
pub type DefaultLoader = BrowserImageLoader;
#[cfg(not(any(feature = "hydrate", feature = "csr")))]
pub type DefaultLoader = InertLoader;

#[cfg(any(feature = "hydrate", feature = "csr"))]
pub type DefaultTimer = BrowserTimer;
#[cfg(not(any(feature = "hydrate", feature = "csr")))]
pub type DefaultTimer = InertTimer;

/// Probes a source with a detached `HtmlImageElement`. Nothing is inserted into the
/// document; the element only exists to run the browser's decoder.
#[cfg(any(feature = "hydrate", feature = "csr"))]
#[derive(Clone, Debug, Default)]
pub struct BrowserImageLoader {
    cross_origin: Option<String>,
}

#[cfg(any(feature = "hydrate", feature = "csr"))]
impl BrowserImageLoader {
    pub fn new(cross_origin: Option<String>) -> Self {
        Self { cross_origin }
    }
}

#[cfg(any(feature = "hydrate", feature = "csr"))]
impl ImageLoader for BrowserImageLoader {
    fn load(&self, src: &str, completion: ProbeCompletion) -> Release {
        use crate::error::LoadFailure;
        use wasm_bindgen::{closure::Closure, JsCast};

        let image = match web_sys::HtmlImageElement::new() {
            Ok(image) => image,
            Err(err) => {
                completion.resolve(Err(LoadFailure::Decode {
                    src: src.to_string(),
                    reason: format!("could not create image element: {err:?}"),
                }));
                return Release::noop();
            }
        };

        if let Some(cross_origin) = &self.cross_origin {
            image.set_cross_origin(Some(cross_origin.as_str()));
        }

        let on_load = Closure::wrap(Box::new({
            let completion = completion.clone();
            move || completion.resolve(Ok(()))
        }) as Box<dyn FnMut()>);

        let on_error = Closure::wrap(Box::new({
            let src = src.to_string();
            move || {
                completion.resolve(Err(LoadFailure::Decode {
                    src: src.clone(),
                    reason: "the browser could not load or decode the resource".to_string(),
                }))
            }
        }) as Box<dyn FnMut()>);

        image.set_onload(Some(on_load.as_ref().unchecked_ref()));
        image.set_onerror(Some(on_error.as_ref().unchecked_ref()));
        image.set_src(src);

        Release::new(move || {
            image.set_onload(None);
            image.set_onerror(None);
            // Aborts the request if it is still in flight.
            image.set_src("");
            // The release may run from inside one of these handlers, so free them on the next tick.
            leptos::set_timeout(move || drop((on_load, on_error)), Duration::ZERO);
        })
    }
}

#[cfg(any(feature = "hydrate", feature = "csr"))]
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserTimer;

#[cfg(any(feature = "hydrate", feature = "csr"))]
impl Timer for BrowserTimer {
    fn schedule(&self, after: Duration, task: Box<dyn FnOnce()>) -> Release {
        match leptos::set_timeout_with_handle(task, after) {
            Ok(handle) => Release::new(move || handle.clear()),
            Err(err) => {
                log::error!("Failed to schedule fallback delay: {:?}", err);
                Release::noop()
            }
        }
    }
}

/// Loader for targets without a DOM; probes stay pending.
#[derive(Clone, Copy, Debug, Default)]
pub struct InertLoader;

impl InertLoader {
    pub fn new(_cross_origin: Option<String>) -> Self {
        Self
    }
}

impl ImageLoader for InertLoader {
    fn load(&self, src: &str, _completion: ProbeCompletion) -> Release {
        log::debug!("no image decoder on this target, `{src}` stays loading");
        Release::noop()
    }
}

/// Timer for targets without an event loop; tasks never fire.
#[derive(Clone, Copy, Debug, Default)]
pub struct InertTimer;

impl Timer for InertTimer {
    fn schedule(&self, _after: Duration, _task: Box<dyn FnOnce()>) -> Release {
        Release::noop()
    }
}

#[cfg(test)]
mod browser_tests {
    use super::*;
    use crate::{fallback::DelayGate, probe::Prober, status::LoadingStatus, store::StatusStore};

    #[test]
    fn inert_defaults_stay_pending() {
        let store = StatusStore::new();
        let mut prober = Prober::new(store.clone(), InertLoader::new(None));
        let gate = DelayGate::start(Some(Duration::from_millis(10)), &InertTimer, || {});

        prober.probe(Some("/cat.png"));

        assert_eq!(store.get(), LoadingStatus::Loading);
        assert!(prober.is_pending());
        assert!(!gate.is_open());
    }
}
