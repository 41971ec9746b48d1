use crate::{error::ImageError, status::LoadingStatus, store::StatusStore};
use leptos::*;

/// Status shared by one `<ImageRoot/>` with its `<Image/>` and `<ImageFallback/>`.
#[derive(Clone, Debug)]
pub struct ImageStatusContext {
    pub(crate) store: StatusStore,
    status: ReadSignal<LoadingStatus>,
}

impl ImageStatusContext {
    /// Reactive read of the current status.
    pub fn status(&self) -> LoadingStatus {
        self.status.get()
    }

    pub fn signal(&self) -> ReadSignal<LoadingStatus> {
        self.status
    }

    pub fn store(&self) -> &StatusStore {
        &self.store
    }
}

/// Creates a fresh status store and provides it to every descendant of the current owner.
///
/// `<ImageRoot/>` calls this for you. Each call makes an independent store, so nested roots
/// never see each other's status. The store is disposed when the owner is cleaned up.
///
/// Example
///
/// ```ignore
/// use leptos::*;
/// use leptos_image_status::*;
///
/// #[component]
/// pub fn Avatar() -> impl IntoView {
///     let context = provide_image_status();
///
///     view! {
///       <div data-status=move || context.status().as_str()/>
///     }
/// }
/// ```
pub fn provide_image_status() -> ImageStatusContext {
    let store = StatusStore::new();
    let (status, set_status) = create_signal(store.get());
    let subscription = store.subscribe(move |next| set_status.set(next));

    on_cleanup({
        let store = store.clone();
        move || {
            drop(subscription);
            store.dispose();
        }
    });

    let context = ImageStatusContext { store, status };
    provide_context(context.clone());
    context
}

pub fn try_use_image_status() -> Result<ImageStatusContext, ImageError> {
    use_context::<ImageStatusContext>().ok_or(ImageError::ContextMissing)
}

/// Panics outside of an `<ImageRoot/>`.
pub fn use_image_status() -> ImageStatusContext {
    try_use_image_status().unwrap_or_else(|err| panic!("{err}"))
}

#[cfg(test)]
mod provider_tests {
    use super::*;

    #[test]
    fn missing_root_is_reported() {
        let runtime = create_runtime();

        let result = try_use_image_status();
        assert!(matches!(result, Err(ImageError::ContextMissing)));

        runtime.dispose();
    }

    #[test]
    fn nested_roots_are_independent() {
        use std::{cell::RefCell, rc::Rc};

        let runtime = create_runtime();
        let seen = Rc::new(RefCell::new(None));

        create_effect({
            let seen = seen.clone();
            move |_| {
                let outer = run_as_child(|| {
                    let outer = provide_image_status();
                    let inner = run_as_child(|| {
                        provide_image_status();
                        use_image_status()
                    });
                    (outer, inner, use_image_status())
                });
                *seen.borrow_mut() = Some(outer);
            }
        });

        let (outer, inner, outer_again) = seen.borrow_mut().take().unwrap();
        assert!(!inner.store().ptr_eq(outer.store()));
        assert!(outer_again.store().ptr_eq(outer.store()));

        inner.store().set(LoadingStatus::Error);

        assert_eq!(inner.status(), LoadingStatus::Error);
        assert_eq!(outer.status(), LoadingStatus::Idle);
        assert_eq!(outer.store().get(), LoadingStatus::Idle);

        runtime.dispose();
    }

    #[test]
    fn cleanup_disposes_store() {
        use std::{cell::RefCell, rc::Rc};

        let runtime = create_runtime();
        let (mount, set_mount) = create_signal(0);
        let stores = Rc::new(RefCell::new(Vec::new()));

        // Each rerun cleans up the previous run, like an unmounted root.
        create_effect({
            let stores = stores.clone();
            move |_| {
                mount.get();
                let context = provide_image_status();
                stores.borrow_mut().push(context.clone());
            }
        });

        let first = stores.borrow()[0].clone();
        first.store().set(LoadingStatus::Loading);

        set_mount.set(1);

        assert!(first.store().is_disposed());
        first.store().set(LoadingStatus::Loaded);
        assert_eq!(first.store().get(), LoadingStatus::Loading);

        let second = stores.borrow()[1].clone();
        assert!(!second.store().is_disposed());
        assert!(!second.store().ptr_eq(first.store()));

        runtime.dispose();
    }
}
