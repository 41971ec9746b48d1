use std::{cell::RefCell, rc::Rc, time::Duration};

use crate::browser::{DefaultLoader, DefaultTimer};
use crate::fallback::{DelayGate, FallbackView};
use crate::probe::Prober;
use crate::provider::{provide_image_status, use_image_status};

use leptos::*;
use leptos_meta::Link;

/**
 * Root of an image with a loading lifecycle.
 *
 * Owns the loading status shared by the `<Image/>` and `<ImageFallback/>` placed inside it.
 */
#[component]
pub fn ImageRoot(
    #[prop(into, optional)] class: String,
    #[prop(attrs)] attrs: Vec<(&'static str, Attribute)>,
    children: Children,
) -> impl IntoView {
    // Own child owner, so sibling roots never share a context.
    run_as_child(move || {
        let context = provide_image_status();
        let status = context.signal();

        view! {
            <div {..attrs} class=class data-status=move || status.get().as_str()>
                {children()}
            </div>
        }
    })
}

/**
 * Renders the real image once it has loaded, and nothing before that.
 *
 * Must be placed inside an `<ImageRoot/>`.
 */
#[component]
pub fn Image(
    #[prop(into)] src: MaybeSignal<String>,
    #[prop(into, optional)] alt: String,
    #[prop(into, optional)] class: String,
    #[prop(optional)] width: Option<u32>,
    #[prop(optional)] height: Option<u32>,
    // Will add preload link to head if true.
    #[prop(default = false)] priority: bool,
    #[prop(into, default = "anonymous".to_string())] cross_origin: String,
    #[prop(attrs)] attrs: Vec<(&'static str, Attribute)>,
) -> impl IntoView {
    let context = use_image_status();
    let status = context.signal();

    let cross_origin = Some(cross_origin).filter(|value| !value.is_empty());
    let prober = Rc::new(RefCell::new(Prober::new(
        context.store.clone(),
        DefaultLoader::new(cross_origin.clone()),
    )));

    create_effect({
        let prober = prober.clone();
        let src = src.clone();
        move |_| {
            let src = src.get();
            prober.borrow_mut().probe(Some(src.as_str()));
        }
    });

    on_cleanup(move || prober.borrow_mut().teardown());

    let preload = priority.then(|| {
        view! { <Link rel="preload" as_="image" href=src.get_untracked()/> }
    });

    let width = width.map(|width| width.to_string());
    let height = height.map(|height| height.to_string());

    view! {
        {preload}
        {move || {
            status
                .get()
                .is_loaded()
                .then(|| {
                    let attrs = attrs.clone();
                    view! {
                        <img
                            {..attrs}
                            src=src.get()
                            alt=alt.clone()
                            class=class.clone()
                            width=width.clone()
                            height=height.clone()
                            crossorigin=cross_origin.clone()
                        />
                    }
                })
        }}
    }
}

/**
 * Placeholder while the image loads, failure text once it has failed.
 *
 * With `delay` (milliseconds) nothing is shown until the delay has elapsed, which avoids a
 * flash of fallback for images that resolve quickly.
 */
#[component]
pub fn ImageFallback(
    #[prop(optional)] delay: Option<u64>,
    #[prop(into, optional)] on_fail_string: String,
    #[prop(into, optional)] class: String,
    #[prop(attrs)] attrs: Vec<(&'static str, Attribute)>,
    #[prop(optional)] children: Option<ChildrenFn>,
) -> impl IntoView {
    let context = use_image_status();
    let status = context.signal();

    let delay = delay.map(Duration::from_millis);
    let (can_render, set_can_render) = create_signal(delay.is_none());

    let gate = Rc::new(RefCell::new(None::<DelayGate>));
    create_effect({
        let gate = gate.clone();
        move |_| {
            let started = DelayGate::start(delay, &DefaultTimer::default(), move || {
                set_can_render.set(true)
            });
            *gate.borrow_mut() = Some(started);
        }
    });
    on_cleanup(move || drop(gate.borrow_mut().take()));

    move || {
        let attrs = attrs.clone();
        match FallbackView::resolve(can_render.get(), status.get(), &on_fail_string) {
            FallbackView::Hidden => ().into_view(),
            FallbackView::Failed(text) => {
                view! { <div {..attrs} class=class.clone()>{text}</div> }.into_view()
            }
            FallbackView::Placeholder => view! {
                <div {..attrs} class=class.clone()>
                    {children.as_ref().map(|children| children())}
                </div>
            }
            .into_view(),
        }
    }
}
