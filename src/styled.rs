use crate::image::{Image, ImageFallback, ImageRoot};
use leptos::*;

const ROOT_CLASS: &str = "relative flex h-full w-full";
const IMAGE_CLASS: &str = "h-full w-full";
const FALLBACK_CLASS: &str = "flex h-full w-full items-center justify-center";

/// Joins the non-empty class fragments with a single space.
pub fn class_names<'a>(classes: impl IntoIterator<Item = &'a str>) -> String {
    classes
        .into_iter()
        .map(str::trim)
        .filter(|class| !class.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Rotating loader glyph shown by `<StyledImage/>` while the image loads.
#[component]
pub fn Spinner(
    #[prop(into, optional)] class: String,
    #[prop(default = 24)] size: u32,
) -> impl IntoView {
    let size = size.to_string();

    view! {
        <svg
            class=class
            xmlns="http://www.w3.org/2000/svg"
            width=size.clone()
            height=size
            viewBox="0 0 24 24"
            fill="none"
            stroke="currentColor"
            stroke-width="2"
            stroke-linecap="round"
            stroke-linejoin="round"
        >
            <path d="M12 2v4"/>
            <path d="m16.2 7.8 2.9-2.9"/>
            <path d="M18 12h4"/>
            <path d="m16.2 16.2 2.9 2.9"/>
            <path d="M12 18v4"/>
            <path d="m4.9 19.1 2.9-2.9"/>
            <path d="M2 12h4"/>
            <path d="m4.9 4.9 2.9 2.9"/>
        </svg>
    }
}

/**
 * Ready-made image with a spinner placeholder and optional failure text.
 */
#[component]
pub fn StyledImage(
    #[prop(into)] src: MaybeSignal<String>,
    #[prop(into, optional)] alt: String,
    #[prop(into, optional)] class: String,
    #[prop(into, optional)] on_fail_string: String,
    #[prop(optional)] delay: Option<u64>,
    /// Forwarded to the `<img>`, e.g. `attr:loading="lazy"`.
    #[prop(attrs)]
    attrs: Vec<(&'static str, Attribute)>,
) -> impl IntoView {
    let spinner = || view! { <Spinner class="h-4 w-4 animate-spin" size=24/> };

    // The fallback must be built inside the root so it can find the root's status.
    view! {
        <ImageRoot class=ROOT_CLASS>
            <Image src alt class=class_names([IMAGE_CLASS, class.as_str()]) attrs/>
            {match delay {
                Some(delay) => view! {
                    <ImageFallback delay on_fail_string class=FALLBACK_CLASS>
                        {spinner()}
                    </ImageFallback>
                }
                .into_view(),
                None => view! {
                    <ImageFallback on_fail_string class=FALLBACK_CLASS>
                        {spinner()}
                    </ImageFallback>
                }
                .into_view(),
            }}
        </ImageRoot>
    }
}

#[cfg(test)]
mod styled_tests {
    use super::*;

    #[test]
    fn skips_empty_fragments() {
        assert_eq!(class_names([IMAGE_CLASS, "", "  rounded "]), "h-full w-full rounded");
        assert_eq!(class_names([]), "");
    }
}
