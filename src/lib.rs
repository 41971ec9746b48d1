pub mod browser;
pub mod error;
pub mod fallback;
pub mod image;
pub mod optimizer;
pub mod probe;
pub mod provider;
pub mod release;
pub mod status;
pub mod store;
pub mod styled;
#[cfg(test)]
mod testing;

pub use error::{ImageError, LoadFailure};
pub use fallback::{DelayGate, FallbackView, Timer};
pub use image::*;
pub use optimizer::optimized_url;
pub use probe::{ImageLoader, ProbeCompletion, Prober};
pub use provider::*;
pub use release::Release;
pub use status::LoadingStatus;
pub use store::{StatusStore, Subscription};
pub use styled::*;
