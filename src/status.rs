use serde::{Deserialize, Serialize};

/// Loading status of the single image owned by an `<ImageRoot/>`.
///
/// The usual path is `Idle -> Loading -> Loaded | Error`. A new source restarts at `Loading`.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq, Serialize, Hash)]
#[serde(rename_all = "lowercase")]
pub enum LoadingStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Error,
}

impl LoadingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoadingStatus::Idle => "idle",
            LoadingStatus::Loading => "loading",
            LoadingStatus::Loaded => "loaded",
            LoadingStatus::Error => "error",
        }
    }

    /// `Loaded` or `Error`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, LoadingStatus::Loaded | LoadingStatus::Error)
    }

    /// The real image may only be rendered in this state.
    pub fn is_loaded(&self) -> bool {
        *self == LoadingStatus::Loaded
    }
}

impl std::fmt::Display for LoadingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
