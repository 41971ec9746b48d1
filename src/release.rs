/// Frees an auxiliary resource (a detached image element, a pending timeout) when dropped.
///
/// Loaders and timers hand one of these back for every acquisition, so the owner can let
/// go of the resource on whichever path finishes first.
#[must_use = "dropping a Release frees its resource immediately"]
pub struct Release(Option<Box<dyn FnOnce()>>);

impl Release {
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self(Some(Box::new(release)))
    }

    /// Nothing to free.
    pub fn noop() -> Self {
        Self(None)
    }
}

impl Drop for Release {
    fn drop(&mut self) {
        if let Some(release) = self.0.take() {
            release();
        }
    }
}

impl std::fmt::Debug for Release {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Release")
            .field(&if self.0.is_some() { "armed" } else { "noop" })
            .finish()
    }
}
