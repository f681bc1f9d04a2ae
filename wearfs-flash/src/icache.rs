//! Scoped instruction-cache disable.

use crate::hal::InstructionCache;

/// RAII scope that keeps the instruction cache disabled for its lifetime.
///
/// Construction disables the cache; `Drop` re-enables it, so every exit path
/// of the guarded code — including `?` early returns on hardware failures —
/// re-enables exactly once. This replaces the enable-at-every-return-site
/// pattern, where a missed error path leaves the cache off for good.
///
/// The adapter holds at most one guard at a time; calls into it are
/// serialized by the filesystem.
#[must_use = "the cache stays disabled only while the guard is alive"]
pub struct CacheGuard<'a, C: InstructionCache> {
    cache: &'a mut C,
}

impl<'a, C: InstructionCache> CacheGuard<'a, C> {
    /// Disable the cache for the duration of the returned guard.
    pub fn new(cache: &'a mut C) -> Self {
        cache.disable();
        Self { cache }
    }
}

impl<C: InstructionCache> Drop for CacheGuard<'_, C> {
    fn drop(&mut self) {
        self.cache.enable();
    }
}
