//! Hardware ports for the flash controller and instruction cache.
//!
//! The flash controller and the instruction cache are singletons of the
//! physical chip. Rather than reaching for them through ambient global
//! functions, the adapter takes owned handles implementing these traits at
//! construction, which keeps the core testable against a simulated backend
//! such as [`RamFlash`](crate::RamFlash).

use core::error::Error;

/// Port for raw byte-addressable NOR program memory.
///
/// Addresses are physical byte offsets into the memory's address space. The
/// granularity rules are the memory technology's, not this trait's: programs
/// land on word-aligned addresses one word at a time, erases on page-aligned
/// addresses one page at a time. Implementations report violations through
/// their own error type.
pub trait NorFlashOps {
    /// The error type the hardware primitives report.
    type Error: Error;

    /// Copy `dest.len()` bytes starting at `address` into `dest`.
    ///
    /// No alignment constraint. On memory-mapped parts this is a plain load
    /// and cannot fail.
    fn read(&self, address: u32, dest: &mut [u8]) -> Result<(), Self::Error>;

    /// Program one 4-byte word at `address`.
    ///
    /// Only cells currently in the erased state take the new value;
    /// programming over already-programmed cells yields undefined data.
    fn program_word(&mut self, address: u32, word: u32) -> Result<(), Self::Error>;

    /// Erase the page starting at the page-aligned `address`, returning
    /// every cell in it to the all-ones erased state.
    fn erase_page(&mut self, address: u32) -> Result<(), Self::Error>;
}

/// Port for an instruction cache sitting in front of the program memory.
///
/// Mutating memory the cache may hold leaves stale entries observable
/// afterwards; the adapter disables the cache around every mutation (see
/// [`CacheGuard`](crate::CacheGuard)) instead of attempting selective
/// invalidation.
pub trait InstructionCache {
    /// Enable the cache.
    fn enable(&mut self);

    /// Disable the cache, forcing fetches to go to memory.
    fn disable(&mut self);
}

/// No-op cache handle for parts with no instruction cache in front of the
/// program memory, or where the cache is managed elsewhere.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCache;

impl InstructionCache for NoCache {
    fn enable(&mut self) {}

    fn disable(&mut self) {}
}
