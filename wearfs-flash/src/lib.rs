//! NOR flash block-device adapter for wear-leveling filesystems.
//!
//! A log-structured, wear-leveling filesystem issues abstract block
//! operations — read, program, erase, sync — against logical block numbers.
//! Raw NOR program memory speaks a different language: word-aligned
//! programs, page-aligned erases, cells that only clear bits until the next
//! erase, and an instruction cache that goes stale when the memory under it
//! mutates. This crate is the place where the two are reconciled.
//!
//! # Architecture
//!
//! Leaf-first:
//!
//! - [`FlashConfig`] — mount-time parameters and logical-to-physical address
//!   translation.
//! - [`program_words`] — the verified word programmer: 4-byte stride,
//!   fail-fast, optional per-word readback.
//! - [`scan`] — read-only range checks (erased-state and buffer compare).
//! - [`CacheGuard`] — RAII instruction-cache disable around every mutation.
//! - [`FlashBlockDevice`] — the composition root implementing the
//!   filesystem's [`BlockStorage`] contract from the pieces above.
//!
//! The hardware itself sits behind the [`NorFlashOps`] and
//! [`InstructionCache`] ports, so the whole stack runs unchanged against the
//! [`RamFlash`] simulation on a host.
//!
//! # Quick Start
//!
//! ```
//! use wearfs_flash::{BlockStorage, FlashBlockDevice, FlashConfig, NoCache, RamFlash};
//!
//! // 8KB blocks on 8KB pages; the filesystem region starts at page 10.
//! let config = FlashConfig::new(8192, 4, 8192, 4, 10).unwrap();
//! let flash: RamFlash<16, 8192> = RamFlash::new();
//! let mut device = FlashBlockDevice::new(flash, NoCache, config);
//!
//! device.erase(0).unwrap();
//! device.program(0, 0, &[0xAA, 0xBB, 0xCC, 0xDD]).unwrap();
//!
//! let mut buf = [0u8; 4];
//! device.read(0, 0, &mut buf).unwrap();
//! assert_eq!(buf, [0xAA, 0xBB, 0xCC, 0xDD]);
//! ```
//!
//! # Failure semantics
//!
//! Failures stop the current operation at the failing address and propagate
//! to the filesystem unmodified; already-programmed words stay programmed and
//! no retry happens here. Hardware rejections and post-write verification
//! mismatches are distinct [`FlashError`] variants so the caller can tell
//! them apart.
//!
//! # Features
//!
//! - `embedded-storage`: adapt any `embedded-storage` NOR driver into the
//!   [`NorFlashOps`] port
//! - `log`: diagnostic output through the `log` facade
//! - `defmt`: diagnostic output and `Format` derives for `defmt`

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]

mod fmt;

pub mod config;
pub mod device;
pub mod error;
pub mod hal;
pub mod icache;
pub mod program;
pub mod ram;
pub mod scan;

#[cfg(feature = "embedded-storage")]
pub mod interop;

/// Smallest granule the memory can program atomically, in bytes.
pub const WORD_SIZE: usize = 4;

/// A fully erased word: NOR cells erase to all bits set.
pub const ERASED_WORD: u32 = 0xFFFF_FFFF;

/// A fully erased byte.
pub const ERASED_BYTE: u8 = 0xFF;

pub use config::{FlashConfig, FlashConfigError};
pub use device::FlashBlockDevice;
pub use error::FlashError;
pub use hal::{InstructionCache, NoCache, NorFlashOps};
pub use icache::CacheGuard;
pub use program::program_words;
pub use ram::{RamFlash, RamFlashError};
pub use scan::{matches_erased, matches_word, verify_region};

#[cfg(feature = "embedded-storage")]
pub use interop::{EmbeddedStorageError, EmbeddedStorageFlash};

// Re-export the storage contract so downstream users can depend on this
// crate alone.
pub use wearfs_storage::BlockStorage;
