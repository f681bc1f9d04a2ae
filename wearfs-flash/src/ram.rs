//! In-RAM NOR flash model for host-side testing.

use crate::hal::NorFlashOps;
use crate::{ERASED_BYTE, WORD_SIZE};
use core::fmt;

/// A simulated NOR program memory of `PAGES` pages of `PAGE_SIZE` bytes.
///
/// Models the cell behavior the adapter is written against: cells erase to
/// all ones, programming can only clear bits (the stored value is the
/// bitwise AND of the old and new data), programs land word-aligned one word
/// at a time, erases land page-aligned one page at a time.
///
/// Fault injection hooks make the failure paths testable: a program fault
/// makes the hardware primitive reject one address, while program corruption
/// makes it "succeed" with a word that lost its low bit — the case only
/// post-write verification can catch.
///
/// # Examples
///
/// ```
/// use wearfs_flash::{NorFlashOps, RamFlash};
///
/// let mut flash: RamFlash<4, 256> = RamFlash::new();
/// flash.program_word(0, 0xAABB_CCDD).unwrap();
///
/// let mut word = [0u8; 4];
/// flash.read(0, &mut word).unwrap();
/// assert_eq!(u32::from_le_bytes(word), 0xAABB_CCDD);
/// ```
pub struct RamFlash<const PAGES: usize, const PAGE_SIZE: usize> {
    pages: [[u8; PAGE_SIZE]; PAGES],
    fail_program_at: Option<u32>,
    corrupt_program_at: Option<u32>,
}

impl<const PAGES: usize, const PAGE_SIZE: usize> RamFlash<PAGES, PAGE_SIZE> {
    /// Create a fully erased memory.
    pub const fn new() -> Self {
        Self {
            pages: [[ERASED_BYTE; PAGE_SIZE]; PAGES],
            fail_program_at: None,
            corrupt_program_at: None,
        }
    }

    /// Total capacity in bytes.
    pub const fn capacity() -> usize {
        PAGES * PAGE_SIZE
    }

    /// Make the next program of `address` fail with a hardware error.
    pub fn inject_program_fault(&mut self, address: u32) {
        self.fail_program_at = Some(address);
    }

    /// Make programs of `address` report success but store the word with its
    /// low bit cleared.
    pub fn inject_program_corruption(&mut self, address: u32) {
        self.corrupt_program_at = Some(address);
    }

    fn check_range(&self, address: u32, len: usize) -> Result<(), RamFlashError> {
        if address as usize + len > Self::capacity() {
            return Err(RamFlashError::OutOfBounds { address });
        }
        Ok(())
    }

    fn byte(&self, index: usize) -> u8 {
        self.pages[index / PAGE_SIZE][index % PAGE_SIZE]
    }

    fn byte_mut(&mut self, index: usize) -> &mut u8 {
        &mut self.pages[index / PAGE_SIZE][index % PAGE_SIZE]
    }
}

impl<const PAGES: usize, const PAGE_SIZE: usize> Default for RamFlash<PAGES, PAGE_SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors reported by the simulated flash primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RamFlashError {
    /// The operation runs past the end of the memory.
    OutOfBounds {
        /// Physical byte address of the rejected operation.
        address: u32,
    },
    /// A program or erase address violates the required alignment.
    Unaligned {
        /// Physical byte address of the rejected operation.
        address: u32,
    },
    /// An injected hardware program fault.
    ProgramFault {
        /// Physical byte address of the rejected program.
        address: u32,
    },
}

impl fmt::Display for RamFlashError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds { address } => {
                write!(f, "address {:#010x} is out of bounds", address)
            }
            Self::Unaligned { address } => {
                write!(f, "address {:#010x} violates alignment", address)
            }
            Self::ProgramFault { address } => {
                write!(f, "program fault at {:#010x}", address)
            }
        }
    }
}

impl core::error::Error for RamFlashError {}

impl<const PAGES: usize, const PAGE_SIZE: usize> NorFlashOps for RamFlash<PAGES, PAGE_SIZE> {
    type Error = RamFlashError;

    fn read(&self, address: u32, dest: &mut [u8]) -> Result<(), Self::Error> {
        self.check_range(address, dest.len())?;
        for (i, byte) in dest.iter_mut().enumerate() {
            *byte = self.byte(address as usize + i);
        }
        Ok(())
    }

    fn program_word(&mut self, address: u32, word: u32) -> Result<(), Self::Error> {
        if address as usize % WORD_SIZE != 0 {
            return Err(RamFlashError::Unaligned { address });
        }
        self.check_range(address, WORD_SIZE)?;

        if self.fail_program_at == Some(address) {
            return Err(RamFlashError::ProgramFault { address });
        }

        let mut stored = word;
        if self.corrupt_program_at == Some(address) {
            stored &= !1;
        }

        // NOR cells only clear: the stored value is old AND new.
        for (i, byte) in stored.to_le_bytes().iter().enumerate() {
            *self.byte_mut(address as usize + i) &= byte;
        }
        Ok(())
    }

    fn erase_page(&mut self, address: u32) -> Result<(), Self::Error> {
        if address as usize % PAGE_SIZE != 0 {
            return Err(RamFlashError::Unaligned { address });
        }

        let page = address as usize / PAGE_SIZE;
        if page >= PAGES {
            return Err(RamFlashError::OutOfBounds { address });
        }

        self.pages[page] = [ERASED_BYTE; PAGE_SIZE];
        Ok(())
    }
}
