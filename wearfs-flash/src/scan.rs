//! Read-only scans over physical memory ranges.
//!
//! Used by the verified word programmer for its post-write check, and by
//! callers wanting to confirm an erase left a range blank. Nothing here
//! mutates memory.

use crate::error::FlashError;
use crate::fmt::warn;
use crate::hal::NorFlashOps;
use crate::{ERASED_WORD, WORD_SIZE};

/// Check whether every word in `[address, address + length)` equals
/// `expected`, scanning at 4-byte stride and stopping at the first
/// difference.
pub fn matches_word<F: NorFlashOps>(
    flash: &F,
    address: u32,
    length: u32,
    expected: u32,
) -> Result<bool, F::Error> {
    let mut word = [0u8; WORD_SIZE];
    let mut addr = address;
    let end = address + length;

    while addr < end {
        flash.read(addr, &mut word)?;
        if u32::from_le_bytes(word) != expected {
            return Ok(false);
        }
        addr += WORD_SIZE as u32;
    }

    Ok(true)
}

/// Check whether `[address, address + length)` is entirely in the erased
/// (all bits set) state.
pub fn matches_erased<F: NorFlashOps>(
    flash: &F,
    address: u32,
    length: u32,
) -> Result<bool, F::Error> {
    matches_word(flash, address, length, ERASED_WORD)
}

/// Compare memory at `address` against `expected` byte by byte.
///
/// # Errors
///
/// Returns [`FlashError::Verify`] for the first differing byte, identifying
/// its address and the expected/actual values.
pub fn verify_region<F: NorFlashOps>(
    flash: &F,
    address: u32,
    expected: &[u8],
) -> Result<(), FlashError<F::Error>> {
    let mut cell = [0u8; 1];

    for (i, &expected_byte) in expected.iter().enumerate() {
        let addr = address + i as u32;
        flash
            .read(addr, &mut cell)
            .map_err(|source| FlashError::Read {
                address: addr,
                source,
            })?;

        if cell[0] != expected_byte {
            warn!(
                "verify failed at {:#x} ({:#x} != {:#x})",
                addr, cell[0], expected_byte
            );
            return Err(FlashError::Verify {
                address: addr,
                expected: expected_byte,
                actual: cell[0],
            });
        }
    }

    Ok(())
}
