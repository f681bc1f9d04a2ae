//! Word-granular verified flash programming.

use crate::error::FlashError;
use crate::fmt::{trace, warn};
use crate::hal::{InstructionCache, NorFlashOps};
use crate::icache::CacheGuard;
use crate::{WORD_SIZE, scan};

/// Program `data` starting at `address`, one 4-byte word at a time in
/// increasing address order.
///
/// The whole loop runs under a [`CacheGuard`], so the instruction cache is
/// disabled for the duration and re-enabled on every exit path. The first
/// word the hardware rejects stops the loop; the remaining words are left
/// unprogrammed and the failure is returned as [`FlashError::Program`] with
/// the failing address.
///
/// With `verify` set, each word is read back immediately after programming
/// and compared against the source. A mismatch stops the loop with
/// [`FlashError::Verify`] — distinct from a hardware rejection — before any
/// further word is programmed. Verifying per word rather than once at the
/// end localizes the failing address and avoids programming past suspected
/// corruption.
///
/// # Errors
///
/// [`FlashError::Unaligned`] if `data.len()` is not a multiple of the word
/// size; the request is rejected, never truncated.
pub fn program_words<F, C>(
    flash: &mut F,
    cache: &mut C,
    address: u32,
    data: &[u8],
    verify: bool,
) -> Result<(), FlashError<F::Error>>
where
    F: NorFlashOps,
    C: InstructionCache,
{
    if data.len() % WORD_SIZE != 0 {
        return Err(FlashError::Unaligned {
            address,
            length: data.len() as u32,
            unit: WORD_SIZE as u32,
        });
    }

    let _guard = CacheGuard::new(cache);

    let mut addr = address;
    for chunk in data.chunks_exact(WORD_SIZE) {
        let bytes = [chunk[0], chunk[1], chunk[2], chunk[3]];
        let word = u32::from_le_bytes(bytes);

        if let Err(source) = flash.program_word(addr, word) {
            warn!("word program failed at {:#x}", addr);
            return Err(FlashError::Program {
                address: addr,
                source,
            });
        }
        trace!("programmed word {:#x} at {:#x}", word, addr);

        if verify {
            scan::verify_region(&*flash, addr, &bytes)?;
        }

        addr += WORD_SIZE as u32;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::NoCache;
    use crate::ram::{RamFlash, RamFlashError};
    use crate::scan::matches_erased;

    #[test]
    fn test_programs_words_in_order() {
        let mut flash: RamFlash<1, 256> = RamFlash::new();
        let data = [0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88];

        program_words(&mut flash, &mut NoCache, 16, &data, false).unwrap();

        let mut readback = [0u8; 8];
        flash.read(16, &mut readback).unwrap();
        assert_eq!(readback, data);
    }

    #[test]
    fn test_rejects_unaligned_length() {
        let mut flash: RamFlash<1, 256> = RamFlash::new();

        let err = program_words(&mut flash, &mut NoCache, 0, &[1, 2, 3], false).unwrap_err();
        assert_eq!(
            err,
            FlashError::Unaligned {
                address: 0,
                length: 3,
                unit: 4,
            }
        );
        // Nothing was programmed.
        assert!(matches_erased(&flash, 0, 256).unwrap());
    }

    #[test]
    fn test_hardware_failure_stops_at_failing_word() {
        let mut flash: RamFlash<1, 256> = RamFlash::new();
        flash.inject_program_fault(8);

        let data = [0xAA; 16];
        let err = program_words(&mut flash, &mut NoCache, 0, &data, false).unwrap_err();
        assert_eq!(
            err,
            FlashError::Program {
                address: 8,
                source: RamFlashError::ProgramFault { address: 8 },
            }
        );

        // Words before the fault are programmed, the rest stayed erased.
        let mut readback = [0u8; 8];
        flash.read(0, &mut readback).unwrap();
        assert_eq!(readback, [0xAA; 8]);
        assert!(matches_erased(&flash, 8, 248).unwrap());
    }

    #[test]
    fn test_verify_catches_corrupted_word() {
        let mut flash: RamFlash<1, 256> = RamFlash::new();
        flash.inject_program_corruption(4);

        // 0x01 loses its low bit under the injected corruption.
        let data = [0x01, 0x02, 0x03, 0x04, 0x01, 0x02, 0x03, 0x04, 0x01, 0x02, 0x03, 0x04];
        let err = program_words(&mut flash, &mut NoCache, 0, &data, true).unwrap_err();
        assert_eq!(
            err,
            FlashError::Verify {
                address: 4,
                expected: 0x01,
                actual: 0x00,
            }
        );

        // The loop halted before the third word.
        assert!(matches_erased(&flash, 8, 248).unwrap());
    }

    #[test]
    fn test_without_verify_corruption_goes_unnoticed() {
        // Default-path integrity is the filesystem's responsibility; with
        // verification off the corrupted word is reported as a success.
        let mut flash: RamFlash<1, 256> = RamFlash::new();
        flash.inject_program_corruption(4);

        let data = [0x01; 8];
        program_words(&mut flash, &mut NoCache, 0, &data, false).unwrap();

        let mut readback = [0u8; 8];
        flash.read(0, &mut readback).unwrap();
        assert_eq!(readback[4], 0x00);
    }

    #[test]
    fn test_empty_program_is_ok() {
        let mut flash: RamFlash<1, 256> = RamFlash::new();
        program_words(&mut flash, &mut NoCache, 0, &[], true).unwrap();
        assert!(matches_erased(&flash, 0, 256).unwrap());
    }
}
