//! Storage contract between a wear-leveling filesystem and its backing device.
//!
//! A wear-leveling filesystem keeps its own allocation, erase-count and
//! bad-block bookkeeping; all it needs from the device underneath is four
//! operations with well-defined granularity:
//!
//! - [`read`](BlockStorage::read) — arbitrary-offset byte reads within a block
//! - [`program`](BlockStorage::program) — program-unit-granular writes into
//!   previously erased cells
//! - [`erase`](BlockStorage::erase) — return a whole block to the erased state
//! - [`sync`](BlockStorage::sync) — flush any buffered writes
//!
//! Adapter crates implement this trait on top of a concrete memory technology
//! (raw NOR program memory, SD cards, a file-backed image, ...). The
//! filesystem serializes calls into the device itself, so the trait is
//! synchronous and takes `&mut self` throughout.

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]

use core::error::Error;

/// Block-granular storage as seen by a wear-leveling filesystem.
///
/// Blocks are numbered from zero in a device-specific logical space; how a
/// logical block maps onto physical storage (offsets, remapping, spare areas)
/// is entirely the implementation's business.
///
/// # Contract
///
/// - `read` has no alignment constraint on `offset` or `dest.len()`.
/// - `program` may only touch cells that were erased since the last program;
///   programming over non-erased cells yields undefined data. Enforcing that
///   ordering is the filesystem's allocation policy, not the device's.
/// - `erase` affects exactly one block.
/// - Failures are returned as-is; no retry happens at this layer. Only the
///   filesystem knows whether a retried write can be made safe (for example
///   after a fresh erase), so recovery belongs above this trait.
pub trait BlockStorage {
    /// The error type for storage operations.
    type Error: Error;

    /// Read `dest.len()` bytes starting at `offset` within `block`.
    fn read(&mut self, block: u32, offset: u32, dest: &mut [u8]) -> Result<(), Self::Error>;

    /// Program `src` starting at `offset` within `block`.
    ///
    /// `offset` and `src.len()` must be multiples of the device's program
    /// unit; implementations reject anything else rather than truncating.
    fn program(&mut self, block: u32, offset: u32, src: &[u8]) -> Result<(), Self::Error>;

    /// Erase `block`, returning every cell in it to the erased state.
    fn erase(&mut self, block: u32) -> Result<(), Self::Error>;

    /// Flush any buffered writes to the underlying storage.
    ///
    /// The default implementation is a no-op for devices whose programs and
    /// erases complete before returning.
    fn sync(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::fmt;

    // Byte-array device with 16-byte blocks, enough to exercise the contract.
    struct MemDevice {
        blocks: [[u8; 16]; 4],
    }

    #[derive(Debug)]
    struct MemError;

    impl fmt::Display for MemError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "memory device error")
        }
    }

    impl Error for MemError {}

    impl BlockStorage for MemDevice {
        type Error = MemError;

        fn read(&mut self, block: u32, offset: u32, dest: &mut [u8]) -> Result<(), Self::Error> {
            let start = offset as usize;
            dest.copy_from_slice(&self.blocks[block as usize][start..start + dest.len()]);
            Ok(())
        }

        fn program(&mut self, block: u32, offset: u32, src: &[u8]) -> Result<(), Self::Error> {
            let start = offset as usize;
            self.blocks[block as usize][start..start + src.len()].copy_from_slice(src);
            Ok(())
        }

        fn erase(&mut self, block: u32) -> Result<(), Self::Error> {
            self.blocks[block as usize] = [0xFF; 16];
            Ok(())
        }
    }

    #[test]
    fn test_program_read_round_trip() {
        let mut dev = MemDevice {
            blocks: [[0xFF; 16]; 4],
        };

        dev.program(1, 4, &[1, 2, 3, 4]).unwrap();

        let mut buf = [0u8; 4];
        dev.read(1, 4, &mut buf).unwrap();
        assert_eq!(buf, [1, 2, 3, 4]);
    }

    #[test]
    fn test_erase_restores_blank_state() {
        let mut dev = MemDevice {
            blocks: [[0u8; 16]; 4],
        };

        dev.erase(2).unwrap();

        let mut buf = [0u8; 16];
        dev.read(2, 0, &mut buf).unwrap();
        assert_eq!(buf, [0xFF; 16]);
    }

    #[test]
    fn test_default_sync_is_noop() {
        let mut dev = MemDevice {
            blocks: [[0xFF; 16]; 4],
        };
        assert!(dev.sync().is_ok());
    }
}
