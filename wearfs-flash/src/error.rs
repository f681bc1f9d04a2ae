//! Error taxonomy for flash operations.

use core::fmt;

/// Errors surfaced to the filesystem by the flash adapter.
///
/// `E` is the hardware port's own error type. Hardware rejections
/// ([`Program`](FlashError::Program), [`Erase`](FlashError::Erase)) are kept
/// distinct from [`Verify`](FlashError::Verify), which means the hardware
/// accepted the operation but the cells read back wrong — callers can tell
/// "the controller refused" apart from "the result is corrupt".
///
/// The adapter performs no local recovery: the first failure stops the
/// current operation and is returned unmodified. Words programmed before the
/// failing one stay programmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum FlashError<E> {
    /// The backend failed to read.
    ///
    /// Never produced by memory-mapped backends, where reads are plain loads.
    Read {
        /// Physical byte address of the failed read.
        address: u32,
        /// Backend error.
        source: E,
    },

    /// The hardware word-program primitive reported a failure.
    Program {
        /// Physical byte address of the failing word.
        address: u32,
        /// Backend error.
        source: E,
    },

    /// The hardware page-erase primitive reported a failure.
    Erase {
        /// Page-aligned physical byte address of the failing erase.
        address: u32,
        /// Backend error.
        source: E,
    },

    /// Post-program readback found a cell that differs from the source data.
    Verify {
        /// Physical byte address of the first differing cell.
        address: u32,
        /// The byte that was requested.
        expected: u8,
        /// The byte the cell actually holds.
        actual: u8,
    },

    /// Program offset or length violates the program-unit granularity.
    ///
    /// Returned instead of silently truncating or rounding the request.
    Unaligned {
        /// Physical byte address of the rejected operation.
        address: u32,
        /// Length of the rejected operation in bytes.
        length: u32,
        /// The program unit the request must be a multiple of.
        unit: u32,
    },
}

impl<E: fmt::Display> fmt::Display for FlashError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { address, source } => {
                write!(f, "read failed at {:#010x}: {}", address, source)
            }
            Self::Program { address, source } => {
                write!(f, "word program failed at {:#010x}: {}", address, source)
            }
            Self::Erase { address, source } => {
                write!(f, "page erase failed at {:#010x}: {}", address, source)
            }
            Self::Verify {
                address,
                expected,
                actual,
            } => write!(
                f,
                "verify failed at {:#010x} ({:#04x} != {:#04x})",
                address, actual, expected
            ),
            Self::Unaligned {
                address,
                length,
                unit,
            } => write!(
                f,
                "unaligned program of {} bytes at {:#010x} (unit is {} bytes)",
                length, address, unit
            ),
        }
    }
}

impl<E: fmt::Debug + fmt::Display> core::error::Error for FlashError<E> {}
