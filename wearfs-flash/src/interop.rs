//! Adapter for `embedded-storage` NOR flash drivers.
//!
//! Lets any driver implementing the `embedded-storage` NOR traits (ESP32
//! internal flash, external SPI flash, ...) back the
//! [`FlashBlockDevice`](crate::FlashBlockDevice), by exposing it through the
//! crate's own [`NorFlashOps`] port.

use core::cell::UnsafeCell;
use core::fmt;

use embedded_storage::nor_flash::{NorFlash, NorFlashError as _, NorFlashErrorKind, ReadNorFlash};

use crate::hal::NorFlashOps;

/// Error from an `embedded-storage` backend, reduced to its portable kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbeddedStorageError(
    /// The portable error kind reported by the driver.
    pub NorFlashErrorKind,
);

impl fmt::Display for EmbeddedStorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NOR flash error: {:?}", self.0)
    }
}

impl core::error::Error for EmbeddedStorageError {}

/// Wrapper exposing an `embedded-storage` NOR driver as [`NorFlashOps`].
///
/// Page size comes from the driver's `ERASE_SIZE`; the mount configuration's
/// erase unit must match it.
///
/// # Safety
///
/// Uses `UnsafeCell` for interior mutability because the `embedded-storage`
/// traits take `&mut self` for reads while [`NorFlashOps::read`] takes
/// `&self`. This is safe in the single-threaded contexts the adapter is
/// specified for; multi-threaded use must synchronize externally.
pub struct EmbeddedStorageFlash<F> {
    flash: UnsafeCell<F>,
}

// SAFETY: the UnsafeCell is only used for interior mutability in
// single-threaded contexts.
unsafe impl<F: Send> Send for EmbeddedStorageFlash<F> {}

impl<F> EmbeddedStorageFlash<F> {
    /// Wrap an `embedded-storage` NOR driver.
    pub fn new(flash: F) -> Self {
        Self {
            flash: UnsafeCell::new(flash),
        }
    }

    /// Consume the wrapper and return the underlying driver.
    pub fn into_inner(self) -> F {
        self.flash.into_inner()
    }

    #[inline]
    fn flash_mut(&self) -> &mut F {
        // SAFETY: single-threaded access per the adapter's concurrency model.
        unsafe { &mut *self.flash.get() }
    }
}

impl<F> NorFlashOps for EmbeddedStorageFlash<F>
where
    F: NorFlash + ReadNorFlash,
{
    type Error = EmbeddedStorageError;

    fn read(&self, address: u32, dest: &mut [u8]) -> Result<(), Self::Error> {
        self.flash_mut()
            .read(address, dest)
            .map_err(|e| EmbeddedStorageError(e.kind()))
    }

    fn program_word(&mut self, address: u32, word: u32) -> Result<(), Self::Error> {
        self.flash_mut()
            .write(address, &word.to_le_bytes())
            .map_err(|e| EmbeddedStorageError(e.kind()))
    }

    fn erase_page(&mut self, address: u32) -> Result<(), Self::Error> {
        self.flash_mut()
            .erase(address, address + F::ERASE_SIZE as u32)
            .map_err(|e| EmbeddedStorageError(e.kind()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: usize = 256;

    struct MockNor {
        data: [[u8; PAGE]; 4],
    }

    #[derive(Debug)]
    struct MockNorError;

    impl embedded_storage::nor_flash::NorFlashError for MockNorError {
        fn kind(&self) -> NorFlashErrorKind {
            NorFlashErrorKind::OutOfBounds
        }
    }

    impl embedded_storage::nor_flash::ErrorType for MockNor {
        type Error = MockNorError;
    }

    impl ReadNorFlash for MockNor {
        const READ_SIZE: usize = 1;

        fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
            let start = offset as usize;
            if start + bytes.len() > self.capacity() {
                return Err(MockNorError);
            }
            for (i, byte) in bytes.iter_mut().enumerate() {
                let at = start + i;
                *byte = self.data[at / PAGE][at % PAGE];
            }
            Ok(())
        }

        fn capacity(&self) -> usize {
            self.data.len() * PAGE
        }
    }

    impl NorFlash for MockNor {
        const WRITE_SIZE: usize = 4;
        const ERASE_SIZE: usize = PAGE;

        fn erase(&mut self, from: u32, to: u32) -> Result<(), Self::Error> {
            if from as usize % PAGE != 0 || to as usize > self.capacity() {
                return Err(MockNorError);
            }
            for page in (from as usize / PAGE)..(to as usize).div_ceil(PAGE) {
                self.data[page] = [0xFF; PAGE];
            }
            Ok(())
        }

        fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
            let start = offset as usize;
            if start + bytes.len() > self.capacity() {
                return Err(MockNorError);
            }
            for (i, byte) in bytes.iter().enumerate() {
                let at = start + i;
                self.data[at / PAGE][at % PAGE] &= byte;
            }
            Ok(())
        }
    }

    #[test]
    fn test_wraps_program_and_read() {
        let mut flash = EmbeddedStorageFlash::new(MockNor {
            data: [[0xFF; PAGE]; 4],
        });

        flash.program_word(8, 0x1122_3344).unwrap();

        let mut word = [0u8; 4];
        flash.read(8, &mut word).unwrap();
        assert_eq!(u32::from_le_bytes(word), 0x1122_3344);
    }

    #[test]
    fn test_erase_spans_one_driver_page() {
        let mut flash = EmbeddedStorageFlash::new(MockNor {
            data: [[0x00; PAGE]; 4],
        });

        flash.erase_page(PAGE as u32).unwrap();

        let mut buf = [0u8; PAGE];
        flash.read(PAGE as u32, &mut buf).unwrap();
        assert_eq!(buf, [0xFF; PAGE]);

        flash.read(0, &mut buf).unwrap();
        assert_eq!(buf, [0x00; PAGE]);
    }

    #[test]
    fn test_maps_error_kind() {
        let mut flash = EmbeddedStorageFlash::new(MockNor {
            data: [[0xFF; PAGE]; 4],
        });

        let err = flash.program_word(4 * PAGE as u32, 0).unwrap_err();
        assert_eq!(err, EmbeddedStorageError(NorFlashErrorKind::OutOfBounds));
    }
}
