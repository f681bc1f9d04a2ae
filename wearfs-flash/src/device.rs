//! The block-device adapter the filesystem mounts on.

use crate::config::FlashConfig;
use crate::error::FlashError;
use crate::fmt::debug;
use crate::hal::{InstructionCache, NorFlashOps};
use crate::icache::CacheGuard;
use crate::program;
use wearfs_storage::BlockStorage;

/// Block device over raw NOR program memory.
///
/// Composition root of the crate: owns the flash and cache handles and the
/// mount-time [`FlashConfig`], and implements the filesystem's
/// [`BlockStorage`] contract by translating logical block operations into
/// word-granular programs and page-granular erases.
///
/// Write verification is off by default, matching the throughput-oriented
/// filesystem write path; [`with_verification`](Self::with_verification)
/// turns on per-word readback for diagnostic call sites. Either way the
/// capability stays available — which one is "correct" for production is the
/// mounting filesystem's call.
///
/// # Examples
///
/// ```
/// use wearfs_flash::{FlashBlockDevice, FlashConfig, NoCache, RamFlash};
/// use wearfs_flash::BlockStorage;
///
/// let flash: RamFlash<16, 256> = RamFlash::new();
/// let config = FlashConfig::new(256, 4, 256, 8, 2).unwrap();
/// let mut device = FlashBlockDevice::new(flash, NoCache, config);
///
/// device.erase(0).unwrap();
/// device.program(0, 0, &[0xDD, 0xCC, 0xBB, 0xAA]).unwrap();
///
/// let mut buf = [0u8; 4];
/// device.read(0, 0, &mut buf).unwrap();
/// assert_eq!(buf, [0xDD, 0xCC, 0xBB, 0xAA]);
/// ```
pub struct FlashBlockDevice<F, C> {
    flash: F,
    cache: C,
    config: FlashConfig,
    verify_writes: bool,
}

impl<F, C> FlashBlockDevice<F, C> {
    /// Create a new adapter over the given hardware handles.
    ///
    /// Write verification starts disabled.
    pub fn new(flash: F, cache: C, config: FlashConfig) -> Self {
        Self {
            flash,
            cache,
            config,
            verify_writes: false,
        }
    }

    /// Set whether every programmed word is read back and compared.
    pub fn with_verification(mut self, verify: bool) -> Self {
        self.verify_writes = verify;
        self
    }

    /// Get the mount configuration.
    pub fn config(&self) -> &FlashConfig {
        &self.config
    }

    /// Get a reference to the underlying flash handle.
    pub fn flash(&self) -> &F {
        &self.flash
    }

    /// Consume the adapter and return the hardware handles.
    pub fn into_inner(self) -> (F, C) {
        (self.flash, self.cache)
    }
}

impl<F, C> BlockStorage for FlashBlockDevice<F, C>
where
    F: NorFlashOps,
    C: InstructionCache,
{
    type Error = FlashError<F::Error>;

    fn read(&mut self, block: u32, offset: u32, dest: &mut [u8]) -> Result<(), Self::Error> {
        let address = self.config.physical_address(block, offset);
        self.flash
            .read(address, dest)
            .map_err(|source| FlashError::Read { address, source })
    }

    fn program(&mut self, block: u32, offset: u32, src: &[u8]) -> Result<(), Self::Error> {
        let address = self.config.physical_address(block, offset);
        let unit = self.config.prog_size();

        if offset % unit != 0 || src.len() as u32 % unit != 0 {
            return Err(FlashError::Unaligned {
                address,
                length: src.len() as u32,
                unit,
            });
        }

        program::program_words(
            &mut self.flash,
            &mut self.cache,
            address,
            src,
            self.verify_writes,
        )
    }

    fn erase(&mut self, block: u32) -> Result<(), Self::Error> {
        let address = self.config.physical_address(block, 0);
        debug!("erasing page at {:#x}", address);

        let _guard = CacheGuard::new(&mut self.cache);
        self.flash
            .erase_page(address)
            .map_err(|source| FlashError::Erase { address, source })
    }

    fn sync(&mut self) -> Result<(), Self::Error> {
        // Programs and erases complete before their primitives return;
        // there is nothing buffered to flush.
        Ok(())
    }
}
