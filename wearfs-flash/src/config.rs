//! Mount-time flash configuration value object.

use crate::WORD_SIZE;

/// Immutable parameters the filesystem supplies when it mounts the adapter.
///
/// Ties the filesystem's logical block space to the physical page space of
/// the memory: logical block `b` lives in physical page `first_page + b`.
/// `first_page` plays the role the classic C port gives to an opaque
/// `context` pointer; its type is known once the pairing is fixed, so it is
/// an explicit field here.
///
/// # Examples
///
/// ```
/// use wearfs_flash::FlashConfig;
///
/// // 8KB blocks mapped one-to-one onto 8KB pages, starting at page 10.
/// let config = FlashConfig::new(8192, 4, 8192, 16, 10).unwrap();
/// assert_eq!(config.physical_address(0, 0), 10 * 8192);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FlashConfig {
    block_size: u32,
    prog_size: u32,
    page_size: u32,
    block_count: u32,
    first_page: u32,
}

impl FlashConfig {
    /// Create a validated configuration.
    ///
    /// # Arguments
    ///
    /// * `block_size` - logical block size in bytes
    /// * `prog_size` - bytes per atomic program operation
    /// * `page_size` - bytes per erasable physical page
    /// * `block_count` - number of logical blocks
    /// * `first_page` - physical page index of logical block 0
    ///
    /// # Errors
    ///
    /// Returns a [`FlashConfigError`] if the sizes are inconsistent with the
    /// memory's program/erase granularity.
    pub const fn new(
        block_size: u32,
        prog_size: u32,
        page_size: u32,
        block_count: u32,
        first_page: u32,
    ) -> Result<Self, FlashConfigError> {
        if prog_size == 0 || prog_size % WORD_SIZE as u32 != 0 {
            return Err(FlashConfigError::InvalidProgramUnit { prog_size });
        }

        if block_size == 0 || block_size % prog_size != 0 {
            return Err(FlashConfigError::InvalidBlockSize {
                block_size,
                prog_size,
            });
        }

        // One logical block maps onto one erasable page.
        if block_size > page_size {
            return Err(FlashConfigError::BlockExceedsPage {
                block_size,
                page_size,
            });
        }

        if block_count == 0 {
            return Err(FlashConfigError::ZeroBlockCount);
        }

        Ok(Self {
            block_size,
            prog_size,
            page_size,
            block_count,
            first_page,
        })
    }

    /// Logical block size in bytes.
    #[inline]
    pub const fn block_size(&self) -> u32 {
        self.block_size
    }

    /// Bytes per atomic program operation.
    #[inline]
    pub const fn prog_size(&self) -> u32 {
        self.prog_size
    }

    /// Bytes per erasable physical page.
    #[inline]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Number of logical blocks.
    #[inline]
    pub const fn block_count(&self) -> u32 {
        self.block_count
    }

    /// Physical page index of logical block 0.
    #[inline]
    pub const fn first_page(&self) -> u32 {
        self.first_page
    }

    /// Total logical capacity in bytes.
    #[inline]
    pub const fn total_size(&self) -> u32 {
        self.block_count * self.block_size
    }

    /// Physical byte address where `page` starts.
    #[inline]
    pub const fn page_base(&self, page: u32) -> u32 {
        page * self.page_size
    }

    /// Translate a (logical block, byte offset) pair to a physical address.
    ///
    /// Pure arithmetic; a `block` beyond [`block_count`](Self::block_count)
    /// is a caller contract violation the filesystem guarantees against by
    /// construction, not a runtime-checked error.
    #[inline]
    pub const fn physical_address(&self, block: u32, offset: u32) -> u32 {
        self.page_base(self.first_page + block) + offset
    }
}

/// Errors that can occur when creating a [`FlashConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlashConfigError {
    /// Program unit is zero or not a multiple of the hardware word.
    InvalidProgramUnit {
        /// The rejected program unit size.
        prog_size: u32,
    },
    /// Block size is zero or not a multiple of the program unit.
    InvalidBlockSize {
        /// The rejected block size.
        block_size: u32,
        /// The program unit it must be a multiple of.
        prog_size: u32,
    },
    /// Block size exceeds the erasable page it must fit in.
    BlockExceedsPage {
        /// The rejected block size.
        block_size: u32,
        /// The physical page size.
        page_size: u32,
    },
    /// Block count is zero.
    ZeroBlockCount,
}

impl core::fmt::Display for FlashConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidProgramUnit { prog_size } => write!(
                f,
                "program unit {} must be a nonzero multiple of the {}-byte word",
                prog_size, WORD_SIZE
            ),
            Self::InvalidBlockSize {
                block_size,
                prog_size,
            } => write!(
                f,
                "block size {} must be a nonzero multiple of program unit {}",
                block_size, prog_size
            ),
            Self::BlockExceedsPage {
                block_size,
                page_size,
            } => write!(
                f,
                "block size {} exceeds page size {}",
                block_size, page_size
            ),
            Self::ZeroBlockCount => write!(f, "block count cannot be zero"),
        }
    }
}

impl core::error::Error for FlashConfigError {}
