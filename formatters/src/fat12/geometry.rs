// FAT12 layout derived from the requested partition size

use crate::fat_common::constants::*;
use espfat_core::EspFatError;
use log::debug;
use static_assertions::const_assert;

// The 16-bit sector count field must hold the largest data region.
const_assert!(MAX_IMAGE_SIZE / (SECTOR_SIZE as u64) <= (u16::MAX as u64));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub total_sectors: u32,
    pub reserved_sectors: u32,
    pub sectors_per_fat: u8,
    pub data_sectors: u32,
}

impl Geometry {
    /// Resolve the image layout for a partition of `requested_bytes`.
    ///
    /// Any remainder below one sector is dropped. Images with more sectors
    /// than one FAT sector can address get a second FAT sector.
    pub fn resolve(requested_bytes: u64) -> Result<Self, EspFatError> {
        if !(MIN_IMAGE_SIZE..=MAX_IMAGE_SIZE).contains(&requested_bytes) {
            return Err(EspFatError::OutOfRange {
                size: requested_bytes,
                min: MIN_IMAGE_SIZE,
                max: MAX_IMAGE_SIZE,
            });
        }

        let total_sectors = (requested_bytes / SECTOR_SIZE as u64) as u32;
        let sectors_per_fat: u8 = if total_sectors > FAT12_ENTRIES_PER_SECTOR { 2 } else { 1 };
        let reserved_sectors = FIXED_RESERVED_SECTORS + sectors_per_fat as u32;
        let data_sectors = total_sectors - reserved_sectors;

        debug!(
            "Resolved geometry for {} bytes: {} sectors, {} reserved, {} per FAT, {} data",
            requested_bytes, total_sectors, reserved_sectors, sectors_per_fat, data_sectors
        );

        Ok(Self {
            total_sectors,
            reserved_sectors,
            sectors_per_fat,
            data_sectors,
        })
    }

    /// Sectors emitted after the boot sector and before the data region.
    pub fn fat_region_sectors(&self) -> u32 {
        self.reserved_sectors - 1
    }

    pub fn image_len(&self) -> u64 {
        self.total_sectors as u64 * SECTOR_SIZE as u64
    }
}
