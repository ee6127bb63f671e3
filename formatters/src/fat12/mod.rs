// FAT12 image builder for ESP flash partitions

pub mod boot_sector;
pub mod data_region;
pub mod fat_table;
pub mod formatter;
pub mod geometry;

use crate::fat_common::constants::SECTOR_SIZE;

/// One 4 KiB image sector.
pub type Sector = [u8; SECTOR_SIZE];

pub use boot_sector::BootSector;
pub use data_region::DataRegion;
pub use fat_table::FatRegion;
pub use formatter::{Fat12Image, Fat12ImageFormatter};
pub use geometry::Geometry;
