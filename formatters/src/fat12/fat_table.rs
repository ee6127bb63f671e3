// FAT and root directory region emitter

use super::geometry::Geometry;
use super::Sector;
use crate::fat_common::constants::{FAT12_RESERVED_ENTRIES, SECTOR_SIZE};

/// First FAT sector: reserved entries for clusters 0 and 1, everything else free.
pub fn fat_head_sector() -> Sector {
    let mut sector = [0u8; SECTOR_SIZE];
    sector[..FAT12_RESERVED_ENTRIES.len()].copy_from_slice(&FAT12_RESERVED_ENTRIES);
    sector
}

/// Sectors between the boot sector and the data region.
///
/// Yields the FAT head followed by zeroed sectors covering the rest of the
/// FAT, the empty root directory and the spare sector. Cloning restarts it.
#[derive(Debug, Clone)]
pub struct FatRegion {
    next: u32,
    len: u32,
}

impl FatRegion {
    pub fn new(geometry: &Geometry) -> Self {
        Self {
            next: 0,
            len: geometry.fat_region_sectors(),
        }
    }
}

impl Iterator for FatRegion {
    type Item = Sector;

    fn next(&mut self) -> Option<Sector> {
        if self.next >= self.len {
            return None;
        }
        let sector = if self.next == 0 {
            fat_head_sector()
        } else {
            [0u8; SECTOR_SIZE]
        };
        self.next += 1;
        Some(sector)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.len - self.next) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for FatRegion {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fat_common::constants::MIB;

    #[test]
    fn test_fat_head() {
        let head = fat_head_sector();
        assert_eq!(&head[..3], &[0xF8, 0xFF, 0xFF]);
        assert!(head[3..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_region_length_follows_fat_size() {
        let small = Geometry::resolve(MIB).unwrap();
        assert_eq!(FatRegion::new(&small).len(), 6);
        assert_eq!(FatRegion::new(&small).count(), 6);

        let large = Geometry::resolve(15 * MIB).unwrap();
        assert_eq!(FatRegion::new(&large).count(), 7);
    }

    #[test]
    fn test_only_first_sector_has_markers() {
        let geometry = Geometry::resolve(15 * MIB).unwrap();
        let sectors: Vec<Sector> = FatRegion::new(&geometry).collect();
        assert_eq!(sectors[0], fat_head_sector());
        for sector in &sectors[1..] {
            assert!(sector.iter().all(|&b| b == 0));
        }
    }

    #[test]
    fn test_clone_restarts() {
        let geometry = Geometry::resolve(MIB).unwrap();
        let region = FatRegion::new(&geometry);
        let mut consumed = region.clone();
        consumed.next();
        assert_eq!(consumed.len(), 5);
        assert_eq!(region.len(), 6);
        assert_eq!(region.clone().next(), Some(fat_head_sector()));
    }
}
