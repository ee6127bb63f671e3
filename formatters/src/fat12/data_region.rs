// Data region filler: erased flash, all ones

use super::Sector;
use crate::fat_common::constants::{ERASED_BYTE, SECTOR_SIZE};

pub const ERASED_SECTOR: Sector = [ERASED_BYTE; SECTOR_SIZE];

/// `count` erased sectors. Unallocated clusters must read back as erased, not
/// zeroed, for the flashing tool.
#[derive(Debug, Clone)]
pub struct DataRegion {
    remaining: u32,
}

impl DataRegion {
    pub fn new(count: u32) -> Self {
        Self { remaining: count }
    }
}

impl Iterator for DataRegion {
    type Item = Sector;

    fn next(&mut self) -> Option<Sector> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(ERASED_SECTOR)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining as usize, Some(self.remaining as usize))
    }
}

impl ExactSizeIterator for DataRegion {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_erased_sectors() {
        let region = DataRegion::new(3);
        assert_eq!(region.len(), 3);
        let sectors: Vec<Sector> = region.collect();
        assert_eq!(sectors.len(), 3);
        assert!(sectors.iter().all(|s| s.iter().all(|&b| b == 0xFF)));
    }

    #[test]
    fn test_empty_region() {
        assert_eq!(DataRegion::new(0).next(), None);
    }
}
