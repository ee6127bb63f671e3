// Boot sector builder for ESP flash FAT12 images
//
// The BPB comes from a fixed template that flashing and mounting tools already
// accept. Only the FAT size, sector count, serial and signature are patched.

use super::geometry::Geometry;
use crate::fat_common::constants::*;
use byteorder::{ByteOrder, LittleEndian};
use static_assertions::const_assert_eq;

/// A fixed-position field of the boot sector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub offset: usize,
    pub width: usize,
}

impl Field {
    const fn new(offset: usize, width: usize) -> Self {
        Self { offset, width }
    }

    fn range(&self) -> std::ops::Range<usize> {
        self.offset..self.offset + self.width
    }
}

pub const JUMP: Field = Field::new(BS_JMP_BOOT, 3);
pub const OEM_NAME: Field = Field::new(BS_OEM_NAME, 8);
pub const BYTES_PER_SECTOR: Field = Field::new(BPB_BYTES_PER_SEC, 2);
pub const SECTORS_PER_CLUSTER: Field = Field::new(BPB_SEC_PER_CLUS, 1);
pub const RESERVED_SECTORS: Field = Field::new(BPB_RSVD_SEC_CNT, 2);
pub const NUM_FATS: Field = Field::new(BPB_NUM_FATS, 1);
pub const ROOT_ENTRIES: Field = Field::new(BPB_ROOT_ENT_CNT, 2);
pub const TOTAL_SECTORS_16: Field = Field::new(BPB_TOT_SEC16, 2);
pub const MEDIA: Field = Field::new(BPB_MEDIA, 1);
pub const SECTORS_PER_FAT: Field = Field::new(BPB_FAT_SZ16, 2);
pub const SECTORS_PER_TRACK: Field = Field::new(BPB_SEC_PER_TRK, 2);
pub const NUM_HEADS: Field = Field::new(BPB_NUM_HEADS, 2);
pub const HIDDEN_SECTORS: Field = Field::new(BPB_HIDD_SEC, 4);
pub const TOTAL_SECTORS_32: Field = Field::new(BPB_TOT_SEC32, 4);
pub const DRIVE_NUMBER: Field = Field::new(BS_DRV_NUM, 1);
pub const BOOT_SIG: Field = Field::new(BS_BOOT_SIG, 1);
pub const VOLUME_ID: Field = Field::new(BS_VOL_ID, 4);
pub const VOLUME_LABEL: Field = Field::new(BS_VOL_LAB, 11);
pub const FS_TYPE: Field = Field::new(BS_FIL_SYS_TYPE, 8);
pub const SIGNATURE: Field = Field::new(BOOT_SIGNATURE_OFFSET, 2);

/// First 64 bytes of every image, reproduced literally.
///
/// Total sectors (0x13) and volume ID (0x27) are placeholders that get
/// overwritten; the sectors-per-FAT low byte (0x16) likewise.
pub const BPB_TEMPLATE: [u8; 64] = [
    0xEB, 0xFE, 0x90, b'M', b'S', b'D', b'O', b'S', b'5', b'.', b'0', 0x00, 0x10, 0x01, 0x01, 0x00,
    0x01, 0x00, 0x02, 0xD6, 0x0B, 0xF8, 0x02, 0x00, 0x3F, 0x00, 0xFF, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x80, 0x00, 0x29, 0x00, 0x00, 0x21, 0x00, b'N', b'O', b' ', b'N', b'A',
    b'M', b'E', b' ', b' ', b' ', b' ', b'F', b'A', b'T', b' ', b' ', b' ', b' ', b' ', 0x00, 0x00,
];

const_assert_eq!(BPB_TEMPLATE.len(), 64);

#[derive(Clone)]
pub struct BootSector {
    bytes: [u8; SECTOR_SIZE],
}

impl BootSector {
    pub fn new(geometry: &Geometry, serial: u32) -> Self {
        let mut bytes = [0u8; SECTOR_SIZE];
        bytes[..BPB_TEMPLATE.len()].copy_from_slice(&BPB_TEMPLATE);

        let mut sector = Self { bytes };
        // Only the low byte of the FAT size is patched; the high byte stays as templated.
        sector.bytes[SECTORS_PER_FAT.offset] = geometry.sectors_per_fat;
        // The 16-bit count covers the data region only; fits by the geometry range.
        sector.set_u16(TOTAL_SECTORS_16, geometry.data_sectors as u16);
        sector.set_u32(VOLUME_ID, serial);
        sector.bytes[SIGNATURE.range()].copy_from_slice(&BOOT_SIGNATURE);
        sector
    }

    pub fn as_bytes(&self) -> &[u8; SECTOR_SIZE] {
        &self.bytes
    }

    pub fn field(&self, field: Field) -> &[u8] {
        &self.bytes[field.range()]
    }

    pub fn u8_at(&self, field: Field) -> u8 {
        self.bytes[field.offset]
    }

    pub fn u16_at(&self, field: Field) -> u16 {
        LittleEndian::read_u16(self.field(field))
    }

    pub fn u32_at(&self, field: Field) -> u32 {
        LittleEndian::read_u32(self.field(field))
    }

    fn set_u16(&mut self, field: Field, value: u16) {
        LittleEndian::write_u16(&mut self.bytes[field.range()], value);
    }

    fn set_u32(&mut self, field: Field, value: u32) {
        LittleEndian::write_u32(&mut self.bytes[field.range()], value);
    }

    pub fn sectors_per_fat(&self) -> u16 {
        self.u16_at(SECTORS_PER_FAT)
    }

    pub fn total_sectors_16(&self) -> u16 {
        self.u16_at(TOTAL_SECTORS_16)
    }

    pub fn volume_id(&self) -> u32 {
        self.u32_at(VOLUME_ID)
    }

    pub fn has_signature(&self) -> bool {
        self.field(SIGNATURE) == BOOT_SIGNATURE
    }
}

impl std::fmt::Debug for BootSector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootSector")
            .field("oem_name", &String::from_utf8_lossy(self.field(OEM_NAME)))
            .field("bytes_per_sector", &self.u16_at(BYTES_PER_SECTOR))
            .field("sectors_per_fat", &self.sectors_per_fat())
            .field("total_sectors_16", &self.total_sectors_16())
            .field("volume_id", &format_args!("{:#010x}", self.volume_id()))
            .field("signature", &self.has_signature())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> Geometry {
        Geometry::resolve(MIB).unwrap()
    }

    fn large() -> Geometry {
        Geometry::resolve(0xBF0000).unwrap()
    }

    #[test]
    fn test_patched_fields() {
        let bs = BootSector::new(&large(), 0xDEADBEEF);
        assert_eq!(bs.u8_at(SECTORS_PER_FAT), 2);
        assert_eq!(bs.sectors_per_fat(), 2);
        assert_eq!(bs.total_sectors_16(), 3048);
        assert_eq!(bs.field(TOTAL_SECTORS_16), &[0xE8, 0x0B]);
        assert_eq!(bs.field(VOLUME_ID), &[0xEF, 0xBE, 0xAD, 0xDE]);
        assert_eq!(bs.volume_id(), 0xDEADBEEF);
        assert_eq!(bs.as_bytes()[510], 0x55);
        assert_eq!(bs.as_bytes()[511], 0xAA);
        assert!(bs.has_signature());

        let bs = BootSector::new(&small(), 0);
        assert_eq!(bs.sectors_per_fat(), 1);
        assert_eq!(bs.total_sectors_16(), 249);
    }

    #[test]
    fn test_template_fields_preserved() {
        let bs = BootSector::new(&small(), 0x12345678);
        assert_eq!(bs.field(JUMP), &[0xEB, 0xFE, 0x90]);
        assert_eq!(bs.field(OEM_NAME), b"MSDOS5.0");
        assert_eq!(bs.u16_at(BYTES_PER_SECTOR), 4096);
        assert_eq!(bs.u8_at(SECTORS_PER_CLUSTER), 1);
        assert_eq!(bs.u16_at(RESERVED_SECTORS), 1);
        assert_eq!(bs.u8_at(NUM_FATS), 1);
        assert_eq!(bs.u16_at(ROOT_ENTRIES), 512);
        assert_eq!(bs.u8_at(MEDIA), MEDIA_FIXED);
        assert_eq!(bs.u16_at(SECTORS_PER_TRACK), 63);
        assert_eq!(bs.u16_at(NUM_HEADS), 255);
        assert_eq!(bs.u32_at(HIDDEN_SECTORS), 0);
        assert_eq!(bs.u32_at(TOTAL_SECTORS_32), 0);
        assert_eq!(bs.u8_at(DRIVE_NUMBER), 0x80);
        assert_eq!(bs.u8_at(BOOT_SIG), 0x29);
        assert_eq!(bs.field(VOLUME_LABEL), b"NO NAME    ");
        assert_eq!(bs.field(FS_TYPE), b"FAT     ");
    }

    #[test]
    fn test_only_patched_bytes_differ_from_template() {
        let bs = BootSector::new(&large(), 0xA5A5A5A5);
        let patched = [BPB_FAT_SZ16, 19, 20, 39, 40, 41, 42];
        for (i, (&got, &want)) in bs.as_bytes()[..64].iter().zip(BPB_TEMPLATE.iter()).enumerate() {
            if !patched.contains(&i) {
                assert_eq!(got, want, "byte {} changed", i);
            }
        }
    }

    #[test]
    fn test_padding_is_zero() {
        let bs = BootSector::new(&large(), u32::MAX);
        let bytes = bs.as_bytes();
        assert_eq!(bytes.len(), SECTOR_SIZE);
        assert!(bytes[64..510].iter().all(|&b| b == 0));
        assert!(bytes[512..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_template_not_shared() {
        let a = BootSector::new(&small(), 1);
        let b = BootSector::new(&large(), 2);
        assert_eq!(a.volume_id(), 1);
        assert_eq!(a.sectors_per_fat(), 1);
        assert_eq!(b.volume_id(), 2);
        assert_eq!(BPB_TEMPLATE[BS_VOL_ID..BS_VOL_ID + 4], [0x00, 0x00, 0x21, 0x00]);
    }
}
