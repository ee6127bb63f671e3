// FAT constants for 4 KiB flash-sector images

use static_assertions::const_assert;

/// Sector size used for every region of the image (one flash erase block).
pub const SECTOR_SIZE: usize = 0x1000;

pub const MIB: u64 = 1024 * 1024;
pub const MIN_IMAGE_SIZE: u64 = MIB;
pub const MAX_IMAGE_SIZE: u64 = 15 * MIB;

/// FAT12 entries that fit in one 4096-byte FAT sector (12 bits each).
pub const FAT12_ENTRIES_PER_SECTOR: u32 = 2730;

/// Boot sector plus root directory plus one spare sector; FAT sectors come on top.
pub const FIXED_RESERVED_SECTORS: u32 = 6;

// Boot sector field offsets
pub const BS_JMP_BOOT: usize = 0x00;
pub const BS_OEM_NAME: usize = 0x03;
pub const BPB_BYTES_PER_SEC: usize = 0x0B;
pub const BPB_SEC_PER_CLUS: usize = 0x0D;
pub const BPB_RSVD_SEC_CNT: usize = 0x0E;
pub const BPB_NUM_FATS: usize = 0x10;
pub const BPB_ROOT_ENT_CNT: usize = 0x11;
pub const BPB_TOT_SEC16: usize = 0x13;
pub const BPB_MEDIA: usize = 0x15;
pub const BPB_FAT_SZ16: usize = 0x16;
pub const BPB_SEC_PER_TRK: usize = 0x18;
pub const BPB_NUM_HEADS: usize = 0x1A;
pub const BPB_HIDD_SEC: usize = 0x1C;
pub const BPB_TOT_SEC32: usize = 0x20;
pub const BS_DRV_NUM: usize = 0x24;
pub const BS_BOOT_SIG: usize = 0x26;
pub const BS_VOL_ID: usize = 0x27;
pub const BS_VOL_LAB: usize = 0x2B;
pub const BS_FIL_SYS_TYPE: usize = 0x36;

pub const BOOT_SIGNATURE_OFFSET: usize = 0x1FE;
pub const BOOT_SIGNATURE: [u8; 2] = [0x55, 0xAA];

pub const MEDIA_FIXED: u8 = 0xF8;

/// Reserved entries for clusters 0 and 1: media descriptor then end-of-chain.
pub const FAT12_RESERVED_ENTRIES: [u8; 3] = [MEDIA_FIXED, 0xFF, 0xFF];

/// Erased NOR flash reads back as all ones.
pub const ERASED_BYTE: u8 = 0xFF;

const_assert!(BOOT_SIGNATURE_OFFSET + BOOT_SIGNATURE.len() <= SECTOR_SIZE);
const_assert!(BS_FIL_SYS_TYPE + 8 <= 64);
const_assert!(MIN_IMAGE_SIZE / (SECTOR_SIZE as u64) > (FIXED_RESERVED_SECTORS as u64) + 2);
