// Shared FAT on-disk constants

pub mod constants;
