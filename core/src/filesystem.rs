use crate::EspFatError;
use serde::Serialize;
use std::path::PathBuf;

pub const DEFAULT_IMAGE_NAME: &str = "filesystem.img";

/// Partitions are flashed one 4 KiB block past their table offset.
pub const FLASH_WRITE_OFFSET: u64 = 0x1000;

#[derive(Debug, Clone, Serialize)]
pub struct ImageOptions {
    pub size_bytes: u64,
    pub output: PathBuf,
    /// Use this volume serial instead of generating one.
    pub serial: Option<u32>,
    /// Seed for a deterministic serial when `serial` is not set.
    pub seed: Option<u64>,
    /// Partition start from the partition table, only used for the flashing hint.
    pub partition_offset: Option<u64>,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            size_bytes: 0,
            output: PathBuf::from(DEFAULT_IMAGE_NAME),
            serial: None,
            seed: None,
            partition_offset: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageReport {
    pub size_bytes: u64,
    pub total_sectors: u32,
    pub reserved_sectors: u32,
    pub sectors_per_fat: u8,
    pub data_sectors: u32,
    pub image_len: u64,
    pub serial: Option<u32>,
    pub output: PathBuf,
    pub flash_offset: Option<u64>,
}

impl ImageReport {
    /// esptool invocation for flashing this image, if the partition offset is known.
    pub fn esptool_hint(&self) -> Option<String> {
        self.flash_offset.map(|offset| {
            format!(
                "esptool.py -p <DEV> -b <BAUD> write_flash {:#x} {}",
                offset,
                self.output.display()
            )
        })
    }
}

/// Consumer of the finished image, one fixed-size sector at a time, in order.
pub trait SectorSink {
    fn write_sector(&mut self, sector: &[u8]) -> Result<(), EspFatError>;
}

impl SectorSink for Vec<u8> {
    fn write_sector(&mut self, sector: &[u8]) -> Result<(), EspFatError> {
        self.extend_from_slice(sector);
        Ok(())
    }
}

/// Source of volume serial numbers.
pub trait SerialSource {
    fn next_serial(&mut self) -> u32;
}

pub trait ImageFormatter {
    fn name(&self) -> &'static str;

    /// Reject options that cannot produce an image. Must run before any output is opened.
    fn validate_options(&self, options: &ImageOptions) -> Result<(), EspFatError>;

    fn dry_run(&self, options: &ImageOptions) -> Result<ImageReport, EspFatError>;

    fn format(
        &self,
        options: &ImageOptions,
        serials: &mut dyn SerialSource,
        sink: &mut dyn SectorSink,
    ) -> Result<ImageReport, EspFatError>;
}
