// FAT12 image formatter: boot sector, FAT region, erased data region, in that order

use super::{BootSector, DataRegion, FatRegion, Geometry, Sector};
use crate::fat_common::constants::SECTOR_SIZE;
use espfat_core::{
    EspFatError, ImageFormatter, ImageOptions, ImageReport, SectorSink, SerialSource,
    FLASH_WRITE_OFFSET,
};
use log::{debug, info};
use std::iter;

/// A fully parameterized empty image, ready to be streamed.
#[derive(Debug, Clone)]
pub struct Fat12Image {
    geometry: Geometry,
    boot_sector: BootSector,
}

impl Fat12Image {
    pub fn new(geometry: Geometry, serial: u32) -> Self {
        let boot_sector = BootSector::new(&geometry, serial);
        Self { geometry, boot_sector }
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn boot_sector(&self) -> &BootSector {
        &self.boot_sector
    }

    pub fn serial(&self) -> u32 {
        self.boot_sector.volume_id()
    }

    /// Every sector of the image in write order.
    pub fn sectors(&self) -> impl Iterator<Item = Sector> + '_ {
        iter::once(*self.boot_sector.as_bytes())
            .chain(FatRegion::new(&self.geometry))
            .chain(DataRegion::new(self.geometry.data_sectors))
    }

    /// Stream the image into `sink`, returning the number of bytes written.
    pub fn write_to(&self, sink: &mut dyn SectorSink) -> Result<u64, EspFatError> {
        let mut written = 0u64;
        for sector in self.sectors() {
            sink.write_sector(&sector)?;
            written += SECTOR_SIZE as u64;
        }
        debug!("Wrote {} sectors ({} bytes)", written / SECTOR_SIZE as u64, written);
        Ok(written)
    }
}

pub struct Fat12ImageFormatter;

impl Fat12ImageFormatter {
    fn report(options: &ImageOptions, geometry: &Geometry, serial: Option<u32>) -> ImageReport {
        ImageReport {
            size_bytes: options.size_bytes,
            total_sectors: geometry.total_sectors,
            reserved_sectors: geometry.reserved_sectors,
            sectors_per_fat: geometry.sectors_per_fat,
            data_sectors: geometry.data_sectors,
            image_len: geometry.image_len(),
            serial,
            output: options.output.clone(),
            flash_offset: options
                .partition_offset
                .map(|offset| offset + FLASH_WRITE_OFFSET),
        }
    }
}

impl ImageFormatter for Fat12ImageFormatter {
    fn name(&self) -> &'static str {
        "FAT12 (ESP flash image)"
    }

    fn validate_options(&self, options: &ImageOptions) -> Result<(), EspFatError> {
        Geometry::resolve(options.size_bytes)?;

        if options.output.as_os_str().is_empty() {
            return Err(EspFatError::InvalidInput("Output path is empty".to_string()));
        }
        if options.partition_offset.is_some_and(|o| o.checked_add(FLASH_WRITE_OFFSET).is_none()) {
            return Err(EspFatError::InvalidInput("Partition offset is too large".to_string()));
        }
        Ok(())
    }

    fn dry_run(&self, options: &ImageOptions) -> Result<ImageReport, EspFatError> {
        self.validate_options(options)?;
        let geometry = Geometry::resolve(options.size_bytes)?;
        Ok(Self::report(options, &geometry, options.serial))
    }

    fn format(
        &self,
        options: &ImageOptions,
        serials: &mut dyn SerialSource,
        sink: &mut dyn SectorSink,
    ) -> Result<ImageReport, EspFatError> {
        self.validate_options(options)?;
        let geometry = Geometry::resolve(options.size_bytes)?;

        let serial = options.serial.unwrap_or_else(|| serials.next_serial());

        info!(
            "Generating {} byte FAT12 image ({} sectors, serial {:#010x})",
            geometry.image_len(),
            geometry.total_sectors,
            serial
        );
        let image = Fat12Image::new(geometry, serial);
        let written = image.write_to(sink)?;
        debug_assert_eq!(written, geometry.image_len());

        Ok(Self::report(options, &geometry, Some(serial)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fat_common::constants::MIB;
    use crate::serial::SeededSerial;

    fn options(size_bytes: u64) -> ImageOptions {
        ImageOptions {
            size_bytes,
            ..Default::default()
        }
    }

    #[test]
    fn test_sector_order() {
        let image = Fat12Image::new(Geometry::resolve(MIB).unwrap(), 7);
        let sectors: Vec<Sector> = image.sectors().collect();
        assert_eq!(sectors.len(), 256);
        assert_eq!(&sectors[0], image.boot_sector().as_bytes());
        assert_eq!(&sectors[1][..3], &[0xF8, 0xFF, 0xFF]);
        assert!(sectors[2..7].iter().all(|s| s.iter().all(|&b| b == 0)));
        assert!(sectors[7..].iter().all(|s| s.iter().all(|&b| b == 0xFF)));
    }

    #[test]
    fn test_write_to_vec() {
        let image = Fat12Image::new(Geometry::resolve(0xBF0000).unwrap(), 0x01020304);
        let mut out = Vec::new();
        let written = image.write_to(&mut out).unwrap();
        assert_eq!(written, 3056 * 4096);
        assert_eq!(out.len() as u64, written);
        assert_eq!(&out[39..43], &[0x04, 0x03, 0x02, 0x01]);
        assert_eq!(image.serial(), 0x01020304);
    }

    #[test]
    fn test_format_rejects_before_writing() {
        let formatter = Fat12ImageFormatter;
        let mut out = Vec::new();
        let err = formatter
            .format(&options(MIB - 1), &mut SeededSerial::new(1), &mut out)
            .unwrap_err();
        assert!(matches!(err, EspFatError::OutOfRange { .. }));
        assert!(out.is_empty());
    }

    #[test]
    fn test_fixed_serial_overrides_source() {
        let formatter = Fat12ImageFormatter;
        let mut opts = options(2 * MIB);
        opts.serial = Some(0xCAFEF00D);
        let mut out = Vec::new();
        let report = formatter
            .format(&opts, &mut SeededSerial::new(9), &mut out)
            .unwrap();
        assert_eq!(report.serial, Some(0xCAFEF00D));
        assert_eq!(&out[39..43], &0xCAFEF00Du32.to_le_bytes());
    }

    #[test]
    fn test_dry_run_report() {
        let formatter = Fat12ImageFormatter;
        let mut opts = options(0xBF0000);
        opts.partition_offset = Some(0x410000);
        let report = formatter.dry_run(&opts).unwrap();
        assert_eq!(report.total_sectors, 3056);
        assert_eq!(report.reserved_sectors, 8);
        assert_eq!(report.sectors_per_fat, 2);
        assert_eq!(report.data_sectors, 3048);
        assert_eq!(report.image_len, 3056 * 4096);
        assert_eq!(report.serial, None);
        assert_eq!(report.flash_offset, Some(0x411000));
    }

    #[test]
    fn test_validate_options() {
        let formatter = Fat12ImageFormatter;
        assert!(formatter.validate_options(&options(MIB)).is_ok());

        let mut opts = options(MIB);
        opts.output = std::path::PathBuf::new();
        assert!(matches!(
            formatter.validate_options(&opts),
            Err(EspFatError::InvalidInput(_))
        ));

        let mut opts = options(MIB);
        opts.partition_offset = Some(u64::MAX);
        assert!(formatter.validate_options(&opts).is_err());
    }
}
