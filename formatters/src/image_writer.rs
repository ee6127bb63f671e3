// Image file writer
//
// Sectors go to a temporary file beside the destination and are renamed into
// place only once the whole image is on disk. A failed or abandoned write
// leaves nothing at the output path.

use espfat_core::{EspFatError, SectorSink};
use log::{debug, info};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::{Builder, NamedTempFile};

pub struct ImageFileWriter {
    destination: PathBuf,
    writer: BufWriter<NamedTempFile>,
    bytes_written: u64,
}

impl ImageFileWriter {
    pub fn create(destination: impl AsRef<Path>) -> Result<Self, EspFatError> {
        let destination = destination.as_ref().to_path_buf();
        let dir = match destination.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let temp = staging_builder().tempfile_in(&dir)?;
        debug!("Staging image in {}", temp.path().display());

        Ok(Self {
            destination,
            writer: BufWriter::new(temp),
            bytes_written: 0,
        })
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Flush, fsync and move the finished image to its destination.
    pub fn commit(self) -> Result<PathBuf, EspFatError> {
        let temp = self.writer.into_inner().map_err(|e| e.into_error())?;
        temp.as_file().sync_all()?;
        temp.persist(&self.destination).map_err(|e| e.error)?;

        info!(
            "Wrote {} bytes to {}",
            self.bytes_written,
            self.destination.display()
        );
        Ok(self.destination)
    }
}

/// Temp files default to 0600; the image should get the mode a plain create
/// would, i.e. 0666 less the umask.
#[cfg(unix)]
fn staging_builder<'a, 'b>() -> Builder<'a, 'b> {
    use std::fs::Permissions;
    use std::os::unix::fs::PermissionsExt;

    let mut builder = Builder::new();
    builder.permissions(Permissions::from_mode(0o666));
    builder
}

#[cfg(not(unix))]
fn staging_builder<'a, 'b>() -> Builder<'a, 'b> {
    Builder::new()
}

impl SectorSink for ImageFileWriter {
    fn write_sector(&mut self, sector: &[u8]) -> Result<(), EspFatError> {
        self.writer.write_all(sector)?;
        self.bytes_written += sector.len() as u64;
        Ok(())
    }
}
