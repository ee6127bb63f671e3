pub mod error;
pub mod filesystem;
pub mod size;

pub use error::EspFatError;
pub use filesystem::{
    ImageFormatter, ImageOptions, ImageReport, SectorSink, SerialSource, DEFAULT_IMAGE_NAME,
    FLASH_WRITE_OFFSET,
};
pub use size::{parse_size, parse_u32};
