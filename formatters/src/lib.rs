pub mod fat12;
pub mod fat_common;
pub mod image_writer;
pub mod serial;

pub use fat12::{Fat12Image, Fat12ImageFormatter, Geometry};
pub use image_writer::ImageFileWriter;
pub use serial::{FixedSerial, SeededSerial, UuidSerial};
