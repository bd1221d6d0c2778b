pub mod baseline;
pub mod format;
pub mod packer;
pub mod properties;
pub mod varint;
pub mod zip_writer;

pub use packer::{IndexPacker, PackOptions, INDEX_FILE_STEM};
