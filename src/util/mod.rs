// Utility modules

pub mod encode;
pub mod file_writer;
pub mod scale;
