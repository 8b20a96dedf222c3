//! Stored files and the operations on them.

mod operations;
pub(crate) mod records;

pub use operations::archive::write_archive;
pub use records::{FileRecord, UploadResult, UserInfo};
