//! Account and transfer operations, split into focused modules.

pub(crate) mod archive;
mod bag;
mod browse;
mod download;
mod quota;
mod upload;
mod utils;
