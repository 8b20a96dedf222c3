//! Session management.

mod core;

pub(crate) use self::core::Session;
