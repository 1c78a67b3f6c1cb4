//! Command handlers, one module per command group

pub mod config;
pub mod document;
pub mod init;
pub mod session;
pub mod share;
pub mod stats;
pub mod tag;
