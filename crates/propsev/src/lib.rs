// Library root: re-exports the application modules so integration tests can
// drive a full run without the binary.

pub mod app;
pub mod config;
pub mod render;
