pub mod args;
pub mod convert;
pub mod error;
pub mod file_serving;
pub mod logging;
pub mod server;
