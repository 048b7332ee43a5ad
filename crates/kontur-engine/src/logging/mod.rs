//! Logger bootstrap for binaries embedding the engine.
//!
//! The engine itself only uses the `log` macros; installing a sink is the
//! embedder's call. This module offers the conventional `env_logger` setup so
//! viewers and tools don't each reinvent it.

mod init;

pub use init::{init_logging, LoggingConfig};
