//! platesmoke
//!
//! A single-shot smoke test for pages that render into a canvas. It serves
//! one fixed HTML file from a local port, drives a headless Chrome instance
//! at it, and verifies a handful of rendering signals: the canvas element
//! exists, its dimensions are non-zero, its pixel buffer is not uniform, and
//! the page logged no console errors.
//!
//! # Example
//!
//! ```no_run
//! use platesmoke::{checker, CheckConfig, StaticServer};
//!
//! # fn main() -> platesmoke::Result<()> {
//! let config = CheckConfig::default();
//! let server = StaticServer::start(config.port, config.page.clone())?;
//! let report = checker::verify(&config, server.url())?;
//! report.print();
//! server.stop();
//! # std::process::exit(report.exit_code())
//! # }
//! ```

use std::path::PathBuf;

pub mod error;
pub use error::{Error, Result};

pub mod checker;
pub mod console;
pub mod pixel;
pub mod report;
pub mod server;

pub use checker::SmokeChecker;
pub use console::{ConsoleLog, ConsoleMessage};
pub use report::RunReport;
pub use server::StaticServer;

/// Configuration for one smoke-test run
///
/// The defaults reproduce the reference behavior: the server listens on
/// port 8765, `index.html` is served from the working directory, the canvas
/// under test is `#plate-canvas`, and the checker waits two extra seconds
/// after load for asynchronous rendering before sampling.
#[derive(Debug, Clone)]
pub struct CheckConfig {
    /// Port the static server binds on localhost
    pub port: u16,
    /// HTML file served for every request
    pub page: PathBuf,
    /// Id of the canvas element under test
    pub canvas_id: String,
    /// Fixed settle delay after load, in milliseconds
    pub settle_ms: u64,
    /// Screenshot output path
    pub screenshot: PathBuf,
    /// Browser viewport dimensions
    pub viewport: Viewport,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            port: 8765,
            page: PathBuf::from("index.html"),
            canvas_id: "plate-canvas".to_string(),
            settle_ms: 2000,
            screenshot: PathBuf::from("smoke-test.png"),
            viewport: Viewport::default(),
        }
    }
}

/// Viewport dimensions
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CheckConfig::default();
        assert_eq!(config.port, 8765);
        assert_eq!(config.canvas_id, "plate-canvas");
        assert_eq!(config.settle_ms, 2000);
        assert_eq!(config.viewport.width, 1280);
        assert_eq!(config.viewport.height, 720);
    }

    #[test]
    fn test_viewport() {
        let viewport = Viewport {
            width: 1920,
            height: 1080,
        };
        assert_eq!(viewport.width, 1920);
        assert_eq!(viewport.height, 1080);
    }
}
