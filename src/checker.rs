//! Browser-driven checker: one end-to-end verification pass
//!
//! Launches a headless Chrome instance over CDP (via the `headless_chrome`
//! crate), wires the page console into a [`ConsoleLog`] before navigation,
//! navigates to the page under test, waits out a fixed settle delay, grabs
//! a diagnostic screenshot, and runs the four rendering checks. Checks
//! never short-circuit between each other; infrastructure errors (a failed
//! evaluation, an unreachable browser) abort straight to teardown.

use crate::console::{ConsoleLog, ConsoleMessage};
use crate::error::{Error, Result};
use crate::pixel;
use crate::report::RunReport;
use crate::CheckConfig;
use headless_chrome::browser::tab::Tab;
use headless_chrome::protocol::cdp::Page;
use headless_chrome::{Browser, LaunchOptions};
use log::{debug, info};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

/// Wraps the page's console methods and forwards every call to the exposed
/// binding as a JSON payload. Injected on every new document so messages
/// emitted during load are captured.
const CONSOLE_WRAPPER: &str = r#"(function(){
    const bind = window.__smoke_console;
    if (!bind) return;
    ['log','info','warn','error'].forEach(function(k){
        const orig = console[k];
        console[k] = function(...args){
            try { bind(JSON.stringify({ level: k, args: args.map(a => String(a)) })); } catch (e) {}
            try { orig.apply(console, args); } catch (e) {}
        };
    });
})();"#;

const SIZE_SCRIPT: &str = r#"(function() {
    const canvas = document.getElementById({{CANVAS_ID}});
    if (!canvas) return null;
    return JSON.stringify({ width: canvas.width, height: canvas.height });
})()"#;

/// Reads back the canvas pixel buffer and returns it base64-encoded. The
/// result is a JSON-stringified object with exactly one of `pixels`, `skip`
/// (another check already owns the failure), or `error`.
const PIXEL_SCRIPT: &str = r#"(function() {
    const canvas = document.getElementById({{CANVAS_ID}});
    if (!canvas) return JSON.stringify({ skip: 'no canvas' });
    if (canvas.width === 0 || canvas.height === 0) return JSON.stringify({ skip: 'zero dimensions' });
    try {
        const ctx = canvas.getContext('2d');
        const data = ctx.getImageData(0, 0, canvas.width, canvas.height).data;
        let binary = '';
        const chunk = 0x8000;
        for (let i = 0; i < data.length; i += chunk) {
            binary += String.fromCharCode.apply(null, data.subarray(i, i + chunk));
        }
        return JSON.stringify({ pixels: btoa(binary) });
    } catch (e) {
        return JSON.stringify({ error: String(e) });
    }
})()"#;

#[derive(Debug, Deserialize)]
struct CanvasSize {
    width: u32,
    height: u32,
}

#[derive(Debug, Deserialize)]
struct PixelPayload {
    pixels: Option<String>,
    skip: Option<String>,
    error: Option<String>,
}

/// A headless browser session pointed at the page under test
pub struct SmokeChecker {
    browser: Browser,
    tab: Arc<Tab>,
    console: ConsoleLog,
    config: CheckConfig,
}

impl SmokeChecker {
    /// Launch a headless browser and open a tab. There is no retry: a
    /// launch failure aborts the run.
    pub fn launch(config: CheckConfig) -> Result<Self> {
        let launch_options = LaunchOptions::default_builder()
            .headless(true)
            .window_size(Some((config.viewport.width, config.viewport.height)))
            .build()
            .map_err(|e| Error::Launch(format!("failed to build launch options: {}", e)))?;

        let browser = Browser::new(launch_options)
            .map_err(|e| Error::Launch(format!("failed to launch browser: {}", e)))?;

        let tab = browser
            .new_tab()
            .map_err(|e| Error::Launch(format!("failed to open tab: {}", e)))?;

        let checker = Self {
            browser,
            tab,
            console: ConsoleLog::default(),
            config,
        };
        checker.subscribe_console()?;
        Ok(checker)
    }

    /// Expose a binding to receive console messages and inject the console
    /// wrapper into every new document. Must run before navigation.
    fn subscribe_console(&self) -> Result<()> {
        let sink = self.console.clone();
        self.tab
            .expose_function(
                "__smoke_console",
                std::sync::Arc::new(move |payload: serde_json::Value| {
                    // payload arrives as a JSON string from the wrapper
                    let msg = if payload.is_string() {
                        let s = payload.as_str().unwrap_or("");
                        match serde_json::from_str::<serde_json::Value>(s) {
                            Ok(v) => v,
                            Err(_) => serde_json::Value::String(s.to_string()),
                        }
                    } else {
                        payload
                    };

                    if let Some(level) = msg.get("level").and_then(|l| l.as_str()) {
                        let text = match msg.get("args") {
                            Some(serde_json::Value::Array(args)) => args
                                .iter()
                                .map(|v| {
                                    v.as_str()
                                        .map(|s| s.to_string())
                                        .unwrap_or_else(|| v.to_string())
                                })
                                .collect::<Vec<_>>()
                                .join(" "),
                            Some(other) => other.to_string(),
                            None => String::new(),
                        };
                        sink.push(ConsoleMessage {
                            level: level.to_string(),
                            text,
                        });
                    }
                }),
            )
            .map_err(|e| Error::Launch(format!("failed to expose console binding: {}", e)))?;

        self.tab
            .call_method(Page::AddScriptToEvaluateOnNewDocument {
                source: CONSOLE_WRAPPER.to_string(),
                world_name: None,
                include_command_line_api: None,
                run_immediately: None,
            })
            .map_err(|e| Error::Launch(format!("failed to inject console wrapper: {}", e)))?;

        Ok(())
    }

    /// Navigate to `url`, block until the automation layer reports the page
    /// loaded (its implicit timeout, no override), then wait out the fixed
    /// settle delay so asynchronous rendering can finish before sampling.
    pub fn navigate(&self, url: &str) -> Result<()> {
        info!("navigating to {}", url);
        self.tab
            .navigate_to(url)
            .map_err(|e| Error::Navigation(format!("navigation failed: {}", e)))?;
        self.tab
            .wait_until_navigated()
            .map_err(|e| Error::Navigation(format!("wait for navigation failed: {}", e)))?;

        debug!("settling for {}ms", self.config.settle_ms);
        std::thread::sleep(Duration::from_millis(self.config.settle_ms));
        Ok(())
    }

    /// Capture a full-page PNG screenshot to the configured path. Purely a
    /// diagnostic artifact; its bytes may differ run to run.
    pub fn capture_screenshot(&self) -> Result<()> {
        let png = self
            .tab
            .capture_screenshot(Page::CaptureScreenshotFormatOption::Png, None, None, true)
            .map_err(|e| Error::Screenshot(format!("capture failed: {}", e)))?;

        std::fs::write(&self.config.screenshot, png).map_err(|e| {
            Error::Screenshot(format!(
                "failed to write {}: {}",
                self.config.screenshot.display(),
                e
            ))
        })?;
        debug!("screenshot written to {}", self.config.screenshot.display());
        Ok(())
    }

    /// Run all four checks, collecting failures into `report`. Every check
    /// runs even after an earlier one fails.
    pub fn run_checks(&self, report: &mut RunReport) -> Result<()> {
        self.check_presence(report)?;
        self.check_console(report);
        self.check_dimensions(report)?;
        self.check_blank(report)?;
        Ok(())
    }

    /// Presence check: the canvas element must exist
    fn check_presence(&self, report: &mut RunReport) -> Result<()> {
        let expr = format!(
            "document.getElementById({}) !== null",
            js_literal(&self.config.canvas_id)
        );
        let present = self.evaluate(&expr)?.as_bool().unwrap_or(false);
        if !present {
            report.fail("Canvas element not found");
        }
        Ok(())
    }

    /// Console-error check: any buffered error-severity message fails, and
    /// every matching line is reported.
    fn check_console(&self, report: &mut RunReport) {
        let errors = self.console.error_lines();
        if !errors.is_empty() {
            let mut reason = String::from("Console errors detected:");
            for line in &errors {
                reason.push_str("\n   ");
                reason.push_str(line);
            }
            report.fail(reason);
        }
    }

    /// Dimension check: width and height must both be non-zero
    fn check_dimensions(&self, report: &mut RunReport) -> Result<()> {
        let expr = SIZE_SCRIPT.replace("{{CANVAS_ID}}", &js_literal(&self.config.canvas_id));
        match self.evaluate(&expr)? {
            serde_json::Value::String(s) => {
                let size: CanvasSize = serde_json::from_str(&s)
                    .map_err(|e| Error::Evaluation(format!("malformed canvas size: {}", e)))?;
                report.set_canvas(size.width, size.height);
                if size.width == 0 || size.height == 0 {
                    report.fail(format!(
                        "Canvas has zero dimensions ({}x{})",
                        size.width, size.height
                    ));
                }
            }
            // Element missing; the presence check owns that failure.
            _ => {}
        }
        Ok(())
    }

    /// Blank-render check: read back the pixel buffer and fail when every
    /// pixel matches the first one.
    fn check_blank(&self, report: &mut RunReport) -> Result<()> {
        let expr = PIXEL_SCRIPT.replace("{{CANVAS_ID}}", &js_literal(&self.config.canvas_id));
        let value = self.evaluate(&expr)?;
        let raw = match value.as_str() {
            Some(s) => s,
            None => return Ok(()),
        };
        let payload: PixelPayload = serde_json::from_str(raw)
            .map_err(|e| Error::Evaluation(format!("malformed pixel payload: {}", e)))?;

        if let Some(reason) = payload.skip {
            debug!("skipping blank check: {}", reason);
            return Ok(());
        }
        if let Some(err) = payload.error {
            report.fail(format!("Canvas pixels unreadable: {}", err));
            return Ok(());
        }
        if let Some(b64) = payload.pixels {
            let data = pixel::decode_pixels(&b64)?;
            if pixel::is_uniform(&data) {
                report.fail("Canvas is blank (no rendering detected)");
            }
        }
        Ok(())
    }

    /// Evaluate an expression in the page and return its value, mapping a
    /// null/undefined result to JSON null.
    fn evaluate(&self, expr: &str) -> Result<serde_json::Value> {
        let result = self
            .tab
            .evaluate(expr, false)
            .map_err(|e| Error::Evaluation(format!("evaluation failed: {}", e)))?;
        Ok(result.value.unwrap_or(serde_json::Value::Null))
    }

    /// Close the session. The underlying browser and tab are dropped
    /// explicitly so the child Chrome process terminates promptly.
    pub fn close(self) -> Result<()> {
        drop(self.tab);
        drop(self.browser);
        Ok(())
    }
}

/// One end-to-end verification pass against `url`
///
/// The browser is torn down on every path before this returns, whether the
/// run passed, failed a check, or aborted on an error.
pub fn verify(config: &CheckConfig, url: &str) -> Result<RunReport> {
    let checker = SmokeChecker::launch(config.clone())?;
    let mut report = RunReport::new();

    let outcome = (|| {
        checker.navigate(url)?;
        checker.capture_screenshot()?;
        report.set_screenshot(config.screenshot.clone());
        checker.run_checks(&mut report)
    })();

    let _ = checker.close();
    outcome.map(|()| report)
}

/// Quote a string as a JavaScript string literal
fn js_literal(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| "\"\"".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_js_literal_escapes() {
        assert_eq!(js_literal("plate-canvas"), "\"plate-canvas\"");
        assert_eq!(js_literal("a\"b"), "\"a\\\"b\"");
    }

    #[test]
    fn test_size_script_substitution() {
        let expr = SIZE_SCRIPT.replace("{{CANVAS_ID}}", &js_literal("plate-canvas"));
        assert!(expr.contains("getElementById(\"plate-canvas\")"));
        assert!(!expr.contains("{{CANVAS_ID}}"));
    }

    #[test]
    fn test_pixel_payload_variants() {
        let p: PixelPayload = serde_json::from_str(r#"{"pixels":"AAAA"}"#).unwrap();
        assert_eq!(p.pixels.as_deref(), Some("AAAA"));
        assert!(p.skip.is_none() && p.error.is_none());

        let p: PixelPayload = serde_json::from_str(r#"{"skip":"no canvas"}"#).unwrap();
        assert_eq!(p.skip.as_deref(), Some("no canvas"));

        let p: PixelPayload = serde_json::from_str(r#"{"error":"TypeError: x"}"#).unwrap();
        assert_eq!(p.error.as_deref(), Some("TypeError: x"));
    }
}
