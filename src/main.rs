use clap::Parser;
use platesmoke::{checker, CheckConfig, StaticServer, Viewport};
use std::path::PathBuf;
use std::process;

/// Headless-browser smoke test for canvas-rendering pages.
///
/// Serves one fixed HTML file on a local port, drives a headless Chrome
/// instance at it, and exits 0 only when the canvas element exists, has
/// non-zero dimensions, shows a non-uniform pixel buffer, and the page
/// logged no console errors.
#[derive(Debug, Parser)]
#[command(name = "platesmoke", version)]
struct Args {
    /// Port for the local static server
    #[arg(long, default_value_t = 8765)]
    port: u16,

    /// HTML file served to the browser
    #[arg(long, default_value = "index.html")]
    page: PathBuf,

    /// Id of the canvas element under test
    #[arg(long, default_value = "plate-canvas")]
    canvas_id: String,

    /// Extra settle time after load, in milliseconds
    #[arg(long, default_value_t = 2000)]
    settle_ms: u64,

    /// Screenshot output path
    #[arg(long, default_value = "smoke-test.png")]
    screenshot: PathBuf,

    /// Browser viewport width
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Browser viewport height
    #[arg(long, default_value_t = 720)]
    height: u32,
}

impl From<Args> for CheckConfig {
    fn from(args: Args) -> Self {
        Self {
            port: args.port,
            page: args.page,
            canvas_id: args.canvas_id,
            settle_ms: args.settle_ms,
            screenshot: args.screenshot,
            viewport: Viewport {
                width: args.width,
                height: args.height,
            },
        }
    }
}

fn main() {
    env_logger::init();
    let config = CheckConfig::from(Args::parse());
    process::exit(run(&config));
}

/// Run the whole pass with guaranteed teardown: the server is stopped on
/// every path after it starts, and the browser is closed inside `verify`.
fn run(config: &CheckConfig) -> i32 {
    let server = match StaticServer::start(config.port, config.page.clone()) {
        Ok(server) => server,
        Err(e) => {
            eprintln!("❌ SMOKE TEST FAILED: {}", e);
            return 1;
        }
    };

    let code = match checker::verify(config, server.url()) {
        Ok(report) => {
            report.print();
            report.exit_code()
        }
        Err(e) => {
            eprintln!("❌ SMOKE TEST FAILED: {}", e);
            1
        }
    };

    server.stop();
    code
}
