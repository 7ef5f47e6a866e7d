//! Static content server backing the smoke test
//!
//! Serves one fixed HTML file for every incoming request regardless of
//! method or path. There is no routing and no caching; the file is read
//! from disk per request so an unreadable file turns into a 500 response
//! rather than a crash.

use crate::error::{Error, Result};
use log::{debug, warn};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::JoinHandle;
use tiny_http::{Header, Response, Server};

/// A localhost HTTP server that answers every request with one fixed page
pub struct StaticServer {
    server: Arc<Server>,
    handle: Option<JoinHandle<()>>,
    url: String,
}

impl StaticServer {
    /// Bind `127.0.0.1:<port>` and start serving `page` on a background
    /// thread. Fails if the port is already taken.
    pub fn start(port: u16, page: PathBuf) -> Result<Self> {
        let addr = format!("127.0.0.1:{}", port);
        let server = Arc::new(
            Server::http(&addr)
                .map_err(|e| Error::Server(format!("failed to bind {}: {}", addr, e)))?,
        );

        let accept = server.clone();
        let handle = std::thread::spawn(move || {
            for request in accept.incoming_requests() {
                debug!("{} {}", request.method(), request.url());
                let response = match std::fs::read(&page) {
                    Ok(body) => Response::from_data(body).with_header(
                        "Content-Type: text/html; charset=utf-8"
                            .parse::<Header>()
                            .unwrap(),
                    ),
                    Err(e) => {
                        warn!("failed to read {}: {}", page.display(), e);
                        Response::from_string(format!("Error loading {}", page.display()))
                            .with_status_code(500)
                    }
                };
                let _ = request.respond(response);
            }
        });

        Ok(Self {
            server,
            handle: Some(handle),
            url: format!("http://{}", addr),
        })
    }

    /// Root URL of the server
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Stop accepting connections, join the serving thread, and release
    /// the port.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.server.unblock();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for StaticServer {
    fn drop(&mut self) {
        self.shutdown();
    }
}
