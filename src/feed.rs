//! Astronaut-location feed client.
//!
//! Each request is a single GET. A non-success status earns exactly one more
//! attempt through the pass-through proxy; transport failures and bad bodies
//! are returned as-is for the caller to fall back on. Native builds block on
//! a worker thread, wasm builds fetch through the browser.

#[cfg(not(target_arch = "wasm32"))]
use std::sync::mpsc;

use eframe::egui;
use thiserror::Error;

use crate::config::FeedConfig;
use crate::position::{PositionReport, SpacecraftPosition};
use crate::roster::CrewRoster;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FeedError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("HTTP {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum HttpReply {
    Ok(String),
    Status(u16),
}

#[derive(Debug)]
pub enum FeedMessage {
    Roster {
        ticket: u64,
        result: Result<CrewRoster, FeedError>,
    },
    Position {
        ticket: u64,
        craft: String,
        result: Result<SpacecraftPosition, FeedError>,
    },
}

/// Percent-encodes everything outside the `encodeURIComponent` safe set.
pub fn encode_uri_component(input: &str) -> String {
    let mut out = String::with_capacity(input.len() * 3);
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-' | b'_' | b'.' | b'!' | b'~' | b'*' | b'\'' | b'(' | b')' => out.push(byte as char),
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

pub fn proxied_url(proxy_prefix: &str, url: &str) -> String {
    format!("{}{}", proxy_prefix, encode_uri_component(url))
}

pub fn fetch_text_with<F>(url: &str, proxy_prefix: &str, mut get: F) -> Result<String, FeedError>
where
    F: FnMut(&str) -> Result<HttpReply, FeedError>,
{
    match get(url)? {
        HttpReply::Ok(body) => Ok(body),
        HttpReply::Status(code) => {
            log::debug!("{} answered HTTP {}, retrying through proxy", url, code);
            match get(&proxied_url(proxy_prefix, url))? {
                HttpReply::Ok(body) => Ok(body),
                HttpReply::Status(code) => Err(FeedError::Status(code)),
            }
        }
    }
}

pub fn parse_roster(body: &str) -> Result<CrewRoster, FeedError> {
    serde_json::from_str(body).map_err(|e| FeedError::Malformed(e.to_string()))
}

pub fn parse_position(body: &str) -> Result<SpacecraftPosition, FeedError> {
    let report: PositionReport =
        serde_json::from_str(body).map_err(|e| FeedError::Malformed(e.to_string()))?;
    report
        .to_position()
        .ok_or_else(|| FeedError::Malformed("unusable coordinates".to_string()))
}

#[cfg(not(target_arch = "wasm32"))]
fn ureq_get(url: &str) -> Result<HttpReply, FeedError> {
    match ureq::get(url).call() {
        Ok(response) => response
            .into_string()
            .map(HttpReply::Ok)
            .map_err(|e| FeedError::Transport(format!("Read error: {}", e))),
        Err(ureq::Error::Status(code, _)) => Ok(HttpReply::Status(code)),
        Err(e) => Err(FeedError::Transport(e.to_string())),
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn fetch_roster(config: &FeedConfig) -> Result<CrewRoster, FeedError> {
    let body = fetch_text_with(&config.astros_url, &config.proxy_prefix, ureq_get)?;
    parse_roster(&body)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn fetch_position(config: &FeedConfig) -> Result<SpacecraftPosition, FeedError> {
    let body = fetch_text_with(&config.position_url, &config.proxy_prefix, ureq_get)?;
    parse_position(&body)
}

#[cfg(target_arch = "wasm32")]
thread_local! {
    static FEED_RESULTS: std::cell::RefCell<Vec<FeedMessage>> = std::cell::RefCell::new(Vec::new());
}

#[cfg(target_arch = "wasm32")]
async fn browser_get(url: &str) -> Result<HttpReply, FeedError> {
    use wasm_bindgen::JsCast as _;
    use web_sys::{Request, RequestInit, RequestMode, Response};

    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::Cors);

    let request = Request::new_with_str_and_init(url, &opts)
        .map_err(|e| FeedError::Transport(format!("{:?}", e)))?;

    let window = web_sys::window().ok_or_else(|| FeedError::Transport("No window".to_string()))?;
    let resp_value = wasm_bindgen_futures::JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| FeedError::Transport(format!("Fetch failed: {:?}", e)))?;

    let resp: Response = resp_value
        .dyn_into()
        .map_err(|_| FeedError::Transport("Response is not a Response".to_string()))?;

    if !resp.ok() {
        return Ok(HttpReply::Status(resp.status()));
    }

    let text = wasm_bindgen_futures::JsFuture::from(
        resp.text().map_err(|e| FeedError::Transport(format!("{:?}", e)))?,
    )
    .await
    .map_err(|e| FeedError::Transport(format!("{:?}", e)))?;

    text.as_string()
        .map(HttpReply::Ok)
        .ok_or_else(|| FeedError::Malformed("body is not text".to_string()))
}

#[cfg(target_arch = "wasm32")]
async fn browser_fetch_text(url: &str, proxy_prefix: &str) -> Result<String, FeedError> {
    match browser_get(url).await? {
        HttpReply::Ok(body) => Ok(body),
        HttpReply::Status(code) => {
            log::debug!("{} answered HTTP {}, retrying through proxy", url, code);
            match browser_get(&proxied_url(proxy_prefix, url)).await? {
                HttpReply::Ok(body) => Ok(body),
                HttpReply::Status(code) => Err(FeedError::Status(code)),
            }
        }
    }
}

/// Runs fetches off the frame loop and hands back their results.
pub struct FeedWorker {
    #[cfg(not(target_arch = "wasm32"))]
    tx: mpsc::Sender<FeedMessage>,
    #[cfg(not(target_arch = "wasm32"))]
    rx: mpsc::Receiver<FeedMessage>,
}

impl FeedWorker {
    pub fn new() -> Self {
        #[cfg(not(target_arch = "wasm32"))]
        {
            let (tx, rx) = mpsc::channel();
            Self { tx, rx }
        }
        #[cfg(target_arch = "wasm32")]
        {
            Self {}
        }
    }

    pub fn spawn_roster(&self, ticket: u64, config: &FeedConfig, ctx: &egui::Context) {
        let config = config.clone();
        let ctx = ctx.clone();

        #[cfg(not(target_arch = "wasm32"))]
        {
            let tx = self.tx.clone();
            std::thread::spawn(move || {
                let result = fetch_roster(&config);
                let _ = tx.send(FeedMessage::Roster { ticket, result });
                ctx.request_repaint();
            });
        }

        #[cfg(target_arch = "wasm32")]
        wasm_bindgen_futures::spawn_local(async move {
            let result = match browser_fetch_text(&config.astros_url, &config.proxy_prefix).await {
                Ok(body) => parse_roster(&body),
                Err(e) => Err(e),
            };
            FEED_RESULTS.with(|cell| {
                cell.borrow_mut().push(FeedMessage::Roster { ticket, result });
            });
            ctx.request_repaint();
        });
    }

    pub fn spawn_position(&self, ticket: u64, config: &FeedConfig, ctx: &egui::Context) {
        let config = config.clone();
        let ctx = ctx.clone();

        #[cfg(not(target_arch = "wasm32"))]
        {
            let tx = self.tx.clone();
            std::thread::spawn(move || {
                let result = fetch_position(&config);
                let craft = config.tracked_craft;
                let _ = tx.send(FeedMessage::Position { ticket, craft, result });
                ctx.request_repaint();
            });
        }

        #[cfg(target_arch = "wasm32")]
        wasm_bindgen_futures::spawn_local(async move {
            let result = match browser_fetch_text(&config.position_url, &config.proxy_prefix).await {
                Ok(body) => parse_position(&body),
                Err(e) => Err(e),
            };
            let craft = config.tracked_craft;
            FEED_RESULTS.with(|cell| {
                cell.borrow_mut().push(FeedMessage::Position { ticket, craft, result });
            });
            ctx.request_repaint();
        });
    }

    pub fn drain(&self) -> Vec<FeedMessage> {
        // Results are applied in arrival order; tickets decide what sticks.
        #[cfg(not(target_arch = "wasm32"))]
        {
            self.rx.try_iter().collect()
        }
        #[cfg(target_arch = "wasm32")]
        {
            FEED_RESULTS.with(|cell| std::mem::take(&mut *cell.borrow_mut()))
        }
    }
}

impl Default for FeedWorker {
    fn default() -> Self {
        Self::new()
    }
}
