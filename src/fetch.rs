//! Resource retrieval.
//!
//! The pool builder and catalog loader only need "GET this path as text,
//! abortable through a token", so that is all [`Fetcher`] asks for. The
//! browser implementation sits on `window.fetch` with an `AbortController`
//! per request; [`MemoryFetcher`] serves fixed bodies for tests and demos.

use crate::cancel::CancelToken;
use crate::error::FetchError;
use log::debug;
use std::cell::RefCell;
use std::collections::HashMap;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{AbortController, RequestInit, Response};

#[allow(async_fn_in_trait)]
pub trait Fetcher {
    /// Fetch `path` and return its body as text. Implementations must return
    /// promptly with [`FetchError::Aborted`] once `token` is cancelled.
    async fn get_text(&self, path: &str, token: &CancelToken) -> Result<String, FetchError>;
}

/// Message of a JS exception, or its string form.
pub fn js_error_message(value: &JsValue) -> String {
    value
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| value.as_string())
        .unwrap_or_else(|| format!("{:?}", value))
}

fn is_abort_error(value: &JsValue) -> bool {
    value
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.name()) == "AbortError")
        .unwrap_or(false)
}

/// `window.fetch` relative to the page (or to `base` when set).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpFetcher {
    base: String,
}

impl HttpFetcher {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    fn url(&self, path: &str) -> String {
        if self.base.is_empty() {
            path.to_string()
        } else {
            format!("{}/{}", self.base.trim_end_matches('/'), path)
        }
    }

    fn classify(err: &JsValue, token: &CancelToken) -> FetchError {
        if token.is_cancelled() || is_abort_error(err) {
            FetchError::Aborted
        } else {
            FetchError::Network(js_error_message(err))
        }
    }
}

impl Fetcher for HttpFetcher {
    async fn get_text(&self, path: &str, token: &CancelToken) -> Result<String, FetchError> {
        let window =
            web_sys::window().ok_or_else(|| FetchError::Environment("no global window".into()))?;
        let controller = AbortController::new()
            .map_err(|e| FetchError::Environment(js_error_message(&e)))?;
        {
            let controller = controller.clone();
            token.on_cancel(move || controller.abort());
        }

        let init = RequestInit::new();
        init.set_signal(Some(&controller.signal()));
        let url = self.url(path);
        debug!("GET {}", url);

        let response = JsFuture::from(window.fetch_with_str_and_init(&url, &init))
            .await
            .map_err(|e| Self::classify(&e, token))?;
        let response: Response = response
            .dyn_into()
            .map_err(|_| FetchError::Body("fetch did not resolve to a Response".into()))?;

        if !response.ok() {
            return Err(FetchError::Status {
                status: response.status(),
                status_text: response.status_text(),
            });
        }

        let text_promise = response
            .text()
            .map_err(|e| FetchError::Body(js_error_message(&e)))?;
        let text = JsFuture::from(text_promise)
            .await
            .map_err(|e| Self::classify(&e, token))?;
        text.as_string()
            .ok_or_else(|| FetchError::Body("response body is not text".into()))
    }
}

#[derive(Debug, Clone)]
enum Canned {
    Body(String),
    Error(FetchError),
    /// Never answers; resolves to `Aborted` once cancelled.
    Hang,
}

/// Serves canned responses from memory. Unknown paths answer `404`.
#[derive(Debug, Default)]
pub struct MemoryFetcher {
    entries: HashMap<String, Canned>,
    requests: RefCell<Vec<String>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: &str, body: impl Into<String>) -> Self {
        self.entries
            .insert(path.to_string(), Canned::Body(body.into()));
        self
    }

    pub fn with_error(mut self, path: &str, error: FetchError) -> Self {
        self.entries.insert(path.to_string(), Canned::Error(error));
        self
    }

    pub fn with_hang(mut self, path: &str) -> Self {
        self.entries.insert(path.to_string(), Canned::Hang);
        self
    }

    /// Every path requested so far, in request order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl Fetcher for MemoryFetcher {
    async fn get_text(&self, path: &str, token: &CancelToken) -> Result<String, FetchError> {
        self.requests.borrow_mut().push(path.to_string());
        if token.is_cancelled() {
            return Err(FetchError::Aborted);
        }
        match self.entries.get(path).cloned() {
            Some(Canned::Body(body)) => Ok(body),
            Some(Canned::Error(err)) => Err(err),
            Some(Canned::Hang) => {
                token.cancelled().await;
                Err(FetchError::Aborted)
            }
            None => Err(FetchError::Status {
                status: 404,
                status_text: "Not Found".into(),
            }),
        }
    }
}
