//! A blocking facade over the async [`Client`](crate::Client).
//!
//! The blocking `Client` owns a single-threaded tokio runtime and drives the
//! async client on it. It must not be used from within an async runtime.
//!
//! ```no_run
//! let client = unirest::blocking::Client::new()?;
//! let mut res = client.send(
//!     &unirest::new()
//!         .url("http://httpbin.org")
//!         .append_path("get")
//!         .query("lang", "rust"),
//! );
//! println!("body = {:?}", res.text()?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use http::{HeaderMap, StatusCode};
#[cfg(feature = "json")]
use serde::de::DeserializeOwned;
use tokio::runtime::{self, Runtime};
use url::Url;

use crate::{Request, RequestBuilder};

/// A `Client` to make requests with, blocking the current thread until each
/// request completes.
#[derive(Clone)]
pub struct Client {
    inner: crate::Client,
    rt: Arc<Runtime>,
}

/// A blocking counterpart of [`crate::Response`].
pub struct Response {
    inner: crate::Response,
    rt: Arc<Runtime>,
}

impl Client {
    /// Constructs a new blocking `Client` with the default configuration.
    ///
    /// # Errors
    ///
    /// Fails if the runtime cannot be started.
    pub fn new() -> std::io::Result<Client> {
        Client::with_client(crate::Client::builder())
    }

    /// Constructs a blocking `Client` from a configured async builder.
    pub fn with_client(builder: crate::ClientBuilder) -> std::io::Result<Client> {
        let rt = runtime::Builder::new_current_thread().enable_all().build()?;
        Ok(Client {
            inner: builder.build(),
            rt: Arc::new(rt),
        })
    }

    /// Builds and sends the request described by `builder`.
    pub fn send(&self, builder: &RequestBuilder) -> Response {
        let inner = self.rt.block_on(builder.send_with(&self.inner));
        self.wrap(inner)
    }

    /// Executes an already materialized `Request`.
    pub fn execute(&self, request: Request) -> Response {
        let inner = self.rt.block_on(self.inner.execute(request));
        self.wrap(inner)
    }

    fn wrap(&self, inner: crate::Response) -> Response {
        Response {
            inner,
            rt: Arc::clone(&self.rt),
        }
    }
}

impl Response {
    /// Returns true if a response was received from the server.
    pub fn is_sent(&self) -> bool {
        self.inner.is_sent()
    }

    /// The error that kept the request from being sent, if any.
    pub fn error(&self) -> Option<&crate::Error> {
        self.inner.error()
    }

    /// Get the `StatusCode` of this `Response`.
    pub fn status(&self) -> Option<StatusCode> {
        self.inner.status()
    }

    /// Get the `Headers` of this `Response`.
    pub fn headers(&self) -> Option<&HeaderMap> {
        self.inner.headers()
    }

    /// Get the final `Url` of this `Response`.
    pub fn url(&self) -> Option<&Url> {
        self.inner.url()
    }

    /// Reads the whole response body. See [`crate::Response::bytes`].
    pub fn bytes(&mut self) -> crate::Result<Bytes> {
        self.rt.block_on(self.inner.bytes())
    }

    /// Reads the whole response body as text. See [`crate::Response::text`].
    pub fn text(&mut self) -> crate::Result<String> {
        self.rt.block_on(self.inner.text())
    }

    /// Reads the whole response body as JSON. See [`crate::Response::json`].
    #[cfg(feature = "json")]
    #[cfg_attr(docsrs, doc(cfg(feature = "json")))]
    pub fn json<T: DeserializeOwned>(&mut self) -> crate::Result<T> {
        self.rt.block_on(self.inner.json())
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Client").field("inner", &self.inner).finish()
    }
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(&self.inner, f)
    }
}
