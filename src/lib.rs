#![deny(missing_docs)]
#![deny(missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! # unirest
//!
//! The `unirest` crate provides a fluent builder for HTTP requests.
//!
//! A [`RequestBuilder`] accumulates a URL, path segments, query parameters,
//! headers, form fields, file attachments, a raw or JSON body and basic
//! authentication. It then materializes a [`Request`] or sends it straight
//! away.
//!
//! - Plain bodies, JSON, urlencoded, multipart
//! - Copy-on-write builders that can be shared as templates
//! - Errors deferred into the [`Response`], so a chain never breaks
//!
//! ## Making a GET request
//!
//! ```rust,no_run
//! # async fn run() -> Result<(), unirest::Error> {
//! let body = unirest::new()
//!     .url("https://www.rust-lang.org")
//!     .send()
//!     .await
//!     .text()
//!     .await?;
//!
//! println!("body = {body:?}");
//! # Ok(())
//! # }
//! ```
//!
//! ## Builders are values by default
//!
//! Every call returns a builder. By default it is a fresh copy and the
//! receiver stays untouched, so a partially configured builder can be kept
//! around and branched from as often as needed:
//!
//! ```rust
//! let api = unirest::new()
//!     .url("https://api.example.com")
//!     .basic_auth("user", "secret");
//!
//! let search = api.append_path("search").query("q", "rust");
//! let upload = api.append_path("upload").file("doc", "a.txt", "hello");
//!
//! assert_eq!(search.build()?.method(), "GET");
//! assert_eq!(upload.build()?.method(), "POST");
//! # Ok::<(), unirest::Error>(())
//! ```
//!
//! Calling [`auto_clone(false)`](RequestBuilder::auto_clone) switches a
//! builder to [`Mode::Exclusive`], where every call mutates the same state.
//! That saves a copy per call for builders used only once.
//!
//! ## Bodies
//!
//! Only one kind of body is sent per request. A raw or JSON body combined
//! with form fields or files is refused when the request is built:
//!
//! ```rust
//! let err = unirest::new()
//!     .url("https://example.com")
//!     .json_body(r#"{"a":1}"#)
//!     .form_field("b", "2")
//!     .build()
//!     .unwrap_err();
//!
//! assert!(err.is_conflict());
//! ```
//!
//! ## Optional Features
//!
//! - **rustls-tls** *(enabled by default)*: Provides TLS support via `rustls`.
//! - **json**: Provides `Response::json` for deserializing response bodies.
//! - **blocking**: Provides the `blocking` module with a synchronous client.

pub use http::header;
pub use http::Method;
pub use http::{StatusCode, Version};
pub use url::Url;

pub use self::body::Body;
pub use self::builder::{Mode, RequestBuilder};
pub use self::client::{Client, ClientBuilder};
pub use self::error::{Error, Result};
pub use self::request::Request;
pub use self::response::Response;

mod body;
mod builder;
mod client;
mod error;
mod multipart;
mod request;
mod response;
mod util;

#[cfg(feature = "blocking")]
#[cfg_attr(docsrs, doc(cfg(feature = "blocking")))]
pub mod blocking;

/// Creates a new [`RequestBuilder`] for a `GET` request in
/// [`Mode::Shared`].
///
/// This is the same as `RequestBuilder::new()`.
pub fn new() -> RequestBuilder {
    RequestBuilder::new()
}

fn _assert_impls() {
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}
    fn assert_clone<T: Clone>() {}

    assert_send::<RequestBuilder>();
    assert_sync::<RequestBuilder>();
    assert_clone::<RequestBuilder>();

    assert_send::<Client>();
    assert_sync::<Client>();
    assert_clone::<Client>();

    assert_send::<Request>();
    assert_clone::<Request>();

    assert_send::<Response>();

    assert_send::<Error>();
    assert_sync::<Error>();
}
