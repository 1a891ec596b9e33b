use std::fmt;

use bytes::Bytes;
use http::{HeaderMap, StatusCode, Version};
use http_body_util::BodyExt;
use hyper::body::Incoming;
#[cfg(feature = "json")]
use serde::de::DeserializeOwned;
use url::Url;

/// The outcome of [`RequestBuilder::send`](crate::RequestBuilder::send).
///
/// A `Response` is always returned, even when the request could not be
/// built or sent; the failure is kept here and surfaces on the first read.
///
/// The body can be read once. A second read fails with an error for which
/// [`Error::is_consumed`](crate::Error::is_consumed) is true.
pub struct Response {
    head: Option<Head>,
    body: Option<Incoming>,
    err: Option<crate::Error>,
}

struct Head {
    status: StatusCode,
    version: Version,
    headers: HeaderMap,
    url: Url,
}

impl Response {
    pub(crate) fn new(res: http::Response<Incoming>, url: Url) -> Response {
        let (parts, body) = res.into_parts();
        log::debug!("response '{}' for {}", parts.status, url);
        Response {
            head: Some(Head {
                status: parts.status,
                version: parts.version,
                headers: parts.headers,
                url,
            }),
            body: Some(body),
            err: None,
        }
    }

    pub(crate) fn failed(err: crate::Error) -> Response {
        Response {
            head: None,
            body: None,
            err: Some(err),
        }
    }

    /// Returns true if a response was received from the server.
    pub fn is_sent(&self) -> bool {
        self.head.is_some()
    }

    /// The error that kept the request from being sent, if any.
    ///
    /// It is handed out by value on the next read.
    pub fn error(&self) -> Option<&crate::Error> {
        self.err.as_ref()
    }

    /// Get the `StatusCode` of this `Response`.
    #[inline]
    pub fn status(&self) -> Option<StatusCode> {
        self.head.as_ref().map(|head| head.status)
    }

    /// Get the HTTP `Version` of this `Response`.
    #[inline]
    pub fn version(&self) -> Option<Version> {
        self.head.as_ref().map(|head| head.version)
    }

    /// Get the `Headers` of this `Response`.
    #[inline]
    pub fn headers(&self) -> Option<&HeaderMap> {
        self.head.as_ref().map(|head| &head.headers)
    }

    /// Get the final `Url` of this `Response`.
    #[inline]
    pub fn url(&self) -> Option<&Url> {
        self.head.as_ref().map(|head| &head.url)
    }

    /// Reads the whole response body.
    ///
    /// # Errors
    ///
    /// Returns the deferred build or transport error if sending failed. When
    /// that error was already returned by an earlier read, or nothing was
    /// sent at all, the error reports that the request is not sent. Reading
    /// twice fails because the body was consumed.
    pub async fn bytes(&mut self) -> crate::Result<Bytes> {
        if let Some(err) = self.err.take() {
            return Err(err);
        }

        let head = match self.head {
            Some(ref head) => head,
            None => return Err(crate::error::not_sent()),
        };

        let body = match self.body.take() {
            Some(body) => body,
            None => return Err(crate::error::consumed(Some(head.url.clone()))),
        };

        let collected = body
            .collect()
            .await
            .map_err(|e| crate::error::body(e).with_url(head.url.clone()))?;
        Ok(collected.to_bytes())
    }

    /// Reads the whole response body as text.
    ///
    /// Invalid UTF-8 sequences are replaced with
    /// [`U+FFFD REPLACEMENT CHARACTER`](std::char::REPLACEMENT_CHARACTER).
    pub async fn text(&mut self) -> crate::Result<String> {
        let bytes = self.bytes().await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Reads the whole response body as JSON.
    ///
    /// # Errors
    ///
    /// Besides the errors of [`Response::bytes`], this fails if the body is
    /// not valid JSON for `T`.
    #[cfg(feature = "json")]
    #[cfg_attr(docsrs, doc(cfg(feature = "json")))]
    pub async fn json<T: DeserializeOwned>(&mut self) -> crate::Result<T> {
        let bytes = self.bytes().await?;
        serde_json::from_slice(&bytes).map_err(crate::error::decode)
    }
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut builder = f.debug_struct("Response");
        if let Some(ref head) = self.head {
            builder
                .field("url", &head.url.as_str())
                .field("status", &head.status)
                .field("headers", &head.headers);
        }
        if let Some(ref err) = self.err {
            builder.field("error", err);
        }
        builder.finish()
    }
}
