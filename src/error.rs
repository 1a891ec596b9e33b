use std::error::Error as StdError;
use std::fmt;
use std::io;

use url::Url;

/// A `Result` alias where the `Err` case is `unirest::Error`.
pub type Result<T> = std::result::Result<T, Error>;

pub(crate) type BoxError = Box<dyn StdError + Send + Sync>;

/// The Errors that may occur when building, sending or reading a request.
///
/// Errors raised while sending are not returned by `send()` itself; they are
/// kept in the [`Response`](crate::Response) and surface on the first read.
pub struct Error {
    inner: Box<Inner>,
}

struct Inner {
    kind: Kind,
    source: Option<BoxError>,
    url: Option<Url>,
}

impl Error {
    pub(crate) fn new<E>(kind: Kind, source: Option<E>) -> Error
    where
        E: Into<BoxError>,
    {
        Error {
            inner: Box::new(Inner {
                kind,
                source: source.map(Into::into),
                url: None,
            }),
        }
    }

    /// Returns a possible URL related to this error.
    pub fn url(&self) -> Option<&Url> {
        self.inner.url.as_ref()
    }

    /// Returns a mutable reference to the URL related to this error.
    ///
    /// This is useful if you need to remove sensitive information from the URL
    /// (e.g. an API key in the query), but do not want to remove the URL
    /// entirely.
    pub fn url_mut(&mut self) -> Option<&mut Url> {
        self.inner.url.as_mut()
    }

    /// Add a url related to this error (overwriting any existing)
    pub fn with_url(mut self, url: Url) -> Self {
        self.inner.url = Some(url);
        self
    }

    /// Strip the related url from this error (if, for example, it contains
    /// sensitive information)
    pub fn without_url(mut self) -> Self {
        self.inner.url = None;
        self
    }

    /// Returns true if the error is from a malformed URL or header.
    pub fn is_builder(&self) -> bool {
        matches!(self.inner.kind, Kind::Builder)
    }

    /// Returns true if a raw or JSON body was combined with form fields or
    /// file attachments.
    pub fn is_conflict(&self) -> bool {
        matches!(self.inner.kind, Kind::Conflict)
    }

    /// Returns true if the query, form or multipart encoding failed.
    pub fn is_encode(&self) -> bool {
        matches!(self.inner.kind, Kind::Encode)
    }

    /// Returns true if the error happened while sending the request.
    pub fn is_request(&self) -> bool {
        matches!(self.inner.kind, Kind::Request)
    }

    /// Returns true if the error is related to connecting.
    pub fn is_connect(&self) -> bool {
        let mut source = self.source();

        while let Some(err) = source {
            if let Some(hyper_err) = err.downcast_ref::<hyper_util::client::legacy::Error>() {
                if hyper_err.is_connect() {
                    return true;
                }
            }

            source = err.source();
        }

        false
    }

    /// Returns true if the error is related to a timeout.
    pub fn is_timeout(&self) -> bool {
        let mut source = self.source();

        while let Some(err) = source {
            if err.is::<TimedOut>() {
                return true;
            }
            if let Some(io) = err.downcast_ref::<io::Error>() {
                if io.kind() == io::ErrorKind::TimedOut {
                    return true;
                }
            }
            source = err.source();
        }

        false
    }

    /// Returns true if the error happened while reading the response body.
    pub fn is_body(&self) -> bool {
        matches!(self.inner.kind, Kind::Body)
    }

    /// Returns true if the response body could not be decoded.
    #[cfg(feature = "json")]
    #[cfg_attr(docsrs, doc(cfg(feature = "json")))]
    pub fn is_decode(&self) -> bool {
        matches!(self.inner.kind, Kind::Decode)
    }

    /// Returns true if a response was read whose request was never sent.
    pub fn is_not_sent(&self) -> bool {
        matches!(self.inner.kind, Kind::NotSent)
    }

    /// Returns true if the response body was already read.
    pub fn is_consumed(&self) -> bool {
        matches!(self.inner.kind, Kind::Consumed)
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut builder = f.debug_struct("unirest::Error");

        builder.field("kind", &self.inner.kind);

        if let Some(ref url) = self.inner.url {
            builder.field("url", &url.as_str());
        }
        if let Some(ref source) = self.inner.source {
            builder.field("source", source);
        }

        builder.finish()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.inner.kind {
            Kind::Builder => f.write_str("builder error")?,
            Kind::Conflict => f.write_str("cannot send this request with multiple content types")?,
            Kind::Encode => f.write_str("error encoding request")?,
            Kind::Request => f.write_str("error sending request")?,
            Kind::Body => f.write_str("request or response body error")?,
            #[cfg(feature = "json")]
            Kind::Decode => f.write_str("error decoding response body")?,
            Kind::NotSent => f.write_str("the request is not sent")?,
            Kind::Consumed => f.write_str("response body already consumed")?,
        }

        if let Some(url) = &self.inner.url {
            write!(f, " for url ({})", url.as_str())?;
        }

        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner.source.as_ref().map(|e| &**e as _)
    }
}

#[derive(Debug)]
pub(crate) enum Kind {
    Builder,
    Conflict,
    Encode,
    Request,
    Body,
    #[cfg(feature = "json")]
    Decode,
    NotSent,
    Consumed,
}

// constructors

pub(crate) fn builder<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Builder, Some(e))
}

pub(crate) fn conflict(url: Url) -> Error {
    Error::new(Kind::Conflict, None::<Error>).with_url(url)
}

pub(crate) fn encode<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Encode, Some(e))
}

pub(crate) fn request<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Request, Some(e))
}

pub(crate) fn body<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Body, Some(e))
}

#[cfg(feature = "json")]
pub(crate) fn decode<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Decode, Some(e))
}

pub(crate) fn not_sent() -> Error {
    Error::new(Kind::NotSent, None::<Error>)
}

pub(crate) fn consumed(url: Option<Url>) -> Error {
    let err = Error::new(Kind::Consumed, None::<Error>);
    match url {
        Some(url) => err.with_url(url),
        None => err,
    }
}

#[derive(Debug)]
pub(crate) struct TimedOut;

impl fmt::Display for TimedOut {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("operation timed out")
    }
}

impl StdError for TimedOut {}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn test_source_chain() {
        let root = Error::new(Kind::Request, None::<Error>);
        assert!(root.source().is_none());

        let link = super::body(root);
        assert!(link.source().is_some());
        assert_send::<Error>();
        assert_sync::<Error>();
    }

    #[test]
    fn mem_size_of() {
        use std::mem::size_of;
        assert_eq!(size_of::<Error>(), size_of::<usize>());
    }

    #[test]
    fn roundtrip_io_error() {
        let orig = super::request(io::Error::new(io::ErrorKind::Other, "orig"));
        let io = io::Error::new(io::ErrorKind::Other, orig);
        let err = super::body(io);
        match err.source() {
            Some(e) => {
                let io = e.downcast_ref::<io::Error>().expect("io::Error");
                assert!(io.get_ref().is_some());
            }
            None => panic!("expected io error source"),
        }
    }

    #[test]
    fn is_timeout() {
        let err = super::request(TimedOut);
        assert!(err.is_timeout());
        assert!(err.is_request());

        let io = io::Error::from(io::ErrorKind::TimedOut);
        let nested = super::request(io);
        assert!(nested.is_timeout());

        let other = super::request(io::Error::from(io::ErrorKind::ConnectionReset));
        assert!(!other.is_timeout());
    }

    #[test]
    fn conflict_carries_url() {
        let url = Url::parse("http://example.com/upload").expect("url");
        let err = super::conflict(url);
        assert!(err.is_conflict());
        assert_eq!(
            err.to_string(),
            "cannot send this request with multiple content types for url (http://example.com/upload)"
        );
        assert!(err.without_url().url().is_none());
    }

    #[cfg(feature = "json")]
    #[test]
    fn decode_display() {
        let err = super::decode(io::Error::new(io::ErrorKind::InvalidData, "bad json"));
        assert!(err.is_decode());
        assert!(!err.is_body());
        assert_eq!(err.to_string(), "error decoding response body");
    }

    #[test]
    fn not_sent_and_consumed_display() {
        assert_eq!(super::not_sent().to_string(), "the request is not sent");
        let err = super::consumed(None);
        assert!(err.is_consumed());
        assert_eq!(err.to_string(), "response body already consumed");
    }
}
