use std::convert::Infallible;
use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use http_body::{Body as HttpBody, Frame, SizeHint};

/// A request body.
///
/// Bodies are always fully buffered, so cloning one (or the `Request` that
/// holds it) yields a copy that reads again from the start. This is what
/// lets a transport replay a request after a retry or redirect.
#[derive(Clone, Default)]
pub struct Body {
    bytes: Bytes,
}

impl Body {
    /// Returns the bytes this body will send.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The exact length of the body.
    pub fn content_length(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub(crate) fn empty() -> Body {
        Body::default()
    }
}

impl HttpBody for Body {
    type Data = Bytes;
    type Error = Infallible;

    fn poll_frame(
        mut self: Pin<&mut Self>,
        _cx: &mut Context,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        if self.bytes.is_empty() {
            return Poll::Ready(None);
        }
        let chunk = std::mem::take(&mut self.bytes);
        Poll::Ready(Some(Ok(Frame::data(chunk))))
    }

    fn is_end_stream(&self) -> bool {
        self.bytes.is_empty()
    }

    fn size_hint(&self) -> SizeHint {
        SizeHint::with_exact(self.content_length())
    }
}

impl From<Bytes> for Body {
    #[inline]
    fn from(bytes: Bytes) -> Body {
        Body { bytes }
    }
}

impl From<Vec<u8>> for Body {
    #[inline]
    fn from(vec: Vec<u8>) -> Body {
        Bytes::from(vec).into()
    }
}

impl From<String> for Body {
    #[inline]
    fn from(s: String) -> Body {
        s.into_bytes().into()
    }
}

impl From<&'static [u8]> for Body {
    #[inline]
    fn from(s: &'static [u8]) -> Body {
        Bytes::from_static(s).into()
    }
}

impl From<&'static str> for Body {
    #[inline]
    fn from(s: &'static str) -> Body {
        s.as_bytes().into()
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Body")
            .field("length", &self.bytes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::Body;
    use http_body::Body as _;
    use http_body_util::BodyExt;

    #[test]
    fn test_as_bytes() {
        let body = Body::from("abc");
        assert_eq!(body.as_bytes(), b"abc");
        assert_eq!(body.content_length(), 3);
        assert_eq!(body.size_hint().exact(), Some(3));
    }

    #[test]
    fn test_empty() {
        let body = Body::empty();
        assert!(body.is_end_stream());
        assert_eq!(body.size_hint().exact(), Some(0));
    }

    #[tokio::test]
    async fn clone_replays_from_start() {
        let body = Body::from(b"replay me".to_vec());
        let copy = body.clone();

        let first = body.collect().await.expect("infallible").to_bytes();
        let second = copy.collect().await.expect("infallible").to_bytes();
        assert_eq!(first, "replay me");
        assert_eq!(first, second);
    }
}
