//! multipart/form-data
use std::fmt;

use bytes::{Bytes, BytesMut};
use mime_guess::Mime;

/// An in-memory multipart/form-data body.
///
/// Parts are written in the order they are added; the closing boundary is
/// appended by [`Form::finish`].
pub(crate) struct Form {
    boundary: String,
    buf: BytesMut,
    parts: usize,
}

impl Form {
    pub(crate) fn new() -> Form {
        Form {
            boundary: gen_boundary(),
            buf: BytesMut::new(),
            parts: 0,
        }
    }

    pub(crate) fn boundary(&self) -> &str {
        &self.boundary
    }

    /// The `Content-Type` header value announcing this form's boundary.
    pub(crate) fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Writes a file part. The part's mime is guessed from `file_name`.
    pub(crate) fn file(&mut self, name: &str, file_name: &str, content: &[u8]) {
        let mime = mime_guess::from_path(file_name).first_or_octet_stream();
        self.write_part(name, Some(file_name), Some(&mime), content);
    }

    /// Writes a plain text field.
    pub(crate) fn text(&mut self, name: &str, value: &str) {
        self.write_part(name, None, None, value.as_bytes());
    }

    pub(crate) fn finish(mut self) -> Bytes {
        if self.parts != 0 {
            self.buf.extend_from_slice(b"--");
            self.buf.extend_from_slice(self.boundary.as_bytes());
            self.buf.extend_from_slice(b"--\r\n");
        }
        self.buf.freeze()
    }

    fn write_part(&mut self, name: &str, file_name: Option<&str>, mime: Option<&Mime>, value: &[u8]) {
        self.buf.extend_from_slice(b"--");
        self.buf.extend_from_slice(self.boundary.as_bytes());
        self.buf.extend_from_slice(b"\r\n");
        self.buf.extend_from_slice(&encode_headers(name, file_name, mime));
        self.buf.extend_from_slice(b"\r\n\r\n");
        self.buf.extend_from_slice(value);
        self.buf.extend_from_slice(b"\r\n");
        self.parts += 1;
    }
}

impl fmt::Debug for Form {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Form")
            .field("boundary", &self.boundary)
            .field("parts", &self.parts)
            .finish()
    }
}

fn encode_headers(name: &str, file_name: Option<&str>, mime: Option<&Mime>) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(b"Content-Disposition: form-data; name=\"");
    buf.extend_from_slice(escape_quoted(name).as_bytes());
    buf.extend_from_slice(b"\"");

    // According to RFC7578 Section 4.2, `filename*=` syntax is invalid.
    if let Some(file_name) = file_name {
        buf.extend_from_slice(b"; filename=\"");
        buf.extend_from_slice(escape_quoted(file_name).as_bytes());
        buf.extend_from_slice(b"\"");
    }

    if let Some(mime) = mime {
        buf.extend_from_slice(b"\r\nContent-Type: ");
        buf.extend_from_slice(mime.as_ref().as_bytes());
    }

    buf
}

// quoted-string content: non-ASCII is written as raw UTF-8
fn escape_quoted(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\r', "\\\r")
        .replace('\n', "\\\n")
}

fn gen_boundary() -> String {
    use crate::util::fast_random as random;

    let a = random();
    let b = random();
    let c = random();
    let d = random();

    format!("{a:016x}-{b:016x}-{c:016x}-{d:016x}")
}
