#[derive(Debug, PartialEq)]
pub struct Part {
    pub name: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub content: String,
}

/// A small multipart/form-data parser, good enough for text parts.
pub fn parse(content_type: &str, body: &[u8]) -> Vec<Part> {
    let boundary = content_type
        .strip_prefix("multipart/form-data; boundary=")
        .expect("multipart content type");
    let body = std::str::from_utf8(body).expect("text parts");
    let delimiter = format!("--{boundary}");

    let mut segments = body.split(delimiter.as_str());
    assert_eq!(segments.next(), Some(""), "body starts with a boundary");

    let mut parts = Vec::new();
    for segment in segments {
        if segment == "--\r\n" {
            break;
        }
        let segment = segment
            .strip_prefix("\r\n")
            .and_then(|s| s.strip_suffix("\r\n"))
            .expect("part framed by CRLF");
        let (head, content) = segment.split_once("\r\n\r\n").expect("part headers");

        let mut part = Part {
            name: String::new(),
            file_name: None,
            content_type: None,
            content: content.to_owned(),
        };
        for line in head.split("\r\n") {
            let (name, value) = line.split_once(": ").expect("header line");
            if name.eq_ignore_ascii_case("content-disposition") {
                part.name = param(value, "name").expect("part name");
                part.file_name = param(value, "filename");
            } else if name.eq_ignore_ascii_case("content-type") {
                part.content_type = Some(value.to_owned());
            }
        }
        parts.push(part);
    }
    parts
}

/// Reads a quoted parameter from a `Content-Disposition` value, undoing
/// backslash escapes.
fn param(value: &str, key: &str) -> Option<String> {
    let needle = format!("; {key}=\"");
    let start = value.find(&needle)? + needle.len();

    let mut out = String::new();
    let mut chars = value[start..].chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push(chars.next()?),
            '"' => return Some(out),
            c => out.push(c),
        }
    }
    None
}
