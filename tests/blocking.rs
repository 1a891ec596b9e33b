mod support;

use support::*;

use unirest::StatusCode;

#[test]
fn blocking_get() {
    let _ = env_logger::try_init();

    let server = server::http(move |req| async move {
        assert_eq!(req.uri().path(), "/text");
        assert_eq!(req.uri().query(), Some("lang=rust"));
        http::Response::new("Hello".into())
    });

    let client = unirest::blocking::Client::new().expect("client");
    let mut res = client.send(
        &unirest::new()
            .url(&server.url())
            .append_path("text")
            .query("lang", "rust"),
    );

    assert!(res.is_sent());
    assert_eq!(res.status(), Some(StatusCode::OK));
    assert_eq!(
        res.headers().map(|h| h["content-length"].clone()),
        Some("5".parse().unwrap())
    );
    assert_eq!(res.text().expect("text"), "Hello");
    assert!(res.text().unwrap_err().is_consumed());
}

#[test]
fn blocking_form_post() {
    let _ = env_logger::try_init();

    let server = server::http(move |req| async move {
        assert_eq!(req.method(), "POST");
        let form = server::pairs(&server::body(req.into_body()).await);
        assert_eq!(server::values(&form, "name"), ["unirest"]);
        http::Response::new("posted".into())
    });

    let client = unirest::blocking::Client::new().expect("client");
    let mut res = client.send(&unirest::new().url(&server.url()).form_field("name", "unirest"));
    assert_eq!(res.bytes().expect("bytes"), "posted");
}

#[test]
fn blocking_deferred_error() {
    let client = unirest::blocking::Client::new().expect("client");
    let mut res = client.send(
        &unirest::new()
            .url("http://localhost")
            .raw_body("raw")
            .file("f", "f.txt", "f"),
    );

    assert!(!res.is_sent());
    assert!(res.bytes().unwrap_err().is_conflict());
    assert!(res.bytes().unwrap_err().is_not_sent());
}

#[test]
fn blocking_execute_with_configured_client() {
    let _ = env_logger::try_init();

    let server = server::http(move |req| async move {
        http::Response::new(req.method().as_str().to_owned())
    });

    let client = unirest::blocking::Client::with_client(
        unirest::Client::builder().timeout(std::time::Duration::from_secs(5)),
    )
    .expect("client");

    let req = unirest::new()
        .url(&server.url())
        .post()
        .build()
        .expect("request");
    let mut res = client.execute(req);
    assert_eq!(res.text().expect("text"), "POST");
}
