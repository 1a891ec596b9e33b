use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bytes::Bytes;
use http::header::{
    HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE, USER_AGENT,
};
use http::Method;
use serde::Serialize;
use url::Url;

use crate::multipart::Form;
use crate::{Body, Client, Request, Response};

static DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// How a [`RequestBuilder`] treats its state when a mutator is called.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    /// Every mutator copies the state first and returns a new, independent
    /// builder. The receiver is never changed, so it can be kept as a
    /// template and branched from, even across threads.
    #[default]
    Shared,
    /// Every mutator changes the state in place and returns a handle to that
    /// same state. Cheaper, but meant for a single writer.
    Exclusive,
}

/// A fluent builder accumulating everything needed to make a request.
///
/// Every method takes `&self` and returns a `RequestBuilder`. Whether that
/// is a fresh copy or the same state depends on the builder's [`Mode`],
/// which defaults to [`Mode::Shared`]:
///
/// ```
/// let template = unirest::new()
///     .url("https://example.com/api/")
///     .header("Accept", "application/json");
///
/// let users = template.append_path("users");
/// let teams = template.append_path("teams");
///
/// assert_eq!(users.build()?.url().as_str(), "https://example.com/api/users");
/// assert_eq!(teams.build()?.url().as_str(), "https://example.com/api/teams");
/// assert_eq!(template.build()?.url().as_str(), "https://example.com/api");
/// # Ok::<(), unirest::Error>(())
/// ```
///
/// `Clone` is always a deep copy, independent of the mode.
pub struct RequestBuilder {
    state: Arc<Mutex<State>>,
}

#[derive(Clone)]
struct State {
    query: BTreeMap<String, Vec<String>>,
    headers: Vec<(String, String)>,
    form: BTreeMap<String, Vec<String>>,
    files: Vec<FilePart>,
    url: String,
    path: String,
    body: Option<Bytes>,
    method: Method,
    basic_auth: (String, String),
    mode: Mode,
}

#[derive(Clone)]
struct FilePart {
    key: String,
    file_name: String,
    content: Bytes,
}

impl Default for State {
    fn default() -> State {
        State {
            query: BTreeMap::new(),
            headers: Vec::new(),
            form: BTreeMap::new(),
            files: Vec::new(),
            url: String::new(),
            path: String::new(),
            body: None,
            method: Method::GET,
            basic_auth: (String::new(), String::new()),
            mode: Mode::Shared,
        }
    }
}

impl RequestBuilder {
    /// Creates a builder for a `GET` request in [`Mode::Shared`].
    pub fn new() -> RequestBuilder {
        RequestBuilder::from_state(State::default())
    }

    fn from_state(state: State) -> RequestBuilder {
        RequestBuilder {
            state: Arc::new(Mutex::new(state)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Applies `f` according to the current mode: on a copy in
    /// `Mode::Shared`, in place in `Mode::Exclusive`.
    fn apply<F>(&self, f: F) -> RequestBuilder
    where
        F: FnOnce(&mut State),
    {
        let mut state = self.lock();
        let mode = state.mode;
        match mode {
            Mode::Exclusive => {
                f(&mut *state);
                RequestBuilder {
                    state: Arc::clone(&self.state),
                }
            }
            Mode::Shared => {
                let mut copy = state.clone();
                drop(state);
                f(&mut copy);
                RequestBuilder::from_state(copy)
            }
        }
    }

    /// Returns the current [`Mode`].
    pub fn mode(&self) -> Mode {
        self.lock().mode
    }

    /// Switches between [`Mode::Shared`] (`true`) and [`Mode::Exclusive`]
    /// (`false`).
    ///
    /// The switch itself obeys the current mode: a shared builder returns a
    /// copy carrying the new mode, which makes it easy to branch a cheap
    /// one-shot builder off a template without touching the template.
    ///
    /// On an exclusive builder the switch happens in place, so every handle
    /// to that state sees it. `auto_clone(true)` turns all of them back to
    /// [`Mode::Shared`], and `auto_clone(false)` does not copy: later calls
    /// through the returned handle still change the receiver. Use
    /// [`Clone`] to detach an independent copy first.
    pub fn auto_clone(&self, enabled: bool) -> RequestBuilder {
        let mode = if enabled {
            Mode::Shared
        } else {
            Mode::Exclusive
        };
        self.apply(|state| state.mode = mode)
    }

    /// Sets the base URL. Trailing slashes are dropped.
    pub fn url(&self, base: &str) -> RequestBuilder {
        let base = base.trim_end_matches('/').to_owned();
        self.apply(move |state| state.url = base)
    }

    /// Appends a path segment to the URL.
    ///
    /// Each segment is joined with exactly one `/`, and trailing slashes are
    /// dropped, so `"p1"`, `"/p2"`, `""` and `"/p3/"` append `/p1/p2/p3`.
    /// Empty segments are ignored.
    pub fn append_path(&self, segment: &str) -> RequestBuilder {
        let segment = segment.trim_end_matches('/');
        let segment = if segment.is_empty() || segment.starts_with('/') {
            segment.to_owned()
        } else {
            format!("/{segment}")
        };
        self.apply(move |state| state.path.push_str(&segment))
    }

    /// Adds a query parameter. Repeated keys keep every value in call order.
    pub fn query(&self, key: &str, value: &str) -> RequestBuilder {
        self.apply(|state| push_value(&mut state.query, key, value))
    }

    /// Adds a header. Repeated names keep every value in call order.
    ///
    /// Names and values are validated when the request is built.
    pub fn header(&self, key: &str, value: &str) -> RequestBuilder {
        self.apply(|state| state.headers.push((key.to_owned(), value.to_owned())))
    }

    /// Adds a form field and switches the method to `POST`.
    ///
    /// Fields are sent `application/x-www-form-urlencoded`, or as
    /// multipart parts when files are attached too.
    pub fn form_field(&self, key: &str, value: &str) -> RequestBuilder {
        self.apply(|state| {
            push_value(&mut state.form, key, value);
            state.method = Method::POST;
        })
    }

    /// Attaches a file and switches the method to `POST`.
    ///
    /// Several files may share the same `key`; they are sent in the order
    /// they were attached.
    pub fn file<T>(&self, key: &str, file_name: &str, content: T) -> RequestBuilder
    where
        T: Into<Bytes>,
    {
        let part = FilePart {
            key: key.to_owned(),
            file_name: file_name.to_owned(),
            content: content.into(),
        };
        self.apply(move |state| {
            state.files.push(part);
            state.method = Method::POST;
        })
    }

    /// Sets HTTP basic authentication. It is only applied when `username` is
    /// not empty.
    pub fn basic_auth(&self, username: &str, password: &str) -> RequestBuilder {
        self.apply(|state| state.basic_auth = (username.to_owned(), password.to_owned()))
    }

    /// Sets a JSON body, the `Content-Type: application/json` header, and
    /// switches the method to `POST`.
    ///
    /// The bytes are sent as given; serialize beforehand, e.g. with
    /// `serde_json::to_vec`.
    pub fn json_body<T>(&self, json: T) -> RequestBuilder
    where
        T: Into<Bytes>,
    {
        let json = json.into();
        self.apply(move |state| {
            remove_header(&mut state.headers, CONTENT_TYPE.as_str());
            state
                .headers
                .push((CONTENT_TYPE.to_string(), mime::APPLICATION_JSON.to_string()));
            state.body = Some(json);
            state.method = Method::POST;
        })
    }

    /// Sets a raw body, removes any `Content-Type` header, and switches the
    /// method to `POST`.
    pub fn raw_body<T>(&self, body: T) -> RequestBuilder
    where
        T: Into<Bytes>,
    {
        let body = body.into();
        self.apply(move |state| {
            remove_header(&mut state.headers, CONTENT_TYPE.as_str());
            state.body = Some(body);
            state.method = Method::POST;
        })
    }

    /// Forces the method to `GET`.
    pub fn get(&self) -> RequestBuilder {
        self.apply(|state| state.method = Method::GET)
    }

    /// Forces the method to `POST`.
    pub fn post(&self) -> RequestBuilder {
        self.apply(|state| state.method = Method::POST)
    }

    /// Materializes the accumulated state into a [`Request`].
    ///
    /// # Errors
    ///
    /// Fails if the URL does not parse, a header name or value is invalid,
    /// the query or form cannot be encoded, or a raw/JSON body is combined
    /// with form fields or files.
    pub fn build(&self) -> crate::Result<Request> {
        let state = self.lock().clone();
        state.materialize()
    }

    /// Builds the request and sends it with a default [`Client`].
    ///
    /// This never fails directly: construction and transport errors are
    /// kept in the returned [`Response`] and reported when it is read.
    pub async fn send(&self) -> Response {
        self.send_with(&Client::new()).await
    }

    /// Builds the request and sends it with the given [`Client`].
    pub async fn send_with(&self, client: &Client) -> Response {
        match self.build() {
            Ok(req) => client.execute(req).await,
            Err(err) => {
                log::debug!("request not sent: {err}");
                Response::failed(err)
            }
        }
    }
}

impl State {
    fn materialize(self) -> crate::Result<Request> {
        let mut headers = HeaderMap::with_capacity(self.headers.len() + 2);
        for (key, value) in &self.headers {
            let name = HeaderName::from_bytes(key.as_bytes()).map_err(crate::error::builder)?;
            let value = HeaderValue::from_str(value).map_err(crate::error::builder)?;
            headers.append(name, value);
        }
        headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));

        let (ref username, ref password) = self.basic_auth;
        if !username.is_empty() {
            headers.insert(AUTHORIZATION, crate::util::basic_auth(username, Some(password)));
        }

        let target = format!("{}{}", self.url, self.path);
        let mut url = Url::parse(&target).map_err(crate::error::builder)?;

        if !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            pairs.clear();
            let serializer = serde_urlencoded::Serializer::new(&mut pairs);
            flatten(&self.query)
                .serialize(serializer)
                .map_err(crate::error::encode)?;
        }

        if self.body.is_some() && (!self.files.is_empty() || !self.form.is_empty()) {
            return Err(crate::error::conflict(url));
        }

        let body = if let Some(body) = self.body {
            Some(body)
        } else if !self.files.is_empty() {
            let mut form = Form::new();
            for file in &self.files {
                form.file(&file.key, &file.file_name, &file.content);
            }
            for (key, value) in flatten(&self.form) {
                form.text(key, value);
            }
            log::trace!("multipart body with boundary {}", form.boundary());
            headers.insert(
                CONTENT_TYPE,
                HeaderValue::from_str(&form.content_type()).map_err(crate::error::encode)?,
            );
            Some(form.finish())
        } else if !self.form.is_empty() {
            let encoded = serde_urlencoded::to_string(flatten(&self.form))
                .map_err(crate::error::encode)?;
            headers.insert(
                CONTENT_TYPE,
                HeaderValue::from_static("application/x-www-form-urlencoded"),
            );
            Some(Bytes::from(encoded))
        } else {
            None
        };

        let mut req = Request::new(self.method, url);
        if let Some(body) = body {
            headers.insert(CONTENT_LENGTH, HeaderValue::from(body.len()));
            *req.body_mut() = Some(Body::from(body));
        }
        *req.headers_mut() = headers;

        log::trace!("built {} request for {}", req.method(), req.url());
        Ok(req)
    }
}

fn push_value(map: &mut BTreeMap<String, Vec<String>>, key: &str, value: &str) {
    map.entry(key.to_owned()).or_default().push(value.to_owned());
}

fn remove_header(headers: &mut Vec<(String, String)>, name: &str) {
    headers.retain(|(key, _)| !key.eq_ignore_ascii_case(name));
}

// keys sorted, values in insertion order
fn flatten(map: &BTreeMap<String, Vec<String>>) -> Vec<(&str, &str)> {
    map.iter()
        .flat_map(|(key, values)| values.iter().map(move |value| (key.as_str(), value.as_str())))
        .collect()
}

impl Default for RequestBuilder {
    fn default() -> RequestBuilder {
        RequestBuilder::new()
    }
}

impl Clone for RequestBuilder {
    /// Deep copies the builder. The copy keeps the current [`Mode`].
    fn clone(&self) -> RequestBuilder {
        RequestBuilder::from_state(self.lock().clone())
    }
}

impl fmt::Debug for RequestBuilder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("RequestBuilder")
            .field("method", &state.method)
            .field("url", &state.url)
            .field("path", &state.path)
            .field("query", &state.query)
            .field("headers", &state.headers)
            .field("form", &state.form.keys().collect::<Vec<_>>())
            .field("files", &state.files.len())
            .field("mode", &state.mode)
            .finish()
    }
}
