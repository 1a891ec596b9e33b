use std::convert::TryFrom;
use std::fmt;
use std::time::Duration;

use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;

use crate::error::TimedOut;
use crate::{Body, Request, Response};

#[cfg(feature = "rustls-tls")]
type Connector = hyper_rustls::HttpsConnector<HttpConnector>;
#[cfg(not(feature = "rustls-tls"))]
type Connector = HttpConnector;

type HyperClient = hyper_util::client::legacy::Client<Connector, Body>;

/// An asynchronous `Client` executing [`Request`]s.
///
/// The client is the transport behind
/// [`RequestBuilder::send_with`](crate::RequestBuilder::send_with).
/// Connection pooling, TLS and timeouts are its concern; the builder only
/// produces requests.
#[derive(Clone)]
pub struct Client {
    hyper: HyperClient,
    timeout: Option<Duration>,
}

/// A `ClientBuilder` can be used to create a `Client` with custom
/// configuration.
#[must_use]
pub struct ClientBuilder {
    config: Config,
}

struct Config {
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    pool_idle_timeout: Option<Duration>,
    pool_max_idle_per_host: usize,
    nodelay: bool,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientBuilder {
    /// Constructs a new `ClientBuilder`.
    pub fn new() -> ClientBuilder {
        ClientBuilder {
            config: Config {
                timeout: None,
                connect_timeout: None,
                pool_idle_timeout: Some(Duration::from_secs(90)),
                pool_max_idle_per_host: usize::MAX,
                nodelay: true,
            },
        }
    }

    /// Returns a `Client` that uses this `ClientBuilder` configuration.
    pub fn build(self) -> Client {
        let config = self.config;

        let mut http = HttpConnector::new();
        http.set_connect_timeout(config.connect_timeout);
        http.set_nodelay(config.nodelay);
        http.enforce_http(false);

        let connector = build_connector(http);

        let hyper = hyper_util::client::legacy::Client::builder(TokioExecutor::new())
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .build(connector);

        Client {
            hyper,
            timeout: config.timeout,
        }
    }

    /// Enables a total request timeout.
    ///
    /// The timeout is applied from when the request starts connecting until
    /// the response headers are received.
    ///
    /// Default is no timeout.
    pub fn timeout(mut self, timeout: Duration) -> ClientBuilder {
        self.config.timeout = Some(timeout);
        self
    }

    /// Set a timeout for only the connect phase of a `Client`.
    ///
    /// Default is `None`.
    pub fn connect_timeout(mut self, timeout: Duration) -> ClientBuilder {
        self.config.connect_timeout = Some(timeout);
        self
    }

    /// Set an optional timeout for idle sockets being kept-alive.
    ///
    /// Pass `None` to disable timeout.
    ///
    /// Default is 90 seconds.
    pub fn pool_idle_timeout<D>(mut self, val: D) -> ClientBuilder
    where
        D: Into<Option<Duration>>,
    {
        self.config.pool_idle_timeout = val.into();
        self
    }

    /// Sets the maximum idle connection per host allowed in the pool.
    pub fn pool_max_idle_per_host(mut self, max: usize) -> ClientBuilder {
        self.config.pool_max_idle_per_host = max;
        self
    }

    /// Set whether sockets have `TCP_NODELAY` enabled.
    ///
    /// Default is `true`.
    pub fn tcp_nodelay(mut self, enabled: bool) -> ClientBuilder {
        self.config.nodelay = enabled;
        self
    }
}

#[cfg(feature = "rustls-tls")]
fn build_connector(http: HttpConnector) -> Connector {
    hyper_rustls::HttpsConnectorBuilder::new()
        .with_webpki_roots()
        .https_or_http()
        .enable_http1()
        .wrap_connector(http)
}

#[cfg(not(feature = "rustls-tls"))]
fn build_connector(http: HttpConnector) -> Connector {
    http
}

impl Client {
    /// Constructs a new `Client` with the default configuration.
    pub fn new() -> Client {
        ClientBuilder::new().build()
    }

    /// Creates a `ClientBuilder` to configure a `Client`.
    ///
    /// This is the same as `ClientBuilder::new()`.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Executes a `Request`.
    ///
    /// Failures are not returned here; they are kept in the `Response` and
    /// reported when its body is read.
    pub async fn execute(&self, request: Request) -> Response {
        let url = request.url().clone();
        let req = match http::Request::<Body>::try_from(request) {
            Ok(req) => req,
            Err(err) => return Response::failed(err),
        };

        let fut = self.hyper.request(req);
        let res = match self.timeout {
            Some(timeout) => match tokio::time::timeout(timeout, fut).await {
                Ok(res) => res,
                Err(_elapsed) => {
                    log::debug!("request to {} timed out", url);
                    return Response::failed(crate::error::request(TimedOut).with_url(url));
                }
            },
            None => fut.await,
        };

        match res {
            Ok(res) => Response::new(res, url),
            Err(err) => {
                log::debug!("error sending request to {}: {}", url, err);
                Response::failed(crate::error::request(err).with_url(url))
            }
        }
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut builder = f.debug_struct("Client");
        if let Some(ref d) = self.timeout {
            builder.field("timeout", d);
        }
        builder.finish()
    }
}

impl fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut builder = f.debug_struct("ClientBuilder");
        if let Some(ref d) = self.config.timeout {
            builder.field("timeout", d);
        }
        if let Some(ref d) = self.config.connect_timeout {
            builder.field("connect_timeout", d);
        }
        builder
            .field("pool_idle_timeout", &self.config.pool_idle_timeout)
            .field("pool_max_idle_per_host", &self.config.pool_max_idle_per_host)
            .field("tcp_nodelay", &self.config.nodelay)
            .finish()
    }
}
