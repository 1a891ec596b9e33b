use std::convert::Infallible;
use std::future::Future;
use std::net;
use std::sync::mpsc as std_mpsc;
use std::thread;
use std::time::Duration;

use bytes::Bytes;
use http_body_util::BodyExt;
use hyper::body::Incoming;
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tokio::runtime;
use tokio::sync::oneshot;

pub struct Server {
    addr: net::SocketAddr,
    panic_rx: std_mpsc::Receiver<()>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl Server {
    pub fn addr(&self) -> net::SocketAddr {
        self.addr
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }

        if !std::thread::panicking() {
            self.panic_rx
                .recv_timeout(Duration::from_secs(3))
                .expect("test server should not panic");
        }
    }
}

/// Spawns a server on its own thread and runtime, so it serves both async
/// and blocking tests. Every accepted connection is handled by `func`.
pub fn http<F, Fut>(func: F) -> Server
where
    F: Fn(http::Request<Incoming>) -> Fut + Clone + Send + 'static,
    Fut: Future<Output = http::Response<String>> + Send + 'static,
{
    let listener = net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    listener.set_nonblocking(true).unwrap();

    let (shutdown_tx, mut shutdown_rx) = oneshot::channel();
    let (panic_tx, panic_rx) = std_mpsc::channel();

    let tname = format!(
        "test({})-support-server",
        thread::current().name().unwrap_or("<unknown>")
    );
    thread::Builder::new()
        .name(tname)
        .spawn(move || {
            let rt = runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("new rt");

            rt.block_on(async move {
                let listener = TcpListener::from_std(listener).unwrap();
                loop {
                    tokio::select! {
                        res = listener.accept() => {
                            let (stream, _) = res.unwrap();
                            let func = func.clone();
                            tokio::spawn(async move {
                                let svc = hyper::service::service_fn(move |req| {
                                    let fut = func(req);
                                    async move { Ok::<_, Infallible>(fut.await) }
                                });
                                let _ = hyper::server::conn::http1::Builder::new()
                                    .serve_connection(TokioIo::new(stream), svc)
                                    .await;
                            });
                        }
                        _ = &mut shutdown_rx => {
                            break;
                        }
                    }
                }
            });
            let _ = panic_tx.send(());
        })
        .expect("thread spawn");

    Server {
        addr,
        panic_rx,
        shutdown_tx: Some(shutdown_tx),
    }
}

/// Collects a request body inside a handler.
pub async fn body(body: Incoming) -> Bytes {
    body.collect().await.expect("request body").to_bytes()
}

/// Parses an `application/x-www-form-urlencoded` or query string into pairs.
pub fn pairs(encoded: &[u8]) -> Vec<(String, String)> {
    url::form_urlencoded::parse(encoded).into_owned().collect()
}

/// The values of `key` in `pairs`, in order.
pub fn values<'a>(pairs: &'a [(String, String)], key: &str) -> Vec<&'a str> {
    pairs
        .iter()
        .filter(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
        .collect()
}
