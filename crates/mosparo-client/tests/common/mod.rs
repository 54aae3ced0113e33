//! In-process stub of the mosparo API.
//!
//! Serves canned JSON bodies keyed by path and query, and records every
//! request it receives so tests can assert on bodies and headers.

use std::collections::HashMap;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use mosparo_client::MosparoClient;
use mosparo_core::{Credentials, MosparoConfig};
use parking_lot::Mutex;
use tokio::net::TcpListener;

/// A request as received by the stub.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: http::Method,
    pub path_and_query: String,
    pub headers: HeaderMap,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

#[derive(Debug, Clone)]
struct Stub {
    status: StatusCode,
    body: String,
}

#[derive(Debug, Default)]
struct State {
    stubs: HashMap<String, Stub>,
    requests: Vec<RecordedRequest>,
}

/// Stub server bound to an ephemeral local port.
#[derive(Debug, Clone)]
pub struct StubServer {
    addr: SocketAddr,
    state: Arc<Mutex<State>>,
}

impl StubServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let state = Arc::new(Mutex::new(State::default()));

        let accept_state = Arc::clone(&state);
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let state = Arc::clone(&accept_state);
                tokio::spawn(async move {
                    let service = service_fn(move |req| handle(req, Arc::clone(&state)));
                    let _ = http1::Builder::new()
                        .serve_connection(TokioIo::new(stream), service)
                        .await;
                });
            }
        });

        Self { addr, state }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn stub_json(&self, path_and_query: &str, body: &str) {
        self.stub(path_and_query, StatusCode::OK, body);
    }

    pub fn stub(&self, path_and_query: &str, status: StatusCode, body: &str) {
        self.state.lock().stubs.insert(
            path_and_query.to_owned(),
            Stub {
                status,
                body: body.to_owned(),
            },
        );
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().requests.clone()
    }

    pub fn client(&self) -> MosparoClient {
        client_for(&self.url())
    }
}

/// Client for `url` using the test project's key pair.
pub fn client_for(url: &str) -> MosparoClient {
    let config = MosparoConfig::new(url, Credentials::new("publicKey", "privateKey"));
    let http = reqwest::Client::builder().no_proxy().build().unwrap();
    MosparoClient::with_http_client(&config, http).unwrap()
}

/// URL of a local port nothing listens on.
pub async fn closed_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

async fn handle(
    req: http::Request<Incoming>,
    state: Arc<Mutex<State>>,
) -> Result<http::Response<Full<Bytes>>, Infallible> {
    let (parts, incoming) = req.into_parts();
    let body = incoming
        .collect()
        .await
        .map(http_body_util::Collected::to_bytes)
        .unwrap_or_default();
    let path_and_query = parts
        .uri
        .path_and_query()
        .map_or_else(|| parts.uri.path().to_owned(), ToString::to_string);

    let stub = {
        let mut state = state.lock();
        state.requests.push(RecordedRequest {
            method: parts.method.clone(),
            path_and_query: path_and_query.clone(),
            headers: parts.headers.clone(),
            body: String::from_utf8_lossy(&body).into_owned(),
        });
        state.stubs.get(&path_and_query).cloned()
    };

    let stub = stub.unwrap_or(Stub {
        status: StatusCode::NOT_FOUND,
        body: String::new(),
    });

    let mut response = http::Response::new(Full::new(Bytes::from(stub.body)));
    *response.status_mut() = stub.status;
    response.headers_mut().insert(
        http::header::CONTENT_TYPE,
        http::HeaderValue::from_static("application/json"),
    );
    Ok(response)
}
