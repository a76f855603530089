#![allow(dead_code)]

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::service::service_fn;
use hyper::{Method, Request, Response};
use tokio::net::TcpListener;

use nowify::config::Config;
use nowify::spotify::{Credentials, NowPlayingFetcher};

pub const TOKEN_PATH: &str = "/api/token";
pub const NOW_PLAYING_PATH: &str = "/v1/me/player/currently-playing";

pub const SAMPLE: &str = r#"{
    "is_playing": true,
    "progress_ms": 65000,
    "item": {
        "name": "T",
        "duration_ms": 185000,
        "artists": [{ "name": "X" }, { "name": "Y" }],
        "album": { "name": "Album", "images": [{ "url": "A", "width": 640, "height": 640 }] },
        "external_urls": { "spotify": "U" }
    }
}"#;

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

#[derive(Debug, Clone)]
struct Canned {
    status: u16,
    body: String,
}

#[derive(Debug, Default)]
struct Routes {
    token: Option<Canned>,
    now_playing: Option<Canned>,
    requests: Vec<Recorded>,
}

/// Local stand-in for the accounts and web api hosts
#[derive(Clone)]
pub struct MockSpotify {
    addr: SocketAddr,
    routes: Arc<Mutex<Routes>>,
}

impl MockSpotify {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let routes = Arc::new(Mutex::new(Routes {
            token: Some(Canned {
                status: 200,
                body: r#"{"access_token":"tok","token_type":"Bearer","expires_in":3600}"#.into(),
            }),
            now_playing: Some(Canned {
                status: 200,
                body: SAMPLE.into(),
            }),
            requests: Vec::new(),
        }));

        let shared = routes.clone();
        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                let io = hyper_util::rt::TokioIo::new(stream);
                let routes = shared.clone();
                tokio::spawn(async move {
                    let service = service_fn(move |req| handle(req, routes.clone()));
                    if let Err(err) = hyper::server::conn::http1::Builder::new()
                        .serve_connection(io, service)
                        .await
                    {
                        eprintln!("mock server connection error: {err:?}");
                    }
                });
            }
        });

        Self { addr, routes }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn token(&self, status: u16, body: &str) {
        self.routes.lock().unwrap().token = Some(Canned {
            status,
            body: body.to_string(),
        });
    }

    pub fn now_playing(&self, status: u16, body: &str) {
        self.routes.lock().unwrap().now_playing = Some(Canned {
            status,
            body: body.to_string(),
        });
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.routes.lock().unwrap().requests.clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<Recorded> {
        self.requests().into_iter().filter(|r| r.path == path).collect()
    }

    pub fn config(&self) -> Config {
        let mut config = Config::default();
        config.token_url = self.url(TOKEN_PATH);
        config.now_playing_url = self.url(NOW_PLAYING_PATH);
        config
    }

    pub fn fetcher(&self) -> NowPlayingFetcher {
        self.fetcher_with(&self.config())
    }

    pub fn fetcher_with(&self, config: &Config) -> NowPlayingFetcher {
        NowPlayingFetcher::from_config(config, Credentials::new("id", "secret", "refresh"))
    }
}

async fn handle(
    req: Request<Incoming>,
    routes: Arc<Mutex<Routes>>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let authorization = header("authorization");
    let content_type = header("content-type");
    let body = match req.into_body().collect().await {
        Ok(collected) => String::from_utf8_lossy(&collected.to_bytes()).into_owned(),
        Err(_) => String::new(),
    };

    let canned = {
        let mut routes = routes.lock().unwrap();
        routes.requests.push(Recorded {
            method,
            path: path.clone(),
            authorization,
            content_type,
            body,
        });
        match path.as_str() {
            TOKEN_PATH => routes.token.clone(),
            NOW_PLAYING_PATH => routes.now_playing.clone(),
            _ => None,
        }
    };

    let canned = canned.unwrap_or(Canned {
        status: 404,
        body: String::new(),
    });
    Ok(Response::builder()
        .status(canned.status)
        .header("content-type", "application/json")
        .body(Full::new(Bytes::from(canned.body)))
        .unwrap())
}
