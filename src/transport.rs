use std::future::Future;
use std::time::Instant;

use cookie::{Cookie, CookieJar};
use http::{header, HeaderMap, Method, StatusCode};
use hyper::client::HttpConnector;
use hyper::{Body, Client};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;
use url::Url;

use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Str(String),
    Bool(bool),
    Int(i64),
}

impl From<&str> for Value {
    fn from(s : &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s : String) -> Self {
        Value::Str(s)
    }
}

impl From<bool> for Value {
    fn from(b : bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n : i64) -> Self {
        Value::Int(n)
    }
}

pub type Payload = Vec<(&'static str, Value)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// `application/x-www-form-urlencoded` request body.
    Form,
    /// Same encoding, appended to the path as a query string.
    Query,
}

#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method :   Method,
    pub path :     String,
    pub payload :  Payload,
    pub encoding : Encoding,
}

impl ApiRequest {
    pub fn get(path : &str) -> Self {
        Self {
            method :   Method::GET,
            path :     path.to_string(),
            payload :  Vec::new(),
            encoding : Encoding::Query,
        }
    }

    pub fn form(path : &str) -> Self {
        Self {
            method :   Method::POST,
            path :     path.to_string(),
            payload :  Vec::new(),
            encoding : Encoding::Form,
        }
    }

    pub fn field(mut self, name : &'static str, value : impl Into<Value>) -> Self {
        self.payload.push((name, value.into()));
        self
    }

    pub fn encoded(&self) -> Result<String> {
        Ok(serde_urlencoded::to_string(&self.payload)?)
    }

    /// Looks up a payload field, mostly useful for asserting on sent requests.
    pub fn value(&self, name : &str) -> Option<&Value> {
        self.payload
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value)
    }
}

/// One-shot notice the server leaves in a cookie next to a redirect. The
/// value is `<kind length>:<kind><message>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub kind :    String,
    pub message : String,
}

impl Flash {
    pub const COOKIE : &'static str = "_flash";

    pub fn parse(value : &str) -> Option<Flash> {
        let (len, rest) = value.split_once(':')?;
        let len : usize = len.parse().ok()?;

        Some(Flash {
            kind :    rest.get(..len)?.to_string(),
            message : rest.get(len..)?.to_string(),
        })
    }

    pub fn is_success(&self) -> bool {
        self.kind == "success"
    }
}

#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status :   StatusCode,
    pub location : Option<String>,
    pub flash :    Option<Flash>,
    pub body :     Vec<u8>,
}

impl ApiResponse {
    pub fn is_ok(&self) -> bool {
        self.status == StatusCode::OK
    }

    pub fn json<T : DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// Issues exactly one request per call. No retries, redirects are not
/// followed.
pub trait Transport {
    fn send(
        &self,
        req : ApiRequest,
    ) -> impl Future<Output = Result<ApiResponse>> + Send;
}

pub struct HttpTransport {
    base :   Url,
    client : Client<HttpsConnector<HttpConnector>>,
    jar :    Mutex<CookieJar>,
}

impl HttpTransport {
    pub fn new(base : &str) -> Result<Self> {
        let mut base = Url::parse(base)?;

        if !matches!(base.scheme(), "http" | "https") || base.cannot_be_a_base() {
            return Err(Error::InvalidBaseUrl(base.to_string()));
        }

        // paths are joined relative to the base, keep its last segment
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let connector = HttpsConnectorBuilder::new()
            .with_webpki_roots()
            .https_or_http()
            .enable_http1()
            .build();

        Ok(Self {
            base,
            client : Client::builder().build(connector),
            jar : Mutex::new(CookieJar::new()),
        })
    }

    /// Seeds the jar with a `name=value` session cookie.
    pub fn with_session(mut self, session : &str) -> Result<Self> {
        let cookie = Cookie::parse(session.to_string())
            .map_err(|err| Error::InvalidCookie(err.to_string()))?;

        self.jar.get_mut().add(cookie);

        Ok(self)
    }

    /// The `Cookie` header the next request would carry.
    pub async fn session(&self) -> Option<String> {
        let jar = self.jar.lock().await;

        let pairs = jar
            .iter()
            .map(|c| format!("{}={}", c.name(), c.value()))
            .collect::<Vec<_>>();

        if pairs.is_empty() {
            None
        } else {
            Some(pairs.join("; "))
        }
    }

    fn resolve(&self, path : &str) -> Result<Url> {
        Ok(self.base.join(path.trim_start_matches('/'))?)
    }

    /// Stores the cookies a response sets and drops the ones it clears. The
    /// flash cookie is handed back instead of being kept.
    async fn remember(&self, headers : &HeaderMap) -> Option<Flash> {
        let mut jar = self.jar.lock().await;
        let mut flash = None;

        for value in headers.get_all(header::SET_COOKIE) {
            let parsed = value
                .to_str()
                .ok()
                .and_then(|s| Cookie::parse_encoded(s.to_string()).ok());

            match parsed {
                Some(cookie) if cookie.name() == Flash::COOKIE => {
                    if !cookie.value().is_empty() {
                        flash = Flash::parse(cookie.value());
                    }
                },
                Some(cookie) if cookie.value().is_empty() => {
                    tracing::debug!(name = cookie.name(), "cookie cleared");
                    jar.remove(Cookie::named(cookie.name().to_string()));
                },
                Some(cookie) => jar.add(cookie),
                None => tracing::warn!(?value, "ignoring malformed set-cookie"),
            }
        }

        flash
    }
}

impl Transport for HttpTransport {
    async fn send(&self, req : ApiRequest) -> Result<ApiResponse> {
        let started = Instant::now();
        let mut url = self.resolve(&req.path)?;
        let encoded = req.encoded()?;

        let mut builder = http::Request::builder().method(req.method.clone());

        let body = match req.encoding {
            Encoding::Form => {
                builder = builder.header(
                    header::CONTENT_TYPE,
                    "application/x-www-form-urlencoded",
                );
                Body::from(encoded)
            },
            Encoding::Query => {
                if !encoded.is_empty() {
                    url.set_query(Some(&encoded));
                }
                builder = builder.header(header::ACCEPT, "application/json");
                Body::empty()
            },
        };

        if let Some(cookies) = self.session().await {
            builder = builder.header(header::COOKIE, cookies);
        }

        let request = builder.uri(url.as_str()).body(body)?;
        let response = self.client.request(request).await?;

        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let flash = self.remember(response.headers()).await;

        let body = hyper::body::to_bytes(response.into_body()).await?;

        tracing::debug!(
            method = %req.method,
            path = %req.path,
            status = status.as_u16(),
            elapsed = ?started.elapsed(),
            "api request"
        );

        Ok(ApiResponse {
            status,
            location,
            flash,
            body : body.to_vec(),
        })
    }
}
