//! In-process HTTP client for crawler tests

use crate::crawler::client::{HttpClient, HttpRequest, HttpResponse};
use crate::FetchError;
use async_trait::async_trait;
use reqwest::Method;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Scripted behaviour for one URL
#[derive(Debug, Clone)]
pub struct MockRoute {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    pub delay: Duration,
    /// Number of leading requests that fail with a transport error
    pub fail_first: u32,
}

impl MockRoute {
    pub fn status(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
            delay: Duration::ZERO,
            fail_first: 0,
        }
    }

    pub fn html(body: &str) -> Self {
        Self::status(200)
            .header("content-type", "text/html; charset=utf-8")
            .body(body.as_bytes())
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn body(mut self, body: &[u8]) -> Self {
        self.body = body.to_vec();
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn fail_first(mut self, count: u32) -> Self {
        self.fail_first = count;
        self
    }

    pub fn unreachable() -> Self {
        Self::status(0).fail_first(u32::MAX)
    }
}

/// Routes requests by exact URL; unknown URLs answer 404
#[derive(Debug, Default)]
pub struct MockClient {
    routes: Mutex<HashMap<String, MockRoute>>,
    calls: Mutex<Vec<(Method, String)>>,
    active: AtomicUsize,
    peak: AtomicUsize,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(self, url: &str, route: MockRoute) -> Self {
        self.routes
            .lock()
            .unwrap()
            .insert(url.to_string(), route);
        self
    }

    /// Number of requests made to `url`, any method
    pub fn calls(&self, url: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, called)| called == url)
            .count()
    }

    pub fn calls_with(&self, method: &Method, url: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(m, called)| m == method && called == url)
            .count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Highest number of requests observed in flight at once
    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HttpClient for MockClient {
    async fn send(&self, request: HttpRequest) -> Result<Box<dyn HttpResponse>, FetchError> {
        self.calls
            .lock()
            .unwrap()
            .push((request.method.clone(), request.url.clone()));

        let route = {
            let mut routes = self.routes.lock().unwrap();
            match routes.get_mut(&request.url) {
                Some(route) if route.fail_first > 0 => {
                    route.fail_first -= 1;
                    Err(route.delay)
                }
                Some(route) => Ok(route.clone()),
                None => Ok(MockRoute::status(404)),
            }
        };

        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        let delay = match &route {
            Ok(route) => route.delay,
            Err(delay) => *delay,
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.active.fetch_sub(1, Ordering::SeqCst);

        match route {
            Ok(route) => Ok(Box::new(MockResponse {
                route,
                head: request.method == Method::HEAD,
            })),
            Err(_) => Err(FetchError::Transport("connection refused".to_string())),
        }
    }
}

struct MockResponse {
    route: MockRoute,
    head: bool,
}

#[async_trait]
impl HttpResponse for MockResponse {
    fn status(&self) -> u16 {
        self.route.status
    }

    fn header(&self, name: &str) -> Option<String> {
        self.route
            .headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.clone())
    }

    async fn bytes(self: Box<Self>) -> Result<Vec<u8>, FetchError> {
        if self.head {
            return Ok(Vec::new());
        }
        Ok(self.route.body)
    }
}
