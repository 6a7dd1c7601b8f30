#![allow(dead_code)]

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Request, Response, Server, StatusCode};

use api_stress_tester::StressTestRequest;

/// In-process HTTP endpoint that always answers with the same status.
pub struct MockEndpoint {
    pub addr: SocketAddr,
    pub hits: Arc<AtomicUsize>,
    pub peak_in_flight: Arc<AtomicUsize>,
}

impl MockEndpoint {
    pub fn url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

pub async fn spawn_endpoint(status: StatusCode, delay: Duration) -> MockEndpoint {
    let hits = Arc::new(AtomicUsize::new(0));
    let in_flight = Arc::new(AtomicUsize::new(0));
    let peak_in_flight = Arc::new(AtomicUsize::new(0));

    let make_svc = {
        let hits = Arc::clone(&hits);
        let in_flight = Arc::clone(&in_flight);
        let peak = Arc::clone(&peak_in_flight);
        make_service_fn(move |_conn| {
            let hits = Arc::clone(&hits);
            let in_flight = Arc::clone(&in_flight);
            let peak = Arc::clone(&peak);
            async move {
                Ok::<_, Infallible>(service_fn(move |_req: Request<Body>| {
                    let hits = Arc::clone(&hits);
                    let in_flight = Arc::clone(&in_flight);
                    let peak = Arc::clone(&peak);
                    async move {
                        let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                        peak.fetch_max(now, Ordering::SeqCst);
                        hits.fetch_add(1, Ordering::SeqCst);
                        if !delay.is_zero() {
                            tokio::time::sleep(delay).await;
                        }
                        in_flight.fetch_sub(1, Ordering::SeqCst);
                        let mut response = Response::new(Body::from("pong"));
                        *response.status_mut() = status;
                        Ok::<_, Infallible>(response)
                    }
                }))
            }
        })
    };

    let server = Server::bind(&SocketAddr::from(([127, 0, 0, 1], 0))).serve(make_svc);
    let addr = server.local_addr();
    tokio::spawn(async move {
        if let Err(e) = server.await {
            eprintln!("mock endpoint failed: {}", e);
        }
    });

    MockEndpoint {
        addr,
        hits,
        peak_in_flight,
    }
}

/// A URL on which nothing is listening.
pub fn refused_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/", port)
}

pub fn request(url: &str, duration: i64, concurrency: i64) -> StressTestRequest {
    StressTestRequest {
        url: url.to_string(),
        duration,
        concurrency,
    }
}
