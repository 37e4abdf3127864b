//! Read-only JSON status surface: serves the latest `JobStateSnapshot`
//! published by the event loop. No mutating endpoint.

use std::convert::Infallible;
use std::net::SocketAddr;

use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Method, Request, Response, Server, StatusCode};
use tokio::sync::watch;
use tracing::info;

use streamam_core::JobStateSnapshot;

pub async fn serve(
    addr: SocketAddr,
    snapshots: watch::Receiver<JobStateSnapshot>,
) -> Result<(), hyper::Error> {
    let make_svc = make_service_fn(move |_conn| {
        let snapshots = snapshots.clone();
        async move {
            Ok::<_, Infallible>(service_fn(move |req| {
                let snapshots = snapshots.clone();
                async move { Ok::<_, Infallible>(handle(req, &snapshots)) }
            }))
        }
    });

    info!(%addr, "status surface listening");
    Server::bind(&addr).serve(make_svc).await
}

fn handle(req: Request<Body>, snapshots: &watch::Receiver<JobStateSnapshot>) -> Response<Body> {
    if req.method() != Method::GET || req.uri().path() != "/status" {
        return Response::builder()
            .status(StatusCode::NOT_FOUND)
            .body(Body::from("not found"))
            .expect("static response is well-formed");
    }

    let snapshot = snapshots.borrow().clone();
    match serde_json::to_vec(&snapshot) {
        Ok(body) => Response::builder()
            .status(StatusCode::OK)
            .header("content-type", "application/json")
            .body(Body::from(body))
            .expect("static response is well-formed"),
        Err(_) => Response::builder()
            .status(StatusCode::INTERNAL_SERVER_ERROR)
            .body(Body::from("failed to serialize snapshot"))
            .expect("static response is well-formed"),
    }
}
