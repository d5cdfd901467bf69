use anyhow::Context;
use axum::{Router, routing};
use bot_relay_client::RelayClient;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::state::AppState;

mod catch_all;
mod cli;
mod error;
mod proxy;
mod startup;
mod state;
mod tls;
mod util;
mod webhook;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    tls::init();

    let args = cli::args();

    tracing::info!("🦀 Bot Relay :: {} ::", env!("CARGO_PKG_VERSION"));

    let http_client = reqwest::Client::builder()
        .use_rustls_tls()
        .build()
        .context("failed to build reqwest http client")?;
    let relay = RelayClient::new(&args.url, &args.token, http_client);

    let registration = args.webhook_registration()?;
    startup::register(&relay, &registration).await?;

    let state = Arc::new(AppState::new(relay));

    let listener = tokio::net::TcpListener::bind(&args.listen)
        .await
        .with_context(|| format!("failed to bind {}", args.listen))?;
    tracing::info!("🚀 relay running on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/update",
            routing::post(webhook::update_handler).fallback(catch_all::unknown_handler),
        )
        .route(
            "/",
            routing::post(proxy::proxy_handler).fallback(catch_all::unknown_handler),
        )
        .route(
            "/{*path}",
            routing::post(proxy::proxy_handler).fallback(catch_all::unknown_handler),
        )
        .fallback(catch_all::unknown_handler)
        .with_state(state)
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("📢 shutdown signal received"),
        Err(err) => tracing::error!("unable to listen for shutdown signal: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode, header::CONTENT_TYPE},
        response::Response,
    };
    use mockito::{Matcher, Server, ServerGuard};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn app(server: &ServerGuard) -> Router {
        let relay = RelayClient::new(&server.url(), "123:abc", reqwest::Client::new());
        router(Arc::new(AppState::new(relay)))
    }

    fn json_request(method: Method, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_string(res: Response) -> String {
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    struct NoUpstreamCalls(Vec<mockito::Mock>);

    impl NoUpstreamCalls {
        async fn assert_async(&self) {
            for mock in &self.0 {
                mock.assert_async().await;
            }
        }
    }

    async fn no_upstream_calls(server: &mut ServerGuard) -> NoUpstreamCalls {
        let mut mocks = Vec::new();
        for method in ["GET", "POST"] {
            mocks.push(
                server
                    .mock(method, Matcher::Any)
                    .expect(0)
                    .create_async()
                    .await,
            );
        }
        NoUpstreamCalls(mocks)
    }

    #[tokio::test]
    async fn test_proxy_relays_result() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/bot123:abc/sendMessage")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({"chat_id": 42, "text": "hi"})))
            .with_header("content-type", "application/json")
            .with_body(r#"{"ok":true,"result":{"chat":{"id":42},"message_id":7,"text":"hi"}}"#)
            .expect(1)
            .create_async()
            .await;

        let res = app(&server)
            .oneshot(json_request(
                Method::POST,
                "/sendMessage",
                r#"{"chat_id":42,"text":"hi"}"#,
            ))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers()[CONTENT_TYPE], "application/json");
        let body = body_string(res).await;
        assert!(body.ends_with("}\n"));
        assert_eq!(
            serde_json::from_str::<Value>(&body).unwrap(),
            json!({"chat": {"id": 42}, "message_id": 7, "text": "hi"})
        );
    }

    #[tokio::test]
    async fn test_proxy_without_json_uses_get() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/bot123:abc/getMe")
            .with_header("content-type", "application/json")
            .with_body(r#"{"ok":true,"result":{"id":1609917215,"is_bot":true,"first_name":"ShopFlow","username":"ShopFlowBot"}}"#)
            .create_async()
            .await;

        let req = Request::builder()
            .method(Method::POST)
            .uri("/getMe")
            .header(CONTENT_TYPE, "text/plain")
            .body(Body::from("ignored"))
            .unwrap();
        let res = app(&server).oneshot(req).await.unwrap();

        mock.assert_async().await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = serde_json::from_str(&body_string(res).await).unwrap();
        assert_eq!(body["username"], "ShopFlowBot");
    }

    #[tokio::test]
    async fn test_proxy_root_path() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/bot123:abc/")
            .with_header("content-type", "application/json")
            .with_body(r#"{"ok":true,"result":true}"#)
            .create_async()
            .await;

        let res = app(&server)
            .oneshot(json_request(Method::POST, "/", "{}"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_string(res).await, "true\n");
    }

    #[tokio::test]
    async fn test_proxy_invalid_json() {
        let mut server = Server::new_async().await;
        let upstream = no_upstream_calls(&mut server).await;

        let res = app(&server)
            .oneshot(json_request(Method::POST, "/sendMessage", "{\"chat_id\":"))
            .await
            .unwrap();

        upstream.assert_async().await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert!(body_string(res).await.starts_with("invalid json: "));
    }

    #[tokio::test]
    async fn test_proxy_upstream_rejection() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/bot123:abc/sendMessage")
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(r#"{"ok":false,"error_code":400,"description":"Bad Request: chat not found"}"#)
            .create_async()
            .await;

        let res = app(&server)
            .oneshot(json_request(Method::POST, "/sendMessage", r#"{"chat_id":1}"#))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_string(res).await;
        assert!(body.starts_with("bot failed: "));
        assert!(body.contains("Bad Request: chat not found"));
    }

    #[tokio::test]
    async fn test_proxy_transport_failure_hides_token() {
        let relay = RelayClient::new("http://127.0.0.1:1", "SECRET:TOKEN", reqwest::Client::new());
        let app = router(Arc::new(AppState::new(relay)));

        let res = app
            .oneshot(json_request(Method::POST, "/sendMessage", r#"{"chat_id":1}"#))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_string(res).await;
        assert!(body.starts_with("bot failed: failed to reach upstream"));
        assert!(!body.contains("SECRET:TOKEN"), "token leaked: {body}");
    }

    #[tokio::test]
    async fn test_proxy_null_body_uses_get() {
        let mut server = Server::new_async().await;
        let get = server
            .mock("GET", "/bot123:abc/getMe")
            .with_header("content-type", "application/json")
            .with_body(r#"{"ok":true,"result":{"id":1,"first_name":"ShopFlow"}}"#)
            .expect(1)
            .create_async()
            .await;
        let post = server
            .mock("POST", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let res = app(&server)
            .oneshot(json_request(Method::POST, "/getMe", "null"))
            .await
            .unwrap();

        get.assert_async().await;
        post.assert_async().await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_update_not_implemented() {
        let mut server = Server::new_async().await;
        let upstream = no_upstream_calls(&mut server).await;

        let res = app(&server)
            .oneshot(json_request(
                Method::POST,
                "/update",
                r#"{"update_id":1,"message":{"text":"hi"}}"#,
            ))
            .await
            .unwrap();

        upstream.assert_async().await;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_string(res).await, "not yet implemented");
    }

    #[tokio::test]
    async fn test_update_invalid_json_still_500() {
        let mut server = Server::new_async().await;
        let upstream = no_upstream_calls(&mut server).await;

        let res = app(&server)
            .oneshot(json_request(Method::POST, "/update", "not json"))
            .await
            .unwrap();

        upstream.assert_async().await;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_get_is_unknown() {
        let mut server = Server::new_async().await;
        let upstream = no_upstream_calls(&mut server).await;

        for uri in ["/", "/getMe", "/update"] {
            let res = app(&server)
                .oneshot(json_request(Method::GET, uri, r#"{"a":1}"#))
                .await
                .unwrap();
            assert_eq!(res.status(), StatusCode::NOT_FOUND, "GET {uri}");
            assert_eq!(body_string(res).await, "unknown");
        }

        let res = app(&server)
            .oneshot(json_request(Method::PUT, "/", "{}"))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        upstream.assert_async().await;
    }
}
