use std::net::SocketAddr;
use std::sync::Arc;
use warp::Filter;

use crate::provider::{error::Error, OAuth2Provider};

mod endpoints;

pub use endpoints::oauth::ServerInfo;
use endpoints::oauth::oauth_endpoint;

use super::encoding::error::handle_reject;

use tracing::{event, Level};

#[derive(Debug)]
pub struct Server {
    provider: Arc<OAuth2Provider>,
    issuer: String,
}

impl Server {
    pub fn new(provider: Arc<OAuth2Provider>, issuer: String) -> Self {
        Self {
            provider: Arc::clone(&provider),
            issuer,
        }
    }

    pub fn routes(
        &self,
    ) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
        oauth_endpoint(self.provider.clone(), self.issuer.clone())
            .recover(handle_reject)
            .with(warp::trace::request())
    }

    /// Serves until Ctrl-C.
    pub async fn serve(self, addr: SocketAddr) -> Result<(), Error> {
        let routes = self.routes();

        let shutdown = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                event!(Level::ERROR, error = %e, "Failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
            event!(Level::INFO, "Shutting down");
        };

        let (addr, server) = warp::serve(routes).try_bind_with_graceful_shutdown(addr, shutdown)?;
        event!(Level::INFO, %addr, "OAuth authorization server listening");
        server.await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::testing::{broken_audit_fixture, fixture, CALLBACK};
    use base64::Engine;
    use warp::http::StatusCode;

    const FORM: &str = "application/x-www-form-urlencoded";

    fn server() -> (Server, Arc<crate::db::MemoryTokenLog>) {
        let f = fixture();
        let audit = f.audit.clone();
        let server = Server::new(Arc::new(f.provider), "http://localhost:9001/".to_string());
        (server, audit)
    }

    fn json(body: &[u8]) -> serde_json::Value {
        serde_json::from_slice(body).unwrap()
    }

    fn basic(id: &str, secret: &str) -> String {
        let raw = format!("{}:{}", id, secret);
        format!("Basic {}", base64::engine::general_purpose::STANDARD.encode(raw))
    }

    fn authorize_path(client_id: &str, state: Option<&str>) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        query
            .append_pair("client_id", client_id)
            .append_pair("redirect_uri", CALLBACK)
            .append_pair("response_type", "code");
        if let Some(state) = state {
            query.append_pair("state", state);
        }
        format!("/authorize?{}", query.finish())
    }

    async fn request_id(server: &Server, state: Option<&str>) -> String {
        let res = warp::test::request()
            .method("GET")
            .path(&authorize_path("c1", state))
            .reply(&server.routes())
            .await;
        assert_eq!(res.status(), StatusCode::OK);
        let prompt = json(res.body());
        assert_eq!(prompt["client"]["client_id"], "c1");
        prompt["reqid"].as_str().unwrap().to_string()
    }

    async fn approve(server: &Server, body: &str) -> warp::http::Response<warp::hyper::body::Bytes> {
        warp::test::request()
            .method("POST")
            .path("/approve")
            .header("content-type", FORM)
            .body(body.to_string())
            .reply(&server.routes())
            .await
    }

    fn query_of(location: &str) -> std::collections::HashMap<String, String> {
        url::Url::parse(location)
            .unwrap()
            .query_pairs()
            .into_owned()
            .collect()
    }

    #[tokio::test]
    async fn full_authorization_code_flow() {
        let (server, audit) = server();

        let reqid = request_id(&server, Some("xyz")).await;
        let res = approve(&server, &format!("reqid={}&approve=Approve", reqid)).await;
        assert_eq!(res.status(), StatusCode::FOUND);
        let location = res.headers()["location"].to_str().unwrap().to_string();
        assert!(location.starts_with("http://localhost:9000/callback?code="));
        let params = query_of(&location);
        assert_eq!(params["state"], "xyz");
        let code = params["code"].clone();

        let token = |code: String| {
            warp::test::request()
                .method("POST")
                .path("/token")
                .header("content-type", FORM)
                .header("authorization", basic("c1", "s1"))
                .body(format!("grant_type=authorization_code&code={}", code))
        };

        let res = token(code.clone()).reply(&server.routes()).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers()["cache-control"], "no-store");
        let body = json(res.body());
        assert_eq!(body["token_type"], "Bearer");
        let access_token = body["access_token"].as_str().unwrap();
        assert!(!access_token.is_empty());

        let records = audit.records().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].token.0, access_token);
        assert_eq!(records[0].client_id.0, "c1");

        let res = token(code).reply(&server.routes()).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json(res.body())["error"], "invalid_grant");
        assert_eq!(audit.records().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn audit_failure_is_a_server_error() {
        let (provider, store) = broken_audit_fixture();
        let server = Server::new(Arc::new(provider), "http://localhost:9001".to_string());

        let reqid = request_id(&server, Some("xyz")).await;
        let res = approve(&server, &format!("reqid={}&approve=Approve", reqid)).await;
        let location = res.headers()["location"].to_str().unwrap().to_string();
        let code = query_of(&location)["code"].clone();

        let res = warp::test::request()
            .method("POST")
            .path("/token")
            .header("content-type", FORM)
            .header("authorization", basic("c1", "s1"))
            .body(format!("grant_type=authorization_code&code={}", code))
            .reply(&server.routes())
            .await;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json(res.body()), serde_json::json!({"error": "server_error"}));
        assert_eq!(store.outstanding_codes().unwrap(), 0);
    }

    #[tokio::test]
    async fn denied_approval_redirects_with_access_denied() {
        let (server, _) = server();

        let reqid = request_id(&server, None).await;
        let res = approve(&server, &format!("reqid={}", reqid)).await;
        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(
            res.headers()["location"],
            "http://localhost:9000/callback?error=access_denied"
        );

        let res = approve(&server, &format!("reqid={}&approve=Approve", reqid)).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json(res.body())["error"],
            "No matching authorization request"
        );
    }

    #[tokio::test]
    async fn authorize_rejects_unknown_clients_without_redirecting() {
        let (server, _) = server();

        let res = warp::test::request()
            .method("GET")
            .path(&authorize_path("nobody", Some("xyz")))
            .reply(&server.routes())
            .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert!(res.headers().get("location").is_none());
        assert_eq!(json(res.body())["error"], "Unknown client");

        let res = warp::test::request()
            .method("GET")
            .path("/authorize?client_id=c1&redirect_uri=http%3A%2F%2Fevil.example%2Fcb&response_type=code")
            .reply(&server.routes())
            .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json(res.body())["error"], "Invalid redirect_uris");
    }

    #[tokio::test]
    async fn token_rejects_conflicting_credentials() {
        let (server, _) = server();

        let res = warp::test::request()
            .method("POST")
            .path("/token")
            .header("content-type", FORM)
            .header("authorization", basic("c1", "s1"))
            .body("grant_type=authorization_code&code=abc&client_id=c1&client_secret=s1")
            .reply(&server.routes())
            .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(res.headers()["www-authenticate"], "Basic realm=\"kagi\"");
        assert_eq!(json(res.body())["error"], "invalid_client");
    }

    #[tokio::test]
    async fn token_accepts_body_credentials() {
        let (server, _) = server();

        let res = warp::test::request()
            .method("POST")
            .path("/token")
            .header("content-type", FORM)
            .body("grant_type=client_credentials&client_id=c1&client_secret=s1")
            .reply(&server.routes())
            .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json(res.body())["error"], "Invalid grant_type");

        let res = warp::test::request()
            .method("POST")
            .path("/token")
            .header("content-type", FORM)
            .body("grant_type=authorization_code&code=abc&client_id=c1&client_secret=wrong")
            .reply(&server.routes())
            .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn index_lists_endpoints_and_clients() {
        let (server, _) = server();

        let res = warp::test::request()
            .method("GET")
            .path("/")
            .reply(&server.routes())
            .await;
        assert_eq!(res.status(), StatusCode::OK);
        let info = json(res.body());
        assert_eq!(info["authorization_endpoint"], "http://localhost:9001/authorize");
        assert_eq!(info["token_endpoint"], "http://localhost:9001/token");
        assert_eq!(info["clients"].as_array().unwrap().len(), 2);
        assert!(info["clients"][0].get("client_secret").is_none());
    }

    #[tokio::test]
    async fn malformed_input_is_invalid_request() {
        let (server, _) = server();

        let res = warp::test::request()
            .method("GET")
            .path("/authorize?client_id=c1&client_id=c2")
            .reply(&server.routes())
            .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json(res.body()), serde_json::json!({"error": "invalid_request"}));

        let res = approve(&server, "reqid=a&reqid=b").await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json(res.body()), serde_json::json!({"error": "invalid_request"}));

        let res = warp::test::request()
            .method("POST")
            .path("/token")
            .header("content-type", FORM)
            .body("grant_type=authorization_code&grant_type=refresh_token")
            .reply(&server.routes())
            .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json(res.body()), serde_json::json!({"error": "invalid_request"}));
    }

    #[tokio::test]
    async fn unknown_paths_fall_through() {
        let (server, _) = server();

        let res = warp::test::request()
            .method("GET")
            .path("/nowhere")
            .reply(&server.routes())
            .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
