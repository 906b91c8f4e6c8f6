//! End-to-end tests: real HTTP clients against a local fake upstream

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::extract::{Path, Query};
    use axum::http::{HeaderMap, Request, StatusCode};
    use axum::response::{IntoResponse, Response};
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio_test::{assert_err, assert_ok};
    use tower::ServiceExt;

    use price_inference::config::AppConfig;
    use price_inference::error::{InferenceError, Stage};
    use price_inference::oracle::sources::{
        BinanceClient, ChainStatusSource, CoinGeckoClient, CandleSource, SpotPriceSource,
    };
    use price_inference::server::{create_router, CryptoInferenceResponse};
    use price_inference::service::InferenceService;
    use price_inference::types::Interval;

    const TOKEN_ADDRESS: &str = "0xabc";

    // ============================================================================
    // Fake upstream
    // ============================================================================

    async fn klines(Query(q): Query<HashMap<String, String>>) -> Response {
        assert_eq!(q.get("limit").map(String::as_str), Some("1"));
        assert_eq!(q.get("interval").map(String::as_str), Some("15m"));
        assert!(q.contains_key("endTime"));

        match q.get("symbol").map(String::as_str) {
            Some("EMPTYUSDT") => Json(json!([])).into_response(),
            Some("HALTUSDT") => (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!([[0, "1", "1", "1", "1", "1", 1]])),
            )
                .into_response(),
            _ => Json(json!([[
                1717000000000i64,
                "100",
                "112",
                "99",
                "110",
                "5.5",
                1717000899999i64
            ]]))
            .into_response(),
        }
    }

    async fn coingecko(Query(q): Query<HashMap<String, String>>) -> Response {
        match q.get("ids").map(String::as_str) {
            // Error status with a well-formed body: the client never checks status
            Some("GAP") => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"GAP": {"usd": 90.0}})),
            )
                .into_response(),
            _ => "<html>rate limited</html>".into_response(),
        }
    }

    async fn cryptocompare(Query(q): Query<HashMap<String, String>>) -> Response {
        assert_eq!(q.get("api_key").map(String::as_str), Some("cc-key"));
        Json(json!({"USD": 120.0})).into_response()
    }

    async fn node_status() -> Response {
        Json(json!({"result": {"sync_info": {"latest_block_height": "77"}}})).into_response()
    }

    async fn token_oracle(Path(height): Path<String>, headers: HeaderMap) -> Response {
        if headers.get("x-api-key").and_then(|v| v.to_str().ok()) != Some("upshot-key") {
            return (StatusCode::UNAUTHORIZED, Json(json!({"message": "Unauthorized"})))
                .into_response();
        }
        assert_eq!(height, "77");
        Json(json!({
            "request_id": "r-1",
            "status": true,
            "data": {
                "token_id": "pepe",
                "token_symbol": "PEPE",
                "platform": "eth",
                "address": TOKEN_ADDRESS
            }
        }))
        .into_response()
    }

    async fn token_price(Path((network, address)): Path<(String, String)>) -> Response {
        assert_eq!(network, "eth");
        let mut prices = serde_json::Map::new();
        prices.insert(address, json!("2.5"));
        Json(json!({"data": {"attributes": {"token_prices": prices}}})).into_response()
    }

    fn fake_upstream() -> Router {
        Router::new()
            .route("/api/v3/klines", get(klines))
            .route("/api/v3/simple/price", get(coingecko))
            .route("/data/price", get(cryptocompare))
            .route("/status", get(node_status))
            .route("/v2/allora/tokens-oracle/token/:height", get(token_oracle))
            .route(
                "/api/v2/simple/networks/:network/token_price/:address",
                get(token_price),
            )
    }

    async fn spawn_upstream() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, fake_upstream()).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn config(base: &str, upshot_key: &str) -> AppConfig {
        let builder = AppConfig::defaults()
            .unwrap()
            .set_override("upstream.binance_url", base)
            .unwrap()
            .set_override("upstream.coingecko_url", base)
            .unwrap()
            .set_override("upstream.cryptocompare_url", base)
            .unwrap()
            .set_override("upstream.upshot_url", base)
            .unwrap()
            .set_override("upstream.geckoterminal_url", base)
            .unwrap()
            .set_override("upstream.timeout_ms", 5000)
            .unwrap()
            .set_override("credentials.rpc", base)
            .unwrap()
            .set_override("credentials.upshot_api_key", upshot_key)
            .unwrap()
            .set_override("credentials.coingecko_api_key", "cg-key")
            .unwrap()
            .set_override("credentials.cryptocompare_api_key", "cc-key")
            .unwrap();
        AppConfig::from_builder(builder).unwrap()
    }

    async fn send_get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    async fn app(upshot_key: &str) -> Router {
        let base = spawn_upstream().await;
        let service = InferenceService::from_config(&config(&base, upshot_key)).unwrap();
        create_router(Arc::new(service))
    }

    // ============================================================================
    // Client level
    // ============================================================================

    #[tokio::test]
    async fn test_binance_client_reads_latest_kline() {
        let base = spawn_upstream().await;
        let client = BinanceClient::with_base_url(reqwest::Client::new(), base);

        let candle = assert_ok!(client.last_candle("BTCUSDT", Interval::Min15).await);
        assert_eq!(candle.open, "100");
        assert_eq!(candle.close, "110");
        assert_eq!(candle.high, "112");
        assert_eq!(candle.low, "99");
        assert!(candle.closed);
    }

    #[tokio::test]
    async fn test_binance_client_checks_status() {
        let base = spawn_upstream().await;
        let client = BinanceClient::with_base_url(reqwest::Client::new(), base);

        let err = assert_err!(client.last_candle("HALTUSDT", Interval::Min15).await);
        assert!(matches!(
            err,
            InferenceError::Status {
                stage: Stage::Klines,
                status: 503
            }
        ));
    }

    // Known gap: only the exchange client looks at the status code
    #[tokio::test]
    async fn test_coingecko_ignores_error_status() {
        let base = spawn_upstream().await;
        let client = CoinGeckoClient::with_base_url(reqwest::Client::new(), base);

        let price = assert_ok!(client.spot_price("GAP", "cg-key").await);
        assert_eq!(price, 90.0);
    }

    #[tokio::test]
    async fn test_unreachable_node_is_transport_error() {
        let client =
            price_inference::oracle::sources::NodeStatusClient::new(reqwest::Client::new());
        let err = assert_err!(client.latest_block_height("http://127.0.0.1:9").await);
        assert!(matches!(
            err,
            InferenceError::Transport {
                stage: Stage::LatestBlock,
                ..
            }
        ));
    }

    // ============================================================================
    // Through the router
    // ============================================================================

    #[tokio::test]
    async fn test_crypto_with_malformed_coingecko() {
        let (status, body) = send_get(app("upshot-key").await, "/inference/BTC").await;

        assert_eq!(status, StatusCode::OK);
        let resp: CryptoInferenceResponse = serde_json::from_slice(&body).unwrap();
        assert!(resp.binance_price >= 122.1 - 1e-9 && resp.binance_price < 130.9);
        assert_eq!(resp.coingecko_price, 0.0);
        assert_eq!(resp.cryptocompare_price, 120.0);
        assert!((resp.price - (resp.binance_price + 120.0) / 3.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_crypto_empty_klines() {
        let (status, body) = send_get(app("upshot-key").await, "/inference/EMPTY").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, b"Error fetching klines");
    }

    #[tokio::test]
    async fn test_crypto_exchange_outage() {
        let (status, _) = send_get(app("upshot-key").await, "/inference/HALT").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_meme_end_to_end() {
        let (status, body) = send_get(app("upshot-key").await, "/inference/MEME").await;

        assert_eq!(status, StatusCode::OK);
        let price: f64 = String::from_utf8(body).unwrap().parse().unwrap();
        assert!(price >= 2.5 * 0.97 - 1e-12 && price < 2.5 * 1.03);
    }

    #[tokio::test]
    async fn test_meme_rejected_key_fails_oracle_stage() {
        let (status, body) = send_get(app("wrong-key").await, "/inference/MEME").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, b"Error fetching meme oracle data");
    }
}
