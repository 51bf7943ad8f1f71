use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::warn;

use crate::core::{ConversionError, ConversionRequest, ConversionResult, ConversionService};

const INDEX_HTML: &str = include_str!("../../static/index.html");

#[derive(Debug, Serialize)]
pub struct ConvertResponse {
    pub success: bool,
    #[serde(flatten)]
    pub result: ConversionResult,
}

/// GET /
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// GET /api/convert-currency?from=USD&to=INR&amount=1
pub async fn convert_currency(
    State(service): State<Arc<ConversionService>>,
    Query(request): Query<ConversionRequest>,
) -> Result<Json<ConvertResponse>, ConversionError> {
    let result = service.convert(request).await.inspect_err(|e| {
        warn!(kind = ?e.kind(), error = %e, "Conversion failed");
    })?;
    Ok(Json(ConvertResponse {
        success: true,
        result,
    }))
}

impl IntoResponse for ConversionError {
    fn into_response(self) -> Response {
        if self.is_client_error() {
            let body = Json(json!({
                "success": false,
                "error": self.to_string(),
            }));
            return (StatusCode::BAD_REQUEST, body).into_response();
        }

        let body = Json(json!({
            "success": false,
            "error": {
                "kind": self.kind(),
                "message": self.to_string(),
                "details": self.details(),
            }
        }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ProviderError, RateCache, RateProvider, RateTable};
    use async_trait::async_trait;
    use axum::{Router, body::Body, http::Request, routing::get};
    use serde_json::Value;
    use tower::ServiceExt;

    struct StaticRates(Option<RateTable>);

    #[async_trait]
    impl RateProvider for StaticRates {
        async fn fetch_rates(&self, _base: &str) -> Result<RateTable, ProviderError> {
            self.0.clone().ok_or(ProviderError::NoCredential)
        }
    }

    fn app(provider: StaticRates) -> Router {
        let service = Arc::new(ConversionService::new(Arc::new(provider), RateCache::new()));
        Router::new()
            .route("/", get(index))
            .route("/convert", get(convert_currency))
            .with_state(service)
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn usd_rates() -> StaticRates {
        StaticRates(Some([("USD", 1.0), ("INR", 83.0)].into_iter().collect()))
    }

    #[tokio::test]
    async fn test_convert_success_body() {
        let (status, body) = get_json(app(usd_rates()), "/convert?from=usd&to=inr&amount=10").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "success": true,
                "from": "USD",
                "to": "INR",
                "amount": 10.0,
                "rate": 83.0,
                "converted": 830.0
            })
        );
    }

    #[tokio::test]
    async fn test_long_target_code_is_unknown_currency() {
        let (status, body) = get_json(app(usd_rates()), "/convert?to=euro").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "currency 'EURO' not found");
    }

    #[tokio::test]
    async fn test_unknown_currency_is_bad_request() {
        let (status, body) = get_json(app(usd_rates()), "/convert?to=ZZZ").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({"success": false, "error": "currency 'ZZZ' not found"})
        );
    }

    #[tokio::test]
    async fn test_unparsable_amount_defaults_to_one() {
        let (status, body) = get_json(app(usd_rates()), "/convert?amount=abc").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["amount"], 1.0);
        assert_eq!(body["converted"], 83.0);
    }

    #[tokio::test]
    async fn test_overflowing_amount_is_bad_request() {
        let (status, body) = get_json(app(usd_rates()), "/convert?amount=1e308").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({"success": false, "error": "converted amount is out of range"})
        );
    }

    #[tokio::test]
    async fn test_provider_error_is_server_error() {
        for uri in ["/convert", "/convert?to=EURO", "/convert?amount=abc", "/convert?from=XX"] {
            let (status, body) = get_json(app(StaticRates(None)), uri).await;

            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
            assert_eq!(body["success"], false);
            assert_eq!(body["error"]["kind"], "no_credential");
            assert_eq!(body["error"]["details"], Value::Null);
        }
    }

    #[tokio::test]
    async fn test_index_page() {
        let response = app(usd_rates())
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = String::from_utf8_lossy(&body);
        assert!(html.contains(r#"src="/static/script.js""#));
        assert!(html.contains(r#"id="convertCurrency""#));
    }
}
