use axum::{http::Method, routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info_span;

use crate::api::{analytics, health, properties, quarterly};

#[derive(Clone)]
pub struct ApiState {
    pub pool: sqlx::SqlitePool,
}

pub fn router(state: ApiState) -> Router {
    let trace_layer = TraceLayer::new_for_http().make_span_with(|request: &axum::extract::Request| {
        let uri = request.uri().to_string();
        info_span!("http_request", method = ?request.method(), uri)
    });

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_origin(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health))
        .route("/api/properties", get(properties::list_properties))
        .route("/api/properties/stats/summary", get(properties::get_property_stats))
        .route("/api/properties/:id", get(properties::get_property))
        .route("/api/quarterly", get(quarterly::list_quarterly))
        .route("/api/quarterly/:suburb", get(quarterly::get_suburb_quarterly))
        .route("/api/analytics", get(analytics::list_analytics))
        .route("/api/analytics/search/suburbs", get(analytics::search_suburbs))
        .route("/api/analytics/:suburb", get(analytics::get_suburb_analytics))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{memory_pool, seed_analytics, seed_property, seed_quarterly};
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::Value;

    async fn server() -> TestServer {
        let pool = memory_pool().await;
        seed_property(&pool, "Chatswood", "unit", 750_000.0, "2024-03-01").await;
        seed_property(&pool, "Chatswood", "house", 2_100_000.0, "2024-05-20").await;
        seed_property(&pool, "North Ryde", "house", 1_450_000.0, "2023-11-02").await;
        seed_quarterly(&pool, "North Ryde", "house", 2024, 1, 1_450_000.0).await;
        seed_quarterly(&pool, "Chatswood", "unit", 2024, 2, 760_000.0).await;
        seed_analytics(&pool, "Chatswood", "house", 3_200_000.0, 1, 2, 2).await;
        seed_analytics(&pool, "Chatswood", "unit", 1_050_000.0, 3, 1, 1).await;
        seed_analytics(&pool, "North Ryde", "house", 1_900_000.0, 2, 3, 3).await;
        TestServer::new(router(ApiState { pool })).unwrap()
    }

    fn detail(body: &Value) -> &str {
        body["detail"].as_str().unwrap_or_default()
    }

    #[tokio::test]
    async fn property_list_envelope() {
        let server = server().await;
        let response = server
            .get("/api/properties")
            .add_query_param("limit", 2)
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["total"], 3);
        assert_eq!(body["limit"], 2);
        assert_eq!(body["offset"], 0);
        assert_eq!(body["items"].as_array().unwrap().len(), 2);
        assert_eq!(body["items"][0]["settlement_date"], "2024-05-20");
        assert_eq!(body["items"][0]["property_type"], "house");
    }

    #[tokio::test]
    async fn default_page_size_applies() {
        let server = server().await;
        let body: Value = server.get("/api/quarterly").await.json();
        assert_eq!(body["limit"], 100);
        assert_eq!(body["total"], 2);
    }

    #[tokio::test]
    async fn offset_past_end_returns_empty_items() {
        let server = server().await;
        let response = server
            .get("/api/analytics")
            .add_query_param("offset", 10)
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["total"], 3);
        assert!(body["items"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn out_of_range_pagination_is_rejected() {
        let server = server().await;
        for (key, value) in [("limit", 0), ("limit", 1001), ("offset", -1)] {
            let response = server
                .get("/api/properties")
                .add_query_param(key, value)
                .await;
            assert_eq!(response.status_code(), StatusCode::BAD_REQUEST, "{key}={value}");
        }
    }

    #[tokio::test]
    async fn bad_property_type_is_rejected_everywhere() {
        let server = server().await;
        let paths = [
            "/api/properties",
            "/api/properties/stats/summary",
            "/api/quarterly",
            "/api/quarterly/Chatswood",
            "/api/analytics",
            "/api/analytics/Chatswood",
        ];
        for path in paths {
            let response = server
                .get(path)
                .add_query_param("property_type", "townhouse")
                .await;
            assert_eq!(response.status_code(), StatusCode::BAD_REQUEST, "{path}");
            let body: Value = response.json();
            assert_eq!(detail(&body), "property_type must be 'house' or 'unit'");
        }
    }

    #[tokio::test]
    async fn property_lookup() {
        let server = server().await;

        let response = server.get("/api/properties/1").await;
        assert_eq!(response.status_code(), StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["id"], 1);
        assert_eq!(body["suburb"], "Chatswood");
        assert_eq!(body["sale_price"], 750_000.0);

        let response = server.get("/api/properties/404").await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
        let body: Value = response.json();
        assert_eq!(detail(&body), "Property not found");
    }

    #[tokio::test]
    async fn stats_summary() {
        let server = server().await;
        let body: Value = server
            .get("/api/properties/stats/summary")
            .add_query_param("suburb", "Chatswood")
            .await
            .json();
        assert_eq!(body["total_count"], 2);
        assert_eq!(body["min_price"], 750_000.0);
        assert_eq!(body["median_price"], 2_100_000.0);

        let body: Value = server
            .get("/api/properties/stats/summary")
            .add_query_param("suburb", "Nowhere")
            .await
            .json();
        assert_eq!(body["total_count"], 0);
        assert!(body["avg_price"].is_null());
        assert!(body["median_price"].is_null());
    }

    #[tokio::test]
    async fn malformed_date_is_client_error() {
        let server = server().await;
        let response = server
            .get("/api/properties")
            .add_query_param("start_date", "last-tuesday")
            .await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert!(!detail(&body).is_empty());
    }

    #[tokio::test]
    async fn unparseable_scalars_use_detail_envelope() {
        let server = server().await;

        let response = server
            .get("/api/properties")
            .add_query_param("limit", "abc")
            .await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert!(detail(&body).contains("invalid digit"), "{body}");

        let response = server.get("/api/properties/abc").await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert!(!detail(&body).is_empty());

        let response = server
            .get("/api/analytics")
            .add_query_param("min_price", "cheap")
            .await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert!(!detail(&body).is_empty());
    }

    #[tokio::test]
    async fn suburb_path_is_percent_decoded() {
        let server = server().await;
        let response = server.get("/api/quarterly/North%20Ryde").await;
        assert_eq!(response.status_code(), StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["suburb"], "North Ryde");
    }

    #[tokio::test]
    async fn unknown_suburb_is_not_found() {
        let server = server().await;
        for path in ["/api/quarterly/Atlantis", "/api/analytics/Atlantis"] {
            let response = server.get(path).await;
            assert_eq!(response.status_code(), StatusCode::NOT_FOUND, "{path}");
        }
    }

    #[tokio::test]
    async fn analytics_sort_whitelist() {
        let server = server().await;

        let body: Value = server
            .get("/api/analytics")
            .add_query_param("sort_by", "growth_rank")
            .await
            .json();
        let ranks: Vec<i64> = body["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item["growth_rank"].as_i64().unwrap())
            .collect();
        assert_eq!(ranks, vec![1, 2, 3]);

        let response = server
            .get("/api/analytics")
            .add_query_param("sort_by", "volatility_score")
            .await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert!(detail(&body).starts_with("sort_by must be one of:"));
    }

    #[tokio::test]
    async fn analytics_descending_order() {
        let server = server().await;
        let body: Value = server
            .get("/api/analytics")
            .add_query_param("sort_by", "current_median_price")
            .add_query_param("order", "desc")
            .await
            .json();
        assert_eq!(body["items"][0]["current_median_price"], 3_200_000.0);
    }

    #[tokio::test]
    async fn suburb_search() {
        let server = server().await;
        let response = server
            .get("/api/analytics/search/suburbs")
            .add_query_param("q", "chat")
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["suburbs"], serde_json::json!(["Chatswood"]));
        assert_eq!(body["total"], 1);

        let response = server.get("/api/analytics/search/suburbs").await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

        let response = server
            .get("/api/analytics/search/suburbs")
            .add_query_param("q", "r")
            .add_query_param("limit", 101)
            .await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn root_and_health() {
        let server = server().await;

        let body: Value = server.get("/").await.json();
        assert_eq!(body["endpoints"]["properties"], "/api/properties");

        let response = server.get("/health").await;
        assert_eq!(response.status_code(), StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["status"], "healthy");
    }
}
