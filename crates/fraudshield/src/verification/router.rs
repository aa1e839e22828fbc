use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use super::domain::{
    FraudStats, KycData, KycMatch, NumberVerification, PhoneCheckRequest, ScamSignal,
    SimSwapReport, VerificationResult,
};
use super::provider::MockVerificationProvider;

/// Endpoints backing the KYC form, results screen, and dashboard widgets.
pub fn verification_router(provider: Arc<MockVerificationProvider>) -> Router {
    Router::new()
        .route("/api/v1/kyc/verify", post(verify_kyc_handler))
        .route("/api/v1/checks/number", post(verify_number_handler))
        .route("/api/v1/checks/sim-swap", post(sim_swap_handler))
        .route("/api/v1/checks/kyc-match", post(kyc_match_handler))
        .route("/api/v1/checks/scam-signal", post(scam_signal_handler))
        .route("/api/v1/verifications/history", get(history_handler))
        .route("/api/v1/stats", get(stats_handler))
        .with_state(provider)
}

pub(crate) async fn verify_kyc_handler(
    State(provider): State<Arc<MockVerificationProvider>>,
    Json(data): Json<KycData>,
) -> Json<VerificationResult> {
    Json(provider.verify_kyc(&data).await)
}

async fn verify_number_handler(
    State(provider): State<Arc<MockVerificationProvider>>,
    Json(request): Json<PhoneCheckRequest>,
) -> Json<NumberVerification> {
    Json(provider.verify_number(&request.phone_number).await)
}

async fn sim_swap_handler(
    State(provider): State<Arc<MockVerificationProvider>>,
    Json(request): Json<PhoneCheckRequest>,
) -> Json<SimSwapReport> {
    Json(provider.check_sim_swap(&request.phone_number).await)
}

async fn kyc_match_handler(
    State(provider): State<Arc<MockVerificationProvider>>,
    Json(data): Json<KycData>,
) -> Json<KycMatch> {
    Json(provider.match_kyc(&data).await)
}

async fn scam_signal_handler(
    State(provider): State<Arc<MockVerificationProvider>>,
    Json(request): Json<PhoneCheckRequest>,
) -> Json<ScamSignal> {
    Json(provider.detect_scam_signal(&request.phone_number).await)
}

async fn history_handler(
    State(provider): State<Arc<MockVerificationProvider>>,
) -> Json<Vec<VerificationResult>> {
    Json(provider.verification_history().await)
}

async fn stats_handler(State(provider): State<Arc<MockVerificationProvider>>) -> Json<FraudStats> {
    Json(provider.fraud_stats().await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verification::{SimulatedLatency, VerificationStatus};
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn router() -> Router {
        verification_router(Arc::new(MockVerificationProvider::with_seed(
            SimulatedLatency::disabled(),
            11,
        )))
    }

    async fn post_json(router: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let response = router
            .oneshot(
                Request::post(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .expect("route executes");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        (status, serde_json::from_slice(&bytes).expect("json payload"))
    }

    #[tokio::test]
    async fn verify_handler_returns_composite_result() {
        let data = KycData {
            full_name: "Priya Raman".to_string(),
            phone_number: "+91 98450 12345".to_string(),
            id_number: "1234 5678 9012".to_string(),
            document_type: "aadhaar".to_string(),
        };
        let provider = Arc::new(MockVerificationProvider::with_seed(
            SimulatedLatency::disabled(),
            3,
        ));

        let Json(result) = verify_kyc_handler(State(provider), Json(data.clone())).await;

        assert_eq!(result.user.full_name, data.full_name);
        assert!(result.checks.kyc_match);
        assert_eq!(
            result.status == VerificationStatus::Pass,
            result.risk_score <= 70
        );
    }

    #[tokio::test]
    async fn kyc_route_serializes_uppercase_status() {
        let (status, body) = post_json(
            router(),
            "/api/v1/kyc/verify",
            json!({
                "full_name": "Sam",
                "phone_number": "+1 555-000-0666",
                "id_number": "x"
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], json!("FAIL"));
        assert_eq!(body["checks"]["sim_swap_check"], json!(false));
        assert!(body["risk_score"].as_u64().expect("score") <= 100);
    }

    #[tokio::test]
    async fn number_route_reports_carrier() {
        let (status, body) = post_json(
            router(),
            "/api/v1/checks/number",
            json!({ "phone_number": "+1 212-555-0187" }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["verified"], json!(true));
        assert!(body["carrier"].is_string());
    }

    #[tokio::test]
    async fn stats_route_returns_fixed_figures() {
        let response = router()
            .oneshot(Request::get("/api/v1/stats").body(Body::empty()).unwrap())
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), 4096)
            .await
            .expect("read body");
        let body: Value = serde_json::from_slice(&bytes).expect("json payload");
        assert_eq!(body["fraud_prevented"], json!(73));
    }
}
