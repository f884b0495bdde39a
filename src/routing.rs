//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde_json::json;

use crate::{
    AppState,
    auth::{auth_guard, get_me, log_in_endpoint, register_endpoint},
    category::{
        create_category_endpoint, delete_category_endpoint, list_categories_endpoint,
        rename_category_endpoint,
    },
    endpoints,
    response::OkResponse,
    summary::{get_month_comparison, get_monthly_summary, get_trend},
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, get_transaction_endpoint,
        list_transactions_endpoint, update_transaction_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::HEALTH, get(get_health))
        .route(endpoints::REGISTER, post(register_endpoint))
        .route(endpoints::LOG_IN, post(log_in_endpoint));

    let protected_routes = Router::new()
        .route(endpoints::ME, get(get_me))
        .route(
            endpoints::TRANSACTIONS,
            get(list_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            get(get_transaction_endpoint)
                .put(update_transaction_endpoint)
                .delete(delete_transaction_endpoint),
        )
        .route(
            endpoints::CATEGORIES,
            get(list_categories_endpoint).post(create_category_endpoint),
        )
        .route(
            endpoints::CATEGORY,
            put(rename_category_endpoint).delete(delete_category_endpoint),
        )
        .route(endpoints::MONTHLY_SUMMARY, get(get_monthly_summary))
        .route(endpoints::COMPARE_MONTHS, get(get_month_comparison))
        .route(endpoints::TREND, get(get_trend))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

/// Report that the server is up.
async fn get_health() -> Json<OkResponse> {
    Json(OkResponse::new())
}

async fn get_404_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "the requested route does not exist" })),
    )
        .into_response()
}

#[cfg(test)]
mod routing_tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::{
        endpoints,
        test_utils::{get_test_server, register_test_user},
    };

    #[tokio::test]
    async fn health_check() {
        let server = get_test_server();

        let response = server.get(endpoints::HEALTH).await;

        response.assert_status_ok();
        response.assert_json(&json!({ "ok": true }));
    }

    #[tokio::test]
    async fn unknown_route_is_json_not_found() {
        let server = get_test_server();

        let response = server.get("/definitely/not/a/route").await;

        response.assert_status_not_found();
        assert!(response.json::<Value>()["error"].is_string());
    }

    #[tokio::test]
    async fn protected_routes_require_token() {
        let server = get_test_server();

        for path in [
            endpoints::ME,
            endpoints::TRANSACTIONS,
            endpoints::CATEGORIES,
            endpoints::MONTHLY_SUMMARY,
            endpoints::COMPARE_MONTHS,
            endpoints::TREND,
        ] {
            server.get(path).await.assert_status_unauthorized();
        }
    }

    #[tokio::test]
    async fn summaries_end_to_end() {
        let server = get_test_server();
        let token = register_test_user(&server, "foo@bar.baz").await;
        for (kind, amount, occurred_on) in [
            ("income", 1000.0, "2026-01-05"),
            ("expense", 400.0, "2026-01-10"),
            ("income", 500.0, "2026-02-01"),
        ] {
            server
                .post(endpoints::TRANSACTIONS)
                .authorization_bearer(&token)
                .json(&json!({
                    "type": kind,
                    "amount": amount,
                    "category": "General",
                    "occurred_on": occurred_on,
                    "payment_method": "bank",
                    "status": "paid",
                }))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let monthly = server
            .get(endpoints::MONTHLY_SUMMARY)
            .add_query_param("month", "2026-01")
            .authorization_bearer(&token)
            .await;
        monthly.assert_status_ok();
        monthly.assert_json(&json!({
            "month": "2026-01",
            "income": 1000.0,
            "expense": 400.0,
            "balance": 600.0,
            "count": 2,
        }));

        let compare = server
            .get(endpoints::COMPARE_MONTHS)
            .add_query_param("monthA", "2026-01")
            .add_query_param("monthB", "2026-02")
            .authorization_bearer(&token)
            .await;
        compare.assert_status_ok();
        let compare = compare.json::<Value>();
        assert_eq!(compare["monthA"]["month"], "2026-01");
        assert_eq!(compare["monthB"]["income"], 500.0);
        assert_eq!(
            compare["delta"],
            json!({ "income": -500.0, "expense": -400.0, "balance": -100.0, "count": -1 })
        );
        assert_eq!(compare["pct_change"]["income"], -50.0);
        assert_eq!(
            compare["meta"]["note"],
            "pct_change is null when the base value (monthA) is 0"
        );

        let trend = server
            .get(endpoints::TREND)
            .add_query_param("from", "2026-01")
            .add_query_param("to", "2026-02")
            .authorization_bearer(&token)
            .await;
        trend.assert_status_ok();
        let trend = trend.json::<Value>();
        assert_eq!(trend["from"], "2026-01");
        assert_eq!(trend["to"], "2026-02");
        assert_eq!(trend["months"][0]["mom_income"], Value::Null);
        assert_eq!(trend["months"][1]["mom_income"], -50.0);
        assert_eq!(trend["months"][1]["count"], 1);
    }

    #[tokio::test]
    async fn summaries_reject_bad_months() {
        let server = get_test_server();
        let token = register_test_user(&server, "foo@bar.baz").await;

        let response = server
            .get(endpoints::MONTHLY_SUMMARY)
            .add_query_param("month", "2026-99")
            .authorization_bearer(&token)
            .await;
        response.assert_status_bad_request();
        assert!(
            response.json::<Value>()["error"]
                .as_str()
                .unwrap()
                .contains("between 01 and 12")
        );

        server
            .get(endpoints::MONTHLY_SUMMARY)
            .authorization_bearer(&token)
            .await
            .assert_status_bad_request();

        server
            .get(endpoints::TREND)
            .add_query_param("from", "2026-03")
            .add_query_param("to", "2026-01")
            .authorization_bearer(&token)
            .await
            .assert_status_bad_request();
    }

    #[tokio::test]
    async fn summaries_only_count_own_transactions() {
        let server = get_test_server();
        let token = register_test_user(&server, "foo@bar.baz").await;
        let other_token = register_test_user(&server, "other@bar.baz").await;
        server
            .post(endpoints::TRANSACTIONS)
            .authorization_bearer(&other_token)
            .json(&json!({
                "type": "income",
                "amount": 99.0,
                "category": "General",
                "occurred_on": "2026-01-05",
                "payment_method": "cash",
                "status": "paid",
            }))
            .await
            .assert_status(StatusCode::CREATED);

        let response = server
            .get(endpoints::MONTHLY_SUMMARY)
            .add_query_param("month", "2026-01")
            .authorization_bearer(&token)
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["count"], 0);
    }
}
