//! HTTP API definitions.

pub mod budget;
pub mod session;

use axum::{
    routing::{get, post},
    Router,
};

#[cfg(doc)]
use crate::{Service, SessionCookies};

/// Creates a new [`Router`] of all the HTTP API endpoints.
///
/// Requires [`Service`] and [`SessionCookies`] to be provided as
/// [`Extension`]s.
///
/// [`Extension`]: axum::Extension
pub fn router() -> Router {
    Router::new()
        .route("/api/signup", post(session::sign_up))
        .route("/api/login", post(session::log_in))
        .route("/api/session", get(session::status))
        .route("/api/logout", post(session::log_out))
        .route("/api/allocations", post(budget::allocations))
        .route("/api/forecast", post(budget::forecast))
        .route("/api/budget", post(budget::summary))
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use axum::{body::Body, Extension, Router};
    use http_body_util::BodyExt as _;
    use serde_json::{json, Value};
    use service::infra::{Memory, Storage};
    use tower::ServiceExt as _;

    use crate::{Service, SessionCookies};

    fn app() -> Router {
        let config = service::Config {
            password_hash_cost: 4,
            ..service::Config::default()
        };
        let (service, _) =
            Service::new(config, Storage::Memory(Memory::default()));
        let cookies = SessionCookies::new(
            "test secret",
            "session",
            false,
            Duration::from_secs(24 * 60 * 60),
        );
        super::router()
            .layer(Extension(service))
            .layer(Extension(cookies))
    }

    /// Response of the [`app()`].
    struct Response {
        status: http::StatusCode,
        set_cookie: Option<String>,
        body: Value,
    }

    impl Response {
        /// Returns the `name=value` pair of the set cookie.
        fn cookie(&self) -> String {
            self.set_cookie
                .as_deref()
                .unwrap()
                .split(';')
                .next()
                .unwrap()
                .to_owned()
        }
    }

    async fn call(
        app: &Router,
        method: http::Method,
        uri: &str,
        cookie: Option<&str>,
        body: Option<Value>,
    ) -> Response {
        let mut req = http::Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            req = req.header(http::header::COOKIE, cookie);
        }
        let req = match body {
            Some(body) => req
                .header(http::header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => req.body(Body::empty()),
        }
        .unwrap();

        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let set_cookie = resp
            .headers()
            .get(http::header::SET_COOKIE)
            .map(|v| v.to_str().unwrap().to_owned());
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();

        Response {
            status,
            set_cookie,
            body: serde_json::from_slice(&bytes).unwrap(),
        }
    }

    async fn post(
        app: &Router,
        uri: &str,
        cookie: Option<&str>,
        body: Value,
    ) -> Response {
        call(app, http::Method::POST, uri, cookie, Some(body)).await
    }

    async fn session(app: &Router, cookie: Option<&str>) -> Value {
        call(app, http::Method::GET, "/api/session", cookie, None)
            .await
            .body
    }

    async fn sign_up(app: &Router, email: &str, password: &str) -> String {
        let resp = post(
            app,
            "/api/signup",
            None,
            json!({"email": email, "password": password}),
        )
        .await;
        assert_eq!(resp.status, http::StatusCode::OK);
        resp.cookie()
    }

    fn number(v: &Value) -> f64 {
        v.as_f64().unwrap()
    }

    #[tokio::test]
    async fn signs_up_checks_session_and_logs_out() {
        let app = app();

        let resp = post(
            &app,
            "/api/signup",
            None,
            json!({"email": "jane@x.io", "password": "hunter2"}),
        )
        .await;
        assert_eq!(resp.status, http::StatusCode::OK);
        assert_eq!(resp.body, json!({"success": true}));
        let set_cookie = resp.set_cookie.clone().unwrap();
        assert!(set_cookie.contains("HttpOnly"));
        assert!(set_cookie.contains("SameSite=Lax"));
        assert!(set_cookie.contains("Path=/"));
        assert!(set_cookie.contains("Max-Age=86400"));
        let cookie = resp.cookie();

        assert_eq!(
            session(&app, Some(&cookie)).await,
            json!({"loggedIn": true, "email": "jane@x.io"}),
        );

        let resp =
            call(&app, http::Method::POST, "/api/logout", Some(&cookie), None)
                .await;
        assert_eq!(resp.status, http::StatusCode::OK);
        assert_eq!(resp.body, json!({"success": true}));
        assert!(resp.set_cookie.unwrap().contains("Max-Age=0"));

        assert_eq!(
            session(&app, Some(&cookie)).await,
            json!({"loggedIn": false}),
        );
    }

    #[tokio::test]
    async fn logs_in_after_sign_up() {
        let app = app();
        drop(sign_up(&app, "jane@x.io", "hunter2").await);

        let resp = post(
            &app,
            "/api/login",
            None,
            json!({"email": "jane@x.io", "password": "hunter2"}),
        )
        .await;

        assert_eq!(resp.status, http::StatusCode::OK);
        assert_eq!(resp.body, json!({"success": true}));
        assert_eq!(
            session(&app, Some(&resp.cookie())).await,
            json!({"loggedIn": true, "email": "jane@x.io"}),
        );
    }

    #[tokio::test]
    async fn rejects_sign_up_with_missing_fields() {
        let app = app();

        for body in [
            json!({}),
            json!({"email": "jane@x.io"}),
            json!({"password": "hunter2"}),
            json!({"email": "", "password": "hunter2"}),
            json!({"email": "jane@x.io", "password": ""}),
        ] {
            let resp = post(&app, "/api/signup", None, body).await;

            assert_eq!(resp.status, http::StatusCode::BAD_REQUEST);
            assert_eq!(resp.body, json!({"error": "Missing fields"}));
            assert!(resp.set_cookie.is_none());
        }
    }

    #[tokio::test]
    async fn rejects_duplicate_sign_up_keeping_original_password() {
        let app = app();
        drop(sign_up(&app, "jane@x.io", "first").await);

        let resp = post(
            &app,
            "/api/signup",
            None,
            json!({"email": "jane@x.io", "password": "second"}),
        )
        .await;
        assert_eq!(resp.status, http::StatusCode::BAD_REQUEST);
        assert_eq!(resp.body, json!({"error": "User exists"}));

        let with_second = post(
            &app,
            "/api/login",
            None,
            json!({"email": "jane@x.io", "password": "second"}),
        )
        .await;
        assert_eq!(with_second.status, http::StatusCode::BAD_REQUEST);
        let with_first = post(
            &app,
            "/api/login",
            None,
            json!({"email": "jane@x.io", "password": "first"}),
        )
        .await;
        assert_eq!(with_first.status, http::StatusCode::OK);
    }

    #[tokio::test]
    async fn login_failures_are_indistinguishable() {
        let app = app();
        drop(sign_up(&app, "jane@x.io", "hunter2").await);

        let wrong_password = post(
            &app,
            "/api/login",
            None,
            json!({"email": "jane@x.io", "password": "hunter3"}),
        )
        .await;
        let unknown_email = post(
            &app,
            "/api/login",
            None,
            json!({"email": "john@x.io", "password": "hunter2"}),
        )
        .await;
        let missing = post(&app, "/api/login", None, json!({})).await;

        for resp in [&wrong_password, &unknown_email, &missing] {
            assert_eq!(resp.status, http::StatusCode::BAD_REQUEST);
            assert_eq!(resp.body, json!({"error": "Invalid credentials"}));
            assert!(resp.set_cookie.is_none());
        }
    }

    #[tokio::test]
    async fn anonymous_session_is_not_an_error() {
        let app = app();

        assert_eq!(session(&app, None).await, json!({"loggedIn": false}));
        assert_eq!(
            session(&app, Some("session=forged")).await,
            json!({"loggedIn": false}),
        );

        let resp =
            call(&app, http::Method::POST, "/api/logout", None, None).await;
        assert_eq!(resp.status, http::StatusCode::OK);
        assert_eq!(resp.body, json!({"success": true}));
        assert!(resp.set_cookie.unwrap().contains("Max-Age=0"));
    }

    #[tokio::test]
    async fn allows_every_configured_origin() {
        let cors = crate::config::Cors::default();
        let app = app().layer(cors.layer().unwrap());

        for origin in &cors.origins {
            let req = http::Request::builder()
                .uri("/api/session")
                .header(http::header::ORIGIN, origin)
                .body(Body::empty())
                .unwrap();

            let resp = app.clone().oneshot(req).await.unwrap();

            let headers = resp.headers();
            assert_eq!(
                headers
                    .get(http::header::ACCESS_CONTROL_ALLOW_ORIGIN)
                    .and_then(|v| v.to_str().ok()),
                Some(origin.as_str()),
            );
            assert_eq!(
                headers
                    .get(http::header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
                    .and_then(|v| v.to_str().ok()),
                Some("true"),
            );
        }

        let req = http::Request::builder()
            .uri("/api/session")
            .header(http::header::ORIGIN, "http://evil.example")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert!(resp
            .headers()
            .get(http::header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }

    #[tokio::test]
    async fn budget_endpoints_require_session() {
        let app = app();

        for (uri, body) in [
            ("/api/allocations", json!({"income": 5000})),
            ("/api/forecast", json!({"monthlySavings": 500})),
            ("/api/budget", json!({"income": 5000})),
        ] {
            let resp = post(&app, uri, None, body).await;

            assert_eq!(resp.status, http::StatusCode::UNAUTHORIZED);
            assert_eq!(resp.body, json!({"error": "Not authenticated"}));
        }
    }

    #[tokio::test]
    async fn allocates_income() {
        let app = app();
        let cookie = sign_up(&app, "jane@x.io", "hunter2").await;

        let resp = post(
            &app,
            "/api/allocations",
            Some(&cookie),
            json!({
                "income": 5000,
                "percentages": {"housing": 30, "savings": 10},
            }),
        )
        .await;
        assert_eq!(resp.status, http::StatusCode::OK);
        let list = resp.body.as_array().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0]["category"], "housing");
        assert!((number(&list[0]["percentage"]) - 30.0).abs() < f64::EPSILON);
        assert!((number(&list[0]["amount"]) - 1500.0).abs() < f64::EPSILON);
        assert_eq!(list[1]["category"], "savings");
        assert!((number(&list[1]["amount"]) - 500.0).abs() < f64::EPSILON);

        let defaults = post(
            &app,
            "/api/allocations",
            Some(&cookie),
            json!({"income": 1000}),
        )
        .await;
        assert_eq!(defaults.body.as_array().unwrap().len(), 10);

        let negative = post(
            &app,
            "/api/allocations",
            Some(&cookie),
            json!({"income": -1}),
        )
        .await;
        assert_eq!(negative.status, http::StatusCode::BAD_REQUEST);
        assert_eq!(negative.body, json!({"error": "Invalid amount"}));
    }

    #[tokio::test]
    async fn forecasts_savings() {
        let app = app();
        let cookie = sign_up(&app, "jane@x.io", "hunter2").await;

        let resp = post(
            &app,
            "/api/forecast",
            Some(&cookie),
            json!({"monthlySavings": 500, "interestRate": 0, "months": [12]}),
        )
        .await;
        assert_eq!(resp.status, http::StatusCode::OK);
        let points = resp.body.as_array().unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0]["horizonMonths"], 12);
        assert!(
            (number(&points[0]["projectedTotal"]) - 6000.0).abs()
                < f64::EPSILON,
        );

        let defaults = post(
            &app,
            "/api/forecast",
            Some(&cookie),
            json!({"monthlySavings": 100}),
        )
        .await;
        let horizons = defaults
            .body
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["horizonMonths"].as_u64().unwrap())
            .collect::<Vec<_>>();
        assert_eq!(horizons, [3, 6, 12, 24]);

        let zero_months = post(
            &app,
            "/api/forecast",
            Some(&cookie),
            json!({"monthlySavings": 100, "months": [0]}),
        )
        .await;
        assert_eq!(zero_months.status, http::StatusCode::BAD_REQUEST);
        assert_eq!(zero_months.body, json!({"error": "Invalid months"}));

        let high_rate = post(
            &app,
            "/api/forecast",
            Some(&cookie),
            json!({"monthlySavings": 500, "interestRate": 150, "months": [1]}),
        )
        .await;
        assert_eq!(high_rate.status, http::StatusCode::OK);
        assert!(
            (number(&high_rate.body[0]["projectedTotal"]) - 562.5).abs()
                < f64::EPSILON,
        );

        let negative_rate = post(
            &app,
            "/api/forecast",
            Some(&cookie),
            json!({"monthlySavings": 100, "interestRate": -1}),
        )
        .await;
        assert_eq!(negative_rate.status, http::StatusCode::BAD_REQUEST);
        assert_eq!(
            negative_rate.body,
            json!({"error": "Invalid request body"}),
        );
    }

    #[tokio::test]
    async fn summarizes_budget() {
        let app = app();
        let cookie = sign_up(&app, "jane@x.io", "hunter2").await;

        let resp = post(
            &app,
            "/api/budget",
            Some(&cookie),
            json!({
                "currency": "USD",
                "income": 5000,
                "expenses": [{
                    "amount": 1200,
                    "category": "housing",
                    "date": "2020-01-01T00:00:00Z",
                }],
            }),
        )
        .await;

        assert_eq!(resp.status, http::StatusCode::OK);
        assert_eq!(resp.body["currency"], "USD");
        assert!((number(&resp.body["savings"]) - 3800.0).abs() < f64::EPSILON);
        assert!(
            (number(&resp.body["totalExpenses"]) - 1200.0).abs()
                < f64::EPSILON,
        );
        assert_eq!(resp.body["monthlyExpenses"], json!([]));
        assert_eq!(resp.body["allocations"].as_array().unwrap().len(), 10);
        assert_eq!(resp.body["forecast"].as_array().unwrap().len(), 4);
    }
}
