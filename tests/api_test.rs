//! HTTP tests for the router.
//!
//! The router runs against hand-written stub services, so these tests need
//! no database. They cover authentication, admin gating, request
//! validation, query parsing and the error body format.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

use bar_booking::api::{create_router, AppState};
use bar_booking::errors::{AppError, AppResult};
use bar_booking::services::{
    AuthService, CategoryService, Claims, NotificationDispatch, NotificationService,
    PaymentHistoryService, RegistrationResponse, ServiceContainer, TokenResponse,
};
use bar_booking::types::{PageRequest, PagedResult};
use domain::{
    AccountResponse, CallerId, CategoryChanges, CategoryQuery, CategoryResponse,
    NewCategory, NewNotification, NewNotificationDetail, NotificationResponse,
    PaymentHistoryFilter, PaymentHistoryResponse, RegisterAccount, Role,
};

const ADMIN_ID: Uuid = Uuid::from_u128(1);
const CUSTOMER_ID: Uuid = Uuid::from_u128(2);
const STAFF_ID: Uuid = Uuid::from_u128(3);
const BAR_ID: Uuid = Uuid::from_u128(10);
const KNOWN_CATEGORY: Uuid = Uuid::from_u128(20);

// =============================================================================
// Stub services
// =============================================================================

struct StubAuth;

#[async_trait]
impl AuthService for StubAuth {
    async fn register(&self, request: RegisterAccount) -> AppResult<RegistrationResponse> {
        if request.password != request.confirm_password {
            return Err(AppError::invalid("Password and confirmation password do not match"));
        }
        Ok(RegistrationResponse {
            account: AccountResponse {
                id: Uuid::new_v4(),
                email: request.email,
                full_name: request.full_name,
                phone: request.phone,
                bar_id: None,
                role: Role::Customer,
                is_active: false,
                created_at: Utc::now(),
            },
            otp_sent: true,
        })
    }

    async fn login(&self, _email: String, password: String) -> AppResult<TokenResponse> {
        if password != "SecurePass123!" {
            return Err(AppError::unauthorized("Invalid email or password"));
        }
        Ok(TokenResponse {
            access_token: "customer-token".to_string(),
            token_type: "Bearer".to_string(),
            expires_in: 86400,
        })
    }

    async fn login_with_google(&self, _id_token: String) -> AppResult<TokenResponse> {
        Err(AppError::internal("tokeninfo unreachable"))
    }

    async fn verify_otp(&self, _email: String, _code: String) -> AppResult<AccountResponse> {
        Err(AppError::invalid("Invalid or expired verification code"))
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let (sub, role, bar_id) = match token {
            "admin-token" => (ADMIN_ID, Role::Admin, None),
            "customer-token" => (CUSTOMER_ID, Role::Customer, None),
            "staff-token" => (STAFF_ID, Role::Staff, Some(BAR_ID)),
            _ => return Err(AppError::unauthorized("Invalid or expired token")),
        };
        let now = Utc::now().timestamp();
        Ok(Claims {
            sub,
            email: format!("{}@example.com", role.as_str().to_lowercase()),
            role,
            bar_id,
            exp: now + 3600,
            iat: now,
        })
    }
}

struct StubCategories;

fn category(id: Uuid, name: &str) -> CategoryResponse {
    CategoryResponse {
        id,
        name: name.to_string(),
        description: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[async_trait]
impl CategoryService for StubCategories {
    async fn list(
        &self,
        query: CategoryQuery,
        page: PageRequest,
    ) -> AppResult<PagedResult<CategoryResponse>> {
        let window = page.window()?;
        let items = match query.search {
            Some(term) => vec![category(KNOWN_CATEGORY, &term)],
            None => vec![],
        };
        Ok(PagedResult::new(items, 25, window))
    }

    async fn get(&self, id: Uuid) -> AppResult<CategoryResponse> {
        if id == KNOWN_CATEGORY {
            Ok(category(id, "Cocktails"))
        } else {
            Err(AppError::not_found("Category"))
        }
    }

    async fn create(&self, request: NewCategory) -> AppResult<CategoryResponse> {
        Ok(category(Uuid::new_v4(), &request.name))
    }

    async fn update(&self, id: Uuid, changes: CategoryChanges) -> AppResult<CategoryResponse> {
        Ok(category(id, changes.name.as_deref().unwrap_or("Cocktails")))
    }

    async fn delete(&self, _id: Uuid) -> AppResult<()> {
        Ok(())
    }
}

struct StubNotifications;

fn own_scope(caller: CallerId, account_id: Uuid) -> AppResult<()> {
    if caller.is(account_id) {
        Ok(())
    } else {
        Err(AppError::unauthorized("You are not allowed to access this account's records"))
    }
}

#[async_trait]
impl NotificationService for StubNotifications {
    async fn get_notifications(
        &self,
        caller: CallerId,
        account_id: Uuid,
        page: PageRequest,
    ) -> AppResult<PagedResult<NotificationResponse>> {
        let window = page.window()?;
        own_scope(caller, account_id)?;
        Ok(PagedResult::new(vec![], 0, window))
    }

    async fn unread_count(&self, caller: CallerId, account_id: Uuid) -> AppResult<u64> {
        own_scope(caller, account_id)?;
        Ok(4)
    }

    async fn mark_as_read(
        &self,
        caller: CallerId,
        account_id: Uuid,
    ) -> AppResult<Vec<NotificationResponse>> {
        own_scope(caller, account_id)?;
        Ok(vec![])
    }

    async fn create_notification(
        &self,
        request: NewNotification,
    ) -> AppResult<NotificationDispatch> {
        Ok(NotificationDispatch {
            notification_id: Uuid::new_v4(),
            delivered: request.recipients,
            failed: vec![],
        })
    }

    async fn create_notification_detail(&self, _request: NewNotificationDetail) -> bool {
        true
    }
}

struct StubPayments;

#[async_trait]
impl PaymentHistoryService for StubPayments {
    async fn get_by_bar(
        &self,
        _caller: CallerId,
        bar_id: Uuid,
        _filter: PaymentHistoryFilter,
        page: PageRequest,
    ) -> AppResult<PagedResult<PaymentHistoryResponse>> {
        let window = page.window()?;
        if bar_id != BAR_ID {
            return Err(AppError::unauthorized("You are not allowed to access this bar's records"));
        }
        Ok(PagedResult::new(vec![], 0, window))
    }

    async fn get_by_customer(
        &self,
        caller: CallerId,
        customer_id: Uuid,
        filter: PaymentHistoryFilter,
        page: PageRequest,
    ) -> AppResult<PagedResult<PaymentHistoryResponse>> {
        let window = page.window()?;
        own_scope(caller, customer_id)?;
        // Echo the parsed filter through the page count
        let total = if filter.status.is_some() { 30 } else { 0 };
        Ok(PagedResult::new(vec![], total, window))
    }
}

struct StubServices;

impl ServiceContainer for StubServices {
    fn auth(&self) -> Arc<dyn AuthService> {
        Arc::new(StubAuth)
    }

    fn categories(&self) -> Arc<dyn CategoryService> {
        Arc::new(StubCategories)
    }

    fn notifications(&self) -> Arc<dyn NotificationService> {
        Arc::new(StubNotifications)
    }

    fn payment_histories(&self) -> Arc<dyn PaymentHistoryService> {
        Arc::new(StubPayments)
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn app() -> Router {
    create_router(AppState::new(Arc::new(StubServices)))
}

fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    builder.body(body).unwrap()
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = app().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

// =============================================================================
// Public endpoints
// =============================================================================

#[tokio::test]
async fn test_root_endpoint() {
    let response = app()
        .oneshot(request(Method::GET, "/", None, None))
        .await
        .unwrap();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    assert_eq!(&bytes[..], b"Bar Booking API");
}

#[tokio::test]
async fn test_health_without_database() {
    let (status, body) = send(request(Method::GET, "/health", None, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"]["status"], "not_configured");
}

#[tokio::test]
async fn test_register_returns_created_envelope() {
    let (status, body) = send(request(
        Method::POST,
        "/auth/register",
        None,
        Some(json!({
            "email": "guest@example.com",
            "password": "SecurePass123!",
            "confirm_password": "SecurePass123!",
            "full_name": "Guest"
        })),
    ))
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["otp_sent"], true);
    assert_eq!(body["data"]["account"]["role"], "CUSTOMER");
}

#[tokio::test]
async fn test_register_password_mismatch() {
    let (status, body) = send(request(
        Method::POST,
        "/auth/register",
        None,
        Some(json!({
            "email": "guest@example.com",
            "password": "SecurePass123!",
            "confirm_password": "SecurePass124!",
            "full_name": "Guest"
        })),
    ))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_DATA");
}

#[tokio::test]
async fn test_register_rejects_invalid_email() {
    let (status, body) = send(request(
        Method::POST,
        "/auth/register",
        None,
        Some(json!({
            "email": "not-an-email",
            "password": "SecurePass123!",
            "confirm_password": "SecurePass123!",
            "full_name": "Guest"
        })),
    ))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Invalid email format");
}

#[tokio::test]
async fn test_login_bad_credentials() {
    let (status, body) = send(request(
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": "guest@example.com", "password": "nope" })),
    ))
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_google_failure_hides_internal_detail() {
    let (status, body) = send(request(
        Method::POST,
        "/auth/google",
        None,
        Some(json!({ "id_token": "abc" })),
    ))
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["message"], "An internal error occurred");
}

// =============================================================================
// Authentication and admin gating
// =============================================================================

#[tokio::test]
async fn test_protected_route_requires_token() {
    let (status, _) = send(request(Method::GET, "/categories", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_invalid_token_rejected() {
    let (status, _) = send(request(Method::GET, "/categories", Some("forged"), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_category_create_is_admin_only() {
    let body = json!({ "name": "Cocktails" });

    let (status, _) = send(request(
        Method::POST,
        "/categories",
        Some("customer-token"),
        Some(body.clone()),
    ))
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, created) = send(request(
        Method::POST,
        "/categories",
        Some("admin-token"),
        Some(body),
    ))
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["data"]["name"], "Cocktails");
}

#[tokio::test]
async fn test_category_create_validates_name() {
    let (status, body) = send(request(
        Method::POST,
        "/categories",
        Some("admin-token"),
        Some(json!({ "name": "" })),
    ))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_DATA");
}

#[tokio::test]
async fn test_category_delete_returns_no_content() {
    let uri = format!("/categories/{}", KNOWN_CATEGORY);
    let (status, _) = send(request(Method::DELETE, &uri, Some("admin-token"), None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

// =============================================================================
// Listing and paging
// =============================================================================

#[tokio::test]
async fn test_category_list_parses_page_and_search() {
    let (status, body) = send(request(
        Method::GET,
        "/categories?page_index=1&page_size=10&search=beer",
        Some("customer-token"),
        None,
    ))
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_pages"], 3);
    assert_eq!(body["items"][0]["name"], "beer");
}

#[tokio::test]
async fn test_invalid_page_is_bad_request() {
    let (status, _) = send(request(
        Method::GET,
        "/categories?page_index=0",
        Some("customer-token"),
        None,
    ))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_category_is_not_found() {
    let uri = format!("/categories/{}", Uuid::new_v4());
    let (status, body) = send(request(Method::GET, &uri, Some("customer-token"), None)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "Category not found");
}

#[tokio::test]
async fn test_notifications_of_another_account_rejected() {
    let uri = format!("/notifications/{}", ADMIN_ID);
    let (status, _) = send(request(Method::GET, &uri, Some("customer-token"), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unread_count() {
    let uri = format!("/notifications/{}/unread-count", CUSTOMER_ID);
    let (status, body) = send(request(Method::GET, &uri, Some("customer-token"), None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 4);
}

#[tokio::test]
async fn test_mark_as_read_uses_patch() {
    let uri = format!("/notifications/{}/read", CUSTOMER_ID);
    let (status, body) = send(request(Method::PATCH, &uri, Some("customer-token"), None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_create_notification_reports_dispatch() {
    let (status, body) = send(request(
        Method::POST,
        "/notifications",
        Some("admin-token"),
        Some(json!({
            "title": "Happy hour",
            "message": "Two for one",
            "recipients": [CUSTOMER_ID]
        })),
    ))
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["delivered"][0], CUSTOMER_ID.to_string());
}

#[tokio::test]
async fn test_payment_history_for_other_bar_rejected() {
    let uri = format!("/payment-histories/bars/{}", Uuid::new_v4());
    let (status, _) = send(request(Method::GET, &uri, Some("staff-token"), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_payment_history_parses_filter() {
    let uri = format!(
        "/payment-histories/customers/{}?page_size=10&status=SUCCESS&payment_date=2024-06-01",
        CUSTOMER_ID
    );
    let (status, body) = send(request(Method::GET, &uri, Some("customer-token"), None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_pages"], 3);
}

#[tokio::test]
async fn test_malformed_page_renders_error_body() {
    let uri = format!("/payment-histories/customers/{}?page_index=abc", CUSTOMER_ID);
    let (status, body) = send(request(Method::GET, &uri, Some("customer-token"), None)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_DATA");
    assert!(body["error"]["message"].is_string());
}

#[tokio::test]
async fn test_unknown_payment_status_renders_error_body() {
    let uri = format!("/payment-histories/customers/{}?status=LOST", CUSTOMER_ID);
    let (status, body) = send(request(Method::GET, &uri, Some("customer-token"), None)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_DATA");
}

#[tokio::test]
async fn test_malformed_payment_date_renders_error_body() {
    let uri = format!("/payment-histories/bars/{}?payment_date=yesterday", BAR_ID);
    let (status, body) = send(request(Method::GET, &uri, Some("staff-token"), None)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_DATA");
}

#[tokio::test]
async fn test_malformed_notification_page_size_renders_error_body() {
    let uri = format!("/notifications/{}?page_size=-1", CUSTOMER_ID);
    let (status, body) = send(request(Method::GET, &uri, Some("customer-token"), None)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_DATA");
}
