//! Notification handlers. Accounts read and acknowledge their own
//! notifications; administrators send them.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, patch, post},
    Router,
};
use domain::{NewNotification, NotificationResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::{ValidatedJson, ValidatedQuery};
use crate::api::middleware::{require_admin, CurrentUser};
use crate::api::AppState;
use crate::errors::AppResult;
use crate::services::NotificationDispatch;
use crate::types::{Created, PageRequest, PagedResult};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateNotificationRequest {
    #[validate(length(min = 1, message = "Title is required"))]
    #[schema(example = "Happy hour")]
    pub title: String,
    #[validate(length(min = 1, message = "Message is required"))]
    #[schema(example = "Two for one until 8pm")]
    pub message: String,
    #[validate(url(message = "Image URL must be a valid URL"))]
    pub image_url: Option<String>,
    pub link: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    /// Accounts to notify
    #[serde(default)]
    pub recipients: Vec<Uuid>,
}

impl From<CreateNotificationRequest> for NewNotification {
    fn from(request: CreateNotificationRequest) -> Self {
        Self {
            title: request.title,
            message: request.message,
            image_url: request.image_url,
            link: request.link,
            is_public: request.is_public,
            recipients: request.recipients,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UnreadCountResponse {
    pub count: u64,
}

pub fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_notification))
        .route("/:account_id", get(get_notifications))
        .route("/:account_id/unread-count", get(unread_count))
        .route("/:account_id/read", patch(mark_as_read))
}

/// Notifications of an account, newest first
#[utoipa::path(
    get,
    path = "/notifications/{account_id}",
    tag = "Notifications",
    security(("bearer_auth" = [])),
    params(("account_id" = Uuid, Path, description = "Account ID"), PageRequest),
    responses(
        (status = 200, description = "One page of notifications", body = PagedNotifications),
        (status = 400, description = "Invalid paging"),
        (status = 401, description = "Not the caller's account"),
        (status = 404, description = "A notification row is missing")
    )
)]
pub async fn get_notifications(
    current_user: CurrentUser,
    State(state): State<AppState>,
    Path(account_id): Path<Uuid>,
    ValidatedQuery(page): ValidatedQuery<PageRequest>,
) -> AppResult<Json<PagedResult<NotificationResponse>>> {
    let notifications = state
        .services
        .notifications()
        .get_notifications(current_user.caller(), account_id, page)
        .await?;

    Ok(Json(notifications))
}

#[utoipa::path(
    get,
    path = "/notifications/{account_id}/unread-count",
    tag = "Notifications",
    security(("bearer_auth" = [])),
    params(("account_id" = Uuid, Path, description = "Account ID")),
    responses(
        (status = 200, description = "Number of unread notifications", body = UnreadCountResponse),
        (status = 401, description = "Not the caller's account")
    )
)]
pub async fn unread_count(
    current_user: CurrentUser,
    State(state): State<AppState>,
    Path(account_id): Path<Uuid>,
) -> AppResult<Json<UnreadCountResponse>> {
    let count = state
        .services
        .notifications()
        .unread_count(current_user.caller(), account_id)
        .await?;

    Ok(Json(UnreadCountResponse { count }))
}

/// Mark every unread notification of an account read
#[utoipa::path(
    patch,
    path = "/notifications/{account_id}/read",
    tag = "Notifications",
    security(("bearer_auth" = [])),
    params(("account_id" = Uuid, Path, description = "Account ID")),
    responses(
        (status = 200, description = "Notifications that were marked read", body = Vec<NotificationResponse>),
        (status = 401, description = "Not the caller's account"),
        (status = 404, description = "A notification row is missing")
    )
)]
pub async fn mark_as_read(
    current_user: CurrentUser,
    State(state): State<AppState>,
    Path(account_id): Path<Uuid>,
) -> AppResult<Json<Vec<NotificationResponse>>> {
    let read = state
        .services
        .notifications()
        .mark_as_read(current_user.caller(), account_id)
        .await?;

    Ok(Json(read))
}

/// Send a notification to a set of accounts (admin only)
#[utoipa::path(
    post,
    path = "/notifications",
    tag = "Notifications",
    security(("bearer_auth" = [])),
    request_body = CreateNotificationRequest,
    responses(
        (status = 201, description = "Notification stored; per-recipient outcome", body = NotificationDispatch),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized or not an administrator"),
        (status = 500, description = "Notification could not be stored")
    )
)]
pub async fn create_notification(
    current_user: CurrentUser,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateNotificationRequest>,
) -> AppResult<Created<NotificationDispatch>> {
    require_admin(&current_user)?;
    let dispatch = state
        .services
        .notifications()
        .create_notification(payload.into())
        .await?;

    Ok(Created(dispatch))
}
