//! Category handlers. Reads are open to any signed-in account; changes are
//! admin only.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::get,
    Router,
};
use domain::{CategoryChanges, CategoryQuery, CategoryResponse, NewCategory};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::{ValidatedJson, ValidatedQuery};
use crate::api::middleware::{require_admin, CurrentUser};
use crate::api::AppState;
use crate::errors::AppResult;
use crate::types::{Created, NoContent, PageRequest, PagedResult};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CategorySearch {
    /// Case-insensitive match on the category name
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1 to 100 characters"))]
    #[schema(example = "Cocktails")]
    pub name: String,
    #[schema(example = "Mixed drinks")]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCategoryRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1 to 100 characters"))]
    pub name: Option<String>,
    pub description: Option<String>,
}

impl From<CreateCategoryRequest> for NewCategory {
    fn from(request: CreateCategoryRequest) -> Self {
        Self {
            name: request.name,
            description: request.description,
        }
    }
}

impl From<UpdateCategoryRequest> for CategoryChanges {
    fn from(request: UpdateCategoryRequest) -> Self {
        Self {
            name: request.name,
            description: request.description,
        }
    }
}

pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route(
            "/:id",
            get(get_category).put(update_category).delete(delete_category),
        )
}

/// List active categories
#[utoipa::path(
    get,
    path = "/categories",
    tag = "Categories",
    security(("bearer_auth" = [])),
    params(PageRequest, CategorySearch),
    responses(
        (status = 200, description = "One page of categories", body = PagedCategories),
        (status = 400, description = "Invalid paging"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_categories(
    State(state): State<AppState>,
    ValidatedQuery(page): ValidatedQuery<PageRequest>,
    ValidatedQuery(search): ValidatedQuery<CategorySearch>,
) -> AppResult<Json<PagedResult<CategoryResponse>>> {
    let categories = state
        .services
        .categories()
        .list(CategoryQuery::search(search.search), page)
        .await?;

    Ok(Json(categories))
}

#[utoipa::path(
    get,
    path = "/categories/{id}",
    tag = "Categories",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category", body = CategoryResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Category not found")
    )
)]
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<CategoryResponse>> {
    let category = state.services.categories().get(id).await?;
    Ok(Json(category))
}

/// Create a category (admin only)
#[utoipa::path(
    post,
    path = "/categories",
    tag = "Categories",
    security(("bearer_auth" = [])),
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized or not an administrator"),
        (status = 409, description = "Category name already in use")
    )
)]
pub async fn create_category(
    current_user: CurrentUser,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateCategoryRequest>,
) -> AppResult<Created<CategoryResponse>> {
    require_admin(&current_user)?;
    let category = state.services.categories().create(payload.into()).await?;
    Ok(Created(category))
}

/// Update a category (admin only)
#[utoipa::path(
    put,
    path = "/categories/{id}",
    tag = "Categories",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Category ID")),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = CategoryResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized or not an administrator"),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Category name already in use")
    )
)]
pub async fn update_category(
    current_user: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateCategoryRequest>,
) -> AppResult<Json<CategoryResponse>> {
    require_admin(&current_user)?;
    let category = state
        .services
        .categories()
        .update(id, payload.into())
        .await?;
    Ok(Json(category))
}

/// Soft-delete a category (admin only)
#[utoipa::path(
    delete,
    path = "/categories/{id}",
    tag = "Categories",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 401, description = "Unauthorized or not an administrator"),
        (status = 404, description = "Category not found")
    )
)]
pub async fn delete_category(
    current_user: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    require_admin(&current_user)?;
    state.services.categories().delete(id).await?;
    Ok(NoContent)
}
