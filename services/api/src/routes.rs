//! API service routes

use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use kitchen::models::{ItemDraft, ItemStatus, User};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    middleware::auth_middleware,
    models::{
        CreateGroceryListRequest, CreateMealRequest, CreateRecipeRequest, ItemListing, ItemsQuery,
        UpdateStatusRequest,
    },
    state::AppState,
};

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/v1/recipes", post(create_recipe).get(get_recipes))
        .route("/v1/recipes/:id", get(get_recipe))
        .route("/v1/recipes/:id/ingredients", get(get_recipe_ingredients))
        .route(
            "/v1/grocery-lists",
            post(create_grocery_list).get(get_grocery_lists),
        )
        .route("/v1/grocery-lists/:id", get(get_grocery_list))
        .route(
            "/v1/grocery-lists/:id/meals",
            post(create_meal).get(get_meals),
        )
        .route(
            "/v1/grocery-lists/:id/items",
            get(get_items).post(create_item),
        )
        .route("/v1/grocery-lists/:id/items/:name", get(get_item_group))
        .route("/v1/items/:id", get(get_item))
        .route("/v1/items/:id/status", put(update_item_status))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .merge(protected_routes)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "api-service"
    }))
}

/// Import a recipe from a web page
pub async fn create_recipe(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(payload): Json<CreateRecipeRequest>,
) -> ApiResult<impl IntoResponse> {
    if payload.url.trim().is_empty() {
        return Err(ApiError::BadRequest("url must not be empty".to_string()));
    }

    let recipe = state
        .kitchen
        .create_recipe_from_url(&user, payload.url.trim())
        .await?;

    Ok((StatusCode::CREATED, Json(recipe)))
}

pub async fn get_recipes(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.kitchen.get_recipes_for_user(&user).await?))
}

pub async fn get_recipe(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.kitchen.get_recipe(&user, id).await?))
}

pub async fn get_recipe_ingredients(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let recipe = state.kitchen.get_recipe(&user, id).await?;
    Ok(Json(
        state
            .kitchen
            .get_ingredients_for_recipe(&user, &recipe)
            .await?,
    ))
}

pub async fn create_grocery_list(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(payload): Json<CreateGroceryListRequest>,
) -> ApiResult<impl IntoResponse> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("name must not be empty".to_string()));
    }

    let list = state.kitchen.create_grocery_list(&user, name).await?;
    Ok((StatusCode::CREATED, Json(list)))
}

pub async fn get_grocery_lists(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.kitchen.get_grocery_lists_for_user(&user).await?))
}

pub async fn get_grocery_list(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.kitchen.get_grocery_list(&user, id).await?))
}

/// Add a recipe to a grocery list, copying its ingredients as items
pub async fn create_meal(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateMealRequest>,
) -> ApiResult<impl IntoResponse> {
    let list = state.kitchen.get_grocery_list(&user, id).await?;
    let meal = state
        .kitchen
        .create_meal(&user, &list, payload.recipe_id)
        .await?;

    Ok((StatusCode::CREATED, Json(meal)))
}

pub async fn get_meals(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let list = state.kitchen.get_grocery_list(&user, id).await?;
    Ok(Json(
        state.kitchen.get_meals_in_grocery_list(&user, &list).await?,
    ))
}

/// List the items of a grocery list, flat or aggregated.
///
/// The flags are checked before anything is loaded so that a conflicting
/// request never produces a partial body.
pub async fn get_items(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<Uuid>,
    Query(query): Query<ItemsQuery>,
) -> ApiResult<Response> {
    let listing = query.listing()?;
    let list = state.kitchen.get_grocery_list(&user, id).await?;

    let response = match listing {
        ItemListing::Flat => Json(
            state
                .kitchen
                .get_items_for_grocery_list(&user, &list)
                .await?,
        )
        .into_response(),
        ItemListing::Grouped(mode) => Json(
            state
                .kitchen
                .get_item_groups_for_grocery_list(&user, &list, mode)
                .await?,
        )
        .into_response(),
    };

    Ok(response)
}

pub async fn create_item(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<Uuid>,
    Json(draft): Json<ItemDraft>,
) -> ApiResult<impl IntoResponse> {
    if draft.name.trim().is_empty() {
        return Err(ApiError::BadRequest("name must not be empty".to_string()));
    }

    let list = state.kitchen.get_grocery_list(&user, id).await?;
    let item = state.kitchen.create_item(&user, &list, draft).await?;

    Ok((StatusCode::CREATED, Json(item)))
}

/// Aggregate the items of a list sharing one name
pub async fn get_item_group(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path((id, name)): Path<(Uuid, String)>,
) -> ApiResult<impl IntoResponse> {
    let list = state.kitchen.get_grocery_list(&user, id).await?;
    Ok(Json(
        state
            .kitchen
            .get_item_group_for_grocery_list_by_name(&user, &list, &name)
            .await?,
    ))
}

pub async fn get_item(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.kitchen.get_item(&user, id).await?))
}

pub async fn update_item_status(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> ApiResult<impl IntoResponse> {
    let status: ItemStatus = payload.status.parse().map_err(ApiError::BadRequest)?;

    let item = state.kitchen.get_item(&user, id).await?;
    let item = state.kitchen.mark_item_status(item, status).await?;

    info!("Item {} is now {}", item.id, item.status);
    Ok(Json(item))
}
