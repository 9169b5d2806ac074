//! Product routes.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::Deserialize;

use marketplace_core::{CustomerId, ProductId};

use super::{json_body, path_param, query_params};
use crate::error::{AppError, Result};
use crate::middleware::RequireCustomer;
use crate::models::{Product, ProductDraft};
use crate::services::auth::CustomerAuthService;
use crate::services::products::ProductService;
use crate::state::AppState;

/// Body for creating a product. The owner is the authenticated customer.
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub description: String,
}

/// Body for updating a product.
#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub id: i32,
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub description: String,
}

/// Query for the product listing.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Exact name match instead of the full listing.
    pub name: Option<String>,
}

fn product_service(state: &AppState) -> ProductService<crate::db::ProductRepository<'_>> {
    ProductService::new(state.pool())
}

/// Create a product owned by the caller.
pub async fn create(
    State(state): State<AppState>,
    RequireCustomer(claims): RequireCustomer,
    payload: std::result::Result<Json<CreateProductRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>)> {
    let request = json_body(payload)?;

    let owner = CustomerAuthService::new(state.pool(), state.tokens(), state.passwords())
        .get_customer_by_username(&claims.sub)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Unknown customer".to_string()))?;

    let product = product_service(&state)
        .create(
            owner.id,
            ProductDraft {
                name: request.name,
                price: request.price,
                description: request.description,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(product)))
}

/// Replace a product's name, price, and description.
pub async fn update(
    State(state): State<AppState>,
    RequireCustomer(_claims): RequireCustomer,
    payload: std::result::Result<Json<UpdateProductRequest>, JsonRejection>,
) -> Result<Json<Product>> {
    let request = json_body(payload)?;

    let product = product_service(&state)
        .update(
            ProductId::new(request.id),
            ProductDraft {
                name: request.name,
                price: request.price,
                description: request.description,
            },
        )
        .await?;

    Ok(Json(product))
}

/// List all products, or those matching `?name=` exactly.
pub async fn index(
    State(state): State<AppState>,
    query: std::result::Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<Product>>> {
    let query = query_params(query)?;
    let service = product_service(&state);
    let products = match query.name {
        Some(name) => service.get_by_name(&name).await?,
        None => service.list_all().await?,
    };
    Ok(Json(products))
}

/// Get a product by ID.
pub async fn show(
    State(state): State<AppState>,
    id: std::result::Result<Path<i32>, PathRejection>,
) -> Result<Json<Product>> {
    let id = ProductId::new(path_param(id)?);
    Ok(Json(product_service(&state).get_by_id(id).await?))
}

/// Products of a customer (`only_mine == "true"`) or of everyone else.
pub async fn visible(
    State(state): State<AppState>,
    params: std::result::Result<Path<(i32, String)>, PathRejection>,
) -> Result<Json<Vec<Product>>> {
    let (customer_id, only_mine) = path_param(params)?;

    let products = product_service(&state)
        .list_visible(CustomerId::new(customer_id), only_mine == "true")
        .await?;

    Ok(Json(products))
}

/// Delete a product and return it.
pub async fn delete(
    State(state): State<AppState>,
    RequireCustomer(_claims): RequireCustomer,
    id: std::result::Result<Path<i32>, PathRejection>,
) -> Result<Json<Product>> {
    let id = ProductId::new(path_param(id)?);
    Ok(Json(product_service(&state).delete(id).await?))
}
