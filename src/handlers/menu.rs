use actix_web::{web, HttpResponse};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::AppError;
use crate::infrastructure::catalog::{DieselCatalog, OptionWithValues};
use crate::infrastructure::models::{CategoryRow, MenuItemRow};

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub position: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MenuItemResponse {
    pub id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: String,
    pub is_available: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CustomizationValueResponse {
    pub id: Uuid,
    pub value: String,
    pub price_modifier: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CustomizationOptionResponse {
    pub id: Uuid,
    pub name: String,
    pub kind: String,
    pub values: Vec<CustomizationValueResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MenuItemDetailsResponse {
    pub item: MenuItemResponse,
    pub customization_options: Vec<CustomizationOptionResponse>,
}

fn category_response(row: CategoryRow) -> CategoryResponse {
    CategoryResponse {
        id: row.id,
        name: row.name,
        description: row.description,
        position: row.position,
    }
}

fn item_response(row: MenuItemRow) -> MenuItemResponse {
    MenuItemResponse {
        id: row.id,
        category_id: row.category_id,
        name: row.name,
        description: row.description,
        price: row.price.to_string(),
        is_available: row.is_available,
    }
}

fn option_response(entry: OptionWithValues) -> CustomizationOptionResponse {
    CustomizationOptionResponse {
        id: entry.option.id,
        name: entry.option.name,
        kind: entry.option.kind,
        values: entry
            .values
            .into_iter()
            .map(|v| CustomizationValueResponse {
                id: v.id,
                value: v.value,
                price_modifier: v.price_modifier.to_string(),
            })
            .collect(),
    }
}

/// GET /menu/categories
#[utoipa::path(
    get,
    path = "/menu/categories",
    responses((status = 200, description = "Menu categories", body = [CategoryResponse])),
    tag = "menu"
)]
pub async fn list_categories(catalog: web::Data<DieselCatalog>) -> Result<HttpResponse, AppError> {
    let rows = web::block(move || catalog.categories())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;
    let categories: Vec<CategoryResponse> = rows.into_iter().map(category_response).collect();
    Ok(HttpResponse::Ok().json(categories))
}

/// GET /menu/categories/{id}/items
#[utoipa::path(
    get,
    path = "/menu/categories/{id}/items",
    params(("id" = Uuid, Path, description = "Category id")),
    responses((status = 200, description = "Orderable items", body = [MenuItemResponse])),
    tag = "menu"
)]
pub async fn list_category_items(
    catalog: web::Data<DieselCatalog>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let category_id = path.into_inner();
    let rows = web::block(move || catalog.items_in_category(category_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;
    let items: Vec<MenuItemResponse> = rows.into_iter().map(item_response).collect();
    Ok(HttpResponse::Ok().json(items))
}

/// GET /menu/items/{id}
#[utoipa::path(
    get,
    path = "/menu/items/{id}",
    params(("id" = Uuid, Path, description = "Menu item id")),
    responses(
        (status = 200, description = "Item with customizations", body = MenuItemDetailsResponse),
        (status = 404, description = "Item not found"),
    ),
    tag = "menu"
)]
pub async fn item_details(
    catalog: web::Data<DieselCatalog>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let item_id = path.into_inner();
    let found = web::block(move || catalog.item_details(item_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;
    let Some((item, options)) = found else {
        return Err(AppError::NotFound(format!("menu item {item_id} not found")));
    };
    Ok(HttpResponse::Ok().json(MenuItemDetailsResponse {
        item: item_response(item),
        customization_options: options.into_iter().map(option_response).collect(),
    }))
}
