use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::auth::Role;
use crate::domain::order::{
    Customizations, Order, OrderDetails, OrderItemInput, OrderItemView, OrderStatus,
    PaymentMethod, PaymentStatus,
};
use crate::errors::AppError;
use crate::handlers::caller::Caller;
use crate::{AppQueries, AppService};

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderItemRequest {
    pub menu_item_id: Uuid,
    pub quantity: i32,
    /// Customization option id mapped to the chosen value id.
    #[schema(value_type = Option<std::collections::HashMap<String, String>>)]
    pub customizations: Option<Customizations>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub items: Vec<CreateOrderItemRequest>,
    pub delivery_address: String,
    pub payment_method: PaymentMethod,
    /// Client-computed total, accepted for compatibility and ignored: the
    /// server always recomputes from the catalog.
    pub total_price: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateOrderResponse {
    pub order_id: Uuid,
    pub status: OrderStatus,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub status: OrderStatus,
    /// Decimal total as a string to avoid floating-point issues, e.g. "105.00"
    pub total_price: String,
    pub delivery_address: String,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub assigned_rider_id: Option<Uuid>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderItemResponse {
    pub id: Uuid,
    pub menu_item_id: Uuid,
    pub quantity: i32,
    pub unit_price: String,
    #[schema(value_type = Option<std::collections::HashMap<String, String>>)]
    pub customizations: Option<Customizations>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderDetailsResponse {
    pub order: OrderResponse,
    pub items: Vec<OrderItemResponse>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UpdateStatusResponse {
    pub success: bool,
    pub status: OrderStatus,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignRiderRequest {
    pub rider_id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RiderQueueParams {
    /// Admins may inspect a specific rider's queue; riders always get
    /// their own.
    pub rider_id: Option<Uuid>,
}

fn order_response(order: Order) -> OrderResponse {
    OrderResponse {
        id: order.id,
        customer_id: order.customer_id,
        status: order.status,
        total_price: order.total_price.to_string(),
        delivery_address: order.delivery_address,
        payment_method: order.payment_method,
        payment_status: order.payment_status,
        assigned_rider_id: order.assigned_rider_id,
        created_at: order.created_at.to_rfc3339(),
        updated_at: order.updated_at.to_rfc3339(),
    }
}

fn item_response(item: OrderItemView) -> OrderItemResponse {
    OrderItemResponse {
        id: item.id,
        menu_item_id: item.menu_item_id,
        quantity: item.quantity,
        unit_price: item.unit_price.to_string(),
        customizations: item.customizations,
    }
}

fn details_response(details: OrderDetails) -> OrderDetailsResponse {
    OrderDetailsResponse {
        order: order_response(details.order),
        items: details.items.into_iter().map(item_response).collect(),
    }
}

fn list_response(orders: Vec<Order>) -> Vec<OrderResponse> {
    orders.into_iter().map(order_response).collect()
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /orders
///
/// Creates an order for the calling customer. Prices are resolved from the
/// catalog on the server; the order and all of its items are written in a
/// single transaction.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = CreateOrderResponse),
        (status = 400, description = "Malformed input"),
        (status = 401, description = "Missing caller identity"),
        (status = 404, description = "Unknown menu item"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    service: web::Data<AppService>,
    caller: Caller,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    if let Some(hint) = &body.total_price {
        log::debug!("ignoring client total hint '{hint}' for customer {}", caller.user_id);
    }

    let items: Vec<OrderItemInput> = body
        .items
        .into_iter()
        .map(|i| OrderItemInput {
            menu_item_id: i.menu_item_id,
            quantity: i.quantity,
            customizations: i.customizations,
        })
        .collect();

    let (order_id, status) = web::block(move || {
        service.create_order(caller.user_id, &body.delivery_address, body.payment_method, items)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(CreateOrderResponse { order_id, status }))
}

/// GET /orders
///
/// The calling customer's own orders, newest first.
#[utoipa::path(
    get,
    path = "/orders",
    responses(
        (status = 200, description = "Caller's orders", body = [OrderResponse]),
        (status = 401, description = "Missing caller identity"),
    ),
    tag = "orders"
)]
pub async fn list_own_orders(
    queries: web::Data<AppQueries>,
    caller: Caller,
) -> Result<HttpResponse, AppError> {
    let orders = web::block(move || queries.own_orders(caller.user_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(HttpResponse::Ok().json(list_response(orders)))
}

/// GET /orders/{id}
///
/// Order with its items. Customers see only their own orders; staff see any.
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order found", body = OrderDetailsResponse),
        (status = 403, description = "Not the caller's order"),
        (status = 404, description = "Order not found"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    service: web::Data<AppService>,
    caller: Caller,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let details =
        web::block(move || service.order_details(caller.user_id, caller.role, order_id))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(HttpResponse::Ok().json(details_response(details)))
}

/// PUT /orders/{id}/status
///
/// Moves an order through the fulfillment lifecycle. Admin and kitchen may
/// advance; only admin may cancel, and only before preparation starts.
#[utoipa::path(
    put,
    path = "/orders/{id}/status",
    params(("id" = Uuid, Path, description = "Order id")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = UpdateStatusResponse),
        (status = 403, description = "Role may not perform this change"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Transition not allowed from current status"),
    ),
    tag = "orders"
)]
pub async fn update_status(
    service: web::Data<AppService>,
    caller: Caller,
    path: web::Path<Uuid>,
    body: web::Json<UpdateStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let new_status = body.into_inner().status;
    let status = web::block(move || service.update_status(caller.role, order_id, new_status))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(HttpResponse::Ok().json(UpdateStatusResponse {
        success: true,
        status,
    }))
}

/// PUT /orders/{id}/rider
///
/// Pins an order to a rider. Admin only.
#[utoipa::path(
    put,
    path = "/orders/{id}/rider",
    params(("id" = Uuid, Path, description = "Order id")),
    request_body = AssignRiderRequest,
    responses(
        (status = 200, description = "Rider assigned"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Order not found"),
    ),
    tag = "orders"
)]
pub async fn assign_rider(
    service: web::Data<AppService>,
    caller: Caller,
    path: web::Path<Uuid>,
    body: web::Json<AssignRiderRequest>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let rider_id = body.into_inner().rider_id;
    web::block(move || service.assign_rider(caller.role, order_id, rider_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
}

/// GET /admin/orders
///
/// Every order, newest first. Admin and kitchen.
#[utoipa::path(
    get,
    path = "/admin/orders",
    responses(
        (status = 200, description = "All orders", body = [OrderResponse]),
        (status = 403, description = "Staff only"),
    ),
    tag = "staff"
)]
pub async fn list_all_orders(
    queries: web::Data<AppQueries>,
    caller: Caller,
) -> Result<HttpResponse, AppError> {
    let orders = web::block(move || queries.all_orders(caller.role))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(HttpResponse::Ok().json(list_response(orders)))
}

/// GET /kitchen/queue
///
/// Confirmed and preparing orders, oldest first.
#[utoipa::path(
    get,
    path = "/kitchen/queue",
    responses(
        (status = 200, description = "Prep queue", body = [OrderResponse]),
        (status = 403, description = "Staff only"),
    ),
    tag = "staff"
)]
pub async fn kitchen_queue(
    queries: web::Data<AppQueries>,
    caller: Caller,
) -> Result<HttpResponse, AppError> {
    let orders = web::block(move || queries.kitchen_queue(caller.role))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(HttpResponse::Ok().json(list_response(orders)))
}

/// GET /rider/queue
///
/// Delivering orders for the calling rider, including the unassigned pool.
#[utoipa::path(
    get,
    path = "/rider/queue",
    params(("rider_id" = Option<Uuid>, Query, description = "Rider to inspect (admin only)")),
    responses(
        (status = 200, description = "Delivery queue", body = [OrderResponse]),
        (status = 403, description = "Rider or admin only"),
    ),
    tag = "staff"
)]
pub async fn rider_queue(
    queries: web::Data<AppQueries>,
    caller: Caller,
    params: web::Query<RiderQueueParams>,
) -> Result<HttpResponse, AppError> {
    let requested = params.into_inner().rider_id;
    let rider_id = match requested {
        Some(other) if other != caller.user_id && caller.role != Role::Admin => {
            return Err(AppError::Forbidden(
                "riders may only view their own queue".to_string(),
            ));
        }
        Some(other) => other,
        None => caller.user_id,
    };
    let orders = web::block(move || queries.rider_queue(caller.role, rider_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(HttpResponse::Ok().json(list_response(orders)))
}
