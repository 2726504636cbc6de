use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{
    Customizations, Order, OrderItemView, OrderStatus, PaymentMethod, PaymentStatus,
};
use crate::schema::{
    categories, customization_options, customization_values, menu_items, order_items, orders,
};

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub status: String,
    pub total_price: BigDecimal,
    pub delivery_address: String,
    pub payment_method: String,
    pub payment_status: String,
    pub assigned_rider_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderRow {
    /// Lift a stored row into the domain view. Unknown enum text means the
    /// row predates the schema constraints and is treated as corruption.
    pub fn into_domain(self) -> Result<Order, DomainError> {
        let status = OrderStatus::parse(&self.status)
            .ok_or_else(|| DomainError::Internal(format!("unknown order status '{}'", self.status)))?;
        let payment_method = PaymentMethod::parse(&self.payment_method).ok_or_else(|| {
            DomainError::Internal(format!("unknown payment method '{}'", self.payment_method))
        })?;
        let payment_status = PaymentStatus::parse(&self.payment_status).ok_or_else(|| {
            DomainError::Internal(format!("unknown payment status '{}'", self.payment_status))
        })?;
        Ok(Order {
            id: self.id,
            customer_id: self.customer_id,
            status,
            total_price: self.total_price,
            delivery_address: self.delivery_address,
            payment_method,
            payment_status,
            assigned_rider_id: self.assigned_rider_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub status: String,
    pub total_price: BigDecimal,
    pub delivery_address: String,
    pub payment_method: String,
    pub payment_status: String,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = order_items)]
#[diesel(belongs_to(OrderRow, foreign_key = order_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderItemRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub menu_item_id: Uuid,
    pub quantity: i32,
    pub unit_price: BigDecimal,
    pub customizations: Option<Value>,
    pub created_at: DateTime<Utc>,
}

impl OrderItemRow {
    pub fn into_domain(self) -> Result<OrderItemView, DomainError> {
        let customizations: Option<Customizations> = self
            .customizations
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| DomainError::Internal(format!("bad customization payload: {e}")))?;
        Ok(OrderItemView {
            id: self.id,
            menu_item_id: self.menu_item_id,
            quantity: self.quantity,
            unit_price: self.unit_price,
            customizations,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_items)]
pub struct NewOrderItemRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub menu_item_id: Uuid,
    pub quantity: i32,
    pub unit_price: BigDecimal,
    pub customizations: Option<Value>,
}

// ── Catalog rows (read-only for the order core; insertables exist for
//    provisioning and tests) ──────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CategoryRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = categories)]
pub struct NewCategoryRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub position: i32,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = menu_items)]
#[diesel(belongs_to(CategoryRow, foreign_key = category_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MenuItemRow {
    pub id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: BigDecimal,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = menu_items)]
pub struct NewMenuItemRow {
    pub id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: BigDecimal,
    pub is_available: bool,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = customization_options)]
#[diesel(belongs_to(MenuItemRow, foreign_key = menu_item_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CustomizationOptionRow {
    pub id: Uuid,
    pub menu_item_id: Uuid,
    pub name: String,
    pub kind: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = customization_options)]
pub struct NewCustomizationOptionRow {
    pub id: Uuid,
    pub menu_item_id: Uuid,
    pub name: String,
    pub kind: String,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = customization_values)]
#[diesel(belongs_to(CustomizationOptionRow, foreign_key = option_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CustomizationValueRow {
    pub id: Uuid,
    pub option_id: Uuid,
    pub value: String,
    pub price_modifier: BigDecimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = customization_values)]
pub struct NewCustomizationValueRow {
    pub id: Uuid,
    pub option_id: Uuid,
    pub value: String,
    pub price_modifier: BigDecimal,
}
