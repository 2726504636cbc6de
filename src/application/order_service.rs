use uuid::Uuid;

use crate::domain::auth::{self, Action, Role};
use crate::domain::errors::DomainError;
use crate::domain::order::{
    order_total, NewOrder, OrderDetails, OrderItemInput, OrderStatus, PaymentMethod,
    PricedOrderItem,
};
use crate::domain::ports::{Catalog, OrderRepository};

/// Command side of the order core: validates input, resolves catalog
/// prices, enforces the role and transition rules, and delegates the
/// actual writes to the repository.
pub struct OrderService<R, C> {
    repo: R,
    catalog: C,
}

impl<R: OrderRepository, C: Catalog> OrderService<R, C> {
    pub fn new(repo: R, catalog: C) -> Self {
        Self { repo, catalog }
    }

    /// Create an order for `customer_id`.
    ///
    /// Unit prices are resolved from the catalog here, never taken from the
    /// caller, and the whole order is persisted atomically: an unknown item
    /// or a storage failure leaves nothing behind.
    pub fn create_order(
        &self,
        customer_id: Uuid,
        delivery_address: &str,
        payment_method: PaymentMethod,
        items: Vec<OrderItemInput>,
    ) -> Result<(Uuid, OrderStatus), DomainError> {
        if items.is_empty() {
            return Err(DomainError::validation("order must contain at least one item"));
        }
        let address = delivery_address.trim();
        if address.is_empty() {
            return Err(DomainError::validation("delivery address must not be empty"));
        }

        let mut priced = Vec::with_capacity(items.len());
        for item in items {
            if item.quantity < 1 {
                return Err(DomainError::validation(format!(
                    "quantity for menu item {} must be at least 1",
                    item.menu_item_id
                )));
            }
            let unit_price = self
                .catalog
                .unit_price(item.menu_item_id)?
                .ok_or_else(|| {
                    DomainError::not_found(format!("menu item {}", item.menu_item_id))
                })?;
            priced.push(PricedOrderItem {
                menu_item_id: item.menu_item_id,
                quantity: item.quantity,
                unit_price,
                customizations: item.customizations,
            });
        }

        let total_price = order_total(&priced);
        let order_id = self.repo.create(NewOrder {
            customer_id,
            delivery_address: address.to_string(),
            payment_method,
            total_price,
            items: priced,
        })?;
        log::info!("created order {} for customer {}", order_id, customer_id);
        Ok((order_id, OrderStatus::Pending))
    }

    /// Fetch an order with its items. Customers may only see their own
    /// orders; staff roles may see any.
    pub fn order_details(
        &self,
        caller_id: Uuid,
        caller_role: Role,
        order_id: Uuid,
    ) -> Result<OrderDetails, DomainError> {
        let details = self
            .repo
            .find_by_id(order_id)?
            .ok_or_else(|| DomainError::not_found(format!("order {order_id}")))?;
        if caller_role == Role::Customer && details.order.customer_id != caller_id {
            return Err(DomainError::forbidden(
                "customers may only view their own orders",
            ));
        }
        Ok(details)
    }

    /// Move an order to `new_status`.
    ///
    /// Cancellation is an admin decision; every other move is open to admin
    /// and kitchen. Transition legality is re-checked by the repository
    /// against the persisted status while the row is held.
    pub fn update_status(
        &self,
        caller_role: Role,
        order_id: Uuid,
        new_status: OrderStatus,
    ) -> Result<OrderStatus, DomainError> {
        let action = if new_status == OrderStatus::Cancelled {
            Action::CancelOrder
        } else {
            Action::AdvanceStatus
        };
        if !auth::allows(caller_role, action) {
            return Err(DomainError::forbidden(format!(
                "role {} may not set order status to {}",
                caller_role.as_str(),
                new_status
            )));
        }
        let status = self.repo.transition_status(order_id, new_status)?;
        log::info!("order {} moved to {}", order_id, status);
        Ok(status)
    }

    /// Pin a delivering-or-soon-to-deliver order to one rider. Admin only.
    pub fn assign_rider(
        &self,
        caller_role: Role,
        order_id: Uuid,
        rider_id: Uuid,
    ) -> Result<(), DomainError> {
        if !auth::allows(caller_role, Action::AssignRider) {
            return Err(DomainError::forbidden(format!(
                "role {} may not assign riders",
                caller_role.as_str()
            )));
        }
        self.repo.assign_rider(order_id, rider_id)
    }
}
