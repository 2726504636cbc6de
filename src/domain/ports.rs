use bigdecimal::BigDecimal;
use uuid::Uuid;

use super::errors::DomainError;
use super::order::{NewOrder, Order, OrderDetails, OrderStatus};

/// Storage port for orders and their items.
///
/// `create` must persist the order and all of its items atomically, and
/// `transition_status` must re-check transition legality against the
/// currently persisted status while holding the row, so racing staff
/// updates serialize instead of losing one another.
pub trait OrderRepository: Send + Sync + 'static {
    fn create(&self, order: NewOrder) -> Result<Uuid, DomainError>;

    fn find_by_id(&self, id: Uuid) -> Result<Option<OrderDetails>, DomainError>;

    /// A customer's own orders, newest first.
    fn list_by_customer(&self, customer_id: Uuid) -> Result<Vec<Order>, DomainError>;

    /// Every order, newest first.
    fn list_all(&self) -> Result<Vec<Order>, DomainError>;

    /// Orders waiting on the kitchen (confirmed or preparing), oldest first.
    fn kitchen_queue(&self) -> Result<Vec<Order>, DomainError>;

    /// Delivering orders assigned to `rider_id` or still unassigned.
    fn rider_queue(&self, rider_id: Uuid) -> Result<Vec<Order>, DomainError>;

    fn transition_status(
        &self,
        id: Uuid,
        new_status: OrderStatus,
    ) -> Result<OrderStatus, DomainError>;

    fn assign_rider(&self, id: Uuid, rider_id: Uuid) -> Result<(), DomainError>;
}

/// Read-only view of the menu catalog, consulted at order time.
pub trait Catalog: Send + Sync + 'static {
    /// Current price of an orderable (available) menu item, or `None` if
    /// the item is unknown or not available.
    fn unit_price(&self, menu_item_id: Uuid) -> Result<Option<BigDecimal>, DomainError>;
}
