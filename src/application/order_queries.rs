use uuid::Uuid;

use crate::domain::auth::{self, Action, Role};
use crate::domain::errors::DomainError;
use crate::domain::order::Order;
use crate::domain::ports::OrderRepository;

/// Read-side facade: one role-scoped projection per dashboard, each a
/// gate plus a single repository call. All reads are idempotent.
pub struct OrderQueries<R> {
    repo: R,
}

impl<R: OrderRepository> OrderQueries<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// The caller's own orders, newest first.
    pub fn own_orders(&self, caller_id: Uuid) -> Result<Vec<Order>, DomainError> {
        self.repo.list_by_customer(caller_id)
    }

    /// Every order, newest first. Admin and kitchen.
    pub fn all_orders(&self, caller_role: Role) -> Result<Vec<Order>, DomainError> {
        if !auth::allows(caller_role, Action::ViewAllOrders) {
            return Err(DomainError::forbidden(format!(
                "role {} may not view all orders",
                caller_role.as_str()
            )));
        }
        self.repo.list_all()
    }

    /// Orders waiting on prep (confirmed or preparing), oldest first so
    /// the kitchen works in arrival order.
    pub fn kitchen_queue(&self, caller_role: Role) -> Result<Vec<Order>, DomainError> {
        if !auth::allows(caller_role, Action::ViewAllOrders) {
            return Err(DomainError::forbidden(format!(
                "role {} may not view the kitchen queue",
                caller_role.as_str()
            )));
        }
        self.repo.kitchen_queue()
    }

    /// Delivering orders for `rider_id`, including the unassigned pool.
    pub fn rider_queue(
        &self,
        caller_role: Role,
        rider_id: Uuid,
    ) -> Result<Vec<Order>, DomainError> {
        if !auth::allows(caller_role, Action::ViewDeliveryQueue) {
            return Err(DomainError::forbidden(format!(
                "role {} may not view the delivery queue",
                caller_role.as_str()
            )));
        }
        self.repo.rider_queue(rider_id)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;

    use super::*;
    use crate::application::fakes::InMemoryOrders;
    use crate::domain::order::{NewOrder, OrderStatus, PaymentMethod, PricedOrderItem};

    fn seed_order(repo: &InMemoryOrders, customer: Uuid) -> Uuid {
        repo.create(NewOrder {
            customer_id: customer,
            delivery_address: "12 Main St".to_string(),
            payment_method: PaymentMethod::Cash,
            total_price: BigDecimal::from_str("10.00").unwrap(),
            items: vec![PricedOrderItem {
                menu_item_id: Uuid::new_v4(),
                quantity: 1,
                unit_price: BigDecimal::from_str("10.00").unwrap(),
                customizations: None,
            }],
        })
        .expect("seed failed")
    }

    #[test]
    fn own_orders_are_scoped_and_newest_first() {
        let repo = InMemoryOrders::new();
        let queries = OrderQueries::new(repo.clone());
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        let first = seed_order(&repo, alice);
        seed_order(&repo, bob);
        let last = seed_order(&repo, alice);

        let orders = queries.own_orders(alice).expect("query failed");
        let ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![last, first]);
    }

    #[test]
    fn all_orders_requires_staff_visibility() {
        let repo = InMemoryOrders::new();
        let queries = OrderQueries::new(repo.clone());
        seed_order(&repo, Uuid::new_v4());

        assert_eq!(queries.all_orders(Role::Admin).unwrap().len(), 1);
        assert_eq!(queries.all_orders(Role::Kitchen).unwrap().len(), 1);
        for role in [Role::Customer, Role::Rider] {
            assert!(matches!(
                queries.all_orders(role),
                Err(DomainError::Forbidden(_))
            ));
        }
    }

    #[test]
    fn kitchen_queue_is_fifo_over_prep_states() {
        let repo = InMemoryOrders::new();
        let queries = OrderQueries::new(repo.clone());
        let customer = Uuid::new_v4();

        let oldest = seed_order(&repo, customer);
        let pending = seed_order(&repo, customer);
        let newest = seed_order(&repo, customer);
        repo.set_status(oldest, OrderStatus::Preparing);
        repo.set_status(newest, OrderStatus::Confirmed);
        let _ = pending; // stays pending, must not appear

        let queue = queries.kitchen_queue(Role::Kitchen).expect("query failed");
        let ids: Vec<Uuid> = queue.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![oldest, newest]);

        assert!(matches!(
            queries.kitchen_queue(Role::Rider),
            Err(DomainError::Forbidden(_))
        ));
    }

    #[test]
    fn rider_queue_covers_own_and_unassigned_deliveries() {
        let repo = InMemoryOrders::new();
        let queries = OrderQueries::new(repo.clone());
        let customer = Uuid::new_v4();
        let rider = Uuid::new_v4();
        let other_rider = Uuid::new_v4();

        let mine = seed_order(&repo, customer);
        let pool = seed_order(&repo, customer);
        let theirs = seed_order(&repo, customer);
        let not_out = seed_order(&repo, customer);
        repo.set_status(mine, OrderStatus::Delivering);
        repo.set_status(pool, OrderStatus::Delivering);
        repo.set_status(theirs, OrderStatus::Delivering);
        repo.assign_rider(mine, rider).unwrap();
        repo.assign_rider(theirs, other_rider).unwrap();
        let _ = not_out; // still pending, must not appear

        let queue = queries
            .rider_queue(Role::Rider, rider)
            .expect("query failed");
        let ids: Vec<Uuid> = queue.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![mine, pool]);

        for role in [Role::Customer, Role::Kitchen] {
            assert!(matches!(
                queries.rider_queue(role, rider),
                Err(DomainError::Forbidden(_))
            ));
        }
    }
}
