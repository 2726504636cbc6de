//! In-memory stand-ins for the storage ports, used by the application
//! layer tests. The order fake mirrors the repository contract, including
//! the check-inside-the-lock transition rule.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use bigdecimal::BigDecimal;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{
    NewOrder, Order, OrderDetails, OrderItemView, OrderStatus, PaymentStatus,
};
use crate::domain::ports::{Catalog, OrderRepository};

struct StoredOrder {
    seq: u64,
    order: Order,
    items: Vec<OrderItemView>,
}

#[derive(Clone, Default)]
pub struct InMemoryOrders {
    inner: Arc<Mutex<Vec<StoredOrder>>>,
}

impl InMemoryOrders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Force a stored order's status, bypassing the transition rules.
    /// Lets tests park an order in an arbitrary lifecycle position.
    pub fn set_status(&self, id: Uuid, status: OrderStatus) {
        let mut store = self.inner.lock().unwrap();
        let stored = store
            .iter_mut()
            .find(|s| s.order.id == id)
            .expect("order should exist");
        stored.order.status = status;
    }

    pub fn updated_at_of(&self, id: Uuid) -> chrono::DateTime<Utc> {
        let store = self.inner.lock().unwrap();
        store
            .iter()
            .find(|s| s.order.id == id)
            .expect("order should exist")
            .order
            .updated_at
    }
}

impl OrderRepository for InMemoryOrders {
    fn create(&self, order: NewOrder) -> Result<Uuid, DomainError> {
        let mut store = self.inner.lock().unwrap();
        let id = Uuid::new_v4();
        let now = Utc::now();
        let items = order
            .items
            .into_iter()
            .map(|i| OrderItemView {
                id: Uuid::new_v4(),
                menu_item_id: i.menu_item_id,
                quantity: i.quantity,
                unit_price: i.unit_price,
                customizations: i.customizations,
            })
            .collect();
        let seq = store.len() as u64;
        store.push(StoredOrder {
            seq,
            order: Order {
                id,
                customer_id: order.customer_id,
                status: OrderStatus::Pending,
                total_price: order.total_price,
                delivery_address: order.delivery_address,
                payment_method: order.payment_method,
                payment_status: PaymentStatus::Pending,
                assigned_rider_id: None,
                created_at: now,
                updated_at: now,
            },
            items,
        });
        Ok(id)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<OrderDetails>, DomainError> {
        let store = self.inner.lock().unwrap();
        Ok(store.iter().find(|s| s.order.id == id).map(|s| OrderDetails {
            order: s.order.clone(),
            items: s.items.clone(),
        }))
    }

    fn list_by_customer(&self, customer_id: Uuid) -> Result<Vec<Order>, DomainError> {
        let store = self.inner.lock().unwrap();
        let mut hits: Vec<&StoredOrder> = store
            .iter()
            .filter(|s| s.order.customer_id == customer_id)
            .collect();
        hits.sort_by(|a, b| b.seq.cmp(&a.seq));
        Ok(hits.into_iter().map(|s| s.order.clone()).collect())
    }

    fn list_all(&self) -> Result<Vec<Order>, DomainError> {
        let store = self.inner.lock().unwrap();
        let mut hits: Vec<&StoredOrder> = store.iter().collect();
        hits.sort_by(|a, b| b.seq.cmp(&a.seq));
        Ok(hits.into_iter().map(|s| s.order.clone()).collect())
    }

    fn kitchen_queue(&self) -> Result<Vec<Order>, DomainError> {
        let store = self.inner.lock().unwrap();
        let mut hits: Vec<&StoredOrder> = store
            .iter()
            .filter(|s| {
                matches!(
                    s.order.status,
                    OrderStatus::Confirmed | OrderStatus::Preparing
                )
            })
            .collect();
        hits.sort_by(|a, b| a.seq.cmp(&b.seq));
        Ok(hits.into_iter().map(|s| s.order.clone()).collect())
    }

    fn rider_queue(&self, rider_id: Uuid) -> Result<Vec<Order>, DomainError> {
        let store = self.inner.lock().unwrap();
        let mut hits: Vec<&StoredOrder> = store
            .iter()
            .filter(|s| {
                s.order.status == OrderStatus::Delivering
                    && s.order
                        .assigned_rider_id
                        .map(|r| r == rider_id)
                        .unwrap_or(true)
            })
            .collect();
        hits.sort_by(|a, b| a.seq.cmp(&b.seq));
        Ok(hits.into_iter().map(|s| s.order.clone()).collect())
    }

    fn transition_status(
        &self,
        id: Uuid,
        new_status: OrderStatus,
    ) -> Result<OrderStatus, DomainError> {
        let mut store = self.inner.lock().unwrap();
        let stored = store
            .iter_mut()
            .find(|s| s.order.id == id)
            .ok_or_else(|| DomainError::not_found(format!("order {id}")))?;
        let current = stored.order.status;
        if !current.can_transition_to(new_status) {
            return Err(DomainError::InvalidTransition {
                from: current,
                to: new_status,
            });
        }
        stored.order.status = new_status;
        stored.order.updated_at = Utc::now();
        Ok(new_status)
    }

    fn assign_rider(&self, id: Uuid, rider_id: Uuid) -> Result<(), DomainError> {
        let mut store = self.inner.lock().unwrap();
        let stored = store
            .iter_mut()
            .find(|s| s.order.id == id)
            .ok_or_else(|| DomainError::not_found(format!("order {id}")))?;
        stored.order.assigned_rider_id = Some(rider_id);
        stored.order.updated_at = Utc::now();
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct InMemoryCatalog {
    prices: Arc<Mutex<HashMap<Uuid, BigDecimal>>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(self, id: Uuid, price: &str) -> Self {
        use std::str::FromStr;
        self.prices
            .lock()
            .unwrap()
            .insert(id, BigDecimal::from_str(price).expect("valid decimal"));
        self
    }
}

impl Catalog for InMemoryCatalog {
    fn unit_price(&self, menu_item_id: Uuid) -> Result<Option<BigDecimal>, DomainError> {
        Ok(self.prices.lock().unwrap().get(&menu_item_id).cloned())
    }
}
