use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{NewOrder, Order, OrderDetails, OrderStatus, PaymentStatus};
use crate::domain::ports::OrderRepository;
use crate::schema::{order_items, orders};

use super::models::{NewOrderItemRow, NewOrderRow, OrderItemRow, OrderRow};

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<diesel::result::Error> for DomainError {
    fn from(e: diesel::result::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

// ── Repository ────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn load_many(
        &self,
        rows: Vec<OrderRow>,
    ) -> Result<Vec<Order>, DomainError> {
        rows.into_iter().map(OrderRow::into_domain).collect()
    }
}

impl OrderRepository for DieselOrderRepository {
    fn create(&self, order: NewOrder) -> Result<Uuid, DomainError> {
        let mut conn = self.pool.get()?;

        // Order and items commit together; a failed item insert rolls the
        // whole order back, so partial orders are never visible.
        conn.transaction::<_, DomainError, _>(|conn| {
            let order_id = Uuid::new_v4();
            diesel::insert_into(orders::table)
                .values(&NewOrderRow {
                    id: order_id,
                    customer_id: order.customer_id,
                    status: OrderStatus::Pending.as_str().to_string(),
                    total_price: order.total_price.clone(),
                    delivery_address: order.delivery_address.clone(),
                    payment_method: order.payment_method.as_str().to_string(),
                    payment_status: PaymentStatus::Pending.as_str().to_string(),
                })
                .execute(conn)?;

            let item_rows = order
                .items
                .iter()
                .map(|i| {
                    let customizations = i
                        .customizations
                        .as_ref()
                        .map(serde_json::to_value)
                        .transpose()
                        .map_err(|e| {
                            DomainError::Internal(format!("customizations encoding: {e}"))
                        })?;
                    Ok(NewOrderItemRow {
                        id: Uuid::new_v4(),
                        order_id,
                        menu_item_id: i.menu_item_id,
                        quantity: i.quantity,
                        unit_price: i.unit_price.clone(),
                        customizations,
                    })
                })
                .collect::<Result<Vec<_>, DomainError>>()?;
            diesel::insert_into(order_items::table)
                .values(&item_rows)
                .execute(conn)?;

            Ok(order_id)
        })
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<OrderDetails>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = orders::table
            .filter(orders::id.eq(id))
            .select(OrderRow::as_select())
            .first(&mut conn)
            .optional()?;

        let Some(row) = row else {
            return Ok(None);
        };

        let item_rows = order_items::table
            .filter(order_items::order_id.eq(row.id))
            .order(order_items::created_at.asc())
            .select(OrderItemRow::as_select())
            .load(&mut conn)?;

        Ok(Some(OrderDetails {
            order: row.into_domain()?,
            items: item_rows
                .into_iter()
                .map(OrderItemRow::into_domain)
                .collect::<Result<Vec<_>, _>>()?,
        }))
    }

    fn list_by_customer(&self, customer_id: Uuid) -> Result<Vec<Order>, DomainError> {
        let mut conn = self.pool.get()?;
        let rows = orders::table
            .filter(orders::customer_id.eq(customer_id))
            .order(orders::created_at.desc())
            .select(OrderRow::as_select())
            .load(&mut conn)?;
        self.load_many(rows)
    }

    fn list_all(&self) -> Result<Vec<Order>, DomainError> {
        let mut conn = self.pool.get()?;
        let rows = orders::table
            .order(orders::created_at.desc())
            .select(OrderRow::as_select())
            .load(&mut conn)?;
        self.load_many(rows)
    }

    fn kitchen_queue(&self) -> Result<Vec<Order>, DomainError> {
        let mut conn = self.pool.get()?;
        let prep_states = [
            OrderStatus::Confirmed.as_str(),
            OrderStatus::Preparing.as_str(),
        ];
        let rows = orders::table
            .filter(orders::status.eq_any(prep_states))
            .order(orders::created_at.asc())
            .select(OrderRow::as_select())
            .load(&mut conn)?;
        self.load_many(rows)
    }

    fn rider_queue(&self, rider_id: Uuid) -> Result<Vec<Order>, DomainError> {
        let mut conn = self.pool.get()?;
        let rows = orders::table
            .filter(orders::status.eq(OrderStatus::Delivering.as_str()))
            .filter(
                orders::assigned_rider_id
                    .eq(rider_id)
                    .or(orders::assigned_rider_id.is_null()),
            )
            .order(orders::created_at.asc())
            .select(OrderRow::as_select())
            .load(&mut conn)?;
        self.load_many(rows)
    }

    fn transition_status(
        &self,
        id: Uuid,
        new_status: OrderStatus,
    ) -> Result<OrderStatus, DomainError> {
        let mut conn = self.pool.get()?;

        // Row lock so two racing staff updates serialize: legality is
        // re-checked against the status that is actually persisted, not a
        // value read earlier by the caller.
        conn.transaction::<_, DomainError, _>(|conn| {
            let row = orders::table
                .filter(orders::id.eq(id))
                .select(OrderRow::as_select())
                .for_update()
                .first(conn)
                .optional()?;
            let Some(row) = row else {
                return Err(DomainError::not_found(format!("order {id}")));
            };

            let current = OrderStatus::parse(&row.status).ok_or_else(|| {
                DomainError::Internal(format!("unknown order status '{}'", row.status))
            })?;
            if !current.can_transition_to(new_status) {
                return Err(DomainError::InvalidTransition {
                    from: current,
                    to: new_status,
                });
            }

            diesel::update(orders::table.filter(orders::id.eq(id)))
                .set((
                    orders::status.eq(new_status.as_str()),
                    orders::updated_at.eq(diesel::dsl::now),
                ))
                .execute(conn)?;
            Ok(new_status)
        })
    }

    fn assign_rider(&self, id: Uuid, rider_id: Uuid) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;
        let updated = diesel::update(orders::table.filter(orders::id.eq(id)))
            .set((
                orders::assigned_rider_id.eq(rider_id),
                orders::updated_at.eq(diesel::dsl::now),
            ))
            .execute(&mut conn)?;
        if updated == 0 {
            return Err(DomainError::not_found(format!("order {id}")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::str::FromStr;

    use bigdecimal::BigDecimal;
    use uuid::Uuid;

    use super::DieselOrderRepository;
    use crate::domain::errors::DomainError;
    use crate::domain::order::{
        NewOrder, OrderStatus, PaymentMethod, PaymentStatus, PricedOrderItem,
    };
    use crate::domain::ports::OrderRepository;
    use crate::infrastructure::test_support::setup_db;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).expect("valid decimal")
    }

    fn new_order(customer_id: Uuid, items: Vec<PricedOrderItem>, total: &str) -> NewOrder {
        NewOrder {
            customer_id,
            delivery_address: "12 Main St".to_string(),
            payment_method: PaymentMethod::Cash,
            total_price: dec(total),
            items,
        }
    }

    fn priced_item(qty: i32, price: &str) -> PricedOrderItem {
        PricedOrderItem {
            menu_item_id: Uuid::new_v4(),
            quantity: qty,
            unit_price: dec(price),
            customizations: None,
        }
    }

    #[tokio::test]
    async fn create_and_find_by_id_roundtrip() {
        let (_container, pool) = setup_db().await;
        let repo = DieselOrderRepository::new(pool);
        let customer_id = Uuid::new_v4();

        let order_id = repo
            .create(new_order(
                customer_id,
                vec![priced_item(2, "40.00"), priced_item(1, "25.00")],
                "105.00",
            ))
            .expect("create failed");

        let details = repo
            .find_by_id(order_id)
            .expect("find failed")
            .expect("order should exist");

        assert_eq!(details.order.id, order_id);
        assert_eq!(details.order.customer_id, customer_id);
        assert_eq!(details.order.status, OrderStatus::Pending);
        assert_eq!(details.order.payment_status, PaymentStatus::Pending);
        assert_eq!(details.order.total_price, dec("105.00"));
        assert_eq!(details.items.len(), 2);
        assert_eq!(details.items[0].quantity, 2);
        assert_eq!(details.items[0].unit_price, dec("40.00"));
    }

    #[tokio::test]
    async fn customizations_survive_the_jsonb_roundtrip() {
        let (_container, pool) = setup_db().await;
        let repo = DieselOrderRepository::new(pool);
        let option_id = Uuid::new_v4();
        let value_id = Uuid::new_v4();
        let mut selections = BTreeMap::new();
        selections.insert(option_id, value_id);

        let order_id = repo
            .create(new_order(
                Uuid::new_v4(),
                vec![PricedOrderItem {
                    menu_item_id: Uuid::new_v4(),
                    quantity: 1,
                    unit_price: dec("9.50"),
                    customizations: Some(selections.clone()),
                }],
                "9.50",
            ))
            .expect("create failed");

        let details = repo.find_by_id(order_id).unwrap().unwrap();
        assert_eq!(details.items[0].customizations, Some(selections));
    }

    #[tokio::test]
    async fn find_by_id_returns_none_for_unknown_id() {
        let (_container, pool) = setup_db().await;
        let repo = DieselOrderRepository::new(pool);

        let result = repo
            .find_by_id(Uuid::new_v4())
            .expect("find should not error");

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn legal_transition_persists_and_bumps_updated_at() {
        let (_container, pool) = setup_db().await;
        let repo = DieselOrderRepository::new(pool);
        let order_id = repo
            .create(new_order(Uuid::new_v4(), vec![priced_item(1, "5.00")], "5.00"))
            .expect("create failed");
        let before = repo.find_by_id(order_id).unwrap().unwrap().order.updated_at;

        let status = repo
            .transition_status(order_id, OrderStatus::Confirmed)
            .expect("transition failed");

        assert_eq!(status, OrderStatus::Confirmed);
        let after = repo.find_by_id(order_id).unwrap().unwrap().order;
        assert_eq!(after.status, OrderStatus::Confirmed);
        assert!(after.updated_at >= before);
        // Totals and items are untouched by a status change.
        assert_eq!(after.total_price, dec("5.00"));
    }

    #[tokio::test]
    async fn illegal_transition_is_rejected_and_leaves_status_alone() {
        let (_container, pool) = setup_db().await;
        let repo = DieselOrderRepository::new(pool);
        let order_id = repo
            .create(new_order(Uuid::new_v4(), vec![priced_item(1, "5.00")], "5.00"))
            .expect("create failed");

        let err = repo
            .transition_status(order_id, OrderStatus::Delivering)
            .expect_err("pending -> delivering must fail");

        assert!(matches!(
            err,
            DomainError::InvalidTransition {
                from: OrderStatus::Pending,
                to: OrderStatus::Delivering,
            }
        ));
        let details = repo.find_by_id(order_id).unwrap().unwrap();
        assert_eq!(details.order.status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn transition_of_unknown_order_is_not_found() {
        let (_container, pool) = setup_db().await;
        let repo = DieselOrderRepository::new(pool);

        let err = repo
            .transition_status(Uuid::new_v4(), OrderStatus::Confirmed)
            .expect_err("unknown order");
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn list_by_customer_is_scoped_and_newest_first() {
        let (_container, pool) = setup_db().await;
        let repo = DieselOrderRepository::new(pool);
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        let first = repo
            .create(new_order(alice, vec![priced_item(1, "1.00")], "1.00"))
            .unwrap();
        repo.create(new_order(bob, vec![priced_item(1, "2.00")], "2.00"))
            .unwrap();
        let last = repo
            .create(new_order(alice, vec![priced_item(1, "3.00")], "3.00"))
            .unwrap();

        let orders = repo.list_by_customer(alice).expect("list failed");
        let ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![last, first]);
    }

    #[tokio::test]
    async fn kitchen_queue_is_fifo_over_prep_states() {
        let (_container, pool) = setup_db().await;
        let repo = DieselOrderRepository::new(pool);
        let customer = Uuid::new_v4();

        let oldest = repo
            .create(new_order(customer, vec![priced_item(1, "1.00")], "1.00"))
            .unwrap();
        let still_pending = repo
            .create(new_order(customer, vec![priced_item(1, "1.00")], "1.00"))
            .unwrap();
        let newest = repo
            .create(new_order(customer, vec![priced_item(1, "1.00")], "1.00"))
            .unwrap();
        repo.transition_status(oldest, OrderStatus::Confirmed).unwrap();
        repo.transition_status(oldest, OrderStatus::Preparing).unwrap();
        repo.transition_status(newest, OrderStatus::Confirmed).unwrap();

        let queue = repo.kitchen_queue().expect("queue failed");
        let ids: Vec<Uuid> = queue.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![oldest, newest]);
        assert!(!ids.contains(&still_pending));
    }

    #[tokio::test]
    async fn rider_queue_returns_own_and_unassigned_deliveries() {
        let (_container, pool) = setup_db().await;
        let repo = DieselOrderRepository::new(pool);
        let customer = Uuid::new_v4();
        let rider = Uuid::new_v4();
        let other_rider = Uuid::new_v4();

        let deliver = |repo: &DieselOrderRepository, id: Uuid| {
            repo.transition_status(id, OrderStatus::Confirmed).unwrap();
            repo.transition_status(id, OrderStatus::Preparing).unwrap();
            repo.transition_status(id, OrderStatus::Ready).unwrap();
            repo.transition_status(id, OrderStatus::Delivering).unwrap();
        };

        let mine = repo
            .create(new_order(customer, vec![priced_item(1, "1.00")], "1.00"))
            .unwrap();
        let pool_order = repo
            .create(new_order(customer, vec![priced_item(1, "1.00")], "1.00"))
            .unwrap();
        let theirs = repo
            .create(new_order(customer, vec![priced_item(1, "1.00")], "1.00"))
            .unwrap();
        deliver(&repo, mine);
        deliver(&repo, pool_order);
        deliver(&repo, theirs);
        repo.assign_rider(mine, rider).unwrap();
        repo.assign_rider(theirs, other_rider).unwrap();

        let queue = repo.rider_queue(rider).expect("queue failed");
        let ids: Vec<Uuid> = queue.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![mine, pool_order]);
    }

    #[tokio::test]
    async fn assign_rider_to_unknown_order_is_not_found() {
        let (_container, pool) = setup_db().await;
        let repo = DieselOrderRepository::new(pool);

        let err = repo
            .assign_rider(Uuid::new_v4(), Uuid::new_v4())
            .expect_err("unknown order");
        assert!(matches!(err, DomainError::NotFound(_)));
    }
}
