use std::collections::BTreeMap;
use std::fmt;

use bigdecimal::rounding::RoundingMode;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Customization selections for one order item: customization option id
/// mapped to the chosen value id. Stored as a snapshot with the item.
pub type Customizations = BTreeMap<Uuid, Uuid>;

/// Position of an order in the fulfillment lifecycle.
///
/// The only legal moves are one step forward along
/// pending -> confirmed -> preparing -> ready -> delivering -> completed,
/// plus cancellation while the kitchen has not started (pending or
/// confirmed). `Completed` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Delivering,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 7] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Delivering,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Delivering => "delivering",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<OrderStatus> {
        match s {
            "pending" => Some(OrderStatus::Pending),
            "confirmed" => Some(OrderStatus::Confirmed),
            "preparing" => Some(OrderStatus::Preparing),
            "ready" => Some(OrderStatus::Ready),
            "delivering" => Some(OrderStatus::Delivering),
            "completed" => Some(OrderStatus::Completed),
            "cancelled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }

    /// Whether moving from `self` to `next` is a legal lifecycle step.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        match (self, next) {
            (Pending, Confirmed)
            | (Confirmed, Preparing)
            | (Preparing, Ready)
            | (Ready, Delivering)
            | (Delivering, Completed) => true,
            // Cancellation only while no food has been committed.
            (Pending, Cancelled) | (Confirmed, Cancelled) => true,
            _ => false,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Transfer,
}

impl PaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Transfer => "transfer",
        }
    }

    pub fn parse(s: &str) -> Option<PaymentMethod> {
        match s {
            "cash" => Some(PaymentMethod::Cash),
            "transfer" => Some(PaymentMethod::Transfer),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<PaymentStatus> {
        match s {
            "pending" => Some(PaymentStatus::Pending),
            "completed" => Some(PaymentStatus::Completed),
            "failed" => Some(PaymentStatus::Failed),
            _ => None,
        }
    }
}

/// One item of an incoming order, before catalog prices are resolved.
#[derive(Debug, Clone)]
pub struct OrderItemInput {
    pub menu_item_id: Uuid,
    pub quantity: i32,
    pub customizations: Option<Customizations>,
}

/// One item of an order with its server-resolved unit price snapshot.
#[derive(Debug, Clone)]
pub struct PricedOrderItem {
    pub menu_item_id: Uuid,
    pub quantity: i32,
    pub unit_price: BigDecimal,
    pub customizations: Option<Customizations>,
}

/// A fully validated and priced order, ready to persist atomically.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer_id: Uuid,
    pub delivery_address: String,
    pub payment_method: PaymentMethod,
    pub total_price: BigDecimal,
    pub items: Vec<PricedOrderItem>,
}

#[derive(Debug, Clone)]
pub struct Order {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub status: OrderStatus,
    pub total_price: BigDecimal,
    pub delivery_address: String,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub assigned_rider_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct OrderItemView {
    pub id: Uuid,
    pub menu_item_id: Uuid,
    pub quantity: i32,
    pub unit_price: BigDecimal,
    pub customizations: Option<Customizations>,
}

#[derive(Debug, Clone)]
pub struct OrderDetails {
    pub order: Order,
    pub items: Vec<OrderItemView>,
}

/// Sum of unit price x quantity over `items`, at currency precision
/// (2 decimal places, half-up).
pub fn order_total(items: &[PricedOrderItem]) -> BigDecimal {
    let sum: BigDecimal = items
        .iter()
        .map(|i| &i.unit_price * BigDecimal::from(i.quantity))
        .sum();
    sum.with_scale_round(2, RoundingMode::HalfUp)
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).expect("valid decimal")
    }

    fn priced(qty: i32, price: &str) -> PricedOrderItem {
        PricedOrderItem {
            menu_item_id: Uuid::new_v4(),
            quantity: qty,
            unit_price: dec(price),
            customizations: None,
        }
    }

    #[test]
    fn forward_chain_is_legal_step_by_step() {
        use OrderStatus::*;
        let chain = [Pending, Confirmed, Preparing, Ready, Delivering, Completed];
        for pair in chain.windows(2) {
            assert!(
                pair[0].can_transition_to(pair[1]),
                "{} -> {} should be legal",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn skipping_a_state_is_illegal() {
        use OrderStatus::*;
        assert!(!Pending.can_transition_to(Preparing));
        assert!(!Confirmed.can_transition_to(Delivering));
        assert!(!Preparing.can_transition_to(Delivering));
        assert!(!Ready.can_transition_to(Completed));
    }

    #[test]
    fn going_backwards_is_illegal() {
        use OrderStatus::*;
        assert!(!Confirmed.can_transition_to(Pending));
        assert!(!Delivering.can_transition_to(Ready));
        assert!(!Completed.can_transition_to(Delivering));
    }

    #[test]
    fn cancellation_only_before_preparation() {
        use OrderStatus::*;
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(Cancelled));
        for from in [Preparing, Ready, Delivering, Completed, Cancelled] {
            assert!(
                !from.can_transition_to(Cancelled),
                "{} -> cancelled should be illegal",
                from
            );
        }
    }

    #[test]
    fn terminal_states_reject_every_target() {
        for from in [OrderStatus::Completed, OrderStatus::Cancelled] {
            assert!(from.is_terminal());
            for to in OrderStatus::ALL {
                assert!(
                    !from.can_transition_to(to),
                    "{} -> {} should be illegal",
                    from,
                    to
                );
            }
        }
    }

    #[test]
    fn no_state_transitions_to_itself() {
        for s in OrderStatus::ALL {
            assert!(!s.can_transition_to(s));
        }
    }

    #[test]
    fn status_str_roundtrip() {
        for s in OrderStatus::ALL {
            assert_eq!(OrderStatus::parse(s.as_str()), Some(s));
        }
        assert_eq!(OrderStatus::parse("shipped"), None);
    }

    #[test]
    fn payment_str_roundtrip() {
        for m in [PaymentMethod::Cash, PaymentMethod::Transfer] {
            assert_eq!(PaymentMethod::parse(m.as_str()), Some(m));
        }
        for p in [
            PaymentStatus::Pending,
            PaymentStatus::Completed,
            PaymentStatus::Failed,
        ] {
            assert_eq!(PaymentStatus::parse(p.as_str()), Some(p));
        }
        assert_eq!(PaymentMethod::parse("card"), None);
    }

    #[test]
    fn total_sums_price_times_quantity() {
        let items = vec![priced(2, "40.00"), priced(1, "25.00")];
        assert_eq!(order_total(&items), dec("105.00"));
    }

    #[test]
    fn total_rounds_half_up_to_two_decimals() {
        // 3 x 0.335 = 1.005, half-up -> 1.01
        let items = vec![priced(3, "0.335")];
        assert_eq!(order_total(&items), dec("1.01"));
    }

    #[test]
    fn total_of_no_items_is_zero() {
        assert_eq!(order_total(&[]), dec("0.00"));
    }
}
