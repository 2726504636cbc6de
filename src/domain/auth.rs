use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Caller role, as established by the authenticating edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Admin,
    Kitchen,
    Rider,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Customer, Role::Admin, Role::Kitchen, Role::Rider];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Admin => "admin",
            Role::Kitchen => "kitchen",
            Role::Rider => "rider",
        }
    }

    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "customer" => Some(Role::Customer),
            "admin" => Some(Role::Admin),
            "kitchen" => Some(Role::Kitchen),
            "rider" => Some(Role::Rider),
            _ => None,
        }
    }
}

/// Everything a caller can ask the order core to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ViewOwnOrders,
    ViewAllOrders,
    ViewDeliveryQueue,
    AdvanceStatus,
    CancelOrder,
    AssignRider,
    ManageMenu,
}

impl Action {
    pub const ALL: [Action; 7] = [
        Action::ViewOwnOrders,
        Action::ViewAllOrders,
        Action::ViewDeliveryQueue,
        Action::AdvanceStatus,
        Action::CancelOrder,
        Action::AssignRider,
        Action::ManageMenu,
    ];
}

/// Whether `role` may perform `action`. Deny by default: anything not
/// listed here is refused.
pub fn allows(role: Role, action: Action) -> bool {
    match action {
        Action::ViewOwnOrders => true,
        Action::ViewAllOrders => matches!(role, Role::Admin | Role::Kitchen),
        Action::ViewDeliveryQueue => matches!(role, Role::Admin | Role::Rider),
        Action::AdvanceStatus => matches!(role, Role::Admin | Role::Kitchen),
        Action::CancelOrder => matches!(role, Role::Admin),
        Action::AssignRider => matches!(role, Role::Admin),
        Action::ManageMenu => matches!(role, Role::Admin),
    }
}
