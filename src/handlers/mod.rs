pub mod caller;
pub mod menu;
pub mod orders;
