pub mod accounts;
pub mod cart;
pub mod chat;
pub mod coupons;
pub mod favorites;
pub mod incidents;
pub mod menu;
pub mod orders;
pub mod payments;
pub mod reservations;
pub mod rewards;
pub mod tables;
