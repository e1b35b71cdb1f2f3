pub mod account;
pub mod cart;
pub mod chat;
pub mod coupon;
pub mod favorite;
pub mod incident;
pub mod menu;
pub mod order;
pub mod payment;
pub mod reservation;
pub mod reward;
pub mod table;
