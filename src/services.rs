pub mod account_service;
pub mod cart_service;
pub mod chat_service;
pub mod coupon_service;
pub mod document_service;
pub mod favorite_service;
pub mod incident_service;
pub mod menu_service;
pub mod order_service;
pub mod payment_service;
pub mod reservation_service;
pub mod reward_service;
pub mod table_service;
