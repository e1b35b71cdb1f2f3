pub mod account_repo;
pub use account_repo::AccountRepository;
pub mod menu_repo;
pub use menu_repo::MenuRepository;
pub mod cart_repo;
pub use cart_repo::CartRepository;
pub mod order_repo;
pub use order_repo::OrderRepository;
pub mod coupon_repo;
pub use coupon_repo::CouponRepository;
pub mod payment_repo;
pub use payment_repo::PaymentRepository;
pub mod reward_repo;
pub use reward_repo::RewardRepository;
pub mod table_repo;
pub use table_repo::TableRepository;
pub mod reservation_repo;
pub use reservation_repo::ReservationRepository;
pub mod favorite_repo;
pub use favorite_repo::FavoriteRepository;
pub mod incident_repo;
pub use incident_repo::IncidentRepository;
pub mod chat_repo;
pub use chat_repo::ChatRepository;
