// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;
use crate::common::response::Pagination;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth / Accounts ---
        handlers::accounts::register,
        handlers::accounts::login,
        handlers::accounts::get_me,
        handlers::accounts::update_profile,
        handlers::accounts::change_password,
        handlers::accounts::create_staff,
        handlers::accounts::list_accounts,
        handlers::accounts::delete_account,

        // --- Menu ---
        handlers::menu::list_dishes,
        handlers::menu::list_types,
        handlers::menu::featured,
        handlers::menu::search,
        handlers::menu::get_dish,
        handlers::menu::create_dish,
        handlers::menu::update_dish,
        handlers::menu::delete_dish,

        // --- Coupons ---
        handlers::coupons::list_coupons,
        handlers::coupons::get_coupon,
        handlers::coupons::create_coupon,
        handlers::coupons::update_coupon,
        handlers::coupons::delete_coupon,

        // --- Cart ---
        handlers::cart::get_cart,
        handlers::cart::add_item,
        handlers::cart::update_item,
        handlers::cart::remove_item,

        // --- Orders ---
        handlers::orders::create_order,
        handlers::orders::order_menu,
        handlers::orders::add_item,
        handlers::orders::update_item,
        handlers::orders::remove_item,
        handlers::orders::create_from_cart,
        handlers::orders::history,
        handlers::orders::delete_history,
        handlers::orders::reorder,
        handlers::orders::update_status,
        handlers::orders::new_orders,

        // --- Payments ---
        handlers::payments::process_payment,
        handlers::payments::list_payments,
        handlers::payments::get_payment,
        handlers::payments::payment_receipt,

        // --- Rewards ---
        handlers::rewards::earn_points,
        handlers::rewards::redeem_points,
        handlers::rewards::history,
        handlers::rewards::balance,
        handlers::rewards::my_coupons,

        // --- Tables ---
        handlers::tables::list_tables,
        handlers::tables::get_table,
        handlers::tables::create_table,
        handlers::tables::update_table,
        handlers::tables::delete_table,

        // --- Reservations ---
        handlers::reservations::create_reservation,
        handlers::reservations::list_reservations,
        handlers::reservations::get_reservation,
        handlers::reservations::update_status,
        handlers::reservations::delete_reservation,

        // --- Favorites ---
        handlers::favorites::add_favorite,
        handlers::favorites::list_favorites,
        handlers::favorites::count_favorites,
        handlers::favorites::check_favorite,
        handlers::favorites::remove_favorite,

        // --- Incidents ---
        handlers::incidents::create_report,
        handlers::incidents::update_report,
        handlers::incidents::list_reports,
        handlers::incidents::update_status,
        handlers::incidents::delete_report,

        // --- Chat ---
        handlers::chat::send_message,
        handlers::chat::sent_messages,
        handlers::chat::conversation,
        handlers::chat::mark_read,
    ),
    components(
        schemas(
            Pagination,

            // --- Accounts ---
            models::account::Role,
            models::account::Account,
            models::account::RegisterPayload,
            models::account::LoginPayload,
            models::account::AuthResponse,
            models::account::UpdateProfilePayload,
            models::account::ChangePasswordPayload,
            models::account::CreateStaffPayload,

            // --- Menu ---
            models::menu::DishStatus,
            models::menu::IngredientStatus,
            models::menu::Dish,
            models::menu::CreateDishPayload,
            models::menu::UpdateDishPayload,

            // --- Cart ---
            models::cart::Cart,
            models::cart::CartLine,
            models::cart::CartView,
            models::cart::AddCartItemPayload,
            models::cart::UpdateCartItemPayload,

            // --- Orders ---
            models::order::OrderType,
            models::order::OrderStatus,
            models::order::Order,
            models::order::OrderItemDetail,
            models::order::OrderWithItems,
            models::order::OrderMenu,
            models::order::OrderLinePayload,
            models::order::CreateOrderPayload,
            models::order::CreateOrderFromCartPayload,
            models::order::AddOrderItemPayload,
            models::order::UpdateOrderItemPayload,
            models::order::UpdateOrderStatusPayload,

            // --- Coupons ---
            models::coupon::Coupon,
            models::coupon::CouponView,
            models::coupon::CreateCouponPayload,
            models::coupon::UpdateCouponPayload,
            models::coupon::UserCouponStatus,
            models::coupon::UserCoupon,

            // --- Payments ---
            models::payment::PaymentMethod,
            models::payment::PaymentStatus,
            models::payment::Payment,
            models::payment::ProcessPaymentPayload,
            models::payment::PaymentOutcome,
            models::payment::PaymentDetail,

            // --- Rewards ---
            models::reward::RewardPoint,
            models::reward::RewardHistory,
            models::reward::BalanceView,
            models::reward::EarnPointsPayload,
            models::reward::RedeemPointsPayload,
            models::reward::EarnResult,
            models::reward::RedeemResult,

            // --- Tables / Reservations ---
            models::table::TableStatus,
            models::table::DiningTable,
            models::table::CreateTablePayload,
            models::table::UpdateTablePayload,
            models::reservation::ReservationStatus,
            models::reservation::Reservation,
            models::reservation::CreateReservationPayload,
            models::reservation::UpdateReservationStatusPayload,

            // --- Favorites ---
            models::favorite::Favorite,
            models::favorite::FavoriteDish,
            models::favorite::AddFavoritePayload,
            models::favorite::FavoriteCheck,
            models::favorite::FavoriteCount,

            // --- Incidents ---
            models::incident::IncidentReport,
            models::incident::IncidentReportView,
            models::incident::CreateIncidentPayload,
            models::incident::UpdateIncidentPayload,
            models::incident::UpdateIncidentStatusPayload,

            // --- Chat ---
            models::chat::Message,
            models::chat::SendMessagePayload,
            models::chat::MarkReadResult,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Accounts", description = "Perfil e Contas de Funcionários"),
        (name = "Menu", description = "Cardápio"),
        (name = "Coupons", description = "Cupons de Desconto"),
        (name = "Cart", description = "Carrinho de Compras"),
        (name = "Orders", description = "Pedidos"),
        (name = "Payments", description = "Pagamentos e Recibos"),
        (name = "Rewards", description = "Pontos de Fidelidade"),
        (name = "Tables", description = "Mesas do Salão"),
        (name = "Reservations", description = "Reservas"),
        (name = "Favorites", description = "Pratos Favoritos"),
        (name = "Incidents", description = "Ocorrências da Equipe"),
        (name = "Chat", description = "Mensagens entre Contas")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_declares_bearer_scheme_and_core_paths() {
        let doc = ApiDoc::openapi();
        let components = doc.components.as_ref().unwrap();
        assert!(components.security_schemes.contains_key("api_jwt"));
        assert!(doc.paths.paths.contains_key("/api/payments"));
        assert!(doc.paths.paths.contains_key("/api/rewards/redeem"));
    }
}
