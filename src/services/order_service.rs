// src/services/order_service.rs

use std::collections::HashMap;

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        response::{PageRequest, Paginated},
    },
    db::{CartRepository, MenuRepository, OrderRepository, TableRepository},
    middleware::auth::AuthenticatedUser,
    models::{
        menu::ensure_valid_quantity,
        order::{
            merge_lines, order_total, AddOrderItemPayload, CreateOrderFromCartPayload,
            CreateOrderPayload, NewOrderLine, NewOrdersQuery, Order, OrderHistoryQuery,
            OrderItemDetail, OrderMenu, OrderStatus, OrderType, OrderWithItems,
        },
    },
};

// Cabeçalho do pedido a ser gravado junto com as linhas.
struct OrderDraft<'a> {
    account_id: Option<Uuid>,
    customer_phone: Option<&'a str>,
    table_id: Option<Uuid>,
    order_type: OrderType,
    description: Option<&'a str>,
}

#[derive(Clone)]
pub struct OrderService {
    order_repo: OrderRepository,
    menu_repo: MenuRepository,
    cart_repo: CartRepository,
    table_repo: TableRepository,
    pool: PgPool,
}

impl OrderService {
    pub fn new(
        order_repo: OrderRepository,
        menu_repo: MenuRepository,
        cart_repo: CartRepository,
        table_repo: TableRepository,
        pool: PgPool,
    ) -> Self {
        Self {
            order_repo,
            menu_repo,
            cart_repo,
            table_repo,
            pool,
        }
    }

    // =========================================================================
    //  CRIAÇÃO (pedido + itens na mesma transação)
    // =========================================================================

    pub async fn create_order(
        &self,
        actor: Option<&AuthenticatedUser>,
        payload: &CreateOrderPayload,
    ) -> Result<OrderWithItems, AppError> {
        let mut tx = self.pool.begin().await?;

        self.check_table(&mut tx, payload.table_id).await?;

        let mut lines = Vec::with_capacity(payload.items.len());
        for item in &payload.items {
            lines.push(self.priced_line(&mut tx, item.dish_id, item.quantity).await?);
        }

        let draft = OrderDraft {
            account_id: actor.map(|u| u.id),
            customer_phone: payload.customer_phone.as_deref(),
            table_id: payload.table_id,
            order_type: payload.order_type.unwrap_or_default(),
            description: payload.description.as_deref(),
        };
        let created = self.persist(&mut tx, draft, lines).await?;

        tx.commit().await?;

        tracing::info!(order_id = %created.order.id, total = %created.order.total, "Pedido criado");
        Ok(created)
    }

    /// Converte o carrinho em pedido. O carrinho é consumido no mesmo commit.
    pub async fn create_from_cart(
        &self,
        user: &AuthenticatedUser,
        payload: &CreateOrderFromCartPayload,
    ) -> Result<OrderWithItems, AppError> {
        let mut tx = self.pool.begin().await?;

        let cart = self
            .cart_repo
            .find_latest(&mut *tx, user.id)
            .await?
            .ok_or(AppError::CartEmpty)?;

        let cart_lines = self.cart_repo.list_lines(&mut *tx, cart.id).await?;
        if cart_lines.is_empty() {
            return Err(AppError::CartEmpty);
        }

        self.check_table(&mut tx, payload.table_id).await?;

        let mut lines = Vec::with_capacity(cart_lines.len());
        for line in &cart_lines {
            lines.push(self.priced_line(&mut tx, line.dish_id, line.quantity).await?);
        }

        let draft = OrderDraft {
            account_id: Some(user.id),
            customer_phone: None,
            table_id: payload.table_id,
            order_type: payload.order_type.unwrap_or_default(),
            description: payload.description.as_deref(),
        };
        let created = self.persist(&mut tx, draft, lines).await?;

        self.cart_repo.delete_cart(&mut *tx, cart.id).await?;
        tx.commit().await?;

        tracing::info!(
            order_id = %created.order.id,
            cart_id = %cart.id,
            total = %created.order.total,
            "Pedido criado a partir do carrinho"
        );
        Ok(created)
    }

    /// Refaz um pedido antigo com os preços atuais. Falha no primeiro prato indisponível.
    pub async fn reorder(&self, user: &AuthenticatedUser, order_id: Uuid) -> Result<OrderWithItems, AppError> {
        let mut tx = self.pool.begin().await?;

        let source = self
            .order_repo
            .lock_by_id(&mut *tx, order_id)
            .await?
            .ok_or(AppError::OrderNotFound)?;
        source.ensure_owned_by(user.id)?;

        let previous = self.order_repo.list_items(&mut *tx, source.id).await?;
        if previous.is_empty() {
            return Err(AppError::BadRequest("Order has no items to reorder".to_string()));
        }

        self.check_table(&mut tx, source.table_id).await?;

        let mut lines = Vec::with_capacity(previous.len());
        for item in &previous {
            lines.push(self.priced_line(&mut tx, item.dish_id, item.quantity).await?);
        }

        let draft = OrderDraft {
            account_id: Some(user.id),
            customer_phone: source.customer_phone.as_deref(),
            table_id: source.table_id,
            order_type: source.order_type,
            description: Some(source.description.as_str()),
        };
        let created = self.persist(&mut tx, draft, lines).await?;

        tx.commit().await?;

        tracing::info!(order_id = %created.order.id, source_id = %source.id, "Pedido refeito a partir do histórico");
        Ok(created)
    }

    // =========================================================================
    //  ITENS (somente enquanto Pending, com a linha do pedido travada)
    // =========================================================================

    pub async fn add_item(
        &self,
        actor: Option<&AuthenticatedUser>,
        order_id: Uuid,
        payload: &AddOrderItemPayload,
    ) -> Result<OrderWithItems, AppError> {
        let mut tx = self.pool.begin().await?;
        self.lock_editable(&mut tx, actor, order_id).await?;

        let line = self.priced_line(&mut tx, payload.dish_id, payload.quantity).await?;
        self.order_repo.upsert_item(&mut *tx, order_id, &line).await?;

        let updated = self.recalculate(&mut tx, order_id).await?;
        tx.commit().await?;
        Ok(updated)
    }

    pub async fn update_item(
        &self,
        actor: Option<&AuthenticatedUser>,
        order_id: Uuid,
        item_id: Uuid,
        quantity: i32,
    ) -> Result<OrderWithItems, AppError> {
        ensure_valid_quantity(quantity)?;

        let mut tx = self.pool.begin().await?;
        self.lock_editable(&mut tx, actor, order_id).await?;

        self.order_repo
            .set_item_quantity(&mut *tx, order_id, item_id, quantity)
            .await?
            .ok_or(AppError::OrderItemNotFound)?;

        let updated = self.recalculate(&mut tx, order_id).await?;
        tx.commit().await?;
        Ok(updated)
    }

    pub async fn remove_item(
        &self,
        actor: Option<&AuthenticatedUser>,
        order_id: Uuid,
        item_id: Uuid,
    ) -> Result<OrderWithItems, AppError> {
        let mut tx = self.pool.begin().await?;
        self.lock_editable(&mut tx, actor, order_id).await?;

        if !self.order_repo.delete_item(&mut *tx, order_id, item_id).await? {
            return Err(AppError::OrderItemNotFound);
        }

        let updated = self.recalculate(&mut tx, order_id).await?;
        tx.commit().await?;
        Ok(updated)
    }

    // =========================================================================
    //  STATUS / CONSULTAS
    // =========================================================================

    pub async fn update_status(
        &self,
        actor: &AuthenticatedUser,
        order_id: Uuid,
        next: OrderStatus,
    ) -> Result<Order, AppError> {
        let mut tx = self.pool.begin().await?;

        let order = self
            .order_repo
            .lock_by_id(&mut *tx, order_id)
            .await?
            .ok_or(AppError::OrderNotFound)?;
        order.status.ensure_transition(next)?;

        let updated = self.order_repo.update_status(&mut *tx, order_id, next).await?;
        tx.commit().await?;

        tracing::info!(
            order_id = %order_id,
            from = %order.status,
            to = %next,
            actor_role = %actor.role,
            "Status do pedido alterado"
        );
        Ok(updated)
    }

    pub async fn order_menu(
        &self,
        actor: Option<&AuthenticatedUser>,
        order_id: Uuid,
    ) -> Result<OrderMenu, AppError> {
        let order = self
            .order_repo
            .find_by_id(order_id)
            .await?
            .ok_or(AppError::OrderNotFound)?;
        order.ensure_access(actor)?;

        let items = self.order_repo.list_items(&self.pool, order.id).await?;
        Ok(OrderMenu::new(order, items))
    }

    pub async fn history(
        &self,
        user: &AuthenticatedUser,
        query: &OrderHistoryQuery,
    ) -> Result<Paginated<OrderWithItems>, AppError> {
        let page = PageRequest::standard(query.page, query.limit);
        let (orders, total) = self
            .order_repo
            .list_by_account(user.id, query.status, page.limit, page.offset())
            .await?;

        let orders = self.attach_items(orders).await?;
        Ok(Paginated::new(orders, page, total))
    }

    pub async fn new_orders(&self, query: &NewOrdersQuery) -> Result<Paginated<OrderWithItems>, AppError> {
        let page = PageRequest::standard(query.page, query.limit);
        let (orders, total) = self
            .order_repo
            .list_by_status(OrderStatus::Pending, page.limit, page.offset())
            .await?;

        let orders = self.attach_items(orders).await?;
        Ok(Paginated::new(orders, page, total))
    }

    /// Remove do histórico. Só o dono, e só pedidos encerrados.
    pub async fn delete_history(&self, user: &AuthenticatedUser, order_id: Uuid) -> Result<(), AppError> {
        let order = self
            .order_repo
            .find_by_id(order_id)
            .await?
            .ok_or(AppError::OrderNotFound)?;
        order.ensure_owned_by(user.id)?;

        if !order.status.is_closed() {
            return Err(AppError::OrderNotClosed);
        }

        if !self.order_repo.delete_order(order_id).await? {
            return Err(AppError::OrderNotFound);
        }
        tracing::info!(order_id = %order_id, "Pedido removido do histórico");
        Ok(())
    }

    // --- auxiliares ---

    async fn check_table(&self, conn: &mut PgConnection, table_id: Option<Uuid>) -> Result<(), AppError> {
        if let Some(id) = table_id {
            let table = self
                .table_repo
                .find_by_id(&mut *conn, id)
                .await?
                .ok_or(AppError::TableNotFound)?;
            table.ensure_accepts_orders()?;
        }
        Ok(())
    }

    // Valida o prato e congela o preço atual na linha.
    async fn priced_line(
        &self,
        conn: &mut PgConnection,
        dish_id: Uuid,
        quantity: i32,
    ) -> Result<NewOrderLine, AppError> {
        ensure_valid_quantity(quantity)?;

        let dish = self
            .menu_repo
            .find_by_id(&mut *conn, dish_id)
            .await?
            .ok_or(AppError::DishNotFound)?;
        dish.ensure_orderable()?;

        Ok(NewOrderLine {
            dish_id: dish.id,
            quantity,
            unit_price: dish.price,
        })
    }

    async fn persist(
        &self,
        conn: &mut PgConnection,
        draft: OrderDraft<'_>,
        lines: Vec<NewOrderLine>,
    ) -> Result<OrderWithItems, AppError> {
        let lines = merge_lines(lines);
        for line in &lines {
            ensure_valid_quantity(line.quantity)?;
        }

        let order = self
            .order_repo
            .insert_order(
                &mut *conn,
                draft.account_id,
                draft.customer_phone,
                draft.table_id,
                draft.order_type,
                draft.description,
                order_total(&lines),
            )
            .await?;

        for line in &lines {
            self.order_repo.upsert_item(&mut *conn, order.id, line).await?;
        }

        let items = self.order_repo.list_items(&mut *conn, order.id).await?;
        Ok(OrderWithItems { order, items })
    }

    async fn lock_editable(
        &self,
        conn: &mut PgConnection,
        actor: Option<&AuthenticatedUser>,
        order_id: Uuid,
    ) -> Result<Order, AppError> {
        let order = self
            .order_repo
            .lock_by_id(&mut *conn, order_id)
            .await?
            .ok_or(AppError::OrderNotFound)?;
        order.ensure_access(actor)?;
        order.ensure_pending()?;
        Ok(order)
    }

    async fn recalculate(&self, conn: &mut PgConnection, order_id: Uuid) -> Result<OrderWithItems, AppError> {
        let order = self.order_repo.recalculate_total(&mut *conn, order_id).await?;
        let items = self.order_repo.list_items(&mut *conn, order_id).await?;
        Ok(OrderWithItems { order, items })
    }

    async fn attach_items(&self, orders: Vec<Order>) -> Result<Vec<OrderWithItems>, AppError> {
        let ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
        let items = self.order_repo.list_items_for_orders(&ids).await?;
        Ok(group_items(orders, items))
    }
}

/// Distribui os itens entre os pedidos, preservando a ordem dos pedidos.
fn group_items(orders: Vec<Order>, items: Vec<OrderItemDetail>) -> Vec<OrderWithItems> {
    let mut by_order: HashMap<Uuid, Vec<OrderItemDetail>> = HashMap::new();
    for item in items {
        by_order.entry(item.order_id).or_default().push(item);
    }

    orders
        .into_iter()
        .map(|order| {
            let items = by_order.remove(&order.id).unwrap_or_default();
            OrderWithItems { order, items }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use sqlx::PgPool;

    use crate::{
        common::test_support::{self, account, dish, soft_delete_dish},
        models::{account::Role, order::OrderLinePayload},
    };

    fn order() -> Order {
        let now = Utc::now();
        Order {
            id: Uuid::new_v4(),
            account_id: None,
            customer_phone: None,
            table_id: None,
            coupon_id: None,
            order_type: OrderType::Takeaway,
            status: OrderStatus::Pending,
            description: String::new(),
            total: Decimal::ZERO,
            final_price: Decimal::ZERO,
            created_at: now,
            updated_at: now,
        }
    }

    fn item(order_id: Uuid, quantity: i32) -> OrderItemDetail {
        OrderItemDetail {
            id: Uuid::new_v4(),
            order_id,
            dish_id: Uuid::new_v4(),
            dish_name: "Pho".to_string(),
            dish_image: "default-dish.jpg".to_string(),
            quantity,
            unit_price: Decimal::from(10),
            line_total: Decimal::from(10 * quantity),
        }
    }

    #[test]
    fn items_are_grouped_under_their_orders() {
        let (a, b, c) = (order(), order(), order());
        let items = vec![item(b.id, 1), item(a.id, 2), item(b.id, 3)];
        let (a_id, b_id, c_id) = (a.id, b.id, c.id);

        let grouped = group_items(vec![a, b, c], items);

        assert_eq!(grouped.len(), 3);
        assert_eq!(grouped[0].order.id, a_id);
        assert_eq!(grouped[0].items.len(), 1);
        assert_eq!(grouped[1].order.id, b_id);
        assert_eq!(
            grouped[1].items.iter().map(|i| i.quantity).collect::<Vec<_>>(),
            vec![1, 3]
        );
        assert_eq!(grouped[2].order.id, c_id);
        assert!(grouped[2].items.is_empty());
    }

    // --- Com banco (sqlx::test cria um banco isolado por teste) ---

    fn guest_order(lines: &[(Uuid, i32)]) -> CreateOrderPayload {
        CreateOrderPayload {
            items: lines
                .iter()
                .map(|&(dish_id, quantity)| OrderLinePayload { dish_id, quantity })
                .collect(),
            table_id: None,
            customer_phone: None,
            order_type: None,
            description: None,
        }
    }

    fn listed_sum(order: &OrderWithItems) -> Decimal {
        order.items.iter().map(|i| i.line_total).sum()
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn cart_checkout_totals_lines_and_consumes_cart(pool: PgPool) {
        let state = test_support::state(pool.clone());
        let customer = account(&pool, Role::Customer).await;
        let a = dish(&pool, "Pho Bo", 10).await;
        let b = dish(&pool, "Goi Cuon", 5).await;

        state.cart_service.add_item(customer.id, a, 1).await.unwrap();
        state.cart_service.add_item(customer.id, b, 1).await.unwrap();
        let cart = state.cart_service.add_item(customer.id, a, 1).await.unwrap();
        assert_eq!(cart.items.len(), 2);
        assert_eq!(cart.total, Decimal::from(25));

        let created = state
            .order_service
            .create_from_cart(&customer, &CreateOrderFromCartPayload::default())
            .await
            .unwrap();
        assert_eq!(created.order.total, Decimal::from(25));
        assert_eq!(created.order.final_price, Decimal::from(25));
        assert_eq!(created.order.status, OrderStatus::Pending);
        assert_eq!(created.order.account_id, Some(customer.id));
        assert_eq!(listed_sum(&created), created.order.total);

        let carts: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM carts WHERE account_id = $1")
            .bind(customer.id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(carts, 0);

        let again = state
            .order_service
            .create_from_cart(&customer, &CreateOrderFromCartPayload::default())
            .await;
        assert!(matches!(again, Err(AppError::CartEmpty)));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn repeated_dish_stays_on_one_order_line(pool: PgPool) {
        let state = test_support::state(pool.clone());
        let a = dish(&pool, "Bun Cha", 12).await;

        let created = state.order_service.create_order(None, &guest_order(&[(a, 1), (a, 2)])).await.unwrap();
        assert_eq!(created.items.len(), 1);
        assert_eq!(created.items[0].quantity, 3);

        let add = AddOrderItemPayload { dish_id: a, quantity: 4 };
        let updated = state.order_service.add_item(None, created.order.id, &add).await.unwrap();
        assert_eq!(updated.items.len(), 1);
        assert_eq!(updated.items[0].quantity, 7);
        assert_eq!(updated.order.total, Decimal::from(84));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn items_are_frozen_once_order_leaves_pending(pool: PgPool) {
        let state = test_support::state(pool.clone());
        let waiter = account(&pool, Role::Waiter).await;
        let a = dish(&pool, "Com Tam", 9).await;

        let created = state.order_service.create_order(None, &guest_order(&[(a, 1)])).await.unwrap();
        let order_id = created.order.id;
        let item_id = created.items[0].id;

        state
            .order_service
            .update_status(&waiter, order_id, OrderStatus::Preparing)
            .await
            .unwrap();

        let add = AddOrderItemPayload { dish_id: a, quantity: 1 };
        assert!(matches!(
            state.order_service.add_item(None, order_id, &add).await,
            Err(AppError::OrderNotPending)
        ));
        assert!(matches!(
            state.order_service.update_item(None, order_id, item_id, 2).await,
            Err(AppError::OrderNotPending)
        ));
        assert!(matches!(
            state.order_service.remove_item(None, order_id, item_id).await,
            Err(AppError::OrderNotPending)
        ));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn total_matches_listed_items_after_dish_removal(pool: PgPool) {
        let state = test_support::state(pool.clone());
        let a = dish(&pool, "Banh Mi", 10).await;
        let c = dish(&pool, "Che Ba Mau", 7).await;

        let created = state.order_service.create_order(None, &guest_order(&[(a, 2), (c, 1)])).await.unwrap();
        assert_eq!(created.order.total, Decimal::from(27));

        soft_delete_dish(&pool, c).await;

        let add = AddOrderItemPayload { dish_id: a, quantity: 1 };
        let updated = state.order_service.add_item(None, created.order.id, &add).await.unwrap();
        assert_eq!(updated.order.total, Decimal::from(30));
        assert_eq!(updated.items.len(), 1);
        assert_eq!(listed_sum(&updated), updated.order.total);

        let menu = state.order_service.order_menu(None, created.order.id).await.unwrap();
        assert_eq!(menu.items.iter().map(|i| i.line_total).sum::<Decimal>(), updated.order.total);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn merged_quantity_is_capped(pool: PgPool) {
        let state = test_support::state(pool.clone());
        let customer = account(&pool, Role::Customer).await;
        let a = dish(&pool, "Hu Tieu", 8).await;

        let created = state.order_service.create_order(None, &guest_order(&[(a, 600)])).await.unwrap();
        let add = AddOrderItemPayload { dish_id: a, quantity: 600 };
        assert!(matches!(
            state.order_service.add_item(None, created.order.id, &add).await,
            Err(AppError::QuantityTooLarge(_))
        ));
        let menu = state.order_service.order_menu(None, created.order.id).await.unwrap();
        assert_eq!(menu.items[0].quantity, 600);

        assert!(matches!(
            state.order_service.create_order(None, &guest_order(&[(a, 600), (a, 600)])).await,
            Err(AppError::QuantityTooLarge(_))
        ));

        state.cart_service.add_item(customer.id, a, 600).await.unwrap();
        assert!(matches!(
            state.cart_service.add_item(customer.id, a, 600).await,
            Err(AppError::QuantityTooLarge(_))
        ));
        let cart = state.cart_service.get_cart(customer.id).await.unwrap();
        assert_eq!(cart.items[0].quantity, 600);
    }
}
