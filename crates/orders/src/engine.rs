//! The order engine: atomic cart-to-order conversion, status transitions,
//! ownership-scoped retrieval.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, RwLock};

use chrono::Utc;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use tokio::sync::Mutex as AsyncMutex;

use joyville_auth::Principal;
use joyville_cart::CartStore;
use joyville_catalog::Catalog;
use joyville_core::{CartLineId, DomainError, DomainResult, OrderId, OrderItemId, SessionToken, UserId};

use crate::notify::{Notifier, OrderEvent};
use crate::order::{NewOrder, OrderLineItem, OrderRecord, OrderWithItems};
use crate::status::OrderStatus;

/// Aggregate counters for the admin dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub retail_items: usize,
    pub wholesale_items: usize,
    pub total_orders: usize,
    /// Sum of `total_amount` over confirmed orders.
    pub revenue: Decimal,
}

/// Materializes carts into durable orders.
///
/// The checkout critical section (read cart, snapshot prices, write
/// order+items, consume the converted lines) is serialized per session: a
/// concurrent checkout on the same session waits, then finds its lines
/// already consumed and fails with `EmptyCart`. Different sessions never
/// contend.
pub struct OrderEngine {
    orders: RwLock<HashMap<OrderId, OrderWithItems>>,
    catalog: Arc<dyn Catalog>,
    cart: Arc<CartStore>,
    notifier: Arc<dyn Notifier>,
    checkout_locks: StdMutex<HashMap<SessionToken, Arc<AsyncMutex<()>>>>,
}

impl OrderEngine {
    pub fn new(catalog: Arc<dyn Catalog>, cart: Arc<CartStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            orders: RwLock::new(HashMap::new()),
            catalog,
            cart,
            notifier,
            checkout_locks: StdMutex::new(HashMap::new()),
        }
    }

    fn checkout_lock(&self, session: &SessionToken) -> Arc<AsyncMutex<()>> {
        let mut locks = self.checkout_locks.lock().unwrap_or_else(|e| e.into_inner());
        locks.entry(session.clone()).or_default().clone()
    }

    /// Drop the session's lock entry once nothing else holds or awaits it.
    fn release_checkout_lock(&self, session: &SessionToken, lock: Arc<AsyncMutex<()>>) {
        let mut locks = self.checkout_locks.lock().unwrap_or_else(|e| e.into_inner());
        drop(lock);
        if locks.get(session).is_some_and(|l| Arc::strong_count(l) == 1) {
            locks.remove(session);
        }
    }

    #[cfg(test)]
    fn active_checkout_locks(&self) -> usize {
        self.checkout_locks.lock().unwrap().len()
    }

    /// Convert the session's cart into a persisted order.
    ///
    /// Prices are read live from the catalog here (not at add-to-cart time)
    /// and frozen onto the line items. On any failure nothing is persisted
    /// and the cart is left untouched. On success exactly the converted
    /// lines are consumed: a line added to the session mid-checkout stays in
    /// the cart.
    pub async fn place_order(
        &self,
        session: &SessionToken,
        user_id: UserId,
        input: NewOrder,
    ) -> DomainResult<OrderWithItems> {
        let lock = self.checkout_lock(session);
        let result = {
            let _guard = lock.lock().await;
            self.convert_cart(session, user_id, input)
        };
        self.release_checkout_lock(session, lock);
        result
    }

    fn convert_cart(
        &self,
        session: &SessionToken,
        user_id: UserId,
        input: NewOrder,
    ) -> DomainResult<OrderWithItems> {
        let lines = self.cart.session_lines(session);
        if lines.is_empty() {
            return Err(DomainError::EmptyCart);
        }

        let converted: Vec<CartLineId> = lines.iter().map(|l| l.id).collect();

        let order_id = OrderId::new();
        let mut items = Vec::with_capacity(lines.len());
        for line in &lines {
            // The customer saw this product in their cart: a vanished or
            // retired product fails the whole checkout, never a silent skip.
            let product = self
                .catalog
                .product(line.product_id)
                .filter(|p| p.is_purchasable())
                .ok_or_else(|| DomainError::product_unavailable(line.product_id.to_string()))?;

            items.push(OrderLineItem {
                id: OrderItemId::new(),
                order_id,
                product_id: line.product_id,
                quantity: line.quantity,
                price: product.price,
            });
        }

        let total_amount = items
            .iter()
            .map(|i| i.price * Decimal::from(i.quantity))
            .sum::<Decimal>()
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

        let shipping_address = input.shipping_address;
        let billing_address = input
            .billing_address
            .unwrap_or_else(|| shipping_address.clone());

        let order = OrderWithItems {
            order: OrderRecord {
                id: order_id,
                user_id,
                session: session.clone(),
                total_amount,
                status: OrderStatus::Pending,
                customer: input.customer,
                shipping_address,
                billing_address,
                notes: input.notes,
                created_at: Utc::now(),
            },
            items,
        };

        {
            let mut orders = self.orders.write().unwrap_or_else(|e| e.into_inner());
            orders.insert(order_id, order.clone());
        }

        self.cart.remove_lines(&converted);

        tracing::info!(order_id = %order_id, total = %order.order.total_amount, "order placed");
        self.notifier.notify(OrderEvent::OrderCreated {
            order: order.order.clone(),
        });

        Ok(order)
    }

    /// Apply a status transition, validated against the transition table.
    pub fn update_status(&self, order_id: OrderId, target: OrderStatus) -> DomainResult<OrderWithItems> {
        let updated = {
            let mut orders = self.orders.write().unwrap_or_else(|e| e.into_inner());
            let order = orders.get_mut(&order_id).ok_or(DomainError::NotFound)?;
            order.order.status = order.order.status.transition_to(target)?;
            order.clone()
        };

        tracing::info!(order_id = %order_id, status = %target, "order status updated");
        self.notifier.notify(OrderEvent::OrderStatusUpdated {
            order: updated.order.clone(),
        });

        Ok(updated)
    }

    /// Orders visible to the requester, newest first.
    ///
    /// Superadmins see every order; customers see only their own. This is an
    /// authorization filter and lives here, not in the HTTP layer.
    pub fn list_orders(&self, requester: &Principal) -> Vec<OrderWithItems> {
        let orders = self.orders.read().unwrap_or_else(|e| e.into_inner());
        let mut out: Vec<OrderWithItems> = orders
            .values()
            .filter(|o| requester.is_admin() || o.order.user_id == requester.user_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| b.order.created_at.cmp(&a.order.created_at));
        out
    }

    /// A single order, subject to the same ownership rule as listing.
    pub fn get_order(&self, order_id: OrderId, requester: &Principal) -> DomainResult<OrderWithItems> {
        let orders = self.orders.read().unwrap_or_else(|e| e.into_inner());
        let order = orders.get(&order_id).ok_or(DomainError::NotFound)?;
        if !requester.is_admin() && order.order.user_id != requester.user_id {
            return Err(DomainError::Forbidden);
        }
        Ok(order.clone())
    }

    pub fn total_orders(&self) -> usize {
        self.orders.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Revenue counted the way the dashboard does: confirmed orders only.
    pub fn confirmed_revenue(&self) -> Decimal {
        let orders = self.orders.read().unwrap_or_else(|e| e.into_inner());
        orders
            .values()
            .filter(|o| o.order.status == OrderStatus::Confirmed)
            .map(|o| o.order.total_amount)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NoopNotifier;
    use joyville_catalog::{InMemoryCatalog, NewProduct, ProductPatch, Section};
    use joyville_core::ProductId;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Barrier, Mutex};

    struct RecordingNotifier {
        events: Mutex<Vec<OrderEvent>>,
    }

    impl RecordingNotifier {
        fn new() -> Self {
            Self {
                events: Mutex::new(Vec::new()),
            }
        }

        fn topics(&self) -> Vec<&'static str> {
            self.events.lock().unwrap().iter().map(|e| e.topic()).collect()
        }
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, event: OrderEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    struct Fixture {
        catalog: Arc<InMemoryCatalog>,
        cart: Arc<CartStore>,
        engine: Arc<OrderEngine>,
        notifier: Arc<RecordingNotifier>,
    }

    fn fixture() -> Fixture {
        let catalog = Arc::new(InMemoryCatalog::new());
        let cart = Arc::new(CartStore::new(catalog.clone()));
        let notifier = Arc::new(RecordingNotifier::new());
        let engine = Arc::new(OrderEngine::new(
            catalog.clone(),
            cart.clone(),
            notifier.clone(),
        ));
        Fixture {
            catalog,
            cart,
            engine,
            notifier,
        }
    }

    fn seed_product(catalog: &InMemoryCatalog, name: &str, price: Decimal) -> ProductId {
        catalog
            .insert_product(NewProduct {
                name: name.to_string(),
                description: None,
                price,
                image_urls: vec![],
                category_id: None,
                inventory: 100,
                section: Section::Retail,
                is_new: false,
                is_bestseller: false,
            })
            .unwrap()
            .id
    }

    fn session() -> SessionToken {
        SessionToken::new(uuid::Uuid::now_v7().to_string())
    }

    fn new_order() -> NewOrder {
        NewOrder {
            customer: crate::order::CustomerInfo {
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                phone: None,
            },
            shipping_address: crate::order::Address {
                street: "1 Toy Lane".to_string(),
                city: "Joyville".to_string(),
                state: "JV".to_string(),
                country: "US".to_string(),
                zip_code: "00001".to_string(),
            },
            billing_address: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn place_order_snapshots_prices_and_clears_cart() {
        let f = fixture();
        let product = seed_product(&f.catalog, "Teddy", Decimal::TEN);
        let s = session();
        f.cart.add_line(&s, product, 2).unwrap();

        // Checkout-time pricing: a price change after add-to-cart is used.
        f.catalog
            .update_product(
                product,
                ProductPatch {
                    price: Some(Decimal::new(2000, 2)),
                    ..Default::default()
                },
            )
            .unwrap();

        let placed = f
            .engine
            .place_order(&s, UserId::new(), new_order())
            .await
            .unwrap();

        assert_eq!(placed.order.status, OrderStatus::Pending);
        assert_eq!(placed.items.len(), 1);
        assert_eq!(placed.items[0].price, Decimal::new(2000, 2));
        assert_eq!(placed.order.total_amount, Decimal::new(4000, 2));
        assert!(f.cart.session_lines(&s).is_empty());
        assert_eq!(f.notifier.topics(), vec!["order_created"]);

        // Frozen after placement: another catalog change must not leak in.
        f.catalog
            .update_product(
                product,
                ProductPatch {
                    price: Some(Decimal::new(3000, 2)),
                    ..Default::default()
                },
            )
            .unwrap();
        let admin = Principal::superadmin(UserId::new());
        let stored = f.engine.get_order(placed.order.id, &admin).unwrap();
        assert_eq!(stored.items[0].price, Decimal::new(2000, 2));
    }

    #[tokio::test]
    async fn total_is_exact_two_place_arithmetic() {
        let f = fixture();
        let a = seed_product(&f.catalog, "Blocks", Decimal::new(500, 2));
        let b = seed_product(&f.catalog, "Doll", Decimal::new(350, 2));
        let s = session();
        f.cart.add_line(&s, a, 2).unwrap();
        f.cart.add_line(&s, b, 1).unwrap();

        let placed = f
            .engine
            .place_order(&s, UserId::new(), new_order())
            .await
            .unwrap();
        assert_eq!(placed.order.total_amount, Decimal::new(1350, 2));
    }

    #[tokio::test]
    async fn empty_cart_is_rejected_without_side_effects() {
        let f = fixture();
        let err = f
            .engine
            .place_order(&session(), UserId::new(), new_order())
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::EmptyCart);
        assert_eq!(f.engine.total_orders(), 0);
        assert!(f.notifier.topics().is_empty());
    }

    #[tokio::test]
    async fn vanished_product_fails_checkout_and_keeps_cart() {
        let f = fixture();
        let product = seed_product(&f.catalog, "Teddy", Decimal::TEN);
        let s = session();
        f.cart.add_line(&s, product, 1).unwrap();

        f.catalog.deactivate_product(product).unwrap();

        let err = f
            .engine
            .place_order(&s, UserId::new(), new_order())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ProductUnavailable(_)));
        assert_eq!(f.engine.total_orders(), 0);
        assert_eq!(f.cart.session_lines(&s).len(), 1);
    }

    #[tokio::test]
    async fn billing_defaults_to_shipping() {
        let f = fixture();
        let product = seed_product(&f.catalog, "Teddy", Decimal::TEN);
        let s = session();
        f.cart.add_line(&s, product, 1).unwrap();

        let placed = f
            .engine
            .place_order(&s, UserId::new(), new_order())
            .await
            .unwrap();
        assert_eq!(placed.order.billing_address, placed.order.shipping_address);
    }

    #[tokio::test]
    async fn concurrent_checkout_produces_exactly_one_order() {
        let f = fixture();
        let product = seed_product(&f.catalog, "Teddy", Decimal::TEN);
        let s = session();
        f.cart.add_line(&s, product, 1).unwrap();

        let user = UserId::new();
        let (a, b) = tokio::join!(
            f.engine.place_order(&s, user, new_order()),
            f.engine.place_order(&s, user, new_order()),
        );

        let successes = [&a, &b].iter().filter(|r| r.is_ok()).count();
        assert_eq!(successes, 1);
        let loser = if a.is_err() { a.unwrap_err() } else { b.unwrap_err() };
        assert_eq!(loser, DomainError::EmptyCart);
        assert_eq!(f.engine.total_orders(), 1);
    }

    /// Catalog wrapper that, once armed, parks the next `product` call on a
    /// pair of barriers so a test can interleave cart mutations with an
    /// in-flight checkout.
    struct GatedCatalog {
        inner: Arc<InMemoryCatalog>,
        armed: Arc<AtomicBool>,
        entered: Arc<Barrier>,
        release: Arc<Barrier>,
    }

    impl Catalog for GatedCatalog {
        fn product(&self, id: ProductId) -> Option<joyville_catalog::Product> {
            if self.armed.swap(false, Ordering::SeqCst) {
                self.entered.wait();
                self.release.wait();
            }
            self.inner.product(id)
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn line_added_during_checkout_survives_in_the_cart() {
        let inner = Arc::new(InMemoryCatalog::new());
        let a = seed_product(&inner, "First", Decimal::TEN);
        let b = seed_product(&inner, "Second", Decimal::ONE);

        let armed = Arc::new(AtomicBool::new(false));
        let entered = Arc::new(Barrier::new(2));
        let release = Arc::new(Barrier::new(2));
        let catalog: Arc<dyn Catalog> = Arc::new(GatedCatalog {
            inner,
            armed: armed.clone(),
            entered: entered.clone(),
            release: release.clone(),
        });

        let cart = Arc::new(CartStore::new(catalog.clone()));
        let engine = Arc::new(OrderEngine::new(
            catalog,
            cart.clone(),
            Arc::new(NoopNotifier),
        ));

        let s = session();
        cart.add_line(&s, a, 1).unwrap();

        // Park the checkout inside price resolution, after it has read the
        // cart but before it consumes anything.
        armed.store(true, Ordering::SeqCst);
        let handle = tokio::spawn({
            let engine = engine.clone();
            let s = s.clone();
            async move { engine.place_order(&s, UserId::new(), new_order()).await }
        });

        entered.wait();
        let line_b = cart.add_line(&s, b, 2).unwrap();
        release.wait();

        let placed = handle.await.unwrap().unwrap();

        // The order carries only what the checkout read...
        let ordered: Vec<_> = placed.items.iter().map(|i| i.product_id).collect();
        assert_eq!(ordered, vec![a]);

        // ...and the mid-checkout addition is still in the cart.
        let remaining = cart.session_lines(&s);
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, line_b.id);
        assert_eq!(remaining[0].quantity, 2);
    }

    #[tokio::test]
    async fn checkout_lock_registry_is_pruned() {
        let f = fixture();
        let product = seed_product(&f.catalog, "Teddy", Decimal::TEN);
        let s = session();
        f.cart.add_line(&s, product, 1).unwrap();

        f.engine
            .place_order(&s, UserId::new(), new_order())
            .await
            .unwrap();
        assert_eq!(f.engine.active_checkout_locks(), 0);

        // Failed checkouts release their slot too.
        let err = f
            .engine
            .place_order(&session(), UserId::new(), new_order())
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::EmptyCart);
        assert_eq!(f.engine.active_checkout_locks(), 0);
    }

    #[tokio::test]
    async fn status_transitions_follow_the_table() {
        let f = fixture();
        let product = seed_product(&f.catalog, "Teddy", Decimal::TEN);
        let s = session();
        f.cart.add_line(&s, product, 1).unwrap();
        let placed = f
            .engine
            .place_order(&s, UserId::new(), new_order())
            .await
            .unwrap();
        let id = placed.order.id;

        // pending -> delivered skips states.
        let err = f.engine.update_status(id, OrderStatus::Delivered).unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition(_)));

        f.engine.update_status(id, OrderStatus::Confirmed).unwrap();
        f.engine.update_status(id, OrderStatus::Shipped).unwrap();
        let delivered = f.engine.update_status(id, OrderStatus::Delivered).unwrap();
        assert_eq!(delivered.order.status, OrderStatus::Delivered);

        // Terminal: no rewinding, no cancelling.
        let err = f.engine.update_status(id, OrderStatus::Pending).unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition(_)));
        let err = f.engine.update_status(id, OrderStatus::Cancelled).unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition(_)));

        let err = f
            .engine
            .update_status(OrderId::new(), OrderStatus::Confirmed)
            .unwrap_err();
        assert_eq!(err, DomainError::NotFound);

        assert_eq!(
            f.notifier.topics(),
            vec![
                "order_created",
                "order_status_updated",
                "order_status_updated",
                "order_status_updated",
            ]
        );
    }

    #[tokio::test]
    async fn cancel_allowed_from_pending() {
        let f = fixture();
        let product = seed_product(&f.catalog, "Teddy", Decimal::TEN);
        let s = session();
        f.cart.add_line(&s, product, 1).unwrap();
        let placed = f
            .engine
            .place_order(&s, UserId::new(), new_order())
            .await
            .unwrap();

        let cancelled = f
            .engine
            .update_status(placed.order.id, OrderStatus::Cancelled)
            .unwrap();
        assert_eq!(cancelled.order.status, OrderStatus::Cancelled);
    }

    #[tokio::test]
    async fn listing_is_ownership_scoped() {
        let f = fixture();
        let product = seed_product(&f.catalog, "Teddy", Decimal::TEN);

        let alice = UserId::new();
        let bob = UserId::new();

        let s1 = session();
        f.cart.add_line(&s1, product, 1).unwrap();
        f.engine.place_order(&s1, alice, new_order()).await.unwrap();

        let s2 = session();
        f.cart.add_line(&s2, product, 2).unwrap();
        let bobs = f.engine.place_order(&s2, bob, new_order()).await.unwrap();

        let alice_view = f.engine.list_orders(&Principal::customer(alice));
        assert_eq!(alice_view.len(), 1);
        assert!(alice_view.iter().all(|o| o.order.user_id == alice));

        let admin = Principal::superadmin(UserId::new());
        assert_eq!(f.engine.list_orders(&admin).len(), 2);

        // Same rule for point reads.
        let err = f
            .engine
            .get_order(bobs.order.id, &Principal::customer(alice))
            .unwrap_err();
        assert_eq!(err, DomainError::Forbidden);
        assert!(f.engine.get_order(bobs.order.id, &admin).is_ok());
    }

    #[tokio::test]
    async fn revenue_counts_confirmed_orders_only() {
        let f = fixture();
        let product = seed_product(&f.catalog, "Teddy", Decimal::TEN);

        let s1 = session();
        f.cart.add_line(&s1, product, 1).unwrap();
        let confirmed = f
            .engine
            .place_order(&s1, UserId::new(), new_order())
            .await
            .unwrap();
        f.engine
            .update_status(confirmed.order.id, OrderStatus::Confirmed)
            .unwrap();

        let s2 = session();
        f.cart.add_line(&s2, product, 5).unwrap();
        f.engine
            .place_order(&s2, UserId::new(), new_order())
            .await
            .unwrap();

        assert_eq!(f.engine.total_orders(), 2);
        assert_eq!(f.engine.confirmed_revenue(), Decimal::TEN);
    }

    #[tokio::test]
    async fn line_items_preserve_cart_order() {
        let f = fixture();
        let a = seed_product(&f.catalog, "First", Decimal::ONE);
        let b = seed_product(&f.catalog, "Second", Decimal::TWO);
        let s = session();
        f.cart.add_line(&s, a, 1).unwrap();
        f.cart.add_line(&s, b, 1).unwrap();

        let placed = f
            .engine
            .place_order(&s, UserId::new(), new_order())
            .await
            .unwrap();
        let product_ids: Vec<_> = placed.items.iter().map(|i| i.product_id).collect();
        assert_eq!(product_ids, vec![a, b]);
    }

    #[test]
    fn noop_notifier_drops_events() {
        // Smoke check that the engine works without any listener wired in.
        let catalog = Arc::new(InMemoryCatalog::new());
        let cart = Arc::new(CartStore::new(catalog.clone()));
        let _engine = OrderEngine::new(catalog, cart, Arc::new(NoopNotifier));
    }
}
