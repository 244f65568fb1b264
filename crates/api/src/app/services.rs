//! Service wiring: catalog + cart + order engine + realtime fan-out.

use std::{convert::Infallible, sync::Arc, time::Duration};

use axum::response::sse::{Event as SseEvent, KeepAlive, Sse};
use tokio::sync::broadcast;
use tokio_stream::{wrappers::BroadcastStream, StreamExt};

use joyville_cart::CartStore;
use joyville_catalog::{InMemoryCatalog, Section};
use joyville_orders::{DashboardStats, Notifier, OrderEngine, OrderEvent};

/// Notifier that fans order events out to connected SSE listeners.
///
/// Lossy by design: no listeners, a lagging listener, or a closed channel
/// all just drop the event. The order transaction never depends on this.
pub struct BroadcastNotifier {
    tx: broadcast::Sender<OrderEvent>,
}

impl BroadcastNotifier {
    pub fn new(tx: broadcast::Sender<OrderEvent>) -> Self {
        Self { tx }
    }
}

impl Notifier for BroadcastNotifier {
    fn notify(&self, event: OrderEvent) {
        if let Err(e) = self.tx.send(event) {
            tracing::debug!("order event dropped (no listeners): {e}");
        }
    }
}

/// All long-lived services behind the HTTP surface.
pub struct AppServices {
    pub catalog: Arc<InMemoryCatalog>,
    pub cart: Arc<CartStore>,
    pub engine: Arc<OrderEngine>,
    realtime_tx: broadcast::Sender<OrderEvent>,
}

impl AppServices {
    pub fn build() -> Self {
        let catalog = Arc::new(InMemoryCatalog::new());
        let cart = Arc::new(CartStore::new(catalog.clone()));

        // Realtime channel (SSE): lossy broadcast, best-effort.
        let (realtime_tx, _realtime_rx) = broadcast::channel::<OrderEvent>(256);
        let notifier = Arc::new(BroadcastNotifier::new(realtime_tx.clone()));

        let engine = Arc::new(OrderEngine::new(catalog.clone(), cart.clone(), notifier));

        Self {
            catalog,
            cart,
            engine,
            realtime_tx,
        }
    }

    pub fn realtime_tx(&self) -> &broadcast::Sender<OrderEvent> {
        &self.realtime_tx
    }

    pub fn dashboard_stats(&self) -> DashboardStats {
        DashboardStats {
            retail_items: self.catalog.count_active(Section::Retail),
            wholesale_items: self.catalog.count_active(Section::Wholesale),
            total_orders: self.engine.total_orders(),
            revenue: self.engine.confirmed_revenue(),
        }
    }
}

/// SSE stream of order lifecycle events, no delivery guarantee or replay.
pub fn order_event_stream(
    services: Arc<AppServices>,
) -> Sse<impl tokio_stream::Stream<Item = Result<SseEvent, Infallible>>> {
    let rx = services.realtime_tx().subscribe();
    let stream = BroadcastStream::new(rx).filter_map(|msg| match msg {
        Ok(event) => {
            let data = serde_json::to_string(&event).unwrap_or_else(|_| "{}".to_string());
            Some(Ok(SseEvent::default().event(event.topic()).data(data)))
        }
        // Lagged receiver: skip, listeners get no replay.
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}
