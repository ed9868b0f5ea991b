//! # Store Controller
//!
//! Owns the one `ShopSession` for a shopper and keeps the view in sync.
//!
//! ## Operation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  View action ──► StoreController::add_to_cart() ──► ShopSession         │
//! │                          │                              │               │
//! │                          │ Ok                           │ Err           │
//! │                          ▼                              ▼               │
//! │                  broadcast StoreSnapshot         warn! + RuntimeError   │
//! │                          │                                              │
//! │                          ▼                                              │
//! │                  subscribers re-render                                  │
//! │                                                                         │
//! │  submit_order():                                                        │
//! │    begin_checkout ──► publish(Processing) ──► sleep(delay)              │
//! │          ──► complete_checkout ──► publish(Committed) ──► confirmation  │
//! │    future dropped mid-sleep: complete_checkout runs on drop            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Duration;

use chrono::Utc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use storefront_core::{
    CartItem, CoreResult, Money, OrderConfirmation, PendingOrder, PurchaseAvailability,
    ShopSession, StoreSnapshot, Totals,
};

use crate::config::StoreConfig;
use crate::error::RuntimeResult;

/// Snapshots buffered per subscriber before the slowest one lags.
const SNAPSHOT_CHANNEL_CAPACITY: usize = 16;

/// Session owner plus snapshot broadcast.
#[derive(Debug)]
pub struct StoreController {
    session: ShopSession,
    processing_delay: Duration,
    updates: broadcast::Sender<StoreSnapshot>,
}

impl StoreController {
    /// Wraps an existing session.
    pub fn new(session: ShopSession, processing_delay: Duration) -> Self {
        let (updates, _) = broadcast::channel(SNAPSHOT_CHANNEL_CAPACITY);
        StoreController {
            session,
            processing_delay,
            updates,
        }
    }

    /// Session and delay from configuration.
    ///
    /// ## Errors
    /// `InvalidConfig` when the configuration fails [`StoreConfig::validate`].
    pub fn from_config(config: &StoreConfig) -> RuntimeResult<Self> {
        let session = config.build_session()?;
        info!(
            store = %config.store.name,
            products = config.inventory.len(),
            delay_ms = config.checkout.processing_delay_ms,
            "Starting storefront session"
        );
        Ok(Self::new(session, config.processing_delay()))
    }

    /// Receives a snapshot after every successful mutation.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreSnapshot> {
        self.updates.subscribe()
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn session(&self) -> &ShopSession {
        &self.session
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        self.session.snapshot()
    }

    pub fn totals(&self) -> Totals {
        self.session.totals()
    }

    pub fn items(&self) -> &[CartItem] {
        self.session.items()
    }

    pub fn total_item_count(&self) -> u32 {
        self.session.total_item_count()
    }

    pub fn remaining_visible(&self, product_id: &str) -> u32 {
        self.session.remaining_visible(product_id)
    }

    pub fn purchase_availability(&self, product_id: &str) -> PurchaseAvailability {
        self.session.purchase_availability(product_id)
    }

    pub fn processing_delay(&self) -> Duration {
        self.processing_delay
    }

    // =========================================================================
    // Mutators
    // =========================================================================

    pub fn add_to_cart(&mut self, product_id: &str, name: &str, unit_price: Money) -> RuntimeResult<u32> {
        let result = self.session.add_to_cart(product_id, name, unit_price);
        if let Ok(quantity) = &result {
            debug!(product_id = %product_id, quantity = *quantity, "Added to cart");
        }
        self.observe("add_to_cart", result)
    }

    pub fn set_quantity(&mut self, product_id: &str, quantity: u32) -> RuntimeResult<()> {
        let result = self.session.set_quantity(product_id, quantity);
        if result.is_ok() {
            debug!(product_id = %product_id, quantity, "Cart quantity set");
        }
        self.observe("set_quantity", result)
    }

    pub fn remove_from_cart(&mut self, product_id: &str) -> RuntimeResult<bool> {
        let result = self.session.remove_from_cart(product_id);
        if let Ok(removed) = &result {
            debug!(product_id = %product_id, removed = *removed, "Removed from cart");
        }
        self.observe("remove_from_cart", result)
    }

    pub fn apply_coupon(&mut self, code: &str) -> RuntimeResult<()> {
        let result = self.session.apply_coupon(code);
        if result.is_ok() {
            info!(discount_bps = self.session.policy().discount_bps(), "Coupon applied");
        }
        self.observe("apply_coupon", result)
    }

    /// Clears cart and coupon. Committed stock is not restored.
    pub fn reset(&mut self) -> RuntimeResult<()> {
        let result = self.session.reset();
        if result.is_ok() {
            debug!("Session reset");
        }
        self.observe("reset", result)
    }

    /// Idle → Processing, for callers that schedule the commit themselves.
    pub fn begin_order(&mut self) -> RuntimeResult<PendingOrder> {
        let result = self.session.begin_checkout();
        if let Ok(pending) = &result {
            info!(
                order_number = %pending.order_number,
                total = %pending.totals.total,
                "Order processing"
            );
        }
        self.observe("begin_order", result)
    }

    /// Processing → Committed.
    pub fn finish_order(&mut self) -> RuntimeResult<OrderConfirmation> {
        let result = self.session.complete_checkout(Utc::now());
        if let Ok(confirmation) = &result {
            info!(
                order_number = %confirmation.order_number,
                items = confirmation.item_count(),
                total = %confirmation.totals.total,
                "Order committed"
            );
        }
        self.observe("finish_order", result)
    }

    /// Places the order: verify stock, wait the processing delay, commit.
    ///
    /// If the returned future is dropped during the wait, the commit runs
    /// immediately on drop, so the session never stays in Processing.
    pub async fn submit_order(&mut self) -> RuntimeResult<OrderConfirmation> {
        self.begin_order()?;
        let delay = self.processing_delay;

        let mut commit = CommitOnDrop {
            controller: self,
            armed: true,
        };
        tokio::time::sleep(delay).await;
        commit.armed = false;
        commit.controller.finish_order()
    }

    /// Logs rejections and publishes a snapshot on success.
    fn observe<T>(&self, operation: &'static str, result: CoreResult<T>) -> RuntimeResult<T> {
        match result {
            Ok(value) => {
                self.publish();
                Ok(value)
            }
            Err(err) => {
                warn!(operation, error = %err, "Operation rejected");
                Err(err.into())
            }
        }
    }

    fn publish(&self) {
        if self.updates.receiver_count() == 0 {
            return;
        }
        // Only fails when every receiver was dropped in the meantime
        let _ = self.updates.send(self.session.snapshot());
    }
}

/// Commits a processing order if `submit_order` is cancelled mid-wait.
struct CommitOnDrop<'a> {
    controller: &'a mut StoreController,
    armed: bool,
}

impl Drop for CommitOnDrop<'_> {
    fn drop(&mut self) {
        if !self.armed || !self.controller.session.phase().is_processing() {
            return;
        }
        warn!("Order submission cancelled during processing delay, committing now");
        // Rejections are already logged by `observe`
        let _ = self.controller.finish_order();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RuntimeError;
    use storefront_core::{CheckoutPhase, CoreError, InventoryLedger, PricingPolicy};

    fn controller(entries: &[(&str, u32)]) -> StoreController {
        let ledger: InventoryLedger = entries.iter().copied().collect();
        StoreController::new(
            ShopSession::new(ledger, PricingPolicy::default()),
            Duration::from_millis(1000),
        )
    }

    fn core_err<T: std::fmt::Debug>(result: RuntimeResult<T>) -> CoreError {
        match result.unwrap_err() {
            RuntimeError::Core(err) => err,
            other => panic!("expected core error, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_order_waits_then_commits() {
        let mut c = controller(&[("P1", 5)]);
        c.add_to_cart("P1", "Product 1", Money::from_cents(1000)).unwrap();
        c.add_to_cart("P1", "Product 1", Money::from_cents(1000)).unwrap();
        c.apply_coupon("MAQUINA10").unwrap();

        let start = tokio::time::Instant::now();
        let confirmation = c.submit_order().await.unwrap();

        assert!(start.elapsed() >= Duration::from_millis(1000));
        assert_eq!(confirmation.item_count(), 2);
        assert!(confirmation.coupon_applied);
        assert_eq!(c.session().available_stock("P1"), 3);
        assert_eq!(c.total_item_count(), 0);
        assert!(!c.session().coupon_applied());
    }

    #[tokio::test(start_paused = true)]
    async fn test_snapshots_follow_every_mutation() {
        let mut c = controller(&[("P1", 5)]);
        let mut rx = c.subscribe();

        c.add_to_cart("P1", "Product 1", Money::from_cents(30000)).unwrap();
        let snap = rx.recv().await.unwrap();
        assert_eq!(snap.item_count, 1);
        assert_eq!(snap.totals.total, Money::from_cents(32590));

        c.add_to_cart("P1", "Product 1", Money::from_cents(30000)).unwrap();
        c.apply_coupon("maquina10").unwrap();
        let _ = rx.recv().await.unwrap();
        let snap = rx.recv().await.unwrap();
        assert!(snap.coupon_applied);
        assert_eq!(snap.totals.total, Money::from_cents(54000));

        c.submit_order().await.unwrap();
        let processing = rx.recv().await.unwrap();
        assert!(processing.phase.is_processing());
        let committed = rx.recv().await.unwrap();
        assert!(matches!(committed.phase, CheckoutPhase::Committed { .. }));
        assert!(committed.items.is_empty());
        assert_eq!(committed.stock[0].available, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejections_publish_nothing() {
        let mut c = controller(&[("P1", 0)]);
        let mut rx = c.subscribe();

        let err = core_err(c.add_to_cart("P1", "Product 1", Money::from_cents(1000)));
        assert!(matches!(err, CoreError::OutOfStock { .. }));
        assert!(matches!(
            rx.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_with_insufficient_stock_keeps_cart() {
        let ledger: InventoryLedger = [("P1", 5)].into_iter().collect();
        let mut session = ShopSession::new(ledger, PricingPolicy::default());
        session.add_to_cart("P1", "Product 1", Money::from_cents(1000)).unwrap();
        session.set_quantity("P1", 5).unwrap();
        session.set_stock("P1", 4);
        let mut c = StoreController::new(session, Duration::from_millis(1000));

        let err = core_err(c.submit_order().await);

        assert!(matches!(err, CoreError::InsufficientStock { requested: 5, available: 4, .. }));
        assert_eq!(c.total_item_count(), 5);
        assert_eq!(c.session().phase(), &CheckoutPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_submit_still_commits() {
        let mut c = controller(&[("P1", 5)]);
        c.add_to_cart("P1", "Product 1", Money::from_cents(1000)).unwrap();
        c.add_to_cart("P1", "Product 1", Money::from_cents(1000)).unwrap();
        let mut rx = c.subscribe();

        let result = tokio::time::timeout(Duration::from_millis(10), c.submit_order()).await;
        assert!(result.is_err());

        assert!(matches!(c.session().phase(), CheckoutPhase::Committed { .. }));
        assert_eq!(c.session().available_stock("P1"), 3);
        assert_eq!(c.total_item_count(), 0);
        assert!(rx.recv().await.unwrap().phase.is_processing());
        assert!(matches!(
            rx.recv().await.unwrap().phase,
            CheckoutPhase::Committed { .. }
        ));

        c.reset().unwrap();
        assert_eq!(c.session().phase(), &CheckoutPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_add_after_commit_keeps_phase() {
        let mut c = controller(&[("P1", 1)]);
        c.add_to_cart("P1", "Product 1", Money::from_cents(1000)).unwrap();
        c.submit_order().await.unwrap();
        let mut rx = c.subscribe();

        let err = core_err(c.add_to_cart("P1", "Product 1", Money::from_cents(1000)));
        assert!(matches!(err, CoreError::OutOfStock { .. }));
        assert!(matches!(c.snapshot().phase, CheckoutPhase::Committed { .. }));
        assert!(matches!(
            rx.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[test]
    fn test_mutations_refused_between_begin_and_finish() {
        let mut c = controller(&[("P1", 5)]);
        c.add_to_cart("P1", "Product 1", Money::from_cents(1000)).unwrap();
        let pending = c.begin_order().unwrap();

        let err = core_err(c.add_to_cart("P1", "Product 1", Money::from_cents(1000)));
        assert_eq!(
            err,
            CoreError::CheckoutInProgress {
                order_number: pending.order_number.clone()
            }
        );
        assert!(matches!(
            core_err(c.apply_coupon("MAQUINA10")),
            CoreError::CheckoutInProgress { .. }
        ));
        assert!(matches!(core_err(c.reset()), CoreError::CheckoutInProgress { .. }));

        let confirmation = c.finish_order().unwrap();
        assert_eq!(confirmation.order_number, pending.order_number);
        assert_eq!(c.session().available_stock("P1"), 4);
    }

    #[test]
    fn test_from_config_rejects_invalid_discount() {
        let config: StoreConfig = toml::from_str("[pricing]\ndiscount_percent = 150").unwrap();
        let err = StoreController::from_config(&config).unwrap_err();
        assert!(matches!(err, RuntimeError::InvalidConfig(_)));
    }

    #[test]
    fn test_from_config() {
        let mut config = StoreConfig::default();
        config.checkout.processing_delay_ms = 10;
        let c = StoreController::from_config(&config).unwrap();

        assert_eq!(c.processing_delay(), Duration::from_millis(10));
        assert_eq!(c.remaining_visible("water-cooler"), 22);
        assert_eq!(
            c.purchase_availability("fonte-kmex"),
            PurchaseAvailability::LastUnits(3)
        );
    }
}
