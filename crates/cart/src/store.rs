//! Session-scoped cart storage.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::Utc;
use rust_decimal::Decimal;

use joyville_catalog::Catalog;
use joyville_core::{CartLineId, DomainError, DomainResult, ProductId, SessionToken};

use crate::line::{CartLine, ResolvedCartLine};

/// In-memory cart store.
///
/// Lines are keyed by synthetic id; session scoping is enforced on every
/// read path. Individual operations are atomic under the internal lock;
/// the multi-step checkout critical section is serialized one level up by
/// the order engine.
pub struct CartStore {
    lines: RwLock<HashMap<CartLineId, CartLine>>,
    catalog: Arc<dyn Catalog>,
}

impl CartStore {
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self {
            lines: RwLock::new(HashMap::new()),
            catalog,
        }
    }

    /// All lines for a session with products resolved, oldest first.
    ///
    /// Never fails; an unknown session yields an empty list. A line whose
    /// product has vanished entirely is skipped for display (it still counts
    /// at checkout, where it produces `ProductUnavailable`).
    pub fn lines(&self, session: &SessionToken) -> Vec<ResolvedCartLine> {
        self.session_lines(session)
            .into_iter()
            .filter_map(|line| {
                let product = self.catalog.product(line.product_id)?;
                Some(ResolvedCartLine { line, product })
            })
            .collect()
    }

    /// Raw lines for a session, oldest first.
    pub fn session_lines(&self, session: &SessionToken) -> Vec<CartLine> {
        let lines = self.lines.read().unwrap_or_else(|e| e.into_inner());
        let mut out: Vec<CartLine> = lines
            .values()
            .filter(|l| &l.session == session)
            .cloned()
            .collect();
        out.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then(a.id.as_uuid().cmp(b.id.as_uuid()))
        });
        out
    }

    /// Add a product to the session's cart.
    ///
    /// Merge semantics: if a line for (session, product) already exists its
    /// quantity is incremented by `quantity`; otherwise a new line is
    /// created. A cart never holds two lines for the same product.
    pub fn add_line(
        &self,
        session: &SessionToken,
        product_id: ProductId,
        quantity: u32,
    ) -> DomainResult<CartLine> {
        if quantity < 1 {
            return Err(DomainError::invalid_input("quantity must be at least 1"));
        }

        let product = self
            .catalog
            .product(product_id)
            .ok_or_else(|| DomainError::invalid_input(format!("unknown product: {product_id}")))?;
        if !product.is_purchasable() {
            return Err(DomainError::invalid_input(format!(
                "product is not purchasable: {product_id}"
            )));
        }

        let mut lines = self.lines.write().unwrap_or_else(|e| e.into_inner());

        if let Some(existing) = lines
            .values_mut()
            .find(|l| &l.session == session && l.product_id == product_id)
        {
            existing.quantity = existing.quantity.checked_add(quantity).ok_or_else(|| {
                DomainError::invalid_input("quantity too large")
            })?;
            return Ok(existing.clone());
        }

        let line = CartLine {
            id: CartLineId::new(),
            session: session.clone(),
            product_id,
            quantity,
            created_at: Utc::now(),
        };
        lines.insert(line.id, line.clone());
        Ok(line)
    }

    /// Replace a line's quantity in place.
    ///
    /// Zero is rejected: "set to zero" and "delete" are distinct intents and
    /// the caller must use [`CartStore::remove_line`] for the latter.
    pub fn update_quantity(&self, line_id: CartLineId, quantity: u32) -> DomainResult<CartLine> {
        if quantity < 1 {
            return Err(DomainError::invalid_input(
                "quantity must be at least 1; remove the line instead",
            ));
        }

        let mut lines = self.lines.write().unwrap_or_else(|e| e.into_inner());
        let line = lines.get_mut(&line_id).ok_or(DomainError::NotFound)?;
        line.quantity = quantity;
        Ok(line.clone())
    }

    /// Delete a line.
    pub fn remove_line(&self, line_id: CartLineId) -> DomainResult<()> {
        let mut lines = self.lines.write().unwrap_or_else(|e| e.into_inner());
        match lines.remove(&line_id) {
            Some(_) => Ok(()),
            None => Err(DomainError::NotFound),
        }
    }

    /// Delete a specific set of lines in one step.
    ///
    /// Used by checkout to consume exactly the lines it converted; a line
    /// added to the session in the meantime is left alone. Unknown ids are
    /// ignored.
    pub fn remove_lines(&self, line_ids: &[CartLineId]) {
        let mut lines = self.lines.write().unwrap_or_else(|e| e.into_inner());
        for id in line_ids {
            lines.remove(id);
        }
    }

    /// Delete all lines for a session. No-op if the cart is already empty.
    pub fn clear(&self, session: &SessionToken) {
        let mut lines = self.lines.write().unwrap_or_else(|e| e.into_inner());
        lines.retain(|_, l| &l.session != session);
    }

    /// Live cart total: Σ(current catalog price × quantity).
    ///
    /// Side-effect-free and uses live pricing; prices are only frozen when an
    /// order is placed.
    pub fn total(&self, session: &SessionToken) -> Decimal {
        self.lines(session)
            .iter()
            .map(|r| r.product.price * Decimal::from(r.line.quantity))
            .sum()
    }
}
