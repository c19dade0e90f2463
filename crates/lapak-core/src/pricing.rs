//! # Pricing Calculator
//!
//! Pure pricing math for a sale: per-line discounts, order discount, tax,
//! total and change. No I/O — the coordinator loads products and the store
//! tax rate, builds [`LineInput`]s, and calls [`price_cart`].
//!
//! ## Algorithm
//! ```text
//! per line:  line_total    = unit_price × quantity
//!            line_discount = amount | round_half_up(line_total × percent)
//!            line_subtotal = line_total − line_discount
//!
//! order:     subtotal       = Σ line_subtotal
//!            order_discount = amount | round_half_up(subtotal × percent)
//!            tax            = round_half_up((subtotal − order_discount) × tax_rate)
//!            total          = subtotal − order_discount + tax
//!            change         = payment − total
//! ```
//!
//! Rounding is half-up to a whole rupiah at every derived field, not once
//! at the end. A discount larger than its base is rejected, so every
//! output except `change` is non-negative; a negative `change` is the
//! caller's signal to reject the sale as underpaid before persisting
//! anything.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{Discount, Rate};

// =============================================================================
// Input / Output Types
// =============================================================================

/// One cart line with the product state loaded at sale time.
#[derive(Debug, Clone)]
pub struct LineInput {
    pub product_id: String,
    pub name: String,
    pub unit_price: Money,
    pub unit_cost: Money,
    /// Quantity, >= 1 (validated before pricing).
    pub quantity: i64,
    pub discount: Option<Discount>,
}

/// A priced cart line: the snapshot that becomes a transaction item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricedLine {
    pub product_id: String,
    pub name: String,
    pub unit_price: Money,
    pub unit_cost: Money,
    pub quantity: i64,
    /// unit_price × quantity, before discount.
    pub line_total: Money,
    /// Discount resolved to a rupiah amount.
    pub discount: Money,
    /// line_total − discount.
    pub subtotal: Money,
}

/// The complete pricing outcome for a cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Totals {
    /// Priced lines in cart order.
    pub lines: Vec<PricedLine>,
    pub subtotal: Money,
    pub order_discount: Money,
    pub tax: Money,
    pub total: Money,
    /// payment − total; negative when the payment doesn't cover the sale.
    pub change: Money,
}

impl Totals {
    /// Whether the tendered payment covers the total.
    #[inline]
    pub fn is_paid(&self) -> bool {
        !self.change.is_negative()
    }
}

// =============================================================================
// Pricing
// =============================================================================

/// Resolves an optional discount against its base amount.
fn resolve_discount(base: Money, discount: Option<&Discount>) -> Money {
    match discount {
        None => Money::zero(),
        Some(Discount::Amount(amount)) => *amount,
        Some(Discount::Percent(rate)) => base.percent_of(*rate),
    }
}

/// Checks a resolved discount against the amount it applies to.
fn check_discount(scope: &str, discount: Money, base: Money) -> CoreResult<()> {
    if discount.is_negative() {
        return Err(ValidationError::Negative {
            field: format!("discount for {scope}"),
        }
        .into());
    }
    if discount > base {
        return Err(CoreError::DiscountTooLarge {
            scope: scope.to_string(),
            discount,
            base,
        });
    }
    Ok(())
}

/// Prices a cart: lines, order discount, tax, total and change.
///
/// Pure function of its inputs. The store tax rate is an explicit
/// parameter so this stays independently testable — no ambient store
/// configuration is read here.
///
/// ## Errors
/// - [`CoreError::DiscountTooLarge`] when a line or order discount
///   exceeds the amount it applies to
/// - [`CoreError::Validation`] when a flat discount is negative
pub fn price_cart(
    lines: &[LineInput],
    order_discount: Option<&Discount>,
    tax_rate: Rate,
    payment: Money,
) -> CoreResult<Totals> {
    let mut priced = Vec::with_capacity(lines.len());
    let mut subtotal = Money::zero();

    for line in lines {
        let line_total = line.unit_price.times(line.quantity);
        let discount = resolve_discount(line_total, line.discount.as_ref());
        check_discount(&line.name, discount, line_total)?;

        let line_subtotal = line_total - discount;
        subtotal += line_subtotal;

        priced.push(PricedLine {
            product_id: line.product_id.clone(),
            name: line.name.clone(),
            unit_price: line.unit_price,
            unit_cost: line.unit_cost,
            quantity: line.quantity,
            line_total,
            discount,
            subtotal: line_subtotal,
        });
    }

    let order_discount = resolve_discount(subtotal, order_discount);
    check_discount("order", order_discount, subtotal)?;

    let taxable = subtotal - order_discount;
    let tax = taxable.percent_of(tax_rate);
    let total = taxable + tax;
    let change = payment - total;

    Ok(Totals {
        lines: priced,
        subtotal,
        order_discount,
        tax,
        total,
        change,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
