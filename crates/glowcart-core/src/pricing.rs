//! Price interpretation for raw WooCommerce price strings.
//!
//! A discount is shown only when `sale_price` is non-empty, differs from
//! `regular_price`, and is numerically below it. Otherwise the display price
//! is the upstream `price` field.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::products::Product;

pub const DEFAULT_CURRENCY: &str = "BDT";
pub const DEFAULT_CURRENCY_SYMBOL: &str = "\u{09f3}";

/// Parses a price string, discarding everything except digits, `.` and `-`.
///
/// Unparseable or empty input yields zero.
#[must_use]
pub fn parse_price(raw: &str) -> Decimal {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    Decimal::from_str(&cleaned).unwrap_or(Decimal::ZERO)
}

/// Formats `value` with two decimal places behind `symbol`.
#[must_use]
pub fn format_currency(value: Decimal, symbol: &str) -> String {
    format!(
        "{symbol}{:.2}",
        value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}

fn has_distinct_sale_price(product: &Product) -> bool {
    !product.sale_price.trim().is_empty() && product.sale_price != product.regular_price
}

/// The price a customer pays for one unit.
#[must_use]
pub fn effective_price(product: &Product) -> Decimal {
    if has_distinct_sale_price(product) {
        parse_price(&product.sale_price)
    } else {
        parse_price(&product.price)
    }
}

#[must_use]
pub fn is_on_sale(product: &Product) -> bool {
    has_distinct_sale_price(product)
        && parse_price(&product.sale_price) < parse_price(&product.regular_price)
}

/// What a product card shows in its price slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceDisplay {
    pub current: Decimal,
    /// Struck-through regular price; `None` unless the product is on sale.
    pub original: Option<Decimal>,
    pub savings: Decimal,
    pub savings_percent: u32,
}

impl PriceDisplay {
    #[must_use]
    pub fn for_product(product: &Product) -> Self {
        let current = effective_price(product);
        if !is_on_sale(product) {
            return Self {
                current,
                original: None,
                savings: Decimal::ZERO,
                savings_percent: 0,
            };
        }

        let original = parse_price(&product.regular_price);
        let savings = original - current;
        let savings_percent = if original.is_zero() {
            0
        } else {
            (savings / original * Decimal::ONE_HUNDRED)
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .to_u32()
                .unwrap_or(0)
        };

        Self {
            current,
            original: Some(original),
            savings,
            savings_percent,
        }
    }

    #[must_use]
    pub fn has_discount(&self) -> bool {
        self.original.is_some()
    }
}
