//! Bill of materials
//!
//! A resolved BOM is an ordered list of line items. Rendering to display rows
//! follows the nine-column BOM layout; rendering those rows to a document is
//! left to the caller.

use crate::catalog::ProductMetadata;
use bomgen_core::Value;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

/// Column headers of a rendered BOM
pub const BOM_HEADERS: [&str; 9] = [
    "Manufacturer Part #",
    "Manufacturer",
    "Description",
    "Device Role",
    "Qty",
    "List Price",
    "Discount",
    "Customer Price",
    "Ext. Price",
];

/// One row of a resolved BOM
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LineItem {
    /// Verbatim cells of a raw rule
    Raw { cells: Vec<Value> },

    /// A catalog product with its resolved quantity
    Product {
        product: ProductMetadata,
        quantity: i64,
    },
}

impl LineItem {
    /// Part number of a product row
    pub fn part(&self) -> Option<&str> {
        match self {
            LineItem::Product { product, .. } => Some(&product.part),
            LineItem::Raw { .. } => None,
        }
    }

    pub fn quantity(&self) -> Option<i64> {
        match self {
            LineItem::Product { quantity, .. } => Some(*quantity),
            LineItem::Raw { .. } => None,
        }
    }

    /// Customer price times quantity, rounded to cents.
    ///
    /// `None` for raw rows and for products whose total cannot be represented.
    pub fn extended_price(&self) -> Option<Decimal> {
        match self {
            LineItem::Product { product, quantity } => {
                let total = product
                    .customer_price()?
                    .checked_mul(Decimal::from(*quantity))?;
                Some(total.round_dp(2))
            }
            LineItem::Raw { .. } => None,
        }
    }

    /// Display cells of this row
    pub fn row(&self) -> Vec<String> {
        match self {
            LineItem::Raw { cells } => {
                let mut row: Vec<String> = cells.iter().map(ToString::to_string).collect();
                if row.len() < BOM_HEADERS.len() {
                    row.resize(BOM_HEADERS.len(), String::new());
                }
                row
            }
            LineItem::Product { product, quantity } => vec![
                product.part.clone(),
                product.manufacturer.clone(),
                product.description.clone(),
                product
                    .device_role
                    .clone()
                    .unwrap_or_else(|| "N/A".to_string()),
                quantity.to_string(),
                format_currency(product.list_price),
                format_percentage(product.discount),
                price_cell(product.customer_price()),
                price_cell(self.extended_price()),
            ],
        }
    }
}

/// A resolved bill of materials
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Bom {
    pub items: Vec<LineItem>,
}

impl Bom {
    /// Create a new BOM from resolved line items
    pub fn new(items: Vec<LineItem>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LineItem> {
        self.items.iter()
    }

    pub fn into_items(self) -> Vec<LineItem> {
        self.items
    }

    /// Sum of the extended prices of every product row; `None` on overflow
    pub fn subtotal(&self) -> Option<Decimal> {
        self.items
            .iter()
            .filter(|item| matches!(item, LineItem::Product { .. }))
            .try_fold(Decimal::ZERO, |total, item| {
                total.checked_add(item.extended_price()?)
            })
    }

    /// Product rows with the same part merged into the first one.
    ///
    /// Quantities are summed; raw rows keep their position.
    pub fn consolidated(&self) -> Bom {
        let mut items: Vec<LineItem> = Vec::with_capacity(self.items.len());
        let mut positions: HashMap<String, usize> = HashMap::new();

        for item in &self.items {
            match item {
                LineItem::Product { product, quantity } => {
                    match positions.get(&product.part) {
                        Some(&index) => {
                            if let LineItem::Product { quantity: total, .. } = &mut items[index] {
                                *total = total.saturating_add(*quantity);
                            }
                        }
                        None => {
                            positions.insert(product.part.clone(), items.len());
                            items.push(item.clone());
                        }
                    }
                }
                LineItem::Raw { .. } => items.push(item.clone()),
            }
        }

        Bom { items }
    }

    /// Display rows of every line item, without headers or subtotal
    pub fn rows(&self) -> Vec<Vec<String>> {
        self.items.iter().map(LineItem::row).collect()
    }

    /// The subtotal row, label and amount in the last two columns
    pub fn subtotal_row(&self) -> Vec<String> {
        let mut row = vec![String::new(); BOM_HEADERS.len()];
        row[BOM_HEADERS.len() - 2] = "Subtotal:".to_string();
        row[BOM_HEADERS.len() - 1] = price_cell(self.subtotal());
        row
    }
}

/// Format an amount as dollars with thousands separators (`$1,234.50`)
pub fn format_currency(value: Decimal) -> String {
    let rounded = value.round_dp(2);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    let text = format!("{:.2}", rounded.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let digits = whole.len();
    let mut grouped = String::with_capacity(digits + digits / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (digits - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    format!("{}${}.{}", sign, grouped, fraction)
}

fn price_cell(amount: Option<Decimal>) -> String {
    amount.map(format_currency).unwrap_or_else(|| "N/A".to_string())
}

/// Format a fractional discount as a percentage (`0.15` is `15.0%`)
pub fn format_percentage(value: Decimal) -> String {
    let percent = (value * Decimal::ONE_HUNDRED).normalize();
    if percent.fract().is_zero() {
        format!("{}.0%", percent.trunc())
    } else {
        format!("{}%", percent)
    }
}
