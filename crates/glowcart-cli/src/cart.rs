//! File-backed cart commands.
//!
//! Each invocation restores the cart from `GLOWCART_CART_PATH`, applies one
//! edit through [`glowcart_store::CartStore`], and writes the snapshot back.

use std::path::Path;

use anyhow::Context;
use clap::Subcommand;
use glowcart_core::{format_currency, DEFAULT_CURRENCY_SYMBOL};
use glowcart_store::{AddOutcome, CartSnapshot, CartStore};

use crate::catalog::price_label;
use crate::App;

/// Sub-commands available under `cart`.
#[derive(Debug, Subcommand)]
pub enum CartCommands {
    /// Print cart contents and totals
    Show,
    /// Look up a product and add it to the cart
    Add {
        id: u64,
        #[arg(long, default_value = "1")]
        qty: u32,
    },
    /// Remove a product from the cart
    Remove { id: u64 },
    /// Set a product's quantity; zero or less removes it
    Set {
        id: u64,
        #[arg(allow_negative_numbers = true)]
        qty: i64,
    },
    /// Empty the cart
    Clear,
}

/// # Errors
///
/// Returns an error if the cart file cannot be read or written, the product
/// lookup fails, or the add is rejected.
pub(crate) async fn run_cart(app: &App, command: CartCommands) -> anyhow::Result<()> {
    let path = app.config.cart_path.as_path();
    let cart = app.storefront.cart();
    cart.restore(load_snapshot(path)?);

    match command {
        CartCommands::Show => {
            print_cart(cart);
            return Ok(());
        }
        CartCommands::Add { id, qty } => {
            let product = app
                .client
                .fetch_product(id)
                .await?
                .ok_or_else(|| anyhow::anyhow!("product {id} not found"))?;
            if !product.is_in_stock() {
                anyhow::bail!("product {id} ({}) is {}", product.name, product.stock_status);
            }
            let name = product.name.clone();
            match cart.add_item(product, qty).await? {
                AddOutcome::Added { quantity } => {
                    println!("added {qty} x {name}; now {quantity} in cart");
                }
                AddOutcome::AlreadyInFlight => {
                    println!("{name} is already being added");
                }
            }
        }
        CartCommands::Remove { id } => {
            if !cart.remove_item(id) {
                println!("product {id} is not in the cart");
                return Ok(());
            }
            println!("removed product {id}");
        }
        CartCommands::Set { id, qty } => {
            if !cart.contains(id) {
                println!("product {id} is not in the cart");
                return Ok(());
            }
            cart.set_quantity(id, qty);
            match cart.quantity_of(id) {
                Some(quantity) => println!("product {id} quantity set to {quantity}"),
                None => println!("removed product {id}"),
            }
        }
        CartCommands::Clear => {
            cart.clear();
            println!("cart cleared");
        }
    }

    save_snapshot(path, &cart.snapshot())
}

fn print_cart(cart: &CartStore) {
    let entries = cart.entries();
    if entries.is_empty() {
        println!("cart is empty");
        return;
    }

    println!("{:<8}{:<44}{:<6}UNIT PRICE", "ID", "NAME", "QTY");
    for entry in &entries {
        println!(
            "{:<8}{:<44}{:<6}{}",
            entry.product.id,
            entry.product.name,
            entry.quantity,
            price_label(&entry.product)
        );
    }
    println!();
    println!("items: {}", cart.total_items());
    match cart.total_price() {
        Some(total) => println!("total: {}", format_currency(total, DEFAULT_CURRENCY_SYMBOL)),
        None => println!("total: too large to display"),
    }
}

/// Reads the cart file. A missing file is an empty cart.
pub(crate) fn load_snapshot(path: &Path) -> anyhow::Result<CartSnapshot> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no cart file; starting empty");
            return Ok(CartSnapshot::default());
        }
        Err(e) => {
            return Err(e).with_context(|| format!("failed to read cart file {}", path.display()))
        }
    };
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse cart file {}", path.display()))
}

pub(crate) fn save_snapshot(path: &Path, snapshot: &CartSnapshot) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(snapshot)?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write cart file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_cart_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("glowcart-{name}-{}.json", std::process::id()))
    }

    #[test]
    fn missing_cart_file_loads_empty() {
        let path = temp_cart_path("missing");
        let _ = std::fs::remove_file(&path);
        let snapshot = load_snapshot(&path).unwrap();
        assert!(snapshot.entries.is_empty());
    }

    #[test]
    fn corrupt_cart_file_is_an_error() {
        let path = temp_cart_path("corrupt");
        std::fs::write(&path, "not json").unwrap();
        let err = load_snapshot(&path).unwrap_err();
        assert!(err.to_string().contains("failed to parse cart file"));
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn saved_snapshot_loads_back() {
        let path = temp_cart_path("roundtrip");
        let product = serde_json::from_value(serde_json::json!({
            "id": 12,
            "name": "Rice Water Toner",
            "price": "550.00"
        }))
        .unwrap();
        let cart = CartStore::new();
        cart.restore(CartSnapshot {
            entries: vec![glowcart_store::CartEntry {
                product,
                quantity: 2,
            }],
        });

        save_snapshot(&path, &cart.snapshot()).unwrap();
        let loaded = load_snapshot(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded, cart.snapshot());
    }
}
