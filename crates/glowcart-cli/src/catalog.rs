//! Read-only catalog commands: `categories`, `fetch`, `product`, `search`.

use glowcart_core::{
    format_currency, CategoryDefinition, CategoryKey, FetchCause, PriceDisplay, Product,
    DEFAULT_CURRENCY_SYMBOL,
};

use crate::App;

/// Print every category key with its query and client-side filters.
#[allow(clippy::unnecessary_wraps)]
pub(crate) fn run_categories(app: &App) -> anyhow::Result<()> {
    println!("{:<16}{:<24}{:<14}LIMIT", "KEY", "QUERY", "KEYWORD");
    for definition in app.definitions.iter() {
        let limit = definition
            .limit
            .map_or_else(|| "\u{2014}".to_string(), |n| n.to_string());
        println!(
            "{:<16}{:<24}{:<14}{}",
            definition.key.as_str(),
            describe_query(definition),
            definition.keyword.as_deref().unwrap_or("\u{2014}"),
            limit
        );
    }
    Ok(())
}

/// Fetch one category through the catalog store and print it.
///
/// An empty or failed category prints the category's empty-state message.
///
/// # Errors
///
/// Returns an error if `key` is not a known category or the fetch fails.
pub(crate) async fn run_fetch(app: &App, key: &str) -> anyhow::Result<()> {
    let key: CategoryKey = key.parse()?;
    let definition = app.definitions.get(key).clone();
    let client = app.client.clone();

    let result = app
        .storefront
        .catalog()
        .fetch_category(key, move || async move {
            client
                .fetch_category(&definition)
                .await
                .map_err(FetchCause::from)
        })
        .await;

    let empty_message = &app.definitions.get(key).empty_message;
    match result {
        Ok(products) if products.is_empty() => {
            println!("{empty_message}");
            Ok(())
        }
        Ok(products) => {
            print_products(&products);
            Ok(())
        }
        Err(err) => {
            println!("{empty_message}");
            Err(err.into())
        }
    }
}

/// # Errors
///
/// Returns an error if the request fails. A missing product is not an error.
pub(crate) async fn run_product(app: &App, id: u64) -> anyhow::Result<()> {
    let Some(product) = app.client.fetch_product(id).await? else {
        println!("product {id} not found");
        return Ok(());
    };

    print_products(std::slice::from_ref(&product));
    println!();
    println!("slug:   {}", product.slug);
    println!("stock:  {}", stock_label(&product));
    if let Some(image) = product.display_image() {
        println!("image:  {}", image.src);
    }
    if let Some(image) = product.hover_image() {
        println!("hover:  {}", image.src);
    }
    let categories: Vec<&str> = product.categories.iter().map(|c| c.name.as_str()).collect();
    if !categories.is_empty() {
        println!("in:     {}", categories.join(", "));
    }
    Ok(())
}

/// # Errors
///
/// Returns an error if the request fails.
pub(crate) async fn run_search(app: &App, term: &str) -> anyhow::Result<()> {
    let products = app.client.search_products(term).await?;
    if products.is_empty() {
        println!("no products match \"{term}\"");
        return Ok(());
    }
    print_products(&products);
    Ok(())
}

pub(crate) fn print_products(products: &[Product]) {
    println!("{:<8}{:<44}{:<34}STOCK", "ID", "NAME", "PRICE");
    for product in products {
        println!(
            "{:<8}{:<44}{:<34}{}",
            product.id,
            truncate(&product.name, 42),
            price_label(product),
            stock_label(product)
        );
    }
}

pub(crate) fn price_label(product: &Product) -> String {
    let display = PriceDisplay::for_product(product);
    let current = format_currency(display.current, DEFAULT_CURRENCY_SYMBOL);
    match display.original {
        Some(original) => format!(
            "{current} (was {}, -{}%)",
            format_currency(original, DEFAULT_CURRENCY_SYMBOL),
            display.savings_percent
        ),
        None => current,
    }
}

fn stock_label(product: &Product) -> String {
    match product.stock_quantity {
        Some(qty) if product.is_in_stock() => format!("{} ({qty})", product.stock_status),
        _ => product.stock_status.to_string(),
    }
}

fn describe_query(definition: &CategoryDefinition) -> String {
    let query = &definition.query;
    let mut parts = Vec::new();
    if let Some(orderby) = &query.orderby {
        match &query.order {
            Some(order) => parts.push(format!("{orderby} {order}")),
            None => parts.push(orderby.clone()),
        }
    }
    if let Some(category) = query.category {
        parts.push(format!("cat={category}"));
    }
    if let Some(tag) = query.tag {
        parts.push(format!("tag={tag}"));
    }
    if let Some(search) = &query.search {
        parts.push(format!("q={search}"));
    }
    if parts.is_empty() {
        "all".to_string()
    } else {
        parts.join(" ")
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        format!("{}...", s.chars().take(max - 3).collect::<String>())
    } else {
        s.to_string()
    }
}
