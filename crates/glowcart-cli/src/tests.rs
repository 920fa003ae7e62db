use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["glowcart-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_categories_command() {
    let cli = Cli::try_parse_from(["glowcart-cli", "categories"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::Categories)));
}

#[test]
fn parses_fetch_with_category_key() {
    let cli = Cli::try_parse_from(["glowcart-cli", "fetch", "sunCare"]).unwrap();
    match cli.command {
        Some(Commands::Fetch { key }) => assert_eq!(key, "sunCare"),
        other => panic!("expected Fetch, got {other:?}"),
    }
}

#[test]
fn product_id_must_be_numeric() {
    let result = Cli::try_parse_from(["glowcart-cli", "product", "abc"]);
    assert!(result.is_err());
}

#[test]
fn parses_search_term() {
    let cli = Cli::try_parse_from(["glowcart-cli", "search", "vitamin c"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Search { ref term }) if term == "vitamin c"
    ));
}

#[test]
fn cart_add_defaults_to_quantity_one() {
    let cli = Cli::try_parse_from(["glowcart-cli", "cart", "add", "42"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Cart {
            command: CartCommands::Add { id: 42, qty: 1 }
        })
    ));
}

#[test]
fn cart_add_with_quantity() {
    let cli = Cli::try_parse_from(["glowcart-cli", "cart", "add", "42", "--qty", "3"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Cart {
            command: CartCommands::Add { id: 42, qty: 3 }
        })
    ));
}

#[test]
fn cart_set_accepts_negative_quantity() {
    let cli = Cli::try_parse_from(["glowcart-cli", "cart", "set", "7", "-1"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Cart {
            command: CartCommands::Set { id: 7, qty: -1 }
        })
    ));
}

#[test]
fn cart_requires_subcommand() {
    let result = Cli::try_parse_from(["glowcart-cli", "cart"]);
    assert!(result.is_err());
}

#[test]
fn parses_cart_clear() {
    let cli = Cli::try_parse_from(["glowcart-cli", "cart", "clear"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Cart {
            command: CartCommands::Clear
        })
    ));
}
