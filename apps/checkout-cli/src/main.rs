//! # checkout-price Entry Point
//!
//! The actual setup is in lib.rs for better testability.

fn main() -> anyhow::Result<()> {
    checkout_cli::run()
}
