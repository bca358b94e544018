//! List unconfirmed orders with the Razorgator library.
//!
//! This example demonstrates how to:
//! - Create a client from an API token
//! - Fetch the list of orders as a result set
//! - Hide orders belonging to some offices
//! - Walk the results with the cursor
//!
//! Usage:
//! ```
//! RAZORGATOR_API_TOKEN=your_token cargo run --example list_orders -- [excluded office ids...]
//! ```

use razorgator::{ApiResponse, ExcludeBy, Options, RazorgatorClient, RazorgatorError};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::init();

    let token = env::var("RAZORGATOR_API_TOKEN")
        .expect("RAZORGATOR_API_TOKEN environment variable must be set");

    let excluded_offices: Vec<i64> = env::args()
        .skip(1)
        .map(|arg| arg.parse())
        .collect::<Result<_, _>>()?;

    let client = match RazorgatorClient::new(token) {
        Ok(client) => client,
        Err(RazorgatorError::Config { message }) => {
            eprintln!("Bad configuration: {}", message);
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };

    println!("Fetching unconfirmed orders...");
    let mut orders = match client.list_orders(Options::new()).await {
        Ok(ApiResponse::ResultSet(orders)) => orders,
        Ok(ApiResponse::Xml(document)) => {
            println!("Service answered with <{}>", document.root_name());
            return Ok(());
        }
        Err(RazorgatorError::Request { status }) => {
            eprintln!("Request failed with HTTP status {}", status);
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };

    println!("Received {} orders", orders.total_results());
    if !excluded_offices.is_empty() {
        orders.exclude_results(excluded_offices, ExcludeBy::Office);
        println!("{} left after excluding offices", orders.count());
    }

    orders.rewind();
    while orders.valid() {
        if let Some(order) = orders.current() {
            println!(
                "#{} order {} x{} @ {:.2} (e-delivery: {})",
                orders.key(),
                order.order_id().unwrap_or_default(),
                order.quantity().unwrap_or_default(),
                order.cost().unwrap_or_default(),
                order.electronic_delivery().unwrap_or(false),
            );
            if let Some(event) = order.get_str("event") {
                println!("    {}", event);
            }
        }
        orders.next();
    }

    Ok(())
}
