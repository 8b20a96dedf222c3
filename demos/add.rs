//! Example: Add an existing bag to the account
//!
//! Usage:
//!   cargo run --example add -- [--token TOKEN] [--base-url URL] <BAG_ID>

mod cli;

use cli::{parse_connection, usage_and_exit};
use openfiles::Result;

const USAGE: &str = "Usage: cargo run --example add -- [--token TOKEN] [--base-url URL] <BAG_ID>";

#[tokio::main]
async fn main() -> Result<()> {
    let conn = parse_connection(USAGE);
    let [bag_id] = conn.positionals.as_slice() else {
        usage_and_exit(USAGE);
    };

    let client = conn.open()?;
    client.add_by_bag_id(bag_id).await?;
    println!("Added {}", bag_id);

    client.close();
    Ok(())
}
