mod cli;

use cli::{parse_connection, usage_and_exit};
use openfiles::Result;

const USAGE: &str =
    "Usage: cargo run --example rm -- [--token TOKEN] [--base-url URL] <BAG_ID>...";

#[tokio::main]
async fn main() -> Result<()> {
    let conn = parse_connection(USAGE);
    if conn.positionals.is_empty() {
        usage_and_exit(USAGE);
    }
    let client = conn.open()?;

    // Deletes are independent; run them together.
    let client = &client;
    let results = futures::future::join_all(
        conn.positionals
            .iter()
            .map(|bag_id| async move { (bag_id, client.delete_file(bag_id).await) }),
    )
    .await;

    for (bag_id, result) in results {
        match result {
            Ok(()) => println!("Removed {}", bag_id),
            Err(e) => eprintln!("Failed to remove {}: {}", bag_id, e),
        }
    }

    client.close();
    Ok(())
}
