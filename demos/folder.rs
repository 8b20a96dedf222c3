//! Example: Upload a local folder as a ZIP archive
//!
//! Usage:
//!   cargo run --example folder -- [--token TOKEN] [--base-url URL] <LOCAL_FOLDER> [DESCRIPTION]

mod cli;

use cli::{parse_connection, usage_and_exit};
use openfiles::Result;

const USAGE: &str = "Usage: cargo run --example folder -- [--token TOKEN] [--base-url URL] <LOCAL_FOLDER> [DESCRIPTION]";

#[tokio::main]
async fn main() -> Result<()> {
    let conn = parse_connection(USAGE);
    let (folder, description) = match conn.positionals.as_slice() {
        [folder] => (folder.clone(), None),
        [folder, description] => (folder.clone(), Some(description.clone())),
        _ => usage_and_exit(USAGE),
    };

    let client = conn.open()?;

    println!("Packaging and uploading {}...", folder);
    let result = client.upload_folder(&folder, description.as_deref()).await?;

    println!("Upload complete!");
    println!("📦 Bag id: {}", result.bag_id);
    println!("   Archive size: {} bytes", result.size);

    client.close();
    Ok(())
}
