//! Example: Download a file by bag id
//!
//! Usage:
//!   cargo run --example download -- [--token TOKEN] [--base-url URL] <BAG_ID> <LOCAL_PATH>
//!
//! LOCAL_PATH may be an existing directory, in which case the stored file name is used.

mod cli;

use cli::{parse_connection, usage_and_exit};
use openfiles::Result;
use openfiles::progress::make_progress_bar;

const USAGE: &str =
    "Usage: cargo run --example download -- [--token TOKEN] [--base-url URL] <BAG_ID> <LOCAL_PATH>";

#[tokio::main]
async fn main() -> Result<()> {
    let conn = parse_connection(USAGE);
    if conn.positionals.len() != 2 {
        usage_and_exit(USAGE);
    }
    let bag_id = conn.positionals[0].clone();
    let local_path = conn.positionals[1].clone();

    let client = conn.open()?;

    println!("Downloading {}...", bag_id);
    let path = client
        .download_file_with_progress(&bag_id, &local_path, make_progress_bar())
        .await?;

    println!("Download complete: {}", path.display());

    client.close();
    Ok(())
}
