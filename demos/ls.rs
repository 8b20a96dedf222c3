//! Example: List stored files and account quota
//!
//! Usage:
//!   cargo run --example ls -- [--token TOKEN] [--base-url URL]

mod cli;

use cli::{parse_connection, usage_and_exit};
use openfiles::Result;

const USAGE: &str = "Usage: cargo run --example ls -- [--token TOKEN] [--base-url URL] [--proxy PROXY]";

#[tokio::main]
async fn main() -> Result<()> {
    let conn = parse_connection(USAGE);
    if !conn.positionals.is_empty() {
        usage_and_exit(USAGE);
    }
    let client = conn.open()?;

    // Quota and listing are independent, so fetch both at once.
    let (info, files) = tokio::try_join!(client.get_user_info(), client.list_files())?;

    println!(
        "\n📊 Storage: {} / {} ({:.1}% used) - user {}",
        format_size(info.used() as u64),
        format_size(info.capacity as u64),
        info.usage_percent(),
        info.uid
    );

    println!("\n📁 Files:\n");
    if files.is_empty() {
        println!("  (empty)");
    } else {
        for file in &files {
            let description = file.description.as_deref().unwrap_or("");
            println!(
                "  📄 {:<44} {:<32} {:>10} {}",
                file.bag_id,
                file.filename,
                format_size(file.size),
                description
            );
        }
    }

    client.close();
    Ok(())
}

fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{}B", bytes)
    } else if bytes < 1_048_576 {
        format!("{:.1}KB", bytes as f64 / 1024.0)
    } else if bytes < 1_073_741_824 {
        format!("{:.1}MB", bytes as f64 / 1_048_576.0)
    } else {
        format!("{:.2}GB", bytes as f64 / 1_073_741_824.0)
    }
}
