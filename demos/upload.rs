mod cli;

use cli::{parse_connection, take_option, usage_and_exit};
use openfiles::progress::make_progress_bar;
use std::process;

const USAGE: &str = "Usage: cargo run --example upload -- [--token TOKEN] [--base-url URL] [--description TEXT] <LOCAL_FILE>";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut conn = parse_connection(USAGE);
    let description = take_option(&mut conn.positionals, &["--description", "-d"], USAGE);
    if conn.positionals.len() != 1 {
        usage_and_exit(USAGE);
    }
    let local_file = conn.positionals[0].clone();

    let client = conn.open()?;

    println!("Uploading {}...", local_file);
    match client
        .upload_file_with_progress(&local_file, description.as_deref(), make_progress_bar())
        .await
    {
        Ok(result) => {
            println!("Upload complete!");
            println!("Bag id: {} ({} bytes)", result.bag_id, result.size);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }

    client.close();
    Ok(())
}
