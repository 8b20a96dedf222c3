use std::env;
use std::process;

use openfiles::config::{API_TOKEN_ENV, BASE_URL_ENV};
use openfiles::{ClientConfig, OpenfilesClient};
use tracing_subscriber::EnvFilter;

pub fn usage_and_exit(usage: &str) -> ! {
    eprintln!("{usage}");
    process::exit(1);
}

pub struct ArgParser {
    args: Vec<String>,
    usage: &'static str,
}

impl ArgParser {
    pub fn new(usage: &'static str) -> Self {
        let args: Vec<String> = env::args().skip(1).collect();

        if args.iter().any(|a| a == "--help" || a == "-h") {
            println!("{usage}");
            process::exit(0);
        }

        Self { args, usage }
    }

    pub fn take_value(&mut self, names: &[&str]) -> Option<String> {
        let mut i = 0;
        while i < self.args.len() {
            if names.contains(&self.args[i].as_str()) {
                let value = self.args.get(i + 1).cloned();
                if value.is_none() {
                    usage_and_exit(self.usage);
                }
                self.args.drain(i..=i + 1);
                return value;
            }
            i += 1;
        }
        None
    }

    pub fn remaining(self) -> Vec<String> {
        self.args
    }
}

/// Connection settings shared by every demo, plus its positional arguments.
pub struct Connection {
    pub config: ClientConfig,
    pub positionals: Vec<String>,
}

/// Parse `--token`/`--base-url`/`--proxy`, falling back to the environment.
pub fn parse_connection(usage: &'static str) -> Connection {
    init_logging();

    let mut parser = ArgParser::new(usage);
    let token = parser
        .take_value(&["--token", "-t"])
        .or_else(|| env::var(API_TOKEN_ENV).ok())
        .unwrap_or_else(|| usage_and_exit(usage));
    let base_url = parser
        .take_value(&["--base-url", "-u"])
        .or_else(|| env::var(BASE_URL_ENV).ok());
    let proxy = parser.take_value(&["--proxy"]);

    let mut config = ClientConfig::new(token);
    if let Some(base_url) = base_url {
        config = config.with_base_url(base_url);
    }
    if let Some(proxy) = proxy {
        config = config.with_proxy(proxy);
    }

    Connection {
        config,
        positionals: parser.remaining(),
    }
}

/// Remove `NAME VALUE` from positional arguments left over after [`parse_connection`].
#[allow(dead_code)] // Only some examples take extra options.
pub fn take_option(args: &mut Vec<String>, names: &[&str], usage: &str) -> Option<String> {
    let pos = args.iter().position(|a| names.contains(&a.as_str()))?;
    if pos + 1 >= args.len() {
        usage_and_exit(usage);
    }
    let value = args.remove(pos + 1);
    args.remove(pos);
    Some(value)
}

impl Connection {
    pub fn open(&self) -> openfiles::Result<OpenfilesClient> {
        OpenfilesClient::open(self.config.clone())
    }
}

/// Logs go to stderr; set `RUST_LOG=openfiles=debug` to see every request.
fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("openfiles=info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}
