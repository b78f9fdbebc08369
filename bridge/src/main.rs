mod config;
mod handler;
mod io;
mod protocol;

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use mapstore_core::grants::GrantBroker;
use mapstore_core::permissions::FileRegistry;
use mapstore_core::picker::LocalPicker;
use mapstore_core::store::LocalStore;

use crate::config::BridgeConfig;
use crate::handler::dispatch::Dispatcher;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_usage() {
    eprintln!("Usage: mapstore-bridge --stdio [--root <dir>] [--grants <file>]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --stdio          Run in stdio mode (NDJSON over stdin/stdout)");
    eprintln!("  --root <dir>     Directory resolved as the document root (default: .)");
    eprintln!("  --grants <file>  Grant registry file (default: ~/.config/mapstore-bridge/grants.json)");
    eprintln!("  --version        Print version and exit");
    eprintln!("  --help           Print this help message");
}

fn parse_config(args: &[String]) -> anyhow::Result<BridgeConfig> {
    let mut config = BridgeConfig::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--root" => {
                let dir = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--root requires a directory"))?;
                config.root = dir.into();
            }
            "--grants" => {
                let file = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--grants requires a file path"))?;
                config.grants_path = file.into();
            }
            other => anyhow::bail!("Unknown option: {other}"),
        }
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    match args[1].as_str() {
        "--version" => {
            println!("mapstore-bridge {}", VERSION);
            Ok(())
        }
        "--help" => {
            print_usage();
            Ok(())
        }
        "--stdio" => {
            // Logs go to stderr so they don't interfere with the protocol
            // on stdout.
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
                )
                .with_writer(std::io::stderr)
                .init();

            let config = match parse_config(&args[2..]) {
                Ok(c) => c,
                Err(e) => {
                    eprintln!("{e}");
                    print_usage();
                    std::process::exit(1);
                }
            };

            info!(
                "mapstore-bridge {} starting in stdio mode, root {}",
                VERSION,
                config.root.display()
            );

            let registry = Arc::new(FileRegistry::open(&config.grants_path));
            let store = Arc::new(LocalStore::new(&config.root, registry.clone()));
            let broker = GrantBroker::new();
            let picker = Arc::new(LocalPicker::new(&config.root, broker.clone()));
            let dispatcher = Arc::new(Dispatcher::new(store, registry, picker, broker));

            io::stdio::run_stdio_loop(dispatcher).await
        }
        other => {
            eprintln!("Unknown option: {}", other);
            print_usage();
            std::process::exit(1);
        }
    }
}
