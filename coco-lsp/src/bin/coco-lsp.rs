use coco_config::Loader;
use coco_lsp::CocoLanguageServer;
use tokio::io::{stdin, stdout};
use tower_lsp::{LspService, Server};
use tracing_subscriber::EnvFilter;

/// Optional per-workspace overrides, read from the server's working directory
const WORKSPACE_CONFIG: &str = "coco.toml";

#[tokio::main]
async fn main() {
    let config = Loader::new()
        .with_optional_file(WORKSPACE_CONFIG)
        .build()
        .unwrap_or_else(|e| {
            eprintln!("Error loading configuration: {e}");
            std::process::exit(1);
        });

    // stdout carries JSON-RPC
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let completion = config.completion;
    let (service, socket) = LspService::new(move |client| CocoLanguageServer::new(client, completion));
    Server::new(stdin(), stdout(), socket).serve(service).await;
}
