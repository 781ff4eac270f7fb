//! Command dispatch: one fetch per command, rendered until it settles.

use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use storefront_core::{ApiError, FetchHandle, FetchState, LoginRequest, StorefrontApi};
use tokio::io::{AsyncBufRead, AsyncWrite, AsyncWriteExt};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::backend::Backend;
use crate::cli::Command;
use crate::render;

/// Install the global subscriber. `RUST_LOG` wins over the flags.
pub fn init_logging(verbose: bool, quiet: bool) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if quiet {
        EnvFilter::new("warn")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    // Ignore error if a subscriber is already set (e.g. in tests).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub async fn run(api: Arc<StorefrontApi<Backend>>, command: Command) -> Result<()> {
    let mut input = tokio::io::BufReader::new(tokio::io::stdin());
    let mut output = tokio::io::stdout();

    match command {
        Command::Products(args) => {
            let filter = args.filter();
            debug!(path = %filter.products_path(), "listing products");
            let fetch = move || {
                let api = Arc::clone(&api);
                let filter = filter.clone();
                async move { api.list_products(&filter).await }
            };
            show(fetch, render::products, &mut input, &mut output).await
        }
        Command::Product { id } => {
            let fetch = move || {
                let api = Arc::clone(&api);
                let id = id.clone();
                async move { api.get_product(&id).await }
            };
            show(fetch, render::product, &mut input, &mut output).await
        }
        Command::Login { email, password } => {
            let credentials = LoginRequest { email, password };
            let fetch = move || {
                let api = Arc::clone(&api);
                let credentials = credentials.clone();
                async move { api.login(&credentials).await }
            };
            show(fetch, render::session, &mut input, &mut output).await
        }
    }
}

/// Drive `fetch` through a `FetchHandle`, printing each view. On error the
/// user may retry, which refetches through the same handle.
pub async fn show<T, F, Fut, R, W>(
    fetch: F,
    view: fn(&T) -> String,
    input: &mut R,
    output: &mut W,
) -> Result<()>
where
    T: Clone + Send + Sync + 'static,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let handle = FetchHandle::spawn(fetch, ());
    print_line(output, &render::state(&handle.state(), view)).await?;

    loop {
        let state = handle.settled().await;
        print_line(output, &render::state(&state, view)).await?;
        if !matches!(state, FetchState::Error(_)) || !render::confirm_retry(input, output).await? {
            return Ok(());
        }
        print_line(output, render::LOADING).await?;
        handle.refetch().await;
    }
}

async fn print_line<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> std::io::Result<()> {
    output.write_all(text.as_bytes()).await?;
    output.write_all(b"\n").await?;
    output.flush().await
}
