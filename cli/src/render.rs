//! Text views for fetch states.

use std::fmt::Write as _;

use storefront_core::{AuthResponse, FetchState, Product, ProductListResponse, ProductResponse};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

pub const LOADING: &str = "Loading...";
pub const NO_DATA: &str = "No data available";
pub const RETRY_PROMPT: &str = "Retry? [y/N] ";

/// Render a fetch state, delegating the success case to `view`.
pub fn state<T>(state: &FetchState<T>, view: impl Fn(&T) -> String) -> String {
    match state {
        FetchState::Loading => LOADING.to_string(),
        FetchState::Error(message) => message.clone(),
        FetchState::Success(data) => view(data),
    }
}

fn product_line(product: &Product) -> String {
    format!(
        "{:<26} {:>10.2}  {:<12} {:.1}*  ({})",
        product.name, product.price, product.category, product.ratings, product.id
    )
}

pub fn products(list: &ProductListResponse) -> String {
    if list.products.is_empty() {
        return NO_DATA.to_string();
    }
    let mut out = String::new();
    for product in &list.products {
        let _ = writeln!(out, "{}", product_line(product));
    }
    let total = list.filtered_products_count.unwrap_or(list.products_count);
    let _ = write!(out, "{} of {} products", list.products.len(), total);
    out
}

pub fn product(response: &ProductResponse) -> String {
    let Some(product) = &response.product else {
        return NO_DATA.to_string();
    };
    let mut out = String::new();
    let _ = writeln!(out, "{}", product.name);
    let _ = writeln!(out, "  id:       {}", product.id);
    let _ = writeln!(out, "  price:    {:.2}", product.price);
    let _ = writeln!(out, "  category: {}", product.category);
    let _ = writeln!(out, "  stock:    {}", product.stock);
    let _ = write!(
        out,
        "  rating:   {:.1} ({} reviews)",
        product.ratings, product.num_of_reviews
    );
    if !product.description.is_empty() {
        let _ = write!(out, "\n\n{}", product.description);
    }
    out
}

pub fn session(auth: &AuthResponse) -> String {
    match &auth.user {
        Some(user) => format!("Signed in as {} <{}> ({})", user.name, user.email, user.role),
        None => NO_DATA.to_string(),
    }
}

/// Ask whether to retry. Anything but `y`/`yes` declines, as does end of input.
pub async fn confirm_retry<R, W>(input: &mut R, output: &mut W) -> std::io::Result<bool>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    output.write_all(RETRY_PROMPT.as_bytes()).await?;
    output.flush().await?;
    let mut line = String::new();
    input.read_line(&mut line).await?;
    let answer = line.trim();
    Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
}
