//! `catalogdesk` command-line entry point.

use std::sync::Arc;

use anyhow::{Context, bail};

use catalogdesk_client::{AdminApp, ClientConfig, TracingNotifier};
use catalogdesk_core::{OrderId, ProductId};
use catalogdesk_orders::OrderStatus;

const USAGE: &str = "usage: catalogdesk <command>

commands:
  products [search]            list products, most recent first
  stats                        product counts by stock status
  delete <product-id>          delete a product
  orders                       list orders, most recent first
  order-status <order-id> <status>
                               set an order's status (e.g. shipped, out-for-delivery)";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    catalogdesk_observability::init();

    let config = ClientConfig::from_env().context("failed to load configuration")?;
    tracing::info!(api_url = %config.api_url, "catalogdesk starting");

    let app = AdminApp::new(config, Arc::new(TracingNotifier))
        .context("failed to initialize API client")?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    match args.as_slice() {
        ["products", rest @ ..] => {
            let list = app.product_list();
            if let Some(term) = rest.first() {
                list.set_search_term(*term);
                list.settle().await;
            } else {
                list.mount().await.context("failed to fetch products")?;
            }
            for product in list.products() {
                println!(
                    "{}\t{}\t{:.2}\t{}\t{} ({})",
                    product.id,
                    product.name,
                    product.pricing,
                    product.category,
                    product.stock.total,
                    product.stock.status,
                );
            }
        }
        ["stats"] => {
            let list = app.product_list();
            list.mount().await.context("failed to fetch products")?;
            println!("{}", list.stats());
        }
        ["delete", id] => {
            let id: ProductId = id.parse().context("invalid product id")?;
            let list = app.product_list();
            let message = list
                .remove(&id)
                .await
                .with_context(|| format!("failed to delete product {id}"))?;
            println!("{message}");
        }
        ["orders"] => {
            if !app.api().has_credential() {
                bail!("CATALOGDESK_AUTH_TOKEN is required to list orders");
            }
            let board = app.order_board();
            board.refresh().await.context("failed to fetch orders")?;
            for order in board.orders() {
                let placed = order
                    .placed_at()
                    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_default();
                println!(
                    "{}\t{}\t{}\t{:.2}\t{}\t{}",
                    order.id,
                    placed,
                    order.address.full_name(),
                    order.amount,
                    order.payment_label(),
                    order.status,
                );
            }
        }
        ["order-status", id, status] => {
            let id: OrderId = id.parse().context("invalid order id")?;
            let status: OrderStatus = status.parse().context("invalid order status")?;
            app.order_board()
                .set_status(&id, status)
                .await
                .with_context(|| format!("failed to update order {id}"))?;
            println!("{id}: {status}");
        }
        _ => {
            eprintln!("{USAGE}");
            bail!("unrecognized command");
        }
    }

    Ok(())
}
