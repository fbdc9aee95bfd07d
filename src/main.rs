use std::sync::Arc;
use std::time::Duration;

use dotenv::dotenv;
use tracing_subscriber::filter::LevelFilter;
use uuid::Uuid;

use frelanci_client::models::ordermodel::Order;
use frelanci_client::service::conversation::{ConversationEngine, MessageStyle};
use frelanci_client::service::orders::OrderListService;
use frelanci_client::{ApiClient, Config, SessionStore};

/// Read-only inspector for the signed-in user's orders: with no argument it
/// lists them, with an order id it prints that order's conversation. Useful
/// as a live smoke test of the whole client stack.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::INFO)
        .init();

    dotenv().ok();

    let config = Config::init();
    let session = Arc::new(SessionStore::open(&config.session_file)?);

    let Some(user) = session.current_user() else {
        println!(
            "No session found at {} — sign in from the app first.",
            config.session_file.display()
        );
        return Ok(());
    };
    println!("✅ Session loaded for {} ({})", user.name, user.user_type.to_str());

    let api = Arc::new(ApiClient::new(&config, session.clone())?);

    match std::env::args().nth(1) {
        Some(raw) => {
            let order_id: Uuid = raw.parse()?;
            let engine = ConversationEngine::new(
                api,
                user,
                order_id,
                Duration::from_secs(config.poll_interval_secs),
            );
            engine.load().await?;
            let order = engine
                .snapshot()
                .ok_or_else(|| anyhow::anyhow!("Order {} not found", order_id))?;
            print_transcript(&engine, &order);
        }
        None => {
            let list = OrderListService::new(api);
            let orders = list.my_orders().await?;
            if orders.is_empty() {
                println!("No orders yet.");
            }
            for order in &orders {
                print_order_row(order);
            }
        }
    }

    Ok(())
}

fn print_order_row(order: &Order) {
    let title = order.job.as_ref().map(|j| j.title.as_str()).unwrap_or("Service");
    println!(
        "{}  {:<12} {:>8.0} DA  {}  ({} ⇄ {})",
        order.id,
        order.status.to_str(),
        order.price,
        title,
        order.client.name,
        order.freelancer.name
    );
}

fn print_transcript<A: frelanci_client::OrderApi + 'static>(
    engine: &ConversationEngine<A>,
    order: &Order,
) {
    let title = order.job.as_ref().map(|j| j.title.as_str()).unwrap_or("Service");
    println!("\n{} — {:.0} DA — {}", title, order.price, order.status.to_str());
    match order.payment_approved_at {
        Some(at) => println!("Payment confirmed at {}", at.to_rfc3339()),
        None => println!("Payment pending"),
    }

    if order.messages.is_empty() {
        println!("\nNo messages yet.");
        return;
    }

    println!();
    for message in &order.messages {
        let media_note = message
            .media
            .as_ref()
            .map(|m| format!(" [{}]", m.media_type.to_str()))
            .unwrap_or_default();
        match engine.classify_message(message) {
            MessageStyle::System => println!("        -- {} --", message.message),
            MessageStyle::Own => println!("  me: {}{}", message.message, media_note),
            MessageStyle::Theirs => {
                println!("  {}: {}{}", message.sender_name, message.message, media_note)
            }
        }
    }
}
