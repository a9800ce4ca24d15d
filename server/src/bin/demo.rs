//! EventHub Demo
//!
//! Walks the reservation lifecycle against an in-memory store:
//! - Seed the sample catalog
//! - Sign up a user and reserve tickets
//! - Hit the capacity limit
//! - Cancel and watch the sold count come back
//! - Dump the notification log
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin demo
//! ```

use eventhub_core::notifications::NotificationFilter;
use eventhub_core::persistence::MemoryBackend;
use eventhub_core::types::UserRole;
use eventhub_core::EventHub;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("\n🎫 ============================================");
    println!("   EventHub - Reservation Ledger Demo");
    println!("============================================\n");

    let hub = EventHub::open(Arc::new(MemoryBackend::new())).await?;

    println!("⚙️  Seeding sample catalog...");
    let events = hub.seed().await?;
    for event in &events {
        println!(
            "   {} — {} ({} seats at {})",
            event.date, event.title, event.capacity, event.price
        );
    }

    let ada = hub.signup("ada@example.com", "Ada Lovelace", UserRole::User).await?;
    println!("\n👤 Signed up {} <{}>", ada.name, ada.email);

    let workshop = &events[1]; // Design Workshop, capacity 50
    println!("\n📋 Reserving 48 tickets for '{}'...", workshop.title);
    let bulk = hub.reserve(ada.id, workshop.id, 48).await?;
    println!("   ✓ Confirmed, total {}", bulk.total_price);

    println!("📋 Reserving 3 more (only 2 left)...");
    match hub.reserve(ada.id, workshop.id, 3).await {
        Ok(_) => println!("   ✗ unexpected success"),
        Err(error) => println!("   ✓ refused: {error}"),
    }

    println!("📋 Reserving the last 2...");
    let last_two = hub.reserve(ada.id, workshop.id, 2).await?;
    let occupancy = hub.event_occupancy(workshop.id).await?;
    println!("   ✓ Confirmed, occupancy now {:.0}%", occupancy.ratio * 100.0);

    println!("\n↩️  Cancelling the 2-ticket reservation...");
    hub.cancel(last_two.id).await?;
    let event = hub.event(workshop.id).await?;
    println!("   ✓ Sold count back to {}/{}", event.sold_count, event.capacity);

    match hub.cancel(last_two.id).await {
        Ok(_) => println!("   ✗ second cancel unexpectedly succeeded"),
        Err(error) => println!("   ✓ second cancel refused: {error}"),
    }

    let metrics = hub.aggregate_metrics().await;
    println!(
        "\n📊 Metrics: {} confirmed reservations, {} attendees, {} revenue",
        metrics.reservations, metrics.attendees, metrics.revenue
    );

    println!("\n📧 Notification log (insertion order):");
    for record in hub.notifications(&NotificationFilter::default()).await {
        println!("   [{}] {} → {}", record.category, record.subject, record.to);
    }

    println!("\n✓ Demo complete\n");
    Ok(())
}
