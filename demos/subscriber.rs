//! # Custom Subscriber Example
//!
//! Shows a metrics subscriber that handles several event types, a function
//! handler, and how dropping a subscriber ends its subscription.
//!
//! The example counts:
//! - Orders placed
//! - Orders shipped
//! - Failed deliveries (reported back to the publisher)
//!
//! ## Run
//! ```bash
//! RUST_LOG=debug cargo run --example subscriber
//! ```

use std::{
    sync::atomic::{AtomicU64, Ordering},
    sync::Arc,
    time::Duration,
};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use weakbus::{
    Capabilities, Config, EventFn, EventHandler, EventSystem, HandlerError, PublishError,
    Subscriber,
};

#[derive(Debug)]
struct OrderPlaced {
    id: u64,
}

#[derive(Debug)]
struct OrderShipped {
    id: u64,
    carrier: &'static str,
}

struct MetricsSubscriber {
    placed: AtomicU64,
    shipped: AtomicU64,
}

impl MetricsSubscriber {
    fn new() -> Self {
        Self {
            placed: AtomicU64::new(0),
            shipped: AtomicU64::new(0),
        }
    }

    fn print_stats(&self) {
        println!();
        println!("Metrics:");
        println!(" ├─► Placed:  {}", self.placed.load(Ordering::Relaxed));
        println!(" └─► Shipped: {}", self.shipped.load(Ordering::Relaxed));
    }
}

#[async_trait]
impl EventHandler<OrderPlaced> for MetricsSubscriber {
    async fn handle(&self, _: &OrderPlaced, _: CancellationToken) -> Result<(), HandlerError> {
        self.placed.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

#[async_trait]
impl EventHandler<OrderShipped> for MetricsSubscriber {
    async fn handle(&self, ev: &OrderShipped, _: CancellationToken) -> Result<(), HandlerError> {
        if ev.carrier == "lost-and-found" {
            return Err(HandlerError::fail(format!("unknown carrier for order {}", ev.id)));
        }
        self.shipped.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

impl Subscriber for MetricsSubscriber {
    fn capabilities(caps: &mut Capabilities<Self>) {
        caps.handles::<OrderPlaced>().handles::<OrderShipped>();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cfg = Config {
        timeout: Duration::from_secs(2),
        ..Config::default()
    };
    let events = Arc::new(EventSystem::with_config(cfg));
    let ctx = CancellationToken::new();

    let metrics = Arc::new(MetricsSubscriber::new());
    events.subscribe_all(&metrics);

    let printer = EventFn::arc("printer", |ev: Arc<OrderPlaced>| async move {
        println!("[placed] order={}", ev.id);
        Ok::<_, HandlerError>(())
    });
    events.subscribe_fn(&printer);

    for id in 1..=3 {
        events.publish(OrderPlaced { id }, &ctx).await?;
    }
    events
        .publish(OrderShipped { id: 1, carrier: "post" }, &ctx)
        .await?;

    match events
        .publish(OrderShipped { id: 2, carrier: "lost-and-found" }, &ctx)
        .await
    {
        Ok(_) => {}
        Err(err @ PublishError::Handler { .. }) => {
            println!("[publish-failed] {} ({})", err.as_message(), err.as_label());
        }
        Err(err) => return Err(err.into()),
    }

    metrics.print_stats();

    // Dropping the last Arc is the unsubscribe.
    drop(printer);
    drop(metrics);
    let handled = events.publish(OrderPlaced { id: 4 }, &ctx).await?;
    println!();
    println!("handled after drop: {handled}");
    println!("event types still indexed: {}", events.event_type_count());
    Ok(())
}
