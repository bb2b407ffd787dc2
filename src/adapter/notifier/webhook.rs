//! Incoming-webhook notifier.
//!
//! Posts Slack-style attachment payloads. Events are queued on an unbounded
//! channel and delivered by a background task so `notify` never blocks the
//! caller.

use std::time::Duration;

use chrono::Utc;
use reqwest::Client;
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::error::Result;
use crate::port::{Event, Notifier};

/// Upper bound for one webhook request, so a hung endpoint cannot stall
/// the delivery worker.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Notifier that posts events to an incoming-webhook URL.
pub struct WebhookNotifier {
    /// Channel sender for queuing outbound notifications.
    sender: mpsc::UnboundedSender<Event>,
}

impl WebhookNotifier {
    /// Create a new webhook notifier and spawn the delivery worker.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = build_client(REQUEST_TIMEOUT)?;
        let (sender, receiver) = mpsc::unbounded_channel();
        tokio::spawn(run_worker(client, url.into(), receiver));
        info!("Webhook notifier started");
        Ok(Self { sender })
    }
}

fn build_client(timeout: Duration) -> Result<Client> {
    Ok(Client::builder().timeout(timeout).build()?)
}

impl Notifier for WebhookNotifier {
    fn notify(&self, event: Event) {
        if self.sender.send(event).is_err() {
            debug!("Webhook worker stopped, dropping notification");
        }
    }
}

async fn run_worker(client: Client, url: String, mut receiver: mpsc::UnboundedReceiver<Event>) {
    while let Some(event) = receiver.recv().await {
        let payload = attachment_payload(&event);
        match client.post(&url).json(&payload).send().await {
            Ok(response) if response.status().is_success() => {}
            Ok(response) => {
                error!(status = %response.status(), "Webhook rejected notification");
            }
            Err(e) => {
                error!(error = %e, "Failed to send webhook notification");
            }
        }
    }
}

/// Build the attachment payload for an event.
#[must_use]
pub fn attachment_payload(event: &Event) -> Value {
    let mut attachment = match event {
        Event::MarginAction(e) => json!({
            "title": e.title(),
            "color": "warning",
            "fields": [
                field("Action", e.action.to_string()),
                field("Asset", e.asset.to_string()),
                field("Amount", e.amount.to_string()),
                field("Current Margin Level", e.margin_level.to_string()),
                field("Min Margin Level", e.min_margin_level.to_string()),
            ],
        }),
        Event::ActionFailed(e) => json!({
            "title": format!("{} {} {} failed", e.action, e.amount, e.asset),
            "color": "danger",
            "fields": [
                field("Action", e.action.to_string()),
                field("Asset", e.asset.to_string()),
                field("Amount", e.amount.to_string()),
                field("Reason", e.reason.clone()),
            ],
        }),
    };

    attachment["ts"] = json!(Utc::now().timestamp());

    json!({ "attachments": [attachment] })
}

fn field(title: &str, value: String) -> Value {
    json!({
        "title": title,
        "value": value,
        "short": true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MarginAction;
    use crate::port::{ActionFailedEvent, MarginActionEvent};
    use rust_decimal_macros::dec;
    use tokio::net::TcpListener;

    #[test]
    fn margin_action_payload() {
        let payload = attachment_payload(&Event::MarginAction(MarginActionEvent {
            action: MarginAction::Borrow,
            asset: "ETH".into(),
            amount: dec!(0.5),
            margin_level: dec!(2.1),
            min_margin_level: dec!(1.5),
        }));

        let attachment = &payload["attachments"][0];
        assert_eq!(attachment["title"], "Borrow 0.5 ETH");
        assert_eq!(attachment["color"], "warning");

        let fields = attachment["fields"].as_array().expect("fields");
        let titles: Vec<_> = fields.iter().map(|f| f["title"].as_str().unwrap_or_default()).collect();
        assert_eq!(
            titles,
            vec!["Action", "Asset", "Amount", "Current Margin Level", "Min Margin Level"]
        );
        assert_eq!(fields[3]["value"], "2.1");
        assert_eq!(fields[4]["value"], "1.5");
        assert!(fields.iter().all(|f| f["short"] == true));
        assert!(attachment["ts"].is_i64());
    }

    #[test]
    fn failure_payload() {
        let payload = attachment_payload(&Event::ActionFailed(ActionFailedEvent {
            action: MarginAction::Repay,
            asset: "USDT".into(),
            amount: dec!(100),
            reason: "rejected".into(),
        }));

        let attachment = &payload["attachments"][0];
        assert_eq!(attachment["title"], "Repay 100 USDT failed");
        assert_eq!(attachment["color"], "danger");
        assert_eq!(attachment["fields"][3]["value"], "rejected");
    }

    #[tokio::test]
    async fn hung_endpoint_does_not_stall_worker() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        // Accept connections and never answer them.
        let _server = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let client = build_client(Duration::from_millis(100)).expect("client");
        let (sender, receiver) = mpsc::unbounded_channel();
        let worker = tokio::spawn(run_worker(client, format!("http://{addr}/hook"), receiver));

        for _ in 0..2 {
            sender
                .send(Event::ActionFailed(ActionFailedEvent {
                    action: MarginAction::Borrow,
                    asset: "ETH".into(),
                    amount: dec!(1),
                    reason: "insufficient collateral".into(),
                }))
                .expect("worker alive");
        }
        drop(sender);

        tokio::time::timeout(Duration::from_secs(5), worker)
            .await
            .expect("worker drained the queue")
            .expect("worker task");
    }
}
