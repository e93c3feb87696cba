//! Order receipt notifications
//!
//! Receipts are queued on a channel and delivered by a background worker so
//! that a slow or unreachable SMTP relay can never stall the order response.
//! Delivery failures are logged and dropped; the order stands either way.

use lettre::{
    message::{header::ContentType, Mailbox, Message, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    SmtpTransport, Transport,
};
use std::str::FromStr;
use tokio::sync::mpsc;

use crate::{
    config::EmailConfig,
    error::{AppError, AppResult},
    models::order::Order,
};

struct ReceiptJob {
    recipient: String,
    order: Order,
}

#[derive(Clone)]
pub struct NotifierService {
    sender: mpsc::UnboundedSender<ReceiptJob>,
}

impl NotifierService {
    /// Start the receipt worker and return a handle for queueing receipts
    pub fn start(config: EmailConfig) -> Self {
        let (sender, mut receiver) = mpsc::unbounded_channel::<ReceiptJob>();
        let mailer = Mailer::new(config);

        tokio::spawn(async move {
            while let Some(job) = receiver.recv().await {
                let mailer = mailer.clone();
                let order_id = job.order.id;
                // SMTP transport is blocking; keep it off the async workers
                let outcome = tokio::task::spawn_blocking(move || {
                    mailer.send_receipt(&job.recipient, &job.order)
                })
                .await;

                match outcome {
                    Ok(Ok(())) => {
                        tracing::info!("Receipt sent for order {}", order_id);
                    }
                    Ok(Err(e)) => {
                        tracing::error!("Failed to send receipt for order {}: {}", order_id, e);
                    }
                    Err(e) => {
                        tracing::error!("Receipt delivery task failed for order {}: {}", order_id, e);
                    }
                }
            }
        });

        Self { sender }
    }

    /// Queue an order receipt for delivery. Never fails the caller.
    pub fn enqueue_receipt(&self, order: &Order) {
        let job = ReceiptJob {
            recipient: order.user_email.clone(),
            order: order.clone(),
        };

        if self.sender.send(job).is_err() {
            tracing::warn!("Receipt worker is gone, dropping receipt for order {}", order.id);
        }
    }
}

#[derive(Clone)]
struct Mailer {
    config: EmailConfig,
}

impl Mailer {
    fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Send the bill for an order as a multipart text/HTML email
    fn send_receipt(&self, to: &str, order: &Order) -> AppResult<()> {
        let from_name = self
            .config
            .smtp_from_name
            .as_deref()
            .unwrap_or("Bookstall");
        let from_mailbox = Mailbox::from_str(&format!("{} <{}>", from_name, self.config.smtp_from))
            .map_err(|e| AppError::Internal(format!("Invalid from address: {}", e)))?;

        let to_mailbox = Mailbox::from_str(to)
            .map_err(|e| AppError::Internal(format!("Invalid to address: {}", e)))?;

        let email = Message::builder()
            .from(from_mailbox)
            .to(to_mailbox)
            .subject(bill_subject(order))
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(bill_text(order)),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(bill_html(order)),
                    ),
            )
            .map_err(|e| AppError::Internal(format!("Failed to build email: {}", e)))?;

        let mailer_builder = if self.config.smtp_use_tls {
            SmtpTransport::starttls_relay(&self.config.smtp_host)
                .map_err(|e| AppError::Internal(format!("Failed to create SMTP transport: {}", e)))?
        } else {
            SmtpTransport::builder_dangerous(&self.config.smtp_host)
        }
        .port(self.config.smtp_port);

        let mailer_builder = if let (Some(username), Some(password)) = (
            &self.config.smtp_username,
            &self.config.smtp_password,
        ) {
            mailer_builder.credentials(Credentials::new(username.clone(), password.clone()))
        } else {
            mailer_builder
        };

        let mailer = mailer_builder.build();

        mailer
            .send(&email)
            .map_err(|e| AppError::Internal(format!("Failed to send email: {}", e)))?;

        Ok(())
    }
}

fn bill_subject(order: &Order) -> String {
    format!("Order Confirmation - Order #{}", order.id)
}

/// Plain text bill
fn bill_text(order: &Order) -> String {
    let mut text = format!(
        r#"
BOOKSTORE ORDER CONFIRMATION
=============================

Order ID: {}
Date: {}
Payment Status: {}

ORDER DETAILS:
--------------
"#,
        order.id,
        order.created_at.format("%Y-%m-%d %H:%M UTC"),
        order.payment_status
    );

    for item in &order.items {
        text.push_str(&format!("\n{} by {}\n", item.book_title, item.book_author));
        text.push_str(&format!("  Type: {}\n", item.transaction_type.as_str().to_uppercase()));
        text.push_str(&format!("  Price: ${:.2}\n", item.price));
    }

    text.push_str(&format!("\n--------------\nTOTAL: ${:.2}\n", order.total_amount));
    text.push_str("\nThank you for your order!\n");

    text
}

/// HTML bill with an itemized table
fn bill_html(order: &Order) -> String {
    let mut rows = String::new();
    for item in &order.items {
        rows.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td align=\"right\">${:.2}</td></tr>\n",
            item.book_title,
            item.book_author,
            item.transaction_type.as_str().to_uppercase(),
            item.price
        ));
    }

    format!(
        r#"<html>
<body>
<h1>Order Confirmation</h1>
<p><strong>Order ID:</strong> #{}</p>
<p><strong>Date:</strong> {}</p>
<p><strong>Payment Status:</strong> {}</p>
<table border="1" cellpadding="6" cellspacing="0">
<tr><th>Book Title</th><th>Author</th><th>Type</th><th>Price</th></tr>
{}</table>
<p><strong>TOTAL: ${:.2}</strong></p>
<p>Thank you for your order!</p>
</body>
</html>
"#,
        order.id,
        order.created_at.format("%Y-%m-%d %H:%M UTC"),
        order.payment_status,
        rows,
        order.total_amount
    )
}
