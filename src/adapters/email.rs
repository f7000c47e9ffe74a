//! Delivery of the end-of-run failure alert.

use crate::config::app_config::{NotifyConfig, NotifyMode};
use crate::core::{Notifier, Result};
use crate::utils::error::TrackerError;
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncFileTransport, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::path::Path;

const IMPLICIT_TLS_PORT: u16 = 465;

pub struct AlertNotifier {
    transport: AlertTransport,
    from_email: String,
    to_email: String,
}

enum AlertTransport {
    /// Dry run: print the alert instead of sending it.
    Console,
    Smtp(AsyncSmtpTransport<Tokio1Executor>),
    File(AsyncFileTransport<Tokio1Executor>),
}

fn notification_error(operation: &str, e: impl std::fmt::Display) -> TrackerError {
    TrackerError::NotificationError {
        message: format!("{operation}: {e}"),
    }
}

impl AlertNotifier {
    pub fn new(config: &NotifyConfig) -> Result<Self> {
        let transport = match config.mode {
            NotifyMode::Console => AlertTransport::Console,
            NotifyMode::Smtp => {
                let username = config.from_email.clone().unwrap_or_default();
                let password = config.password.clone().unwrap_or_default();

                let builder = if config.smtp_port == IMPLICIT_TLS_PORT {
                    AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
                } else {
                    AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
                }
                .map_err(|e| notification_error("create SMTP transport", e))?;

                AlertTransport::Smtp(
                    builder
                        .port(config.smtp_port)
                        .credentials(Credentials::new(username, password))
                        .build(),
                )
            }
            NotifyMode::File => {
                let dir = config.output_dir.as_deref().unwrap_or("alerts");
                let dir = Path::new(dir);
                if !dir.exists() {
                    std::fs::create_dir_all(dir)?;
                }
                AlertTransport::File(AsyncFileTransport::<Tokio1Executor>::new(dir))
            }
        };

        Ok(Self {
            transport,
            from_email: config.from_email.clone().unwrap_or_default(),
            to_email: config.to_email.clone().unwrap_or_default(),
        })
    }

    fn build_message(&self, subject: &str, body: &str) -> Result<Message> {
        let from = self
            .from_email
            .parse::<Mailbox>()
            .map_err(|e| notification_error("parse from email", e))?;
        let to = self
            .to_email
            .parse::<Mailbox>()
            .map_err(|e| notification_error("parse to email", e))?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(body.to_string())
            .map_err(|e| notification_error("build email message", e))
    }
}

#[async_trait]
impl Notifier for AlertNotifier {
    async fn notify(&self, subject: &str, body: &str) -> Result<()> {
        match &self.transport {
            AlertTransport::Console => {
                tracing::info!("Email delivery disabled, printing alert instead");
                println!("Subject: {}", subject);
                println!("From: {}", self.from_email);
                println!("To: {}", self.to_email);
                println!();
                println!("{}", body);
            }
            AlertTransport::Smtp(smtp) => {
                let message = self.build_message(subject, body)?;
                smtp.send(message)
                    .await
                    .map_err(|e| notification_error("send SMTP email", e))?;
                tracing::info!("Failure alert sent to {}", self.to_email);
            }
            AlertTransport::File(file) => {
                let message = self.build_message(subject, body)?;
                let id = file
                    .send(message)
                    .await
                    .map_err(|e| notification_error("write email file", e))?;
                tracing::info!("Failure alert written as {}", id);
            }
        }

        Ok(())
    }
}
