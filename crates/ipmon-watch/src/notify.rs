//! Change notifications over SMTP.

use std::path::PathBuf;

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::MailConfig;
use crate::error::{Result, WatchError};

/// Delivers a subject + body message to a list of recipients.
#[allow(async_fn_in_trait)]
pub trait Notifier {
    /// Recipients change reports go to.
    fn recipients(&self) -> Result<Vec<String>>;

    async fn notify(&self, subject: &str, body: &str, recipients: &[String]) -> Result<()>;
}

/// Sends mail through an SMTPS relay described by a [`MailConfig`] file.
///
/// The file is read on every call, so it only has to exist once there is
/// something to report. Its `to` field supplies [`Notifier::recipients`].
#[derive(Debug, Clone)]
pub struct SmtpNotifier {
    mail_conf: PathBuf,
}

impl SmtpNotifier {
    pub fn new(mail_conf: impl Into<PathBuf>) -> Self {
        Self {
            mail_conf: mail_conf.into(),
        }
    }
}

impl Notifier for SmtpNotifier {
    fn recipients(&self) -> Result<Vec<String>> {
        Ok(MailConfig::load(&self.mail_conf)?.recipients())
    }

    async fn notify(&self, subject: &str, body: &str, recipients: &[String]) -> Result<()> {
        let cfg = MailConfig::load(&self.mail_conf)?;
        let message = build_message(&cfg, subject, body, recipients)?;
        let transport = build_transport(&cfg)?;

        let response = transport.send(message).await?;

        tracing::info!(
            relay = %cfg.server_host,
            port = cfg.server_port,
            recipients = recipients.len(),
            code = %response.code(),
            "Mail accepted by relay"
        );

        Ok(())
    }
}

/// Plain-text message from `cfg.from` to every recipient.
pub fn build_message(
    cfg: &MailConfig,
    subject: &str,
    body: &str,
    recipients: &[String],
) -> Result<Message> {
    if recipients.is_empty() {
        return Err(WatchError::Notify("no recipients configured".to_string()));
    }

    let mut builder = Message::builder()
        .from(cfg.from.parse::<Mailbox>()?)
        .subject(subject)
        .header(ContentType::TEXT_PLAIN);
    for recipient in recipients {
        builder = builder.to(recipient.parse::<Mailbox>()?);
    }

    Ok(builder.body(body.to_string())?)
}

/// Implicit TLS transport (TLS from the first byte, no STARTTLS).
fn build_transport(cfg: &MailConfig) -> Result<AsyncSmtpTransport<Tokio1Executor>> {
    let tls = TlsParameters::builder(cfg.server_host.clone())
        .dangerous_accept_invalid_certs(cfg.accept_invalid_certs)
        .build()?;

    let mut builder =
        AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(cfg.server_host.as_str())
            .port(cfg.server_port)
            .tls(Tls::Wrapper(tls));

    if !cfg.server_user.is_empty() {
        builder = builder.credentials(Credentials::new(
            cfg.server_user.clone(),
            cfg.server_password.clone(),
        ));
    }

    Ok(builder.build())
}
