use crate::config::{ConfigError, EmailConfig};
use crate::util::money::Money;
use async_trait::async_trait;
use lettre::{
    message::{
        header::ContentType, Attachment, Mailbox, MultiPart, SinglePart,
    },
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::{error, info, instrument};

/// Email service errors
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("SMTP error: {0}")]
    SmtpError(String),

    #[error("Message building error: {0}")]
    MessageError(String),

    #[error("Address error: {0}")]
    AddressError(String),
}

impl From<ConfigError> for EmailError {
    fn from(err: ConfigError) -> Self {
        EmailError::ConfigError(err.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct EmailAttachment {
    pub filename: String,
    pub content_type: String,
    pub content: Vec<u8>,
}

/// Email message builder
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub text_body: Option<String>,
    pub html_body: Option<String>,
    pub attachment: Option<EmailAttachment>,
}

impl EmailMessage {
    pub fn new(to: String, subject: String) -> Self {
        Self {
            to,
            reply_to: None,
            subject,
            text_body: None,
            html_body: None,
            attachment: None,
        }
    }

    pub fn with_reply_to(mut self, reply_to: String) -> Self {
        self.reply_to = Some(reply_to);
        self
    }

    pub fn with_text_body(mut self, body: String) -> Self {
        self.text_body = Some(body);
        self
    }

    pub fn with_html_body(mut self, body: String) -> Self {
        self.html_body = Some(body);
        self
    }

    pub fn with_attachment(mut self, attachment: EmailAttachment) -> Self {
        self.attachment = Some(attachment);
        self
    }
}

/// Outbound delivery collaborator. The core only sees success or failure; a
/// failed send is reported, never compensated for.
#[async_trait]
pub trait EmailService: Send + Sync {
    async fn send_email(&self, message: EmailMessage) -> Result<(), EmailError>;
}

/// SMTP email service implementation
pub struct SmtpEmailService {
    pub config: EmailConfig,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpEmailService {
    /// Create a new SMTP email service
    #[instrument(skip(config), fields(host = %config.smtp_host, port = config.smtp_port))]
    pub fn new(config: EmailConfig) -> Result<Self, EmailError> {
        info!("Initializing SMTP email service");

        config.validate().map_err(EmailError::from)?;

        let mut transport_builder =
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
                .port(config.smtp_port)
                .timeout(Some(std::time::Duration::from_secs(
                    config.connection_timeout_secs,
                )));

        // Configure TLS settings
        if config.use_tls {
            let tls_parameters = TlsParameters::new(config.smtp_host.clone())
                .map_err(|e| EmailError::ConfigError(format!("TLS configuration error: {}", e)))?;

            if config.use_starttls {
                transport_builder = transport_builder.tls(Tls::Required(tls_parameters));
            } else {
                transport_builder = transport_builder.tls(Tls::Wrapper(tls_parameters));
            }
        } else {
            transport_builder = transport_builder.tls(Tls::None);
        }

        if !config.smtp_username.is_empty() && !config.smtp_password.is_empty() {
            let credentials = Credentials::new(
                config.smtp_username.clone(),
                config.smtp_password.clone(),
            );
            transport_builder = transport_builder.credentials(credentials);
        }

        let transport = transport_builder.build();

        info!("SMTP email service initialized successfully");
        Ok(Self { config, transport })
    }

    /// Build a lettre Message from EmailMessage
    fn build_message(&self, email_message: EmailMessage) -> Result<Message, EmailError> {
        let from_mailbox: Mailbox =
            format!("{} <{}>", self.config.from_name, self.config.from_email)
                .parse()
                .map_err(|e| EmailError::AddressError(format!("Invalid from address: {}", e)))?;

        let to_mailbox: Mailbox = email_message
            .to
            .parse()
            .map_err(|e| EmailError::AddressError(format!("Invalid to address: {}", e)))?;

        let mut message_builder = Message::builder()
            .from(from_mailbox)
            .to(to_mailbox)
            .subject(&email_message.subject);

        if let Some(reply_to) = &email_message.reply_to {
            let reply_mailbox: Mailbox = reply_to
                .parse()
                .map_err(|e| EmailError::AddressError(format!("Invalid reply-to address: {}", e)))?;
            message_builder = message_builder.reply_to(reply_mailbox);
        }

        let body = match (email_message.text_body, email_message.html_body) {
            (Some(text), Some(html)) => MultiPart::alternative()
                .singlepart(
                    SinglePart::builder()
                        .header(ContentType::TEXT_PLAIN)
                        .body(text),
                )
                .singlepart(
                    SinglePart::builder()
                        .header(ContentType::TEXT_HTML)
                        .body(html),
                ),
            (Some(text), None) => MultiPart::alternative().singlepart(
                SinglePart::builder()
                    .header(ContentType::TEXT_PLAIN)
                    .body(text),
            ),
            (None, Some(html)) => MultiPart::alternative().singlepart(
                SinglePart::builder()
                    .header(ContentType::TEXT_HTML)
                    .body(html),
            ),
            (None, None) => {
                return Err(EmailError::MessageError(
                    "No message body provided".to_string(),
                ))
            }
        };

        let message = match email_message.attachment {
            Some(attachment) => {
                let content_type = ContentType::parse(&attachment.content_type).map_err(|e| {
                    EmailError::MessageError(format!("Invalid attachment content type: {}", e))
                })?;
                let part = Attachment::new(attachment.filename)
                    .body(attachment.content, content_type);
                message_builder.multipart(MultiPart::mixed().multipart(body).singlepart(part))
            }
            None => message_builder.multipart(body),
        }
        .map_err(|e| EmailError::MessageError(format!("Failed to build message: {}", e)))?;

        Ok(message)
    }

    /// Validate email address format
    fn validate_email_address(&self, email: &str) -> Result<(), EmailError> {
        let parts: Vec<&str> = email.split('@').collect();
        if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
            return Err(EmailError::AddressError("Invalid email format".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl EmailService for SmtpEmailService {
    /// Send an email message
    #[instrument(skip(self, message), fields(to = %message.to, subject = %message.subject))]
    async fn send_email(&self, message: EmailMessage) -> Result<(), EmailError> {
        info!("Sending email to: {}", message.to);

        self.validate_email_address(&message.to)?;

        let email_message = self.build_message(message)?;

        self.transport.send(email_message).await.map_err(|e| {
            error!("Failed to send email: {}", e);
            EmailError::SmtpError(format!("Failed to send email: {}", e))
        })?;

        info!("Email sent successfully");
        Ok(())
    }
}

/// Customer-facing quote email bodies (plain text and HTML).
pub fn quote_email_bodies(
    client_name: &str,
    quote_title: &str,
    total: Money,
    valid_until: &str,
    custom_message: Option<&str>,
) -> (String, String) {
    let intro = custom_message
        .map(str::to_string)
        .unwrap_or_else(|| "Please find attached our quote for the work we discussed.".to_string());

    let text_body = format!(
        r#"Hello {client_name},

{intro}

Quote: {quote_title}
Total (incl. VAT): {total}
Valid until: {valid_until}

The full quote document is attached. We are happy to answer any question.

Best regards"#,
    );

    let html_body = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{title}</title>
</head>
<body style="font-family: Arial, sans-serif; color: #333; max-width: 600px; margin: 0 auto; padding: 20px;">
    <p>Hello {name},</p>
    <p>{intro}</p>
    <table style="border-collapse: collapse; margin: 20px 0;">
        <tr><td style="padding: 4px 12px 4px 0;"><strong>Quote</strong></td><td>{title}</td></tr>
        <tr><td style="padding: 4px 12px 4px 0;"><strong>Total (incl. VAT)</strong></td><td>{total}</td></tr>
        <tr><td style="padding: 4px 12px 4px 0;"><strong>Valid until</strong></td><td>{valid_until}</td></tr>
    </table>
    <p>The full quote document is attached. We are happy to answer any question.</p>
    <p>Best regards</p>
</body>
</html>"#,
        name = html_escape::encode_text(client_name),
        title = html_escape::encode_text(quote_title),
        intro = html_escape::encode_text(&intro),
        total = total,
        valid_until = html_escape::encode_text(valid_until),
    );

    (text_body, html_body)
}
