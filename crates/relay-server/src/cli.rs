use bot_relay_api::{InvalidMaxConnections, WebhookRegistration};
use bot_relay_client::DEFAULT_BASE_URL;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(version)]
pub struct Args {
    #[arg(long, short, env = "BOT_RELAY_URL", default_value = DEFAULT_BASE_URL)]
    /// Bot API base URL
    pub url: String,

    #[arg(long, short, env = "BOT_RELAY_TOKEN", hide_env_values = true)]
    /// Bot token e.g: 123456789:AAE...
    pub token: String,

    #[arg(long, short, env = "BOT_RELAY_WEBHOOK", default_value = "https://localhost:8443/bot")]
    /// Webhook URL the bot API pushes updates to (must be HTTPS)
    pub webhook: String,

    #[arg(long, short, env = "BOT_RELAY_LISTEN", default_value = "localhost:12345")]
    /// Address the relay listens on
    pub listen: String,

    #[arg(long)]
    /// Maximum simultaneous webhook connections, 1-100 (bot API default: 40)
    pub max_connections: Option<u32>,

    #[arg(long, value_delimiter = ',')]
    /// Update types to subscribe to e.g: message,callback_query
    pub allowed_updates: Vec<String>,

    #[arg(long)]
    /// Fixed IP address for webhook delivery instead of DNS resolution
    pub ip_address: Option<String>,

    #[arg(long)]
    /// Drop all pending updates when registering the webhook
    pub drop_pending_updates: bool,
}

impl Args {
    pub fn webhook_registration(&self) -> Result<WebhookRegistration, InvalidMaxConnections> {
        let mut registration = WebhookRegistration::new(&self.webhook)
            .allowed_updates(self.allowed_updates.iter().cloned())
            .drop_pending_updates(self.drop_pending_updates);
        if let Some(ip_address) = &self.ip_address {
            registration = registration.ip_address(ip_address);
        }
        if let Some(max) = self.max_connections {
            registration = registration.max_connections(max)?;
        }
        Ok(registration)
    }
}

pub fn args() -> Args {
    Args::parse()
}
