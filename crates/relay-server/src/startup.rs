use anyhow::Context;
use bot_relay_api::{BotIdentity, WebhookRegistration};
use bot_relay_client::RelayClient;

/// Checks the token with `getMe`, then points the bot's webhook at us.
/// Either call failing aborts startup.
pub async fn register(
    relay: &RelayClient,
    registration: &WebhookRegistration,
) -> anyhow::Result<BotIdentity> {
    let identity = relay
        .get_me()
        .await
        .context("failed to fetch bot identity")?;
    tracing::info!(
        "🤖 bot @{} ({}) id: {}",
        identity.username,
        identity.first_name,
        identity.id
    );
    tracing::debug!("getMe -> {identity:?}");

    let registered = relay
        .set_webhook(registration)
        .await
        .with_context(|| format!("failed to register webhook: {}", registration.url))?;
    if registered {
        tracing::info!(
            "🔗 webhook registered: {} (max connections: {})",
            registration.url,
            registration.effective_max_connections()
        );
    } else {
        tracing::warn!("⚠️ bot API did not confirm webhook: {}", registration.url);
    }

    Ok(identity)
}
