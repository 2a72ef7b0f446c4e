use mongodb::options::{ClientOptions, Credential, ResolverConfig};
use mongodb::{Client, ClientSession, Collection, Database};
use tracing::info;

use crate::config::mongo_conf::MongoConfig;
use crate::repository::repository_error::{RepositoryError, RepositoryResult};

/// Shared MongoDB handle. All repositories draw their collections from one
/// client so multi-collection operations (lead conversion, quote approval)
/// can run inside a single session transaction.
pub struct MongoStore {
    client: Client,
    db: Database,
}

impl MongoStore {
    pub async fn connect(config: &MongoConfig) -> Result<Self, mongodb::error::Error> {
        let mut client_options =
            ClientOptions::parse_with_resolver_config(&config.uri, ResolverConfig::cloudflare())
                .await?;
        client_options.app_name = Some("AgencyCrmBackend".to_string());
        client_options.max_pool_size = Some(config.pool_size);
        client_options.connect_timeout =
            Some(std::time::Duration::from_secs(config.connection_timeout_secs));

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            client_options.credential = Some(
                Credential::builder()
                    .username(username.clone())
                    .password(password.clone())
                    .build(),
            );
        }

        let client = Client::with_options(client_options)?;
        let db = client.database(&config.database);
        info!(database = %config.database, "Connected to MongoDB");
        Ok(MongoStore { client, db })
    }

    pub fn collection<T>(&self, name: &str) -> Collection<T> {
        self.db.collection::<T>(name)
    }

    pub async fn session(&self) -> RepositoryResult<ClientSession> {
        self.client
            .start_session(None)
            .await
            .map_err(RepositoryError::from)
    }
}

/// Collection names, one place so transactional repositories agree with the
/// per-entity ones.
pub mod collections {
    pub const AGENCIES: &str = "agencies";
    pub const LEADS: &str = "leads";
    pub const CLIENTS: &str = "clients";
    pub const PRODUCTS: &str = "products";
    pub const QUOTES: &str = "quotes";
    pub const PROJECTS: &str = "projects";
    pub const TASKS: &str = "tasks";
    pub const DIGITAL_ASSETS: &str = "digital_assets";
    pub const CHAT_CONVERSATIONS: &str = "chat_conversations";
    pub const CHAT_MESSAGES: &str = "chat_messages";
}

pub(crate) fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Escapes a user-supplied search string for use inside a `$regex` filter so
/// it matches as a literal substring.
pub(crate) fn escape_regex(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if r"\.+*?()|[]{}^$".contains(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::escape_regex;

    #[test]
    fn escapes_regex_metacharacters() {
        assert_eq!(escape_regex("dana"), "dana");
        assert_eq!(escape_regex("a.b+c"), r"a\.b\+c");
        assert_eq!(escape_regex("x(y)[z]"), r"x\(y\)\[z\]");
    }
}
