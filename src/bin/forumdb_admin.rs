//! forumdb-admin: maintenance commands for a forum database.
//!
//! ## Usage
//! ```text
//! forumdb-admin <status|clear|migrate> [CONFIG_FILE]
//! ```
//!
//! - `status`: print user/forum/thread/post counts as JSON
//! - `clear`: delete all forum data
//! - `migrate`: connect and apply pending migrations only
//!
//! ## Configuration
//! - FORUMDB_CONFIG: path to a YAML config file (optional)
//! - FORUMDB__STORAGE__TYPE, FORUMDB__STORAGE__SQLITE__PATH, ...: overrides
//! - FORUMDB_LOG: tracing filter (default: info)

use tracing::info;

use forumdb::config::Config;
use forumdb::services::ForumService;
use forumdb::storage::init_storage;
use forumdb::utils::bootstrap::init_tracing;

const USAGE: &str = "usage: forumdb-admin <status|clear|migrate> [CONFIG_FILE]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Status,
    Clear,
    Migrate,
}

impl std::str::FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "status" => Ok(Command::Status),
            "clear" => Ok(Command::Clear),
            "migrate" => Ok(Command::Migrate),
            other => Err(format!("unknown command {:?}\n{}", other, USAGE)),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    init_tracing();

    let mut args = std::env::args().skip(1);
    // Parsed before any connection is opened.
    let command: Command = args.next().ok_or(USAGE)?.parse()?;
    let config_path = args.next();

    let config = Config::load(config_path.as_deref())?;
    let stores = init_storage(&config.storage).await?;
    let service = ForumService::new(stores);

    match command {
        Command::Status => {
            let status = service.status().await?;
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        Command::Clear => {
            service.clear().await?;
        }
        Command::Migrate => {
            info!(storage_type = %config.storage.storage_type, "Migrations applied");
        }
    }

    Ok(())
}
