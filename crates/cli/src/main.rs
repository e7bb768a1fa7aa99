use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use hearth_db::config::redact;
use hearth_db::{initialize, Database, FirebaseConfig, LocalConnector};
use hearth_kernel::settings::Settings;
use serde_json::json;

/// Exit status for `check --require` when no handle could be built.
const EXIT_UNAVAILABLE: u8 = 2;

#[derive(Debug, Parser)]
#[command(name = "hearth", about = "Inspect Hearth's Firebase configuration")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the initializer and report whether a Firestore handle is available
    Check {
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
        /// Exit with status 2 when the handle is unavailable
        #[arg(long)]
        require: bool,
    },
    /// Print the effective Firebase configuration with secrets redacted
    Config,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load Hearth settings")?;
    hearth_telemetry::init(&settings.telemetry);

    match cli.command {
        Command::Check { json, require } => {
            let db = initialize(&settings.firebase, &LocalConnector::new());
            if json {
                println!("{}", check_json(&db));
            } else {
                println!("{}", check_line(&db));
            }

            if require && !db.is_ready() {
                return Ok(ExitCode::from(EXIT_UNAVAILABLE));
            }
        }
        Command::Config => {
            println!(
                "{}",
                serde_json::to_string_pretty(&config_json(&settings.firebase))
                    .with_context(|| "failed to render configuration")?
            );
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn check_line(db: &Database) -> String {
    match db {
        Database::Ready(handle) => format!(
            "ready project={} url={}",
            handle.project_id(),
            handle.documents_url()
        ),
        Database::Unavailable(reason) => format!("unavailable reason=\"{reason}\""),
    }
}

fn check_json(db: &Database) -> serde_json::Value {
    match db {
        Database::Ready(handle) => json!({
            "status": "ready",
            "project_id": handle.project_id(),
            "database_id": handle.database_id(),
            "documents_url": handle.documents_url(),
            "emulated": handle.is_emulated(),
        }),
        Database::Unavailable(reason) => json!({
            "status": "unavailable",
            "reason": reason.to_string(),
        }),
    }
}

fn config_json(config: &FirebaseConfig) -> serde_json::Value {
    json!({
        "api_key": config.api_key.as_deref().map(redact),
        "auth_domain": config.auth_domain,
        "project_id": config.project_id,
        "storage_bucket": config.storage_bucket,
        "messaging_sender_id": config.messaging_sender_id,
        "app_id": config.app_id,
        "emulator_host": config.emulator_host,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use hearth_db::config::{API_KEY_VAR, PROJECT_ID_VAR};
    use hearth_db::{initialize_from_env, MapEnv};

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn check_line_for_ready_handle() {
        let db = initialize_from_env(
            &MapEnv::new()
                .with(API_KEY_VAR, "AIzaSyExampleKey0123456789")
                .with(PROJECT_ID_VAR, "demo-app"),
        );
        assert_eq!(
            check_line(&db),
            "ready project=demo-app url=https://firestore.googleapis.com/v1/projects/demo-app/databases/(default)/documents"
        );
    }

    #[test]
    fn check_json_for_missing_key() {
        let db = initialize_from_env(&MapEnv::new());
        let value = check_json(&db);
        assert_eq!(value["status"], "unavailable");
        assert_eq!(value["reason"], "missing FIREBASE_API_KEY");
    }

    #[test]
    fn config_json_redacts_key() {
        let config = FirebaseConfig {
            api_key: Some("AIzaSyExampleKey0123456789".into()),
            ..Default::default()
        };
        let value = config_json(&config);
        assert_eq!(value["api_key"], "****6789");
        assert!(value["project_id"].is_null());
    }
}
