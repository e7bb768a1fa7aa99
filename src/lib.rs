//! Hearth application library
//!
//! Builds the document store handle once and injects it into the registered
//! modules.

pub mod modules;

use hearth_db::{initialize, Database, DatabaseBinding, LocalConnector};
use hearth_kernel::settings::Settings;
use hearth_kernel::{InitCtx, ModuleRegistry};

/// Re-export commonly used types
pub use modules::*;

/// Initialize the database value into `binding`, at most once.
pub fn connect<'a>(settings: &Settings, binding: &'a DatabaseBinding) -> &'a Database {
    binding.get_or_initialize(|| initialize(&settings.firebase, &LocalConnector::new()))
}

/// Run module init and start with the injected database.
pub async fn start(
    registry: &ModuleRegistry,
    settings: &Settings,
    db: &Database,
) -> anyhow::Result<()> {
    let ctx = InitCtx { settings, db };
    registry.init_modules(&ctx).await?;
    registry.start_modules(&ctx).await?;
    Ok(())
}
