pub mod status;

use std::sync::Arc;

use hearth_kernel::ModuleRegistry;

/// Register all project-specific modules with the registry
pub fn register_all(registry: &mut ModuleRegistry) {
    registry.register(Arc::new(status::StatusModule::new()));
}
