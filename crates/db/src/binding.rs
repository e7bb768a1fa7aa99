//! Write-once holder for the [`Database`] value.

use once_cell::sync::OnceCell;

use crate::init::Database;

static GLOBAL: DatabaseBinding = DatabaseBinding::new();

/// Holds the result of initialization for the rest of the process.
///
/// The initializer passed to [`get_or_initialize`](Self::get_or_initialize)
/// runs at most once; every caller afterwards observes the same value.
#[derive(Debug, Default)]
pub struct DatabaseBinding {
    cell: OnceCell<Database>,
}

impl DatabaseBinding {
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    /// Process-wide binding for callers that cannot receive the value by
    /// injection.
    pub fn global() -> &'static DatabaseBinding {
        &GLOBAL
    }

    pub fn get_or_initialize<F>(&self, init: F) -> &Database
    where
        F: FnOnce() -> Database,
    {
        self.cell.get_or_init(init)
    }

    /// `None` until initialization has run.
    pub fn get(&self) -> Option<&Database> {
        self.cell.get()
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }
}
