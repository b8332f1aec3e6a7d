//! Shared handler state

use std::sync::Arc;

use shopfront_app::context::AppContext;

/// Where the services keep their data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StorageBackend {
    Postgres,

    /// Process-local; everything is lost on restart.
    Memory,
}

impl StorageBackend {
    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::Memory => "memory",
        }
    }
}

#[derive(Clone)]
pub(crate) struct State {
    pub(crate) app: AppContext,
    pub(crate) storage: StorageBackend,
}

impl State {
    pub(crate) fn new(app: AppContext, storage: StorageBackend) -> Arc<Self> {
        Arc::new(Self { app, storage })
    }
}
