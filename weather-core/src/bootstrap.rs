//! Startup loading of the optional formatting module.
//!
//! Loading runs on its own task and never blocks a search. Records check the
//! [`ModuleReadiness`] handle at construction time and must cope with it
//! still being pending.

use std::{
    fmt,
    future::Future,
    pin::Pin,
    sync::{Arc, OnceLock},
};

use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::{error::WeatherError, format::FormatModule};

pub type ModuleFuture =
    Pin<Box<dyn Future<Output = Result<Arc<dyn FormatModule>, WeatherError>> + Send>>;

/// Produces the pending module handle when invoked.
pub type ModuleFactory = Box<dyn FnOnce() -> ModuleFuture + Send>;

/// Shared readiness of the formatting module.
///
/// Starts pending and settles exactly once, either to a loaded module or to
/// "unavailable for this session".
#[derive(Clone, Default)]
pub struct ModuleReadiness {
    slot: Arc<OnceLock<Option<Arc<dyn FormatModule>>>>,
}

impl ModuleReadiness {
    pub fn pending() -> Self {
        Self::default()
    }

    pub fn ready(module: Arc<dyn FormatModule>) -> Self {
        let readiness = Self::default();
        readiness.settle(Some(module));
        readiness
    }

    pub fn unavailable() -> Self {
        let readiness = Self::default();
        readiness.settle(None);
        readiness
    }

    /// The loaded module, if loading has finished successfully.
    pub fn module(&self) -> Option<Arc<dyn FormatModule>> {
        self.slot.get().cloned().flatten()
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.slot.get(), Some(Some(_)))
    }

    pub fn is_settled(&self) -> bool {
        self.slot.get().is_some()
    }

    pub(crate) fn settle(&self, outcome: Option<Arc<dyn FormatModule>>) {
        if self.slot.set(outcome).is_err() {
            warn!("Formatting module readiness already settled; ignoring update");
        }
    }
}

impl fmt::Debug for ModuleReadiness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.slot.get() {
            None => "pending",
            Some(Some(_)) => "ready",
            Some(None) => "unavailable",
        };
        f.debug_struct("ModuleReadiness").field("state", &state).finish()
    }
}

/// A started bootstrap: the readiness handle plus the loading task, if any.
#[derive(Debug)]
pub struct Bootstrap {
    readiness: ModuleReadiness,
    task: Option<JoinHandle<()>>,
}

impl Bootstrap {
    pub fn readiness(&self) -> ModuleReadiness {
        self.readiness.clone()
    }

    /// Wait for the loading task to finish. The app itself never calls this.
    pub async fn finished(self) {
        if let Some(task) = self.task {
            if let Err(err) = task.await {
                error!(error = %err, "Formatting module loader task aborted");
            }
        }
    }
}

/// Start loading the formatting module.
///
/// Must be called from within a tokio runtime when a factory is given.
/// There is no retry: a failed load leaves the module unavailable.
pub fn bootstrap(factory: Option<ModuleFactory>) -> Bootstrap {
    let readiness = ModuleReadiness::pending();

    let Some(factory) = factory else {
        warn!("Formatting module factory not found; display strings use native formatting");
        readiness.settle(None);
        return Bootstrap { readiness, task: None };
    };

    let pending = factory();
    let handle = readiness.clone();
    let task = tokio::spawn(async move {
        match pending.await {
            Ok(module) => {
                info!(module = ?module, "Formatting module ready");
                handle.settle(Some(module));
            }
            Err(err) => {
                error!(error = %err, "Formatting module failed to load");
                handle.settle(None);
            }
        }
    });

    Bootstrap { readiness, task: Some(task) }
}
