//! The process-wide runtime context.
//!
//! # Concurrency
//!
//! - Writers (module loads, array interning) serialise on a mutex around the
//!   registry and build a complete new universe off to the side.
//! - The new universe is installed with one atomic pointer store. Readers
//!   load the current pointer without locking and keep their snapshot alive
//!   for as long as they hold it.
//! - No reader ever observes a partially built index.

use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwap;
use krt_types::{LoadError, ModuleTypes, TypeId, TypeRegistry, TypeUniverse};
use parking_lot::Mutex;

use crate::config::RuntimeConfig;
use crate::fatal::fatal;
use crate::query::TypeQueryEngine;
use crate::tracing_setup;

static GLOBAL: OnceLock<Runtime> = OnceLock::new();

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Late loading is disabled and the runtime has already published.
    #[error("cannot load module `{module}`: the type universe is sealed")]
    Sealed { module: String },

    #[error("a global runtime is already installed")]
    AlreadyInstalled,

    #[error("no global runtime is installed")]
    NotInstalled,
}

/// Owns the type registry and the currently published universe.
pub struct Runtime {
    config: RuntimeConfig,
    registry: Mutex<TypeRegistry>,
    universe: ArcSwap<TypeUniverse>,
}

impl Runtime {
    /// Load the startup modules and publish the first universe.
    ///
    /// Also installs the tracing subscriber if a log filter is configured.
    pub fn new(config: RuntimeConfig, modules: &[ModuleTypes]) -> Result<Self, RuntimeError> {
        tracing_setup::init(config.log_filter.as_deref());
        Self::start(config, modules)
    }

    #[tracing::instrument(level = "debug", skip_all, fields(modules = modules.len()))]
    fn start(config: RuntimeConfig, modules: &[ModuleTypes]) -> Result<Self, RuntimeError> {
        let mut registry = TypeRegistry::new();
        for module in modules {
            registry.load_module(module)?;
        }
        let universe = registry.publish(&config.hierarchy)?;
        tracing::debug!(types = universe.len(), "runtime ready");
        Ok(Self {
            config,
            registry: Mutex::new(registry),
            universe: ArcSwap::from_pointee(universe),
        })
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Load a module after startup and publish the grown universe.
    ///
    /// On error neither the registry nor the published universe changes.
    #[tracing::instrument(level = "debug", skip_all, fields(module = %module.module))]
    pub fn load_module(&self, module: &ModuleTypes) -> Result<Vec<TypeId>, RuntimeError> {
        self.ensure_open(&module.module)?;
        self.update(|registry| registry.load_module(module))
    }

    /// `load_module`, treating any failure as fatal.
    pub fn load_module_or_abort(&self, module: &ModuleTypes) -> Vec<TypeId> {
        match self.load_module(module) {
            Ok(ids) => ids,
            Err(err) => fatal(&format!("failed to load module `{}`", module.module), &err),
        }
    }

    /// The object-array type over `element`, interning and republishing if
    /// it does not exist yet.
    pub fn array_of(&self, element: TypeId) -> Result<TypeId, RuntimeError> {
        if let Some(array) = self.universe.load().array_of(element) {
            return Ok(array);
        }
        self.ensure_open(&format!("array of {element}"))?;
        self.update(|registry| registry.array_of(element))
    }

    /// The current universe. Stays valid after later loads publish.
    pub fn snapshot(&self) -> Arc<TypeUniverse> {
        self.universe.load_full()
    }

    /// Run `f` against the current universe without taking a reference
    /// count.
    pub fn queries<R>(&self, f: impl FnOnce(TypeQueryEngine<'_>) -> R) -> R {
        let universe = self.universe.load();
        f(TypeQueryEngine::new(&universe))
    }

    /// Make this the process-wide runtime used by the C entry points.
    pub fn install(self) -> Result<&'static Runtime, RuntimeError> {
        GLOBAL
            .set(self)
            .map_err(|_| RuntimeError::AlreadyInstalled)?;
        tracing::debug!("global runtime installed");
        Self::global()
    }

    pub fn global() -> Result<&'static Runtime, RuntimeError> {
        GLOBAL.get().ok_or(RuntimeError::NotInstalled)
    }

    fn ensure_open(&self, module: &str) -> Result<(), RuntimeError> {
        if self.config.allow_late_loading {
            return Ok(());
        }
        tracing::warn!(module, "late load rejected");
        Err(RuntimeError::Sealed {
            module: module.to_owned(),
        })
    }

    /// Apply `change` to the registry and publish the result. If either
    /// step fails the registry is rolled back and nothing is published.
    fn update<T>(
        &self,
        change: impl FnOnce(&mut TypeRegistry) -> Result<T, LoadError>,
    ) -> Result<T, RuntimeError> {
        let mut registry = self.registry.lock();
        let checkpoint = registry.checkpoint();
        let published = change(&mut *registry)
            .and_then(|value| Ok((value, registry.publish(&self.config.hierarchy)?)));
        match published {
            Ok((value, universe)) => {
                self.universe.store(Arc::new(universe));
                Ok(value)
            }
            Err(err) => {
                registry.rollback(checkpoint);
                Err(err.into())
            }
        }
    }
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let universe = self.universe.load();
        f.debug_struct("Runtime")
            .field("config", &self.config)
            .field("types", &universe.len())
            .field("revision", &universe.revision())
            .finish_non_exhaustive()
    }
}
