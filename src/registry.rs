//! Format registry: maps a format identifier to its adapter.
//!
//! [`FormatRegistry`] is a plain value that callers can build and extend
//! themselves. The free functions [`register_format`], [`resolve`] and
//! [`resolve_path`] work on a process-wide default registry that starts out
//! holding the built-in adapters enabled by feature flags.
//!
//! Identifiers are matched case-insensitively after trimming whitespace.

use crate::adapter::FormatAdapter;
use crate::error::{DataIoError, Result};
use crate::io::compression::strip_codec_extension;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

/// Adapters keyed by format id.
#[derive(Clone)]
pub struct FormatRegistry {
    adapters: HashMap<String, Arc<dyn FormatAdapter>>,
}

impl FormatRegistry {
    /// Create a registry with every built-in adapter registered.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        #[cfg(feature = "io-csv")]
        registry.register(Arc::new(crate::io::csv::CsvFormat));
        #[cfg(feature = "io-json")]
        registry.register(Arc::new(crate::io::json::JsonFormat));
        #[cfg(feature = "io-jsonl")]
        registry.register(Arc::new(crate::io::jsonl::JsonlFormat));
        registry
    }

    /// Create a registry with nothing registered.
    pub fn empty() -> Self {
        Self {
            adapters: HashMap::new(),
        }
    }

    /// Register `adapter` under its id, returning the adapter it replaced.
    pub fn register(&mut self, adapter: Arc<dyn FormatAdapter>) -> Option<Arc<dyn FormatAdapter>> {
        let id = normalize(adapter.id());
        let previous = self.adapters.insert(id.clone(), adapter);
        if previous.is_some() {
            log::warn!("format '{id}' was already registered; replacing it");
        } else {
            log::debug!("registered format '{id}'");
        }
        previous
    }

    /// Look up the adapter for `format_type`.
    ///
    /// # Errors
    /// [`DataIoError::UnsupportedFormat`] if nothing is registered under it.
    pub fn resolve(&self, format_type: &str) -> Result<Arc<dyn FormatAdapter>> {
        let id = normalize(format_type);
        self.adapters
            .get(&id)
            .cloned()
            .ok_or_else(|| DataIoError::unsupported_format(format_type.trim()))
    }

    /// Pick an adapter from the extension of `path`.
    ///
    /// A trailing compression extension is ignored, so `events.jsonl.zst`
    /// selects the JSONL adapter. The longest matching extension wins; between
    /// adapters claiming the same extension, the smallest id wins.
    ///
    /// # Errors
    /// [`DataIoError::UnsupportedFormat`] naming the extension if no adapter
    /// claims it.
    pub fn resolve_path(&self, path: impl AsRef<Path>) -> Result<Arc<dyn FormatAdapter>> {
        let name = strip_codec_extension(&path);
        self.adapters
            .values()
            .filter_map(|adapter| {
                adapter
                    .extensions()
                    .iter()
                    .filter(|ext| name.ends_with(&ext.to_lowercase()))
                    .map(|ext| ext.len())
                    .max()
                    .map(|len| (len, adapter))
            })
            // Equal lengths fall back to the smallest id.
            .max_by(|(la, a), (lb, b)| la.cmp(lb).then_with(|| b.id().cmp(a.id())))
            .map(|(_, adapter)| Arc::clone(adapter))
            .ok_or_else(|| {
                let ext = Path::new(&name)
                    .extension()
                    .map(|e| format!(".{}", e.to_string_lossy()))
                    .unwrap_or_else(|| name.clone());
                DataIoError::unsupported_format(ext)
            })
    }

    /// Whether `format_type` has an adapter.
    pub fn contains(&self, format_type: &str) -> bool {
        self.adapters.contains_key(&normalize(format_type))
    }

    /// Registered ids, sorted.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.adapters.keys().cloned().collect();
        ids.sort();
        ids
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FormatRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatRegistry")
            .field("formats", &self.ids())
            .finish()
    }
}

pub(crate) fn normalize(format_type: &str) -> String {
    format_type.trim().to_ascii_lowercase()
}

static DEFAULT_REGISTRY: RwLock<Option<FormatRegistry>> = RwLock::new(None);

fn with_default<T>(f: impl FnOnce(&FormatRegistry) -> T) -> T {
    if let Some(registry) = DEFAULT_REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
    {
        return f(registry);
    }
    let mut lock = DEFAULT_REGISTRY
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    f(lock.get_or_insert_with(FormatRegistry::new))
}

/// Register `adapter` in the process-wide registry.
///
/// Later calls to [`resolve`], [`load_data`](crate::load_data) and
/// [`DataStore::new`](crate::DataStore::new) see it. Registering an id that
/// already exists replaces the previous adapter.
pub fn register_format(adapter: Arc<dyn FormatAdapter>) -> Option<Arc<dyn FormatAdapter>> {
    let mut lock = DEFAULT_REGISTRY
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    lock.get_or_insert_with(FormatRegistry::new).register(adapter)
}

/// Resolve `format_type` against the process-wide registry.
///
/// # Errors
/// See [`FormatRegistry::resolve`].
pub fn resolve(format_type: &str) -> Result<Arc<dyn FormatAdapter>> {
    with_default(|r| r.resolve(format_type))
}

/// Resolve an adapter by file extension against the process-wide registry.
///
/// # Errors
/// See [`FormatRegistry::resolve_path`].
pub fn resolve_path(path: impl AsRef<Path>) -> Result<Arc<dyn FormatAdapter>> {
    with_default(|r| r.resolve_path(path))
}

/// Ids known to the process-wide registry, sorted.
pub fn registered_formats() -> Vec<String> {
    with_default(FormatRegistry::ids)
}

/// A copy of the process-wide registry as it stands now.
pub fn default_registry() -> FormatRegistry {
    with_default(FormatRegistry::clone)
}
