/*!
 * Registry of resource caches.
 *
 * The registry is constructed once by the host and passed to whatever
 * needs localizers. It creates one `ResourceCache` per resource key on
 * first use, hands out `StringLocalizer`s bound to those caches, and
 * offers the administrative reset and update operations.
 */

use log::{debug, info};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::app_config::{Config, LocalizationOptions};
use crate::culture::parse_culture;
use crate::database::Repository;
use crate::errors::LocalizationError;
use crate::localization::cache::ResourceCache;
use crate::localization::localizer::{FallbackPolicy, LocalizedString, StringLocalizer};
use crate::localization::provisioning::AutoProvisioningGate;
use crate::localization::resource::{
    CacheKeyMode, Localizable, ResourceSource, location_resource_key,
};
use crate::localization::store::RecordStore;

/// Process-wide directory of resource caches
#[derive(Clone)]
pub struct CacheRegistry {
    /// Backing record store
    pub(crate) store: Arc<dyn RecordStore>,

    /// Caches by resource key
    caches: Arc<RwLock<HashMap<String, Arc<ResourceCache>>>>,

    /// Bumped by every reset before it reads the store
    reset_generation: Arc<AtomicU64>,

    /// Shared provisioning gate
    gate: AutoProvisioningGate,

    /// Localizer behaviour, fixed at construction
    options: Arc<LocalizationOptions>,

    /// Culture used when no ambient culture is set
    default_culture: Arc<str>,
}

impl CacheRegistry {
    /// Create a registry over `store` using a validated configuration
    pub fn new(store: Arc<dyn RecordStore>, config: &Config) -> Result<Self, LocalizationError> {
        config
            .validate()
            .map_err(|e| LocalizationError::Config(format!("{:#}", e)))?;

        let supported = config
            .supported_cultures()
            .map_err(|e| LocalizationError::InvalidCulture(format!("{:#}", e)))?;

        let default_culture = parse_culture(&config.request_localization.default_culture)
            .map_err(|e| LocalizationError::InvalidCulture(format!("{:#}", e)))?;

        let gate = AutoProvisioningGate::new(
            store.clone(),
            Arc::new(supported),
            config.localization.append_culture_to_new_record_text,
        );

        info!(
            "Localization registry ready (mode: {}, default culture: {})",
            config.localization.cache_key_mode(),
            default_culture
        );

        Ok(Self {
            store,
            caches: Arc::new(RwLock::new(HashMap::new())),
            reset_generation: Arc::new(AtomicU64::new(0)),
            gate,
            options: Arc::new(config.localization.clone()),
            default_culture: Arc::from(default_culture),
        })
    }

    /// Create a registry backed by the SQLite database of `config`
    pub fn open(config: &Config) -> Result<Self, LocalizationError> {
        let repository = Repository::from_config(&config.database)?;
        Self::new(Arc::new(repository), config)
    }

    /// The resource identification mode in effect
    pub fn cache_key_mode(&self) -> CacheKeyMode {
        self.options.cache_key_mode()
    }

    /// Resource key of `source` under the configured mode
    pub fn resource_key_for(&self, source: &ResourceSource) -> String {
        self.cache_key_mode().resource_key(source)
    }

    /// Policy applied by localizers created for typed resources
    pub fn fallback_policy(&self) -> FallbackPolicy {
        FallbackPolicy {
            auto_create: self
                .options
                .create_new_record_when_localised_string_does_not_exist,
            return_key_on_not_found: self.options.return_only_key_if_not_found,
        }
    }

    // =========================================================================
    // Cache directory
    // =========================================================================

    /// Get the cache for a resource, loading it from the store on first use
    ///
    /// The store is read outside the directory lock; if two callers race,
    /// the first published cache wins and the other load is discarded. A
    /// load that overlaps a reset is repeated, since the reset could not
    /// see the unpublished cache.
    pub fn get_or_create(&self, resource_key: &str) -> Result<Arc<ResourceCache>, LocalizationError> {
        if let Some(cache) = self.caches.read().get(resource_key) {
            return Ok(cache.clone());
        }

        loop {
            let generation = self.reset_generation.load(Ordering::SeqCst);
            let entries = self.store.load_all_for_resource(resource_key)?;

            let mut caches = self.caches.write();
            if let Some(cache) = caches.get(resource_key) {
                return Ok(cache.clone());
            }

            if self.reset_generation.load(Ordering::SeqCst) != generation {
                debug!("Reset overlapped load of resource '{}', reloading", resource_key);
                continue;
            }

            let cache = Arc::new(ResourceCache::new(resource_key, entries));
            caches.insert(resource_key.to_string(), cache.clone());
            info!("Created cache for resource '{}' ({} entries)", resource_key, cache.len());

            return Ok(cache);
        }
    }

    /// The cache of a resource if it was already created
    pub fn cache(&self, resource_key: &str) -> Option<Arc<ResourceCache>> {
        self.caches.read().get(resource_key).cloned()
    }

    /// Keys of all resources with a cache, sorted
    pub fn registered_resources(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.caches.read().keys().cloned().collect();
        keys.sort();
        keys
    }

    // =========================================================================
    // Localizers
    // =========================================================================

    /// Localizer for a typed resource
    pub fn create(&self, source: &ResourceSource) -> Result<StringLocalizer, LocalizationError> {
        let resource_key = self.resource_key_for(source);
        self.localizer(&resource_key, self.fallback_policy())
    }

    /// Localizer for a type that declares its resource name
    pub fn create_for<T: Localizable>(&self) -> Result<StringLocalizer, LocalizationError> {
        self.create(&T::resource_source())
    }

    /// Localizer for a shared or view resource addressed by base name and location
    ///
    /// These localizers never provision records and never fall back to the bare key.
    pub fn create_for_location(
        &self,
        base_name: &str,
        location: &str,
    ) -> Result<StringLocalizer, LocalizationError> {
        let resource_key = location_resource_key(base_name, location);
        self.localizer(&resource_key, FallbackPolicy::default())
    }

    fn localizer(
        &self,
        resource_key: &str,
        policy: FallbackPolicy,
    ) -> Result<StringLocalizer, LocalizationError> {
        let cache = self.get_or_create(resource_key)?;
        Ok(StringLocalizer::new(
            cache,
            self.gate.clone(),
            policy,
            self.default_culture.clone(),
        ))
    }

    /// Resolve `key` in a resource using the ambient culture
    pub fn resolve(
        &self,
        key: &str,
        resource_key: &str,
    ) -> Result<LocalizedString, LocalizationError> {
        self.localizer(resource_key, self.fallback_policy())?.get(key)
    }

    /// Resolve `key` in a resource for exactly `culture`
    pub fn resolve_with_culture(
        &self,
        key: &str,
        resource_key: &str,
        culture: &str,
    ) -> Result<LocalizedString, LocalizationError> {
        self.localizer(resource_key, self.fallback_policy())?
            .get_with_culture(key, culture)
    }

    // =========================================================================
    // Invalidation
    // =========================================================================

    /// Reload every registered cache from the store
    ///
    /// All resources are read before any cache is replaced, so a store
    /// failure leaves every cache as it was.
    pub fn reset_all(&self) -> Result<(), LocalizationError> {
        self.reset_generation.fetch_add(1, Ordering::SeqCst);
        self.store.detach_all_tracked_entities()?;

        let registered: Vec<(String, Arc<ResourceCache>)> = self
            .caches
            .read()
            .iter()
            .map(|(key, cache)| (key.clone(), cache.clone()))
            .collect();

        let mut reloaded = Vec::with_capacity(registered.len());
        for (key, cache) in registered {
            let entries = self.store.load_all_for_resource(&key)?;
            reloaded.push((cache, entries));
        }

        let count = reloaded.len();
        for (cache, entries) in reloaded {
            cache.reload(entries);
        }

        info!("Reloaded {} resource caches", count);
        Ok(())
    }

    /// Reload one cache; returns false if the resource has no cache
    pub fn reset_one(&self, resource_key: &str) -> Result<bool, LocalizationError> {
        self.reset_generation.fetch_add(1, Ordering::SeqCst);
        self.store.detach_all_tracked_entities()?;

        let Some(cache) = self.cache(resource_key) else {
            debug!("Reset skipped, resource '{}' has no cache", resource_key);
            return Ok(false);
        };

        let entries = self.store.load_all_for_resource(resource_key)?;
        cache.reload(entries);

        info!("Reloaded cache for resource '{}'", resource_key);
        Ok(true)
    }

    /// Reload the cache of a typed resource
    pub fn reset_for(&self, source: &ResourceSource) -> Result<bool, LocalizationError> {
        self.reset_one(&self.resource_key_for(source))
    }

    /// Push an external edit into a cache without growing it
    ///
    /// Returns whether a cached entry was updated.
    pub fn update_cache(&self, resource_key: &str, culture: &str, key: &str, text: &str) -> bool {
        match self.cache(resource_key) {
            Some(cache) => cache.update_existing(key, culture, text),
            None => false,
        }
    }
}

impl std::fmt::Debug for CacheRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheRegistry")
            .field("mode", &self.cache_key_mode())
            .field("resources", &self.registered_resources())
            .finish()
    }
}
