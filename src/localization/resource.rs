/*!
 * Resource identification.
 *
 * Resources are named explicitly by the caller. The configured
 * `CacheKeyMode` decides which part of that name addresses a cache, and
 * must stay fixed for the lifetime of a registry.
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// Resource key of the single shared bucket
pub const GLOBAL_RESOURCE: &str = "global";

/// How a resource name maps to a cache in the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheKeyMode {
    /// Last segment of the name, e.g. `AboutController`
    #[default]
    ShortTypeName,
    /// The full name, e.g. `MyApp.Controllers.AboutController`
    FullTypeName,
    /// Everything shares the `global` resource
    Global,
}

impl CacheKeyMode {
    /// Resource key for a source under this mode
    pub fn resource_key(&self, source: &ResourceSource) -> String {
        match self {
            Self::ShortTypeName => source.short_name().to_string(),
            Self::FullTypeName => source.full_name().to_string(),
            Self::Global => GLOBAL_RESOURCE.to_string(),
        }
    }
}

impl fmt::Display for CacheKeyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShortTypeName => write!(f, "short_type_name"),
            Self::FullTypeName => write!(f, "full_type_name"),
            Self::Global => write!(f, "global"),
        }
    }
}

/// Explicit name of a localizable resource
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceSource {
    full_name: String,
}

impl ResourceSource {
    /// Create a source from its fully qualified name
    ///
    /// Segments may be separated by `.` or `::`.
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
        }
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// The last segment of the full name
    pub fn short_name(&self) -> &str {
        let after_path = self
            .full_name
            .rsplit("::")
            .next()
            .unwrap_or(self.full_name.as_str());

        after_path.rsplit('.').next().unwrap_or(after_path)
    }
}

impl fmt::Display for ResourceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name)
    }
}

/// Types that own a set of localized strings
///
/// ```
/// use sql_localizer::localization::resource::Localizable;
///
/// struct AboutController;
///
/// impl Localizable for AboutController {
///     const RESOURCE_NAME: &'static str = "MyApp.Controllers.AboutController";
/// }
///
/// assert_eq!(AboutController::resource_source().short_name(), "AboutController");
/// ```
pub trait Localizable {
    /// Fully qualified resource name
    const RESOURCE_NAME: &'static str;

    fn resource_source() -> ResourceSource {
        ResourceSource::new(Self::RESOURCE_NAME)
    }
}

/// Resource key for a `(base name, location)` pair of a shared or view resource
pub fn location_resource_key(base_name: &str, location: &str) -> String {
    format!("{}{}", base_name, location)
}
