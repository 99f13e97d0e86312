/*!
 * Lookup resolution under the different fallback policies
 */

use anyhow::Result;

use sql_localizer::app_config::LocalizationOptions;
use sql_localizer::localization::RecordStore;
use sql_localizer::{CultureScope, LocalizationRecord, ResourceSource, UnsupportedOperation};
use crate::common;

fn about() -> ResourceSource {
    ResourceSource::new("MyApp.Controllers.AboutController")
}

/// Test the placeholder returned when nothing else applies
#[test]
fn test_get_withoutRecordAndDefaultPolicy_shouldReturnPlaceholder() -> Result<()> {
    let (registry, repo) = common::create_registry(LocalizationOptions::default());
    let localizer = registry.create(&about())?;

    let result = localizer.get_with_culture("AboutTitleNon", "de-CH")?;

    assert_eq!(result.value, "AboutController.AboutTitleNon.de-CH");
    assert_eq!(result.name, "AboutTitleNon");
    assert!(result.resource_not_found);
    assert!(repo.query_all("check")?.is_empty());
    Ok(())
}

/// Test returning the bare key on a miss
#[test]
fn test_get_withReturnOnlyKey_shouldReturnKey() -> Result<()> {
    let (registry, repo) =
        common::create_registry(LocalizationOptions::use_settings(false, false, true, false));
    let localizer = registry.create(&about())?;

    let result = localizer.get_with_culture("AboutTitleNon", "de-CH")?;

    assert_eq!(result.value, "AboutTitleNon");
    assert!(!result.succeeded());
    assert!(!repo.exists("AboutTitleNon", "de-CH", "AboutController")?);
    Ok(())
}

/// Test that a miss creates exactly one record and later lookups hit the cache
#[test]
fn test_get_withAutoCreate_shouldProvisionOnce() -> Result<()> {
    let (registry, repo) =
        common::create_registry(LocalizationOptions::use_settings(false, false, false, true));
    let localizer = registry.create(&about())?;

    let first = localizer.get_with_culture("AboutTitleNon", "de-CH")?;
    assert_eq!(first.value, "AboutTitleNon.de-CH");
    assert!(first.resource_not_found);

    let second = localizer.get_with_culture("AboutTitleNon", "de-CH")?;
    assert_eq!(second.value, "AboutTitleNon.de-CH");
    assert!(second.succeeded());

    let records = repo.query_all("check")?;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].resource_key, "AboutController");
    assert_eq!(records[0].localization_culture, "de-CH");
    assert_eq!(records[0].text.as_deref(), Some("AboutTitleNon.de-CH"));
    assert_eq!(localizer.cache().stats().hits, 1);
    Ok(())
}

/// Test provisioning text without the culture suffix
#[test]
fn test_get_withAutoCreateAndNoCultureSuffix_shouldUseKeyAsText() -> Result<()> {
    let mut options = LocalizationOptions::use_settings(false, false, false, true);
    options.append_culture_to_new_record_text = false;
    let (registry, repo) = common::create_registry(options);

    let result = registry.create(&about())?.get_with_culture("AboutTitleNon", "fr-CH")?;

    assert_eq!(result.value, "AboutTitleNon");
    assert_eq!(
        repo.find_text("AboutTitleNon", "fr-CH", "AboutController")?,
        Some(Some("AboutTitleNon".to_string()))
    );
    Ok(())
}

/// Test that spellings of one culture share a single record and cache entry
#[test]
fn test_get_withAutoCreateAndAlternateCultureSpellings_shouldCreateOneRecord() -> Result<()> {
    let (registry, repo) =
        common::create_registry(LocalizationOptions::use_settings(false, false, false, true));
    let localizer = registry.create(&about())?;

    let lower = localizer.get_with_culture("Title", "de-ch")?;
    let canonical = localizer.get_with_culture("Title", "de-CH")?;
    let underscore = localizer.get_with_culture("Title", "de_CH")?;

    assert_eq!(lower.value, "Title.de-CH");
    assert!(lower.resource_not_found);
    assert_eq!(canonical.value, "Title.de-CH");
    assert!(canonical.succeeded());
    assert_eq!(underscore.value, "Title.de-CH");
    assert!(underscore.succeeded());

    let records = repo.query_all("check")?;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].localization_culture, "de-CH");
    Ok(())
}

/// Test that seeded records are found under any spelling of their culture
#[test]
fn test_get_withLowercaseCulture_shouldHitCanonicalRecord() -> Result<()> {
    let (registry, repo) = common::create_registry(LocalizationOptions::default());
    common::seed(&repo, &[("AboutTitle", "fr-CH", "AboutController", "À propos")]);

    let result = registry.create(&about())?.get_with_culture("AboutTitle", "fr-ch")?;

    assert_eq!(result.value, "À propos");
    assert!(result.succeeded());
    Ok(())
}

/// Test formatting in an explicit culture
#[test]
fn test_getFormattedWithCulture_shouldIgnoreAmbientCulture() -> Result<()> {
    let (registry, repo) = common::create_registry(LocalizationOptions::default());
    common::seed(
        &repo,
        &[
            ("Greeting", "de-CH", "AboutController", "Grüezi {0}"),
            ("Greeting", "fr-CH", "AboutController", "Bonjour {0}"),
        ],
    );
    let localizer = registry.create(&about())?;

    let _culture = CultureScope::enter("de-CH");
    let result = localizer.get_formatted_with_culture("Greeting", "fr-CH", &[&"Anna"])?;

    assert_eq!(result.value, "Bonjour Anna");
    assert!(result.succeeded());
    Ok(())
}

/// Test that unsupported cultures never create records
#[test]
fn test_get_withUnsupportedCulture_shouldFallBackWithoutRecord() -> Result<()> {
    let (registry, repo) =
        common::create_registry(LocalizationOptions::use_settings(false, false, false, true));
    let localizer = registry.create(&about())?;

    let unsupported = localizer.get_with_culture("AboutTitleNon", "es-ES")?;
    let malformed = localizer.get_with_culture("AboutTitleNon", "not a culture")?;

    assert_eq!(unsupported.value, "AboutController.AboutTitleNon.es-ES");
    assert!(unsupported.resource_not_found);
    assert_eq!(malformed.value, "AboutController.AboutTitleNon.not a culture");
    assert!(repo.query_all("check")?.is_empty());
    Ok(())
}

/// Test the key fallback after a declined provisioning
#[test]
fn test_get_withUnsupportedCultureAndReturnOnlyKey_shouldReturnKey() -> Result<()> {
    let (registry, repo) =
        common::create_registry(LocalizationOptions::use_settings(false, false, true, true));

    let result = registry.create(&about())?.get_with_culture("AboutTitleNon", "es-ES")?;

    assert_eq!(result.value, "AboutTitleNon");
    assert!(repo.query_all("check")?.is_empty());
    Ok(())
}

/// Test the placeholder in the global bucket
#[test]
fn test_get_withGlobalMode_shouldUseGlobalResource() -> Result<()> {
    let (registry, _repo) =
        common::create_registry(LocalizationOptions::use_settings(false, true, false, false));

    let localizer = registry.create(&about())?;
    let result = localizer.get_with_culture("AboutTitleNon", "de-CH")?;

    assert_eq!(localizer.resource_key(), "global");
    assert_eq!(result.value, "global.AboutTitleNon.de-CH");
    Ok(())
}

/// Test the placeholder with full type names
#[test]
fn test_get_withFullNameMode_shouldUseFullName() -> Result<()> {
    let (registry, _repo) =
        common::create_registry(LocalizationOptions::use_settings(true, false, false, false));

    let result = registry.create(&about())?.get_with_culture("AboutTitleNon", "de-CH")?;

    assert_eq!(result.value, "MyApp.Controllers.AboutController.AboutTitleNon.de-CH");
    Ok(())
}

/// Test that existing records are found in the exact culture only
#[test]
fn test_get_withSeededRecords_shouldMatchExactCulture() -> Result<()> {
    let (registry, repo) = common::create_registry(LocalizationOptions::default());
    common::seed(
        &repo,
        &[
            ("AboutTitle", "de-CH", "AboutController", "Über uns"),
            ("AboutTitle", "fr-CH", "AboutController", "À propos"),
            ("AboutTitle", "de-CH", "HomeController", "Startseite"),
        ],
    );
    let localizer = registry.create(&about())?;

    let german = localizer.get_with_culture("AboutTitle", "de-CH")?;
    let french = localizer.get_with_culture("AboutTitle", "fr-CH")?;
    let italian = localizer.get_with_culture("AboutTitle", "it-CH")?;

    assert_eq!(german.value, "Über uns");
    assert!(german.succeeded());
    assert_eq!(french.value, "À propos");
    assert_eq!(italian.value, "AboutController.AboutTitle.it-CH");
    assert!(!italian.succeeded());
    Ok(())
}

/// Test that `get` follows the ambient culture and falls back to the default one
#[test]
fn test_get_withCultureScope_shouldUseAmbientCulture() -> Result<()> {
    let (registry, repo) = common::create_registry(LocalizationOptions::default());
    common::seed(
        &repo,
        &[
            ("AboutTitle", "de-CH", "AboutController", "Über uns"),
            ("AboutTitle", "en-US", "AboutController", "About us"),
        ],
    );
    let localizer = registry.create(&about())?;

    {
        let _culture = CultureScope::enter("de-CH");
        assert_eq!(localizer.get("AboutTitle")?.value, "Über uns");
        assert_eq!(
            registry.resolve("AboutTitle", "AboutController")?.value,
            "Über uns"
        );
    }

    assert_eq!(localizer.get("AboutTitle")?.value, "About us");
    Ok(())
}

/// Test positional argument substitution
#[test]
fn test_getFormatted_shouldSubstituteArguments() -> Result<()> {
    let (registry, repo) = common::create_registry(LocalizationOptions::default());
    common::seed(
        &repo,
        &[("Greeting", "de-CH", "AboutController", "Grüezi {0}, du hast {1} Nachrichten")],
    );
    let localizer = registry.create(&about())?;

    let _culture = CultureScope::enter("de-CH");
    let user = "Anna";
    let result = localizer.get_formatted("Greeting", &[&user, &2])?;

    assert_eq!(result.value, "Grüezi Anna, du hast 2 Nachrichten");
    Ok(())
}

/// Test that records without text behave like missing translations
#[test]
fn test_get_withNullTextRecord_shouldNotCreateDuplicate() -> Result<()> {
    let (registry, repo) =
        common::create_registry(LocalizationOptions::use_settings(false, false, true, true));
    repo.insert(&LocalizationRecord::new("Pending", "de-CH", "AboutController", None))?;
    let localizer = registry.create(&about())?;

    let result = localizer.get_with_culture("Pending", "de-CH")?;

    assert_eq!(result.value, "Pending");
    assert!(result.resource_not_found);
    assert_eq!(repo.query_all("check")?.len(), 1);
    Ok(())
}

/// Test that location-based localizers never provision
#[test]
fn test_createForLocation_withAutoCreateConfigured_shouldNotProvision() -> Result<()> {
    let (registry, repo) =
        common::create_registry(LocalizationOptions::use_settings(false, false, true, true));
    let localizer = registry.create_for_location("SharedResource", "MyApp")?;

    let result = localizer.get_with_culture("Shared", "de-CH")?;

    assert_eq!(result.value, "SharedResourceMyApp.Shared.de-CH");
    assert!(repo.query_all("check")?.is_empty());
    Ok(())
}

/// Test the operations the database localizer does not offer
#[test]
fn test_unsupportedOperations_shouldReturnErrors() -> Result<()> {
    let (registry, _repo) = common::create_registry(LocalizationOptions::default());
    let localizer = registry.create(&about())?;

    assert_eq!(
        localizer.all_strings(true).unwrap_err(),
        UnsupportedOperation::AllStrings
    );
    assert_eq!(
        localizer.with_culture("de-CH").unwrap_err(),
        UnsupportedOperation::WithCulture
    );
    Ok(())
}
