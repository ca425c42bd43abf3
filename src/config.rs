//! Static resolver configuration.
//!
//! Mirrors the overlayable resources a ROM ships. Every key is optional and
//! an absent or empty value disables the matching feature.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::identity::ProfileSet;

/// How the Dolby partner rule compares the caller package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DolbyMatch {
    /// Package must equal the UI package and the service package at once.
    /// No caller can satisfy this, so the rule never fires.
    #[default]
    Literal,
    /// Package equals either the UI package or the service package
    Either,
}

pub const DEFAULT_FEATURE_BLOCKLIST: &[&str] = &[
    "PIXEL_2017_PRELOAD",
    "PIXEL_2018_PRELOAD",
    "PIXEL_2019_MIDYEAR_PRELOAD",
    "PIXEL_2019_PRELOAD",
    "PIXEL_2020_EXPERIENCE",
    "PIXEL_2020_MIDYEAR_EXPERIENCE",
    "PIXEL_2021_EXPERIENCE",
    "PIXEL_2021_MIDYEAR_EXPERIENCE",
];

/// Stack markers identifying an attestation library in the call stack
pub const DEFAULT_ATTESTATION_MARKERS: &[&str] = &["DroidGuard"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticConfig {
    /// Fingerprint reported to the GMS background process
    pub certified_fingerprint: String,
    /// Fingerprint reported to the AR runtime
    pub stock_fingerprint: String,
    pub spoof_google_apps: bool,
    /// Model reported to Netflix
    pub netflix_model: String,
    pub dolby_atmos_spoof: bool,
    pub dolby_match: DolbyMatch,
    pub feature_blocklist: Vec<String>,
    pub attestation_markers: Vec<String>,
    pub profiles: ProfileSet,
}

impl Default for StaticConfig {
    fn default() -> Self {
        Self {
            certified_fingerprint: String::new(),
            stock_fingerprint: String::new(),
            spoof_google_apps: false,
            netflix_model: String::new(),
            dolby_atmos_spoof: false,
            dolby_match: DolbyMatch::default(),
            feature_blocklist: DEFAULT_FEATURE_BLOCKLIST
                .iter()
                .map(|s| s.to_string())
                .collect(),
            attestation_markers: DEFAULT_ATTESTATION_MARKERS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            profiles: ProfileSet::default(),
        }
    }
}

impl StaticConfig {
    /// Parse a JSON configuration document
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a JSON configuration document, falling back to defaults
    pub fn from_json_or_default(json: &str) -> Self {
        Self::from_json(json).unwrap_or_else(|e| {
            log::warn!("{}; using default configuration", e);
            Self::default()
        })
    }

    pub fn has_certified_fingerprint(&self) -> bool {
        !self.certified_fingerprint.is_empty()
    }

    pub fn has_stock_fingerprint(&self) -> bool {
        !self.stock_fingerprint.is_empty()
    }

    pub fn has_netflix_model(&self) -> bool {
        !self.netflix_model.is_empty()
    }

    /// Whether `feature` contains any blocklisted substring
    pub fn is_blocklisted_feature(&self, feature: &str) -> bool {
        self.feature_blocklist
            .iter()
            .any(|entry| !entry.is_empty() && feature.contains(entry.as_str()))
    }

    /// Whether a stack component belongs to an attestation library
    pub fn is_attestation_component(&self, component: &str) -> bool {
        self.attestation_markers
            .iter()
            .any(|marker| !marker.is_empty() && component.contains(marker.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SpoofError;

    #[test]
    fn test_default_disables_everything() {
        let config = StaticConfig::default();
        assert!(!config.has_certified_fingerprint());
        assert!(!config.has_stock_fingerprint());
        assert!(!config.has_netflix_model());
        assert!(!config.spoof_google_apps);
        assert!(!config.dolby_atmos_spoof);
        assert_eq!(config.dolby_match, DolbyMatch::Literal);
        assert_eq!(config.feature_blocklist.len(), 8);
    }

    #[test]
    fn test_partial_json() {
        let config = StaticConfig::from_json(
            r#"{"spoof_google_apps": true, "netflix_model": "Pixel 7", "dolby_match": "either"}"#,
        )
        .unwrap();
        assert!(config.spoof_google_apps);
        assert_eq!(config.netflix_model, "Pixel 7");
        assert_eq!(config.dolby_match, DolbyMatch::Either);
        assert_eq!(config.attestation_markers, vec!["DroidGuard".to_string()]);
    }

    #[test]
    fn test_malformed_json() {
        let err = StaticConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, SpoofError::InvalidConfig(_)));

        let config = StaticConfig::from_json_or_default(r#"{"spoof_google_apps": "yes"}"#);
        assert_eq!(config, StaticConfig::default());
    }

    #[test]
    fn test_blocklist_matches_substrings() {
        let config = StaticConfig::default();
        assert!(config.is_blocklisted_feature("com.google.android.feature.PIXEL_2019_PRELOAD"));
        assert!(config.is_blocklisted_feature("PIXEL_2021_EXPERIENCE"));
        assert!(!config.is_blocklisted_feature("PIXEL_2022_EXPERIENCE"));
    }

    #[test]
    fn test_empty_entries_never_match() {
        let config = StaticConfig {
            feature_blocklist: vec![String::new()],
            attestation_markers: vec![String::new()],
            ..Default::default()
        };
        assert!(!config.is_blocklisted_feature("anything"));
        assert!(!config.is_attestation_component("anything"));
    }

    #[test]
    fn test_attestation_marker() {
        let config = StaticConfig::default();
        assert!(config.is_attestation_component("com.google.ccc.abuse.droidguard.DroidGuardChimeraService"));
        assert!(!config.is_attestation_component("com.example.bank.Login"));
    }
}
