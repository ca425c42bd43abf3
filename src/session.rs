//! Per-process spoofing session.
//!
//! Built once when the process starts and then handed to every component
//! that reads device identity, answers attestation requests, or serves
//! feature queries. Nothing here is global; the host owns the value.

use crate::caller::{CallerIdentity, StackFrame};
use crate::config::StaticConfig;
use crate::error::Result;
use crate::identity::{Attribute, HostIdentity, IdentityOverrides, IdentityProvider};
use crate::resolver::{self, SpoofDecision};
use crate::rules::{Rule, RULES};

pub struct ProcessIdentity {
    caller: CallerIdentity,
    config: StaticConfig,
    decision: SpoofDecision,
    identity: IdentityOverrides,
}

impl ProcessIdentity {
    /// Resolve `caller` and apply the decision over `host`
    pub fn initialize(caller: CallerIdentity, config: StaticConfig, host: HostIdentity) -> Self {
        Self::initialize_with_rules(RULES, caller, config, host)
    }

    pub fn initialize_with_rules(
        rules: &[Rule],
        caller: CallerIdentity,
        config: StaticConfig,
        host: HostIdentity,
    ) -> Self {
        let decision = resolver::resolve_with_rules(rules, &caller, &config);
        let mut identity = IdentityOverrides::new(host);
        let written = decision.apply_to(&mut identity);

        log::info!(
            "Identity resolved for {}: rule={} overrides={}",
            caller.package_name,
            decision.rule.unwrap_or("none"),
            written
        );

        Self {
            caller,
            config,
            decision,
            identity,
        }
    }

    pub fn caller(&self) -> &CallerIdentity {
        &self.caller
    }

    pub fn decision(&self) -> &SpoofDecision {
        &self.decision
    }

    /// The identity every reader in the process should consult
    pub fn identity(&self) -> &IdentityOverrides {
        &self.identity
    }

    /// Hook for certificate chain retrieval
    pub fn check_certificate_chain(&self, call_stack: &[StackFrame]) -> Result<()> {
        resolver::check_for(
            self.decision.gms_unstable,
            self.decision.play_store,
            &self.config,
            call_stack,
        )
    }

    /// Hook for system feature queries
    pub fn has_system_feature(&self, name: &str, default: bool) -> bool {
        resolver::filter_for(self.decision.filter_features, &self.config, name, default)
    }
}

impl IdentityProvider for ProcessIdentity {
    fn get(&self, attr: Attribute) -> Option<&str> {
        self.identity.get(attr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caller::packages;
    use crate::error::SpoofError;

    fn host() -> HostIdentity {
        HostIdentity::new()
            .with(Attribute::Brand, "lineage")
            .with(Attribute::Manufacturer, "OEM")
            .with(Attribute::Device, "dev")
            .with(Attribute::Product, "prod")
            .with(Attribute::Model, "Phone 1")
            .with(Attribute::Fingerprint, "oem/prod/dev:14/AP1A/1:userdebug/test-keys")
            .with(Attribute::Type, "userdebug")
            .with(Attribute::Tags, "test-keys")
    }

    fn gapps() -> StaticConfig {
        StaticConfig {
            spoof_google_apps: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_photos_session() {
        let session = ProcessIdentity::initialize(
            CallerIdentity::for_package(packages::PHOTOS),
            gapps(),
            host(),
        );
        assert_eq!(session.decision().rule, Some("photos-pixel-xl"));
        assert_eq!(session.model(), Some("Pixel XL"));
        assert_eq!(session.get(Attribute::Type), Some("user"));
        assert!(!session.has_system_feature("PIXEL_2020_EXPERIENCE", true));
        assert!(session.has_system_feature("android.software.webview", true));
        assert!(session.check_certificate_chain(&[]).is_ok());
    }

    #[test]
    fn test_unresolvable_session_keeps_host() {
        let session =
            ProcessIdentity::initialize(CallerIdentity::new("", None), gapps(), host());
        assert!(session.identity().is_empty());
        assert_eq!(session.get(Attribute::Tags), Some("test-keys"));
    }

    #[test]
    fn test_unresolvable_play_store_session_allows_attestation() {
        let caller = CallerIdentity::new(packages::FINSKY, None);
        let session = ProcessIdentity::initialize(caller.clone(), gapps(), host());
        assert!(session.decision().is_none());
        assert!(session.check_certificate_chain(&[]).is_ok());
        assert!(!resolver::should_block_certificate_chain(&caller, &gapps(), &[]));
    }

    #[test]
    fn test_unresolvable_photos_session_matches_free_function() {
        let caller = CallerIdentity::new(packages::PHOTOS, None);
        let session = ProcessIdentity::initialize(caller.clone(), gapps(), host());
        let feature = "PIXEL_2019_PRELOAD";
        assert_eq!(
            session.has_system_feature(feature, true),
            resolver::filter_feature(&caller, &gapps(), feature, true)
        );
        assert!(session.has_system_feature(feature, true));
    }

    #[test]
    fn test_play_store_session_blocks_attestation() {
        let session = ProcessIdentity::initialize(
            CallerIdentity::for_package(packages::FINSKY),
            gapps(),
            host(),
        );
        assert_eq!(
            session.check_certificate_chain(&[StackFrame::new("com.android.vending.Foo")]),
            Err(SpoofError::AttestationBlocked)
        );
        assert_eq!(session.model(), Some("Phone 1"));
    }
}
