//! Identity spoofing resolver
//!
//! Turns a caller identity and the static configuration into a
//! [`SpoofDecision`], and answers the two per-call hooks the host consults
//! later: certificate chain retrieval and system feature queries.
//!
//! ## Flow
//!
//! ```text
//! CallerIdentity + StaticConfig
//!   ↓  first matching rule (rules::RULES)
//! SpoofDecision
//!   ↓  apply_to()
//! IdentityOverrides (read through IdentityProvider)
//! ```

use serde::Serialize;

use crate::caller::{packages, CallerIdentity, StackFrame};
use crate::config::StaticConfig;
use crate::error::{Result, SpoofError};
use crate::identity::{
    Attribute, IdentityOverrides, IdentityProfile, IdentityProvider, KnownDevices,
};
use crate::rules::{self, Effect, Rule, RULES};

/// Value written for a single overridden attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum OverrideValue {
    Fixed(String),
    /// The host's own value followed by [`KnownDevices::MODEL_MARKER`]
    HostMarked,
}

/// The identity change selected by the matching rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Override {
    None,
    Profile(IdentityProfile),
    Fields(Vec<(Attribute, OverrideValue)>),
}

/// Outcome of resolving one caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpoofDecision {
    /// Name of the matching rule
    pub rule: Option<&'static str>,
    /// Written before the override, for every resolvable caller
    pub normalization: Vec<(Attribute, String)>,
    pub effect: Override,
    /// Caller is the GMS background process, so attestation may be vetoed
    pub gms_unstable: bool,
    /// Caller is the Play Store, so attestation is always vetoed
    pub play_store: bool,
    /// Blocklisted features are hidden from this caller
    pub filter_features: bool,
}

impl SpoofDecision {
    /// Decision for a caller that cannot be resolved
    pub fn none() -> Self {
        Self {
            rule: None,
            normalization: Vec::new(),
            effect: Override::None,
            gms_unstable: false,
            play_store: false,
            filter_features: false,
        }
    }

    pub fn is_none(&self) -> bool {
        self.normalization.is_empty() && self.effect == Override::None
    }

    /// Write this decision into `overrides`.
    ///
    /// Attributes missing from the host are logged and skipped. Returns the
    /// number of attributes written; applying twice leaves the same state.
    pub fn apply_to(&self, overrides: &mut IdentityOverrides) -> usize {
        let mut written = overrides.set_all(
            self.normalization
                .iter()
                .map(|(attr, value)| (*attr, value.as_str())),
        );

        match &self.effect {
            Override::None => {}
            Override::Profile(profile) => {
                written += overrides.set_all(profile.iter());
            }
            Override::Fields(fields) => {
                for (attr, value) in fields {
                    match Self::field_value(overrides, *attr, value) {
                        Ok(value) => match overrides.set(*attr, value) {
                            Ok(()) => written += 1,
                            Err(e) => log::warn!("{}", e),
                        },
                        Err(e) => log::warn!("{}", e),
                    }
                }
            }
        }
        written
    }

    fn field_value(
        overrides: &IdentityOverrides,
        attr: Attribute,
        value: &OverrideValue,
    ) -> Result<String> {
        match value {
            OverrideValue::Fixed(value) => Ok(value.clone()),
            // Marks the host value, never a previous override, so a second
            // application does not append the marker twice.
            OverrideValue::HostMarked => overrides
                .host()
                .get(attr)
                .map(|real| format!("{}{}", real, KnownDevices::MODEL_MARKER))
                .ok_or(SpoofError::MissingAttribute { attribute: attr }),
        }
    }
}

/// Resolve `caller` against the built-in rule chain
pub fn resolve_identity_spoof(caller: &CallerIdentity, config: &StaticConfig) -> SpoofDecision {
    resolve_with_rules(RULES, caller, config)
}

/// Resolve `caller` against an arbitrary rule chain
pub fn resolve_with_rules(
    rules: &[Rule],
    caller: &CallerIdentity,
    config: &StaticConfig,
) -> SpoofDecision {
    if !caller.is_resolvable() {
        log::debug!("Caller has no package or process, nothing to spoof");
        return SpoofDecision::none();
    }

    log::debug!("Spoofing build type to 'user' for {}", caller.package_name);
    let normalization = KnownDevices::USER_BUILD
        .iter()
        .map(|(attr, value)| (*attr, value.to_string()))
        .collect();

    let matched = rules::first_match(rules, caller, config);
    let effect = match matched {
        Some(rule) => {
            log::debug!("Rule {} matched {}", rule.name, caller.package_name);
            effect_for(rule.effect, config)
        }
        None => Override::None,
    };

    SpoofDecision {
        rule: matched.map(|rule| rule.name),
        normalization,
        effect,
        gms_unstable: caller.is_gms_unstable(),
        play_store: caller.is_play_store(),
        filter_features: matched.is_some_and(|rule| rule.filter_features),
    }
}

fn effect_for(effect: Effect, config: &StaticConfig) -> Override {
    match effect {
        Effect::CertifiedIdentity => Override::Fields(vec![
            (
                Attribute::Fingerprint,
                OverrideValue::Fixed(config.certified_fingerprint.clone()),
            ),
            (Attribute::Model, OverrideValue::HostMarked),
        ]),
        Effect::StockFingerprint => Override::Fields(vec![(
            Attribute::Fingerprint,
            OverrideValue::Fixed(config.stock_fingerprint.clone()),
        )]),
        Effect::NetflixModel => Override::Fields(vec![(
            Attribute::Model,
            OverrideValue::Fixed(config.netflix_model.clone()),
        )]),
        Effect::Profile(id) => Override::Profile(config.profiles.get(id).clone()),
    }
}

/// Whether certificate chain retrieval must fail for this call.
///
/// Unresolvable callers are never blocked. Inspects the live stack on every
/// call; the answer is never cached.
pub fn should_block_certificate_chain(
    caller: &CallerIdentity,
    config: &StaticConfig,
    call_stack: &[StackFrame],
) -> bool {
    caller.is_resolvable()
        && block_for(
            caller.is_gms_unstable(),
            caller.is_play_store(),
            config,
            call_stack,
        )
}

/// [`should_block_certificate_chain`] as the failure the host surfaces
pub fn check_certificate_chain(
    caller: &CallerIdentity,
    config: &StaticConfig,
    call_stack: &[StackFrame],
) -> Result<()> {
    let gms = caller.is_resolvable() && caller.is_gms_unstable();
    let finsky = caller.is_resolvable() && caller.is_play_store();
    check_for(gms, finsky, config, call_stack)
}

pub(crate) fn block_for(
    gms_unstable: bool,
    play_store: bool,
    config: &StaticConfig,
    call_stack: &[StackFrame],
) -> bool {
    let attestation_in_stack = || {
        call_stack
            .iter()
            .any(|frame| config.is_attestation_component(&frame.component))
    };
    (gms_unstable && attestation_in_stack()) || play_store
}

pub(crate) fn check_for(
    gms_unstable: bool,
    play_store: bool,
    config: &StaticConfig,
    call_stack: &[StackFrame],
) -> Result<()> {
    if block_for(gms_unstable, play_store, config, call_stack) {
        log::debug!(
            "Blocked key attestation gms={} finsky={}",
            gms_unstable,
            play_store
        );
        return Err(SpoofError::AttestationBlocked);
    }
    Ok(())
}

/// Answer a system feature query, hiding blocklisted features from Photos
pub fn filter_feature(
    caller: &CallerIdentity,
    config: &StaticConfig,
    feature: &str,
    host_answer: bool,
) -> bool {
    let is_photos = caller.is_resolvable()
        && config.spoof_google_apps
        && caller.is_package(packages::PHOTOS);
    filter_for(is_photos, config, feature, host_answer)
}

pub(crate) fn filter_for(
    filtering: bool,
    config: &StaticConfig,
    feature: &str,
    host_answer: bool,
) -> bool {
    if filtering && host_answer && config.is_blocklisted_feature(feature) {
        log::debug!("Blocked system feature {} for Google Photos", feature);
        return false;
    }
    host_answer
}
