//! Declarative spoofing rules.
//!
//! The rule chain is plain data evaluated top to bottom; the first rule whose
//! requirement and caller match both hold decides the outcome.

use crate::caller::{packages, CallerIdentity};
use crate::config::{DolbyMatch, StaticConfig};
use crate::identity::ProfileId;

/// Configuration that must be present for a rule to fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Always,
    CertifiedFingerprint,
    StockFingerprint,
    SpoofGoogleApps,
    NetflixModel,
    DolbyAtmos,
}

impl Requirement {
    pub fn holds(self, config: &StaticConfig) -> bool {
        match self {
            Requirement::Always => true,
            Requirement::CertifiedFingerprint => config.has_certified_fingerprint(),
            Requirement::StockFingerprint => config.has_stock_fingerprint(),
            Requirement::SpoofGoogleApps => config.spoof_google_apps,
            Requirement::NetflixModel => config.has_netflix_model(),
            Requirement::DolbyAtmos => config.dolby_atmos_spoof,
        }
    }
}

/// Which callers a rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallerMatch {
    /// The GMS package running in its background process
    GmsUnstable,
    Package(&'static str),
    AnyPackage(&'static [&'static str]),
    /// Package equal to every listed name. Unsatisfiable for two distinct names.
    AllPackages(&'static [&'static str]),
    /// `AllPackages` or `AnyPackage`, chosen by [`StaticConfig::dolby_match`]
    DolbyPackages(&'static [&'static str]),
}

impl CallerMatch {
    pub fn matches(self, caller: &CallerIdentity, config: &StaticConfig) -> bool {
        match self {
            CallerMatch::GmsUnstable => caller.is_gms_unstable(),
            CallerMatch::Package(package) => caller.is_package(package),
            CallerMatch::AnyPackage(list) => list.iter().any(|p| caller.is_package(p)),
            CallerMatch::AllPackages(list) => {
                !list.is_empty() && list.iter().all(|p| caller.is_package(p))
            }
            CallerMatch::DolbyPackages(list) => match config.dolby_match {
                DolbyMatch::Literal => CallerMatch::AllPackages(list).matches(caller, config),
                DolbyMatch::Either => CallerMatch::AnyPackage(list).matches(caller, config),
            },
        }
    }
}

/// What a matching rule overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Certified fingerprint plus the real model carrying the marker
    CertifiedIdentity,
    StockFingerprint,
    NetflixModel,
    Profile(ProfileId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub name: &'static str,
    pub requires: Requirement,
    pub caller: CallerMatch,
    pub effect: Effect,
    /// Hide blocklisted features from callers matched by this rule
    pub filter_features: bool,
}

impl Rule {
    pub fn matches(&self, caller: &CallerIdentity, config: &StaticConfig) -> bool {
        self.requires.holds(config) && self.caller.matches(caller, config)
    }
}

/// The rule chain, highest priority first.
pub const RULES: &[Rule] = &[
    Rule {
        name: "gms-certified",
        requires: Requirement::CertifiedFingerprint,
        caller: CallerMatch::GmsUnstable,
        effect: Effect::CertifiedIdentity,
        filter_features: false,
    },
    Rule {
        name: "arcore-stock",
        requires: Requirement::StockFingerprint,
        caller: CallerMatch::Package(packages::ARCORE),
        effect: Effect::StockFingerprint,
        filter_features: false,
    },
    Rule {
        name: "photos-pixel-xl",
        requires: Requirement::SpoofGoogleApps,
        caller: CallerMatch::Package(packages::PHOTOS),
        effect: Effect::Profile(ProfileId::PixelXl),
        filter_features: true,
    },
    Rule {
        name: "pixel-6-pro",
        requires: Requirement::SpoofGoogleApps,
        caller: CallerMatch::AnyPackage(&[packages::VELVET, packages::WALLPAPERS]),
        effect: Effect::Profile(ProfileId::Pixel6Pro),
        filter_features: false,
    },
    Rule {
        name: "netflix-model",
        requires: Requirement::NetflixModel,
        caller: CallerMatch::Package(packages::NETFLIX),
        effect: Effect::NetflixModel,
        filter_features: false,
    },
    Rule {
        name: "dolby-partner",
        requires: Requirement::DolbyAtmos,
        caller: CallerMatch::DolbyPackages(&[packages::DAX_UI, packages::DAX_SERVICE]),
        effect: Effect::Profile(ProfileId::DolbyPartner),
        filter_features: false,
    },
    Rule {
        name: "pixel-7-pro",
        requires: Requirement::SpoofGoogleApps,
        caller: CallerMatch::AnyPackage(&[
            packages::TURBO,
            packages::GBOARD,
            packages::SETUPWIZARD,
        ]),
        effect: Effect::Profile(ProfileId::Pixel7Pro),
        filter_features: false,
    },
];

/// First rule in `rules` that matches the caller
pub fn first_match<'r>(
    rules: &'r [Rule],
    caller: &CallerIdentity,
    config: &StaticConfig,
) -> Option<&'r Rule> {
    rules.iter().find(|rule| rule.matches(caller, config))
}
