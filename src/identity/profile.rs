//! Named identity profiles and the built-in device catalog.
//!
//! Every profile here is applied as a whole; the resolver never merges
//! attributes from two profiles.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Attribute;

/// A named bundle of identity attribute values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityProfile {
    pub name: String,
    pub values: BTreeMap<Attribute, String>,
}

impl IdentityProfile {
    pub fn new(name: impl Into<String>, values: &[(Attribute, &str)]) -> Self {
        Self {
            name: name.into(),
            values: values
                .iter()
                .map(|(attr, value)| (*attr, value.to_string()))
                .collect(),
        }
    }

    pub fn get(&self, attr: Attribute) -> Option<&str> {
        self.values.get(&attr).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Attribute, &str)> {
        self.values.iter().map(|(attr, value)| (*attr, value.as_str()))
    }
}

/// Built-in device identities.
pub struct KnownDevices;

impl KnownDevices {
    pub const PIXEL_XL: &'static [(Attribute, &'static str)] = &[
        (Attribute::Brand, "google"),
        (Attribute::Manufacturer, "Google"),
        (Attribute::Device, "marlin"),
        (Attribute::Product, "marlin"),
        (Attribute::Model, "Pixel XL"),
        (
            Attribute::Fingerprint,
            "google/marlin/marlin:10/QP1A.191005.007.A3/5972272:user/release-keys",
        ),
    ];

    pub const PIXEL_6_PRO: &'static [(Attribute, &'static str)] = &[
        (Attribute::Brand, "google"),
        (Attribute::Manufacturer, "Google"),
        (Attribute::Device, "raven"),
        (Attribute::Product, "raven"),
        (Attribute::Model, "Pixel 6 Pro"),
        (
            Attribute::Fingerprint,
            "google/raven/raven:13/TQ2A.230405.003.E1/9802792:user/release-keys",
        ),
    ];

    pub const PIXEL_7_PRO: &'static [(Attribute, &'static str)] = &[
        (Attribute::Brand, "google"),
        (Attribute::Manufacturer, "Google"),
        (Attribute::Device, "cheetah"),
        (Attribute::Product, "cheetah"),
        (Attribute::Model, "Pixel 7 Pro"),
        (
            Attribute::Fingerprint,
            "google/cheetah/cheetah:13/TQ1A.230205.001.D2/9471403:user/release-keys",
        ),
    ];

    pub const DOLBY_PARTNER: &'static [(Attribute, &'static str)] = &[
        (Attribute::VendorDeviceDb, "OP_DEVICE"),
        (Attribute::VendorManufacturerDb, "OP_PHONE"),
        (Attribute::VendorProductDevice, "OP_PHONE"),
        (Attribute::VendorProductManufacturer, "OPD"),
    ];

    /// Forced onto every resolved process, whatever the build flavor.
    pub const USER_BUILD: &'static [(Attribute, &'static str)] = &[
        (Attribute::Type, "user"),
        (Attribute::Tags, "release-keys"),
    ];

    /// Appended to the real model for the GMS background process.
    pub const MODEL_MARKER: char = '\u{200b}';
}

/// Which profile a rule applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileId {
    PixelXl,
    Pixel6Pro,
    Pixel7Pro,
    DolbyPartner,
}

/// The profiles available to the rule table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileSet {
    pub pixel_xl: IdentityProfile,
    pub pixel_6_pro: IdentityProfile,
    pub pixel_7_pro: IdentityProfile,
    pub dolby_partner: IdentityProfile,
}

impl Default for ProfileSet {
    fn default() -> Self {
        Self {
            pixel_xl: IdentityProfile::new("Pixel XL", KnownDevices::PIXEL_XL),
            pixel_6_pro: IdentityProfile::new("Pixel 6 Pro", KnownDevices::PIXEL_6_PRO),
            pixel_7_pro: IdentityProfile::new("Pixel 7 Pro", KnownDevices::PIXEL_7_PRO),
            dolby_partner: IdentityProfile::new("Dolby partner", KnownDevices::DOLBY_PARTNER),
        }
    }
}

impl ProfileSet {
    pub fn get(&self, id: ProfileId) -> &IdentityProfile {
        match id {
            ProfileId::PixelXl => &self.pixel_xl,
            ProfileId::Pixel6Pro => &self.pixel_6_pro,
            ProfileId::Pixel7Pro => &self.pixel_7_pro,
            ProfileId::DolbyPartner => &self.dolby_partner,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_profiles_cover_build_identity() {
        let set = ProfileSet::default();
        for id in [ProfileId::PixelXl, ProfileId::Pixel6Pro, ProfileId::Pixel7Pro] {
            let profile = set.get(id);
            assert_eq!(profile.len(), 6, "{} should set six fields", profile.name);
            assert_eq!(profile.get(Attribute::Brand), Some("google"));
            assert!(profile.get(Attribute::Type).is_none());
        }
    }

    #[test]
    fn test_fingerprints_match_devices() {
        let set = ProfileSet::default();
        let fp = set.get(ProfileId::Pixel6Pro).get(Attribute::Fingerprint).unwrap();
        assert!(fp.starts_with("google/raven/raven:13/"));
        assert_eq!(set.get(ProfileId::PixelXl).get(Attribute::Model), Some("Pixel XL"));
    }

    #[test]
    fn test_dolby_profile_uses_vendor_keys_only() {
        let dolby = ProfileSet::default().dolby_partner;
        assert_eq!(dolby.len(), 4);
        assert!(dolby.iter().all(|(attr, _)| !attr.is_build_field()));
    }

    #[test]
    fn test_partial_profile_set_fills_defaults() {
        let json = r#"{"pixel_xl": {"name": "Custom", "values": {"MODEL": "Pixel 2"}}}"#;
        let set: ProfileSet = serde_json::from_str(json).unwrap();
        assert_eq!(set.pixel_xl.get(Attribute::Model), Some("Pixel 2"));
        assert_eq!(set.pixel_7_pro, ProfileSet::default().pixel_7_pro);
    }
}
