//! Owned identity override table layered over the host identity.
//!
//! Readers go through [`IdentityProvider`] instead of touching host state, so
//! the spoofed identity is an ordinary value handed to whoever needs it.

use std::collections::BTreeMap;

use super::Attribute;
use crate::error::{Result, SpoofError};

/// Read access to device identity attributes.
pub trait IdentityProvider {
    fn get(&self, attr: Attribute) -> Option<&str>;

    fn model(&self) -> Option<&str> {
        self.get(Attribute::Model)
    }

    fn fingerprint(&self) -> Option<&str> {
        self.get(Attribute::Fingerprint)
    }
}

/// The attributes the host platform actually exposes, with their real values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostIdentity {
    values: BTreeMap<Attribute, String>,
}

impl HostIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a host attribute
    pub fn with(mut self, attr: Attribute, value: impl Into<String>) -> Self {
        self.values.insert(attr, value.into());
        self
    }

    pub fn supports(&self, attr: Attribute) -> bool {
        self.values.contains_key(&attr)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<BTreeMap<Attribute, String>> for HostIdentity {
    fn from(values: BTreeMap<Attribute, String>) -> Self {
        Self { values }
    }
}

impl<'a> FromIterator<(Attribute, &'a str)> for HostIdentity {
    fn from_iter<I: IntoIterator<Item = (Attribute, &'a str)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(attr, value)| (attr, value.to_string()))
                .collect(),
        }
    }
}

impl IdentityProvider for HostIdentity {
    fn get(&self, attr: Attribute) -> Option<&str> {
        self.values.get(&attr).map(String::as_str)
    }
}

/// Host identity plus the overrides written by a spoofing decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityOverrides {
    host: HostIdentity,
    table: BTreeMap<Attribute, String>,
}

impl IdentityOverrides {
    pub fn new(host: HostIdentity) -> Self {
        Self {
            host,
            table: BTreeMap::new(),
        }
    }

    /// Override one attribute.
    ///
    /// Fails with [`SpoofError::MissingAttribute`] when the host does not
    /// expose `attr`; the table is left untouched in that case.
    pub fn set(&mut self, attr: Attribute, value: impl Into<String>) -> Result<()> {
        if !self.host.supports(attr) {
            return Err(SpoofError::MissingAttribute { attribute: attr });
        }
        let value = value.into();
        log::debug!("Setting prop {} to {}", attr, value);
        self.table.insert(attr, value);
        Ok(())
    }

    /// Override every attribute in `values`, skipping the ones the host lacks.
    ///
    /// Returns how many attributes were written.
    pub fn set_all<'a, I>(&mut self, values: I) -> usize
    where
        I: IntoIterator<Item = (Attribute, &'a str)>,
    {
        let mut written = 0;
        for (attr, value) in values {
            match self.set(attr, value) {
                Ok(()) => written += 1,
                Err(e) => log::warn!("{}", e),
            }
        }
        written
    }

    pub fn host(&self) -> &HostIdentity {
        &self.host
    }

    pub fn is_overridden(&self, attr: Attribute) -> bool {
        self.table.contains_key(&attr)
    }

    /// The overridden attributes, in attribute order
    pub fn overridden(&self) -> impl Iterator<Item = (Attribute, &str)> {
        self.table.iter().map(|(attr, value)| (*attr, value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl IdentityProvider for IdentityOverrides {
    fn get(&self, attr: Attribute) -> Option<&str> {
        self.table
            .get(&attr)
            .map(String::as_str)
            .or_else(|| self.host.get(attr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host() -> HostIdentity {
        HostIdentity::new()
            .with(Attribute::Brand, "lineage")
            .with(Attribute::Model, "Phone 1")
            .with(Attribute::Type, "userdebug")
    }

    #[test]
    fn test_reads_fall_through_to_host() {
        let overrides = IdentityOverrides::new(host());
        assert_eq!(overrides.model(), Some("Phone 1"));
        assert_eq!(overrides.fingerprint(), None);
        assert!(overrides.is_empty());
    }

    #[test]
    fn test_override_shadows_host() {
        let mut overrides = IdentityOverrides::new(host());
        overrides.set(Attribute::Type, "user").unwrap();
        assert_eq!(overrides.get(Attribute::Type), Some("user"));
        assert_eq!(overrides.host().get(Attribute::Type), Some("userdebug"));
    }

    #[test]
    fn test_missing_attribute_rejected() {
        let mut overrides = IdentityOverrides::new(host());
        let err = overrides.set(Attribute::Fingerprint, "x").unwrap_err();
        assert_eq!(
            err,
            SpoofError::MissingAttribute {
                attribute: Attribute::Fingerprint
            }
        );
        assert!(!overrides.is_overridden(Attribute::Fingerprint));
    }

    #[test]
    fn test_set_all_skips_missing() {
        let mut overrides = IdentityOverrides::new(host());
        let written = overrides.set_all([
            (Attribute::Brand, "google"),
            (Attribute::VendorDeviceDb, "OP_DEVICE"),
            (Attribute::Model, "Pixel XL"),
        ]);
        assert_eq!(written, 2);
        assert_eq!(overrides.get(Attribute::Brand), Some("google"));
        assert_eq!(overrides.get(Attribute::Model), Some("Pixel XL"));
        assert_eq!(overrides.get(Attribute::VendorDeviceDb), None);
    }

    #[test]
    fn test_set_all_is_idempotent() {
        let values = [(Attribute::Brand, "google"), (Attribute::Model, "Pixel XL")];
        let mut once = IdentityOverrides::new(host());
        once.set_all(values);
        let mut twice = once.clone();
        twice.set_all(values);
        assert_eq!(once, twice);
    }
}
