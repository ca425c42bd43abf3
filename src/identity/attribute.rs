//! Closed set of device identity attribute keys.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A device identity attribute that the resolver may override.
///
/// The first eight variants are build fields every host exposes. The vendor
/// variants are system property keys read by the Dolby audio stack; hosts
/// usually do not expose them through the build identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Attribute {
    #[serde(rename = "BRAND")]
    Brand,
    #[serde(rename = "MANUFACTURER")]
    Manufacturer,
    #[serde(rename = "DEVICE")]
    Device,
    #[serde(rename = "PRODUCT")]
    Product,
    #[serde(rename = "MODEL")]
    Model,
    #[serde(rename = "FINGERPRINT")]
    Fingerprint,
    #[serde(rename = "TYPE")]
    Type,
    #[serde(rename = "TAGS")]
    Tags,
    #[serde(rename = "ro.vendor.product.device.db")]
    VendorDeviceDb,
    #[serde(rename = "ro.vendor.product.manufacturer.db")]
    VendorManufacturerDb,
    #[serde(rename = "vendor.product.device")]
    VendorProductDevice,
    #[serde(rename = "vendor.product.manufacturer")]
    VendorProductManufacturer,
}

impl Attribute {
    /// Build fields present on every host identity.
    pub const BUILD_FIELDS: &'static [Attribute] = &[
        Attribute::Brand,
        Attribute::Manufacturer,
        Attribute::Device,
        Attribute::Product,
        Attribute::Model,
        Attribute::Fingerprint,
        Attribute::Type,
        Attribute::Tags,
    ];

    pub const ALL: &'static [Attribute] = &[
        Attribute::Brand,
        Attribute::Manufacturer,
        Attribute::Device,
        Attribute::Product,
        Attribute::Model,
        Attribute::Fingerprint,
        Attribute::Type,
        Attribute::Tags,
        Attribute::VendorDeviceDb,
        Attribute::VendorManufacturerDb,
        Attribute::VendorProductDevice,
        Attribute::VendorProductManufacturer,
    ];

    /// Canonical host name of the attribute
    pub fn name(self) -> &'static str {
        match self {
            Attribute::Brand => "BRAND",
            Attribute::Manufacturer => "MANUFACTURER",
            Attribute::Device => "DEVICE",
            Attribute::Product => "PRODUCT",
            Attribute::Model => "MODEL",
            Attribute::Fingerprint => "FINGERPRINT",
            Attribute::Type => "TYPE",
            Attribute::Tags => "TAGS",
            Attribute::VendorDeviceDb => "ro.vendor.product.device.db",
            Attribute::VendorManufacturerDb => "ro.vendor.product.manufacturer.db",
            Attribute::VendorProductDevice => "vendor.product.device",
            Attribute::VendorProductManufacturer => "vendor.product.manufacturer",
        }
    }

    pub fn is_build_field(self) -> bool {
        Self::BUILD_FIELDS.contains(&self)
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Attribute {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|attr| attr.name() == s)
            .ok_or_else(|| format!("unknown identity attribute: {}", s))
    }
}
