//! Device identity: attribute keys, profiles, and the override layer.

pub mod attribute;
pub mod overrides;
pub mod profile;

pub use attribute::Attribute;
pub use overrides::{HostIdentity, IdentityOverrides, IdentityProvider};
pub use profile::{IdentityProfile, KnownDevices, ProfileId, ProfileSet};
