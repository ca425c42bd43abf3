//! # prop-imitation
//!
//! Decides, per calling package, which device identity a process should see.
//!
//! Custom Android builds report a certified or flagship identity to a short
//! list of Google and partner apps, veto key attestation for integrity
//! checks, and hide preload features from Photos. This crate holds that
//! decision logic as data and plain values:
//!
//! ```text
//! CallerIdentity + StaticConfig
//!   ↓
//! Rule chain (rules::RULES, first match wins)
//!   ↓
//! SpoofDecision → IdentityOverrides (IdentityProvider)
//! ```
//!
//! Hosts create one [`ProcessIdentity`] at process start and route identity
//! reads, certificate chain requests and feature queries through it.

use wasm_bindgen::prelude::*;

// Modules
pub mod bindings;
pub mod caller;
pub mod config;
mod error;
pub mod identity;
pub mod resolver;
pub mod rules;
pub mod session;

pub use caller::{packages, CallerIdentity, StackFrame};
pub use config::{DolbyMatch, StaticConfig};
pub use error::{ErrorCode, ErrorInfo, Result, SpoofError};
pub use identity::{
    Attribute, HostIdentity, IdentityOverrides, IdentityProfile, IdentityProvider, KnownDevices,
    ProfileId, ProfileSet,
};
pub use resolver::{
    check_certificate_chain, filter_feature, resolve_identity_spoof, resolve_with_rules,
    should_block_certificate_chain, Override, OverrideValue, SpoofDecision,
};
pub use rules::{CallerMatch, Effect, Requirement, Rule, RULES};
pub use session::ProcessIdentity;

/// Initialize the WASM module
///
/// Sets up console logging for the JS host.
#[wasm_bindgen(start)]
pub fn init() {
    if console_log::init_with_level(log::Level::Info).is_err() {
        return;
    }

    log::info!("prop-imitation initialized");
}
