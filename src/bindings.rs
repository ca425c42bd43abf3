//! JavaScript bindings
//!
//! Exposes the resolver hooks to a JS host. Configuration and host identity
//! are passed as plain objects; anything that fails to decode falls back to
//! the defaults, matching how a missing resource disables a feature.
//!
//! ```javascript
//! import init, { resolve_identity_spoof } from './pkg/prop_imitation.js';
//! await init();
//! const result = resolve_identity_spoof(
//!     'com.google.android.apps.photos',
//!     'com.google.android.apps.photos',
//!     { MODEL: 'Phone 1', TYPE: 'userdebug', TAGS: 'test-keys' },
//!     { spoof_google_apps: true },
//! );
//! // result.rule === 'photos-pixel-xl'
//! ```

use std::collections::BTreeMap;

use js_sys::Array;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::caller::{CallerIdentity, StackFrame};
use crate::config::StaticConfig;
use crate::error::ErrorInfo;
use crate::identity::{Attribute, HostIdentity};
use crate::resolver;
use crate::session::ProcessIdentity;

fn config_from(value: JsValue) -> StaticConfig {
    if value.is_undefined() || value.is_null() {
        return StaticConfig::default();
    }
    serde_wasm_bindgen::from_value(value).unwrap_or_else(|e| {
        log::warn!("Invalid configuration: {}; using defaults", e);
        StaticConfig::default()
    })
}

fn host_from(value: JsValue) -> HostIdentity {
    if value.is_undefined() || value.is_null() {
        return HostIdentity::new();
    }
    serde_wasm_bindgen::from_value::<BTreeMap<Attribute, String>>(value)
        .map(HostIdentity::from)
        .unwrap_or_else(|e| {
            log::warn!("Invalid host identity: {}", e);
            HostIdentity::new()
        })
}

fn frames_from(frames: &Array) -> Vec<StackFrame> {
    frames
        .iter()
        .filter_map(|frame| frame.as_string())
        .map(StackFrame::new)
        .collect()
}

/// Resolve a caller and apply the decision over the given host identity.
///
/// Returns `{ rule, decision, overrides }` where `overrides` maps attribute
/// names to the values readers will now see.
#[wasm_bindgen]
pub fn resolve_identity_spoof(
    package_name: String,
    process_name: Option<String>,
    host: JsValue,
    config: JsValue,
) -> Result<JsValue, JsValue> {
    let session = ProcessIdentity::initialize(
        CallerIdentity::new(package_name, process_name),
        config_from(config),
        host_from(host),
    );

    let overrides: BTreeMap<Attribute, &str> = session.identity().overridden().collect();
    let result = serde_json::json!({
        "rule": session.decision().rule,
        "decision": session.decision(),
        "overrides": overrides,
    });

    // Plain objects rather than ES2015 Maps, so hosts can read fields directly
    result
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Whether certificate chain retrieval must fail for this caller and stack
#[wasm_bindgen]
pub fn should_block_certificate_chain(
    package_name: String,
    process_name: Option<String>,
    frames: Array,
    config: JsValue,
) -> bool {
    resolver::should_block_certificate_chain(
        &CallerIdentity::new(package_name, process_name),
        &config_from(config),
        &frames_from(&frames),
    )
}

/// Certificate chain hook for JS hosts.
///
/// Rejects with an `ErrorInfo` object (`{ code, message, is_deliberate }`)
/// when retrieval is vetoed.
#[wasm_bindgen]
pub fn check_certificate_chain(
    package_name: String,
    process_name: Option<String>,
    frames: Array,
    config: JsValue,
) -> Result<(), JsValue> {
    resolver::check_certificate_chain(
        &CallerIdentity::new(package_name, process_name),
        &config_from(config),
        &frames_from(&frames),
    )
    .map_err(|e| {
        ErrorInfo::from(&e)
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .unwrap_or_else(|_| JsValue::from(e))
    })
}

/// Answer a system feature query on behalf of the caller
#[wasm_bindgen]
pub fn filter_feature(
    package_name: String,
    process_name: Option<String>,
    feature: String,
    host_answer: bool,
    config: JsValue,
) -> bool {
    resolver::filter_feature(
        &CallerIdentity::new(package_name, process_name),
        &config_from(config),
        &feature,
        host_answer,
    )
}
