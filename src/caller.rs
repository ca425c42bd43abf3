//! Caller identity and the packages the resolver knows about.

use serde::{Deserialize, Serialize};

/// Package and process names with special handling.
pub mod packages {
    pub const GMS: &str = "com.google.android.gms";
    pub const GMS_UNSTABLE_PROCESS: &str = "com.google.android.gms.unstable";
    pub const FINSKY: &str = "com.android.vending";
    pub const ARCORE: &str = "com.google.ar.core";
    pub const PHOTOS: &str = "com.google.android.apps.photos";
    pub const VELVET: &str = "com.google.android.quicksearchbox";
    pub const WALLPAPERS: &str = "com.google.android.apps.wallpaper";
    pub const NETFLIX: &str = "com.netflix.mediaclient";
    pub const DAX_UI: &str = "com.dolby.daxappui";
    pub const DAX_SERVICE: &str = "com.dolby.daxservice";
    pub const TURBO: &str = "com.google.android.apps.turbo";
    pub const GBOARD: &str = "com.google.android.inputmethod.latin";
    pub const SETUPWIZARD: &str = "com.google.android.setupwizard";
}

/// Who is running in the current process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerIdentity {
    pub package_name: String,
    pub process_name: Option<String>,
}

impl CallerIdentity {
    pub fn new(package_name: impl Into<String>, process_name: Option<String>) -> Self {
        Self {
            package_name: package_name.into(),
            process_name,
        }
    }

    /// Caller whose process is named after its package
    pub fn for_package(package_name: &str) -> Self {
        Self::new(package_name, Some(package_name.to_string()))
    }

    /// A caller with no package or no process cannot be resolved
    pub fn is_resolvable(&self) -> bool {
        !self.package_name.is_empty() && self.process_name.is_some()
    }

    pub fn is_package(&self, package: &str) -> bool {
        self.package_name == package
    }

    /// The GMS background process that runs integrity checks
    pub fn is_gms_unstable(&self) -> bool {
        self.is_package(packages::GMS)
            && self.process_name.as_deref() == Some(packages::GMS_UNSTABLE_PROCESS)
    }

    pub fn is_play_store(&self) -> bool {
        self.is_package(packages::FINSKY)
    }
}

/// One frame of a call stack snapshot taken by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackFrame {
    /// Name of the component (class) that owns the frame
    pub component: String,
}

impl StackFrame {
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gms_unstable_needs_both_names() {
        let caller = CallerIdentity::new(
            packages::GMS,
            Some(packages::GMS_UNSTABLE_PROCESS.to_string()),
        );
        assert!(caller.is_gms_unstable());

        let persistent = CallerIdentity::new(
            packages::GMS,
            Some("com.google.android.gms.persistent".to_string()),
        );
        assert!(!persistent.is_gms_unstable());

        let wrong_package = CallerIdentity::new(
            packages::PHOTOS,
            Some(packages::GMS_UNSTABLE_PROCESS.to_string()),
        );
        assert!(!wrong_package.is_gms_unstable());
    }

    #[test]
    fn test_resolvable() {
        assert!(CallerIdentity::for_package(packages::NETFLIX).is_resolvable());
        assert!(!CallerIdentity::new("", Some("proc".to_string())).is_resolvable());
        assert!(!CallerIdentity::new(packages::NETFLIX, None).is_resolvable());
    }

    #[test]
    fn test_play_store() {
        assert!(CallerIdentity::for_package(packages::FINSKY).is_play_store());
        assert!(!CallerIdentity::for_package(packages::GMS).is_play_store());
    }
}
