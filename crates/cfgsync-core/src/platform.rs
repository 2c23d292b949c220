//! Framework classification: which platform to ask the service for and which
//! configuration file to pull out of the bundle.
//!
//! Unknown framework strings fall back to the web defaults instead of failing.

use crate::project::ProjectDescriptor;
use std::fmt;

/// File name of the javascript-style export (default).
pub const EXPORT_FILE_NAME: &str = "aws-exports.js";
/// File name of the native configuration (Objective-C, Swift, Android).
pub const NATIVE_FILE_NAME: &str = "awsconfiguration.json";

/// Client frameworks with a native configuration format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framework {
    ObjectiveC,
    Swift,
    Android,
}

impl Framework {
    /// Parse a declared framework. Returns `None` for empty or unrecognized values.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "objective-c" => Some(Framework::ObjectiveC),
            "swift" => Some(Framework::Swift),
            "android" => Some(Framework::Android),
            _ => None,
        }
    }
}

/// Platform identifier sent with the export request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Platform {
    #[default]
    Web,
    Objc,
    Swift,
    Android,
}

impl Platform {
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Web => "WEB",
            Platform::Objc => "OBJC",
            Platform::Swift => "SWIFT",
            Platform::Android => "ANDROID",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Option<Framework>> for Platform {
    fn from(fw: Option<Framework>) -> Self {
        match fw {
            Some(Framework::ObjectiveC) => Platform::Objc,
            Some(Framework::Swift) => Platform::Swift,
            Some(Framework::Android) => Platform::Android,
            None => Platform::Web,
        }
    }
}

/// Which configuration file a project consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfigFileName {
    #[default]
    Export,
    Native,
}

impl ConfigFileName {
    pub fn as_str(self) -> &'static str {
        match self {
            ConfigFileName::Export => EXPORT_FILE_NAME,
            ConfigFileName::Native => NATIVE_FILE_NAME,
        }
    }
}

impl fmt::Display for ConfigFileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Option<Framework>> for ConfigFileName {
    fn from(fw: Option<Framework>) -> Self {
        match fw {
            Some(_) => ConfigFileName::Native,
            None => ConfigFileName::Export,
        }
    }
}

fn declared_framework(project: &ProjectDescriptor) -> Option<Framework> {
    project.framework.as_deref().and_then(Framework::parse)
}

/// Platform to request for this project.
pub fn resolve_platform(project: &ProjectDescriptor) -> Platform {
    declared_framework(project).into()
}

/// Configuration file to retrieve and publish for this project.
pub fn resolve_file_name(project: &ProjectDescriptor) -> ConfigFileName {
    declared_framework(project).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_framework(fw: Option<&str>) -> ProjectDescriptor {
        let mut p = ProjectDescriptor::new("/proj");
        p.framework = fw.map(str::to_string);
        p
    }

    #[test]
    fn no_framework_defaults_to_web_export() {
        for fw in [None, Some("")] {
            let p = with_framework(fw);
            assert_eq!(resolve_platform(&p), Platform::Web);
            assert_eq!(resolve_file_name(&p).as_str(), "aws-exports.js");
        }
    }

    #[test]
    fn unknown_framework_falls_back_to_default() {
        for fw in ["react", "angular", "Swift", "ios", " android"] {
            let p = with_framework(Some(fw));
            assert_eq!(resolve_platform(&p), Platform::Web, "framework {fw:?}");
            assert_eq!(resolve_file_name(&p), ConfigFileName::Export, "framework {fw:?}");
        }
    }

    #[test]
    fn native_frameworks_map_to_platform_and_native_file() {
        let cases = [
            ("objective-c", Platform::Objc, "OBJC"),
            ("swift", Platform::Swift, "SWIFT"),
            ("android", Platform::Android, "ANDROID"),
        ];
        for (fw, platform, wire) in cases {
            let p = with_framework(Some(fw));
            assert_eq!(resolve_platform(&p), platform);
            assert_eq!(resolve_platform(&p).as_str(), wire);
            assert_eq!(resolve_file_name(&p).as_str(), "awsconfiguration.json");
        }
    }
}
