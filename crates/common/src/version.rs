use serde::Serialize;

/// Build metadata stamped by the build script.
#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub build_profile: &'static str,
    pub repo_version: &'static str,
}

pub fn build_info() -> BuildInfo {
    BuildInfo {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        build_profile: env!("BUILD_PROFILE"),
        repo_version: env!("REPO_VERSION"),
    }
}
