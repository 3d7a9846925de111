//! Route building for guard redirects.
//!
//! All navigable paths live under `/{tenant_code}/{project_code}/...`; the
//! un-suffixed project root normalizes to the lobby.

pub fn project_root(tenant: &str, project: &str) -> String {
    format!("/{tenant}/{project}")
}

pub fn lobby(tenant: &str, project: &str) -> String {
    format!("/{tenant}/{project}/lobby")
}

pub fn shift_start(tenant: &str, project: &str) -> String {
    format!("/{tenant}/{project}/attendance/shift-start")
}

pub fn tracking(tenant: &str, project: &str) -> String {
    format!("/{tenant}/{project}/attendance/tracking")
}

/// Normalize a path: the bare project root (with or without a trailing
/// slash) redirects to the lobby; everything else passes through.
pub fn normalize(path: &str, tenant: &str, project: &str) -> String {
    let root = project_root(tenant, project);
    if path == root || path == format!("{root}/") {
        lobby(tenant, project)
    } else {
        path.to_string()
    }
}
