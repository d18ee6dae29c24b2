use std::fs;

/// A deterministic source of a host identifier, hashed into a node ID.
///
/// Implementations return `None` when their identifier is unavailable, which
/// lets the resolver move on to the next source.
pub trait IdentitySource {
    /// Short label used in logs and in [`Provenance::Derived`].
    ///
    /// [`Provenance::Derived`]: crate::Provenance::Derived
    fn name(&self) -> &str;

    /// Returns the raw identifier, if any.
    fn identifier(&self) -> Option<String>;
}

/// Reads the host's name or machine ID.
///
/// Checked in order: the `HOSTNAME` environment variable, `/etc/hostname`,
/// then `/etc/machine-id`.
#[derive(Clone, Debug, Default)]
pub struct HostIdentity;

impl IdentitySource for HostIdentity {
    fn name(&self) -> &str {
        "host"
    }

    fn identifier(&self) -> Option<String> {
        std::env::var("HOSTNAME")
            .ok()
            .and_then(non_blank)
            .or_else(|| read_trimmed("/etc/hostname"))
            .or_else(|| read_trimmed("/etc/machine-id"))
    }
}

/// A fixed identifier, e.g. a pod name injected by the orchestrator.
#[derive(Clone, Debug)]
pub struct StaticIdentity {
    name: String,
    value: Option<String>,
}

impl StaticIdentity {
    pub fn new(name: impl Into<String>, value: Option<String>) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

impl IdentitySource for StaticIdentity {
    fn name(&self) -> &str {
        &self.name
    }

    fn identifier(&self) -> Option<String> {
        self.value.clone().and_then(non_blank)
    }
}

fn read_trimmed(path: &str) -> Option<String> {
    fs::read_to_string(path).ok().and_then(non_blank)
}

fn non_blank(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}
