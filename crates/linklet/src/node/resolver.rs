use crate::{IdentitySource, NodeIdError, SnowflakeLayout};
use core::fmt;
use rand::Rng;

/// Where a [`NodeId`] came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Provenance {
    /// Supplied by configuration.
    Configured,
    /// Hashed from a deterministic host identifier.
    Derived {
        /// Name of the [`IdentitySource`] that produced the identifier.
        source: String,
    },
    /// Drawn at random because no deterministic source was available.
    ///
    /// Uniqueness across nodes is only probabilistic in this mode.
    Random,
}

/// The node ID assigned to this process for its whole lifetime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeId {
    value: u64,
    provenance: Provenance,
}

impl NodeId {
    pub const fn value(&self) -> u64 {
        self.value
    }

    pub const fn provenance(&self) -> &Provenance {
        &self.provenance
    }

    /// Returns `true` when the ID was drawn at random.
    pub const fn is_degraded(&self) -> bool {
        matches!(self.provenance, Provenance::Random)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.provenance {
            Provenance::Configured => write!(f, "{} (configured)", self.value),
            Provenance::Derived { source } => write!(f, "{} (derived from {source})", self.value),
            Provenance::Random => write!(f, "{} (random)", self.value),
        }
    }
}

/// Assigns a node ID using a two-tier strategy.
///
/// 1. An explicitly configured ID wins. It must fit the layout.
/// 2. Otherwise the first [`IdentitySource`] that yields an identifier is
///    hashed (FNV-1a) into the node ID range.
/// 3. Otherwise a random ID is drawn and a warning is logged.
///
/// Hashing host identifiers can collide: two hosts may land on the same node
/// ID. Deployments that need hard guarantees should configure IDs explicitly.
///
/// # Example
///
/// ```
/// use linklet::{NodeIdResolver, Provenance, SnowflakeLayout, StaticIdentity};
///
/// let node = NodeIdResolver::new(SnowflakeLayout::TWITTER)
///     .source(StaticIdentity::new("pod", Some("web-7".into())))
///     .resolve()
///     .unwrap();
/// assert!(node.value() <= 1023);
/// assert!(matches!(node.provenance(), Provenance::Derived { .. }));
/// ```
pub struct NodeIdResolver {
    layout: SnowflakeLayout,
    configured: Option<u64>,
    sources: Vec<Box<dyn IdentitySource + Send + Sync>>,
}

impl NodeIdResolver {
    pub fn new(layout: SnowflakeLayout) -> Self {
        Self {
            layout,
            configured: None,
            sources: Vec::new(),
        }
    }

    /// Sets an explicit node ID, bypassing the identity sources.
    #[must_use]
    pub fn configured(mut self, node_id: Option<u64>) -> Self {
        self.configured = node_id;
        self
    }

    /// Appends a deterministic identity source. Sources are tried in order.
    #[must_use]
    pub fn source(mut self, source: impl IdentitySource + Send + Sync + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Resolves the node ID.
    ///
    /// # Errors
    ///
    /// Returns [`NodeIdError::OutOfRange`] if a configured ID does not fit the
    /// layout. Missing identity sources never fail; they degrade to a random
    /// draw.
    pub fn resolve(&self) -> Result<NodeId, NodeIdError> {
        let max = self.layout.max_node_id();

        if let Some(node_id) = self.configured {
            if node_id > max {
                return Err(NodeIdError::OutOfRange { node_id, max });
            }
            tracing::info!(node_id, "using configured node id");
            return Ok(NodeId {
                value: node_id,
                provenance: Provenance::Configured,
            });
        }

        for source in &self.sources {
            if let Some(identifier) = source.identifier() {
                let value = fnv1a(identifier.as_bytes()) % (max + 1);
                tracing::info!(
                    node_id = value,
                    source = source.name(),
                    "derived node id from host identity"
                );
                return Ok(NodeId {
                    value,
                    provenance: Provenance::Derived {
                        source: source.name().to_owned(),
                    },
                });
            }
            tracing::debug!(source = source.name(), "identity source unavailable");
        }

        let value = rand::rng().random_range(0..=max);
        tracing::warn!(
            node_id = value,
            "no identity source available; using a random node id, uniqueness across nodes is probabilistic"
        );
        Ok(NodeId {
            value,
            provenance: Provenance::Random,
        })
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    bytes
        .iter()
        .fold(OFFSET, |hash, &b| (hash ^ u64::from(b)).wrapping_mul(PRIME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StaticIdentity;

    #[test]
    fn configured_id_wins_over_sources() {
        let node = NodeIdResolver::new(SnowflakeLayout::TWITTER)
            .configured(Some(7))
            .source(StaticIdentity::new("pod", Some("web-1".into())))
            .resolve()
            .unwrap();
        assert_eq!(node.value(), 7);
        assert_eq!(node.provenance(), &Provenance::Configured);
        assert!(!node.is_degraded());
    }

    #[test]
    fn configured_id_out_of_range_is_rejected() {
        let err = NodeIdResolver::new(SnowflakeLayout::TWITTER)
            .configured(Some(1024))
            .resolve()
            .unwrap_err();
        assert_eq!(
            err,
            NodeIdError::OutOfRange {
                node_id: 1024,
                max: 1023
            }
        );
    }

    #[test]
    fn derived_id_is_stable_and_in_range() {
        let layout = SnowflakeLayout::new(59, 2, 2).unwrap();
        let resolve = || {
            NodeIdResolver::new(layout)
                .source(StaticIdentity::new("pod", Some("web-1".into())))
                .resolve()
                .unwrap()
        };
        let a = resolve();
        let b = resolve();
        assert_eq!(a, b);
        assert!(a.value() <= 3);
        assert_eq!(
            a.provenance(),
            &Provenance::Derived {
                source: "pod".into()
            }
        );
    }

    #[test]
    fn skips_unavailable_sources() {
        let node = NodeIdResolver::new(SnowflakeLayout::TWITTER)
            .source(StaticIdentity::new("empty", None))
            .source(StaticIdentity::new("blank", Some("   ".into())))
            .source(StaticIdentity::new("pod", Some("web-1".into())))
            .resolve()
            .unwrap();
        assert_eq!(
            node.provenance(),
            &Provenance::Derived {
                source: "pod".into()
            }
        );
    }

    #[test]
    fn falls_back_to_random_in_range() {
        let layout = SnowflakeLayout::new(57, 4, 2).unwrap();
        for _ in 0..256 {
            let node = NodeIdResolver::new(layout)
                .source(StaticIdentity::new("empty", None))
                .resolve()
                .unwrap();
            assert!(node.is_degraded());
            assert!(node.value() <= layout.max_node_id());
        }
    }

    #[test]
    fn fnv1a_known_vectors() {
        assert_eq!(fnv1a(b""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(fnv1a(b"a"), 0xaf63_dc4c_8601_ec8c);
    }
}
