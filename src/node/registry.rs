//! Type tag to data source registry

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use super::id::SEPARATOR;
use super::{GlobalId, NodeError};

/// Data-access contract the owner of a registered type implements.
///
/// Absence is reported as `Ok(None)` / an empty list; only genuine failures
/// (I/O, backend outage) are errors, and those propagate to the caller
/// unchanged.
#[async_trait]
pub trait NodeSource<N>: Send + Sync {
    /// Fetch one entity by its type-local key.
    async fn fetch_by_id(&self, local_key: &str) -> anyhow::Result<Option<N>>;

    /// Fetch the full ordered collection for this type.
    async fn fetch_all(&self) -> anyhow::Result<Vec<N>>;
}

/// Maps type tags to the sources that own them and resolves identifiers.
///
/// Generic over the caller's node type `N`, typically an enum spanning the
/// domain's entity kinds. The table lives behind an `RwLock` so one registry
/// can be shared behind an `Arc`: writes happen during startup registration,
/// everything afterwards is reads.
pub struct NodeRegistry<N> {
    sources: RwLock<HashMap<String, Arc<dyn NodeSource<N>>>>,
}

impl<N> NodeRegistry<N> {
    pub fn new() -> Self {
        Self {
            sources: RwLock::new(HashMap::new()),
        }
    }

    /// Register the data source owning `type_tag`.
    ///
    /// Tags are immutable once bound; re-registration is rejected rather than
    /// silently replaced. Tags must be non-empty and free of the identifier
    /// separator.
    pub fn register(
        &self,
        type_tag: impl Into<String>,
        source: Arc<dyn NodeSource<N>>,
    ) -> Result<(), NodeError> {
        let type_tag = type_tag.into();
        if type_tag.is_empty() || type_tag.contains(SEPARATOR) {
            return Err(NodeError::InvalidTypeTag(type_tag));
        }

        let mut sources = self.sources.write();
        if sources.contains_key(&type_tag) {
            return Err(NodeError::DuplicateType(type_tag));
        }
        debug!(type_tag = %type_tag, "registered node source");
        sources.insert(type_tag, source);
        Ok(())
    }

    /// Encode an identifier for an entity of one of this registry's types.
    pub fn encode(&self, type_tag: &str, local_key: impl fmt::Display) -> GlobalId {
        GlobalId::encode(type_tag, local_key)
    }

    /// Resolve an identifier to its entity.
    ///
    /// `Ok(None)` means the identifier was well-formed and its type known,
    /// but the source holds no entity under that key.
    pub async fn resolve(&self, id: &GlobalId) -> Result<Option<N>, NodeError> {
        let (type_tag, local_key) = id.decode()?;
        let source = self.source(&type_tag)?;
        debug!(type_tag = %type_tag, local_key = %local_key, "resolving node");
        Ok(source.fetch_by_id(&local_key).await?)
    }

    /// The full ordered collection for a registered type, ready for
    /// pagination.
    pub async fn fetch_all(&self, type_tag: &str) -> Result<Vec<N>, NodeError> {
        let source = self.source(type_tag)?;
        Ok(source.fetch_all().await?)
    }

    pub fn is_registered(&self, type_tag: &str) -> bool {
        self.sources.read().contains_key(type_tag)
    }

    /// Tags registered so far, in no particular order.
    pub fn type_tags(&self) -> Vec<String> {
        self.sources.read().keys().cloned().collect()
    }

    // Clones the source handle out so no lock is held across an await.
    fn source(&self, type_tag: &str) -> Result<Arc<dyn NodeSource<N>>, NodeError> {
        self.sources
            .read()
            .get(type_tag)
            .cloned()
            .ok_or_else(|| NodeError::UnknownType(type_tag.to_string()))
    }
}

impl<N> Default for NodeRegistry<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use tokio_test::assert_ok;

    use super::*;

    struct MapSource {
        rows: Vec<(&'static str, &'static str)>,
    }

    #[async_trait]
    impl NodeSource<String> for MapSource {
        async fn fetch_by_id(&self, local_key: &str) -> anyhow::Result<Option<String>> {
            Ok(self
                .rows
                .iter()
                .find(|(key, _)| *key == local_key)
                .map(|(_, title)| title.to_string()))
        }

        async fn fetch_all(&self) -> anyhow::Result<Vec<String>> {
            Ok(self.rows.iter().map(|(_, title)| title.to_string()).collect())
        }
    }

    struct BrokenSource;

    #[async_trait]
    impl NodeSource<String> for BrokenSource {
        async fn fetch_by_id(&self, _local_key: &str) -> anyhow::Result<Option<String>> {
            anyhow::bail!("backend unavailable")
        }

        async fn fetch_all(&self) -> anyhow::Result<Vec<String>> {
            anyhow::bail!("backend unavailable")
        }
    }

    fn registry() -> NodeRegistry<String> {
        let registry = NodeRegistry::new();
        assert_ok!(registry.register(
            "Video",
            Arc::new(MapSource {
                rows: vec![("a", "Cutting Room Basics"), ("b", "Color Grading 101")],
            }),
        ));
        registry
    }

    #[tokio::test]
    async fn test_resolve_known_id() {
        let registry = registry();
        let id = registry.encode("Video", "a");
        let node = registry.resolve(&id).await.unwrap();
        assert_eq!(node.as_deref(), Some("Cutting Room Basics"));
    }

    #[tokio::test]
    async fn test_resolve_absent_entity_is_none() {
        let registry = registry();
        let id = registry.encode("Video", "zzz");
        assert_eq!(registry.resolve(&id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_resolve_unknown_type() {
        let registry = registry();
        let id = GlobalId::encode("Podcast", "a");
        assert_matches!(
            registry.resolve(&id).await,
            Err(NodeError::UnknownType(tag)) if tag == "Podcast"
        );
    }

    #[tokio::test]
    async fn test_resolve_malformed_id() {
        let registry = registry();
        assert_matches!(
            registry.resolve(&GlobalId::from("not-an-id")).await,
            Err(NodeError::MalformedId { .. })
        );
    }

    #[tokio::test]
    async fn test_source_failure_propagates() {
        let registry = registry();
        assert_ok!(registry.register("Broken", Arc::new(BrokenSource)));
        let id = registry.encode("Broken", "a");
        let err = registry.resolve(&id).await.unwrap_err();
        assert_matches!(&err, NodeError::Source(inner) if inner.to_string() == "backend unavailable");
    }

    #[tokio::test]
    async fn test_fetch_all_lists_in_source_order() {
        let registry = registry();
        let all = registry.fetch_all("Video").await.unwrap();
        assert_eq!(all, vec!["Cutting Room Basics", "Color Grading 101"]);
        assert_matches!(
            registry.fetch_all("Podcast").await,
            Err(NodeError::UnknownType(_))
        );
    }

    #[test]
    fn test_register_rejects_duplicates() {
        let registry = registry();
        let err = registry
            .register("Video", Arc::new(MapSource { rows: vec![] }))
            .unwrap_err();
        assert_matches!(err, NodeError::DuplicateType(tag) if tag == "Video");
    }

    #[test]
    fn test_register_rejects_bad_tags() {
        let registry: NodeRegistry<String> = NodeRegistry::new();
        assert_matches!(
            registry.register("", Arc::new(MapSource { rows: vec![] })),
            Err(NodeError::InvalidTypeTag(_))
        );
        assert_matches!(
            registry.register("Video:HD", Arc::new(MapSource { rows: vec![] })),
            Err(NodeError::InvalidTypeTag(_))
        );
        assert!(!registry.is_registered("Video:HD"));
    }

    #[test]
    fn test_type_tags_reflect_registration() {
        let registry = registry();
        assert!(registry.is_registered("Video"));
        assert_eq!(registry.type_tags(), vec!["Video".to_string()]);
    }
}
