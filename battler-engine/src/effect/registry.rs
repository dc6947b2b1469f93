use std::sync::Arc;

use anyhow::Result;
use once_cell::sync::OnceCell;

use crate::{
    common::{
        FastHashMap,
        FastHashSet,
    },
    effect::{
        CapabilityDescriptor,
        EventIdentity,
    },
    error::configuration_error,
};

/// The handlers one effect implements, keyed by [`EventIdentity`].
///
/// The lookup table is built on first query and never changes afterwards.
pub struct HandlerCache {
    declared: Vec<Arc<CapabilityDescriptor>>,
    cache: OnceCell<FastHashMap<EventIdentity, Arc<CapabilityDescriptor>>>,
}

impl HandlerCache {
    /// Creates a cache over the declared descriptors.
    ///
    /// Fails if two descriptors share an identity, since an effect implements at most one handler
    /// per identity.
    pub fn new(declared: Vec<CapabilityDescriptor>) -> Result<Self> {
        let mut seen = FastHashSet::default();
        for descriptor in &declared {
            if !seen.insert(descriptor.identity()) {
                return Err(configuration_error(format!(
                    "duplicate handler for {}",
                    descriptor.identity()
                )));
            }
        }
        Ok(Self {
            declared: declared.into_iter().map(Arc::new).collect(),
            cache: OnceCell::new(),
        })
    }

    /// Does the effect implement any handler at all?
    pub fn has_any_handlers(&self) -> bool {
        !self.declared.is_empty()
    }

    /// The handler for the identity, if the effect implements one.
    pub fn handler(&self, identity: &EventIdentity) -> Option<&Arc<CapabilityDescriptor>> {
        if !self.has_any_handlers() {
            return None;
        }
        self.cache
            .get_or_init(|| Self::build_cache(&self.declared))
            .get(identity)
    }

    /// Has the lookup table been built yet?
    pub fn is_built(&self) -> bool {
        self.cache.get().is_some()
    }

    /// All declared descriptors, in declaration order.
    pub fn declared(&self) -> impl Iterator<Item = &Arc<CapabilityDescriptor>> {
        self.declared.iter()
    }

    fn build_cache(
        declared: &[Arc<CapabilityDescriptor>],
    ) -> FastHashMap<EventIdentity, Arc<CapabilityDescriptor>> {
        declared
            .iter()
            .map(|descriptor| (descriptor.identity(), descriptor.clone()))
            .collect()
    }
}

#[cfg(test)]
mod registry_test {
    use battler_test_utils::assert_error_message;

    use crate::effect::{
        CapabilityDescriptor,
        EventIdentity,
        EventKind,
        EventSuffix,
        HandlerCache,
        RelayValue,
    };

    #[test]
    fn builds_lazily_and_looks_up_by_identity() {
        let cache = HandlerCache::new(vec![
            CapabilityDescriptor::builder(EventKind::Start)
                .context(|_| Ok(Some(RelayValue::Boolean(true))))
                .unwrap(),
            CapabilityDescriptor::builder(
                EventIdentity::new(EventKind::Start).with_suffix(EventSuffix::Side),
            )
            .context(|_| Ok(None))
            .unwrap(),
        ])
        .unwrap();
        assert!(!cache.is_built());
        assert!(cache.has_any_handlers());

        let generic = cache.handler(&EventIdentity::new(EventKind::Start)).unwrap();
        assert_eq!(generic.identity(), EventIdentity::new(EventKind::Start));
        assert!(cache.is_built());

        let side = cache
            .handler(&EventIdentity::new(EventKind::Start).with_suffix(EventSuffix::Side))
            .unwrap();
        assert_eq!(side.identity().suffix, Some(EventSuffix::Side));
        assert!(cache.handler(&EventIdentity::new(EventKind::End)).is_none());
    }

    #[test]
    fn inert_effects_never_build() {
        let cache = HandlerCache::new(Vec::new()).unwrap();
        assert!(!cache.has_any_handlers());
        assert!(cache.handler(&EventIdentity::new(EventKind::Residual)).is_none());
        assert!(!cache.is_built());
    }

    #[test]
    fn rejects_duplicate_identities() {
        let descriptor = || {
            CapabilityDescriptor::builder(EventKind::Residual)
                .context(|_| Ok(None))
                .unwrap()
        };
        assert_error_message(
            HandlerCache::new(vec![descriptor(), descriptor()]),
            "invalid configuration: duplicate handler for Residual",
        );
    }
}
