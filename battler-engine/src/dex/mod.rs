//! Read-only access to battle content.
//!
//! The engine never loads content itself. Embedding programs build [`EffectDefinition`]s however
//! they like and expose them through an [`EffectLookup`].

mod move_data;

use std::sync::Arc;

use anyhow::Result;

pub use move_data::{
    MoveCategory,
    MoveData,
    MoveTarget,
    SecondaryEffect,
};

use crate::{
    common::{
        FastHashMap,
        Id,
    },
    conditions,
    effect::EffectDefinition,
    error::configuration_error,
};

/// Looks up content by ID.
pub trait EffectLookup: Send + Sync {
    /// Looks up an effect by ID.
    fn effect(&self, id: &Id) -> Option<Arc<EffectDefinition>>;
}

/// An in-memory [`EffectLookup`].
#[derive(Default)]
pub struct StaticDex {
    effects: FastHashMap<Id, Arc<EffectDefinition>>,
}

impl StaticDex {
    /// Creates an empty dex.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a dex holding the engine's built-in conditions.
    pub fn with_builtins() -> Result<Self> {
        let mut dex = Self::new();
        for effect in conditions::builtin_conditions()? {
            dex.insert(effect)?;
        }
        Ok(dex)
    }

    /// Adds an effect.
    ///
    /// Fails if another effect already uses the same ID.
    pub fn insert(&mut self, effect: Arc<EffectDefinition>) -> Result<()> {
        let id = effect.id().clone();
        if self.effects.contains_key(&id) {
            return Err(configuration_error(format!("effect {id} is defined twice")));
        }
        self.effects.insert(id, effect);
        Ok(())
    }

    /// Adds many effects.
    pub fn extend<I>(&mut self, effects: I) -> Result<()>
    where
        I: IntoIterator<Item = Arc<EffectDefinition>>,
    {
        for effect in effects {
            self.insert(effect)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

impl EffectLookup for StaticDex {
    fn effect(&self, id: &Id) -> Option<Arc<EffectDefinition>> {
        self.effects.get(id).cloned()
    }
}
