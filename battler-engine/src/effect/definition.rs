use std::{
    fmt,
    sync::Arc,
};

use anyhow::Result;
use serde_string_enum::{
    DeserializeLabeledStringEnum,
    SerializeLabeledStringEnum,
};

use crate::{
    common::Id,
    dex::MoveData,
    effect::{
        CapabilityDescriptor,
        EventIdentity,
        HandlerCache,
    },
    error::WrapResultError,
};

/// The kind of content an effect is.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    SerializeLabeledStringEnum,
    DeserializeLabeledStringEnum,
)]
pub enum EffectKind {
    #[string = "Ability"]
    Ability,
    #[string = "Item"]
    Item,
    /// A major status, of which a Mon has at most one.
    #[string = "Status"]
    Status,
    /// A condition attached to a single Mon while it stays active.
    #[string = "Volatile"]
    Volatile,
    #[string = "SideCondition"]
    SideCondition,
    #[string = "SlotCondition"]
    SlotCondition,
    #[string = "Weather"]
    Weather,
    #[string = "Terrain"]
    Terrain,
    #[string = "PseudoWeather"]
    PseudoWeather,
    #[string = "Move"]
    Move,
    /// A format rule, applied to the whole battle.
    #[string = "Format"]
    Format,
}

impl EffectKind {
    /// The sub-order used for handlers that do not declare one.
    pub fn default_sub_order(&self) -> u32 {
        match self {
            Self::Volatile => 2,
            Self::SlotCondition => 3,
            Self::SideCondition => 4,
            Self::Weather | Self::Terrain | Self::PseudoWeather | Self::Format => 5,
            Self::Ability => 7,
            Self::Item => 8,
            Self::Status | Self::Move => 0,
        }
    }
}

/// A piece of content that can hook into battle events.
pub struct EffectDefinition {
    id: Id,
    name: String,
    kind: EffectKind,
    duration: Option<u8>,
    move_data: Option<MoveData>,
    handlers: HandlerCache,
}

impl EffectDefinition {
    /// Starts building an effect.
    pub fn builder<S>(name: S, kind: EffectKind) -> EffectBuilder
    where
        S: Into<String>,
    {
        EffectBuilder::new(name.into(), kind)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> EffectKind {
        self.kind
    }

    /// The number of turns the effect lasts once applied, if limited.
    pub fn duration(&self) -> Option<u8> {
        self.duration
    }

    /// Move data, for moves.
    pub fn move_data(&self) -> Option<&MoveData> {
        self.move_data.as_ref()
    }

    pub fn has_any_handlers(&self) -> bool {
        self.handlers.has_any_handlers()
    }

    /// The handler for the identity, if the effect implements one.
    pub fn handler(&self, identity: &EventIdentity) -> Option<&Arc<CapabilityDescriptor>> {
        self.handlers.handler(identity)
    }

    /// The handler registry of the effect.
    pub fn handlers(&self) -> &HandlerCache {
        &self.handlers
    }
}

impl EffectDefinition {
    pub fn id(&self) -> &Id {
        &self.id
    }
}

impl fmt::Debug for EffectDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectDefinition")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .finish()
    }
}

/// Builder for an [`EffectDefinition`].
pub struct EffectBuilder {
    name: String,
    kind: EffectKind,
    duration: Option<u8>,
    move_data: Option<MoveData>,
    descriptors: Vec<CapabilityDescriptor>,
}

impl EffectBuilder {
    fn new(name: String, kind: EffectKind) -> Self {
        Self {
            name,
            kind,
            duration: None,
            move_data: None,
            descriptors: Vec::new(),
        }
    }

    pub fn duration(mut self, duration: u8) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn move_data(mut self, move_data: MoveData) -> Self {
        self.move_data = Some(move_data);
        self
    }

    /// Adds a handler.
    pub fn on(mut self, descriptor: CapabilityDescriptor) -> Self {
        self.descriptors.push(descriptor);
        self
    }

    /// Builds the effect.
    pub fn build(self) -> Result<Arc<EffectDefinition>> {
        let id = Id::from(self.name.as_str());
        let handlers = HandlerCache::new(self.descriptors)
            .wrap_error_with_format(format_args!("invalid handlers for effect {id}"))?;
        Ok(Arc::new(EffectDefinition {
            id,
            name: self.name,
            kind: self.kind,
            duration: self.duration,
            move_data: self.move_data,
            handlers,
        }))
    }
}
