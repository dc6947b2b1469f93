//! Effects and the events they handle.
//!
//! An [`EffectDefinition`] declares its handlers as [`CapabilityDescriptor`]s, one per
//! [`EventIdentity`]. The battle finds the handlers of every effect in scope of an event and
//! runs them in order, passing a [`RelayValue`] from one handler to the next.

mod context;
mod definition;
mod descriptor;
mod effect_state;
mod event;
mod registry;
mod relay;
mod signature;

pub use context::{
    DispatchContext,
    EventTarget,
};
pub use definition::{
    EffectBuilder,
    EffectDefinition,
    EffectKind,
};
pub use descriptor::{
    Argument,
    Arguments,
    CapabilityDescriptor,
    ContextHandler,
    DescriptorBuilder,
    FixedHandler,
    InvocationForm,
};
pub use effect_state::{
    AppliedEffect,
    EffectOrigin,
    EffectState,
};
pub use event::{
    EventIdentity,
    EventKind,
    EventPrefix,
    EventSuffix,
};
pub use registry::HandlerCache;
pub use relay::RelayValue;
pub use signature::{
    CommonSignature,
    ParameterType,
    ReturnFlag,
};
