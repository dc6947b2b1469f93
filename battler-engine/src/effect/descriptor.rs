use std::{
    fmt,
    sync::Arc,
};

use anyhow::Result;
use itertools::Itertools;

use crate::{
    battle::{
        CoreBattle,
        MonHandle,
    },
    effect::{
        DispatchContext,
        EffectDefinition,
        EventIdentity,
        ParameterType,
        RelayValue,
    },
    error::{
        WrapOptionError,
        configuration_error,
        contract_violation_error,
    },
};

/// A resolved argument passed to a fixed-form handler.
#[derive(Clone)]
pub enum Argument {
    Relay(RelayValue),
    Mon(MonHandle),
    Side(usize),
    Effect(Arc<EffectDefinition>),
}

impl fmt::Debug for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Relay(value) => write!(f, "Relay({value})"),
            Self::Mon(mon) => write!(f, "Mon({mon})"),
            Self::Side(side) => write!(f, "Side({side})"),
            Self::Effect(effect) => write!(f, "Effect({})", effect.id()),
        }
    }
}

/// The ordered arguments of a fixed-form handler call.
///
/// Accessors fail when the position is absent or holds a different kind of argument, so handlers
/// can use `?` rather than matching every position.
#[derive(Debug)]
pub struct Arguments {
    values: Vec<Option<Argument>>,
}

impl Arguments {
    pub(crate) fn new(values: Vec<Option<Argument>>) -> Self {
        Self { values }
    }

    /// The number of positions, including absent ones.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Checks if there are no positions at all.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The argument at the position, if present.
    pub fn get(&self, position: usize) -> Option<&Argument> {
        self.values.get(position).and_then(|value| value.as_ref())
    }

    pub fn optional_mon(&self, position: usize) -> Option<MonHandle> {
        match self.get(position) {
            Some(Argument::Mon(mon)) => Some(*mon),
            _ => None,
        }
    }

    pub fn mon(&self, position: usize) -> Result<MonHandle> {
        self.optional_mon(position)
            .wrap_expectation_with_format(format_args!("expected mon at position {position}"))
    }

    pub fn side(&self, position: usize) -> Result<usize> {
        match self.get(position) {
            Some(Argument::Side(side)) => Ok(*side),
            _ => None.wrap_expectation_with_format(format_args!(
                "expected side at position {position}"
            )),
        }
    }

    pub fn relay(&self, position: usize) -> Result<&RelayValue> {
        match self.get(position) {
            Some(Argument::Relay(value)) => Ok(value),
            _ => None.wrap_expectation_with_format(format_args!(
                "expected relay value at position {position}"
            )),
        }
    }

    pub fn optional_effect(&self, position: usize) -> Option<&Arc<EffectDefinition>> {
        match self.get(position) {
            Some(Argument::Effect(effect)) => Some(effect),
            _ => None,
        }
    }

    pub fn effect(&self, position: usize) -> Result<&Arc<EffectDefinition>> {
        self.optional_effect(position)
            .wrap_expectation_with_format(format_args!("expected effect at position {position}"))
    }
}

/// A handler taking the battle and a fixed list of arguments.
pub type FixedHandler =
    Arc<dyn Fn(&mut CoreBattle, &Arguments) -> Result<Option<RelayValue>> + Send + Sync>;

/// A handler taking a [`DispatchContext`].
pub type ContextHandler =
    Arc<dyn Fn(&mut DispatchContext) -> Result<Option<RelayValue>> + Send + Sync>;

/// How a handler is called.
#[derive(Clone)]
pub enum InvocationForm {
    /// A callable with a fixed parameter list, checked against the event's parameters.
    Fixed {
        parameters: Vec<ParameterType>,
        handler: FixedHandler,
    },
    /// A callable taking the whole dispatch context.
    Context(ContextHandler),
}

impl fmt::Debug for InvocationForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed { parameters, .. } => {
                write!(f, "Fixed([{}])", parameters.iter().join(", "))
            }
            Self::Context(_) => write!(f, "Context"),
        }
    }
}

/// A typed description of one hook an effect implements.
///
/// Descriptors are validated when constructed and are immutable afterwards.
#[derive(Debug, Clone)]
pub struct CapabilityDescriptor {
    identity: EventIdentity,
    form: InvocationForm,
    parameter_nullability: Vec<bool>,
    return_nullable: bool,
    priority: i32,
    order: Option<u32>,
    sub_order: Option<u32>,
    uses_speed: bool,
}

impl CapabilityDescriptor {
    /// Starts building a descriptor for the given event.
    pub fn builder<I>(identity: I) -> DescriptorBuilder
    where
        I: Into<EventIdentity>,
    {
        DescriptorBuilder::new(identity.into())
    }

    pub fn identity(&self) -> EventIdentity {
        self.identity
    }

    pub fn form(&self) -> &InvocationForm {
        &self.form
    }

    pub fn parameter_nullability(&self) -> &[bool] {
        &self.parameter_nullability
    }

    pub fn return_nullable(&self) -> bool {
        self.return_nullable
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn order(&self) -> Option<u32> {
        self.order
    }

    pub fn sub_order(&self) -> Option<u32> {
        self.sub_order
    }

    pub fn uses_speed(&self) -> bool {
        self.uses_speed
    }

    /// Checks that the descriptor's metadata is internally consistent.
    pub fn validate(&self) -> Result<()> {
        let identity = self.identity;
        if let InvocationForm::Fixed { parameters, .. } = &self.form {
            if parameters.len() != self.parameter_nullability.len() {
                return Err(configuration_error(format!(
                    "{identity} handler declares {} parameter types but {} nullability flags",
                    parameters.len(),
                    self.parameter_nullability.len()
                )));
            }
            let expected = identity.parameters();
            if parameters.as_slice() != expected {
                return Err(configuration_error(format!(
                    "{identity} handler declares parameters [{}] but the event passes [{}]",
                    parameters.iter().join(", "),
                    expected.iter().join(", ")
                )));
            }
        } else if !self.parameter_nullability.is_empty() {
            return Err(configuration_error(format!(
                "{identity} context handler cannot declare parameter nullability"
            )));
        }
        if identity.prefix.is_some() && !identity.kind.has_prefixed_variants() {
            return Err(configuration_error(format!(
                "{} has no prefixed variants, so {identity} cannot be handled",
                identity.kind
            )));
        }
        if identity.suffix.is_some() && !identity.kind.has_suffixed_variants() {
            return Err(configuration_error(format!(
                "{} has no suffixed variants, so {identity} cannot be handled",
                identity.kind
            )));
        }
        if identity.prefix.is_some() && identity.suffix.is_some() {
            return Err(configuration_error(format!(
                "{identity} cannot have both a prefix and a suffix"
            )));
        }
        if self.order == Some(0) {
            return Err(configuration_error(format!(
                "{identity} handler order must be at least 1"
            )));
        }
        Ok(())
    }

    /// Checks the arguments of a call against the nullability contract.
    pub fn check_arguments(&self, values: &[Option<Argument>]) -> Result<()> {
        if let InvocationForm::Fixed { parameters, .. } = &self.form {
            if values.len() != parameters.len() {
                return Err(contract_violation_error(
                    self.identity,
                    format!(
                        "handler takes {} arguments but received {}",
                        parameters.len(),
                        values.len()
                    ),
                ));
            }
            for (position, (value, nullable)) in values
                .iter()
                .zip(self.parameter_nullability.iter())
                .enumerate()
            {
                if value.is_none() && !nullable {
                    return Err(contract_violation_error(
                        self.identity,
                        format!(
                            "argument at position {position} ({}) is absent but not nullable",
                            parameters[position]
                        ),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Checks a handler's result against the event's allowed return shapes.
    pub fn check_return(&self, value: &Option<RelayValue>) -> Result<()> {
        match value {
            None if !self.return_nullable => Err(contract_violation_error(
                self.identity,
                "handler returned nothing but its return value is not nullable",
            )),
            Some(value) if self.identity.kind.return_flags() & value.return_flag() == 0 => {
                Err(contract_violation_error(
                    self.identity,
                    format!("handler returned {value}, which the event does not accept"),
                ))
            }
            _ => Ok(()),
        }
    }
}

/// Builder for a [`CapabilityDescriptor`].
///
/// Finishing with [`DescriptorBuilder::fixed`] or [`DescriptorBuilder::context`] validates the
/// descriptor.
pub struct DescriptorBuilder {
    identity: EventIdentity,
    parameter_nullability: Option<Vec<bool>>,
    return_nullable: bool,
    priority: i32,
    order: Option<u32>,
    sub_order: Option<u32>,
    uses_speed: bool,
}

impl DescriptorBuilder {
    fn new(identity: EventIdentity) -> Self {
        Self {
            identity,
            parameter_nullability: None,
            return_nullable: true,
            priority: 0,
            order: None,
            sub_order: None,
            uses_speed: identity.kind.uses_speed(),
        }
    }

    /// Declares which fixed-form parameters may be absent.
    ///
    /// When omitted, no parameter may be absent.
    pub fn nullability<I>(mut self, nullability: I) -> Self
    where
        I: IntoIterator<Item = bool>,
    {
        self.parameter_nullability = Some(nullability.into_iter().collect());
        self
    }

    pub fn return_nullable(mut self, return_nullable: bool) -> Self {
        self.return_nullable = return_nullable;
        self
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn order(mut self, order: u32) -> Self {
        self.order = Some(order);
        self
    }

    pub fn sub_order(mut self, sub_order: u32) -> Self {
        self.sub_order = Some(sub_order);
        self
    }

    pub fn uses_speed(mut self, uses_speed: bool) -> Self {
        self.uses_speed = uses_speed;
        self
    }

    /// Finishes the descriptor with a fixed-form handler.
    pub fn fixed<F>(self, parameters: Vec<ParameterType>, handler: F) -> Result<CapabilityDescriptor>
    where
        F: Fn(&mut CoreBattle, &Arguments) -> Result<Option<RelayValue>> + Send + Sync + 'static,
    {
        let nullability = match &self.parameter_nullability {
            Some(nullability) => nullability.clone(),
            None => vec![false; parameters.len()],
        };
        self.finish(
            InvocationForm::Fixed {
                parameters,
                handler: Arc::new(handler),
            },
            nullability,
        )
    }

    /// Finishes the descriptor with a fixed-form handler using the event's own parameter list.
    pub fn fixed_default<F>(self, handler: F) -> Result<CapabilityDescriptor>
    where
        F: Fn(&mut CoreBattle, &Arguments) -> Result<Option<RelayValue>> + Send + Sync + 'static,
    {
        let parameters = self.identity.parameters().to_vec();
        self.fixed(parameters, handler)
    }

    /// Finishes the descriptor with a context handler.
    pub fn context<F>(self, handler: F) -> Result<CapabilityDescriptor>
    where
        F: Fn(&mut DispatchContext) -> Result<Option<RelayValue>> + Send + Sync + 'static,
    {
        let nullability = self.parameter_nullability.clone().unwrap_or_default();
        self.finish(InvocationForm::Context(Arc::new(handler)), nullability)
    }

    fn finish(
        self,
        form: InvocationForm,
        parameter_nullability: Vec<bool>,
    ) -> Result<CapabilityDescriptor> {
        let descriptor = CapabilityDescriptor {
            identity: self.identity,
            form,
            parameter_nullability,
            return_nullable: self.return_nullable,
            priority: self.priority,
            order: self.order,
            sub_order: self.sub_order,
            uses_speed: self.uses_speed,
        };
        descriptor.validate()?;
        Ok(descriptor)
    }
}
