use std::fmt::Display;

use anyhow::Error;
use thiserror::Error;

use crate::error::WrapError;

/// A general error, consisting of only a message.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct GeneralError {
    message: String,
}

impl GeneralError {
    /// Constructs a new general error.
    pub fn new<M>(message: M) -> Self
    where
        M: Display,
    {
        Self {
            message: message.to_string(),
        }
    }
}

/// A not found error.
#[derive(Error, Debug)]
#[error("{target} not found")]
pub struct NotFoundError {
    target: String,
}

impl NotFoundError {
    /// Constructs a new not found error.
    pub fn new<M>(target: M) -> Self
    where
        M: Display,
    {
        Self {
            target: target.to_string(),
        }
    }
}

/// An error in how content or a battle was put together.
///
/// Raised while descriptors, effects, actions, or battles are constructed. A configuration error
/// is an authoring bug and is never expected to surface while a battle is running.
#[derive(Error, Debug)]
#[error("invalid configuration: {message}")]
pub struct ConfigurationError {
    message: String,
}

impl ConfigurationError {
    /// Constructs a new configuration error.
    pub fn new<M>(message: M) -> Self
    where
        M: Display,
    {
        Self {
            message: message.to_string(),
        }
    }

    /// The message describing what is wrong.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A broken contract between the dispatcher and a handler, detected at call time.
///
/// Aborts the event in flight. The battle cannot continue in a consistent state afterwards.
#[derive(Error, Debug)]
#[error("contract violation in {event}: {message}")]
pub struct ContractViolationError {
    event: String,
    message: String,
}

impl ContractViolationError {
    /// Constructs a new contract violation for the given event.
    pub fn new<E, M>(event: E, message: M) -> Self
    where
        E: Display,
        M: Display,
    {
        Self {
            event: event.to_string(),
            message: message.to_string(),
        }
    }

    /// The event that was being dispatched.
    pub fn event(&self) -> &str {
        &self.event
    }
}

/// Helper for an [`struct@Error`] wrapping a [`GeneralError`].
#[track_caller]
pub fn general_error<M>(message: M) -> Error
where
    M: Display,
{
    GeneralError::new(message).wrap_error()
}

/// Helper for an [`struct@Error`] wrapping a [`NotFoundError`].
#[track_caller]
pub fn not_found_error<M>(target: M) -> Error
where
    M: Display,
{
    NotFoundError::new(target).wrap_error()
}

/// Helper for an [`struct@Error`] wrapping a [`ConfigurationError`].
#[track_caller]
pub fn configuration_error<M>(message: M) -> Error
where
    M: Display,
{
    ConfigurationError::new(message).wrap_error()
}

/// Helper for an [`struct@Error`] wrapping a [`ContractViolationError`].
#[track_caller]
pub fn contract_violation_error<E, M>(event: E, message: M) -> Error
where
    E: Display,
    M: Display,
{
    ContractViolationError::new(event, message).wrap_error()
}
