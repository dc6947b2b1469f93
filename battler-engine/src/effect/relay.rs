use std::{
    fmt,
    fmt::Display,
};

use crate::{
    battle::MonHandle,
    common::Id,
    effect::ReturnFlag,
};

/// The value threaded through every handler of one event.
///
/// Each handler may pass it through unchanged by returning nothing, replace it, or stop the event
/// by returning a falsy value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayValue {
    /// No meaningful value.
    Void,
    Boolean(bool),
    Integer(i64),
    Mon(MonHandle),
    Effect(Id),
    Text(String),
}

impl RelayValue {
    /// Does the value let the event continue?
    ///
    /// `false` and `0` are falsy. Every other value is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Boolean(value) => *value,
            Self::Integer(value) => *value != 0,
            Self::Void | Self::Mon(_) | Self::Effect(_) | Self::Text(_) => true,
        }
    }

    /// Does the value stop propagation to the remaining handlers?
    pub fn is_stop(&self) -> bool {
        !self.is_truthy()
    }

    /// The [`ReturnFlag`] matching the shape of the value.
    pub fn return_flag(&self) -> u32 {
        match self {
            Self::Void => ReturnFlag::ReturnsVoid,
            Self::Boolean(_) => ReturnFlag::ReturnsBoolean,
            Self::Integer(_) => ReturnFlag::ReturnsNumber,
            Self::Mon(_) => ReturnFlag::ReturnsMon,
            Self::Effect(_) => ReturnFlag::ReturnsEffect,
            Self::Text(_) => ReturnFlag::ReturnsString,
        }
    }

    pub fn integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn boolean(&self) -> Option<bool> {
        match self {
            Self::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    pub fn mon(&self) -> Option<MonHandle> {
        match self {
            Self::Mon(mon) => Some(*mon),
            _ => None,
        }
    }

    pub fn effect(&self) -> Option<&Id> {
        match self {
            Self::Effect(id) => Some(id),
            _ => None,
        }
    }

    /// Interprets the value as an amount, clamping negative integers to zero.
    ///
    /// `false` is zero and `true` is the given default.
    pub fn amount_or(&self, default: u32) -> u32 {
        match self {
            Self::Integer(value) => (*value).clamp(0, u32::MAX as i64) as u32,
            Self::Boolean(false) => 0,
            _ => default,
        }
    }
}

impl Display for RelayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Void => write!(f, "void"),
            Self::Boolean(value) => write!(f, "{value}"),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Mon(mon) => write!(f, "mon {mon}"),
            Self::Effect(id) => write!(f, "effect {id}"),
            Self::Text(text) => write!(f, "\"{text}\""),
        }
    }
}

impl From<bool> for RelayValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i64> for RelayValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<u32> for RelayValue {
    fn from(value: u32) -> Self {
        Self::Integer(value as i64)
    }
}

impl From<MonHandle> for RelayValue {
    fn from(value: MonHandle) -> Self {
        Self::Mon(value)
    }
}

#[cfg(test)]
mod relay_test {
    use crate::{
        battle::MonHandle,
        common::Id,
        effect::RelayValue,
    };

    #[test]
    fn falsy_values_stop_propagation() {
        assert!(RelayValue::Boolean(false).is_stop());
        assert!(RelayValue::Integer(0).is_stop());
        assert!(!RelayValue::Void.is_stop());
        assert!(!RelayValue::Integer(-3).is_stop());
        assert!(!RelayValue::Mon(MonHandle::new(0)).is_stop());
        assert!(!RelayValue::Effect(Id::from("par")).is_stop());
    }

    #[test]
    fn converts_to_amounts() {
        assert_eq!(RelayValue::Integer(40).amount_or(10), 40);
        assert_eq!(RelayValue::Integer(-4).amount_or(10), 0);
        assert_eq!(RelayValue::Boolean(false).amount_or(10), 0);
        assert_eq!(RelayValue::Boolean(true).amount_or(10), 10);
    }
}
