use serde_string_enum::{
    DeserializeLabeledStringEnum,
    SerializeLabeledStringEnum,
};

/// The semantic type of one fixed-form handler parameter.
///
/// The battle itself is always passed to fixed-form handlers and is not part of the parameter list.
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
pub enum ParameterType {
    /// The relay value at the time the handler runs.
    #[string = "Relay"]
    Relay,
    /// The Mon the event targets.
    #[string = "TargetMon"]
    TargetMon,
    /// The Mon responsible for the event.
    #[string = "SourceMon"]
    SourceMon,
    /// The single participant of a legacy-form hook.
    ///
    /// Resolves to the target Mon, falling back to the source Mon when there is no target.
    #[string = "Mon"]
    Mon,
    /// The side the event targets.
    #[string = "Side"]
    Side,
    /// The effect that triggered the event, such as the move being used.
    #[string = "SourceEffect"]
    SourceEffect,
}

/// Flags describing which relay value shapes a handler may return.
#[allow(non_snake_case)]
#[allow(non_upper_case_globals)]
pub mod ReturnFlag {
    pub const ReturnsBoolean: u32 = 1 << 0;
    pub const ReturnsNumber: u32 = 1 << 1;
    pub const ReturnsVoid: u32 = 1 << 2;
    pub const ReturnsMon: u32 = 1 << 3;
    pub const ReturnsEffect: u32 = 1 << 4;
    pub const ReturnsString: u32 = 1 << 5;
}

/// Parameter shapes shared by many events.
///
/// - `ApplyingEffect` - An effect being applied to a target Mon, potentially from a source Mon.
/// - `ApplyingEffectModifier` - Same as `ApplyingEffect`, with the relay value first.
/// - `Mon` - A hook on a single Mon with no associated effect.
/// - `MonModifier` - Same as `Mon`, with the relay value first.
/// - `Side` - A hook on a side, potentially from a source Mon.
/// - `Field` - A hook on the field, potentially from a source Mon.
/// - `FieldModifier` - Same as `Field`, with the relay value first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommonSignature {
    ApplyingEffect,
    ApplyingEffectModifier,
    Mon,
    MonModifier,
    Side,
    Field,
    FieldModifier,
}

impl CommonSignature {
    /// The ordered parameter list of the signature.
    pub fn parameters(&self) -> &'static [ParameterType] {
        match self {
            Self::ApplyingEffect => &[
                ParameterType::TargetMon,
                ParameterType::SourceMon,
                ParameterType::SourceEffect,
            ],
            Self::ApplyingEffectModifier => &[
                ParameterType::Relay,
                ParameterType::TargetMon,
                ParameterType::SourceMon,
                ParameterType::SourceEffect,
            ],
            Self::Mon => &[ParameterType::Mon],
            Self::MonModifier => &[ParameterType::Relay, ParameterType::Mon],
            Self::Side => &[
                ParameterType::Side,
                ParameterType::SourceMon,
                ParameterType::SourceEffect,
            ],
            Self::Field => &[ParameterType::SourceMon, ParameterType::SourceEffect],
            Self::FieldModifier => &[
                ParameterType::Relay,
                ParameterType::SourceMon,
                ParameterType::SourceEffect,
            ],
        }
    }
}
