use std::{
    fmt,
    fmt::Display,
};

use serde_string_enum::{
    DeserializeLabeledStringEnum,
    SerializeLabeledStringEnum,
};

use crate::effect::signature::{
    CommonSignature,
    ParameterType,
    ReturnFlag,
};

/// A hook point in the battle lifecycle that effects can implement.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    SerializeLabeledStringEnum,
    DeserializeLabeledStringEnum,
)]
pub enum EventKind {
    /// Runs when the accuracy of a move against a target is determined.
    ///
    /// The relay value is the accuracy percentage, or `true` if the move cannot miss.
    #[string = "Accuracy"]
    Accuracy,
    /// Runs before a volatile condition is added to a Mon.
    ///
    /// The relay value is the volatile being added. Returning `false` prevents it.
    #[string = "AddVolatile"]
    AddVolatile,
    /// Runs after a Mon finishes using a move.
    #[string = "AfterMove"]
    AfterMove,
    /// Runs after a Mon's status is successfully set.
    #[string = "AfterSetStatus"]
    AfterSetStatus,
    /// Runs when the base power of a move is calculated.
    ///
    /// Runs on the move user, with the move as the source effect.
    #[string = "BasePower"]
    BasePower,
    /// Runs before a Mon uses a move.
    ///
    /// Returning `false` prevents the move from being used.
    #[string = "BeforeMove"]
    BeforeMove,
    /// Runs before a Mon switches out.
    #[string = "BeforeSwitchOut"]
    BeforeSwitchOut,
    /// Runs on every active Mon before the turn's actions execute.
    #[string = "BeforeTurn"]
    BeforeTurn,
    /// Runs when a Mon's status is cured.
    #[string = "CureStatus"]
    CureStatus,
    /// Runs before a Mon takes damage.
    ///
    /// The relay value is the damage amount. Returning `false` or `0` prevents the damage.
    #[string = "Damage"]
    Damage,
    /// Runs after a move deals damage to a target.
    ///
    /// The relay value is the damage dealt.
    #[string = "DamagingHit"]
    DamagingHit,
    /// Runs when PP is deducted from a move.
    ///
    /// The relay value is the amount of PP to deduct.
    #[string = "DeductPp"]
    DeductPp,
    /// Runs when the moves a Mon can select are determined.
    #[string = "DisableMove"]
    DisableMove,
    /// Runs when an effect ends.
    ///
    /// Only runs on the effect itself.
    #[string = "End"]
    End,
    /// Runs when a Mon faints.
    #[string = "Faint"]
    Faint,
    /// Runs before a Mon is healed.
    ///
    /// The relay value is the amount healed. Returning `false` or `0` prevents the healing.
    #[string = "Heal"]
    Heal,
    /// Runs when a move hits its target.
    ///
    /// Only runs on the move itself. Status moves rely on this hook to do anything.
    #[string = "Hit"]
    Hit,
    /// Runs when checking if a Mon is immune to an effect.
    ///
    /// The relay value is the effect. Returning `false` makes the Mon immune.
    #[string = "Immunity"]
    Immunity,
    /// Runs when modifying the accuracy of a move against a target.
    #[string = "ModifyAccuracy"]
    ModifyAccuracy,
    /// Runs when calculating a Mon's Attack stat.
    #[string = "ModifyAtk"]
    ModifyAtk,
    /// Runs when modifying the damage a move deals to a target.
    #[string = "ModifyDamage"]
    ModifyDamage,
    /// Runs when calculating a Mon's Defense stat.
    #[string = "ModifyDef"]
    ModifyDef,
    /// Runs when the priority of a move is determined.
    #[string = "ModifyPriority"]
    ModifyPriority,
    /// Runs when calculating a Mon's Special Attack stat.
    #[string = "ModifySpA"]
    ModifySpA,
    /// Runs when calculating a Mon's Special Defense stat.
    #[string = "ModifySpD"]
    ModifySpD,
    /// Runs when calculating a Mon's Speed stat.
    #[string = "ModifySpe"]
    ModifySpe,
    /// Runs when the target of a move is determined.
    ///
    /// The relay value is the current target. The first handler to return a Mon wins.
    #[string = "RedirectTarget"]
    RedirectTarget,
    /// Runs at the end of every turn.
    #[string = "Residual"]
    Residual,
    /// Runs when an effect is applied to a holder that already has it.
    ///
    /// Only runs on the effect itself.
    #[string = "Restart"]
    Restart,
    /// Runs before a Mon's status is set.
    ///
    /// The relay value is the status. Returning `false` prevents it.
    #[string = "SetStatus"]
    SetStatus,
    /// Runs before the weather changes.
    ///
    /// The relay value is the new weather. Returning `false` prevents the change.
    #[string = "SetWeather"]
    SetWeather,
    /// Runs when an effect starts.
    ///
    /// Only runs on the effect itself. Returning `false` undoes the effect.
    #[string = "Start"]
    Start,
    /// Runs when a Mon switches in.
    #[string = "SwitchIn"]
    SwitchIn,
    /// Runs when a Mon switches out.
    #[string = "SwitchOut"]
    SwitchOut,
    /// Runs when determining if a Mon can switch out.
    ///
    /// Returning `false` traps the Mon.
    #[string = "TrapMon"]
    TrapMon,
    /// Runs before a move hits its target.
    ///
    /// Returning `false` makes the move fail.
    #[string = "TryHit"]
    TryHit,
    /// Runs before a Mon's move executes, after it has been announced.
    ///
    /// Returning `false` makes the move fail.
    #[string = "TryMove"]
    TryMove,
    /// Runs on every active Mon after every action.
    #[string = "Update"]
    Update,
}

impl EventKind {
    /// The parameter shape shared by fixed-form handlers of this event.
    pub fn signature(&self) -> CommonSignature {
        match self {
            Self::Accuracy => CommonSignature::ApplyingEffectModifier,
            Self::AddVolatile => CommonSignature::ApplyingEffectModifier,
            Self::AfterMove => CommonSignature::ApplyingEffect,
            Self::AfterSetStatus => CommonSignature::ApplyingEffectModifier,
            Self::BasePower => CommonSignature::ApplyingEffectModifier,
            Self::BeforeMove => CommonSignature::ApplyingEffect,
            Self::BeforeSwitchOut => CommonSignature::Mon,
            Self::BeforeTurn => CommonSignature::Mon,
            Self::CureStatus => CommonSignature::ApplyingEffect,
            Self::Damage => CommonSignature::ApplyingEffectModifier,
            Self::DamagingHit => CommonSignature::ApplyingEffectModifier,
            Self::DeductPp => CommonSignature::MonModifier,
            Self::DisableMove => CommonSignature::Mon,
            Self::End => CommonSignature::ApplyingEffect,
            Self::Faint => CommonSignature::ApplyingEffect,
            Self::Heal => CommonSignature::ApplyingEffectModifier,
            Self::Hit => CommonSignature::ApplyingEffect,
            Self::Immunity => CommonSignature::ApplyingEffectModifier,
            Self::ModifyAccuracy => CommonSignature::ApplyingEffectModifier,
            Self::ModifyAtk => CommonSignature::MonModifier,
            Self::ModifyDamage => CommonSignature::ApplyingEffectModifier,
            Self::ModifyDef => CommonSignature::MonModifier,
            Self::ModifyPriority => CommonSignature::ApplyingEffectModifier,
            Self::ModifySpA => CommonSignature::MonModifier,
            Self::ModifySpD => CommonSignature::MonModifier,
            Self::ModifySpe => CommonSignature::MonModifier,
            Self::RedirectTarget => CommonSignature::ApplyingEffectModifier,
            Self::Residual => CommonSignature::ApplyingEffect,
            Self::Restart => CommonSignature::ApplyingEffect,
            Self::SetStatus => CommonSignature::ApplyingEffectModifier,
            Self::SetWeather => CommonSignature::FieldModifier,
            Self::Start => CommonSignature::ApplyingEffect,
            Self::SwitchIn => CommonSignature::Mon,
            Self::SwitchOut => CommonSignature::Mon,
            Self::TrapMon => CommonSignature::Mon,
            Self::TryHit => CommonSignature::ApplyingEffect,
            Self::TryMove => CommonSignature::ApplyingEffect,
            Self::Update => CommonSignature::Mon,
        }
    }

    /// The [`ReturnFlag`] flags of relay values handlers may return.
    pub fn return_flags(&self) -> u32 {
        match self {
            Self::Accuracy => {
                ReturnFlag::ReturnsNumber | ReturnFlag::ReturnsBoolean | ReturnFlag::ReturnsVoid
            }
            Self::AddVolatile => ReturnFlag::ReturnsBoolean | ReturnFlag::ReturnsVoid,
            Self::AfterMove => ReturnFlag::ReturnsVoid,
            Self::AfterSetStatus => ReturnFlag::ReturnsVoid,
            Self::BasePower => ReturnFlag::ReturnsNumber | ReturnFlag::ReturnsVoid,
            Self::BeforeMove => ReturnFlag::ReturnsBoolean | ReturnFlag::ReturnsVoid,
            Self::BeforeSwitchOut => ReturnFlag::ReturnsVoid,
            Self::BeforeTurn => ReturnFlag::ReturnsVoid,
            Self::CureStatus => ReturnFlag::ReturnsVoid,
            Self::Damage => {
                ReturnFlag::ReturnsNumber | ReturnFlag::ReturnsBoolean | ReturnFlag::ReturnsVoid
            }
            Self::DamagingHit => ReturnFlag::ReturnsVoid,
            Self::DeductPp => ReturnFlag::ReturnsNumber | ReturnFlag::ReturnsVoid,
            Self::DisableMove => ReturnFlag::ReturnsVoid,
            Self::End => ReturnFlag::ReturnsVoid,
            Self::Faint => ReturnFlag::ReturnsVoid,
            Self::Heal => {
                ReturnFlag::ReturnsNumber | ReturnFlag::ReturnsBoolean | ReturnFlag::ReturnsVoid
            }
            Self::Hit => ReturnFlag::ReturnsBoolean | ReturnFlag::ReturnsVoid,
            Self::Immunity => ReturnFlag::ReturnsBoolean | ReturnFlag::ReturnsVoid,
            Self::ModifyAccuracy => ReturnFlag::ReturnsNumber | ReturnFlag::ReturnsVoid,
            Self::ModifyAtk => ReturnFlag::ReturnsNumber | ReturnFlag::ReturnsVoid,
            Self::ModifyDamage => ReturnFlag::ReturnsNumber | ReturnFlag::ReturnsVoid,
            Self::ModifyDef => ReturnFlag::ReturnsNumber | ReturnFlag::ReturnsVoid,
            Self::ModifyPriority => ReturnFlag::ReturnsNumber | ReturnFlag::ReturnsVoid,
            Self::ModifySpA => ReturnFlag::ReturnsNumber | ReturnFlag::ReturnsVoid,
            Self::ModifySpD => ReturnFlag::ReturnsNumber | ReturnFlag::ReturnsVoid,
            Self::ModifySpe => ReturnFlag::ReturnsNumber | ReturnFlag::ReturnsVoid,
            Self::RedirectTarget => ReturnFlag::ReturnsMon | ReturnFlag::ReturnsVoid,
            Self::Residual => ReturnFlag::ReturnsVoid,
            Self::Restart => ReturnFlag::ReturnsBoolean | ReturnFlag::ReturnsVoid,
            Self::SetStatus => ReturnFlag::ReturnsBoolean | ReturnFlag::ReturnsVoid,
            Self::SetWeather => ReturnFlag::ReturnsBoolean | ReturnFlag::ReturnsVoid,
            Self::Start => ReturnFlag::ReturnsBoolean | ReturnFlag::ReturnsVoid,
            Self::SwitchIn => ReturnFlag::ReturnsVoid,
            Self::SwitchOut => ReturnFlag::ReturnsVoid,
            Self::TrapMon => ReturnFlag::ReturnsBoolean | ReturnFlag::ReturnsVoid,
            Self::TryHit => ReturnFlag::ReturnsBoolean | ReturnFlag::ReturnsVoid,
            Self::TryMove => ReturnFlag::ReturnsBoolean | ReturnFlag::ReturnsVoid,
            Self::Update => ReturnFlag::ReturnsVoid,
        }
    }

    /// Does the event have [`EventPrefix`] variants?
    ///
    /// Prefixed variants let effects listen to the event on Mons other than their holder.
    pub fn has_prefixed_variants(&self) -> bool {
        matches!(
            self,
            Self::Accuracy
                | Self::AddVolatile
                | Self::AfterMove
                | Self::AfterSetStatus
                | Self::BasePower
                | Self::BeforeMove
                | Self::BeforeSwitchOut
                | Self::CureStatus
                | Self::Damage
                | Self::DamagingHit
                | Self::DeductPp
                | Self::DisableMove
                | Self::Faint
                | Self::Heal
                | Self::Immunity
                | Self::ModifyAccuracy
                | Self::ModifyAtk
                | Self::ModifyDamage
                | Self::ModifyDef
                | Self::ModifyPriority
                | Self::ModifySpA
                | Self::ModifySpD
                | Self::ModifySpe
                | Self::RedirectTarget
                | Self::Residual
                | Self::SetStatus
                | Self::SwitchIn
                | Self::SwitchOut
                | Self::TrapMon
                | Self::TryHit
                | Self::TryMove
        )
    }

    /// Does the event have [`EventSuffix`] variants, fired on field, side, and slot conditions?
    pub fn has_suffixed_variants(&self) -> bool {
        matches!(
            self,
            Self::End
                | Self::Residual
                | Self::Restart
                | Self::Start
        )
    }

    /// Is the event only ever run on a single effect?
    pub fn is_single(&self) -> bool {
        matches!(
            self,
            Self::End
                | Self::Hit
                | Self::Restart
                | Self::Start
        )
    }

    /// Does the order effects were applied in break ties between handlers of this event?
    pub fn uses_effect_order(&self) -> bool {
        matches!(
            self,
            Self::RedirectTarget
                | Self::SwitchIn
        )
    }

    /// Does the holder's speed order handlers of this event by default?
    pub fn uses_speed(&self) -> bool {
        !self.is_single()
    }

    /// Should the dispatcher stop at the first handler that returns any value?
    pub fn is_fast_exit(&self) -> bool {
        matches!(self, Self::RedirectTarget)
    }
}

/// Prefix for an event, selecting which holders relative to the target a handler listens on.
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
pub enum EventPrefix {
    /// Runs when the event targets the holder or one of its allies.
    #[string = "Ally"]
    Ally,
    /// Runs when the event targets an opposing Mon.
    #[string = "Foe"]
    Foe,
    /// Runs when the holder is the source of the event.
    #[string = "Source"]
    Source,
    /// Runs when the event targets any active Mon.
    #[string = "Any"]
    Any,
}

/// Suffix for an event, selecting the kind of holder the event fires on.
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
pub enum EventSuffix {
    /// Fired on a field condition.
    #[string = "Field"]
    Field,
    /// Fired on a side condition.
    #[string = "Side"]
    Side,
    /// Fired on a slot condition.
    #[string = "Slot"]
    Slot,
}

/// The compound key identifying a handler: event kind, prefix, and suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventIdentity {
    pub kind: EventKind,
    pub prefix: Option<EventPrefix>,
    pub suffix: Option<EventSuffix>,
}

impl EventIdentity {
    /// The unprefixed, unsuffixed identity of the event.
    pub const fn new(kind: EventKind) -> Self {
        Self {
            kind,
            prefix: None,
            suffix: None,
        }
    }

    /// The same event, with the given prefix.
    pub const fn with_prefix(mut self, prefix: EventPrefix) -> Self {
        self.prefix = Some(prefix);
        self
    }

    /// The same event, with the given suffix.
    pub const fn with_suffix(mut self, suffix: EventSuffix) -> Self {
        self.suffix = Some(suffix);
        self
    }

    /// The fixed-form parameter list handlers for this identity must declare.
    pub fn parameters(&self) -> &'static [ParameterType] {
        match self.suffix {
            Some(EventSuffix::Field) => CommonSignature::Field.parameters(),
            Some(EventSuffix::Side) => CommonSignature::Side.parameters(),
            Some(EventSuffix::Slot) | None => self.kind.signature().parameters(),
        }
    }
}

impl From<EventKind> for EventIdentity {
    fn from(value: EventKind) -> Self {
        Self::new(value)
    }
}

impl Display for EventIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(prefix) = self.prefix {
            write!(f, "{prefix}")?;
        }
        if let Some(suffix) = self.suffix {
            write!(f, "{suffix}")?;
        }
        write!(f, "{}", self.kind)
    }
}
