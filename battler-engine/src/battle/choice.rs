use std::{
    fmt,
    fmt::Display,
    str::FromStr,
};

use anyhow::{
    Context,
    Error,
    Result,
};
use itertools::Itertools;
use serde::{
    Deserialize,
    Serialize,
};

use crate::{
    battle::{
        ChoiceRequest,
        LegalOption,
        RequestKind,
    },
    error::ValidationError,
};

/// A choice made in response to a [`ChoiceRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Choice {
    /// Use the move in the move slot.
    Move { slot: usize },
    /// Switch in the Mon at the team position.
    Switch { slot: usize },
    /// Order the team, listing team positions from first to last.
    Team { order: Vec<usize> },
}

impl Choice {
    /// Validates the choice against the request it answers.
    pub fn validate(&self, request: &ChoiceRequest) -> Result<(), ValidationError> {
        let mut error = ValidationError::default();
        match (self, request.kind) {
            (Self::Move { slot }, RequestKind::Turn) => {
                if !request.move_options().contains(slot) {
                    error.add_problem(format!("move slot {slot} cannot be used"));
                }
            }
            (Self::Switch { slot }, RequestKind::Turn | RequestKind::Switch) => {
                if !request.switch_options().contains(slot) {
                    error.add_problem(format!("cannot switch to team position {slot}"));
                }
            }
            (Self::Team { order }, RequestKind::Team) => {
                let size = request
                    .options
                    .iter()
                    .find_map(|option| match option {
                        LegalOption::Team { size } => Some(*size),
                        _ => None,
                    })
                    .unwrap_or(0);
                if order.len() != size {
                    error.add_problem(format!(
                        "team order has {} positions but the team has {size} Mons",
                        order.len()
                    ));
                }
                if let Some(position) = order.iter().find(|position| **position >= size) {
                    error.add_problem(format!("team position {position} does not exist"));
                }
                if !order.iter().all_unique() {
                    error.add_problem("team order repeats a position");
                }
            }
            (choice, kind) => {
                error.add_problem(format!(
                    "{} cannot answer a {kind:?} request",
                    choice.name()
                ));
            }
        }
        if error.is_empty() { Ok(()) } else { Err(error) }
    }

    /// The choice substituted when a side gives no usable answer: the first legal option.
    pub fn default_for(request: &ChoiceRequest) -> Option<Self> {
        request.options.first().map(|option| match option {
            LegalOption::Move { slot } => Self::Move { slot: *slot },
            LegalOption::Switch { slot } => Self::Switch { slot: *slot },
            LegalOption::Team { size } => Self::Team {
                order: (0..*size).collect(),
            },
        })
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Move { .. } => "move",
            Self::Switch { .. } => "switch",
            Self::Team { .. } => "team",
        }
    }
}

impl Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Move { slot } => write!(f, "move {slot}"),
            Self::Switch { slot } => write!(f, "switch {slot}"),
            Self::Team { order } => write!(f, "team {}", order.iter().join(" ")),
        }
    }
}

impl FromStr for Choice {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (choice, data) = s.trim().split_once(' ').unwrap_or((s.trim(), ""));
        let data = data.trim();
        match choice {
            "move" => Ok(Self::Move {
                slot: data.parse().context("invalid move slot")?,
            }),
            "switch" => Ok(Self::Switch {
                slot: data.parse().context("invalid switch slot")?,
            }),
            "team" => Ok(Self::Team {
                order: data
                    .split_whitespace()
                    .map(|position| position.parse::<usize>())
                    .collect::<Result<_, _>>()
                    .context("invalid team order")?,
            }),
            _ => Err(Error::msg(format!("invalid choice: {choice}"))),
        }
    }
}
