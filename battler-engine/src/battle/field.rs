use indexmap::IndexMap;

use crate::{
    common::Id,
    effect::AppliedEffect,
};

/// Effects on the whole battlefield.
#[derive(Default)]
pub struct Field {
    pub weather: Option<AppliedEffect>,
    pub terrain: Option<AppliedEffect>,
    pub pseudo_weather: IndexMap<Id, AppliedEffect>,
}

impl Field {
    pub fn weather_id(&self) -> Option<&Id> {
        self.weather.as_ref().map(|weather| weather.id())
    }

    pub fn terrain_id(&self) -> Option<&Id> {
        self.terrain.as_ref().map(|terrain| terrain.id())
    }
}
