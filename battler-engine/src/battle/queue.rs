use std::collections::VecDeque;

use crate::{
    battle::{
        Action,
        MonHandle,
        SpeedTieResolution,
        compare_priority,
        speed_sort,
    },
    rng::PseudoRandomNumberGenerator,
};

/// A queue of [`Action`]s to be run in a battle.
///
/// Actions are ordered in complex ways, so this queue type encapsulates all ordering logic. Every
/// action receives an increasing effect order when it enters the queue, which keeps the order of
/// otherwise tied actions stable.
#[derive(Debug, Default)]
pub struct BattleQueue {
    actions: VecDeque<Action>,
    next_effect_order: u32,
}

impl BattleQueue {
    /// Creates a new [`BattleQueue`].
    pub fn new() -> Self {
        Self::default()
    }

    fn stamp(&mut self, action: &mut Action) {
        action.keys_mut().effect_order = self.next_effect_order;
        self.next_effect_order += 1;
    }

    /// Adds a new [`Action`] to the back of the queue.
    ///
    /// The queue must be sorted before running actions added this way.
    pub fn add_action(&mut self, mut action: Action) {
        self.stamp(&mut action);
        self.actions.push_back(action);
    }

    /// Adds multiple [`Action`]s to the back of the queue.
    pub fn add_actions<I>(&mut self, actions: I)
    where
        I: IntoIterator<Item = Action>,
    {
        for action in actions {
            self.add_action(action);
        }
    }

    /// Sorts all [`Action`]s in the queue.
    pub fn sort(
        &mut self,
        prng: &mut dyn PseudoRandomNumberGenerator,
        tie_resolution: SpeedTieResolution,
    ) {
        speed_sort(self.actions.make_contiguous(), prng, tie_resolution);
        log::trace!(
            "sorted queue: [{}]",
            itertools::join(self.actions.iter(), ", ")
        );
    }

    /// Inserts an [`Action`] at its sorted position among the pending actions.
    ///
    /// The action goes before the first pending action that should run after it, so entries that
    /// tie with it keep running first.
    pub fn insert_action_into_sorted_position(&mut self, mut action: Action) {
        self.stamp(&mut action);
        let position = self
            .actions
            .iter()
            .position(|pending| compare_priority(pending, &action).is_gt())
            .unwrap_or(self.actions.len());
        self.actions.insert(position, action);
    }

    /// Pops the front [`Action`] to be executed.
    ///
    /// [`Self::sort`] should be called first.
    pub fn pop_front(&mut self) -> Option<Action> {
        self.actions.pop_front()
    }

    pub fn peek(&self) -> Option<&Action> {
        self.actions.front()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter()
    }

    /// Removes every pending action.
    pub fn clear(&mut self) {
        self.actions.clear();
    }

    /// Checks if the Mon still has a move pending this turn.
    pub fn will_move(&self, mon: MonHandle) -> bool {
        self.actions
            .iter()
            .any(|action| matches!(action, Action::Move(action) if action.mon == mon))
    }

    /// Cancels every pending action for the Mon, returning whether any were removed.
    pub fn cancel_action(&mut self, mon: MonHandle) -> bool {
        let before = self.actions.len();
        self.actions.retain(|action| action.mon() != Some(mon));
        before != self.actions.len()
    }

    /// Moves the Mon's pending action to the front of the queue.
    ///
    /// Returns true if an action was found.
    pub fn prioritize_action(&mut self, mon: MonHandle) -> bool {
        match self
            .actions
            .iter()
            .position(|action| action.mon() == Some(mon))
        {
            Some(index) => {
                if let Some(action) = self.actions.remove(index) {
                    self.actions.push_front(action);
                }
                true
            }
            None => false,
        }
    }

    /// Updates the speed of pending actions with the given lookup, then re-sorts the queue.
    pub fn update_speed<F>(
        &mut self,
        speed_of: F,
        prng: &mut dyn PseudoRandomNumberGenerator,
        tie_resolution: SpeedTieResolution,
    ) where
        F: Fn(MonHandle) -> Option<u32>,
    {
        for action in &mut self.actions {
            if let Some(speed) = action.mon().and_then(&speed_of) {
                action.keys_mut().speed = speed;
            }
        }
        self.sort(prng, tie_resolution);
    }
}
