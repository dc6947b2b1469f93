use std::fmt;

use battler_engine::battle::CoreBattle;
use itertools::Itertools;
use serde::Deserialize;

#[derive(Deserialize, Clone)]
#[serde(untagged)]
pub enum LogMatch {
    Exact(String),
    Substrings(Vec<String>),
}

impl fmt::Debug for LogMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(str) => write!(f, "\"{str}\""),
            Self::Substrings(strs) => write!(
                f,
                "substrings:{}",
                strs.iter().map(|str| format!("\"{str}\"")).join(";")
            ),
        }
    }
}

impl PartialEq<str> for LogMatch {
    fn eq(&self, other: &str) -> bool {
        match self {
            Self::Exact(str) => str.eq(&other),
            Self::Substrings(strs) => strs.iter().all(|str| other.contains(str)),
        }
    }
}

impl PartialEq<String> for LogMatch {
    fn eq(&self, other: &String) -> bool {
        self.eq(other.as_str())
    }
}

impl PartialEq<&str> for LogMatch {
    fn eq(&self, other: &&str) -> bool {
        self.eq(*other)
    }
}

impl PartialEq for LogMatch {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (LogMatch::Exact(s1), LogMatch::Exact(s2)) => s1 == s2,
            (LogMatch::Substrings(s1), LogMatch::Substrings(s2)) => {
                s1.iter().all(|sub| s2.contains(sub)) || s2.iter().all(|sub| s1.contains(sub))
            }
            (LogMatch::Exact(s), LogMatch::Substrings(subs))
            | (LogMatch::Substrings(subs), LogMatch::Exact(s)) => {
                subs.iter().all(|sub| s.contains(sub))
            }
        }
    }
}

impl From<&str> for LogMatch {
    fn from(value: &str) -> Self {
        Self::Exact(value.to_owned())
    }
}

/// Asserts that logs since the start of the battle are equal to the given logs.
#[track_caller]
pub fn assert_logs_since_start_eq<I, L>(battle: &CoreBattle, want: I)
where
    I: IntoIterator<Item = L>,
    L: Into<LogMatch>,
{
    let got = battle.log().logs().collect::<Vec<&str>>();
    let start_log_index = got
        .iter()
        .position(|log| *log == "start")
        .expect("battle has not started");
    let got = &got[start_log_index + 1..];
    let want = want.into_iter().map(|log| log.into()).collect::<Vec<LogMatch>>();
    let want = want.iter().collect::<Vec<_>>();
    pretty_assertions::assert_eq!(want, got)
}

/// Asserts that logs since the given turn in the battle are equal to the given logs.
#[track_caller]
pub fn assert_logs_since_turn_eq<I, L>(battle: &CoreBattle, turn: u32, want: I)
where
    I: IntoIterator<Item = L>,
    L: Into<LogMatch>,
{
    let got = battle.log().logs().collect::<Vec<&str>>();
    let turn_log = format!("turn|turn:{turn}");
    let turn_log_index = got
        .iter()
        .position(|log| *log == turn_log)
        .unwrap_or_else(|| panic!("battle never reached turn {turn}"));
    let got = &got[turn_log_index + 1..];
    let want = want.into_iter().map(|log| log.into()).collect::<Vec<LogMatch>>();
    let want = want.iter().collect::<Vec<_>>();
    pretty_assertions::assert_eq!(want, got)
}

/// Asserts that logs for the given turn in the battle are equal to the given logs.
#[track_caller]
pub fn assert_turn_logs_eq<I, L>(battle: &CoreBattle, turn: u32, want: I)
where
    I: IntoIterator<Item = L>,
    L: Into<LogMatch>,
{
    let got = battle.log().logs().collect::<Vec<&str>>();
    let turn_log = format!("turn|turn:{turn}");
    let next_turn_log = format!("turn|turn:{}", turn + 1);
    let turn_log_index = got
        .iter()
        .position(|log| *log == turn_log)
        .unwrap_or_else(|| panic!("battle never reached turn {turn}"));
    let next_turn_log_index = got
        .iter()
        .position(|log| *log == next_turn_log)
        .unwrap_or(got.len());
    let got = &got[turn_log_index + 1..next_turn_log_index];
    let want = want.into_iter().map(|log| log.into()).collect::<Vec<LogMatch>>();
    let want = want.iter().collect::<Vec<_>>();
    pretty_assertions::assert_eq!(want, got)
}
