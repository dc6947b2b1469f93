use std::{
    fmt::Display,
    mem,
};

use itertools::Itertools;

use crate::common::Id;

/// A value that can be written as one part of a [`LogEntry`].
pub trait Loggable {
    fn write_part(&self, parts: &mut Vec<String>);
}

macro_rules! loggable_display {
    ($($t:ty),* $(,)?) => {
        $(
            impl Loggable for $t {
                fn write_part(&self, parts: &mut Vec<String>) {
                    parts.push(self.to_string());
                }
            }
        )*
    };
}

loggable_display!(&str, String, Id, u8, u16, u32, u64, usize, i8, i32, i64);

/// A `key:value` property.
impl<V> Loggable for (&str, V)
where
    V: Display,
{
    fn write_part(&self, parts: &mut Vec<String>) {
        parts.push(format!("{}:{}", self.0, self.1));
    }
}

/// An optional part is skipped when absent.
impl<T> Loggable for Option<T>
where
    T: Loggable,
{
    fn write_part(&self, parts: &mut Vec<String>) {
        if let Some(part) = self {
            part.write_part(parts);
        }
    }
}

/// One line of the battle log.
///
/// Use the [`log_event`][`crate::log_event`] macro rather than constructing entries directly.
pub struct LogEntry(String);

impl LogEntry {
    pub fn from_parts(parts: &[&dyn Loggable]) -> Self {
        let mut out = Vec::with_capacity(parts.len());
        for part in parts {
            part.write_part(&mut out);
        }
        Self(out.into_iter().join("|"))
    }
}

/// Constructs a [`LogEntry`] with the common pipe-delimited format.
///
/// ```
/// use battler_engine::log_event;
/// let entry = log_event!("damage", ("mon", "Pikachu"), ("health", "12/35"));
/// ```
#[macro_export]
macro_rules! log_event {
    ($($arg:expr),* $(,)?) => {{
        $crate::log::LogEntry::from_parts(&[$(&$arg),*])
    }};
}

/// The human-readable log of a battle.
///
/// Lines are read out in bursts, one burst per executed action.
#[derive(Default)]
pub struct EventLog {
    logs: Vec<String>,
    last_read: usize,
}

impl EventLog {
    /// Creates a new event log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Does the log contain messages that have not been read out yet?
    pub fn has_new_messages(&self) -> bool {
        self.last_read < self.logs.len()
    }

    /// Pushes a new entry.
    pub fn push(&mut self, entry: LogEntry) {
        self.logs.push(entry.0)
    }

    /// All lines since the battle was created.
    pub fn logs(&self) -> impl Iterator<Item = &str> {
        self.logs.iter().map(|s| s.as_str())
    }

    /// Number of lines in the log.
    pub fn len(&self) -> usize {
        self.logs.len()
    }

    /// Checks if the log is empty.
    pub fn is_empty(&self) -> bool {
        self.logs.is_empty()
    }

    /// Reads out lines added since the last read.
    pub fn read_out(&mut self) -> impl Iterator<Item = &str> {
        let i = mem::replace(&mut self.last_read, self.logs.len());
        self.logs[i..].iter().map(|s| s.as_str())
    }
}

#[cfg(test)]
mod event_log_test {
    use crate::{
        common::Id,
        log::EventLog,
    };

    #[test]
    fn joins_parts_and_properties() {
        let mut log = EventLog::new();
        log.push(log_event!("turn", ("turn", 3)));
        log.push(log_event!(
            "move",
            ("mon", "Pikachu"),
            ("name", Id::from("Thunder Bolt")),
            None::<(&str, u32)>,
        ));
        pretty_assertions::assert_eq!(
            log.logs().collect::<Vec<_>>(),
            vec!["turn|turn:3", "move|mon:Pikachu|name:thunderbolt"]
        );
    }

    #[test]
    fn reads_out_in_bursts() {
        let mut log = EventLog::new();
        log.push(log_event!("a"));
        log.push(log_event!("b"));
        assert!(log.has_new_messages());
        assert_eq!(log.read_out().collect::<Vec<_>>(), vec!["a", "b"]);
        assert!(!log.has_new_messages());
        log.push(log_event!("c"));
        assert_eq!(log.read_out().collect::<Vec<_>>(), vec!["c"]);
        assert_eq!(log.len(), 3);
    }
}
