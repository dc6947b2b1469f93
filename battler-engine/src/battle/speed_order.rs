use std::cmp::Ordering;

use crate::{
    battle::SpeedTieResolution,
    rng::{
        PseudoRandomNumberGenerator,
        rand_util,
    },
};

/// An object that can be ordered by the battle's tie-break keys.
///
/// Both scheduled actions and event handlers are ordered with the same keys.
pub trait SpeedOrderable {
    /// Fixed rank. Ranked objects go before unranked ones, and lower ranks go first.
    fn order(&self) -> Option<u32>;
    /// Priority. Highest priority goes first.
    fn priority(&self) -> i32;
    /// Speed. Highest speed goes first.
    fn speed(&self) -> u32;
    /// Does speed participate in the comparison?
    fn uses_speed(&self) -> bool {
        true
    }
    /// Sub-order. Lowest sub-order goes first.
    fn sub_order(&self) -> u32 {
        0
    }
    /// Effect order. Lowest effect order goes first.
    fn effect_order(&self) -> u32 {
        0
    }
}

/// Compares two objects by their tie-break keys.
///
/// [`Ordering::Less`] means `a` goes first.
pub fn compare_priority<A, B>(a: &A, b: &B) -> Ordering
where
    A: SpeedOrderable + ?Sized,
    B: SpeedOrderable + ?Sized,
{
    let order = match (a.order(), b.order()) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    order
        // Higher priority first.
        .then_with(|| b.priority().cmp(&a.priority()))
        // Higher speed first, only when both sides care about speed.
        .then_with(|| {
            if a.uses_speed() && b.uses_speed() {
                b.speed().cmp(&a.speed())
            } else {
                Ordering::Equal
            }
        })
        // Lower sub-order first.
        .then_with(|| a.sub_order().cmp(&b.sub_order()))
        // Earlier effect first.
        .then_with(|| a.effect_order().cmp(&b.effect_order()))
}

/// Sorts the given items by their tie-break keys.
///
/// The sort is stable. Runs of items that tie on every key are then resolved according to
/// `tie_resolution`.
pub fn speed_sort<T>(
    items: &mut [T],
    prng: &mut dyn PseudoRandomNumberGenerator,
    tie_resolution: SpeedTieResolution,
) where
    T: SpeedOrderable,
{
    items.sort_by(|a, b| compare_priority(a, b));
    if tie_resolution == SpeedTieResolution::Keep {
        return;
    }
    let mut start = 0;
    while start < items.len() {
        let mut end = start + 1;
        while end < items.len() && compare_priority(&items[start], &items[end]).is_eq() {
            end += 1;
        }
        if end - start > 1 {
            let ties = &mut items[start..end];
            match tie_resolution {
                SpeedTieResolution::Random => rand_util::shuffle(prng, ties),
                SpeedTieResolution::Reverse => ties.reverse(),
                SpeedTieResolution::Keep => (),
            }
        }
        start = end;
    }
}

#[cfg(test)]
mod speed_order_test {
    use crate::{
        battle::{
            SpeedOrderable,
            SpeedTieResolution,
            compare_priority,
            speed_sort,
        },
        rng::RealPseudoRandomNumberGenerator,
    };

    #[derive(Debug, Clone, PartialEq)]
    struct Entry {
        name: &'static str,
        order: Option<u32>,
        priority: i32,
        speed: u32,
        uses_speed: bool,
        sub_order: u32,
        effect_order: u32,
    }

    impl Entry {
        fn new(name: &'static str) -> Self {
            Self {
                name,
                order: Some(200),
                priority: 0,
                speed: 0,
                uses_speed: true,
                sub_order: 0,
                effect_order: 0,
            }
        }
    }

    impl SpeedOrderable for Entry {
        fn order(&self) -> Option<u32> {
            self.order
        }
        fn priority(&self) -> i32 {
            self.priority
        }
        fn speed(&self) -> u32 {
            self.speed
        }
        fn uses_speed(&self) -> bool {
            self.uses_speed
        }
        fn sub_order(&self) -> u32 {
            self.sub_order
        }
        fn effect_order(&self) -> u32 {
            self.effect_order
        }
    }

    fn names(items: &[Entry]) -> Vec<&'static str> {
        items.iter().map(|item| item.name).collect()
    }

    fn sort(items: &mut [Entry], tie_resolution: SpeedTieResolution) {
        let mut prng = RealPseudoRandomNumberGenerator::new(Some(1));
        speed_sort(items, &mut prng, tie_resolution);
    }

    #[test]
    fn priority_then_speed() {
        let mut items = vec![
            Entry {
                speed: 100,
                effect_order: 0,
                ..Entry::new("a")
            },
            Entry {
                speed: 150,
                effect_order: 1,
                ..Entry::new("b")
            },
            Entry {
                priority: 1,
                speed: 50,
                effect_order: 2,
                ..Entry::new("c")
            },
        ];
        sort(&mut items, SpeedTieResolution::Random);
        assert_eq!(names(&items), vec!["c", "b", "a"]);
    }

    #[test]
    fn ranked_before_unranked_regardless_of_priority() {
        let mut items = vec![
            Entry {
                order: None,
                priority: 7,
                speed: 999,
                ..Entry::new("unranked")
            },
            Entry {
                order: Some(300),
                priority: -7,
                speed: 1,
                ..Entry::new("ranked")
            },
        ];
        sort(&mut items, SpeedTieResolution::Random);
        assert_eq!(names(&items), vec!["ranked", "unranked"]);
    }

    #[test]
    fn lower_rank_first() {
        let a = Entry {
            order: Some(3),
            ..Entry::new("a")
        };
        let b = Entry {
            order: Some(103),
            priority: 5,
            ..Entry::new("b")
        };
        assert!(compare_priority(&a, &b).is_lt());
    }

    #[test]
    fn effect_order_breaks_full_ties() {
        let mut items = (0..6)
            .rev()
            .map(|i| Entry {
                speed: 80,
                sub_order: 1,
                effect_order: i,
                ..Entry::new(["e0", "e1", "e2", "e3", "e4", "e5"][i as usize])
            })
            .collect::<Vec<_>>();
        sort(&mut items, SpeedTieResolution::Random);
        assert_eq!(names(&items), vec!["e0", "e1", "e2", "e3", "e4", "e5"]);
    }

    #[test]
    fn speed_ignored_unless_both_use_it() {
        let fast = Entry {
            speed: 200,
            uses_speed: false,
            sub_order: 2,
            ..Entry::new("fast")
        };
        let slow = Entry {
            speed: 10,
            sub_order: 1,
            ..Entry::new("slow")
        };
        assert!(compare_priority(&slow, &fast).is_lt());
    }

    #[test]
    fn sub_order_after_speed() {
        let mut items = vec![
            Entry {
                speed: 50,
                sub_order: 2,
                ..Entry::new("second")
            },
            Entry {
                speed: 50,
                sub_order: 1,
                ..Entry::new("first")
            },
        ];
        sort(&mut items, SpeedTieResolution::Keep);
        assert_eq!(names(&items), vec!["first", "second"]);
    }

    #[test]
    fn sorting_sorted_items_is_a_no_op() {
        let mut items = vec![
            Entry {
                order: Some(1),
                ..Entry::new("team")
            },
            Entry {
                priority: 1,
                speed: 10,
                effect_order: 4,
                ..Entry::new("quick")
            },
            Entry {
                speed: 90,
                effect_order: 2,
                ..Entry::new("fast")
            },
            Entry {
                speed: 90,
                effect_order: 3,
                ..Entry::new("fast-later")
            },
            Entry {
                order: Some(300),
                ..Entry::new("residual")
            },
            Entry {
                order: None,
                ..Entry::new("unranked")
            },
        ];
        let sorted = items.clone();
        sort(&mut items, SpeedTieResolution::Random);
        pretty_assertions::assert_eq!(items, sorted);
        sort(&mut items, SpeedTieResolution::Random);
        pretty_assertions::assert_eq!(items, sorted);
    }

    #[test]
    fn resolves_full_ties() {
        let tied = || {
            vec![
                Entry::new("a"),
                Entry::new("b"),
                Entry::new("c"),
            ]
        };

        let mut items = tied();
        sort(&mut items, SpeedTieResolution::Keep);
        assert_eq!(names(&items), vec!["a", "b", "c"]);

        let mut items = tied();
        sort(&mut items, SpeedTieResolution::Reverse);
        assert_eq!(names(&items), vec!["c", "b", "a"]);

        let mut first = tied();
        let mut second = tied();
        sort(&mut first, SpeedTieResolution::Random);
        sort(&mut second, SpeedTieResolution::Random);
        assert_eq!(first, second);
        let mut names = names(&first);
        names.sort();
        assert_eq!(names, vec!["a", "b", "c"]);
    }
}
