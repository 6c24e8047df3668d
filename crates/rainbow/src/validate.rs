//! Independent rainbow-cycle checker.
//!
//! Re-derives the flip label of every consecutive pair (wrapping around) from
//! a domain [`FlipRule`], never from a built graph, so it can audit both
//! search output and externally supplied candidates.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

/// Domain knowledge the checker needs: the full label set and the label of a
/// single flip.
pub trait FlipRule {
    type Node: PartialEq;
    type Label: Clone + Eq + Hash + fmt::Debug;

    /// Every label a rainbow cycle must use.
    fn labels(&self) -> Vec<Self::Label>;

    /// Label of the flip `from → to`, or `None` if the two are not one flip apart.
    fn flip_label(&self, from: &Self::Node, to: &Self::Node) -> Option<Self::Label>;
}

/// Why a candidate is not a rainbow cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation<L> {
    /// Fewer than two entries.
    TooShort { len: usize },
    /// Entries `first` and `second` are structurally equal.
    RepeatedNode { first: usize, second: usize },
    /// Entry `position` and its successor are not one flip apart.
    NotAFlip { position: usize },
    /// The derived label is outside the rule's label set.
    UnknownLabel { position: usize, label: L },
    /// `label` occurs `count` times instead of `r`.
    WrongMultiplicity { label: L, count: usize, r: usize },
}

impl<L: fmt::Debug> fmt::Display for Violation<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort { len } => write!(f, "cycle has only {len} entries"),
            Self::RepeatedNode { first, second } => {
                write!(f, "entries {first} and {second} are the same node")
            }
            Self::NotAFlip { position } => {
                write!(f, "entry {position} and its successor are not one flip apart")
            }
            Self::UnknownLabel { position, label } => {
                write!(f, "transition {position} uses unknown label {label:?}")
            }
            Self::WrongMultiplicity { label, count, r } => {
                write!(f, "label {label:?} used {count} times, expected {r}")
            }
        }
    }
}

impl<L: fmt::Debug> std::error::Error for Violation<L> {}

/// Check that `candidate` (nodes in walk order, closing edge implied) is a
/// rainbow cycle: no repeated node, every step a flip, every label used
/// exactly `r` times.
pub fn check_rainbow_cycle<R: FlipRule>(
    rule: &R,
    candidate: &[R::Node],
    r: usize,
) -> Result<(), Violation<R::Label>> {
    let n = candidate.len();
    if n < 2 {
        return Err(Violation::TooShort { len: n });
    }
    for i in 0..n {
        if let Some(j) = (i + 1..n).find(|&j| candidate[i] == candidate[j]) {
            return Err(Violation::RepeatedNode {
                first: i,
                second: j,
            });
        }
    }

    let mut counts: HashMap<R::Label, usize> = rule.labels().into_iter().map(|l| (l, 0)).collect();
    for i in 0..n {
        let next = &candidate[(i + 1) % n];
        let label = rule
            .flip_label(&candidate[i], next)
            .ok_or(Violation::NotAFlip { position: i })?;
        match counts.get_mut(&label) {
            Some(c) => *c += 1,
            None => return Err(Violation::UnknownLabel { position: i, label }),
        }
    }

    // Report in the rule's label order for stable messages.
    for label in rule.labels() {
        let count = counts.get(&label).copied().unwrap_or(0);
        if count != r {
            return Err(Violation::WrongMultiplicity { label, count, r });
        }
    }
    Ok(())
}

pub fn is_rainbow_cycle<R: FlipRule>(rule: &R, candidate: &[R::Node], r: usize) -> bool {
    check_rainbow_cycle(rule, candidate, r).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subsets::{KSubsetRule, Subset, Transposition};
    use proptest::prelude::*;

    fn walk(sets: &[&[u32]]) -> Vec<Subset> {
        sets.iter().map(|s| Subset::new(s.to_vec())).collect()
    }

    /// Rainbow cycle on the 2-subsets of {1..5}.
    fn j52() -> Vec<Subset> {
        walk(&[
            &[1, 2],
            &[1, 3],
            &[1, 4],
            &[2, 4],
            &[4, 5],
            &[1, 5],
            &[3, 5],
            &[3, 4],
            &[2, 3],
            &[2, 5],
        ])
    }

    const RULE: KSubsetRule = KSubsetRule { n: 5, k: 2 };

    #[test]
    fn accepts_a_known_rainbow_cycle_in_any_rotation() {
        let mut c = j52();
        for _ in 0..c.len() {
            assert!(is_rainbow_cycle(&RULE, &c, 1));
            c.rotate_left(1);
        }
        c.reverse();
        assert!(is_rainbow_cycle(&RULE, &c, 1));
        assert!(!is_rainbow_cycle(&RULE, &c, 2));
    }

    #[test]
    fn triangle_of_singletons() {
        let rule = KSubsetRule { n: 3, k: 1 };
        assert_eq!(check_rainbow_cycle(&rule, &walk(&[&[1], &[2], &[3]]), 1), Ok(()));
        assert_eq!(
            check_rainbow_cycle(&rule, &walk(&[&[1]]), 1),
            Err(Violation::TooShort { len: 1 })
        );
    }

    #[test]
    fn repeated_interior_node_is_reported() {
        let c = walk(&[&[1, 2], &[1, 3], &[2, 3], &[1, 3], &[1, 4]]);
        assert_eq!(
            check_rainbow_cycle(&RULE, &c, 1),
            Err(Violation::RepeatedNode { first: 1, second: 3 })
        );
    }

    #[test]
    fn non_flip_step_is_reported_with_position() {
        let c = walk(&[&[1, 2], &[3, 4], &[1, 3]]);
        assert_eq!(
            check_rainbow_cycle(&RULE, &c, 1),
            Err(Violation::NotAFlip { position: 0 })
        );
        // the wrap-around step counts too
        let c = walk(&[&[1, 2], &[1, 3], &[3, 4]]);
        assert_eq!(
            check_rainbow_cycle(&RULE, &c, 1),
            Err(Violation::NotAFlip { position: 2 })
        );
    }

    #[test]
    fn short_cycle_misses_labels() {
        // {1,2} {1,3} {2,3} uses (2 3) (1 2) (1 3) once each; (1 4) never
        let c = walk(&[&[1, 2], &[1, 3], &[2, 3]]);
        let err = check_rainbow_cycle(&RULE, &c, 1).unwrap_err();
        assert_eq!(
            err,
            Violation::WrongMultiplicity {
                label: Transposition::new(1, 4),
                count: 0,
                r: 1
            }
        );
        assert!(err.to_string().contains("used 0 times, expected 1"));
    }

    #[test]
    fn nodes_outside_the_rule_are_not_flips() {
        let rule = KSubsetRule { n: 3, k: 1 };
        let c = walk(&[&[1], &[2], &[4]]);
        assert_eq!(
            check_rainbow_cycle(&rule, &c, 1),
            Err(Violation::NotAFlip { position: 1 })
        );
    }

    /// Singleton flips, but only `(1 2)` and `(1 3)` count as labels.
    struct Restricted;

    impl FlipRule for Restricted {
        type Node = Subset;
        type Label = Transposition;

        fn labels(&self) -> Vec<Transposition> {
            vec![Transposition::new(1, 2), Transposition::new(1, 3)]
        }

        fn flip_label(&self, from: &Subset, to: &Subset) -> Option<Transposition> {
            KSubsetRule { n: 3, k: 1 }.flip_label(from, to)
        }
    }

    #[test]
    fn labels_outside_the_label_set_are_unknown() {
        let c = walk(&[&[1], &[2], &[3]]);
        assert_eq!(
            check_rainbow_cycle(&Restricted, &c, 1),
            Err(Violation::UnknownLabel {
                position: 1,
                label: Transposition::new(2, 3)
            })
        );
    }

    proptest! {
        #[test]
        fn swapping_two_entries_breaks_the_cycle(i in 0usize..10, d in 2usize..9) {
            let mut c = j52();
            let j = (i + d) % c.len();
            prop_assume!(j != i && (i + 1) % c.len() != j && (j + 1) % c.len() != i);
            c.swap(i, j);
            prop_assert!(!is_rainbow_cycle(&RULE, &c, 1));
        }

        #[test]
        fn dropping_an_entry_breaks_the_cycle(i in 0usize..10) {
            let mut c = j52();
            c.remove(i);
            prop_assert!(!is_rainbow_cycle(&RULE, &c, 1));
        }
    }
}
