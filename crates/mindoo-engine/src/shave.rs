//! Frontier reduction.
//!
//! Unchallenged crest events cannot decide whether a configuration is
//! doomed, so they are peeled off; a predecessor whose surviving
//! successors are all peeled becomes part of the crest in turn.

use crate::event::{Configuration, EventId};
use crate::poset::EventPoset;

/// A reduced configuration and its crest. `crest ⊆ keep`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shaved {
    pub keep: Configuration,
    pub crest: Configuration,
}

/// Shave `config` starting from `crest`, to a fixpoint.
pub fn shave(poset: &EventPoset, config: &Configuration, crest: &Configuration) -> Shaved {
    let mut crest = crest.clone();
    let mut blacklist = Configuration::new();

    loop {
        let removed: Vec<EventId> = crest
            .iter()
            .filter(|e| poset.is_unchallenged(e))
            .cloned()
            .collect();
        if removed.is_empty() {
            break;
        }
        for e in &removed {
            crest.remove(e);
            blacklist.insert(e.clone());
        }
        for e in &removed {
            for f in poset.predecessors_within(e, config) {
                if blacklist.contains(f) || crest.contains(f) {
                    continue;
                }
                if poset
                    .successors_within(f, config)
                    .all(|g| blacklist.contains(g))
                {
                    crest.insert(f.clone());
                }
            }
        }
    }

    Shaved {
        keep: config.difference(&blacklist).cloned().collect(),
        crest,
    }
}

/// Shave `config` from its causally maximal events.
pub fn reduce(poset: &EventPoset, config: &Configuration) -> Shaved {
    shave(poset, config, &poset.crest(config))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ev(text: &str) -> EventId {
        EventId::parse(text).unwrap()
    }

    fn config(events: &[&str]) -> Configuration {
        events.iter().map(|e| ev(e)).collect()
    }

    /// e1 -> e2 -> e3, e1 -> e4
    fn chain() -> EventPoset {
        let mut poset = EventPoset::new();
        poset.add_order(&ev("e1"), &ev("e2"));
        poset.add_order(&ev("e2"), &ev("e3"));
        poset.add_order(&ev("e1"), &ev("e4"));
        poset
    }

    #[test]
    fn nothing_unchallenged_keeps_everything() {
        let poset = chain();
        let c = config(&["e1", "e2", "e3", "e4"]);
        let shaved = reduce(&poset, &c);
        assert_eq!(shaved.keep, c);
        assert_eq!(shaved.crest, config(&["e3", "e4"]));
    }

    #[test]
    fn peels_unchallenged_chain_down_to_branching_event() {
        let mut poset = chain();
        poset.mark_unchallenged(ev("e3"));
        poset.mark_unchallenged(ev("e2"));
        let shaved = reduce(&poset, &config(&["e1", "e2", "e3", "e4"]));
        assert_eq!(shaved.keep, config(&["e1", "e4"]));
        assert_eq!(shaved.crest, config(&["e4"]));
    }

    #[test]
    fn predecessor_joins_crest_once_all_successors_are_gone() {
        let mut poset = chain();
        poset.mark_unchallenged(ev("e3"));
        poset.mark_unchallenged(ev("e2"));
        poset.mark_unchallenged(ev("e4"));
        let shaved = reduce(&poset, &config(&["e1", "e2", "e3", "e4"]));
        assert_eq!(shaved.keep, config(&["e1"]));
        assert_eq!(shaved.crest, config(&["e1"]));
    }

    #[test]
    fn fully_unchallenged_configuration_shaves_to_empty() {
        let mut poset = chain();
        for e in ["e1", "e2", "e3", "e4"] {
            poset.mark_unchallenged(ev(e));
        }
        let shaved = reduce(&poset, &config(&["e1", "e2", "e3", "e4"]));
        assert!(shaved.keep.is_empty());
        assert!(shaved.crest.is_empty());
    }

    #[test]
    fn successors_outside_the_configuration_are_ignored() {
        let mut poset = chain();
        poset.mark_unchallenged(ev("e2"));
        let shaved = reduce(&poset, &config(&["e1", "e2"]));
        assert_eq!(shaved.keep, config(&["e1"]));
        assert_eq!(shaved.crest, config(&["e1"]));
    }

    #[test]
    fn shaving_a_shaved_pair_is_a_no_op() {
        let mut poset = chain();
        poset.mark_unchallenged(ev("e3"));
        let once = reduce(&poset, &config(&["e1", "e2", "e3", "e4"]));
        let twice = shave(&poset, &once.keep, &once.crest);
        assert_eq!(once, twice);
        assert_eq!(reduce(&poset, &once.keep), once);
    }
}
