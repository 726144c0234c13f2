//! Flavor text pools
//!
//! `{p}` is the player the line is about, `{w}`/`{l}` the round winner and
//! loser.

use rand::Rng;
use rand::seq::IndexedRandom;

pub const HAZARD_HIT: &[&str] = &[
    "{p} got cooked.",
    "{p} walked straight into that.",
    "{p} took that personally.",
    "{p} launched into low orbit.",
    "{p} was not built for this.",
    "{p}: \"I meant to do that.\"",
    "{p} vs physics. Physics wins.",
    "{p} just got yeeted.",
];

pub const CLUTCH_SAVE: &[&str] = &[
    "{p} SAID NOT TODAY.",
    "{p} defied gravity.",
    "{p} survives. Somehow.",
    "{p} refuses to fall off.",
];

pub const ROUND_TAUNT: &[&str] = &[
    "{l} fell off. Skill issue.",
    "{w} holds the beam. {l} does not.",
    "{w} takes it. {l} is cooked.",
    "{w} is built different.",
    "{l}: \"I meant to fall.\" Sure.",
];

pub const MATCH_FINISHER: &[&str] = &[
    "{w} IS THE SEESAW CHAMP!",
    "{w} WINS IT ALL!",
    "CERTIFIED GOAT. {w} takes the set!",
    "{l} exits the tournament. {w} supremacy.",
];

/// Pick a line and fill in player labels
pub fn line(rng: &mut impl Rng, pool: &[&str], p: &str, w: &str, l: &str) -> String {
    pool.choose(rng)
        .map(|t| t.replace("{p}", p).replace("{w}", w).replace("{l}", l))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_placeholders_filled() {
        let mut rng = Pcg32::seed_from_u64(0);
        for _ in 0..20 {
            let text = line(&mut rng, ROUND_TAUNT, "", "P1", "P2");
            assert!(!text.contains('{'));
            assert!(text.contains("P1") || text.contains("P2"));
        }
    }

    #[test]
    fn test_empty_pool_gives_empty_line() {
        let mut rng = Pcg32::seed_from_u64(0);
        assert_eq!(line(&mut rng, &[], "P1", "P1", "P2"), "");
    }
}
