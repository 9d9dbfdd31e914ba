use std::fmt;

use serde::{Deserialize, Serialize};

/// Reputation tier, fully determined by a profile's coin balance.
///
/// `Tier::for_coins` is the only producer of a tier value; the stored
/// `tier` column is a cached projection rewritten in the same transaction
/// as every coins mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tier {
    Explorer,
    Contributor,
    Innovator,
    Visionary,
}

impl Tier {
    pub fn for_coins(coins: u64) -> Tier {
        if coins < 100 {
            Tier::Explorer
        } else if coins < 500 {
            Tier::Contributor
        } else if coins < 1000 {
            Tier::Innovator
        } else {
            Tier::Visionary
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Explorer => "Explorer",
            Tier::Contributor => "Contributor",
            Tier::Innovator => "Innovator",
            Tier::Visionary => "Visionary",
        }
    }

    pub fn from_name(name: &str) -> Option<Tier> {
        match name {
            "Explorer" => Some(Tier::Explorer),
            "Contributor" => Some(Tier::Contributor),
            "Innovator" => Some(Tier::Innovator),
            "Visionary" => Some(Tier::Visionary),
            _ => None,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Moderation lifecycle of a showcase. A showcase is created pending and
/// transitions exactly once to approved or rejected; a rejected record keeps
/// `approved=false` and carries the moderator's note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShowcaseStatus {
    Pending,
    Approved,
    Rejected,
}

impl ShowcaseStatus {
    pub fn of(approved: bool, admin_note: &str) -> ShowcaseStatus {
        if approved {
            ShowcaseStatus::Approved
        } else if admin_note.is_empty() {
            ShowcaseStatus::Pending
        } else {
            ShowcaseStatus::Rejected
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ShowcaseStatus::Pending => "Pending",
            ShowcaseStatus::Approved => "Approved",
            ShowcaseStatus::Rejected => "Rejected",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_thresholds() {
        assert_eq!(Tier::for_coins(0), Tier::Explorer);
        assert_eq!(Tier::for_coins(99), Tier::Explorer);
        assert_eq!(Tier::for_coins(100), Tier::Contributor);
        assert_eq!(Tier::for_coins(499), Tier::Contributor);
        assert_eq!(Tier::for_coins(500), Tier::Innovator);
        assert_eq!(Tier::for_coins(999), Tier::Innovator);
        assert_eq!(Tier::for_coins(1000), Tier::Visionary);
        assert_eq!(Tier::for_coins(u64::MAX), Tier::Visionary);
    }

    #[test]
    fn tier_is_monotonic_in_coins() {
        let mut last = Tier::for_coins(0);
        for coins in 1..=1100u64 {
            let tier = Tier::for_coins(coins);
            assert!(tier >= last, "tier regressed at {} coins", coins);
            last = tier;
        }
    }

    #[test]
    fn tier_name_roundtrip() {
        for tier in [Tier::Explorer, Tier::Contributor, Tier::Innovator, Tier::Visionary] {
            assert_eq!(Tier::from_name(tier.as_str()), Some(tier));
        }
        assert_eq!(Tier::from_name("Wizard"), None);
    }

    #[test]
    fn status_from_row_fields() {
        assert_eq!(ShowcaseStatus::of(false, ""), ShowcaseStatus::Pending);
        assert_eq!(ShowcaseStatus::of(true, ""), ShowcaseStatus::Approved);
        assert_eq!(ShowcaseStatus::of(false, "too thin"), ShowcaseStatus::Rejected);
    }
}
