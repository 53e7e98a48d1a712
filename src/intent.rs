//! Intent classifier.
//!
//! Maps a free-text query to one of a closed set of intents by scanning an
//! ordered phrase table for substring containment, case-insensitive. The
//! first matching phrase wins, so a query naming several phrases always
//! resolves to the earliest rule in the table. No word-boundary checks;
//! the ordering is part of the observable contract.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    TotalGames,
    AveragePrice,
    TopGenre,
    TopDeveloper,
    GamesPerYear,
    Summary,
    Unrecognized,
}

/// Ordered rule table; earlier entries take priority.
const RULES: &[(&str, Intent)] = &[
    ("total games", Intent::TotalGames),
    ("average price", Intent::AveragePrice),
    ("top genre", Intent::TopGenre),
    ("top developer", Intent::TopDeveloper),
    ("games per year", Intent::GamesPerYear),
    ("summary", Intent::Summary),
    ("insight", Intent::Summary),
];

pub fn classify(query: &str) -> Intent {
    let q = query.to_lowercase();
    for (phrase, intent) in RULES {
        if q.contains(phrase) {
            return *intent;
        }
    }
    Intent::Unrecognized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_phrase() {
        assert_eq!(classify("How many total games are there?"), Intent::TotalGames);
        assert_eq!(classify("what is the average price?"), Intent::AveragePrice);
        assert_eq!(classify("top genre please"), Intent::TopGenre);
        assert_eq!(classify("who is the TOP DEVELOPER"), Intent::TopDeveloper);
        assert_eq!(classify("show games per year"), Intent::GamesPerYear);
        assert_eq!(classify("give me a summary"), Intent::Summary);
        assert_eq!(classify("any insights?"), Intent::Summary);
    }

    #[test]
    fn test_priority_order() {
        // First matching rule wins, regardless of phrase position in the query.
        assert_eq!(classify("total games and summary"), Intent::TotalGames);
        assert_eq!(classify("summary of total games"), Intent::TotalGames);
        assert_eq!(
            classify("what is the average price and summary"),
            Intent::AveragePrice
        );
    }

    #[test]
    fn test_unrecognized() {
        assert_eq!(classify(""), Intent::Unrecognized);
        assert_eq!(classify("xyz"), Intent::Unrecognized);
        assert_eq!(classify("total game"), Intent::Unrecognized);
    }
}
