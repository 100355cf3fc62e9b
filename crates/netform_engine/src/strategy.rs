//! Match strategies.
//!
//! A strategy decides which candidate nodes the matcher offers to
//! [`Transform::accept`](crate::Transform::accept) when growing a subgraph.

use std::fmt;
use std::str::FromStr;

use netform_foundation::Error;

/// How the pattern matcher extends a partial subgraph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MatchStrategy {
    /// Only neighbors (children, then parents) of nodes already in the
    /// subgraph. Every match is connected.
    #[default]
    Connected,
    /// Only nodes with a higher index than the last node added. Every match
    /// is strictly increasing in index, i.e. in execution order.
    OrderedByPosition,
    /// Any node not already in the subgraph. Exponential in the worst case.
    Unrestricted,
}

impl MatchStrategy {
    /// All strategies, in declaration order.
    pub const ALL: [Self; 3] = [Self::Connected, Self::OrderedByPosition, Self::Unrestricted];

    /// Returns the canonical name of the strategy.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Connected => "connected",
            Self::OrderedByPosition => "ordered",
            Self::Unrestricted => "unrestricted",
        }
    }
}

impl fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for MatchStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "connected" | "connected-subgraph" => Ok(Self::Connected),
            "ordered" | "ordered-by-position" | "sorted" | "sorted-wrt-execution-order" => {
                Ok(Self::OrderedByPosition)
            }
            "unrestricted" | "general" => Ok(Self::Unrestricted),
            _ => Err(Error::unknown_strategy(s)),
        }
    }
}
