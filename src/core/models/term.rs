//! Academic term model (season + year of study)

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A scheduling season within an academic year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    /// Fall semester (first regular term of the academic year)
    Fall,
    /// Spring semester (second regular term)
    Spring,
    /// Summer session (off-cycle term)
    Summer,
}

impl Season {
    /// Position of the season inside an academic year (Fall = 0)
    #[must_use]
    pub const fn rank(self) -> u16 {
        match self {
            Self::Fall => 0,
            Self::Spring => 1,
            Self::Summer => 2,
        }
    }

    /// Regular seasons are the fall and spring semesters
    #[must_use]
    pub const fn is_regular(self) -> bool {
        !matches!(self, Self::Summer)
    }

    /// Lowercase name used in catalog and profile files
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fall => "fall",
            Self::Spring => "spring",
            Self::Summer => "summer",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Fall => "Fall",
            Self::Spring => "Spring",
            Self::Summer => "Summer",
        };
        write!(f, "{label}")
    }
}

impl FromStr for Season {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fall" | "autumn" => Ok(Self::Fall),
            "spring" => Ok(Self::Spring),
            "summer" => Ok(Self::Summer),
            other => Err(format!("Unknown season: '{other}'")),
        }
    }
}

/// Class standing derived from the year of study
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassLevel {
    /// First year
    Freshman,
    /// Second year
    Sophomore,
    /// Third year
    Junior,
    /// Fourth year and beyond
    Senior,
}

impl ClassLevel {
    /// Class level for a 1-based year of study
    #[must_use]
    pub const fn from_year(year: u8) -> Self {
        match year {
            0 | 1 => Self::Freshman,
            2 => Self::Sophomore,
            3 => Self::Junior,
            _ => Self::Senior,
        }
    }
}

/// A concrete term: season plus 1-based year of study.
///
/// An academic year runs Fall → Spring → Summer, so `Summer (Year 1)` comes
/// after `Spring (Year 1)` and before `Fall (Year 2)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TermIndex {
    /// Year of study, starting at 1
    pub year: u8,
    /// Season within that year
    pub season: Season,
}

impl TermIndex {
    /// Create a new term index
    #[must_use]
    pub const fn new(year: u8, season: Season) -> Self {
        Self { year, season }
    }

    /// Monotonic ordinal used for ordering and distance computations
    #[must_use]
    pub const fn ordinal(self) -> u16 {
        self.year as u16 * 3 + self.season.rank()
    }

    /// The next term of any kind (summer included)
    #[must_use]
    pub const fn next(self) -> Self {
        match self.season {
            Season::Fall => Self::new(self.year, Season::Spring),
            Season::Spring => Self::new(self.year, Season::Summer),
            Season::Summer => Self::new(self.year.saturating_add(1), Season::Fall),
        }
    }

    /// The next regular (fall/spring) term, skipping summer
    #[must_use]
    pub const fn next_regular(self) -> Self {
        match self.season {
            Season::Fall => Self::new(self.year, Season::Spring),
            Season::Spring | Season::Summer => Self::new(self.year.saturating_add(1), Season::Fall),
        }
    }

    /// The summer session that follows this term (or this term if it is a summer)
    #[must_use]
    pub const fn following_summer(self) -> Self {
        Self::new(self.year, Season::Summer)
    }

    /// Class standing during this term
    #[must_use]
    pub const fn class_level(self) -> ClassLevel {
        ClassLevel::from_year(self.year)
    }

    /// Whether this is an off-cycle (summer) term
    #[must_use]
    pub const fn is_off_cycle(self) -> bool {
        !self.season.is_regular()
    }
}

impl Ord for TermIndex {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ordinal().cmp(&other.ordinal())
    }
}

impl PartialOrd for TermIndex {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for TermIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (Year {})", self.season, self.year)
    }
}

impl FromStr for TermIndex {
    type Err = String;

    /// Parse `SEASON:YEAR`, e.g. `fall:2`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (season, year) = s
            .split_once(':')
            .ok_or_else(|| format!("Expected SEASON:YEAR, got '{s}'"))?;
        let season = season.parse::<Season>()?;
        let year = year
            .trim()
            .parse::<u8>()
            .map_err(|_| format!("Invalid year in term '{s}'"))?;
        if year == 0 {
            return Err(format!("Year of study must start at 1 in '{s}'"));
        }
        Ok(Self::new(year, season))
    }
}
