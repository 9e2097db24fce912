use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;

use crate::error::InputError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BetType {
    HomeWin,
    Draw,
    AwayWin,
    HomeOrDraw,
    AwayOrDraw,
    BttsYes,
    BttsNo,
    Over25,
    Over35,
    Under25,
}

#[derive(Debug, Clone, Copy)]
pub struct BetTypeInfo {
    pub code: &'static str,
    pub description: &'static str,
}

// Catalogue order doubles as the tie-break order when ranking candidates.
pub const CATALOGUE: [(BetType, BetTypeInfo); 10] = [
    (
        BetType::HomeWin,
        BetTypeInfo {
            code: "1",
            description: "Home win",
        },
    ),
    (
        BetType::Draw,
        BetTypeInfo {
            code: "X",
            description: "Draw",
        },
    ),
    (
        BetType::AwayWin,
        BetTypeInfo {
            code: "2",
            description: "Away win",
        },
    ),
    (
        BetType::HomeOrDraw,
        BetTypeInfo {
            code: "1X",
            description: "Home win or draw",
        },
    ),
    (
        BetType::AwayOrDraw,
        BetTypeInfo {
            code: "X2",
            description: "Away win or draw",
        },
    ),
    (
        BetType::BttsYes,
        BetTypeInfo {
            code: "BTTS",
            description: "Both teams to score - yes",
        },
    ),
    (
        BetType::BttsNo,
        BetTypeInfo {
            code: "BTTS_NO",
            description: "Both teams to score - no",
        },
    ),
    (
        BetType::Over25,
        BetTypeInfo {
            code: "O2.5",
            description: "Over 2.5 goals",
        },
    ),
    (
        BetType::Over35,
        BetTypeInfo {
            code: "O3.5",
            description: "Over 3.5 goals",
        },
    ),
    (
        BetType::Under25,
        BetTypeInfo {
            code: "U2.5",
            description: "Under 2.5 goals",
        },
    ),
];

static BY_CODE: Lazy<HashMap<&'static str, BetType>> = Lazy::new(|| {
    CATALOGUE
        .iter()
        .map(|(bet_type, info)| (info.code, *bet_type))
        .collect()
});

impl BetType {
    pub fn all() -> impl Iterator<Item = BetType> {
        CATALOGUE.iter().map(|(bet_type, _)| *bet_type)
    }

    pub fn info(self) -> &'static BetTypeInfo {
        // The catalogue lists every variant exactly once, in declaration order.
        &CATALOGUE[self as usize].1
    }

    pub fn code(self) -> &'static str {
        self.info().code
    }

    pub fn description(self) -> &'static str {
        self.info().description
    }

    pub fn from_code(code: &str) -> Result<Self, InputError> {
        BY_CODE
            .get(code.trim().to_uppercase().as_str())
            .copied()
            .ok_or_else(|| InputError::UnknownBetType(code.to_string()))
    }
}

impl fmt::Display for BetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.code(), self.description())
    }
}
