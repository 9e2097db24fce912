use std::fmt;

use crate::error::InputError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum League {
    PremierLeague,
    Bundesliga,
    SerieA,
}

impl League {
    pub const ALL: [League; 3] = [League::PremierLeague, League::Bundesliga, League::SerieA];

    pub fn key(self) -> &'static str {
        match self {
            League::PremierLeague => "premier_league",
            League::Bundesliga => "bundesliga",
            League::SerieA => "serie_a",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            League::PremierLeague => "Premier League",
            League::Bundesliga => "Bundesliga",
            League::SerieA => "Serie A",
        }
    }

    pub fn flag(self) -> &'static str {
        match self {
            League::PremierLeague => "ENG",
            League::Bundesliga => "GER",
            League::SerieA => "ITA",
        }
    }

    pub fn country(self) -> &'static str {
        match self {
            League::PremierLeague => "England",
            League::Bundesliga => "Germany",
            League::SerieA => "Italy",
        }
    }

    /// Loose matching for command-line arguments ("epl", "bundesliga", "ita", ...).
    pub fn from_alias(raw: &str) -> Result<Self, InputError> {
        let lower = raw.trim().to_lowercase();
        if lower.contains("premier") || lower.contains("epl") || lower == "eng" {
            Ok(League::PremierLeague)
        } else if lower.contains("bund") || lower.contains("ger") {
            Ok(League::Bundesliga)
        } else if lower.contains("serie") || lower.contains("ita") {
            Ok(League::SerieA)
        } else {
            Err(InputError::UnknownLeague(raw.to_string()))
        }
    }
}

impl fmt::Display for League {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
