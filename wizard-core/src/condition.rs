use serde::{Deserialize, Serialize};

use crate::model::WeatherSnapshot;

/// Decorative grouping of upstream condition groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConditionCategory {
    Clear,
    Clouds,
    Rain,
    Snow,
    Thunderstorm,
    /// Mist, drizzle, fog, haze, smoke, dust, sand and ash.
    Mist,
    /// Squalls and tornadoes.
    Windy,
    #[default]
    Unknown,
}

impl ConditionCategory {
    /// Map an upstream `weather[0].main` value, ignoring case.
    pub fn from_main(main: &str) -> Self {
        match main.trim().to_ascii_lowercase().as_str() {
            "clear" => Self::Clear,
            "clouds" => Self::Clouds,
            "rain" => Self::Rain,
            "snow" => Self::Snow,
            "thunderstorm" => Self::Thunderstorm,
            "mist" | "drizzle" | "fog" | "haze" | "smoke" | "dust" | "sand" | "ash" => Self::Mist,
            "squall" | "tornado" => Self::Windy,
            _ => Self::Unknown,
        }
    }

    pub fn of(snapshot: &WeatherSnapshot) -> Self {
        snapshot
            .condition
            .as_ref()
            .map(|c| Self::from_main(&c.main))
            .unwrap_or_default()
    }

    /// Name of the presentation variant (background theme) for this category.
    pub fn variant(self) -> &'static str {
        match self {
            Self::Clear => "sunny",
            Self::Clouds => "cloudy",
            Self::Rain => "rainy",
            Self::Snow => "snowy",
            Self::Thunderstorm => "thunderstorm",
            Self::Mist => "mist",
            Self::Windy => "windy",
            Self::Unknown => "default",
        }
    }

    pub fn advice(self) -> &'static str {
        match self {
            Self::Clear => "The sun smiles upon you, a good day for casting spells!",
            Self::Clouds => "Clouds gather, perfect for scrying the future.",
            Self::Rain => "Raindrops are nature's elixir, harness them wisely.",
            Self::Snow => "Snowflakes are frozen spells, handle with care.",
            Self::Thunderstorm => "The storm rages, a wizard's power grows!",
            Self::Mist | Self::Windy | Self::Unknown => {
                "The weather is mysterious today, proceed with caution."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::snapshot;

    #[test]
    fn maps_primary_groups_case_insensitively() {
        assert_eq!(ConditionCategory::from_main("Clear"), ConditionCategory::Clear);
        assert_eq!(ConditionCategory::from_main("CLOUDS"), ConditionCategory::Clouds);
        assert_eq!(ConditionCategory::from_main("rain"), ConditionCategory::Rain);
        assert_eq!(ConditionCategory::from_main("Snow"), ConditionCategory::Snow);
        assert_eq!(ConditionCategory::from_main("Thunderstorm"), ConditionCategory::Thunderstorm);
    }

    #[test]
    fn atmosphere_groups_collapse_to_mist() {
        for main in ["Mist", "Drizzle", "Fog", "Haze", "Smoke", "Dust", "Sand", "Ash"] {
            assert_eq!(ConditionCategory::from_main(main), ConditionCategory::Mist, "{main}");
        }
    }

    #[test]
    fn squall_and_tornado_are_windy() {
        assert_eq!(ConditionCategory::from_main("Squall"), ConditionCategory::Windy);
        assert_eq!(ConditionCategory::from_main("Tornado"), ConditionCategory::Windy);
    }

    #[test]
    fn unknown_group_uses_default_variant() {
        let category = ConditionCategory::from_main("Volcano");
        assert_eq!(category, ConditionCategory::Unknown);
        assert_eq!(category.variant(), "default");
        assert_eq!(category.advice(), ConditionCategory::Mist.advice());
    }

    #[test]
    fn snapshot_without_condition_is_unknown() {
        let mut snap = snapshot("Somewhere");
        assert_eq!(ConditionCategory::of(&snap), ConditionCategory::Clouds);

        snap.condition = None;
        assert_eq!(ConditionCategory::of(&snap), ConditionCategory::Unknown);
    }
}
