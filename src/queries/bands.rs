//! Categorical bands for continuous values.
//!
//! Each classifier tests thresholds low to high and the first match wins, so
//! every input (NaN included) lands in exactly one band. Labels carry an
//! ordinal prefix so that sorting by label text gives the same order as the
//! variant order.

use crate::records::WeatherRecord;

/// Part of the day a trip started in.
///
/// | Hour        | Band      |
/// |-------------|-----------|
/// | 6..10       | Morning   |
/// | 10..14      | Midday    |
/// | 14..18      | Afternoon |
/// | 18..22      | Evening   |
/// | otherwise   | Night     |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimeOfDay {
    Morning,
    Midday,
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    pub fn of_hour(hour: u32) -> Self {
        match hour {
            6..10 => TimeOfDay::Morning,
            10..14 => TimeOfDay::Midday,
            14..18 => TimeOfDay::Afternoon,
            18..22 => TimeOfDay::Evening,
            _ => TimeOfDay::Night,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeOfDay::Morning => "1. Morning (6-10)",
            TimeOfDay::Midday => "2. Midday (10-14)",
            TimeOfDay::Afternoon => "3. Afternoon (14-18)",
            TimeOfDay::Evening => "4. Evening (18-22)",
            TimeOfDay::Night => "5. Night (22-6)",
        }
    }
}

/// Total cloud cover: below 20%, below 70%, the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CloudCover {
    Clear,
    PartlyCloudy,
    VeryCloudy,
}

impl CloudCover {
    pub fn of_percent(cover: f64) -> Self {
        if cover < 20.0 {
            CloudCover::Clear
        } else if cover < 70.0 {
            CloudCover::PartlyCloudy
        } else {
            CloudCover::VeryCloudy
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CloudCover::Clear => "1. Clear Sky (0-20%)",
            CloudCover::PartlyCloudy => "2. Partly Cloudy (20-70%)",
            CloudCover::VeryCloudy => "3. Very Cloudy (> 70%)",
        }
    }
}

/// Wind speed in km/h: below 10, below 20, the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WindSpeed {
    Calm,
    Breezy,
    Windy,
}

impl WindSpeed {
    pub fn of_kmh(speed: f64) -> Self {
        if speed < 10.0 {
            WindSpeed::Calm
        } else if speed < 20.0 {
            WindSpeed::Breezy
        } else {
            WindSpeed::Windy
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WindSpeed::Calm => "1. Calm (< 10 km/h)",
            WindSpeed::Breezy => "2. Breezy (10-20 km/h)",
            WindSpeed::Windy => "3. Windy (> 20 km/h)",
        }
    }
}

/// Any rain or precipitation in the hour counts as raining.
///
/// The two labels already sort in variant order without a prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RainCondition {
    NotRaining,
    Raining,
}

impl RainCondition {
    pub fn of(weather: &WeatherRecord) -> Self {
        if weather.is_raining() {
            RainCondition::Raining
        } else {
            RainCondition::NotRaining
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RainCondition::NotRaining => "Not raining",
            RainCondition::Raining => "Raining",
        }
    }
}
