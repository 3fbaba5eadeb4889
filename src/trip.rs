//! Trip request model.
//!
//! A [`TripRequest`] is built once per form submission, validated, turned into
//! a prompt and then dropped. Raw form input arrives as a [`TripForm`] and is
//! converted with `TryFrom`, which is where validation happens.

use crate::catalog;
use crate::error::{Result, TripPlannerError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Shortest trip the planner accepts.
pub const MIN_DAYS: u8 = 1;
/// Longest trip the planner accepts.
pub const MAX_DAYS: u8 = 14;

/// Travel style, which drives the budget tier in the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TravelStyle {
    Budget,
    Standard,
    Luxury,
    Backpacking,
    Family,
}

impl TravelStyle {
    pub const ALL: [TravelStyle; 5] = [
        TravelStyle::Budget,
        TravelStyle::Standard,
        TravelStyle::Luxury,
        TravelStyle::Backpacking,
        TravelStyle::Family,
    ];

    /// Plain name, as embedded in prompts.
    pub fn name(&self) -> &'static str {
        match self {
            TravelStyle::Budget => "Budget",
            TravelStyle::Standard => "Standard",
            TravelStyle::Luxury => "Luxury",
            TravelStyle::Backpacking => "Backpacking",
            TravelStyle::Family => "Family",
        }
    }

    /// Decorated label shown in the form.
    pub fn label(&self) -> &'static str {
        match self {
            TravelStyle::Budget => "Budget 🛏️",
            TravelStyle::Standard => "Standard ✈️",
            TravelStyle::Luxury => "Luxury 💎",
            TravelStyle::Backpacking => "Backpacking 🎒",
            TravelStyle::Family => "Family 👨‍👩‍👧‍👦",
        }
    }
}

impl fmt::Display for TravelStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TravelStyle {
    type Err = TripPlannerError;

    /// Accepts the plain name or the decorated form label, case-insensitively.
    fn from_str(s: &str) -> Result<Self> {
        let word = s.split_whitespace().next().unwrap_or_default();
        TravelStyle::ALL
            .into_iter()
            .find(|style| style.name().eq_ignore_ascii_case(word))
            .ok_or_else(|| {
                TripPlannerError::InvalidRequest(format!("unknown travel style '{}'", s))
            })
    }
}

/// Month of travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Month {
    type Err = TripPlannerError;

    /// Accepts full names and three-letter abbreviations, case-insensitively.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        Month::ALL
            .into_iter()
            .find(|month| {
                let name = month.name();
                name.eq_ignore_ascii_case(s) || (s.len() == 3 && name[..3].eq_ignore_ascii_case(s))
            })
            .ok_or_else(|| TripPlannerError::InvalidRequest(format!("unknown month '{}'", s)))
    }
}

/// Structured trip-planning inputs for one submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TripRequest {
    pub city: String,
    pub country: String,
    pub days: u8,
    pub interests: String,
    pub currency_symbol: String,
    pub travel_style: TravelStyle,
    pub include_flights: bool,
    pub month: Month,
}

impl TripRequest {
    /// Create a request for a destination with the form's default preferences.
    pub fn new(city: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            country: country.into(),
            days: catalog::DEFAULT_DAYS,
            interests: catalog::DEFAULT_INTERESTS.to_string(),
            currency_symbol: "$".to_string(),
            travel_style: TravelStyle::Standard,
            include_flights: false,
            month: Month::January,
        }
    }

    pub fn with_days(mut self, days: u8) -> Self {
        self.days = days;
        self
    }

    pub fn with_interests(mut self, interests: impl Into<String>) -> Self {
        self.interests = interests.into();
        self
    }

    pub fn with_currency(mut self, symbol: impl Into<String>) -> Self {
        self.currency_symbol = symbol.into();
        self
    }

    pub fn with_style(mut self, style: TravelStyle) -> Self {
        self.travel_style = style;
        self
    }

    pub fn with_flights(mut self, include: bool) -> Self {
        self.include_flights = include;
        self
    }

    pub fn with_month(mut self, month: Month) -> Self {
        self.month = month;
        self
    }

    /// Check the request against the form's constraints.
    pub fn validate(&self) -> Result<()> {
        if self.city.trim().is_empty() {
            return Err(TripPlannerError::InvalidRequest(
                "city is required".to_string(),
            ));
        }
        if self.country.trim().is_empty() {
            return Err(TripPlannerError::InvalidRequest(
                "country is required".to_string(),
            ));
        }
        if !(MIN_DAYS..=MAX_DAYS).contains(&self.days) {
            return Err(TripPlannerError::InvalidRequest(format!(
                "days must be between {} and {}, got {}",
                MIN_DAYS, MAX_DAYS, self.days
            )));
        }
        Ok(())
    }

    /// "Yes" or "No", the way the form's radio button reads.
    pub fn flight_option(&self) -> &'static str {
        if self.include_flights { "Yes" } else { "No" }
    }
}

/// Raw trip form as submitted by the browser or the JSON API.
#[derive(Debug, Clone, Deserialize)]
pub struct TripForm {
    pub city: String,
    pub country: String,
    pub days: u8,
    #[serde(default)]
    pub interests: String,
    /// Either a catalog label such as "INR (₹)" or a bare symbol.
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_style")]
    pub travel_style: String,
    #[serde(default, deserialize_with = "yes_no")]
    pub include_flights: bool,
    pub month: String,
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_style() -> String {
    TravelStyle::Standard.name().to_string()
}

/// Accepts a JSON bool or the form's "Yes"/"No" strings.
fn yes_no<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum YesNo {
        Bool(bool),
        Text(String),
    }

    match YesNo::deserialize(deserializer)? {
        YesNo::Bool(b) => Ok(b),
        YesNo::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
            "yes" | "true" | "on" | "1" => Ok(true),
            "no" | "false" | "off" | "0" | "" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "expected Yes or No, got '{}'",
                other
            ))),
        },
    }
}

impl TryFrom<TripForm> for TripRequest {
    type Error = TripPlannerError;

    fn try_from(form: TripForm) -> Result<Self> {
        let currency_symbol = catalog::currency_symbol(&form.currency)
            .map(str::to_string)
            .unwrap_or_else(|| form.currency.trim().to_string());

        let request = TripRequest {
            city: form.city.trim().to_string(),
            country: form.country.trim().to_string(),
            days: form.days,
            interests: form.interests.trim().to_string(),
            currency_symbol,
            travel_style: form.travel_style.parse()?,
            include_flights: form.include_flights,
            month: form.month.parse()?,
        };
        request.validate()?;
        Ok(request)
    }
}
