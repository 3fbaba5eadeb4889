//! Static choices offered by the planner form.

/// Number of days preselected in the form.
pub const DEFAULT_DAYS: u8 = 5;

/// Interests prefilled in the form.
pub const DEFAULT_INTERESTS: &str = "beaches, adventure, seafood";

/// Countries (with flag) and the cities offered for each.
pub const COUNTRIES: &[(&str, &[&str])] = &[
    ("India 🇮🇳", &["Goa", "Manali", "Udaipur", "Jaipur", "Kerala"]),
    ("Thailand 🇹🇭", &["Bangkok", "Phuket", "Chiang Mai", "Krabi"]),
    ("Italy 🇮🇹", &["Rome", "Venice", "Florence", "Milan"]),
    (
        "USA 🇺🇸",
        &["New York", "Los Angeles", "Las Vegas", "San Francisco", "Miami"],
    ),
    ("Japan 🇯🇵", &["Tokyo", "Kyoto", "Osaka", "Hokkaido"]),
    ("France 🇫🇷", &["Paris", "Nice", "Lyon", "Marseille"]),
    (
        "Australia 🇦🇺",
        &["Sydney", "Melbourne", "Brisbane", "Gold Coast"],
    ),
    ("UAE 🇦🇪", &["Dubai", "Abu Dhabi", "Sharjah"]),
    ("UK 🇬🇧", &["London", "Edinburgh", "Manchester", "Birmingham"]),
    (
        "South Africa 🇿🇦",
        &["Cape Town", "Johannesburg", "Durban", "Pretoria"],
    ),
];

/// Currency labels and their symbols, in display order.
pub const CURRENCIES: &[(&str, &str)] = &[
    ("INR (₹)", "₹"),
    ("USD ($)", "$"),
    ("EUR (€)", "€"),
    ("JPY (¥)", "¥"),
    ("AED (د.إ)", "د.إ"),
    ("GBP (£)", "£"),
    ("ZAR (R)", "R"),
];

/// Cities for a country label. Unknown countries have none.
pub fn cities(country: &str) -> &'static [&'static str] {
    COUNTRIES
        .iter()
        .find(|(name, _)| *name == country)
        .map(|(_, cities)| *cities)
        .unwrap_or(&[])
}

/// The first country in the table, preselected in the form.
pub fn default_country() -> &'static str {
    COUNTRIES[0].0
}

/// Look up the symbol for a currency label such as "EUR (€)".
///
/// Also accepts the bare code ("EUR") or the symbol itself.
pub fn currency_symbol(label: &str) -> Option<&'static str> {
    let label = label.trim();
    CURRENCIES
        .iter()
        .find(|(name, symbol)| {
            *name == label
                || *symbol == label
                || name
                    .split_whitespace()
                    .next()
                    .is_some_and(|code| code.eq_ignore_ascii_case(label))
        })
        .map(|(_, symbol)| *symbol)
}
