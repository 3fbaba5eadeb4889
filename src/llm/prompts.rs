//! LLM prompts for trip planning.

use crate::trip::TripRequest;

/// Collection of prompts sent to the text-generation backend.
pub struct Prompts;

impl Prompts {
    /// Prompt asking for a full trip plan: seasonal tips, budget, hotels, flights
    /// and a day-by-day itinerary, formatted as markdown.
    ///
    /// Pure and deterministic: the same request always yields the same prompt.
    pub fn trip_plan(req: &TripRequest) -> String {
        let budget_scope = if req.include_flights {
            "with flights"
        } else {
            "excluding flights"
        };

        format!(
            r#"
You are a professional travel planner AI.

Plan a {days}-day {style} trip to {city}, {country} in {month}.

🧳 Preferences:
- Interests: {interests}
- Include flights: {flights}

💡 Provide:
1. Seasonal tips: is {month} good? Pros/cons.
2. Realistic total budget in {currency} ({budget_scope})
3. Top 3 hotels with price + links: Booking, Agoda, Maps (use dummy prices for hotels if not specified by user. Provide a range e.g. 100-200 USD)
4. Top 3 flights with price (use dummy airline info, provide a range e.g. 300-500 USD) + links: Skyscanner, MMT
5. Day-wise itinerary with activities, food, hotel, tips.

Format:
- Use clear paragraphs for each section
- Separate hotels and flights as markdown bullet lists
- Then write itinerary:
  - **Day 1**: ...
  - **Day 2**: ... etc.

Use markdown formatting and spacing.
"#,
            days = req.days,
            style = req.travel_style,
            city = req.city,
            country = req.country,
            month = req.month,
            interests = req.interests,
            flights = req.flight_option(),
            currency = req.currency_symbol,
            budget_scope = budget_scope,
        )
    }

    /// Short prompt used to check that a backend answers at all.
    pub fn connection_check() -> &'static str {
        "Say 'hello' and nothing else."
    }
}
