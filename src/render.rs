//! HTML rendering: generated markdown and the planner pages.

use crate::catalog;
use crate::links::{affiliate_widgets, flight_banner, map_search_link};
use crate::llm::GenerationResult;
use crate::trip::{MAX_DAYS, MIN_DAYS, Month, TravelStyle, TripRequest};
use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, html};
use std::fmt::Write;

/// What to do with HTML embedded in generated markdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RawHtml {
    /// Show embedded HTML as text and neutralize `javascript:` links.
    #[default]
    Escape,
    /// Pass embedded HTML through untouched. Only for trusted backends.
    Allow,
}

impl RawHtml {
    pub fn from_allow(allow: bool) -> Self {
        if allow { RawHtml::Allow } else { RawHtml::Escape }
    }
}

/// Render markdown to an HTML fragment.
pub fn render_markdown(text: &str, policy: RawHtml) -> String {
    let parser = Parser::new_ext(text, Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH);
    let mut out = String::with_capacity(text.len() * 3 / 2);

    match policy {
        RawHtml::Allow => html::push_html(&mut out, parser),
        RawHtml::Escape => html::push_html(&mut out, parser.map(neutralize)),
    }
    out
}

fn neutralize(event: Event<'_>) -> Event<'_> {
    match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) if is_script_url(&dest_url) => Event::Start(Tag::Link {
            link_type,
            dest_url: CowStr::Borrowed("#"),
            title,
            id,
        }),
        other => other,
    }
}

fn is_script_url(url: &str) -> bool {
    let scheme: String = url
        .trim_start()
        .chars()
        .take(11)
        .collect::<String>()
        .to_ascii_lowercase();
    ["javascript:", "vbscript:", "data:"]
        .iter()
        .any(|prefix| scheme.starts_with(prefix))
}

/// Escape text for use in HTML content or a quoted attribute.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    // Writing into a String cannot fail.
    let _ = pulldown_cmark_escape::escape_html(&mut out, text);
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>
body {{ font-family: sans-serif; max-width: 760px; margin: 2rem auto; padding: 0 1rem; }}
label {{ display: block; margin-top: .75rem; }}
.error {{ color: #b00020; white-space: pre-wrap; }}
</style>
</head>
<body>
<h1>🌐 AI Trip Planner: Flights + Hotels + Itinerary</h1>
<p>Smart planning with live price comparison and map links.</p>
{body}
</body>
</html>
"#,
        title = escape_html(title),
        body = body
    )
}

fn options<'a, I>(values: I, selected: &str) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out = String::new();
    for value in values {
        let mark = if value == selected { " selected" } else { "" };
        let value = escape_html(value);
        let _ = write!(out, r#"<option value="{value}"{mark}>{value}</option>"#);
    }
    out
}

/// The trip form. Cities are offered for `country`, falling back to the first catalog country.
pub fn form_page(country: Option<&str>) -> String {
    let country = country
        .filter(|c| !catalog::cities(c).is_empty())
        .unwrap_or(catalog::default_country());

    let countries = options(catalog::COUNTRIES.iter().map(|(name, _)| *name), country);
    let cities = options(catalog::cities(country).iter().copied(), "");
    let styles = options(TravelStyle::ALL.iter().map(|s| s.label()), "");
    let currencies = options(catalog::CURRENCIES.iter().map(|(label, _)| *label), "");
    let months = options(Month::ALL.iter().map(|m| m.name()), "");

    let body = format!(
        r#"<form method="get" action="/">
<label>🌍 Select Country <select name="country">{countries}</select></label>
<button type="submit">Show cities</button>
</form>
<form method="post" action="/plan">
<input type="hidden" name="country" value="{country}">
<label>🏙️ Select City <select name="city">{cities}</select></label>
<label>✈️ Travel Style <select name="travel_style">{styles}</select></label>
<label>💱 Currency <select name="currency">{currencies}</select></label>
<label>🕒 Number of Days <input type="number" name="days" min="{min}" max="{max}" value="{days}"></label>
<label>📅 Travel Month <select name="month">{months}</select></label>
<label>🎯 Your Interests <input type="text" name="interests" value="{interests}"></label>
<fieldset><legend>✈️ Include Flights?</legend>
<label><input type="radio" name="include_flights" value="Yes"> Yes</label>
<label><input type="radio" name="include_flights" value="No" checked> No</label>
</fieldset>
<button type="submit">🧠 Generate Trip Plan</button>
</form>"#,
        country = escape_html(country),
        min = MIN_DAYS,
        max = MAX_DAYS,
        days = catalog::DEFAULT_DAYS,
        interests = escape_html(catalog::DEFAULT_INTERESTS),
    );

    layout("AI Trip Planner", &body)
}

/// The result page: plan (or the error text in its place), map link and booking widgets.
pub fn plan_page(request: &TripRequest, result: &GenerationResult, policy: RawHtml) -> String {
    let plan = match result {
        GenerationResult::Text(markdown) => render_markdown(markdown, policy),
        GenerationResult::Failed(message) => {
            format!(r#"<p class="error">{}</p>"#, escape_html(message))
        }
    };

    let widgets: String = affiliate_widgets(&request.city, &request.country)
        .iter()
        .map(|w| w.iframe())
        .collect::<Vec<_>>()
        .join("\n");

    let body = format!(
        r#"<h2>🧠 AI-Powered Trip Plan</h2>
<section id="plan">
{plan}
</section>
<h2>📍 Maps of Suggested Places</h2>
<p><a href="{map}" target="_blank">🗺️ View Hotels and Sights in {city}</a></p>
<h2>🏨 Book Hotels and Compare Flights</h2>
{widgets}
{banner}
<p><a href="/?country={country_query}">Plan another trip</a></p>"#,
        map = escape_html(&map_search_link(&request.city)),
        city = escape_html(&request.city),
        banner = flight_banner(),
        country_query = crate::links::quote_plus(&request.country),
    );

    layout(&format!("Trip to {}", request.city), &body)
}

/// A page carrying only an error message.
pub fn error_page(message: &str) -> String {
    let body = format!(
        r#"<p class="error">{}</p>
<p><a href="/">Back to the form</a></p>"#,
        escape_html(message)
    );
    layout("AI Trip Planner", &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markdown_rendering() {
        let html = render_markdown("**Day 1**: Beach\n\n- Hotel A\n- Hotel B", RawHtml::Escape);
        assert!(html.contains("<strong>Day 1</strong>: Beach"));
        assert!(html.contains("<li>Hotel A</li>"));
    }

    #[test]
    fn test_raw_html_escaped_by_default() {
        let text = "Hello <script>alert(1)</script>";
        let html = render_markdown(text, RawHtml::default());
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_raw_html_allowed_when_configured() {
        let html = render_markdown("<div class=\"x\">hi</div>", RawHtml::Allow);
        assert!(html.contains("<div class=\"x\">hi</div>"));
    }

    #[test]
    fn test_script_links_neutralized() {
        let html = render_markdown("[click](javascript:alert(1))", RawHtml::Escape);
        assert!(html.contains(r##"<a href="#">click</a>"##));

        let html = render_markdown("[Booking](https://www.booking.com/)", RawHtml::Escape);
        assert!(html.contains(r#"href="https://www.booking.com/""#));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">&'"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;"
        );
        assert_eq!(escape_html("Hôtel 🇫🇷"), "Hôtel 🇫🇷");
    }

    #[test]
    fn test_error_page_escapes_message() {
        let html = error_page(r#"Invalid trip request: unknown month '<b>"x"'"#);
        assert!(html.contains("unknown month &#39;&lt;b&gt;&quot;x&quot;&#39;"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn test_form_page_lists_cities_for_country() {
        let html = form_page(Some("Japan 🇯🇵"));
        assert!(html.contains(r#"<option value="Kyoto">Kyoto</option>"#));
        assert!(html.contains(r#"<option value="Japan 🇯🇵" selected>"#));
        assert!(!html.contains(r#"<option value="Goa">"#));

        let fallback = form_page(Some("Atlantis"));
        assert!(fallback.contains(r#"<option value="Goa">Goa</option>"#));
    }

    #[test]
    fn test_plan_page_shows_error_in_place_of_plan() {
        let request = TripRequest::new("Goa", "India 🇮🇳");
        let result =
            GenerationResult::Failed("❌ No valid response from local model.".to_string());
        let html = plan_page(&request, &result, RawHtml::Escape);

        assert!(html.contains(r#"<p class="error">❌ No valid response from local model.</p>"#));
        assert!(html.contains("View Hotels and Sights in Goa"));
        assert!(html.contains("<iframe src='https://tp.media/content?promo_id=4045"));
        assert!(html.contains("<iframe src='https://tp.media/content?promo_id=4044"));
    }

    #[test]
    fn test_plan_page_renders_markdown() {
        let request = TripRequest::new("Paris", "France 🇫🇷");
        let result = GenerationResult::Text("## Seasonal tips\n\n**Day 1**: Louvre".to_string());
        let html = plan_page(&request, &result, RawHtml::Escape);
        assert!(html.contains("<h2>Seasonal tips</h2>"));
        assert!(html.contains("<strong>Day 1</strong>: Louvre"));
    }
}
