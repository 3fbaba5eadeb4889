//! Booking, map and affiliate widget links.
//!
//! Everything here is a pure function of its inputs: the same hotel, city or
//! country always yields the same URLs.

use serde::Serialize;
use url::form_urlencoded;

/// Hotel widget provider host.
const WIDGET_BASE: &str = "https://tp.media/content";
/// Partner marker shared by both widgets.
const SHMARKER: &str = "123456";
/// Tracking source shared by both widgets.
const TRS: &str = "264079";

/// Form-encode a query value (spaces become `+`).
///
/// This is the WHATWG `application/x-www-form-urlencoded` byte set: ASCII
/// alphanumerics and `*-._` pass through, everything else is percent-encoded.
/// Python's `quote_plus` differs on two characters: `~` becomes `%7E` here
/// (Python keeps it) and `*` is kept here (Python writes `%2A`). Both forms
/// decode to the same value on the receiving site.
pub fn quote_plus(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// Search links for one hotel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingLinks {
    pub booking: String,
    pub agoda: String,
    pub google_maps: String,
}

impl BookingLinks {
    /// (label, url) pairs in display order.
    pub fn entries(&self) -> [(&'static str, &str); 3] {
        [
            ("Booking.com", self.booking.as_str()),
            ("Agoda", self.agoda.as_str()),
            ("Google Maps", self.google_maps.as_str()),
        ]
    }
}

/// Build hotel search links for `"{hotel} {city}"`.
pub fn booking_links(hotel: &str, city: &str) -> BookingLinks {
    let query = quote_plus(&format!("{} {}", hotel, city));
    BookingLinks {
        booking: format!("https://www.booking.com/searchresults.html?ss={}", query),
        agoda: format!("https://www.agoda.com/search?city={}", query),
        google_maps: format!("https://www.google.com/maps?q={}", query),
    }
}

/// Map search for hotels and sights in a city.
pub fn map_search_link(city: &str) -> String {
    format!(
        "https://www.google.com/maps/search/?api=1&query={}",
        quote_plus(&format!("{} hotels and attractions", city))
    )
}

/// Which affiliate search an embedded widget runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetKind {
    Hotels,
    Flights,
}

/// An affiliate search widget embedded as an inline frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AffiliateWidget {
    pub kind: WidgetKind,
    pub src: String,
}

impl AffiliateWidget {
    pub const WIDTH: &'static str = "100%";
    pub const HEIGHT: u32 = 250;

    /// The `<iframe>` element for this widget.
    pub fn iframe(&self) -> String {
        format!(
            "<iframe src='{}' width='{}' height='{}' frameborder='0'></iframe>",
            self.src.replace('&', "&amp;"),
            Self::WIDTH,
            Self::HEIGHT
        )
    }
}

/// Hotel and flight widgets for a destination, priced in USD.
pub fn affiliate_widgets(city: &str, country: &str) -> [AffiliateWidget; 2] {
    let city = quote_plus(city);
    let country = quote_plus(country);

    let hotels = format!(
        "{WIDGET_BASE}?promo_id=4045&shmarker={SHMARKER}&campaign_id=100&trs={TRS}\
         &locale=en&powered_by=false&searchUrl=hotels&hotel_id=&city={city}\
         &country={country}&lang=en&currency=usd"
    );
    let flights = format!(
        "{WIDGET_BASE}?promo_id=4044&shmarker={SHMARKER}&campaign_id=101&trs={TRS}\
         &locale=en&powered_by=false&searchUrl=flights&city_from=&city_to={city}\
         &lang=en&currency=usd"
    );

    [
        AffiliateWidget {
            kind: WidgetKind::Hotels,
            src: hotels,
        },
        AffiliateWidget {
            kind: WidgetKind::Flights,
            src: flights,
        },
    ]
}

/// Static flight-search banner pinned to the corner of the plan page.
pub fn flight_banner() -> &'static str {
    "<div style='position:fixed;bottom:15px;right:15px;z-index:1000;'>\
     <a href='https://www.skyscanner.com/' target='_blank'>\
     <img src='https://www.travelpayouts.com/img/banners/728x90_en_flight.png' width='240'/></a>\
     </div>"
}
