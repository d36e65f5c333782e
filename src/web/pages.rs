//! Server-rendered HTML for the search form and its results

use crate::models::{HotelOffer, ItineraryCandidate};
use crate::planner::{CombinedResult, SearchOutcome};

use super::form::FormValues;

const MODES: [(&str, &str); 4] = [
    ("hotel_period", "Hotels for fixed dates"),
    ("hotel_month", "Cheapest hotel stay in a month"),
    ("flight_hotel_period", "Flight + hotel for fixed dates"),
    ("flight_hotel_month", "Cheapest flight + hotel in a month"),
];

const STYLE: &str = "body{font-family:sans-serif;max-width:960px;margin:2em auto;padding:0 1em}\
fieldset{margin-bottom:1em}label{display:inline-block;margin:0 1em .5em 0}\
table{border-collapse:collapse;width:100%}td,th{border:1px solid #ccc;padding:.3em .5em;text-align:left}\
.error{background:#fdd;border:1px solid #c66;padding:.5em 1em}.total{font-size:1.3em;font-weight:bold}";

/// Escape text for HTML element content and quoted attribute values
#[must_use]
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n{body}\n</body>\n</html>\n",
        escape(title)
    )
}

/// Form target that keeps the access key on resubmission
fn form_action(key: Option<&str>) -> String {
    match key {
        Some(key) => format!("/travel?key={}", urlencoding::encode(key)),
        None => "/travel".to_string(),
    }
}

fn input(label: &str, name: &str, value: &str) -> String {
    format!(
        "<label>{} <input name=\"{name}\" value=\"{}\"></label>",
        escape(label),
        escape(value)
    )
}

fn select(label: &str, name: &str, options: &[(&str, &str)], selected: &str) -> String {
    let options: String = options
        .iter()
        .map(|(value, text)| {
            let marker = if *value == selected { " selected" } else { "" };
            format!("<option value=\"{value}\"{marker}>{}</option>", escape(text))
        })
        .collect();
    format!("<label>{} <select name=\"{name}\">{options}</select></label>", escape(label))
}

fn search_form(values: &FormValues, key: Option<&str>) -> String {
    let mut html = format!(
        "<form method=\"post\" action=\"{}\">\n",
        escape(&form_action(key))
    );
    html.push_str("<fieldset><legend>Search</legend>");
    html.push_str(&select("Mode", "mode", &MODES, &values.mode));
    html.push_str("</fieldset>\n<fieldset><legend>Hotel</legend>");
    html.push_str(&input("City", "city", &values.city));
    html.push_str(&input("Country", "country", &values.country));
    html.push_str(&input("Adults", "adults", &values.adults.to_string()));
    html.push_str(&input("Min stars", "min_stars", &values.min_stars.to_string()));
    html.push_str(&input("Max stars", "max_stars", &values.max_stars.to_string()));
    html.push_str(&input("Currency", "currency", &values.currency));
    html.push_str(&input("Guest nationality", "guest_nat", &values.guest_nat));
    html.push_str(&input("Result limit", "limit", &values.limit.to_string()));
    html.push_str("</fieldset>\n<fieldset><legend>Fixed dates</legend>");
    html.push_str(&input("Check-in", "checkin", &values.checkin));
    html.push_str(&input("Check-out", "checkout", &values.checkout));
    html.push_str(&input("Top hotels", "top_n", &values.top_n.to_string()));
    html.push_str("</fieldset>\n<fieldset><legend>Month scan</legend>");
    html.push_str(&input("Year", "year", &values.year.to_string()));
    html.push_str(&input("Month", "month", &values.month.to_string()));
    html.push_str(&input("Nights", "nights", &values.nights.to_string()));
    html.push_str("</fieldset>\n<fieldset><legend>Flight</legend>");
    html.push_str(&input("From", "origin", &values.origin));
    html.push_str(&input("To", "dest", &values.dest));
    html.push_str(&select(
        "Trip",
        "trip",
        &[("round-trip", "Round trip"), ("one-way", "One way")],
        &values.trip,
    ));
    html.push_str(&select(
        "Seat",
        "seat",
        &[
            ("economy", "Economy"),
            ("premium_economy", "Premium economy"),
            ("business", "Business"),
            ("first", "First"),
        ],
        &values.seat,
    ));
    html.push_str(&input("Passengers", "flight_adults", &values.flight_adults.to_string()));
    html.push_str(&input("Top hotels", "fh_top_n", &values.fh_top_n.to_string()));
    html.push_str("</fieldset>\n<button type=\"submit\">Search</button>\n</form>\n");
    html
}

fn hotel_table(offers: &[HotelOffer]) -> String {
    let mut html = String::from(
        "<table>\n<tr><th>#</th><th>Hotel</th><th>Stars</th><th>Address</th>\
         <th>Check-in</th><th>Check-out</th><th>Price</th><th>Cancellation</th></tr>\n",
    );
    for offer in offers {
        let stars = offer
            .star_rating
            .map_or_else(|| "-".to_string(), |s| format!("{s:.1}"));
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{stars}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            offer.rank,
            escape(&offer.name),
            escape(&offer.address),
            offer.stay.check_in,
            offer.stay.check_out,
            escape(&offer.price.format()),
            escape(&offer.refundable_tag),
        ));
    }
    html.push_str("</table>\n");
    html
}

fn flight_summary(flight: &ItineraryCandidate) -> String {
    let dates = match flight.return_date {
        Some(return_date) => format!("{} to {return_date}", flight.depart_date),
        None => flight.depart_date.to_string(),
    };
    format!(
        "<p>{}: {} on {dates}, {} (listed as {})</p>\n",
        escape(&flight.route.to_string()),
        escape(&flight.airline),
        escape(&flight.price.format()),
        escape(&flight.price_raw),
    )
}

fn combined_summary(combined: &CombinedResult) -> String {
    format!(
        "<p class=\"total\">Total {}</p>\n<p>Flight {} + {} ({} nights) {}</p>\n",
        escape(&combined.total.format()),
        escape(&combined.itinerary.price.format()),
        escape(&combined.hotel.name),
        combined.stay.nights(),
        escape(&combined.hotel.price.format()),
    )
}

fn results(outcome: &SearchOutcome) -> String {
    let mut html = String::from("<section>\n");
    match outcome {
        SearchOutcome::HotelPeriod { hotels } => {
            html.push_str("<h2>Hotels</h2>\n");
            html.push_str(&hotel_table(hotels));
        }
        SearchOutcome::HotelMonth { scan } => {
            html.push_str("<h2>Cheapest stay</h2>\n");
            html.push_str(&hotel_table(std::slice::from_ref(&scan.cheapest)));
            html.push_str("<h2>Cheapest hotel per check-in date</h2>\n");
            html.push_str(&hotel_table(&scan.daily));
        }
        SearchOutcome::FlightHotelPeriod {
            hotels,
            flight,
            flight_error,
            combined,
        } => {
            html.push_str("<h2>Flight</h2>\n");
            if let Some(flight) = flight {
                html.push_str(&flight_summary(flight));
            }
            if let Some(message) = flight_error {
                html.push_str(&format!("<p class=\"error\">{}</p>\n", escape(message)));
            }
            if let Some(combined) = combined {
                html.push_str(&combined_summary(combined));
            }
            html.push_str("<h2>Hotels</h2>\n");
            html.push_str(&hotel_table(hotels));
        }
        SearchOutcome::FlightHotelMonth {
            flight,
            hotels,
            combined,
        } => {
            html.push_str("<h2>Cheapest flight of the month</h2>\n");
            html.push_str(&flight_summary(flight));
            html.push_str(&combined_summary(combined));
            html.push_str("<h2>Hotels for those dates</h2>\n");
            html.push_str(&hotel_table(hotels));
        }
    }
    html.push_str("</section>\n");
    html
}

/// The search page: form, then either the error block or the results
#[must_use]
pub fn travel_page(
    values: &FormValues,
    key: Option<&str>,
    outcome: Option<&SearchOutcome>,
    error: Option<&str>,
) -> String {
    let mut body = String::from("<h1>Farescan</h1>\n");
    body.push_str(&search_form(values, key));
    if let Some(message) = error {
        body.push_str(&format!("<div class=\"error\">{}</div>\n", escape(message)));
    }
    if let Some(outcome) = outcome {
        body.push_str(&results(outcome));
    }
    layout("Farescan", &body)
}

#[must_use]
pub fn forbidden_page(message: &str) -> String {
    layout(
        "Access denied",
        &format!("<h1>403</h1>\n<p>{}</p>", escape(message)),
    )
}
