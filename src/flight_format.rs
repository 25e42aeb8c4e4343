use crate::flight_search::{FlightData, FlightOption};

/// Fixed response when the lookup produced nothing usable.
pub const NO_FLIGHTS_MESSAGE: &str = "No flights available for this route.";

/// Options rendered per table, in provider order.
const MAX_OPTIONS: usize = 3;
/// Feature tags rendered per option.
const MAX_FEATURES: usize = 3;
/// Tags carrying this marker are noise for a booking table.
const CARBON_TAG: &str = "Carbon emissions";

const BOOKING_URL: &str = "https://www.google.com/flights?hl=en#flt=";

/// Renders the lookup result as a markdown table of at most three options.
/// `origin`/`destination` are expected pre-normalized (uppercased codes);
/// they only feed the synthetic booking link, which points at a flights
/// search page rather than any specific itinerary.
pub fn format_flight_table(
    data: Option<&FlightData>,
    origin: &str,
    destination: &str,
    date: &str,
) -> String {
    let options = match data {
        Some(data) if !data.options.is_empty() => &data.options,
        _ => return NO_FLIGHTS_MESSAGE.to_string(),
    };

    let mut markdown = String::from("## Available Flight Options\n\n");
    markdown.push_str("| Airline | Flight(s) | Departure | Arrival | Duration | Price | Features |\n");
    markdown.push_str("|---------|-----------|-----------|----------|----------|--------|----------|\n");

    for option in options.iter().take(MAX_OPTIONS) {
        markdown.push_str(&format_option_row(option, origin, destination, date));
    }

    markdown
}

fn format_option_row(
    option: &FlightOption,
    origin: &str,
    destination: &str,
    date: &str,
) -> String {
    let first = option.flights.first();
    let last = option.flights.last();

    let airline = first.map(|f| f.airline.as_str()).unwrap_or_default();

    let flight_numbers = option
        .flights
        .iter()
        .map(|f| format!("{} {}", f.airline, f.flight_number))
        .collect::<Vec<_>>()
        .join(" + ");

    let departure = first
        .map(|f| format!("{} ({})", f.departure_airport.name, f.departure_airport.time))
        .unwrap_or_default();
    let arrival = last
        .map(|f| format!("{} ({})", f.arrival_airport.name, f.arrival_airport.time))
        .unwrap_or_default();

    let duration = format_duration(option.total_duration);
    let features = collect_features(option).join("<br>");

    let mut row = format!(
        "| {} | {} | {} | {} | {} | ${} | {} |\n",
        airline, flight_numbers, departure, arrival, duration, option.price, features
    );

    row.push_str(&format!(
        "*[Book Now]({}{}.{}.{})*\n\n",
        BOOKING_URL, origin, destination, date
    ));

    if let Some(layover) = option.layovers.first() {
        row.push_str(&format!(
            "*Layover at: {} ({})*\n\n",
            layover.name,
            format_duration(layover.duration)
        ));
    }

    row
}

/// `125` → `"2h 5m"`. Minutes in, whole hours and the remainder out.
pub fn format_duration(minutes: u32) -> String {
    format!("{}h {}m", minutes / 60, minutes % 60)
}

/// Deduplicated feature tags across all segments, first-seen order, carbon
/// tags dropped, capped at three.
fn collect_features(option: &FlightOption) -> Vec<&str> {
    let mut features: Vec<&str> = Vec::new();
    for segment in &option.flights {
        for extension in &segment.extensions {
            if extension.contains(CARBON_TAG) {
                continue;
            }
            if !features.contains(&extension.as_str()) {
                features.push(extension);
            }
        }
    }
    features.truncate(MAX_FEATURES);
    features
}
