use crate::flight_search::FlightData;
use crate::models::TravelRequest;

/// Appended to the plan prompt when flights were requested but the lookup
/// came back empty-handed.
pub const FLIGHT_UNAVAILABLE_NOTE: &str =
    "Note: Could not retrieve flight information. The travel plan will continue without flight details.";

/// Chat equivalent of the note above.
pub const CHAT_FLIGHT_UNAVAILABLE_NOTE: &str =
    "Note: Could not retrieve real-time flight information.";

/// Raw provider payload embedded in the plan prompt is cut off here to keep
/// the prompt bounded.
const RAW_PAYLOAD_LIMIT: usize = 1000;

/// A question containing any of these (case-insensitive) pulls fresh flight
/// data into the follow-up prompt.
const FLIGHT_KEYWORDS: &[&str] = &["flight", "airline", "ticket", "fare", "cheapest", "price"];

/// Flight-lookup outcome as seen by the plan prompt.
pub enum FlightContext<'a> {
    /// `include_flights` was off; the prompt says nothing about flights.
    NotRequested,
    Available(&'a FlightData),
    Unavailable,
}

/// Builds the itinerary-generation prompt. The seven numbered section labels
/// are fixed and always present, whatever the flight context.
pub fn plan_prompt(request: &TravelRequest, flights: FlightContext<'_>) -> String {
    let interests = if request.interests.is_empty() {
        "Not specified".to_string()
    } else {
        request.interests.join(", ")
    };

    let mut prompt = format!(
        "Create a detailed travel plan with the following details:\n\
         From: {}\n\
         To: {}\n\
         Dates: {} to {}\n\
         Budget: ${}\n\
         Number of Travelers: {}\n\
         Interests: {}\n\
         \n\
         Please provide:\n\
         1. Day-by-day itinerary\n\
         2. Estimated costs breakdown\n\
         3. Recommended accommodations\n\
         4. Must-visit places based on the interests\n\
         5. Local transportation options\n\
         6. Food recommendations\n\
         7. Tips and precautions\n",
        request.origin,
        request.destination,
        request.start_date,
        request.end_date,
        request.budget,
        request.travelers,
        interests,
    );

    match flights {
        FlightContext::NotRequested => {}
        FlightContext::Available(data) => {
            prompt.push_str(&flight_analysis_block(data));
        }
        FlightContext::Unavailable => {
            prompt.push_str("\n\n");
            prompt.push_str(FLIGHT_UNAVAILABLE_NOTE);
        }
    }

    prompt
}

fn flight_analysis_block(data: &FlightData) -> String {
    format!(
        "\n\
         First, analyze these flight options (showing top 3 best flights) for the journey:\n\
         {}\n\
         \n\
         Please analyze these flights and create a markdown table showing the best options, including:\n\
         - Airline and flight numbers\n\
         - Departure and arrival times\n\
         - Total duration\n\
         - Price\n\
         - Key features (like legroom, Wi-Fi, etc.)\n\
         - Layover information if any\n\
         \n\
         After the flight analysis, please provide a comprehensive travel plan that includes:\n\
         - A day-by-day itinerary\n\
         - All the other requested information (costs, accommodations, places to visit, etc.)\n\
         \n\
         Make sure to separate the flight analysis and travel plan with clear headings.\n",
        truncate_chars(&data.raw.to_string(), RAW_PAYLOAD_LIMIT)
    )
}

/// Flight context for the follow-up prompt: the table is pre-formatted by
/// the time it gets here.
pub enum ChatFlightContext<'a> {
    NotRequested,
    Table(&'a str),
    Unavailable,
}

/// Builds the follow-up prompt around the previously generated plan.
pub fn chat_prompt(travel_plan: &str, question: &str, flights: ChatFlightContext<'_>) -> String {
    let flight_context = match flights {
        ChatFlightContext::NotRequested => String::new(),
        ChatFlightContext::Table(table) => {
            format!("\n\n### Real-Time Flight Data (via SerpAPI)\n{}", table)
        }
        ChatFlightContext::Unavailable => format!("\n\n{}", CHAT_FLIGHT_UNAVAILABLE_NOTE),
    };

    format!(
        "Given this travel plan:\n\
         {}\
         {}\n\
         \n\
         Please answer this question about the plan (and, if available, use the real-time flight data above):\n\
         {}\n\
         \n\
         Provide a clear and concise response, using markdown formatting where appropriate.\n\
         If the question is about something not covered in the plan, suggest relevant information or alternatives.\n",
        travel_plan, flight_context, question,
    )
}

/// Case-insensitive substring scan over the fixed keyword set.
pub fn needs_flight_data(question: &str) -> bool {
    let question = question.to_lowercase();
    FLIGHT_KEYWORDS.iter().any(|kw| question.contains(kw))
}

/// Byte-safe truncation to at most `limit` characters.
fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}
