//! Prompt templates. Per-request variability lives here, never in the schemas.

use std::fmt::Write as _;

use super::types::{
    AdvisoryParams, ChecklistParams, DestinationParams, ItineraryParams, PhraseSheetParams,
    PriceQuoteParams,
};

pub const SYSTEM_INSTRUCTION: &str = "You are an experienced travel planner. \
Give concrete, current and practical advice. Prefer specific places over generic ones \
and state prices in the local currency unless asked otherwise.";

fn list(items: &[String]) -> String {
    items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

fn line(prompt: &mut String, label: &str, value: Option<&str>) {
    if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
        let _ = writeln!(prompt, "{}: {}", label, value);
    }
}

pub fn itinerary(params: &ItineraryParams) -> String {
    let mut prompt = format!(
        "Plan a {}-day trip to {} for {} traveler(s).\n",
        params.days,
        params.destination.trim(),
        params.travelers
    );
    let interests = list(&params.interests);
    line(&mut prompt, "Interests", Some(interests.as_str()));
    line(&mut prompt, "Budget", params.budget.as_deref());
    line(&mut prompt, "Start date", params.start_date.as_deref());
    prompt.push_str(
        "For each day give a theme and 3 to 5 activities in order with times, \
         locations and approximate costs. Check opening hours and seasonal closures. \
         End with a few practical tips.",
    );
    prompt
}

pub fn packing_checklist(params: &ChecklistParams) -> String {
    let mut prompt = format!(
        "Create a packing checklist for {} days in {}.\n",
        params.days,
        params.destination.trim()
    );
    line(&mut prompt, "Season", params.season.as_deref());
    let activities = list(&params.activities);
    line(&mut prompt, "Planned activities", Some(activities.as_str()));
    prompt.push_str(
        "Group items into categories such as Clothing, Toiletries, Documents and Electronics. \
         Give a quantity for each item and mark the items the trip cannot do without.",
    );
    prompt
}

pub fn price_quote(params: &PriceQuoteParams) -> String {
    let mut prompt = format!(
        "Estimate the total cost of a {}-day trip from {} to {} for {} traveler(s).\n",
        params.days,
        params.origin.trim(),
        params.destination.trim(),
        params.travelers
    );
    line(&mut prompt, "Travel style", params.travel_style.as_deref());
    line(&mut prompt, "Currency", params.currency.as_deref());
    prompt.push_str(
        "Look up current typical prices for return flights, accommodation, food, local \
         transport and activities. Break the estimate down by category and state the \
         assumptions behind it.",
    );
    prompt
}

pub fn destinations(params: &DestinationParams) -> String {
    let mut prompt = format!(
        "Suggest {} travel destinations for someone who enjoys: {}.\n",
        params.count,
        list(&params.preferences)
    );
    line(&mut prompt, "Travelling from", params.origin.as_deref());
    line(&mut prompt, "Month of travel", params.month.as_deref());
    line(&mut prompt, "Budget", params.budget.as_deref());
    prompt.push_str("Order them best match first and explain briefly why each one fits.");
    prompt
}

pub fn travel_advisory(params: &AdvisoryParams) -> String {
    let mut prompt = format!(
        "Summarize the current travel advisory for {}.\n",
        params.destination.trim()
    );
    line(&mut prompt, "Traveler nationality", params.nationality.as_deref());
    line(&mut prompt, "Travel date", params.travel_date.as_deref());
    prompt.push_str(
        "Cover the overall risk level, entry and visa requirements, recommended \
         vaccinations and health precautions, and safety concerns. Use official \
         government sources where possible.",
    );
    prompt
}

pub fn phrase_sheet(params: &PhraseSheetParams) -> String {
    let mut prompt = match params.language.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
        Some(language) => format!(
            "Write {} useful {} phrases for a traveler visiting {}.\n",
            params.count,
            language,
            params.destination.trim()
        ),
        None => format!(
            "Write {} useful phrases in the main local language for a traveler visiting {}.\n",
            params.count,
            params.destination.trim()
        ),
    };
    prompt.push_str(
        "Cover greetings, directions, ordering food, shopping and emergencies. \
         Give a simple pronunciation for each phrase.",
    );
    prompt
}
