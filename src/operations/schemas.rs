//! Output contracts of the travel operations.
//!
//! Each schema is a `static` built from `const` parts; nothing here is
//! assembled per request. Field names match the serde names of the result
//! types in [`super::types`].

use crate::structured::{Property, Schema, SchemaNode};

pub const ITINERARY_OP: &str = "generate_itinerary";
pub const CHECKLIST_OP: &str = "generate_packing_checklist";
pub const PRICE_QUOTE_OP: &str = "generate_price_quote";
pub const DESTINATIONS_OP: &str = "suggest_destinations";
pub const ADVISORY_OP: &str = "generate_travel_advisory";
pub const PHRASE_SHEET_OP: &str = "generate_phrase_sheet";

const TEXT: SchemaNode = SchemaNode::string("");

// Itinerary

const ACTIVITY_FIELDS: &[Property] = &[
    Property::required("time", SchemaNode::string("Time of day, e.g. 09:00 or Morning")),
    Property::required("name", SchemaNode::string("Short activity name")),
    Property::required("description", SchemaNode::string("One or two sentences")),
    Property::optional("location", SchemaNode::string("Neighbourhood or address")),
    Property::optional(
        "estimated_cost",
        SchemaNode::string("Approximate cost with currency, e.g. EUR 15"),
    ),
];
const ACTIVITY: SchemaNode = SchemaNode::object("A single planned activity", ACTIVITY_FIELDS);

const DAY_FIELDS: &[Property] = &[
    Property::required("day", SchemaNode::integer("Day number starting at 1")),
    Property::required("title", SchemaNode::string("Theme of the day")),
    Property::required("activities", SchemaNode::array("Activities in order", &ACTIVITY)),
];
const DAY: SchemaNode = SchemaNode::object("One day of the trip", DAY_FIELDS);

const ITINERARY_FIELDS: &[Property] = &[
    Property::required("destination", SchemaNode::string("Destination name")),
    Property::required("summary", SchemaNode::string("Two or three sentence overview")),
    Property::required("days", SchemaNode::array("Day-by-day plan", &DAY)),
    Property::optional("tips", SchemaNode::array("Practical tips", &TEXT)),
];

pub static ITINERARY: Schema = Schema::new(
    "itinerary",
    SchemaNode::object("Day-by-day travel itinerary", ITINERARY_FIELDS),
);

// Packing checklist

const CHECKLIST_ITEM_FIELDS: &[Property] = &[
    Property::required("name", SchemaNode::string("Item to pack")),
    Property::required("quantity", SchemaNode::integer("How many to pack")),
    Property::required("essential", SchemaNode::boolean("Whether the trip fails without it")),
];
const CHECKLIST_ITEM: SchemaNode = SchemaNode::object("Item to pack", CHECKLIST_ITEM_FIELDS);

const CHECKLIST_CATEGORY_FIELDS: &[Property] = &[
    Property::required("name", SchemaNode::string("Category, e.g. Clothing")),
    Property::required("items", SchemaNode::array("Items in this category", &CHECKLIST_ITEM)),
];
const CHECKLIST_CATEGORY: SchemaNode =
    SchemaNode::object("Group of related items", CHECKLIST_CATEGORY_FIELDS);

const CHECKLIST_FIELDS: &[Property] = &[
    Property::required("destination", SchemaNode::string("Destination name")),
    Property::required(
        "categories",
        SchemaNode::array("Items grouped by category", &CHECKLIST_CATEGORY),
    ),
];

pub static PACKING_CHECKLIST: Schema = Schema::new(
    "packing_checklist",
    SchemaNode::object("Packing checklist for a trip", CHECKLIST_FIELDS),
);

// Price quote

pub const PRICE_CATEGORIES: &[&str] = &[
    "flights",
    "accommodation",
    "food",
    "transport",
    "activities",
    "other",
];

const PRICE_LINE_FIELDS: &[Property] = &[
    Property::required(
        "category",
        SchemaNode::enumeration("Cost category", PRICE_CATEGORIES),
    ),
    Property::required("description", SchemaNode::string("What the amount covers")),
    Property::required("amount", SchemaNode::number("Amount for the whole group")),
];
const PRICE_LINE: SchemaNode = SchemaNode::object("One cost line", PRICE_LINE_FIELDS);

const PRICE_QUOTE_FIELDS: &[Property] = &[
    Property::required("currency", SchemaNode::string("ISO 4217 currency code")),
    Property::required("total_estimate", SchemaNode::number("Sum of all lines")),
    Property::required("breakdown", SchemaNode::array("Cost lines", &PRICE_LINE)),
    Property::optional("notes", SchemaNode::array("Assumptions behind the estimate", &TEXT)),
];

pub static PRICE_QUOTE: Schema = Schema::new(
    "price_quote",
    SchemaNode::object("Estimated trip cost", PRICE_QUOTE_FIELDS),
);

// Destination suggestions

const SUGGESTION_FIELDS: &[Property] = &[
    Property::required("name", SchemaNode::string("City or region")),
    Property::required("country", SchemaNode::string("Country")),
    Property::required("reason", SchemaNode::string("Why it fits the traveller")),
    Property::optional("best_time_to_visit", SchemaNode::string("Months or season")),
];
const SUGGESTION: SchemaNode = SchemaNode::object("A suggested destination", SUGGESTION_FIELDS);

const DESTINATIONS_FIELDS: &[Property] = &[Property::required(
    "suggestions",
    SchemaNode::array("Suggested destinations, best first", &SUGGESTION),
)];

pub static DESTINATION_SUGGESTIONS: Schema = Schema::new(
    "destination_suggestions",
    SchemaNode::object("Destination ideas", DESTINATIONS_FIELDS),
);

// Travel advisory

pub const RISK_LEVELS: &[&str] = &["low", "moderate", "high", "extreme"];

const ADVISORY_FIELDS: &[Property] = &[
    Property::required("destination", SchemaNode::string("Destination name")),
    Property::required(
        "risk_level",
        SchemaNode::enumeration("Overall travel risk", RISK_LEVELS),
    ),
    Property::required("summary", SchemaNode::string("Current situation in brief")),
    Property::required(
        "entry_requirements",
        SchemaNode::array("Visas, passports, forms", &TEXT),
    ),
    Property::optional("health", SchemaNode::array("Vaccinations and health notes", &TEXT)),
    Property::optional("safety", SchemaNode::array("Safety notes", &TEXT)),
];

pub static TRAVEL_ADVISORY: Schema = Schema::new(
    "travel_advisory",
    SchemaNode::object("Entry, health and safety advisory", ADVISORY_FIELDS),
);

// Phrase sheet

const PHRASE_FIELDS: &[Property] = &[
    Property::required("english", SchemaNode::string("Phrase in English")),
    Property::required("translation", SchemaNode::string("Phrase in the local language")),
    Property::optional("pronunciation", SchemaNode::string("Simple phonetic spelling")),
];
const PHRASE: SchemaNode = SchemaNode::object("A useful phrase", PHRASE_FIELDS);

const PHRASE_SHEET_FIELDS: &[Property] = &[
    Property::required("language", SchemaNode::string("Local language name")),
    Property::required("phrases", SchemaNode::array("Useful phrases", &PHRASE)),
];

pub static PHRASE_SHEET: Schema = Schema::new(
    "phrase_sheet",
    SchemaNode::object("Phrase sheet for travellers", PHRASE_SHEET_FIELDS),
);

/// Static facts about one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisteredOperation {
    pub operation: &'static str,
    /// Runs the web-grounded phase before formatting.
    pub grounded: bool,
    pub default_message: &'static str,
    pub schema: &'static Schema,
}

static REGISTRY: [RegisteredOperation; 6] = [
    RegisteredOperation {
        operation: ITINERARY_OP,
        grounded: true,
        default_message: "We couldn't build your itinerary right now. Please try again.",
        schema: &ITINERARY,
    },
    RegisteredOperation {
        operation: CHECKLIST_OP,
        grounded: false,
        default_message: "We couldn't put together your packing list. Please try again.",
        schema: &PACKING_CHECKLIST,
    },
    RegisteredOperation {
        operation: PRICE_QUOTE_OP,
        grounded: true,
        default_message: "We couldn't estimate the cost of this trip. Please try again.",
        schema: &PRICE_QUOTE,
    },
    RegisteredOperation {
        operation: DESTINATIONS_OP,
        grounded: false,
        default_message: "We couldn't come up with destination ideas. Please try again.",
        schema: &DESTINATION_SUGGESTIONS,
    },
    RegisteredOperation {
        operation: ADVISORY_OP,
        grounded: true,
        default_message: "We couldn't fetch travel advice for this destination. Please try again.",
        schema: &TRAVEL_ADVISORY,
    },
    RegisteredOperation {
        operation: PHRASE_SHEET_OP,
        grounded: false,
        default_message: "We couldn't prepare your phrase sheet. Please try again.",
        schema: &PHRASE_SHEET,
    },
];

/// Every operation with its schema, in a fixed order.
pub fn registry() -> &'static [RegisteredOperation] {
    &REGISTRY
}

/// Look up an operation by name.
pub fn lookup(operation: &str) -> Option<&'static RegisteredOperation> {
    REGISTRY.iter().find(|r| r.operation == operation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_registry_is_complete_and_unique() {
        let names: HashSet<_> = registry().iter().map(|r| r.operation).collect();
        assert_eq!(names.len(), 6);
        let schemas: HashSet<_> = registry().iter().map(|r| r.schema.name).collect();
        assert_eq!(schemas.len(), 6);
        assert!(lookup("generate_itinerary").unwrap().grounded);
        assert!(!lookup(CHECKLIST_OP).unwrap().grounded);
        assert!(lookup("book_flight").is_none());
    }

    #[test]
    fn test_every_schema_renders_object_roots() {
        for entry in registry() {
            let provider = entry.schema.to_response_schema();
            assert_eq!(provider["type"], "OBJECT", "{}", entry.operation);
            assert!(provider["propertyOrdering"].is_array());
            assert_eq!(entry.schema.to_json_schema()["type"], "object");
            assert!(!entry.default_message.is_empty());
        }
    }

    #[test]
    fn test_nested_rendering() {
        let v = ITINERARY.to_response_schema();
        let activity = &v["properties"]["days"]["items"]["properties"]["activities"]["items"];
        assert_eq!(activity["type"], "OBJECT");
        assert_eq!(
            activity["required"],
            serde_json::json!(["time", "name", "description"])
        );
        assert_eq!(
            TRAVEL_ADVISORY.to_json_schema()["properties"]["risk_level"]["enum"],
            serde_json::json!(RISK_LEVELS)
        );
    }
}
