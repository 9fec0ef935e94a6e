//! Locating the list of days inside a raw model response.
//!
//! Models wrap the day list under different keys. Each extractor below
//! inspects the response one way and the first one that yields a list wins.

use serde_json::Value;
use tracing::debug;

/// Alternate keys probed after `mealPlan`, in priority order.
const ALTERNATE_KEYS: &[&str] = &["days", "plan", "meals"];

/// Fields whose presence on an object makes it look like a day.
const DAY_MARKERS: &[&str] = &["meals", "day", "date"];

type Extractor = fn(&Value) -> Option<&Vec<Value>>;

const EXTRACTORS: &[(&str, Extractor)] = &[
    ("top-level array", top_level_array),
    ("mealPlan", meal_plan_key),
    ("alternate key", alternate_keys),
    ("day-shaped property", day_shaped_property),
];

/// Returns the adopted day list, or `None` when no extractor matched.
///
/// `mealPlan` is adopted whenever it is an array, even an empty one; the
/// alternate keys and the property scan only adopt non-empty arrays.
pub fn locate_day_list(raw: &Value) -> Option<&Vec<Value>> {
    EXTRACTORS.iter().find_map(|(name, extract)| {
        let days = extract(raw)?;
        debug!(extractor = *name, days = days.len(), "located day list");
        Some(days)
    })
}

fn top_level_array(raw: &Value) -> Option<&Vec<Value>> {
    raw.as_array()
}

fn meal_plan_key(raw: &Value) -> Option<&Vec<Value>> {
    raw.get("mealPlan")?.as_array()
}

fn alternate_keys(raw: &Value) -> Option<&Vec<Value>> {
    ALTERNATE_KEYS
        .iter()
        .filter_map(|key| raw.get(*key)?.as_array())
        .find(|days| !days.is_empty())
}

// Ties between several day-shaped arrays go to whichever property the
// payload listed first.
fn day_shaped_property(raw: &Value) -> Option<&Vec<Value>> {
    raw.as_object()?
        .values()
        .filter_map(Value::as_array)
        .find(|items| items.first().is_some_and(looks_like_day))
}

fn looks_like_day(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|fields| DAY_MARKERS.iter().any(|marker| fields.contains_key(*marker)))
}
