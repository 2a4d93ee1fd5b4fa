//! Page shapes and the eager merge of pages into one result.
//!
//! List endpoints answer in one of three shapes: a bare JSON array, an object
//! with an `items` array (plus `meta.counts.items.remaining`), or the event
//! log's `{events, pageStartAt, pageEndAt}`. The shape of the first page fixes
//! how every later page is read.

use serde_json::{Map, Value};

use super::Direction;
use crate::{Error, Result};

/// Response shape of a paginated endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// `[...]`
    List,
    /// `{"items": [...], "meta": {...}}`
    Items,
    /// `{"events": [...], "pageStartAt": "...", "pageEndAt": "..."}`
    Events,
    /// Any other value; cannot span pages.
    Single,
}

impl Shape {
    /// Detects the shape of a first page.
    pub fn detect(value: &Value, event_log: bool) -> Self {
        match value {
            Value::Array(_) => Shape::List,
            Value::Object(map) if event_log && map.get("events").is_some_and(Value::is_array) => {
                Shape::Events
            }
            Value::Object(map) if map.get("items").is_some_and(Value::is_array) => Shape::Items,
            _ => Shape::Single,
        }
    }

    /// Puts a page in overall order: event log pages arrive newest-first and
    /// are reversed when walking forward.
    pub fn normalize(self, mut value: Value, direction: Direction) -> Value {
        if self == Shape::Events && direction == Direction::Next {
            if let Some(Value::Array(events)) = value.get_mut("events") {
                events.reverse();
            }
        }
        value
    }

    /// Takes the items out of a normalised page.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnexpectedResponse`] if the page does not have this
    /// shape, or for [`Shape::Single`], which has no items to take.
    pub fn take_items(self, value: Value, operation: &str) -> Result<Vec<Value>> {
        let key = match self {
            Shape::List => {
                return match value {
                    Value::Array(items) => Ok(items),
                    _ => Err(unexpected(operation, "expected a JSON array page")),
                };
            }
            Shape::Items => "items",
            Shape::Events => "events",
            Shape::Single => {
                return Err(unexpected(operation, "response cannot be paginated"));
            }
        };

        match value {
            Value::Object(mut map) => match map.remove(key) {
                Some(Value::Array(items)) => Ok(items),
                _ => Err(unexpected(operation, &format!("page has no {key} array"))),
            },
            _ => Err(unexpected(operation, &format!("expected an object with {key}"))),
        }
    }
}

/// Eager merge of every page into one value.
#[derive(Debug)]
pub struct Collector {
    operation: String,
    event_log: bool,
    direction: Direction,
    shape: Shape,
    result: Option<Value>,
}

impl Collector {
    /// Creates an empty collector.
    pub fn new(operation: impl Into<String>, event_log: bool, direction: Direction) -> Self {
        Self {
            operation: operation.into(),
            event_log,
            direction,
            shape: Shape::Single,
            result: None,
        }
    }

    /// Merges the next page.
    pub fn absorb(&mut self, page: Value) -> Result<()> {
        if self.result.is_none() {
            self.shape = Shape::detect(&page, self.event_log);
            self.result = Some(self.shape.normalize(page, self.direction));
            return Ok(());
        }

        let page = self.shape.normalize(page, self.direction);
        let Some(result) = self.result.as_mut() else {
            return Ok(());
        };
        match self.shape {
            Shape::List => {
                let items = Shape::List.take_items(page, &self.operation)?;
                if let Value::Array(all) = result {
                    all.extend(items);
                }
            }
            Shape::Items => {
                let remaining = page.pointer("/meta/counts/items/remaining").cloned();
                let items = Shape::Items.take_items(page, &self.operation)?;
                extend_array(result, "items", items);
                if let Some(remaining) = remaining {
                    set_path(result, &["meta", "counts", "items", "remaining"], remaining);
                }
            }
            Shape::Events => {
                let start = page.get("pageStartAt").cloned();
                let end = page.get("pageEndAt").cloned();
                let events = Shape::Events.take_items(page, &self.operation)?;
                if let Value::Object(map) = result {
                    keep_extreme(map, "pageStartAt", start, |new, old| new < old);
                    keep_extreme(map, "pageEndAt", end, |new, old| new > old);
                }
                extend_array(result, "events", events);
            }
            Shape::Single => {
                Shape::Single.take_items(page, &self.operation)?;
            }
        }
        Ok(())
    }

    /// Returns the merged result, `None` if no page had a body.
    pub fn finish(self) -> Option<Value> {
        self.result
    }
}

fn unexpected(operation: &str, detail: &str) -> Error {
    Error::UnexpectedResponse {
        operation: operation.to_string(),
        detail: detail.to_string(),
    }
}

fn extend_array(target: &mut Value, key: &str, items: Vec<Value>) {
    if let Some(Value::Array(all)) = target.get_mut(key) {
        all.extend(items);
    }
}

/// Replaces `map[key]` when `candidate` beats it, comparing as strings.
fn keep_extreme(
    map: &mut Map<String, Value>,
    key: &str,
    candidate: Option<Value>,
    beats: impl Fn(&str, &str) -> bool,
) {
    let Some(candidate) = candidate else {
        return;
    };
    let replace = match (candidate.as_str(), map.get(key).and_then(Value::as_str)) {
        (Some(new), Some(old)) => beats(new, old),
        (Some(_), None) => true,
        _ => false,
    };
    if replace {
        map.insert(key.to_string(), candidate);
    }
}

/// Sets a nested field, creating intermediate objects as needed.
fn set_path(target: &mut Value, path: &[&str], value: Value) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };
    let mut node = target;
    for key in parents {
        let Value::Object(map) = node else {
            return;
        };
        node = map
            .entry(key.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }
    if let Value::Object(map) = node {
        map.insert(last.to_string(), value);
    }
}
