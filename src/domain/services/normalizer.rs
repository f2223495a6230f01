#[cfg(test)]
#[path = "normalizer_test.rs"]
mod tests;

use serde_json::Map;
use serde_json::Number;
use serde_json::Value;

use crate::domain::models::Message;
use crate::domain::models::MessageType;
use crate::domain::models::Role;
use crate::domain::models::TransportError;

/// Treats JSON `null` the same as a missing field.
fn present(value: Option<&Value>) -> Option<&Value> {
    return value.filter(|val| return !val.is_null());
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => return false,
        Value::Bool(val) => return *val,
        Value::Number(val) => return val.as_f64().map(|n| return n != 0.0).unwrap_or(true),
        Value::String(val) => return !val.is_empty(),
        Value::Array(_) | Value::Object(_) => return true,
    }
}

fn non_empty_str<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    return map
        .get(key)
        .and_then(|val| return val.as_str())
        .filter(|val| return !val.is_empty());
}

/// Whole floats are shown without a fractional part, so `3.0` reads as `3`.
fn number_to_string(number: &Number) -> String {
    if let (true, Some(val)) = (number.is_f64(), number.as_f64()) {
        if val == 0.0 {
            return "0".to_string();
        }
        if val.is_finite() && val.fract() == 0.0 && val.abs() < 1e21 {
            return format!("{val:.0}");
        }
    }

    return number.to_string();
}

/// Flat string conversion used for array elements and as the last resort.
/// Nested arrays are comma joined and objects are rendered as compact JSON.
pub fn to_display_string(value: &Value) -> String {
    match value {
        Value::Null => return "".to_string(),
        Value::String(val) => return val.to_string(),
        Value::Bool(val) => return val.to_string(),
        Value::Number(val) => return number_to_string(val),
        Value::Array(items) => {
            return items
                .iter()
                .map(to_display_string)
                .collect::<Vec<String>>()
                .join(",");
        }
        Value::Object(_) => return value.to_string(),
    }
}

fn normalize_object(raw: &Value, map: &Map<String, Value>) -> String {
    if let Some(Value::String(content)) = map.get("content") {
        return content.to_string();
    }

    if let Some(Value::Array(parts)) = map.get("parts") {
        return parts.iter().map(to_display_string).collect::<String>();
    }

    if let Some(message) = non_empty_str(map, "message") {
        return message.to_string();
    }

    if let Some(Value::Array(choices)) = map.get("choices") {
        let first = match choices.first() {
            Some(first) => first,
            None => return "".to_string(),
        };

        let candidate = present(first.get("message").and_then(|msg| return msg.get("content")))
            .or_else(|| return present(first.get("text")))
            .or_else(|| return present(first.get("message")))
            .unwrap_or(first);

        return normalize(candidate);
    }

    if let Some(error) = non_empty_str(map, "error") {
        return error.to_string();
    }

    if let Some(reply) = map.get("reply").filter(|reply| return is_truthy(reply)) {
        return normalize(reply);
    }

    return serde_json::to_string_pretty(raw).unwrap_or_else(|_| {
        return to_display_string(raw);
    });
}

/// Reduces whatever the worker answered with to a single display string.
///
/// Shapes are tried in a fixed order and the first match wins: null, plain
/// strings, arrays of lines, and then the object keys `content`, `parts`,
/// `message`, `choices`, `error` and `reply`. Objects that match none of
/// these are pretty printed so the user never sees an opaque dump.
pub fn normalize(raw: &Value) -> String {
    match raw {
        Value::Null => return "".to_string(),
        Value::String(val) => return val.to_string(),
        Value::Array(items) => {
            return items
                .iter()
                .map(to_display_string)
                .collect::<Vec<String>>()
                .join("\n");
        }
        Value::Object(map) => return normalize_object(raw, map),
        Value::Bool(_) | Value::Number(_) => return to_display_string(raw),
    }
}

/// Picks the most likely reply field out of a chat completion envelope before
/// it's handed to `normalize`: `choices[0].message.content`, then
/// `choices[0].text`, then `error`, then the whole payload.
pub fn extract_assistant_raw(data: &Value) -> &Value {
    let first_choice = data.get("choices").and_then(|choices| return choices.get(0));

    return present(
        first_choice
            .and_then(|choice| return choice.get("message"))
            .and_then(|msg| return msg.get("content")),
    )
    .or_else(|| return present(first_choice.and_then(|choice| return choice.get("text"))))
    .or_else(|| return present(data.get("error")))
    .unwrap_or(data);
}

pub fn assistant_text(data: &Value) -> String {
    return normalize(extract_assistant_raw(data));
}

pub fn error_text(err: &TransportError) -> String {
    return format!("Error: {err}");
}

/// Builds the assistant message appended once a round trip finishes.
pub fn reply_message(res: &Result<Value, TransportError>) -> Message {
    match res {
        Ok(data) => return Message::new(Role::Assistant, &assistant_text(data)),
        Err(err) => {
            return Message::new_with_type(Role::Assistant, MessageType::Error, &error_text(err));
        }
    }
}
