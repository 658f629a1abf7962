use serde_json::Value;

use crate::Entity;

mod layers;
mod scenarios;

/// Decodes an editor JSON entity list.
fn entities(value: Value) -> Vec<Entity> {
    serde_json::from_value(value).unwrap()
}

/// Serializes entities with every generated id removed, so results can be compared with
/// `json!` literals.
fn without_ids(entities: &[Entity]) -> Value {
    let mut value = serde_json::to_value(entities).unwrap();
    strip_ids(&mut value);
    value
}

fn strip_ids(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for key in ["id", "_id", "groupId"] {
                map.remove(key);
            }
            map.values_mut().for_each(strip_ids);
        }
        Value::Array(items) => items.iter_mut().for_each(strip_ids),
        _ => {}
    }
}
