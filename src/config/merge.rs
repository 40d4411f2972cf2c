use serde_json::Value;

/// Deep-merges `overrides` on top of `defaults`.
///
/// Objects are merged key by key, recursively. Any other value in `overrides`
/// (scalars, arrays, `null`) replaces the default wholesale. Keys present only
/// in `defaults` are inherited.
pub fn merge(defaults: Value, overrides: Value) -> Value {
    match (defaults, overrides) {
        (Value::Object(mut base), Value::Object(top)) => {
            for (key, value) in top {
                let merged = match base.remove(&key) {
                    Some(existing) => merge(existing, value),
                    None => value,
                };
                base.insert(key, merged);
            }
            Value::Object(base)
        }
        (_, overrides) => overrides,
    }
}
