//! Typed render input.
//!
//! A render receives two separate values: the request context and the
//! caller's data. Templates see a single namespace in which the reserved
//! name [`CONTEXT_KEY`] always resolves to the context and every other name
//! is looked up in the data. The caller's data is never modified, and a `c`
//! entry in it is simply shadowed.

use std::collections::BTreeSet;
use std::sync::Arc;

use minijinja::value::{Enumerator, Object, ObjectRepr};
use minijinja::Value;
use serde::Serialize;

/// Name under which templates see the request context.
pub const CONTEXT_KEY: &str = "c";

/// The two inputs of a template execution.
#[derive(Debug, Clone)]
pub struct RenderInput {
    context: Value,
    data: Value,
}

impl RenderInput {
    /// Creates a render input from an already converted context and data.
    pub fn new(context: Value, data: Value) -> Self {
        Self { context, data }
    }

    /// Creates a render input, serializing `data`.
    ///
    /// `None` data renders with an empty namespace apart from the context.
    pub fn from_serialize<T: Serialize + ?Sized>(context: Value, data: Option<&T>) -> Self {
        let data = data.map(Value::from_serialize).unwrap_or(Value::UNDEFINED);
        Self::new(context, data)
    }

    pub fn context(&self) -> &Value {
        &self.context
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Converts into the root value handed to the template engine.
    pub fn into_value(self) -> Value {
        Value::from_object(Scope {
            context: self.context,
            data: self.data,
        })
    }
}

/// Root namespace of a render: context under [`CONTEXT_KEY`], data elsewhere.
#[derive(Debug)]
struct Scope {
    context: Value,
    data: Value,
}

impl Object for Scope {
    fn repr(self: &Arc<Self>) -> ObjectRepr {
        ObjectRepr::Map
    }

    fn get_value(self: &Arc<Self>, key: &Value) -> Option<Value> {
        if key.as_str() == Some(CONTEXT_KEY) {
            return Some(self.context.clone());
        }
        match self.data.get_item(key) {
            Ok(value) if !value.is_undefined() => Some(value),
            _ => None,
        }
    }

    fn enumerate(self: &Arc<Self>) -> Enumerator {
        let mut keys: BTreeSet<Value> = BTreeSet::new();
        if let Ok(iter) = self.data.try_iter() {
            // Sequences iterate values, not keys; only maps contribute names.
            if self.data.kind() == minijinja::value::ValueKind::Map {
                keys.extend(iter);
            }
        }
        keys.insert(Value::from(CONTEXT_KEY));
        Enumerator::Values(keys.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::Environment;
    use std::collections::HashMap;

    #[test]
    fn test_context_key_shadows_data() {
        let mut data = HashMap::new();
        data.insert("c", "caller value");
        data.insert("name", "world");

        let input = RenderInput::from_serialize(Value::from("live context"), Some(&data));
        let env = Environment::new();
        let out = env
            .render_str("{{ c }} / {{ name }}", input.into_value())
            .unwrap();
        assert_eq!(out, "live context / world");
    }

    #[test]
    fn test_missing_data_renders_context_only() {
        let input = RenderInput::from_serialize::<()>(Value::from("ctx"), None);
        let env = Environment::new();
        let out = env
            .render_str("{{ c }}[{{ missing }}]", input.into_value())
            .unwrap();
        assert_eq!(out, "ctx[]");
    }

    #[test]
    fn test_caller_data_is_untouched() {
        let data = minijinja::context! { c => "mine" };
        let input = RenderInput::new(Value::from("ctx"), data.clone());
        let _ = input.clone().into_value();
        assert_eq!(input.data().get_attr("c").unwrap().as_str(), Some("mine"));
        assert_eq!(input.context().as_str(), Some("ctx"));
    }

    #[test]
    fn test_namespace_keys_include_context() {
        let input = RenderInput::new(Value::from(1), minijinja::context! { b => 2, a => 3 });
        let keys: Vec<String> = input
            .into_value()
            .try_iter()
            .unwrap()
            .map(|k| k.to_string())
            .collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }
}
