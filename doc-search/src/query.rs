use serde_json::{Value, json};

use crate::structs::search_config::SearchConfig;

/// Builds the `text_expansion` search body for `user_input`.
///
/// Shape:
/// `{"query":{"text_expansion":{<field>:{"model_id":..,"model_text":..}}},"size":N}`
pub fn text_expansion_body(cfg: &SearchConfig, user_input: &str) -> Value {
    let mut expansion = serde_json::Map::new();
    expansion.insert(
        cfg.expansion_field.clone(),
        json!({
            "model_id": cfg.model_id,
            "model_text": user_input,
        }),
    );

    json!({
        "query": { "text_expansion": Value::Object(expansion) },
        "size": cfg.size,
    })
}
