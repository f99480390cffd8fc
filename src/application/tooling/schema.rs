//! Field-level input schemas for tools.
//!
//! A schema both renders the JSON-schema `parameters` object published to
//! the model and validates the inputs the model sends back.

use serde_json::{Map, Value, json};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Number,
    StringArray,
}

impl FieldKind {
    fn type_name(self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Number => "number",
            FieldKind::StringArray => "array",
        }
    }

    fn matches(self, value: &Value) -> bool {
        match self {
            FieldKind::String => value.is_string(),
            FieldKind::Number => value.is_number(),
            FieldKind::StringArray => value
                .as_array()
                .map(|items| items.iter().all(Value::is_string))
                .unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub description: &'static str,
    pub required: bool,
    pub allowed: Option<&'static [&'static str]>,
    pub minimum: Option<f64>,
}

impl FieldSpec {
    pub fn required(name: &'static str, kind: FieldKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            description,
            required: true,
            allowed: None,
            minimum: None,
        }
    }

    pub fn optional(name: &'static str, kind: FieldKind, description: &'static str) -> Self {
        Self {
            required: false,
            ..Self::required(name, kind, description)
        }
    }

    pub fn with_allowed(mut self, values: &'static [&'static str]) -> Self {
        self.allowed = Some(values);
        self
    }

    pub fn with_minimum(mut self, minimum: f64) -> Self {
        self.minimum = Some(minimum);
        self
    }
}

/// One offending field and the reason it failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFault {
    pub field: String,
    pub reason: String,
}

impl fmt::Display for FieldFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

pub fn join_faults(faults: &[FieldFault]) -> String {
    faults
        .iter()
        .map(FieldFault::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Clone)]
pub struct ToolSchema {
    fields: Vec<FieldSpec>,
}

impl ToolSchema {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }

    /// Model-facing JSON schema for the tool's input object.
    pub fn parameters(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();
        for field in &self.fields {
            let mut property = Map::new();
            property.insert("type".into(), json!(field.kind.type_name()));
            property.insert("description".into(), json!(field.description));
            if field.kind == FieldKind::StringArray {
                property.insert("items".into(), json!({"type": "string"}));
            }
            if let Some(values) = field.allowed {
                property.insert("enum".into(), json!(values));
            }
            if let Some(minimum) = field.minimum {
                property.insert("minimum".into(), json!(minimum));
            }
            properties.insert(field.name.into(), Value::Object(property));
            if field.required {
                required.push(field.name);
            }
        }
        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    /// Checks an input against the schema, collecting every offending field.
    /// Fields the schema does not know about are tolerated.
    pub fn validate(&self, input: &Value) -> Result<(), Vec<FieldFault>> {
        let Some(object) = input.as_object() else {
            return Err(vec![FieldFault {
                field: "$".into(),
                reason: "input must be an object".into(),
            }]);
        };

        let mut faults = Vec::new();
        for field in &self.fields {
            let value = match object.get(field.name) {
                None | Some(Value::Null) => {
                    if field.required {
                        faults.push(FieldFault {
                            field: field.name.into(),
                            reason: "missing required field".into(),
                        });
                    }
                    continue;
                }
                Some(value) => value,
            };

            if !field.kind.matches(value) {
                faults.push(FieldFault {
                    field: field.name.into(),
                    reason: format!("expected {}", field.kind.type_name()),
                });
                continue;
            }
            if let Some(values) = field.allowed {
                let accepted = value
                    .as_str()
                    .map(|text| values.contains(&text))
                    .unwrap_or(false);
                if !accepted {
                    faults.push(FieldFault {
                        field: field.name.into(),
                        reason: format!("must be one of {}", values.join(", ")),
                    });
                    continue;
                }
            }
            if let Some(minimum) = field.minimum {
                let below = value.as_f64().map(|n| n < minimum).unwrap_or(false);
                if below {
                    faults.push(FieldFault {
                        field: field.name.into(),
                        reason: format!("must be at least {minimum}"),
                    });
                }
            }
        }

        if faults.is_empty() { Ok(()) } else { Err(faults) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> ToolSchema {
        ToolSchema::new(vec![
            FieldSpec::required("recommendation", FieldKind::String, "Recommended action")
                .with_allowed(&["approve", "deny", "escalate"]),
            FieldSpec::optional("suggestedPayoutUSD", FieldKind::Number, "Suggested payout")
                .with_minimum(0.0),
            FieldSpec::required("reasoning", FieldKind::String, "Justification"),
            FieldSpec::required("redFlags", FieldKind::StringArray, "Potential issues"),
        ])
    }

    #[test]
    fn missing_required_field_is_named() {
        let err = schema()
            .validate(&serde_json::json!({"recommendation": "approve", "redFlags": []}))
            .expect_err("missing field fails");
        assert_eq!(err.len(), 1);
        assert_eq!(err[0].field, "reasoning");
        assert_eq!(err[0].reason, "missing required field");
    }

    #[test]
    fn wrong_type_and_enum_violations_are_collected_together() {
        let err = schema()
            .validate(&serde_json::json!({
                "recommendation": "maybe",
                "reasoning": 12,
                "redFlags": ["ok", 3],
            }))
            .expect_err("multiple faults fail");
        let fields: Vec<&str> = err.iter().map(|fault| fault.field.as_str()).collect();
        assert_eq!(fields, vec!["recommendation", "reasoning", "redFlags"]);
    }

    #[test]
    fn minimum_bound_is_enforced() {
        let err = schema()
            .validate(&serde_json::json!({
                "recommendation": "approve",
                "suggestedPayoutUSD": -5,
                "reasoning": "receipts match",
                "redFlags": [],
            }))
            .expect_err("negative payout fails");
        assert_eq!(err[0].field, "suggestedPayoutUSD");
    }

    #[test]
    fn non_object_input_fails_at_the_root() {
        let err = schema()
            .validate(&serde_json::json!("not an object"))
            .expect_err("non-object fails");
        assert_eq!(err[0].field, "$");
    }

    #[test]
    fn parameters_render_required_list_and_enum() {
        let parameters = schema().parameters();
        assert_eq!(parameters["type"], "object");
        assert_eq!(
            parameters["required"],
            serde_json::json!(["recommendation", "reasoning", "redFlags"])
        );
        assert_eq!(
            parameters["properties"]["recommendation"]["enum"],
            serde_json::json!(["approve", "deny", "escalate"])
        );
        assert_eq!(
            parameters["properties"]["redFlags"]["items"]["type"],
            "string"
        );
    }
}
