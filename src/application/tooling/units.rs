use super::error::ToolInvokeError;
use super::interface::ClaimsTool;
use super::schema::{FieldKind, FieldSpec, ToolSchema};
use async_trait::async_trait;
use serde_json::{Value, json};

pub struct FahrenheitToCelsiusTool;

#[async_trait]
impl ClaimsTool for FahrenheitToCelsiusTool {
    fn name(&self) -> &'static str {
        "convertFahrenheitToCelsius"
    }

    fn description(&self) -> &'static str {
        "Convert a temperature in fahrenheit to celsius"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(vec![FieldSpec::required(
            "temperature",
            FieldKind::Number,
            "The temperature in fahrenheit to convert",
        )])
    }

    async fn execute(&self, input: Value) -> Result<Value, ToolInvokeError> {
        let fahrenheit = input
            .get("temperature")
            .and_then(Value::as_f64)
            .unwrap_or_default();
        let celsius = ((fahrenheit - 32.0) * 5.0 / 9.0).round() as i64;
        Ok(json!({ "celsius": celsius }))
    }
}
