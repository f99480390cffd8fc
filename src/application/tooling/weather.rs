use super::error::ToolInvokeError;
use super::interface::ClaimsTool;
use super::schema::{FieldKind, FieldSpec, ToolSchema};
use async_trait::async_trait;
use rand::Rng;
use serde_json::{Value, json};

/// Simulated weather integration: no external call, just a plausible
/// reading for the requested location.
pub struct WeatherTool;

#[async_trait]
impl ClaimsTool for WeatherTool {
    fn name(&self) -> &'static str {
        "weather"
    }

    fn description(&self) -> &'static str {
        "Get the weather in a location (fahrenheit)"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(vec![FieldSpec::required(
            "location",
            FieldKind::String,
            "The location to get the weather for",
        )])
    }

    async fn execute(&self, input: Value) -> Result<Value, ToolInvokeError> {
        let location = input
            .get("location")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let temperature: i64 = rand::thread_rng().gen_range(32..=90);
        Ok(json!({
            "location": location,
            "temperature": temperature,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reading_stays_in_range_and_echoes_location() {
        let output = WeatherTool
            .execute(serde_json::json!({"location": "Austin"}))
            .await
            .expect("weather never fails");

        assert_eq!(output["location"], "Austin");
        let temperature = output["temperature"].as_i64().expect("integer reading");
        assert!((32..=90).contains(&temperature));
    }
}
