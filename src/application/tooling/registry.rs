use super::claims::ReviewClaimTool;
use super::currency::ConvertCurrencyTool;
use super::customer::VerifyCustomerTool;
use super::error::ToolError;
use super::interface::{ClaimsTool, ToolDeclaration};
use super::units::FahrenheitToCelsiusTool;
use super::weather::WeatherTool;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Fixed catalog of the callable tools for one gateway instance. Immutable
/// once built; lookups are case-insensitive on the tool name.
pub struct ToolRegistry {
    tools: Vec<Arc<dyn ClaimsTool>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new(tools: Vec<Arc<dyn ClaimsTool>>) -> Self {
        let mut kept: Vec<Arc<dyn ClaimsTool>> = Vec::with_capacity(tools.len());
        let mut index = HashMap::new();
        for tool in tools {
            let key = tool.name().to_ascii_lowercase();
            if index.contains_key(&key) {
                warn!(tool = tool.name(), "Ignoring duplicate tool registration");
                continue;
            }
            index.insert(key, kept.len());
            kept.push(tool);
        }
        Self { tools: kept, index }
    }

    /// The claims-intake catalog: simulated weather, unit conversion,
    /// customer verification, claim review, and live currency conversion.
    pub fn standard(
        http: reqwest::Client,
        currency_endpoint: impl Into<String>,
        currency_api_key: Option<String>,
    ) -> Self {
        Self::new(vec![
            Arc::new(WeatherTool),
            Arc::new(FahrenheitToCelsiusTool),
            Arc::new(VerifyCustomerTool),
            Arc::new(ReviewClaimTool),
            Arc::new(ConvertCurrencyTool::new(
                http,
                currency_endpoint,
                currency_api_key,
            )),
        ])
    }

    pub fn declarations(&self) -> Vec<ToolDeclaration> {
        self.tools.iter().map(|tool| tool.declaration()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Validates the input against the named tool's schema, then runs the
    /// executor. Failures carry the tool name and the offending fields or
    /// the underlying cause.
    pub async fn execute(&self, name: &str, input: Value) -> Result<Value, ToolError> {
        let Some(&slot) = self.index.get(&name.to_ascii_lowercase()) else {
            warn!(requested_tool = name, "Unknown tool requested");
            return Err(ToolError::UnknownTool(name.to_string()));
        };
        let tool = &self.tools[slot];

        if let Err(faults) = tool.schema().validate(&input) {
            warn!(
                tool = tool.name(),
                faults = faults.len(),
                "Tool input failed schema validation"
            );
            return Err(ToolError::Validation {
                tool: tool.name().to_string(),
                faults,
            });
        }

        match tool.execute(input).await {
            Ok(output) => {
                info!(tool = tool.name(), success = true, "Tool executed");
                Ok(output)
            }
            Err(source) => {
                warn!(tool = tool.name(), %source, "Tool execution failed");
                Err(ToolError::Execution {
                    tool: tool.name().to_string(),
                    source,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registry() -> ToolRegistry {
        ToolRegistry::standard(reqwest::Client::new(), "https://rates.invalid", None)
    }

    #[test]
    fn declarations_cover_the_whole_catalog() {
        let declarations = registry().declarations();
        let names: Vec<&str> = declarations
            .iter()
            .map(|declaration| declaration.name.as_str())
            .collect();
        assert_eq!(
            names,
            vec![
                "weather",
                "convertFahrenheitToCelsius",
                "verifyCustomer",
                "reviewClaim",
                "convertCurrency",
            ]
        );
        for declaration in &declarations {
            assert_eq!(declaration.parameters["type"], "object");
        }
    }

    #[tokio::test]
    async fn unknown_tool_is_rejected() {
        let err = registry()
            .execute("bookFlight", json!({}))
            .await
            .expect_err("unknown tool fails");
        assert!(matches!(err, ToolError::UnknownTool(name) if name == "bookFlight"));
    }

    #[tokio::test]
    async fn validation_failure_names_the_offending_field() {
        let err = registry()
            .execute("weather", json!({}))
            .await
            .expect_err("missing location fails");
        let ToolError::Validation { tool, faults } = err else {
            panic!("expected a validation failure");
        };
        assert_eq!(tool, "weather");
        assert_eq!(faults[0].field, "location");
    }

    #[tokio::test]
    async fn lookup_is_case_insensitive() {
        let output = registry()
            .execute("Weather", json!({"location": "Austin"}))
            .await
            .expect("execution succeeds");
        assert_eq!(output["location"], "Austin");
    }

    #[tokio::test]
    async fn execution_failure_wraps_the_cause() {
        let err = registry()
            .execute(
                "convertCurrency",
                json!({"baseCurrency": "EUR", "targetCurrency": "USD", "amount": 100}),
            )
            .await
            .expect_err("unconfigured credential fails");
        assert!(matches!(err, ToolError::Execution { tool, .. } if tool == "convertCurrency"));
    }

    #[test]
    fn duplicate_registrations_keep_the_first_tool() {
        let registry = ToolRegistry::new(vec![
            Arc::new(WeatherTool),
            Arc::new(WeatherTool),
            Arc::new(FahrenheitToCelsiusTool),
        ]);
        assert_eq!(registry.len(), 2);
    }
}
