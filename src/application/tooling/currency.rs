use super::error::ToolInvokeError;
use super::interface::ClaimsTool;
use super::schema::{FieldKind, FieldSpec, ToolSchema};
use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::debug;

/// Live currency conversion against the exchange-rate provider's pair
/// endpoint. The credential is injected at construction; it never appears
/// in errors or logs.
pub struct ConvertCurrencyTool {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl ConvertCurrencyTool {
    pub fn new(http: reqwest::Client, endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        }
    }
}

#[async_trait]
impl ClaimsTool for ConvertCurrencyTool {
    fn name(&self) -> &'static str {
        "convertCurrency"
    }

    fn description(&self) -> &'static str {
        "Convert an amount from one currency to another using live exchange rates."
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(vec![
            FieldSpec::required(
                "baseCurrency",
                FieldKind::String,
                "The 3-letter ISO currency code to convert from, e.g., \"EUR\"",
            ),
            FieldSpec::required(
                "targetCurrency",
                FieldKind::String,
                "The 3-letter ISO currency code to convert to, e.g., \"USD\"",
            ),
            FieldSpec::required("amount", FieldKind::Number, "The amount of money to convert")
                .with_minimum(0.0),
        ])
    }

    async fn execute(&self, input: Value) -> Result<Value, ToolInvokeError> {
        let base = input
            .get("baseCurrency")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_ascii_uppercase();
        let target = input
            .get("targetCurrency")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_ascii_uppercase();
        let amount = input
            .get("amount")
            .and_then(Value::as_f64)
            .unwrap_or_default();

        let key = self
            .api_key
            .as_deref()
            .ok_or(ToolInvokeError::MissingCredential {
                provider: "exchangerate-api",
            })?;

        let url = format!(
            "{}/v6/{}/pair/{}/{}/{}",
            self.endpoint.trim_end_matches('/'),
            key,
            base,
            target,
            amount,
        );
        debug!(base, target, amount, "Fetching live exchange rate");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| ToolInvokeError::Http {
                endpoint: self.endpoint.clone(),
                source,
            })?
            .error_for_status()
            .map_err(|source| ToolInvokeError::Http {
                endpoint: self.endpoint.clone(),
                source,
            })?;

        let body: Value = response
            .json()
            .await
            .map_err(|source| ToolInvokeError::Http {
                endpoint: self.endpoint.clone(),
                source,
            })?;

        interpret_pair_response(&body, &base, &target, amount)
    }
}

/// Turns the provider's pair payload into the tool output, failing on any
/// unexpected shape rather than returning a partial or zero result.
fn interpret_pair_response(
    body: &Value,
    base: &str,
    target: &str,
    amount: f64,
) -> Result<Value, ToolInvokeError> {
    let marker = body.get("result").and_then(Value::as_str);
    if marker != Some("success") {
        return Err(ToolInvokeError::InvalidPayload(format!(
            "result marker was {}",
            marker.unwrap_or("absent"),
        )));
    }

    let rate = body.get("conversion_rate").and_then(Value::as_f64);
    let converted = body.get("conversion_result").and_then(Value::as_f64);
    let (Some(rate), Some(converted)) = (rate, converted) else {
        return Err(ToolInvokeError::InvalidPayload(
            "missing conversion_rate or conversion_result".to_string(),
        ));
    };

    Ok(json!({
        "convertedAmount": converted,
        "rate": rate,
        "date": body.get("time_last_update_utc").cloned().unwrap_or(Value::Null),
        "baseCurrency": base,
        "targetCurrency": target,
        "originalAmount": amount,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_payload_maps_to_conversion_record() {
        let body = serde_json::json!({
            "result": "success",
            "conversion_rate": 1.082,
            "conversion_result": 108.2,
            "time_last_update_utc": "Tue, 05 Aug 2026 00:00:01 +0000",
        });

        let output = interpret_pair_response(&body, "EUR", "USD", 100.0)
            .expect("success payload converts");
        assert_eq!(output["convertedAmount"], 108.2);
        assert_eq!(output["rate"], 1.082);
        assert_eq!(output["baseCurrency"], "EUR");
        assert_eq!(output["targetCurrency"], "USD");
        assert_eq!(output["originalAmount"], 100.0);
    }

    #[test]
    fn error_marker_fails_the_invocation() {
        let body = serde_json::json!({"result": "error", "error-type": "invalid-key"});
        let err = interpret_pair_response(&body, "EUR", "USD", 100.0)
            .expect_err("error payload fails");
        assert!(matches!(err, ToolInvokeError::InvalidPayload(_)));
    }

    #[test]
    fn missing_conversion_fields_fail_rather_than_default_to_zero() {
        let body = serde_json::json!({"result": "success", "conversion_rate": 1.082});
        let err = interpret_pair_response(&body, "EUR", "USD", 100.0)
            .expect_err("partial payload fails");
        assert!(matches!(err, ToolInvokeError::InvalidPayload(_)));
    }

    #[tokio::test]
    async fn missing_credential_fails_before_any_request() {
        let tool = ConvertCurrencyTool::new(reqwest::Client::new(), "https://rates.invalid", None);
        let err = tool
            .execute(serde_json::json!({
                "baseCurrency": "EUR",
                "targetCurrency": "USD",
                "amount": 100,
            }))
            .await
            .expect_err("no credential fails");
        assert!(matches!(err, ToolInvokeError::MissingCredential { .. }));
    }
}
