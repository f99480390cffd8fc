use super::error::ToolInvokeError;
use super::interface::ClaimsTool;
use super::schema::{FieldKind, FieldSpec, ToolSchema};
use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::info;

/// Stand-in for a customer-database lookup: a policy number is valid
/// exactly when it starts with the `ZR` series prefix.
pub struct VerifyCustomerTool;

const VALID_POLICY_PREFIX: &str = "ZR";

#[async_trait]
impl ClaimsTool for VerifyCustomerTool {
    fn name(&self) -> &'static str {
        "verifyCustomer"
    }

    fn description(&self) -> &'static str {
        "Check if a person is a valid customer based on their name and policy number."
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(vec![
            FieldSpec::required("name", FieldKind::String, "Full name of the customer"),
            FieldSpec::required(
                "policyNumber",
                FieldKind::String,
                "Customer's travel insurance policy number",
            ),
        ])
    }

    async fn execute(&self, input: Value) -> Result<Value, ToolInvokeError> {
        let name = input.get("name").and_then(Value::as_str).unwrap_or_default();
        let policy_number = input
            .get("policyNumber")
            .and_then(Value::as_str)
            .unwrap_or_default();

        info!(name, policy_number, "Verifying customer");
        let is_valid = policy_number.starts_with(VALID_POLICY_PREFIX);

        Ok(json!({
            "isValidCustomer": is_valid,
            "name": name,
            "policyNumber": policy_number,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn zr_series_policies_verify() {
        let output = VerifyCustomerTool
            .execute(serde_json::json!({"name": "Ada Byron", "policyNumber": "ZR12345"}))
            .await
            .expect("verification succeeds");
        assert_eq!(output["isValidCustomer"], true);
        assert_eq!(output["name"], "Ada Byron");
        assert_eq!(output["policyNumber"], "ZR12345");
    }

    #[tokio::test]
    async fn other_series_do_not_verify() {
        let output = VerifyCustomerTool
            .execute(serde_json::json!({"name": "Ada Byron", "policyNumber": "AB999"}))
            .await
            .expect("verification succeeds");
        assert_eq!(output["isValidCustomer"], false);
    }
}
