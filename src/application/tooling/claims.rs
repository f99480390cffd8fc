use super::error::ToolInvokeError;
use super::interface::ClaimsTool;
use super::schema::{FieldKind, FieldSpec, ToolSchema};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Value, json};
use tracing::info;

/// Builds the structured review record for a gathered claim. The record is
/// stamped and handed back to the model; routing it into a claims queue is
/// a collaborator concern outside this service.
pub struct ReviewClaimTool;

#[async_trait]
impl ClaimsTool for ReviewClaimTool {
    fn name(&self) -> &'static str {
        "reviewClaim"
    }

    fn description(&self) -> &'static str {
        "Submit a structured claim review including decision, suggested payout, and reasoning"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(vec![
            FieldSpec::required(
                "recommendation",
                FieldKind::String,
                "Recommended action on this claim",
            )
            .with_allowed(&["approve", "deny", "escalate"]),
            FieldSpec::optional(
                "suggestedPayoutUSD",
                FieldKind::Number,
                "Suggested payout amount in USD, if the claim is approved",
            )
            .with_minimum(0.0),
            FieldSpec::required(
                "reasoning",
                FieldKind::String,
                "Summary of evidence and justification for the recommendation",
            ),
            FieldSpec::required(
                "redFlags",
                FieldKind::StringArray,
                "List of potential issues, inconsistencies, or missing information",
            ),
        ])
    }

    async fn execute(&self, input: Value) -> Result<Value, ToolInvokeError> {
        let recommendation = input
            .get("recommendation")
            .and_then(Value::as_str)
            .unwrap_or_default();
        info!(recommendation, "Submitting claim review");

        let mut record = json!({
            "recommendation": recommendation,
            "reasoning": input.get("reasoning").cloned().unwrap_or(Value::Null),
            "redFlags": input.get("redFlags").cloned().unwrap_or_else(|| json!([])),
            "submittedAt": Utc::now().to_rfc3339(),
        });
        if let Some(payout) = input.get("suggestedPayoutUSD") {
            record["suggestedPayoutUSD"] = payout.clone();
        }
        Ok(record)
    }
}
