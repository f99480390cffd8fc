mod claims;
mod currency;
mod customer;
mod error;
mod interface;
mod registry;
mod schema;
mod units;
mod weather;

pub use claims::ReviewClaimTool;
pub use currency::ConvertCurrencyTool;
pub use customer::VerifyCustomerTool;
pub use error::{ToolError, ToolInvokeError};
pub use interface::{ClaimsTool, ToolDeclaration};
pub use registry::ToolRegistry;
pub use schema::{FieldFault, FieldKind, FieldSpec, ToolSchema};
pub use units::FahrenheitToCelsiusTool;
pub use weather::WeatherTool;
