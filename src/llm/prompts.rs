// Prompt templates for the five fund-operations agents.
//
// Every builder is a pure function of its inputs: no clock, no randomness,
// no validation. Callers check for empty input before building.

use crate::ingestion::{FundTable, PREVIEW_ROWS};
use crate::schema::DocumentType;

/// Persona sent as the system message ahead of every prompt.
pub const SYSTEM_INSTRUCTION: &str = "You are Imperium AI, an enterprise-grade AI designed to manage legal, financial, and operational intelligence for global asset managers.";

pub fn legal_ops_prompt(context: &str, doc_type: DocumentType) -> String {
    format!(
        "Generate a professional {} for a global fund given this context: {}",
        doc_type, context
    )
}

pub fn cfo_ops_prompt(capital_data: &FundTable) -> String {
    format!(
        "Based on this capital data: {}, summarize cash positions, outstanding capital calls, and recommend treasury strategy.",
        capital_data.preview(PREVIEW_ROWS)
    )
}

pub fn investor_comms_prompt(question: &str, context: &str) -> String {
    format!(
        "An LP asks: {}\nFund context: {}\nWrite a clear, compliant answer as an IR professional.",
        question, context
    )
}

pub fn esg_intel_prompt(context: &str) -> String {
    format!(
        "Analyze this fund's ESG performance: {}\nReport EU/US scores and improvement steps.",
        context
    )
}

pub fn risk_strategy_prompt(performance_data: &FundTable) -> String {
    format!(
        "Given fund performance data: {}, analyze risk exposures and suggest rebalancing.",
        performance_data.preview(PREVIEW_ROWS)
    )
}
