//! EXPLAIN output formatting
//!
//! Formats plan trees for display to users. Each node contributes the text
//! of its `explain_plan_for_node`; children follow their parent, indented
//! one level deeper.

use crate::planner::node::PlanNode;

/// Indentation added per tree level
const INDENT_UNIT: &str = "  ";

/// Format a plan tree for EXPLAIN output
pub struct ExplainOutput;

impl ExplainOutput {
    /// Format a plan tree as a string, one node per line (plus any
    /// continuation lines a node emits)
    pub fn format(plan: &PlanNode) -> String {
        let mut output = String::new();
        Self::format_node(plan, 0, &mut output);
        output
    }

    fn format_node(plan: &PlanNode, depth: usize, out: &mut String) {
        let prefix = INDENT_UNIT.repeat(depth);
        out.push_str(&prefix);
        out.push_str(&plan.explain_plan_for_node(&prefix));
        out.push('\n');

        for child in plan.children() {
            Self::format_node(child, depth + 1, out);
        }
    }
}
