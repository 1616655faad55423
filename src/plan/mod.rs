pub mod dimensions;
pub mod markdown;
pub mod plan_generator;
pub mod plan_model;
pub mod test_data;

pub use dimensions::{
    Dimension, FALLBACK_DIMENSIONS, PRIORITY_RULES, PlanConfig, PlanRules, TEST_DIMENSIONS,
    builtin_dimensions, priority_for,
};
pub use markdown::render_markdown;
pub use plan_generator::generate_plan;
pub use plan_model::{
    CaseKind, FieldData, PlanStep, Priority, StepValue, TestCaseSpec, TestDataShape,
    TestDimension, TestPlanDocument,
};
pub use test_data::derive_test_data;
