use std::collections::BTreeMap;

use serde::Serialize;

use crate::codegen::error::GenerateError;
use crate::plan::TestDataShape;

/// On-disk fixture layout. Fields are declared in key order so the
/// top level is sorted like the inner maps.
#[derive(Serialize)]
struct FixtureFile {
    invalid_data: BTreeMap<String, String>,
    valid_data: BTreeMap<String, String>,
}

/// Pretty-printed fixture JSON with a trailing newline.
pub fn render_fixtures(data: &TestDataShape) -> Result<String, GenerateError> {
    let file = FixtureFile {
        invalid_data: data.invalid_data(),
        valid_data: data.valid_data(),
    };
    let mut json =
        serde_json::to_string_pretty(&file).map_err(|e| GenerateError::Fixtures(e.to_string()))?;
    json.push('\n');
    Ok(json)
}
