use serde::{Deserialize, Serialize};

use crate::naming::file_stem_for_page;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    PageObject,
    TestSuite,
    Fixtures,
}

/// One generated file, not yet written anywhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub kind: ArtifactKind,
    /// Forward-slash path relative to the output root.
    pub relative_path: String,
    pub contents: String,
}

/// The three files generated for one page. Only the code generator builds
/// one; everything else reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedArtifactSet {
    page_object: Artifact,
    test_suite: Artifact,
    fixtures: Artifact,
}

impl GeneratedArtifactSet {
    pub(crate) fn new(page_object: Artifact, test_suite: Artifact, fixtures: Artifact) -> Self {
        Self {
            page_object,
            test_suite,
            fixtures,
        }
    }

    pub fn page_object(&self) -> &Artifact {
        &self.page_object
    }

    pub fn test_suite(&self) -> &Artifact {
        &self.test_suite
    }

    pub fn fixtures(&self) -> &Artifact {
        &self.fixtures
    }

    pub fn iter(&self) -> impl Iterator<Item = &Artifact> {
        [&self.page_object, &self.test_suite, &self.fixtures].into_iter()
    }
}

/// Output locations for a page, relative to the output root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub page_object: String,
    pub test_suite: String,
    pub fixtures: String,
    pub plan: String,
}

impl ArtifactPaths {
    pub fn for_page(page_name: &str) -> Self {
        let stem = file_stem_for_page(page_name);
        Self {
            page_object: format!("pages/{stem}.page.ts"),
            test_suite: format!("tests/{stem}.spec.ts"),
            fixtures: format!("fixtures/{stem}.data.json"),
            plan: format!("plans/{stem}.plan.md"),
        }
    }

    /// Import path of the page object as seen from the test file.
    pub fn page_object_import(&self) -> String {
        format!("../{}", self.page_object.trim_end_matches(".ts"))
    }

    /// Import path of the fixtures as seen from the test file.
    pub fn fixtures_import(&self) -> String {
        format!("../{}", self.fixtures)
    }
}
