use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::analyzer::{AnalysisReport, PageAnalyzer};
use crate::browser::capture_page;
use crate::cli::config::{PageSource, PlanFormat, ScaffoldConfig};
use crate::codegen::ArtifactPaths;
use crate::plan::{generate_plan, render_markdown};
use crate::snapshot::{DomSnapshot, Snapshot};
use crate::{ScaffoldOutput, scaffold_page};

// ============================================================================
// analyze subcommand
// ============================================================================

pub fn cmd_analyze(
    source: &PageSource,
    output: Option<&Path>,
    config: &ScaffoldConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let report = analyze_source(source, config)?;
    emit_analysis(&report, output, &mut std::io::stdout().lock())
}

/// Write the report JSON to `output`, or to `stdout` when there is no output
/// file. In the latter case `stdout` carries nothing but the JSON and the
/// summary goes to stderr.
pub fn emit_analysis<W: Write>(
    report: &AnalysisReport,
    output: Option<&Path>,
    stdout: &mut W,
) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string_pretty(report)?;
    match output {
        Some(path) => {
            write_file(path, &format!("{json}\n"))?;
            write!(stdout, "{}", summary(report))?;
            writeln!(stdout, "Wrote {}", path.display())?;
        }
        None => {
            eprint!("{}", summary(report));
            writeln!(stdout, "{json}")?;
        }
    }
    Ok(())
}

// ============================================================================
// plan subcommand
// ============================================================================

pub fn cmd_plan(
    source: &PageSource,
    output_dir: &Path,
    format: PlanFormat,
    config: &ScaffoldConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let report = analyze_source(source, config)?;
    print_summary(&report);

    let plan = generate_plan(&report.model, &config.plan_rules())?;
    let paths = ArtifactPaths::for_page(&plan.page_name);

    let (relative, contents) = match format {
        PlanFormat::Markdown => (paths.plan, render_markdown(&plan, &report.model)),
        PlanFormat::Yaml => (
            paths.plan.replace(".plan.md", ".plan.yaml"),
            serde_yaml::to_string(&plan)?,
        ),
    };

    let path = output_dir.join(relative);
    write_file(&path, &contents)?;
    println!("Generated {} test cases in {}", plan.cases.len(), path.display());
    Ok(())
}

// ============================================================================
// generate subcommand
// ============================================================================

pub fn cmd_generate(
    source: &PageSource,
    output_dir: &Path,
    no_plan: bool,
    config: &ScaffoldConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let analyzer = config.analyzer()?;
    let (snapshot, url) = load_page(source, config)?;

    let ScaffoldOutput {
        report,
        plan,
        artifacts,
    } = scaffold_page(&snapshot, &url, &analyzer, &config.plan_rules(), !no_plan)?;
    print_summary(&report);

    let mut written = Vec::new();
    for artifact in artifacts.iter() {
        written.push(write_artifact(output_dir, &artifact.relative_path, &artifact.contents)?);
    }
    if let Some(plan) = &plan {
        let paths = ArtifactPaths::for_page(&plan.page_name);
        let markdown = render_markdown(plan, &report.model);
        written.push(write_artifact(output_dir, &paths.plan, &markdown)?);
    }

    for path in &written {
        println!("  Wrote: {}", path.display());
    }
    println!("Generated {} files in {}/", written.len(), output_dir.display());
    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

/// Snapshot and URL for a page source. A capture file that is not valid JSON
/// degrades to an unavailable snapshot; a missing one is an error.
pub fn load_page(
    source: &PageSource,
    config: &ScaffoldConfig,
) -> Result<(DomSnapshot, String), Box<dyn std::error::Error>> {
    let Some(path) = &source.snapshot else {
        let url = source.url.as_deref().ok_or("either --url or --snapshot is required")?;
        return Ok((capture_page(&config.browser, url), url.to_string()));
    };

    let json = std::fs::read_to_string(path)?;
    let (snapshot, captured_url) = DomSnapshot::from_json_with_url(&json);
    if let Err(e) = snapshot.node_count() {
        warn!(path = %path.display(), error = %e, "capture file is not a page capture");
    }

    let url = source
        .url
        .clone()
        .or(captured_url)
        .ok_or_else(|| format!("{} has no url; pass --url", path.display()))?;
    info!(path = %path.display(), %url, "loaded capture file");
    Ok((snapshot, url))
}

pub fn analyze_source(
    source: &PageSource,
    config: &ScaffoldConfig,
) -> Result<AnalysisReport, Box<dyn std::error::Error>> {
    let analyzer = config.analyzer()?;
    let (snapshot, url) = load_page(source, config)?;
    Ok(analyzer.analyze(&snapshot, &url))
}

/// Write one generated file below `root`, creating directories as needed.
pub fn write_artifact(root: &Path, relative: &str, contents: &str) -> std::io::Result<PathBuf> {
    let path = root.join(relative);
    write_file(&path, contents)?;
    Ok(path)
}

fn write_file(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, contents)
}

fn print_summary(report: &AnalysisReport) {
    print!("{}", summary(report));
}

fn summary(report: &AnalysisReport) -> String {
    let model = &report.model;
    let diagnostics = &report.diagnostics;
    let mut out = String::new();

    out.push_str(&format!(
        "Analyzed {}: {} ({} elements, {} forms)\n",
        model.url,
        model.page_type,
        model.elements.len(),
        model.forms.len()
    ));
    if let Some(reason) = &diagnostics.snapshot_error {
        out.push_str(&format!("  snapshot unavailable: {reason}\n"));
    }
    if diagnostics.skipped_nodes > 0 {
        out.push_str(&format!("  skipped {} unreadable nodes\n", diagnostics.skipped_nodes));
    }
    for rename in &diagnostics.renamed {
        out.push_str(&format!("  renamed {} -> {}\n", rename.from, rename.to));
    }
    out
}
