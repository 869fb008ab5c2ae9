// ABOUTME: Command implementations for the kube-render CLI
// ABOUTME: Resolves variables, parses the root template, and renders it to a writer

use anyhow::{Context, Result};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

use crate::template::{template_name, TemplateEngine};
use crate::values::{ValueResolver, VariableMap};

/// Resolve the invocation's variables: process environment first, then `--set` overrides.
pub fn resolve_variables(overrides: &[String]) -> Result<VariableMap> {
    let values = ValueResolver::new()
        .with_process_environment()
        .with_overrides(overrides)?
        .resolve();
    info!("Resolved {} template variables", values.len());
    Ok(values)
}

/// Build an engine over `values` and register the root template file.
///
/// Returns the engine and the root template's name.
pub async fn load_template(
    template_path: &Path,
    values: VariableMap,
    strict: bool,
) -> Result<(TemplateEngine, String)> {
    let name = template_name(template_path)?;
    let source = tokio::fs::read_to_string(template_path)
        .await
        .with_context(|| format!("Failed to read template {}", template_path.display()))?;

    let mut engine = TemplateEngine::new(values);
    engine.set_strict_mode(strict);
    engine.register_template(&name, &source)?;
    debug!("Parsed template {} from {}", name, template_path.display());

    Ok((engine, name))
}

/// Render the root template with the variable map as top-level data.
pub fn render_manifest<W: Write>(
    engine: &TemplateEngine,
    name: &str,
    values: &VariableMap,
    writer: W,
) -> Result<()> {
    let mut writer = BufWriter::new(writer);
    engine.render_to_write(name, values, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Render `template_path` to stdout, or only parse it when `check` is set.
pub async fn render_template(
    template_path: &Path,
    overrides: &[String],
    strict: bool,
    check: bool,
) -> Result<()> {
    info!("Rendering template: {}", template_path.display());

    let values = resolve_variables(overrides)?;
    let (engine, name) = load_template(template_path, values.clone(), strict).await?;

    if check {
        info!("Check only - template {} parsed successfully", name);
        return Ok(());
    }

    let stdout = std::io::stdout();
    render_manifest(&engine, &name, &values, stdout.lock())
        .with_context(|| format!("Failed to render template {}", name))?;

    info!("Template {} rendered", name);
    Ok(())
}
