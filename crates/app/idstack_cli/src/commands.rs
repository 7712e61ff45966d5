//! Subcommand implementations. Each writes its result to `out`.

use std::io::Write;
use std::path::Path;

use idstack_core::changes::{self, RemovalMode};
use idstack_core::{ChangeSet, DescriptorGraph, Draft, StackConfig, config};

use crate::Result;
use crate::cli::Format;

/// Read a stack file, applying the region override if any.
fn load(path: &Path, region: Option<&str>) -> Result<StackConfig> {
    let config = config::load(path)?;
    Ok(match region {
        Some(region) => {
            log::debug!("Overriding region {} with {}", config.region, region);
            config.with_region(region)
        }
        None => config,
    })
}

fn compose(path: &Path, region: Option<&str>) -> Result<DescriptorGraph> {
    let graph = Draft::new(load(path, region)?)
        .validate()?
        .compose()?
        .into_graph();
    Ok(graph)
}

fn write_json<T: serde::Serialize>(out: &mut dyn Write, value: &T) -> Result<()> {
    writeln!(out, "{}", serde_json::to_string_pretty(value)?)?;
    Ok(())
}

pub fn validate(out: &mut dyn Write, path: &Path, region: Option<&str>) -> Result<()> {
    let config = load(path, region)?;
    let stack = config.stack.clone();
    let validated = Draft::new(config).validate()?;

    writeln!(
        out,
        "{stack}: valid ({} resources, {} warnings)",
        validated.resources().len(),
        validated.warnings().len()
    )?;
    for warning in validated.warnings() {
        writeln!(out, "warning: {warning}")?;
    }
    Ok(())
}

pub fn synth(out: &mut dyn Write, path: &Path, region: Option<&str>, format: Format) -> Result<()> {
    let graph = compose(path, region)?;
    match format {
        Format::Json => write_json(out, &graph)?,
        Format::Yaml => write!(out, "{}", serde_yaml::to_string(&graph)?)?,
    }
    Ok(())
}

pub fn outputs(out: &mut dyn Write, path: &Path, region: Option<&str>) -> Result<()> {
    let exported = idstack_core::run(load(path, region)?)?;
    write_json(out, exported.outputs())
}

/// Print the plan, then refuse it if it replaces resources without
/// acknowledgment.
pub fn plan(
    out: &mut dyn Write,
    previous: &Path,
    next: &Path,
    region: Option<&str>,
    acknowledge_disruptive: bool,
) -> Result<()> {
    let previous = compose(previous, region)?;
    let next = compose(next, region)?;
    let plan = ChangeSet::between(&previous, &next);
    write_json(out, &plan)?;
    plan.approve(acknowledge_disruptive)?;
    Ok(())
}

pub fn remove(
    out: &mut dyn Write,
    path: &Path,
    region: Option<&str>,
    resource: &str,
    cascade: bool,
) -> Result<()> {
    let graph = compose(path, region)?;
    let mode = if cascade {
        RemovalMode::Cascade
    } else {
        RemovalMode::Reject
    };
    let plan = changes::removal_plan(&graph, resource, mode)?;
    write_json(out, &plan)
}

pub fn teardown(out: &mut dyn Write, path: &Path, region: Option<&str>) -> Result<()> {
    let graph = compose(path, region)?;
    write_json(out, &changes::teardown_plan(&graph))
}
