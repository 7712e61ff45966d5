//! Stack outputs: the identifiers a client application needs to sign in.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::definitions::{Descriptor, DescriptorSet};
use crate::error::{ConfigurationError, InternalInvariantViolation};
use crate::graph::DescriptorGraph;
use crate::models::{OutputSelection, ResourceKind};

/// Referrer named in errors raised while resolving the output selection.
const OUTPUTS: &str = "outputs";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StackOutputs {
    pub directory_id: String,
    pub client_id: String,
    pub federation_id: String,
    pub region: String,
}

impl StackOutputs {
    /// Outputs keyed by their exported names.
    pub fn as_map(&self) -> BTreeMap<&'static str, &str> {
        BTreeMap::from([
            ("clientId", self.client_id.as_str()),
            ("directoryId", self.directory_id.as_str()),
            ("federationId", self.federation_id.as_str()),
            ("region", self.region.as_str()),
        ])
    }
}

/// Logical ids of the resources whose physical ids get exported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTargets {
    pub directory: String,
    pub client: String,
    pub federation: String,
}

/// Resolve the output selection against the validated resources.
///
/// An unset entry falls back to the only resource of that kind. The client
/// must belong to the directory and the federation must trust the client.
pub fn select_targets(
    selection: Option<&OutputSelection>,
    resolved: &DescriptorSet,
) -> Result<OutputTargets, ConfigurationError> {
    let selection = selection.cloned().unwrap_or_default();

    let directory = match &selection.directory {
        Some(id) => resolved.directory(OUTPUTS, id)?.logical_id.clone(),
        None => only(resolved, ResourceKind::Directory)?,
    };
    let client = match &selection.client {
        Some(id) => resolved.client(OUTPUTS, id)?.logical_id.clone(),
        None => only(resolved, ResourceKind::Client)?,
    };
    let federation = match &selection.federation {
        Some(id) => resolved.federation(OUTPUTS, id)?.logical_id.clone(),
        None => only(resolved, ResourceKind::Federation)?,
    };

    if resolved.client(OUTPUTS, &client)?.directory != directory {
        return Err(ConfigurationError::UnrelatedOutputs {
            kind: ResourceKind::Client,
            selected: client,
            target: directory,
        });
    }
    let trusted = resolved
        .federation(OUTPUTS, &federation)?
        .providers
        .iter()
        .any(|p| p.client == client && p.directory == directory);
    if !trusted {
        return Err(ConfigurationError::UnrelatedOutputs {
            kind: ResourceKind::Federation,
            selected: federation,
            target: client,
        });
    }

    Ok(OutputTargets {
        directory,
        client,
        federation,
    })
}

fn only(resolved: &DescriptorSet, kind: ResourceKind) -> Result<String, ConfigurationError> {
    let mut matching = resolved.iter().filter(|d| d.kind() == kind);
    match (matching.next(), matching.count()) {
        (Some(descriptor), 0) => Ok(descriptor.logical_id().to_string()),
        (first, rest) => Err(ConfigurationError::AmbiguousOutputs {
            kind,
            count: usize::from(first.is_some()) + rest,
        }),
    }
}

/// Read the physical ids of the chosen resources out of the composed graph.
pub fn export(
    targets: &OutputTargets,
    graph: &DescriptorGraph,
) -> Result<StackOutputs, InternalInvariantViolation> {
    let directory_id = physical_id(graph, &targets.directory, ResourceKind::Directory)?;
    let client_id = physical_id(graph, &targets.client, ResourceKind::Client)?;
    let federation_id = physical_id(graph, &targets.federation, ResourceKind::Federation)?;

    if graph.region.is_empty() {
        return Err(InternalInvariantViolation::new(
            "composed graph has no region",
        ));
    }

    Ok(StackOutputs {
        directory_id,
        client_id,
        federation_id,
        region: graph.region.clone(),
    })
}

fn physical_id(
    graph: &DescriptorGraph,
    logical_id: &str,
    kind: ResourceKind,
) -> Result<String, InternalInvariantViolation> {
    let id = match graph.get(logical_id) {
        Some(Descriptor::Directory(d)) if kind == ResourceKind::Directory => &d.id,
        Some(Descriptor::Client(c)) if kind == ResourceKind::Client => &c.id,
        Some(Descriptor::Federation(f)) if kind == ResourceKind::Federation => &f.id,
        _ => {
            return Err(InternalInvariantViolation::new(format!(
                "exported {kind} {logical_id} is missing from the composed graph"
            )));
        }
    };
    if id.is_empty() {
        return Err(InternalInvariantViolation::new(format!(
            "exported {kind} {logical_id} has an empty physical id"
        )));
    }
    Ok(id.clone())
}
