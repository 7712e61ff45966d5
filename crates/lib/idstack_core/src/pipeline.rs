//! The composition pipeline.
//!
//! `Draft → Validated → Composed → Exported`. Each transition consumes the
//! previous state, so a failed step leaves nothing behind to reuse, and
//! warnings travel forward with the state that raised them.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::config::validation;
use crate::definitions::{
    self, Descriptor, DescriptorSet, RoleAttachment, client, directory, domain, federation, role,
};
use crate::error::{ConfigurationError, InternalInvariantViolation, PipelineError};
use crate::graph::DescriptorGraph;
use crate::ids::IdSeed;
use crate::models::{
    ClientConfig, DirectoryConfig, DomainConfig, FederationConfig, RoleConfig, StackConfig,
};
use crate::outputs::{self, OutputTargets, StackOutputs};
use crate::topology::ReferenceGraph;
use crate::warning::Warnings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    Draft,
    Validated,
    Composed,
    Exported,
}

impl std::fmt::Display for PipelineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PipelineState::Draft => "draft",
            PipelineState::Validated => "validated",
            PipelineState::Composed => "composed",
            PipelineState::Exported => "exported",
        };
        f.write_str(name)
    }
}

/// Run the whole pipeline on one configuration record.
pub fn run(config: StackConfig) -> Result<Exported, PipelineError> {
    let exported = Draft::new(config).validate()?.compose()?.export()?;
    Ok(exported)
}

/// An unvalidated configuration record.
#[derive(Debug, Clone)]
pub struct Draft {
    config: StackConfig,
}

enum Declared<'a> {
    Directory(&'a DirectoryConfig),
    Client(&'a ClientConfig),
    Domain(&'a DomainConfig),
    Federation(&'a FederationConfig),
    Role(&'a RoleConfig),
}

impl Draft {
    pub fn new(config: StackConfig) -> Self {
        Self { config }
    }

    pub fn state(&self) -> PipelineState {
        PipelineState::Draft
    }

    pub fn config(&self) -> &StackConfig {
        &self.config
    }

    /// Validate every resource in dependency order, stopping at the first
    /// error.
    pub fn validate(self) -> Result<Validated, ConfigurationError> {
        let config = self.config;

        if config.stack.is_empty() {
            return Err(ConfigurationError::MissingField {
                resource: "stack".to_string(),
                field: "stack",
            });
        }
        if !validation::is_valid_region(&config.region) {
            return Err(ConfigurationError::InvalidRegion(config.region.clone()));
        }

        let order = ReferenceGraph::from_config(&config)?.topological_order()?;
        log::debug!("Validation order: {}", order.join(", "));

        let declared: HashMap<&str, Declared<'_>> = config
            .directories
            .iter()
            .map(|d| (d.id.as_str(), Declared::Directory(d)))
            .chain(
                config
                    .clients
                    .iter()
                    .map(|c| (c.id.as_str(), Declared::Client(c))),
            )
            .chain(
                config
                    .domains
                    .iter()
                    .map(|d| (d.id.as_str(), Declared::Domain(d))),
            )
            .chain(
                config
                    .federations
                    .iter()
                    .map(|f| (f.id.as_str(), Declared::Federation(f))),
            )
            .chain(
                config
                    .roles
                    .iter()
                    .map(|r| (r.id.as_str(), Declared::Role(r))),
            )
            .collect();

        let seed = IdSeed::new(&config.stack, &config.region);
        let mut resources = DescriptorSet::new();
        let mut warnings = Warnings::new();

        for id in &order {
            let Some(entry) = declared.get(id) else {
                continue;
            };
            let descriptor = match entry {
                Declared::Directory(c) => Descriptor::Directory(directory::validate(c, &seed)?),
                Declared::Client(c) => {
                    Descriptor::Client(client::validate(c, &resources, &seed, &mut warnings)?)
                }
                Declared::Domain(c) => Descriptor::Domain(domain::validate(c, &resources, &seed)?),
                Declared::Federation(c) => {
                    Descriptor::Federation(federation::validate(c, &resources, &seed)?)
                }
                Declared::Role(c) => Descriptor::Role(role::validate(c, &resources, &seed)?),
            };
            resources.insert(descriptor)?;
        }

        let attachments = role::attachments(&resources)?;
        let targets = outputs::select_targets(config.outputs.as_ref(), &resources)?;

        log::info!(
            "Validated stack {} in {}: {} resources, {} warnings",
            config.stack,
            config.region,
            resources.len(),
            warnings.len()
        );

        Ok(Validated {
            stack: config.stack,
            region: config.region,
            resources,
            attachments,
            targets,
            warnings,
        })
    }
}

/// Every resource validated; nothing cross-referenced yet.
#[derive(Debug, Clone)]
pub struct Validated {
    stack: String,
    region: String,
    resources: DescriptorSet,
    attachments: BTreeMap<String, RoleAttachment>,
    targets: OutputTargets,
    warnings: Warnings,
}

impl Validated {
    pub fn state(&self) -> PipelineState {
        PipelineState::Validated
    }

    pub fn resources(&self) -> &DescriptorSet {
        &self.resources
    }

    pub fn warnings(&self) -> &Warnings {
        &self.warnings
    }

    /// Assemble the descriptor graph and check it is internally consistent.
    pub fn compose(self) -> Result<Composed, InternalInvariantViolation> {
        for descriptor in self.resources.iter() {
            for dep in descriptor.dependencies() {
                if !self.resources.contains(dep) {
                    return Err(InternalInvariantViolation::new(format!(
                        "{} references {dep} which was never validated",
                        descriptor.logical_id()
                    )));
                }
            }
        }

        for role in self.resources.roles() {
            let federation = self
                .resources
                .get(&role.federation)
                .and_then(Descriptor::as_federation)
                .ok_or_else(|| {
                    InternalInvariantViolation::new(format!(
                        "role {} lost its federation {}",
                        role.logical_id, role.federation
                    ))
                })?;
            if role.trust.audience != federation.id {
                return Err(InternalInvariantViolation::new(format!(
                    "role {} trusts {} instead of {}",
                    role.logical_id, role.trust.audience, federation.id
                )));
            }
        }

        for (federation, attachment) in &self.attachments {
            let attached = std::iter::once(&attachment.authenticated)
                .chain(attachment.unauthenticated.as_ref());
            for role in attached {
                let bound = self
                    .resources
                    .get(role)
                    .and_then(Descriptor::as_role)
                    .is_some_and(|r| r.federation == *federation);
                if !bound {
                    return Err(InternalInvariantViolation::new(format!(
                        "federation {federation} is attached to role {role} it does not own"
                    )));
                }
            }
        }

        let graph = DescriptorGraph::new(self.stack, self.region, self.resources, self.attachments);
        log::info!("Composed descriptor graph with {} resources", graph.len());

        Ok(Composed {
            graph,
            targets: self.targets,
            warnings: self.warnings,
        })
    }
}

/// A consistent descriptor graph, ready for export.
#[derive(Debug, Clone)]
pub struct Composed {
    graph: DescriptorGraph,
    targets: OutputTargets,
    warnings: Warnings,
}

impl Composed {
    pub fn state(&self) -> PipelineState {
        PipelineState::Composed
    }

    pub fn graph(&self) -> &DescriptorGraph {
        &self.graph
    }

    pub fn warnings(&self) -> &Warnings {
        &self.warnings
    }

    pub fn into_graph(self) -> DescriptorGraph {
        self.graph
    }

    pub fn export(self) -> Result<Exported, InternalInvariantViolation> {
        let outputs = outputs::export(&self.targets, &self.graph)?;
        log::info!(
            "Exported outputs of stack {}: directory {}, client {}, federation {}",
            self.graph.stack,
            outputs.directory_id,
            outputs.client_id,
            outputs.federation_id
        );
        Ok(Exported {
            graph: self.graph,
            outputs,
            warnings: self.warnings,
        })
    }
}

/// Final state: the graph, its outputs and every warning raised on the way.
#[derive(Debug, Clone)]
pub struct Exported {
    graph: DescriptorGraph,
    outputs: StackOutputs,
    warnings: Warnings,
}

impl Exported {
    pub fn state(&self) -> PipelineState {
        PipelineState::Exported
    }

    pub fn graph(&self) -> &DescriptorGraph {
        &self.graph
    }

    pub fn outputs(&self) -> &StackOutputs {
        &self.outputs
    }

    pub fn warnings(&self) -> &Warnings {
        &self.warnings
    }

    pub fn into_parts(self) -> (DescriptorGraph, StackOutputs, Warnings) {
        (self.graph, self.outputs, self.warnings)
    }
}

// Descriptors and finished pipelines must stay Send + Sync.
const _: () = {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<definitions::Descriptor>();
    assert_send_sync::<DescriptorGraph>();
    assert_send_sync::<Exported>();
};
