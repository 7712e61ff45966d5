//! Non-fatal diagnostics.
//!
//! Warnings never block the pipeline. They are logged when raised and kept
//! verbatim so the caller can report them.

use serde::Serialize;

use crate::models::ResourceKind;

/// Insecure-but-permitted configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "warning", rename_all = "snake_case")]
pub enum ConfigurationWarning {
    /// Implicit grant enabled next to authorization-code grant.
    InsecureGrantCombination { client: String },
    /// Plain-http redirect to a loopback host.
    LoopbackRedirect { client: String, url: String },
}

impl std::fmt::Display for ConfigurationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigurationWarning::InsecureGrantCombination { client } => write!(
                f,
                "client {client} enables implicit grant alongside authorization code grant; implicit grant exposes tokens in the URL fragment"
            ),
            ConfigurationWarning::LoopbackRedirect { client, url } => write!(
                f,
                "client {client} redirects to plain-http loopback URL {url}"
            ),
        }
    }
}

/// An update that destroys and recreates a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisruptiveChangeWarning {
    pub resource: String,
    pub kind: ResourceKind,
    pub attribute: String,
    pub previous: String,
    pub next: String,
}

impl std::fmt::Display for DisruptiveChangeWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} will be replaced: {} changes from {} to {}",
            self.kind, self.resource, self.attribute, self.previous, self.next
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Warning {
    Configuration(ConfigurationWarning),
    DisruptiveChange(DisruptiveChangeWarning),
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::Configuration(w) => w.fmt(f),
            Warning::DisruptiveChange(w) => w.fmt(f),
        }
    }
}

impl From<ConfigurationWarning> for Warning {
    fn from(w: ConfigurationWarning) -> Self {
        Warning::Configuration(w)
    }
}

impl From<DisruptiveChangeWarning> for Warning {
    fn from(w: DisruptiveChangeWarning) -> Self {
        Warning::DisruptiveChange(w)
    }
}

/// Append-only warning log carried through the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Warnings(Vec<Warning>);

impl Warnings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, warning: impl Into<Warning>) {
        let warning = warning.into();
        log::warn!("{warning}");
        self.0.push(warning);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Warning> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Warning] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<Warning> {
        self.0
    }
}

impl<'a> IntoIterator for &'a Warnings {
    type Item = &'a Warning;
    type IntoIter = std::slice::Iter<'a, Warning>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
