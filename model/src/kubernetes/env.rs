use crate::configuration::{take_key, Configuration, FreeForm};
use crate::constants::{CUSTOM_RESOURCES, KINDS, NAMESPACES, OMIT_KINDS, OMIT_NAMESPACES};
use crate::error::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_plain::derive_display_from_serialize;

/// The part of a cluster that an account exposes to the platform.
#[derive(Serialize, Deserialize, Debug, Default, Eq, PartialEq, Clone, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Env {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub namespaces: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub omit_namespaces: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub kinds: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub omit_kinds: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_resources: Vec<CustomKubernetesResource>,
}

impl Configuration for Env {}

/// Maps a Kubernetes kind onto a platform kind.
#[derive(Serialize, Deserialize, Debug, Default, Eq, PartialEq, Clone, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomKubernetesResource {
    #[serde(default)]
    pub kubernetes_kind: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub spinnaker_kind: String,
    /// Whether the platform tracks versioned history for this kind.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub versioned: bool,
}

/// The two axes an account's scope is expressed on.
#[derive(Serialize, Deserialize, Debug, Eq, PartialEq, Clone, Copy)]
#[serde(rename_all = "camelCase")]
pub enum ScopeAxis {
    Namespaces,
    Kinds,
}

derive_display_from_serialize!(ScopeAxis);

impl Env {
    /// Removes the scope keys from a free-form payload and returns them as an `Env`. Keys that
    /// are absent or `null` produce empty lists.
    pub fn take_from(settings: &mut FreeForm) -> Result<Self> {
        Ok(Self {
            namespaces: take_key(settings, NAMESPACES)?,
            omit_namespaces: take_key(settings, OMIT_NAMESPACES)?,
            kinds: take_key(settings, KINDS)?,
            omit_kinds: take_key(settings, OMIT_KINDS)?,
            custom_resources: take_key(settings, CUSTOM_RESOURCES)?,
        })
    }

    /// The axes that have both an inclusion list and an exclusion list populated.
    pub fn conflicting_axes(&self) -> Vec<ScopeAxis> {
        let mut axes = Vec::new();
        if !self.namespaces.is_empty() && !self.omit_namespaces.is_empty() {
            axes.push(ScopeAxis::Namespaces);
        }
        if !self.kinds.is_empty() && !self.omit_kinds.is_empty() {
            axes.push(ScopeAxis::Kinds);
        }
        axes
    }
}
