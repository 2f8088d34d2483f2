//! Micro-directives embedded in template string values
//!
//! - `&name` asks for a named lookup ([`Directive`])
//! - `#value` marks a constant, disabled field
//! - keys starting with `@` embed their nested value as JSON text

use crate::value::{RawTemplate, RawValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Prefix of a named lookup directive value
pub const LOOKUP_PREFIX: char = '&';

/// Prefix of a constant value
pub const CONSTANT_PREFIX: char = '#';

/// Prefix of a key whose value is embedded as JSON text
pub const EMBED_PREFIX: char = '@';

/// How a lookup result populates a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupKind {
    /// Result becomes select options; switches the template to lookup-driven selection
    Enumeration,
    /// Result becomes the field's candidate value list
    Identifier,
}

/// Named reference-data lookups a template may request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Lookup {
    /// Distinct `subType` of ingest metadata
    SubTypes,
    /// Data source types reference list
    DataSourceTypes,
    /// Distinct `subDocType` of ingest metadata
    SubDocTypes,
    /// Ids of data source documents
    DataSourceIds,
    /// Ids of process specification documents
    ProcessSpecIds,
    /// Ids of ingest documents
    IngestDocumentIds,
    /// Ids of job specification documents
    JobSpecIds,
    /// Distinct subsets
    Subsets,
    /// Region names
    Regions,
    /// Fixed CTC sub document types
    CtcSubDocTypes,
    /// TTL tier names
    TtlTiers,
    /// TTL tier durations in seconds
    TtlTierSeconds,
    /// Data source sub types reference list
    DataSourceSubTypes,
    /// Data source statuses reference list
    DataSourceStatuses,
    /// Generic statuses reference list
    Statuses,
    /// Process specification statuses reference list
    ProcessSpecStatuses,
}

impl Lookup {
    /// Every lookup, in dispatch-table order
    pub const ALL: [Lookup; 16] = [
        Lookup::SubTypes,
        Lookup::DataSourceTypes,
        Lookup::SubDocTypes,
        Lookup::DataSourceIds,
        Lookup::ProcessSpecIds,
        Lookup::IngestDocumentIds,
        Lookup::JobSpecIds,
        Lookup::Subsets,
        Lookup::Regions,
        Lookup::CtcSubDocTypes,
        Lookup::TtlTiers,
        Lookup::TtlTierSeconds,
        Lookup::DataSourceSubTypes,
        Lookup::DataSourceStatuses,
        Lookup::Statuses,
        Lookup::ProcessSpecStatuses,
    ];

    /// Name used after `&` in template documents
    #[must_use]
    pub const fn directive_name(self) -> &'static str {
        match self {
            Self::SubTypes => "getSubTypes",
            Self::DataSourceTypes => "getDataSourceTypes",
            Self::SubDocTypes => "getSubDocTypes",
            Self::DataSourceIds => "getDataSourceId",
            Self::ProcessSpecIds => "getProcessSpecIds",
            Self::IngestDocumentIds => "getIngestDocumentIds",
            Self::JobSpecIds => "getJobSpecIds",
            Self::Subsets => "getSubsets",
            Self::Regions => "getRegions",
            Self::CtcSubDocTypes => "getCTCSubDocTypes",
            Self::TtlTiers => "getTTLTier",
            Self::TtlTierSeconds => "getTTLTierSeconds",
            Self::DataSourceSubTypes => "getDataSourceSubTypes",
            Self::DataSourceStatuses => "getDataSourceStatuses",
            Self::Statuses => "getStatuses",
            Self::ProcessSpecStatuses => "getProcessSpecStatuses",
        }
    }

    /// Label used in failure placeholders
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SubTypes => "sub types",
            Self::DataSourceTypes => "data source types",
            Self::SubDocTypes => "sub document types",
            Self::DataSourceIds => "data source IDs",
            Self::ProcessSpecIds => "process spec IDs",
            Self::IngestDocumentIds => "ingest document IDs",
            Self::JobSpecIds => "job spec IDs",
            Self::Subsets => "subsets",
            Self::Regions => "regions",
            Self::CtcSubDocTypes => "CTC sub document types",
            Self::TtlTiers => "TTL tier",
            Self::TtlTierSeconds => "TTL tier seconds",
            Self::DataSourceSubTypes => "data source sub types",
            Self::DataSourceStatuses => "data source statuses",
            Self::Statuses => "statuses",
            Self::ProcessSpecStatuses => "process spec statuses",
        }
    }

    /// Behavior class of this lookup
    #[must_use]
    pub const fn kind(self) -> LookupKind {
        match self {
            Self::DataSourceIds
            | Self::ProcessSpecIds
            | Self::IngestDocumentIds
            | Self::JobSpecIds => LookupKind::Identifier,
            Self::SubTypes
            | Self::DataSourceTypes
            | Self::SubDocTypes
            | Self::Subsets
            | Self::Regions
            | Self::CtcSubDocTypes
            | Self::TtlTiers
            | Self::TtlTierSeconds
            | Self::DataSourceSubTypes
            | Self::DataSourceStatuses
            | Self::Statuses
            | Self::ProcessSpecStatuses => LookupKind::Enumeration,
        }
    }

    /// Find lookup by directive name (case-sensitive)
    #[must_use]
    pub fn from_directive_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.directive_name() == name)
    }
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.directive_name())
    }
}

/// A parsed `&name` directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Known lookup
    Lookup(Lookup),
    /// Name not in the dispatch table
    Unknown(String),
}

impl Directive {
    /// Parse a raw string value; `None` unless it starts with `&`
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        value.strip_prefix(LOOKUP_PREFIX).map(Self::from_name)
    }

    /// Resolve a bare directive name
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        Lookup::from_directive_name(name)
            .map_or_else(|| Self::Unknown(name.to_string()), Self::Lookup)
    }
}

/// Distinct known lookups requested anywhere at the top level of a template
#[must_use]
pub fn requested_lookups(template: &RawTemplate) -> BTreeSet<Lookup> {
    template
        .values()
        .filter_map(RawValue::as_str)
        .filter_map(Directive::parse)
        .filter_map(|d| match d {
            Directive::Lookup(lookup) => Some(lookup),
            Directive::Unknown(_) => None,
        })
        .collect()
}
