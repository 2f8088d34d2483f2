//! Fixed statement catalog
//!
//! Every query the application issues is a [`Statement`] variant. Each
//! variant knows its N1QL text (for a cluster-backed store) and its
//! [`QueryPlan`] (for stores that evaluate statements themselves).

use serde_json::Value as JsonValue;
use std::fmt;

/// Bucket holding all application keyspaces
pub const BUCKET: &str = "vxdata";

/// Scope holding all application keyspaces
pub const SCOPE: &str = "_default";

/// Collection within the bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Keyspace {
    /// Shared metadata: templates, reference lists, job specs
    Common,
    /// Runtime documents: data sources, process specs, submitted forms
    Runtime,
}

impl Keyspace {
    /// Collection name
    #[must_use]
    pub const fn collection(self) -> &'static str {
        match self {
            Self::Common => "COMMON",
            Self::Runtime => "RUNTIME",
        }
    }

    /// Fully qualified keyspace path
    #[must_use]
    pub fn path(self) -> String {
        format!("{BUCKET}.{SCOPE}.{}", self.collection())
    }
}

impl fmt::Display for Keyspace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.collection())
    }
}

/// Single reference documents holding one array-valued list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceList {
    /// `MD:V01:DataSourceSubTypes.subTypes`
    DataSourceSubTypes,
    /// `MD:V01:DataSourceStatuses.statuses`
    DataSourceStatuses,
    /// `MD:V01:Statuses.statuses`
    Statuses,
    /// `MD:V01:DataSourceTypes.types`
    DataSourceTypes,
    /// `MD:V01:ProcessSpecStatuses.statuses`
    ProcessSpecStatuses,
    /// `MD:V01:TTLTiers.Tiers`
    TtlTiers,
    /// `MD:V01:TTLTiers.TierSeconds`
    TtlTierSeconds,
}

impl ReferenceList {
    /// Keyspace of the reference document
    #[must_use]
    pub const fn keyspace(self) -> Keyspace {
        match self {
            Self::DataSourceSubTypes => Keyspace::Runtime,
            _ => Keyspace::Common,
        }
    }

    /// Id of the reference document
    #[must_use]
    pub const fn document_id(self) -> &'static str {
        match self {
            Self::DataSourceSubTypes => "MD:V01:DataSourceSubTypes",
            Self::DataSourceStatuses => "MD:V01:DataSourceStatuses",
            Self::Statuses => "MD:V01:Statuses",
            Self::DataSourceTypes => "MD:V01:DataSourceTypes",
            Self::ProcessSpecStatuses => "MD:V01:ProcessSpecStatuses",
            Self::TtlTiers | Self::TtlTierSeconds => "MD:V01:TTLTiers",
        }
    }

    /// Array-valued field holding the list
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::DataSourceSubTypes => "subTypes",
            Self::DataSourceStatuses | Self::Statuses | Self::ProcessSpecStatuses => "statuses",
            Self::DataSourceTypes => "types",
            Self::TtlTiers => "Tiers",
            Self::TtlTierSeconds => "TierSeconds",
        }
    }
}

/// Every statement the application issues
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Statement {
    /// All stored form templates
    FormTemplates,
    /// Ids of job specifications
    JobSpecIds,
    /// Ids of data source documents
    DataSourceIds,
    /// Ids of process specifications
    ProcessSpecIds,
    /// Ids of ingest documents
    IngestDocumentIds,
    /// Distinct subsets
    DistinctSubsets,
    /// Region names
    Regions,
    /// Distinct sub-doc-types of ingest metadata
    DistinctSubDocTypes,
    /// Distinct sub-types of ingest metadata
    DistinctSubTypes,
    /// One array-valued reference list
    Reference(ReferenceList),
    /// Ids of runtime documents of a given `type`
    IdsByType(String),
}

/// Document filter of a [`QueryPlan`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Every document
    All,
    /// Document id ends with the suffix
    IdSuffix(&'static str),
    /// Document id equals the value
    IdEquals(&'static str),
    /// Every listed field equals its string value
    Fields(Vec<(&'static str, String)>),
}

/// Row shape of a [`QueryPlan`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    /// `{ <COLLECTION>: document }`
    Document,
    /// `{ "id": meta().id }`
    Id,
    /// `{ <field>: document.<field> }`
    Field(&'static str),
}

/// Evaluation plan of a statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPlan {
    /// Keyspace scanned
    pub keyspace: Keyspace,
    /// Documents kept
    pub filter: Filter,
    /// Row shape
    pub projection: Projection,
    /// Drop duplicate rows
    pub distinct: bool,
}

impl QueryPlan {
    fn new(keyspace: Keyspace, filter: Filter, projection: Projection) -> Self {
        Self {
            keyspace,
            filter,
            projection,
            distinct: false,
        }
    }

    fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Whether a document is kept by the filter
    #[must_use]
    pub fn matches(&self, id: &str, document: &JsonValue) -> bool {
        match &self.filter {
            Filter::All => true,
            Filter::IdSuffix(suffix) => id.ends_with(suffix),
            Filter::IdEquals(expected) => id == *expected,
            Filter::Fields(conditions) => conditions
                .iter()
                .all(|(field, value)| document.get(field).and_then(JsonValue::as_str) == Some(value)),
        }
    }

    /// Project a kept document into a row
    #[must_use]
    pub fn project(&self, id: &str, document: &JsonValue) -> JsonValue {
        let mut row = serde_json::Map::new();
        match self.projection {
            Projection::Document => {
                row.insert(self.keyspace.collection().to_string(), document.clone());
            }
            Projection::Id => {
                row.insert("id".to_string(), JsonValue::String(id.to_string()));
            }
            Projection::Field(field) => {
                if let Some(value) = document.get(field) {
                    row.insert(field.to_string(), value.clone());
                }
            }
        }
        JsonValue::Object(row)
    }
}

impl Statement {
    /// N1QL text
    #[must_use]
    pub fn n1ql(&self) -> String {
        let common = Keyspace::Common.path();
        let runtime = Keyspace::Runtime.path();
        match self {
            Self::FormTemplates => {
                format!("SELECT * FROM {common} WHERE meta().id like '%TEMPLATE'")
            }
            Self::JobSpecIds => format!("SELECT meta().id FROM {common} WHERE type = 'JOB'"),
            Self::DataSourceIds => format!("SELECT meta().id FROM {runtime} WHERE type = 'DS'"),
            Self::ProcessSpecIds => format!("SELECT meta().id FROM {runtime} WHERE type = 'PS'"),
            Self::IngestDocumentIds => format!(
                "SELECT meta().id FROM {runtime} WHERE type = 'IS' and docType = 'ingest'"
            ),
            Self::DistinctSubsets => format!("SELECT DISTINCT subset FROM {common}"),
            Self::Regions => format!(
                "SELECT name FROM {common} WHERE type = 'MD' AND docType='region'"
            ),
            Self::DistinctSubDocTypes => format!(
                "SELECT DISTINCT subDocType FROM {common} WHERE type = 'MD' and docType = 'ingest'"
            ),
            Self::DistinctSubTypes => format!(
                "SELECT DISTINCT subType FROM {common} WHERE type = 'MD' and docType = 'ingest'"
            ),
            Self::Reference(list) => format!(
                "SELECT {} FROM {} WHERE meta().id = '{}'",
                list.column(),
                list.keyspace().path(),
                list.document_id()
            ),
            Self::IdsByType(_) => format!("SELECT meta().id FROM {runtime} WHERE type = $docType"),
        }
    }

    /// Named parameters bound to the N1QL text
    #[must_use]
    pub fn parameters(&self) -> Vec<(&'static str, JsonValue)> {
        match self {
            Self::IdsByType(doc_type) => vec![("docType", JsonValue::String(doc_type.clone()))],
            _ => Vec::new(),
        }
    }

    /// Column holding the value of interest in each row
    #[must_use]
    pub fn column(&self) -> &'static str {
        match self.plan().projection {
            Projection::Document => Keyspace::Common.collection(),
            Projection::Id => "id",
            Projection::Field(field) => field,
        }
    }

    /// Evaluation plan
    #[must_use]
    pub fn plan(&self) -> QueryPlan {
        let md_ingest = || {
            Filter::Fields(vec![("type", "MD".to_string()), ("docType", "ingest".to_string())])
        };
        match self {
            Self::FormTemplates => {
                QueryPlan::new(Keyspace::Common, Filter::IdSuffix("TEMPLATE"), Projection::Document)
            }
            Self::JobSpecIds => QueryPlan::new(
                Keyspace::Common,
                Filter::Fields(vec![("type", "JOB".to_string())]),
                Projection::Id,
            ),
            Self::DataSourceIds => QueryPlan::new(
                Keyspace::Runtime,
                Filter::Fields(vec![("type", "DS".to_string())]),
                Projection::Id,
            ),
            Self::ProcessSpecIds => QueryPlan::new(
                Keyspace::Runtime,
                Filter::Fields(vec![("type", "PS".to_string())]),
                Projection::Id,
            ),
            Self::IngestDocumentIds => QueryPlan::new(
                Keyspace::Runtime,
                Filter::Fields(vec![
                    ("type", "IS".to_string()),
                    ("docType", "ingest".to_string()),
                ]),
                Projection::Id,
            ),
            Self::DistinctSubsets => {
                QueryPlan::new(Keyspace::Common, Filter::All, Projection::Field("subset")).distinct()
            }
            Self::Regions => QueryPlan::new(
                Keyspace::Common,
                Filter::Fields(vec![
                    ("type", "MD".to_string()),
                    ("docType", "region".to_string()),
                ]),
                Projection::Field("name"),
            ),
            Self::DistinctSubDocTypes => {
                QueryPlan::new(Keyspace::Common, md_ingest(), Projection::Field("subDocType"))
                    .distinct()
            }
            Self::DistinctSubTypes => {
                QueryPlan::new(Keyspace::Common, md_ingest(), Projection::Field("subType"))
                    .distinct()
            }
            Self::Reference(list) => QueryPlan::new(
                list.keyspace(),
                Filter::IdEquals(list.document_id()),
                Projection::Field(list.column()),
            ),
            Self::IdsByType(doc_type) => QueryPlan::new(
                Keyspace::Runtime,
                Filter::Fields(vec![("type", doc_type.clone())]),
                Projection::Id,
            ),
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.n1ql())
    }
}
