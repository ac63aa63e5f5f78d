use serde::{Deserialize, Serialize};

/// One tabular record returned alongside an answer. Column order is
/// preserved as the server sent it (serde_json preserve_order).
pub type DataRow = serde_json::Map<String, serde_json::Value>;

/// Response from the natural-language query endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<DataRow>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_used: Option<String>,
}

/// Headline statistics for the backing dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub total_records: u64,
    pub departments: u64,
    pub suppliers: u64,
}

/// Enumeration of department names (auxiliary endpoint)
#[derive(Debug, Clone, Deserialize)]
pub struct DepartmentsResponse {
    #[serde(default)]
    pub departments: Vec<String>,
}

/// Enumeration of acquisition types (auxiliary endpoint)
#[derive(Debug, Clone, Deserialize)]
pub struct AcquisitionTypesResponse {
    #[serde(default)]
    pub acquisition_types: Vec<String>,
}
