use crate::types::data_source::ProductType;
use serde::Serialize;

/// Body of a single retrieval call, serialized as JSON.
///
/// Calendar fields are lists of strings, as the retrieval service expects them.
/// `day` is left out for monthly products, which have no daily axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrieveParameters {
    pub product_type: ProductType,
    pub format: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    pub variable: Vec<String>,
    pub year: Vec<String>,
    pub month: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<Vec<String>>,
    pub time: Vec<String>,
}

pub(crate) const NETCDF: &str = "netcdf";
