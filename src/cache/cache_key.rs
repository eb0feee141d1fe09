//! Deterministic cache file names for download units.

use crate::request::download_unit::{DownloadUnit, TemporalSelector};
use crate::request::logical_request::Dataset;
use crate::types::calendar::Selection;
use chrono::{Datelike, Timelike};
use std::fmt;

const FILE_PREFIX: &str = "era5_";
const FILE_EXTENSION: &str = ".nc";

/// Identifies the file a [`DownloadUnit`] is stored in.
///
/// The key is `<download key>_<temporal>_<variables>_<domain>`, where the
/// download key is the product tag (with `-monthly-means` for monthly data),
/// variables are joined with `-` and domain edges with `,`. Calendar values
/// are zero-padded, so different selectors never render to the same text.
///
/// Only the variables may contain `_`: the download key, the temporal part
/// and the domain never do, so a file name splits back into its four parts.
/// Variable identifiers never contain `-` (see [`crate::RequestError::InvalidVariable`]).
///
/// Units with identical fields always produce identical keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn for_unit(unit: &DownloadUnit<'_>) -> Self {
        Self(format!(
            "{}_{}_{}",
            unit.dataset.download_key(),
            temporal_component(&unit.selector),
            dataset_suffix(unit.dataset)
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name inside the cache root, e.g. `era5_land_2020_t2m_global.nc`.
    pub fn file_name(&self) -> String {
        format!("{FILE_PREFIX}{}{FILE_EXTENSION}", self.0)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn variables_component(dataset: &Dataset) -> String {
    dataset.variables().join("-")
}

fn dataset_suffix(dataset: &Dataset) -> String {
    format!(
        "{}_{}",
        variables_component(dataset),
        dataset.domain().cache_component()
    )
}

fn selection_tag(tag: &str, selection: &Selection) -> String {
    match selection {
        Selection::All => String::new(),
        Selection::Only(values) => {
            let joined: String = values.iter().map(|v| format!("{:02}", v)).collect();
            format!("-{tag}{joined}")
        }
    }
}

fn temporal_component(selector: &TemporalSelector<'_>) -> String {
    match selector {
        TemporalSelector::Year {
            year,
            months,
            days,
            hours,
        } => format!(
            "{:04}{}{}{}",
            year,
            selection_tag("months", months),
            selection_tag("days", days),
            selection_tag("hours", hours)
        ),
        TemporalSelector::Month(month) => format!("{:04}{:02}", month.year(), month.month()),
        TemporalSelector::Hour(instant) => format!(
            "{:04}{:02}{:02}{:02}",
            instant.year(),
            instant.month(),
            instant.day(),
            instant.hour()
        ),
    }
}

/// Whether `text` is a temporal component [`temporal_component`] can produce.
fn is_temporal_component(text: &str) -> bool {
    let digits = text.bytes().take_while(u8::is_ascii_digit).count();
    let (date, mut tags) = text.split_at(digits);
    match date.len() {
        6 | 10 => tags.is_empty(),
        4 => {
            for tag in ["months", "days", "hours"] {
                if let Some(rest) = tags.strip_prefix('-').and_then(|t| t.strip_prefix(tag)) {
                    let values = rest.bytes().take_while(u8::is_ascii_digit).count();
                    if values == 0 || values % 2 != 0 {
                        return false;
                    }
                    tags = &rest[values..];
                }
            }
            tags.is_empty()
        }
        _ => false,
    }
}

/// Whether `file_name` was produced for `dataset`, for any temporal selector.
///
/// The name is split into download key, temporal part, variables and domain,
/// and every part must match exactly.
pub(crate) fn belongs_to(file_name: &str, dataset: &Dataset) -> bool {
    let Some(key) = file_name
        .strip_prefix(FILE_PREFIX)
        .and_then(|name| name.strip_suffix(FILE_EXTENSION))
    else {
        return false;
    };
    let Some((download_key, rest)) = key.split_once('_') else {
        return false;
    };
    let Some((temporal, rest)) = rest.split_once('_') else {
        return false;
    };
    let Some((variables, domain)) = rest.rsplit_once('_') else {
        return false;
    };
    download_key == dataset.download_key()
        && is_temporal_component(temporal)
        && variables == variables_component(dataset)
        && domain == dataset.domain().cache_component()
}
