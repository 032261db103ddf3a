use anyhow::Context;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::error::{Error, Result};
use crate::params::Params;

/// The datasets served by the BEA data API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    Nipa,
    NiUnderlyingDetail,
    FixedAssets,
    Mne,
    GdpByIndustry,
    Ita,
    Iip,
    InputOutput,
    UnderlyingGdpByIndustry,
    IntlServTrade,
    Regional,
    IntlServSta,
}

impl Dataset {
    pub const ALL: [Dataset; 12] = [
        Dataset::Nipa,
        Dataset::NiUnderlyingDetail,
        Dataset::FixedAssets,
        Dataset::Mne,
        Dataset::GdpByIndustry,
        Dataset::Ita,
        Dataset::Iip,
        Dataset::InputOutput,
        Dataset::UnderlyingGdpByIndustry,
        Dataset::IntlServTrade,
        Dataset::Regional,
        Dataset::IntlServSta,
    ];

    /// The `datasetname` value the service expects.
    pub fn name(self) -> &'static str {
        match self {
            Dataset::Nipa => "NIPA",
            Dataset::NiUnderlyingDetail => "NIUnderlyingDetail",
            Dataset::FixedAssets => "FixedAssets",
            Dataset::Mne => "MNE",
            Dataset::GdpByIndustry => "GDPbyIndustry",
            Dataset::Ita => "ITA",
            Dataset::Iip => "IIP",
            Dataset::InputOutput => "InputOutput",
            Dataset::UnderlyingGdpByIndustry => "UnderlyingGDPbyIndustry",
            Dataset::IntlServTrade => "IntlServTrade",
            Dataset::Regional => "Regional",
            Dataset::IntlServSta => "IntlServSTA",
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dataset {
    type Err = Error;

    /// Exact name first, then a case-insensitive match (the service itself ignores case).
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        Dataset::ALL
            .iter()
            .find(|d| d.name() == s)
            .or_else(|| Dataset::ALL.iter().find(|d| d.name().eq_ignore_ascii_case(s)))
            .copied()
            .ok_or_else(|| Error::UnknownDataset(s.to_string()))
    }
}

const BUILTIN: &[(Dataset, &[&str])] = &[
    (Dataset::Nipa, &["Year", "Frequency", "TableName"]),
    (Dataset::NiUnderlyingDetail, &["Year", "Frequency"]),
    (Dataset::FixedAssets, &["Year", "TableName"]),
    (Dataset::Mne, &["DirectionOfInvestment", "Classification", "Year"]),
    (Dataset::GdpByIndustry, &["TableID", "Frequency", "Year", "Industry"]),
    (Dataset::Ita, &[]),
    (Dataset::Iip, &[]),
    (Dataset::InputOutput, &["TableID", "Year"]),
    (Dataset::UnderlyingGdpByIndustry, &["TableID", "Frequency", "Year", "Industry"]),
    (Dataset::IntlServTrade, &[]),
    (Dataset::Regional, &["TableName", "LineCode", "GeoFips"]),
    (Dataset::IntlServSta, &[]),
];

/// Required `GetData` parameters per dataset.
///
/// The table is read-only once built. Datasets absent from a loaded table have no
/// requirements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorTable {
    required: HashMap<Dataset, Vec<String>>,
}

impl DescriptorTable {
    /// The table shipped with the crate, built on first use.
    pub fn builtin() -> &'static DescriptorTable {
        static TABLE: OnceLock<DescriptorTable> = OnceLock::new();
        TABLE.get_or_init(|| DescriptorTable {
            required: BUILTIN
                .iter()
                .map(|(d, names)| (*d, names.iter().map(|n| n.to_string()).collect()))
                .collect(),
        })
    }

    /// Parses a descriptor document of the form `{"NIPA": ["Year", "Frequency"], ...}`.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let raw: HashMap<String, Vec<String>> =
            serde_json::from_str(text).context("invalid dataset descriptor JSON")?;
        let mut required = HashMap::with_capacity(raw.len());
        for (name, names) in raw {
            required.insert(name.parse::<Dataset>()?, names);
        }
        Ok(Self { required })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read dataset descriptors {}", path.display()))?;
        Self::from_json_str(&text)
    }

    pub fn required(&self, dataset: Dataset) -> &[String] {
        self.required.get(&dataset).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Required names of `dataset` absent from `params`, in descriptor order.
    pub fn missing(&self, dataset: Dataset, params: &Params) -> Vec<String> {
        self.required(dataset)
            .iter()
            .filter(|name| !params.contains_key(name))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_parse_back() {
        for d in Dataset::ALL {
            assert_eq!(d.name().parse::<Dataset>().unwrap(), d);
        }
        assert_eq!("nipa".parse::<Dataset>().unwrap(), Dataset::Nipa);
        assert_eq!(
            "underlyinggdpbyindustry".parse::<Dataset>().unwrap(),
            Dataset::UnderlyingGdpByIndustry
        );
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = "GDP".parse::<Dataset>().unwrap_err();
        assert!(matches!(err, Error::UnknownDataset(ref s) if s == "GDP"));
    }

    #[test]
    fn builtin_covers_every_dataset() {
        let table = DescriptorTable::builtin();
        assert_eq!(table.required.len(), Dataset::ALL.len());
        assert_eq!(table.required(Dataset::Nipa), ["Year", "Frequency", "TableName"]);
        assert!(table.required(Dataset::Ita).is_empty());
    }

    #[test]
    fn missing_reports_in_descriptor_order() {
        let params = Params::new().with("Frequency", "A");
        assert_eq!(
            DescriptorTable::builtin().missing(Dataset::Nipa, &params),
            ["Year", "TableName"]
        );
    }

    #[test]
    fn loads_json_descriptor() {
        let json = r#"{"Regional": ["TableName"], "iip": []}"#;
        let table = DescriptorTable::from_json_str(json).unwrap();
        assert_eq!(table.required(Dataset::Regional), ["TableName"]);
        assert!(table.required(Dataset::Nipa).is_empty());
    }

    #[test]
    fn json_with_unknown_dataset_fails() {
        let err = DescriptorTable::from_json_str(r#"{"Nope": []}"#).unwrap_err();
        assert!(matches!(err, Error::UnknownDataset(_)));
        let err = DescriptorTable::from_json_str("[1, 2]").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
