//! One method per dataset.
//!
//! Each facade folds its required arguments into the caller's extra parameters under the
//! names the service expects, then calls [`Client::get_data`]. The argument names live in
//! [`SHAPES`] rather than in the methods themselves.

use std::fmt::Display;

use crate::client::Client;
use crate::datasets::Dataset;
use crate::error::Result;
use crate::params::Params;
use crate::transport::Transport;

/// A facade's dataset and the canonical names of its positional arguments, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    pub method: &'static str,
    pub dataset: Dataset,
    pub args: &'static [&'static str],
}

/// [`Shape`] with its arity in the type, so a facade cannot pass the wrong number of values.
#[derive(Debug, Clone, Copy)]
struct Facade<const N: usize> {
    method: &'static str,
    dataset: Dataset,
    args: &'static [&'static str; N],
}

impl<const N: usize> Facade<N> {
    const fn shape(self) -> Shape {
        Shape {
            method: self.method,
            dataset: self.dataset,
            args: self.args,
        }
    }

    /// Puts `values` over `extra` under this facade's names; named arguments win.
    fn fold(&self, values: [&dyn Display; N], mut extra: Params) -> Params {
        for (name, value) in self.args.iter().zip(values) {
            extra.set(*name, value);
        }
        extra
    }
}

const NIPA: Facade<3> = Facade {
    method: "nipa",
    dataset: Dataset::Nipa,
    args: &["Year", "Frequency", "TableName"],
};
const NI_UNDERLYING_DETAIL: Facade<2> = Facade {
    method: "ni_underlying_detail",
    dataset: Dataset::NiUnderlyingDetail,
    args: &["Year", "Frequency"],
};
const FIXED_ASSETS: Facade<2> = Facade {
    method: "fixed_assets",
    dataset: Dataset::FixedAssets,
    args: &["Year", "TableName"],
};
const MNE_DI: Facade<3> = Facade {
    method: "mne_di",
    dataset: Dataset::Mne,
    args: &["DirectionOfInvestment", "Classification", "Year"],
};
const MNE_AMNE: Facade<5> = Facade {
    method: "mne_amne",
    dataset: Dataset::Mne,
    args: &[
        "DirectionOfInvestment",
        "Classification",
        "Year",
        "OwnershipLevel",
        "NonBankAffiliatesOnly",
    ],
};
const GDP_BY_INDUSTRY: Facade<4> = Facade {
    method: "gdp_by_industry",
    dataset: Dataset::GdpByIndustry,
    args: &["TableID", "Frequency", "Year", "Industry"],
};
const ITA: Facade<0> = Facade {
    method: "ita",
    dataset: Dataset::Ita,
    args: &[],
};
const IIP: Facade<0> = Facade {
    method: "iip",
    dataset: Dataset::Iip,
    args: &[],
};
const INPUT_OUTPUT: Facade<2> = Facade {
    method: "input_output",
    dataset: Dataset::InputOutput,
    args: &["TableID", "Year"],
};
const UNDERLYING_GDP_BY_INDUSTRY: Facade<4> = Facade {
    method: "underlying_gdp_by_industry",
    dataset: Dataset::UnderlyingGdpByIndustry,
    args: &["TableID", "Frequency", "Year", "Industry"],
};
const INTL_SERV_TRADE: Facade<0> = Facade {
    method: "intl_serv_trade",
    dataset: Dataset::IntlServTrade,
    args: &[],
};
const REGIONAL: Facade<3> = Facade {
    method: "regional",
    dataset: Dataset::Regional,
    args: &["TableName", "LineCode", "GeoFips"],
};
const INTL_SERV_STA: Facade<0> = Facade {
    method: "intl_serv_sta",
    dataset: Dataset::IntlServSta,
    args: &[],
};

/// Every facade on [`Client`], in declaration order.
pub const SHAPES: &[Shape] = &[
    NIPA.shape(),
    NI_UNDERLYING_DETAIL.shape(),
    FIXED_ASSETS.shape(),
    MNE_DI.shape(),
    MNE_AMNE.shape(),
    GDP_BY_INDUSTRY.shape(),
    ITA.shape(),
    IIP.shape(),
    INPUT_OUTPUT.shape(),
    UNDERLYING_GDP_BY_INDUSTRY.shape(),
    INTL_SERV_TRADE.shape(),
    REGIONAL.shape(),
    INTL_SERV_STA.shape(),
];

impl<T: Transport> Client<T> {
    fn call<const N: usize>(
        &self,
        facade: &Facade<N>,
        values: [&dyn Display; N],
        extra: Params,
    ) -> Result<String> {
        self.get_data(facade.dataset, facade.fold(values, extra))
    }

    /// National Income and Product Accounts.
    ///
    /// ```no_run
    /// # use beaapi::{Client, Params};
    /// let client = Client::from_env()?;
    /// let json = client.nipa(2022, "A", "T10101", Params::new())?;
    /// # Ok::<(), beaapi::Error>(())
    /// ```
    pub fn nipa(
        &self,
        year: impl Display,
        frequency: impl Display,
        table_name: impl Display,
        extra: Params,
    ) -> Result<String> {
        self.call(&NIPA, [&year, &frequency, &table_name], extra)
    }

    pub fn ni_underlying_detail(
        &self,
        year: impl Display,
        frequency: impl Display,
        extra: Params,
    ) -> Result<String> {
        self.call(&NI_UNDERLYING_DETAIL, [&year, &frequency], extra)
    }

    pub fn fixed_assets(
        &self,
        year: impl Display,
        table_name: impl Display,
        extra: Params,
    ) -> Result<String> {
        self.call(&FIXED_ASSETS, [&year, &table_name], extra)
    }

    /// Direct investment (`MNE` with the DI argument set).
    pub fn mne_di(
        &self,
        direction_of_investment: impl Display,
        classification: impl Display,
        year: impl Display,
        extra: Params,
    ) -> Result<String> {
        self.call(
            &MNE_DI,
            [&direction_of_investment, &classification, &year],
            extra,
        )
    }

    /// Activities of multinational enterprises; same dataset as [`Client::mne_di`].
    pub fn mne_amne(
        &self,
        direction_of_investment: impl Display,
        classification: impl Display,
        year: impl Display,
        ownership_level: impl Display,
        non_bank_affiliates_only: impl Display,
        extra: Params,
    ) -> Result<String> {
        self.call(
            &MNE_AMNE,
            [
                &direction_of_investment,
                &classification,
                &year,
                &ownership_level,
                &non_bank_affiliates_only,
            ],
            extra,
        )
    }

    pub fn gdp_by_industry(
        &self,
        table_id: impl Display,
        frequency: impl Display,
        year: impl Display,
        industry: impl Display,
        extra: Params,
    ) -> Result<String> {
        self.call(
            &GDP_BY_INDUSTRY,
            [&table_id, &frequency, &year, &industry],
            extra,
        )
    }

    /// International transactions.
    pub fn ita(&self, extra: Params) -> Result<String> {
        self.call(&ITA, [], extra)
    }

    /// International investment position.
    pub fn iip(&self, extra: Params) -> Result<String> {
        self.call(&IIP, [], extra)
    }

    pub fn input_output(
        &self,
        table_id: impl Display,
        year: impl Display,
        extra: Params,
    ) -> Result<String> {
        self.call(&INPUT_OUTPUT, [&table_id, &year], extra)
    }

    pub fn underlying_gdp_by_industry(
        &self,
        table_id: impl Display,
        frequency: impl Display,
        year: impl Display,
        industry: impl Display,
        extra: Params,
    ) -> Result<String> {
        self.call(
            &UNDERLYING_GDP_BY_INDUSTRY,
            [&table_id, &frequency, &year, &industry],
            extra,
        )
    }

    pub fn intl_serv_trade(&self, extra: Params) -> Result<String> {
        self.call(&INTL_SERV_TRADE, [], extra)
    }

    pub fn regional(
        &self,
        table_name: impl Display,
        line_code: impl Display,
        geo_fips: impl Display,
        extra: Params,
    ) -> Result<String> {
        self.call(&REGIONAL, [&table_name, &line_code, &geo_fips], extra)
    }

    /// International services supplied through affiliates.
    pub fn intl_serv_sta(&self, extra: Params) -> Result<String> {
        self.call(&INTL_SERV_STA, [], extra)
    }
}
