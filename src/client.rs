use log::debug;
use std::borrow::Cow;
use std::time::Duration;

use crate::config::{Credential, load_config};
use crate::datasets::{Dataset, DescriptorTable};
use crate::error::{Error, Result};
use crate::params::{Baseline, DATASET_NAME, GET_DATA, METHOD, Params};
use crate::transport::{HttpTransport, RawResponse, RetryPolicy, Transport};

const GET_DATASET_LIST: &str = "GetDatasetList";
const GET_PARAMETER_LIST: &str = "GetParameterList";
const GET_PARAMETER_VALUES: &str = "GetParameterValues";
const GET_PARAMETER_VALUES_FILTERED: &str = "GetParameterValuesFiltered";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API endpoint, typically `https://apps.bea.gov/api/data`.
    pub url: String,
    /// API key, sent as `UserID`.
    pub key: Credential,
    /// Whether to verify TLS certificates.
    pub verify: bool,
    /// Bound on each HTTP request.
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl ClientConfig {
    /// Resolves configuration from (in order of precedence):
    /// - explicit `key`/`url`/`verify` arguments
    /// - environment variables `BEA_API_KEY` / `BEA_API_URL`
    /// - config file from `BEA_RC` or `.bearc` (current directory, then home)
    pub fn load(key: Option<String>, url: Option<String>, verify: Option<bool>) -> Result<Self> {
        load_config(key, url, verify)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

/// BEA API client.
///
/// Every request is built from the same immutable [`Baseline`] and sent to one endpoint.
/// The client holds no per-call state, so it can be shared between threads when its
/// transport can.
#[derive(Debug, Clone)]
pub struct Client<T = HttpTransport> {
    url: String,
    baseline: Baseline,
    descriptors: Cow<'static, DescriptorTable>,
    validate: bool,
    transport: T,
}

impl Client<HttpTransport> {
    /// Creates a client from environment variables and/or `.bearc`.
    ///
    /// This is equivalent to `Client::new(None, None, None)`.
    pub fn from_env() -> Result<Self> {
        Self::new(None, None, None)
    }

    /// See [`ClientConfig::load`] for how missing arguments are resolved.
    pub fn new(key: Option<String>, url: Option<String>, verify: Option<bool>) -> Result<Self> {
        Self::from_config(ClientConfig::load(key, url, verify)?)
    }

    pub fn from_config(cfg: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(cfg.timeout, cfg.verify, cfg.retry)?;
        Ok(Self::with_transport(cfg.url, &cfg.key, transport))
    }
}

impl<T: Transport> Client<T> {
    pub fn with_transport(url: impl Into<String>, key: &Credential, transport: T) -> Self {
        Self {
            url: url.into(),
            baseline: Baseline::new(key),
            descriptors: Cow::Borrowed(DescriptorTable::builtin()),
            validate: false,
            transport,
        }
    }

    /// Checks required `GetData` parameters before sending anything.
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    pub fn with_descriptors(mut self, descriptors: DescriptorTable) -> Self {
        self.descriptors = Cow::Owned(descriptors);
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn baseline(&self) -> &Baseline {
        &self.baseline
    }

    pub fn descriptors(&self) -> &DescriptorTable {
        &self.descriptors
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The exact parameters [`Client::dispatch`] would send for `dataset`.
    ///
    /// `datasetname` is always set from `dataset`, replacing any caller value.
    pub fn prepare(&self, dataset: Dataset, mut params: Params) -> Result<Params> {
        params.set(DATASET_NAME, dataset.name());
        let composed = self.baseline.compose(&params);

        if self.validate && composed.get(METHOD) == Some(GET_DATA) {
            let missing = self.descriptors.missing(dataset, &composed);
            if !missing.is_empty() {
                return Err(Error::Validation {
                    dataset: dataset.name().to_string(),
                    missing,
                });
            }
        }
        Ok(composed)
    }

    /// Sends one request for `dataset` and returns the raw response.
    pub fn dispatch(&self, dataset: Dataset, params: Params) -> Result<RawResponse> {
        let composed = self.prepare(dataset, params)?;
        self.send(&composed)
    }

    /// `GetData` for any dataset; returns the response body verbatim.
    pub fn get_data(&self, dataset: Dataset, params: Params) -> Result<String> {
        Ok(self.dispatch(dataset, params)?.body)
    }

    /// Lists the datasets the service currently offers.
    pub fn dataset_list(&self) -> Result<String> {
        let params = self
            .baseline
            .compose(&Params::new().with(METHOD, GET_DATASET_LIST));
        Ok(self.send(&params)?.body)
    }

    /// Lists the parameters `dataset` accepts.
    pub fn parameter_list(&self, dataset: Dataset) -> Result<String> {
        let params = Params::new().with(METHOD, GET_PARAMETER_LIST);
        Ok(self.dispatch(dataset, params)?.body)
    }

    /// Lists the accepted values of one parameter of `dataset`.
    pub fn parameter_values(&self, dataset: Dataset, parameter_name: &str) -> Result<String> {
        let params = Params::new()
            .with(METHOD, GET_PARAMETER_VALUES)
            .with("ParameterName", parameter_name);
        Ok(self.dispatch(dataset, params)?.body)
    }

    /// Values of `target_parameter` restricted by the other parameters in `filters`.
    pub fn parameter_values_filtered(
        &self,
        dataset: Dataset,
        target_parameter: &str,
        filters: Params,
    ) -> Result<String> {
        let mut params = filters;
        params.set(METHOD, GET_PARAMETER_VALUES_FILTERED);
        params.set("TargetParameter", target_parameter);
        Ok(self.dispatch(dataset, params)?.body)
    }

    fn send(&self, params: &Params) -> Result<RawResponse> {
        debug!(
            "GET {} method={} dataset={}",
            self.url,
            params.get(METHOD).unwrap_or(""),
            params.get(DATASET_NAME).unwrap_or("-")
        );
        self.transport.get(&self.url, params)
    }
}
