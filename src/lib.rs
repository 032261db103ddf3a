//! A small Rust client for the U.S. Bureau of Economic Analysis (BEA) data API.
//!
//! Every dataset gets its own method (`nipa`, `regional`, `mne_di`, ...). All of them go
//! through one pipeline: fold the dataset's required arguments into the caller's extra
//! parameters, add `datasetname`, merge with the fixed baseline (`UserID`, `method`,
//! `ResultFormat`) and issue a single GET. The response body is returned as-is.
//!
//! ## Quick start
//! - Configure the API key via the `BEA_API_KEY` environment variable or a `.bearc` file
//!   (supported in the current directory and in your home directory).
//! - Call a dataset method, passing any optional parameters as [`Params`].
//!
//! ```no_run
//! use beaapi::{Client, Params};
//!
//! fn main() -> beaapi::Result<()> {
//!     let client = Client::from_env()?;
//!     let json = client.nipa(2022, "Q", "T10101", Params::new().with("ShowMillions", "N"))?;
//!     println!("{json}");
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]

mod client;
mod config;
mod datasets;
mod error;
mod facades;
mod params;
mod transport;
mod util;

pub use client::{Client, ClientConfig};
pub use config::{Credential, DEFAULT_TIMEOUT, DEFAULT_URL};
pub use datasets::{Dataset, DescriptorTable};
pub use error::{Error, Result};
pub use facades::{SHAPES, Shape};
pub use params::{Baseline, GET_DATA, JSON_FORMAT, Params};
pub use transport::{HttpTransport, RawResponse, RetryPolicy, Transport};
