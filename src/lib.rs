//! Signed app-proxy relay: verify storefront HMAC signatures, then forward customer updates to
//! the commerce platform's admin API with a static or freshly exchanged access token.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod customer;
pub mod error;
pub mod flows;
pub mod http;
pub mod obs;
pub mod request;
pub mod response;

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		str::FromStr,
		sync::Arc,
		time::Duration,
	};

	pub use reqwest::{
		Client as ReqwestClient, Error as ReqwestError, Method, StatusCode, header::HeaderMap,
	};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::Value;
	pub use thiserror::Error as ThisError;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, tokio as _};
