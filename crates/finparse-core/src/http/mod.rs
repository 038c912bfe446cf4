//! HTTP access to the prediction API.

mod endpoint;

pub use endpoint::{error_from_response, Endpoint, ProductSpec, RequestOptions};
