pub mod batch;
pub mod delivery;
pub mod filter;
pub mod forwarder;
pub mod http;
pub mod lambda_structure;
pub mod result;
pub mod validations;
