pub mod adapters;
pub mod client;
pub mod error;
pub mod retry;
pub mod signer;

pub use adapters::{
    AdapterRegistry, AirservAdapter, CatalogAdapter, GenericAdapter, KazpayAdapter,
    VendlinkAdapter,
};
pub use client::{CatalogClient, CatalogFetch};
pub use error::ProviderError;
pub use retry::retry_fixed;
pub use signer::{signed_headers, SIGNATURE_HEADER, TIMESTAMP_HEADER};
