//! DNS and certificate artifacts.
//!
//! # Data Flow
//! ```text
//! RoutingRule[]
//!     → record.rs (one alias record per rule: host → load balancer)
//!     → certificate.rs (apex + wildcard names covering every host)
//! ```
//!
//! Hosted-zone lookup and certificate issuance belong to the
//! provisioning collaborator; these types only describe what it applies.

pub mod certificate;
pub mod record;

pub use certificate::CertificateSpec;
pub use record::{dns_records, DnsRecordSpec};
