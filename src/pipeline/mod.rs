//! Filter & decision pipeline.

pub mod decision;
pub mod error;
pub mod gates;
pub mod oracle;
pub mod request;

pub use decision::DecisionPipeline;
pub use error::{OracleError, PipelineError};
pub use gates::{FilterDecision, Firewall};
pub use oracle::{OracleClient, OracleConsultant, OraclePool, OracleReply, RetryPolicy, Rotation};
pub use request::{DecisionRequest, RequestContext};
