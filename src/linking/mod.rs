pub mod engine;
pub mod model;
pub mod service;

pub use model::{LinkResult, LinkStatus, Linkage, LinkingReport};
pub use service::LinkingService;
