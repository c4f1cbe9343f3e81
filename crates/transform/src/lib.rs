pub mod campaign;
pub mod config;
pub mod indicators;
pub mod package;
pub mod reconcile;

pub use campaign::{Activity, Campaign, ThreatActor};
pub use config::TransformConfig;
pub use indicators::Indicator;
pub use package::{TransformOutput, Transformer};
pub use reconcile::{Reconciled, Skipped};
