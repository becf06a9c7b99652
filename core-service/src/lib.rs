//! Streetlight Core - Lighting Decision Engine
//!
//! Rule labeling, random forest training/inference, explanations and
//! energy-savings estimates. The HTTP boundary lives in `streetlight-server`.

pub mod constants;
pub mod logic;

pub use logic::decision::{decide, Decision};
pub use logic::error::{EngineError, EngineResult};
pub use logic::model::{ModelHandle, TrainedModel};
pub use logic::observation::Observation;
