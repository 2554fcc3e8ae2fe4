//! Training-loop callbacks and the tensor-recording debug hook.
pub mod callback;
pub mod debug_hook;
pub mod save_config;

pub use callback::{EvalEntry, RoundEvaluation, TrainingCallback};
pub use debug_hook::{Collection, DebugHook, TensorEvent};
pub use save_config::SaveConfig;
