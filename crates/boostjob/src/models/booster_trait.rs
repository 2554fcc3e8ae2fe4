use crate::dataset::Dataset;
use crate::error::Result;

/// A boosting engine driven one round at a time by the trainer.
///
/// Implementations own the engine's model state. `update` is called with
/// consecutive round indices starting at 0 and always with the same training
/// dataset.
pub trait Booster {
    /// Grow the ensemble by one boosting round.
    fn update(&mut self, dtrain: &Dataset, round: u32) -> Result<()>;

    /// Predict with the ensemble trained so far. Binary objectives yield
    /// probabilities.
    fn predict(&self, data: &Dataset) -> Result<Vec<f32>>;

    /// Serialize the trained model in the engine's native format.
    fn save_buffer(&self) -> Result<Vec<u8>>;

    /// Human readable engine name.
    fn name(&self) -> &str {
        "booster"
    }
}
