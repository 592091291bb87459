mod model;

pub use model::{MockGenerateResult, MockImageModel};
