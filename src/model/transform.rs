//! Model-to-model transforms applied after the base factory.
//!
//! Transforms are an explicit ordered list of function objects rather
//! than nested wrapper factories; the cached factory runs them in order
//! on every build.

use super::{BundleModel, ModelError};

/// One model transform; may fail, aborting the build attempt.
pub type ModelTransform = Box<dyn Fn(BundleModel) -> Result<BundleModel, ModelError> + Send + Sync>;

/// Apply an ordered transform list to a freshly built model.
pub fn apply(
    transforms: &[ModelTransform],
    mut model: BundleModel,
) -> Result<BundleModel, ModelError> {
    for transform in transforms {
        model = transform(model)?;
    }
    Ok(model)
}
