use std::fmt;

use thiserror::Error;
use uom::si::f64::Time;

use crate::{CalcError, ExternalModel, ModelClass, QuantityDict, QuantityError};

/// The host's owning reference to a constructed model instance.
///
/// A handle is live from construction until [`ModelHandle::destroy`] is
/// called. Destroying releases the instance exactly once; later calls are
/// no-ops.
pub struct ModelHandle<C: ModelClass> {
    kind: String,
    instance: Option<Box<dyn ExternalModel<C>>>,
}

/// Errors that may occur when calling a model through its handle.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HandleError {
    #[error("model `{kind}` of class `{class}` has been destroyed")]
    Destroyed { class: &'static str, kind: String },

    #[error(transparent)]
    Calc(#[from] CalcError),
}

impl<C: ModelClass> ModelHandle<C> {
    /// Wraps a freshly constructed instance of the kind named `kind`.
    pub fn new(kind: impl Into<String>, instance: Box<dyn ExternalModel<C>>) -> Self {
        Self {
            kind: kind.into(),
            instance: Some(instance),
        }
    }

    /// Name of the kind this handle was built from.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Returns `true` until the handle is destroyed.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.instance.is_some()
    }

    /// Computes one simulation step.
    ///
    /// # Errors
    ///
    /// Returns [`HandleError::Destroyed`] if the handle was destroyed, or
    /// [`HandleError::Calc`] if the instance fails.
    pub fn calc(&self, interface: &mut C::Interface, dt: Time) -> Result<(), HandleError> {
        let instance = self.instance.as_ref().ok_or_else(|| HandleError::Destroyed {
            class: C::NAME,
            kind: self.kind.clone(),
        })?;
        instance.calc(interface, dt)?;
        Ok(())
    }

    /// Runs the per-instance quantity declaration pass.
    ///
    /// A destroyed handle declares nothing.
    ///
    /// # Errors
    ///
    /// Returns a [`QuantityError`] if a declared name is taken.
    pub fn declare_quantities(&self, dict: &mut QuantityDict) -> Result<(), QuantityError> {
        match &self.instance {
            Some(instance) => instance.declare_quantities(dict),
            None => Ok(()),
        }
    }

    /// Releases the instance.
    ///
    /// Returns `true` if an instance was released and `false` if the handle
    /// was already destroyed.
    pub fn destroy(&mut self) -> bool {
        let released = self.instance.take().is_some();
        if released {
            tracing::debug!(class = C::NAME, kind = %self.kind, "destroyed model instance");
        }
        released
    }
}

impl<C: ModelClass> fmt::Debug for ModelHandle<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelHandle")
            .field("class", &C::NAME)
            .field("kind", &self.kind)
            .field("live", &self.is_live())
            .finish()
    }
}
