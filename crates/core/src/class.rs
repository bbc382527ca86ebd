use std::error::Error as StdError;

use thiserror::Error;
use uom::si::f64::Time;

use crate::{
    KindError, KindInfo, ModelRegistry, ParamError, ParameterSource, QuantityDict, QuantityError,
    VersionId, WheelNames,
};

/// A family of interchangeable models for one physical subsystem.
///
/// Each class fixes the name the host knows it by and the per-step interface
/// structure its models read inputs from and write outputs to. Implementations
/// of a class are registered as kinds in a [`ModelRegistry`].
pub trait ModelClass: 'static {
    /// Name of the class in the host, for example `"SuspEF_Damper"`.
    const NAME: &'static str;

    /// Per-step input/output structure owned by the host.
    type Interface;
}

/// A constructed model instance, called once per simulation step.
pub trait ExternalModel<C: ModelClass> {
    /// Reads inputs from `interface` and writes this step's outputs back into it.
    ///
    /// # Errors
    ///
    /// Returns a [`CalcError`] if the step cannot be computed.
    fn calc(&self, interface: &mut C::Interface, dt: Time) -> Result<(), CalcError>;

    /// Declares the quantities owned by this instance.
    ///
    /// # Errors
    ///
    /// Returns a [`QuantityError`] if a quantity name is already taken.
    fn declare_quantities(&self, _dict: &mut QuantityDict) -> Result<(), QuantityError> {
        Ok(())
    }
}

/// Whether a model's parameters changed since it was constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamsChange {
    Unchanged,
    Changed,
}

/// A registered implementation of a model class.
///
/// A kind constructs instances and answers the host's questions that do not
/// need a live instance.
pub trait ModelKind<C: ModelClass>: Send + Sync {
    /// The newest interface version this kind supports.
    fn version(&self) -> VersionId;

    /// Builds a new instance from the context's parameters.
    ///
    /// # Errors
    ///
    /// Returns a [`ConstructError`] if the selected kind or version is not
    /// supported, or if a required parameter cannot be read.
    fn construct(&self, ctx: &ConstructContext<'_, C>) -> Result<Box<dyn ExternalModel<C>>, ConstructError>;

    /// Declares quantities that exist without a running instance.
    ///
    /// # Errors
    ///
    /// Returns a [`QuantityError`] if a quantity name is already taken.
    fn declare_static_quantities(&self, _dict: &mut QuantityDict) -> Result<(), QuantityError> {
        Ok(())
    }

    /// Reports whether parameters read from outside the host changed.
    ///
    /// Kinds that only read host parameters never see changes.
    fn params_changed(&self, _params: &dyn ParameterSource) -> ParamsChange {
        ParamsChange::Unchanged
    }
}

/// Everything a kind may read while constructing an instance.
pub struct ConstructContext<'a, C: ModelClass> {
    pub params: &'a dyn ParameterSource,
    pub wheels: &'a dyn WheelNames,
    /// Parameter key holding the kind selection for this class.
    pub kind_key: &'a str,
    pub registry: &'a ModelRegistry<C>,
}

impl<C: ModelClass> ConstructContext<'_, C> {
    /// Confirms the parameters select `kind` at a version it supports.
    ///
    /// # Errors
    ///
    /// Returns a [`KindError`] if the selection cannot be read, names another
    /// kind, or requests a newer version than `supported`.
    pub fn kind_info(&self, kind: &str, supported: VersionId) -> Result<KindInfo, KindError> {
        let info = self
            .registry
            .kind_info(self.params, self.kind_key, supported)?;

        if info.kind != kind {
            return Err(KindError::Mismatch {
                requested: info.kind,
                provided: kind.to_string(),
            });
        }
        Ok(info)
    }
}

/// Errors that may occur when constructing a model instance.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConstructError {
    #[error(transparent)]
    Kind(#[from] KindError),

    #[error(transparent)]
    Param(#[from] ParamError),
}

/// A failure reported by [`ExternalModel::calc`].
#[derive(Debug, Error)]
#[error("model calculation failed")]
pub struct CalcError {
    #[source]
    source: Box<dyn StdError + Send + Sync>,
}

impl CalcError {
    pub fn new<E>(source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            source: Box::new(source),
        }
    }
}
