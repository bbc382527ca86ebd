use std::collections::{BTreeMap, btree_map::Entry};

use thiserror::Error;

use crate::{
    ConstructContext, ConstructError, KindError, KindInfo, KindSpec, ModelClass, ModelHandle,
    ModelKind, ParameterSource, ParamsChange, QuantityDict, QuantityError, VersionId, WheelNames,
};

/// The kinds registered for one model class.
///
/// The host creates one registry per class at startup, passes it to each
/// kind's registration function, and later uses it to build the kind the
/// vehicle parameters select.
///
/// # Examples
///
/// ```
/// use strut_core::{
///     CalcError, ConstructContext, ConstructError, ExternalModel, ModelClass,
///     ModelKind, ModelRegistry, Parameters, StandardWheelNames, VersionId,
/// };
/// use uom::si::f64::Time;
///
/// struct Horn;
///
/// impl ModelClass for Horn {
///     const NAME: &'static str = "Horn";
///     type Interface = bool;
/// }
///
/// struct Beep;
///
/// impl ExternalModel<Horn> for Beep {
///     fn calc(&self, pressed: &mut bool, _dt: Time) -> Result<(), CalcError> {
///         *pressed = true;
///         Ok(())
///     }
/// }
///
/// struct BeepKind;
///
/// impl ModelKind<Horn> for BeepKind {
///     fn version(&self) -> VersionId {
///         VersionId::V1
///     }
///
///     fn construct(
///         &self,
///         ctx: &ConstructContext<'_, Horn>,
///     ) -> Result<Box<dyn ExternalModel<Horn>>, ConstructError> {
///         ctx.kind_info("Beep", self.version())?;
///         Ok(Box::new(Beep))
///     }
/// }
///
/// let mut registry = ModelRegistry::<Horn>::new();
/// registry.register("Beep", BeepKind).unwrap();
///
/// let params = Parameters::new().with("Horn.Kind", "Beep");
/// let handle = registry
///     .instantiate(&params, &StandardWheelNames, "Horn.Kind")
///     .unwrap();
/// assert_eq!(handle.kind(), "Beep");
/// ```
pub struct ModelRegistry<C: ModelClass> {
    kinds: BTreeMap<String, Box<dyn ModelKind<C>>>,
}

/// Errors that may occur when registering a model kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum RegistryError {
    #[error("kind `{kind}` is already registered for model class `{class}`")]
    DuplicateKind { class: &'static str, kind: String },
}

/// Maps a registration result to the host's integer status convention.
///
/// Returns `0` on success and `-1` on failure.
#[must_use]
pub fn status(result: &Result<(), RegistryError>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(_) => -1,
    }
}

impl<C: ModelClass> Default for ModelRegistry<C> {
    fn default() -> Self {
        Self {
            kinds: BTreeMap::new(),
        }
    }
}

impl<C: ModelClass> ModelRegistry<C> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `kind` under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateKind`] if `name` is already taken.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        kind: impl ModelKind<C> + 'static,
    ) -> Result<(), RegistryError> {
        match self.kinds.entry(name.into()) {
            Entry::Occupied(slot) => Err(RegistryError::DuplicateKind {
                class: C::NAME,
                kind: slot.key().clone(),
            }),
            Entry::Vacant(slot) => {
                tracing::debug!(
                    class = C::NAME,
                    kind = %slot.key(),
                    version = %kind.version(),
                    "registered model kind"
                );
                slot.insert(Box::new(kind));
                Ok(())
            }
        }
    }

    /// Returns the kind registered under `name`, if any.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn ModelKind<C>> {
        self.kinds.get(name).map(|kind| &**kind)
    }

    /// Iterates over registered kind names in sorted order.
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.kinds.keys().map(String::as_str)
    }

    /// Reads the kind selection under `kind_key` and checks it can be served.
    ///
    /// A selection without a version is treated as a request for `supported`.
    ///
    /// # Errors
    ///
    /// Returns a [`KindError`] if the selection is missing or malformed, names
    /// an unregistered kind, or requests a version newer than `supported`.
    pub fn kind_info(
        &self,
        params: &dyn ParameterSource,
        kind_key: &str,
        supported: VersionId,
    ) -> Result<KindInfo, KindError> {
        let result = self.check_selection(params, kind_key, supported);
        if let Err(err) = &result {
            tracing::warn!(class = C::NAME, kind_key, %err, "rejected kind selection");
        }
        result
    }

    fn check_selection(
        &self,
        params: &dyn ParameterSource,
        kind_key: &str,
        supported: VersionId,
    ) -> Result<KindInfo, KindError> {
        let spec: KindSpec = params.get_str(kind_key)?.parse()?;

        if !self.kinds.contains_key(&spec.kind) {
            return Err(KindError::Unknown {
                class: C::NAME,
                kind: spec.kind,
            });
        }

        let version = spec.version.unwrap_or(supported);
        if !supported.supports(version) {
            return Err(KindError::IncompatibleVersion {
                class: C::NAME,
                kind: spec.kind,
                requested: version,
                supported,
            });
        }

        Ok(KindInfo {
            kind: spec.kind,
            version,
        })
    }

    /// Builds the kind selected under `kind_key`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConstructError`] if the selection is invalid or the kind
    /// fails to construct. No handle is created on failure.
    pub fn instantiate(
        &self,
        params: &dyn ParameterSource,
        wheels: &dyn WheelNames,
        kind_key: &str,
    ) -> Result<ModelHandle<C>, ConstructError> {
        let spec: KindSpec = params
            .get_str(kind_key)
            .map_err(KindError::from)?
            .parse()?;

        let kind = self.get(&spec.kind).ok_or_else(|| KindError::Unknown {
            class: C::NAME,
            kind: spec.kind.clone(),
        })?;

        let ctx = ConstructContext {
            params,
            wheels,
            kind_key,
            registry: self,
        };
        let instance = kind.construct(&ctx)?;

        tracing::debug!(class = C::NAME, kind = %spec.kind, "constructed model instance");
        Ok(ModelHandle::new(spec.kind, instance))
    }

    /// Runs a quantity declaration pass for the kind named `kind`.
    ///
    /// With a live handle the instance declares its own quantities; without
    /// one the kind declares the quantities that exist independently of any
    /// instance.
    ///
    /// # Errors
    ///
    /// Returns [`DeclareError::Kind`] if `kind` is not registered, or
    /// [`DeclareError::Quantity`] if a declared name is taken.
    pub fn declare_quantities(
        &self,
        kind: &str,
        handle: Option<&ModelHandle<C>>,
        dict: &mut QuantityDict,
    ) -> Result<(), DeclareError> {
        let model_kind = self.get(kind).ok_or_else(|| KindError::Unknown {
            class: C::NAME,
            kind: kind.to_string(),
        })?;

        match handle {
            Some(handle) => handle.declare_quantities(dict)?,
            None => model_kind.declare_static_quantities(dict)?,
        }
        Ok(())
    }

    /// Asks the kind named `kind` whether its external parameters changed.
    ///
    /// Returns `None` if `kind` is not registered.
    #[must_use]
    pub fn params_changed(&self, kind: &str, params: &dyn ParameterSource) -> Option<ParamsChange> {
        self.get(kind).map(|kind| kind.params_changed(params))
    }
}

/// Errors that may occur during a quantity declaration pass.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum DeclareError {
    #[error(transparent)]
    Kind(#[from] KindError),

    #[error(transparent)]
    Quantity(#[from] QuantityError),
}
