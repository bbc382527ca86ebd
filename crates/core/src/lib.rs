//! Host-side traits and types for plugging external models into a vehicle
//! simulator.
//!
//! The simulator owns the step loop, the parameter database and the signal
//! dictionary. This crate describes the seams an external model plugs into:
//!
//! - [`Model`]: a deterministic callable from typed input to typed output
//! - [`Wheel`], [`PerWheel`], [`WheelNames`]: wheel positions and their names
//! - [`ParameterSource`], [`Parameters`]: keyed access to parsed parameters
//! - [`ModelClass`], [`ModelKind`], [`ExternalModel`]: a subsystem, its
//!   registered implementations, and their constructed instances
//! - [`ModelRegistry`]: the kinds registered for one class
//! - [`ModelHandle`]: the host's owning reference to an instance
//! - [`QuantityDict`]: named signals declared for logging and inspection

mod class;
mod handle;
mod kind;
mod model;
mod params;
mod quantity;
mod registry;
mod wheel;

pub use class::{
    CalcError, ConstructContext, ConstructError, ExternalModel, ModelClass, ModelKind,
    ParamsChange,
};
pub use handle::{HandleError, ModelHandle};
pub use kind::{KindError, KindInfo, KindSpec, VersionId};
pub use model::Model;
pub use params::{ParamError, ParamValue, ParameterSource, Parameters};
pub use quantity::{QuantityDecl, QuantityDict, QuantityError};
pub use registry::{DeclareError, ModelRegistry, RegistryError, status};
pub use wheel::{N_WHEELS, PerWheel, StandardWheelNames, Wheel, WheelNames};
