use std::{
    borrow::Cow,
    fmt,
    ops::{Index, IndexMut},
};

use serde::{Deserialize, Serialize};

/// Number of wheels on a simulated vehicle.
pub const N_WHEELS: usize = 4;

/// A wheel position on a four-wheeled vehicle.
///
/// The discriminant is the wheel's index in per-wheel arrays, matching the
/// order the host uses: front-left, front-right, rear-left, rear-right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Wheel {
    FrontLeft = 0,
    FrontRight = 1,
    RearLeft = 2,
    RearRight = 3,
}

impl Wheel {
    /// All wheels, in index order.
    pub const ALL: [Wheel; N_WHEELS] = [
        Wheel::FrontLeft,
        Wheel::FrontRight,
        Wheel::RearLeft,
        Wheel::RearRight,
    ];

    /// Returns the wheel's position in per-wheel arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the wheel at `index`, or `None` if `index >= N_WHEELS`.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl fmt::Display for Wheel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(StandardWheelNames.suffix(*self).as_ref())
    }
}

/// One value per wheel, indexed by [`Wheel`].
///
/// The length is fixed by the type, so a `PerWheel` can never hold more or
/// fewer entries than the vehicle has wheels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PerWheel<T>(pub [T; N_WHEELS]);

impl<T> PerWheel<T> {
    /// Creates a per-wheel array by calling `f` for each wheel in index order.
    pub fn from_fn(mut f: impl FnMut(Wheel) -> T) -> Self {
        Self(Wheel::ALL.map(&mut f))
    }

    /// Builds a per-wheel array from fallible per-wheel results.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `f`, in wheel index order.
    pub fn try_from_fn<E>(mut f: impl FnMut(Wheel) -> Result<T, E>) -> Result<Self, E> {
        let [fl, fr, rl, rr] = Wheel::ALL;
        Ok(Self([f(fl)?, f(fr)?, f(rl)?, f(rr)?]))
    }

    /// Applies `f` to each value, keeping the wheel association.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PerWheel<U> {
        PerWheel(self.0.map(f))
    }

    /// Iterates mutably over `(wheel, value)` pairs in index order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Wheel, &mut T)> {
        Wheel::ALL.into_iter().zip(self.0.iter_mut())
    }
}

impl<T: Copy> PerWheel<T> {
    /// Returns the same value for every wheel.
    #[must_use]
    pub fn splat(value: T) -> Self {
        Self([value; N_WHEELS])
    }
}

impl<T> From<[T; N_WHEELS]> for PerWheel<T> {
    fn from(values: [T; N_WHEELS]) -> Self {
        Self(values)
    }
}

impl<T> Index<Wheel> for PerWheel<T> {
    type Output = T;

    fn index(&self, wheel: Wheel) -> &T {
        &self.0[wheel.index()]
    }
}

impl<T> IndexMut<Wheel> for PerWheel<T> {
    fn index_mut(&mut self, wheel: Wheel) -> &mut T {
        &mut self.0[wheel.index()]
    }
}

/// Resolves the name suffix the host uses for a wheel in parameter keys.
///
/// Parameter keys are built by appending the suffix to a base name, for
/// example `SFH.Damp_Push` + `FL`.
pub trait WheelNames {
    fn suffix(&self, wheel: Wheel) -> Cow<'_, str>;
}

/// The host's default wheel suffixes: `FL`, `FR`, `RL`, `RR`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StandardWheelNames;

impl WheelNames for StandardWheelNames {
    fn suffix(&self, wheel: Wheel) -> Cow<'_, str> {
        Cow::Borrowed(match wheel {
            Wheel::FrontLeft => "FL",
            Wheel::FrontRight => "FR",
            Wheel::RearLeft => "RL",
            Wheel::RearRight => "RR",
        })
    }
}

impl<F> WheelNames for F
where
    F: Fn(Wheel) -> String,
{
    fn suffix(&self, wheel: Wheel) -> Cow<'_, str> {
        Cow::Owned(self(wheel))
    }
}
