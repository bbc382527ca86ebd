use thiserror::Error;

/// A named signal declared for the host's logging and inspection subsystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantityDecl {
    pub name: String,
    pub unit: String,
}

/// Error returned when a quantity name is declared twice.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("quantity `{name}` is already declared")]
pub struct QuantityError {
    pub name: String,
}

/// The dictionary of declared quantities.
///
/// Models add entries during the declaration passes. Names are unique.
#[derive(Debug, Clone, Default)]
pub struct QuantityDict {
    entries: Vec<QuantityDecl>,
}

impl QuantityDict {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a quantity.
    ///
    /// # Errors
    ///
    /// Returns a [`QuantityError`] if `name` is already declared.
    pub fn declare(
        &mut self,
        name: impl Into<String>,
        unit: impl Into<String>,
    ) -> Result<(), QuantityError> {
        let name = name.into();
        if self.get(&name).is_some() {
            return Err(QuantityError { name });
        }

        self.entries.push(QuantityDecl {
            name,
            unit: unit.into(),
        });
        Ok(())
    }

    /// Returns the declaration named `name`, if any.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&QuantityDecl> {
        self.entries.iter().find(|decl| decl.name == name)
    }

    /// Iterates over declarations in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &QuantityDecl> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
