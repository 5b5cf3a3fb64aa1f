use tracing::debug;

use super::Database;
use crate::error::SqlHandleError;
use crate::params::{Binding, Placeholder};
use crate::types::{ParamType, RowValues};

impl Database {
    /// Bind a copy of `value` to a placeholder of the current statement.
    ///
    /// `placeholder` is a 1-based position (`usize`) or a name, with or without its `:`
    /// prefix. Binding the same placeholder again replaces the earlier value.
    ///
    /// # Errors
    /// Returns `SqlHandleError::NoStatement` if nothing is prepared, or
    /// `SqlHandleError::ParameterError` if the placeholder does not exist or the value cannot
    /// be coerced to `param_type`.
    pub fn bind_value<P, V>(
        &mut self,
        placeholder: P,
        value: V,
        param_type: ParamType,
    ) -> Result<(), SqlHandleError>
    where
        P: Into<Placeholder>,
        V: Into<RowValues>,
    {
        let placeholder = placeholder.into();
        let stmt = self.current_mut()?;
        let value = value.into().coerce(param_type)?;
        debug!(%placeholder, ?param_type, "bind value");
        stmt.bind(&placeholder, Binding::Value(value))
    }

    /// Bind an accessor that is read immediately before each execute.
    ///
    /// The accessor stands in for a variable bound by reference: whatever it returns at
    /// execute time is coerced to `param_type` and sent to the driver.
    ///
    /// ```rust
    /// use std::cell::Cell;
    /// use std::rc::Rc;
    /// use sql_handle::prelude::*;
    ///
    /// # fn main() -> Result<(), SqlHandleError> {
    /// let mut db = Database::connect(ConnectOptions::in_memory())?;
    /// let n = Rc::new(Cell::new(1_i64));
    /// db.prepare("SELECT :n AS n")?;
    /// let source = Rc::clone(&n);
    /// db.bind_param("n", move || source.get(), ParamType::Int)?;
    /// n.set(42);
    /// db.execute(None)?;
    /// let row = db.fetch()?.expect("one row");
    /// assert_eq!(row.get("n"), Some(&RowValues::Int(42)));
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    /// Returns `SqlHandleError::NoStatement` if nothing is prepared, or
    /// `SqlHandleError::ParameterError` if the placeholder does not exist.
    pub fn bind_param<P, F, V>(
        &mut self,
        placeholder: P,
        accessor: F,
        param_type: ParamType,
    ) -> Result<(), SqlHandleError>
    where
        P: Into<Placeholder>,
        F: Fn() -> V + 'static,
        V: Into<RowValues>,
    {
        let placeholder = placeholder.into();
        let stmt = self.current_mut()?;
        debug!(%placeholder, ?param_type, "bind deferred parameter");
        stmt.bind(
            &placeholder,
            Binding::Deferred(Box::new(move || accessor().into()), param_type),
        )
    }
}
