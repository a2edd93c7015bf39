use std::collections::HashMap;

use log::debug;

use super::error::NavigationError;
use super::view::{Controller, ViewDefinition, ViewId, ViewKey};

/// Mapping from view id to its definition, populated once at startup.
///
/// The registry is mutable only while it is being built. Handing it to
/// [`Navigator::start`](super::Navigator::start) freezes it: from then on
/// definitions can be resolved but never added or replaced.
pub struct ViewRegistry<V, C: ?Sized = dyn Controller> {
    views: HashMap<V, ViewDefinition<V, C>>,
}

impl<V: ViewId, C: ?Sized + Controller> ViewRegistry<V, C> {
    pub fn new() -> Self {
        Self {
            views: HashMap::new(),
        }
    }

    /// Register a view and the controller that drives it.
    pub fn register(
        &mut self,
        id: V,
        resource: impl Into<String>,
        controller: Box<C>,
    ) -> Result<(), NavigationError> {
        if self.views.contains_key(&id) {
            return Err(NavigationError::duplicate(id));
        }

        let resource = resource.into();
        debug!("Registered view {:?} -> {}", id, resource);
        self.views
            .insert(id, ViewDefinition::new(id, resource, controller));
        Ok(())
    }

    /// Register a view through a typed key so the controller can later be
    /// borrowed back as `T` with [`Navigator::controller`].
    ///
    /// `into_boxed` performs the unsizing into the registry's controller
    /// object, e.g. `|c| c as Box<dyn Controller>`.
    ///
    /// [`Navigator::controller`]: super::Navigator::controller
    pub fn register_typed<T>(
        &mut self,
        key: ViewKey<V, T>,
        resource: impl Into<String>,
        controller: T,
        into_boxed: impl FnOnce(Box<T>) -> Box<C>,
    ) -> Result<(), NavigationError>
    where
        T: Controller,
    {
        self.register(key.id(), resource, into_boxed(Box::new(controller)))
    }

    pub fn resolve(&self, id: V) -> Result<&ViewDefinition<V, C>, NavigationError> {
        self.views.get(&id).ok_or_else(|| NavigationError::unknown(id))
    }

    pub(crate) fn resolve_mut(
        &mut self,
        id: V,
    ) -> Result<&mut ViewDefinition<V, C>, NavigationError> {
        self.views.get_mut(&id).ok_or_else(|| NavigationError::unknown(id))
    }

    pub fn contains(&self, id: V) -> bool {
        self.views.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}

impl<V: ViewId, C: ?Sized + Controller> Default for ViewRegistry<V, C> {
    fn default() -> Self {
        Self::new()
    }
}
