use std::any::type_name;
use std::collections::HashMap;

use log::{debug, info};

use super::error::NavigationError;
use super::registry::ViewRegistry;
use super::view::{Controller, Entry, Transition, ViewId, ViewKey, ViewSnapshot};

/// Owns the active view, the back-stack and the preserved-view cache.
///
/// The navigator is driven exclusively from the presentation context. Every
/// operation takes `&mut self`, so transitions are totally ordered by call
/// sequence and no locking is involved.
pub struct Navigator<V, C: ?Sized = dyn Controller> {
    registry: ViewRegistry<V, C>,
    current: V,
    back_stack: Vec<V>,
    preserved: HashMap<V, ViewSnapshot>,
}

impl<V: ViewId, C: ?Sized + Controller> Navigator<V, C> {
    /// Freeze `registry` and enter `initial` as the first current view.
    pub fn start(mut registry: ViewRegistry<V, C>, initial: V) -> Result<Self, NavigationError> {
        registry
            .resolve_mut(initial)?
            .controller_mut()
            .on_enter(None);
        info!(
            "Navigator started on {:?} with {} registered views",
            initial,
            registry.len()
        );

        Ok(Self {
            registry,
            current: initial,
            back_stack: Vec::new(),
            preserved: HashMap::new(),
        })
    }

    /// Switch to `target`, always building it fresh.
    ///
    /// The view being left is pushed onto the back-stack and its live state
    /// is discarded. Any snapshot preserved earlier for `target` is dropped,
    /// since the fresh instance supersedes it.
    pub fn navigate(&mut self, target: V) -> Result<Transition<V>, NavigationError> {
        self.forward(target, false)
    }

    /// Switch to `target`, keeping the live state of the view being left so
    /// that returning to it with [`back`](Self::back) resumes it.
    pub fn navigate_preserving(&mut self, target: V) -> Result<Transition<V>, NavigationError> {
        self.forward(target, true)
    }

    /// Return to the view that led to the current one.
    ///
    /// A preserved snapshot for that view is withdrawn from the cache and
    /// handed to its controller; without one the view is built fresh.
    pub fn back(&mut self) -> Result<Transition<V>, NavigationError> {
        let target = *self.back_stack.last().ok_or(NavigationError::EmptyStack)?;
        let from = self.current;

        // Leaving via back never preserves the view being left.
        let _ = self.leave_current()?;
        self.back_stack.pop();

        let snapshot = self.preserved.remove(&target);
        let entry = if snapshot.is_some() {
            Entry::Resumed
        } else {
            Entry::Fresh
        };

        self.current = target;
        self.registry
            .resolve_mut(target)?
            .controller_mut()
            .on_enter(snapshot);

        info!("Navigated back {:?} -> {:?} ({:?})", from, target, entry);
        Ok(Transition {
            from,
            to: target,
            entry,
        })
    }

    fn forward(&mut self, target: V, preserve: bool) -> Result<Transition<V>, NavigationError> {
        // Resolve before touching any state so an unknown target is a no-op.
        self.registry.resolve(target)?;

        let from = self.current;
        let snapshot = self.leave_current()?;

        if self.preserved.remove(&target).is_some() {
            debug!("Dropped preserved snapshot for {:?}, rebuilding it", target);
        }
        if preserve {
            debug!("Preserving {:?} ({:?})", from, snapshot);
            self.preserved.insert(from, snapshot);
        }

        self.back_stack.push(from);
        self.current = target;
        self.registry
            .resolve_mut(target)?
            .controller_mut()
            .on_enter(None);

        info!(
            "Navigated {:?} -> {:?}{} (depth {})",
            from,
            target,
            if preserve { " preserving" } else { "" },
            self.back_stack.len()
        );
        Ok(Transition {
            from,
            to: target,
            entry: Entry::Fresh,
        })
    }

    fn leave_current(&mut self) -> Result<ViewSnapshot, NavigationError> {
        Ok(self
            .registry
            .resolve_mut(self.current)?
            .controller_mut()
            .on_leave())
    }

    pub fn current(&self) -> V {
        self.current
    }

    /// Prior views, oldest first; the last element is where `back` returns.
    pub fn back_stack(&self) -> &[V] {
        &self.back_stack
    }

    pub fn depth(&self) -> usize {
        self.back_stack.len()
    }

    pub fn can_go_back(&self) -> bool {
        !self.back_stack.is_empty()
    }

    pub fn is_preserved(&self, id: V) -> bool {
        self.preserved.contains_key(&id)
    }

    pub fn preserved_count(&self) -> usize {
        self.preserved.len()
    }

    pub fn registry(&self) -> &ViewRegistry<V, C> {
        &self.registry
    }

    /// Controller of the active view.
    pub fn active_controller(&mut self) -> Result<&mut C, NavigationError> {
        self.current_controller(self.current)
    }

    /// Controller registered for `id`, for cross-controller hand-offs.
    pub fn current_controller(&mut self, id: V) -> Result<&mut C, NavigationError> {
        Ok(self.registry.resolve_mut(id)?.controller_mut())
    }

    /// Controller registered under `key`, as its concrete type.
    pub fn controller<T: Controller>(
        &mut self,
        key: ViewKey<V, T>,
    ) -> Result<&mut T, NavigationError> {
        let id = key.id();
        self.current_controller(id)?
            .as_any_mut()
            .downcast_mut::<T>()
            .ok_or_else(|| NavigationError::ControllerMismatch {
                id: format!("{id:?}"),
                expected: type_name::<T>(),
            })
    }
}
