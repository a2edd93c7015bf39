use std::any::Any;
use std::fmt::{self, Debug};
use std::hash::Hash;
use std::marker::PhantomData;

/// Identifier for a screen.
///
/// Implemented automatically for any small copyable key, typically a
/// fieldless enum listing every screen of the application.
pub trait ViewId: Copy + Eq + Hash + Debug + Send + 'static {}

impl<T> ViewId for T where T: Copy + Eq + Hash + Debug + Send + 'static {}

/// A view id tagged with the concrete controller type registered under it.
///
/// Registering through a key with [`ViewRegistry::register_typed`] lets
/// callers later borrow the controller back as `C` without casting at the
/// call site.
///
/// [`ViewRegistry::register_typed`]: super::ViewRegistry::register_typed
pub struct ViewKey<V, C> {
    id: V,
    _controller: PhantomData<fn() -> C>,
}

impl<V: ViewId, C> ViewKey<V, C> {
    pub const fn new(id: V) -> Self {
        Self {
            id,
            _controller: PhantomData,
        }
    }

    pub fn id(&self) -> V {
        self.id
    }
}

impl<V: ViewId, C> Clone for ViewKey<V, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V: ViewId, C> Copy for ViewKey<V, C> {}

impl<V: ViewId, C> Debug for ViewKey<V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ViewKey").field(&self.id).finish()
    }
}

/// Live state captured from a controller when its view is left.
///
/// The navigator never looks inside; it only stores the snapshot for a
/// preserved view and hands it back, once, when that view is resumed.
pub struct ViewSnapshot(Option<Box<dyn Any + Send>>);

impl ViewSnapshot {
    pub fn new<T: Any + Send>(state: T) -> Self {
        Self(Some(Box::new(state)))
    }

    /// A snapshot for controllers with nothing worth resuming.
    pub fn empty() -> Self {
        Self(None)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    /// Recover the captured state, or give the snapshot back if it holds
    /// something else.
    pub fn downcast<T: Any>(self) -> Result<T, Self> {
        match self.0 {
            Some(inner) => match inner.downcast::<T>() {
                Ok(state) => Ok(*state),
                Err(inner) => Err(Self(Some(inner))),
            },
            None => Err(Self(None)),
        }
    }
}

impl Debug for ViewSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            f.write_str("ViewSnapshot(empty)")
        } else {
            f.write_str("ViewSnapshot(..)")
        }
    }
}

/// Per-screen logic as seen by the navigator.
///
/// `on_enter` is called every time the view becomes current: with `None`
/// when the view is built fresh, with the stored snapshot when a preserved
/// view is resumed. `on_leave` is called every time the view stops being
/// current and is where in-flight queries for the view should be cancelled.
pub trait Controller: Any {
    fn on_enter(&mut self, snapshot: Option<ViewSnapshot>);

    fn on_leave(&mut self) -> ViewSnapshot;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Immutable description of a registered view.
pub struct ViewDefinition<V, C: ?Sized> {
    id: V,
    resource: String,
    controller: Box<C>,
}

impl<V: ViewId, C: ?Sized + Controller> ViewDefinition<V, C> {
    pub(crate) fn new(id: V, resource: String, controller: Box<C>) -> Self {
        Self {
            id,
            resource,
            controller,
        }
    }

    pub fn id(&self) -> V {
        self.id
    }

    /// Locator of the screen layout this view renders.
    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn controller(&self) -> &C {
        &self.controller
    }

    pub(crate) fn controller_mut(&mut self) -> &mut C {
        &mut self.controller
    }
}

/// How a view was entered by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry {
    /// Built from its definition; the controller received no snapshot.
    Fresh,

    /// Resumed from a preserved snapshot.
    Resumed,
}

/// Outcome of a successful navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition<V> {
    pub from: V,
    pub to: V,
    pub entry: Entry,
}
