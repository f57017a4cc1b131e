//! Component trait and type-erased access helpers

use std::any::Any;
use std::fmt::Debug;

/// Object-safe access to `Any` for boxed components
pub trait AsAny: Any {
    /// Borrow as `&dyn Any`
    fn as_any(&self) -> &dyn Any;

    /// Borrow as `&mut dyn Any`
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Convert a boxed value into `Box<dyn Any>`
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// Marker trait for components
///
/// Any `'static` data type can become a component by implementing this
/// trait. Components are stored type-erased on their entity and recovered
/// with a checked downcast, so the set of component kinds stays open.
pub trait Component: AsAny + Debug + Send + Sync {
    /// Human-readable component kind, used in error messages
    fn component_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Downcast a type-erased component to a concrete type
pub fn downcast_ref<T: Component>(component: &dyn Component) -> Option<&T> {
    component.as_any().downcast_ref::<T>()
}

/// Mutable variant of [`downcast_ref`]
pub fn downcast_mut<T: Component>(component: &mut dyn Component) -> Option<&mut T> {
    component.as_any_mut().downcast_mut::<T>()
}

/// Short type name for a component type, without its module path
pub fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}
