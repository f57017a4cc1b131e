//! Entity implementation
//!
//! An entity is a named node in the scene tree that owns its components. The
//! tree links live on the entity: the parent is a non-owning id, the children
//! are an ordered list of ids. Both sides are edited only through
//! [`Scene`](super::Scene) so they always agree.

use super::component::{downcast_mut, downcast_ref, short_type_name, Component};
use super::scene::SceneError;

slotmap::new_key_type! {
    /// Generational entity identifier
    ///
    /// Ids stay valid while the entity is alive; a despawned id never
    /// aliases a newer entity.
    pub struct EntityId;
}

/// A node in the scene tree together with its components
#[derive(Debug, Default)]
pub struct Entity {
    name: String,
    pub(super) parent: Option<EntityId>,
    pub(super) children: Vec<EntityId>,
    components: Vec<Box<dyn Component>>,
}

impl Entity {
    pub(super) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the entity
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Parent entity, `None` for roots and detached entities
    pub fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    /// Children in insertion order
    pub fn children(&self) -> &[EntityId] {
        &self.children
    }

    /// Attach a component
    ///
    /// Several components of the same type may be attached; single-value
    /// accessors such as [`Entity::get_component`] then report ambiguity.
    pub fn add_component<T: Component>(&mut self, component: T) -> &mut Self {
        self.components.push(Box::new(component));
        self
    }

    /// Attach an already boxed component
    pub fn add_boxed_component(&mut self, component: Box<dyn Component>) -> &mut Self {
        self.components.push(component);
        self
    }

    /// Detach the first component of type `T`, if any
    ///
    /// The last component takes the removed one's slot, so the relative order
    /// of the remaining components is not preserved.
    pub fn remove_component<T: Component>(&mut self) -> Option<T> {
        let index = self
            .components
            .iter()
            .position(|c| downcast_ref::<T>(c.as_ref()).is_some())?;
        let removed = self.components.swap_remove(index);
        removed.into_any().downcast::<T>().ok().map(|boxed| *boxed)
    }

    /// Detach every component of type `T`, returning how many were removed
    pub fn remove_components<T: Component>(&mut self) -> usize {
        let before = self.components.len();
        self.components
            .retain(|c| downcast_ref::<T>(c.as_ref()).is_none());
        before - self.components.len()
    }

    /// The single component of type `T`
    ///
    /// Fails when none, or more than one, is attached.
    pub fn get_component<T: Component>(&self) -> Result<&T, SceneError> {
        let mut matches = self.get_components::<T>();
        let first = matches
            .next()
            .ok_or_else(|| Self::single_component_error::<T>(&self.name, 0))?;
        let extra = matches.count();
        if extra > 0 {
            return Err(Self::single_component_error::<T>(&self.name, extra + 1));
        }
        Ok(first)
    }

    /// Mutable access to the single component of type `T`
    pub fn get_component_mut<T: Component>(&mut self) -> Result<&mut T, SceneError> {
        let count = self.component_count::<T>();
        if count != 1 {
            return Err(Self::single_component_error::<T>(&self.name, count));
        }
        let name = &self.name;
        self.components
            .iter_mut()
            .find_map(|c| downcast_mut::<T>(c.as_mut()))
            .ok_or_else(|| Self::single_component_error::<T>(name, 0))
    }

    /// Every component of type `T`, in attachment order
    ///
    /// The iterator is lazy and re-evaluated on every call.
    pub fn get_components<T: Component>(&self) -> impl Iterator<Item = &T> + '_ {
        self.components
            .iter()
            .filter_map(|c| downcast_ref::<T>(c.as_ref()))
    }

    /// Mutable access to every component of type `T`
    pub fn get_components_mut<T: Component>(&mut self) -> impl Iterator<Item = &mut T> + '_ {
        self.components
            .iter_mut()
            .filter_map(|c| downcast_mut::<T>(c.as_mut()))
    }

    /// Whether at least one component of type `T` is attached
    pub fn has_component<T: Component>(&self) -> bool {
        self.get_components::<T>().next().is_some()
    }

    /// Number of attached components of type `T`
    pub fn component_count<T: Component>(&self) -> usize {
        self.get_components::<T>().count()
    }

    /// All attached components, type-erased
    pub fn components(&self) -> impl Iterator<Item = &dyn Component> + '_ {
        self.components.iter().map(|c| c.as_ref())
    }

    fn single_component_error<T: Component>(name: &str, count: usize) -> SceneError {
        if count == 0 {
            SceneError::ComponentNotFound {
                entity: name.to_string(),
                component: short_type_name::<T>(),
            }
        } else {
            SceneError::AmbiguousComponent {
                entity: name.to_string(),
                component: short_type_name::<T>(),
                count,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Score(i32);
    impl Component for Score {}

    #[derive(Debug, PartialEq)]
    struct Label(&'static str);
    impl Component for Label {}

    #[test]
    fn test_get_component_single() {
        let mut entity = Entity::new("player");
        entity.add_component(Score(5)).add_component(Label("hero"));

        assert_eq!(entity.get_component::<Score>().unwrap(), &Score(5));
        assert_eq!(entity.get_component::<Label>().unwrap(), &Label("hero"));
    }

    #[test]
    fn test_get_component_missing() {
        let entity = Entity::new("empty");
        let err = entity.get_component::<Score>().unwrap_err();
        assert!(matches!(err, SceneError::ComponentNotFound { component: "Score", .. }));
    }

    #[test]
    fn test_get_component_ambiguous() {
        let mut entity = Entity::new("twice");
        entity.add_component(Score(1)).add_component(Score(2));

        let err = entity.get_component::<Score>().unwrap_err();
        assert!(matches!(err, SceneError::AmbiguousComponent { count: 2, .. }));
        assert!(entity.get_component_mut::<Score>().is_err());
    }

    #[test]
    fn test_get_components_multi_valued() {
        let mut entity = Entity::new("labels");
        entity
            .add_component(Label("a"))
            .add_component(Score(0))
            .add_component(Label("b"));

        let labels: Vec<_> = entity.get_components::<Label>().map(|l| l.0).collect();
        assert_eq!(labels, vec!["a", "b"]);
        assert_eq!(entity.get_components::<Score>().count(), 1);
        assert!(Entity::new("none").get_components::<Label>().next().is_none());
    }

    #[test]
    fn test_has_and_remove_component() {
        let mut entity = Entity::new("e");
        entity.add_component(Score(9)).add_component(Label("x"));

        assert!(entity.has_component::<Score>());
        assert_eq!(entity.remove_component::<Score>(), Some(Score(9)));
        assert!(!entity.has_component::<Score>());
        assert_eq!(entity.remove_component::<Score>(), None);
        assert!(entity.has_component::<Label>());
    }

    #[test]
    fn test_remove_components_counts() {
        let mut entity = Entity::new("e");
        entity.add_component(Label("a")).add_component(Label("b")).add_component(Score(1));

        assert_eq!(entity.remove_components::<Label>(), 2);
        assert_eq!(entity.components().count(), 1);
    }

    #[test]
    fn test_get_component_mut_writes() {
        let mut entity = Entity::new("e");
        entity.add_component(Score(1));
        entity.get_component_mut::<Score>().unwrap().0 = 42;
        assert_eq!(entity.get_component::<Score>().unwrap().0, 42);
    }
}
