//! Scene: the owning container of the entity forest
//!
//! Entities are stored in a generational arena. The scene keeps the ordered
//! list of root entities; everything reachable from a root is "in" the scene.
//! Entities created with [`Scene::create_entity`] or removed with
//! [`Scene::detach`] stay alive but are skipped by scene-wide traversal until
//! they are attached again.

use super::component::Component;
use super::entity::{Entity, EntityId};
use slotmap::SlotMap;

/// Errors raised by scene and entity queries
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// The id does not refer to a live entity of this scene
    #[error("entity {0:?} does not exist in this scene")]
    EntityNotFound(EntityId),

    /// A single-component accessor found no match
    #[error("entity '{entity}' has no {component} component")]
    ComponentNotFound {
        /// Entity name
        entity: String,
        /// Component type name
        component: &'static str,
    },

    /// A single-component accessor found several matches
    #[error("entity '{entity}' has {count} {component} components, expected exactly one")]
    AmbiguousComponent {
        /// Entity name
        entity: String,
        /// Component type name
        component: &'static str,
        /// Number of matches
        count: usize,
    },

    /// Re-parenting would make an entity its own ancestor
    #[error("cannot parent {child:?} under {parent:?}: it is the entity itself or one of its descendants")]
    HierarchyCycle {
        /// Entity being moved
        child: EntityId,
        /// Requested parent
        parent: EntityId,
    },
}

/// A forest of entities
#[derive(Debug, Default)]
pub struct Scene {
    name: String,
    entities: SlotMap<EntityId, Entity>,
    roots: Vec<EntityId>,
}

impl Scene {
    /// Create an empty scene
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Scene name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Create an entity that is not yet attached to the tree
    pub fn create_entity(&mut self, name: impl Into<String>) -> EntityId {
        self.entities.insert(Entity::new(name))
    }

    /// Create a new root entity
    pub fn spawn(&mut self, name: impl Into<String>) -> EntityId {
        let id = self.create_entity(name);
        self.roots.push(id);
        id
    }

    /// Create a new entity as the last child of `parent`
    pub fn spawn_child(&mut self, parent: EntityId, name: impl Into<String>) -> Result<EntityId, SceneError> {
        self.entity(parent)?;
        let id = self.create_entity(name);
        self.entities[id].parent = Some(parent);
        self.entities[parent].children.push(id);
        Ok(id)
    }

    /// Number of live entities, attached or not
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the scene holds no entities at all
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Whether `id` refers to a live entity
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(id)
    }

    /// Root entities in insertion order
    pub fn roots(&self) -> &[EntityId] {
        &self.roots
    }

    /// Borrow an entity
    pub fn entity(&self, id: EntityId) -> Result<&Entity, SceneError> {
        self.entities.get(id).ok_or(SceneError::EntityNotFound(id))
    }

    /// Mutably borrow an entity
    pub fn entity_mut(&mut self, id: EntityId) -> Result<&mut Entity, SceneError> {
        self.entities.get_mut(id).ok_or(SceneError::EntityNotFound(id))
    }

    /// Attach a component to an entity
    pub fn add_component<T: Component>(&mut self, id: EntityId, component: T) -> Result<(), SceneError> {
        self.entity_mut(id)?.add_component(component);
        Ok(())
    }

    /// First entity in traversal order with the given name
    pub fn find_by_name(&self, name: &str) -> Option<EntityId> {
        self.all_entities().find(|&id| self.entities[id].name() == name)
    }

    /// Parent of an entity
    pub fn parent(&self, id: EntityId) -> Result<Option<EntityId>, SceneError> {
        Ok(self.entity(id)?.parent)
    }

    /// Re-parent an entity
    ///
    /// The entity is removed from its previous parent's children (or from the
    /// root list) and appended to the new parent's children. `None` makes it
    /// a root.
    pub fn set_parent(&mut self, child: EntityId, parent: Option<EntityId>) -> Result<(), SceneError> {
        self.entity(child)?;
        if let Some(parent) = parent {
            self.entity(parent)?;
            if self.is_ancestor_or_self(child, parent) {
                return Err(SceneError::HierarchyCycle { child, parent });
            }
        }

        self.unlink(child);
        match parent {
            Some(parent) => {
                self.entities[parent].children.push(child);
                self.entities[child].parent = Some(parent);
            }
            None => self.roots.push(child),
        }
        log::trace!("Scene '{}': {:?} re-parented under {:?}", self.name, child, parent);
        Ok(())
    }

    /// Take an entity (and its subtree) out of the tree without destroying it
    pub fn detach(&mut self, id: EntityId) -> Result<(), SceneError> {
        self.entity(id)?;
        self.unlink(id);
        Ok(())
    }

    /// Destroy an entity together with all of its descendants
    ///
    /// Returns the number of entities removed.
    pub fn despawn(&mut self, id: EntityId) -> Result<usize, SceneError> {
        self.entity(id)?;
        self.unlink(id);
        let doomed: Vec<EntityId> = PostOrder::including_root(self, id).collect();
        for entity in &doomed {
            self.entities.remove(*entity);
        }
        log::trace!("Scene '{}': despawned {} entities", self.name, doomed.len());
        Ok(doomed.len())
    }

    /// Whether an entity is reachable from one of the roots
    pub fn is_attached(&self, id: EntityId) -> bool {
        let mut current = id;
        loop {
            match self.entities.get(current) {
                None => return false,
                Some(entity) => match entity.parent {
                    Some(parent) => current = parent,
                    None => return self.roots.contains(&current),
                },
            }
        }
    }

    /// All descendants of `id`, depth-first, each node after its own children
    pub fn children_recursively(&self, id: EntityId) -> Result<PostOrder<'_>, SceneError> {
        self.entity(id)?;
        Ok(PostOrder::excluding_root(self, id))
    }

    /// All descendants of `id` followed by `id` itself (post-order)
    pub fn children_recursively_including_root(&self, id: EntityId) -> Result<PostOrder<'_>, SceneError> {
        self.entity(id)?;
        Ok(PostOrder::including_root(self, id))
    }

    /// Every entity in the tree: each root's subtree in post-order, roots in order
    pub fn all_entities(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.roots
            .iter()
            .flat_map(move |&root| PostOrder::including_root(self, root))
    }

    /// Every entity in the tree together with its data
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> + '_ {
        self.all_entities().map(move |id| (id, &self.entities[id]))
    }

    /// Every entity in the tree that has at least one component of type `T`
    pub fn entities_with<T: Component>(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.all_entities()
            .filter(move |&id| self.entities[id].has_component::<T>())
    }

    /// Remove `id` from its parent's children or from the root list
    fn unlink(&mut self, id: EntityId) {
        match self.entities[id].parent.take() {
            Some(parent) => {
                if let Some(siblings) = self.entities.get_mut(parent).map(|p| &mut p.children) {
                    siblings.retain(|&sibling| sibling != id);
                }
            }
            None => self.roots.retain(|&root| root != id),
        }
    }

    /// Whether `ancestor` is `node` or one of its ancestors
    fn is_ancestor_or_self(&self, ancestor: EntityId, node: EntityId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.entities.get(id).and_then(|entity| entity.parent);
        }
        false
    }
}

/// Lazy post-order walk over a subtree
///
/// Children are visited in order and every node is yielded after all of its
/// descendants.
#[derive(Debug)]
pub struct PostOrder<'a> {
    scene: &'a Scene,
    stack: Vec<(EntityId, usize)>,
    include_root: bool,
}

impl<'a> PostOrder<'a> {
    fn including_root(scene: &'a Scene, root: EntityId) -> Self {
        Self {
            scene,
            stack: vec![(root, 0)],
            include_root: true,
        }
    }

    fn excluding_root(scene: &'a Scene, root: EntityId) -> Self {
        Self {
            scene,
            stack: vec![(root, 0)],
            include_root: false,
        }
    }
}

impl Iterator for PostOrder<'_> {
    type Item = EntityId;

    fn next(&mut self) -> Option<EntityId> {
        while let Some(top) = self.stack.last_mut() {
            let next_child = self
                .scene
                .entities
                .get(top.0)
                .and_then(|entity| entity.children.get(top.1))
                .copied();
            if let Some(child) = next_child {
                top.1 += 1;
                self.stack.push((child, 0));
                continue;
            }

            let (id, _) = self.stack.pop()?;
            if self.stack.is_empty() && !self.include_root {
                return None;
            }
            return Some(id);
        }
        None
    }
}
