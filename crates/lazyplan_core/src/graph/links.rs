//! Link creation, traversal and cascade deletion.

use super::{LinkedItem, LinkedItems};
use crate::model::entity::{Event, Goal, Identified, Link, Todo};
use crate::model::kind::{EntityId, EntityKind, EntityRef};
use crate::store::{remove_by_id, IdsExhausted, Store};
use std::collections::HashSet;

impl Store {
    /// Appends a new link. Endpoints are not checked and duplicates are allowed.
    pub fn create_link(&mut self, from: EntityRef, to: EntityRef) -> Result<Link, IdsExhausted> {
        let link = Link::new(self.next_link_id()?, from, to);
        self.links.push(link.clone());
        Ok(link)
    }

    /// Removes one link by id. Returns whether it existed.
    pub fn delete_link(&mut self, link_id: EntityId) -> bool {
        remove_by_id(&mut self.links, link_id)
    }

    /// Links whose source is `entity`, in storage order.
    pub fn links_from(&self, entity: EntityRef) -> Vec<Link> {
        self.links
            .iter()
            .filter(|link| link.source() == entity)
            .cloned()
            .collect()
    }

    /// Links whose target is `entity`, in storage order.
    pub fn links_to(&self, entity: EntityRef) -> Vec<Link> {
        self.links
            .iter()
            .filter(|link| link.target() == entity)
            .cloned()
            .collect()
    }

    /// First link matching the exact `(from, to)` pair.
    pub fn find_link(&self, from: EntityRef, to: EntityRef) -> Option<&Link> {
        self.links
            .iter()
            .find(|link| link.source() == from && link.target() == to)
    }

    /// Todos targeted by outgoing links of `entity`.
    pub fn related_todos(&self, entity: EntityRef) -> Vec<&Todo> {
        self.related(entity, EntityKind::Todo, &self.todos)
    }

    /// Goals targeted by outgoing links of `entity`.
    pub fn related_goals(&self, entity: EntityRef) -> Vec<&Goal> {
        self.related(entity, EntityKind::Goal, &self.goals)
    }

    /// Events targeted by outgoing links of `entity`.
    pub fn related_events(&self, entity: EntityRef) -> Vec<&Event> {
        self.related(entity, EntityKind::Event, &self.events)
    }

    // Results follow arena order and list each entity once, even when the
    // same edge was created twice. Dangling target ids simply match nothing.
    fn related<'a, T: Identified>(
        &self,
        entity: EntityRef,
        target_kind: EntityKind,
        items: &'a [T],
    ) -> Vec<&'a T> {
        let target_ids = self
            .links
            .iter()
            .filter(|link| link.source() == entity && link.to_type == target_kind)
            .map(|link| link.to_id)
            .collect::<HashSet<_>>();

        items
            .iter()
            .filter(|item| target_ids.contains(&item.id()))
            .collect()
    }

    /// Resolves both directions of `entity`'s links.
    pub fn linked_items(&self, entity: EntityRef) -> LinkedItems {
        let links_from = self
            .links
            .iter()
            .filter(|link| link.source() == entity)
            .filter_map(|link| self.neighbour(link, link.target()))
            .collect();
        let links_to = self
            .links
            .iter()
            .filter(|link| link.target() == entity)
            .filter_map(|link| self.neighbour(link, link.source()))
            .collect();

        LinkedItems {
            item: entity,
            links_from,
            links_to,
        }
    }

    fn neighbour(&self, link: &Link, other: EntityRef) -> Option<LinkedItem> {
        let title = self.title_of(other)?;
        Some(LinkedItem {
            relationship: format!("{} -> {}", link.from_type, link.to_type),
            kind: other.kind,
            id: other.id,
            title: title.to_string(),
        })
    }

    /// Deletes an entity together with its links and, for every kind except
    /// standalone notes, its dependent notes. Returns whether it existed.
    pub fn remove_entity(&mut self, entity: EntityRef) -> bool {
        let removed = match entity.kind {
            EntityKind::Event => remove_by_id(&mut self.events, entity.id),
            EntityKind::Todo => remove_by_id(&mut self.todos, entity.id),
            EntityKind::Goal => remove_by_id(&mut self.goals, entity.id),
            EntityKind::Note => remove_by_id(&mut self.notes, entity.id),
        };
        if !removed {
            return false;
        }

        self.links.retain(|link| !link.touches(entity));
        if entity.kind.cascades_dependent_notes() {
            self.dependent_notes.retain(|note| note.parent() != entity);
        }
        true
    }
}
