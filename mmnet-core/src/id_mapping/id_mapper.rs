use std::collections::{HashMap, HashSet};
use std::fmt;

use super::IdMappingType;
use crate::model::Identifiable;

/// entity category an [IdMapper] serves. counters are never shared across categories
/// so the same raw tag may appear once per category without a suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdMapperCategory {
    Node,
    LinkSegment,
    StopFacility,
    Line,
    Route,
    Departure,
}

impl fmt::Display for IdMapperCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IdMapperCategory::Node => "node",
            IdMapperCategory::LinkSegment => "link segment",
            IdMapperCategory::StopFacility => "stop facility",
            IdMapperCategory::Line => "transit line",
            IdMapperCategory::Route => "transit route",
            IdMapperCategory::Departure => "departure",
        };
        f.write_str(s)
    }
}

/// produces output identifiers for the entities of one category.
///
/// under [IdMappingType::Id] and [IdMappingType::XmlId] the identity is passed through.
/// under [IdMappingType::ExternalId] the raw tag is deduplicated: the first entity seen
/// with a tag keeps it, every later entity with the same tag receives `tag + counter`
/// where the counter increments per collision. the value assigned to an entity is
/// remembered, so resolving the same entity again later in the run (for example when
/// a stop references its access link segment) yields the same identifier.
///
/// output for colliding tags depends on first-seen order, so entities must be resolved
/// in a stable order.
#[derive(Debug, Clone)]
pub struct IdMapper {
    category: IdMapperCategory,
    strategy: IdMappingType,
    /// raw tag -> number of collisions seen so far
    counters: HashMap<String, usize>,
    /// every identifier handed out so far
    issued: HashSet<String>,
    /// internal id -> identifier handed out for that entity
    assigned: HashMap<usize, String>,
}

impl IdMapper {
    pub fn new(category: IdMapperCategory, strategy: IdMappingType) -> Self {
        Self {
            category,
            strategy,
            counters: HashMap::new(),
            issued: HashSet::new(),
            assigned: HashMap::new(),
        }
    }

    pub fn category(&self) -> IdMapperCategory {
        self.category
    }

    pub fn strategy(&self) -> IdMappingType {
        self.strategy
    }

    /// the output identifier of an entity. never fails.
    pub fn id_for<E>(&mut self, entity: &E) -> String
    where
        E: Identifiable + ?Sized,
    {
        match self.strategy {
            IdMappingType::Id => entity.id().to_string(),
            IdMappingType::XmlId => entity.xml_id().to_string(),
            IdMappingType::ExternalId => self.unique_external_id(entity),
        }
    }

    /// the identifier previously handed out for an entity, if any. passthrough
    /// strategies always resolve.
    pub fn resolved_id_for<E>(&self, entity: &E) -> Option<String>
    where
        E: Identifiable + ?Sized,
    {
        match self.strategy {
            IdMappingType::Id => Some(entity.id().to_string()),
            IdMappingType::XmlId => Some(entity.xml_id().to_string()),
            IdMappingType::ExternalId => self.assigned.get(&entity.id()).cloned(),
        }
    }

    /// discards all collision tracking state.
    pub fn reset(&mut self) {
        self.counters.clear();
        self.issued.clear();
        self.assigned.clear();
    }

    fn unique_external_id<E>(&mut self, entity: &E) -> String
    where
        E: Identifiable + ?Sized,
    {
        if let Some(existing) = self.assigned.get(&entity.id()) {
            return existing.clone();
        }

        // entities lacking a free-form tag fall back to their structured tag
        let raw = match entity.external_id() {
            Some(tag) if !tag.is_empty() => tag,
            _ => entity.xml_id(),
        };

        let first_sight = !self.counters.contains_key(raw);
        let counter = self.counters.entry(raw.to_string()).or_insert(0);
        let mut candidate = if first_sight {
            raw.to_string()
        } else {
            *counter += 1;
            format!("{raw}{counter}")
        };
        // a suffixed value may coincide with another entity's raw tag
        while self.issued.contains(&candidate) {
            *counter += 1;
            candidate = format!("{raw}{counter}");
        }
        if candidate != raw {
            log::debug!(
                "duplicate {} external id '{raw}' for entity {}, using '{candidate}'",
                self.category,
                entity.id()
            );
        }

        self.issued.insert(candidate.clone());
        self.assigned.insert(entity.id(), candidate.clone());
        candidate
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    struct Tagged {
        id: usize,
        xml_id: String,
        external_id: Option<String>,
    }

    impl Identifiable for Tagged {
        fn id(&self) -> usize {
            self.id
        }

        fn xml_id(&self) -> &str {
            &self.xml_id
        }

        fn external_id(&self) -> Option<&str> {
            self.external_id.as_deref()
        }
    }

    fn tagged(id: usize, external_id: Option<&str>) -> Tagged {
        Tagged {
            id,
            xml_id: format!("x{id}"),
            external_id: external_id.map(String::from),
        }
    }

    fn external_mapper() -> IdMapper {
        IdMapper::new(IdMapperCategory::LinkSegment, IdMappingType::ExternalId)
    }

    #[test]
    fn test_passthrough_strategies() {
        let entity = tagged(7, Some("ext"));
        let mut by_id = IdMapper::new(IdMapperCategory::Node, IdMappingType::Id);
        let mut by_xml = IdMapper::new(IdMapperCategory::Node, IdMappingType::XmlId);
        assert_eq!(by_id.id_for(&entity), "7");
        assert_eq!(by_xml.id_for(&entity), "x7");
    }

    #[test]
    fn test_duplicate_external_ids_are_suffixed() {
        let mut mapper = external_mapper();
        let a = tagged(0, Some("A"));
        let b = tagged(1, Some("A"));
        assert_eq!(mapper.id_for(&a), "A");
        assert_eq!(mapper.id_for(&b), "A1");
    }

    #[test]
    fn test_counter_increments_per_collision() {
        let mut mapper = external_mapper();
        let ids = (0..4)
            .map(|i| mapper.id_for(&tagged(i, Some("A"))))
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["A", "A1", "A2", "A3"]);
    }

    #[test]
    fn test_repeated_resolution_is_stable() {
        let mut mapper = external_mapper();
        let a = tagged(0, Some("A"));
        let b = tagged(1, Some("A"));
        mapper.id_for(&a);
        let first = mapper.id_for(&b);
        let second = mapper.id_for(&b);
        assert_eq!(first, "A1");
        assert_eq!(second, "A1");
        assert_eq!(mapper.resolved_id_for(&b), Some(String::from("A1")));
        assert_eq!(mapper.id_for(&a), "A");
    }

    #[test]
    fn test_generated_suffix_never_reused() {
        // "A","A" produces "A1"; a later raw "A1" must not receive "A1" again
        let mut mapper = external_mapper();
        let ids = [Some("A"), Some("A"), Some("A1"), Some("A")]
            .into_iter()
            .enumerate()
            .map(|(i, tag)| mapper.id_for(&tagged(i, tag)))
            .collect::<Vec<_>>();
        let unique = ids.iter().collect::<HashSet<_>>();
        assert_eq!(unique.len(), ids.len(), "ids not unique: {ids:?}");
        assert_eq!(ids[0], "A");
        assert_eq!(ids[1], "A1");
    }

    #[test]
    fn test_missing_external_id_falls_back_to_xml_id() {
        let mut mapper = external_mapper();
        assert_eq!(mapper.id_for(&tagged(3, None)), "x3");
        assert_eq!(mapper.id_for(&tagged(4, Some(""))), "x4");
    }

    #[test]
    fn test_unique_under_many_duplicates() {
        let mut mapper = external_mapper();
        let tags = ["a", "b", "a", "a1", "b", "a", "a11", "a1"];
        let ids = tags
            .iter()
            .enumerate()
            .map(|(i, t)| mapper.id_for(&tagged(i, Some(t))))
            .collect::<Vec<_>>();
        let unique = ids.iter().collect::<HashSet<_>>();
        assert_eq!(unique.len(), tags.len(), "ids not unique: {ids:?}");
    }

    #[test]
    fn test_reset_forgets_collisions() {
        let mut mapper = external_mapper();
        mapper.id_for(&tagged(0, Some("A")));
        mapper.reset();
        assert_eq!(mapper.id_for(&tagged(1, Some("A"))), "A");
        assert_eq!(mapper.resolved_id_for(&tagged(0, Some("A"))), None);
    }
}
