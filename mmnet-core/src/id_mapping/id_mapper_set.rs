use super::{IdMapper, IdMapperCategory, IdMappingType};

/// one [IdMapper] per entity category, all sharing a single strategy. created once per
/// export run by the network writer and handed on to every writer that references
/// network entities, so cross-document references agree.
#[derive(Debug, Clone)]
pub struct IdMappers {
    pub nodes: IdMapper,
    pub link_segments: IdMapper,
    pub stop_facilities: IdMapper,
    pub lines: IdMapper,
    pub routes: IdMapper,
    pub departures: IdMapper,
}

impl IdMappers {
    pub fn new(strategy: IdMappingType) -> Self {
        use IdMapperCategory as C;
        Self {
            nodes: IdMapper::new(C::Node, strategy),
            link_segments: IdMapper::new(C::LinkSegment, strategy),
            stop_facilities: IdMapper::new(C::StopFacility, strategy),
            lines: IdMapper::new(C::Line, strategy),
            routes: IdMapper::new(C::Route, strategy),
            departures: IdMapper::new(C::Departure, strategy),
        }
    }

    pub fn strategy(&self) -> IdMappingType {
        self.nodes.strategy()
    }

    pub fn reset(&mut self) {
        self.nodes.reset();
        self.link_segments.reset();
        self.stop_facilities.reset();
        self.lines.reset();
        self.routes.reset();
        self.departures.reset();
    }
}
