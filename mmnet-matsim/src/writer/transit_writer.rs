use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use indexmap::IndexMap;
use itertools::Itertools;
use kdam::tqdm;
use mmnet_core::{
    id_mapping::IdMappers,
    model::{
        ConnectoidId, LinkSegmentId, ModeId, NetworkIndex, ServiceLine, ServiceRoute,
        TransferConnectoid, TransferZone, TransitServices, ZoneId, Zoning,
    },
};
use serde::{Deserialize, Serialize};

use super::{
    coordinates::CoordinateFormatter, format::format_time, xml_writer::XmlDocumentWriter,
    MatsimWriterError,
};
use crate::{config::MatsimWriterConfig, util::fs::OutputSink};

pub const TRANSIT_SCHEDULE_DOCTYPE: &str =
    r#"transitSchedule SYSTEM "http://www.matsim.org/files/dtd/transitSchedule_v2.dtd""#;

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct TransitWriterStats {
    pub stop_facilities: usize,
    pub dropped_stop_facilities: usize,
    pub lines: usize,
    pub dropped_lines: usize,
    pub routes: usize,
    pub dropped_routes: usize,
    pub departures: usize,
}

/// a stop facility as written to the transit schedule
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StopFacilityRecord {
    pub id: String,
    pub x: String,
    pub y: String,
    pub link_ref_id: String,
    pub name: Option<String>,
}

pub struct TransitWriterOutput {
    pub stats: TransitWriterStats,
    pub stop_facilities: Vec<StopFacilityRecord>,
    pub files: Vec<PathBuf>,
}

/// writes transfer connectoids as stop facilities and scheduled services as transit
/// lines to a MATSim transit schedule. every reference into the network uses the
/// identifiers the network writer produced for the same run.
pub struct MatsimTransitWriter<'a> {
    config: &'a MatsimWriterConfig,
    coordinates: &'a CoordinateFormatter<'a>,
    mode_tokens: &'a IndexMap<ModeId, String>,
}

impl<'a> MatsimTransitWriter<'a> {
    pub fn new(
        config: &'a MatsimWriterConfig,
        coordinates: &'a CoordinateFormatter<'a>,
        mode_tokens: &'a IndexMap<ModeId, String>,
    ) -> Self {
        Self {
            config,
            coordinates,
            mode_tokens,
        }
    }

    pub fn write(
        &self,
        zoning: &Zoning,
        services: Option<&TransitServices>,
        index: &NetworkIndex,
        id_mappers: &mut IdMappers,
        emitted_segments: &HashSet<LinkSegmentId>,
    ) -> Result<TransitWriterOutput, MatsimWriterError> {
        let path = self.config.transit_file();
        log::info!("writing MATSim transit schedule to '{}'", path.display());
        let mut stats = TransitWriterStats::default();

        let stops =
            self.collect_stop_facilities(zoning, index, id_mappers, emitted_segments, &mut stats)?;
        let stop_ids = stops
            .iter()
            .map(|(connectoid, record)| (*connectoid, record.id.as_str()))
            .collect::<HashMap<_, _>>();

        let sink = OutputSink::create(&path, self.config.compress)?;
        let mut xml = XmlDocumentWriter::new(sink);
        xml.write_prologue(TRANSIT_SCHEDULE_DOCTYPE)?;
        xml.start("transitSchedule", &[])?;

        xml.start("transitStops", &[])?;
        for (_, stop) in stops.iter() {
            let mut attributes = vec![
                ("id", stop.id.as_str()),
                ("x", stop.x.as_str()),
                ("y", stop.y.as_str()),
                ("linkRefId", stop.link_ref_id.as_str()),
            ];
            if let Some(name) = stop.name.as_deref() {
                attributes.push(("name", name));
            }
            attributes.push(("isBlocking", "false"));
            xml.empty("stopFacility", &attributes)?;
        }
        xml.end()?;

        if let Some(services) = services {
            let line_iter = tqdm!(
                services.lines.iter(),
                total = services.lines.len(),
                desc = "write transit lines"
            );
            for line in line_iter {
                self.write_line(
                    &mut xml,
                    line,
                    &stop_ids,
                    index,
                    id_mappers,
                    emitted_segments,
                    &mut stats,
                )?;
            }
            eprintln!();
        }

        xml.end()?;
        let sink = xml.finish()?;
        sink.finish(&path)?;

        log::info!(
            "wrote {} stop facilities and {} transit lines with {} routes, dropped {} stop facilities, {} lines and {} routes",
            stats.stop_facilities,
            stats.lines,
            stats.routes,
            stats.dropped_stop_facilities,
            stats.dropped_lines,
            stats.dropped_routes
        );
        Ok(TransitWriterOutput {
            stats,
            stop_facilities: stops.into_iter().map(|(_, record)| record).collect(),
            files: vec![path],
        })
    }

    /// a stop facility per connectoid that can be placed on an emitted link segment
    fn collect_stop_facilities(
        &self,
        zoning: &Zoning,
        index: &NetworkIndex,
        id_mappers: &mut IdMappers,
        emitted_segments: &HashSet<LinkSegmentId>,
        stats: &mut TransitWriterStats,
    ) -> Result<Vec<(ConnectoidId, StopFacilityRecord)>, MatsimWriterError> {
        let zones = zoning.zone_lookup();
        let mut stops = Vec::with_capacity(zoning.connectoids.len());
        for connectoid in zoning.connectoids.iter() {
            let Some(segment_id) = connectoid.access_link_segment else {
                log::warn!(
                    "connectoid '{}' has no access link segment, stop facility dropped",
                    connectoid.xml_id
                );
                stats.dropped_stop_facilities += 1;
                continue;
            };
            let segment_ref = match index.segment(&segment_id) {
                Some(segment_ref) if emitted_segments.contains(&segment_id) => segment_ref,
                _ => {
                    log::warn!(
                        "access link segment {segment_id} of connectoid '{}' is not part of the MATSim network, stop facility dropped",
                        connectoid.xml_id
                    );
                    stats.dropped_stop_facilities += 1;
                    continue;
                }
            };

            let node = index.downstream_node_of(&segment_ref)?;
            let projected = node
                .position
                .as_ref()
                .map(|p| self.coordinates.project(p));
            let coord = match projected {
                Some(Ok(coord)) => coord,
                Some(Err(e)) => {
                    log::warn!(
                        "unable to transform position of connectoid '{}': {e}, stop facility dropped",
                        connectoid.xml_id
                    );
                    stats.dropped_stop_facilities += 1;
                    continue;
                }
                None => {
                    log::warn!(
                        "node '{}' at the access link segment of connectoid '{}' has no position, stop facility dropped",
                        node.xml_id,
                        connectoid.xml_id
                    );
                    stats.dropped_stop_facilities += 1;
                    continue;
                }
            };

            let link_ref_id = id_mappers
                .link_segments
                .resolved_id_for(segment_ref.segment)
                .ok_or_else(|| {
                    MatsimWriterError::InternalError(format!(
                        "link segment {segment_id} was written without an identifier"
                    ))
                })?;
            let (x, y) = self.coordinates.format_coord(coord);
            let record = StopFacilityRecord {
                id: id_mappers.stop_facilities.id_for(connectoid),
                x,
                y,
                link_ref_id,
                name: self.stop_name(connectoid, &zones),
            };
            stats.stop_facilities += 1;
            stops.push((connectoid.id, record));
        }
        Ok(stops)
    }

    /// names of the served transfer zones joined by the configured separator
    fn stop_name(
        &self,
        connectoid: &TransferConnectoid,
        zones: &HashMap<ZoneId, &TransferZone>,
    ) -> Option<String> {
        let name = connectoid
            .access_zones
            .iter()
            .filter_map(|z| zones.get(z))
            .filter_map(|z| z.name.as_deref())
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .join(&self.config.transit.zone_name_separator);
        if name.is_empty() {
            None
        } else {
            Some(name)
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn write_line(
        &self,
        xml: &mut XmlDocumentWriter<OutputSink>,
        line: &ServiceLine,
        stop_ids: &HashMap<ConnectoidId, &str>,
        index: &NetworkIndex,
        id_mappers: &mut IdMappers,
        emitted_segments: &HashSet<LinkSegmentId>,
        stats: &mut TransitWriterStats,
    ) -> Result<(), MatsimWriterError> {
        let Some(token) = self.mode_tokens.get(&line.mode) else {
            log::warn!(
                "mode {} of transit line '{}' is not an activated MATSim mode, line dropped",
                line.mode,
                line.xml_id
            );
            stats.dropped_lines += 1;
            stats.dropped_routes += line.routes.len();
            return Ok(());
        };

        let routes = line
            .routes
            .iter()
            .filter(|r| route_is_writable(line, r, stop_ids, emitted_segments))
            .collect::<Vec<_>>();
        stats.dropped_routes += line.routes.len() - routes.len();
        if routes.is_empty() {
            log::warn!("transit line '{}' has no writable routes, line dropped", line.xml_id);
            stats.dropped_lines += 1;
            return Ok(());
        }

        let line_id = id_mappers.lines.id_for(line);
        let mut attributes = vec![("id", line_id.as_str())];
        if let Some(name) = line.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            attributes.push(("name", name));
        }
        xml.start("transitLine", &attributes)?;
        for route in routes {
            self.write_route(xml, route, token, stop_ids, index, id_mappers, stats)?;
        }
        xml.end()?;
        stats.lines += 1;
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn write_route(
        &self,
        xml: &mut XmlDocumentWriter<OutputSink>,
        route: &ServiceRoute,
        token: &str,
        stop_ids: &HashMap<ConnectoidId, &str>,
        index: &NetworkIndex,
        id_mappers: &mut IdMappers,
        stats: &mut TransitWriterStats,
    ) -> Result<(), MatsimWriterError> {
        let route_id = id_mappers.routes.id_for(route);
        xml.start("transitRoute", &[("id", route_id.as_str())])?;
        xml.text_element("transportMode", token)?;

        xml.start("routeProfile", &[])?;
        for stop in route.stops.iter() {
            let stop_id = stop_ids.get(&stop.connectoid).copied().ok_or_else(|| {
                MatsimWriterError::InternalError(format!(
                    "route '{}' references unwritten stop {}",
                    route.xml_id, stop.connectoid
                ))
            })?;
            let arrival = format_time(stop.arrival_offset_s);
            let departure = format_time(stop.departure_offset_s);
            xml.empty(
                "stop",
                &[
                    ("refId", stop_id),
                    ("arrivalOffset", arrival.as_str()),
                    ("departureOffset", departure.as_str()),
                    ("awaitDeparture", "true"),
                ],
            )?;
        }
        xml.end()?;

        xml.start("route", &[])?;
        for segment_id in route.link_segments.iter() {
            let link_id = index
                .segment(segment_id)
                .and_then(|s| id_mappers.link_segments.resolved_id_for(s.segment))
                .ok_or_else(|| {
                    MatsimWriterError::InternalError(format!(
                        "route '{}' references unwritten link segment {segment_id}",
                        route.xml_id
                    ))
                })?;
            xml.empty("link", &[("refId", link_id.as_str())])?;
        }
        xml.end()?;

        xml.start("departures", &[])?;
        for departure in route.departures.iter() {
            let departure_id = id_mappers.departures.id_for(departure);
            let time = format_time(departure.time_s);
            xml.empty(
                "departure",
                &[("id", departure_id.as_str()), ("departureTime", time.as_str())],
            )?;
            stats.departures += 1;
        }
        xml.end()?;

        xml.end()?;
        stats.routes += 1;
        Ok(())
    }
}

/// a route can be written when it has stops and all of its stops and link segments
/// are part of the output
fn route_is_writable(
    line: &ServiceLine,
    route: &ServiceRoute,
    stop_ids: &HashMap<ConnectoidId, &str>,
    emitted_segments: &HashSet<LinkSegmentId>,
) -> bool {
    if route.stops.is_empty() {
        log::warn!(
            "route '{}' of transit line '{}' has no stops, route dropped",
            route.xml_id,
            line.xml_id
        );
        return false;
    }
    if let Some(stop) = route.stops.iter().find(|s| !stop_ids.contains_key(&s.connectoid)) {
        log::warn!(
            "route '{}' of transit line '{}' serves dropped stop {}, route dropped",
            route.xml_id,
            line.xml_id,
            stop.connectoid
        );
        return false;
    }
    if let Some(segment) = route
        .link_segments
        .iter()
        .find(|s| !emitted_segments.contains(s))
    {
        log::warn!(
            "route '{}' of transit line '{}' traverses link segment {segment} which is not part of the MATSim network, route dropped",
            route.xml_id,
            line.xml_id
        );
        return false;
    }
    true
}
