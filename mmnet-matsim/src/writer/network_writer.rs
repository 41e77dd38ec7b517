use std::collections::{BTreeSet, HashSet};
use std::path::PathBuf;

use indexmap::IndexMap;
use itertools::Itertools;
use kdam::tqdm;
use mmnet_core::{
    id_mapping::IdMappers,
    model::{Link, LinkSegment, LinkSegmentId, ModeId, NetworkIndex, NetworkLayer, Node, SegmentRef},
};
use serde::{Deserialize, Serialize};

use super::{
    coordinates::CoordinateFormatter,
    format::{format_decimal, kmh_to_meters_per_second, meters_to_km},
    geometry_writer::DetailedGeometryWriter,
    link_attributes::LinkAttributeFunctions,
    xml_writer::XmlDocumentWriter,
    MatsimWriterError,
};
use crate::{config::MatsimWriterConfig, util::fs::OutputSink};

pub const NETWORK_DOCTYPE: &str =
    r#"network SYSTEM "http://www.matsim.org/files/dtd/network_v2.dtd""#;
/// period the link capacities refer to
pub const CAPACITY_PERIOD: &str = "01:00:00";
/// road space occupied by one vehicle, in metres
pub const EFFECTIVE_CELL_SIZE: &str = "7.5";
/// width of one lane, in metres
pub const EFFECTIVE_LANE_WIDTH: &str = "3.75";
/// decimals of link length, speed and capacity
const LINK_ATTRIBUTE_DECIMALS: usize = 3;

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct NetworkWriterStats {
    pub nodes: usize,
    /// nodes written without coordinates
    pub nodes_without_position: usize,
    /// MATSim links, one per emitted link segment
    pub links: usize,
    /// link segments without any activated and mapped mode
    pub dropped_link_segments: usize,
    pub total_length_km: f64,
    /// number of links each MATSim mode may use
    pub links_per_mode: IndexMap<String, usize>,
    pub detailed_geometries: usize,
    pub missing_detailed_geometries: usize,
}

/// everything downstream writers need from the network writer
pub struct NetworkWriterOutput {
    /// the identifier mappers used for the network, to be reused for references to it
    pub id_mappers: IdMappers,
    pub emitted_segments: HashSet<LinkSegmentId>,
    pub stats: NetworkWriterStats,
    pub files: Vec<PathBuf>,
}

/// writes the physical network as a MATSim network document, one MATSim link per
/// directed link segment that supports at least one activated and mapped mode.
pub struct MatsimNetworkWriter<'a> {
    config: &'a MatsimWriterConfig,
    coordinates: &'a CoordinateFormatter<'a>,
    mode_tokens: &'a IndexMap<ModeId, String>,
    link_attributes: LinkAttributeFunctions,
}

impl<'a> MatsimNetworkWriter<'a> {
    pub fn new(
        config: &'a MatsimWriterConfig,
        coordinates: &'a CoordinateFormatter<'a>,
        mode_tokens: &'a IndexMap<ModeId, String>,
        link_attributes: LinkAttributeFunctions,
    ) -> Self {
        Self {
            config,
            coordinates,
            mode_tokens,
            link_attributes,
        }
    }

    pub fn write(
        &self,
        layer: &NetworkLayer,
        index: &NetworkIndex,
    ) -> Result<NetworkWriterOutput, MatsimWriterError> {
        let path = self.config.network_file();
        log::info!("writing MATSim network to '{}'", path.display());

        let mut id_mappers = IdMappers::new(self.config.id_mapping);
        let mut stats = NetworkWriterStats::default();
        let mut emitted_segments = HashSet::new();
        let mut geometry_writer = if self.config.generate_detailed_geometry {
            Some(DetailedGeometryWriter::create(
                &self.config.detailed_geometry_file(),
                self.config.compress,
            )?)
        } else {
            None
        };

        let sink = OutputSink::create(&path, self.config.compress)?;
        let mut xml = XmlDocumentWriter::new(sink);
        xml.write_prologue(NETWORK_DOCTYPE)?;
        xml.start("network", &[])?;

        xml.start("nodes", &[])?;
        let node_iter = tqdm!(layer.nodes.iter(), total = layer.nodes.len(), desc = "write nodes");
        for node in node_iter {
            self.write_node(&mut xml, node, &mut id_mappers, &mut stats)?;
        }
        eprintln!();
        xml.end()?;

        xml.start(
            "links",
            &[
                ("capperiod", CAPACITY_PERIOD),
                ("effectivecellsize", EFFECTIVE_CELL_SIZE),
                ("effectivelanewidth", EFFECTIVE_LANE_WIDTH),
            ],
        )?;
        let link_iter = tqdm!(layer.links.iter(), total = layer.links.len(), desc = "write links");
        for link in link_iter {
            for (heading, segment) in link.segments() {
                let segment_ref = SegmentRef {
                    link,
                    segment,
                    heading,
                };
                let written =
                    self.write_link(&mut xml, &segment_ref, index, &mut id_mappers, &mut stats)?;
                let Some(matsim_id) = written else {
                    continue;
                };
                emitted_segments.insert(segment.id);
                if let Some(geometry_writer) = geometry_writer.as_mut() {
                    geometry_writer.write_segment(&matsim_id, link, heading, self.coordinates)?;
                }
            }
        }
        eprintln!();
        xml.end()?;

        xml.end()?;
        let sink = xml.finish()?;
        sink.finish(&path)?;

        let mut files = vec![path];
        if let Some(geometry_writer) = geometry_writer {
            stats.detailed_geometries = geometry_writer.written();
            stats.missing_detailed_geometries = geometry_writer.missing();
            files.push(geometry_writer.path().to_owned());
            geometry_writer.finish()?;
        }

        log::info!(
            "wrote {} nodes and {} links, dropped {} link segments without supported modes",
            stats.nodes,
            stats.links,
            stats.dropped_link_segments
        );
        Ok(NetworkWriterOutput {
            id_mappers,
            emitted_segments,
            stats,
            files,
        })
    }

    fn write_node(
        &self,
        xml: &mut XmlDocumentWriter<OutputSink>,
        node: &Node,
        id_mappers: &mut IdMappers,
        stats: &mut NetworkWriterStats,
    ) -> Result<(), MatsimWriterError> {
        let id = id_mappers.nodes.id_for(node);
        stats.nodes += 1;
        let coord = match node.position.as_ref() {
            Some(position) => match self.coordinates.project(position) {
                Ok(coord) => Some(coord),
                Err(e) => {
                    log::warn!("unable to transform position of node '{}': {e}", node.xml_id);
                    None
                }
            },
            None => {
                log::warn!("node '{}' has no position", node.xml_id);
                None
            }
        };
        match coord {
            Some(coord) => {
                let (x, y) = self.coordinates.format_coord(coord);
                xml.empty("node", &[("id", id.as_str()), ("x", x.as_str()), ("y", y.as_str())])
            }
            None => {
                stats.nodes_without_position += 1;
                xml.empty("node", &[("id", id.as_str())])
            }
        }
    }

    /// writes the MATSim link of one segment.
    ///
    /// # Returns
    ///
    /// * the MATSim id of the link, or None when the segment supports no output mode
    fn write_link(
        &self,
        xml: &mut XmlDocumentWriter<OutputSink>,
        segment_ref: &SegmentRef,
        index: &NetworkIndex,
        id_mappers: &mut IdMappers,
        stats: &mut NetworkWriterStats,
    ) -> Result<Option<String>, MatsimWriterError> {
        let SegmentRef { link, segment, .. } = *segment_ref;
        let modes = segment
            .allowed_modes
            .iter()
            .filter_map(|m| self.mode_tokens.get(m).map(String::as_str))
            .collect::<BTreeSet<_>>();
        if modes.is_empty() {
            log::debug!(
                "link segment '{}' supports no activated MATSim mode, dropped",
                segment.xml_id
            );
            stats.dropped_link_segments += 1;
            return Ok(None);
        }

        let segment_type = index.segment_type_of(segment)?;
        let from = index.upstream_node_of(segment_ref)?;
        let to = index.downstream_node_of(segment_ref)?;

        let id = id_mappers.link_segments.id_for(segment);
        let from_id = id_mappers.nodes.id_for(from);
        let to_id = id_mappers.nodes.id_for(to);
        let geographic = self.coordinates.crs().source_is_geographic();
        let length = index.link_length_meters(link, geographic).unwrap_or_else(|| {
            log::warn!(
                "length of link '{}' cannot be determined without geometry or node positions",
                link.xml_id
            );
            0.0
        });
        let speed = kmh_to_meters_per_second(self.free_speed_kmh(segment, index));

        let mut attributes = vec![
            ("id", id.clone()),
            ("from", from_id),
            ("to", to_id),
            ("length", format_decimal(length, LINK_ATTRIBUTE_DECIMALS)),
            ("freespeed", format_decimal(speed, LINK_ATTRIBUTE_DECIMALS)),
            (
                "capacity",
                format_decimal(segment.capacity_pcuh(segment_type), LINK_ATTRIBUTE_DECIMALS),
            ),
            ("permlanes", segment.lanes.to_string()),
            ("oneway", String::from("1")),
            ("modes", modes.iter().join(",")),
        ];
        if let Some(origid) = original_id(link, segment) {
            attributes.push(("origid", origid.to_string()));
        }
        attributes.extend(self.link_attributes.evaluate(segment, segment_type));
        let attribute_refs = attributes
            .iter()
            .map(|(k, v)| (*k, v.as_str()))
            .collect::<Vec<_>>();
        xml.empty("link", &attribute_refs)?;

        stats.links += 1;
        stats.total_length_km += meters_to_km(length);
        for mode in modes {
            *stats.links_per_mode.entry(mode.to_string()).or_insert(0) += 1;
        }
        Ok(Some(id))
    }

    /// the physical speed limit, optionally capped by the slowest activated mode
    /// allowed on the segment
    fn free_speed_kmh(&self, segment: &LinkSegment, index: &NetworkIndex) -> f64 {
        if !self.config.restrict_link_speed_by_supported_modes {
            return segment.max_speed_kmh;
        }
        segment
            .allowed_modes
            .iter()
            .filter(|m| self.mode_tokens.contains_key(*m))
            .filter_map(|m| index.mode(m))
            .map(|m| m.max_speed_kmh)
            .fold(segment.max_speed_kmh, f64::min)
    }
}

/// external id of the segment, else of its link
fn original_id<'l>(link: &'l Link, segment: &'l LinkSegment) -> Option<&'l str> {
    [segment.external_id.as_deref(), link.external_id.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|id| !id.is_empty())
}
