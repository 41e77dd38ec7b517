use std::path::PathBuf;

use super::{LinkId, LinkSegmentId, LinkSegmentTypeId, NodeId};

#[derive(thiserror::Error, Debug)]
pub enum ModelError {
    #[error("network must consist of exactly one layer, found {0}")]
    UnsupportedLayerCount(usize),
    #[error("network layer of kind '{0}' is not supported, expected a macroscopic layer")]
    UnsupportedLayerKind(String),
    #[error("link segment {0} has no link segment type")]
    MissingLinkSegmentType(LinkSegmentId),
    #[error("link segment {segment} references link segment type {segment_type} which is not part of the network layer")]
    UnknownLinkSegmentType {
        segment: LinkSegmentId,
        segment_type: LinkSegmentTypeId,
    },
    #[error("link {link} references node {node} which is not part of the network layer")]
    UnknownNode { link: LinkId, node: NodeId },
    #[error("duplicate {category} id {id} in network layer")]
    DuplicateId { category: &'static str, id: usize },
    #[error("Error reading from '{path}': {message}")]
    ReadError { path: PathBuf, message: String },
}
