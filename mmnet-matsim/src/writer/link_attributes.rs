use mmnet_core::model::{LinkSegment, LinkSegmentType};

/// derives an optional attribute value of a MATSim link from the segment it is written for
pub type LinkAttributeFn = fn(&LinkSegment, &LinkSegmentType) -> Option<String>;

/// optional attributes written on every MATSim link. an absent function or a `None`
/// result omits the attribute.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkAttributeFunctions {
    /// `nt_category`
    pub nt_category: Option<LinkAttributeFn>,
    /// `nt_type`
    pub nt_type: Option<LinkAttributeFn>,
    /// `type`
    pub link_type: Option<LinkAttributeFn>,
}

impl LinkAttributeFunctions {
    /// all attributes evaluated for one segment as (attribute name, value)
    pub fn evaluate(
        &self,
        segment: &LinkSegment,
        segment_type: &LinkSegmentType,
    ) -> Vec<(&'static str, String)> {
        [
            ("nt_category", self.nt_category),
            ("nt_type", self.nt_type),
            ("type", self.link_type),
        ]
        .into_iter()
        .filter_map(|(name, f)| f.and_then(|f| f(segment, segment_type)).map(|v| (name, v)))
        .collect()
    }
}

/// the name of the link segment type, when it has a non-blank one
pub fn segment_type_name(_segment: &LinkSegment, segment_type: &LinkSegmentType) -> Option<String> {
    segment_type
        .name
        .as_ref()
        .map(|n| n.trim())
        .filter(|n| !n.is_empty())
        .map(String::from)
}
