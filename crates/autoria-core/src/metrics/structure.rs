//! Structural penalty from markdown formatting density.
//!
//! Heavily formatted answers (many headings, bold phrases, and numbered
//! steps) are typical of chat assistants. Each component costs
//! [`POINTS_PER_EXCESS`] per occurrence above its threshold, capped at
//! [`COMPONENT_CAP`]; the combined penalty never drops below [`PENALTY_FLOOR`].

use pulldown_cmark::{Event, Parser, Tag, TagEnd};

use super::reports::StructureReport;

/// Headings tolerated before the penalty starts.
pub const HEADING_THRESHOLD: usize = 6;
/// Bold spans tolerated before the penalty starts.
pub const BOLD_THRESHOLD: usize = 8;
/// Numbered-list items tolerated before the penalty starts.
pub const NUMBERED_THRESHOLD: usize = 12;
/// Cost of each occurrence above a threshold.
pub const POINTS_PER_EXCESS: f64 = 2.0;
/// Most a single component can cost.
pub const COMPONENT_CAP: f64 = 15.0;
/// Lowest combined penalty.
pub const PENALTY_FLOOR: f64 = -30.0;

/// Count markdown structure in `text` and derive the penalty.
#[tracing::instrument(skip_all, fields(text_len = text.len()))]
pub fn structural_penalty(text: &str) -> StructureReport {
    let mut headings = 0;
    let mut bold_spans = 0;
    let mut numbered_items = 0;
    // One entry per open list: true when ordered.
    let mut lists: Vec<bool> = Vec::new();

    for event in Parser::new(text) {
        match event {
            Event::Start(Tag::Heading { .. }) => headings += 1,
            Event::Start(Tag::Strong) => bold_spans += 1,
            Event::Start(Tag::List(start)) => lists.push(start.is_some()),
            Event::End(TagEnd::List(_)) => {
                lists.pop();
            }
            Event::Start(Tag::Item) if lists.last() == Some(&true) => numbered_items += 1,
            _ => {}
        }
    }

    let penalty = (component(headings, HEADING_THRESHOLD)
        + component(bold_spans, BOLD_THRESHOLD)
        + component(numbered_items, NUMBERED_THRESHOLD))
    .max(PENALTY_FLOOR);

    StructureReport {
        headings,
        bold_spans,
        numbered_items,
        penalty,
    }
}

fn component(count: usize, threshold: usize) -> f64 {
    let excess = count.saturating_sub(threshold) as f64;
    -(excess * POINTS_PER_EXCESS).min(COMPONENT_CAP)
}
