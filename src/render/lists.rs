//! Grouping of list-item blocks into list wrappers.
//!
//! Portable text has no list container: each list item is a standalone text
//! block tagged with a list kind and depth. Rendering needs the wrappers
//! back, so contiguous items sharing the same kind *and* depth form one run.
//! A run ends when the kind changes, the depth changes, or any non-list
//! block interrupts the sequence.

use crate::blocks::{ContentBlock, ListItem, TextBlock};

/// A unit of output: one standalone block or one list run.
#[derive(Debug, PartialEq)]
pub enum Segment<'a> {
    Block(&'a ContentBlock),
    List {
        item: ListItem,
        items: Vec<&'a TextBlock>,
    },
}

/// Split a document into segments, preserving order.
pub fn segments(blocks: &[ContentBlock]) -> Vec<Segment<'_>> {
    let mut out: Vec<Segment<'_>> = Vec::new();

    for block in blocks {
        let list_item = match block {
            ContentBlock::Text(text) => text.list.map(|item| (item, text)),
            _ => None,
        };

        let Some((item, text)) = list_item else {
            out.push(Segment::Block(block));
            continue;
        };

        if let Some(Segment::List { item: run, items }) = out.last_mut()
            && *run == item
        {
            items.push(text);
            continue;
        }
        out.push(Segment::List {
            item,
            items: vec![text],
        });
    }

    out
}
