use crate::layout::{Layout, Placement, Point, Size};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutDump {
    pub width: f32,
    pub height: f32,
    pub tags: Vec<TagDump>,
    #[serde(default)]
    pub dropped: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagDump {
    pub label: String,
    #[serde(default)]
    pub count: u64,
    /// Center of the tag.
    pub x: f32,
    pub y: f32,
    /// Unscaled box.
    pub width: f32,
    pub height: f32,
    pub scale: f32,
}

impl TagDump {
    pub fn placement(&self) -> Placement {
        Placement {
            size: Size::new(self.width, self.height),
            center: Point::new(self.x, self.y),
            scale: self.scale,
        }
    }
}

impl LayoutDump {
    pub fn from_layout(layout: &Layout) -> Self {
        let tags = layout
            .iter_placed()
            .map(|(label, placement)| TagDump {
                label: label.to_string(),
                count: layout.counts.get(label).copied().unwrap_or(0),
                x: placement.center.x,
                y: placement.center.y,
                width: placement.size.width,
                height: placement.size.height,
                scale: placement.scale,
            })
            .collect();

        LayoutDump {
            width: layout.width,
            height: layout.height,
            tags,
            dropped: layout.dropped.clone(),
        }
    }

    /// Placements keyed by label, the shape the reconciler takes as its old
    /// element set.
    pub fn placements(&self) -> BTreeMap<String, Placement> {
        self.tags
            .iter()
            .map(|tag| (tag.label.clone(), tag.placement()))
            .collect()
    }

    /// Rebuild a layout, keeping the dump's tag order as placement order.
    pub fn to_layout(&self) -> Layout {
        let mut layout = Layout::empty(Size::new(self.width, self.height));
        for tag in &self.tags {
            layout.order.push(tag.label.clone());
            layout.counts.insert(tag.label.clone(), tag.count);
            layout.placements.insert(tag.label.clone(), tag.placement());
        }
        layout.dropped = self.dropped.clone();
        layout
    }
}

pub fn write_layout_dump(path: &Path, layout: &Layout) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &LayoutDump::from_layout(layout))?;
    Ok(())
}

pub fn read_layout_dump(path: &Path) -> anyhow::Result<LayoutDump> {
    let file = File::open(path)?;
    let dump = serde_json::from_reader(BufReader::new(file))?;
    Ok(dump)
}
