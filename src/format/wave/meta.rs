//! Tag and cue point editing
//!
//! Convenience API over the LIST chunks: free-text INFO tags and
//! cue points with their adtl labels. Cue points are kept sorted by
//! sample offset and renumbered 1..N on every edit, with the adtl
//! label entries rebuilt to match.

use super::chunks::{CueChunk, CuePoint, ListChunk, ListFormat, ListItem};
use super::WaveFile;
use crate::error::{Error, Result};

/// One cue point with its resolved label
#[derive(Debug, Clone, PartialEq)]
pub struct CueEntry {
    /// 1-based cue point id (`dw_name`)
    pub id: u32,
    /// Position in milliseconds, derived from the sample offset
    pub position_ms: f64,
    /// Sample offset into the data chunk
    pub sample_offset: u32,
    /// Label text from the adtl list, empty when unlabeled
    pub label: String,
}

impl WaveFile {
    /// All INFO tags in list order.
    pub fn list_tags(&self) -> Vec<(String, String)> {
        let mut tags = Vec::new();
        for list in &self.lists {
            if list.format != ListFormat::Info {
                continue;
            }
            for item in &list.items {
                if let ListItem::Info { tag, text } = item {
                    tags.push((tag.trim_end().to_string(), text.clone()));
                }
            }
        }
        tags
    }

    /// Look up one INFO tag by id.
    pub fn get_tag(&self, tag: &str) -> Option<String> {
        let wanted = padded_tag(tag).ok()?;
        self.lists
            .iter()
            .filter(|list| list.format == ListFormat::Info)
            .flat_map(|list| &list.items)
            .find_map(|item| match item {
                ListItem::Info { tag, text } if padded(tag) == wanted => Some(text.clone()),
                _ => None,
            })
    }

    /// Create or overwrite one INFO tag.
    pub fn set_tag(&mut self, tag: &str, value: &str) -> Result<()> {
        let wanted = padded_tag(tag)?;
        let list = self.list_mut(ListFormat::Info);
        for item in &mut list.items {
            if let ListItem::Info { tag, text } = item {
                if padded(tag) == wanted {
                    *text = value.to_string();
                    return Ok(());
                }
            }
        }
        list.items.push(ListItem::Info {
            tag: wanted,
            text: value.to_string(),
        });
        Ok(())
    }

    /// Remove one INFO tag. Returns whether it existed.
    pub fn delete_tag(&mut self, tag: &str) -> bool {
        let Ok(wanted) = padded_tag(tag) else {
            return false;
        };
        let mut found = false;
        for list in &mut self.lists {
            if list.format != ListFormat::Info {
                continue;
            }
            list.items.retain(|item| match item {
                ListItem::Info { tag, .. } if padded(tag) == wanted => {
                    found = true;
                    false
                }
                _ => true,
            });
        }
        found
    }

    /// All cue points with their labels, in cue chunk order.
    pub fn list_cue_points(&self) -> Result<Vec<CueEntry>> {
        let rate = f64::from(self.fmt_ref()?.sample_rate);
        let Some(cue) = &self.cue else {
            return Ok(Vec::new());
        };
        Ok(cue
            .points
            .iter()
            .map(|point| CueEntry {
                id: point.dw_name,
                position_ms: f64::from(point.dw_sample_offset) / rate * 1000.0,
                sample_offset: point.dw_sample_offset,
                label: self.cue_label(point.dw_name).unwrap_or_default(),
            })
            .collect())
    }

    /// Add a cue point at a position in milliseconds.
    ///
    /// Points are re-sorted by offset and renumbered, and the adtl
    /// label list is rebuilt to match.
    pub fn set_cue_point(&mut self, position_ms: f64, label: &str) -> Result<()> {
        let rate = f64::from(self.fmt_ref()?.sample_rate);
        if !(position_ms >= 0.0) {
            return Err(Error::validation("Cue position must be non-negative"));
        }
        let offset = (position_ms * rate / 1000.0) as u32;

        let mut entries: Vec<(u32, String)> = Vec::new();
        if let Some(cue) = &self.cue {
            for point in &cue.points {
                let label = self.cue_label(point.dw_name).unwrap_or_default();
                entries.push((point.dw_sample_offset, label));
            }
        }
        entries.push((offset, label.to_string()));
        entries.sort_by_key(|&(offset, _)| offset);
        self.rewrite_cue_points(entries);
        Ok(())
    }

    /// Remove a cue point by 1-based id. Returns whether it existed.
    pub fn delete_cue_point(&mut self, id: u32) -> bool {
        let Some(cue) = &self.cue else {
            return false;
        };
        let mut found = false;
        let mut entries: Vec<(u32, String)> = Vec::new();
        for point in &cue.points {
            if point.dw_name == id {
                found = true;
                continue;
            }
            let label = self.cue_label(point.dw_name).unwrap_or_default();
            entries.push((point.dw_sample_offset, label));
        }
        if found {
            self.rewrite_cue_points(entries);
        }
        found
    }

    /// Change the label of a cue point by 1-based id.
    pub fn update_label(&mut self, id: u32, label: &str) -> bool {
        let exists = self
            .cue
            .as_ref()
            .is_some_and(|cue| cue.points.iter().any(|point| point.dw_name == id));
        if !exists {
            return false;
        }
        let list = self.list_mut(ListFormat::Adtl);
        for item in &mut list.items {
            if let ListItem::Label { cue_id, text } = item {
                if *cue_id == id {
                    *text = label.to_string();
                    return true;
                }
            }
        }
        list.items.push(ListItem::Label {
            cue_id: id,
            text: label.to_string(),
        });
        true
    }

    /// The adtl label text for a cue id, if any.
    fn cue_label(&self, id: u32) -> Option<String> {
        self.lists
            .iter()
            .filter(|list| list.format == ListFormat::Adtl)
            .flat_map(|list| &list.items)
            .find_map(|item| match item {
                ListItem::Label { cue_id, text } if *cue_id == id => Some(text.clone()),
                _ => None,
            })
    }

    /// Replace the cue chunk and adtl labels from sorted entries.
    fn rewrite_cue_points(&mut self, entries: Vec<(u32, String)>) {
        let points = entries
            .iter()
            .enumerate()
            .map(|(index, (offset, _))| CuePoint {
                dw_name: index as u32 + 1,
                dw_position: *offset,
                fcc_chunk: *b"data",
                dw_sample_offset: *offset,
                ..CuePoint::default()
            })
            .collect();
        self.cue = Some(CueChunk { points });

        let list = self.list_mut(ListFormat::Adtl);
        list.items
            .retain(|item| !matches!(item, ListItem::Label { .. }));
        for (index, (_, label)) in entries.into_iter().enumerate() {
            list.items.push(ListItem::Label {
                cue_id: index as u32 + 1,
                text: label,
            });
        }
    }

    /// The first LIST chunk with this format, created on demand.
    fn list_mut(&mut self, format: ListFormat) -> &mut ListChunk {
        let index = match self.lists.iter().position(|list| list.format == format) {
            Some(index) => index,
            None => {
                self.lists.push(ListChunk {
                    format,
                    items: Vec::new(),
                });
                self.lists.len() - 1
            }
        };
        &mut self.lists[index]
    }
}

/// INFO tag ids are exactly 4 bytes, space-padded on disk.
fn padded_tag(tag: &str) -> Result<String> {
    if tag.is_empty() || tag.len() > 4 || !tag.is_ascii() {
        return Err(Error::validation(format!("Invalid INFO tag id {:?}", tag)));
    }
    Ok(format!("{:<4}", tag))
}

fn padded(tag: &str) -> String {
    format!("{:<4}", tag.trim_end())
}
