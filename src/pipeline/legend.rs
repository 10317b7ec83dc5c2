//! Legend: distinct state labels and their colours.
//!
//! Labels get indices in first-encounter order. When unknown synthesis is
//! enabled the unknown entry is inserted first and holds index 0, so colour
//! overrides keyed by index line up with what the user saw when they set
//! them. Lookups go through a label → index map; iteration follows index
//! order.

use crate::config::{StateColorSettings, UnknownSettings};
use crate::palette::ColorPalette;
use serde::Serialize;
use std::collections::HashMap;

/// One legend slot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub index: usize,
    pub label: String,
    pub color: String,
    pub is_unknown: bool,
}

/// Index-ordered label → colour mapping
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Legend {
    entries: Vec<LegendEntry>,
    #[serde(skip)]
    by_label: HashMap<String, usize>,
}

impl Legend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Legend seeded with the synthetic unknown entry at index 0
    pub fn with_unknown(unknown: &UnknownSettings, colors: &StateColorSettings) -> Self {
        let mut legend = Self::new();
        let color = colors
            .override_for(0)
            .map(str::to_string)
            .unwrap_or_else(|| unknown.color.clone());
        legend.push(unknown.label.clone(), color, true);
        legend
    }

    /// Index of `label`, assigning the next free slot on first sight
    ///
    /// A new slot takes the override configured for its index, or the
    /// palette colour keyed by that index.
    pub fn resolve(
        &mut self,
        label: &str,
        colors: &StateColorSettings,
        palette: &mut dyn ColorPalette,
    ) -> usize {
        if let Some(&index) = self.by_label.get(label) {
            return index;
        }
        let index = self.entries.len();
        let color = match colors.override_for(index) {
            Some(color) => color.to_string(),
            None => palette.color_for(&index.to_string()),
        };
        tracing::trace!("Legend slot {} -> {:?} ({})", index, label, color);
        self.push(label.to_string(), color, false)
    }

    fn push(&mut self, label: String, color: String, is_unknown: bool) -> usize {
        let index = self.entries.len();
        self.by_label.insert(label.clone(), index);
        self.entries.push(LegendEntry {
            index,
            label,
            color,
            is_unknown,
        });
        index
    }

    pub fn get(&self, label: &str) -> Option<&LegendEntry> {
        self.by_label.get(label).map(|&i| &self.entries[i])
    }

    pub fn color_of(&self, label: &str) -> Option<&str> {
        self.get(label).map(|e| e.color.as_str())
    }

    pub fn entry(&self, index: usize) -> Option<&LegendEntry> {
        self.entries.get(index)
    }

    /// The synthetic unknown entry, if present
    pub fn unknown(&self) -> Option<&LegendEntry> {
        self.entries.first().filter(|e| e.is_unknown)
    }

    pub fn entries(&self) -> &[LegendEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &LegendEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
