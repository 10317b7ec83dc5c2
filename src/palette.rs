//! Colour palette resolution
//!
//! Legend colours come from a host palette unless the user pinned a colour
//! for that legend index. The palette is a collaborator behind
//! [`ColorPalette`]; [`DefaultPalette`] hands out the stock categorical
//! colours in first-request order, so the same key always maps to the same
//! colour for the lifetime of the palette.

use std::collections::HashMap;

/// Stock categorical palette
pub const DEFAULT_COLORS: &[&str] = &[
    "#01B8AA", "#374649", "#FD625E", "#F2C80F", "#5F6B6D", "#8AD4EB", "#FE9666", "#A66999",
];

/// Source of colours keyed by an arbitrary string
pub trait ColorPalette {
    fn color_for(&mut self, key: &str) -> String;
}

/// Cycles through [`DEFAULT_COLORS`], remembering each key's colour
#[derive(Debug, Default, Clone)]
pub struct DefaultPalette {
    assigned: HashMap<String, String>,
}

impl DefaultPalette {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ColorPalette for DefaultPalette {
    fn color_for(&mut self, key: &str) -> String {
        if let Some(color) = self.assigned.get(key) {
            return color.clone();
        }
        let color = DEFAULT_COLORS[self.assigned.len() % DEFAULT_COLORS.len()].to_string();
        self.assigned.insert(key.to_string(), color.clone());
        color
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_key_same_color() {
        let mut palette = DefaultPalette::new();
        let first = palette.color_for("0");
        palette.color_for("1");
        assert_eq!(palette.color_for("0"), first);
        assert_eq!(palette.color_for("2"), DEFAULT_COLORS[2]);
    }

    #[test]
    fn test_colors_cycle() {
        let mut palette = DefaultPalette::new();
        let colors: Vec<String> = (0..DEFAULT_COLORS.len() + 1)
            .map(|i| palette.color_for(&i.to_string()))
            .collect();
        assert_eq!(colors[0], DEFAULT_COLORS[0]);
        assert_eq!(colors[DEFAULT_COLORS.len()], DEFAULT_COLORS[0]);
        assert_ne!(colors[0], colors[1]);
    }
}
