use serde::{Deserialize, Serialize};

const CLASSIC_PALETTE: [&str; 6] = [
    "#1F4E79", "#2E75B6", "#C55A11", "#548235", "#7030A0", "#BF9000",
];

const MODERN_PALETTE: [&str; 8] = [
    "#3B5BDB", "#0CA678", "#F76707", "#AE3EC9", "#1098AD", "#E03131", "#5C940D", "#495057",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    /// Font size of a tag rendered at scale 1.0.
    pub font_size: f32,
    pub font_weight: String,
    pub text_color: String,
    pub palette: Vec<String>,
    pub background: String,
}

impl Theme {
    pub fn classic() -> Self {
        Self {
            font_family: "\"trebuchet ms\", verdana, arial, sans-serif".to_string(),
            font_size: 14.0,
            font_weight: "normal".to_string(),
            text_color: "#333333".to_string(),
            palette: CLASSIC_PALETTE.iter().map(|c| c.to_string()).collect(),
            background: "#FFFFFF".to_string(),
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 13.0,
            font_weight: "600".to_string(),
            text_color: "#1C2430".to_string(),
            palette: MODERN_PALETTE.iter().map(|c| c.to_string()).collect(),
            background: "#FFFFFF".to_string(),
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "modern" => Some(Self::modern()),
            "classic" | "default" | "base" => Some(Self::classic()),
            _ => None,
        }
    }

    /// Stable color for a label, independent of layout order.
    pub fn color_for(&self, label: &str) -> &str {
        if self.palette.is_empty() {
            return self.text_color.as_str();
        }
        // FNV-1a keeps colors stable across runs and platforms.
        let mut hash: u32 = 0x811c_9dc5;
        for byte in label.as_bytes() {
            hash ^= *byte as u32;
            hash = hash.wrapping_mul(0x0100_0193);
        }
        self.palette[hash as usize % self.palette.len()].as_str()
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_for_is_stable() {
        let theme = Theme::modern();
        assert_eq!(theme.color_for("rust"), theme.color_for("rust"));
        assert!(theme.palette.iter().any(|c| c == theme.color_for("rust")));
    }

    #[test]
    fn empty_palette_falls_back_to_text_color() {
        let mut theme = Theme::classic();
        theme.palette.clear();
        assert_eq!(theme.color_for("x"), theme.text_color);
    }
}
