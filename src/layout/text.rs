use crate::config::LayoutConfig;
use crate::ir::TagSet;
use crate::text_metrics;
use crate::theme::Theme;

use super::{Size, SizedTag};

/// Box a tag occupies at scale 1.0 when set in the theme font.
pub fn measure_tag(label: &str, theme: &Theme, config: &LayoutConfig) -> Size {
    let font_size = theme.font_size.max(1.0);
    let width = text_width(
        label,
        font_size,
        theme.font_family.as_str(),
        theme.font_weight.as_str(),
        config.fast_text_metrics,
    );
    let height = font_size * config.label_line_height;
    Size::new(
        width + config.label_padding_x.max(0.0) * 2.0,
        height + config.label_padding_y.max(0.0) * 2.0,
    )
}

/// Measure every tag of `tags`, in label order.
pub fn measure_tags(tags: &TagSet, theme: &Theme, config: &LayoutConfig) -> Vec<SizedTag> {
    tags.iter()
        .map(|(label, count)| SizedTag::new(label, count, measure_tag(label, theme, config)))
        .collect()
}

pub(super) fn text_width(
    text: &str,
    font_size: f32,
    font_family: &str,
    font_weight: &str,
    fast_metrics: bool,
) -> f32 {
    let measured = if fast_metrics {
        None
    } else {
        text_metrics::measure_text_width(text, font_size, font_family, font_weight)
    };
    if let Some(width) = measured {
        return width;
    }
    let weight = text_metrics::parse_font_weight(font_weight);
    fallback_text_width(text, font_size) * text_metrics::synthetic_bold_factor(weight, 400)
}

fn fallback_text_width(text: &str, font_size: f32) -> f32 {
    text.chars().map(char_width_factor).sum::<f32>() * font_size
}

/// Approximate advance of `ch` in ems for a proportional sans-serif face.
pub(super) fn char_width_factor(ch: char) -> f32 {
    match ch {
        'i' | 'j' | 'l' | '\'' | '|' | '!' | '.' | ',' | ':' | ';' => 0.25,
        'f' | 'r' | 't' | 'I' | '(' | ')' | '[' | ']' | '-' => 0.34,
        ' ' => 0.3,
        'm' | 'w' => 0.84,
        'M' | 'W' => 0.93,
        '@' | '%' | '&' | '#' => 0.9,
        'A'..='Z' => 0.67,
        'a'..='z' => 0.56,
        '0'..='9' => 0.58,
        c if c.is_ascii() => 0.5,
        // CJK and other wide scripts occupy roughly a full em.
        c if is_wide(c) => 1.0,
        _ => 0.6,
    }
}

fn is_wide(ch: char) -> bool {
    matches!(ch as u32,
        0x1100..=0x115F
        | 0x2E80..=0xA4CF
        | 0xAC00..=0xD7A3
        | 0xF900..=0xFAFF
        | 0xFE30..=0xFE4F
        | 0xFF00..=0xFF60
        | 0xFFE0..=0xFFE6
        | 0x20000..=0x3FFFD)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_width_factor_returns_positive_values() {
        for ch in ['a', 'Z', ' ', '0', '@', '\u{4e2d}', 'é'] {
            assert!(char_width_factor(ch) > 0.0, "char {:?} has zero width", ch);
        }
    }

    #[test]
    fn wide_chars_are_wider_than_latin() {
        assert!(char_width_factor('\u{4e2d}') > char_width_factor('a'));
    }

    #[test]
    fn fallback_text_width_scales_with_font_size() {
        let w16 = fallback_text_width("Hello", 16.0);
        let w32 = fallback_text_width("Hello", 32.0);
        assert!((w32 - w16 * 2.0).abs() < 0.01, "width should double with font size");
    }

    #[test]
    fn measure_tag_includes_padding_and_line_height() {
        let theme = Theme::classic();
        let config = LayoutConfig {
            fast_text_metrics: true,
            ..LayoutConfig::default()
        };
        let size = measure_tag("rust", &theme, &config);
        let text = fallback_text_width("rust", theme.font_size);
        assert!((size.width - (text + config.label_padding_x * 2.0)).abs() < 1e-4);
        let expected_height =
            theme.font_size * config.label_line_height + config.label_padding_y * 2.0;
        assert!((size.height - expected_height).abs() < 1e-4);
    }

    #[test]
    fn heavy_theme_weight_widens_the_box() {
        let config = LayoutConfig {
            fast_text_metrics: true,
            ..LayoutConfig::default()
        };
        let regular = Theme {
            font_weight: "normal".to_string(),
            ..Theme::modern()
        };
        let semibold = Theme {
            font_weight: "600".to_string(),
            ..Theme::modern()
        };
        let light = measure_tag("collision", &regular, &config);
        let heavy = measure_tag("collision", &semibold, &config);
        assert!(heavy.width > light.width);
        assert_eq!(heavy.height, light.height);
    }

    #[test]
    fn measure_tags_keeps_counts() {
        let tags: TagSet = [("alpha", 4), ("beta", 9)].into_iter().collect();
        let config = LayoutConfig {
            fast_text_metrics: true,
            ..LayoutConfig::default()
        };
        let sized = measure_tags(&tags, &Theme::modern(), &config);
        assert_eq!(sized.len(), 2);
        assert_eq!(sized[0].label, "alpha");
        assert_eq!(sized[1].count, 9);
        assert!(sized.iter().all(|t| t.size.width > 0.0));
    }
}
