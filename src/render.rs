use crate::config::RenderConfig;
use crate::layout::{Layout, Placement, Size};
use crate::reconcile::{ElementSurface, apply, reconcile};
use crate::theme::Theme;
use anyhow::Result;
use std::collections::BTreeMap;
use std::path::Path;

/// One tag element on the SVG surface.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgTag {
    pub label: String,
    pub placement: Placement,
    /// Placement to animate from when the tag moved.
    pub from: Option<Placement>,
    /// Fade in on first appearance.
    pub entering: bool,
    pub color: String,
}

/// Reference element surface that renders tag elements as SVG text.
///
/// Removed elements are kept aside when animating so they can fade out.
#[derive(Debug, Clone)]
pub struct SvgSurface {
    theme: Theme,
    exiting: Vec<SvgTag>,
}

impl SvgSurface {
    pub fn new(theme: &Theme) -> Self {
        Self {
            theme: theme.clone(),
            exiting: Vec::new(),
        }
    }

    /// Element for a tag that was already on screen before this render.
    pub fn settled(&self, label: &str, placement: Placement) -> SvgTag {
        SvgTag {
            label: label.to_string(),
            placement,
            from: None,
            entering: false,
            color: self.theme.color_for(label).to_string(),
        }
    }

    pub fn exiting(&self) -> &[SvgTag] {
        &self.exiting
    }

    pub fn render(
        &self,
        elements: &BTreeMap<String, SvgTag>,
        canvas: Size,
        render: &RenderConfig,
    ) -> String {
        let theme = &self.theme;
        let width = canvas.width.max(1.0);
        let height = canvas.height.max(1.0);
        let dur = format!("{}ms", render.animation_ms);

        let mut svg = String::new();
        svg.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
        ));
        svg.push_str(&format!(
            "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
            escape_xml(&render.background)
        ));

        for tag in &self.exiting {
            svg.push_str(&tag_svg(tag, theme, &dur, TagState::Exiting));
        }
        for tag in elements.values() {
            let state = if tag.entering {
                TagState::Entering
            } else if tag.from.is_some() {
                TagState::Moving
            } else {
                TagState::Static
            };
            svg.push_str(&tag_svg(tag, theme, &dur, state));
        }

        svg.push_str("</svg>");
        svg
    }
}

impl ElementSurface for SvgSurface {
    type Handle = SvgTag;

    fn create(&mut self, label: &str, placement: &Placement, animate: bool) -> SvgTag {
        SvgTag {
            label: label.to_string(),
            placement: *placement,
            from: None,
            entering: animate,
            color: self.theme.color_for(label).to_string(),
        }
    }

    fn update(&mut self, _label: &str, handle: &mut SvgTag, placement: &Placement, animate: bool) {
        handle.from = if animate && handle.placement != *placement {
            Some(handle.placement)
        } else {
            None
        };
        handle.placement = *placement;
        handle.entering = false;
    }

    fn remove(&mut self, _label: &str, mut handle: SvgTag, animate: bool) {
        if animate {
            handle.from = None;
            handle.entering = false;
            self.exiting.push(handle);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagState {
    Static,
    Entering,
    Moving,
    Exiting,
}

fn tag_svg(tag: &SvgTag, theme: &Theme, dur: &str, state: TagState) -> String {
    let p = &tag.placement;
    let mut out = String::new();

    let opacity = if state == TagState::Exiting {
        " opacity=\"0\""
    } else {
        ""
    };
    out.push_str(&format!(
        "<g class=\"tag\" data-label=\"{}\" transform=\"translate({:.2} {:.2})\"{opacity}>",
        escape_xml(&tag.label),
        p.center.x,
        p.center.y
    ));
    match state {
        TagState::Entering => out.push_str(&format!(
            "<animate attributeName=\"opacity\" from=\"0\" to=\"1\" dur=\"{dur}\" fill=\"freeze\"/>"
        )),
        TagState::Exiting => out.push_str(&format!(
            "<animate attributeName=\"opacity\" from=\"1\" to=\"0\" dur=\"{dur}\" fill=\"freeze\"/>"
        )),
        TagState::Moving => {
            if let Some(from) = tag.from {
                out.push_str(&format!(
                    "<animateTransform attributeName=\"transform\" type=\"translate\" from=\"{:.2} {:.2}\" to=\"{:.2} {:.2}\" dur=\"{dur}\" fill=\"freeze\"/>",
                    from.center.x, from.center.y, p.center.x, p.center.y
                ));
            }
        }
        TagState::Static => {}
    }

    out.push_str(&format!("<g transform=\"scale({:.4})\">", p.scale));
    if let (TagState::Moving, Some(from)) = (state, tag.from) {
        out.push_str(&format!(
            "<animateTransform attributeName=\"transform\" type=\"scale\" from=\"{:.4}\" to=\"{:.4}\" dur=\"{dur}\" fill=\"freeze\"/>",
            from.scale, p.scale
        ));
    }
    out.push_str(&format!(
        "<text x=\"0\" y=\"0\" text-anchor=\"middle\" dominant-baseline=\"central\" font-family=\"{}\" font-size=\"{}\" font-weight=\"{}\" fill=\"{}\">{}</text>",
        escape_xml(&theme.font_family),
        theme.font_size,
        escape_xml(&theme.font_weight),
        escape_xml(&tag.color),
        escape_xml(&tag.label)
    ));
    out.push_str("</g></g>");
    out
}

/// Render a layout from scratch: every placed tag is a new, static element.
pub fn render_svg(layout: &Layout, theme: &Theme, render: &RenderConfig) -> String {
    render_transition_svg(&BTreeMap::new(), layout, theme, render, false)
}

/// Render `layout` as the successor of `previous`, reusing elements by label.
///
/// With `animate`, reused tags slide and rescale from their old placement,
/// new tags fade in, and tags absent from `layout` fade out.
pub fn render_transition_svg(
    previous: &BTreeMap<String, Placement>,
    layout: &Layout,
    theme: &Theme,
    render: &RenderConfig,
    animate: bool,
) -> String {
    let mut surface = SvgSurface::new(theme);
    let old: BTreeMap<String, SvgTag> = previous
        .iter()
        .map(|(label, placement)| (label.clone(), surface.settled(label, *placement)))
        .collect();
    let plan = reconcile(&old, layout);
    let elements = apply(&mut surface, old, &plan, animate);
    surface.render(&elements, layout.canvas(), render)
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(
    svg: &str,
    output: &Path,
    render_cfg: &RenderConfig,
    theme: &Theme,
) -> Result<()> {
    let mut opt = usvg::Options::default();
    if let Some(first) = theme.font_family.split(',').next() {
        opt.font_family = first.trim().trim_matches('"').trim_matches('\'').to_string();
    }
    opt.fontdb_mut().load_system_fonts();
    opt.default_size = usvg::Size::from_wh(render_cfg.width.max(1.0), render_cfg.height.max(1.0))
        .ok_or_else(|| anyhow::anyhow!("invalid render size"))?;

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

#[cfg(not(feature = "png"))]
pub fn write_output_png(
    _svg: &str,
    _output: &Path,
    _render_cfg: &RenderConfig,
    _theme: &Theme,
) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the 'png' feature"))
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Point;

    fn placement(x: f32, y: f32, scale: f32) -> Placement {
        Placement {
            size: Size::new(30.0, 12.0),
            center: Point::new(x, y),
            scale,
        }
    }

    fn layout_of(entries: &[(&str, f32, f32, f32)]) -> Layout {
        let mut layout = Layout::empty(Size::new(200.0, 120.0));
        for (label, x, y, scale) in entries {
            layout.order.push(label.to_string());
            layout
                .placements
                .insert(label.to_string(), placement(*x, *y, *scale));
        }
        layout
    }

    #[test]
    fn render_svg_has_one_text_per_tag() {
        let layout = layout_of(&[("alpha", 100.0, 60.0, 2.0), ("b&c", 40.0, 20.0, 1.0)]);
        let svg = render_svg(&layout, &Theme::modern(), &RenderConfig::default());
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert_eq!(svg.matches("<text").count(), 2);
        assert!(svg.contains(">alpha</text>"));
        assert!(svg.contains("b&amp;c"));
        assert!(!svg.contains("<animate"));
    }

    #[test]
    fn transition_animates_moves_entries_and_exits() {
        let previous: BTreeMap<String, Placement> = [
            ("stay".to_string(), placement(100.0, 60.0, 1.0)),
            ("moved".to_string(), placement(20.0, 20.0, 1.0)),
            ("gone".to_string(), placement(150.0, 90.0, 1.0)),
        ]
        .into();
        let layout = layout_of(&[
            ("stay", 100.0, 60.0, 1.0),
            ("moved", 50.0, 30.0, 2.0),
            ("new", 160.0, 20.0, 1.0),
        ]);
        let svg = render_transition_svg(
            &previous,
            &layout,
            &Theme::classic(),
            &RenderConfig::default(),
            true,
        );

        assert_eq!(svg.matches("<text").count(), 4);
        assert!(svg.contains("type=\"translate\" from=\"20.00 20.00\" to=\"50.00 30.00\""));
        assert!(svg.contains("type=\"scale\" from=\"1.0000\" to=\"2.0000\""));
        assert!(svg.contains("from=\"0\" to=\"1\""));
        assert!(svg.contains("from=\"1\" to=\"0\""));
        assert_eq!(svg.matches("animateTransform").count(), 2);
    }

    #[test]
    fn transition_without_animation_drops_removed_tags() {
        let previous: BTreeMap<String, Placement> =
            [("gone".to_string(), placement(150.0, 90.0, 1.0))].into();
        let layout = layout_of(&[("new", 60.0, 40.0, 1.0)]);
        let svg = render_transition_svg(
            &previous,
            &layout,
            &Theme::classic(),
            &RenderConfig::default(),
            false,
        );
        assert_eq!(svg.matches("<text").count(), 1);
        assert!(!svg.contains("gone"));
    }

    #[test]
    fn font_family_quotes_are_escaped() {
        let layout = layout_of(&[("x", 10.0, 10.0, 1.0)]);
        let svg = render_svg(&layout, &Theme::classic(), &RenderConfig::default());
        assert!(svg.contains("&quot;trebuchet ms&quot;"));
    }
}
