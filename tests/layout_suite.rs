use std::collections::BTreeMap;
use std::path::PathBuf;

use tagcloud_rs::config::parse_config;
use tagcloud_rs::layout::{Point, Rect};
use tagcloud_rs::layout_dump::{LayoutDump, read_layout_dump, write_layout_dump};
use tagcloud_rs::reconcile::placements_as_elements;
use tagcloud_rs::{
    ElementAction, InputFormat, Layout, LayoutConfig, RenderConfig, Size, SizedTag, TagSet, Theme,
    TextOptions, compute_layout, layout_tag_set, parse_tags, reconcile, render_svg,
};

fn tag(label: &str, count: u64, w: f32, h: f32) -> SizedTag {
    SizedTag::new(label, count, Size::new(w, h))
}

fn assert_valid_layout(layout: &Layout, context: &str) {
    let bounds = Rect::from_size(layout.canvas());
    let placed: Vec<(&str, Rect)> = layout
        .iter_placed()
        .map(|(label, placement)| (label, placement.bounds()))
        .collect();
    for (label, rect) in &placed {
        assert!(
            bounds.contains_rect(rect),
            "{context}: {label} at {rect:?} leaves the canvas"
        );
    }
    for (i, (a, ra)) in placed.iter().enumerate() {
        for (b, rb) in &placed[i + 1..] {
            assert!(!ra.overlaps(rb), "{context}: {a} overlaps {b}");
        }
    }
    assert_eq!(
        layout.len() + layout.dropped.len(),
        layout.order.len(),
        "{context}: every tag is either placed or dropped"
    );
}

fn fast_config() -> LayoutConfig {
    LayoutConfig {
        fast_text_metrics: true,
        ..LayoutConfig::default()
    }
}

#[test]
fn uniform_weights_share_one_scale() {
    let tags = vec![
        tag("X", 5, 40.0, 20.0),
        tag("Y", 5, 40.0, 20.0),
        tag("Z", 5, 40.0, 20.0),
    ];
    let config = LayoutConfig::default();
    let layout = compute_layout(&tags, Size::new(300.0, 300.0), &config).expect("layout");

    assert_valid_layout(&layout, "uniform");
    assert_eq!(layout.len(), 3);
    assert!(layout.dropped.is_empty());
    for (_, placement) in layout.iter_placed() {
        assert_eq!(placement.scale, config.max_scale);
    }
    assert_eq!(layout.get("X").map(|p| p.center), Some(Point::new(150.0, 150.0)));
}

#[test]
fn scale_is_monotonic_in_count() {
    let tags: Vec<SizedTag> = (0..12)
        .map(|i| tag(&format!("t{i}"), (i * i + 1) as u64, 12.0, 8.0))
        .collect();
    let layout =
        compute_layout(&tags, Size::new(600.0, 400.0), &LayoutConfig::default()).expect("layout");
    assert_valid_layout(&layout, "monotonic");

    let mut by_count: Vec<(u64, f32)> = layout
        .iter_placed()
        .map(|(label, placement)| (layout.counts[label], placement.scale))
        .collect();
    by_count.sort_by_key(|(count, _)| *count);
    for pair in by_count.windows(2) {
        assert!(pair[0].1 <= pair[1].1, "{:?} scaled above {:?}", pair[0], pair[1]);
    }
    assert_eq!(by_count.first().map(|(_, s)| *s), Some(1.0));
    assert_eq!(by_count.last().map(|(_, s)| *s), Some(3.0));
}

#[test]
fn layout_is_deterministic() {
    let tags: Vec<SizedTag> = (0..40)
        .map(|i| tag(&format!("w{i:02}"), (40 - i) as u64, 10.0 + (i % 7) as f32 * 4.0, 9.0))
        .collect();
    let config = LayoutConfig {
        tag_padding: 2.0,
        ..LayoutConfig::default()
    };
    let first = compute_layout(&tags, Size::new(500.0, 350.0), &config).expect("layout");
    let mut shuffled = tags.clone();
    shuffled.reverse();
    let second = compute_layout(&shuffled, Size::new(500.0, 350.0), &config).expect("layout");
    assert_eq!(first, second);
    assert_valid_layout(&first, "deterministic");
}

#[test]
fn overcrowded_canvas_drops_the_lightest_tags() {
    let config = LayoutConfig {
        min_scale: 1.0,
        max_scale: 1.0,
        ..LayoutConfig::default()
    };
    let tags: Vec<SizedTag> = (0..50)
        .map(|i| tag(&format!("n{i:02}"), 100 - i as u64, 30.0, 30.0))
        .collect();
    let layout = compute_layout(&tags, Size::new(100.0, 100.0), &config).expect("layout");

    assert_valid_layout(&layout, "overcrowded");
    assert!(!layout.dropped.is_empty());
    assert!(layout.len() <= 9);
    assert!(layout.get("n00").is_some());
    let again = compute_layout(&tags, Size::new(100.0, 100.0), &config).expect("layout");
    assert_eq!(layout.dropped, again.dropped);
}

#[test]
fn tiny_sample_ceiling_terminates() {
    let config = LayoutConfig {
        max_samples: 1,
        ..LayoutConfig::default()
    };
    let tags = vec![tag("a", 2, 10.0, 10.0), tag("b", 1, 10.0, 10.0)];
    let layout = compute_layout(&tags, Size::new(200.0, 200.0), &config).expect("layout");
    assert_eq!(layout.len(), 1);
    assert_eq!(layout.dropped, vec!["b".to_string()]);
    assert_eq!(layout.stats.max_samples_per_tag, 1);
}

#[test]
fn reconcile_against_itself_is_identity() {
    let tags: TagSet = [("rust", 9), ("serde", 4), ("clap", 2)].into_iter().collect();
    let layout = layout_tag_set(&tags, Size::new(400.0, 300.0), &Theme::modern(), &fast_config())
        .expect("layout");
    let old = placements_as_elements(&layout);
    let plan = reconcile(&old, &layout);

    assert_eq!(plan.count(ElementAction::Reuse), 3);
    assert!(plan.to_create.is_empty());
    assert!(plan.to_remove.is_empty());
    for record in &plan.records {
        assert_eq!(record.placement.as_ref(), old.get(&record.label));
    }
    assert_eq!(plan, reconcile(&old, &layout));
}

#[test]
fn reconcile_growth_and_shrink() {
    let theme = Theme::classic();
    let config = fast_config();
    let canvas = Size::new(300.0, 200.0);
    let before: TagSet = [("A", 3), ("B", 2)].into_iter().collect();
    let after: TagSet = [("B", 2), ("C", 5)].into_iter().collect();

    let first = layout_tag_set(&before, canvas, &theme, &config).expect("layout");
    let second = layout_tag_set(&after, canvas, &theme, &config).expect("layout");
    let plan = reconcile(&placements_as_elements(&first), &second);

    assert_eq!(plan.to_create, vec!["C".to_string()]);
    assert_eq!(plan.to_remove, vec!["A".to_string()]);
    assert_eq!(plan.record("B").map(|r| r.action), Some(ElementAction::Reuse));
    assert_eq!(plan.records.len(), 3);
}

#[test]
fn parser_feeds_layout_and_svg() {
    let input = "# weights\nrust: 12\nwasm: 5\nserde: 5\nclap: 1\n";
    let tags = parse_tags(input, InputFormat::Auto, &TextOptions::default()).expect("parse");
    let layout = layout_tag_set(&tags, Size::new(500.0, 300.0), &Theme::modern(), &fast_config())
        .expect("layout");
    assert_valid_layout(&layout, "parsed");

    let svg = render_svg(&layout, &Theme::modern(), &RenderConfig::default());
    assert_eq!(svg.matches("<text").count(), layout.len());
    for label in ["rust", "wasm", "serde", "clap"] {
        if layout.get(label).is_some() {
            assert!(svg.contains(&format!(">{label}</text>")), "missing {label}");
        }
    }
}

#[test]
fn negative_counts_are_rejected() {
    assert!(parse_tags("a: 3\nb: -1", InputFormat::Counts, &TextOptions::default()).is_err());
    assert!(parse_tags("{a: -3}", InputFormat::Auto, &TextOptions::default()).is_err());
}

#[test]
fn config_overrides_reach_layout() {
    let config = parse_config(
        r#"{
            // JSON5 comments are allowed
            theme: 'modern',
            layout: { minScale: 2, maxScale: 2, tagPadding: 3, spiral: { step: 0.5 } },
            render: { width: 320, height: 240 },
        }"#,
    )
    .expect("config");
    assert_eq!(config.layout.spiral.step, 0.5);
    assert_eq!(config.render.width, 320.0);

    let tags = vec![tag("a", 1, 10.0, 10.0), tag("b", 9, 10.0, 10.0)];
    let canvas = Size::new(config.render.width, config.render.height);
    let layout = compute_layout(&tags, canvas, &config.layout).expect("layout");
    assert!(layout.iter_placed().all(|(_, p)| p.scale == 2.0));
    assert_valid_layout(&layout, "config");
}

#[test]
fn layout_dump_file_restores_previous_elements() {
    let tags: TagSet = [("alpha", 4), ("beta", 2)].into_iter().collect();
    let layout = layout_tag_set(&tags, Size::new(300.0, 200.0), &Theme::classic(), &fast_config())
        .expect("layout");

    let path: PathBuf =
        std::env::temp_dir().join(format!("tcloud-dump-{}.json", std::process::id()));
    write_layout_dump(&path, &layout).expect("write dump");
    let dump: LayoutDump = read_layout_dump(&path).expect("read dump");
    let _ = std::fs::remove_file(&path);

    let previous: BTreeMap<_, _> = dump.placements();
    assert_eq!(previous, layout.placements);
    let plan = reconcile(&previous, &layout);
    assert_eq!(plan.count(ElementAction::Reuse), layout.len());
}
