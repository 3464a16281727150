mod collision;
mod error;
pub mod scale;
pub mod spiral;
mod text;
pub(crate) mod types;
pub use collision::CollisionIndex;
pub use error::LayoutError;
pub use spiral::{SpiralSampler, samples_to_reach};
pub use text::{measure_tag, measure_tags};
pub use types::*;

use crate::config::LayoutConfig;
use crate::ir::TagSet;
use crate::theme::Theme;
use std::collections::HashSet;

/// Lay out pre-measured tags on a `canvas` sized region.
///
/// Tags are placed in descending count order (ties by label) so the heaviest
/// tags claim the spots nearest the center. Each tag walks a fresh spiral from
/// the canvas center and takes the first candidate that is inside the canvas
/// and clear of every tag placed before it. A tag whose search exhausts the
/// sample ceiling is dropped and reported in [`Layout::dropped`].
pub fn compute_layout(
    tags: &[SizedTag],
    canvas: Size,
    config: &LayoutConfig,
) -> Result<Layout, LayoutError> {
    validate(tags, canvas, config)?;

    let mut layout = Layout::empty(canvas);
    if tags.is_empty() {
        return Ok(layout);
    }

    let mut ordered: Vec<&SizedTag> = tags.iter().collect();
    ordered.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    for tag in &ordered {
        layout.order.push(tag.label.clone());
        layout.counts.insert(tag.label.clone(), tag.count);
    }

    if canvas.is_empty() {
        tracing::debug!(
            tags = tags.len(),
            "canvas has no area; every tag is dropped"
        );
        layout.dropped = layout.order.clone();
        return Ok(layout);
    }

    let min_count = ordered.iter().map(|t| t.count).min().unwrap_or(0);
    let max_count = ordered.iter().map(|t| t.count).max().unwrap_or(0);
    let planned: Vec<(&SizedTag, f32, Size)> = ordered
        .iter()
        .map(|tag| {
            let scale = scale::normalize(
                tag.count,
                min_count,
                max_count,
                config.min_scale,
                config.max_scale,
            );
            (*tag, scale, tag.size.scaled(scale))
        })
        .collect();

    let bounds = Rect::from_size(canvas);
    let origin = canvas.center();
    let ceiling = sample_ceiling(canvas, config);
    let clearance = config.tag_padding.max(0.0) * 0.5;
    let mut index = CollisionIndex::new(grid_cell_size(&planned));
    let mut spiral = SpiralSampler::new(origin, &config.spiral);

    for (tag, scale, scaled) in planned {
        spiral.reset();
        let mut found = None;
        for candidate in spiral.by_ref().take(ceiling) {
            let rect = Rect::from_center(candidate, scaled);
            if index.fits_with_clearance(&rect, &bounds, clearance) {
                found = Some((candidate, rect));
                break;
            }
        }
        let tried = spiral.taken();
        layout.stats.samples += tried;
        layout.stats.max_samples_per_tag = layout.stats.max_samples_per_tag.max(tried);

        match found {
            Some((center, rect)) => {
                index.commit(rect.inflate(clearance));
                tracing::trace!(
                    label = %tag.label,
                    x = center.x,
                    y = center.y,
                    scale,
                    samples = tried,
                    "placed tag"
                );
                layout.placements.insert(
                    tag.label.clone(),
                    Placement {
                        size: tag.size,
                        center,
                        scale,
                    },
                );
            }
            None => {
                tracing::warn!(
                    label = %tag.label,
                    samples = tried,
                    "no free position on the spiral; dropping tag"
                );
                layout.dropped.push(tag.label.clone());
            }
        }
    }

    tracing::debug!(
        placed = layout.placements.len(),
        dropped = layout.dropped.len(),
        samples = layout.stats.samples,
        "tag layout finished"
    );

    Ok(layout)
}

/// Measure every tag with the theme font, then lay them out.
pub fn layout_tag_set(
    tags: &TagSet,
    canvas: Size,
    theme: &Theme,
    config: &LayoutConfig,
) -> Result<Layout, LayoutError> {
    let sized = measure_tags(tags, theme, config);
    compute_layout(&sized, canvas, config)
}

fn validate(tags: &[SizedTag], canvas: Size, config: &LayoutConfig) -> Result<(), LayoutError> {
    if !canvas.is_finite() || canvas.width < 0.0 || canvas.height < 0.0 {
        return Err(LayoutError::InvalidCanvas {
            width: canvas.width,
            height: canvas.height,
        });
    }
    if !config.spiral.is_valid() {
        return Err(LayoutError::InvalidSpiral {
            a: config.spiral.a,
            b: config.spiral.b,
            step: config.spiral.step,
        });
    }
    let (min, max) = (config.min_scale, config.max_scale);
    if !min.is_finite() || !max.is_finite() || min <= 0.0 || min > max {
        return Err(LayoutError::InvalidScaleRange { min, max });
    }
    let mut seen: HashSet<&str> = HashSet::with_capacity(tags.len());
    for tag in tags {
        if !tag.size.is_finite() || tag.size.width < 0.0 || tag.size.height < 0.0 {
            return Err(LayoutError::InvalidTagSize {
                label: tag.label.clone(),
                width: tag.size.width,
                height: tag.size.height,
            });
        }
        if !seen.insert(tag.label.as_str()) {
            return Err(LayoutError::DuplicateLabel(tag.label.clone()));
        }
    }
    Ok(())
}

/// Samples allowed per tag: the configured ceiling, or the point where the
/// spiral has moved past the canvas corners, whichever is smaller. Beyond the
/// half-diagonal every candidate center lies outside the canvas.
fn sample_ceiling(canvas: Size, config: &LayoutConfig) -> usize {
    let half_diagonal = (canvas.width * canvas.width + canvas.height * canvas.height).sqrt() * 0.5;
    let geometric = samples_to_reach(&config.spiral, half_diagonal).saturating_add(1);
    geometric.min(config.max_samples.max(1))
}

fn grid_cell_size(planned: &[(&SizedTag, f32, Size)]) -> f32 {
    if planned.is_empty() {
        return 0.0;
    }
    let total: f32 = planned
        .iter()
        .map(|(_, _, size)| size.width.max(size.height))
        .sum();
    total / planned.len() as f32
}
