use texrot_common::{BlockPos, offset_pos};
use texrot_model::{Mode, RotationCode, rotation_of};
use texrot_observe::{Observation, Region};
use texrot_schema::{ObservationRecord, SearchBounds, SearchRequest};

/// Largest layer radius [`RotationInspector::layer`] will render.
pub const MAX_LAYER_RADIUS: i64 = 64;

/// Read-only queries against the rotation model for debugging and test setup.
pub struct RotationInspector;

impl RotationInspector {
    /// Predicted codes on the horizontal layer through `center`, `radius`
    /// blocks in each direction. The radius is clamped to
    /// `0..=MAX_LAYER_RADIUS`; coordinates wrap like the model does.
    pub fn layer(mode: Mode, center: BlockPos, radius: i64, side_only: bool) -> RotationLayer {
        let radius = radius.clamp(0, MAX_LAYER_RADIUS);
        let rows = (-radius..=radius)
            .map(|dz| {
                (-radius..=radius)
                    .map(|dx| rotation_of(mode, offset_pos(center, BlockPos::new(dx, 0, dz)), side_only))
                    .collect()
            })
            .collect();
        RotationLayer {
            mode,
            center,
            radius,
            side_only,
            rows,
        }
    }

    /// Observations a player standing at `origin` would record for `offsets`.
    /// Every `side_only_every`-th observation (1-based) is recorded side-only.
    pub fn formation(
        mode: Mode,
        origin: BlockPos,
        offsets: &[BlockPos],
        side_only_every: Option<usize>,
    ) -> Vec<Observation> {
        offsets
            .iter()
            .enumerate()
            .map(|(i, &offset)| {
                let side_only = side_only_every.is_some_and(|k| k > 0 && (i + 1) % k == 0);
                let code = rotation_of(mode, offset_pos(origin, offset), false).value();
                Observation::new(offset, i64::from(code), side_only)
            })
            .collect()
    }
}

/// Grid of codes from [`RotationInspector::layer`]; rows run along z, columns along x.
#[derive(Debug, Clone)]
pub struct RotationLayer {
    pub mode: Mode,
    pub center: BlockPos,
    pub radius: i64,
    pub side_only: bool,
    pub rows: Vec<Vec<RotationCode>>,
}

impl RotationLayer {
    /// Code at offset `(dx, dz)` from the center, if inside the layer.
    pub fn at(&self, dx: i64, dz: i64) -> Option<RotationCode> {
        let col = usize::try_from(dx.checked_add(self.radius)?).ok()?;
        let row = usize::try_from(dz.checked_add(self.radius)?).ok()?;
        self.rows.get(row)?.get(col).copied()
    }
}

impl std::fmt::Display for RotationLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let c = self.center;
        writeln!(
            f,
            "{} y={} x {}..={} z {}..={}{}",
            self.mode,
            c.y,
            c.x.wrapping_sub(self.radius),
            c.x.wrapping_add(self.radius),
            c.z.wrapping_sub(self.radius),
            c.z.wrapping_add(self.radius),
            if self.side_only { " (side view)" } else { "" }
        )?;
        for (r, row) in self.rows.iter().enumerate() {
            for (col, code) in row.iter().enumerate() {
                let centered = r as i64 == self.radius && col as i64 == self.radius;
                if centered {
                    write!(f, "[{code}]")?;
                } else {
                    write!(f, " {code} ")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// `count` horizontal offsets spiralling outward from the origin, ring by ring.
pub fn sample_offsets(count: usize) -> Vec<BlockPos> {
    let mut out = Vec::with_capacity(count);
    let mut ring = 0i64;
    while out.len() < count {
        for dz in -ring..=ring {
            for dx in -ring..=ring {
                if dx.abs().max(dz.abs()) == ring && out.len() < count {
                    out.push(BlockPos::new(dx, 0, dz));
                }
            }
        }
        ring += 1;
    }
    out
}

/// Recipe for a request whose true origin is known.
#[derive(Debug, Clone)]
pub struct SampleSpec {
    pub mode: Mode,
    pub origin: BlockPos,
    pub count: usize,
    pub side_only_every: Option<usize>,
    /// Horizontal half-width of the search box around the origin.
    pub margin: i64,
    /// Vertical half-height of the search box.
    pub vertical_margin: i64,
}

impl SampleSpec {
    pub fn new(mode: Mode, origin: BlockPos) -> Self {
        Self {
            mode,
            origin,
            count: 12,
            side_only_every: None,
            margin: 64,
            vertical_margin: 4,
        }
    }

    /// The search box centred on the origin.
    pub fn region(&self) -> Region {
        let m = BlockPos::new(self.margin.max(0), self.vertical_margin.max(0), self.margin.max(0));
        let min = BlockPos::new(
            self.origin.x.saturating_sub(m.x),
            self.origin.y.saturating_sub(m.y),
            self.origin.z.saturating_sub(m.z),
        );
        let max = BlockPos::new(
            self.origin.x.saturating_add(m.x),
            self.origin.y.saturating_add(m.y),
            self.origin.z.saturating_add(m.z),
        );
        // min <= max by construction.
        Region::new(min, max).unwrap_or(Region::single(self.origin))
    }

    pub fn to_request(&self) -> SearchRequest {
        let observations = RotationInspector::formation(
            self.mode,
            self.origin,
            &sample_offsets(self.count),
            self.side_only_every,
        )
        .into_iter()
        .map(ObservationRecord::from)
        .collect();
        SearchRequest::new(self.mode, observations, SearchBounds::from_region(&self.region()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use texrot_model::texture_rotation;

    #[test]
    fn layer_matches_model() {
        let center = BlockPos::new(100, 64, -20);
        let layer = RotationInspector::layer(Mode::Vanilla, center, 2, false);
        assert_eq!(layer.rows.len(), 5);
        assert!(layer.rows.iter().all(|r| r.len() == 5));
        assert_eq!(layer.at(0, 0), Some(texture_rotation(Mode::Vanilla, center)));
        assert_eq!(
            layer.at(-2, 1),
            Some(texture_rotation(Mode::Vanilla, BlockPos::new(98, 64, -19)))
        );
        assert_eq!(layer.at(3, 0), None);
    }

    #[test]
    fn side_layer_is_projected() {
        let layer = RotationInspector::layer(Mode::Sodium, BlockPos::ZERO, 3, true);
        assert!(layer.rows.iter().flatten().all(|c| c.value() <= 1));
    }

    #[test]
    fn layer_display_marks_center() {
        let layer = RotationInspector::layer(Mode::Vanilla12, BlockPos::ZERO, 1, false);
        let text = layer.to_string();
        assert!(text.starts_with("Vanilla12Textures y=0"));
        // (0,0,0) renders 0 in this mode.
        assert!(text.contains("[0]"));
        assert_eq!(text.lines().count(), 4);
    }

    #[test]
    fn layer_at_extreme_center_wraps() {
        let center = BlockPos::new(i64::MIN, 64, i64::MAX);
        let layer = RotationInspector::layer(Mode::Vanilla, center, 1, false);
        let text = layer.to_string();
        assert!(text.contains(&format!("x {}..={}", i64::MAX, i64::MIN + 1)));
        assert_eq!(
            layer.at(-1, 1),
            Some(texture_rotation(Mode::Vanilla, BlockPos::new(i64::MAX, 64, i64::MIN)))
        );
        assert_eq!(layer.at(i64::MAX, 0), None);
        assert_eq!(layer.at(i64::MIN, 0), None);
    }

    #[test]
    fn layer_radius_is_clamped() {
        let wide = RotationInspector::layer(Mode::Vanilla21_1, BlockPos::ZERO, i64::MAX, false);
        assert_eq!(wide.radius, MAX_LAYER_RADIUS);
        assert_eq!(wide.rows.len() as i64, 2 * MAX_LAYER_RADIUS + 1);

        let negative = RotationInspector::layer(Mode::Vanilla21_1, BlockPos::ZERO, -5, false);
        assert_eq!(negative.rows, vec![vec![texture_rotation(Mode::Vanilla21_1, BlockPos::ZERO)]]);
    }

    #[test]
    fn spiral_offsets_are_distinct_and_ringed() {
        let offsets = sample_offsets(12);
        assert_eq!(offsets.len(), 12);
        assert_eq!(offsets[0], BlockPos::ZERO);
        let mut keys: Vec<_> = offsets.iter().map(|p| (p.x, p.z)).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), 12);
        assert!(offsets[1..9].iter().all(|p| p.x.abs().max(p.z.abs()) == 1));
        assert!(offsets.iter().all(|p| p.y == 0));
    }

    #[test]
    fn formation_marks_every_kth_side_only() {
        let offsets = sample_offsets(6);
        let obs = RotationInspector::formation(Mode::Vanilla, BlockPos::ZERO, &offsets, Some(3));
        let flags: Vec<bool> = obs.iter().map(|o| o.side_only).collect();
        assert_eq!(flags, vec![false, false, true, false, false, true]);
    }

    #[test]
    fn sample_request_box_contains_origin() {
        let mut spec = SampleSpec::new(Mode::Sodium19, BlockPos::new(-50, 70, 900));
        spec.margin = 10;
        let region = spec.region();
        assert!(region.contains(spec.origin));
        assert_eq!(region.volume(), 21 * 9 * 21);

        let req = spec.to_request();
        assert_eq!(req.mode, "Sodium19Textures");
        assert_eq!(req.observations.len(), 12);
        assert_eq!(req.search.to_region().unwrap(), region);
    }
}
