use arcana_core::DeckVisual;

/// Rotating ring of the remaining deck. Angles are degrees, clockwise, with 0
/// at the top of the ring.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Wheel {
    rotation: f64,
    drag_anchor: Option<f64>,
}

/// Folds an angle difference into (-180, 180].
pub fn normalize_delta(delta: f64) -> f64 {
    let mut value = delta % 360.0;
    if value > 180.0 {
        value -= 360.0;
    } else if value <= -180.0 {
        value += 360.0;
    }
    value
}

/// Angle of a point relative to the ring centre. `dy` grows downward, as
/// terminal rows do.
pub fn pointer_angle(dx: f64, dy: f64) -> f64 {
    dx.atan2(-dy).to_degrees()
}

impl Wheel {
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_anchor.is_some()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn rotate_by(&mut self, degrees: f64) {
        self.rotation = (self.rotation + degrees).rem_euclid(360.0);
    }

    /// Turns the ring one card slot. `forward` moves the next card to the top.
    pub fn step(&mut self, forward: bool, count: usize) {
        if count == 0 {
            return;
        }
        let slot = 360.0 / count as f64;
        self.rotate_by(if forward { -slot } else { slot });
    }

    pub fn begin_drag(&mut self, dx: f64, dy: f64) {
        self.drag_anchor = Some(pointer_angle(dx, dy));
    }

    /// Rotates by the angle swept since the last drag sample.
    pub fn drag_to(&mut self, dx: f64, dy: f64) {
        let Some(anchor) = self.drag_anchor else {
            return;
        };
        let angle = pointer_angle(dx, dy);
        self.rotate_by(normalize_delta(angle - anchor));
        self.drag_anchor = Some(angle);
    }

    pub fn end_drag(&mut self) {
        self.drag_anchor = None;
    }

    /// Where card `index` of `count` sits on the ring, jitter included.
    pub fn card_angle(&self, index: usize, count: usize, visual: &DeckVisual) -> f64 {
        if count == 0 {
            return 0.0;
        }
        let slot = 360.0 / count as f64;
        (index as f64 * slot + self.rotation + f64::from(visual.angle_offset)).rem_euclid(360.0)
    }

    /// Canvas position of card `index` (y grows upward). `jitter_scale` maps
    /// the radial jitter onto canvas units.
    pub fn card_position(
        &self,
        index: usize,
        count: usize,
        visual: &DeckVisual,
        radius: f64,
        jitter_scale: f64,
    ) -> (f64, f64) {
        let angle = self.card_angle(index, count, visual).to_radians();
        let r = radius + f64::from(visual.offset_r) * jitter_scale;
        (r * angle.sin(), r * angle.cos())
    }

    /// The card closest to the top of the ring, which is what a draw takes.
    pub fn top_index(&self, visuals: &[DeckVisual]) -> Option<usize> {
        let count = visuals.len();
        visuals
            .iter()
            .enumerate()
            .map(|(idx, visual)| (idx, normalize_delta(self.card_angle(idx, count, visual)).abs()))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(idx, _)| idx)
    }
}
