/// Linear axis from zero to `max`, with ticks every `step`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Axis {
    pub max: f64,
    pub step: f64,
}

impl Axis {
    pub fn fixed(max: f64, step: f64) -> Self {
        Self { max, step }
    }

    /// Rounds `max` up to a multiple of a 1/2/5 x 10^n step giving roughly `target` ticks.
    pub fn nice(max: f64, target: usize) -> Self {
        let max = max.max(1.0);
        let raw = max / target.max(1) as f64;
        let magnitude = 10f64.powf(raw.log10().floor());
        let residual = raw / magnitude;
        let multiplier = if residual <= 1.0 {
            1.0
        } else if residual <= 2.0 {
            2.0
        } else if residual <= 5.0 {
            5.0
        } else {
            10.0
        };
        // Counts are integral.
        let step = (multiplier * magnitude).max(1.0);
        Self { max: (max / step).ceil() * step, step }
    }

    pub fn ticks(&self) -> impl Iterator<Item = f64> {
        let step = self.step;
        let count = (self.max / step + 1e-9).floor() as usize;
        (0..=count).map(move |i| i as f64 * step)
    }

    /// Fraction of the axis covered by `value`.
    pub fn fraction(&self, value: f64) -> f64 {
        if self.max <= 0.0 {
            return 0.0;
        }
        (value / self.max).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nice_rounds_up_to_step() {
        assert_eq!(Axis::nice(1234.0, 5), Axis { max: 1500.0, step: 500.0 });
        assert_eq!(Axis::nice(4.0, 5), Axis { max: 4.0, step: 1.0 });
        assert_eq!(Axis::nice(0.0, 5), Axis { max: 1.0, step: 1.0 });
    }

    #[test]
    fn fixed_axis_ticks_stop_before_max() {
        let ticks: Vec<_> = Axis::fixed(255.0, 50.0).ticks().collect();
        assert_eq!(ticks, vec![0.0, 50.0, 100.0, 150.0, 200.0, 250.0]);
    }

    #[test]
    fn fraction_is_clamped() {
        let axis = Axis::fixed(200.0, 50.0);
        assert_eq!(axis.fraction(50.0), 0.25);
        assert_eq!(axis.fraction(400.0), 1.0);
    }
}
