use rand::Rng;
use std::fmt;
use std::sync::OnceLock;

type Weigher<T> = dyn Fn(&T) -> f64 + Send + Sync;

/// Weighted random draw over a fixed pool.
///
/// Weights are computed on the first draw and cached. Negative or NaN
/// weights count as zero. When every weight is zero the draw is uniform.
pub struct Roulette<T> {
    items: Vec<T>,
    weigher: Box<Weigher<T>>,
    cumulative: OnceLock<Vec<f64>>,
}

impl<T> Roulette<T> {
    pub fn new(items: Vec<T>, weigher: impl Fn(&T) -> f64 + Send + Sync + 'static) -> Self {
        Self {
            items,
            weigher: Box::new(weigher),
            cumulative: OnceLock::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    fn cumulative(&self) -> &[f64] {
        self.cumulative.get_or_init(|| {
            let mut acc = 0.0;
            self.items
                .iter()
                .map(|item| {
                    let w = (self.weigher)(item);
                    if w.is_finite() && w > 0.0 {
                        acc += w;
                    }
                    acc
                })
                .collect()
        })
    }

    /// Sum of all effective weights.
    pub fn total_weight(&self) -> f64 {
        self.cumulative().last().copied().unwrap_or(0.0)
    }

    /// Draw one item, or `None` for an empty pool.
    pub fn exec<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&T> {
        if self.items.is_empty() {
            return None;
        }
        let total = self.total_weight();
        if total <= 0.0 || !total.is_finite() {
            return self.items.get(rng.gen_range(0..self.items.len()));
        }
        self.pick(rng.gen::<f64>() * total)
    }

    /// The item whose cumulative range holds `r`. Rounding past the end
    /// lands on the last item with a positive weight.
    fn pick(&self, r: f64) -> Option<&T> {
        let cumulative = self.cumulative();
        let total = self.total_weight();
        let idx = cumulative.partition_point(|c| *c <= r);
        let last_weighted = cumulative.partition_point(|c| *c < total);
        self.items.get(idx.min(last_weighted))
    }
}

impl<T: fmt::Debug> fmt::Debug for Roulette<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Roulette")
            .field("items", &self.items.len())
            .field("cached", &self.cumulative.get().is_some())
            .finish()
    }
}
