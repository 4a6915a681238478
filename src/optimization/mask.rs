//! Feasible-set construction under missing-data masking.
//!
//! A spatial unit leaves the feasible set as soon as any of its source
//! arrays reads the array's no-data sentinel; exclusion is monotonic
//! across sources. The mask doubles as the dense reindex between the
//! full-length unit space and the solver's variable space.

use super::ModelError;

/// No-data sentinel attached to a source array.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Nodata {
    /// The source has no sentinel; nothing is excluded by it.
    #[default]
    Absent,
    /// Single sentinel value. NaN is matched by `is_nan`, which is the
    /// vector-attribute convention.
    Scalar(f64),
    /// Per-band sentinel list. Explicitly unsupported: callers report it
    /// and the contribution degrades to vacuous (nothing excluded).
    PerBand(Vec<f64>),
}

impl Nodata {
    pub fn nan() -> Self {
        Nodata::Scalar(f64::NAN)
    }

    pub fn is_per_band(&self) -> bool {
        matches!(self, Nodata::PerBand(_))
    }

    /// Whether `x` reads as no-data under this sentinel.
    pub fn matches(&self, x: f64) -> bool {
        match self {
            Nodata::Absent => false,
            Nodata::Scalar(nd) if nd.is_nan() => x.is_nan(),
            Nodata::Scalar(nd) => x == *nd,
            Nodata::PerBand(_) => false,
        }
    }
}

/// Boolean inclusion mask over `len` spatial units plus the ordered list
/// of feasible unit indices.
#[derive(Debug, Clone)]
pub struct FeasibleMask {
    mask: Vec<bool>,
    feasible: Vec<usize>,
}

impl FeasibleMask {
    /// Build from up to two equal-length sources. An absent source
    /// contributes nothing to exclusion.
    pub fn from_sources(
        len: usize,
        sources: &[(&[f64], &Nodata)],
    ) -> Result<Self, ModelError> {
        for (data, _) in sources {
            if data.len() != len {
                return Err(ModelError::LengthMismatch {
                    what: "mask source",
                    left: data.len(),
                    right: len,
                });
            }
        }
        Ok(Self::from_fn(len, |i| {
            !sources.iter().any(|(data, nodata)| nodata.matches(data[i]))
        }))
    }

    /// Build from an arbitrary inclusion predicate.
    pub fn from_fn(len: usize, include: impl Fn(usize) -> bool) -> Self {
        let mask: Vec<bool> = (0..len).map(include).collect();
        let feasible = mask
            .iter()
            .enumerate()
            .filter_map(|(i, &keep)| keep.then_some(i))
            .collect();
        Self { mask, feasible }
    }

    /// Total number of spatial units, feasible or not.
    pub fn len(&self) -> usize {
        self.mask.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mask.is_empty()
    }

    pub fn feasible_count(&self) -> usize {
        self.feasible.len()
    }

    pub fn is_feasible(&self, unit: usize) -> bool {
        self.mask[unit]
    }

    /// Feasible unit indices in ascending order; position in this slice
    /// is the unit's dense variable index.
    pub fn feasible_indices(&self) -> &[usize] {
        &self.feasible
    }

    pub fn excluded_fraction(&self) -> f64 {
        if self.mask.is_empty() {
            return 0.0;
        }
        (self.len() - self.feasible_count()) as f64 / self.len() as f64
    }

    /// Dense copy of `data` restricted to the feasible units.
    pub fn compress(&self, data: &[f64]) -> Vec<f64> {
        self.feasible.iter().map(|&i| data[i]).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excludes_unit_when_either_source_reads_nodata() {
        let value = [1.0, -9999.0, 3.0, 4.0];
        let weight = [1.0, 1.0, -1.0, 1.0];
        let mask = FeasibleMask::from_sources(
            4,
            &[
                (&value, &Nodata::Scalar(-9999.0)),
                (&weight, &Nodata::Scalar(-1.0)),
            ],
        )
        .unwrap();

        assert_eq!(mask.len(), 4);
        assert_eq!(mask.feasible_indices(), &[0, 3]);
        assert!(!mask.is_feasible(1));
        assert!(!mask.is_feasible(2));
        assert_eq!(mask.excluded_fraction(), 0.5);
    }

    #[test]
    fn absent_nodata_excludes_nothing() {
        let value = [1.0, 2.0, 3.0];
        let mask = FeasibleMask::from_sources(3, &[(&value, &Nodata::Absent)]).unwrap();
        assert_eq!(mask.feasible_count(), 3);
    }

    #[test]
    fn nan_sentinel_matches_nan_readings() {
        let value = [1.0, f64::NAN, 3.0];
        let mask = FeasibleMask::from_sources(3, &[(&value, &Nodata::nan())]).unwrap();
        assert_eq!(mask.feasible_indices(), &[0, 2]);
    }

    #[test]
    fn per_band_nodata_is_vacuous() {
        let value = [1.0, 2.0];
        let nodata = Nodata::PerBand(vec![1.0, 2.0]);
        assert!(nodata.is_per_band());
        let mask = FeasibleMask::from_sources(2, &[(&value, &nodata)]).unwrap();
        assert_eq!(mask.feasible_count(), 2);
    }

    #[test]
    fn length_mismatch_is_a_configuration_error() {
        let value = [1.0, 2.0];
        let err = FeasibleMask::from_sources(3, &[(&value, &Nodata::Absent)]).unwrap_err();
        assert!(matches!(err, ModelError::LengthMismatch { .. }));
    }

    #[test]
    fn compress_reindexes_densely() {
        let value = [10.0, -1.0, 30.0];
        let mask = FeasibleMask::from_sources(3, &[(&value, &Nodata::Scalar(-1.0))]).unwrap();
        assert_eq!(mask.compress(&value), vec![10.0, 30.0]);
    }
}
