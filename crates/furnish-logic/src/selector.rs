//! Pick a model that fits a region.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::bounds::fits_in_region;
use crate::catalog::{ModelCatalog, ModelMetadata, Vec3};
use crate::error::{ArrangeError, Result};
use crate::region::Region;

/// Shuffle `candidates` and return the first model that fits `region` at `position`.
///
/// Greedy: the first fit in shuffled order wins, so the answer depends on
/// the generator state rather than on any notion of best fit. `Ok(None)`
/// means nothing fits. A name without a catalog record is an error.
pub fn select_fitting<'c>(
    catalog: &'c dyn ModelCatalog,
    candidates: &[String],
    position: Vec3,
    region: &dyn Region,
    rng: &mut impl Rng,
) -> Result<Option<&'c ModelMetadata>> {
    let mut order: Vec<&String> = candidates.iter().collect();
    order.shuffle(rng);
    for name in order {
        let record = catalog
            .record(name)
            .ok_or_else(|| ArrangeError::missing(name.as_str(), "no catalog record"))?;
        if fits_in_region(record, position, region) {
            return Ok(Some(record));
        }
    }
    Ok(None)
}
