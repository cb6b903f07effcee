use std::path::Path;
use std::sync::Arc;

use crate::error::TrainerResult;
use crate::profile::{transform_dataset, Profile};
use crate::spots::SpotDescriptor;
use crate::tables::{Dataset, StrategyTable};

/// Read-only strategy tables for every profile.
///
/// Built once from the base dataset; the derived profile datasets are never
/// mutated afterwards and can be shared across threads.
#[derive(Debug, Clone)]
pub struct StrategyStore {
    gto: Arc<Dataset>,
    rec_passif: Arc<Dataset>,
    rec_aggro: Arc<Dataset>,
}

impl StrategyStore {
    pub fn new(base: Dataset) -> StrategyStore {
        let rec_passif = transform_dataset(&base, Profile::RecPassif);
        let rec_aggro = transform_dataset(&base, Profile::RecAggro);
        log::debug!("derived profile datasets for {} tables", base.len());
        StrategyStore {
            gto: Arc::new(base),
            rec_passif: Arc::new(rec_passif),
            rec_aggro: Arc::new(rec_aggro),
        }
    }

    pub fn load(dir: &Path) -> TrainerResult<StrategyStore> {
        Ok(StrategyStore::new(Dataset::from_dir(dir)?))
    }

    pub fn dataset(&self, profile: Profile) -> &Dataset {
        match profile {
            Profile::Gto => &self.gto,
            Profile::RecPassif => &self.rec_passif,
            Profile::RecAggro => &self.rec_aggro,
        }
    }

    /// Table for a spot at an exact depth. `None` is ordinary sparse coverage.
    pub fn lookup(&self, profile: Profile, spot: &SpotDescriptor, effective_bb: u32) -> Option<&StrategyTable> {
        self.dataset(profile).find(&spot.spot.query(), effective_bb)
    }
}
