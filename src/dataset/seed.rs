use crate::dataset::{Dataset, Result, loader};

pub const SEED_DATASET_NAME: &str = "Production_Replica";

const SEED_JSON: &str = include_str!("seed.json");

/// Sample dataset the explorer starts with when no dataset file is given.
pub fn dataset() -> Result<Dataset> {
    loader::from_json_str(SEED_JSON)
}
