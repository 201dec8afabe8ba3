pub mod chat;
pub mod config;
pub mod habit;
pub mod notify;
pub mod stats;
pub mod user;

use chrono::{Local, NaiveDate};
use habitpal_core::model::parse_day;
use habitpal_core::{Config, Store, ValidationError};
use rand::SeedableRng;
use rand_pcg::Pcg64;

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Open the store and load the config from the data directory.
pub fn open() -> Result<(Store, Config), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let store = Store::open()?;
    tracing::debug!(seed = ?config.partner.seed, "store and config opened");
    Ok((store, config))
}

/// Parse `--date`, falling back to the local calendar day.
pub fn day_or_today(date: Option<&str>) -> Result<NaiveDate, ValidationError> {
    match date {
        Some(raw) => parse_day(raw),
        None => Ok(Local::now().date_naive()),
    }
}

/// Reply generator, pinned when the config carries a seed.
pub fn rng(config: &Config) -> Pcg64 {
    match config.partner.seed {
        Some(seed) => Pcg64::seed_from_u64(seed),
        None => Pcg64::from_entropy(),
    }
}

/// First eight characters of an id, for listings.
pub fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}
