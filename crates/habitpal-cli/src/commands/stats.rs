use habitpal_core::Tracker;

use super::{day_or_today, open, CmdResult};

pub fn run(date: Option<&str>) -> CmdResult {
    let (store, config) = open()?;
    let tracker = Tracker::new(&store, &config);
    let today = day_or_today(date)?;

    let stats = tracker.stats(today)?;
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
