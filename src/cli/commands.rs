//! CLI command handlers.

use std::sync::Arc;

use almanac::calendar::{
    directory, CalendarEntity, CalendarLookup, CalendarRegistry, SystemClock, ViewMode, ViewQuery,
};
use almanac::error::CalendarError;
use almanac::Config;
use anyhow::Result;

use super::output;

fn open_registry(config: &Config) -> Result<CalendarRegistry> {
    Ok(CalendarRegistry::from_config(config, Arc::new(SystemClock))?)
}

fn resolve(registry: &CalendarRegistry, entity_id: &str) -> Result<Arc<CalendarEntity>> {
    registry
        .resolve(entity_id)
        .ok_or_else(|| CalendarError::UnknownCalendar(entity_id.to_string()).into())
}

/// Run the list command.
pub fn run_list(config: Config, json_output: bool) -> Result<()> {
    let registry = open_registry(&config)?;
    output::print_directory(&directory(&registry), json_output);
    Ok(())
}

/// Run the view command.
pub fn run_view(
    config: Config,
    entity_id: String,
    mode: String,
    count: Option<usize>,
    json_output: bool,
) -> Result<()> {
    let registry = open_registry(&config)?;
    let entity = resolve(&registry, &entity_id)?;

    let mode: ViewMode = mode.parse()?;
    let query = ViewQuery::new(mode).with_count(count.unwrap_or(config.calendar.default_count));
    let events = entity.view_events(&query)?;

    output::print_events(&events, json_output);
    Ok(())
}

/// Run the state command.
pub fn run_state(config: Config, entity_id: String, json_output: bool) -> Result<()> {
    let registry = open_registry(&config)?;
    let entity = resolve(&registry, &entity_id)?;
    entity.refresh()?;

    output::print_state(&entity, json_output);
    Ok(())
}
