//! Output formatting for CLI commands.
//!
//! This module handles formatting output as either JSON or human-readable text.

use almanac::calendar::{CalendarEntity, CalendarEvent, CalendarListing};

fn print_json(value: &impl serde::Serialize) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("Failed to serialize output: {}", e),
    }
}

/// Print the calendar directory.
pub fn print_directory(listing: &[CalendarListing], json: bool) {
    if json {
        print_json(&listing);
    } else if listing.is_empty() {
        println!("No calendars configured.");
    } else {
        for entry in listing {
            println!("{:<30} {}", entry.entity_id, entry.name);
        }
    }
}

/// Print a list of events.
pub fn print_events(events: &[CalendarEvent], json: bool) {
    if json {
        print_json(&events);
        return;
    }

    if events.is_empty() {
        println!("No events.");
        return;
    }

    for event in events {
        println!(
            "{} - {}  {}",
            event.start.format("%Y-%m-%d %H:%M %:z"),
            event.end.format("%H:%M"),
            event.title.as_deref().unwrap_or("(untitled)")
        );
        if let Some(location) = &event.location {
            println!("    @ {}", location);
        }
    }
}

/// Print the state of a calendar.
pub fn print_state(entity: &CalendarEntity, json: bool) {
    let state = entity
        .state()
        .map(|s| s.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    if json {
        print_json(&serde_json::json!({
            "entity_id": entity.entity_id(),
            "name": entity.name(),
            "state": state,
            "attributes": entity.state_attributes(),
        }));
        return;
    }

    println!("{} ({}): {}", entity.name(), entity.entity_id(), state);
    match entity.current_events() {
        Ok(current) if !current.is_empty() => {
            println!("\nHappening now:");
            print_events(&current, false);
        }
        Ok(_) => {}
        Err(e) => eprintln!("Failed to compute current events: {}", e),
    }
}
