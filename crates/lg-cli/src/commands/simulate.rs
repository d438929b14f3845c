use std::collections::BTreeMap;
use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use lg_core::{Entity, EntityKind};
use lg_simulation::{SimEventKind, Simulation, actor, ball};

pub fn run(
    ticks: u64,
    dt: f32,
    seed: Option<u64>,
    config: Option<&Path>,
    verbose: bool,
) -> Result<(), String> {
    let mut config = super::load_config(config)?;
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }
    let seed = config.seed;

    let mut sim = Simulation::with_default_scene(config)
        .map_err(|e| format!("cannot set up the scene: {e}"))?;
    sim.run(ticks, dt)
        .map_err(|e| format!("simulation error: {e}"))?;

    // Header
    println!(
        "  {} {}",
        "Simulation".bold(),
        format!("({ticks} ticks, dt={dt}s, seed={seed})").dimmed()
    );
    println!(
        "  {} entities, {} events logged, {:.1}s simulated",
        sim.world().entity_count(),
        sim.events().total(),
        sim.clock().elapsed_seconds()
    );
    println!();

    if verbose {
        println!("  {}", "Event Log".bold().underline());
        println!();
        for event in sim.events().events() {
            let tick_label = format!("[tick {:>4}]", event.tick).dimmed();
            let desc = colorize_event(&event.kind, &event.description);
            println!("  {tick_label} {desc}");
        }
        if sim.events().is_empty() {
            println!("  {}", "(no events)".dimmed());
        }
        println!();
    } else {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for event in sim.events().events() {
            *counts.entry(event.kind.label()).or_default() += 1;
        }
        if !counts.is_empty() {
            println!("  {}", "Event Summary".bold().underline());
            println!();
            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec!["Event", "Count"]);
            for (label, count) in counts {
                table.add_row(vec![label.to_string(), count.to_string()]);
            }
            println!("{table}");
            println!();
        }
    }

    // Entity table
    println!("  {}", "Entity Status".bold().underline());
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Id", "Kind", "State", "Position", "Holding", "Mood"]);
    for entity in sim.world().entities() {
        let holding = match (sim.held_by(entity.id), sim.holder_of(entity.id)) {
            (Some(held), _) => format!("holds {held}"),
            (None, Some(holder)) => format!("held by {holder}"),
            (None, None) => "--".to_string(),
        };
        table.add_row(vec![
            entity.id.to_string(),
            entity.kind.to_string(),
            state_label(&sim, entity),
            entity.position().to_string(),
            holding,
            entity
                .components
                .actor
                .as_ref()
                .and_then(|a| a.mood)
                .map(|m| m.mood.text().to_string())
                .unwrap_or_else(|| "--".to_string()),
        ]);
    }
    println!("{table}");
    println!();

    Ok(())
}

fn state_label(sim: &Simulation, entity: &Entity) -> String {
    let state = match entity.kind {
        EntityKind::Actor => actor::component(sim.world(), entity.id).map(|a| a.state.to_string()),
        EntityKind::Ball => ball::component(sim.world(), entity.id).map(|b| b.state.to_string()),
        EntityKind::Bed if sim.held_by(entity.id).is_some() => Some("occupied".to_string()),
        EntityKind::Bed => Some("empty".to_string()),
    };
    let state = state.unwrap_or_else(|| "--".to_string());
    if entity.has_active_physics() {
        format!("{state} (flying)")
    } else {
        state
    }
}

fn colorize_event(kind: &SimEventKind, description: &str) -> colored::ColoredString {
    match kind {
        SimEventKind::Spawned { .. } | SimEventKind::Despawned { .. } => description.bold(),
        SimEventKind::ActorStateChanged { .. } => description.cyan(),
        SimEventKind::BallStateChanged { .. } => description.blue(),
        SimEventKind::MoodShown { .. } => description.magenta(),
        SimEventKind::HoldingStarted { .. } => description.green(),
        SimEventKind::HoldingEnded { .. } => description.yellow(),
        SimEventKind::Thrown { .. } => description.red().bold(),
        SimEventKind::Impact { .. } | SimEventKind::Trail { .. } => description.dimmed(),
        SimEventKind::DragStarted { .. } | SimEventKind::DragEnded { .. } => description.normal(),
    }
}
