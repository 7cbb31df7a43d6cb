use std::{fs, path::Path, sync::Arc};

use anyhow::{Context, Result};
use log::{info, warn};
use viztaz::{io::read_layer, Event, LayerKind, Panel, Selectable, Session, SessionConfig};

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::SearchArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => SessionConfig::from_json_file(path)?,
        None => SessionConfig::default(),
    };

    info!("[search] loading layers");
    let old_zones = read_layer(LayerKind::OldZones, &args.old, &[])?;
    let new_zones = read_layer(LayerKind::NewZones, &args.new, &config.attribute_fields)?;
    let blocks = read_layer(LayerKind::Blocks, &args.blocks, &config.attribute_fields)?;

    let mut session = Session::new(Arc::new(old_zones), Arc::new(new_zones), Arc::new(blocks), config);

    if let Some(name) = &args.background {
        session.dispatch(Event::SetBackground(name.clone()))?;
    }

    info!("[search] searching around old zone {:?}", args.id);
    if let Err(err) = session.dispatch(Event::SubmitQuery { id: args.id.clone(), radius: args.radius.clone() }) {
        warn!("[search] query rejected: {err}");
    }

    if let Some(extra) = &args.extra {
        session.dispatch(Event::SubmitExtra(extra.clone()))?;
    }
    if !args.select_new.is_empty() {
        session.dispatch(Event::SetSelection { target: Selectable::NewZones, indices: args.select_new.clone() })?;
    }
    if !args.select_blocks.is_empty() {
        session.dispatch(Event::SetSelection { target: Selectable::Blocks, indices: args.select_blocks.clone() })?;
    }
    if let Some(panel) = &args.match_zoom {
        session.dispatch(Event::CopyViewport(panel.parse::<Panel>()?))?;
    }

    let json = session.snapshot_json().context("Failed to serialize session snapshot")?;
    match &args.output {
        Some(path) => write_output(path, &json)?,
        None => println!("{json}"),
    }

    Ok(())
}

fn write_output(path: &Path, json: &str) -> Result<()> {
    fs::write(path, json).with_context(|| format!("Failed to write output: {}", path.display()))?;
    info!("[search] wrote snapshot to {}", path.display());
    Ok(())
}
