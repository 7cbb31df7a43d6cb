use anyhow::Result;
use viztaz::io::{describe, read_records};

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::InspectArgs) -> Result<()> {
    let items = read_records(&args.path)?;
    let summary = describe(&items);

    println!("Records: {}", summary.records);
    println!("Geometry types:");
    for (kind, count) in &summary.geometry_mix {
        println!("  {kind:<8} {count}");
    }
    println!("Columns:");
    for (name, ty) in &summary.columns {
        println!("  {name:<12} {ty}");
    }

    Ok(())
}
