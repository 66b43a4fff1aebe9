//! Layouts command implementation - prints the template catalog.

use super::{CliError, OutputFormat};
use gatewalk::maze::{CellKind, GridPos, LayoutCatalog, MazeLayout};
use serde::Serialize;

/// JSON summary of one template.
#[derive(Serialize)]
struct LayoutSummary {
    template: usize,
    width: u16,
    height: u16,
    start: GridPos,
    end: GridPos,
    gates: Vec<GridPos>,
}

impl LayoutSummary {
    fn new(template: usize, layout: &MazeLayout) -> Self {
        Self {
            template,
            width: layout.width(),
            height: layout.height(),
            start: layout.start(),
            end: layout.end(),
            gates: layout.gate_positions(),
        }
    }
}

/// Execute the layouts command.
///
/// # Errors
///
/// Returns an error if the built-in catalog fails to parse or JSON
/// serialization fails.
pub(crate) fn execute(format: OutputFormat) -> Result<(), CliError> {
    let catalog = LayoutCatalog::builtin()?;

    match format {
        OutputFormat::Text => {
            for template in 0..catalog.len() {
                // layout_for_level cycles templates, so level = index + 1
                let layout = catalog.layout_for_level(template as u32 + 1);
                print_layout(template + 1, &layout);
            }
        }
        OutputFormat::Json => {
            let summaries: Vec<LayoutSummary> = (0..catalog.len())
                .map(|template| {
                    LayoutSummary::new(template + 1, &catalog.layout_for_level(template as u32 + 1))
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&summaries)?);
        }
    }

    Ok(())
}

fn print_layout(template: usize, layout: &MazeLayout) {
    println!(
        "Template {} ({}x{}), start {}, end {}",
        template,
        layout.width(),
        layout.height(),
        layout.start(),
        layout.end()
    );
    for y in 0..layout.height() {
        let row: String = (0..layout.width())
            .map(|x| {
                layout
                    .get(GridPos::new(x, y))
                    .map_or(' ', CellKind::glyph)
            })
            .collect();
        println!("  {row}");
    }
    let gates: Vec<String> = layout
        .gate_positions()
        .iter()
        .map(ToString::to_string)
        .collect();
    println!("  gates: {}", gates.join(", "));
    println!();
}
