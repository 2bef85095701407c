//! CLI Command Implementations
//!
//! Each command opens the workspace from the given snapshot directory,
//! inspects or mutates it, and prints a human-readable report.

use std::path::Path;

use log::info;

use crate::error::Result;
use crate::model::LayerNode;
use crate::state::{JsonFileStore, Workspace};

/// Initialize a workspace directory with the default layer set.
pub fn init(path: &Path) -> Result<()> {
    info!("Initializing workspace at: {}", path.display());

    let workspace = Workspace::open(JsonFileStore::new(path))?;
    workspace.save()?;

    println!("Workspace initialized: {}", path.display());
    println!("Layers seeded: {}", workspace.layers.layer_count());
    Ok(())
}

/// Print the layer tree with effective visibility/lock markers.
pub fn tree(path: &Path) -> Result<()> {
    let workspace = Workspace::open(JsonFileStore::new(path))?;

    fn print_node(workspace: &Workspace<JsonFileStore>, node: &LayerNode) {
        let indent = "  ".repeat(node.depth);
        let visible = if workspace.layers.is_layer_visible(&node.layer.id) {
            " "
        } else {
            "H"
        };
        let locked = if workspace.layers.is_layer_locked(&node.layer.id) {
            "L"
        } else {
            " "
        };
        let active = if workspace.layers.active_layer_id() == Some(node.layer.id.as_str()) {
            " *"
        } else {
            ""
        };
        println!(
            "{}[{}{}] {} ({}){}",
            indent, visible, locked, node.layer.name, node.layer.color, active
        );
        for child in &node.children {
            print_node(workspace, child);
        }
    }

    for node in workspace.layers.layer_tree() {
        print_node(&workspace, &node);
    }
    Ok(())
}

/// List sites, buildings and levels with their elevation ranges.
pub fn levels(path: &Path) -> Result<()> {
    let workspace = Workspace::open(JsonFileStore::new(path))?;

    for site in workspace.levels.sites() {
        println!("Site: {} (elevation {} m)", site.name, site.elevation);
        for building in workspace.levels.buildings_in_site(&site.id) {
            println!("  Building: {} ({:?})", building.name, building.building_type);
            for level in workspace.levels.levels_in_building(&building.id) {
                let (start, end) = level.range();
                println!(
                    "    Level {}: {} [{}, {}) m, {} object(s)",
                    level.level_number,
                    level.name,
                    start,
                    end,
                    level.object_ids.len()
                );
            }
        }
    }
    Ok(())
}

/// Report overlapping level ranges per building.
pub fn check(path: &Path) -> Result<()> {
    let workspace = Workspace::open(JsonFileStore::new(path))?;

    let mut clean = true;
    for site in workspace.levels.sites() {
        for building in workspace.levels.buildings_in_site(&site.id) {
            let conflicts = workspace.levels.check_overlapping_levels(&building.id);
            if !conflicts.is_empty() {
                clean = false;
                println!("Building '{}':", building.name);
                for conflict in conflicts {
                    println!("  {}", conflict);
                }
            }
        }
    }
    if clean {
        println!("No overlapping levels found");
    }
    Ok(())
}

/// Print workspace summary statistics.
pub fn summary(path: &Path) -> Result<()> {
    let workspace = Workspace::open(JsonFileStore::new(path))?;

    let stats = workspace.layers.layer_stats();
    println!(
        "Layers: {} total, {} visible, {} locked, max depth {}",
        stats.total, stats.visible, stats.locked, stats.max_depth
    );
    println!(
        "Sites: {}, buildings: {}, levels: {}",
        workspace.levels.site_count(),
        workspace.levels.building_count(),
        workspace.levels.level_count()
    );
    println!("Objects: {}", workspace.objects.len());
    Ok(())
}
