//! Plain-text summaries printed by the commands.

use std::collections::HashMap;

use gear_core::{Gearpiece, Gearset, GearsetId, ItemId, ItemOracle, RequirementIndex};
use gear_runtime::PassOutcome;

pub fn pass_summary(outcome: &PassOutcome) -> String {
    let report = &outcome.report;
    format!(
        "pass {}: {} assigned, {} unassigned, {} reserved, {} changes in {} gearset(s)",
        outcome.pass,
        report.assigned,
        report.unassigned,
        report.reserved,
        report.mutations.len(),
        report.changed.len(),
    )
}

pub fn gearset_summary(gearset: &Gearset) -> String {
    let total = gearset.gearpieces().len();
    let priority = gearset
        .priority()
        .map_or_else(|| "auto".to_owned(), |p| p.to_string());
    let mut lines = vec![format!(
        "{} [{}] priority {}{}: {}/{} collected, {}/{} complete",
        gearset.name(),
        gearset.class_job(),
        priority,
        if gearset.is_active() { "" } else { " (inactive)" },
        gearset.collected_count(),
        total,
        gearset.completed_count(),
        total,
    )];
    lines.extend(gearset.gearpieces().iter().map(gearpiece_line));
    lines.join("\n")
}

fn gearpiece_line(piece: &Gearpiece) -> String {
    let mark = if piece.is_complete() {
        'x'
    } else if piece.is_collected() {
        '~'
    } else {
        ' '
    };
    let mut line = format!("  [{mark}] {} ({})", piece.item_name(), piece.slot());

    if piece.is_manually_collected() {
        line.push_str(" manual");
    }
    if !piece.is_collected() {
        let remaining = piece.min_remaining_items(None);
        if piece.is_obtainable() {
            line.push_str(" obtainable now");
        } else if remaining > 0 {
            line.push_str(&format!(" needs {remaining} more item(s)"));
        }
    }
    let missing = piece.materia().missing();
    if !missing.is_empty() {
        let ids: Vec<String> = missing.iter().map(ItemId::to_string).collect();
        line.push_str(&format!(" missing materia {}", ids.join(", ")));
    }
    line
}

/// Outstanding requirements per item, optionally for a single item.
pub fn needs_summary(
    index: &RequirementIndex,
    gearsets: &[Gearset],
    oracle: &dyn ItemOracle,
    only: Option<ItemId>,
) -> String {
    let names: HashMap<GearsetId, &str> = gearsets.iter().map(|g| (g.id(), g.name())).collect();
    let mut lines = Vec::new();

    for (item, requirements) in index.iter() {
        if only.is_some_and(|wanted| wanted != item) {
            continue;
        }
        let outstanding = index.outstanding_count(item);
        if outstanding == 0 {
            continue;
        }
        let name = oracle
            .item_name(item)
            .unwrap_or_else(|| "unknown item".to_owned());
        lines.push(format!("{item} {name}: {outstanding} outstanding"));

        for requirement in requirements.iter().filter(|r| !r.is_collected) {
            let gearset = names.get(&requirement.gearset).copied().unwrap_or("?");
            let target = oracle
                .item_name(requirement.gearpiece_item)
                .unwrap_or_else(|| requirement.gearpiece_item.to_string());
            lines.push(format!("  {gearset} / {target} ({})", requirement.kind));
        }
    }

    if lines.is_empty() {
        "nothing outstanding".to_owned()
    } else {
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use gear_content::{ContentFactory, ScenarioLoader, StaticItemData};
    use gear_core::{InventorySnapshot, Solver};

    use super::*;
    use crate::dirs::bundled_data_dir;

    fn resolved() -> (StaticItemData, Vec<Gearset>) {
        let data = ContentFactory::new(bundled_data_dir())
            .load_item_data()
            .unwrap();
        let scenario = ScenarioLoader::load(&bundled_data_dir().join("scenario.ron")).unwrap();
        let mut gearsets = scenario.build_gearsets(&data);
        let inventory = InventorySnapshot::from_stacks(scenario.inventory.clone(), &data);
        Solver::default().resolve(&mut gearsets, None, &inventory);
        (data, gearsets)
    }

    #[test]
    fn gearset_summary_lists_pieces() {
        let (_, gearsets) = resolved();
        let summary = gearset_summary(&gearsets[0]);
        let lines: Vec<&str> = summary.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Savage BiS [DRG] priority 1: 1/3 collected, 0/3 complete"));
        assert!(lines[3].starts_with("  [~] Ascension Ring of Maiming (ring)"));
        assert!(lines[3].ends_with("missing materia #33932"));
    }

    #[test]
    fn needs_summary_filters_by_item() {
        let (data, gearsets) = resolved();
        let index = RequirementIndex::build(&gearsets);

        let tomes = needs_summary(&index, &gearsets, &data, Some(ItemId(28)));
        let lines: Vec<&str> = tomes.lines().collect();
        assert_eq!(lines[0], "#28 Allagan Tomestone of Aesthetics: 3 outstanding");
        assert!(lines[1..].iter().all(|l| l.starts_with("  Prog / ")));

        let empty = RequirementIndex::build(&[]);
        assert_eq!(needs_summary(&empty, &[], &data, None), "nothing outstanding");
    }
}
