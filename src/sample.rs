use crate::ir::RawRow;

const PILLARS: usize = 3;
const KEY_RESULTS: usize = 5;
const PHASES: usize = 5;
/// The last pillar splits every key result into this many backlogs.
const SPLIT_BACKLOGS: usize = 2;

/// Demo hierarchy: pillars, objectives, key results, backlogs and phases.
///
/// Header row first, then 142 records under a single `root`.
pub fn sample_rows() -> Vec<RawRow> {
    let mut rows = vec![
        RawRow::new("id", "name", "parent"),
        RawRow::new("root", "Matrioska", ""),
    ];
    for i in 1..=PILLARS {
        rows.push(RawRow::new(format!("P{i}"), format!("Pillar {i}"), "root"));
        rows.push(RawRow::new(format!("O{i}"), format!("Objective {i}"), format!("P{i}")));
        for j in 1..=KEY_RESULTS {
            let kr = format!("KR{i}{j}");
            rows.push(RawRow::new(kr.clone(), format!("Key Result {i}.{j}"), format!("O{i}")));
            if i < PILLARS {
                let pb = format!("PB{i}{j}");
                rows.push(RawRow::new(pb.clone(), format!("Product Backlog {i}.{j}"), kr));
                for k in 1..=PHASES {
                    rows.push(RawRow::new(
                        format!("Ph{i}{j}{k}"),
                        format!("Phase {i}.{j}.{k}"),
                        pb.clone(),
                    ));
                }
            } else {
                for p in 1..=SPLIT_BACKLOGS {
                    let pb = format!("PB{i}{j}{p}");
                    rows.push(RawRow::new(
                        pb.clone(),
                        format!("Product Backlog {i}.{j}.{p}"),
                        kr.clone(),
                    ));
                    for k in 1..=PHASES {
                        rows.push(RawRow::new(
                            format!("Ph{i}{j}{p}{k}"),
                            format!("Phase {i}.{j}.{p}.{k}"),
                            pb.clone(),
                        ));
                    }
                }
            }
        }
    }
    rows
}
