use crate::ir::NodeTier;
use crate::layout::Point;
use crate::render::{Primitive, Scene};
use crate::session::RenderOutput;
use crate::tree::Tree;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct SceneDump {
    pub width: f32,
    pub height: f32,
    /// Shift from layout coordinates (`nodes`) to scene coordinates (`primitives`).
    pub offset: Point,
    pub nodes: Vec<NodeDump>,
    pub links: Vec<LinkDump>,
    pub primitives: Vec<Primitive>,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub id: String,
    pub name: String,
    pub parent: Option<String>,
    pub depth: usize,
    pub tier: NodeTier,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub link_offset: f32,
}

#[derive(Debug, Serialize)]
pub struct LinkDump {
    pub parent: String,
    pub child: String,
}

impl SceneDump {
    pub fn from_scene(tree: Option<&Tree>, scene: &Scene) -> Self {
        let nodes = tree
            .map(|tree| {
                tree.breadth_first()
                    .map(|(_, node)| NodeDump {
                        id: node.id().to_string(),
                        name: node.record.name.clone(),
                        parent: node.record.parent.clone(),
                        depth: node.depth,
                        tier: node.record.tier,
                        x: node.position.x,
                        y: node.position.y,
                        width: node.size.width,
                        height: node.size.height,
                        link_offset: node.link_offset,
                    })
                    .collect()
            })
            .unwrap_or_default();

        let links = tree
            .map(|tree| {
                tree.links()
                    .into_iter()
                    .map(|link| LinkDump {
                        parent: tree.node(link.parent).id().to_string(),
                        child: tree.node(link.child).id().to_string(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        SceneDump {
            width: scene.width,
            height: scene.height,
            offset: scene.offset,
            nodes,
            links,
            primitives: scene.primitives.clone(),
        }
    }
}

/// Write the dump as pretty JSON to `path`, or stdout when omitted.
pub fn write_scene_dump(path: Option<&Path>, output: &RenderOutput) -> anyhow::Result<()> {
    let dump = SceneDump::from_scene(output.tree.as_ref(), &output.scene);
    match path {
        Some(path) => {
            let file = File::create(path)?;
            let writer = BufWriter::new(file);
            serde_json::to_writer_pretty(writer, &dump)?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            serde_json::to_writer_pretty(&mut writer, &dump)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::ir::RawRow;
    use crate::session::render_rows;

    #[test]
    fn dump_lists_nodes_links_and_primitives() {
        let rows = vec![
            RawRow::new("root", "Root", ""),
            RawRow::new("A", "Phase A", "root"),
        ];
        let output = render_rows(&rows, &Config::default()).unwrap();
        let dump = SceneDump::from_scene(output.tree.as_ref(), &output.scene);
        assert_eq!(dump.nodes.len(), 2);
        assert_eq!(dump.nodes[1].tier, NodeTier::Compact);
        assert_eq!(dump.links.len(), 1);
        assert_eq!(dump.links[0].child, "A");

        let json = serde_json::to_value(&dump).unwrap();
        assert_eq!(json["primitives"][0]["shape"]["kind"], "background");
        assert_eq!(json["nodes"][1]["tier"], "compact");
        assert_eq!(json["offset"]["x"], 0.0);
    }
}
