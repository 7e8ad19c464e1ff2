use crate::config::Config;
use crate::error::Result;
use crate::interaction::{ClickEvent, Selection, apply_selection, handle_click};
use crate::ir::{RawRow, Record};
use crate::layout::{Bounds, compute_layout};
use crate::normalize::{TierRule, normalize_rows};
use crate::render::{Scene, render_scene};
use crate::tree::{Tree, build};
use tracing::{debug, info, instrument, warn};

/// Result of one full pipeline run.
#[derive(Debug, Clone)]
pub struct RenderOutput {
    /// `None` when the record set was empty.
    pub tree: Option<Tree>,
    pub scene: Scene,
}

/// Build, lay out and render already-normalized records.
#[instrument(level = "debug", skip_all, fields(records = records.len()))]
pub fn render_records(records: &[Record], config: &Config) -> Result<RenderOutput> {
    if records.is_empty() {
        debug!("empty record set");
        return Ok(RenderOutput {
            tree: None,
            scene: Scene::empty(config.render.width, config.render.height),
        });
    }
    let mut tree = build(records)?;
    compute_layout(
        &mut tree,
        Bounds::new(config.render.width, config.render.height),
        &config.layout,
    );
    let scene = render_scene(&tree, &config.theme, config);
    Ok(RenderOutput {
        tree: Some(tree),
        scene,
    })
}

/// Full pipeline from raw rows, using the tier pattern from `config`.
pub fn render_rows(rows: &[RawRow], config: &Config) -> Result<RenderOutput> {
    let rule = TierRule::from_pattern(config.layout.compact_label_pattern.as_deref())?;
    render_records(&normalize_rows(rows, &rule), config)
}

/// Identifies one rebuild request; only the most recent one may complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RebuildTicket(u64);

/// A live diagram: the last good scene plus the current selection.
///
/// Rebuilds are all-or-nothing. A failed rebuild keeps the previous scene, a
/// successful one replaces it and clears the selection.
#[derive(Debug)]
pub struct Diagram {
    config: Config,
    tier_rule: TierRule,
    generation: u64,
    current: Option<RenderOutput>,
    selection: Selection,
}

impl Diagram {
    pub fn new(config: Config) -> Result<Self> {
        let tier_rule = TierRule::from_pattern(config.layout.compact_label_pattern.as_deref())?;
        Ok(Self {
            config,
            tier_rule,
            generation: 0,
            current: None,
            selection: Selection::Unselected,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.current.as_ref().map(|output| &output.scene)
    }

    pub fn tree(&self) -> Option<&Tree> {
        self.current.as_ref().and_then(|output| output.tree.as_ref())
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Start a rebuild; any ticket handed out earlier becomes stale.
    pub fn begin_rebuild(&mut self) -> RebuildTicket {
        self.generation += 1;
        RebuildTicket(self.generation)
    }

    /// Finish a rebuild started with [`Diagram::begin_rebuild`].
    ///
    /// Returns `Ok(None)` when a newer rebuild was requested in the meantime;
    /// the rows are then discarded without running the pipeline.
    #[instrument(level = "debug", skip_all, fields(rows = rows.len()))]
    pub fn finish_rebuild(&mut self, ticket: RebuildTicket, rows: &[RawRow]) -> Result<Option<&Scene>> {
        if ticket.0 != self.generation {
            warn!(
                ticket = ticket.0,
                latest = self.generation,
                "discarding stale rebuild"
            );
            return Ok(None);
        }
        let records = normalize_rows(rows, &self.tier_rule);
        let output = render_records(&records, &self.config).inspect_err(|err| {
            warn!(%err, "rebuild failed, keeping previous scene");
        })?;
        info!(
            nodes = output.tree.as_ref().map_or(0, Tree::len),
            primitives = output.scene.primitives.len(),
            "diagram rebuilt"
        );
        self.selection = Selection::Unselected;
        Ok(Some(&self.current.insert(output).scene))
    }

    /// Rebuild immediately from a fresh record set.
    pub fn rebuild(&mut self, rows: &[RawRow]) -> Result<Option<&Scene>> {
        let ticket = self.begin_rebuild();
        self.finish_rebuild(ticket, rows)
    }

    /// Route a click to the interaction controller and keep its result.
    pub fn click(&mut self, event: &ClickEvent) -> Option<&Scene> {
        let output = self.current.as_mut()?;
        let selection = std::mem::take(&mut self.selection);
        let (selection, scene) = handle_click(&output.scene, selection, event, &self.config.theme);
        self.selection = selection;
        output.scene = scene;
        Some(&output.scene)
    }

    /// Select a node by id, as if its box had been clicked.
    pub fn select(&mut self, node_id: &str) -> Option<&Scene> {
        let event = ClickEvent::on_node(self.scene()?, node_id)
            .unwrap_or_else(|| ClickEvent::new(usize::MAX, node_id));
        self.click(&event)
    }

    /// Drop the highlight without rebuilding.
    pub fn clear_selection(&mut self) {
        self.selection = Selection::Unselected;
        if let Some(output) = self.current.as_mut() {
            apply_selection(&mut output.scene, &self.selection, &self.config.theme);
        }
    }
}
