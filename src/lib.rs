#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod interaction;
pub mod ir;
pub mod layout;
pub mod normalize;
pub mod render;
pub mod sample;
pub mod scene_dump;
pub mod session;
pub mod svg;
pub mod theme;
pub mod tree;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, RenderConfig, SeparationPolicy, load_config};
pub use error::{Error, Result};
pub use input::parse_rows;
pub use interaction::{ClickEvent, Selection, apply_selection, handle_click};
pub use ir::{NodeTier, RawRow, Record};
pub use layout::compute_layout;
pub use normalize::{TierRule, normalize_rows};
pub use render::{Primitive, Scene, Shape, render_scene};
pub use session::{Diagram, RebuildTicket, RenderOutput, render_records, render_rows};
pub use svg::render_svg;
pub use theme::Theme;
pub use tree::{Tree, build};
