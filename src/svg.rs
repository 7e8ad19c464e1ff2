use crate::render::{Scene, Shape};
use anyhow::Result;
use std::path::Path;

/// Serialize a scene to a standalone SVG document, primitives in draw order.
pub fn render_svg(scene: &Scene) -> String {
    let mut svg = String::new();
    let width = scene.width;
    let height = scene.height;

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    ));

    for primitive in &scene.primitives {
        let data_id = primitive
            .node_id
            .as_deref()
            .map(|id| format!(" data-node-id=\"{}\"", escape_xml(id)))
            .unwrap_or_default();
        match &primitive.shape {
            Shape::Background {
                width,
                height,
                fill,
                grid,
            } => {
                svg.push_str(&format!(
                    "<rect width=\"{width}\" height=\"{height}\" fill=\"{}\"/>",
                    escape_xml(fill)
                ));
                if let Some(grid) = grid {
                    let half = grid.spacing / 2.0;
                    svg.push_str("<defs>");
                    svg.push_str(&format!(
                        "<pattern id=\"dot-grid\" width=\"{0}\" height=\"{0}\" patternUnits=\"userSpaceOnUse\"><circle cx=\"{half}\" cy=\"{half}\" r=\"{1}\" fill=\"{2}\" fill-opacity=\"{3}\"/></pattern>",
                        grid.spacing,
                        grid.dot_radius,
                        escape_xml(&grid.color),
                        grid.opacity
                    ));
                    svg.push_str("</defs>");
                    svg.push_str(&format!(
                        "<rect width=\"{width}\" height=\"{height}\" fill=\"url(#dot-grid)\"/>"
                    ));
                }
            }
            Shape::Link {
                from,
                control_from,
                control_to,
                to,
                stroke,
            } => {
                svg.push_str(&format!(
                    "<path{data_id} d=\"M {:.2} {:.2} C {:.2} {:.2}, {:.2} {:.2}, {:.2} {:.2}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\"/>",
                    from.x,
                    from.y,
                    control_from.x,
                    control_from.y,
                    control_to.x,
                    control_to.y,
                    to.x,
                    to.y,
                    escape_xml(&stroke.color),
                    stroke.width
                ));
            }
            Shape::Box {
                rect,
                corner_radius,
                fill,
                stroke,
                shadow,
            } => {
                let style = shadow
                    .as_deref()
                    .map(|filter| format!(" style=\"filter: {}\"", escape_xml(filter)))
                    .unwrap_or_default();
                svg.push_str(&format!(
                    "<rect{data_id} x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"{corner_radius}\" ry=\"{corner_radius}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{}\"{style}/>",
                    rect.x,
                    rect.y,
                    rect.width,
                    rect.height,
                    escape_xml(fill),
                    escape_xml(&stroke.color),
                    stroke.width
                ));
            }
            Shape::Label {
                position,
                text,
                font_size,
                font_family,
                fill,
            } => {
                svg.push_str(&format!(
                    "<text{data_id} x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{font_size}px\" fill=\"{}\">{}</text>",
                    position.x,
                    position.y,
                    escape_xml(font_family),
                    escape_xml(fill),
                    escape_xml(text)
                ));
            }
        }
    }

    svg.push_str("</svg>");
    svg
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
