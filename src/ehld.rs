//! Decoration of enhanced high-level diagrams (EHLD).
//!
//! An EHLD is a hand drawn SVG whose clickable areas are groups with
//! `id="REGION-<stId>"`, optionally paired with an `OVERLAY-<stId>` shape that
//! receives the analysis paint. Decorating one means adding inline styles to
//! the start tags of the affected elements, plus a `<defs>` block for
//! enrichment fills; the rest of the document is copied through byte for byte.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::ops::Range;

use log::{debug, warn};
use roxmltree::{Document, Node, ParsingOptions};

use crate::engine::{enrichment_overlay, expression_scale, GraphIndex, Overlay};
use crate::error::{ExportError, Result};
use crate::model::{AnalysisKind, AnalysisResult, NodeProperties};
use crate::profiles::{AnalysisProfile, Color, ProfileProperties};

const REGION_PREFIX: &str = "REGION-";
const OVERLAY_PREFIX: &str = "OVERLAY-";
const GRADIENT_PREFIX: &str = "ANALYSIS-";
const SELECTION_STROKE_WIDTH: u32 = 10;
const FLAG_STROKE_WIDTH: u32 = 6;

/// Bounding box units of an SVG paint server.
const UNIT_BOX: NodeProperties = NodeProperties {
    x: 0.0,
    y: 0.0,
    width: 1.0,
    height: 1.0,
};

/// Analysis painted onto the regions, one expression column at a time.
#[derive(Clone, Copy, Debug)]
pub struct EhldAnalysis<'a> {
    pub result: &'a AnalysisResult,
    pub profile: &'a AnalysisProfile,
    pub column: usize,
}

/// Stable ids of the regions that were marked.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EhldMarks {
    pub selected: Vec<String>,
    pub flagged: Vec<String>,
    pub analysed: Vec<String>,
}

enum RegionPaint {
    Fill(Color),
    Fraction { fraction: f64, color: Color },
}

/// Return `svg` with selected and flagged regions stroked and analysed
/// pathways painted. A region that is both selected and flagged only shows
/// the selection.
pub fn decorate_ehld<S, F>(
    svg: &str,
    index: &GraphIndex<'_>,
    selected: &[S],
    flags: &[F],
    properties: &ProfileProperties,
    analysis: Option<&EhldAnalysis<'_>>,
) -> Result<(String, EhldMarks)>
where
    S: AsRef<str>,
    F: AsRef<str>,
{
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(svg, options)?;
    if let Some(analysis) = analysis {
        check_column(analysis)?;
    }
    let selected: HashSet<i64> = index.resolve_all(selected).into_iter().collect();
    let flagged: HashSet<i64> = index.resolve_all(flags).into_iter().collect();

    let elements: Vec<Node<'_, '_>> = doc.descendants().filter(|node| node.is_element()).collect();
    let overlays: HashMap<&str, Node<'_, '_>> = elements
        .iter()
        .filter_map(|node| {
            let st_id = node.attribute("id")?.strip_prefix(OVERLAY_PREFIX)?;
            Some((st_id, *node))
        })
        .collect();

    let mut marks = EhldMarks::default();
    let mut styles: BTreeMap<usize, (Node<'_, '_>, Vec<String>)> = BTreeMap::new();
    let mut defs = Vec::new();

    for region in &elements {
        let Some(st_id) = region
            .attribute("id")
            .and_then(|id| id.strip_prefix(REGION_PREFIX))
        else {
            continue;
        };
        let db_id = index.resolve(st_id);
        if let Some(db_id) = db_id {
            if selected.contains(&db_id) {
                marks.selected.push(st_id.to_string());
                let style = stroke_style(properties.selection, SELECTION_STROKE_WIDTH);
                add_style(&mut styles, *region, style);
            } else if flagged.contains(&db_id) {
                marks.flagged.push(st_id.to_string());
                let style = stroke_style(properties.flag, FLAG_STROKE_WIDTH);
                add_style(&mut styles, *region, style);
            }
        }

        let Some(paint) = analysis.and_then(|analysis| region_paint(analysis, st_id, db_id)) else {
            continue;
        };
        let target = overlays.get(st_id).copied().unwrap_or(*region);
        marks.analysed.push(st_id.to_string());
        match paint {
            RegionPaint::Fill(color) => {
                add_style(&mut styles, target, format!("fill:{}", color.to_hex()));
            }
            RegionPaint::Fraction { fraction, color } => {
                defs.push(fraction_gradient(st_id, fraction, color));
                add_style(&mut styles, target, format!("fill:url(#{GRADIENT_PREFIX}{st_id})"));
            }
        }
    }
    debug!(
        "EHLD regions: {} selected, {} flagged, {} analysed",
        marks.selected.len(),
        marks.flagged.len(),
        marks.analysed.len()
    );

    let mut edits: Vec<(usize, String)> = styles
        .into_values()
        .filter_map(|(node, styles)| style_edit(svg, node, &styles.join(";")))
        .collect();
    if !defs.is_empty() {
        let root = doc.root_element();
        match svg[..root.range().end].rfind("</") {
            Some(at) if at > root.range().start => {
                edits.push((at, format!("<defs>{}</defs>", defs.concat())));
            }
            _ => warn!("EHLD root element has no closing tag; enrichment fills skipped"),
        }
    }

    let mut output = svg.to_string();
    edits.sort_by(|a, b| b.0.cmp(&a.0));
    for (at, text) in edits {
        output.insert_str(at, &text);
    }
    Ok((output, marks))
}

fn add_style<'a, 'input>(
    styles: &mut BTreeMap<usize, (Node<'a, 'input>, Vec<String>)>,
    node: Node<'a, 'input>,
    style: String,
) {
    styles
        .entry(node.range().start)
        .or_insert_with(|| (node, Vec::new()))
        .1
        .push(style);
}

fn check_column(analysis: &EhldAnalysis<'_>) -> Result<()> {
    let columns = analysis.result.column_count();
    let column = analysis.column;
    if analysis.result.kind() == AnalysisKind::Expression && columns > 0 && column >= columns {
        return Err(ExportError::ColumnOutOfRange { column, columns });
    }
    Ok(())
}

fn region_paint(
    analysis: &EhldAnalysis<'_>,
    st_id: &str,
    db_id: Option<i64>,
) -> Option<RegionPaint> {
    let pathway = analysis.result.pathway(st_id, db_id)?;
    match analysis.result.kind() {
        AnalysisKind::None => None,
        AnalysisKind::Overrepresentation | AnalysisKind::SpeciesComparison => {
            let gradient = &analysis.profile.enrichment.gradient;
            match enrichment_overlay(UNIT_BOX, pathway.entities.ratio(), gradient) {
                Overlay::Enrichment { area, color, .. } => Some(RegionPaint::Fraction {
                    fraction: area.width,
                    color,
                }),
                _ => None,
            }
        }
        AnalysisKind::Expression => {
            let value = pathway.entities.value(analysis.column)?;
            let (min, max) = analysis.result.value_range();
            let gradient = &analysis.profile.expression.gradient;
            Some(RegionPaint::Fill(gradient.interpolate(expression_scale(value, min, max))))
        }
    }
}

/// Horizontal hard-stop gradient: `color` up to `fraction`, clear after it.
fn fraction_gradient(st_id: &str, fraction: f64, color: Color) -> String {
    let hex = color.to_hex();
    format!(
        "<linearGradient id=\"{GRADIENT_PREFIX}{st_id}\" x1=\"0\" y1=\"0\" x2=\"1\" y2=\"0\">\
         <stop offset=\"{fraction}\" stop-color=\"{hex}\"/>\
         <stop offset=\"{fraction}\" stop-color=\"{hex}\" stop-opacity=\"0\"/>\
         </linearGradient>"
    )
}

fn stroke_style(color: Color, width: u32) -> String {
    format!("stroke:{};stroke-width:{width}", color.to_hex())
}

/// Insertion that adds `style` to `element`: appended to its style attribute,
/// or written as a new one right after the tag name.
fn style_edit(svg: &str, element: Node<'_, '_>, style: &str) -> Option<(usize, String)> {
    match element.attribute_node("style") {
        Some(attribute) => {
            let value = attribute_value(svg, attribute.position())?;
            let current = svg[value.clone()].trim_end();
            let separator = if current.is_empty() || current.ends_with(';') {
                ""
            } else {
                ";"
            };
            Some((value.end, format!("{separator}{style}")))
        }
        None => {
            let name_start = element.range().start + 1;
            let name_len = svg
                .get(name_start..)?
                .find(|c: char| c.is_ascii_whitespace() || c == '/' || c == '>')?;
            Some((name_start + name_len, format!(" style=\"{style}\"")))
        }
    }
}

/// Raw value, quotes excluded, of the attribute whose name starts at `position`.
fn attribute_value(svg: &str, position: usize) -> Option<Range<usize>> {
    let rest = svg.get(position..)?;
    let open = rest.find(['"', '\''])?;
    let quote = rest[open..].chars().next()?;
    let start = position + open + 1;
    let len = svg[start..].find(quote)?;
    Some(start..start + len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Diagram, ExpressionSummary, Graph, GraphEvent, PathwayEntities, PathwaySummary,
    };
    use crate::profiles::ColorProfiles;

    const NONE: [&str; 0] = [];

    fn graph() -> Graph {
        let event = |db_id: i64| GraphEvent {
            db_id,
            st_id: Some(format!("R-HSA-{db_id}")),
            display_name: format!("pathway {db_id}"),
        };
        Graph {
            edges: vec![event(10), event(20), event(30)],
            ..Graph::default()
        }
    }

    const SVG: &str = concat!(
        r#"<svg xmlns="http://www.w3.org/2000/svg">"#,
        r#"<g id="REGION-R-HSA-10"><path d="M0 0"/></g>"#,
        r#"<g id='REGION-R-HSA-20' style="fill:red"/>"#,
        r#"<g style="opacity:0.5;" id="REGION-R-HSA-30"></g>"#,
        r#"<g id="OVERLAY-R-HSA-10"/>"#,
        r#"</svg>"#
    );

    fn properties() -> ProfileProperties {
        ProfileProperties {
            selection: Color::rgb(0, 0, 255),
            flag: Color::rgb(255, 0, 255),
            ..ProfileProperties::default()
        }
    }

    fn pathway(st_id: &str, found: usize, total: usize, exp: Vec<Option<f64>>) -> PathwaySummary {
        PathwaySummary {
            st_id: st_id.to_string(),
            db_id: None,
            entities: PathwayEntities { found, total, exp },
        }
    }

    fn result(tag: &str, pathways: Vec<PathwaySummary>) -> AnalysisResult {
        AnalysisResult {
            analysis_type: Some(tag.to_string()),
            expression: Some(ExpressionSummary {
                min: Some(0.0),
                max: Some(10.0),
                column_names: Vec::new(),
            }),
            pathways,
            ..AnalysisResult::default()
        }
    }

    #[test]
    fn selected_region_gets_a_new_style_attribute() {
        let (diagram, graph) = (Diagram::default(), graph());
        let index = GraphIndex::new(&diagram, &graph);
        let (svg, marks) =
            decorate_ehld(SVG, &index, &["R-HSA-10"], &NONE, &properties(), None).unwrap();
        assert!(svg.contains(
            r#"<g style="stroke:#0000ff;stroke-width:10" id="REGION-R-HSA-10">"#
        ));
        assert!(svg.contains(r#"<g id="OVERLAY-R-HSA-10"/>"#));
        assert_eq!(marks.selected, vec!["R-HSA-10".to_string()]);
        assert!(roxmltree::Document::parse(&svg).is_ok());
    }

    #[test]
    fn existing_styles_are_extended() {
        let (diagram, graph) = (Diagram::default(), graph());
        let index = GraphIndex::new(&diagram, &graph);
        let (svg, marks) =
            decorate_ehld(SVG, &index, &["R-HSA-30"], &["20"], &properties(), None).unwrap();
        assert!(svg.contains(
            r#"<g id='REGION-R-HSA-20' style="fill:red;stroke:#ff00ff;stroke-width:6"/>"#
        ));
        assert!(svg.contains(
            r#"<g style="opacity:0.5;stroke:#0000ff;stroke-width:10" id="REGION-R-HSA-30">"#
        ));
        assert_eq!(marks.flagged, vec!["R-HSA-20".to_string()]);
    }

    #[test]
    fn selection_wins_over_flag() {
        let (diagram, graph) = (Diagram::default(), graph());
        let index = GraphIndex::new(&diagram, &graph);
        let (svg, marks) =
            decorate_ehld(SVG, &index, &["R-HSA-10"], &["R-HSA-10"], &properties(), None).unwrap();
        assert!(!svg.contains("#ff00ff"));
        assert!(marks.flagged.is_empty());
    }

    #[test]
    fn nothing_selected_leaves_the_document_untouched() {
        let (diagram, graph) = (Diagram::default(), graph());
        let index = GraphIndex::new(&diagram, &graph);
        let (svg, marks) =
            decorate_ehld(SVG, &index, &["R-HSA-99"], &NONE, &properties(), None).unwrap();
        assert_eq!(svg, SVG);
        assert_eq!(marks, EhldMarks::default());
    }

    #[test]
    fn malformed_documents_are_rejected() {
        let (diagram, graph) = (Diagram::default(), graph());
        let index = GraphIndex::new(&diagram, &graph);
        let result = decorate_ehld("<svg><g></svg>", &index, &NONE, &NONE, &properties(), None);
        assert!(matches!(result, Err(ExportError::Svg(_))));
    }

    #[test]
    fn enrichment_fills_the_overlay_up_to_the_found_fraction() {
        let (diagram, graph) = (Diagram::default(), graph());
        let index = GraphIndex::new(&diagram, &graph);
        let profile = ColorProfiles::standard().unwrap().analysis;
        let result = result("OVERREPRESENTATION", vec![pathway("R-HSA-10", 1, 4, Vec::new())]);
        let analysis = EhldAnalysis {
            result: &result,
            profile: &profile,
            column: 0,
        };
        let (svg, marks) =
            decorate_ehld(SVG, &index, &NONE, &NONE, &properties(), Some(&analysis)).unwrap();
        assert!(svg.contains(r#"<g style="fill:url(#ANALYSIS-R-HSA-10)" id="OVERLAY-R-HSA-10"/>"#));
        assert!(svg.contains(r#"<g id="REGION-R-HSA-10"><path"#));
        assert!(svg.contains(r#"<linearGradient id="ANALYSIS-R-HSA-10""#));
        assert!(svg.contains(r#"<stop offset="0.25""#));
        assert!(svg.ends_with("</defs></svg>"));
        assert_eq!(marks.analysed, vec!["R-HSA-10".to_string()]);

        let doc = roxmltree::Document::parse(&svg).unwrap();
        let stops: Vec<_> = doc.descendants().filter(|n| n.has_tag_name("stop")).collect();
        assert_eq!(stops.len(), 2);
        assert_eq!(stops[1].attribute("stop-opacity"), Some("0"));
    }

    #[test]
    fn pathways_without_hits_stay_unpainted() {
        let (diagram, graph) = (Diagram::default(), graph());
        let index = GraphIndex::new(&diagram, &graph);
        let profile = ColorProfiles::standard().unwrap().analysis;
        let result = result("OVERREPRESENTATION", vec![pathway("R-HSA-20", 0, 5, Vec::new())]);
        let analysis = EhldAnalysis {
            result: &result,
            profile: &profile,
            column: 0,
        };
        let (svg, marks) =
            decorate_ehld(SVG, &index, &NONE, &NONE, &properties(), Some(&analysis)).unwrap();
        assert_eq!(svg, SVG);
        assert!(marks.analysed.is_empty());
    }

    #[test]
    fn expression_paints_the_column_value() {
        let (diagram, graph) = (Diagram::default(), graph());
        let index = GraphIndex::new(&diagram, &graph);
        let profile = ColorProfiles::standard().unwrap().analysis;
        let pathways = vec![pathway("r-hsa-20", 2, 5, vec![Some(10.0), Some(0.0)])];
        let result = result("EXPRESSION", pathways);
        let gradient = &profile.expression.gradient;
        for (column, scale) in [(0, 0.0), (1, 1.0)] {
            let analysis = EhldAnalysis {
                result: &result,
                profile: &profile,
                column,
            };
            let (svg, _) =
                decorate_ehld(SVG, &index, &NONE, &NONE, &properties(), Some(&analysis)).unwrap();
            let expected = format!(
                r#"style="fill:red;fill:{}"/>"#,
                gradient.interpolate(scale).to_hex()
            );
            assert!(svg.contains(&expected), "column {column}: {svg}");
            assert!(!svg.contains("<defs>"));
        }
    }

    #[test]
    fn selection_and_analysis_share_one_style_attribute() {
        let (diagram, graph) = (Diagram::default(), graph());
        let index = GraphIndex::new(&diagram, &graph);
        let profile = ColorProfiles::standard().unwrap().analysis;
        let result = result("EXPRESSION", vec![pathway("R-HSA-30", 1, 1, vec![Some(0.0)])]);
        let analysis = EhldAnalysis {
            result: &result,
            profile: &profile,
            column: 0,
        };
        let selected = ["R-HSA-30"];
        let (svg, marks) =
            decorate_ehld(SVG, &index, &selected, &NONE, &properties(), Some(&analysis)).unwrap();
        let expected = format!(
            r#"<g style="opacity:0.5;stroke:#0000ff;stroke-width:10;fill:{}" id="REGION-R-HSA-30">"#,
            profile.expression.gradient.interpolate(1.0).to_hex()
        );
        assert!(svg.contains(&expected), "{svg}");
        assert_eq!(marks.selected, marks.analysed);
        assert!(roxmltree::Document::parse(&svg).is_ok());
    }

    #[test]
    fn expression_columns_are_checked() {
        let (diagram, graph) = (Diagram::default(), graph());
        let index = GraphIndex::new(&diagram, &graph);
        let profile = ColorProfiles::standard().unwrap().analysis;
        let pathways = vec![pathway("R-HSA-10", 1, 1, vec![Some(1.0), Some(2.0)])];
        let result = result("EXPRESSION", pathways);
        let analysis = EhldAnalysis {
            result: &result,
            profile: &profile,
            column: 2,
        };
        let outcome = decorate_ehld(SVG, &index, &NONE, &NONE, &properties(), Some(&analysis));
        assert!(matches!(
            outcome,
            Err(ExportError::ColumnOutOfRange { column: 2, columns: 2 })
        ));
    }
}
