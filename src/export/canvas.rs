use std::collections::HashMap;

use cairo::{Context as CairoContext, FillRule, LineCap, LineJoin};

use super::geometry::{diagram_bounds, Bounds, PixelRect, Point, Transform};
use super::legend::{draw_legend, with_legend, LegendContent, LegendLayout};
use super::shapes::{
    draw_cross, draw_filled_triangle, draw_inhibition_bar, draw_open_circle_tangent,
    draw_open_triangle_opaque, inner_outline, path_glyph, path_rect, path_round_rect,
};
use super::text::{
    draw_label, draw_text_bottom_centered, draw_text_left, FONT_LABEL_PX, FONT_TITLE_PX,
};
use crate::engine::{
    bind, decorate, fill_color, legend_ticks, overlay, stroke_color, text_color, AnalysisBinding,
    DecoratedState, Decoration, GraphIndex, LegendTick, ObjectLook, Overlay,
};
use crate::error::Result;
use crate::model::{
    AnalysisKind, AnalysisResult, Connector, ConnectorRole, Diagram, DiagramObject, Edge, Graph,
    Node, Segment,
};
use crate::profiles::{Color, ColorProfiles};

const BORDER_WIDTH: f64 = 1.0;
const SELECTION_WIDTH: f64 = 3.0;
const HALO_WIDTH: f64 = 6.0;
const FLAG_WIDTH: f64 = 9.0;
const DASH: [f64; 2] = [5.0, 3.0];
const REACTION_BOX: f64 = 12.0;
const ARROW_SIZE: f64 = 8.0;
const CATALYST_RADIUS: f64 = 5.0;
const BAR_LENGTH: f64 = 12.0;
const COMPARTMENT_RADIUS: f64 = 20.0;

/// A diagram with its decoration and bound analysis, ready to draw.
pub struct Scene<'a> {
    index: GraphIndex<'a>,
    profiles: &'a ColorProfiles,
    decoration: Decoration,
    binding: AnalysisBinding<'a>,
}

impl<'a> Scene<'a> {
    pub fn new(diagram: &'a Diagram, graph: &'a Graph, profiles: &'a ColorProfiles) -> Self {
        Self {
            index: GraphIndex::new(diagram, graph),
            profiles,
            decoration: Decoration::default(),
            binding: AnalysisBinding::default(),
        }
    }

    /// Resolve selection and flag tokens against the diagram.
    pub fn with_selection<S, F>(mut self, selected: &[S], flags: &[F]) -> Self
    where
        S: AsRef<str>,
        F: AsRef<str>,
    {
        self.decoration = decorate(&self.index, selected, flags);
        self
    }

    pub fn with_analysis(mut self, analysis: Option<&'a AnalysisResult>) -> Self {
        self.binding = bind(&self.index, analysis);
        self
    }

    pub fn diagram(&self) -> &'a Diagram {
        self.index.diagram()
    }

    pub fn decoration(&self) -> &Decoration {
        &self.decoration
    }

    pub fn binding(&self) -> &AnalysisBinding<'a> {
        &self.binding
    }

    /// Extent of the drawing in diagram units, legend included.
    pub fn bounds(&self) -> Bounds {
        let bounds = diagram_bounds(self.diagram());
        if self.has_legend() {
            with_legend(bounds)
        } else {
            bounds
        }
    }

    /// Expression results get a value legend.
    pub fn has_legend(&self) -> bool {
        self.binding.kind() == AnalysisKind::Expression
    }

    /// Legend marks for the selected nodes in one expression column.
    pub fn legend_ticks(&self, column: usize) -> Vec<LegendTick> {
        legend_ticks(&self.decoration, &self.binding, column)
    }

    /// Title line: the diagram name, plus the column name for expression results.
    pub fn title(&self, column: usize) -> String {
        let diagram = self.diagram();
        let name = if diagram.display_name.is_empty() {
            diagram.stable_id.as_str()
        } else {
            diagram.display_name.as_str()
        };
        match self.binding.column_name(column) {
            Some(column_name) if self.binding.kind() == AnalysisKind::Expression => {
                format!("{name} - {column_name}")
            }
            _ => name.to_string(),
        }
    }

    /// Draw the whole diagram for one expression column.
    pub fn draw(
        &self,
        ctx: &CairoContext,
        transform: &Transform,
        column: usize,
        write_title: bool,
    ) -> Result<()> {
        ctx.set_line_cap(LineCap::Round);
        ctx.set_line_join(LineJoin::Round);
        let pen = Pen {
            ctx,
            transform,
            scale: transform.scale_scalar(1.0),
        };
        let diagram = self.diagram();
        let connectors = connectors_by_reaction(diagram);
        let overlays: Vec<Overlay> = diagram
            .nodes
            .iter()
            .map(|node| overlay(node, &self.binding, &self.profiles.analysis, column))
            .collect();

        self.compartments(&pen)?;
        let properties = &self.profiles.diagram.properties;
        self.outlines(&pen, &connectors, |state| state.flagged, properties.flag, FLAG_WIDTH)?;
        self.outlines(&pen, &connectors, |state| state.haloed, properties.halo, HALO_WIDTH)?;
        for edge in &diagram.edges {
            let attached = connectors.get(&edge.id).map(Vec::as_slice).unwrap_or(&[]);
            self.reaction(&pen, edge, attached)?;
        }
        for (node, overlay) in diagram.nodes.iter().zip(&overlays) {
            self.node_body(&pen, node, overlay)?;
        }
        for (node, overlay) in diagram.nodes.iter().zip(&overlays) {
            self.node_label(&pen, node, overlay)?;
        }
        self.notes(&pen)?;
        if self.has_legend() {
            self.legend(&pen, column)?;
        }
        if write_title {
            let origin = Point {
                x: pen.scale * 2.0,
                y: pen.scale * 2.0,
            };
            draw_text_left(
                ctx,
                origin,
                &self.title(column),
                FONT_TITLE_PX * pen.scale,
                self.profiles.diagram.properties.text,
            )?;
        }
        Ok(())
    }

    fn look(&self, object: &impl DiagramObject) -> (DecoratedState, ObjectLook) {
        let state = self.decoration.state(object.id());
        (state, ObjectLook::of(object, state, self.binding.is_active()))
    }

    fn compartments(&self, pen: &Pen<'_>) -> Result<()> {
        let glyph = &self.profiles.diagram.compartment;
        for compartment in &self.diagram().compartments {
            let rect = pen.transform.map_rect(&compartment.prop);
            path_round_rect(pen.ctx, rect, COMPARTMENT_RADIUS * pen.scale)?;
            glyph.fill().set_source(pen.ctx);
            pen.ctx.fill_preserve()?;
            glyph.stroke().set_source(pen.ctx);
            pen.ctx.set_line_width(BORDER_WIDTH * pen.scale);
            pen.ctx.stroke()?;
            draw_text_bottom_centered(
                pen.ctx,
                rect,
                &compartment.display_name,
                FONT_LABEL_PX * pen.scale,
                glyph.text(),
            )?;
        }
        Ok(())
    }

    /// Wide strokes drawn under everything else for flagged or haloed objects.
    fn outlines(
        &self,
        pen: &Pen<'_>,
        connectors: &HashMap<i64, Vec<&Connector>>,
        marked: impl Fn(DecoratedState) -> bool,
        color: Color,
        width: f64,
    ) -> Result<()> {
        let ctx = pen.ctx;
        ctx.save()?;
        color.set_source(ctx);
        ctx.set_line_width(width * pen.scale);
        for edge in &self.diagram().edges {
            if !marked(self.decoration.state(edge.id)) {
                continue;
            }
            pen.segments(&edge.segments);
            for connector in connectors.get(&edge.id).into_iter().flatten() {
                pen.segments(&connector.segments);
            }
            ctx.stroke()?;
            path_rect(ctx, pen.reaction_box(edge))?;
            ctx.stroke()?;
        }
        for node in &self.diagram().nodes {
            if !marked(self.decoration.state(node.id)) {
                continue;
            }
            let rect = pen.transform.map_rect(&node.prop);
            path_glyph(ctx, node.renderable_class, rect, pen.scale)?;
            ctx.stroke()?;
        }
        ctx.restore()?;
        Ok(())
    }

    fn reaction(&self, pen: &Pen<'_>, edge: &Edge, connectors: &[&Connector]) -> Result<()> {
        let ctx = pen.ctx;
        let glyph = &self.profiles.diagram.reaction;
        let properties = &self.profiles.diagram.properties;
        let (state, look) = self.look(edge);
        let stroke = stroke_color(look, glyph, properties);
        let fill = fill_color(look, glyph);
        let width = if state.selected { SELECTION_WIDTH } else { BORDER_WIDTH };

        ctx.save()?;
        stroke.set_source(ctx);
        ctx.set_line_width(width * pen.scale);
        pen.segments(&edge.segments);
        ctx.stroke()?;

        for connector in connectors {
            pen.segments(&connector.segments);
            ctx.stroke()?;
            let Some(last) = connector.segments.last() else {
                continue;
            };
            let end = pen.transform.map_coordinate(last.to);
            let prev = pen.transform.map_coordinate(last.from);
            match connector.role {
                ConnectorRole::Output => draw_filled_triangle(ctx, end, prev, ARROW_SIZE * pen.scale)?,
                ConnectorRole::Catalyst => {
                    draw_open_circle_tangent(ctx, end, prev, CATALYST_RADIUS * pen.scale, fill)?
                }
                ConnectorRole::Activator => {
                    draw_open_triangle_opaque(ctx, end, prev, ARROW_SIZE * pen.scale, fill)?
                }
                ConnectorRole::Inhibitor => {
                    draw_inhibition_bar(ctx, end, prev, BAR_LENGTH * pen.scale)?
                }
                ConnectorRole::Input | ConnectorRole::Other => {}
            }
        }

        let reaction_box = pen.reaction_box(edge);
        path_rect(ctx, reaction_box)?;
        fill.set_source(ctx);
        ctx.fill_preserve()?;
        stroke.set_source(ctx);
        ctx.stroke()?;
        ctx.restore()?;
        Ok(())
    }

    /// Background minus overlay, the overlay itself, border and disease cross.
    fn node_body(&self, pen: &Pen<'_>, node: &Node, overlay: &Overlay) -> Result<()> {
        let ctx = pen.ctx;
        let kind = node.renderable_class;
        let glyph = self.profiles.diagram.glyph(kind);
        let properties = &self.profiles.diagram.properties;
        let (state, look) = self.look(node);
        let rect = pen.transform.map_rect(&node.prop);
        let painted: Vec<(PixelRect, Color)> = overlay
            .painted()
            .into_iter()
            .map(|(area, color)| (pen.transform.map_rect(&area), color))
            .collect();

        ctx.save()?;
        path_glyph(ctx, kind, rect, pen.scale)?;
        ctx.clip();
        ctx.new_path();
        ctx.set_fill_rule(FillRule::EvenOdd);
        ctx.rectangle(rect.x0, rect.y0, rect.width, rect.height);
        for (area, _) in &painted {
            ctx.rectangle(area.x0, area.y0, area.width, area.height);
        }
        fill_color(look, glyph).set_source(ctx);
        ctx.fill()?;
        for (area, color) in &painted {
            ctx.rectangle(area.x0, area.y0, area.width, area.height);
            color.set_source(ctx);
            ctx.fill()?;
        }
        ctx.restore()?;

        ctx.save()?;
        stroke_color(look, glyph, properties).set_source(ctx);
        let width = if state.selected { SELECTION_WIDTH } else { BORDER_WIDTH };
        ctx.set_line_width(width * pen.scale);
        if node.need_dashed_border.unwrap_or(false) {
            ctx.set_dash(&[DASH[0] * pen.scale, DASH[1] * pen.scale], 0.0);
        }
        path_glyph(ctx, kind, rect, pen.scale)?;
        ctx.stroke()?;
        if inner_outline(ctx, kind, rect, pen.scale)? {
            ctx.stroke()?;
        }
        ctx.restore()?;

        if node.is_crossed.unwrap_or(false) {
            ctx.save()?;
            properties.disease.set_source(ctx);
            ctx.set_line_width(BORDER_WIDTH * pen.scale);
            draw_cross(ctx, rect)?;
            ctx.restore()?;
        }
        Ok(())
    }

    fn node_label(&self, pen: &Pen<'_>, node: &Node, overlay: &Overlay) -> Result<()> {
        let kind = node.renderable_class;
        let glyph = self.profiles.diagram.glyph(kind);
        let (_, look) = self.look(node);
        let split = match overlay {
            Overlay::Expression { text_split, .. } if kind.aggregates_members() => {
                Some((*text_split, self.profiles.analysis.ribbon))
            }
            _ => None,
        };
        draw_label(
            pen.ctx,
            pen.transform.map_rect(&node.prop),
            &node.display_name,
            FONT_LABEL_PX * pen.scale,
            text_color(look, glyph),
            split,
        )
    }

    fn legend(&self, pen: &Pen<'_>, column: usize) -> Result<()> {
        let properties = &self.profiles.diagram.properties;
        let ticks = self.legend_ticks(column);
        let content = LegendContent {
            gradient: &self.profiles.analysis.expression.gradient,
            range: self.binding.range(),
            column: self.binding.column_name(column),
            ticks: &ticks,
            tick_color: properties.selection,
            text_color: properties.text,
        };
        draw_legend(pen.ctx, pen.transform, &LegendLayout::new(self.bounds()), &content)
    }

    fn notes(&self, pen: &Pen<'_>) -> Result<()> {
        let color = self.profiles.diagram.note.text.unwrap_or(self.profiles.diagram.properties.text);
        for note in &self.diagram().notes {
            let origin = pen.transform.map_point(note.prop.x, note.prop.y);
            draw_text_left(pen.ctx, origin, &note.display_name, FONT_LABEL_PX * pen.scale, color)?;
        }
        Ok(())
    }
}

/// Context plus the mapping every drawing pass needs.
struct Pen<'c> {
    ctx: &'c CairoContext,
    transform: &'c Transform,
    scale: f64,
}

impl Pen<'_> {
    /// Append segments to the current path without stroking.
    fn segments(&self, segments: &[Segment]) {
        for segment in segments {
            let from = self.transform.map_coordinate(segment.from);
            let to = self.transform.map_coordinate(segment.to);
            self.ctx.move_to(from.x, from.y);
            self.ctx.line_to(to.x, to.y);
        }
    }

    fn reaction_box(&self, edge: &Edge) -> PixelRect {
        let center = self.transform.map_coordinate(edge.position);
        let size = REACTION_BOX * self.scale;
        PixelRect::new(center.x - size / 2.0, center.y - size / 2.0, size, size)
    }
}

fn connectors_by_reaction(diagram: &Diagram) -> HashMap<i64, Vec<&Connector>> {
    let mut by_reaction: HashMap<i64, Vec<&Connector>> = HashMap::new();
    for node in &diagram.nodes {
        for connector in &node.connectors {
            by_reaction.entry(connector.edge_id).or_default().push(connector);
        }
    }
    by_reaction
}
