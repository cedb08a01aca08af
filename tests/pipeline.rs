mod common;

use rstest::rstest;

use render_pathway_rs::engine::{
    fill_color, overlay, stroke_color, text_color, ObjectLook, Overlay,
};
use render_pathway_rs::error::ExportError;
use render_pathway_rs::export::Scene;
use render_pathway_rs::model::{load_diagram, AnalysisKind, Node, RenderableKind};
use render_pathway_rs::profiles::ColorProfiles;

use common::{analysis, fixture, pathway};

const NONE: [&str; 0] = [];

fn node<'a>(scene: &Scene<'a>, id: i64) -> &'a Node {
    scene
        .diagram()
        .nodes
        .iter()
        .find(|node| node.id == id)
        .unwrap()
}

#[test]
fn missing_and_malformed_inputs_are_distinct_errors() {
    let missing = load_diagram(&fixture("does_not_exist.json"));
    assert!(matches!(missing, Err(ExportError::Io { .. })));
    let malformed = load_diagram(&fixture("ehld.svg"));
    assert!(matches!(malformed, Err(ExportError::Json { .. })));
}

#[test]
fn selecting_a_reaction_halos_its_live_participants() {
    let (diagram, graph) = pathway();
    let profiles = ColorProfiles::standard().unwrap();
    let scene = Scene::new(&diagram, &graph, &profiles).with_selection(&["R-HSA-500"], &NONE);
    let decoration = scene.decoration();

    assert!(decoration.state(10).selected);
    for id in [1, 2, 3, 4] {
        let state = decoration.state(id);
        assert!(state.haloed, "node {id} should be haloed");
        assert!(!state.selected);
    }
    assert!(!decoration.state(5).haloed, "faded inhibitor stays plain");
    assert_eq!(decoration.selected_ids().iter().copied().collect::<Vec<_>>(), vec![10]);
}

#[rstest]
#[case::gene_name("kina")]
#[case::identifier("P01001")]
#[case::stable_id("R-HSA-100")]
#[case::db_id("100")]
fn every_token_form_selects_the_same_glyph(#[case] token: &str) {
    let (diagram, graph) = pathway();
    let profiles = ColorProfiles::standard().unwrap();
    let scene = Scene::new(&diagram, &graph, &profiles).with_selection(&[token], &NONE);
    let decoration = scene.decoration();

    assert!(decoration.state(1).selected);
    assert!(decoration.state(10).haloed);
    assert!(decoration.state(3).haloed);
    assert!(!decoration.state(3).selected);
}

#[test]
fn flags_reach_enclosing_complexes() {
    let (diagram, graph) = pathway();
    let profiles = ColorProfiles::standard().unwrap();
    let scene = Scene::new(&diagram, &graph, &profiles).with_selection(&NONE, &["KB1"]);
    let decoration = scene.decoration();

    assert!(decoration.state(4).flagged);
    assert!(decoration.state(3).flagged);
    assert!(!decoration.state(1).flagged);
    assert!(decoration.selected_ids().is_empty());
}

#[test]
fn expression_strips_follow_the_members_of_a_complex() {
    let (diagram, graph) = pathway();
    let profiles = ColorProfiles::standard().unwrap();
    let result = analysis("analysis_expression.json");
    let scene = Scene::new(&diagram, &graph, &profiles).with_analysis(Some(&result));
    let binding = scene.binding();
    let gradient = &profiles.analysis.expression.gradient;
    assert_eq!(binding.kind(), AnalysisKind::Expression);
    assert_eq!(binding.column_count(), 2);

    let complex = node(&scene, 3);
    let first = overlay(complex, binding, &profiles.analysis, 0);
    let painted = first.painted();
    assert_eq!(painted.len(), 2);
    assert_eq!(painted[0].0.x, 200.0);
    assert_eq!(painted[0].0.width, 40.0);
    assert_eq!(painted[1].0.x, 240.0);
    assert_eq!(painted[0].1, gradient.min);
    assert_eq!(painted[1].1, gradient.max);
    assert_eq!(first.text_split(), 1.0);

    let second = overlay(complex, binding, &profiles.analysis, 1);
    let colors: Vec<_> = second.painted().into_iter().map(|(_, color)| color).collect();
    assert_eq!(colors, vec![gradient.max, gradient.min]);
}

#[test]
fn missing_cells_leave_a_segment_unpainted() {
    let (diagram, graph) = pathway();
    let profiles = ColorProfiles::standard().unwrap();
    let result = analysis("analysis_expression.json");
    let scene = Scene::new(&diagram, &graph, &profiles).with_analysis(Some(&result));

    let atp = overlay(node(&scene, 2), scene.binding(), &profiles.analysis, 1);
    let Overlay::Expression { segments, .. } = &atp else {
        panic!("expected an expression strip, got {atp:?}");
    };
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].color, None);
    assert!(atp.painted().is_empty());
}

#[test]
fn enrichment_fills_the_hit_share_of_a_complex() {
    let (diagram, graph) = pathway();
    let profiles = ColorProfiles::standard().unwrap();
    let result = analysis("analysis_enrichment.json");
    let scene = Scene::new(&diagram, &graph, &profiles).with_analysis(Some(&result));
    let binding = scene.binding();
    let max = profiles.analysis.enrichment.gradient.max;

    let complex = overlay(node(&scene, 3), binding, &profiles.analysis, 0);
    assert_eq!(complex.text_split(), 0.5);
    let painted = complex.painted();
    assert_eq!(painted.len(), 1);
    assert_eq!(painted[0].0.width, 40.0);
    assert_eq!(painted[0].1, max);

    let atp = overlay(node(&scene, 2), binding, &profiles.analysis, 0);
    assert_eq!(atp.text_split(), 1.0);

    // The inhibitor has a hit but is faded out.
    assert!(overlay(node(&scene, 5), binding, &profiles.analysis, 0).is_none());
}

#[test]
fn colors_follow_selection_fade_and_analysis() {
    let (diagram, graph) = pathway();
    let profiles = ColorProfiles::standard().unwrap();
    let result = analysis("analysis_expression.json");
    let scene = Scene::new(&diagram, &graph, &profiles)
        .with_selection(&["KINA"], &NONE)
        .with_analysis(Some(&result));
    let properties = &profiles.diagram.properties;
    let active = scene.binding().is_active();
    let look = |id: i64| {
        let node = node(&scene, id);
        ObjectLook::of(node, scene.decoration().state(id), active)
    };

    let protein = profiles.diagram.glyph(RenderableKind::Protein);
    let chemical = profiles.diagram.glyph(RenderableKind::Chemical);

    assert_eq!(stroke_color(look(1), protein, properties), properties.selection);
    assert_eq!(fill_color(look(1), protein), protein.lighter_fill());
    assert_eq!(stroke_color(look(2), chemical, properties), chemical.lighter_stroke());
    assert_eq!(text_color(look(2), chemical), chemical.lighter_text());
    assert_eq!(stroke_color(look(5), protein, properties), protein.fade_out_stroke());
    assert_eq!(fill_color(look(5), protein), protein.fade_out_fill());
}

#[rstest]
#[case(0, "Kinase signalling - 0h")]
#[case(1, "Kinase signalling - 6h")]
#[case(7, "Kinase signalling")]
fn expression_titles_name_the_column(#[case] column: usize, #[case] expected: &str) {
    let (diagram, graph) = pathway();
    let profiles = ColorProfiles::standard().unwrap();
    let result = analysis("analysis_expression.json");
    let scene = Scene::new(&diagram, &graph, &profiles).with_analysis(Some(&result));
    assert_eq!(scene.title(column), expected);
}

#[rstest]
#[case::protein("KINA", 0, vec![(1, 0.0, 1.0)])]
#[case::protein_later_column("KINA", 1, vec![(1, 10.0, 0.0)])]
#[case::complex("R-HSA-300", 0, vec![(3, 0.0, 1.0), (3, 10.0, 0.0)])]
fn legend_marks_the_selected_values(
    #[case] token: &str,
    #[case] column: usize,
    #[case] expected: Vec<(i64, f64, f64)>,
) {
    let (diagram, graph) = pathway();
    let profiles = ColorProfiles::standard().unwrap();
    let result = analysis("analysis_expression.json");
    let scene = Scene::new(&diagram, &graph, &profiles)
        .with_selection(&[token], &NONE)
        .with_analysis(Some(&result));

    let ticks: Vec<_> = scene
        .legend_ticks(column)
        .into_iter()
        .map(|tick| (tick.node_id, tick.value, tick.scale))
        .collect();
    assert_eq!(ticks, expected);
}

#[test]
fn enrichment_scenes_have_no_legend() {
    let (diagram, graph) = pathway();
    let profiles = ColorProfiles::standard().unwrap();
    let result = analysis("analysis_enrichment.json");
    let scene = Scene::new(&diagram, &graph, &profiles)
        .with_selection(&["KINA"], &NONE)
        .with_analysis(Some(&result));
    assert!(!scene.has_legend());
    assert!(scene.legend_ticks(0).is_empty());
}
