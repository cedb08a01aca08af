use serde::Deserialize;

/// Bounding box of a glyph in diagram coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
pub struct NodeProperties {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl NodeProperties {
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct Segment {
    pub from: Coordinate,
    pub to: Coordinate,
}

/// Glyph family of a diagram node, as written in `renderableClass`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
pub enum RenderableKind {
    Protein,
    ProteinDrug,
    Chemical,
    ChemicalDrug,
    Complex,
    ComplexDrug,
    Entity,
    EntitySet,
    EntitySetDrug,
    Gene,
    #[serde(rename = "RNA")]
    Rna,
    #[serde(rename = "RNADrug")]
    RnaDrug,
    ProcessNode,
    EncapsulatedNode,
    #[serde(other)]
    Other,
}

impl Default for RenderableKind {
    fn default() -> Self {
        Self::Other
    }
}

impl RenderableKind {
    /// Whether the glyph stands for a set or complex of member entities.
    pub fn aggregates_members(self) -> bool {
        matches!(
            self,
            Self::Complex | Self::ComplexDrug | Self::EntitySet | Self::EntitySetDrug
        )
    }
}

/// Role of a node in a reaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectorRole {
    Input,
    Output,
    Catalyst,
    Activator,
    Inhibitor,
    #[serde(other)]
    Other,
}

/// Link from a node to one of the reactions it takes part in.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connector {
    pub edge_id: i64,
    #[serde(rename = "type")]
    pub role: ConnectorRole,
    #[serde(default)]
    pub segments: Vec<Segment>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: i64,
    pub reactome_id: i64,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub renderable_class: RenderableKind,
    pub prop: NodeProperties,
    #[serde(default)]
    pub is_fade_out: Option<bool>,
    #[serde(default)]
    pub is_disease: Option<bool>,
    #[serde(default)]
    pub is_crossed: Option<bool>,
    #[serde(default)]
    pub need_dashed_border: Option<bool>,
    #[serde(default)]
    pub connectors: Vec<Connector>,
}

/// Reference from a reaction to one of its participant nodes (local id).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct ReactionPart {
    pub id: i64,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: i64,
    pub reactome_id: i64,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub position: Coordinate,
    #[serde(default)]
    pub is_fade_out: Option<bool>,
    #[serde(default)]
    pub is_disease: Option<bool>,
    #[serde(default)]
    pub inputs: Vec<ReactionPart>,
    #[serde(default)]
    pub outputs: Vec<ReactionPart>,
    #[serde(default)]
    pub catalysts: Vec<ReactionPart>,
    #[serde(default)]
    pub activators: Vec<ReactionPart>,
    #[serde(default)]
    pub inhibitors: Vec<ReactionPart>,
    #[serde(default)]
    pub segments: Vec<Segment>,
}

impl Edge {
    /// Every participant of the reaction across all five roles.
    pub fn participants(&self) -> impl Iterator<Item = &ReactionPart> + '_ {
        self.inputs
            .iter()
            .chain(&self.outputs)
            .chain(&self.catalysts)
            .chain(&self.activators)
            .chain(&self.inhibitors)
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Compartment {
    pub id: i64,
    #[serde(default)]
    pub display_name: String,
    pub prop: NodeProperties,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: i64,
    #[serde(default)]
    pub display_name: String,
    pub prop: NodeProperties,
}

/// Pre-computed layout of a pathway diagram.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagram {
    #[serde(default)]
    pub db_id: Option<i64>,
    #[serde(default)]
    pub stable_id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub compartments: Vec<Compartment>,
    #[serde(default)]
    pub notes: Vec<Note>,
}

/// Shared view over nodes and edges, the two kinds of decorated objects.
pub trait DiagramObject {
    fn id(&self) -> i64;
    fn reactome_id(&self) -> i64;
    fn is_fade_out(&self) -> bool;
    fn is_disease(&self) -> bool;
}

impl DiagramObject for Node {
    fn id(&self) -> i64 {
        self.id
    }

    fn reactome_id(&self) -> i64 {
        self.reactome_id
    }

    fn is_fade_out(&self) -> bool {
        self.is_fade_out.unwrap_or(false)
    }

    fn is_disease(&self) -> bool {
        self.is_disease.unwrap_or(false)
    }
}

impl DiagramObject for Edge {
    fn id(&self) -> i64 {
        self.id
    }

    fn reactome_id(&self) -> i64 {
        self.reactome_id
    }

    fn is_fade_out(&self) -> bool {
        self.is_fade_out.unwrap_or(false)
    }

    fn is_disease(&self) -> bool {
        self.is_disease.unwrap_or(false)
    }
}
