use serde::Deserialize;

/// A physical entity of the pathway graph (protein, chemical, set, complex...).
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEntity {
    pub db_id: i64,
    #[serde(default)]
    pub st_id: Option<String>,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub schema_class: Option<String>,
    #[serde(default)]
    pub identifier: Option<String>,
    #[serde(default)]
    pub gene_names: Vec<String>,
    /// Sets and complexes that contain this entity.
    #[serde(default)]
    pub parents: Vec<i64>,
}

/// A reaction-like event of the pathway graph.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEvent {
    pub db_id: i64,
    #[serde(default)]
    pub st_id: Option<String>,
    #[serde(default)]
    pub display_name: String,
}

/// Database view of the entities and events drawn by a diagram.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Graph {
    #[serde(default)]
    pub db_id: Option<i64>,
    #[serde(default)]
    pub st_id: Option<String>,
    #[serde(default)]
    pub nodes: Vec<GraphEntity>,
    #[serde(default)]
    pub edges: Vec<GraphEvent>,
}
