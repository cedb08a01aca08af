use serde::Deserialize;

/// Kind of analysis a result was produced by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnalysisKind {
    None,
    Overrepresentation,
    SpeciesComparison,
    Expression,
}

impl AnalysisKind {
    /// Parse the `type` tag of a result. Missing or unknown tags mean no analysis.
    pub fn from_tag(tag: Option<&str>) -> Self {
        let Some(tag) = tag else {
            return Self::None;
        };
        match tag.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "OVERREPRESENTATION" => Self::Overrepresentation,
            "SPECIES_COMPARISON" => Self::SpeciesComparison,
            "EXPRESSION" => Self::Expression,
            _ => Self::None,
        }
    }

    pub fn is_active(self) -> bool {
        self != Self::None
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpressionSummary {
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub column_names: Vec<String>,
}

/// One analysis row, keyed by the graph entity it was found for.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct FoundEntity {
    pub id: i64,
    #[serde(default)]
    pub exp: Vec<Option<f64>>,
}

impl FoundEntity {
    /// Expression value for a column; absent and non-finite cells yield `None`.
    pub fn value(&self, column: usize) -> Option<f64> {
        self.exp
            .get(column)
            .copied()
            .flatten()
            .filter(|value| value.is_finite())
    }
}

/// Found and total entity counts of one pathway, plus its expression values.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PathwayEntities {
    #[serde(default)]
    pub found: usize,
    #[serde(default)]
    pub total: usize,
    #[serde(default)]
    pub exp: Vec<Option<f64>>,
}

impl PathwayEntities {
    /// Share of the pathway's entities that were found; empty pathways have none.
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.found as f64 / self.total as f64).clamp(0.0, 1.0)
    }

    pub fn value(&self, column: usize) -> Option<f64> {
        self.exp
            .get(column)
            .copied()
            .flatten()
            .filter(|value| value.is_finite())
    }
}

/// Per pathway summary, used to paint the regions of high-level diagrams.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathwaySummary {
    pub st_id: String,
    #[serde(default)]
    pub db_id: Option<i64>,
    #[serde(default)]
    pub entities: PathwayEntities,
}

/// Finished analysis result as served by the analysis service.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    #[serde(default, rename = "type")]
    pub analysis_type: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub expression: Option<ExpressionSummary>,
    #[serde(default)]
    pub entities: Vec<FoundEntity>,
    #[serde(default)]
    pub pathways: Vec<PathwaySummary>,
}

impl AnalysisResult {
    pub fn kind(&self) -> AnalysisKind {
        AnalysisKind::from_tag(self.analysis_type.as_deref())
    }

    pub fn column_names(&self) -> &[String] {
        self.expression
            .as_ref()
            .map(|summary| summary.column_names.as_slice())
            .unwrap_or(&[])
    }

    /// Number of expression columns, counting the widest row when names are missing.
    pub fn column_count(&self) -> usize {
        let widest = self
            .entities
            .iter()
            .map(|entity| entity.exp.len())
            .chain(self.pathways.iter().map(|pathway| pathway.entities.exp.len()))
            .max()
            .unwrap_or(0);
        self.column_names().len().max(widest)
    }

    /// Summary of a pathway, matched by database id or, ignoring case, stable id.
    pub fn pathway(&self, st_id: &str, db_id: Option<i64>) -> Option<&PathwaySummary> {
        self.pathways.iter().find(|pathway| {
            (db_id.is_some() && pathway.db_id == db_id) || pathway.st_id.eq_ignore_ascii_case(st_id)
        })
    }

    /// Min and max over the whole matrix. Declared bounds win over observed ones.
    pub fn value_range(&self) -> (f64, f64) {
        let declared = self
            .expression
            .as_ref()
            .and_then(|summary| summary.min.zip(summary.max));
        if let Some(range) = declared {
            return range;
        }
        let values = self
            .entities
            .iter()
            .flat_map(|entity| entity.exp.iter())
            .chain(self.pathways.iter().flat_map(|pathway| pathway.entities.exp.iter()))
            .copied()
            .flatten()
            .filter(|value| value.is_finite());
        let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        if min.is_finite() && max.is_finite() {
            (min, max)
        } else {
            (0.0, 0.0)
        }
    }
}
