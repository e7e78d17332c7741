//! Static arrangement tables.
//!
//! Category membership, kinematic categories, shelf geometry, packing
//! parameters and the spatial relation table. Loaded once (the household
//! set is embedded from `data/household.json`) and never mutated.
//!
//! [`validate`] runs consistency checks against a catalog so corrupt data
//! is reported up front instead of surfacing mid-arrangement.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::catalog::ModelCatalog;
use crate::error::Result;
use crate::relations::SpatialRelation;

/// Default packing cell size in meters.
pub const DEFAULT_CELL_SIZE: f32 = 0.05;
/// Default probability of leaving a free cell empty.
pub const DEFAULT_DENSITY: f32 = 0.4;

/// Occupancy-grid parameters for one root category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PackingParams {
    pub cell_size: f32,
    /// Probability that a free cell is skipped. Higher = sparser.
    pub density: f32,
}

impl Default for PackingParams {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            density: DEFAULT_DENSITY,
        }
    }
}

/// Shelf surfaces of one model: a shared surface size and one height per shelf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShelfGeometry {
    pub size: (f32, f32),
    pub ys: Vec<f32>,
}

/// Root category → dependent categories, per relation kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationTable {
    #[serde(default)]
    pub on_top_of: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub on_shelf: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub left_or_right_of: BTreeMap<String, Vec<String>>,
}

impl RelationTable {
    fn kind(&self, kind: SpatialRelation) -> &BTreeMap<String, Vec<String>> {
        match kind {
            SpatialRelation::OnTopOf => &self.on_top_of,
            SpatialRelation::OnShelf => &self.on_shelf,
            SpatialRelation::LeftOrRightOf => &self.left_or_right_of,
        }
    }

    /// Dependent categories for `category` under `kind`, if the relation applies.
    pub fn dependents(&self, kind: SpatialRelation, category: &str) -> Option<&[String]> {
        self.kind(kind).get(category).map(Vec::as_slice)
    }

    /// Relation kinds that apply to `category`, in processing order.
    pub fn kinds_for(&self, category: &str) -> Vec<SpatialRelation> {
        SpatialRelation::ALL
            .into_iter()
            .filter(|k| self.kind(*k).contains_key(category))
            .collect()
    }
}

/// All static configuration the engine reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArrangementTables {
    /// Category → model names.
    pub categories: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub kinematic: BTreeSet<String>,
    /// Root categories whose own yaw is randomized instead of following the request.
    #[serde(default)]
    pub random_rotation: BTreeSet<String>,
    /// Model name → shelf geometry.
    #[serde(default)]
    pub shelves: BTreeMap<String, ShelfGeometry>,
    /// Category → packing parameters for surfaces of that root category.
    #[serde(default)]
    pub rectangular_arrangements: BTreeMap<String, PackingParams>,
    #[serde(default)]
    pub relations: RelationTable,
}

impl ArrangementTables {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// The household tables bundled with the crate.
    pub fn household() -> Result<Self> {
        Self::from_json(crate::HOUSEHOLD_JSON)
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.categories.contains_key(category)
    }

    pub fn models_in(&self, category: &str) -> Option<&[String]> {
        self.categories.get(category).map(Vec::as_slice)
    }

    pub fn is_kinematic(&self, category: &str) -> bool {
        self.kinematic.contains(category)
    }

    pub fn has_random_rotation(&self, category: &str) -> bool {
        self.random_rotation.contains(category)
    }

    /// Packing parameters for surfaces of `category`, falling back to defaults.
    pub fn packing_params(&self, category: &str) -> PackingParams {
        self.rectangular_arrangements
            .get(category)
            .copied()
            .unwrap_or_default()
    }

    pub fn shelf(&self, model_name: &str) -> Option<&ShelfGeometry> {
        self.shelves.get(model_name)
    }
}

/// A table consistency problem.
#[derive(Debug, Clone)]
pub struct TableIssue {
    pub category: &'static str,
    pub severity: Severity,
    pub message: String,
}

/// Issue severity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Severity {
    Error,
    Warning,
}

// ── Checks ──────────────────────────────────────────────────────────────

/// Every model listed in a category must have a catalog record.
pub fn check_category_models(
    tables: &ArrangementTables,
    catalog: &dyn ModelCatalog,
) -> Vec<TableIssue> {
    let mut issues = Vec::new();
    for (category, models) in &tables.categories {
        if models.is_empty() {
            issues.push(TableIssue {
                category: "categories",
                severity: Severity::Warning,
                message: format!("Category `{}` has no models", category),
            });
        }
        for name in models {
            if catalog.record(name).is_none() {
                issues.push(TableIssue {
                    category: "categories",
                    severity: Severity::Error,
                    message: format!("Model `{}` in `{}` has no catalog record", name, category),
                });
            }
        }
    }
    issues
}

/// Relation roots and dependents must be known categories.
pub fn check_relation_targets(tables: &ArrangementTables) -> Vec<TableIssue> {
    let mut issues = Vec::new();
    for kind in SpatialRelation::ALL {
        for (root, dependents) in tables.relations.kind(kind) {
            if !tables.has_category(root) {
                issues.push(TableIssue {
                    category: "relations",
                    severity: Severity::Warning,
                    message: format!("{} root `{}` is not a known category", kind, root),
                });
            }
            for dep in dependents {
                if !tables.has_category(dep) {
                    issues.push(TableIssue {
                        category: "relations",
                        severity: Severity::Error,
                        message: format!("{} `{}` → unknown category `{}`", kind, root, dep),
                    });
                }
            }
        }
    }
    issues
}

/// Every model of an on-shelf root category needs shelf geometry, and
/// every shelf entry must name a catalog model.
pub fn check_shelves(tables: &ArrangementTables, catalog: &dyn ModelCatalog) -> Vec<TableIssue> {
    let mut issues = Vec::new();
    for root in tables.relations.on_shelf.keys() {
        for name in tables.models_in(root).unwrap_or_default() {
            if tables.shelf(name).is_none() {
                issues.push(TableIssue {
                    category: "shelves",
                    severity: Severity::Error,
                    message: format!("Shelf model `{}` ({}) has no shelf geometry", name, root),
                });
            }
        }
    }
    for (name, shelf) in &tables.shelves {
        if catalog.record(name).is_none() {
            issues.push(TableIssue {
                category: "shelves",
                severity: Severity::Warning,
                message: format!("Shelf entry `{}` has no catalog record", name),
            });
        }
        if shelf.size.0 <= 0.0 || shelf.size.1 <= 0.0 {
            issues.push(TableIssue {
                category: "shelves",
                severity: Severity::Error,
                message: format!(
                    "Shelf `{}` has non-positive size: {}×{}",
                    name, shelf.size.0, shelf.size.1
                ),
            });
        }
    }
    issues
}

/// Cell sizes must be positive and densities within [0, 1).
pub fn check_packing_params(tables: &ArrangementTables) -> Vec<TableIssue> {
    let mut issues = Vec::new();
    for (category, p) in &tables.rectangular_arrangements {
        if p.cell_size <= 0.0 {
            issues.push(TableIssue {
                category: "packing",
                severity: Severity::Error,
                message: format!("`{}` has non-positive cell size {}", category, p.cell_size),
            });
        }
        if !(0.0..1.0).contains(&p.density) {
            issues.push(TableIssue {
                category: "packing",
                severity: Severity::Warning,
                message: format!("`{}` density {} is outside [0, 1)", category, p.density),
            });
        }
    }
    issues
}

/// Run all table checks.
pub fn validate(tables: &ArrangementTables, catalog: &dyn ModelCatalog) -> Vec<TableIssue> {
    let mut all = Vec::new();
    all.extend(check_category_models(tables, catalog));
    all.extend(check_relation_targets(tables));
    all.extend(check_shelves(tables, catalog));
    all.extend(check_packing_params(tables));
    all
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn household() -> (ArrangementTables, Catalog) {
        (
            ArrangementTables::household().unwrap(),
            Catalog::household().unwrap(),
        )
    }

    #[test]
    fn test_household_tables_load() {
        let (tables, _) = household();
        assert!(tables.has_category("stool"));
        assert!(tables.has_category("table"));
        assert!(tables.is_kinematic("table"));
        assert!(!tables.is_kinematic("bowl"));
        assert!(tables.has_random_rotation("stool"));
    }

    #[test]
    fn test_household_tables_validate_clean() {
        let (tables, catalog) = household();
        let issues = validate(&tables, &catalog);
        assert!(issues.is_empty(), "Expected no issues, got: {:?}", issues);
    }

    #[test]
    fn test_packing_params_fallback() {
        let (tables, _) = household();
        let table = tables.packing_params("table");
        assert_eq!(table.cell_size, 0.05);
        assert_eq!(table.density, 0.4);
        assert_eq!(tables.packing_params("no-such"), PackingParams::default());
    }

    #[test]
    fn test_kinds_for_in_processing_order() {
        let mut relations = RelationTable::default();
        relations
            .left_or_right_of
            .insert("desk".into(), vec!["chair".into()]);
        relations.on_top_of.insert("desk".into(), vec!["cup".into()]);
        assert_eq!(
            relations.kinds_for("desk"),
            vec![SpatialRelation::OnTopOf, SpatialRelation::LeftOrRightOf]
        );
        assert!(relations.kinds_for("cup").is_empty());
        assert_eq!(
            relations.dependents(SpatialRelation::OnTopOf, "desk"),
            Some(&["cup".to_string()][..])
        );
    }

    #[test]
    fn test_unknown_relation_target_is_error() {
        let (mut tables, _) = household();
        tables
            .relations
            .on_top_of
            .insert("table".into(), vec!["spaceship".into()]);
        let issues = check_relation_targets(&tables);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Error);
        assert!(issues[0].message.contains("spaceship"));
    }

    #[test]
    fn test_missing_catalog_record_is_error() {
        let (mut tables, catalog) = household();
        tables
            .categories
            .get_mut("bowl")
            .unwrap()
            .push("phantom_bowl".into());
        let issues = check_category_models(&tables, &catalog);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("phantom_bowl"));
    }

    #[test]
    fn test_shelf_model_without_geometry() {
        let (mut tables, catalog) = household();
        tables.shelves.remove("wall_shelf_wide");
        let issues = check_shelves(&tables, &catalog);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("wall_shelf_wide"));
    }

    #[test]
    fn test_bad_packing_params() {
        let mut tables = ArrangementTables::default();
        tables.rectangular_arrangements.insert(
            "desk".into(),
            PackingParams {
                cell_size: 0.0,
                density: 1.5,
            },
        );
        let issues = check_packing_params(&tables);
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().any(|i| i.severity == Severity::Error));
    }

    #[test]
    fn test_from_json_minimal() {
        let tables = ArrangementTables::from_json(r#"{"categories": {"stool": ["s1"]}}"#).unwrap();
        assert_eq!(tables.models_in("stool").unwrap(), &["s1".to_string()]);
        assert!(tables.kinematic.is_empty());
        assert!(tables.relations.on_top_of.is_empty());
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(ArrangementTables::from_json("{not json").is_err());
    }
}
