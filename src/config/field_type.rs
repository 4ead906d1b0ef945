use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::codec::Point;
use crate::error::{Error, Result};

/// Item whose definition points at invalid data in the shipped game files
const BROKEN_ITEM: &str = "FAHNEKONTOR";

/// Building class name as it appears in the definition files (`BODEN`, `HQ`, ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldKind(pub String);

impl FieldKind {
    /// Kinds that form the terrain layer rather than something built on top of it
    pub const GROUND: [&'static str; 16] = [
        "BODEN", "FLUSS", "FLUSSECK", "HANG", "HANGQUELL", "HANGECK",
        "STRAND", "STRANDMUND", "STRANDECKI", "STRANDVARI", "STRANDECKA",
        "BRANDUNG", "BRANDECK", "MEER", "FELS", "MUENDUNG",
    ];

    pub fn new(kind: impl Into<String>) -> Self {
        Self(kind.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_ground(&self) -> bool {
        Self::GROUND.contains(&self.0.as_str())
    }
}

/// Production parameters of a building, amounts in whole tons
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ProductionParams {
    pub good: Option<String>,
    pub input1: Option<String>,
    pub input2: Option<String>,
    pub amount1: u16,
    pub amount2: u16,
    /// Production ticks per cycle
    pub interval: u16,
    pub max_stock: u16,
    pub radius: u16,
    pub upkeep_active: u32,
    pub upkeep_inactive: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldType {
    /// Same id space as `Field::building_id`
    pub id: u32,
    pub name: String,
    pub kind: FieldKind,
    pub size: Point,
    pub production: Option<ProductionParams>,
}

impl FieldType {
    pub fn new(id: u32, name: impl Into<String>, kind: FieldKind) -> Self {
        Self { id, name: name.into(), kind, size: Point::new(1, 1), production: None }
    }

    pub fn with_production(mut self, params: ProductionParams) -> Self {
        self.production = Some(params);
        self
    }
}

// Raw JSON shapes of the definition export

#[derive(Deserialize)]
struct RawRoot {
    objects: RawObjects,
}

#[derive(Deserialize)]
#[serde(rename_all = "UPPERCASE")]
struct RawObjects {
    haus: RawGroup,
}

#[derive(Deserialize)]
struct RawGroup {
    items: serde_json::Map<String, serde_json::Value>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(u32),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCost {
    Single(u32),
    Pair(Vec<u32>),
}

#[derive(Deserialize)]
struct RawSize {
    x: u32,
    y: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawItem {
    id: RawId,
    kind: Option<FieldKind>,
    size: Option<RawSize>,
    #[serde(default, rename = "nested_objects")]
    nested: RawNested,
}

#[derive(Deserialize, Default)]
struct RawNested {
    #[serde(default, rename = "HAUS_PRODTYP")]
    production: Vec<RawProduction>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawProduction {
    ware: Option<String>,
    rohstoff: Option<String>,
    workstoff: Option<String>,
    rohmenge: Option<u16>,
    workmenge: Option<u16>,
    interval: Option<u16>,
    maxlager: Option<u16>,
    radius: Option<u16>,
    kosten: Option<RawCost>,
}

impl RawProduction {
    fn into_params(self) -> ProductionParams {
        let (upkeep_active, upkeep_inactive) = match self.kosten {
            Some(RawCost::Single(v)) => (v, v),
            Some(RawCost::Pair(v)) => {
                let active = v.first().copied().unwrap_or(0);
                (active, v.get(1).copied().unwrap_or(active))
            }
            None => (0, 0),
        };
        ProductionParams {
            good: self.ware,
            input1: self.rohstoff,
            input2: self.workstoff,
            amount1: self.rohmenge.unwrap_or(0),
            amount2: self.workmenge.unwrap_or(0),
            interval: self.interval.unwrap_or(0),
            max_stock: self.maxlager.unwrap_or(0),
            radius: self.radius.unwrap_or(0),
            upkeep_active,
            upkeep_inactive,
        }
    }
}

/// Building definitions keyed by building id
#[derive(Debug, Clone, Default)]
pub struct FieldTypeTable {
    by_id: AHashMap<u32, FieldType>,
    name_to_id: AHashMap<String, u32>,
}

impl FieldTypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field_type: FieldType) {
        self.name_to_id.insert(field_type.name.clone(), field_type.id);
        self.by_id.insert(field_type.id, field_type);
    }

    pub fn get(&self, id: u32) -> Option<&FieldType> {
        self.by_id.get(&id)
    }

    /// Like [`get`](Self::get) but a missing id is an error
    pub fn require(&self, id: u32) -> Result<&FieldType> {
        self.get(id).ok_or(Error::UnknownFieldType { id })
    }

    pub fn get_by_name(&self, name: &str) -> Option<&FieldType> {
        self.name_to_id.get(name).and_then(|id| self.by_id.get(id))
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldType> {
        self.by_id.values()
    }

    /// Load the `objects.HAUS.items` section of a definition export
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let root: RawRoot = serde_json::from_slice(data)?;
        let mut table = Self::new();

        for (name, value) in root.objects.haus.items {
            if name == BROKEN_ITEM {
                warn!(item = %name, "skipping field definition with invalid data");
                continue;
            }
            let item: RawItem = serde_json::from_value(value)
                .map_err(|e| Error::Config(format!("{name}: {e}")))?;
            let id = match item.id {
                RawId::Number(id) => id,
                RawId::Text(text) => text
                    .trim()
                    .parse()
                    .map_err(|_| Error::Config(format!("{name}: bad id {text:?}")))?,
            };
            let size = item.size.map_or(Point::new(1, 1), |s| Point::new(s.x, s.y));
            let production = item.nested.production.into_iter().next().map(RawProduction::into_params);

            table.insert(FieldType {
                id,
                name,
                kind: item.kind.unwrap_or_else(|| FieldKind::new("")),
                size,
                production,
            });
        }

        debug!(count = table.len(), "loaded field definitions");
        Ok(table)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const FIELDS_JSON: &str = r#"{
        "objects": {
            "HAUS": {
                "items": {
                    "GRAS": { "Id": 20001, "Kind": "BODEN", "Size": {"x": 1, "y": 1} },
                    "KUESTE": { "Id": "20002", "Kind": "STRAND" },
                    "WEBSTUBE": {
                        "Id": 20100,
                        "Kind": "GEBAEUDE",
                        "Size": {"x": 2, "y": 2},
                        "nested_objects": {
                            "HAUS_PRODTYP": [{
                                "Ware": "STOFFE",
                                "Rohstoff": "WOLLE",
                                "Rohmenge": 2,
                                "Interval": 40,
                                "Maxlager": 6,
                                "Radius": 0,
                                "Kosten": [10, 4]
                            }]
                        }
                    },
                    "FISCHER": {
                        "Id": 20101,
                        "Kind": "GEBAEUDE",
                        "nested_objects": { "HAUS_PRODTYP": [{ "Ware": "NAHRUNG", "Kosten": 5 }] }
                    },
                    "FAHNEKONTOR": { "Id": "broken" }
                }
            }
        }
    }"#;

    #[test]
    fn test_load_definitions() {
        let table = FieldTypeTable::from_json(FIELDS_JSON.as_bytes()).unwrap();
        assert_eq!(table.len(), 4);
        assert!(table.get_by_name("FAHNEKONTOR").is_none());

        let gras = table.get(20001).unwrap();
        assert!(gras.kind.is_ground());
        assert!(table.get(20002).unwrap().kind.is_ground());

        let weber = table.get_by_name("WEBSTUBE").unwrap();
        assert_eq!(weber.size, Point::new(2, 2));
        assert!(!weber.kind.is_ground());
        let prod = weber.production.as_ref().unwrap();
        assert_eq!(prod.good.as_deref(), Some("STOFFE"));
        assert_eq!((prod.amount1, prod.amount2), (2, 0));
        assert_eq!((prod.interval, prod.max_stock), (40, 6));
        assert_eq!((prod.upkeep_active, prod.upkeep_inactive), (10, 4));

        let fischer = table.require(20101).unwrap().production.as_ref().unwrap();
        assert_eq!((fischer.upkeep_active, fischer.upkeep_inactive), (5, 5));
    }

    #[test]
    fn test_missing_definition() {
        let table = FieldTypeTable::from_json(FIELDS_JSON.as_bytes()).unwrap();
        assert!(matches!(table.require(29999), Err(Error::UnknownFieldType { id: 29999 })));
    }

    #[test]
    fn test_malformed_json() {
        let err = FieldTypeTable::from_json(b"{\"objects\": {}}").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
