//! Deterministic keyword rules mapping masked merchant names to a Category.
//!
//! Rules are plain data: an ordered list of (category, keywords). The first
//! category with a keyword contained in the normalized merchant name wins.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use onecar_core::{Category, Error, Result};
use serde::{Deserialize, Serialize};
use tracing::trace;

const FUEL_KEYWORDS: &[&str] = &[
    "GS칼텍스",
    "SK에너지",
    "SK엔크린",
    "S-OIL",
    "현대오일뱅크",
    "알뜰주유소",
    "셀프주유소",
    "주유소",
    "에너지",
    "칼텍스",
    "엔크린",
];

const MAINTENANCE_KEYWORDS: &[&str] = &[
    "카센터",
    "정비소",
    "서비스센터",
    "자동차정비",
    "타이어",
    "현대자동차",
    "기아자동차",
    "르노삼성",
    "쌍용자동차",
    "정비",
];

const PARKING_KEYWORDS: &[&str] = &["주차장", "파킹", "하이패스", "통행료", "톨게이트", "주차"];

static BUILTIN: LazyLock<KeywordTable> = LazyLock::new(|| {
    KeywordTable::from_lists([
        (Category::Fuel, FUEL_KEYWORDS),
        (Category::Maintenance, MAINTENANCE_KEYWORDS),
        (Category::Parking, PARKING_KEYWORDS),
    ])
});

#[derive(Debug, Clone, PartialEq, Eq)]
struct Rule {
    category: Category,
    /// Keywords as configured, for display and round-tripping
    keywords: Vec<String>,
    /// Lower-cased keywords used for matching
    needles: Vec<String>,
}

/// Ordered category -> keyword table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordTable {
    rules: Vec<Rule>,
}

/// On-disk shape of a keyword table
#[derive(Debug, Default, Serialize, Deserialize)]
struct KeywordFile {
    #[serde(default)]
    categories: BTreeMap<String, Vec<String>>,
}

impl KeywordTable {
    /// The keyword table shipped with onecar
    pub fn builtin() -> &'static KeywordTable {
        &BUILTIN
    }

    fn from_lists<const N: usize>(lists: [(Category, &[&str]); N]) -> Self {
        let mut table = Self { rules: Vec::new() };
        for (category, keywords) in lists {
            table.set(category, keywords.iter().map(|k| k.to_string()));
        }
        table
    }

    /// Build a table from arbitrary keyword lists.
    ///
    /// Categories are always tried in priority order (FUEL, MAINTENANCE,
    /// PARKING) no matter how the input is ordered. OTHER is the fallback and
    /// cannot carry keywords; empty keywords would match everything and are
    /// rejected as well, as is a category listed twice.
    pub fn new<I, K>(lists: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Category, K)>,
        K: IntoIterator,
        K::Item: Into<String>,
    {
        let mut table = Self { rules: Vec::new() };
        for (category, keywords) in lists {
            if !category.is_car_related() {
                return Err(Error::Keywords(format!(
                    "{category} is the fallback category and cannot have keywords"
                )));
            }
            if table.rules.iter().any(|r| r.category == category) {
                return Err(Error::Keywords(format!("{category} is listed more than once")));
            }
            let keywords: Vec<String> = keywords
                .into_iter()
                .map(|k| k.into().trim().to_string())
                .collect();
            if keywords.iter().any(|k| k.is_empty()) {
                return Err(Error::Keywords(format!("{category} has an empty keyword")));
            }
            table.set(category, keywords);
        }
        Ok(table)
    }

    fn set(&mut self, category: Category, keywords: impl IntoIterator<Item = String>) {
        let keywords: Vec<String> = keywords.into_iter().collect();
        let needles = keywords.iter().map(|k| k.to_lowercase()).collect();
        let rule = Rule {
            category,
            keywords,
            needles,
        };
        match self.rules.iter_mut().find(|r| r.category == category) {
            Some(existing) => *existing = rule,
            None => self.rules.push(rule),
        }
        self.rules.sort_by_key(|r| r.category.ordinal());
    }

    /// Parse a TOML keyword table (`[categories] FUEL = [...]`)
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let file: KeywordFile =
            toml::from_str(s).map_err(|e| Error::Keywords(format!("parse keyword table: {e}")))?;
        let mut lists = Vec::with_capacity(file.categories.len());
        for (name, keywords) in file.categories {
            lists.push((name.parse::<Category>()?, keywords));
        }
        Self::new(lists)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        let file = KeywordFile {
            categories: self
                .rules
                .iter()
                .map(|r| (r.category.as_str().to_string(), r.keywords.clone()))
                .collect(),
        };
        toml::to_string_pretty(&file)
            .map_err(|e| Error::Keywords(format!("serialize keyword table: {e}")))
    }

    /// Keywords configured for a category (empty for OTHER or unset ones)
    pub fn keywords(&self, category: Category) -> &[String] {
        self.rules
            .iter()
            .find(|r| r.category == category)
            .map(|r| r.keywords.as_slice())
            .unwrap_or(&[])
    }

    /// Classify a masked merchant name.
    ///
    /// Masking characters (`*`) are removed and the name is lower-cased before
    /// substring matching. Unmatched names, including the empty string, are
    /// OTHER.
    pub fn categorize(&self, merchant_name: &str) -> Category {
        let clean = normalize(merchant_name);
        let category = self
            .rules
            .iter()
            .find(|r| r.needles.iter().any(|k| clean.contains(k.as_str())))
            .map(|r| r.category)
            .unwrap_or(Category::Other);
        trace!(merchant = merchant_name, %category, "categorized");
        category
    }
}

impl Default for KeywordTable {
    fn default() -> Self {
        Self::builtin().clone()
    }
}

fn normalize(merchant_name: &str) -> String {
    merchant_name.replace('*', "").to_lowercase()
}

/// Classify a masked merchant name with the built-in keyword table
pub fn categorize(merchant_name: &str) -> Category {
    KeywordTable::builtin().categorize(merchant_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gs_caltex_is_fuel() {
        assert_eq!(categorize("GS칼텍스 강남점"), Category::Fuel);
        assert_eq!(categorize("SK에너지 역삼점"), Category::Fuel);
    }

    #[test]
    fn test_service_center_is_maintenance() {
        assert_eq!(categorize("현대자동차 서비스센터"), Category::Maintenance);
        assert_eq!(categorize("한국타이어 T스테이션"), Category::Maintenance);
    }

    #[test]
    fn test_parking_lot_is_parking() {
        assert_eq!(categorize("롯데마트 주차장"), Category::Parking);
        assert_eq!(categorize("한국도로공사 하이패스"), Category::Parking);
    }

    #[test]
    fn test_unmatched_is_other() {
        assert_eq!(categorize("쿠팡 자동차용품"), Category::Other);
        assert_eq!(categorize(""), Category::Other);
        assert_eq!(categorize("***"), Category::Other);
    }

    #[test]
    fn test_masking_is_stripped() {
        assert_eq!(categorize("GS칼텍스 강**점"), categorize("GS칼텍스 강남점"));
        assert_eq!(categorize("GS칼*스 강남점"), Category::Other);
        assert_eq!(categorize("GS칼텍*스 강남점"), Category::Fuel);
        assert_eq!(categorize("현대자동차 서비*스센터"), Category::Maintenance);
        assert_eq!(categorize("롯데마트 주**차장"), Category::Parking);
    }

    #[test]
    fn test_match_is_case_insensitive() {
        assert_eq!(categorize("s-oil 셀프"), Category::Fuel);
        assert_eq!(categorize("Gs칼텍스"), Category::Fuel);
    }

    #[test]
    fn test_fuel_wins_over_parking() {
        // "주유소" (fuel) and "주차" (parking) both present
        assert_eq!(categorize("강변주유소 주차"), Category::Fuel);
        // "정비" (maintenance) and "주차장" (parking)
        assert_eq!(categorize("오토정비 주차장"), Category::Maintenance);
    }

    #[test]
    fn test_priority_ignores_input_order() {
        let table = KeywordTable::new([
            (Category::Parking, vec!["공영"]),
            (Category::Fuel, vec!["공영"]),
        ])
        .unwrap();
        assert_eq!(table.categorize("공영주차"), Category::Fuel);
        assert!(table.keywords(Category::Maintenance).is_empty());
    }

    #[test]
    fn test_rejects_other_and_empty_keywords() {
        assert!(KeywordTable::new([(Category::Other, vec!["x"])]).is_err());
        assert!(KeywordTable::new([(Category::Fuel, vec!["  "])]).is_err());
    }

    #[test]
    fn test_toml_round_trip_of_builtin() {
        let s = KeywordTable::builtin().to_toml_string().unwrap();
        assert!(s.contains("[categories]"));
        let parsed = KeywordTable::from_toml_str(&s).unwrap();
        assert_eq!(&parsed, KeywordTable::builtin());
    }

    #[test]
    fn test_toml_custom_table() {
        let table = KeywordTable::from_toml_str(
            r#"
[categories]
parking = ["Impark"]
FUEL = ["Shell"]
"#,
        )
        .unwrap();
        assert_eq!(table.categorize("IMPARK Lot 12"), Category::Parking);
        assert_eq!(table.categorize("shell 1234"), Category::Fuel);
        assert_eq!(table.categorize("GS칼텍스 강남점"), Category::Other);
    }

    #[test]
    fn test_duplicate_category_is_rejected() {
        let err = KeywordTable::from_toml_str(
            "[categories]\nFUEL = [\"GS칼텍스\"]\nfuel = [\"shell\"]\n",
        )
        .unwrap_err();
        assert!(matches!(err, Error::Keywords(ref m) if m.contains("FUEL")));

        // label and identifier name the same category
        let err = KeywordTable::from_toml_str(
            "[categories]\nPARKING = [\"주차장\"]\n\"주차\" = [\"파킹\"]\n",
        )
        .unwrap_err();
        assert!(matches!(err, Error::Keywords(_)));

        assert!(
            KeywordTable::new([
                (Category::Maintenance, vec!["카센터"]),
                (Category::Maintenance, vec!["정비"]),
            ])
            .is_err()
        );
    }

    #[test]
    fn test_toml_unknown_category() {
        let err = KeywordTable::from_toml_str("[categories]\nGROCERY = [\"mart\"]\n").unwrap_err();
        assert!(matches!(err, Error::Keywords(_)));
    }
}
