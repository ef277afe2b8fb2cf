// ---------------------------------------------------------------------------
// Source schema: ordered (name, semantic type) pairs bound by position
// ---------------------------------------------------------------------------

/// How a source field is stored once loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemanticType {
    /// Free text, kept as a categorical column.
    Category,
    /// Floating point value; unparseable cells become NaN.
    Number,
}

/// One field of the input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Column name inside the dataset.
    pub name: &'static str,
    /// Header text expected in the CSV (compared loosely, see [`header_matches`]).
    pub header: &'static str,
    pub kind: SemanticType,
}

pub const COUNTRY: &str = "Country";
pub const CONTINENT: &str = "Continent";
pub const YEAR: &str = "Year";
pub const LIFE_EXP: &str = "LifeExp";
pub const POP: &str = "Pop";
pub const GDP_PERCAP: &str = "GdpPercap";

/// The gapminder layout, in file order.
pub const GAPMINDER_SCHEMA: [FieldSpec; 6] = [
    FieldSpec { name: COUNTRY, header: "country", kind: SemanticType::Category },
    FieldSpec { name: CONTINENT, header: "continent", kind: SemanticType::Category },
    FieldSpec { name: YEAR, header: "year", kind: SemanticType::Number },
    FieldSpec { name: LIFE_EXP, header: "life_exp", kind: SemanticType::Number },
    FieldSpec { name: POP, header: "pop", kind: SemanticType::Number },
    FieldSpec { name: GDP_PERCAP, header: "gdp_percap", kind: SemanticType::Number },
];

/// Case- and underscore-insensitive header comparison, so both
/// `life_exp` and `lifeExp` bind to the same field.
pub fn header_matches(found: &str, expected: &str) -> bool {
    fn normalize(s: &str) -> String {
        s.trim()
            .chars()
            .filter(|c| *c != '_' && *c != ' ')
            .map(|c| c.to_ascii_lowercase())
            .collect()
    }
    normalize(found) == normalize(expected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_matching_is_loose() {
        assert!(header_matches("lifeExp", "life_exp"));
        assert!(header_matches(" GDP_PERCAP ", "gdp_percap"));
        assert!(!header_matches("pop_total", "pop"));
    }

    #[test]
    fn test_schema_order() {
        let names: Vec<&str> = GAPMINDER_SCHEMA.iter().map(|f| f.name).collect();
        assert_eq!(names, vec![COUNTRY, CONTINENT, YEAR, LIFE_EXP, POP, GDP_PERCAP]);
    }
}
