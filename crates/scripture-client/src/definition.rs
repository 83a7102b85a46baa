use serde::Serialize;

/// Value types a formula parameter or result can take
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    /// Plain text
    String,
}

/// One typed formula parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterDefinition {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "type")]
    pub value_type: ValueType,
    pub optional: bool,
}

/// Everything a host needs to register the formula
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormulaDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: Vec<ParameterDefinition>,
    pub result_type: ValueType,
    pub network_domains: Vec<&'static str>,
}

/// Definition of the `Bible` formula
pub fn definition() -> FormulaDefinition {
    FormulaDefinition {
        name: crate::FORMULA_NAME,
        description: "Get a passage of the Bible.",
        parameters: vec![
            ParameterDefinition {
                name: "verses",
                description: "Verses that you want to pull from the Bible in the format: BOOK+CHAPTER:VERSE,",
                value_type: ValueType::String,
                optional: false,
            },
            ParameterDefinition {
                name: "translation",
                description: "The translation of the Bible you want to use. Supported translations can be found at: https://github.com/seven1m/open-bibles#open-bibles. Use 'abbrev' column.",
                value_type: ValueType::String,
                optional: true,
            },
        ],
        result_type: ValueType::String,
        network_domains: vec![crate::NETWORK_DOMAIN],
    }
}
