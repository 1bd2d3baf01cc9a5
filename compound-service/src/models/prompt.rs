/// Target shape described to the generator.
const SHAPE_TEMPLATE: &str = r#"{
    "formula": "molecular formula",
    "description": "brief description of the structure",
    "structure": [
        {
            "symbol": "atomic symbol (e.g., 'C', 'H', 'O')",
            "x": x_coordinate (number),
            "y": y_coordinate (number),
            "z": z_coordinate (number),
            "connections": [array of indices of connected atoms]
        },
        ...
    ]
}"#;

/// Worked example included in every prompt.
pub const WATER_EXAMPLE: &str = r#"{
    "formula": "H2O",
    "description": "Water molecule with a bent structure, oxygen atom bonded to two hydrogen atoms",
    "structure": [
        {"symbol": "O", "x": 0, "y": 0, "z": 0, "connections": [1, 2]},
        {"symbol": "H", "x": 0.96, "y": 0, "z": -0.24, "connections": [0]},
        {"symbol": "H", "x": -0.96, "y": 0, "z": -0.24, "connections": [0]}
    ]
}"#;

/// Prompt asking the generator for one compound's structure as JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationPrompt {
    text: String,
}

impl GenerationPrompt {
    pub fn for_compound(compound_name: &str) -> Self {
        let text = format!(
            "Create a JSON object for {name} with the following structure:\n\
             {shape}\n\n\
             Example for water (H2O):\n\
             {example}\n\n\
             Provide ONLY the JSON object, no additional text.",
            name = compound_name,
            shape = SHAPE_TEMPLATE,
            example = WATER_EXAMPLE,
        );

        Self { text }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}
