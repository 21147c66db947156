use serde::{Deserialize, Serialize};

/// Fixed input/output counts of a matrix.
///
/// Input ids live in `1..=inputs` and output ids in `1..=outputs`; neither
/// range changes while a coordinator is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortLayout {
    pub inputs: u8,
    pub outputs: u8,
}

impl Default for PortLayout {
    fn default() -> Self {
        Self {
            inputs: 4,
            outputs: 4,
        }
    }
}

impl PortLayout {
    pub fn contains_input(self, id: u8) -> bool {
        (1..=self.inputs).contains(&id)
    }

    pub fn contains_output(self, id: u8) -> bool {
        (1..=self.outputs).contains(&id)
    }

    pub fn input_ids(self) -> impl Iterator<Item = u8> {
        1..=self.inputs
    }

    pub fn output_ids(self) -> impl Iterator<Item = u8> {
        1..=self.outputs
    }
}

/// Positional label for an input without a usable name.
pub fn default_input_name(id: u8) -> String {
    format!("Input {id}")
}

/// Positional label for an output without a usable name.
pub fn default_output_name(id: u8) -> String {
    format!("Output {id}")
}
