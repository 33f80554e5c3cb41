use serde::{Deserialize, Serialize};

/// Outcome of classifying one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    #[serde(rename = "suggestedLabel")]
    pub label: String,
    pub confidence: f32,
}

/// Per-class scores, indexed in manifest class order.
#[derive(Debug, Clone, PartialEq)]
pub struct Probabilities {
    pub scores: Vec<f32>,
}

impl Probabilities {
    /// Index and value of the highest score; ties go to the lowest index.
    /// `None` for an empty vector.
    pub fn argmax(&self) -> Option<(usize, f32)> {
        self.scores
            .iter()
            .enumerate()
            .rev()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(index, &value)| (index, value))
    }

    pub fn sum(&self) -> f32 {
        self.scores.iter().sum()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model: String,
}
