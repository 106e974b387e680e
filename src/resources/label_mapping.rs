use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LabelMappingError {
    #[error("label mapping is empty")]
    Empty,

    #[error("index {index} is assigned to both {first:?} and {second:?}")]
    DuplicateIndex {
        index: usize,
        first: String,
        second: String,
    },

    #[error("label {label:?} has index {index}, outside 0..{len}")]
    IndexOutOfRange {
        label: String,
        index: usize,
        len: usize,
    },
}

/// Parses a `{"label": index}` JSON object.
pub fn parse_class_indices(json: &str) -> Result<HashMap<String, usize>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Bijection between class labels and positions in the model's score vector.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelMapping {
    labels: Vec<String>,
    indices: HashMap<String, usize>,
}

impl LabelMapping {
    /// Builds the mapping from a label -> index table, as written out at training time.
    pub fn from_class_indices<I>(class_indices: I) -> Result<Self, LabelMappingError>
    where
        I: IntoIterator<Item = (String, usize)>,
    {
        let mut entries: Vec<(String, usize)> = class_indices.into_iter().collect();
        if entries.is_empty() {
            return Err(LabelMappingError::Empty);
        }
        entries.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));

        let len = entries.len();
        let mut labels: Vec<Option<String>> = vec![None; len];

        for (label, index) in entries {
            if index >= len {
                return Err(LabelMappingError::IndexOutOfRange { label, index, len });
            }
            if let Some(first) = &labels[index] {
                return Err(LabelMappingError::DuplicateIndex {
                    index,
                    first: first.clone(),
                    second: label,
                });
            }
            labels[index] = Some(label);
        }

        // n labels, n distinct indices, all below n: every slot is filled.
        let labels: Vec<String> = labels.into_iter().flatten().collect();
        let indices = labels
            .iter()
            .enumerate()
            .map(|(index, label)| (label.clone(), index))
            .collect();

        Ok(Self { labels, indices })
    }

    pub fn label_for(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(|label| label.as_str())
    }

    pub fn index_for(&self, label: &str) -> Option<usize> {
        self.indices.get(label).copied()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Labels ordered by index.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vehicles() -> Vec<(String, usize)> {
        [
            ("Bus", 0),
            ("Family Sedan", 1),
            ("Fire Engine", 2),
            ("Heavy Truck", 3),
            ("Jeep", 4),
            ("Minibus", 5),
            ("Racing Car", 6),
            ("SUV", 7),
            ("Taxi", 8),
            ("Truck", 9),
        ]
        .into_iter()
        .map(|(label, index)| (label.to_string(), index))
        .collect()
    }

    #[test]
    fn test_round_trips_both_directions() {
        let mapping = LabelMapping::from_class_indices(vehicles()).unwrap();

        assert_eq!(mapping.len(), 10);
        for label in mapping.labels() {
            let index = mapping.index_for(label).unwrap();
            assert_eq!(mapping.label_for(index), Some(label.as_str()));
        }
        for index in 0..mapping.len() {
            let label = mapping.label_for(index).unwrap();
            assert_eq!(mapping.index_for(label), Some(index));
        }
    }

    #[test]
    fn test_labels_are_ordered_by_index() {
        let mut shuffled = vehicles();
        shuffled.reverse();

        let mapping = LabelMapping::from_class_indices(shuffled).unwrap();

        assert_eq!(mapping.label_for(0), Some("Bus"));
        assert_eq!(mapping.label_for(9), Some("Truck"));
        assert_eq!(mapping.label_for(10), None);
        assert_eq!(mapping.index_for("Tractor"), None);
    }

    #[test]
    fn test_rejects_duplicate_index() {
        let result = LabelMapping::from_class_indices(vec![
            ("Bus".to_string(), 0),
            ("Taxi".to_string(), 0),
        ]);

        assert_eq!(
            result,
            Err(LabelMappingError::DuplicateIndex {
                index: 0,
                first: "Bus".to_string(),
                second: "Taxi".to_string(),
            })
        );
    }

    #[test]
    fn test_rejects_gap_in_indices() {
        let result = LabelMapping::from_class_indices(vec![
            ("Bus".to_string(), 0),
            ("Taxi".to_string(), 2),
        ]);

        assert_eq!(
            result,
            Err(LabelMappingError::IndexOutOfRange {
                label: "Taxi".to_string(),
                index: 2,
                len: 2,
            })
        );
    }

    #[test]
    fn test_rejects_empty() {
        let result = LabelMapping::from_class_indices(Vec::new());

        assert_eq!(result, Err(LabelMappingError::Empty));
    }

    #[test]
    fn test_parse_class_indices() {
        let class_indices = parse_class_indices(r#"{"SUV": 1, "Bus": 0, "Jeep": 2}"#).unwrap();

        let mapping = LabelMapping::from_class_indices(class_indices).unwrap();

        assert_eq!(mapping.labels(), &["Bus", "SUV", "Jeep"]);
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        assert!(parse_class_indices(r#"{"Bus": -1}"#).is_err());
        assert!(parse_class_indices("not json").is_err());
        assert!(parse_class_indices(r#"["Bus", "Taxi"]"#).is_err());
    }
}
