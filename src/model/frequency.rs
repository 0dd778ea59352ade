//! Description frequencies

use std::collections::HashMap;

use serde::Serialize;

use super::transaction::TransactionRecord;

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct DescriptionFrequency {
    pub description: String,
    pub count: usize,
}

/// Count records per exact description, most frequent first.
///
/// Descriptions with equal counts keep the order in which they were first seen.
#[must_use]
pub fn aggregate(records: &[TransactionRecord]) -> Vec<DescriptionFrequency> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut frequencies: Vec<DescriptionFrequency> = Vec::new();

    for record in records {
        match positions.get(record.description.as_str()) {
            Some(&i) => frequencies[i].count += 1,
            None => {
                positions.insert(&record.description, frequencies.len());
                frequencies.push(DescriptionFrequency {
                    description: record.description.clone(),
                    count: 1,
                });
            }
        }
    }

    // stable, so ties stay in first-seen order
    frequencies.sort_by(|a, b| b.count.cmp(&a.count));

    frequencies
}
