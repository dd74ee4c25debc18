//! Stored form of a record: JSON compressed with zstd

use crate::error::{StoreError, StoreResult};
use crate::record::ProjectRecord;

pub fn encode(record: &ProjectRecord, level: i32) -> StoreResult<Vec<u8>> {
    let json = serde_json::to_vec(record)?;
    zstd::stream::encode_all(json.as_slice(), level).map_err(StoreError::Compression)
}

pub fn decode(bytes: &[u8]) -> StoreResult<ProjectRecord> {
    let json = zstd::stream::decode_all(bytes).map_err(StoreError::Compression)?;
    Ok(serde_json::from_slice(&json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagesmith_model::{Element, ElementType, Section, Sections};
    use std::sync::Arc;

    #[test]
    fn test_compresses_repetitive_trees() {
        let elements = (0..200)
            .map(|i| Arc::new(Element::new(format!("e-{}", i), ElementType::Text).with_prop("content", "Lorem ipsum")))
            .collect();
        let home = Section::home("home", "Home").with_elements(elements);
        let sections: Sections = [(home.id.clone(), home)].into_iter().collect();
        let record = ProjectRecord::new("Big", sections);

        let json_len = serde_json::to_vec(&record).unwrap().len();
        let encoded = encode(&record, 3).unwrap();
        assert!(encoded.len() * 4 < json_len);
        assert_eq!(decode(&encoded).unwrap(), record);
    }

    #[test]
    fn test_garbage_is_a_compression_error() {
        assert!(matches!(decode(b"not zstd"), Err(StoreError::Compression(_))));
    }
}
