//! Batch Mapping
//!
//! Maps independent documents on the Rayon pool. Each document gets its own
//! tree and query cache; only the mapper configuration is shared.

use rayon::prelude::*;

use crate::core::Source;
use crate::error::Result;
use crate::mapper::Mapper;
use crate::value::Value;

/// Map every input, keeping input order
pub fn map_parallel(mapper: &Mapper, inputs: &[&[u8]]) -> Vec<Result<Value>> {
    inputs
        .par_iter()
        .map(|bytes| mapper.parse(Source::Bytes(bytes)))
        .collect()
}

/// Map every input, failing on the first error in input order
pub fn try_map_parallel(mapper: &Mapper, inputs: &[&[u8]]) -> Result<Vec<Value>> {
    map_parallel(mapper, inputs).into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use serde_json::json;

    #[test]
    fn test_results_keep_input_order() {
        let inputs: Vec<&[u8]> = vec![b"<a>1</a>", b"<b>x</b>", b"<c/>"];
        let results = map_parallel(&Mapper::default(), &inputs);

        let values: Vec<serde_json::Value> = results
            .into_iter()
            .map(|r| serde_json::to_value(r.unwrap()).unwrap())
            .collect();
        assert_eq!(values, [json!({"a": 1}), json!({"b": "x"}), json!({"c": null})]);
    }

    #[test]
    fn test_errors_stay_per_document() {
        let inputs: Vec<&[u8]> = vec![b"<a/>", b"<broken", b"<c/>"];
        let results = map_parallel(&Mapper::default(), &inputs);

        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(Error::MalformedSource(_))));
        assert!(results[2].is_ok());

        assert!(try_map_parallel(&Mapper::default(), &inputs).is_err());
    }

    #[test]
    fn test_empty_batch() {
        assert!(map_parallel(&Mapper::default(), &[]).is_empty());
    }
}
