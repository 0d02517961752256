use serde::de::DeserializeOwned;

use crate::error::SchemaError;

/// Deserialize with JSON-path context in error messages.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, SchemaError> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize::<_, T>(de).map_err(into_schema_error)
}

pub fn from_slice_with_path<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, SchemaError> {
    let de = &mut serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize::<_, T>(de).map_err(into_schema_error)
}

fn into_schema_error(err: serde_path_to_error::Error<serde_json::Error>) -> SchemaError {
    let path = err.path().to_string();
    SchemaError::Parse { path, message: err.into_inner().to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, serde::Deserialize)]
    struct Outer {
        #[allow(unused)]
        items: Vec<Inner>,
    }

    #[derive(Debug, serde::Deserialize)]
    struct Inner {
        #[allow(unused)]
        name: String,
    }

    #[test]
    fn error_carries_json_path() {
        let err = from_str_with_path::<Outer>(r#"{"items": [{"name": "a"}, {"name": 3}]}"#).unwrap_err();
        match err {
            SchemaError::Parse { path, .. } => assert_eq!(path, "items[1].name"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn slice_and_str_agree() {
        let src = r#"{"items": []}"#;
        assert!(from_str_with_path::<Outer>(src).is_ok());
        assert!(from_slice_with_path::<Outer>(src.as_bytes()).is_ok());
    }
}
