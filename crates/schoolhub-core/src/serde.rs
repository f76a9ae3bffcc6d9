use serde::{Deserialize, Deserializer};
use uuid::Uuid;

/// Accepts a UUID string, `null`, or an empty string (treated as absent).
pub fn deserialize_optional_uuid<'de, D>(deserializer: D) -> Result<Option<Uuid>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt {
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => Uuid::parse_str(&s)
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Distinguishes a missing field (`None`) from an explicit `null`
/// (`Some(None)`) in partial updates. Pair with `#[serde(default)]`.
pub fn deserialize_nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Filter {
        #[serde(default, deserialize_with = "deserialize_optional_uuid")]
        class_id: Option<Uuid>,
    }

    #[derive(Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "deserialize_nullable")]
        teacher_id: Option<Option<Uuid>>,
    }

    #[test]
    fn test_optional_uuid_empty_string() {
        let f: Filter = serde_json::from_str(r#"{"class_id":""}"#).unwrap();
        assert!(f.class_id.is_none());

        let f: Filter = serde_json::from_str(r#"{}"#).unwrap();
        assert!(f.class_id.is_none());

        let id = Uuid::new_v4();
        let f: Filter = serde_json::from_str(&format!(r#"{{"class_id":"{id}"}}"#)).unwrap();
        assert_eq!(f.class_id, Some(id));

        assert!(serde_json::from_str::<Filter>(r#"{"class_id":"nope"}"#).is_err());
    }

    #[test]
    fn test_nullable_distinguishes_null_from_missing() {
        let p: Patch = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(p.teacher_id, None);

        let p: Patch = serde_json::from_str(r#"{"teacher_id":null}"#).unwrap();
        assert_eq!(p.teacher_id, Some(None));

        let id = Uuid::new_v4();
        let p: Patch = serde_json::from_str(&format!(r#"{{"teacher_id":"{id}"}}"#)).unwrap();
        assert_eq!(p.teacher_id, Some(Some(id)));
    }
}
