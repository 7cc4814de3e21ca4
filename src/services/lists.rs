//! Helpers for list-valued fields that cross the browser boundary as flat
//! strings, and for zipping parallel sequences into typed records.

use crate::{
    error::{AppError, AppResult},
    models::{CastDetail, CastMember, ListField, MovieCard},
};

const EMPTY_LIST: &str = "[]";
const OPEN: &str = "[\"";
const CLOSE: &str = "\"]";
const DELIMITER: &str = "\",\"";

/// Decodes a list field.
///
/// Native arrays are returned unchanged. `""` and `"[]"` are empty. An
/// encoded string must look like `["a","b"]`; anything else is malformed and
/// yields an empty list rather than an error.
pub fn parse_list(field: &ListField) -> Vec<String> {
    match field {
        ListField::Native(items) => items.clone(),
        ListField::Encoded(raw) => parse_encoded(raw).unwrap_or_else(|e| {
            tracing::debug!(error = %e, "Discarding malformed list field");
            Vec::new()
        }),
    }
}

fn parse_encoded(raw: &str) -> AppResult<Vec<String>> {
    if raw.is_empty() || raw == EMPTY_LIST {
        return Ok(Vec::new());
    }

    let inner = raw
        .strip_prefix(OPEN)
        .and_then(|rest| rest.strip_suffix(CLOSE))
        .ok_or_else(|| {
            AppError::MalformedInput(format!("Expected a [\"...\"] list, got {:?}", raw))
        })?;

    Ok(inner.split(DELIMITER).map(str::to_string).collect())
}

/// Encodes items in the `["a","b"]` form understood by [`parse_list`]
pub fn encode_list<S: AsRef<str>>(items: &[S]) -> String {
    if items.is_empty() {
        return EMPTY_LIST.to_string();
    }
    let joined: Vec<&str> = items.iter().map(AsRef::as_ref).collect();
    format!("{}{}{}", OPEN, joined.join(DELIMITER), CLOSE)
}

/// Parses a bracketed numeric list such as `[6193,24045]`. Malformed input
/// yields an empty list.
pub fn parse_id_list(raw: &str) -> Vec<u64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Vec::new();
    }

    let Some(inner) = raw
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .map(str::trim)
    else {
        tracing::debug!(raw = %raw, "Discarding id list without brackets");
        return Vec::new();
    };
    if inner.is_empty() {
        return Vec::new();
    }

    let parsed: Result<Vec<u64>, _> = inner.split(',').map(|id| id.trim().parse()).collect();
    parsed.unwrap_or_else(|e| {
        tracing::debug!(error = %e, raw = %raw, "Discarding malformed id list");
        Vec::new()
    })
}

/// Undoes the escaping the client applies to biography text
pub fn unescape_bio(bio: &str) -> String {
    bio.replace("\\n", "\n").replace("\\\"", "\"")
}

fn check_lengths(what: &str, lengths: &[(&str, usize)]) -> AppResult<()> {
    let expected = lengths.first().map(|(_, len)| *len).unwrap_or(0);
    if lengths.iter().all(|(_, len)| *len == expected) {
        return Ok(());
    }
    let described: Vec<String> = lengths
        .iter()
        .map(|(name, len)| format!("{}={}", name, len))
        .collect();
    Err(AppError::MalformedInput(format!(
        "{} fields have different lengths: {}",
        what,
        described.join(", ")
    )))
}

/// Pairs recommended titles with their posters
pub fn build_movie_cards(titles: Vec<String>, posters: Vec<String>) -> AppResult<Vec<MovieCard>> {
    check_lengths(
        "Movie card",
        &[("titles", titles.len()), ("posters", posters.len())],
    )?;
    Ok(titles
        .into_iter()
        .zip(posters)
        .map(|(title, poster)| MovieCard { title, poster })
        .collect())
}

/// Zips the parallel cast sequences into one record per person
pub fn build_cast(
    names: Vec<String>,
    ids: Vec<u64>,
    characters: Vec<String>,
    profiles: Vec<String>,
) -> AppResult<Vec<CastMember>> {
    check_lengths(
        "Cast",
        &[
            ("names", names.len()),
            ("ids", ids.len()),
            ("characters", characters.len()),
            ("profiles", profiles.len()),
        ],
    )?;

    Ok(names
        .into_iter()
        .zip(ids)
        .zip(characters)
        .zip(profiles)
        .map(|(((name, id), character), profile)| CastMember {
            name,
            id,
            character,
            profile,
        })
        .collect())
}

/// Zips the parallel biography sequences into one record per person
pub fn build_cast_details(
    names: Vec<String>,
    ids: Vec<u64>,
    profiles: Vec<String>,
    birthdays: Vec<String>,
    places: Vec<String>,
    bios: Vec<String>,
) -> AppResult<Vec<CastDetail>> {
    check_lengths(
        "Cast detail",
        &[
            ("names", names.len()),
            ("ids", ids.len()),
            ("profiles", profiles.len()),
            ("birthdays", birthdays.len()),
            ("places", places.len()),
            ("bios", bios.len()),
        ],
    )?;

    Ok(names
        .into_iter()
        .zip(ids)
        .zip(profiles)
        .zip(birthdays)
        .zip(places)
        .zip(bios)
        .map(
            |(((((name, id), profile), birthday), place_of_birth), bio)| CastDetail {
                name,
                id,
                profile,
                birthday,
                place_of_birth,
                biography: unescape_bio(&bio),
            },
        )
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(raw: &str) -> ListField {
        ListField::Encoded(raw.to_string())
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_encoded_list() {
        assert_eq!(
            parse_list(&encoded(r#"["The Matrix","Heat","Up"]"#)),
            strings(&["The Matrix", "Heat", "Up"])
        );
    }

    #[test]
    fn test_round_trip() {
        let items = strings(&["a", "b", "c"]);
        assert_eq!(parse_list(&encoded(&encode_list(&items))), items);
    }

    #[test]
    fn test_empty_markers() {
        assert!(parse_list(&encoded("")).is_empty());
        assert!(parse_list(&encoded("[]")).is_empty());
        assert_eq!(encode_list::<&str>(&[]), "[]");
    }

    #[test]
    fn test_native_list_unchanged() {
        let items = strings(&["x\",\"y", "z"]);
        assert_eq!(parse_list(&ListField::Native(items.clone())), items);
    }

    #[test]
    fn test_commas_inside_items_survive() {
        assert_eq!(
            parse_list(&encoded(r#"["Crouching Tiger, Hidden Dragon","Heat"]"#)),
            strings(&["Crouching Tiger, Hidden Dragon", "Heat"])
        );
    }

    #[test]
    fn test_single_empty_item() {
        assert_eq!(parse_list(&encoded(r#"[""]"#)), strings(&[""]));
    }

    #[test]
    fn test_malformed_lists_are_empty() {
        for raw in ["Heat", "[\"Heat", "Heat\"]", "[1,2]", "{\"a\": 1}", "[\""] {
            assert!(parse_list(&encoded(raw)).is_empty(), "{:?} should be empty", raw);
        }
    }

    #[test]
    fn test_parse_id_list() {
        assert_eq!(parse_id_list("[6193,24045, 27578]"), vec![6193, 24045, 27578]);
        assert!(parse_id_list("[]").is_empty());
        assert!(parse_id_list("").is_empty());
        assert!(parse_id_list("[12,abc]").is_empty());
    }

    #[test]
    fn test_parse_id_list_requires_single_brackets() {
        assert!(parse_id_list("[[1]]").is_empty());
        assert!(parse_id_list("1,2").is_empty());
        assert!(parse_id_list("[1,2").is_empty());
        assert_eq!(parse_id_list(" [7] "), vec![7]);
    }

    #[test]
    fn test_unescape_bio() {
        assert_eq!(
            unescape_bio(r#"Born in London.\nKnown for \"Heat\"."#),
            "Born in London.\nKnown for \"Heat\"."
        );
    }

    #[test]
    fn test_build_cast() {
        let cast = build_cast(
            strings(&["Al Pacino", "Robert De Niro"]),
            vec![1158, 380],
            strings(&["Vincent Hanna", "Neil McCauley"]),
            strings(&["/pacino.jpg", "/deniro.jpg"]),
        )
        .unwrap();
        assert_eq!(cast.len(), 2);
        assert_eq!(
            cast[1],
            CastMember {
                name: "Robert De Niro".to_string(),
                id: 380,
                character: "Neil McCauley".to_string(),
                profile: "/deniro.jpg".to_string(),
            }
        );
    }

    #[test]
    fn test_build_cast_length_mismatch() {
        let err = build_cast(
            strings(&["Al Pacino", "Robert De Niro"]),
            vec![1158],
            strings(&["Vincent Hanna", "Neil McCauley"]),
            strings(&["/pacino.jpg", "/deniro.jpg"]),
        )
        .unwrap_err();
        match err {
            AppError::MalformedInput(msg) => assert!(msg.contains("ids=1")),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_build_cast_details_unescapes_bios() {
        let details = build_cast_details(
            strings(&["Val Kilmer"]),
            vec![5576],
            strings(&["/kilmer.jpg"]),
            strings(&["1959-12-31"]),
            strings(&["Los Angeles"]),
            strings(&[r"Actor.\nMusician."]),
        )
        .unwrap();
        assert_eq!(details[0].biography, "Actor.\nMusician.");
        assert_eq!(details[0].place_of_birth, "Los Angeles");
    }

    #[test]
    fn test_build_cast_details_length_mismatch() {
        let result = build_cast_details(
            strings(&["Val Kilmer"]),
            vec![5576],
            strings(&["/kilmer.jpg"]),
            Vec::new(),
            strings(&["Los Angeles"]),
            strings(&["Actor."]),
        );
        assert!(matches!(result, Err(AppError::MalformedInput(_))));
    }

    #[test]
    fn test_build_movie_cards() {
        let cards = build_movie_cards(strings(&["Heat"]), strings(&["/heat.jpg"])).unwrap();
        assert_eq!(cards[0].title, "Heat");
        assert!(build_movie_cards(strings(&["Heat", "Up"]), strings(&["/heat.jpg"])).is_err());
    }
}
