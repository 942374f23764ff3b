//! Compact-string and code-meaning-list forms of a terminology entry.
//!
//! The compact string is the persisted representation: seven `~`-joined
//! fields, each code triple written as `designator^value^meaning`. The
//! code-meaning list is a display-level alternative carrying only the
//! human-readable meanings. Both deserializers re-resolve against the
//! context store so a stored entry survives upstream edits to code
//! meanings as long as designator+value are unchanged.

use term_model::{CodeIdentifier, TerminologyEntry};

use crate::error::{ContextError, Result};
use crate::store::ContextStore;

const FIELD_COUNT: usize = 7;

/// Serialize an entry to its compact form.
///
/// Absent code triples serialize as `^^`; absent context names as empty
/// fields.
pub fn serialize_entry(entry: &TerminologyEntry) -> String {
    let fields = [
        entry
            .terminology_context_name
            .clone()
            .unwrap_or_default(),
        triple(entry.category.as_ref().map(|c| &c.code)),
        triple(entry.type_term.as_ref().map(|t| &t.code)),
        triple(entry.type_modifier.as_ref().map(|m| &m.code)),
        entry.anatomic_context_name.clone().unwrap_or_default(),
        triple(entry.region.as_ref().map(|r| &r.code)),
        triple(entry.region_modifier.as_ref().map(|m| &m.code)),
    ];
    fields.join("~")
}

/// Deserialize a compact string and re-resolve it against the store.
///
/// Returns `Ok(None)` for the "no selection" form (category field exactly
/// `^^`). Category and type must resolve; a missing type modifier,
/// region, or region modifier leaves the optional field unset.
pub fn deserialize_entry(
    store: &ContextStore,
    serialized: &str,
) -> Result<Option<TerminologyEntry>> {
    let fields: Vec<&str> = serialized.split('~').collect();
    if fields.len() != FIELD_COUNT {
        return Err(ContextError::InvalidSerialization {
            message: format!("expected {FIELD_COUNT} fields, got {}", fields.len()),
        });
    }

    // "^^" in the category slot means no selection was stored.
    if fields[1] == "^^" {
        return Ok(None);
    }

    let terminology = fields[0];
    if terminology.is_empty() {
        return Err(ContextError::InvalidSerialization {
            message: "missing terminology context name".to_string(),
        });
    }

    let category_id = parse_triple(fields[1])?.ok_or_else(blank_triple)?;
    let type_id = parse_triple(fields[2])?.ok_or_else(blank_triple)?;
    let modifier_id = parse_triple(fields[3])?;
    let region_id = parse_triple(fields[5])?;
    let region_modifier_id = parse_triple(fields[6])?;

    let category = store.category(terminology, &category_id).ok_or_else(|| {
        ContextError::CodeNotFound {
            what: "category",
            code: category_id.to_string(),
            scope: terminology.to_string(),
        }
    })?;
    let type_term = category
        .type_term(&type_id)
        .ok_or_else(|| ContextError::CodeNotFound {
            what: "type",
            code: type_id.to_string(),
            scope: terminology.to_string(),
        })?;

    let mut entry = TerminologyEntry {
        terminology_context_name: Some(terminology.to_string()),
        category: Some(category.clone()),
        type_term: Some(type_term.clone()),
        ..TerminologyEntry::default()
    };

    if let Some(id) = modifier_id {
        entry.type_modifier = type_term.modifier(&id).cloned();
    }

    let anatomic = fields[4];
    if !anatomic.is_empty() {
        entry.anatomic_context_name = Some(anatomic.to_string());
        if let Some(id) = region_id {
            entry.region = store.region(anatomic, &id).cloned();
        }
        if let (Some(region), Some(id)) = (entry.region.as_ref(), region_modifier_id) {
            entry.region_modifier = region.modifier(&id).cloned();
        }
    }

    Ok(Some(entry))
}

/// The display-level form: terminology name, category/type/type-modifier
/// meanings, anatomic context name, region/region-modifier meanings.
pub fn code_meanings(entry: &TerminologyEntry) -> Vec<String> {
    vec![
        entry
            .terminology_context_name
            .clone()
            .unwrap_or_default(),
        meaning(entry.category.as_ref().map(|c| &c.code)),
        meaning(entry.type_term.as_ref().map(|t| &t.code)),
        meaning(entry.type_modifier.as_ref().map(|m| &m.code)),
        entry.anatomic_context_name.clone().unwrap_or_default(),
        meaning(entry.region.as_ref().map(|r| &r.code)),
        meaning(entry.region_modifier.as_ref().map(|m| &m.code)),
    ]
}

/// Rebuild an entry from a code-meaning list.
///
/// At least three entries (terminology name, category meaning, type
/// meaning) are required; a shorter tail leaves the optional fields
/// unset. Each meaning resolves inside its already-identified parent.
pub fn entry_from_code_meanings(
    store: &ContextStore,
    meanings: &[String],
) -> Result<TerminologyEntry> {
    if meanings.len() < 3 {
        return Err(ContextError::InvalidSerialization {
            message: format!("expected at least 3 code meanings, got {}", meanings.len()),
        });
    }
    let terminology = meanings[0].as_str();
    if terminology.is_empty() {
        return Err(ContextError::InvalidSerialization {
            message: "missing terminology context name".to_string(),
        });
    }

    let category = store
        .category_by_meaning(terminology, &meanings[1])
        .ok_or_else(|| ContextError::CodeNotFound {
            what: "category",
            code: meanings[1].clone(),
            scope: terminology.to_string(),
        })?;
    let type_term = category
        .type_by_meaning(&meanings[2])
        .ok_or_else(|| ContextError::CodeNotFound {
            what: "type",
            code: meanings[2].clone(),
            scope: terminology.to_string(),
        })?;

    let mut entry = TerminologyEntry {
        terminology_context_name: Some(terminology.to_string()),
        category: Some(category.clone()),
        type_term: Some(type_term.clone()),
        ..TerminologyEntry::default()
    };

    let Some(modifier_meaning) = meanings.get(3) else {
        return Ok(entry);
    };
    entry.type_modifier = type_term.modifier_by_meaning(modifier_meaning).cloned();

    let Some(anatomic) = meanings.get(4) else {
        return Ok(entry);
    };
    if !anatomic.is_empty() {
        entry.anatomic_context_name = Some(anatomic.clone());
    }

    let Some(region_meaning) = meanings.get(5) else {
        return Ok(entry);
    };
    if !anatomic.is_empty() {
        entry.region = store.region_by_meaning(anatomic, region_meaning).cloned();
    }

    let Some(region_modifier_meaning) = meanings.get(6) else {
        return Ok(entry);
    };
    if let Some(region) = entry.region.as_ref() {
        entry.region_modifier = region
            .modifier_by_meaning(region_modifier_meaning)
            .cloned();
    }

    Ok(entry)
}

fn triple(code: Option<&CodeIdentifier>) -> String {
    match code {
        Some(code) => format!("{}^{}^{}", code.designator, code.value, code.meaning),
        None => "^^".to_string(),
    }
}

fn meaning(code: Option<&CodeIdentifier>) -> String {
    code.map(|c| c.meaning.clone()).unwrap_or_default()
}

/// Parse one `designator^value^meaning` field.
///
/// Exactly three sub-fields are required; an all-blank triple is an
/// absent code, not an error.
fn parse_triple(field: &str) -> Result<Option<CodeIdentifier>> {
    let parts: Vec<&str> = field.split('^').collect();
    if parts.len() != 3 {
        return Err(ContextError::InvalidSerialization {
            message: format!("expected 3 sub-fields in \"{field}\", got {}", parts.len()),
        });
    }
    let code = CodeIdentifier::new(parts[0], parts[1], parts[2]);
    if code.is_empty() {
        return Ok(None);
    }
    Ok(Some(code))
}

fn blank_triple() -> ContextError {
    ContextError::InvalidSerialization {
        message: "category and type triples must not be blank".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_triple_requires_three_sub_fields() {
        assert!(parse_triple("SCT^85756007^Tissue").unwrap().is_some());
        assert!(parse_triple("^^").unwrap().is_none());
        assert!(parse_triple("SCT^85756007").is_err());
        assert!(parse_triple("a^b^c^d").is_err());
    }

    #[test]
    fn partial_triple_keeps_identity() {
        let code = parse_triple("SCT^51114001^").unwrap().expect("present");
        assert_eq!(code.designator, "SCT");
        assert_eq!(code.value, "51114001");
        assert!(code.meaning.is_empty());
    }

    #[test]
    fn empty_entry_serializes_to_blank_fields() {
        let entry = TerminologyEntry::default();
        assert_eq!(serialize_entry(&entry), "~^^~^^~^^~~^^~^^");
    }
}
