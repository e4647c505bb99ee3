use crate::model::{FormKey, KnownRecords, Record};

/// Adds each keyword not already present. Returns how many were added.
pub fn add_keywords<'k>(record: &mut Record, keywords: impl IntoIterator<Item = &'k FormKey>) -> usize {
    let list = record.keywords.get_or_insert_with(Vec::new);
    let mut added = 0;
    for kw in keywords {
        if !list.contains(kw) {
            list.push(kw.clone());
            added += 1;
        }
    }
    added
}

/// Tags a patched render record with the base keyword set, plus the
/// no-modes keyword when modes are off.
pub fn tag_keywords(record: &mut Record, known: &KnownRecords, use_modes: bool) -> usize {
    let mut set = vec![&known.ud_keyword, &known.ud_patch_keyword];
    if !use_modes {
        set.push(&known.ud_patch_no_mode_keyword);
    }
    add_keywords(record, set)
}
