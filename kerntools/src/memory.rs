//! A font that only lives in memory.

use std::collections::{BTreeMap, HashSet};

use crate::table::{KerningEntry, KerningTable};

/// Glyph names, group names and per-master kerning, without outlines.
///
/// Key validity is font-wide: every master shares one glyph set.
#[derive(Clone, Debug, Default)]
pub struct MemoryFont {
    units_per_em: u32,
    masters: Vec<String>,
    glyphs: HashSet<String>,
    groups: HashSet<String>,
    kerning: BTreeMap<String, BTreeMap<(String, String), i64>>,
}

impl MemoryFont {
    /// An empty font. A zero `units_per_em` is bumped to 1.
    pub fn new(units_per_em: u32) -> Self {
        Self {
            units_per_em: units_per_em.max(1),
            ..Default::default()
        }
    }

    pub fn with_master(mut self, id: &str) -> Self {
        if !self.masters.iter().any(|m| m == id) {
            self.masters.push(id.to_string());
        }
        self
    }

    pub fn with_glyphs<'a>(mut self, names: impl IntoIterator<Item = &'a str>) -> Self {
        self.glyphs.extend(names.into_iter().map(String::from));
        self
    }

    pub fn with_groups<'a>(mut self, names: impl IntoIterator<Item = &'a str>) -> Self {
        self.groups.extend(names.into_iter().map(String::from));
        self
    }

    /// Add a pair, registering the master if it is new. Keys are not checked,
    /// so dangling pairs can be modelled.
    pub fn with_pair(mut self, master: &str, left: &str, right: &str, value: i64) -> Self {
        self = self.with_master(master);
        self.kerning
            .entry(master.to_string())
            .or_default()
            .insert((left.to_string(), right.to_string()), value);
        self
    }

    pub fn value(&self, master: &str, left: &str, right: &str) -> Option<i64> {
        self.kerning
            .get(master)?
            .get(&(left.to_string(), right.to_string()))
            .copied()
    }
}

impl KerningTable for MemoryFont {
    fn units_per_em(&self) -> u32 {
        self.units_per_em
    }

    fn contexts(&self) -> Vec<String> {
        self.masters.clone()
    }

    fn pairs(&self, context: &str) -> Vec<KerningEntry> {
        self.kerning
            .get(context)
            .map(|pairs| {
                pairs
                    .iter()
                    .map(|((left, right), value)| KerningEntry::new(context, left, right, *value))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn is_valid_key(&self, _context: &str, key: &str) -> bool {
        self.groups.contains(key) || self.glyphs.contains(key)
    }

    fn set_value(&mut self, context: &str, left: &str, right: &str, value: i64) {
        if !self.masters.iter().any(|m| m == context) {
            self.masters.push(context.to_string());
        }
        self.kerning
            .entry(context.to_string())
            .or_default()
            .insert((left.to_string(), right.to_string()), value);
    }

    fn remove_pair(&mut self, context: &str, left: &str, right: &str) {
        if let Some(pairs) = self.kerning.get_mut(context) {
            pairs.remove(&(left.to_string(), right.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_resolve_against_glyphs_and_groups() {
        let font = MemoryFont::new(1000)
            .with_glyphs(["A", "V"])
            .with_groups(["public.kern1.O"]);
        assert!(font.is_valid_key("m01", "A"));
        assert!(font.is_valid_key("m01", "public.kern1.O"));
        assert!(!font.is_valid_key("m01", "B"));
        assert!(!font.is_valid_pair("m01", "A", "B"));
    }

    #[test]
    fn set_and_remove() {
        let mut font = MemoryFont::new(1000).with_pair("m01", "A", "V", -40);
        font.set_value("m01", "A", "V", -35);
        font.set_value("m02", "T", "o", -60);
        assert_eq!(font.value("m01", "A", "V"), Some(-35));
        assert_eq!(font.contexts(), vec!["m01".to_string(), "m02".to_string()]);

        font.remove_pair("m02", "T", "o");
        font.remove_pair("m03", "T", "o");
        assert_eq!(font.value("m02", "T", "o"), None);
        assert_eq!(font.entries().len(), 1);
    }

    #[test]
    fn zero_units_per_em_is_clamped() {
        assert_eq!(MemoryFont::new(0).units_per_em(), 1);
    }
}
