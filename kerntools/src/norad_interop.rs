use norad::Name;

use crate::table::{KerningEntry, KerningTable};

/// The only context of a stand-alone UFO.
pub const DEFAULT_CONTEXT: &str = "public.default";

/// UFOs without a units-per-em in fontinfo.plist are treated like Glyphs.app
/// treats new fonts.
pub(crate) const FALLBACK_UNITS_PER_EM: u32 = 1000;

pub(crate) fn units_per_em(font: &norad::Font) -> Option<u32> {
    font.font_info
        .units_per_em
        .as_ref()
        .map(|upm| upm.round() as u32)
        .filter(|upm| *upm > 0)
}

/// Kerning entries of one UFO, rounded to the integer grid.
pub(crate) fn ufo_pairs(font: &norad::Font, context: &str) -> Vec<KerningEntry> {
    font.kerning
        .iter()
        .flat_map(|(left, row)| {
            row.iter().map(move |(right, value)| {
                KerningEntry::new(context, left.as_str(), right.as_str(), value.round() as i64)
            })
        })
        .collect()
}

pub(crate) fn ufo_is_valid_key(font: &norad::Font, key: &str) -> bool {
    Name::new(key).map_or(false, |name| font.groups.contains_key(&name))
        || font.default_layer().get_glyph(key).is_some()
}

pub(crate) fn ufo_set_value(font: &mut norad::Font, left: &str, right: &str, value: i64) {
    let (Ok(left_name), Ok(right_name)) = (Name::new(left), Name::new(right)) else {
        log::warn!("Cannot kern {left}/{right}: not a valid UFO name");
        return;
    };
    font.kerning
        .entry(left_name)
        .or_default()
        .insert(right_name, value as f64);
}

pub(crate) fn ufo_remove_pair(font: &mut norad::Font, left: &str, right: &str) {
    let (Ok(left_name), Ok(right_name)) = (Name::new(left), Name::new(right)) else {
        return;
    };
    if let Some(row) = font.kerning.get_mut(&left_name) {
        row.remove(&right_name);
        // An empty first-level dict is still written out by UFO serializers.
        if row.is_empty() {
            font.kerning.remove(&left_name);
        }
    }
}

impl KerningTable for norad::Font {
    fn units_per_em(&self) -> u32 {
        units_per_em(self).unwrap_or(FALLBACK_UNITS_PER_EM)
    }

    fn contexts(&self) -> Vec<String> {
        vec![DEFAULT_CONTEXT.to_string()]
    }

    fn pairs(&self, context: &str) -> Vec<KerningEntry> {
        if context != DEFAULT_CONTEXT {
            return Vec::new();
        }
        ufo_pairs(self, context)
    }

    fn is_valid_key(&self, _context: &str, key: &str) -> bool {
        ufo_is_valid_key(self, key)
    }

    fn set_value(&mut self, context: &str, left: &str, right: &str, value: i64) {
        if context == DEFAULT_CONTEXT {
            ufo_set_value(self, left, right, value);
        }
    }

    fn remove_pair(&mut self, context: &str, left: &str, right: &str) {
        if context == DEFAULT_CONTEXT {
            ufo_remove_pair(self, left, right);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> Name {
        Name::new(s).unwrap()
    }

    fn test_ufo() -> norad::Font {
        let mut font = norad::Font::new();
        let layer = font.layers.default_layer_mut();
        for glyph_name in ["A", "V", "T", "o"] {
            layer.insert_glyph(norad::Glyph::new(glyph_name));
        }
        font.groups
            .insert(name("public.kern1.O"), vec![name("o")]);
        font.kerning
            .entry(name("A"))
            .or_default()
            .insert(name("V"), -40.4);
        font.kerning
            .entry(name("public.kern1.O"))
            .or_default()
            .insert(name("T"), -20.0);
        font
    }

    #[test]
    fn reads_rounded_entries() {
        let font = test_ufo();
        let mut pairs = font.pairs(DEFAULT_CONTEXT);
        pairs.sort_by(|a, b| a.left.cmp(&b.left));
        assert_eq!(
            pairs,
            vec![
                KerningEntry::new(DEFAULT_CONTEXT, "A", "V", -40),
                KerningEntry::new(DEFAULT_CONTEXT, "public.kern1.O", "T", -20),
            ]
        );
        assert!(font.pairs("m01").is_empty());
        assert_eq!(font.units_per_em(), FALLBACK_UNITS_PER_EM);
    }

    #[test]
    fn validates_glyphs_and_groups() {
        let font = test_ufo();
        assert!(font.is_valid_key(DEFAULT_CONTEXT, "A"));
        assert!(font.is_valid_key(DEFAULT_CONTEXT, "public.kern1.O"));
        assert!(!font.is_valid_key(DEFAULT_CONTEXT, "public.kern2.O"));
        assert!(!font.is_valid_key(DEFAULT_CONTEXT, "B"));
        // Not a legal UFO name, so it can be neither a group nor a glyph.
        assert!(!font.is_valid_key(DEFAULT_CONTEXT, ""));
    }

    #[test]
    fn writes_and_removes_pairs() {
        let mut font = test_ufo();
        font.set_value(DEFAULT_CONTEXT, "T", "o", -60);
        assert_eq!(font.kerning[&name("T")][&name("o")], -60.0);

        font.remove_pair(DEFAULT_CONTEXT, "public.kern1.O", "T");
        assert!(!font.kerning.contains_key(&name("public.kern1.O")));

        // Other contexts do not exist in a single UFO.
        font.set_value("m01", "A", "T", 10);
        assert!(!font.kerning[&name("A")].contains_key(&name("T")));
    }
}
