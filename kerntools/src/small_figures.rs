//! Copy kerning between the small figure sets (superiors, inferiors,
//! numerators, denominators), which usually share their spacing.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::table::KerningTable;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FigureSet {
    Superior,
    Inferior,
    Numerator,
    Denominator,
}

impl FigureSet {
    pub const ALL: [FigureSet; 4] = [
        FigureSet::Superior,
        FigureSet::Inferior,
        FigureSet::Numerator,
        FigureSet::Denominator,
    ];

    /// Glyph name endings that identify the set.
    pub fn suffixes(&self) -> &'static [&'static str] {
        match self {
            FigureSet::Superior => &[".sups", "superior"],
            FigureSet::Inferior => &[".subs", "inferior"],
            FigureSet::Numerator => &[".numr"],
            FigureSet::Denominator => &[".dnom"],
        }
    }

    fn strip<'a>(&self, key: &'a str) -> Option<&'a str> {
        self.suffixes()
            .iter()
            .find_map(|suffix| key.strip_suffix(suffix))
    }
}

impl FromStr for FigureSet {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sups" | "superior" => Ok(FigureSet::Superior),
            "subs" | "inferior" => Ok(FigureSet::Inferior),
            "numr" | "numerator" => Ok(FigureSet::Numerator),
            "dnom" | "denominator" => Ok(FigureSet::Denominator),
            _ => Err(format!(
                "unknown figure set {s}, expected sups, subs, numr or dnom"
            )),
        }
    }
}

impl fmt::Display for FigureSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FigureSet::Superior => "superior",
            FigureSet::Inferior => "inferior",
            FigureSet::Numerator => "numerator",
            FigureSet::Denominator => "denominator",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CopiedPair {
    pub context: String,
    pub source: (String, String),
    pub target: (String, String),
    pub value: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CopyReport {
    pub copied: Vec<CopiedPair>,
}

impl fmt::Display for CopyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for pair in &self.copied {
            writeln!(
                f,
                "[{}] Copied {} from {}/{} to {}/{}",
                pair.context, pair.value, pair.source.0, pair.source.1, pair.target.0, pair.target.1
            )?;
        }
        Ok(())
    }
}

/// Copy every pair kerning two figures of `source` onto the matching pairs of
/// all other figure sets.
///
/// Only `master` is processed when given, otherwise all masters. A copy is
/// written only when both of its keys exist in that master.
pub fn copy_small_figure_kerning<T: KerningTable + ?Sized>(
    font: &mut T,
    source: FigureSet,
    master: Option<&str>,
) -> Result<CopyReport, Error> {
    let contexts = match master {
        Some(master) => {
            if !font.contexts().iter().any(|c| c == master) {
                return Err(Error::InvalidArgument(format!("no master named '{master}'")));
            }
            vec![master.to_string()]
        }
        None => font.contexts(),
    };

    let mut report = CopyReport::default();
    for context in &contexts {
        for entry in font.pairs(context) {
            let (Some(left_stem), Some(right_stem)) =
                (source.strip(&entry.left), source.strip(&entry.right))
            else {
                continue;
            };

            for target in FigureSet::ALL.iter().filter(|set| **set != source) {
                for suffix in target.suffixes() {
                    let left = format!("{left_stem}{suffix}");
                    let right = format!("{right_stem}{suffix}");
                    if !font.is_valid_pair(context, &left, &right) {
                        continue;
                    }
                    font.set_value(context, &left, &right, entry.value);
                    report.copied.push(CopiedPair {
                        context: context.clone(),
                        source: (entry.left.clone(), entry.right.clone()),
                        target: (left, right),
                        value: entry.value,
                    });
                }
            }
        }
    }
    log::info!(
        "Copied {} {source} figure pairs across {} masters",
        report.copied.len(),
        contexts.len()
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryFont;

    fn figures_font() -> MemoryFont {
        MemoryFont::new(1000)
            .with_glyphs([
                "one.sups",
                "seven.sups",
                "one.numr",
                "seven.numr",
                "one.dnom",
                "oneinferior",
                "seveninferior",
            ])
            .with_pair("Regular", "one.sups", "seven.sups", -30)
            .with_pair("Regular", "one", "seven", -50)
            .with_pair("Bold", "one.sups", "seven.sups", -36)
    }

    #[test]
    fn parses_set_names() {
        assert_eq!("sups".parse::<FigureSet>(), Ok(FigureSet::Superior));
        assert_eq!("inferior".parse::<FigureSet>(), Ok(FigureSet::Inferior));
        assert!("ordn".parse::<FigureSet>().is_err());
    }

    #[test]
    fn copies_to_existing_figures_only() {
        let mut font = figures_font();
        let report = copy_small_figure_kerning(&mut font, FigureSet::Superior, None).unwrap();

        assert_eq!(font.value("Regular", "one.numr", "seven.numr"), Some(-30));
        assert_eq!(font.value("Regular", "oneinferior", "seveninferior"), Some(-30));
        assert_eq!(font.value("Bold", "one.numr", "seven.numr"), Some(-36));
        // seven.dnom does not exist.
        assert_eq!(font.value("Regular", "one.dnom", "seven.dnom"), None);
        assert_eq!(report.copied.len(), 4);
        assert!(report
            .to_string()
            .contains("[Regular] Copied -30 from one.sups/seven.sups to one.numr/seven.numr"));
    }

    #[test]
    fn single_master() {
        let mut font = figures_font();
        copy_small_figure_kerning(&mut font, FigureSet::Superior, Some("Bold")).unwrap();
        assert_eq!(font.value("Bold", "one.numr", "seven.numr"), Some(-36));
        assert_eq!(font.value("Regular", "one.numr", "seven.numr"), None);

        assert!(matches!(
            copy_small_figure_kerning(&mut font, FigureSet::Superior, Some("Black")),
            Err(Error::InvalidArgument(_))
        ));
    }
}
