//! Round kerning to a coarser grid and drop tiny pairs.

use std::fmt;

use crate::error::Error;
use crate::table::KerningTable;

pub const DEFAULT_BASE: i64 = 5;
pub const DEFAULT_MIN_VALUE: i64 = 5;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundChange {
    pub context: String,
    pub left: String,
    pub right: String,
    pub old: i64,
    /// `None` when the pair was removed.
    pub new: Option<i64>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoundReport {
    pub changes: Vec<RoundChange>,
}

impl RoundReport {
    pub fn removed(&self) -> usize {
        self.changes.iter().filter(|c| c.new.is_none()).count()
    }
}

impl fmt::Display for RoundReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for change in &self.changes {
            writeln!(
                f,
                "{}\t{}: {}, {}, {}",
                change.new.unwrap_or(0),
                change.context,
                change.left,
                change.right,
                change.old
            )?;
        }
        Ok(())
    }
}

/// Nearest multiple of `base`, halves away from zero.
pub fn round_to_multiple(value: i64, base: i64) -> i64 {
    let steps = (2 * value.abs() + base) / (2 * base);
    value.signum() * steps * base
}

/// Round every kerning value to a multiple of `base`, removing pairs whose
/// magnitude is below `min_value`.
pub fn round_kerning<T: KerningTable + ?Sized>(
    font: &mut T,
    base: i64,
    min_value: i64,
) -> Result<RoundReport, Error> {
    if base < 1 {
        return Err(Error::InvalidArgument(format!(
            "rounding base must be at least 1, got {base}"
        )));
    }

    let mut report = RoundReport::default();
    for context in font.contexts() {
        let mut to_be_removed = Vec::new();
        for entry in font.pairs(&context) {
            if entry.value.abs() < min_value {
                to_be_removed.push(entry);
                continue;
            }
            let value = round_to_multiple(entry.value, base);
            if value != entry.value {
                font.set_value(&context, &entry.left, &entry.right, value);
                report.changes.push(RoundChange {
                    context: context.clone(),
                    left: entry.left,
                    right: entry.right,
                    old: entry.value,
                    new: Some(value),
                });
            }
        }

        for entry in to_be_removed {
            font.remove_pair(&context, &entry.left, &entry.right);
            report.changes.push(RoundChange {
                context: context.clone(),
                left: entry.left,
                right: entry.right,
                old: entry.value,
                new: None,
            });
        }
    }
    log::info!(
        "Rounded kerning to multiples of {base}: {} pairs changed, {} removed",
        report.changes.len() - report.removed(),
        report.removed()
    );

    Ok(report)
}
