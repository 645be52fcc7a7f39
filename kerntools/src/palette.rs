//! Kerning palettization.
//!
//! Reduces the number of distinct kerning values, similar to a GIF/PNG-8
//! palette: nearby values are clustered into spans and every value in a span
//! is replaced by the span's midpoint. The change to any single value is
//! bounded by a tolerance relative to the units-per-em. This is lossy but
//! nearly imperceptible, and lets GPOS share more value records.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;

use crate::table::{KerningEntry, KerningTable};

/// Default maximum change to a kerning value, as a fraction of the UPM.
pub const DEFAULT_MAX_TWEAK_RELATIVE: f64 = 0.003;

/// A closed interval of kerning values that share one representative.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ValueSpan {
    pub lower: i64,
    pub upper: i64,
}

impl ValueSpan {
    pub fn new(lower: i64, upper: i64) -> Self {
        Self { lower, upper }
    }

    /// The rounded-down midpoint.
    pub fn representative(&self) -> i64 {
        (self.lower + self.upper).div_euclid(2)
    }

    pub fn contains(&self, value: i64) -> bool {
        self.lower <= value && value <= self.upper
    }
}

/// The absolute tolerance in font units.
pub fn tolerance(units_per_em: u32, max_tweak_relative: f64) -> i64 {
    (max_tweak_relative * units_per_em as f64).round() as i64
}

/// The widest span for which every member is within `tolerance` of the
/// midpoint.
pub fn max_span(tolerance: i64) -> i64 {
    2 * tolerance + 1
}

/// Greedily cut sorted, distinct `values` into spans narrower than
/// `max_span`.
pub fn build_spans(values: &[i64], max_span: i64) -> Vec<ValueSpan> {
    let mut spans = Vec::new();
    let Some(&first) = values.first() else {
        return spans;
    };
    let mut current = ValueSpan::new(first, first);
    for &value in &values[1..] {
        if value < current.lower + max_span {
            current.upper = value;
        } else {
            spans.push(current);
            current = ValueSpan::new(value, value);
        }
    }
    spans.push(current);
    spans
}

/// Rebalance adjacent spans around the midpoint of their combined extent.
///
/// When the left span reaches past that midpoint it is cut back, and the right
/// span starts just after it. Both new boundaries are then snapped inwards to
/// values that actually occur, so no boundary is an arbitrary integer.
///
/// # Panics
///
/// If a span that did not need cutting is overlapped by its right neighbour.
/// That only happens when `spans` was not built by [`build_spans`] from
/// `values`.
pub fn equalize_spans(spans: &mut [ValueSpan], values: &BTreeSet<i64>) {
    for i in 1..spans.len() {
        let (head, tail) = spans.split_at_mut(i);
        let left = &mut head[i - 1];
        let right = &mut tail[0];

        let middle = (left.lower + right.upper).div_euclid(2);
        if left.upper > middle {
            left.upper = middle;
            while left.upper > left.lower && !values.contains(&left.upper) {
                left.upper -= 1;
            }
            right.lower = middle + 1;
            while right.lower < right.upper && !values.contains(&right.lower) {
                right.lower += 1;
            }
        } else {
            assert!(
                right.lower > middle,
                "kerning spans {left:?} and {right:?} overlap around {middle}"
            );
        }
    }
}

/// Maps every integer covered by a span to that span's representative.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PaletteMapping {
    map: BTreeMap<i64, i64>,
}

impl PaletteMapping {
    pub fn from_spans(spans: &[ValueSpan]) -> Self {
        let mut map = BTreeMap::new();
        for span in spans {
            let representative = span.representative();
            for value in span.lower..=span.upper {
                map.insert(value, representative);
            }
        }
        Self { map }
    }

    /// Build spans over `values` (in any order, duplicates allowed) and map
    /// them.
    pub fn build(values: impl IntoIterator<Item = i64>, tolerance: i64) -> (Vec<ValueSpan>, Self) {
        let values: BTreeSet<i64> = values.into_iter().collect();
        let sorted: Vec<i64> = values.iter().copied().collect();
        let mut spans = build_spans(&sorted, max_span(tolerance));
        equalize_spans(&mut spans, &values);
        let mapping = Self::from_spans(&spans);
        (spans, mapping)
    }

    pub fn get(&self, value: i64) -> Option<i64> {
        self.map.get(&value).copied()
    }

    /// The distinct representatives.
    pub fn representatives(&self) -> BTreeSet<i64> {
        self.map.values().copied().collect()
    }
}

/// What a palettization run did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PaletteOutcome {
    /// The tolerance rounds to less than one unit; nothing was touched.
    DegenerateTolerance { tolerance: i64 },
    /// The font has no kerning; nothing was touched.
    NoKerning,
    Applied(PaletteReport),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PaletteReport {
    pub tolerance: i64,
    pub pairs: usize,
    pub unique_before: usize,
    pub unique_after: usize,
    pub pairs_after: usize,
    pub spans: usize,
    pub changed: usize,
    pub zeroed: usize,
}

impl PaletteReport {
    /// A rough GPOS size: six bytes per pair and two per distinct value.
    /// Not an actual serialization size.
    pub fn estimated_size_before(&self) -> usize {
        estimated_size(self.pairs, self.unique_before)
    }

    pub fn estimated_size_after(&self) -> usize {
        estimated_size(self.pairs_after, self.unique_after)
    }

    pub fn estimated_savings(&self) -> i64 {
        self.estimated_size_before() as i64 - self.estimated_size_after() as i64
    }

    pub fn savings_percent(&self) -> f64 {
        match self.estimated_size_before() {
            0 => 0.0,
            before => self.estimated_savings() as f64 / before as f64 * 100.0,
        }
    }
}

fn estimated_size(pairs: usize, unique_values: usize) -> usize {
    pairs * 6 + unique_values * 2
}

impl fmt::Display for PaletteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Palettize Kerning Report")?;
        writeln!(f, "  Tolerance: {} units", self.tolerance)?;
        writeln!(f, "  Kerning pairs processed: {}", self.pairs)?;
        writeln!(f, "  Unique values before: {}", self.unique_before)?;
        writeln!(f, "  Unique values after:  {}", self.unique_after)?;
        writeln!(f, "  Palette spans: {}", self.spans)?;
        writeln!(f, "  Changed pairs: {}", self.changed)?;
        writeln!(f, "  Zeroed pairs: {}", self.zeroed)?;
        writeln!(
            f,
            "  Estimated GPOS size before: {} bytes",
            self.estimated_size_before()
        )?;
        writeln!(
            f,
            "  Estimated GPOS size after:  {} bytes",
            self.estimated_size_after()
        )?;
        write!(
            f,
            "  Estimated savings: {} bytes ({:.1}%)",
            self.estimated_savings(),
            self.savings_percent()
        )
    }
}

impl fmt::Display for PaletteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaletteOutcome::DegenerateTolerance { tolerance } => write!(
                f,
                "Tolerance of {tolerance} units is below one unit, nothing to palettize."
            ),
            PaletteOutcome::NoKerning => write!(f, "No kerning values found to process."),
            PaletteOutcome::Applied(report) => fmt::Display::fmt(report, f),
        }
    }
}

fn unique_values(entries: &[KerningEntry]) -> usize {
    entries.iter().map(|e| e.value).collect::<HashSet<_>>().len()
}

/// Palettize the kerning of all masters in place.
///
/// Values within the tolerance of zero are set to zero. All other values are
/// moved to the representative of their span. Pairs with a side that is
/// neither a glyph nor a group are never written.
pub fn palettize_kerning<T: KerningTable + ?Sized>(
    font: &mut T,
    max_tweak_relative: f64,
) -> PaletteOutcome {
    let tolerance = tolerance(font.units_per_em(), max_tweak_relative);
    if tolerance < 1 {
        log::warn!("Kerning tolerance {tolerance} is below one unit, skipping palettization");
        return PaletteOutcome::DegenerateTolerance { tolerance };
    }

    let before = font.entries();
    if before.is_empty() {
        log::warn!("No kerning values found to process");
        return PaletteOutcome::NoKerning;
    }

    let mut report = PaletteReport {
        tolerance,
        pairs: before.len(),
        unique_before: unique_values(&before),
        ..Default::default()
    };

    let mut records = Vec::new();
    for entry in before {
        if entry.value.abs() > tolerance {
            records.push(entry);
        } else if font.is_valid_pair(&entry.context, &entry.left, &entry.right) {
            if entry.value != 0 {
                report.zeroed += 1;
            }
            font.set_value(&entry.context, &entry.left, &entry.right, 0);
        } else {
            log::debug!(
                "Skipping {}/{} in {}: unknown glyph or group",
                entry.left,
                entry.right,
                entry.context
            );
        }
    }

    let (spans, mapping) = PaletteMapping::build(records.iter().map(|e| e.value), tolerance);
    for span in &spans {
        log::debug!(
            "Span {}..={} -> {}",
            span.lower,
            span.upper,
            span.representative()
        );
    }
    report.spans = spans.len();

    for entry in &records {
        let Some(new_value) = mapping.get(entry.value) else {
            continue;
        };
        if !font.is_valid_pair(&entry.context, &entry.left, &entry.right) {
            log::debug!(
                "Skipping {}/{} in {}: unknown glyph or group",
                entry.left,
                entry.right,
                entry.context
            );
            continue;
        }
        if new_value != entry.value {
            report.changed += 1;
        }
        font.set_value(&entry.context, &entry.left, &entry.right, new_value);
    }

    let after = font.entries();
    report.pairs_after = after.len();
    report.unique_after = unique_values(&after);
    log::info!(
        "Palettized {} kerning pairs: {} -> {} distinct values, {} changed, {} zeroed",
        report.pairs,
        report.unique_before,
        report.unique_after,
        report.changed,
        report.zeroed
    );

    PaletteOutcome::Applied(report)
}
