//! The capability set a font has to offer for kerning passes.

/// One kerning value of one master.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct KerningEntry {
    /// The master the value belongs to.
    pub context: String,
    /// Glyph name or kerning group on the left side.
    pub left: String,
    /// Glyph name or kerning group on the right side.
    pub right: String,
    pub value: i64,
}

impl KerningEntry {
    pub fn new(context: &str, left: &str, right: &str, value: i64) -> Self {
        Self {
            context: context.to_string(),
            left: left.to_string(),
            right: right.to_string(),
            value,
        }
    }
}

/// Read and write access to the per-master kerning of a font.
///
/// There is at most one value per (context, left, right). Implementations
/// are used by a single pass at a time and need no interior locking.
pub trait KerningTable {
    /// The design grid resolution; always positive.
    fn units_per_em(&self) -> u32;

    /// Master identifiers in font order.
    fn contexts(&self) -> Vec<String>;

    /// All kerning entries of one master.
    fn pairs(&self, context: &str) -> Vec<KerningEntry>;

    /// Whether `key` names an existing kerning group or glyph in `context`.
    fn is_valid_key(&self, context: &str, key: &str) -> bool;

    /// Set a value, creating the pair if absent.
    fn set_value(&mut self, context: &str, left: &str, right: &str, value: i64);

    /// Remove a pair entirely. Removing an absent pair does nothing.
    fn remove_pair(&mut self, context: &str, left: &str, right: &str);

    /// All kerning entries of all masters.
    fn entries(&self) -> Vec<KerningEntry> {
        self.contexts()
            .iter()
            .flat_map(|context| self.pairs(context))
            .collect()
    }

    /// Whether both sides of a pair may be rewritten.
    fn is_valid_pair(&self, context: &str, left: &str, right: &str) -> bool {
        self.is_valid_key(context, left) && self.is_valid_key(context, right)
    }
}
